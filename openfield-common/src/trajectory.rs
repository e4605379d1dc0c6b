use serde::{Serialize, Deserialize};
use crate::error::SimError;

/// Scalar metadata attached to a recorded run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrajectoryMeta {
    pub arena_width: f32,  // mm
    pub arena_height: f32, // mm
    pub n_agents: u32,
    pub run_minutes: f32,
    pub avg_speed: f32, // mm/ms
    pub speed_std: f32, // mm/ms
    pub major_axis: f32, // mm
    pub minor_axis: f32, // mm
}

/// A completed run: every agent's center and perimeter at every timepoint.
///
/// Columns alternate x,y per agent in a fixed agent order: agent `i` owns
/// columns `2i` (x) and `2i+1` (y) of both histories.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrajectoryDataset {
    pub meta: TrajectoryMeta,
    /// Shape `[timepoints][2 * n_agents]`.
    pub center_history: Vec<Vec<f32>>,
    /// Shape `[timepoints][2 * n_agents][perimeter_resolution]`.
    pub perimeter_history: Vec<Vec<Vec<f32>>>,
}

impl TrajectoryDataset {
    pub fn timepoints(&self) -> usize {
        self.center_history.len()
    }

    pub fn perimeter_resolution(&self) -> usize {
        self.perimeter_history
            .first()
            .and_then(|row| row.first())
            .map_or(0, Vec::len)
    }

    /// The perimeter x- and y-point rows for one agent at one timepoint.
    ///
    /// Callers must run `validate` first; out-of-shape access panics like
    /// any slice index.
    pub fn agent_perimeter(&self, timepoint: usize, agent: usize) -> (&[f32], &[f32]) {
        let row = &self.perimeter_history[timepoint];
        (&row[2 * agent], &row[2 * agent + 1])
    }

    /// Checks that the recorded shapes are mutually consistent.
    pub fn validate(&self) -> Result<(), SimError> {
        let malformed = |reason: String| SimError::MalformedTrajectoryDataset { reason };

        if self.meta.n_agents == 0 {
            return Err(malformed("metadata reports zero agents".into()));
        }
        if self.center_history.is_empty() {
            return Err(malformed("no timepoints recorded".into()));
        }
        if self.perimeter_history.len() != self.center_history.len() {
            return Err(malformed(format!(
                "center history has {} timepoints but perimeter history has {}",
                self.center_history.len(),
                self.perimeter_history.len()
            )));
        }

        let cols = 2 * self.meta.n_agents as usize;
        for (t, row) in self.center_history.iter().enumerate() {
            if row.len() != cols {
                return Err(malformed(format!(
                    "center row {} has {} columns, expected {}",
                    t, row.len(), cols
                )));
            }
        }

        let resolution = self.perimeter_resolution();
        if resolution == 0 {
            return Err(malformed("perimeter resolution is zero".into()));
        }
        for (t, row) in self.perimeter_history.iter().enumerate() {
            if row.len() != cols {
                return Err(malformed(format!(
                    "perimeter row {} has {} columns, expected {}",
                    t, row.len(), cols
                )));
            }
            for (col, points) in row.iter().enumerate() {
                if points.len() != resolution {
                    return Err(malformed(format!(
                        "perimeter row {} column {} has {} points, expected {}",
                        t, col, points.len(), resolution
                    )));
                }
            }
        }

        Ok(())
    }
}
