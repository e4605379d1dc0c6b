use indicatif::ParallelProgressIterator;
use openfield_common::{TrajectoryDataset, Vec2};
use rayon::prelude::*;

/// Whether the reference agent is interacting with any other agent at one
/// timepoint: true as soon as any pair of perimeter points across agents
/// comes strictly closer than `threshold`.
///
/// Any pairwise distance beyond `2*major_axis + 2*threshold` aborts the
/// whole scan as non-interacting. For genuine ellipse outlines (point
/// spread bounded by the major axis) that bound is safe; for arbitrary
/// point sets it is only a locality heuristic (see the tests against the
/// brute-force scan).
pub fn is_interacting(
    reference_xs: &[f32],
    reference_ys: &[f32],
    others: &[(&[f32], &[f32])],
    threshold: f32,
    major_axis: f32,
) -> bool {
    let far_cutoff = 2.0 * major_axis + 2.0 * threshold;

    for &(other_xs, other_ys) in others {
        for (&rx, &ry) in reference_xs.iter().zip(reference_ys) {
            let reference_point = Vec2::new(rx, ry);
            for (&ox, &oy) in other_xs.iter().zip(other_ys) {
                let distance = reference_point.distance(Vec2::new(ox, oy));
                if distance < threshold {
                    return true;
                } else if distance > far_cutoff {
                    return false;
                }
            }
        }
    }

    false
}

/// Fraction of timepoints, per agent, at which the agent was interacting
/// with at least one other agent.
///
/// Timepoints are independent, so the scan runs in parallel across them;
/// the dataset is read-only throughout.
pub fn measure_interactions(dataset: &TrajectoryDataset, threshold: f32) -> Vec<f32> {
    let n_agents = dataset.meta.n_agents as usize;
    let timepoints = dataset.timepoints();
    let major_axis = dataset.meta.major_axis;

    if timepoints == 0 {
        return vec![0.0; n_agents];
    }

    let interacting_counts = (0..timepoints)
        .into_par_iter()
        .progress_count(timepoints as u64)
        .map(|t| {
            (0..n_agents)
                .map(|agent| {
                    let (xs, ys) = dataset.agent_perimeter(t, agent);
                    let others: Vec<(&[f32], &[f32])> = (0..n_agents)
                        .filter(|&other| other != agent)
                        .map(|other| dataset.agent_perimeter(t, other))
                        .collect();
                    u32::from(is_interacting(xs, ys, &others, threshold, major_axis))
                })
                .collect::<Vec<u32>>()
        })
        .reduce(
            || vec![0u32; n_agents],
            |mut acc, row| {
                for (total, flagged) in acc.iter_mut().zip(row) {
                    *total += flagged;
                }
                acc
            },
        );

    interacting_counts
        .into_iter()
        .map(|count| count as f32 / timepoints as f32)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use openfield_common::TrajectoryMeta;

    const MAJOR_AXIS: f32 = 60.0;

    /// Four-point diamond outline around a center, radius 1 mm.
    fn diamond(cx: f32, cy: f32) -> (Vec<f32>, Vec<f32>) {
        (
            vec![cx + 1.0, cx, cx - 1.0, cx],
            vec![cy, cy + 1.0, cy, cy - 1.0],
        )
    }

    /// Dataset with one timepoint per entry of `centers`, each entry giving
    /// every agent's center at that timepoint.
    fn dataset_from_centers(centers: &[Vec<(f32, f32)>]) -> TrajectoryDataset {
        let n_agents = centers[0].len();
        let mut center_history = Vec::new();
        let mut perimeter_history = Vec::new();
        for frame in centers {
            let mut center_row = Vec::new();
            let mut perimeter_row = Vec::new();
            for &(cx, cy) in frame {
                let (xs, ys) = diamond(cx, cy);
                center_row.push(cx);
                center_row.push(cy);
                perimeter_row.push(xs);
                perimeter_row.push(ys);
            }
            center_history.push(center_row);
            perimeter_history.push(perimeter_row);
        }
        TrajectoryDataset {
            meta: TrajectoryMeta {
                arena_width: 1000.0,
                arena_height: 1000.0,
                n_agents: n_agents as u32,
                run_minutes: 1.0,
                avg_speed: 0.09,
                speed_std: 0.06,
                major_axis: MAJOR_AXIS,
                minor_axis: 30.0,
            },
            center_history,
            perimeter_history,
        }
    }

    /// Reference implementation: exhaustive pairwise scan, no early exit.
    fn brute_force_interacting(
        reference_xs: &[f32],
        reference_ys: &[f32],
        others: &[(&[f32], &[f32])],
        threshold: f32,
    ) -> bool {
        others.iter().any(|&(oxs, oys)| {
            reference_xs.iter().zip(reference_ys).any(|(&rx, &ry)| {
                oxs.iter()
                    .zip(oys)
                    .any(|(&ox, &oy)| Vec2::new(rx, ry).distance(Vec2::new(ox, oy)) < threshold)
            })
        })
    }

    #[test]
    fn zero_threshold_and_wide_separation_yields_zero_fractions() {
        // both agents further apart than 2 * major_axis at every timepoint
        let dataset = dataset_from_centers(&[
            vec![(100.0, 100.0), (400.0, 400.0)],
            vec![(110.0, 100.0), (420.0, 400.0)],
        ]);
        let fractions = measure_interactions(&dataset, 0.0);
        assert_eq!(fractions, vec![0.0, 0.0]);
    }

    #[test]
    fn coincident_perimeters_interact_for_any_positive_threshold() {
        let (xs, ys) = diamond(50.0, 50.0);
        let others = [(xs.as_slice(), ys.as_slice())];
        assert!(is_interacting(&xs, &ys, &others, 1.0, MAJOR_AXIS));
    }

    #[test]
    fn fraction_counts_only_interacting_timepoints() {
        // close at the first timepoint, far at the remaining three
        let dataset = dataset_from_centers(&[
            vec![(100.0, 100.0), (101.0, 100.0)],
            vec![(100.0, 100.0), (500.0, 500.0)],
            vec![(100.0, 100.0), (500.0, 500.0)],
            vec![(100.0, 100.0), (500.0, 500.0)],
        ]);
        let fractions = measure_interactions(&dataset, 5.0);
        assert_eq!(fractions, vec![0.25, 0.25]);
    }

    #[test]
    fn agrees_with_brute_force_on_ellipse_scale_configurations() {
        let threshold = 5.0;
        let cases = [
            (Vec2::new(0.0, 0.0), Vec2::new(2.0, 0.0)),     // touching
            (Vec2::new(0.0, 0.0), Vec2::new(50.0, 50.0)),   // near but clear
            (Vec2::new(0.0, 0.0), Vec2::new(400.0, 0.0)),   // far apart
        ];
        for (a, b) in cases {
            let (axs, ays) = diamond(a.x, a.y);
            let (bxs, bys) = diamond(b.x, b.y);
            let others = [(bxs.as_slice(), bys.as_slice())];
            assert_eq!(
                is_interacting(&axs, &ays, &others, threshold, MAJOR_AXIS),
                brute_force_interacting(&axs, &ays, &others, threshold),
                "divergence for centers {:?} and {:?}", a, b
            );
        }
    }

    #[test]
    fn early_exit_is_a_heuristic_for_overspread_point_sets() {
        // Point sets spread wider than the declared major axis can trip the
        // early exit before the close pair is reached; the bound is only
        // sound when the spread is ellipse-like.
        let reference = (vec![0.0f32, 100.0], vec![0.0f32, 0.0]);
        let other = (vec![100.5f32], vec![0.0f32]);
        let others = [(other.0.as_slice(), other.1.as_slice())];
        let threshold = 1.0;
        let tiny_major_axis = 10.0;

        assert!(brute_force_interacting(&reference.0, &reference.1, &others, threshold));
        assert!(!is_interacting(&reference.0, &reference.1, &others, threshold, tiny_major_axis));
    }
}
