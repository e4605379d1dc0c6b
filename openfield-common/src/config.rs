use serde::{Deserialize, Serialize};
use anyhow::Result;
use crate::sim_params::SimParams;
use std::path::Path;

// Configuration for arena properties
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ArenaConfig {
    pub width_mm: f32,
    pub height_mm: f32,
}

// Configuration for the simulated population
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct AgentParamsConfig {
    pub count: u32,
    #[serde(default = "default_avg_speed")]
    pub avg_speed_mm_per_ms: f32,
    #[serde(default = "default_speed_std")]
    pub speed_std_mm_per_ms: f32,
    #[serde(default = "default_major_axis")]
    pub major_axis_mm: f32,
    #[serde(default = "default_minor_axis")]
    pub minor_axis_mm: f32,
}

// Configuration for run length
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct TimingConfig {
    pub run_minutes: f32,
}

// Configuration for the stochastic movement model
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct MovementConfig {
    pub rng_seed: u64,
    #[serde(default = "default_max_move_retries")]
    pub max_move_retries: u32,
    #[serde(default = "default_heading_sigma")]
    pub heading_sigma_rad: f32,
    #[serde(default = "default_angular_step")]
    pub angular_step_rad: f32,
}

// Configuration for output settings
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct OutputConfig {
    pub base_filename: String,
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    pub save_trajectory: bool,
    pub save_final_centers: bool,
    pub format: Option<String>, // Output format: "json", "bincode", "messagepack"
}

fn default_avg_speed() -> f32 { 0.09 }
fn default_speed_std() -> f32 { 0.06 }
fn default_major_axis() -> f32 { 60.0 }
fn default_minor_axis() -> f32 { 30.0 }
fn default_max_move_retries() -> u32 { 1000 }
fn default_heading_sigma() -> f32 { std::f32::consts::FRAC_PI_4 }
fn default_angular_step() -> f32 { 0.05 }
fn default_output_dir() -> String { ".".to_string() }

// Main simulation configuration structure, loaded from config.toml.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct SimulationConfig {
    pub arena: ArenaConfig,
    pub agents: AgentParamsConfig,
    pub timing: TimingConfig,
    pub movement: MovementConfig,
    pub output: OutputConfig,
}

impl SimulationConfig {
    /// Loads the simulation configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();

        let config_str = std::fs::read_to_string(path_ref)
            .map_err(|e| anyhow::anyhow!("Failed to read config file '{}': {}", path_ref.display(), e))?;
        let config: SimulationConfig = toml::from_str(&config_str)
            .map_err(|e| anyhow::anyhow!("Failed to parse TOML from '{}': {}", path_ref.display(), e))?;

        config.validate()?;
        Ok(config)
    }

    /// Checks the parsed values for physical plausibility.
    pub fn validate(&self) -> Result<()> {
        if self.arena.width_mm <= 0.0 || self.arena.height_mm <= 0.0 {
            anyhow::bail!("arena extents must be positive.");
        }
        if self.agents.count == 0 {
            anyhow::bail!("agents.count must be greater than 0.");
        }
        if self.agents.avg_speed_mm_per_ms <= 0.0 {
            anyhow::bail!("avg_speed_mm_per_ms must be positive.");
        }
        if self.agents.speed_std_mm_per_ms < 0.0 {
            anyhow::bail!("speed_std_mm_per_ms must not be negative.");
        }
        if self.agents.major_axis_mm <= 0.0 || self.agents.minor_axis_mm <= 0.0 {
            anyhow::bail!("ellipse axes must be positive.");
        }
        if self.agents.major_axis_mm >= self.arena.width_mm.min(self.arena.height_mm) {
            anyhow::bail!(
                "major axis ({} mm) does not fit in a {}x{} mm arena.",
                self.agents.major_axis_mm, self.arena.width_mm, self.arena.height_mm
            );
        }
        if self.timing.run_minutes <= 0.0 {
            anyhow::bail!("run_minutes must be positive.");
        }
        if self.movement.max_move_retries == 0 {
            anyhow::bail!("max_move_retries must be at least 1.");
        }
        if self.movement.angular_step_rad <= 0.0
            || self.movement.angular_step_rad >= std::f32::consts::TAU
        {
            anyhow::bail!("angular_step_rad must lie in (0, 2*pi).");
        }
        if self.movement.heading_sigma_rad <= 0.0 {
            anyhow::bail!("heading_sigma_rad must be positive.");
        }
        Ok(())
    }

    /// Converts the configuration into runtime parameters.
    ///
    /// The tick duration is chosen so that the average move covers one
    /// fifth of a body length.
    pub fn get_sim_params(&self) -> SimParams {
        let avg_speed = self.agents.avg_speed_mm_per_ms;
        let major_axis = self.agents.major_axis_mm;

        let tick_ms = (major_axis / avg_speed) / 5.0;
        let run_ms = self.timing.run_minutes * 60.0 * 1000.0;
        let n_ticks = (run_ms / tick_ms) as u32;

        SimParams {
            arena_width: self.arena.width_mm,
            arena_height: self.arena.height_mm,
            n_agents: self.agents.count,
            avg_speed,
            speed_std: self.agents.speed_std_mm_per_ms,
            major_axis,
            minor_axis: self.agents.minor_axis_mm,
            tick_ms,
            n_ticks,
            run_minutes: self.timing.run_minutes,
            heading_sigma: self.movement.heading_sigma_rad,
            angular_step: self.movement.angular_step_rad,
            max_move_retries: self.movement.max_move_retries,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> SimulationConfig {
        SimulationConfig {
            arena: ArenaConfig { width_mm: 250.0, height_mm: 180.0 },
            agents: AgentParamsConfig {
                count: 2,
                avg_speed_mm_per_ms: 0.09,
                speed_std_mm_per_ms: 0.06,
                major_axis_mm: 60.0,
                minor_axis_mm: 30.0,
            },
            timing: TimingConfig { run_minutes: 5.0 },
            movement: MovementConfig {
                rng_seed: 42,
                max_move_retries: 1000,
                heading_sigma_rad: std::f32::consts::FRAC_PI_4,
                angular_step_rad: 0.05,
            },
            output: OutputConfig {
                base_filename: "test".into(),
                output_dir: ".".into(),
                save_trajectory: true,
                save_final_centers: false,
                format: None,
            },
        }
    }

    #[test]
    fn tick_duration_is_a_fifth_of_body_length() {
        let params = base_config().get_sim_params();
        // 60 mm body at 0.09 mm/ms: crossing takes 666.7 ms, a tick is a fifth of that
        assert!((params.tick_ms - 60.0 / 0.09 / 5.0).abs() < 1e-3);
        let expected_ticks = (5.0 * 60.0 * 1000.0 / params.tick_ms) as u32;
        assert_eq!(params.n_ticks, expected_ticks);
    }

    #[test]
    fn rejects_zero_agents() {
        let mut config = base_config();
        config.agents.count = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_oversized_body() {
        let mut config = base_config();
        config.agents.major_axis_mm = 200.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn parses_minimal_toml_with_defaults() {
        let toml_str = r#"
            [arena]
            width_mm = 250.0
            height_mm = 180.0

            [agents]
            count = 2

            [timing]
            run_minutes = 5.0

            [movement]
            rng_seed = 7

            [output]
            base_filename = "run"
            save_trajectory = true
            save_final_centers = false
        "#;
        let config: SimulationConfig = toml::from_str(toml_str).expect("parse");
        config.validate().expect("valid");
        assert!((config.agents.avg_speed_mm_per_ms - 0.09).abs() < 1e-9);
        assert_eq!(config.movement.max_move_retries, 1000);
        assert!((config.movement.angular_step_rad - 0.05).abs() < 1e-9);
    }
}
