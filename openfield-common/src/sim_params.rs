use serde::{Deserialize, Serialize};

/// Runtime parameters derived from the configuration, used on every tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimParams {
    // Arena
    pub arena_width: f32,  // mm
    pub arena_height: f32, // mm

    // Population
    pub n_agents: u32,

    // Agent kinematics
    pub avg_speed: f32,  // mm/ms
    pub speed_std: f32,  // mm/ms
    pub major_axis: f32, // mm
    pub minor_axis: f32, // mm

    // Time
    pub tick_ms: f32, // duration of one movement tick
    pub n_ticks: u32,
    pub run_minutes: f32,

    // Movement model
    pub heading_sigma: f32, // std of the persistent heading draw (rad)
    pub angular_step: f32,  // perimeter discretization step (rad)
    pub max_move_retries: u32,
}
