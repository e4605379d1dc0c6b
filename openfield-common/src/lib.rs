pub mod config;
pub mod error;
pub mod sim_params;
pub mod trajectory;
pub mod vecmath;

// Re-export key types for easier use by dependent crates
pub use config::{SimulationConfig, ArenaConfig, AgentParamsConfig, TimingConfig, MovementConfig, OutputConfig};
pub use error::SimError;
pub use sim_params::SimParams;
pub use trajectory::{TrajectoryDataset, TrajectoryMeta};
pub use vecmath::{Vec2, angle_to_vec, vec_to_angle};
