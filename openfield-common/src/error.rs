use thiserror::Error;

/// Typed failure kinds shared by the engine and the analyzer.
///
/// Rejected move candidates are not represented here: hitting a wall or an
/// occupied footprint is the expected trigger for resampling and is handled
/// locally by the movement loop.
#[derive(Debug, Error)]
pub enum SimError {
    /// An agent id was already present in the arena registry.
    #[error("agent id {0} is already registered in the arena")]
    DuplicateIdentifier(u32),

    /// The bounded rejection-sampling budget was exhausted without finding
    /// an in-bounds, unoccupied candidate footprint. The driver decides the
    /// fallback policy (the shipped driver keeps the previous position).
    #[error(
        "no valid move found for agent {agent} at tick {tick} after {attempts} candidates \
         (arena {arena_width}x{arena_height} mm)"
    )]
    NoValidMoveFound {
        agent: u32,
        tick: u32,
        attempts: u32,
        arena_width: f32,
        arena_height: f32,
    },

    /// A trajectory dataset was missing fields or had mismatched shapes.
    #[error("malformed trajectory dataset: {reason}")]
    MalformedTrajectoryDataset { reason: String },
}
