pub mod biome;
pub mod geometry;
pub mod grid;
pub mod obstacle;
pub mod world;

use thiserror::Error;

/// A generation attempt that produced a map gameplay cannot use.
///
/// Under-filled rejection sampling is *not* an error; only maps that would be
/// broken (unreachable halves, clearings sitting on water) end up here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    #[error("map is unreachable: {reason}")]
    Unreachable { reason: String },

    #[error("clearing #{index} near cell ({col}, {row}) overlaps water or another clearing")]
    ClearingOverlap { index: usize, col: i32, row: i32 },

    #[error("step `{step}` needs `{requires}` to run first")]
    MissingStage {
        step: &'static str,
        requires: &'static str,
    },

    #[error("no step at index {index} (pipeline has {total})")]
    StepOutOfRange { index: usize, total: usize },
}
