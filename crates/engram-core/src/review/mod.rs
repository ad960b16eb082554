//! Review model: per-fact spaced-repetition state.

mod ease;
mod phase;
mod state;
mod strength;

pub use ease::EaseFactor;
pub use phase::ReviewPhase;
pub use state::ReviewState;
pub use strength::Strength;
