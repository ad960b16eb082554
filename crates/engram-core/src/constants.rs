/// Engram system version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Upper bound on memory strength.
pub const STRENGTH_CAP: f64 = 100.0;

/// Ease factor clamp floor.
pub const EASE_MIN: f64 = 1.3;

/// Ease factor clamp ceiling.
pub const EASE_MAX: f64 = 2.5;

/// Maximum candidate facts accepted from a single teach turn.
/// Extraction output beyond this is truncated.
pub const MAX_DERIVED_FACTS_PER_TURN: usize = 16;

/// Maximum interactions replayed when building extraction context.
pub const MAX_TRANSCRIPT_WINDOW: usize = 50;
