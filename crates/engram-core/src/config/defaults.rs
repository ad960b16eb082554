//! Default configuration values. The scheduling constants are reasonable
//! spaced-repetition defaults, not empirically tuned; all are overridable
//! via the TOML config.

pub const DEFAULT_LEARNING_THRESHOLD: u32 = 2;
pub const DEFAULT_EASE_REWARD: f64 = 0.15;
pub const DEFAULT_EASE_PENALTY: f64 = 0.2;
pub const DEFAULT_MINIMAL_INTERVAL_DAYS: f64 = 1.0;
pub const DEFAULT_MASTERY_INTERVAL_DAYS: f64 = 90.0;
pub const DEFAULT_MASTERY_STREAK: u32 = 3;
pub const DEFAULT_FAST_LATENCY_SECS: u64 = 15;

pub const DEFAULT_NOVELTY_THRESHOLD: f64 = 0.40;
pub const DEFAULT_DUPLICATE_THRESHOLD: f64 = 0.90;

pub const DEFAULT_DB_PATH: &str = "engram.db";
pub const DEFAULT_HISTORY_PAGE_SIZE: usize = 32;

pub const DEFAULT_QUIZ_LIMIT: usize = 5;
