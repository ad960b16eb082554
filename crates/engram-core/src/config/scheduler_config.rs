use serde::{Deserialize, Serialize};

use super::defaults;

/// Spaced-repetition scheduler configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Correct streak needed to graduate from Learning to Review.
    pub learning_threshold: u32,
    /// Ease increase on a fast correct answer.
    pub ease_reward: f64,
    /// Ease decrease on an incorrect answer.
    pub ease_penalty: f64,
    /// Interval (days) applied after an incorrect answer and as the first
    /// interval after graduation into Learning.
    pub minimal_interval_days: f64,
    /// Interval ceiling (days) above which a fact can be mastered.
    pub mastery_interval_days: f64,
    /// Correct streak required for mastery.
    pub mastery_streak: u32,
    /// Answers faster than this (seconds) count as fast-correct.
    pub fast_latency_secs: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            learning_threshold: defaults::DEFAULT_LEARNING_THRESHOLD,
            ease_reward: defaults::DEFAULT_EASE_REWARD,
            ease_penalty: defaults::DEFAULT_EASE_PENALTY,
            minimal_interval_days: defaults::DEFAULT_MINIMAL_INTERVAL_DAYS,
            mastery_interval_days: defaults::DEFAULT_MASTERY_INTERVAL_DAYS,
            mastery_streak: defaults::DEFAULT_MASTERY_STREAK,
            fast_latency_secs: defaults::DEFAULT_FAST_LATENCY_SECS,
        }
    }
}
