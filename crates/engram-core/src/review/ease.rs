use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{EASE_MAX, EASE_MIN};

/// Ease factor clamped to [1.3, 2.5]. Multiplier controlling how fast
/// review intervals grow between successful tests.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct EaseFactor(f64);

impl EaseFactor {
    /// Create a new EaseFactor, clamping to [EASE_MIN, EASE_MAX].
    pub fn new(value: f64) -> Self {
        Self(value.clamp(EASE_MIN, EASE_MAX))
    }

    /// Get the raw f64 value.
    pub fn value(self) -> f64 {
        self.0
    }

    /// Reward a fast correct answer: increase by `delta`, clamped.
    pub fn rewarded(self, delta: f64) -> Self {
        Self::new(self.0 + delta)
    }

    /// Penalize an incorrect answer: decrease by `delta`, clamped.
    pub fn penalized(self, delta: f64) -> Self {
        Self::new(self.0 - delta)
    }
}

/// New facts start at the clamp floor and earn ease through fast recalls.
impl Default for EaseFactor {
    fn default() -> Self {
        Self(EASE_MIN)
    }
}

impl fmt::Display for EaseFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl From<f64> for EaseFactor {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl From<EaseFactor> for f64 {
    fn from(e: EaseFactor) -> Self {
        e.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_to_bounds() {
        assert_eq!(EaseFactor::new(0.5).value(), EASE_MIN);
        assert_eq!(EaseFactor::new(9.0).value(), EASE_MAX);
    }

    #[test]
    fn reward_and_penalty_stay_clamped() {
        let e = EaseFactor::new(2.45).rewarded(0.15);
        assert_eq!(e.value(), EASE_MAX);
        let e = EaseFactor::new(1.35).penalized(0.2);
        assert_eq!(e.value(), EASE_MIN);
    }
}
