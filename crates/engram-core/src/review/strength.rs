use std::fmt;
use std::ops::{Add, Mul};

use serde::{Deserialize, Serialize};

use crate::constants::STRENGTH_CAP;

/// Memory strength clamped to [0.0, STRENGTH_CAP].
///
/// Accumulated evidence of successful recall. Used to break ties when
/// ordering equally overdue facts (weakest first).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Strength(f64);

impl Strength {
    /// Create a new Strength, clamping to [0.0, STRENGTH_CAP].
    pub fn new(value: f64) -> Self {
        Self(value.clamp(0.0, STRENGTH_CAP))
    }

    /// Get the raw f64 value.
    pub fn value(self) -> f64 {
        self.0
    }
}

impl Default for Strength {
    fn default() -> Self {
        Self(0.0)
    }
}

impl fmt::Display for Strength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl From<f64> for Strength {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl From<Strength> for f64 {
    fn from(s: Strength) -> Self {
        s.0
    }
}

impl Add<f64> for Strength {
    type Output = Self;
    fn add(self, rhs: f64) -> Self {
        Self::new(self.0 + rhs)
    }
}

impl Mul<f64> for Strength {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self {
        Self::new(self.0 * rhs)
    }
}
