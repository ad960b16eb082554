//! Pure scheduling formulas.

use engram_core::review::{EaseFactor, Strength};

/// Multiplier applied to the recall-evidence increment on a fast answer.
const FAST_BONUS: f64 = 1.25;

/// Evidence added per correct recall before the fast bonus.
const CORRECT_INCREMENT: f64 = 1.0;

/// Fraction of strength retained after an incorrect answer.
const LAPSE_RETENTION: f64 = 0.5;

/// Exponential interval growth: `interval × ease`.
///
/// A fact with no interval yet (still learning) starts at the minimal
/// interval.
pub fn next_interval(current_days: f64, ease: EaseFactor, minimal_days: f64) -> f64 {
    if current_days <= 0.0 {
        minimal_days
    } else {
        current_days * ease.value()
    }
}

/// Strength after a correct recall. Fast answers earn a larger
/// increment; the clamp to [0, cap] lives in `Strength`.
pub fn strengthened(strength: Strength, fast: bool) -> Strength {
    let increment = if fast {
        CORRECT_INCREMENT * FAST_BONUS
    } else {
        CORRECT_INCREMENT
    };
    strength + increment
}

/// Strength after a lapse: halved.
pub fn weakened(strength: Strength) -> Strength {
    strength * LAPSE_RETENTION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_interval_multiplies_by_ease() {
        let ease = EaseFactor::new(1.3);
        let next = next_interval(1.0, ease, 1.0);
        assert!((next - 1.3).abs() < 1e-9);
        let next = next_interval(next, ease, 1.0);
        assert!((next - 1.69).abs() < 1e-9);
    }

    #[test]
    fn zero_interval_starts_at_minimal() {
        let ease = EaseFactor::new(2.0);
        assert_eq!(next_interval(0.0, ease, 1.0), 1.0);
    }

    #[test]
    fn strength_grows_on_correct_and_halves_on_lapse() {
        let s = strengthened(Strength::new(2.0), false);
        assert!((s.value() - 3.0).abs() < 1e-9);
        let s = strengthened(Strength::new(2.0), true);
        assert!((s.value() - 3.25).abs() < 1e-9);
        let s = weakened(Strength::new(4.0));
        assert!((s.value() - 2.0).abs() < 1e-9);
    }
}
