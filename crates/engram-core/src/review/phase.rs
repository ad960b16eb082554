use serde::{Deserialize, Serialize};

/// Spaced-repetition lifecycle phase of a fact.
///
/// Transitions (driven by the scheduler):
/// - `New → Learning` on the first test attempt.
/// - `Learning → Review` once the correct streak reaches the configured
///   threshold.
/// - `Review → Mastered` once the interval exceeds the mastery ceiling
///   with the streak requirement met.
/// - any phase `→ Learning` on an incorrect answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewPhase {
    New,
    Learning,
    Review,
    Mastered,
}

impl ReviewPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            ReviewPhase::New => "new",
            ReviewPhase::Learning => "learning",
            ReviewPhase::Review => "review",
            ReviewPhase::Mastered => "mastered",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "new" => Some(ReviewPhase::New),
            "learning" => Some(ReviewPhase::Learning),
            "review" => Some(ReviewPhase::Review),
            "mastered" => Some(ReviewPhase::Mastered),
            _ => None,
        }
    }
}
