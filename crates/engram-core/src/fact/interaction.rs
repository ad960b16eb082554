use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who produced an utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Tutor,
    Learner,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Tutor => "tutor",
            Role::Learner => "learner",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "tutor" => Some(Role::Tutor),
            "learner" => Some(Role::Learner),
            _ => None,
        }
    }
}

/// One utterance in the tutoring transcript. The interaction log is
/// append-only; rows are never mutated after insertion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    pub timestamp: DateTime<Utc>,
    pub role: Role,
    pub text: String,
    /// IDs of facts derived from this utterance, filled in after the
    /// dedup/merge engine has run.
    pub derived_fact_ids: Vec<String>,
}

impl Interaction {
    pub fn new(role: Role, text: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            role,
            text: text.into(),
            derived_fact_ids: Vec::new(),
        }
    }
}
