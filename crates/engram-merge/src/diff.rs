//! Human-readable diff summaries for update classifications, built from
//! a sentence-level comparison (no collaborator round-trip).

use serde::{Deserialize, Serialize};

/// Why the candidate supersedes the stored fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffKind {
    /// The candidate contradicts the stored fact.
    Contradiction,
    /// The candidate adds or reworks information without contradicting.
    Refinement,
}

/// Audit record attached to an `Update` classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffSummary {
    pub kind: DiffKind,
    pub summary: String,
}

impl DiffSummary {
    /// Build a summary of what the candidate adds and what it drops,
    /// at sentence granularity.
    pub fn build(kind: DiffKind, stored: &str, candidate: &str) -> Self {
        let stored_sentences = split_sentences(stored);
        let candidate_sentences = split_sentences(candidate);

        let added: Vec<&String> = candidate_sentences
            .iter()
            .filter(|s| !stored_sentences.contains(s))
            .collect();
        let removed: Vec<&String> = stored_sentences
            .iter()
            .filter(|s| !candidate_sentences.contains(s))
            .collect();

        let mut parts = Vec::new();
        if !added.is_empty() {
            parts.push(format!(
                "adds: {}",
                added.iter().map(|s| s.as_str()).collect::<Vec<_>>().join(" ")
            ));
        }
        if !removed.is_empty() {
            parts.push(format!(
                "drops: {}",
                removed
                    .iter()
                    .map(|s| s.as_str())
                    .collect::<Vec<_>>()
                    .join(" ")
            ));
        }
        let summary = if parts.is_empty() {
            "rewording only".to_string()
        } else {
            parts.join("; ")
        };

        Self { kind, summary }
    }
}

/// Split text into sentences using punctuation boundaries.
pub fn split_sentences(text: &str) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }

    let mut sentences = Vec::new();
    let mut current = String::new();
    let chars: Vec<char> = text.chars().collect();
    let len = chars.len();

    for i in 0..len {
        current.push(chars[i]);

        let is_terminal = matches!(chars[i], '.' | '!' | '?');
        if !is_terminal {
            continue;
        }

        // A real boundary needs whitespace or end-of-string after it.
        let at_end = i + 1 >= len;
        let next_is_space = !at_end && chars[i + 1].is_whitespace();

        if at_end || next_is_space {
            let trimmed = current.trim().to_string();
            if trimmed.len() > 2 {
                sentences.push(trimmed);
            }
            current.clear();
        }
    }

    let trimmed = current.trim().to_string();
    if trimmed.len() > 2 {
        sentences.push(trimmed);
    }

    sentences
}
