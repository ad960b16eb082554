use std::fmt;

use serde::{Deserialize, Serialize};

/// Normalized identifier for a topic, e.g. `mean_vs_median`.
///
/// Normalization lowercases, trims, and collapses runs of whitespace and
/// punctuation into single underscores so that "Mean vs. Median" and
/// "mean vs median" name the same concept.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConceptKey(String);

impl ConceptKey {
    /// Normalize a raw topic string into a concept key.
    pub fn normalize(raw: &str) -> Self {
        let mut key = String::with_capacity(raw.len());
        let mut pending_sep = false;
        for ch in raw.trim().chars() {
            if ch.is_alphanumeric() {
                if pending_sep && !key.is_empty() {
                    key.push('_');
                }
                pending_sep = false;
                key.extend(ch.to_lowercase());
            } else {
                pending_sep = true;
            }
        }
        Self(key)
    }

    /// Wrap an already-normalized key without re-normalizing.
    /// Used when reading back from storage.
    pub fn from_normalized(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ConceptKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ConceptKey {
    fn from(raw: &str) -> Self {
        Self::normalize(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_collapses_punctuation_and_case() {
        assert_eq!(ConceptKey::normalize("Mean vs. Median").as_str(), "mean_vs_median");
        assert_eq!(ConceptKey::normalize("  standard   deviation ").as_str(), "standard_deviation");
        assert_eq!(ConceptKey::normalize("p-value").as_str(), "p_value");
    }

    #[test]
    fn normalization_is_idempotent() {
        let once = ConceptKey::normalize("Central Limit Theorem");
        let twice = ConceptKey::normalize(once.as_str());
        assert_eq!(once, twice);
    }

    #[test]
    fn leading_and_trailing_separators_do_not_emit_underscores() {
        assert_eq!(ConceptKey::normalize("(variance)").as_str(), "variance");
    }

    proptest::proptest! {
        #[test]
        fn normalized_keys_only_contain_lowercase_and_underscores(raw in "[ -~]{0,64}") {
            let key = ConceptKey::normalize(&raw);
            proptest::prop_assert!(key
                .as_str()
                .chars()
                .all(|c| c == '_' || (c.is_alphanumeric() && !c.is_uppercase())));
            proptest::prop_assert!(!key.as_str().starts_with('_'));
            proptest::prop_assert!(!key.as_str().ends_with('_'));
        }

        #[test]
        fn normalization_is_idempotent_for_any_input(raw in "[ -~]{0,64}") {
            let once = ConceptKey::normalize(&raw);
            proptest::prop_assert_eq!(ConceptKey::normalize(once.as_str()), once);
        }
    }
}
