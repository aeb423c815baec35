use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Maps a closed set of string classes onto `0..len`, in sorted order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    pub fn fit<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let classes: BTreeSet<String> = values.into_iter().map(Into::into).collect();
        Self {
            classes: classes.into_iter().collect(),
        }
    }

    /// Like `fit`, but `sentinel` is always part of the vocabulary.
    pub fn fit_with_sentinel<I, S>(values: I, sentinel: &str) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::fit(
            values
                .into_iter()
                .map(Into::into)
                .chain(std::iter::once(sentinel.to_string())),
        )
    }

    pub fn encode(&self, value: &str) -> Option<usize> {
        self.classes
            .binary_search_by(|c| c.as_str().cmp(value))
            .ok()
    }

    pub fn decode(&self, code: usize) -> Option<&str> {
        self.classes.get(code).map(String::as_str)
    }

    pub fn contains(&self, value: &str) -> bool {
        self.encode(value).is_some()
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classes_are_sorted_and_unique() {
        let enc = LabelEncoder::fit(["b", "a", "b", "c"]);
        assert_eq!(enc.classes(), &["a", "b", "c"]);
        assert_eq!(enc.encode("b"), Some(1));
        assert_eq!(enc.decode(2), Some("c"));
        assert_eq!(enc.encode("z"), None);
    }

    #[test]
    fn test_sentinel_is_always_present() {
        let enc = LabelEncoder::fit_with_sentinel(["Remote"], "Unknown");
        assert!(enc.contains("Unknown"));
        assert_eq!(enc.len(), 2);

        let enc = LabelEncoder::fit_with_sentinel(["Unknown", "Remote"], "Unknown");
        assert_eq!(enc.len(), 2);
    }
}
