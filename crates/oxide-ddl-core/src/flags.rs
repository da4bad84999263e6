//! Boolean flag parsing.
//!
//! Spreadsheet cells encode booleans in many ways (`TRUE`, `1`, `yes`, ...).
//! [`BoolEncoding`] lists the accepted spellings and rejects everything else,
//! so a typo in a flag column never silently becomes `false`.

use serde::{Deserialize, Deserializer};

/// Accepted textual encodings for boolean flags.
///
/// Matching is case-insensitive and ignores surrounding whitespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoolEncoding {
    truthy: Vec<String>,
    falsy: Vec<String>,
}

impl Default for BoolEncoding {
    fn default() -> Self {
        Self::new(["true", "t", "yes", "y", "1"], ["false", "f", "no", "n", "0"])
    }
}

impl BoolEncoding {
    /// Creates an encoding from explicit true and false spellings.
    #[must_use]
    pub fn new<T, F>(truthy: T, falsy: F) -> Self
    where
        T: IntoIterator,
        T::Item: AsRef<str>,
        F: IntoIterator,
        F::Item: AsRef<str>,
    {
        Self {
            truthy: truthy
                .into_iter()
                .map(|s| s.as_ref().trim().to_lowercase())
                .collect(),
            falsy: falsy
                .into_iter()
                .map(|s| s.as_ref().trim().to_lowercase())
                .collect(),
        }
    }

    /// Parses a cell, returning `None` for an unrecognised value.
    #[must_use]
    pub fn parse(&self, value: &str) -> Option<bool> {
        let needle = value.trim().to_lowercase();
        if self.truthy.contains(&needle) {
            Some(true)
        } else if self.falsy.contains(&needle) {
            Some(false)
        } else {
            None
        }
    }
}

/// A flag as it may appear in a JSON record.
#[derive(Deserialize)]
#[serde(untagged)]
enum FlagCell {
    Bool(bool),
    Int(i64),
    Text(String),
}

/// Deserializes a flag from a JSON boolean, `0`/`1`, or a string in the
/// default [`BoolEncoding`].
pub(crate) fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match FlagCell::deserialize(deserializer)? {
        FlagCell::Bool(b) => Ok(b),
        FlagCell::Int(1) => Ok(true),
        FlagCell::Int(0) => Ok(false),
        FlagCell::Int(other) => Err(serde::de::Error::custom(format!(
            "invalid flag value {other}, expected 0 or 1"
        ))),
        FlagCell::Text(text) => BoolEncoding::default().parse(&text).ok_or_else(|| {
            serde::de::Error::custom(format!("invalid flag value '{text}'"))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_encoding() {
        let enc = BoolEncoding::default();
        assert_eq!(enc.parse("TRUE"), Some(true));
        assert_eq!(enc.parse(" yes "), Some(true));
        assert_eq!(enc.parse("1"), Some(true));
        assert_eq!(enc.parse("False"), Some(false));
        assert_eq!(enc.parse("0"), Some(false));
        assert_eq!(enc.parse("N"), Some(false));
    }

    #[test]
    fn test_rejects_unknown() {
        let enc = BoolEncoding::default();
        assert_eq!(enc.parse(""), None);
        assert_eq!(enc.parse("maybe"), None);
        assert_eq!(enc.parse("2"), None);
    }

    #[test]
    fn test_custom_encoding() {
        let enc = BoolEncoding::new(["x"], ["-"]);
        assert_eq!(enc.parse("X"), Some(true));
        assert_eq!(enc.parse("-"), Some(false));
        assert_eq!(enc.parse("true"), None);
    }
}
