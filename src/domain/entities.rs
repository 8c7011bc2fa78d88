//! Domain entities: glyph identifiers

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::error::{DomainError, DomainResult};

/// Glyph name token. Case-sensitive, non-empty, never contains whitespace.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identifier(String);

impl Identifier {
    pub fn new(value: impl Into<String>) -> DomainResult<Self> {
        let value = value.into();
        if value.is_empty() || value.chars().any(char::is_whitespace) {
            return Err(DomainError::InvalidIdentifier(value));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Splits literal glyph text into identifiers.
    ///
    /// Empty fragments (doubled separators, surrounding blanks) are dropped:
    /// `"b1  b2 "` with separator `" "` → `[b1, b2]`.
    pub fn parse_sequence(text: &str, separator: &str) -> DomainResult<Vec<Self>> {
        text.split(separator)
            .map(str::trim)
            .filter(|fragment| !fragment.is_empty())
            .map(Self::new)
            .collect()
    }
}

impl TryFrom<String> for Identifier {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for Identifier {
    type Error = DomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Identifier> for String {
    fn from(value: Identifier) -> Self {
        value.0
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Identifier {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_blank_or_spaced_token_when_creating_then_rejects() {
        assert!(Identifier::new("").is_err());
        assert!(Identifier::new("a b").is_err());
        assert!(Identifier::new("A.sc").is_ok());
    }

    #[test]
    fn given_text_with_doubled_separators_when_parsing_then_drops_empty_fragments() {
        let ids = Identifier::parse_sequence(" b1  b2 ", " ").unwrap();
        let names: Vec<&str> = ids.iter().map(Identifier::as_str).collect();
        assert_eq!(names, vec!["b1", "b2"]);
    }

    #[test]
    fn given_identifiers_when_comparing_then_case_sensitive() {
        assert_ne!(Identifier::new("a").unwrap(), Identifier::new("A").unwrap());
        assert!(Identifier::new("A").unwrap() < Identifier::new("a").unwrap());
    }
}
