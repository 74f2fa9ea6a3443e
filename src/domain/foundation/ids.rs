//! Strongly-typed identifier value objects.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ValidationError;

/// Username identifying a profile owner.
///
/// Usernames are the primary key of every per-user data source, so they are
/// validated once at the boundary: non-empty after trimming and free of
/// control characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Creates a new Username, returning error if empty or malformed.
    pub fn new(name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::empty_field("username"));
        }
        if trimmed.chars().any(char::is_control) {
            return Err(ValidationError::invalid_format(
                "username",
                "contains control characters",
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Username {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Username {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Username> for String {
    fn from(name: Username) -> Self {
        name.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_accepts_valid_string() {
        let name = Username::new("alice").unwrap();
        assert_eq!(name.as_str(), "alice");
    }

    #[test]
    fn username_trims_whitespace() {
        let name = Username::new("  alice ").unwrap();
        assert_eq!(name.as_str(), "alice");
    }

    #[test]
    fn username_rejects_empty_string() {
        let result = Username::new("   ");
        match result {
            Err(ValidationError::EmptyField { field }) => assert_eq!(field, "username"),
            _ => panic!("Expected EmptyField error"),
        }
    }

    #[test]
    fn username_rejects_control_characters() {
        assert!(Username::new("ali\nce").is_err());
    }

    #[test]
    fn username_deserializes_through_validation() {
        let name: Username = serde_json::from_str("\"bob\"").unwrap();
        assert_eq!(name.as_str(), "bob");

        let err = serde_json::from_str::<Username>("\"\"");
        assert!(err.is_err());
    }

    #[test]
    fn username_displays_correctly() {
        let name = Username::new("carol").unwrap();
        assert_eq!(format!("{}", name), "carol");
    }
}
