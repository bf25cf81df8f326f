//! Core type definitions with validation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Sheet that is current on a fresh database and after the current sheet is killed.
pub const DEFAULT_SHEET: &str = "default";

/// Validation errors for core types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The provided value was empty.
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },
}

/// A validated timesheet name.
///
/// Sheet names must be non-blank. A name does not have to refer to a sheet
/// with entries: sheets come into being lazily with their first clock-in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SheetName(String);

impl SheetName {
    /// Creates a new sheet name after validation.
    pub fn new(name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::Empty {
                field: "timesheet name",
            });
        }
        Ok(Self(name))
    }

    /// Returns the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SheetName {
    fn default() -> Self {
        Self(DEFAULT_SHEET.to_string())
    }
}

impl TryFrom<String> for SheetName {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl FromStr for SheetName {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl From<SheetName> for String {
    fn from(name: SheetName) -> Self {
        name.0
    }
}

impl fmt::Display for SheetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for SheetName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sheet_name_accepts_any_non_blank_text() {
        let name = SheetName::new("client work").unwrap();
        assert_eq!(name.as_str(), "client work");
        assert_eq!(name.to_string(), "client work");
    }

    #[test]
    fn sheet_name_rejects_blank_text() {
        let err = SheetName::new("   ").unwrap_err();
        assert_eq!(err.to_string(), "timesheet name cannot be empty");
        assert!("".parse::<SheetName>().is_err());
    }

    #[test]
    fn default_sheet_name() {
        assert_eq!(SheetName::default().as_str(), DEFAULT_SHEET);
    }

    #[test]
    fn sheet_name_deserialization_validates() {
        let name: SheetName = serde_json::from_str(r#""work""#).unwrap();
        assert_eq!(name.as_str(), "work");
        assert!(serde_json::from_str::<SheetName>(r#""""#).is_err());
    }
}
