//! Strongly-typed value objects used by domain entities.
//!
//! These wrappers enforce basic invariants (e.g., well-formed identifiers,
//! trimmed non-empty platform ids) so that once a value reaches the domain
//! layer it can be treated as trusted.
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Maximum accepted length of a cloud platform identifier.
pub const CPID_MAX_LENGTH: usize = 255;

/// Errors produced when attempting to construct a constrained value object.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// Provided string contained no non-whitespace characters.
    #[error("value cannot be empty")]
    EmptyString,
    /// Provided string exceeded the allowed length.
    #[error("value is longer than {0} characters")]
    TooLong(usize),
    /// Provided value failed custom validation.
    #[error("invalid value: {0}")]
    InvalidValue(String),
    /// Provided uuid failed format validation.
    #[error("invalid uuid value")]
    InvalidUuid,
}

/// Unique identifier of a stored test run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TestRunId(Uuid);

impl TestRunId {
    /// Generate a new random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Borrow the underlying uuid.
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for TestRunId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for TestRunId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TestRunId {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(
            Uuid::parse_str(s).map_err(|_| TypeConstraintError::InvalidUuid)?,
        ))
    }
}

impl From<Uuid> for TestRunId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

/// Trimmed, non-empty identifier of the cloud platform under test.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Cpid(String);

impl Cpid {
    /// Trims whitespace and rejects empty or oversized inputs.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let trimmed = value.into().trim().to_string();
        if trimmed.is_empty() {
            return Err(TypeConstraintError::EmptyString);
        }
        if trimmed.chars().count() > CPID_MAX_LENGTH {
            return Err(TypeConstraintError::TooLong(CPID_MAX_LENGTH));
        }
        Ok(Self(trimmed))
    }

    /// Borrow the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper returning the owned string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for Cpid {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for Cpid {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for Cpid {
    type Error = TypeConstraintError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Cpid> for String {
    fn from(value: Cpid) -> Self {
        value.0
    }
}

/// Non-negative run duration in whole seconds.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DurationSeconds(i64);

impl DurationSeconds {
    pub fn new(value: i64) -> Result<Self, TypeConstraintError> {
        if value < 0 {
            return Err(TypeConstraintError::InvalidValue(format!(
                "duration must not be negative, got {value}"
            )));
        }
        Ok(Self(value))
    }

    pub const fn get(self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for DurationSeconds {
    type Error = TypeConstraintError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DurationSeconds> for i64 {
    fn from(value: DurationSeconds) -> Self {
        value.0
    }
}
