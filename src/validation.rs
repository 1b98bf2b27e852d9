//! Submission validation capability injected into the results service.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::test_run::NewTestRun;
use crate::domain::types::TypeConstraintError;
use crate::forms::submission::SubmissionForm;

/// Path reported when the payload as a whole is malformed.
pub const PAYLOAD_PATH: &str = "payload";

/// A rejected submission with the offending field and the reason.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{path}: {reason}")]
pub struct ValidationError {
    pub path: String,
    pub reason: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

impl From<ValidationErrors> for ValidationError {
    /// Keeps the first failing field in name order.
    fn from(errors: ValidationErrors) -> Self {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by(|(a, _), (b, _)| a.cmp(b));

        fields
            .into_iter()
            .find_map(|(field, errs)| {
                errs.first().map(|err| {
                    let reason = err
                        .message
                        .as_ref()
                        .map(ToString::to_string)
                        .unwrap_or_else(|| err.code.to_string());
                    ValidationError::new(field.to_string(), reason)
                })
            })
            .unwrap_or_else(|| ValidationError::new(PAYLOAD_PATH, "invalid payload"))
    }
}

/// Turns a raw submission into a typed test run.
pub trait PayloadValidator: Send + Sync {
    fn validate(&self, raw: &Value) -> Result<NewTestRun, ValidationError>;
}

/// Validator for the test run submission format.
#[derive(Debug, Default, Clone, Copy)]
pub struct SubmissionValidator;

impl PayloadValidator for SubmissionValidator {
    fn validate(&self, raw: &Value) -> Result<NewTestRun, ValidationError> {
        if !raw.is_object() {
            return Err(ValidationError::new(
                PAYLOAD_PATH,
                "payload must be a JSON object",
            ));
        }

        let form = SubmissionForm::deserialize(raw)
            .map_err(|err| ValidationError::new(PAYLOAD_PATH, err.to_string()))?;
        form.validate()?;
        if let Some((index, reason)) = form.invalid_case() {
            return Err(ValidationError::new(format!("results[{index}].name"), reason));
        }

        NewTestRun::try_from(form).map_err(|err| match err {
            TypeConstraintError::EmptyString | TypeConstraintError::TooLong(_) => {
                ValidationError::new("cpid", err.to_string())
            }
            _ => ValidationError::new(PAYLOAD_PATH, err.to_string()),
        })
    }
}
