use std::collections::BTreeMap;

use serde::Deserialize;
use validator::Validate;

use crate::domain::test_run::{NewTestCase, NewTestRun};
use crate::domain::types::{Cpid, DurationSeconds, TypeConstraintError};

#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
/// Test run payload submitted by a cloud operator.
pub struct SubmissionForm {
    /// Identifier of the cloud platform under test.
    #[validate(length(min = 1, max = 255, message = "cpid must be 1 to 255 characters"))]
    pub cpid: String,
    /// Wall-clock duration of the run.
    #[validate(range(min = 0, message = "duration_seconds must not be negative"))]
    pub duration_seconds: i64,
    /// Executed test cases in run order. Names are checked by
    /// [`SubmissionForm::invalid_case`].
    pub results: Vec<SubmittedTestCase>,
    /// Free-form operator metadata.
    #[serde(default)]
    pub metadata: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
/// A test case given either by name or as an object with an optional uid.
pub enum SubmittedTestCase {
    Name(String),
    Detailed {
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        uid: Option<String>,
    },
}

impl SubmittedTestCase {
    pub fn name(&self) -> Option<&str> {
        match self {
            SubmittedTestCase::Name(name) => Some(name.as_str()),
            SubmittedTestCase::Detailed { name, .. } => name.as_deref(),
        }
    }
}

impl SubmissionForm {
    /// Index of the first test case without a usable name, with the reason.
    pub fn invalid_case(&self) -> Option<(usize, &'static str)> {
        self.results
            .iter()
            .enumerate()
            .find_map(|(index, case)| match case.name() {
                None => Some((index, "test case name is required")),
                Some(name) if name.trim().is_empty() => {
                    Some((index, "test case name cannot be empty"))
                }
                Some(_) => None,
            })
    }
}

impl TryFrom<SubmissionForm> for NewTestRun {
    type Error = TypeConstraintError;

    fn try_from(form: SubmissionForm) -> Result<Self, Self::Error> {
        let results = form
            .results
            .into_iter()
            .map(|case| match case {
                SubmittedTestCase::Name(name) => NewTestCase::new(name.trim(), None),
                SubmittedTestCase::Detailed { name, uid } => {
                    NewTestCase::new(name.unwrap_or_default().trim(), uid)
                }
            })
            .collect();

        Ok(NewTestRun::new(
            Cpid::new(form.cpid)?,
            DurationSeconds::new(form.duration_seconds)?,
            results,
            form.metadata,
        ))
    }
}
