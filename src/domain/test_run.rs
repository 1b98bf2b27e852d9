use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{Cpid, DurationSeconds, TestRunId};

/// Metadata key populated from the public-key request header.
pub const PUBLIC_KEY_METADATA_KEY: &str = "public_key";

/// Stored test run as returned by the repository.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TestRun {
    pub id: TestRunId,
    pub cpid: Cpid,
    pub duration_seconds: DurationSeconds,
    pub created_at: NaiveDateTime,
    pub metadata: BTreeMap<String, String>,
}

/// Listing row for a stored test run.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TestRunSummary {
    pub id: TestRunId,
    pub cpid: Cpid,
    pub created_at: NaiveDateTime,
}

impl From<TestRun> for TestRunSummary {
    fn from(run: TestRun) -> Self {
        Self {
            id: run.id,
            cpid: run.cpid,
            created_at: run.created_at,
        }
    }
}

/// A single executed test case in a submission.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewTestCase {
    pub name: String,
    pub uid: Option<String>,
}

impl NewTestCase {
    #[must_use]
    pub fn new(name: impl Into<String>, uid: Option<String>) -> Self {
        Self {
            name: name.into(),
            uid: uid.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()),
        }
    }
}

/// Validated submission ready to be persisted.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct NewTestRun {
    pub cpid: Cpid,
    pub duration_seconds: DurationSeconds,
    pub results: Vec<NewTestCase>,
    pub metadata: BTreeMap<String, String>,
}

impl NewTestRun {
    #[must_use]
    pub fn new(
        cpid: Cpid,
        duration_seconds: DurationSeconds,
        results: Vec<NewTestCase>,
        metadata: Option<BTreeMap<String, String>>,
    ) -> Self {
        Self {
            cpid,
            duration_seconds,
            results,
            metadata: metadata.unwrap_or_default(),
        }
    }

    /// Records the submitter's public key in the run metadata, replacing any
    /// value supplied in the payload itself.
    #[must_use]
    pub fn with_public_key(mut self, public_key: impl Into<String>) -> Self {
        self.metadata
            .insert(PUBLIC_KEY_METADATA_KEY.to_string(), public_key.into());
        self
    }
}

/// Constraints restricting which test runs a listing returns.
///
/// Dates bound `created_at` inclusively; `cpid` is an exact match.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResultsFilter {
    pub start_date: Option<NaiveDateTime>,
    pub end_date: Option<NaiveDateTime>,
    pub cpid: Option<String>,
}

impl ResultsFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cpid(mut self, cpid: impl Into<String>) -> Self {
        self.cpid = Some(cpid.into());
        self
    }

    pub fn start_date(mut self, start_date: NaiveDateTime) -> Self {
        self.start_date = Some(start_date);
        self
    }

    pub fn end_date(mut self, end_date: NaiveDateTime) -> Self {
        self.end_date = Some(end_date);
        self
    }

    /// Returns `true` when the run satisfies every constraint of the filter.
    #[cfg(test)]
    pub fn matches(&self, cpid: &str, created_at: NaiveDateTime) -> bool {
        self.cpid.as_deref().is_none_or(|expected| expected == cpid)
            && self.start_date.is_none_or(|start| created_at >= start)
            && self.end_date.is_none_or(|end| created_at <= end)
    }
}
