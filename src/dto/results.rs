//! Response envelopes of the results endpoints.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{Cpid, TestRunId};

/// Transport data accompanying a submission.
#[derive(Debug, Default, Clone)]
pub struct SubmissionHeaders {
    /// Value of the public-key header, when sent.
    pub public_key: Option<String>,
}

impl SubmissionHeaders {
    pub fn with_public_key(public_key: impl Into<String>) -> Self {
        Self {
            public_key: Some(public_key.into()),
        }
    }
}

/// Single test run with the names of its executed test cases.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TestRunDetail {
    pub cpid: Cpid,
    pub created_at: NaiveDateTime,
    pub duration_seconds: i64,
    pub results: Vec<String>,
}

/// Identifier and UI link of a newly stored run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreatedTestRun {
    pub test_id: TestRunId,
    pub url: String,
}

/// Row of a results listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TestRunListItem {
    pub test_id: TestRunId,
    pub created_at: NaiveDateTime,
    pub cpid: Cpid,
    pub url: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaginationInfo {
    pub current_page: usize,
    pub total_pages: usize,
}

/// One page of a results listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TestRunPage {
    pub results: Vec<TestRunListItem>,
    pub pagination: PaginationInfo,
}
