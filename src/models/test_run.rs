//! Diesel models for stored test runs, their test cases and metadata.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::test_run::{
    NewTestCase as DomainNewTestCase, TestRun as DomainTestRun,
    TestRunSummary as DomainTestRunSummary,
};
use crate::domain::types::{Cpid, DurationSeconds, TypeConstraintError};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::test_runs)]
/// Diesel model for [`crate::domain::test_run::TestRun`].
pub struct TestRun {
    pub id: String,
    pub cpid: String,
    pub duration_seconds: i64,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::test_runs)]
/// Insertable form of [`TestRun`].
pub struct NewTestRun<'a> {
    pub id: String,
    pub cpid: &'a str,
    pub duration_seconds: i64,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::test_cases)]
pub struct NewTestCase<'a> {
    pub test_run_id: &'a str,
    pub name: &'a str,
    pub uid: Option<&'a str>,
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = crate::schema::test_run_meta)]
pub struct TestRunMeta {
    pub test_run_id: String,
    pub meta_key: String,
    pub value: String,
}

impl<'a> NewTestCase<'a> {
    pub fn from_domain(test_run_id: &'a str, case: &'a DomainNewTestCase) -> Self {
        Self {
            test_run_id,
            name: case.name.as_str(),
            uid: case.uid.as_deref(),
        }
    }
}

impl TestRun {
    /// Combines the row with its metadata rows into the domain entity.
    pub fn into_domain(self, meta: Vec<TestRunMeta>) -> Result<DomainTestRun, TypeConstraintError> {
        let metadata: BTreeMap<String, String> = meta
            .into_iter()
            .map(|row| (row.meta_key, row.value))
            .collect();

        Ok(DomainTestRun {
            id: self.id.parse()?,
            cpid: Cpid::new(self.cpid)?,
            duration_seconds: DurationSeconds::new(self.duration_seconds)?,
            created_at: self.created_at,
            metadata,
        })
    }
}

impl TryFrom<TestRun> for DomainTestRunSummary {
    type Error = TypeConstraintError;

    fn try_from(run: TestRun) -> Result<Self, Self::Error> {
        Ok(Self {
            id: run.id.parse()?,
            cpid: Cpid::new(run.cpid)?,
            created_at: run.created_at,
        })
    }
}
