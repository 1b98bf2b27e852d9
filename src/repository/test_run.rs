use chrono::Utc;
use diesel::prelude::*;
use diesel::sqlite::Sqlite;

use crate::domain::test_run::{NewTestRun, ResultsFilter, TestRun, TestRunSummary};
use crate::domain::types::TestRunId;
use crate::models::test_run::{
    NewTestCase as DbNewTestCase, NewTestRun as DbNewTestRun, TestRun as DbTestRun, TestRunMeta,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, TestRunListQuery, TestRunReader, TestRunWriter};
use crate::schema::{test_cases, test_run_meta, test_runs};

fn filtered(filter: &ResultsFilter) -> test_runs::BoxedQuery<'_, Sqlite> {
    let mut query = test_runs::table.into_boxed::<Sqlite>();

    if let Some(cpid) = &filter.cpid {
        query = query.filter(test_runs::cpid.eq(cpid.as_str()));
    }
    if let Some(start_date) = filter.start_date {
        query = query.filter(test_runs::created_at.ge(start_date));
    }
    if let Some(end_date) = filter.end_date {
        query = query.filter(test_runs::created_at.le(end_date));
    }
    query
}

impl TestRunReader for DieselRepository {
    fn get_test_run(&self, id: &TestRunId) -> RepositoryResult<Option<TestRun>> {
        let mut conn = self.conn()?;
        let key = id.to_string();

        let Some(run) = test_runs::table
            .find(key.as_str())
            .first::<DbTestRun>(&mut conn)
            .optional()?
        else {
            return Ok(None);
        };

        let meta = test_run_meta::table
            .filter(test_run_meta::test_run_id.eq(key.as_str()))
            .order(test_run_meta::meta_key.asc())
            .load::<TestRunMeta>(&mut conn)?;

        Ok(Some(run.into_domain(meta)?))
    }

    fn list_test_case_names(&self, id: &TestRunId) -> RepositoryResult<Vec<String>> {
        let mut conn = self.conn()?;

        let names = test_cases::table
            .filter(test_cases::test_run_id.eq(id.to_string()))
            .order(test_cases::id.asc())
            .select(test_cases::name)
            .load::<String>(&mut conn)?;

        Ok(names)
    }

    fn count_test_runs(&self, filter: &ResultsFilter) -> RepositoryResult<usize> {
        let mut conn = self.conn()?;

        let total = filtered(filter).count().get_result::<i64>(&mut conn)?;

        usize::try_from(total)
            .map_err(|_| RepositoryError::Unexpected(format!("negative row count {total}")))
    }

    fn list_test_runs(&self, query: TestRunListQuery) -> RepositoryResult<Vec<TestRunSummary>> {
        let mut conn = self.conn()?;

        let mut items = filtered(&query.filter)
            .order((test_runs::created_at.desc(), test_runs::id.desc()));

        if let Some(page) = &query.page {
            items = items.offset(page.offset() as i64).limit(page.limit() as i64);
        }

        items
            .load::<DbTestRun>(&mut conn)?
            .into_iter()
            .map(|run| TestRunSummary::try_from(run).map_err(RepositoryError::from))
            .collect()
    }
}

impl TestRunWriter for DieselRepository {
    fn create_test_run(&self, new_run: &NewTestRun) -> RepositoryResult<TestRunId> {
        let mut conn = self.conn()?;
        let id = TestRunId::new();
        let key = id.to_string();

        conn.transaction::<_, RepositoryError, _>(|conn| {
            diesel::insert_into(test_runs::table)
                .values(&DbNewTestRun {
                    id: key.clone(),
                    cpid: new_run.cpid.as_str(),
                    duration_seconds: new_run.duration_seconds.get(),
                    created_at: Utc::now().naive_utc(),
                })
                .execute(conn)?;

            let cases: Vec<DbNewTestCase> = new_run
                .results
                .iter()
                .map(|case| DbNewTestCase::from_domain(&key, case))
                .collect();
            if !cases.is_empty() {
                diesel::insert_into(test_cases::table)
                    .values(&cases)
                    .execute(conn)?;
            }

            let meta: Vec<TestRunMeta> = new_run
                .metadata
                .iter()
                .map(|(meta_key, value)| TestRunMeta {
                    test_run_id: key.clone(),
                    meta_key: meta_key.clone(),
                    value: value.clone(),
                })
                .collect();
            if !meta.is_empty() {
                diesel::insert_into(test_run_meta::table)
                    .values(&meta)
                    .execute(conn)?;
            }

            Ok(())
        })?;

        Ok(id)
    }
}
