use crate::db::DbPool;
use crate::domain::test_run::{NewTestRun, ResultsFilter, TestRun, TestRunSummary};
use crate::domain::types::TestRunId;
use crate::pagination::Page;
use crate::repository::errors::RepositoryResult;

pub mod errors;
#[cfg(any(test, feature = "test-mocks"))]
pub mod mock;
pub mod test_run;

/// Listing request combining a filter with an optional page window.
#[derive(Debug, Clone, Default)]
pub struct TestRunListQuery {
    pub filter: ResultsFilter,
    pub page: Option<Page>,
}

impl TestRunListQuery {
    pub fn new(filter: ResultsFilter) -> Self {
        Self { filter, page: None }
    }

    pub fn paginate(mut self, page: Page) -> Self {
        self.page = Some(page);
        self
    }
}

/// Read access to stored test runs.
pub trait TestRunReader {
    fn get_test_run(&self, id: &TestRunId) -> RepositoryResult<Option<TestRun>>;
    /// Names of the test cases recorded under the run, in submission order.
    fn list_test_case_names(&self, id: &TestRunId) -> RepositoryResult<Vec<String>>;
    fn count_test_runs(&self, filter: &ResultsFilter) -> RepositoryResult<usize>;
    /// Runs matching the query, newest first with ties broken by id descending.
    fn list_test_runs(&self, query: TestRunListQuery) -> RepositoryResult<Vec<TestRunSummary>>;
}

/// Write access to stored test runs.
pub trait TestRunWriter {
    /// Persists the run atomically and returns its newly assigned identifier.
    fn create_test_run(&self, new_run: &NewTestRun) -> RepositoryResult<TestRunId>;
}

/// Diesel-backed repository shared by all handlers.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool,
}

impl DieselRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<crate::db::DbConnection> {
        Ok(self.pool.get()?)
    }
}
