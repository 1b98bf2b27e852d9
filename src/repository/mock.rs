//! Mock repository implementations for isolating services in tests.

use mockall::mock;

use crate::domain::test_run::{NewTestRun, ResultsFilter, TestRun, TestRunSummary};
use crate::domain::types::TestRunId;
use crate::repository::errors::RepositoryResult;
use crate::repository::{TestRunListQuery, TestRunReader, TestRunWriter};

mock! {
    pub Repository {}

    impl TestRunReader for Repository {
        fn get_test_run(&self, id: &TestRunId) -> RepositoryResult<Option<TestRun>>;
        fn list_test_case_names(&self, id: &TestRunId) -> RepositoryResult<Vec<String>>;
        fn count_test_runs(&self, filter: &ResultsFilter) -> RepositoryResult<usize>;
        fn list_test_runs(&self, query: TestRunListQuery) -> RepositoryResult<Vec<TestRunSummary>>;
    }

    impl TestRunWriter for Repository {
        fn create_test_run(&self, new_run: &NewTestRun) -> RepositoryResult<TestRunId>;
    }
}
