use std::collections::HashMap;
use std::fmt::Display;
use std::sync::Arc;

use serde_json::Value;

use crate::domain::types::TestRunId;
use crate::dto::results::{
    CreatedTestRun, PaginationInfo, SubmissionHeaders, TestRunDetail, TestRunListItem, TestRunPage,
};
use crate::filters::{self, LIST_PARAMS};
use crate::models::config::ResultsSettings;
use crate::pagination::paginate;
use crate::repository::{TestRunListQuery, TestRunReader, TestRunWriter};
use crate::services::{ServiceError, ServiceResult};
use crate::validation::PayloadValidator;

/// Logs an unexpected failure and hides it behind [`ServiceError::Internal`].
fn internal<E: Display>(context: &'static str) -> impl FnOnce(E) -> ServiceError {
    move |err| {
        log::error!("{context}: {err}");
        ServiceError::Internal
    }
}

/// Fetch, submit and list test runs.
pub struct ResultsService {
    settings: ResultsSettings,
    validator: Arc<dyn PayloadValidator>,
}

impl ResultsService {
    pub fn new(settings: ResultsSettings, validator: Arc<dyn PayloadValidator>) -> Self {
        Self {
            settings,
            validator,
        }
    }

    /// Loads a single run with its test case names.
    ///
    /// An identifier that is not a valid run id cannot exist and is reported
    /// as [`ServiceError::NotFound`].
    pub fn fetch_one<R>(&self, repo: &R, raw_id: &str) -> ServiceResult<TestRunDetail>
    where
        R: TestRunReader + ?Sized,
    {
        let id: TestRunId = raw_id.parse().map_err(|_| ServiceError::NotFound)?;

        let run = repo
            .get_test_run(&id)
            .map_err(internal("Failed to load test run"))?
            .ok_or(ServiceError::NotFound)?;

        let results = repo
            .list_test_case_names(&id)
            .map_err(internal("Failed to load test case names"))?;

        Ok(TestRunDetail {
            cpid: run.cpid,
            created_at: run.created_at,
            duration_seconds: run.duration_seconds.get(),
            results,
        })
    }

    /// Validates and stores a submission, returning its id and UI link.
    pub fn create<R>(
        &self,
        repo: &R,
        raw: &Value,
        headers: &SubmissionHeaders,
    ) -> ServiceResult<CreatedTestRun>
    where
        R: TestRunWriter + ?Sized,
    {
        let mut new_run = self.validator.validate(raw)?;

        if let Some(public_key) = headers.public_key.as_deref().filter(|key| !key.is_empty()) {
            new_run = new_run.with_public_key(public_key);
        }

        let test_id = repo
            .create_test_run(&new_run)
            .map_err(internal("Failed to store test run"))?;
        log::debug!("Stored test run {test_id}: {new_run:?}");

        let url = self
            .settings
            .result_url(&test_id)
            .map_err(internal("Failed to build test run url"))?;

        Ok(CreatedTestRun { test_id, url })
    }

    /// Lists runs matching the query parameters, newest first.
    pub fn list<R>(&self, repo: &R, raw: &HashMap<String, String>) -> ServiceResult<TestRunPage>
    where
        R: TestRunReader + ?Sized,
    {
        let filter =
            filters::parse_filters(raw, LIST_PARAMS, self.settings.input_date_format())?;
        let requested_page = filters::parse_page(raw)?;

        let total = repo
            .count_test_runs(&filter)
            .map_err(internal("Failed to count test runs"))?;
        let page = paginate(total, requested_page, self.settings.per_page());

        let summaries = repo
            .list_test_runs(TestRunListQuery::new(filter).paginate(page))
            .map_err(internal("Failed to list test runs"))?;

        let results = summaries
            .into_iter()
            .map(|summary| -> ServiceResult<TestRunListItem> {
                let url = self
                    .settings
                    .result_url(&summary.id)
                    .map_err(internal("Failed to build test run url"))?;
                Ok(TestRunListItem {
                    test_id: summary.id,
                    created_at: summary.created_at,
                    cpid: summary.cpid,
                    url,
                })
            })
            .collect::<ServiceResult<Vec<_>>>()?;

        Ok(TestRunPage {
            results,
            pagination: PaginationInfo {
                current_page: page.page_number,
                total_pages: page.total_pages,
            },
        })
    }
}
