//! Configuration model loaded from external sources.

use std::num::NonZeroUsize;

use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::domain::types::TestRunId;

/// Placeholder substituted with the test run id in [`ServerConfig::test_results_url`].
pub const TEST_RUN_ID_SLOT: &str = "{id}";

/// Date format accepted by listing filters unless configured otherwise.
pub const DEFAULT_INPUT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn default_input_date_format() -> String {
    DEFAULT_INPUT_DATE_FORMAT.to_string()
}

#[derive(Clone, Debug, Deserialize)]
/// Basic configuration shared across handlers.
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
    pub database_url: String,
    /// Base URL of the results UI used to build result links.
    pub ui_url: String,
    /// Link template containing a single `{id}` slot.
    pub test_results_url: String,
    pub results_per_page: usize,
    #[serde(default = "default_input_date_format")]
    pub input_date_format: String,
}

/// Errors raised when the loaded configuration cannot drive the results service.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("invalid ui_url `{0}`: {1}")]
    InvalidUiUrl(String, url::ParseError),
    #[error("test_results_url `{0}` must contain exactly one `{{id}}` slot")]
    InvalidTemplate(String),
    #[error("results_per_page must be greater than zero")]
    ZeroPageSize,
}

/// Validated, read-only settings consumed by [`crate::services::results::ResultsService`].
#[derive(Clone, Debug)]
pub struct ResultsSettings {
    ui_url: Url,
    test_results_url: String,
    per_page: NonZeroUsize,
    input_date_format: String,
}

impl ResultsSettings {
    pub fn new(
        ui_url: &str,
        test_results_url: &str,
        per_page: usize,
        input_date_format: &str,
    ) -> Result<Self, SettingsError> {
        // A missing trailing slash would make relative templates replace the
        // last path segment of the UI url instead of extending it.
        let base = if ui_url.ends_with('/') {
            ui_url.to_string()
        } else {
            format!("{ui_url}/")
        };
        let ui_url = Url::parse(&base)
            .map_err(|err| SettingsError::InvalidUiUrl(ui_url.to_string(), err))?;

        if test_results_url.matches(TEST_RUN_ID_SLOT).count() != 1 {
            return Err(SettingsError::InvalidTemplate(test_results_url.to_string()));
        }

        let per_page = NonZeroUsize::new(per_page).ok_or(SettingsError::ZeroPageSize)?;

        Ok(Self {
            ui_url,
            test_results_url: test_results_url.to_string(),
            per_page,
            input_date_format: input_date_format.to_string(),
        })
    }

    pub fn per_page(&self) -> NonZeroUsize {
        self.per_page
    }

    pub fn input_date_format(&self) -> &str {
        &self.input_date_format
    }

    /// Builds the UI link of a test run from the configured template.
    pub fn result_url(&self, id: &TestRunId) -> Result<String, url::ParseError> {
        let path = self
            .test_results_url
            .replace(TEST_RUN_ID_SLOT, &id.to_string());
        Ok(self.ui_url.join(&path)?.to_string())
    }
}

impl TryFrom<&ServerConfig> for ResultsSettings {
    type Error = SettingsError;

    fn try_from(config: &ServerConfig) -> Result<Self, Self::Error> {
        Self::new(
            &config.ui_url,
            &config.test_results_url,
            config.results_per_page,
            &config.input_date_format,
        )
    }
}
