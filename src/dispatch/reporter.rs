//! Client for the downstream medicine API.

use reqwest::{Client, StatusCode};
use thiserror::Error;

use crate::config::DownstreamConfig;
use crate::dose::DoseReport;

/// Errors raised while talking to the downstream API.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to build downstream client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("PUT {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Sends dose reports to `{base_url}/api/medicines/{id}/update_dose/`.
#[derive(Debug, Clone)]
pub struct DoseReporter {
    client: Client,
    base_url: String,
}

impl DoseReporter {
    pub fn new(config: &DownstreamConfig) -> Result<Self, ReportError> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(ReportError::Client)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// URL of the update endpoint for a medicine.
    pub fn update_dose_url(&self, medicine_id: i64) -> String {
        format!("{}/api/medicines/{}/update_dose/", self.base_url, medicine_id)
    }

    /// PUT the report and return the downstream status.
    ///
    /// The response body is dropped unread.
    pub async fn report(&self, medicine_id: i64, report: &DoseReport) -> Result<StatusCode, ReportError> {
        let url = self.update_dose_url(medicine_id);

        let response = self
            .client
            .put(&url)
            .json(report)
            .send()
            .await
            .map_err(|source| ReportError::Transport { url, source })?;

        Ok(response.status())
    }
}
