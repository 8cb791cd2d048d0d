use crate::backend::types::*;
use crate::error::{ChartDataError, Result};
use crate::payload::SummaryResult;
use log::{debug, info};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tokio::time::sleep;

#[derive(Clone)]
pub struct BackendClient {
    client: Client,
    config: BackendConfig,
}

impl BackendClient {
    pub fn new(config: BackendConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    pub async fn analysis_status(&self) -> Result<AnalysisStatus> {
        let res = self.client.get(self.url("analysis-status")).send().await?;
        read_json(res, "analysis-status").await
    }

    pub async fn summarization_status(&self) -> Result<SummarizationStatus> {
        let res = self.client.get(self.url("summarization-status")).send().await?;
        read_json(res, "summarization-status").await
    }

    /// Asks the backend to summarize every processed document.
    ///
    /// Without a category the backend picks its default summary type.
    pub async fn generate_summary(&self, category: Option<&str>) -> Result<SummaryResult> {
        info!(
            "Requesting summary for category {}",
            category.unwrap_or("<default>")
        );

        let res = self
            .client
            .post(self.url("generate-summary"))
            .json(&SummaryRequest { category })
            .send()
            .await?;

        let summary: SummaryResult = read_json(res, "generate-summary").await?;
        if !summary.success {
            return Err(ChartDataError::Backend(
                summary
                    .error
                    .unwrap_or_else(|| "Summary generation failed".to_string()),
            ));
        }
        Ok(summary)
    }

    /// Polls the analysis status until the backend is ready to summarize.
    pub async fn wait_for_analysis(&self) -> Result<AnalysisStatus> {
        let attempts = self.config.max_poll_attempts;

        for attempt in 1..=attempts {
            let status = self.analysis_status().await?;
            if status.ready_for_summary {
                info!(
                    "Analysis ready after {} attempt(s): {} files",
                    attempt, status.total_files
                );
                return Ok(status);
            }

            debug!(
                "Analysis not ready (attempt {}/{}): {}",
                attempt, attempts, status.message
            );
            if attempt < attempts {
                sleep(self.config.poll_interval).await;
            }
        }

        Err(ChartDataError::PollTimeout { attempts })
    }
}

async fn read_json<T: DeserializeOwned>(res: Response, endpoint: &str) -> Result<T> {
    let status = res.status();
    let body = res.text().await?;

    if !status.is_success() {
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
            .unwrap_or(body);
        return Err(ChartDataError::Backend(format!(
            "{} failed (status {}): {}",
            endpoint, status, message
        )));
    }

    serde_json::from_str(&body)
        .map_err(|e| ChartDataError::Backend(format!("{} returned unexpected JSON: {}", endpoint, e)))
}
