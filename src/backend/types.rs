use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5001";

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_poll_interval() -> Duration {
    Duration::from_secs(2)
}

fn default_max_poll_attempts() -> u32 {
    30
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_poll_interval")]
    pub poll_interval: Duration,
    #[serde(default = "default_max_poll_attempts")]
    pub max_poll_attempts: u32,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            poll_interval: default_poll_interval(),
            max_poll_attempts: default_max_poll_attempts(),
        }
    }
}

impl BackendConfig {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisStatus {
    #[serde(default)]
    pub success: bool,
    #[serde(default, alias = "total_analysis_files")]
    pub total_files: usize,
    #[serde(default)]
    pub analysis_files: Vec<String>,
    #[serde(default)]
    pub ready_for_summary: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummarizationStatus {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub summarization_completed: bool,
    #[serde(default)]
    pub output_directory: String,
    #[serde(default)]
    pub available_summary_types: Vec<String>,
    #[serde(default)]
    pub default_summary_type: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub(crate) struct SummaryRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<&'a str>,
}
