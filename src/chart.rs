use serde::{Deserialize, Serialize};

pub const ASSETS_COLOR: &str = "#4caf50";
pub const LIABILITIES_COLOR: &str = "#f44336";
pub const EQUITY_COLOR: &str = "#2196f3";

/// One series of a bar or line chart.
///
/// `data` always has one entry per label of the chart it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartDataset {
    pub label: String,
    pub data: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
    pub background_color: String,
    pub border_color: String,
    pub border_width: u32,
}

impl ChartDataset {
    pub fn new(label: impl Into<String>, data: Vec<f64>, color: &str) -> Self {
        Self {
            label: label.into(),
            data,
            stack: None,
            background_color: color.to_string(),
            border_color: color.to_string(),
            border_width: 1,
        }
    }

    #[must_use]
    pub fn stacked(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }

    #[must_use]
    pub fn with_border_color(mut self, color: impl Into<String>) -> Self {
        self.border_color = color.into();
        self
    }
}

/// Labels plus datasets, the shape every chart consumes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<ChartDataset>,
}

impl ChartData {
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// True when every dataset has exactly one value per label.
    pub fn is_aligned(&self) -> bool {
        aligned(&self.labels, &self.datasets)
    }
}

pub(crate) fn aligned(labels: &[String], datasets: &[ChartDataset]) -> bool {
    datasets.iter().all(|d| d.data.len() == labels.len())
}
