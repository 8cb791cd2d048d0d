use crate::schema::{CashFlowRawData, IncomeStatementRawData};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The combined data a results page hands to its charts.
///
/// Every field may be absent; transformers fill only the fields they own.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialData {
    #[serde(default)]
    pub periods: Vec<String>,

    #[serde(default)]
    pub cash_flow_operating: Vec<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cash_inflows: Option<ActivityBreakdown>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cash_outflows: Option<ActivityBreakdown>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub net_income_components: Option<NetIncomeComponents>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profit_before_tax: Option<Vec<f64>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub financial_metrics: Option<BTreeMap<String, FinancialMetric>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend_cash_flow_data: Option<CashFlowRawData>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub income_statement_data: Option<IncomeStatementRawData>,
}

impl FinancialData {
    pub fn has_cash_flow_data(&self) -> bool {
        !self.periods.is_empty()
    }

    /// Fills every field of `self` that is empty from `other`.
    pub fn merge_missing(&mut self, other: FinancialData) {
        if self.periods.is_empty() {
            self.periods = other.periods;
        }
        if self.cash_flow_operating.is_empty() {
            self.cash_flow_operating = other.cash_flow_operating;
        }
        self.cash_inflows = self.cash_inflows.take().or(other.cash_inflows);
        self.cash_outflows = self.cash_outflows.take().or(other.cash_outflows);
        self.net_income_components = self.net_income_components.take().or(other.net_income_components);
        self.profit_before_tax = self.profit_before_tax.take().or(other.profit_before_tax);
        self.financial_metrics = self.financial_metrics.take().or(other.financial_metrics);
        self.backend_cash_flow_data = self.backend_cash_flow_data.take().or(other.backend_cash_flow_data);
        self.income_statement_data = self.income_statement_data.take().or(other.income_statement_data);
    }
}

/// Operating, investing and financing series.
///
/// `None` means the series is absent; `Some(vec![])` is present but empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityBreakdown {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operating_activities: Option<Vec<f64>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub investing_activities: Option<Vec<f64>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub financing_activities: Option<Vec<f64>>,
}

impl ActivityBreakdown {
    pub fn new(operating: Vec<f64>, investing: Vec<f64>, financing: Vec<f64>) -> Self {
        Self {
            operating_activities: Some(operating),
            investing_activities: Some(investing),
            financing_activities: Some(financing),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new(), Vec::new(), Vec::new())
    }

    pub fn has_any_series(&self) -> bool {
        self.operating_activities.is_some()
            || self.investing_activities.is_some()
            || self.financing_activities.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetIncomeComponents {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Number(f64),
    Text(String),
}

/// A headline figure extracted by the backend, e.g. "Total Revenue".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialMetric {
    pub value: Option<MetricValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
}
