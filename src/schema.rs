use crate::period::{PeriodOrdering, UnknownPeriodPolicy, YtdPlacement};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Year label (e.g. "2023") to period key (e.g. "Q4", "Q4_YTD") to metric record.
pub type YearlyData<M> = BTreeMap<String, BTreeMap<String, M>>;

pub type BalanceSheetRawData = YearlyData<BalanceSheetMetrics>;
pub type CashFlowRawData = YearlyData<CashFlowMetrics>;
pub type IncomeStatementRawData = YearlyData<IncomeStatementMetrics>;

/// A fixed set of nullable metrics reported for one period.
///
/// `None` means the figure was not reported, which is distinct from zero.
pub trait MetricRecord {
    fn values(&self) -> Vec<Option<f64>>;

    fn has_data(&self) -> bool {
        self.values().iter().any(Option::is_some)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BalanceSheetMetrics {
    #[serde(rename = "Total_Assets", default)]
    #[schemars(description = "Total assets at the end of the period, or null when not reported")]
    pub total_assets: Option<f64>,

    #[serde(rename = "Total_Liabilities", default)]
    #[schemars(description = "Total liabilities at the end of the period, or null when not reported")]
    pub total_liabilities: Option<f64>,

    #[serde(rename = "Total_Equity", default)]
    #[schemars(description = "Total equity at the end of the period, or null when not reported")]
    pub total_equity: Option<f64>,
}

impl MetricRecord for BalanceSheetMetrics {
    fn values(&self) -> Vec<Option<f64>> {
        vec![self.total_assets, self.total_liabilities, self.total_equity]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CashFlowMetrics {
    #[serde(rename = "Net_Operation", default)]
    #[schemars(description = "Net cash from operating activities")]
    pub net_operation: Option<f64>,

    #[serde(rename = "Net_Investing", default)]
    #[schemars(description = "Net cash from investing activities")]
    pub net_investing: Option<f64>,

    #[serde(rename = "Net_Financing", default)]
    #[schemars(description = "Net cash from financing activities")]
    pub net_financing: Option<f64>,

    #[serde(rename = "Profit_Before_Tax", default)]
    #[schemars(description = "Profit before tax reported alongside the cash flow statement")]
    pub profit_before_tax: Option<f64>,
}

impl MetricRecord for CashFlowMetrics {
    fn values(&self) -> Vec<Option<f64>> {
        vec![
            self.net_operation,
            self.net_investing,
            self.net_financing,
            self.profit_before_tax,
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct IncomeStatementMetrics {
    #[serde(rename = "Total_Income", default)]
    pub total_income: Option<f64>,

    #[serde(rename = "Total_Expenses", default)]
    pub total_expenses: Option<f64>,

    #[serde(rename = "Gross_Profit", default)]
    pub gross_profit: Option<f64>,

    #[serde(rename = "Profit_Before_Tax", default)]
    pub profit_before_tax: Option<f64>,

    #[serde(rename = "Profit_After_Tax", default)]
    pub profit_after_tax: Option<f64>,
}

impl MetricRecord for IncomeStatementMetrics {
    fn values(&self) -> Vec<Option<f64>> {
        vec![
            self.total_income,
            self.total_expenses,
            self.gross_profit,
            self.profit_before_tax,
            self.profit_after_tax,
        ]
    }
}

/// Settings shared by every transformer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TransformOptions {
    #[serde(default)]
    #[schemars(description = "Placement of periods whose quarter key or year cannot be parsed")]
    pub unknown_periods: UnknownPeriodPolicy,

    #[serde(default)]
    #[schemars(description = "Placement of Qn_YTD periods relative to standalone quarters")]
    pub ytd_placement: YtdPlacement,
}

impl TransformOptions {
    pub const fn ordering(&self) -> PeriodOrdering {
        PeriodOrdering::new(self.unknown_periods, self.ytd_placement)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// JSON Schemas of the three backend payload shapes, keyed by document type.
pub fn payload_json_schemas() -> BTreeMap<&'static str, schemars::schema::RootSchema> {
    let mut schemas = BTreeMap::new();
    schemas.insert("balance-sheet", schemars::schema_for!(BalanceSheetRawData));
    schemas.insert("cash-flow", schemars::schema_for!(CashFlowRawData));
    schemas.insert("income-statement", schemars::schema_for!(IncomeStatementRawData));
    schemas
}

pub fn schema_as_json<T: JsonSchema>() -> Result<String, serde_json::Error> {
    let schema = schemars::schema_for!(T);
    serde_json::to_string_pretty(&schema)
}
