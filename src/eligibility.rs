use crate::error::{ChartDataError, Result};
use crate::financial_data::FinancialData;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentType {
    BalanceSheet,
    CashFlow,
    IncomeStatement,
}

impl DocumentType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BalanceSheet => "balance-sheet",
            Self::CashFlow => "cash-flow",
            Self::IncomeStatement => "income-statement",
        }
    }

    /// Charts offered for this document type, in display order.
    pub const fn charts(self) -> &'static [ChartType] {
        match self {
            Self::BalanceSheet => &[
                ChartType::FinancialMetrics,
                ChartType::AssetAllocation,
                ChartType::LiabilityBreakdown,
                ChartType::BalanceSheetComparison,
            ],
            Self::CashFlow => &[ChartType::CashFlowTrend],
            Self::IncomeStatement => &[
                ChartType::IncomeBreakdown,
                ChartType::ProfitMargins,
                ChartType::ExpenseAnalysis,
                ChartType::FinancialMetrics,
            ],
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentType {
    type Err = ChartDataError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "balance-sheet" | "balance_sheet" => Ok(Self::BalanceSheet),
            "cash-flow" | "cash_flow" | "cashflow" => Ok(Self::CashFlow),
            "income-statement" | "income_statement" => Ok(Self::IncomeStatement),
            other => Err(ChartDataError::UnknownDocumentType(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChartType {
    FinancialMetrics,
    CashFlowTrend,
    CashFlowComponents,
    IncomeBreakdown,
    AssetAllocation,
    LiabilityBreakdown,
    BalanceSheetComparison,
    ProfitMargins,
    ExpenseAnalysis,
}

/// A field of [`FinancialData`] a chart can require.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DataField {
    Periods,
    CashFlowOperating,
    CashInflows,
    CashOutflows,
    NetIncomeComponents,
    ProfitBeforeTax,
    FinancialMetrics,
    IncomeStatementData,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartConfig {
    pub id: ChartType,
    pub label: &'static str,
    pub description: &'static str,
    pub required_data_fields: &'static [DataField],
}

impl ChartType {
    pub const fn config(self) -> ChartConfig {
        match self {
            Self::FinancialMetrics => chart(
                self,
                "Financial Metrics",
                "Key financial metrics and ratios",
                &[DataField::FinancialMetrics],
            ),
            Self::CashFlowTrend => chart(
                self,
                "Cash Flow Trend",
                "Cash flow trends over time",
                &[DataField::Periods, DataField::CashFlowOperating],
            ),
            Self::CashFlowComponents => chart(
                self,
                "Cash Flow Components",
                "Breakdown of cash flow by activities",
                &[DataField::CashInflows, DataField::CashOutflows],
            ),
            Self::IncomeBreakdown => chart(
                self,
                "Income Breakdown",
                "Income statement component analysis",
                &[DataField::IncomeStatementData],
            ),
            Self::AssetAllocation => chart(
                self,
                "Asset Allocation",
                "Distribution of assets by category",
                &[DataField::FinancialMetrics],
            ),
            Self::LiabilityBreakdown => chart(
                self,
                "Liability Breakdown",
                "Analysis of liabilities by type",
                &[DataField::FinancialMetrics],
            ),
            Self::BalanceSheetComparison => chart(
                self,
                "Balance Sheet Comparison",
                "Period-over-period balance sheet comparison",
                &[DataField::FinancialMetrics, DataField::Periods],
            ),
            Self::ProfitMargins => chart(
                self,
                "Profit Margins",
                "Profit margin analysis and trends",
                &[DataField::IncomeStatementData, DataField::FinancialMetrics],
            ),
            Self::ExpenseAnalysis => chart(
                self,
                "Expense Analysis",
                "Operating expense breakdown and trends",
                &[DataField::IncomeStatementData],
            ),
        }
    }
}

const fn chart(
    id: ChartType,
    label: &'static str,
    description: &'static str,
    required_data_fields: &'static [DataField],
) -> ChartConfig {
    ChartConfig {
        id,
        label,
        description,
        required_data_fields,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartTab {
    pub id: usize,
    pub chart_type: ChartType,
    pub label: String,
    pub disabled: bool,
}

impl FinancialData {
    /// Whether `field` is present and non-empty.
    pub fn has_field(&self, field: DataField) -> bool {
        match field {
            DataField::Periods => !self.periods.is_empty(),
            DataField::CashFlowOperating => !self.cash_flow_operating.is_empty(),
            DataField::CashInflows => self.cash_inflows.as_ref().is_some_and(|c| c.has_any_series()),
            DataField::CashOutflows => self.cash_outflows.as_ref().is_some_and(|c| c.has_any_series()),
            DataField::NetIncomeComponents => self.net_income_components.is_some(),
            DataField::ProfitBeforeTax => self.profit_before_tax.as_ref().is_some_and(|v| !v.is_empty()),
            DataField::FinancialMetrics => self.financial_metrics.as_ref().is_some_and(|m| !m.is_empty()),
            DataField::IncomeStatementData => {
                self.income_statement_data.as_ref().is_some_and(|d| !d.is_empty())
            }
        }
    }
}

pub fn get_charts_for_document_type(document_type: DocumentType) -> Vec<ChartConfig> {
    document_type.charts().iter().map(|chart| chart.config()).collect()
}

pub fn is_chart_data_available(config: &ChartConfig, data: &FinancialData) -> bool {
    match config.id {
        ChartType::CashFlowTrend => {
            let has_operating_inflows = data
                .cash_inflows
                .as_ref()
                .and_then(|inflows| inflows.operating_activities.as_ref())
                .is_some_and(|series| !series.is_empty());

            data.has_field(DataField::Periods)
                && (data.has_field(DataField::CashFlowOperating) || has_operating_inflows)
        }
        ChartType::CashFlowComponents => data
            .cash_inflows
            .as_ref()
            .is_some_and(|inflows| inflows.has_any_series()),
        _ => config
            .required_data_fields
            .iter()
            .all(|&field| data.has_field(field)),
    }
}

pub fn get_enabled_charts(document_type: DocumentType, data: &FinancialData) -> Vec<ChartConfig> {
    get_charts_for_document_type(document_type)
        .into_iter()
        .filter(|chart| is_chart_data_available(chart, data))
        .collect()
}

pub fn get_chart_tabs(document_type: DocumentType, data: &FinancialData) -> Vec<ChartTab> {
    get_charts_for_document_type(document_type)
        .iter()
        .enumerate()
        .map(|(index, chart)| ChartTab {
            id: index,
            chart_type: chart.id,
            label: chart.label.to_string(),
            disabled: !is_chart_data_available(chart, data),
        })
        .collect()
}
