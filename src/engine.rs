use crate::balance_sheet::{
    get_comparison_chart_data, get_default_periods, get_overview_chart_data, process_with_ordering,
    ComparisonChartData, OverviewChartData, ProcessedPeriod,
};
use crate::cash_flow;
use crate::chart::ChartData;
use crate::eligibility::{get_chart_tabs, ChartTab, DocumentType};
use crate::error::Result;
use crate::financial_data::FinancialData;
use crate::income_statement;
use crate::payload::{merge_financial_metrics, ProcessingResult, StatementPayload, SummaryResult};
use crate::period::PeriodOrdering;
use crate::schema::TransformOptions;
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// Chart-ready output for one statement payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum StatementView {
    BalanceSheet {
        periods: Vec<ProcessedPeriod>,
        overview: OverviewChartData,
        /// Latest period against the one before it, when there are two.
        comparison: Option<ComparisonChartData>,
    },
    CashFlow {
        data: FinancialData,
    },
    IncomeStatement {
        chart: ChartData,
    },
}

impl StatementView {
    pub const fn document_type(&self) -> DocumentType {
        match self {
            Self::BalanceSheet { .. } => DocumentType::BalanceSheet,
            Self::CashFlow { .. } => DocumentType::CashFlow,
            Self::IncomeStatement { .. } => DocumentType::IncomeStatement,
        }
    }

    /// Tabs for this view, gated on `data`.
    pub fn chart_tabs(&self, data: &FinancialData) -> Vec<ChartTab> {
        get_chart_tabs(self.document_type(), data)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StatementTransformer {
    ordering: PeriodOrdering,
}

impl StatementTransformer {
    pub const fn new(options: TransformOptions) -> Self {
        Self {
            ordering: options.ordering(),
        }
    }

    pub const fn ordering(&self) -> &PeriodOrdering {
        &self.ordering
    }

    pub fn transform(&self, payload: &StatementPayload) -> StatementView {
        let view = match payload {
            StatementPayload::BalanceSheet(raw) => {
                let periods = process_with_ordering(raw, &self.ordering);
                let overview = get_overview_chart_data(&periods, Some(raw));
                let comparison = match get_default_periods(&periods) {
                    (Some(latest), Some(previous)) => {
                        Some(get_comparison_chart_data(&periods, &latest, &previous, Some(raw)))
                    }
                    _ => None,
                };
                StatementView::BalanceSheet {
                    periods,
                    overview,
                    comparison,
                }
            }
            StatementPayload::CashFlow(raw) => StatementView::CashFlow {
                data: cash_flow::transform_with_ordering(raw, &self.ordering),
            },
            StatementPayload::IncomeStatement(raw) => StatementView::IncomeStatement {
                chart: income_statement::create_with_ordering(raw, &self.ordering),
            },
        };

        debug!("Transformed {} payload", view.document_type());
        view
    }

    /// Builds the results page data from a summary and the per-document results.
    ///
    /// Summary content that is missing yields metrics only; content that
    /// cannot be parsed is an error.
    pub fn financial_data(
        &self,
        summary: Option<&SummaryResult>,
        processing_results: &[ProcessingResult],
    ) -> Result<FinancialData> {
        let mut data = FinancialData::default();

        if let Some(payload) = summary.and_then(SummaryResult::payload) {
            let payload = payload?;
            info!("Summary content holds a {} payload", payload.document_type());

            match payload {
                StatementPayload::CashFlow(raw) => {
                    data.merge_missing(cash_flow::transform_with_ordering(&raw, &self.ordering));
                }
                StatementPayload::IncomeStatement(raw) => {
                    data.income_statement_data = Some(raw);
                }
                StatementPayload::BalanceSheet(_) => {}
            }
        }

        let metrics = merge_financial_metrics(summary, processing_results);
        if !metrics.is_empty() {
            data.financial_metrics = Some(metrics);
        }

        Ok(data)
    }
}

impl FinancialData {
    /// [`StatementTransformer::financial_data`] with the default period ordering.
    pub fn from_summary(summary: &SummaryResult, processing_results: &[ProcessingResult]) -> Result<Self> {
        StatementTransformer::default().financial_data(Some(summary), processing_results)
    }
}
