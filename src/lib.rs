//! # Financial Statement Charts
//!
//! Turns the sparse, quarter-keyed statement payloads a document-analysis
//! backend produces into chart-ready series.
//!
//! ## Core Concepts
//!
//! - **Raw payload**: `year -> quarter key -> metrics`, where any metric may be null
//! - **Period ordering**: years numerically, then `Q1 < Q1_YTD < Q2 ... < Q4_YTD`
//! - **Gap handling**: periods without data are skipped, and missing metrics
//!   inside a kept period are zero-filled or derived
//! - **Eligibility**: each document type offers a fixed list of charts, each
//!   enabled only when its required data is present
//!
//! ## Example
//!
//! ```rust,ignore
//! use financial_statement_charts::*;
//!
//! let payload = StatementPayload::parse(
//!     r#"{"2024": {"Q4": {"Net_Operation": 1800000, "Net_Investing": -2200000}}}"#,
//! )?;
//!
//! let view = StatementTransformer::default().transform(&payload);
//! if let StatementView::CashFlow { data } = &view {
//!     assert_eq!(data.periods, vec!["2024 Q4"]);
//!     let tabs = view.chart_tabs(data);
//!     assert!(!tabs[0].disabled);
//! }
//! ```

pub mod balance_sheet;
pub mod cash_flow;
pub mod chart;
pub mod eligibility;
pub mod engine;
pub mod error;
pub mod financial_data;
pub mod income_statement;
pub mod payload;
pub mod period;
pub mod schema;
pub mod session;
pub mod utils;

#[cfg(feature = "backend")]
pub mod backend;

pub use balance_sheet::{
    get_available_periods, get_comparison_chart_data, get_default_periods, get_overview_chart_data,
    process_quarterly_balance_sheet_data, ComparisonChartData, ComparisonQuality, OverviewChartData,
    OverviewQuality, ProcessedPeriod,
};
pub use cash_flow::transform_backend_cash_flow_data;
pub use chart::{ChartData, ChartDataset};
pub use eligibility::*;
pub use engine::{StatementTransformer, StatementView};
pub use error::{ChartDataError, Result};
pub use financial_data::*;
pub use income_statement::{create_comprehensive_bar_data, IncomeMetric};
pub use payload::*;
pub use period::{
    compare_quarters, compare_year_quarter, PeriodOrdering, QuarterKey, UnknownPeriodPolicy,
    YtdPlacement,
};
pub use schema::*;
pub use session::*;
pub use utils::*;
