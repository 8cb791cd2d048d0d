use crate::chart::{ChartDataset, ASSETS_COLOR, EQUITY_COLOR, LIABILITIES_COLOR};
use crate::period::{warn_unknown_quarters, PeriodOrdering};
use crate::schema::{BalanceSheetMetrics, BalanceSheetRawData};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const TOTAL_ASSETS: &str = "Total Assets";
pub const TOTAL_LIABILITIES: &str = "Total Liabilities";
pub const TOTAL_EQUITY: &str = "Total Equity";

const ASSETS_STACK: &str = "Assets";
const LIABILITIES_AND_EQUITY_STACK: &str = "Liabilities & Equity";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedPeriod {
    /// "<quarter> <year>", e.g. "Q4 2023".
    pub period: String,
    pub total_assets: f64,
    pub total_liabilities: f64,
    pub total_equity: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonQuality {
    pub has_complete_data: bool,
    pub missing_fields: Vec<String>,
    pub calculated_fields: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewQuality {
    pub has_estimated: bool,
    pub missing_fields: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<ChartDataset>,
    /// Present only when the raw payload was supplied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_quality: Option<BTreeMap<String, ComparisonQuality>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<ChartDataset>,
    pub data_quality: BTreeMap<String, OverviewQuality>,
}

/// Keeps periods with positive total assets, in chronological order.
///
/// Missing liabilities become zero. Missing equity is `assets - liabilities`
/// when liabilities were reported, zero otherwise.
pub fn process_quarterly_balance_sheet_data(raw: &BalanceSheetRawData) -> Vec<ProcessedPeriod> {
    process_with_ordering(raw, &PeriodOrdering::default())
}

pub fn process_with_ordering(
    raw: &BalanceSheetRawData,
    ordering: &PeriodOrdering,
) -> Vec<ProcessedPeriod> {
    let mut rows: Vec<(&str, &str, ProcessedPeriod)> = Vec::new();
    let mut excluded = 0usize;

    for (year, quarters) in raw {
        warn_unknown_quarters("Balance sheet", quarters.keys().map(String::as_str));

        for (quarter, metrics) in quarters {
            match process_period(year, quarter, metrics) {
                Some(period) => rows.push((year.as_str(), quarter.as_str(), period)),
                None => excluded += 1,
            }
        }
    }

    rows.sort_by(|a, b| ordering.compare_year_quarter(a.0, a.1, b.0, b.1));

    debug!(
        "Balance sheet: kept {} periods, excluded {} without positive total assets",
        rows.len(),
        excluded
    );

    rows.into_iter().map(|(_, _, period)| period).collect()
}

fn process_period(year: &str, quarter: &str, metrics: &BalanceSheetMetrics) -> Option<ProcessedPeriod> {
    let total_assets = metrics.total_assets.filter(|assets| *assets > 0.0)?;

    let total_equity = match (metrics.total_equity, metrics.total_liabilities) {
        (Some(equity), _) => equity,
        (None, Some(liabilities)) => total_assets - liabilities,
        (None, None) => 0.0,
    };

    Some(ProcessedPeriod {
        period: format!("{} {}", quarter, year),
        total_assets,
        total_liabilities: metrics.total_liabilities.unwrap_or(0.0),
        total_equity,
    })
}

pub fn get_available_periods(processed: &[ProcessedPeriod]) -> Vec<String> {
    processed.iter().map(|p| p.period.clone()).collect()
}

/// The most recent period and the one before it.
pub fn get_default_periods(processed: &[ProcessedPeriod]) -> (Option<String>, Option<String>) {
    let mut recent = processed.iter().rev().map(|p| p.period.clone());
    let latest = recent.next();
    let previous = recent.next();
    (latest, previous)
}

pub fn get_overview_chart_data(
    processed: &[ProcessedPeriod],
    raw: Option<&BalanceSheetRawData>,
) -> OverviewChartData {
    if processed.is_empty() {
        return OverviewChartData::default();
    }

    let labels = get_available_periods(processed);
    let assets = processed.iter().map(|p| p.total_assets).collect();
    let liabilities = processed.iter().map(|p| p.total_liabilities).collect();
    let equity = processed.iter().map(|p| p.total_equity).collect();

    let datasets = vec![
        ChartDataset::new(TOTAL_ASSETS, assets, ASSETS_COLOR),
        ChartDataset::new(TOTAL_LIABILITIES, liabilities, LIABILITIES_COLOR),
        ChartDataset::new(TOTAL_EQUITY, equity, EQUITY_COLOR),
    ];

    let mut data_quality = BTreeMap::new();
    if let Some(raw) = raw {
        for period in processed {
            let quality = raw_record(raw, &period.period)
                .map(overview_quality)
                .unwrap_or_default();
            data_quality.insert(period.period.clone(), quality);
        }
    }

    OverviewChartData {
        labels,
        datasets,
        data_quality,
    }
}

pub fn get_comparison_chart_data(
    processed: &[ProcessedPeriod],
    period1: &str,
    period2: &str,
    raw: Option<&BalanceSheetRawData>,
) -> ComparisonChartData {
    let find = |label: &str| processed.iter().find(|p| p.period == label);

    let (Some(first), Some(second)) = (find(period1), find(period2)) else {
        debug!(
            "Balance sheet comparison requested for unavailable periods '{}' / '{}'",
            period1, period2
        );
        return ComparisonChartData::default();
    };

    let data_quality = raw.map(|raw| {
        [period1, period2]
            .into_iter()
            .filter_map(|label| {
                raw_record(raw, label).map(|record| (label.to_string(), comparison_quality(record)))
            })
            .collect::<BTreeMap<_, _>>()
    });

    let datasets = vec![
        ChartDataset::new(
            TOTAL_ASSETS,
            vec![first.total_assets, second.total_assets],
            ASSETS_COLOR,
        )
        .stacked(ASSETS_STACK),
        ChartDataset::new(
            TOTAL_LIABILITIES,
            vec![first.total_liabilities, second.total_liabilities],
            LIABILITIES_COLOR,
        )
        .stacked(LIABILITIES_AND_EQUITY_STACK),
        ChartDataset::new(
            TOTAL_EQUITY,
            vec![first.total_equity, second.total_equity],
            EQUITY_COLOR,
        )
        .stacked(LIABILITIES_AND_EQUITY_STACK),
    ];

    ComparisonChartData {
        labels: vec![period1.to_string(), period2.to_string()],
        datasets,
        data_quality,
    }
}

/// Finds the raw record behind a "<quarter> <year>" label.
fn raw_record<'a>(raw: &'a BalanceSheetRawData, period: &str) -> Option<&'a BalanceSheetMetrics> {
    period
        .match_indices(' ')
        .find_map(|(i, _)| raw.get(&period[i + 1..])?.get(&period[..i]))
}

fn overview_quality(record: &BalanceSheetMetrics) -> OverviewQuality {
    let missing_fields: Vec<String> = [
        (record.total_assets, TOTAL_ASSETS),
        (record.total_liabilities, TOTAL_LIABILITIES),
        (record.total_equity, TOTAL_EQUITY),
    ]
    .into_iter()
    .filter(|(value, _)| value.is_none())
    .map(|(_, name)| name.to_string())
    .collect();

    OverviewQuality {
        has_estimated: !missing_fields.is_empty(),
        missing_fields,
    }
}

fn comparison_quality(record: &BalanceSheetMetrics) -> ComparisonQuality {
    let mut missing_fields = Vec::new();
    let mut calculated_fields = Vec::new();

    if record.total_liabilities.is_none() {
        missing_fields.push(TOTAL_LIABILITIES.to_string());
    }
    if record.total_equity.is_none() {
        if record.total_liabilities.is_some() {
            calculated_fields.push(TOTAL_EQUITY.to_string());
        } else {
            missing_fields.push(TOTAL_EQUITY.to_string());
        }
    }

    ComparisonQuality {
        has_complete_data: missing_fields.is_empty() && calculated_fields.is_empty(),
        missing_fields,
        calculated_fields,
    }
}
