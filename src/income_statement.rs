use crate::chart::{ChartData, ChartDataset};
use crate::period::{warn_unknown_quarters, PeriodOrdering};
use crate::schema::{IncomeStatementMetrics, IncomeStatementRawData, MetricRecord};
use log::debug;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IncomeMetric {
    TotalIncome,
    TotalExpenses,
    GrossProfit,
    ProfitBeforeTax,
    ProfitAfterTax,
}

impl IncomeMetric {
    /// Declaration order; ties in average magnitude keep this order.
    pub const ALL: [Self; 5] = [
        Self::TotalIncome,
        Self::TotalExpenses,
        Self::GrossProfit,
        Self::ProfitBeforeTax,
        Self::ProfitAfterTax,
    ];

    pub const fn key(self) -> &'static str {
        match self {
            Self::TotalIncome => "Total_Income",
            Self::TotalExpenses => "Total_Expenses",
            Self::GrossProfit => "Gross_Profit",
            Self::ProfitBeforeTax => "Profit_Before_Tax",
            Self::ProfitAfterTax => "Profit_After_Tax",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::TotalIncome => "Total Income",
            Self::TotalExpenses => "Total Expenses",
            Self::GrossProfit => "Gross Profit",
            Self::ProfitBeforeTax => "Profit Before Tax",
            Self::ProfitAfterTax => "Profit After Tax",
        }
    }

    pub const fn color(self) -> &'static str {
        match self {
            Self::TotalIncome => "rgba(54, 162, 235, 0.8)",
            Self::TotalExpenses => "rgba(255, 99, 132, 0.8)",
            Self::GrossProfit => "rgba(75, 192, 192, 0.8)",
            Self::ProfitBeforeTax => "rgba(255, 206, 86, 0.8)",
            Self::ProfitAfterTax => "rgba(153, 102, 255, 0.8)",
        }
    }

    pub fn border_color(self) -> String {
        self.color().replace("0.8", "1")
    }

    pub const fn value(self, record: &IncomeStatementMetrics) -> Option<f64> {
        match self {
            Self::TotalIncome => record.total_income,
            Self::TotalExpenses => record.total_expenses,
            Self::GrossProfit => record.gross_profit,
            Self::ProfitBeforeTax => record.profit_before_tax,
            Self::ProfitAfterTax => record.profit_after_tax,
        }
    }
}

/// Grouped bar data with one dataset per metric, largest metric first.
pub fn create_comprehensive_bar_data(data: &IncomeStatementRawData) -> ChartData {
    create_with_ordering(data, &PeriodOrdering::default())
}

pub fn create_with_ordering(data: &IncomeStatementRawData, ordering: &PeriodOrdering) -> ChartData {
    let years = ordering.sorted_years(data.keys().map(String::as_str));

    let all_quarters: BTreeSet<&str> = data
        .values()
        .flat_map(|quarters| quarters.keys().map(String::as_str))
        .collect();
    warn_unknown_quarters("Income statement", all_quarters.iter().copied());
    let quarters = ordering.sorted_quarters(all_quarters);

    let mut labels = Vec::new();
    let mut cells: Vec<&IncomeStatementMetrics> = Vec::new();

    for year in &years {
        for quarter in &quarters {
            let Some(record) = data[*year].get(*quarter) else {
                continue;
            };
            if record.has_data() {
                labels.push(format!("{} {}", quarter.replacen('_', " ", 1), year));
                cells.push(record);
            }
        }
    }

    if labels.is_empty() {
        debug!("Income statement: no period reports any metric");
        return ChartData::default();
    }

    let mut ranked = metric_averages(&cells);
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

    debug!(
        "Income statement: {} periods, metric order {:?}",
        labels.len(),
        ranked.iter().map(|(metric, _)| metric.key()).collect::<Vec<_>>()
    );

    let datasets = ranked
        .into_iter()
        .map(|(metric, _)| {
            let series = cells
                .iter()
                .map(|record| metric.value(record).unwrap_or(0.0))
                .collect();
            ChartDataset::new(metric.label(), series, metric.color())
                .with_border_color(metric.border_color())
        })
        .collect();

    ChartData { labels, datasets }
}

/// Mean absolute value of each metric over the records that report it.
///
/// A metric that no record reports averages to zero.
pub fn metric_averages(records: &[&IncomeStatementMetrics]) -> Vec<(IncomeMetric, f64)> {
    IncomeMetric::ALL
        .iter()
        .map(|&metric| {
            let observed: Vec<f64> = records
                .iter()
                .filter_map(|record| metric.value(record))
                .map(f64::abs)
                .collect();

            let average = if observed.is_empty() {
                0.0
            } else {
                observed.iter().sum::<f64>() / observed.len() as f64
            };

            (metric, average)
        })
        .collect()
}
