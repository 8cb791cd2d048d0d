use crate::financial_data::{ActivityBreakdown, FinancialData, NetIncomeComponents};
use crate::period::{warn_unknown_quarters, PeriodOrdering};
use crate::schema::{CashFlowRawData, MetricRecord};
use log::debug;

pub const NET_OPERATION: &str = "Net Operation";
pub const NET_INVESTING: &str = "Net Investing";
pub const NET_FINANCING: &str = "Net Financing";
pub const PROFIT_BEFORE_TAX: &str = "Profit Before Tax";

/// Periods reporting no metric at all are skipped; missing metrics of a kept
/// period are plotted as zero.
pub fn transform_backend_cash_flow_data(backend: &CashFlowRawData) -> FinancialData {
    transform_with_ordering(backend, &PeriodOrdering::default())
}

pub fn transform_with_ordering(backend: &CashFlowRawData, ordering: &PeriodOrdering) -> FinancialData {
    let mut periods = Vec::new();
    let mut operating = Vec::new();
    let mut investing = Vec::new();
    let mut financing = Vec::new();
    let mut profit_before_tax = Vec::new();
    let mut skipped = 0usize;

    for year in ordering.sorted_years(backend.keys().map(String::as_str)) {
        let quarters = &backend[year];
        warn_unknown_quarters("Cash flow", quarters.keys().map(String::as_str));

        for quarter in ordering.sorted_quarters(quarters.keys().map(String::as_str)) {
            let record = &quarters[quarter];
            if !record.has_data() {
                skipped += 1;
                continue;
            }

            periods.push(period_label(year, quarter));
            operating.push(record.net_operation.unwrap_or(0.0));
            investing.push(record.net_investing.unwrap_or(0.0));
            financing.push(record.net_financing.unwrap_or(0.0));
            profit_before_tax.push(record.profit_before_tax.unwrap_or(0.0));
        }
    }

    debug!(
        "Cash flow: {} periods with data, {} empty periods skipped",
        periods.len(),
        skipped
    );

    let latest = |series: &[f64]| series.last().copied().unwrap_or(0.0);
    let net_income_components = NetIncomeComponents {
        labels: [NET_OPERATION, NET_INVESTING, NET_FINANCING, PROFIT_BEFORE_TAX]
            .iter()
            .map(|label| label.to_string())
            .collect(),
        values: vec![
            latest(&operating),
            latest(&investing),
            latest(&financing),
            latest(&profit_before_tax),
        ],
    };

    FinancialData {
        periods,
        cash_flow_operating: operating.clone(),
        cash_inflows: Some(ActivityBreakdown::new(operating, investing, financing)),
        cash_outflows: Some(ActivityBreakdown::empty()),
        net_income_components: Some(net_income_components),
        profit_before_tax: Some(profit_before_tax),
        backend_cash_flow_data: Some(backend.clone()),
        ..Default::default()
    }
}

/// "2024 Q4" for a standalone quarter, "2024 Q4 YTD" for its YTD variant.
fn period_label(year: &str, quarter: &str) -> String {
    let quarter_part = quarter.replace("_YTD", "");
    if quarter.contains("_YTD") {
        format!("{} {} YTD", year, quarter_part)
    } else {
        format!("{} {}", year, quarter_part)
    }
}
