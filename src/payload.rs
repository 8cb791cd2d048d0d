use crate::eligibility::DocumentType;
use crate::error::{ChartDataError, Result};
use crate::financial_data::FinancialMetric;
use crate::schema::{BalanceSheetRawData, CashFlowRawData, IncomeStatementRawData};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

const CASH_FLOW_MARKERS: &[&str] = &["Net_Operation", "Net_Investing", "Net_Financing"];
const BALANCE_SHEET_MARKERS: &[&str] = &["Total_Assets"];
const INCOME_STATEMENT_MARKERS: &[&str] = &[
    "Total_Income",
    "Total_Expenses",
    "Gross_Profit",
    "Profit_Before_Tax",
    "Profit_After_Tax",
    "Net_Interest_Income",
    "Total_Operating_Income",
];

/// A statement payload tagged with its document type.
///
/// Serialized as `{"kind": "cash-flow", "data": {...}}`, the envelope the
/// backend may send explicitly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "kebab-case")]
pub enum StatementPayload {
    BalanceSheet(BalanceSheetRawData),
    CashFlow(CashFlowRawData),
    IncomeStatement(IncomeStatementRawData),
}

impl StatementPayload {
    pub const fn document_type(&self) -> DocumentType {
        match self {
            Self::BalanceSheet(_) => DocumentType::BalanceSheet,
            Self::CashFlow(_) => DocumentType::CashFlow,
            Self::IncomeStatement(_) => DocumentType::IncomeStatement,
        }
    }

    /// Parses summary content, fenced or not, into a tagged payload.
    pub fn parse(content: &str) -> Result<Self> {
        let json = extract_json_block(content);
        let value: Value = serde_json::from_str(json)
            .map_err(|e| ChartDataError::InvalidPayload(format!("summary content is not JSON: {}", e)))?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self> {
        let document_type = classify_payload(&value).ok_or_else(|| {
            warn!("Summary content does not match any statement structure");
            ChartDataError::UnrecognizedPayload
        })?;

        let mut data = match value {
            Value::Object(mut envelope) if is_envelope(&envelope) => {
                envelope.remove("data").unwrap_or(Value::Null)
            }
            other => other,
        };
        drop_null_records(&mut data);

        debug!("Classified summary content as {}", document_type);

        let invalid = |e: serde_json::Error| {
            ChartDataError::InvalidPayload(format!("{} payload has an unexpected shape: {}", document_type, e))
        };

        Ok(match document_type {
            DocumentType::BalanceSheet => Self::BalanceSheet(serde_json::from_value(data).map_err(invalid)?),
            DocumentType::CashFlow => Self::CashFlow(serde_json::from_value(data).map_err(invalid)?),
            DocumentType::IncomeStatement => {
                Self::IncomeStatement(serde_json::from_value(data).map_err(invalid)?)
            }
        })
    }
}

/// Returns the body of the first ```` ```json ```` fence, or the trimmed input.
pub fn extract_json_block(content: &str) -> &str {
    let Some(start) = content.find("```json") else {
        return content.trim();
    };

    let after_tag = &content[start + "```json".len()..];
    let Some(newline) = after_tag.find('\n') else {
        return content.trim();
    };

    let body = &after_tag[newline + 1..];
    match body.find("```") {
        Some(end) => body[..end].trim(),
        None => content.trim(),
    }
}

/// Decides which statement a parsed payload describes.
///
/// An explicit `{"kind", "data"}` envelope wins. Otherwise the record field
/// names are inspected: cash flow markers first, then balance sheet, then
/// income statement.
pub fn classify_payload(value: &Value) -> Option<DocumentType> {
    let object = value.as_object()?;

    if is_envelope(object) {
        return object.get("kind")?.as_str()?.parse().ok();
    }

    let records: Vec<(&str, &str, &Map<String, Value>)> = object
        .iter()
        .filter_map(|(year, quarters)| Some((year, quarters.as_object()?)))
        .flat_map(|(year, quarters)| {
            quarters
                .iter()
                .filter_map(move |(quarter, record)| Some((year.as_str(), quarter.as_str(), record.as_object()?)))
        })
        .collect();

    let has_marker = |record: &Map<String, Value>, markers: &[&str]| {
        markers.iter().any(|marker| record.contains_key(*marker))
    };

    if records.iter().any(|(_, _, r)| has_marker(*r, CASH_FLOW_MARKERS)) {
        return Some(DocumentType::CashFlow);
    }

    let is_quarterly_balance_sheet = records.iter().any(|(year, quarter, record)| {
        year.len() == 4
            && year.chars().all(|c| c.is_ascii_digit())
            && quarter.starts_with('Q')
            && has_marker(*record, BALANCE_SHEET_MARKERS)
    });
    if is_quarterly_balance_sheet {
        return Some(DocumentType::BalanceSheet);
    }

    if records.iter().any(|(_, _, r)| has_marker(*r, INCOME_STATEMENT_MARKERS)) {
        return Some(DocumentType::IncomeStatement);
    }

    None
}

/// A `null` year or quarter record reads as an absent one.
fn drop_null_records(data: &mut Value) {
    let Some(years) = data.as_object_mut() else {
        return;
    };

    years.retain(|_, quarters| !quarters.is_null());
    for quarters in years.values_mut() {
        if let Some(quarters) = quarters.as_object_mut() {
            quarters.retain(|_, record| !record.is_null());
        }
    }
}

fn is_envelope(object: &Map<String, Value>) -> bool {
    object.get("kind").is_some_and(Value::is_string) && object.contains_key("data")
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryMetadata {
    #[serde(default)]
    pub available_summary_types: Vec<String>,
    #[serde(default)]
    pub default_summary_type: String,
}

/// Response of the summary generation endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryResult {
    pub success: bool,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub summary_content: Option<String>,
    #[serde(default)]
    pub financial_data: Option<BTreeMap<String, FinancialMetric>>,
    #[serde(default)]
    pub total_files_processed: usize,
    #[serde(default)]
    pub analysis_files_used: Vec<String>,
    #[serde(default)]
    pub metadata: Option<SummaryMetadata>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl SummaryResult {
    pub fn payload(&self) -> Option<Result<StatementPayload>> {
        self.summary_content.as_deref().map(StatementPayload::parse)
    }
}

/// Response of the per-document processing endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessingResult {
    pub success: bool,
    #[serde(default)]
    pub ocr_text: String,
    #[serde(default)]
    pub financial_analysis: String,
    #[serde(default)]
    pub financial_data: Option<BTreeMap<String, FinancialMetric>>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Headline metrics for the results page.
///
/// A successful summary's metrics are used as-is. Otherwise the metrics of
/// successful processing results are merged; the first result that gives a
/// metric a value keeps it.
pub fn merge_financial_metrics(
    summary: Option<&SummaryResult>,
    processing_results: &[ProcessingResult],
) -> BTreeMap<String, FinancialMetric> {
    if let Some(metrics) = summary
        .filter(|s| s.success)
        .and_then(|s| s.financial_data.as_ref())
    {
        return metrics.clone();
    }

    let mut combined: BTreeMap<String, FinancialMetric> = BTreeMap::new();
    for result in processing_results.iter().filter(|r| r.success) {
        let Some(metrics) = &result.financial_data else {
            continue;
        };
        for (name, metric) in metrics {
            let replace = combined
                .get(name)
                .map_or(true, |existing| existing.value.is_none() && metric.value.is_some());
            if replace {
                combined.insert(name.clone(), metric.clone());
            }
        }
    }

    combined
}
