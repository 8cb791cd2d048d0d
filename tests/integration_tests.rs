use financial_statement_charts::*;
use serde_json::json;

fn balance_sheet(value: serde_json::Value) -> BalanceSheetRawData {
    serde_json::from_value(value).unwrap()
}

fn cash_flow(value: serde_json::Value) -> CashFlowRawData {
    serde_json::from_value(value).unwrap()
}

fn income_statement(value: serde_json::Value) -> IncomeStatementRawData {
    serde_json::from_value(value).unwrap()
}

fn mixed_cash_flow() -> CashFlowRawData {
    cash_flow(json!({
        "2024": {
            "Q2_YTD": {"Net_Operation": 40.0},
            "Q1": {"Net_Operation": 10.0, "Net_Investing": -5.0},
            "Q2": {"Net_Operation": 20.0},
            "Q3": {"Net_Operation": null, "Net_Investing": null, "Net_Financing": null, "Profit_Before_Tax": null}
        },
        "2023": {
            "Q4": {"Net_Financing": 7.0},
            "Q4_YTD": {"Profit_Before_Tax": 3.0}
        }
    }))
}

#[test]
fn test_balance_sheet_end_to_end() {
    let raw = balance_sheet(json!({
        "2023": {"Q4": {"Total_Assets": 849482012.0, "Total_Liabilities": 717853947.0, "Total_Equity": 131628065.0}},
        "2022": {"Q4": {"Total_Assets": 699032544.0, "Total_Liabilities": 585607578.0, "Total_Equity": 113424966.0}}
    }));

    let processed = process_quarterly_balance_sheet_data(&raw);
    assert_eq!(
        processed,
        vec![
            ProcessedPeriod {
                period: "Q4 2022".to_string(),
                total_assets: 699032544.0,
                total_liabilities: 585607578.0,
                total_equity: 113424966.0,
            },
            ProcessedPeriod {
                period: "Q4 2023".to_string(),
                total_assets: 849482012.0,
                total_liabilities: 717853947.0,
                total_equity: 131628065.0,
            },
        ]
    );

    let overview = get_overview_chart_data(&processed, Some(&raw));
    assert_eq!(overview.labels, vec!["Q4 2022", "Q4 2023"]);
    assert!(overview.data_quality.values().all(|q| !q.has_estimated));

    let (latest, previous) = get_default_periods(&processed);
    assert_eq!(latest.as_deref(), Some("Q4 2023"));
    assert_eq!(previous.as_deref(), Some("Q4 2022"));
}

#[test]
fn test_balance_sheet_inclusion_and_equity_derivation() {
    let raw = balance_sheet(json!({
        "2024": {
            "Q1": {"Total_Assets": 1000000.0, "Total_Liabilities": 700000.0, "Total_Equity": null},
            "Q2": {"Total_Assets": 0.0, "Total_Liabilities": 5.0, "Total_Equity": 5.0},
            "Q3": {"Total_Assets": null, "Total_Liabilities": 5.0, "Total_Equity": 5.0},
            "Q4": {"Total_Assets": -10.0}
        }
    }));

    let processed = process_quarterly_balance_sheet_data(&raw);
    assert_eq!(processed.len(), 1);
    assert_eq!(processed[0].period, "Q1 2024");
    assert_eq!(processed[0].total_equity, 300000.0);

    let comparison = get_comparison_chart_data(&processed, "Q1 2024", "Q1 2024", Some(&raw));
    let quality = comparison.data_quality.unwrap();
    assert_eq!(quality["Q1 2024"].calculated_fields, vec!["Total Equity"]);
    assert!(!quality["Q1 2024"].has_complete_data);
}

#[test]
fn test_cash_flow_end_to_end() {
    let raw = cash_flow(json!({
        "2024": {"Q4": {"Net_Operation": 1800000.0, "Net_Investing": -2200000.0, "Net_Financing": 200000.0, "Profit_Before_Tax": 1100000.0}}
    }));

    let data = transform_backend_cash_flow_data(&raw);
    assert_eq!(data.periods, vec!["2024 Q4"]);

    let inflows = data.cash_inflows.as_ref().unwrap();
    assert_eq!(inflows.operating_activities, Some(vec![1800000.0]));
    assert_eq!(inflows.investing_activities, Some(vec![-2200000.0]));
    assert_eq!(inflows.financing_activities, Some(vec![200000.0]));
    assert_eq!(data.profit_before_tax, Some(vec![1100000.0]));
    assert_eq!(data.cash_flow_operating, vec![1800000.0]);

    let tabs = get_chart_tabs(DocumentType::CashFlow, &data);
    assert_eq!(tabs.len(), 1);
    assert!(!tabs[0].disabled);
}

#[test]
fn test_cash_flow_null_handling() {
    let data = transform_backend_cash_flow_data(&mixed_cash_flow());

    assert_eq!(
        data.periods,
        vec!["2023 Q4", "2023 Q4 YTD", "2024 Q1", "2024 Q2", "2024 Q2 YTD"]
    );

    let inflows = data.cash_inflows.unwrap();
    assert_eq!(inflows.operating_activities, Some(vec![0.0, 0.0, 10.0, 20.0, 40.0]));
    assert_eq!(inflows.investing_activities, Some(vec![0.0, 0.0, -5.0, 0.0, 0.0]));
    assert_eq!(inflows.financing_activities, Some(vec![7.0, 0.0, 0.0, 0.0, 0.0]));
}

#[test]
fn test_ytd_after_quarters_ordering() {
    let transformer = StatementTransformer::new(TransformOptions {
        ytd_placement: YtdPlacement::AfterQuarters,
        ..Default::default()
    });

    let view = transformer.transform(&StatementPayload::CashFlow(mixed_cash_flow()));
    let StatementView::CashFlow { data } = view else {
        panic!("expected a cash flow view");
    };
    assert_eq!(
        data.periods,
        vec!["2023 Q4", "2023 Q4 YTD", "2024 Q1", "2024 Q2", "2024 Q2 YTD"]
    );

    let keys = ["Q2_YTD", "Q4", "Q1_YTD", "Q1", "Q3"];
    let sorted = transformer.ordering().sorted_quarters(keys);
    assert_eq!(sorted, vec!["Q1", "Q3", "Q4", "Q1_YTD", "Q2_YTD"]);
}

#[test]
fn test_unknown_period_policy() {
    let keys = ["Q2", "Annual", "Q1"];

    let earliest = PeriodOrdering::default().sorted_quarters(keys);
    assert_eq!(earliest, vec!["Annual", "Q1", "Q2"]);

    let latest = PeriodOrdering::new(UnknownPeriodPolicy::Latest, YtdPlacement::Interleaved)
        .sorted_quarters(keys);
    assert_eq!(latest, vec!["Q1", "Q2", "Annual"]);
}

#[test]
fn test_income_statement_ordering_and_alignment() {
    let raw = income_statement(json!({
        "2023": {
            "Q1": {"Total_Income": 1000.0, "Total_Expenses": -800.0, "Gross_Profit": 200.0},
            "Q2": {"Total_Income": null, "Total_Expenses": null, "Gross_Profit": null}
        }
    }));

    let chart = create_comprehensive_bar_data(&raw);
    assert_eq!(chart.labels, vec!["Q1 2023"]);

    let order: Vec<&str> = chart.datasets.iter().map(|d| d.label.as_str()).collect();
    assert_eq!(&order[..3], &["Total Income", "Total Expenses", "Gross Profit"]);
    assert!(chart.is_aligned());
}

#[test]
fn test_transforms_are_idempotent_and_aligned() {
    let transformer = StatementTransformer::default();
    let payloads = vec![
        StatementPayload::CashFlow(mixed_cash_flow()),
        StatementPayload::BalanceSheet(balance_sheet(json!({
            "2023": {"Q4": {"Total_Assets": 10.0, "Total_Liabilities": 4.0}},
            "2024": {"Q1": {"Total_Assets": 12.0}}
        }))),
        StatementPayload::IncomeStatement(income_statement(json!({
            "2023": {"Q4_YTD": {"Profit_Before_Tax": 9.0}, "Q4": {"Total_Income": 3.0}}
        }))),
    ];

    for payload in &payloads {
        let first = transformer.transform(payload);
        assert_eq!(first, transformer.transform(payload));

        match first {
            StatementView::CashFlow { data } => {
                let n = data.periods.len();
                let inflows = data.cash_inflows.unwrap();
                assert_eq!(inflows.operating_activities.unwrap().len(), n);
                assert_eq!(inflows.investing_activities.unwrap().len(), n);
                assert_eq!(inflows.financing_activities.unwrap().len(), n);
                assert_eq!(data.profit_before_tax.unwrap().len(), n);
            }
            StatementView::BalanceSheet {
                overview, comparison, ..
            } => {
                assert!(overview.datasets.iter().all(|d| d.data.len() == overview.labels.len()));
                let comparison = comparison.unwrap();
                assert!(comparison.datasets.iter().all(|d| d.data.len() == 2));
            }
            StatementView::IncomeStatement { chart } => {
                assert_eq!(chart.labels, vec!["Q4 2023", "Q4 YTD 2023"]);
                assert!(chart.is_aligned());
            }
        }
    }
}

#[test]
fn test_empty_inputs() {
    let processed = process_quarterly_balance_sheet_data(&BalanceSheetRawData::new());
    assert!(processed.is_empty());

    let overview = get_overview_chart_data(&processed, None);
    assert!(overview.labels.is_empty());
    assert!(overview.datasets.is_empty());
    assert!(overview.data_quality.is_empty());

    let serialized = serde_json::to_value(&overview).unwrap();
    assert_eq!(serialized, json!({"labels": [], "datasets": [], "dataQuality": {}}));

    let comparison = get_comparison_chart_data(&processed, "Q4 2023", "Q4 2022", None);
    assert!(comparison.labels.is_empty());
}

#[test]
fn test_summary_to_tabs() {
    let summary: SummaryResult = serde_json::from_value(json!({
        "success": true,
        "summary": "Income statement summary",
        "summary_content": "```json\n{\"2023\": {\"Q1\": {\"Total_Income\": 500.0, \"Profit_After_Tax\": 50.0}}}\n```",
        "metadata": {"available_summary_types": ["income_statement"], "default_summary_type": "income_statement"}
    }))
    .unwrap();

    let processing: Vec<ProcessingResult> = serde_json::from_value(json!([
        {"success": true, "financial_data": {"Revenue": {"value": "$500"}}},
        {"success": true, "financial_data": {"Revenue": {"value": 999.0}, "Net Profit": {"value": 50.0}}}
    ]))
    .unwrap();

    let payload = summary.payload().unwrap().unwrap();
    assert_eq!(payload.document_type(), DocumentType::IncomeStatement);

    let data = FinancialData::from_summary(&summary, &processing).unwrap();
    let metrics = data.financial_metrics.as_ref().unwrap();
    assert_eq!(metrics["Revenue"].value, Some(MetricValue::Text("$500".to_string())));
    assert_eq!(format_metric_value(metrics["Net Profit"].value.as_ref().unwrap()), "$50");

    let view = StatementTransformer::default().transform(&payload);
    let tabs = view.chart_tabs(&data);
    let enabled: Vec<ChartType> = tabs.iter().filter(|t| !t.disabled).map(|t| t.chart_type).collect();
    assert_eq!(
        enabled,
        vec![
            ChartType::IncomeBreakdown,
            ChartType::ProfitMargins,
            ChartType::ExpenseAnalysis,
            ChartType::FinancialMetrics
        ]
    );
}

#[test]
fn test_null_quarter_record_does_not_hide_charts() {
    let summary = SummaryResult {
        success: true,
        summary_content: Some(
            r#"{"2023": {"Q1": null, "Q2": {"Total_Income": 5.0}}}"#.to_string(),
        ),
        ..Default::default()
    };

    let data = FinancialData::from_summary(&summary, &[]).unwrap();
    let chart = create_comprehensive_bar_data(data.income_statement_data.as_ref().unwrap());
    assert_eq!(chart.labels, vec!["Q2 2023"]);

    let payload = StatementPayload::parse(
        r#"{"2024": {"Q3": null, "Q4": {"Net_Operation": 1800000.0}}}"#,
    )
    .unwrap();
    let StatementView::CashFlow { data } = StatementTransformer::default().transform(&payload) else {
        panic!("expected a cash flow view");
    };
    assert_eq!(data.periods, vec!["2024 Q4"]);
}

#[test]
fn test_unrecognized_summary_content() {
    let summary = SummaryResult {
        success: true,
        summary_content: Some(r#"{"2023": {"Q1": {"Cash": 1.0}}}"#.to_string()),
        ..Default::default()
    };

    let err = FinancialData::from_summary(&summary, &[]).unwrap_err();
    assert!(matches!(err, ChartDataError::UnrecognizedPayload));
    assert_eq!(
        err.user_message(),
        "Data format does not match any expected statement structure."
    );
}

#[test]
fn test_session_round_trip_through_disk() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("sessions.json");

    let mut store = SessionStore::new();
    let id = SessionId::new("browser-tab-1");
    store.put(
        id.clone(),
        SessionSnapshot::new(vec![UploadedFile {
            file_name: "cash-flow-q4.pdf".to_string(),
            category: "cash-flow".to_string(),
            status: UploadStatus::Processing,
            error: None,
        }]),
    );
    store.save(&path)?;

    let mut loaded = SessionStore::load(&path)?;
    assert_eq!(loaded.get(&id)?.uploaded_files[0].category, "cash-flow");

    loaded.clear(&id);
    assert!(loaded.is_empty());
    Ok(())
}
