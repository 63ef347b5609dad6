// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use serde_json::json;
use tempfile::tempdir;
use tripspend::charts::{bar_chart, gauge_chart, pie_chart, to_html, Trace};
use tripspend::commands::charts::write_figure;
use tripspend::config::ReportConfig;
use tripspend::errors::PipelineError;
use tripspend::models::{AggregatedRow, Aggregation, Axis, CategoryOrdering};

fn row(place: &str, category: &str, total: i64, per_day: Option<i64>) -> AggregatedRow {
    AggregatedRow {
        place: place.into(),
        category: category.into(),
        amount_total: Decimal::from(total),
        amount_per_day: per_day.map(Decimal::from),
    }
}

fn per_day_agg() -> Aggregation {
    Aggregation {
        axis: Axis::City,
        per_day: true,
        ordering: CategoryOrdering::Priority,
        rows: vec![
            row("Hanoi", "Food & Drink", 30, Some(15)),
            row("Hue", "Food & Drink", 20, Some(20)),
            row("Hanoi", "Activities", 14, Some(7)),
            row("Sapa", "Activities", 9, None),
        ],
    }
}

fn order() -> Vec<String> {
    vec!["Hue".into(), "Hanoi".into(), "Sapa".into()]
}

#[test]
fn bar_chart_has_one_trace_per_category_in_place_order() {
    let agg = per_day_agg();
    let fig = bar_chart(&agg, &order(), &ReportConfig::default()).unwrap();

    let value = serde_json::to_value(&fig).unwrap();
    assert_eq!(
        value["data"],
        json!([
            {"type": "bar", "name": "Food & Drink", "x": ["Hue", "Hanoi"], "y": [20.0, 15.0], "marker": {"color": "#DC3912"}},
            {"type": "bar", "name": "Activities", "x": ["Hanoi", "Sapa"], "y": [7.0, null], "marker": {"color": "#FF9900"}}
        ])
    );
    assert_eq!(value["layout"]["title"]["text"], "Per Day Expenses by City");
    assert_eq!(value["layout"]["barmode"], "stack");
    assert_eq!(value["layout"]["xaxis"]["categoryarray"], json!(["Hue", "Hanoi", "Sapa"]));
    assert_eq!(value["layout"]["shapes"][0]["y0"], 65.0);
}

#[test]
fn totals_bar_chart_has_no_budget_line() {
    let mut agg = per_day_agg();
    agg.per_day = false;
    agg.axis = Axis::Country;
    let fig = bar_chart(&agg, &order(), &ReportConfig::default()).unwrap();
    assert!(fig.layout.shapes.is_empty());
    assert_eq!(fig.layout.title.unwrap().text, "Total Expenses by Country");
}

#[test]
fn builders_do_not_mutate_input() {
    let agg = per_day_agg();
    let before = agg.clone();
    let cfg = ReportConfig::default();
    bar_chart(&agg, &order(), &cfg).unwrap();
    pie_chart(&agg, None, &cfg).unwrap();
    gauge_chart(&agg, "Hanoi", &cfg).unwrap();
    assert_eq!(agg, before);
}

#[test]
fn bar_chart_rejects_incomplete_place_order() {
    let err = bar_chart(&per_day_agg(), &["Hanoi".to_string()], &ReportConfig::default())
        .unwrap_err();
    assert!(matches!(err, PipelineError::Chart(m) if m.contains("'Hue'")));
}

#[test]
fn unknown_axis_name_fails_fast() {
    let err = "region".parse::<Axis>().unwrap_err();
    assert_eq!(err, PipelineError::UnknownAxis("region".into()));
    assert_eq!(err.to_string(), "unknown axis 'region' (use city|country)");
}

#[test]
fn pie_chart_sums_categories_for_a_place() {
    let fig = pie_chart(&per_day_agg(), Some("Hanoi"), &ReportConfig::default()).unwrap();
    match &fig.data[0] {
        Trace::Pie { labels, values, .. } => {
            assert_eq!(labels, &vec!["Food & Drink".to_string(), "Activities".to_string()]);
            assert_eq!(values, &vec![30.0, 14.0]);
        }
        other => panic!("expected pie, got {:?}", other),
    }
    assert!(pie_chart(&per_day_agg(), Some("Atlantis"), &ReportConfig::default()).is_err());
}

#[test]
fn gauge_reports_daily_spend_against_budget() {
    let fig = gauge_chart(&per_day_agg(), "Hanoi", &ReportConfig::default()).unwrap();
    let value = serde_json::to_value(&fig).unwrap();
    assert_eq!(value["data"][0]["type"], "indicator");
    assert_eq!(value["data"][0]["value"], 22.0);
    assert_eq!(value["data"][0]["gauge"]["threshold"]["value"], 65.0);
    assert_eq!(value["data"][0]["gauge"]["axis"]["range"], json!([0.0, 130.0]));
}

#[test]
fn gauge_needs_nights_and_per_day_rows() {
    let cfg = ReportConfig::default();
    assert!(gauge_chart(&per_day_agg(), "Sapa", &cfg).is_err());
    let mut totals = per_day_agg();
    totals.per_day = false;
    assert!(gauge_chart(&totals, "Hanoi", &cfg).is_err());
}

#[test]
fn figures_write_as_json_or_html() {
    let fig = pie_chart(&per_day_agg(), None, &ReportConfig::default()).unwrap();
    let dir = tempdir().unwrap();

    let json_path = dir.path().join("pie.json");
    write_figure(&fig, &json_path).unwrap();
    let parsed: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(parsed["data"][0]["type"], "pie");

    let html_path = dir.path().join("pie.html");
    write_figure(&fig, &html_path).unwrap();
    let html = std::fs::read_to_string(&html_path).unwrap();
    assert_eq!(html, to_html(&fig).unwrap());
    assert!(html.contains("Plotly.newPlot"));
}

#[test]
fn html_page_escapes_markup_from_labels() {
    let agg = Aggregation {
        axis: Axis::City,
        per_day: false,
        ordering: CategoryOrdering::Priority,
        rows: vec![row("</script><b>", "Food & Drink", 10, None)],
    };
    let mut fig = bar_chart(&agg, &["</script><b>".to_string()], &ReportConfig::default()).unwrap();
    fig.layout.title.as_mut().unwrap().text = "Spend <in> \"Hanoi\"".into();
    let html = to_html(&fig).unwrap();

    assert_eq!(html.matches("</script>").count(), 2);
    assert!(html.contains(r"<\/script><b>"));
    assert!(html.contains("<title>Spend &lt;in&gt; &quot;Hanoi&quot;</title>"));
}

#[test]
fn gauge_without_budget_keeps_a_positive_range() {
    let cfg = ReportConfig {
        daily_budget: None,
        ..ReportConfig::default()
    };
    let agg = Aggregation {
        axis: Axis::City,
        per_day: true,
        ordering: CategoryOrdering::Priority,
        rows: vec![row("Hanoi", "Refunds", -10, Some(-5))],
    };
    let value = serde_json::to_value(&gauge_chart(&agg, "Hanoi", &cfg).unwrap()).unwrap();
    assert_eq!(value["data"][0]["gauge"]["axis"]["range"], json!([0.0, 6.25]));

    let zero = Aggregation {
        rows: vec![row("Hanoi", "Refunds", 0, Some(0))],
        ..agg
    };
    let value = serde_json::to_value(&gauge_chart(&zero, "Hanoi", &cfg).unwrap()).unwrap();
    assert_eq!(value["data"][0]["gauge"]["axis"]["range"], json!([0.0, 1.25]));
}
