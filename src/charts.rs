// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Declarative chart construction.
//!
//! Builders turn an [`Aggregation`] into a Plotly figure description. They
//! only read their input and never touch the filesystem; rendering to a
//! page is left to [`to_html`] and the `chart` command.

use crate::config::ReportConfig;
use crate::errors::PipelineError;
use crate::models::{AggregatedRow, Aggregation};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Trace {
    Bar {
        name: String,
        x: Vec<String>,
        y: Vec<Option<f64>>,
        #[serde(skip_serializing_if = "Option::is_none")]
        marker: Option<Marker>,
    },
    Pie {
        labels: Vec<String>,
        values: Vec<f64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        marker: Option<PieMarker>,
        sort: bool,
    },
    Indicator {
        mode: String,
        value: f64,
        title: Title,
        number: NumberFormat,
        gauge: Gauge,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieMarker {
    pub colors: Vec<Option<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Title {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumberFormat {
    pub prefix: String,
    pub valueformat: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Gauge {
    pub axis: GaugeAxis,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold: Option<Threshold>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GaugeAxis {
    pub range: [f64; 2],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Threshold {
    pub line: Line,
    pub thickness: f64,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Line {
    pub color: String,
    pub width: u32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Layout {
    pub title: Option<Title>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barmode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xaxis: Option<AxisLayout>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaxis: Option<AxisLayout>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub shapes: Vec<Shape>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<Font>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct AxisLayout {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Title>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categoryorder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categoryarray: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tickangle: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tickprefix: Option<String>,
}

/// Horizontal reference line across the whole plot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Shape {
    #[serde(rename = "type")]
    pub kind: String,
    pub xref: String,
    pub x0: f64,
    pub x1: f64,
    pub yref: String,
    pub y0: f64,
    pub y1: f64,
    pub line: Line,
}

impl Shape {
    fn hline(y: f64) -> Self {
        Shape {
            kind: "line".into(),
            xref: "paper".into(),
            x0: 0.0,
            x1: 1.0,
            yref: "y".into(),
            y0: y,
            y1: y,
            line: Line {
                color: "black".into(),
                width: 2,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Font {
    pub size: u32,
}

fn to_f64(d: Decimal) -> f64 {
    d.to_f64().unwrap_or_default()
}

fn title(text: impl Into<String>) -> Option<Title> {
    Some(Title { text: text.into() })
}

/// Categories in the order the aggregation put them.
fn categories(rows: &[AggregatedRow]) -> Vec<&str> {
    let mut out: Vec<&str> = Vec::new();
    for r in rows {
        if !out.contains(&r.category.as_str()) {
            out.push(&r.category);
        }
    }
    out
}

fn place_rows<'a>(agg: &'a Aggregation, place: &str) -> Result<Vec<&'a AggregatedRow>, PipelineError> {
    let rows: Vec<&AggregatedRow> = agg.rows.iter().filter(|r| r.place == place).collect();
    if rows.is_empty() {
        return Err(PipelineError::Chart(format!(
            "no spending recorded for {} '{}'",
            agg.axis, place
        )));
    }
    Ok(rows)
}

/// Stacked bar chart: one bar per place, one segment per category.
///
/// `place_order` fixes the x-axis order and must name every place in the
/// aggregation.
pub fn bar_chart(
    agg: &Aggregation,
    place_order: &[String],
    config: &ReportConfig,
) -> Result<Figure, PipelineError> {
    if let Some(r) = agg.rows.iter().find(|r| !place_order.contains(&r.place)) {
        return Err(PipelineError::Chart(format!(
            "{} '{}' is missing from the place ordering",
            agg.axis, r.place
        )));
    }

    let mut data = Vec::new();
    for category in categories(&agg.rows) {
        let mut x = Vec::new();
        let mut y = Vec::new();
        for place in place_order {
            if let Some(r) = agg
                .rows
                .iter()
                .find(|r| &r.place == place && r.category == category)
            {
                x.push(place.clone());
                y.push(r.value(agg.per_day).map(to_f64));
            }
        }
        data.push(Trace::Bar {
            name: category.to_string(),
            x,
            y,
            marker: config.color_for(category).map(|c| Marker {
                color: c.to_string(),
            }),
        });
    }

    let label = agg.axis.label();
    let (heading, shapes): (String, Vec<Shape>) = if agg.per_day {
        (
            format!("Per Day Expenses by {}", label),
            config.daily_budget.map(Shape::hline).into_iter().collect(),
        )
    } else {
        (format!("Total Expenses by {}", label), Vec::new())
    };

    Ok(Figure {
        data,
        layout: Layout {
            title: title(heading),
            barmode: Some("stack".into()),
            xaxis: Some(AxisLayout {
                title: title(label),
                categoryorder: Some("array".into()),
                categoryarray: Some(place_order.to_vec()),
                tickangle: Some(315),
                ..Default::default()
            }),
            yaxis: Some(AxisLayout {
                title: title("Amount"),
                tickprefix: Some("$".into()),
                ..Default::default()
            }),
            shapes,
            font: Some(Font { size: 18 }),
        },
    })
}

/// Share of total spend per category, for one place or for all of them.
pub fn pie_chart(
    agg: &Aggregation,
    place: Option<&str>,
    config: &ReportConfig,
) -> Result<Figure, PipelineError> {
    let rows: Vec<&AggregatedRow> = match place {
        Some(p) => place_rows(agg, p)?,
        None => agg.rows.iter().collect(),
    };

    let mut labels = Vec::new();
    let mut values = Vec::new();
    for category in categories(&agg.rows) {
        let total: Decimal = rows
            .iter()
            .filter(|r| r.category == category)
            .map(|r| r.amount_total)
            .sum();
        if total > Decimal::ZERO {
            labels.push(category.to_string());
            values.push(to_f64(total));
        }
    }
    if labels.is_empty() {
        return Err(PipelineError::Chart("no positive spending to plot".into()));
    }
    let colors = labels
        .iter()
        .map(|l| config.color_for(l).map(String::from))
        .collect();

    let heading = match place {
        Some(p) => format!("Expenses by Category in {}", p),
        None => "Expenses by Category".to_string(),
    };
    Ok(Figure {
        data: vec![Trace::Pie {
            labels,
            values,
            marker: Some(PieMarker { colors }),
            sort: false,
        }],
        layout: Layout {
            title: title(heading),
            font: Some(Font { size: 18 }),
            ..Default::default()
        },
    })
}

/// JSON embedded in a `<script>` block must not close it early.
fn script_safe(json: String) -> String {
    json.replace("</", "<\\/")
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Dial showing one place's daily spend against the daily budget.
pub fn gauge_chart(
    agg: &Aggregation,
    place: &str,
    config: &ReportConfig,
) -> Result<Figure, PipelineError> {
    if !agg.per_day {
        return Err(PipelineError::Chart(
            "gauge needs a per-day aggregation".into(),
        ));
    }
    let mut per_day = Decimal::ZERO;
    for r in place_rows(agg, place)? {
        per_day += r.amount_per_day.ok_or_else(|| {
            PipelineError::Chart(format!("no nights recorded for {} '{}'", agg.axis, place))
        })?;
    }
    let value = to_f64(per_day);
    let upper = match config.daily_budget {
        Some(b) => (b * 2.0).max(value),
        None => value.abs().max(1.0) * 1.25,
    };

    Ok(Figure {
        data: vec![Trace::Indicator {
            mode: "gauge+number".into(),
            value,
            title: Title {
                text: format!("{} per day", place),
            },
            number: NumberFormat {
                prefix: "$".into(),
                valueformat: ".2f".into(),
            },
            gauge: Gauge {
                axis: GaugeAxis {
                    range: [0.0, upper],
                },
                threshold: config.daily_budget.map(|b| Threshold {
                    line: Line {
                        color: "red".into(),
                        width: 4,
                    },
                    thickness: 0.75,
                    value: b,
                }),
            },
        }],
        layout: Layout {
            title: title(format!("Daily Spend in {}", place)),
            font: Some(Font { size: 18 }),
            ..Default::default()
        },
    })
}

/// Standalone page that renders `fig` with plotly.js from the CDN.
pub fn to_html(fig: &Figure) -> Result<String, serde_json::Error> {
    let data = script_safe(serde_json::to_string(&fig.data)?);
    let layout = script_safe(serde_json::to_string(&fig.layout)?);
    let heading = escape_html(
        fig.layout
            .title
            .as_ref()
            .map(|t| t.text.as_str())
            .unwrap_or("tripspend"),
    );
    Ok(format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{heading}</title>
<script src="https://cdn.plot.ly/plotly-2.35.2.min.js"></script>
</head>
<body>
<div id="chart" style="width:100%;height:90vh;"></div>
<script>
Plotly.newPlot("chart", {data}, {layout});
</script>
</body>
</html>
"#
    ))
}
