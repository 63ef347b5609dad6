// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::errors::PipelineError;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Grouping dimension for spend aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    City,
    Country,
}

impl Axis {
    pub fn as_str(&self) -> &'static str {
        match self {
            Axis::City => "city",
            Axis::Country => "country",
        }
    }

    /// Column heading used in tables and chart axes.
    pub fn label(&self) -> &'static str {
        match self {
            Axis::City => "City",
            Axis::Country => "Country",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Axis {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "city" => Ok(Axis::City),
            "country" => Ok(Axis::Country),
            _ => Err(PipelineError::UnknownAxis(s.trim().to_string())),
        }
    }
}

/// One cleaned expense line from the ledger report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub date: NaiveDate,
    pub payee: String,
    pub category: String, // root token already stripped
    pub amount: Decimal,
    pub note: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
}

impl Transaction {
    pub fn place(&self, axis: Axis) -> Option<&str> {
        match axis {
            Axis::City => self.city.as_deref(),
            Axis::Country => self.country.as_deref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NightsRecord {
    pub axis: Axis,
    pub place: String,
    pub nights: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedRow {
    pub place: String,
    pub category: String,
    pub amount_total: Decimal,
    pub amount_per_day: Option<Decimal>,
}

impl AggregatedRow {
    /// The figure a chart should plot for this row.
    pub fn value(&self, per_day: bool) -> Option<Decimal> {
        if per_day {
            self.amount_per_day
        } else {
            Some(self.amount_total)
        }
    }
}

/// How the rows of an [`Aggregation`] were ordered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum CategoryOrdering {
    /// Every category was found in the priority list.
    Priority,
    /// Some categories were unmapped, so all rows fell back to
    /// descending category totals.
    TotalDescending { unmapped: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aggregation {
    pub axis: Axis,
    pub per_day: bool,
    pub ordering: CategoryOrdering,
    pub rows: Vec<AggregatedRow>,
}
