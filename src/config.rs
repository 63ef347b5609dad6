// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::errors::PipelineError;
use regex::Regex;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

pub const DEFAULT_CATEGORY_ORDER: &[&str] = &[
    "Accomodation",
    "Food & Drink",
    "Activities",
    "Transportation:Plane",
    "Transportation:Boat",
    "Transportation:Bus",
    "Transportation:Train",
    "Transportation:City Transit",
    "Untracked Cash",
    "ATM Fees",
    "Visa Fees",
    "Insurance",
    "Purchases",
    "Misc",
];

const DEFAULT_CATEGORY_COLORS: &[(&str, &str)] = &[
    ("Accomodation", "#3366CC"),
    ("Food & Drink", "#DC3912"),
    ("Activities", "#FF9900"),
    ("Transportation:Plane", "#109618"),
    ("Transportation:Boat", "#0099C6"),
    ("Transportation:Bus", "#B82E2E"),
    ("Transportation:Train", "#EECA3B"),
    ("Transportation:City Transit", "#DD4477"),
    ("Untracked Cash", "#66AA00"),
    ("ATM Fees", "#990099"),
    ("Purchases", "#316395"),
    ("Misc", "#8C564B"),
];

pub const DEFAULT_EXCLUDED_CATEGORIES: &str = "<Revalued>|<Adjustment>";
pub const DEFAULT_DAILY_BUDGET: f64 = 65.0;

/// Knobs for aggregation and chart building.
///
/// Read from the optional `[Report]` section of the nights TOML; every key
/// falls back to the built-in travel defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub category_order: Vec<String>,
    pub category_colors: BTreeMap<String, String>,
    pub excluded_categories: String,
    pub excluded_places: Vec<String>,
    pub daily_budget: Option<f64>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            category_order: DEFAULT_CATEGORY_ORDER.iter().map(|s| s.to_string()).collect(),
            category_colors: DEFAULT_CATEGORY_COLORS
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            excluded_categories: DEFAULT_EXCLUDED_CATEGORIES.to_string(),
            excluded_places: vec!["International".to_string()],
            daily_budget: Some(DEFAULT_DAILY_BUDGET),
        }
    }
}

#[derive(Deserialize)]
struct ConfigFile {
    #[serde(rename = "Report", default)]
    report: Option<ReportConfig>,
}

impl ReportConfig {
    pub fn parse(text: &str) -> Result<Self, PipelineError> {
        let file: ConfigFile = toml::from_str(text)
            .map_err(|e| PipelineError::config(format!("invalid [Report] section: {}", e.message())))?;
        let cfg = file.report.unwrap_or_default();
        cfg.exclusion_regex()?;
        Ok(cfg)
    }

    pub fn load(path: &Path) -> Result<Self, PipelineError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            PipelineError::config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::parse(&text)
    }

    /// Compiled form of `excluded_categories`. An empty pattern excludes
    /// nothing.
    pub fn exclusion_regex(&self) -> Result<Option<Regex>, PipelineError> {
        let pat = self.excluded_categories.trim();
        if pat.is_empty() {
            return Ok(None);
        }
        Regex::new(pat).map(Some).map_err(|e| {
            PipelineError::config(format!("invalid excluded_categories pattern '{}': {}", pat, e))
        })
    }

    pub fn is_place_excluded(&self, place: &str) -> bool {
        self.excluded_places.iter().any(|p| p == place)
    }

    pub fn priority_of(&self, category: &str) -> Option<usize> {
        self.category_order.iter().position(|c| c == category)
    }

    pub fn color_for(&self, category: &str) -> Option<&str> {
        self.category_colors.get(category).map(String::as_str)
    }
}
