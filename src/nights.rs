// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::errors::PipelineError;
use crate::models::{Axis, NightsRecord};
use std::path::Path;

/// Nights spent per city and per country, in the order the places were
/// listed in the configuration (the trip order).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NightsTable {
    records: Vec<NightsRecord>,
}

impl NightsTable {
    pub fn new(records: Vec<NightsRecord>) -> Result<Self, PipelineError> {
        for (i, r) in records.iter().enumerate() {
            if records[..i]
                .iter()
                .any(|o| o.axis == r.axis && o.place == r.place)
            {
                return Err(PipelineError::config(format!(
                    "duplicate {} '{}' in nights table",
                    r.axis, r.place
                )));
            }
        }
        Ok(Self { records })
    }

    pub fn records(&self) -> &[NightsRecord] {
        &self.records
    }

    pub fn nights(&self, axis: Axis, place: &str) -> Option<u32> {
        self.records
            .iter()
            .find(|r| r.axis == axis && r.place == place)
            .map(|r| r.nights)
    }

    pub fn places(&self, axis: Axis) -> Vec<&str> {
        self.records
            .iter()
            .filter(|r| r.axis == axis)
            .map(|r| r.place.as_str())
            .collect()
    }
}

fn section_name(axis: Axis) -> &'static str {
    axis.label()
}

fn parse_nights_value(axis: Axis, key: &str, value: &toml::Value) -> Result<u32, PipelineError> {
    let parsed = match value {
        toml::Value::Integer(i) => u32::try_from(*i).ok(),
        toml::Value::String(s) => s.trim().parse::<u32>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| {
        PipelineError::config(format!(
            "[{}] {} = {} is not a non-negative integer",
            section_name(axis),
            key,
            value
        ))
    })
}

/// Parse a nights configuration document with `[City]` and `[Country]`
/// sections. Hyphens in place names become spaces so `Ho-Chi-Minh-City`
/// joins against the `Ho Chi Minh City` written in transaction metadata.
pub fn parse_nights(text: &str) -> Result<NightsTable, PipelineError> {
    let doc: toml::Table = text
        .parse()
        .map_err(|e: toml::de::Error| PipelineError::config(format!("invalid TOML: {}", e.message())))?;

    let mut records = Vec::new();
    for axis in [Axis::City, Axis::Country] {
        let name = section_name(axis);
        let section = doc
            .get(name)
            .ok_or_else(|| PipelineError::config(format!("missing [{}] section", name)))?
            .as_table()
            .ok_or_else(|| PipelineError::config(format!("[{}] must be a table", name)))?;
        for (key, value) in section {
            records.push(NightsRecord {
                axis,
                place: key.replace('-', " ").trim().to_string(),
                nights: parse_nights_value(axis, key, value)?,
            });
        }
    }
    NightsTable::new(records)
}

pub fn load_nights(path: &Path) -> Result<NightsTable, PipelineError> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        PipelineError::config(format!("cannot read {}: {}", path.display(), e))
    })?;
    parse_nights(&text)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
[City]
Hanoi = 4
Ho-Chi-Minh-City = 3
International = 0

[Country]
Vietnam = 7
Laos = "2"
"#;

    #[test]
    fn parses_both_sections_in_file_order() {
        let table = parse_nights(SAMPLE).unwrap();
        assert_eq!(
            table.places(Axis::City),
            vec!["Hanoi", "Ho Chi Minh City", "International"]
        );
        assert_eq!(table.places(Axis::Country), vec!["Vietnam", "Laos"]);
        assert_eq!(table.nights(Axis::City, "Ho Chi Minh City"), Some(3));
        assert_eq!(table.nights(Axis::Country, "Laos"), Some(2));
        assert_eq!(table.nights(Axis::Country, "Hanoi"), None);
    }

    #[test]
    fn missing_section_is_config_error() {
        let err = parse_nights("[City]\nHanoi = 1\n").unwrap_err();
        assert_eq!(err, PipelineError::config("missing [Country] section"));
    }

    #[test]
    fn negative_or_fractional_nights_rejected() {
        assert!(parse_nights("[City]\nHanoi = -1\n[Country]\n").is_err());
        assert!(parse_nights("[City]\nHanoi = 1.5\n[Country]\n").is_err());
        assert!(parse_nights("[City]\nHanoi = \"many\"\n[Country]\n").is_err());
    }

    #[test]
    fn duplicate_after_normalisation_rejected() {
        let err = parse_nights("[City]\nLuang-Prabang = 1\n\"Luang Prabang\" = 2\n[Country]\n")
            .unwrap_err();
        assert!(matches!(err, PipelineError::Config(m) if m.contains("duplicate city")));
    }
}
