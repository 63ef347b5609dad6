// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Repair of the free-text note blob attached to each ledger posting.
//!
//! The blob is expected as `Note\nCountry: X\nCity: Y`, but exports in the
//! wild drop the note line or emit the city before the country. [`repair`]
//! normalises all of these into a [`Metadata`] triple.

use crate::category::{normalize_city, normalize_country};
use crate::errors::PipelineError;

const CITY_LABEL: &str = "City:";
const COUNTRY_LABEL: &str = "Country:";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    pub note: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
}

#[cfg(test)]
impl Metadata {
    fn to_blob(&self) -> String {
        format!(
            "{}\n{} {}\n{} {}",
            self.note.as_deref().unwrap_or(""),
            COUNTRY_LABEL,
            self.country.as_deref().unwrap_or(""),
            CITY_LABEL,
            self.city.as_deref().unwrap_or("")
        )
    }
}

fn is_label(slot: &Option<String>) -> bool {
    slot.as_deref()
        .is_some_and(|s| s.starts_with(CITY_LABEL) || s.starts_with(COUNTRY_LABEL))
}

fn clean(raw: &str) -> String {
    raw.trim().trim_matches('"').trim().to_string()
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() { None } else { Some(s) }
}

/// Split a note blob into note, country and city.
///
/// Literal `\n` escape sequences (as printed by the ledger report) count as
/// line breaks. An empty blob yields an all-`None` triple. `line` is only
/// used to point at the offending record in errors.
pub fn repair(blob: &str, line: usize) -> Result<Metadata, PipelineError> {
    let unescaped = blob.replace("\\n", "\n");
    let mut lines: Vec<String> = unescaped.split('\n').map(clean).collect();
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    if lines.is_empty() {
        return Ok(Metadata::default());
    }
    if lines.len() > 3 {
        return Err(PipelineError::parse(
            line,
            format!("metadata has {} lines, expected at most 3", lines.len()),
        ));
    }

    let mut slots: [Option<String>; 3] = [None, None, None];
    for (slot, value) in slots.iter_mut().zip(lines) {
        *slot = Some(value);
    }

    // Note omitted: the first line is already a label.
    if is_label(&slots[0]) {
        if slots[2].is_some() {
            return Err(PipelineError::parse(
                line,
                "metadata has three labelled lines and no room for a note",
            ));
        }
        slots.rotate_right(1);
    }

    // City and country arrived in the wrong order.
    if slots[1].as_deref().is_some_and(|s| s.starts_with(CITY_LABEL)) {
        slots.swap(1, 2);
    }

    let [note, country, city] = slots;
    Ok(Metadata {
        note: note.and_then(non_empty),
        country: country.map(|c| normalize_country(&c)).and_then(non_empty),
        city: city.map(|c| normalize_city(&c)).and_then(non_empty),
    })
}
