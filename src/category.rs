// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Account-hierarchy prefix stripping for category and place labels.

pub const EXPENSES_ROOT: &str = "Expenses";
pub const CITY_ROOT: &str = "City";
pub const COUNTRY_ROOT: &str = "Country";

/// Strip `root` and the `:` that follows it, returning the trimmed remainder.
///
/// A bare root yields `""`. Labels that do not start with `root` (as a whole
/// segment) come back trimmed but otherwise unchanged, so bookkeeping
/// pseudo-accounts such as `<Revalued>` survive for later filtering.
pub fn strip_root(label: &str, root: &str) -> String {
    let trimmed = label.trim();
    match trimmed.strip_prefix(root) {
        Some(rest) if rest.is_empty() => String::new(),
        Some(rest) => match rest.trim_start().strip_prefix(':') {
            Some(tail) => tail.trim().to_string(),
            None => trimmed.to_string(),
        },
        None => trimmed.to_string(),
    }
}

pub fn normalize_category(label: &str) -> String {
    strip_root(label, EXPENSES_ROOT)
}

pub fn normalize_city(label: &str) -> String {
    strip_root(label, CITY_ROOT)
}

pub fn normalize_country(label: &str) -> String {
    strip_root(label, COUNTRY_ROOT)
}
