// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::{load_nights, load_transactions};
use crate::models::Axis;
use crate::utils::{pretty_table, report_config};
use anyhow::Result;
use rusqlite::Connection;
use std::collections::BTreeSet;

/// One row per problem: `[issue, detail]`.
pub fn find_issues(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<Vec<String>>> {
    let config = report_config(sub)?;
    let exclusion = config.exclusion_regex()?;
    let txs = load_transactions(conn)?;
    let nights = load_nights(conn)?;
    let mut rows = Vec::new();

    // 1) Places with spending but no nights entry
    for axis in [Axis::City, Axis::Country] {
        let places: BTreeSet<&str> = txs
            .iter()
            .filter_map(|t| t.place(axis))
            .filter(|p| !config.is_place_excluded(p))
            .collect();
        for p in places {
            if nights.nights(axis, p).is_none() {
                rows.push(vec![format!("{}_without_nights", axis), p.to_string()]);
            }
        }
    }

    // 2) Categories that force the total-descending fallback
    let unranked: BTreeSet<&str> = txs
        .iter()
        .map(|t| t.category.as_str())
        .filter(|c| !exclusion.as_ref().is_some_and(|re| re.is_match(c)))
        .filter(|c| config.priority_of(c).is_none())
        .collect();
    for c in unranked {
        rows.push(vec!["category_not_ranked".into(), c.to_string()]);
    }

    // 3) Spending with no place at all
    let homeless = txs.iter().filter(|t| t.city.is_none() && t.country.is_none()).count();
    if homeless > 0 {
        rows.push(vec![
            "transaction_without_place".into(),
            format!("{} transactions", homeless),
        ]);
    }
    Ok(rows)
}

pub fn handle(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let rows = find_issues(conn, sub)?;
    if rows.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
