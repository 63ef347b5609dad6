// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate::aggregate;
use crate::config::ReportConfig;
use crate::db::{load_nights, load_transactions};
use crate::models::{Aggregation, Axis, CategoryOrdering};
use crate::nights::NightsTable;
use crate::utils::{fmt_amount, maybe_print_json, pretty_table, report_config};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("spend", sub)) => spend(conn, sub)?,
        _ => {}
    }
    Ok(())
}

/// Everything a report or chart needs, read fresh from the store.
pub struct Loaded {
    pub aggregation: Aggregation,
    pub nights: NightsTable,
    pub config: ReportConfig,
}

pub fn load_aggregation(conn: &Connection, sub: &clap::ArgMatches) -> Result<Loaded> {
    let axis: Axis = sub.get_one::<String>("axis").unwrap().parse()?;
    let per_day = sub.get_flag("per_day");
    let config = report_config(sub)?;
    let txs = load_transactions(conn)?;
    let nights = load_nights(conn)?;
    let aggregation = aggregate(&txs, &nights, axis, per_day, &config)?;
    Ok(Loaded {
        aggregation,
        nights,
        config,
    })
}

fn spend(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let Loaded { aggregation, .. } = load_aggregation(conn, sub)?;

    if maybe_print_json(json_flag, jsonl_flag, &aggregation)? {
        return Ok(());
    }
    if let CategoryOrdering::TotalDescending { unmapped } = &aggregation.ordering {
        println!(
            "Note: ordered by total; not in category_order: {}",
            unmapped.join(", ")
        );
    }
    let mut headers = vec![aggregation.axis.label(), "Category", "Total"];
    if aggregation.per_day {
        headers.push("Per Day");
    }
    let data: Vec<Vec<String>> = aggregation
        .rows
        .iter()
        .map(|r| {
            let mut row = vec![
                r.place.clone(),
                r.category.clone(),
                fmt_amount(Some(r.amount_total)),
            ];
            if aggregation.per_day {
                row.push(fmt_amount(r.amount_per_day));
            }
            row
        })
        .collect();
    println!("{}", pretty_table(&headers, data));
    Ok(())
}
