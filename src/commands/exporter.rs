// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::load_transactions;
use anyhow::{anyhow, Result};
use rusqlite::Connection;
use serde_json::json;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(conn, sub),
        _ => Ok(()),
    }
}

fn export_transactions(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().trim().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap().trim();
    if fmt != "csv" && fmt != "json" {
        return Err(anyhow!("Unknown format: {} (use csv|json)", fmt));
    }

    let txs = load_transactions(conn)?;
    if fmt == "csv" {
        let mut wtr = csv::Writer::from_path(out)?;
        wtr.write_record([
            "date", "payee", "category", "amount", "note", "country", "city",
        ])?;
        for t in &txs {
            wtr.write_record([
                t.date.to_string(),
                t.payee.clone(),
                t.category.clone(),
                t.amount.to_string(),
                t.note.clone().unwrap_or_default(),
                t.country.clone().unwrap_or_default(),
                t.city.clone().unwrap_or_default(),
            ])?;
        }
        wtr.flush()?;
    } else {
        let items: Vec<_> = txs
            .iter()
            .map(|t| {
                json!({
                    "date": t.date.to_string(), "payee": t.payee, "category": t.category,
                    "amount": t.amount.to_string(), "note": t.note, "country": t.country, "city": t.city
                })
            })
            .collect();
        std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
    }
    println!("Exported {} transactions to {}", txs.len(), out);
    Ok(())
}
