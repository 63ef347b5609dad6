// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate::place_order;
use crate::charts::{bar_chart, gauge_chart, pie_chart, to_html, Figure};
use crate::commands::reports::{load_aggregation, Loaded};
use anyhow::{anyhow, Context, Result};
use rusqlite::Connection;
use std::path::Path;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let (kind, sub) = m
        .subcommand()
        .ok_or_else(|| anyhow!("Choose a chart: bar|pie|gauge"))?;
    let Loaded {
        aggregation,
        nights,
        config,
    } = load_aggregation(conn, sub)?;
    let place = sub.get_one::<String>("place").map(|s| s.trim());

    let fig: Figure = match kind {
        "bar" => {
            let mut agg = aggregation;
            if let Some(p) = place {
                agg.rows.retain(|r| r.place == p);
            }
            let order = place_order(&agg, &nights, &config, sub.get_flag("trip_order"));
            bar_chart(&agg, &order, &config)?
        }
        "pie" => pie_chart(&aggregation, place, &config)?,
        "gauge" => {
            let p = place.ok_or_else(|| anyhow!("gauge needs --place"))?;
            gauge_chart(&aggregation, p, &config)?
        }
        other => return Err(anyhow!("Unknown chart '{}'", other)),
    };

    let out = sub.get_one::<String>("out").unwrap().trim();
    write_figure(&fig, Path::new(out))?;
    println!("Wrote {} chart to {}", kind, out);
    Ok(())
}

/// `.json` gets the raw figure, anything else a standalone HTML page.
pub fn write_figure(fig: &Figure, out: &Path) -> Result<()> {
    let is_json = out
        .extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    let body = if is_json {
        serde_json::to_string_pretty(fig)?
    } else {
        to_html(fig)?
    };
    std::fs::write(out, body).with_context(|| format!("Write chart to {}", out.display()))?;
    Ok(())
}
