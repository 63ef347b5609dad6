// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Spend aggregation by place and category.

use crate::config::ReportConfig;
use crate::errors::PipelineError;
use crate::models::{AggregatedRow, Aggregation, Axis, CategoryOrdering, Transaction};
use crate::nights::NightsTable;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, BTreeSet};

/// Group `transactions` by `(place on axis, category)` and sum the amounts.
///
/// Transactions whose category matches the configured exclusion pattern,
/// or whose place is unknown or excluded, are left out. With `per_day` each
/// total is divided by the nights spent at that place; places with no (or
/// zero) nights keep a `None` per-day amount.
///
/// Rows are ordered by the configured category priority. If any category is
/// missing from that list, every row is instead ordered by descending
/// category total. Within a category rows keep place-name order.
pub fn aggregate(
    transactions: &[Transaction],
    nights: &NightsTable,
    axis: Axis,
    per_day: bool,
    config: &ReportConfig,
) -> Result<Aggregation, PipelineError> {
    let exclusion = config.exclusion_regex()?;

    let mut grouped: BTreeMap<(String, String), Decimal> = BTreeMap::new();
    for tx in transactions {
        if exclusion.as_ref().is_some_and(|re| re.is_match(&tx.category)) {
            log::debug!("skipping adjustment '{}' on {}", tx.category, tx.date);
            continue;
        }
        let Some(place) = tx.place(axis) else {
            log::debug!("skipping '{}' on {}: no {}", tx.payee, tx.date, axis);
            continue;
        };
        if config.is_place_excluded(place) {
            continue;
        }
        *grouped
            .entry((place.to_string(), tx.category.clone()))
            .or_insert(Decimal::ZERO) += tx.amount;
    }

    let mut gaps: BTreeSet<&str> = BTreeSet::new();
    let mut rows = Vec::with_capacity(grouped.len());
    for ((place, category), total) in &grouped {
        let amount_per_day = if per_day {
            match nights.nights(axis, place) {
                Some(n) if n > 0 => Some(*total / Decimal::from(n)),
                Some(_) => None,
                None => {
                    gaps.insert(place);
                    None
                }
            }
        } else {
            None
        };
        rows.push(AggregatedRow {
            place: place.clone(),
            category: category.clone(),
            amount_total: *total,
            amount_per_day,
        });
    }
    for place in gaps {
        log::warn!("no nights recorded for {} '{}'; per-day amount left empty", axis, place);
    }

    let ordering = order_by_category(&mut rows, config);
    Ok(Aggregation {
        axis,
        per_day,
        ordering,
        rows,
    })
}

fn order_by_category(rows: &mut [AggregatedRow], config: &ReportConfig) -> CategoryOrdering {
    let unmapped: Vec<String> = rows
        .iter()
        .filter(|r| config.priority_of(&r.category).is_none())
        .map(|r| r.category.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    if unmapped.is_empty() {
        rows.sort_by_key(|r| config.priority_of(&r.category));
        return CategoryOrdering::Priority;
    }

    log::info!(
        "categories {:?} not in the priority list; ordering by total instead",
        unmapped
    );
    let mut totals: BTreeMap<&str, Decimal> = BTreeMap::new();
    for r in rows.iter() {
        *totals.entry(r.category.as_str()).or_insert(Decimal::ZERO) += r.amount_total;
    }
    let totals: BTreeMap<String, Decimal> =
        totals.into_iter().map(|(k, v)| (k.to_string(), v)).collect();
    rows.sort_by(|a, b| {
        totals[&b.category]
            .cmp(&totals[&a.category])
            .then_with(|| a.category.cmp(&b.category))
    });
    CategoryOrdering::TotalDescending { unmapped }
}

/// Places of an aggregation in display order.
///
/// `trip_order` follows the nights file (excluded places dropped, places
/// without nights appended by name). Otherwise places are sorted by their
/// plotted total, largest first.
pub fn place_order(
    agg: &Aggregation,
    nights: &NightsTable,
    config: &ReportConfig,
    trip_order: bool,
) -> Vec<String> {
    let present: BTreeSet<&str> = agg.rows.iter().map(|r| r.place.as_str()).collect();

    if trip_order {
        let mut order: Vec<String> = nights
            .places(agg.axis)
            .into_iter()
            .filter(|p| !config.is_place_excluded(p))
            .map(String::from)
            .collect();
        for p in present {
            if !order.iter().any(|o| o == p) {
                order.push(p.to_string());
            }
        }
        return order;
    }

    let mut totals: BTreeMap<&str, Decimal> = BTreeMap::new();
    for r in &agg.rows {
        *totals.entry(r.place.as_str()).or_insert(Decimal::ZERO) +=
            r.value(agg.per_day).unwrap_or(Decimal::ZERO);
    }
    let mut places: Vec<(&str, Decimal)> = totals.into_iter().collect();
    places.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    places.into_iter().map(|(p, _)| p.to_string()).collect()
}
