// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Axis, NightsRecord, Transaction};
use crate::nights::NightsTable;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::{params, Connection};
use std::fs;
use std::path::{Path, PathBuf};

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Tripspend", "tripspend"));

pub fn db_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("expenses.sqlite"))
}

pub fn open_or_init() -> Result<Connection> {
    open_at(&db_path()?)
}

pub fn open_at(path: &Path) -> Result<Connection> {
    let conn =
        Connection::open(path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    CREATE TABLE IF NOT EXISTS ledger_expenses(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        date TEXT NOT NULL,
        payee TEXT NOT NULL,
        category TEXT NOT NULL,
        amount TEXT NOT NULL,
        note TEXT,
        country TEXT,
        city TEXT
    );
    CREATE INDEX IF NOT EXISTS idx_ledger_expenses_city ON ledger_expenses(city);

    -- position keeps the trip order of the nights file
    CREATE TABLE IF NOT EXISTS place_nights(
        axis TEXT NOT NULL CHECK(axis IN ('city','country')),
        place TEXT NOT NULL,
        nights INTEGER NOT NULL CHECK(nights >= 0),
        position INTEGER NOT NULL,
        PRIMARY KEY(axis, place)
    );
    "#,
    )?;
    Ok(())
}

/// Replace the whole expenses table with `txs`.
pub fn replace_transactions(conn: &mut Connection, txs: &[Transaction]) -> Result<usize> {
    let tx = conn.transaction()?;
    tx.execute("DELETE FROM ledger_expenses", [])?;
    {
        let mut stmt = tx.prepare(
            "INSERT INTO ledger_expenses(date, payee, category, amount, note, country, city) \
             VALUES (?1,?2,?3,?4,?5,?6,?7)",
        )?;
        for t in txs {
            stmt.execute(params![
                t.date.to_string(),
                t.payee,
                t.category,
                t.amount.to_string(),
                t.note,
                t.country,
                t.city
            ])?;
        }
    }
    tx.commit()?;
    Ok(txs.len())
}

/// Replace the whole nights table with `nights`.
pub fn replace_nights(conn: &mut Connection, nights: &NightsTable) -> Result<usize> {
    let tx = conn.transaction()?;
    tx.execute("DELETE FROM place_nights", [])?;
    {
        let mut stmt = tx.prepare(
            "INSERT INTO place_nights(axis, place, nights, position) VALUES (?1,?2,?3,?4)",
        )?;
        for (i, r) in nights.records().iter().enumerate() {
            stmt.execute(params![r.axis.as_str(), r.place, r.nights, i as i64])?;
        }
    }
    tx.commit()?;
    Ok(nights.records().len())
}

pub fn load_transactions(conn: &Connection) -> Result<Vec<Transaction>> {
    let mut stmt = conn.prepare(
        "SELECT date, payee, category, amount, note, country, city FROM ledger_expenses ORDER BY id",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, String>(3)?,
            r.get::<_, Option<String>>(4)?,
            r.get::<_, Option<String>>(5)?,
            r.get::<_, Option<String>>(6)?,
        ))
    })?;
    let mut out = Vec::new();
    for row in rows {
        let (d, payee, category, amt, note, country, city) = row?;
        out.push(Transaction {
            date: crate::utils::parse_date(&d)?,
            amount: crate::utils::parse_decimal(&amt)
                .with_context(|| format!("Invalid amount '{}' for {}", amt, payee))?,
            payee,
            category,
            note,
            country,
            city,
        });
    }
    Ok(out)
}

pub fn load_nights(conn: &Connection) -> Result<NightsTable> {
    let mut stmt =
        conn.prepare("SELECT axis, place, nights FROM place_nights ORDER BY position")?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, u32>(2)?,
        ))
    })?;
    let mut records = Vec::new();
    for row in rows {
        let (axis, place, nights) = row?;
        records.push(NightsRecord {
            axis: axis.parse::<Axis>()?,
            place,
            nights,
        });
    }
    Ok(NightsTable::new(records)?)
}
