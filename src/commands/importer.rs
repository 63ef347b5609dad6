// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::{replace_nights, replace_transactions};
use crate::ledger::{fetch_transactions, LedgerCommand, ReportFile, ReportProvider};
use crate::nights::load_nights;
use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::Path;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    let provider: Box<dyn ReportProvider> = if let Some(journal) = m.get_one::<String>("ledger") {
        let mut cmd = LedgerCommand::new(journal.trim());
        if let Some(bin) = m.get_one::<String>("ledger_bin") {
            cmd.binary = bin.trim().to_string();
        }
        Box::new(cmd)
    } else {
        let path = m.get_one::<String>("report").unwrap().trim();
        Box::new(ReportFile::new(path))
    };
    let nights_path = m.get_one::<String>("nights").unwrap().trim();

    // Parse everything before touching the database so a bad record
    // leaves the previous import intact.
    let txs = fetch_transactions(provider.as_ref())
        .with_context(|| format!("Read expense report from {}", provider.describe()))?;
    let nights = load_nights(Path::new(nights_path))?;

    let n_tx = replace_transactions(conn, &txs)?;
    let n_nights = replace_nights(conn, &nights)?;
    println!(
        "Imported {} transactions and {} nights entries from {}",
        n_tx,
        n_nights,
        provider.describe()
    );
    Ok(())
}
