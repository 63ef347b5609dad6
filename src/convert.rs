// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! MoneyWallet CSV export to ledger journal conversion.

use crate::errors::PipelineError;
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::fmt::Write as _;
use std::io::Read;

pub const CASH_ACCOUNT: &str = "Assets:Cash";

/// Account renames applied to every posting, longest match first.
pub const ACCOUNT_RENAMES: &[(&str, &str)] = &[
    ("Equity:Unknown", "Assets:Cash"),
    (
        "Expenses:City Transit",
        "Expenses:Transportation:City Transit",
    ),
    ("Expenses:Train", "Expenses:Transportation:Train"),
];

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S"];

#[derive(Debug, Deserialize)]
struct WalletRow {
    datetime: String,
    category: String,
    money: String,
    currency: String,
    wallet: String,
    #[serde(default)]
    place: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    note: Option<String>,
}

pub fn rename_account(account: &str) -> String {
    for (from, to) in ACCOUNT_RENAMES {
        if account == *from {
            return to.to_string();
        }
        if let Some(rest) = account.strip_prefix(from).filter(|r| r.starts_with(':')) {
            return format!("{}{}", to, rest);
        }
    }
    account.to_string()
}

fn parse_wallet_date(s: &str, line: usize) -> Result<NaiveDate, PipelineError> {
    let s = s.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok().map(|dt| dt.date()))
        .or_else(|| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
        .ok_or_else(|| PipelineError::parse(line, format!("invalid datetime '{}'", s)))
}

fn non_empty(s: &Option<String>) -> Option<&str> {
    s.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Convert a MoneyWallet CSV export into ledger journal text.
///
/// Each row becomes one entry whose comment lines carry the note and the
/// `Country:`/`City:` tags (wallet and place columns), which is the shape
/// the expense report later reads back as metadata.
pub fn convert_moneywallet<R: Read>(input: R) -> Result<String, PipelineError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let mut out = String::new();
    for (i, result) in rdr.deserialize::<WalletRow>().enumerate() {
        let line = i + 2;
        let row = result.map_err(|e| PipelineError::parse(line, e.to_string()))?;
        let date = parse_wallet_date(&row.datetime, line)?;
        let amount = row
            .money
            .trim()
            .parse::<Decimal>()
            .map_err(|_| PipelineError::parse(line, format!("invalid money '{}'", row.money)))?;
        let category = row.category.trim();
        if category.is_empty() {
            return Err(PipelineError::parse(line, "empty category"));
        }
        let payee = non_empty(&row.description)
            .unwrap_or(category)
            .replace('*', "");
        let account = rename_account(&format!("Expenses:{}", category));

        // Writing to a String cannot fail.
        let _ = writeln!(out, "{} {}", date.format("%Y/%m/%d"), payee);
        if let Some(note) = non_empty(&row.note) {
            let _ = writeln!(out, "    ; {}", note.replace('*', ""));
        }
        if !row.wallet.trim().is_empty() {
            let _ = writeln!(out, "    ; Country: {}", row.wallet.trim());
        }
        if let Some(place) = non_empty(&row.place) {
            let _ = writeln!(out, "    ; City: {}", place);
        }
        let _ = writeln!(out, "    {}  {} {}", account, amount, row.currency.trim());
        let _ = writeln!(out, "    {}", CASH_ACCOUNT);
        out.push('\n');
    }
    log::info!("converted MoneyWallet export into ledger entries");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renames_whole_segments_only() {
        assert_eq!(rename_account("Equity:Unknown"), CASH_ACCOUNT);
        assert_eq!(
            rename_account("Expenses:Train"),
            "Expenses:Transportation:Train"
        );
        assert_eq!(
            rename_account("Expenses:Train:Sleeper"),
            "Expenses:Transportation:Train:Sleeper"
        );
        assert_eq!(rename_account("Expenses:Trainers"), "Expenses:Trainers");
    }

    #[test]
    fn converts_rows_into_entries() {
        let csv = "wallet,currency,category,datetime,money,description,place,note\n\
                   Vietnam,USD,Food & Drink,2023-11-02 12:30:00,12.50,Pho* 24,Hanoi,Lunch\n\
                   Laos,USD,Train,2023-11-05 08:00:00,30,,,\n";
        let journal = convert_moneywallet(csv.as_bytes()).unwrap();
        let expected = "2023/11/02 Pho 24\n    ; Lunch\n    ; Country: Vietnam\n    ; City: Hanoi\n    Expenses:Food & Drink  12.50 USD\n    Assets:Cash\n\n\
                        2023/11/05 Train\n    ; Country: Laos\n    Expenses:Transportation:Train  30 USD\n    Assets:Cash\n\n";
        assert_eq!(journal, expected);
        assert_eq!(journal.lines().filter(|l| l.trim() == CASH_ACCOUNT).count(), 2);
    }

    #[test]
    fn bad_money_reports_csv_line() {
        let csv = "wallet,currency,category,datetime,money\nVietnam,USD,Misc,2023-11-02,lots\n";
        let err = convert_moneywallet(csv.as_bytes()).unwrap_err();
        assert_eq!(err, PipelineError::parse(2, "invalid money 'lots'"));
    }
}
