// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Reading and cleaning the ledger expense report.

use crate::category::normalize_category;
use crate::errors::PipelineError;
use crate::metadata;
use crate::models::Transaction;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Separator between report fields. Payees and notes routinely contain
/// commas, so the report uses the unit-separator symbol instead.
pub const FIELD_SEPARATOR: char = '\u{241F}';

/// `--csv-format` template handed to `ledger csv`. `\n` is expanded by
/// ledger itself.
pub const CSV_FORMAT: &str = " %(quoted(date))\u{241F} %(quoted(payee))\u{241F} %(quoted(display_account))\u{241F} %(quoted(quantity(scrub(display_amount))))\u{241F} %(quoted(join(note | xact.note)))\\n";

const FIELD_COUNT: usize = 5;
const DATE_FORMATS: &[&str] = &["%Y/%m/%d", "%Y-%m-%d", "%m/%d/%Y"];

/// Anything that can hand over the raw expense report text.
pub trait ReportProvider {
    fn fetch(&self) -> Result<String, PipelineError>;

    fn describe(&self) -> String;
}

/// Runs the `ledger` binary against a journal file.
#[derive(Debug, Clone)]
pub struct LedgerCommand {
    pub binary: String,
    pub journal: PathBuf,
    pub query: Vec<String>,
}

impl LedgerCommand {
    pub fn new(journal: impl Into<PathBuf>) -> Self {
        Self {
            binary: "ledger".to_string(),
            journal: journal.into(),
            query: vec!["-X".into(), "$".into(), "^Expenses".into()],
        }
    }

    pub fn args(&self) -> Vec<String> {
        let mut args = vec![
            "-f".to_string(),
            self.journal.display().to_string(),
            "csv".to_string(),
        ];
        args.extend(self.query.iter().cloned());
        args.push("--csv-format".to_string());
        args.push(CSV_FORMAT.to_string());
        args
    }
}

impl ReportProvider for LedgerCommand {
    fn fetch(&self) -> Result<String, PipelineError> {
        let out = Command::new(&self.binary)
            .args(self.args())
            .output()
            .map_err(|e| PipelineError::Provider(format!("cannot run {}: {}", self.binary, e)))?;
        if !out.status.success() {
            return Err(PipelineError::Provider(format!(
                "{} exited with {}: {}",
                self.binary,
                out.status,
                String::from_utf8_lossy(&out.stderr).trim()
            )));
        }
        String::from_utf8(out.stdout)
            .map_err(|e| PipelineError::Provider(format!("report is not UTF-8: {}", e)))
    }

    fn describe(&self) -> String {
        format!("{} -f {}", self.binary, self.journal.display())
    }
}

/// A report previously saved to disk (or a test fixture).
#[derive(Debug, Clone)]
pub struct ReportFile {
    pub path: PathBuf,
}

impl ReportFile {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl ReportProvider for ReportFile {
    fn fetch(&self) -> Result<String, PipelineError> {
        std::fs::read_to_string(&self.path).map_err(|e| {
            PipelineError::Provider(format!("cannot read {}: {}", self.path.display(), e))
        })
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

fn clean_field(raw: &str) -> &str {
    raw.trim().trim_start_matches('"').trim_end_matches('"')
}

fn parse_report_date(s: &str, line: usize) -> Result<NaiveDate, PipelineError> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .ok_or_else(|| PipelineError::parse(line, format!("invalid date '{}'", s)))
}

fn parse_report_amount(s: &str, line: usize) -> Result<Decimal, PipelineError> {
    let digits: String = s
        .chars()
        .filter(|c| !matches!(c, '$' | ',') && !c.is_whitespace())
        .collect();
    digits
        .parse::<Decimal>()
        .map_err(|_| PipelineError::parse(line, format!("invalid amount '{}'", s)))
}

/// Parse one report line (1-based `line` for error messages).
pub fn parse_line(raw: &str, line: usize) -> Result<Transaction, PipelineError> {
    let fields: Vec<&str> = raw.split(FIELD_SEPARATOR).collect();
    if fields.len() != FIELD_COUNT {
        return Err(PipelineError::parse(
            line,
            format!("expected {} fields, found {}", FIELD_COUNT, fields.len()),
        ));
    }
    let meta = metadata::repair(clean_field(fields[4]), line)?;
    Ok(Transaction {
        date: parse_report_date(clean_field(fields[0]), line)?,
        payee: clean_field(fields[1]).trim().to_string(),
        category: normalize_category(clean_field(fields[2])),
        amount: parse_report_amount(clean_field(fields[3]), line)?,
        note: meta.note,
        country: meta.country,
        city: meta.city,
    })
}

/// Parse a whole report. Blank lines are skipped; any malformed line
/// aborts the parse.
pub fn parse_report(text: &str) -> Result<Vec<Transaction>, PipelineError> {
    text.lines()
        .enumerate()
        .filter(|(_, l)| !l.trim().is_empty())
        .map(|(i, l)| parse_line(l, i + 1))
        .collect()
}

pub fn fetch_transactions(provider: &dyn ReportProvider) -> Result<Vec<Transaction>, PipelineError> {
    let text = provider.fetch()?;
    let txs = parse_report(&text)?;
    log::info!("parsed {} transactions from {}", txs.len(), provider.describe());
    Ok(txs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn line(fields: [&str; 5]) -> String {
        fields.join(FIELD_SEPARATOR.to_string().as_str())
    }

    #[test]
    fn parses_quoted_line_with_escaped_metadata() {
        let raw = line([
            "\"2023/11/02\"",
            " \"Pho 24\"",
            " \"Expenses:Food & Drink\"",
            " \"12.50\"",
            r#" "Lunch\nCountry: Vietnam\nCity: Hanoi""#,
        ]);
        let tx = parse_line(&raw, 1).unwrap();
        assert_eq!(tx.date, NaiveDate::from_ymd_opt(2023, 11, 2).unwrap());
        assert_eq!(tx.payee, "Pho 24");
        assert_eq!(tx.category, "Food & Drink");
        assert_eq!(tx.amount, Decimal::from_str("12.50").unwrap());
        assert_eq!(tx.note.as_deref(), Some("Lunch"));
        assert_eq!(tx.country.as_deref(), Some("Vietnam"));
        assert_eq!(tx.city.as_deref(), Some("Hanoi"));
    }

    #[test]
    fn missing_metadata_propagates_nulls() {
        let raw = line(["2023-11-03", "ATM", "Expenses:ATM Fees", "$1,005.00", "\"\""]);
        let tx = parse_line(&raw, 1).unwrap();
        assert_eq!(tx.amount, Decimal::from_str("1005.00").unwrap());
        assert_eq!((tx.note, tx.country, tx.city), (None, None, None));
    }

    #[test]
    fn wrong_field_count_names_the_line() {
        let text = format!("\n{}\n", "2023/11/02\u{241F}Shop\u{241F}Expenses:Misc");
        let err = parse_report(&text).unwrap_err();
        assert_eq!(err, PipelineError::parse(2, "expected 5 fields, found 3"));
    }

    #[test]
    fn bad_amount_is_parse_error() {
        let raw = line(["2023/11/02", "Shop", "Expenses:Misc", "abc", ""]);
        assert!(matches!(parse_line(&raw, 4), Err(PipelineError::Parse { line: 4, .. })));
    }

    #[test]
    fn ledger_command_args_carry_format_template() {
        let cmd = LedgerCommand::new("/tmp/trip.ledger");
        let args = cmd.args();
        assert_eq!(&args[..3], &["-f", "/tmp/trip.ledger", "csv"]);
        assert_eq!(args.last().map(String::as_str), Some(CSV_FORMAT));
    }
}
