// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::Connection;
use std::io::Write;
use tempfile::NamedTempFile;
use tripspend::{cli, commands::importer, db};

const SEP: &str = "\u{241F}";

fn base_conn() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn
}

fn report_line(date: &str, payee: &str, account: &str, amount: &str, meta: &str) -> String {
    [date, payee, account, amount, meta]
        .iter()
        .map(|f| format!(" \"{}\"", f))
        .collect::<Vec<_>>()
        .join(SEP)
}

fn write_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", contents).unwrap();
    file.flush().unwrap();
    file
}

const NIGHTS: &str = "[City]\nHanoi = 2\nLuang-Prabang = 3\n\n[Country]\nVietnam = 2\nLaos = 3\n";

fn run_import(conn: &mut Connection, report: &NamedTempFile, nights: &NamedTempFile) -> anyhow::Result<()> {
    let report_path = report.path().to_str().unwrap().to_string();
    let nights_path = nights.path().to_str().unwrap().to_string();
    let matches = cli::build_cli().get_matches_from([
        "tripspend",
        "import",
        "--report",
        &format!("  {}  ", report_path),
        "--nights",
        &nights_path,
    ]);
    if let Some(("import", import_m)) = matches.subcommand() {
        importer::handle(conn, import_m)
    } else {
        panic!("no import subcommand");
    }
}

#[test]
fn import_cleans_report_and_stores_nights() {
    let mut conn = base_conn();
    let report = write_file(&format!(
        "{}\n{}\n\n{}\n",
        report_line("2023/11/02", "Pho 24", "Expenses:Food & Drink", "12.50", r"Lunch\nCountry: Vietnam\nCity: Hanoi"),
        report_line("2023/11/03", "Night bus", "Expenses:Transportation:Bus", "30", r"City: Luang Prabang\nCountry: Laos"),
        report_line("2023/11/04", "ATM", "Expenses:ATM Fees", "5", ""),
    ));
    let nights = write_file(NIGHTS);

    run_import(&mut conn, &report, &nights).unwrap();

    let txs = db::load_transactions(&conn).unwrap();
    assert_eq!(txs.len(), 3);
    assert_eq!(txs[0].category, "Food & Drink");
    assert_eq!(txs[0].note.as_deref(), Some("Lunch"));
    assert_eq!(txs[0].city.as_deref(), Some("Hanoi"));
    assert_eq!(txs[1].category, "Transportation:Bus");
    assert_eq!(txs[1].note, None);
    assert_eq!(txs[1].country.as_deref(), Some("Laos"));
    assert_eq!(txs[1].city.as_deref(), Some("Luang Prabang"));
    assert_eq!((txs[2].note.clone(), txs[2].country.clone(), txs[2].city.clone()), (None, None, None));

    let nights = db::load_nights(&conn).unwrap();
    assert_eq!(nights.places(tripspend::models::Axis::City), vec!["Hanoi", "Luang Prabang"]);
    assert_eq!(nights.nights(tripspend::models::Axis::Country, "Laos"), Some(3));
}

#[test]
fn reimport_replaces_previous_rows() {
    let mut conn = base_conn();
    let nights = write_file(NIGHTS);
    let first = write_file(&format!(
        "{}\n{}\n",
        report_line("2023/11/02", "A", "Expenses:Misc", "1", ""),
        report_line("2023/11/02", "B", "Expenses:Misc", "2", ""),
    ));
    run_import(&mut conn, &first, &nights).unwrap();

    let second = write_file(&report_line("2023/11/05", "C", "Expenses:Misc", "3", ""));
    run_import(&mut conn, &second, &nights).unwrap();

    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM ledger_expenses", [], |r| r.get(0))
        .unwrap();
    assert_eq!(count, 1);
    let nights_rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM place_nights", [], |r| r.get(0))
        .unwrap();
    assert_eq!(nights_rows, 4);
}

#[test]
fn malformed_line_aborts_and_keeps_previous_import() {
    let mut conn = base_conn();
    let nights = write_file(NIGHTS);
    let good = write_file(&report_line("2023/11/02", "A", "Expenses:Misc", "1", ""));
    run_import(&mut conn, &good, &nights).unwrap();

    let bad = write_file(&format!(
        "{}\n2023/11/03{}Broken{}Expenses:Misc\n",
        report_line("2023/11/02", "B", "Expenses:Misc", "2", ""),
        SEP,
        SEP
    ));
    let err = run_import(&mut conn, &bad, &nights).unwrap_err();
    assert!(format!("{:#}", err).contains("line 2: expected 5 fields, found 3"));

    let payees: Vec<String> = db::load_transactions(&conn)
        .unwrap()
        .into_iter()
        .map(|t| t.payee)
        .collect();
    assert_eq!(payees, vec!["A"]);
}

#[test]
fn missing_nights_section_is_reported() {
    let mut conn = base_conn();
    let report = write_file(&report_line("2023/11/02", "A", "Expenses:Misc", "1", ""));
    let nights = write_file("[City]\nHanoi = 2\n");
    let err = run_import(&mut conn, &report, &nights).unwrap_err();
    assert!(err.to_string().contains("missing [Country] section"));
}
