// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, ArgGroup, Command};

fn axis_arg() -> Arg {
    Arg::new("axis")
        .long("axis")
        .help("Group by city or country")
        .default_value("city")
}

fn config_arg() -> Arg {
    Arg::new("config")
        .long("config")
        .help("TOML file with an optional [Report] section")
}

fn json_args() -> [Arg; 2] {
    [
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .conflicts_with("jsonl"),
        Arg::new("jsonl").long("jsonl").action(ArgAction::SetTrue),
    ]
}

fn chart_cmd(name: &'static str, about: &'static str) -> Command {
    Command::new(name)
        .about(about)
        .arg(axis_arg())
        .arg(
            Arg::new("per_day")
                .long("per-day")
                .action(ArgAction::SetTrue)
                .help("Divide totals by nights spent"),
        )
        .arg(
            Arg::new("trip_order")
                .long("trip-order")
                .action(ArgAction::SetTrue)
                .help("Order places as listed in the nights file"),
        )
        .arg(Arg::new("place").long("place").help("Restrict to one place"))
        .arg(config_arg())
        .arg(
            Arg::new("out")
                .long("out")
                .required(true)
                .help("Output file (.html or .json)"),
        )
}

pub fn build_cli() -> Command {
    Command::new("tripspend")
        .about("Travel expense pipeline: ledger report -> SQLite -> per-place spend charts")
        .version(clap::crate_version!())
        .arg(
            Arg::new("db")
                .long("db")
                .global(true)
                .help("SQLite database path (defaults to the platform data dir)"),
        )
        .subcommand(Command::new("init").about("Create the database"))
        .subcommand(
            Command::new("import")
                .about("Clean the ledger expense report and store it with the nights table")
                .arg(Arg::new("ledger").long("ledger").help("Ledger journal to report on"))
                .arg(Arg::new("report").long("report").help("Saved report output"))
                .group(
                    ArgGroup::new("source")
                        .args(["ledger", "report"])
                        .required(true),
                )
                .arg(
                    Arg::new("nights")
                        .long("nights")
                        .required(true)
                        .help("TOML file with [City] and [Country] nights"),
                )
                .arg(
                    Arg::new("ledger_bin")
                        .long("ledger-bin")
                        .default_value("ledger"),
                ),
        )
        .subcommand(
            Command::new("report")
                .about("Spending tables")
                .subcommand(
                    Command::new("spend")
                        .about("Spend per place and category")
                        .arg(axis_arg())
                        .arg(
                            Arg::new("per_day")
                                .long("per-day")
                                .action(ArgAction::SetTrue),
                        )
                        .arg(config_arg())
                        .args(json_args()),
                ),
        )
        .subcommand(
            Command::new("chart")
                .about("Write a chart of the stored expenses")
                .subcommand(chart_cmd("bar", "Stacked bar of spend per place"))
                .subcommand(chart_cmd("pie", "Category share of spend"))
                .subcommand(chart_cmd("gauge", "Daily spend of one place against the budget")),
        )
        .subcommand(
            Command::new("convert")
                .about("Convert app exports into ledger journals")
                .subcommand(
                    Command::new("moneywallet")
                        .arg(Arg::new("path").long("path").required(true))
                        .arg(
                            Arg::new("out")
                                .long("out")
                                .help("Defaults to the input path with a .ledger extension"),
                        ),
                ),
        )
        .subcommand(
            Command::new("export")
                .about("Export cleaned transactions")
                .subcommand(
                    Command::new("transactions")
                        .arg(
                            Arg::new("format")
                                .long("format")
                                .default_value("csv")
                                .help("csv|json"),
                        )
                        .arg(Arg::new("out").long("out").required(true)),
                ),
        )
        .subcommand(
            Command::new("doctor")
                .about("Check for places without nights and unranked categories")
                .arg(config_arg()),
        )
}
