// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use std::path::Path;

use tripspend::{cli, commands, db};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = cli::build_cli();
    let matches = cli.get_matches();

    // Conversion never needs the database.
    if let Some(("convert", sub)) = matches.subcommand() {
        return commands::converter::handle(sub);
    }

    let mut conn = match matches.get_one::<String>("db") {
        Some(p) => db::open_at(Path::new(p.trim()))?,
        None => db::open_or_init()?,
    };

    match matches.subcommand() {
        Some(("init", _)) => match matches.get_one::<String>("db") {
            Some(p) => println!("Database initialized at {}", p.trim()),
            None => println!("Database initialized at {}", db::db_path()?.display()),
        },
        Some(("import", sub)) => commands::importer::handle(&mut conn, sub)?,
        Some(("report", sub)) => commands::reports::handle(&conn, sub)?,
        Some(("chart", sub)) => commands::charts::handle(&conn, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&conn, sub)?,
        Some(("doctor", sub)) => commands::doctor::handle(&conn, sub)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
