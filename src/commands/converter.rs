// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::convert::convert_moneywallet;
use anyhow::{Context, Result};
use std::fs::File;
use std::path::{Path, PathBuf};

pub fn handle(m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("moneywallet", sub)) => moneywallet(sub),
        _ => Ok(()),
    }
}

fn moneywallet(sub: &clap::ArgMatches) -> Result<()> {
    let path = Path::new(sub.get_one::<String>("path").unwrap().trim());
    let out: PathBuf = match sub.get_one::<String>("out") {
        Some(o) => PathBuf::from(o.trim()),
        None => path.with_extension("ledger"),
    };
    let input = File::open(path).with_context(|| format!("Open CSV {}", path.display()))?;
    let journal = convert_moneywallet(input)
        .with_context(|| format!("Convert {}", path.display()))?;
    std::fs::write(&out, journal).with_context(|| format!("Write {}", out.display()))?;
    println!("Converted {} to {}", path.display(), out.display());
    Ok(())
}
