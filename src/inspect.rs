//! CLI inspection commands over the archive.
//!
//! Each command opens the service eagerly and prints to stdout, one value
//! per line, so output is easy to pipe. The `stats` command prints a
//! per-month summary table.

use anyhow::Result;

use crate::archive::ArchiveService;
use crate::config::Config;

pub fn run_years(config: &Config) -> Result<()> {
    let service = ArchiveService::open(config)?;
    for year in service.years() {
        println!("{}", year);
    }
    Ok(())
}

pub fn run_months(config: &Config, year: i32) -> Result<()> {
    let service = ArchiveService::open(config)?;
    for month in service.months(year) {
        println!("{}", month);
    }
    Ok(())
}

pub fn run_paths(config: &Config, year: i32, month: u32) -> Result<()> {
    let service = ArchiveService::open(config)?;
    for path in service.paths(year, month) {
        println!("{}", path);
    }
    Ok(())
}

/// Resolves a lookup key and prints the absolute file path.
pub fn run_resolve(config: &Config, lookup_key: &str) -> Result<()> {
    let service = ArchiveService::open(config)?;
    let path = service.resolve(lookup_key)?;
    println!("{}", path.display());
    Ok(())
}

/// Prints a summary of the archive contents.
pub fn run_stats(config: &Config) -> Result<()> {
    let service = ArchiveService::open(config)?;
    let snapshot = service.snapshot();

    println!("root:    {}", service.root().display());
    println!("entries: {}", snapshot.len());

    if snapshot.is_empty() {
        return Ok(());
    }

    println!();
    println!("{:<8} {:<8} {}", "YEAR", "MONTH", "ENTRIES");
    for year in snapshot.years() {
        for month in snapshot.months(year) {
            let count = snapshot.paths(year, month).len();
            println!("{:<8} {:<8} {}", year, month, count);
        }
    }

    Ok(())
}
