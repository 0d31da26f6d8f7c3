//! # Shot Archive CLI (`shotarc`)
//!
//! The `shotarc` binary is the primary interface for Shot Archive. It
//! serves a directory of dated screenshots over HTTP and exposes the same
//! queries as one-shot commands.
//!
//! ## Usage
//!
//! ```bash
//! shotarc --config ./config/archive.toml <command>
//! shotarc --root /srv/screenshots <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `shotarc serve` | Start the read-only HTTP archive server |
//! | `shotarc years` | List years present in the archive |
//! | `shotarc months <year>` | List months archived for a year |
//! | `shotarc paths <year> <month>` | List lookup keys for a year/month |
//! | `shotarc resolve <key>` | Resolve a lookup key to its file on disk |
//! | `shotarc stats` | Print a summary of the archive contents |
//!
//! ## Examples
//!
//! ```bash
//! # Serve an archive directory with default settings
//! shotarc --root /srv/screenshots serve
//!
//! # What's in the archive?
//! shotarc --root /srv/screenshots years
//! shotarc --root /srv/screenshots months 2023
//! shotarc --root /srv/screenshots paths 2023 1
//!
//! # Where does a lookup key live on disk?
//! shotarc --root /srv/screenshots resolve 2023/01/shot.png
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use shot_archive::{config, inspect, server};

/// Shot Archive CLI — a read-only HTTP archive server for dated
/// screenshot collections.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file, or a `--root` flag naming the archive directory directly.
#[derive(Parser)]
#[command(
    name = "shotarc",
    about = "Shot Archive — a read-only HTTP archive server for dated screenshot collections",
    version,
    long_about = "Shot Archive loads a JSON manifest describing archived screenshots, builds an \
    in-memory index keyed by each entry's URL path, and serves the collection through a small \
    read-only API: years, months within a year, lookup keys within a year/month, and the bytes \
    of a single file by its lookup key."
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/archive.toml`. Archive root, manifest
    /// filename, bind address, and route prefix are read from this file.
    #[arg(long, global = true, default_value = "./config/archive.toml")]
    config: PathBuf,

    /// Archive root directory.
    ///
    /// Bypasses the config file entirely: the manifest is expected at
    /// `<root>/index.json` and server settings take their defaults.
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Start the read-only HTTP archive server.
    ///
    /// Builds the index from the manifest, binds to `[server].bind`, and
    /// serves years/months/paths listings plus the archived files
    /// themselves until the process is terminated.
    Serve,

    /// List years present in the archive, ascending, one per line.
    Years,

    /// List months archived for a year, ascending, one per line.
    ///
    /// A year with no entries produces no output and exits successfully.
    Months {
        /// Calendar year (e.g. `2023`).
        year: i32,
    },

    /// List lookup keys archived for a year and month, sorted, one per line.
    Paths {
        /// Calendar year (e.g. `2023`).
        year: i32,
        /// Calendar month, 1-12.
        month: u32,
    },

    /// Resolve a lookup key to the absolute path of its file on disk.
    ///
    /// Exits non-zero if no entry is indexed under the key. The file
    /// itself is not checked for existence.
    Resolve {
        /// The path-derived lookup key (e.g. `2023/01/shot.png`).
        lookup_key: String,
    },

    /// Print a summary of the archive contents.
    Stats,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cfg = match cli.root {
        Some(root) => config::Config::from_root(root),
        None => config::load_config(&cli.config)?,
    };
    config::validate_archive(&cfg)?;

    match cli.command {
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
        Commands::Years => {
            inspect::run_years(&cfg)?;
        }
        Commands::Months { year } => {
            inspect::run_months(&cfg, year)?;
        }
        Commands::Paths { year, month } => {
            inspect::run_paths(&cfg, year, month)?;
        }
        Commands::Resolve { lookup_key } => {
            inspect::run_resolve(&cfg, &lookup_key)?;
        }
        Commands::Stats => {
            inspect::run_stats(&cfg)?;
        }
    }

    Ok(())
}
