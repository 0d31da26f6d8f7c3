//! The archive query service.
//!
//! Owns the built [`ArchiveIndex`] behind an atomic swap and answers the
//! read-only queries the CLI and HTTP layers expose. Every query operates
//! on an immutable snapshot, so any number of callers can query
//! concurrently without coordination; [`ArchiveService::reload`] replaces
//! the whole index reference atomically, and readers observe either the
//! old or the new index, never a partially built one.

use anyhow::{Context, Result};
use arc_swap::ArcSwap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

use crate::config::Config;
use crate::manifest::{build_index, ArchiveIndex, BuildError};

/// Failure to resolve a lookup key.
#[derive(Debug, Error)]
pub enum LookupError {
    /// No entry is indexed under the requested key.
    #[error("no archive entry for '{key}'")]
    NotFound { key: String },
}

/// Read-only query service over a built archive index.
pub struct ArchiveService {
    root: PathBuf,
    manifest_path: PathBuf,
    index: ArcSwap<ArchiveIndex>,
}

impl ArchiveService {
    /// Builds the index eagerly and returns a ready service.
    ///
    /// The archive root is canonicalized so resolved file paths are
    /// absolute regardless of how the root was configured. A manifest that
    /// fails to build fails the open — startup is the right place to learn
    /// about a broken archive.
    pub fn open(config: &Config) -> Result<Self> {
        let root = std::fs::canonicalize(&config.archive.root).with_context(|| {
            format!(
                "could not canonicalize archive root {}",
                config.archive.root.display()
            )
        })?;
        let manifest_path = root.join(&config.archive.manifest);
        let index = build_index(&manifest_path)?;

        Ok(Self {
            root,
            manifest_path,
            index: ArcSwap::from_pointee(index),
        })
    }

    /// Rebuilds the index from the manifest and swaps it in atomically.
    ///
    /// On failure the previous index stays in place and keeps serving.
    pub fn reload(&self) -> Result<(), BuildError> {
        let index = build_index(&self.manifest_path)?;
        self.index.store(Arc::new(index));
        Ok(())
    }

    /// Current index snapshot.
    pub fn snapshot(&self) -> Arc<ArchiveIndex> {
        self.index.load_full()
    }

    /// Archive root directory (absolute).
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Distinct years present in the archive, ascending.
    pub fn years(&self) -> Vec<i32> {
        self.snapshot().years()
    }

    /// Distinct months archived in `year`, ascending. An unknown year
    /// yields an empty list.
    pub fn months(&self, year: i32) -> Vec<u32> {
        self.snapshot().months(year)
    }

    /// Lookup keys of entries dated in `year`/`month`, sorted.
    pub fn paths(&self, year: i32, month: u32) -> Vec<String> {
        self.snapshot().paths(year, month)
    }

    /// Resolves a lookup key to the absolute path of the asset on disk.
    ///
    /// Does not check that the file exists — the serving layer translates
    /// a missing file into its own not-found response.
    pub fn resolve(&self, key: &str) -> Result<PathBuf, LookupError> {
        let snapshot = self.snapshot();
        let entry = snapshot.get(key).ok_or_else(|| LookupError::NotFound {
            key: key.to_string(),
        })?;
        Ok(entry.file_path(&self.root))
    }
}
