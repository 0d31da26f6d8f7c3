//! Core data models used throughout Shot Archive.
//!
//! These types represent the validated archive entries that flow from the
//! manifest parser into the query service and out through the CLI and HTTP
//! layers.

use chrono::NaiveDate;
use std::path::{Path, PathBuf};

/// A validated archive entry derived from one manifest record.
///
/// The `lookup_key` is the externally addressable identifier for the file:
/// the path component of the source URL with its leading `/` stripped. The
/// physical location of the asset is derived from `date` and `name`, never
/// from the key itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    /// Manifest key this entry appeared under.
    pub id: String,
    /// Original URL string from the manifest.
    pub url: String,
    /// Path-derived identifier the entry is addressed by.
    pub lookup_key: String,
    /// Bare filename of the archived asset.
    pub name: String,
    /// Calendar date of the capture. Time-of-day is required in the
    /// manifest but not retained.
    pub date: NaiveDate,
}

impl IndexEntry {
    /// Physical location of the asset: `root/YYYY-MM/name`.
    pub fn file_path(&self, root: &Path) -> PathBuf {
        let subdir = self.date.format("%Y-%m").to_string();
        root.join(subdir).join(&self.name)
    }
}
