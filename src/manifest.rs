//! Manifest parsing and the in-memory archive index.
//!
//! The manifest is a JSON object mapping opaque record IDs to
//! `{ "url", "date", "name" }` records. [`build_index`] turns that document
//! into an [`ArchiveIndex`]: a validated map from lookup key to
//! [`IndexEntry`] that answers the year/month/path queries.
//!
//! Failure policy: a manifest that cannot be read, is not valid JSON, or is
//! not a JSON object at the top level fails the whole build. Everything
//! else is per-record — a malformed record is skipped with a warning and
//! its siblings are unaffected.

use chrono::{Datelike, NaiveDateTime};
use serde_json::Value;
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use thiserror::Error;
use url::Url;

use crate::models::IndexEntry;

/// Timestamp format required of every manifest `date` field.
const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Base used to resolve relative manifest URLs. Only the path component of
/// the resolved URL is kept, so the host never leaks into a lookup key.
const RELATIVE_BASE: &str = "http://archive.invalid/";

/// Fatal conditions that abort an index build.
#[derive(Debug, Error)]
pub enum BuildError {
    /// The manifest file could not be read.
    #[error("could not read manifest {}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The manifest is not syntactically valid JSON.
    #[error("manifest {} is not valid JSON", path.display())]
    Syntax {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// The manifest parsed, but its top level is not a JSON object.
    #[error("manifest {} is not a JSON object", path.display())]
    Shape { path: PathBuf },
}

/// Per-record failures. These never abort a build; the offending record is
/// skipped and a warning on stderr names it.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    /// The record is not an object, or a required field is missing or not
    /// a JSON string.
    #[error("record is malformed")]
    Malformed,
    /// The `url` field could not be parsed, or its path yields an empty
    /// lookup key.
    #[error("could not parse URL '{url}'")]
    BadUrl { url: String },
    /// The `date` field does not match `YYYY-MM-DD HH:MM:SS`.
    #[error("could not parse date '{date}'")]
    BadDate { date: String },
}

/// Immutable map from lookup key to validated entry.
///
/// Built once per manifest read and never mutated afterwards; the owning
/// service replaces the whole index when it rebuilds.
#[derive(Debug, Default)]
pub struct ArchiveIndex {
    entries: HashMap<String, IndexEntry>,
}

impl ArchiveIndex {
    /// Looks up an entry by its lookup key.
    pub fn get(&self, key: &str) -> Option<&IndexEntry> {
        self.entries.get(key)
    }

    /// Number of entries in the index.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Distinct years across all entries, ascending.
    pub fn years(&self) -> Vec<i32> {
        let years: BTreeSet<i32> = self.entries.values().map(|e| e.date.year()).collect();
        years.into_iter().collect()
    }

    /// Distinct months with entries in `year`, ascending. An unknown year
    /// yields an empty list.
    pub fn months(&self, year: i32) -> Vec<u32> {
        let months: BTreeSet<u32> = self
            .entries
            .values()
            .filter(|e| e.date.year() == year)
            .map(|e| e.date.month())
            .collect();
        months.into_iter().collect()
    }

    /// Lookup keys of entries dated in `year`/`month`, sorted
    /// lexicographically so repeated queries are deterministic.
    pub fn paths(&self, year: i32, month: u32) -> Vec<String> {
        let mut paths: Vec<String> = self
            .entries
            .values()
            .filter(|e| e.date.year() == year && e.date.month() == month)
            .map(|e| e.lookup_key.clone())
            .collect();
        paths.sort();
        paths
    }
}

/// Builds the archive index from the manifest at `path`.
///
/// Records are processed in manifest order; a later record whose URL
/// derives an already-seen lookup key overwrites the earlier entry.
/// Per-record failures are reported on stderr and skipped. An empty
/// manifest yields an empty index.
pub fn build_index(path: &Path) -> Result<ArchiveIndex, BuildError> {
    let raw = std::fs::read_to_string(path).map_err(|source| BuildError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;

    let doc: Value = serde_json::from_str(&raw).map_err(|source| BuildError::Syntax {
        path: path.to_path_buf(),
        source,
    })?;

    let records = match doc {
        Value::Object(records) => records,
        _ => {
            return Err(BuildError::Shape {
                path: path.to_path_buf(),
            })
        }
    };

    let mut entries = HashMap::new();
    for (id, record) in &records {
        match decode_record(id, record) {
            Ok(entry) => {
                entries.insert(entry.lookup_key.clone(), entry);
            }
            Err(err) => {
                eprintln!("Warning: skipping manifest record '{}': {}", id, err);
            }
        }
    }

    Ok(ArchiveIndex { entries })
}

/// Decodes one manifest record into an [`IndexEntry`].
///
/// Field extraction is explicit: each required field either yields a value
/// or a [`RecordError`], so one bad record never disturbs its siblings.
fn decode_record(id: &str, record: &Value) -> Result<IndexEntry, RecordError> {
    let url = string_field(record, "url")?;
    let lookup_key = derive_lookup_key(&url)?;

    let date_str = string_field(record, "date")?;
    let date = NaiveDateTime::parse_from_str(&date_str, DATE_FORMAT)
        .map_err(|_| RecordError::BadDate { date: date_str })?
        .date();

    let name = string_field(record, "name")?;

    Ok(IndexEntry {
        id: id.to_string(),
        url,
        lookup_key,
        name,
        date,
    })
}

/// Extracts a required string field from a record object.
fn string_field(record: &Value, field: &str) -> Result<String, RecordError> {
    record
        .get(field)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or(RecordError::Malformed)
}

/// Derives the lookup key from a manifest URL: the path component with
/// exactly one leading `/` stripped. Relative references are resolved
/// against a fixed base, so `"foo/bar"` derives the key `foo/bar`.
fn derive_lookup_key(url: &str) -> Result<String, RecordError> {
    let parsed = Url::parse(url)
        .or_else(|err| match err {
            url::ParseError::RelativeUrlWithoutBase => {
                Url::parse(RELATIVE_BASE).and_then(|base| base.join(url))
            }
            _ => Err(err),
        })
        .map_err(|_| RecordError::BadUrl {
            url: url.to_string(),
        })?;

    let path = parsed.path();
    let key = path.strip_prefix('/').unwrap_or(path);
    if key.is_empty() {
        return Err(RecordError::BadUrl {
            url: url.to_string(),
        });
    }

    Ok(key.to_string())
}
