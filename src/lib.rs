//! # Shot Archive
//!
//! A read-only HTTP archive server for dated screenshot collections.
//!
//! A scraper (out of scope here) downloads screenshots into per-month
//! directories (`2023-01/shot.png`) and writes an `index.json` manifest
//! describing every capture. Shot Archive loads that manifest into an
//! in-memory index keyed by each entry's URL path and serves the
//! collection through a small read-only API: the years present, the
//! months within a year, the lookup keys within a year/month, and the
//! bytes of a single file by its lookup key.
//!
//! ## Architecture
//!
//! ```text
//! index.json ──▶ manifest::build_index ──▶ ArchiveIndex
//!                                              │
//!                                       ArchiveService
//!                                        │         │
//!                                        ▼         ▼
//!                                   CLI (shotarc)  HTTP (axum)
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! shotarc --root /srv/screenshots years
//! shotarc --root /srv/screenshots paths 2023 1
//! shotarc --config ./config/archive.toml serve
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing and startup validation |
//! | [`models`] | Core data types |
//! | [`manifest`] | Manifest parsing and the in-memory index |
//! | [`archive`] | The archive query service |
//! | [`server`] | Read-only HTTP API |
//! | [`inspect`] | CLI inspection commands |

pub mod archive;
pub mod config;
pub mod inspect;
pub mod manifest;
pub mod models;
pub mod server;
