//! Error types for catalog access.
//!
//! Two layers mirror the engine's failure taxonomy:
//!
//! - [`ValidateError`] — the four distinct configuration diagnostics a
//!   read-only root check can produce. A failed validation leaves the
//!   catalog unloaded; it is logged once and never surfaced to query
//!   callers.
//! - [`CatalogError`] — runtime failures on an otherwise valid catalog:
//!   defensive range rejections, truncated data, and genuine I/O errors.
//!   All data is local and static, so nothing here is retried; an I/O
//!   error on a file that validated indicates corruption and propagates.

use std::path::PathBuf;
use thiserror::Error;

/// Diagnostics produced by [`Catalog::validate`](crate::query::Catalog::validate).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidateError {
    /// The catalog root directory does not exist.
    #[error("catalog root not found: {0}")]
    MissingRoot(PathBuf),

    /// The root exists but the zone/bin index file is absent.
    #[error("index file not found: {0}")]
    MissingIndex(PathBuf),

    /// No zone record file is present; at least one is required.
    #[error("no zone files present under {0}")]
    NoZoneFiles(PathBuf),

    /// The high-proper-motion side file is absent.
    #[error("high-proper-motion file not found: {0}")]
    MissingHpm(PathBuf),
}

/// Runtime error for catalog reads.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Zone number outside `1..=900`. The planner never generates these;
    /// this guards direct callers of the store layer.
    #[error("zone {zone} out of range 1..={max}")]
    ZoneOutOfRange { zone: u32, max: u16 },

    /// Bin number outside `1..=1440`.
    #[error("bin {bin} out of range 1..={max}")]
    BinOutOfRange { bin: u32, max: u16 },

    /// The index file is not exactly two `zones x bins x 4`-byte halves.
    #[error("index file {path}: expected {expected} bytes, found {actual}")]
    IndexSize {
        path: PathBuf,
        expected: u64,
        actual: u64,
    },

    /// A zone file delivered fewer bytes than its index counts promise.
    #[error("zone {zone}: short read, wanted {expected} bytes, got {actual}")]
    ShortRead {
        zone: u16,
        expected: usize,
        actual: usize,
    },

    /// A record slice is shorter than the fixed record length.
    #[error("zone {zone} record {running_index}: truncated ({len} bytes)")]
    TruncatedRecord {
        zone: u16,
        running_index: u32,
        len: usize,
    },

    /// Underlying file I/O failure on a validated catalog.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias for `Result<T, CatalogError>`.
pub type CatalogResult<T> = Result<T, CatalogError>;
