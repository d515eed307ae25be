//! On-disk catalog storage.
//!
//! - [`index`] — random access into the shared zone/bin index file
//! - [`zones`] — per-zone fixed-width record files and zone availability
//! - [`record`] — record decoding with the cheap magnitude prefilter
//! - [`hpm`] — high-proper-motion override table
//! - [`names`] — proper-name directory keyed by canonical designation

pub mod hpm;
pub mod index;
pub mod names;
pub mod record;
pub mod zones;

pub use hpm::{HpmTable, PmOverrides};
pub use index::{BinCounts, ZoneIndex};
pub use names::NameDirectory;
pub use record::{CatalogStar, SpectralClass, RECORD_LEN};
pub use zones::ZoneStore;
