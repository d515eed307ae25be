//! Zone/bin-indexed star catalog for epoch-corrected positional queries.
//!
//! Provides random access to an on-disk astrometric catalog laid out as 900
//! declination zones of fixed-width star records, with a two-level (zone,
//! bin) spatial index. Given a sky direction, an angular radius and a
//! magnitude predicate, a query returns the matching stars with positions
//! advanced from the catalog epoch to a requested observation date.
//!
//! # Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`query`] | [`Catalog`](query::Catalog) facade, spatial query planner, designation search |
//! | [`store`] | Index file, per-zone record files, record decoding, HPM overrides, proper names |
//! | [`epoch`] | Observation context, proper-motion advance, [`SkyTransforms`](epoch::SkyTransforms) seam |
//! | [`geom`] | Zone/bin grid math and angular separation |
//! | [`error`] | [`CatalogError`](error::CatalogError) and validation diagnostics |
//!
//! # Quick Start
//!
//! ```ignore
//! use std::collections::HashMap;
//! use std::sync::Arc;
//! use zonal_catalog::epoch::{Equatorial, GeoLocation, MeanOfDate, ObservationContext};
//! use zonal_catalog::query::Catalog;
//!
//! let catalog = Catalog::new("/data/ucac4", HashMap::new());
//! catalog.initialize()?;
//!
//! let ctx = ObservationContext::new(2460000.5, GeoLocation::default(), Arc::new(MeanOfDate));
//! let center = Equatorial { ra_deg: 83.633, dec_deg: -5.375 };
//! for star in catalog.query(&ctx, center, 0.5, |mag| mag <= 12.0) {
//!     println!("{}", star?.designation());
//! }
//! ```
//!
//! # On-Disk Layout
//!
//! The catalog root holds an index subdirectory (`u4i/`) with the binary
//! zone/bin index and the high-proper-motion side file, and a zone
//! subdirectory (`u4b/`) with one fixed-width record file per declination
//! zone (`z001`..`z900`). All of it is local, static, read-only data; the
//! engine never writes.
//!
//! # Concurrency
//!
//! All operations are synchronous and may block on file I/O. Index reads are
//! serialized by a single lock (each read is a seek+read pair that must not
//! interleave); the 900 zone files carry independent locks, so reads on
//! different zones proceed in parallel. State built at initialization is
//! immutable afterwards; [`Catalog::reinitialize`](query::Catalog::reinitialize)
//! swaps in a fresh snapshot while in-flight queries finish against the old one.

pub mod epoch;
pub mod error;
pub mod geom;
pub mod query;
pub mod store;

pub use epoch::{Equatorial, GeoLocation, MeanOfDate, ObservationContext, SkyTransforms};
pub use error::{CatalogError, CatalogResult, ValidateError};
pub use query::{Catalog, QueryIter};
pub use store::record::{CatalogStar, SpectralClass};
