//! Query surface of the catalog engine.
//!
//! - [`catalog`] — the [`Catalog`] facade: lifecycle, cone queries, point
//!   lookup, designation search, health indicators
//! - [`planner`] — enumeration of candidate (zone, bin) cells for a cone
//! - [`designation`] — canonical designation parsing and formatting

pub mod catalog;
pub mod designation;
pub mod planner;

pub use catalog::{Catalog, QueryIter};
pub use designation::{format_designation, parse_designation, DesignationQuery};
pub use planner::{plan, ZoneScan};
