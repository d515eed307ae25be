//! Catalog facade: lifecycle, cone queries, point lookup, designation
//! search and health indicators.
//!
//! The facade owns all file handles through an immutable-once-built
//! [`CatalogState`] snapshot behind a lock. [`Catalog::reinitialize`] swaps
//! in a fresh snapshot atomically; queries already running keep their own
//! reference and finish against the old one. A catalog that failed
//! validation stays unloaded: every query surface then returns empty
//! results, never an error.

use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use crate::epoch::{resolve_apparent, Equatorial, ObservationContext};
use crate::error::{CatalogResult, ValidateError};
use crate::geom::{angular_separation_deg, ZONE_COUNT};
use crate::query::designation::parse_designation;
use crate::query::planner::{plan, ZoneScan};
use crate::store::hpm::HpmTable;
use crate::store::index::ZoneIndex;
use crate::store::names::NameDirectory;
use crate::store::record::{decode, CatalogStar, RECORD_LEN};
use crate::store::zones::{zone_file_name, ZoneStore};

const INDEX_SUBDIR: &str = "u4i";
const INDEX_FILE: &str = "u4index.unf";
const HPM_FILE: &str = "u4hpm.dat";
const ZONE_SUBDIR: &str = "u4b";

fn index_path(root: &Path) -> PathBuf {
    root.join(INDEX_SUBDIR).join(INDEX_FILE)
}

fn hpm_path(root: &Path) -> PathBuf {
    root.join(INDEX_SUBDIR).join(HPM_FILE)
}

fn zones_dir(root: &Path) -> PathBuf {
    root.join(ZONE_SUBDIR)
}

/// Everything opened and loaded at initialization. Immutable afterwards;
/// readers share it through an `Arc` and need no synchronization beyond
/// the per-file locks inside the stores.
pub(crate) struct CatalogState {
    pub(crate) index: ZoneIndex,
    pub(crate) zones: ZoneStore,
    pub(crate) hpm: HpmTable,
    pub(crate) names: NameDirectory,
}

/// Handle on one on-disk catalog.
pub struct Catalog {
    root: PathBuf,
    proper_names: HashMap<String, String>,
    state: RwLock<Option<Arc<CatalogState>>>,
}

impl Catalog {
    /// Create an unloaded handle. `proper_names` is the host's full
    /// designation-to-name map; entries for other catalogs are filtered
    /// out at initialization.
    pub fn new(root: impl Into<PathBuf>, proper_names: HashMap<String, String>) -> Self {
        Self {
            root: root.into(),
            proper_names,
            state: RwLock::new(None),
        }
    }

    /// Read-only root check, one of four distinct diagnostics: missing
    /// root, missing index file, zero zone files, missing HPM file.
    pub fn validate(root: &Path) -> Result<(), ValidateError> {
        if !root.is_dir() {
            return Err(ValidateError::MissingRoot(root.to_path_buf()));
        }
        let index = index_path(root);
        if !index.is_file() {
            return Err(ValidateError::MissingIndex(index));
        }
        let zones = zones_dir(root);
        let any_zone = (1..=ZONE_COUNT).any(|z| zones.join(zone_file_name(z)).is_file());
        if !any_zone {
            return Err(ValidateError::NoZoneFiles(zones));
        }
        let hpm = hpm_path(root);
        if !hpm.is_file() {
            return Err(ValidateError::MissingHpm(hpm));
        }
        Ok(())
    }

    /// Open handles and load side tables, replacing any previous state.
    ///
    /// Validation failure is a configuration error: it is logged once and
    /// the catalog stays unloaded with `Ok(false)` — query methods then
    /// return empty results. A genuine I/O failure on a validated root
    /// indicates corruption and propagates.
    pub fn initialize(&self) -> CatalogResult<bool> {
        if let Err(e) = Self::validate(&self.root) {
            tracing::error!(error = %e, "catalog validation failed; staying unloaded");
            *self.state.write().unwrap_or_else(|e| e.into_inner()) = None;
            return Ok(false);
        }

        let state = CatalogState {
            index: ZoneIndex::open(&index_path(&self.root))?,
            zones: ZoneStore::open(&zones_dir(&self.root))?,
            hpm: HpmTable::load(&hpm_path(&self.root))?,
            names: NameDirectory::from_host(&self.proper_names),
        };
        *self.state.write().unwrap_or_else(|e| e.into_inner()) = Some(Arc::new(state));
        Ok(true)
    }

    /// Rebuild the state after an external configuration change.
    ///
    /// The old snapshot is discarded atomically; queries started before
    /// the swap complete against it.
    pub fn reinitialize(&self) -> CatalogResult<bool> {
        self.initialize()
    }

    /// Drop the current state, closing all file handles once in-flight
    /// queries release their snapshots.
    pub fn shutdown(&self) {
        *self.state.write().unwrap_or_else(|e| e.into_inner()) = None;
    }

    fn snapshot(&self) -> Option<Arc<CatalogState>> {
        self.state
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Whether the catalog initialized successfully.
    pub fn is_loaded(&self) -> bool {
        self.snapshot().is_some()
    }

    /// Number of zones whose record file is present; 0 when unloaded.
    pub fn available_zone_count(&self) -> usize {
        self.snapshot().map_or(0, |s| s.zones.available_count())
    }

    /// Cone query: stars within `radius_deg` of `center` passing the
    /// magnitude predicate, with positions resolved for `ctx`.
    ///
    /// Lazy: candidate bins are scanned as the iterator is driven, one
    /// buffered bin read at a time, so a caller may stop early on a large
    /// radius. Cancellation is exactly that — stop enumerating. Each call
    /// is independently restartable; an unloaded catalog yields nothing.
    pub fn query<'c, F>(
        &self,
        ctx: &'c ObservationContext,
        center: Equatorial,
        radius_deg: f64,
        filter: F,
    ) -> QueryIter<'c, F>
    where
        F: Fn(f64) -> bool,
    {
        let state = self.snapshot();
        let scans = if state.is_some() {
            plan(center, radius_deg)
        } else {
            Vec::new()
        };
        QueryIter {
            state,
            ctx,
            center,
            radius_deg,
            filter,
            scans: scans.into_iter(),
            current: None,
            pending: VecDeque::new(),
            done: false,
        }
    }

    /// Direct single-record read by (zone, running index).
    ///
    /// Returns `Ok(None)` for an unloaded catalog, an unavailable zone, or
    /// a running index outside the zone's population.
    pub fn point_lookup(
        &self,
        ctx: &ObservationContext,
        zone: u16,
        running_index: u32,
    ) -> CatalogResult<Option<CatalogStar>> {
        let Some(state) = self.snapshot() else {
            return Ok(None);
        };
        let total = state.index.zone_star_count(zone)?;
        lookup_in_state(&state, ctx, zone, running_index, total)
    }

    /// Search by designation text, `UCAC4 <zone>[-<running>]`.
    ///
    /// With no running index, the zone's first `max_results` stars in
    /// running order. With a (possibly partial) running index, the typed
    /// number plus successive digit-appended candidates, bounded by the
    /// zone's total star count. Unparsable text yields an empty result.
    pub fn designation_search(
        &self,
        ctx: &ObservationContext,
        text: &str,
        max_results: usize,
    ) -> CatalogResult<Vec<CatalogStar>> {
        let Some(state) = self.snapshot() else {
            return Ok(Vec::new());
        };
        let Some(query) = parse_designation(text) else {
            return Ok(Vec::new());
        };
        if max_results == 0 {
            return Ok(Vec::new());
        }

        let total = state.index.zone_star_count(query.zone)?;
        let mut results = Vec::new();

        match query.running_index {
            None => {
                for running in 1..=total {
                    if results.len() == max_results {
                        break;
                    }
                    if let Some(star) = lookup_in_state(&state, ctx, query.zone, running, total)? {
                        results.push(star);
                    }
                }
            }
            Some(first) => {
                // Breadth-first digit append: 12 tries 12, 120..129,
                // 1200..1299, ... while candidates stay within the zone.
                let mut candidates = VecDeque::from([first]);
                while let Some(c) = candidates.pop_front() {
                    if results.len() == max_results {
                        break;
                    }
                    if c <= total {
                        if let Some(star) = lookup_in_state(&state, ctx, query.zone, c, total)? {
                            results.push(star);
                        }
                    }
                    if let Some(base) = c.checked_mul(10) {
                        if base <= total {
                            for digit in 0..10 {
                                candidates.push_back(base + digit);
                            }
                        }
                    }
                }
            }
        }

        Ok(results)
    }
}

impl std::fmt::Debug for Catalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Catalog")
            .field("root", &self.root)
            .field("loaded", &self.is_loaded())
            .finish_non_exhaustive()
    }
}

fn lookup_in_state(
    state: &CatalogState,
    ctx: &ObservationContext,
    zone: u16,
    running_index: u32,
    zone_total: u32,
) -> CatalogResult<Option<CatalogStar>> {
    if running_index == 0 || running_index > zone_total {
        return Ok(None);
    }
    let raw = state
        .zones
        .read_records(zone, running_index as u64 - 1, 1)?;
    if raw.is_empty() {
        return Ok(None);
    }
    match decode(
        &raw,
        zone,
        running_index,
        &|_| true,
        &state.hpm,
        &state.names,
    )? {
        Some(mut star) => {
            resolve_apparent(&mut star, ctx);
            Ok(Some(star))
        }
        None => Ok(None),
    }
}

/// Lazy cone-query iterator returned by [`Catalog::query`].
pub struct QueryIter<'c, F> {
    state: Option<Arc<CatalogState>>,
    ctx: &'c ObservationContext,
    center: Equatorial,
    radius_deg: f64,
    filter: F,
    scans: std::vec::IntoIter<ZoneScan>,
    current: Option<(u16, std::vec::IntoIter<u16>)>,
    pending: VecDeque<CatalogStar>,
    done: bool,
}

impl<F> QueryIter<'_, F>
where
    F: Fn(f64) -> bool,
{
    /// Scan one (zone, bin) cell into `pending`.
    fn scan_bin(&mut self, state: &CatalogState, zone: u16, bin: u16) -> CatalogResult<()> {
        let counts = state.index.bin_counts(zone, bin)?;
        if counts.nn == 0 {
            return Ok(());
        }
        let bytes = state
            .zones
            .read_records(zone, counts.n0 as u64, counts.nn as usize)?;
        for (i, chunk) in bytes.chunks_exact(RECORD_LEN).enumerate() {
            let running_index = counts.n0 + i as u32 + 1;
            let decoded = decode(
                chunk,
                zone,
                running_index,
                &self.filter,
                &state.hpm,
                &state.names,
            )?;
            if let Some(mut star) = decoded {
                resolve_apparent(&mut star, self.ctx);
                let distance = angular_separation_deg(
                    self.center.ra_deg,
                    self.center.dec_deg,
                    star.ra_deg,
                    star.dec_deg,
                );
                if distance <= self.radius_deg {
                    self.pending.push_back(star);
                }
            }
        }
        Ok(())
    }
}

impl<F> Iterator for QueryIter<'_, F>
where
    F: Fn(f64) -> bool,
{
    type Item = CatalogResult<CatalogStar>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(star) = self.pending.pop_front() {
                return Some(Ok(star));
            }
            if self.done {
                return None;
            }
            let Some(state) = self.state.clone() else {
                return None;
            };

            let next_cell = loop {
                if let Some((zone, bins)) = &mut self.current {
                    if let Some(bin) = bins.next() {
                        break Some((*zone, bin));
                    }
                }
                match self.scans.next() {
                    Some(scan) => self.current = Some((scan.zone, scan.bins.into_iter())),
                    None => break None,
                }
            };

            let Some((zone, bin)) = next_cell else {
                self.done = true;
                return None;
            };

            if let Err(e) = self.scan_bin(&state, zone, bin) {
                self.done = true;
                return Some(Err(e));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::epoch::{GeoLocation, MeanOfDate, EPOCH_JD};
    use std::fs;
    use tempfile::TempDir;

    fn ctx() -> ObservationContext {
        ObservationContext::new(EPOCH_JD, GeoLocation::default(), Arc::new(MeanOfDate))
    }

    #[test]
    fn test_validate_missing_root() {
        let err = Catalog::validate(Path::new("/nonexistent/ucac4")).unwrap_err();
        assert!(matches!(err, ValidateError::MissingRoot(_)));
    }

    #[test]
    fn test_validate_diagnostics_in_order() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();

        let err = Catalog::validate(root).unwrap_err();
        assert!(matches!(err, ValidateError::MissingIndex(_)));

        fs::create_dir(root.join(INDEX_SUBDIR)).unwrap();
        fs::write(index_path(root), b"").unwrap();
        let err = Catalog::validate(root).unwrap_err();
        assert!(matches!(err, ValidateError::NoZoneFiles(_)));

        fs::create_dir(zones_dir(root)).unwrap();
        fs::write(zones_dir(root).join("z001"), b"").unwrap();
        let err = Catalog::validate(root).unwrap_err();
        assert!(matches!(err, ValidateError::MissingHpm(_)));

        fs::write(hpm_path(root), b"").unwrap();
        assert!(Catalog::validate(root).is_ok());
    }

    #[test]
    fn test_unloaded_catalog_is_silent() {
        let catalog = Catalog::new("/nonexistent/ucac4", HashMap::new());
        assert!(!catalog.initialize().unwrap());
        assert!(!catalog.is_loaded());
        assert_eq!(catalog.available_zone_count(), 0);

        let ctx = ctx();
        let center = Equatorial {
            ra_deg: 10.0,
            dec_deg: 0.0,
        };
        assert_eq!(catalog.query(&ctx, center, 1.0, |_| true).count(), 0);
        assert!(catalog.point_lookup(&ctx, 451, 1).unwrap().is_none());
        assert!(catalog
            .designation_search(&ctx, "UCAC4 451-000001", 5)
            .unwrap()
            .is_empty());
    }
}
