//! High-proper-motion override table.
//!
//! The on-disk record encodes proper motion as fixed-point i16; stars whose
//! motion exceeds that range carry a sentinel and their exact values live in
//! a small whitespace-delimited side file. The table is loaded once at
//! initialization and consulted through the [`PmOverrides`] trait so a
//! larger table could switch to a sorted or hashed lookup without touching
//! callers; at its real-world size (thousands of rows) a linear scan is fine.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::CatalogResult;

/// Lookup seam for proper-motion overrides, in mas/yr
/// (RA component includes the cos(Dec) factor).
pub trait PmOverrides {
    fn lookup(&self, zone: u16, running_index: u32) -> Option<(f64, f64)>;
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct HpmEntry {
    zone: u16,
    running_index: u32,
    pm_ra_mas: f64,
    pm_dec_mas: f64,
}

/// In-memory override table backed by a linear scan.
#[derive(Debug, Default)]
pub struct HpmTable {
    entries: Vec<HpmEntry>,
}

/// On-disk proper-motion unit: tenths of a mas/yr.
const PM_FILE_SCALE: f64 = 0.1;

impl HpmTable {
    /// Load the side file. Rows are whitespace-delimited with 8 columns;
    /// columns 2-5 (1-based) are zone, running index, pmRA*cosDec, pmDec in
    /// 0.1 mas/yr. Rows with the wrong column count or unparsable numbers
    /// are skipped, not fatal.
    pub fn load(path: &Path) -> CatalogResult<Self> {
        let reader = BufReader::new(File::open(path)?);
        let mut entries = Vec::new();
        let mut skipped = 0usize;
        for line in reader.lines() {
            let line = line?;
            match parse_row(&line) {
                Some(entry) => entries.push(entry),
                None if line.trim().is_empty() => {}
                None => skipped += 1,
            }
        }
        if skipped > 0 {
            tracing::warn!(skipped, "malformed rows in high-proper-motion file");
        }
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn parse_row(line: &str) -> Option<HpmEntry> {
    let cols: Vec<&str> = line.split_whitespace().collect();
    if cols.len() != 8 {
        return None;
    }
    Some(HpmEntry {
        zone: cols[1].parse().ok()?,
        running_index: cols[2].parse().ok()?,
        pm_ra_mas: cols[3].parse::<f64>().ok()? * PM_FILE_SCALE,
        pm_dec_mas: cols[4].parse::<f64>().ok()? * PM_FILE_SCALE,
    })
}

impl PmOverrides for HpmTable {
    fn lookup(&self, zone: u16, running_index: u32) -> Option<(f64, f64)> {
        self.entries
            .iter()
            .find(|e| e.zone == zone && e.running_index == running_index)
            .map(|e| (e.pm_ra_mas, e.pm_dec_mas))
    }
}
