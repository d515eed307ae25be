//! Random access into the shared zone/bin index file.
//!
//! The index file is two equal halves, each `900 x 1440 x 4` bytes of
//! little-endian u32 values ordered bin-major/zone-minor
//! (`(bin-1)*900 + (zone-1)`). The first half holds `n0`, the running count
//! of stars preceding a bin within its zone; the second half holds `nn`,
//! the star count of the bin itself. Together they partition each zone's
//! running index contiguously: `n0(bin+1) = n0(bin) + nn(bin)`.

use std::fs::File;
use std::io::{Seek, SeekFrom};
use std::path::Path;
use std::sync::Mutex;

use byteorder::{LittleEndian, ReadBytesExt};

use crate::error::{CatalogError, CatalogResult};
use crate::geom::{BINS_PER_ZONE, ZONE_COUNT};

/// Index entry for one (zone, bin) cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinCounts {
    /// Stars preceding this bin within the zone (cumulative).
    pub n0: u32,
    /// Stars in this bin.
    pub nn: u32,
}

/// Handle on the shared index file.
///
/// A single lock serializes all reads: each lookup is a seek+read pair and
/// another caller's seek must not land between them.
pub struct ZoneIndex {
    file: Mutex<File>,
    half_len: u64,
}

/// Expected byte length of one index half.
const HALF_LEN: u64 = ZONE_COUNT as u64 * BINS_PER_ZONE as u64 * 4;

impl ZoneIndex {
    /// Open the index file, checking it is exactly two `zones x bins x 4`
    /// halves.
    pub fn open(path: &Path) -> CatalogResult<Self> {
        let file = File::open(path)?;
        let actual = file.metadata()?.len();
        if actual != 2 * HALF_LEN {
            return Err(CatalogError::IndexSize {
                path: path.to_path_buf(),
                expected: 2 * HALF_LEN,
                actual,
            });
        }
        Ok(Self {
            file: Mutex::new(file),
            half_len: HALF_LEN,
        })
    }

    /// Read the `(n0, nn)` pair for one (zone, bin) cell.
    ///
    /// Valid for `zone` in `1..=900` and `bin` in `1..=1440`; anything else
    /// is rejected without touching the file.
    pub fn bin_counts(&self, zone: u16, bin: u16) -> CatalogResult<BinCounts> {
        if zone < 1 || zone > ZONE_COUNT {
            return Err(CatalogError::ZoneOutOfRange {
                zone: zone as u32,
                max: ZONE_COUNT,
            });
        }
        if bin < 1 || bin > BINS_PER_ZONE {
            return Err(CatalogError::BinOutOfRange {
                bin: bin as u32,
                max: BINS_PER_ZONE,
            });
        }

        let offset = ((bin as u64 - 1) * ZONE_COUNT as u64 + (zone as u64 - 1)) * 4;

        // Both seek+read pairs under one guard so no other caller's seek
        // can interleave between them.
        let mut file = self.file.lock().unwrap_or_else(|e| e.into_inner());
        file.seek(SeekFrom::Start(offset))?;
        let n0 = file.read_u32::<LittleEndian>()?;
        file.seek(SeekFrom::Start(offset + self.half_len))?;
        let nn = file.read_u32::<LittleEndian>()?;

        Ok(BinCounts { n0, nn })
    }

    /// Total stars in a zone: `n0 + nn` of the zone's last bin.
    pub fn zone_star_count(&self, zone: u16) -> CatalogResult<u32> {
        let last = self.bin_counts(zone, BINS_PER_ZONE)?;
        Ok(last.n0 + last.nn)
    }
}

impl std::fmt::Debug for ZoneIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZoneIndex")
            .field("half_len", &self.half_len)
            .finish_non_exhaustive()
    }
}
