//! Per-zone record files and zone availability.
//!
//! Each declination zone lives in its own file of fixed 78-byte records in
//! running order. Opening the store probes all 900 files once; zones whose
//! file is absent are flagged unavailable and read as empty, never as an
//! error. Each present zone holds its own lock, so concurrent reads on
//! different zones proceed in parallel while same-zone reads serialize.

use std::fs::File;
use std::io::{ErrorKind, Read, Seek, SeekFrom};
use std::path::Path;
use std::sync::Mutex;

use crate::error::{CatalogError, CatalogResult};
use crate::geom::ZONE_COUNT;
use crate::store::record::RECORD_LEN;

/// File name of one zone's record file, e.g. `z451`.
pub fn zone_file_name(zone: u16) -> String {
    format!("z{:03}", zone)
}

/// Handles on the per-zone record files that physically exist.
pub struct ZoneStore {
    zones: Vec<Option<Mutex<File>>>,
}

impl ZoneStore {
    /// Probe and open all zone files under `dir`.
    ///
    /// Missing files mark their zone unavailable; any other open failure
    /// propagates. The caller decides whether zero available zones is
    /// acceptable (validation requires at least one).
    pub fn open(dir: &Path) -> CatalogResult<Self> {
        let mut zones = Vec::with_capacity(ZONE_COUNT as usize);
        let mut missing = 0usize;
        for zone in 1..=ZONE_COUNT {
            match File::open(dir.join(zone_file_name(zone))) {
                Ok(file) => zones.push(Some(Mutex::new(file))),
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    zones.push(None);
                    missing += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }
        if missing > 0 {
            tracing::warn!(
                missing,
                available = ZONE_COUNT as usize - missing,
                "zone files absent; affected zones will read as empty"
            );
        }
        Ok(Self { zones })
    }

    /// Whether a zone's record file was present at open time.
    pub fn is_available(&self, zone: u16) -> bool {
        zone >= 1
            && zone <= ZONE_COUNT
            && self.zones[zone as usize - 1].is_some()
    }

    /// Number of zones whose record file is present.
    pub fn available_count(&self) -> usize {
        self.zones.iter().filter(|z| z.is_some()).count()
    }

    /// Read `count` consecutive records starting `skip` records into the
    /// zone file, as one buffered read.
    ///
    /// An unavailable zone yields an empty buffer. A present file that
    /// delivers fewer bytes than requested is corrupt (the index counts
    /// promised them) and errors.
    pub fn read_records(&self, zone: u16, skip: u64, count: usize) -> CatalogResult<Vec<u8>> {
        if zone < 1 || zone > ZONE_COUNT {
            return Err(CatalogError::ZoneOutOfRange {
                zone: zone as u32,
                max: ZONE_COUNT,
            });
        }
        let Some(handle) = &self.zones[zone as usize - 1] else {
            return Ok(Vec::new());
        };
        if count == 0 {
            return Ok(Vec::new());
        }

        let wanted = count * RECORD_LEN;
        let mut buf = vec![0u8; wanted];

        let mut file = handle.lock().unwrap_or_else(|e| e.into_inner());
        file.seek(SeekFrom::Start(skip * RECORD_LEN as u64))?;
        let mut filled = 0usize;
        while filled < wanted {
            match file.read(&mut buf[filled..]) {
                Ok(0) => {
                    return Err(CatalogError::ShortRead {
                        zone,
                        expected: wanted,
                        actual: filled,
                    })
                }
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Ok(buf)
    }
}

impl std::fmt::Debug for ZoneStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZoneStore")
            .field("available", &self.available_count())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_zone(dir: &Path, zone: u16, records: usize) {
        let mut f = File::create(dir.join(zone_file_name(zone))).unwrap();
        let bytes: Vec<u8> = (0..records * RECORD_LEN).map(|i| (i % 251) as u8).collect();
        f.write_all(&bytes).unwrap();
    }

    #[test]
    fn test_zone_file_name_padding() {
        assert_eq!(zone_file_name(1), "z001");
        assert_eq!(zone_file_name(42), "z042");
        assert_eq!(zone_file_name(900), "z900");
    }

    #[test]
    fn test_availability() {
        let dir = TempDir::new().unwrap();
        write_zone(dir.path(), 1, 2);
        write_zone(dir.path(), 451, 5);
        write_zone(dir.path(), 900, 1);

        let store = ZoneStore::open(dir.path()).unwrap();
        assert_eq!(store.available_count(), 3);
        assert!(store.is_available(1));
        assert!(store.is_available(451));
        assert!(store.is_available(900));
        assert!(!store.is_available(2));
        assert!(!store.is_available(0));
        assert!(!store.is_available(901));
    }

    #[test]
    fn test_read_records_seeks_and_sizes() {
        let dir = TempDir::new().unwrap();
        write_zone(dir.path(), 7, 4);
        let store = ZoneStore::open(dir.path()).unwrap();

        let buf = store.read_records(7, 1, 2).unwrap();
        assert_eq!(buf.len(), 2 * RECORD_LEN);
        // First byte of record 2 continues the test pattern.
        assert_eq!(buf[0], (RECORD_LEN % 251) as u8);
    }

    #[test]
    fn test_missing_zone_reads_empty() {
        let dir = TempDir::new().unwrap();
        write_zone(dir.path(), 7, 4);
        let store = ZoneStore::open(dir.path()).unwrap();

        let buf = store.read_records(8, 0, 10).unwrap();
        assert!(buf.is_empty());
    }

    #[test]
    fn test_short_read_is_corruption() {
        let dir = TempDir::new().unwrap();
        write_zone(dir.path(), 7, 2);
        let store = ZoneStore::open(dir.path()).unwrap();

        let err = store.read_records(7, 0, 3).err().expect("expected error");
        assert!(matches!(err, CatalogError::ShortRead { zone: 7, .. }));
    }

    #[test]
    fn test_out_of_range_zone_rejected() {
        let dir = TempDir::new().unwrap();
        write_zone(dir.path(), 7, 1);
        let store = ZoneStore::open(dir.path()).unwrap();

        assert!(matches!(
            store.read_records(0, 0, 1),
            Err(CatalogError::ZoneOutOfRange { .. })
        ));
        assert!(matches!(
            store.read_records(901, 0, 1),
            Err(CatalogError::ZoneOutOfRange { .. })
        ));
    }

    #[test]
    fn test_parallel_reads_on_distinct_zones() {
        let dir = TempDir::new().unwrap();
        write_zone(dir.path(), 1, 8);
        write_zone(dir.path(), 2, 8);
        let store = std::sync::Arc::new(ZoneStore::open(dir.path()).unwrap());

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let store = store.clone();
                std::thread::spawn(move || {
                    let zone = 1 + (i % 2) as u16;
                    for _ in 0..50 {
                        let buf = store.read_records(zone, 2, 3).unwrap();
                        assert_eq!(buf.len(), 3 * RECORD_LEN);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
    }
}
