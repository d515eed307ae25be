//! Fixed-width record decoding.
//!
//! A zone file record is 78 bytes at fixed offsets: RA (u32, mas) at 0,
//! Dec (u32, mas offset from −90°) at 4, magnitude (i16, milli-mag) at 8,
//! proper motion RA*cosDec / Dec (i16 pair, 0.1 mas/yr) at 24/26, and B/V
//! magnitudes (i16, milli-mag) at 46/48. All integers little-endian.
//!
//! Decoding parses the magnitude first — the cheapest field — and bails
//! before touching anything else when the caller's predicate rejects it.
//! In a typical query most candidates fail on magnitude alone.

use byteorder::{ByteOrder, LittleEndian};

use crate::error::{CatalogError, CatalogResult};
use crate::query::designation::format_designation;
use crate::store::hpm::PmOverrides;
use crate::store::names::NameDirectory;

/// On-disk record length in bytes.
pub const RECORD_LEN: usize = 78;

/// Sentinel proper-motion value: the true value lives in the HPM table.
pub const PM_SENTINEL: i16 = 32767;

const RA_OFFSET: usize = 0;
const DEC_OFFSET: usize = 4;
const MAG_OFFSET: usize = 8;
const PM_RA_OFFSET: usize = 24;
const PM_DEC_OFFSET: usize = 26;
const B_MAG_OFFSET: usize = 46;
const V_MAG_OFFSET: usize = 48;

const MAS_PER_DEG: f64 = 3_600_000.0;
const MILLIMAG: f64 = 1000.0;
/// On-disk proper-motion unit: tenths of a mas/yr.
const PM_UNIT_MAS: f64 = 0.1;

/// Spectral class derived from the B−V color index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpectralClass {
    O,
    B,
    A,
    F,
    G,
    K,
    M,
}

impl SpectralClass {
    /// Classify by effective temperature in kelvin.
    pub fn from_temperature(kelvin: f64) -> Self {
        match kelvin {
            t if t >= 25000.0 => Self::O,
            t if t >= 10000.0 => Self::B,
            t if t >= 7500.0 => Self::A,
            t if t >= 6000.0 => Self::F,
            t if t >= 5000.0 => Self::G,
            t if t >= 3500.0 => Self::K,
            _ => Self::M,
        }
    }

    /// Classify from the B−V color index via the Ballesteros effective
    /// temperature relation.
    pub fn from_bv(bv: f64) -> Self {
        Self::from_temperature(bv_to_temperature(bv))
    }
}

impl std::fmt::Display for SpectralClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let c = match self {
            Self::O => 'O',
            Self::B => 'B',
            Self::A => 'A',
            Self::F => 'F',
            Self::G => 'G',
            Self::K => 'K',
            Self::M => 'M',
        };
        write!(f, "{c}")
    }
}

/// Ballesteros (2012) black-body fit from B−V to effective temperature.
fn bv_to_temperature(bv: f64) -> f64 {
    let x = bv.clamp(-0.4, 2.0);
    4600.0 * (1.0 / (0.92 * x + 1.7) + 1.0 / (0.92 * x + 0.62))
}

/// One decoded star.
///
/// Identity is (zone, running index). Straight out of [`decode`] the
/// coordinates are catalog-epoch values; the position resolver rewrites
/// them to apparent-of-date for the query's observation context.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogStar {
    pub zone: u16,
    pub running_index: u32,
    /// Apparent magnitude.
    pub mag: f64,
    pub ra_deg: f64,
    pub dec_deg: f64,
    /// Proper motion in RA, deg/yr, already divided by cos(Dec) so it adds
    /// directly to RA.
    pub pm_ra_deg: f64,
    /// Proper motion in Dec, deg/yr.
    pub pm_dec_deg: f64,
    pub b_mag: f64,
    pub v_mag: f64,
    pub spectral_class: SpectralClass,
    /// Proper name, when the designation appears in the name directory.
    pub name: Option<String>,
}

impl CatalogStar {
    /// Canonical designation, e.g. `UCAC4 451-012345`.
    pub fn designation(&self) -> String {
        format_designation(self.zone, self.running_index)
    }
}

/// Decode one raw record.
///
/// Returns `Ok(None)` when the magnitude predicate rejects the star; in
/// that case no byte beyond the magnitude field is examined. A slice too
/// short for the field being read is reported as a truncated record.
pub fn decode(
    raw: &[u8],
    zone: u16,
    running_index: u32,
    filter: &dyn Fn(f64) -> bool,
    overrides: &dyn PmOverrides,
    names: &NameDirectory,
) -> CatalogResult<Option<CatalogStar>> {
    let truncated = |len: usize| CatalogError::TruncatedRecord {
        zone,
        running_index,
        len,
    };

    if raw.len() < MAG_OFFSET + 2 {
        return Err(truncated(raw.len()));
    }
    let mag = LittleEndian::read_i16(&raw[MAG_OFFSET..]) as f64 / MILLIMAG;
    if !filter(mag) {
        return Ok(None);
    }

    if raw.len() < RECORD_LEN {
        return Err(truncated(raw.len()));
    }

    let ra_deg = LittleEndian::read_u32(&raw[RA_OFFSET..]) as f64 / MAS_PER_DEG;
    let dec_deg = LittleEndian::read_u32(&raw[DEC_OFFSET..]) as f64 / MAS_PER_DEG - 90.0;

    let pm_ra_raw = LittleEndian::read_i16(&raw[PM_RA_OFFSET..]);
    let pm_dec_raw = LittleEndian::read_i16(&raw[PM_DEC_OFFSET..]);
    let (pm_ra_mas, pm_dec_mas) = if pm_ra_raw == PM_SENTINEL || pm_dec_raw == PM_SENTINEL {
        // Motion exceeded the fixed-point range; exact values live in the
        // side table. A missing entry degrades to no motion.
        overrides.lookup(zone, running_index).unwrap_or((0.0, 0.0))
    } else {
        (
            pm_ra_raw as f64 * PM_UNIT_MAS,
            pm_dec_raw as f64 * PM_UNIT_MAS,
        )
    };

    let cos_dec = libm::cos(dec_deg.to_radians()).max(1e-6);
    let pm_ra_deg = pm_ra_mas / MAS_PER_DEG / cos_dec;
    let pm_dec_deg = pm_dec_mas / MAS_PER_DEG;

    let b_mag = LittleEndian::read_i16(&raw[B_MAG_OFFSET..]) as f64 / MILLIMAG;
    let v_mag = LittleEndian::read_i16(&raw[V_MAG_OFFSET..]) as f64 / MILLIMAG;
    let spectral_class = SpectralClass::from_bv(b_mag - v_mag);

    let name = names
        .get(&format_designation(zone, running_index))
        .map(str::to_string);

    Ok(Some(CatalogStar {
        zone,
        running_index,
        mag,
        ra_deg,
        dec_deg,
        pm_ra_deg,
        pm_dec_deg,
        b_mag,
        v_mag,
        spectral_class,
        name,
    }))
}

#[cfg(test)]
pub(crate) mod testutil {
    use super::*;

    /// Encode a record with the layout [`decode`] expects.
    pub fn encode_record(
        ra_deg: f64,
        dec_deg: f64,
        mag: f64,
        pm_ra: i16,
        pm_dec: i16,
        b_mag: f64,
        v_mag: f64,
    ) -> [u8; RECORD_LEN] {
        let mut raw = [0u8; RECORD_LEN];
        LittleEndian::write_u32(&mut raw[RA_OFFSET..], (ra_deg * MAS_PER_DEG) as u32);
        LittleEndian::write_u32(
            &mut raw[DEC_OFFSET..],
            ((dec_deg + 90.0) * MAS_PER_DEG) as u32,
        );
        LittleEndian::write_i16(&mut raw[MAG_OFFSET..], (mag * MILLIMAG) as i16);
        LittleEndian::write_i16(&mut raw[PM_RA_OFFSET..], pm_ra);
        LittleEndian::write_i16(&mut raw[PM_DEC_OFFSET..], pm_dec);
        LittleEndian::write_i16(&mut raw[B_MAG_OFFSET..], (b_mag * MILLIMAG) as i16);
        LittleEndian::write_i16(&mut raw[V_MAG_OFFSET..], (v_mag * MILLIMAG) as i16);
        raw
    }
}
