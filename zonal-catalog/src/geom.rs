//! Zone/bin grid math and spherical geometry.
//!
//! The sky is tiled pole-to-pole by 900 declination zones 0.2° tall; each
//! zone is tiled by 1440 right-ascension bins 0.25° wide. Zone 1 starts at
//! Dec −90°, bin 1 at RA 0°. Both are 1-based throughout.

/// Number of declination zones tiling the sky.
pub const ZONE_COUNT: u16 = 900;

/// Number of right-ascension bins within one zone.
pub const BINS_PER_ZONE: u16 = 1440;

/// Angular height of one declination zone, in degrees.
pub const ZONE_HEIGHT_DEG: f64 = 0.2;

/// Angular width of one right-ascension bin, in degrees.
pub const BIN_WIDTH_DEG: f64 = 0.25;

const DEG_TO_RAD: f64 = std::f64::consts::PI / 180.0;
const RAD_TO_DEG: f64 = 180.0 / std::f64::consts::PI;

/// Zone number containing the given declination, clamped to `1..=900`.
pub fn zone_for_dec(dec_deg: f64) -> u16 {
    let raw = libm::floor((dec_deg + 90.0) / ZONE_HEIGHT_DEG) as i64 + 1;
    raw.clamp(1, ZONE_COUNT as i64) as u16
}

/// Declination of a zone's mid-line, in degrees.
pub fn zone_center_dec(zone: u16) -> f64 {
    -90.0 + (zone as f64 - 0.5) * ZONE_HEIGHT_DEG
}

/// Right ascension of a bin's mid-line, in degrees.
pub fn bin_center_ra(bin: u16) -> f64 {
    (bin as f64 - 0.5) * BIN_WIDTH_DEG
}

/// Bin number containing the given right ascension, clamped to `1..=1440`.
pub fn bin_for_ra(ra_deg: f64) -> u16 {
    let raw = libm::floor(normalize_ra(ra_deg) / BIN_WIDTH_DEG) as i64 + 1;
    raw.clamp(1, BINS_PER_ZONE as i64) as u16
}

/// Normalize a right ascension into `[0, 360)` degrees.
pub fn normalize_ra(ra_deg: f64) -> f64 {
    let r = libm::fmod(ra_deg, 360.0);
    if r < 0.0 {
        r + 360.0
    } else {
        r
    }
}

/// Angular separation between two sky positions, in degrees.
///
/// Vincenty formulation, accurate at all separations including antipodes
/// and sub-arcsecond distances.
pub fn angular_separation_deg(ra1_deg: f64, dec1_deg: f64, ra2_deg: f64, dec2_deg: f64) -> f64 {
    let (sin_d1, cos_d1) = libm::sincos(dec1_deg * DEG_TO_RAD);
    let (sin_d2, cos_d2) = libm::sincos(dec2_deg * DEG_TO_RAD);
    let (sin_dl, cos_dl) = libm::sincos((ra2_deg - ra1_deg) * DEG_TO_RAD);

    let num = libm::sqrt(
        (cos_d2 * sin_dl).powi(2) + (cos_d1 * sin_d2 - sin_d1 * cos_d2 * cos_dl).powi(2),
    );
    let den = sin_d1 * sin_d2 + cos_d1 * cos_d2 * cos_dl;

    libm::atan2(num, den) * RAD_TO_DEG
}
