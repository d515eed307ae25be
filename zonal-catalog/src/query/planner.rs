//! Spatial query planning.
//!
//! Turns a cone (center, radius) into the (zone, bin) cells worth
//! scanning. The planner is pure geometry — it never consults the index,
//! so empty bins are dropped later, at scan time, once their `nn` counts
//! are known.
//!
//! Two regimes:
//!
//! - **Polar cap**: bins collapse angularly near the poles, which makes
//!   per-bin center tests unreliable there. When the cone's home zone lies
//!   within 5 zones of a pole and the radius exceeds one bin width, the
//!   whole 10-zone cap is scanned wholesale.
//! - **General**: every bin center of the home zone is tested against the
//!   cone padded by a fixed margin, then the search expands one zone at a
//!   time toward each pole independently, stopping a direction as soon as
//!   an entire zone contributes no visible bin.
//!
//! Cost scales with the zones actually touched, not with the catalog.

use crate::epoch::Equatorial;
use crate::geom::{
    angular_separation_deg, bin_center_ra, zone_center_dec, zone_for_dec, BINS_PER_ZONE,
    BIN_WIDTH_DEG, ZONE_COUNT,
};

/// Conservative padding added to the radius for the bin-center test,
/// approximating half a bin's angular diagonal.
pub const BIN_MARGIN_DEG: f64 = 0.2;

/// How close (in zones) to a pole the fast path engages.
const POLAR_ZONE_DEPTH: u16 = 5;

/// Zones in one polar cap scanned wholesale by the fast path.
const POLAR_CAP_ZONES: u16 = 2 * POLAR_ZONE_DEPTH;

/// Candidate bins of one zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneScan {
    pub zone: u16,
    pub bins: Vec<u16>,
}

/// Enumerate the (zone, bin) candidates for a cone, ordered by zone.
pub fn plan(center: Equatorial, radius_deg: f64) -> Vec<ZoneScan> {
    let home = zone_for_dec(center.dec_deg);

    if radius_deg > BIN_WIDTH_DEG {
        if home <= POLAR_ZONE_DEPTH {
            return polar_cap(1);
        }
        if home > ZONE_COUNT - POLAR_ZONE_DEPTH {
            return polar_cap(ZONE_COUNT - POLAR_CAP_ZONES + 1);
        }
    }

    let mut scans = Vec::new();
    let home_bins = visible_bins(home, center, radius_deg);
    if !home_bins.is_empty() {
        scans.push(ZoneScan {
            zone: home,
            bins: home_bins,
        });
    }

    let mut zone = home;
    while zone > 1 {
        zone -= 1;
        let bins = visible_bins(zone, center, radius_deg);
        if bins.is_empty() {
            break;
        }
        scans.push(ZoneScan { zone, bins });
    }

    zone = home;
    while zone < ZONE_COUNT {
        zone += 1;
        let bins = visible_bins(zone, center, radius_deg);
        if bins.is_empty() {
            break;
        }
        scans.push(ZoneScan { zone, bins });
    }

    scans.sort_by_key(|s| s.zone);
    scans
}

fn polar_cap(first_zone: u16) -> Vec<ZoneScan> {
    (first_zone..first_zone + POLAR_CAP_ZONES)
        .map(|zone| ZoneScan {
            zone,
            bins: (1..=BINS_PER_ZONE).collect(),
        })
        .collect()
}

/// Bins of `zone` whose fixed center point lies within the padded cone.
fn visible_bins(zone: u16, center: Equatorial, radius_deg: f64) -> Vec<u16> {
    let zone_dec = zone_center_dec(zone);
    (1..=BINS_PER_ZONE)
        .filter(|&bin| {
            angular_separation_deg(center.ra_deg, center.dec_deg, bin_center_ra(bin), zone_dec)
                <= radius_deg + BIN_MARGIN_DEG
        })
        .collect()
}
