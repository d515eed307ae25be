//! Observation context and position resolution.
//!
//! Catalog records store positions at the catalog epoch (J2000.0). The
//! resolver advances them by proper motion to a mean-of-date position, then
//! hands off to a [`SkyTransforms`] provider for precession, nutation and
//! aberration. The transform math itself lives outside this crate and is
//! consumed as pure functions; [`MeanOfDate`] is the identity provider for
//! hosts and tests that want mean coordinates unchanged.
//!
//! Epoch elements are computed once per [`ObservationContext`], so apparent
//! coordinates are resolved exactly once per (context, star).

use std::sync::Arc;

use crate::geom::normalize_ra;
use crate::store::record::CatalogStar;

/// Julian day of the catalog epoch, J2000.0.
pub const EPOCH_JD: f64 = 2451545.0;

/// Days per Julian year, the proper-motion time base.
pub const DAYS_PER_JULIAN_YEAR: f64 = 365.25;

/// An equatorial sky position in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Equatorial {
    pub ra_deg: f64,
    pub dec_deg: f64,
}

/// Geographic location of the observer.
///
/// Carried on the context for hosts that compose horizontal coordinates or
/// rise/set times from the resolved apparent position; the engine itself
/// only needs the date.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GeoLocation {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
}

/// Precomputed per-date elements handed to [`SkyTransforms::apparent_from_mean`].
///
/// The precession angles are whatever the provider chose to precompute for
/// the context's date; [`MeanOfDate`] leaves them zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpochElements {
    /// Julian day the elements were computed for.
    pub jd: f64,
    pub zeta_deg: f64,
    pub z_deg: f64,
    pub theta_deg: f64,
}

impl EpochElements {
    /// Elements that leave mean-of-date coordinates untouched.
    pub fn identity(jd: f64) -> Self {
        Self {
            jd,
            zeta_deg: 0.0,
            z_deg: 0.0,
            theta_deg: 0.0,
        }
    }
}

/// Provider of the astronomical coordinate transforms this engine consumes.
///
/// Implementations are pure functions of their inputs: precession with the
/// precomputed [`EpochElements`], nutation and aberration. The engine never
/// looks inside.
pub trait SkyTransforms: Send + Sync {
    /// Precompute the per-date elements used by [`Self::apparent_from_mean`].
    fn epoch_elements(&self, jd: f64) -> EpochElements;

    /// Transform a mean-of-date position to an apparent-of-date position.
    fn apparent_from_mean(&self, mean: Equatorial, elements: &EpochElements) -> Equatorial;
}

/// Identity transform provider: apparent equals mean-of-date.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeanOfDate;

impl SkyTransforms for MeanOfDate {
    fn epoch_elements(&self, jd: f64) -> EpochElements {
        EpochElements::identity(jd)
    }

    fn apparent_from_mean(&self, mean: Equatorial, _elements: &EpochElements) -> Equatorial {
        mean
    }
}

/// One observation: a date, a site, and the transforms precomputed for both.
#[derive(Clone)]
pub struct ObservationContext {
    jd: f64,
    site: GeoLocation,
    elements: EpochElements,
    transforms: Arc<dyn SkyTransforms>,
}

impl ObservationContext {
    /// Build a context for the given Julian day, computing the transform
    /// provider's epoch elements once up front.
    pub fn new(jd: f64, site: GeoLocation, transforms: Arc<dyn SkyTransforms>) -> Self {
        let elements = transforms.epoch_elements(jd);
        Self {
            jd,
            site,
            elements,
            transforms,
        }
    }

    /// Julian day of the observation.
    pub fn julian_day(&self) -> f64 {
        self.jd
    }

    /// Observer location.
    pub fn site(&self) -> GeoLocation {
        self.site
    }

    /// Julian years elapsed since the catalog epoch. Negative before J2000.0.
    pub fn years_since_epoch(&self) -> f64 {
        (self.jd - EPOCH_JD) / DAYS_PER_JULIAN_YEAR
    }

    /// Apply the provider's mean-to-apparent transform for this date.
    pub fn apparent(&self, mean: Equatorial) -> Equatorial {
        self.transforms.apparent_from_mean(mean, &self.elements)
    }
}

impl std::fmt::Debug for ObservationContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObservationContext")
            .field("jd", &self.jd)
            .field("site", &self.site)
            .field("elements", &self.elements)
            .finish_non_exhaustive()
    }
}

/// Advance a decoded star to apparent coordinates for `ctx`.
///
/// Proper motion in RA was pre-divided by cos(Dec) at decode time, so both
/// components add directly to the epoch coordinates.
pub fn resolve_apparent(star: &mut CatalogStar, ctx: &ObservationContext) {
    let dt_years = ctx.years_since_epoch();
    let mean = Equatorial {
        ra_deg: normalize_ra(star.ra_deg + star.pm_ra_deg * dt_years),
        dec_deg: star.dec_deg + star.pm_dec_deg * dt_years,
    };
    let apparent = ctx.apparent(mean);
    star.ra_deg = apparent.ra_deg;
    star.dec_deg = apparent.dec_deg;
}
