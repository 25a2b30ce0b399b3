//! Orbit summary printed in verbose mode.

use std::fmt;

use crate::constants::*;
use crate::tle::Tle;

/// Perigee/apogee heights, period and epoch of one element set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitMetrics {
    /// Perigee height above the equatorial radius (km)
    pub perigee_km: f64,
    /// Apogee height above the equatorial radius (km)
    pub apogee_km: f64,
    /// Orbital period (minutes)
    pub period_min: f64,
    /// Epoch (Julian date, UTC)
    pub epoch_jd: f64,
}

impl OrbitMetrics {
    /// Compute from the element set alone.
    ///
    /// The semi-major axis comes from the unrecovered TLE mean motion:
    /// a1 = (XKE / xno)^(2/3), in Earth radii.
    pub fn from_tle(tle: &Tle) -> Self {
        let xno = tle.xno();
        let a1 = (XKE / xno).powf(TWO_THIRDS);
        Self {
            perigee_km: (a1 * (1.0 - tle.eccentricity) - 1.0) * EARTH_RADIUS_KM,
            apogee_km: (a1 * (1.0 + tle.eccentricity) - 1.0) * EARTH_RADIUS_KM,
            period_min: TAU / xno,
            epoch_jd: tle.epoch_jd(),
        }
    }
}

impl fmt::Display for OrbitMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "   Perigee: {:.4} km", self.perigee_km)?;
        writeln!(f, "   Apogee: {:.4} km", self.apogee_km)?;
        writeln!(f, "   Orbital period: {:.4} min", self.period_min)?;
        writeln!(f, "   Epoch: JD {:.5}", self.epoch_jd)
    }
}
