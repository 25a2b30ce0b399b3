//! Physical and astrodynamic constants.
//!
//! SGP4 is defined against WGS-72, so these deliberately differ from WGS-84
//! values: mixing the two shifts derived coefficients noticeably.

/// Earth equatorial radius (km) — WGS-72
pub const EARTH_RADIUS_KM: f64 = 6378.135;

/// sqrt(GM) in Earth radii^1.5 per minute — WGS-72
pub const XKE: f64 = 0.074_366_916_1;

/// Distance units per Earth radius
pub const AE: f64 = 1.0;

/// 0.5 * J2 * AE² — WGS-72
pub const CK2: f64 = 5.413_080e-4;

/// Earth J3 zonal harmonic — WGS-72
pub const XJ3: f64 = -2.538_81e-6;

/// ((q0 - s0) * AE / EARTH_RADIUS_KM)^4 with q0 = 120 km, s0 = 78 km
pub const QOMS2T: f64 = 1.880_279e-9;

/// Atmospheric density parameter s = AE * (1 + 78 / EARTH_RADIUS_KM)
pub const S_DENSITY: f64 = 1.012_229;

/// Perigee (km) below which the density parameter `s` is adjusted
pub const LOW_PERIGEE_KM: f64 = 156.0;

/// Perigee (km) at or below which `s` is pinned to 20 km
pub const VERY_LOW_PERIGEE_KM: f64 = 98.0;

/// Minutes per solar day
pub const MINUTES_PER_DAY: f64 = 1440.0;

/// Julian date of 2000-01-01 00:00
pub const JD_2000_JAN1: f64 = 2_451_544.5;

/// Two pi
pub const TAU: f64 = std::f64::consts::TAU;

pub const TWO_THIRDS: f64 = 2.0 / 3.0;

/// Degrees to radians
pub const DEG2RAD: f64 = std::f64::consts::PI / 180.0;
