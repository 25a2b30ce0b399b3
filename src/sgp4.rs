//! SGP4 initialisation.
//!
//! Recovers the original mean motion and semi-major axis from the TLE
//! (Kozai) mean motion, then derives the drag-related coefficients the
//! propagator would use. Only the initialisation is implemented here;
//! nothing is propagated.
//!
//! Reference: Hoots & Roehrich, *Spacetrack Report No. 3* (1980).

use crate::codec::PropagatorInit;
use crate::constants::*;
use crate::tle::Tle;

/// Number of coefficients produced by [`Sgp4Init`].
pub const N_SGP4_PARAMS: usize = 8;

/// Slot of `c2`, the drag scaling coefficient (C1 = B* · C2).
pub const C2: usize = 0;
/// Slot of `c1`.
pub const C1: usize = 1;
/// Slot of `c4` (enters the secular terms multiplied by B*).
pub const C4: usize = 2;
/// Slot of the recovered semi-major axis (Earth radii).
pub const AODP: usize = 3;
/// Slot of the recovered mean motion (rad/min).
pub const XNODP: usize = 4;
/// Slot of `eta`.
pub const ETA: usize = 5;
/// Slot of the perigee height (km) from the recovered elements.
pub const PERIGEE_KM: usize = 6;
/// Slot of the atmospheric density parameter `s4` (Earth radii).
pub const S4: usize = 7;

/// Coefficients derived at propagator initialisation, indexed by slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PropagationParams([f64; N_SGP4_PARAMS]);

impl PropagationParams {
    pub fn new(coefficients: [f64; N_SGP4_PARAMS]) -> Self {
        Self(coefficients)
    }

    /// All-zero coefficients, returned for elements SGP4 cannot initialise.
    pub fn zeroed() -> Self {
        Self([0.0; N_SGP4_PARAMS])
    }

    /// A vector whose only meaningful entry is `c2`.
    pub fn with_c2(c2: f64) -> Self {
        let mut coefficients = [0.0; N_SGP4_PARAMS];
        coefficients[C2] = c2;
        Self(coefficients)
    }

    pub fn get(&self, slot: usize) -> Option<f64> {
        self.0.get(slot).copied()
    }

    pub fn c2(&self) -> f64 {
        self.0[C2]
    }
}

/// Near-earth SGP4 initialisation with WGS-72 constants.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sgp4Init;

impl PropagatorInit for Sgp4Init {
    fn init(&self, tle: &Tle) -> PropagationParams {
        let xno = tle.xno();
        let eo = tle.eccentricity;
        if !(xno.is_finite() && xno > 0.0 && (0.0..1.0).contains(&eo)) {
            return PropagationParams::zeroed();
        }

        let xincl = tle.inclination_deg * DEG2RAD;
        let omegao = tle.arg_perigee_deg * DEG2RAD;

        // Recover original mean motion (xnodp) and semi-major axis (aodp)
        let a1 = (XKE / xno).powf(TWO_THIRDS);
        let cosio = xincl.cos();
        let theta2 = cosio * cosio;
        let x3thm1 = 3.0 * theta2 - 1.0;
        let x1mth2 = 1.0 - theta2;
        let betao2 = 1.0 - eo * eo;
        let betao = betao2.sqrt();
        let del1 = 1.5 * CK2 * x3thm1 / (a1 * a1 * betao * betao2);
        let ao = a1 * (1.0 - del1 * (0.5 * TWO_THIRDS + del1 * (1.0 + 134.0 / 81.0 * del1)));
        let delo = 1.5 * CK2 * x3thm1 / (ao * ao * betao * betao2);
        let xnodp = xno / (1.0 + delo);
        let aodp = ao / (1.0 - delo);

        // Density parameter depends on perigee height
        let perigee_km = (aodp * (1.0 - eo) - AE) * EARTH_RADIUS_KM;
        let (s4, qoms24) = if perigee_km < LOW_PERIGEE_KM {
            let s = if perigee_km <= VERY_LOW_PERIGEE_KM {
                20.0
            } else {
                perigee_km - 78.0
            };
            let qoms24 = ((120.0 - s) * AE / EARTH_RADIUS_KM).powi(4);
            (s / EARTH_RADIUS_KM + AE, qoms24)
        } else {
            (S_DENSITY, QOMS2T)
        };

        let tsi = 1.0 / (aodp - s4);
        let eta = aodp * eo * tsi;
        let etasq = eta * eta;
        let eeta = eo * eta;
        let psisq = (1.0 - etasq).abs();
        let coef = qoms24 * tsi.powi(4);
        let coef1 = coef / psisq.powf(3.5);

        let c2 = coef1
            * xnodp
            * (aodp * (1.0 + 1.5 * etasq + eeta * (4.0 + etasq))
                + 0.75 * CK2 * tsi / psisq * x3thm1 * (8.0 + 3.0 * etasq * (8.0 + etasq)));
        let c1 = tle.bstar * c2;

        let c4 = 2.0
            * xnodp
            * coef1
            * aodp
            * betao2
            * (eta * (2.0 + 0.5 * etasq) + eo * (0.5 + 2.0 * etasq)
                - 2.0 * CK2 * tsi / (aodp * psisq)
                    * (-3.0 * x3thm1 * (1.0 - 2.0 * eeta + etasq * (1.5 - 0.5 * eeta))
                        + 0.75 * x1mth2 * (2.0 * etasq - eeta * (1.0 + etasq)) * (2.0 * omegao).cos()));

        let mut coefficients = [0.0; N_SGP4_PARAMS];
        coefficients[C2] = c2;
        coefficients[C1] = c1;
        coefficients[C4] = c4;
        coefficients[AODP] = aodp;
        coefficients[XNODP] = xnodp;
        coefficients[ETA] = eta;
        coefficients[PERIGEE_KM] = perigee_km;
        coefficients[S4] = s4;
        PropagationParams(coefficients)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const ISS_LINE1: &str = "1 25544U 98067A   25278.49802050  .00011384  00000+0  20935-3 0  9990";
    const ISS_LINE2: &str = "2 25544  51.6327 120.3420 0000884 206.2421 153.8523 15.49697304532279";

    fn iss() -> Tle {
        Tle::parse(ISS_LINE1, ISS_LINE2).unwrap()
    }

    #[test]
    fn test_iss_c2() {
        let params = Sgp4Init.init(&iss());
        assert_relative_eq!(params.c2(), 1.69009e-5, max_relative = 1e-4);
        assert_relative_eq!(params.get(C1).unwrap(), 0.20935e-3 * params.c2(), max_relative = 1e-12);
    }

    #[test]
    fn test_iss_recovered_elements() {
        let params = Sgp4Init.init(&iss());
        let aodp = params.get(AODP).unwrap();
        // ISS semi-major axis is roughly 6790-6800 km
        assert!(aodp * EARTH_RADIUS_KM > 6780.0 && aodp * EARTH_RADIUS_KM < 6810.0);
        let perigee = params.get(PERIGEE_KM).unwrap();
        assert!(perigee > 400.0 && perigee < 430.0, "perigee={perigee} km");
        // Above 156 km the density parameter stays at its nominal value
        assert_relative_eq!(params.get(S4).unwrap(), S_DENSITY, epsilon = 1e-15);
    }

    #[test]
    fn test_c2_is_independent_of_bstar() {
        let mut tle = iss();
        let c2 = Sgp4Init.init(&tle).c2();
        tle.bstar = 0.0;
        let params = Sgp4Init.init(&tle);
        assert_relative_eq!(params.c2(), c2, epsilon = 1e-18);
        assert_eq!(params.get(C1), Some(0.0));
    }

    #[test]
    fn test_low_perigee_adjusts_density_parameter() {
        let mut tle = iss();
        // 16.45 rev/day puts perigee near 150 km
        tle.mean_motion_rev_day = 16.45;
        let params = Sgp4Init.init(&tle);
        let perigee = params.get(PERIGEE_KM).unwrap();
        assert!(perigee < LOW_PERIGEE_KM, "perigee={perigee} km");
        assert!(params.get(S4).unwrap() < S_DENSITY);
        assert!(params.c2() > 0.0);
    }

    #[test]
    fn test_invalid_elements_give_zero_coefficients() {
        let mut tle = iss();
        tle.mean_motion_rev_day = 0.0;
        assert_eq!(Sgp4Init.init(&tle), PropagationParams::zeroed());

        let mut tle = iss();
        tle.eccentricity = 1.0;
        assert_eq!(Sgp4Init.init(&tle).c2(), 0.0);
    }

    #[test]
    fn test_params_slots() {
        let params = PropagationParams::with_c2(3.5e-5);
        assert_eq!(params.c2(), 3.5e-5);
        assert_eq!(params.get(C1), Some(0.0));
        assert_eq!(params.get(N_SGP4_PARAMS), None);
    }
}
