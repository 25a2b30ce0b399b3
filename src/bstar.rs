//! B* back-solve from the mean-motion decay rate (Ted Molczan's method).
//!
//! SGP4 models secular decay through C1 = B* · C2, which makes the mean
//! motion grow as n(t) ≈ n0 (1 + 3 C1 t). Matching that to the observed
//! first derivative gives
//!
//! ```text
//! ndot/2 = 1.5 · n0 · C2 · B*   =>   B* = xndt2o / (xno · C2 · 1.5)
//! ```
//!
//! with `xno` in rad/min and `xndt2o` (ndot/2) in rad/min².

use log::debug;
use crate::sgp4::PropagationParams;
use crate::tle::Tle;

/// B* that reproduces `xndt2o` given `xno` and the propagator's `c2`.
///
/// `None` when `c2` or `xno` is zero (or `c2` is not finite); there is no
/// drag term to recover in that case.
pub fn solve_bstar(xndt2o: f64, xno: f64, c2: f64) -> Option<f64> {
    if c2 == 0.0 || xno == 0.0 || !c2.is_finite() {
        return None;
    }
    Some(xndt2o / (xno * c2 * 1.5))
}

/// Overwrite `tle.bstar` with the back-solved value.
///
/// Returns the new B*, or `None` if the record was left untouched.
pub fn derive_bstar(tle: &mut Tle, params: &PropagationParams) -> Option<f64> {
    let bstar = solve_bstar(tle.xndt2o(), tle.xno(), params.c2())?;
    debug!(
        "NORAD {:05}: B* {:.5e} -> {:.5e} (c2 = {:.6e})",
        tle.norad_id, tle.bstar, bstar, params.c2()
    );
    tle.bstar = bstar;
    Some(bstar)
}
