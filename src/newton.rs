//! Quadratic Newton bracketing for concave, increasing scalar functions.
//!
//! Given `p_1 < p_2` with `φ(p_1) <= 0 <= φ(p_2)` and φ concave and
//! increasing, one step produces a new bracket `[p_1', p_2']` that still
//! contains the root. The left end approaches from below and the right end
//! from above, so either end can be used as a guaranteed one-sided bound
//! after any number of steps.
//!
//! Reference: Guermond & Popov (2016), "Fast estimation from above for the
//! maximum wave speed in the Riemann problem for the Euler equations", §4.3.

/// Guard for divisions by (nearly) vanishing denominators.
pub const NEWTON_EPS: f64 = 1.0e-14;

/// Perform one quadratic Newton step on the bracket `[p_1, p_2]`.
///
/// # Arguments
/// * `p_1`, `p_2` - Current bracket, `p_1 <= p_2`
/// * `phi_1`, `phi_2` - φ(p_1) <= 0 and φ(p_2) >= 0
/// * `dphi_1`, `dphi_2` - φ'(p_1) and φ'(p_2)
///
/// # Returns
/// The updated bracket `(p_1', p_2')`.
#[inline]
pub fn quadratic_newton_step(
    p_1: f64,
    p_2: f64,
    phi_1: f64,
    phi_2: f64,
    dphi_1: f64,
    dphi_2: f64,
) -> (f64, f64) {
    let scaling = 1.0 / (p_2 - p_1 + NEWTON_EPS);

    // Divided differences
    let dd_11 = dphi_1;
    let dd_12 = (phi_2 - phi_1) * scaling;
    let dd_22 = dphi_2;
    let dd_112 = (dd_12 - dd_11) * scaling;
    let dd_122 = (dd_22 - dd_12) * scaling;

    let discriminant_1 = (dd_11 * dd_11 - 4.0 * phi_1 * dd_122).abs();
    let discriminant_2 = (dd_22 * dd_22 - 4.0 * phi_2 * dd_112).abs();

    let denominator_1 = dd_11 + discriminant_1.sqrt();
    let denominator_2 = dd_22 + discriminant_2.sqrt();

    let step_1 = if denominator_1.abs() < NEWTON_EPS {
        0.0
    } else {
        2.0 * phi_1 / denominator_1
    };
    let step_2 = if denominator_2.abs() < NEWTON_EPS {
        0.0
    } else {
        2.0 * phi_2 / denominator_2
    };

    let new_1 = p_1 - step_1;
    let new_2 = p_2 - step_2;

    // Never widen the bracket.
    (new_1.max(p_1).min(p_2), new_2.min(p_2).max(p_1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bracket_contains_root() {
        // φ(p) = sqrt(p) - 2, root at p = 4
        let phi = |p: f64| p.sqrt() - 2.0;
        let dphi = |p: f64| 0.5 / p.sqrt();

        let (mut p_1, mut p_2) = (1.0, 9.0);
        for _ in 0..4 {
            let (a, b) = quadratic_newton_step(p_1, p_2, phi(p_1), phi(p_2), dphi(p_1), dphi(p_2));
            assert!(a <= 4.0 + 1e-12, "left end overshoots: {}", a);
            assert!(b >= 4.0 - 1e-12, "right end undershoots: {}", b);
            assert!(b - a <= p_2 - p_1);
            p_1 = a;
            p_2 = b;
        }
        assert!(p_2 - p_1 < 1e-6, "bracket not converged: [{}, {}]", p_1, p_2);
    }

    #[test]
    fn test_degenerate_bracket() {
        let (a, b) = quadratic_newton_step(2.0, 2.0, 0.0, 0.0, 1.0, 1.0);
        assert_eq!((a, b), (2.0, 2.0));
    }
}
