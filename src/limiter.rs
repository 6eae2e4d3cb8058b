//! Convex limiting of a high-order correction against local bounds.
//!
//! Given an admissible low-order state U, a candidate correction P and the
//! local [`Bounds`], find the largest t in [0, 1] such that U + t P
//! satisfies every bound:
//!
//! 1. density bounds, in closed form (the density is linear in t)
//! 2. every concave constraint ψ_k of the system, by a bounded number of
//!    quadratic Newton steps on the bracket [t_l, t_r]
//!
//! Because every constraint set is convex and contains t = 0, the left end
//! of each bracket stays admissible and is returned when the iteration does
//! not converge. Non-convergence is therefore not an error, only extra
//! limiting.
//!
//! # References
//! - Guermond, Nazarov, Popov & Tomas (2018), "Second-order invariant
//!   domain preserving approximation of the Euler equations using convex
//!   limiting", SIAM J. Sci. Comput. 40(5).

use crate::bounds::Bounds;
use crate::equations::HyperbolicSystem;
use crate::newton::quadratic_newton_step;
use crate::types::State;

/// Convex limiter parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LimiterConfig {
    /// Maximal number of Newton steps per constraint
    pub iterations: usize,
    /// Bracket width below which the iteration stops
    pub tolerance: f64,
    /// Limiting passes per step; pass k > 1 limits the correction left
    /// over by pass k - 1 against the same bounds
    pub passes: usize,
}

impl Default for LimiterConfig {
    fn default() -> Self {
        Self {
            iterations: 2,
            tolerance: 1.0e-10,
            passes: 2,
        }
    }
}

impl LimiterConfig {
    /// Set the number of Newton steps.
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Set the bracket tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Set the number of limiting passes.
    pub fn with_passes(mut self, passes: usize) -> Self {
        self.passes = passes;
        self
    }
}

/// Largest t in [0, 1] with `rho_min <= ρ(u + t p) <= rho_max`.
#[inline]
fn limit_density(bounds: &Bounds, u: &State, p: &State) -> f64 {
    let rho = u[0];
    let p_rho = p[0];
    let mut t = 1.0_f64;

    if p_rho < 0.0 && bounds.rho_min.is_finite() {
        t = t.min((bounds.rho_min - rho) / p_rho);
    }
    if p_rho > 0.0 && bounds.rho_max.is_finite() {
        t = t.min((bounds.rho_max - rho) / p_rho);
    }

    // A low-order density outside its own bounds admits no correction.
    if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) }
}

/// Solve ψ_k(u + t p) >= 0 on [0, t_max] for one concave constraint.
fn limit_constraint<S: HyperbolicSystem + ?Sized>(
    system: &S,
    k: usize,
    bounds: &Bounds,
    u: &State,
    p: &State,
    t_max: f64,
    config: &LimiterConfig,
) -> f64 {
    let Some((mut psi_l, mut grad_l)) = system.constraint(k, bounds, u) else {
        return t_max;
    };
    if !(psi_l >= 0.0) {
        return 0.0;
    }

    let mut t_l = 0.0_f64;
    let mut t_r = t_max;

    for n in 0..=config.iterations {
        let u_r = *u + *p * t_r;
        let Some((psi_r, grad_r)) = system.constraint(k, bounds, &u_r) else {
            return t_r;
        };
        if psi_r >= 0.0 {
            return t_r;
        }
        if n == config.iterations || t_r - t_l < config.tolerance {
            return t_l;
        }
        if !psi_r.is_finite() {
            t_r = 0.5 * (t_l + t_r);
            continue;
        }

        // ψ decreases across the bracket; solve on s = -t, where it is
        // increasing and still concave.
        let dpsi_l = grad_l.dot(p);
        let dpsi_r = grad_r.dot(p);
        let (s_1, s_2) = quadratic_newton_step(-t_r, -t_l, psi_r, psi_l, -dpsi_r, -dpsi_l);

        let t_l_new = -s_2;
        t_r = -s_1;

        let u_l = *u + *p * t_l_new;
        if let Some((psi, grad)) = system.constraint(k, bounds, &u_l) {
            if psi >= 0.0 {
                t_l = t_l_new;
                psi_l = psi;
                grad_l = grad;
            }
        }
        t_r = t_r.max(t_l);
    }

    t_l
}

/// Largest admissible fraction of the correction `p` applied to `u`.
///
/// Returns `(t, success)` where `success` is true if the full correction
/// (t = 1) is admissible.
///
/// # Example
///
/// ```
/// use convex_idp::bounds::Bounds;
/// use convex_idp::equations::Euler;
/// use convex_idp::limiter::{limit, LimiterConfig};
/// use convex_idp::types::State;
///
/// let euler = Euler::new(1, 1.4);
/// let u = State::from_slice(&[1.0, 0.0, 2.5]);
/// let bounds = Bounds { rho_min: 0.5, rho_max: 1.0, ..Bounds::unbounded() };
/// let p = State::from_slice(&[-1.0, 0.0, 0.0]);
///
/// let (t, success) = limit(&euler, &bounds, &u, &p, &LimiterConfig::default());
/// assert!((t - 0.5).abs() < 1e-14);
/// assert!(!success);
/// ```
pub fn limit<S: HyperbolicSystem + ?Sized>(
    system: &S,
    bounds: &Bounds,
    u: &State,
    p: &State,
    config: &LimiterConfig,
) -> (f64, bool) {
    if p.is_zero() {
        return (1.0, true);
    }

    let mut t = limit_density(bounds, u, p);
    for k in 0..system.n_constraints() {
        if t <= 0.0 {
            break;
        }
        t = limit_constraint(system, k, bounds, u, p, t, config);
    }

    (t, t >= 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::equations::{Euler, EulerPrimitive, ShallowWater, ShallowWaterPrimitive};

    const TOL: f64 = 1e-12;

    fn euler_bounds(euler: &Euler, stencil: &[State]) -> Bounds {
        let mut b = euler.bounds(stencil);
        b.relax(0.0);
        b
    }

    #[test]
    fn test_zero_correction_is_free() {
        let euler = Euler::new(1, 1.4);
        let u = euler.from_primitive(&EulerPrimitive::new_1d(1.0, 0.0, 1.0));
        let config = LimiterConfig::default();
        let (t, success) = limit(&euler, &Bounds::unbounded(), &u, &State::zero(), &config);
        assert_eq!(t, 1.0);
        assert!(success);
    }

    #[test]
    fn test_density_limited_at_equality() {
        let euler = Euler::new(1, 1.4);
        let u = State::from_slice(&[1.0, 0.0, 2.5]);
        let bounds = Bounds {
            rho_min: 0.8,
            rho_max: 1.2,
            ..Bounds::unbounded()
        };

        let down = State::from_slice(&[-0.4, 0.0, 0.0]);
        let (t, _) = limit(&euler, &bounds, &u, &down, &LimiterConfig::default());
        assert!((t - 0.5).abs() < TOL);
        assert!(u[0] + t * down[0] >= bounds.rho_min - TOL);

        let up = State::from_slice(&[0.1, 0.0, 0.0]);
        let (t, success) = limit(&euler, &bounds, &u, &up, &LimiterConfig::default());
        assert_eq!(t, 1.0);
        assert!(success);
    }

    #[test]
    fn test_entropy_bound_respected() {
        let euler = Euler::new(1, 1.4);
        let u = euler.from_primitive(&EulerPrimitive::new_1d(1.0, 0.0, 1.0));
        let bounds = euler_bounds(&euler, &[u]);

        // Drain internal energy: violates the entropy floor for t > 0.
        let p = State::from_slice(&[0.0, 0.0, -1.0]);
        let config = LimiterConfig::default().with_iterations(6);
        let (t, success) = limit(&euler, &bounds, &u, &p, &config);
        assert!(!success);
        assert!((0.0..1.0).contains(&t));
        let limited = u + p * t;
        assert!(euler.specific_entropy(&limited) >= bounds.s_min * (1.0 - 1e-12));
    }

    #[test]
    fn test_coefficient_in_unit_interval_for_random_like_corrections() {
        let euler = Euler::new(1, 1.4);
        let left = euler.from_primitive(&EulerPrimitive::new_1d(1.0, 0.5, 1.0));
        let right = euler.from_primitive(&EulerPrimitive::new_1d(0.125, -0.2, 0.1));
        let bounds = euler_bounds(&euler, &[left, right]);

        for scale in [-3.0, -1.0, -0.1, 0.1, 1.0, 3.0] {
            let p = (right - left) * scale;
            let (t, _) = limit(&euler, &bounds, &left, &p, &LimiterConfig::default());
            assert!((0.0..=1.0).contains(&t), "t = {} for scale {}", t, scale);
            let limited = left + p * t;
            assert!(euler.is_admissible(&limited), "scale {}: {:?}", scale, limited);
            assert!(limited[0] >= bounds.rho_min - TOL && limited[0] <= bounds.rho_max + TOL);
        }
    }

    #[test]
    fn test_inadmissible_base_state_admits_nothing() {
        let euler = Euler::new(1, 1.4);
        let u = State::from_slice(&[1.0, 0.0, 2.5]);
        let bounds = Bounds {
            rho_min: 1.5,
            ..Bounds::unbounded()
        };
        let p = State::from_slice(&[-0.1, 0.0, 0.0]);
        let (t, success) = limit(&euler, &bounds, &u, &p, &LimiterConfig::default());
        assert_eq!(t, 0.0);
        assert!(!success);
    }

    #[test]
    fn test_shallow_water_speed_cone() {
        let swe = ShallowWater::new(1, 9.81);
        let u = swe.from_primitive(&ShallowWaterPrimitive::new_1d(1.0, 0.5));
        let bounds = Bounds {
            rho_min: 0.5,
            rho_max: 2.0,
            speed_max: 1.0,
            ..Bounds::unbounded()
        };
        // Accelerate without adding water.
        let p = State::from_slice(&[0.0, 2.0]);
        let (t, _) = limit(&swe, &bounds, &u, &p, &LimiterConfig::default().with_iterations(4));
        let limited = u + p * t;
        let speed = swe.velocity(&limited).norm();
        assert!(speed <= 1.0 + 1e-10, "speed {} exceeds bound", speed);
        assert!(t > 0.2, "linear constraint should be solved almost exactly: {}", t);
    }
}
