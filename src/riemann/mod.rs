//! Guaranteed upper bounds on the maximal wave speed of 1D Riemann problems.
//!
//! The low-order graph-viscosity update is invariant-domain preserving only
//! if the viscosity dominates the maximal signal speed of every local
//! Riemann problem. The estimators in this module deliver such a bound
//! without iterating on the exact star-state:
//!
//! - [`PolytropicRiemannSolver`]: compressible Euler, polytropic gas
//! - [`ShallowWaterRiemannSolver`]: shallow water equations
//!
//! Both evaluate the known-sign test function φ at the larger of the two
//! input pressures (depths), bracket the star value between that value and a
//! closed-form two-rarefaction estimate, and evaluate the extreme wave
//! speeds at the upper end of the bracket.
//!
//! # References
//! - Guermond & Popov (2016), "Fast estimation from above for the maximum
//!   wave speed in the Riemann problem for the Euler equations", JCP 321.
//! - Toro, "Riemann Solvers and Numerical Methods for Fluid Dynamics".

mod euler;
mod shallow_water;

pub use euler::PolytropicRiemannSolver;
pub use shallow_water::ShallowWaterRiemannSolver;

/// Projection of a conserved state onto a direction ("1D Riemann data").
///
/// For shallow water `rho` holds the depth and `p` the hydrostatic depth,
/// i.e. both equal `h`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RiemannData {
    /// Density (or water depth)
    pub rho: f64,
    /// Velocity normal to the interface
    pub u: f64,
    /// Pressure (or water depth)
    pub p: f64,
    /// Sound speed (or celerity sqrt(g h))
    pub a: f64,
}

impl RiemannData {
    /// True if density and pressure are positive and all entries finite.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.rho > 0.0
            && self.p > 0.0
            && self.rho.is_finite()
            && self.u.is_finite()
            && self.p.is_finite()
            && self.a.is_finite()
    }
}

/// Result of a wave-speed estimate.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WaveSpeedEstimate {
    /// Upper bound on the maximal absolute wave speed
    pub lambda_max: f64,
    /// Upper end of the star pressure (depth) bracket
    pub p_star: f64,
    /// Number of Newton iterations performed (0 in the default setting)
    pub iterations: usize,
}

impl WaveSpeedEstimate {
    /// Degenerate estimate returned for two invalid inputs.
    pub const fn zero() -> Self {
        Self {
            lambda_max: 0.0,
            p_star: 0.0,
            iterations: 0,
        }
    }
}

/// How strong the wave-speed bound of a system is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WaveSpeedGuarantee {
    /// Provably an upper bound of the exact maximal wave speed.
    Provable,
    /// Heuristic bound (general equations of state); callers may want a
    /// safety margin.
    Approximate,
}
