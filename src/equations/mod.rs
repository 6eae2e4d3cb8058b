//! Hyperbolic systems and equation-of-state policies.
//!
//! All physical models implement a single capability interface,
//! [`HyperbolicSystem`]. The time-stepping core is written once against this
//! trait; the model is chosen at configuration time through the [`Model`]
//! enum:
//!
//! - [`Euler`]: compressible Euler equations, polytropic gas
//! - [`EulerAeos`]: compressible Euler equations, arbitrary equation of state
//! - [`ShallowWater`]: shallow water equations over a flat bottom
//!
//! Conserved states are stored in a fixed [`State`]; component 0 is always
//! the density (water depth) so the density limiter is model independent.

mod eos;
mod euler;
mod euler_aeos;
mod model;
mod shallow_water;

pub use eos::{EquationOfState, NobleAbelStiffenedGas, PolytropicGas, StandardEos};
pub use euler::{Euler, EulerPrimitive};
pub use euler_aeos::EulerAeos;
pub use model::{Model, ModelConfig, ModelKind};
pub use shallow_water::{ShallowWater, ShallowWaterPrimitive};

use crate::bounds::Bounds;
use crate::riemann::{WaveSpeedEstimate, WaveSpeedGuarantee};
use crate::types::{State, Vector3};

/// Capability interface of a hyperbolic system of conservation laws.
///
/// # Implementation Notes
///
/// - Component 0 of a state must be a density-like quantity that is
///   bounded from below and above by the local maximum principle.
/// - [`wave_speed`](Self::wave_speed) must return an upper bound on the
///   maximal wave speed of the 1D Riemann problem in direction `n_ij`; if
///   the bound is only heuristic, report
///   [`WaveSpeedGuarantee::Approximate`].
/// - Every constraint returned by [`constraint`](Self::constraint) must be
///   concave in the conserved state and non-negative on every state used
///   to compute the bounds.
pub trait HyperbolicSystem: Send + Sync {
    /// Human-readable name for debugging and logging.
    fn name(&self) -> &'static str;

    /// Space dimension (1, 2 or 3).
    fn dim(&self) -> usize;

    /// Number of conserved components in use.
    fn n_components(&self) -> usize;

    /// True if `u` lies in the admissible set.
    fn is_admissible(&self, u: &State) -> bool;

    /// Flux contracted with a direction: f(U) · c.
    fn flux_contract(&self, u: &State, c: &Vector3) -> State;

    /// Upper bound on the maximal wave speed of the Riemann problem with
    /// left state `u_i`, right state `u_j` and unit normal `n_ij`.
    fn wave_speed(&self, u_i: &State, u_j: &State, n_ij: &Vector3) -> WaveSpeedEstimate;

    /// Strength of the bound returned by [`wave_speed`](Self::wave_speed).
    fn wave_speed_guarantee(&self) -> WaveSpeedGuarantee {
        WaveSpeedGuarantee::Provable
    }

    /// Tightest bounds containing every state of `stencil`.
    ///
    /// `stencil` is never empty; by convention the first entry is the
    /// node's own state.
    fn bounds(&self, stencil: &[State]) -> Bounds;

    /// Number of concave constraints used by the convex limiter in addition
    /// to the density bounds.
    fn n_constraints(&self) -> usize {
        0
    }

    /// Value ψ_k(U) and gradient ∂ψ_k/∂U of constraint `k`.
    ///
    /// The set {ψ_k >= 0} is convex. Returns `None` if the constraint is
    /// inactive for the given bounds.
    fn constraint(&self, k: usize, bounds: &Bounds, u: &State) -> Option<(f64, State)> {
        let _ = (k, bounds, u);
        None
    }

    /// Scalar quantity monitored by the smoothness indicator.
    fn indicator_variable(&self, u: &State) -> f64 {
        u[0]
    }
}
