//! Local bounds for the convex limiter.
//!
//! For every node the bounds are the tightest box containing the low-order
//! states of the node and its graph neighbours (local maximum/minimum
//! principle). Which quantities are bounded depends on the system:
//!
//! | System        | Bounds                                   |
//! |---------------|------------------------------------------|
//! | Euler         | ρ_min, ρ_max, s_min                      |
//! | Euler (AEOS)  | ρ_min, ρ_max, γ_min, s_min (using γ_min)  |
//! | Shallow water | h_min, h_max, speed_max                  |
//!
//! Every bound is widened by a relative round-off guard and, optionally, by
//! a mesh-dependent relaxation
//!
//! r_i = factor · (m_i / |Ω|)^(1.5 / dim).

use crate::equations::HyperbolicSystem;
use crate::graph::Graph;
use crate::types::State;

/// Relative widening applied to every bound.
pub const ROUND_OFF_GUARD: f64 = 1.0e-10;

/// Largest relative relaxation applied to a bound.
pub const MAX_RELAXATION: f64 = 0.5;

/// Bounds record of one node.
///
/// Inactive entries hold the neutral infinities, so an unbounded record
/// admits every state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    /// Lower density (depth) bound
    pub rho_min: f64,
    /// Upper density (depth) bound
    pub rho_max: f64,
    /// Specific entropy floor
    pub s_min: f64,
    /// Smallest surrogate adiabatic exponent in the stencil
    pub gamma_min: f64,
    /// Velocity magnitude ceiling
    pub speed_max: f64,
}

impl Default for Bounds {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl Bounds {
    /// Bounds that admit every state.
    pub const fn unbounded() -> Self {
        Self {
            rho_min: f64::NEG_INFINITY,
            rho_max: f64::INFINITY,
            s_min: f64::NEG_INFINITY,
            gamma_min: f64::INFINITY,
            speed_max: f64::INFINITY,
        }
    }

    /// True if the density lies in [rho_min, rho_max].
    #[inline]
    pub fn contains_density(&self, rho: f64) -> bool {
        rho >= self.rho_min && rho <= self.rho_max
    }

    /// Widen all active bounds by the round-off guard plus `relaxation`.
    ///
    /// `relaxation` is clamped to [0, MAX_RELAXATION]. Widening never
    /// shrinks a bound, so every state admitted before is admitted after.
    pub fn relax(&mut self, relaxation: f64) {
        let r = ROUND_OFF_GUARD + relaxation.clamp(0.0, MAX_RELAXATION);
        self.rho_min = widen_down(self.rho_min, r);
        self.rho_max = widen_up(self.rho_max, r);
        self.s_min = widen_down(self.s_min, r);
        self.speed_max = widen_up(self.speed_max, r);
    }
}

#[inline]
fn widen_down(x: f64, r: f64) -> f64 {
    if !x.is_finite() {
        x
    } else if x >= 0.0 {
        x * (1.0 - r)
    } else {
        x * (1.0 + r)
    }
}

#[inline]
fn widen_up(x: f64, r: f64) -> f64 {
    if !x.is_finite() {
        x
    } else if x >= 0.0 {
        x * (1.0 + r)
    } else {
        x * (1.0 - r)
    }
}

/// Configuration of the bounds evaluator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundsConfig {
    /// Factor of the mesh-dependent relaxation (0 disables it)
    pub relaxation_factor: f64,
}

impl Default for BoundsConfig {
    fn default() -> Self {
        Self {
            relaxation_factor: 0.0,
        }
    }
}

impl BoundsConfig {
    /// Set the relaxation factor.
    pub fn with_relaxation_factor(mut self, factor: f64) -> Self {
        self.relaxation_factor = factor;
        self
    }

    /// Relaxation for a node of lumped mass `mass`.
    #[inline]
    pub fn relaxation(&self, mass: f64, total_mass: f64, dim: usize) -> f64 {
        if self.relaxation_factor <= 0.0 {
            return 0.0;
        }
        self.relaxation_factor * (mass / total_mass).powf(1.5 / dim as f64)
    }
}

/// Bounds of node `i` from the low-order state.
pub fn node_bounds<S: HyperbolicSystem + ?Sized>(
    graph: &Graph,
    system: &S,
    low_order: &[State],
    config: &BoundsConfig,
    i: usize,
) -> Bounds {
    let mut stencil = Vec::with_capacity(graph.degree(i) + 1);
    stencil.push(low_order[i]);
    stencil.extend(graph.neighbors(i).map(|(_, j)| low_order[j]));

    let mut bounds = system.bounds(&stencil);
    bounds.relax(config.relaxation(graph.lumped_mass(i), graph.total_mass(), graph.dim()));
    bounds
}

/// Bounds of every node, evaluated per partition range.
pub fn compute_bounds<S: HyperbolicSystem + ?Sized>(
    graph: &Graph,
    system: &S,
    low_order: &[State],
    config: &BoundsConfig,
) -> Vec<Bounds> {
    graph
        .partition()
        .map_nodes(|i| node_bounds(graph, system, low_order, config, i))
}
