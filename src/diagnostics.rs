//! Step diagnostics and conservation checks.
//!
//! - [`StepStats`]: what happened during one step (step sizes, limiting)
//! - [`ConservedTotals`]: mass-weighted sums Σ_i m_i U_i of every component
//!
//! # Example
//!
//! ```
//! use convex_idp::diagnostics::ConservedTotals;
//! use convex_idp::graph::StructuredGraph;
//! use convex_idp::types::State;
//!
//! let mesh = StructuredGraph::uniform_1d(11, 0.0, 1.0);
//! let u = vec![State::from_slice(&[2.0, 0.0, 5.0]); 11];
//! let totals = ConservedTotals::compute(&mesh.graph, &u);
//! assert!((totals.totals[0] - 2.0).abs() < 1e-14);
//! ```

use crate::graph::Graph;
use crate::time::RestartReason;
use crate::types::State;

/// Summary of one step.
#[derive(Clone, Debug, PartialEq)]
pub struct StepStats {
    /// Step size used
    pub tau: f64,
    /// Admissible step size for the configured CFL number
    pub tau_max: f64,
    /// Number of stored entries with l_ij < 1
    pub n_limited_entries: usize,
    /// Smallest limiter coefficient (1 if nothing was limited)
    pub min_limiter: f64,
    /// Smallest low-order density
    pub min_low_order_density: f64,
    /// Violation detected during the step, if any
    pub violation: Option<RestartReason>,
}

impl Default for StepStats {
    fn default() -> Self {
        Self {
            tau: 0.0,
            tau_max: 0.0,
            n_limited_entries: 0,
            min_limiter: 1.0,
            min_low_order_density: f64::INFINITY,
            violation: None,
        }
    }
}

impl StepStats {
    /// Fraction of entries that were limited.
    pub fn limited_fraction(&self, n_entries: usize) -> f64 {
        if n_entries == 0 {
            0.0
        } else {
            self.n_limited_entries as f64 / n_entries as f64
        }
    }
}

/// Integrals Σ_i m_i U_i of all conserved components.
#[derive(Clone, Debug, PartialEq)]
pub struct ConservedTotals {
    /// Lumped-mass weighted sum per component
    pub totals: State,
    /// Smallest density over all nodes
    pub min_density: f64,
    /// Largest density over all nodes
    pub max_density: f64,
}

impl ConservedTotals {
    /// Compute totals of `u` on `graph`.
    pub fn compute(graph: &Graph, u: &[State]) -> Self {
        let mut totals = State::zero();
        let mut min_density = f64::INFINITY;
        let mut max_density = f64::NEG_INFINITY;
        for (i, state) in u.iter().enumerate() {
            totals.axpy(graph.lumped_mass(i), state);
            min_density = min_density.min(state[0]);
            max_density = max_density.max(state[0]);
        }
        Self {
            totals,
            min_density,
            max_density,
        }
    }

    /// Largest relative change of a component total with respect to `initial`.
    pub fn relative_drift(&self, initial: &ConservedTotals) -> f64 {
        let mut drift = 0.0_f64;
        for k in 0..self.totals.0.len() {
            let scale = initial.totals[k].abs();
            let change = (self.totals[k] - initial.totals[k]).abs();
            drift = drift.max(if scale > 0.0 { change / scale } else { change });
        }
        drift
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::StructuredGraph;

    #[test]
    fn test_totals_weighted_by_mass() {
        let mesh = StructuredGraph::uniform_1d(3, 0.0, 2.0);
        let u = vec![
            State::from_slice(&[1.0, 1.0]),
            State::from_slice(&[2.0, 0.0]),
            State::from_slice(&[3.0, -1.0]),
        ];
        let totals = ConservedTotals::compute(&mesh.graph, &u);
        // masses 0.5, 1.0, 0.5
        assert!((totals.totals[0] - 4.0).abs() < 1e-14);
        assert!(totals.totals[1].abs() < 1e-14);
        assert_eq!(totals.min_density, 1.0);
        assert_eq!(totals.max_density, 3.0);
        assert_eq!(totals.relative_drift(&totals), 0.0);
    }

    #[test]
    fn test_limited_fraction() {
        let stats = StepStats {
            n_limited_entries: 3,
            ..StepStats::default()
        };
        assert_eq!(stats.limited_fraction(12), 0.25);
        assert_eq!(StepStats::default().limited_fraction(0), 0.0);
    }
}
