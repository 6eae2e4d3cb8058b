//! Smoothness indicator for the high-order graph viscosity.
//!
//! For a scalar quantity q (the density for every provided system)
//!
//! α_i = ( |Σ_j (q_j - q_i)| / Σ_j |q_j - q_i| )^power
//!
//! is close to 0 where q is smooth and 1 at local extrema and
//! discontinuities. The high-order viscosity is d^H_ij = max(α_i, α_j) d_ij.
//! A power of zero switches the indicator off (α ≡ 1, d^H = d).

use crate::equations::HyperbolicSystem;
use crate::graph::{EdgeMatrix, Graph};
use crate::types::State;

/// Default exponent of the indicator.
pub const DEFAULT_INDICATOR_POWER: f64 = 2.0;

/// Indicator value of node `i`.
pub fn smoothness_indicator<S: HyperbolicSystem + ?Sized>(
    graph: &Graph,
    system: &S,
    u: &[State],
    power: f64,
    i: usize,
) -> f64 {
    if power == 0.0 {
        return 1.0;
    }
    let q_i = system.indicator_variable(&u[i]);
    let mut numerator = 0.0;
    let mut denominator = 0.0;
    for (_, j) in graph.neighbors(i) {
        let jump = system.indicator_variable(&u[j]) - q_i;
        numerator += jump;
        denominator += jump.abs();
    }

    if denominator <= f64::EPSILON * q_i.abs() {
        return 0.0;
    }
    (numerator.abs() / denominator).min(1.0).powf(power)
}

/// Indicator values of every node.
pub fn compute_indicators<S: HyperbolicSystem + ?Sized>(
    graph: &Graph,
    system: &S,
    u: &[State],
    power: f64,
) -> Vec<f64> {
    graph
        .partition()
        .map_nodes(|i| smoothness_indicator(graph, system, u, power, i))
}

/// High-order viscosity d^H_ij = max(α_i, α_j) d_ij.
pub fn high_order_viscosity(
    graph: &Graph,
    dij: &EdgeMatrix<f64>,
    alpha: &[f64],
) -> EdgeMatrix<f64> {
    let mut values = Vec::with_capacity(graph.n_entries());
    for i in 0..graph.n_nodes() {
        for (e, j) in graph.neighbors(i) {
            values.push(alpha[i].max(alpha[j]) * dij.get(e));
        }
    }
    EdgeMatrix::from_values(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::equations::Euler;
    use crate::graph::StructuredGraph;

    fn density_profile(values: &[f64]) -> Vec<State> {
        values.iter().map(|&rho| State::from_slice(&[rho, 0.0, 2.5])).collect()
    }

    #[test]
    fn test_linear_profile_is_smooth() {
        let mesh = StructuredGraph::uniform_1d(5, 0.0, 1.0);
        let u = density_profile(&[1.0, 1.1, 1.2, 1.3, 1.4]);
        let euler = Euler::new(1, 1.4);
        let alpha = compute_indicators(&mesh.graph, &euler, &u, DEFAULT_INDICATOR_POWER);
        for i in 1..4 {
            assert!(alpha[i] < 1e-20, "node {}: {}", i, alpha[i]);
        }
        // Boundary nodes have a single neighbour and count as extrema.
        assert!((alpha[0] - 1.0).abs() < 1e-14);
    }

    #[test]
    fn test_extremum_is_flagged() {
        let mesh = StructuredGraph::uniform_1d(3, 0.0, 1.0);
        let u = density_profile(&[1.0, 2.0, 1.0]);
        let alpha = compute_indicators(&mesh.graph, &Euler::new(1, 1.4), &u, 1.0);
        assert!((alpha[1] - 1.0).abs() < 1e-14);
    }

    #[test]
    fn test_constant_state_has_zero_indicator() {
        let mesh = StructuredGraph::uniform_1d(4, 0.0, 1.0);
        let u = density_profile(&[1.0; 4]);
        let alpha = compute_indicators(&mesh.graph, &Euler::new(1, 1.4), &u, 2.0);
        assert!(alpha.iter().all(|&a| a == 0.0));
    }

    #[test]
    fn test_zero_power_disables_indicator() {
        let mesh = StructuredGraph::uniform_1d(4, 0.0, 1.0);
        let u = density_profile(&[1.0; 4]);
        let alpha = compute_indicators(&mesh.graph, &Euler::new(1, 1.4), &u, 0.0);
        assert!(alpha.iter().all(|&a| a == 1.0));
    }

    #[test]
    fn test_high_order_viscosity_symmetric() {
        let mesh = StructuredGraph::uniform_1d(4, 0.0, 1.0);
        let graph = &mesh.graph;
        let dij = EdgeMatrix::filled(graph, 2.0);
        let alpha = [0.0, 0.5, 0.1, 1.0];
        let dh = high_order_viscosity(graph, &dij, &alpha);
        assert_eq!(dh.asymmetry(graph), 0.0);
        assert_eq!(dh.row_sum(graph, 0), 1.0);
    }
}
