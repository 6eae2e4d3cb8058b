//! Slip wall: zero normal momentum.
//!
//! For a wall with unit normal n the momentum is projected onto the
//! tangent plane,
//!
//! m ← m - (m · n) n,
//!
//! while density and total energy are left unchanged. The kinetic energy
//! can only decrease, so the internal energy (and the admissibility of the
//! state) is preserved.

use super::BoundaryCondition;
use crate::graph::Graph;
use crate::types::{State, Vector3};

/// Reflecting (slip) wall on a set of boundary nodes.
#[derive(Clone, Debug, PartialEq)]
pub struct ReflectingWall {
    nodes: Vec<(usize, Vector3)>,
}

impl ReflectingWall {
    /// Wall nodes with their outward normals (normalised on construction).
    pub fn new(nodes: Vec<(usize, Vector3)>) -> Self {
        let nodes = nodes.into_iter().map(|(i, n)| (i, n.normalized())).collect();
        Self { nodes }
    }

    /// Both end nodes of a 1D chain with `n_nodes` nodes.
    pub fn ends_1d(n_nodes: usize) -> Self {
        Self::new(vec![
            (0, Vector3::new(-1.0, 0.0, 0.0)),
            (n_nodes.saturating_sub(1), Vector3::new(1.0, 0.0, 0.0)),
        ])
    }
}

impl BoundaryCondition for ReflectingWall {
    fn name(&self) -> &'static str {
        "reflecting_wall"
    }

    fn apply(&self, graph: &Graph, u: &mut [State], _t: f64) {
        let dim = graph.dim();
        for (node, normal) in &self.nodes {
            let Some(state) = u.get_mut(*node) else {
                continue;
            };
            let mut m_dot_n = 0.0;
            for d in 0..dim {
                m_dot_n += state[1 + d] * normal[d];
            }
            for d in 0..dim {
                state[1 + d] -= m_dot_n * normal[d];
            }
        }
    }

    fn boundary_nodes(&self) -> Vec<usize> {
        self.nodes.iter().map(|(node, _)| *node).collect()
    }
}
