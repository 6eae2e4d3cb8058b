//! Prescribed states on a node set.

use super::BoundaryCondition;
use crate::graph::Graph;
use crate::types::State;

/// Dirichlet condition: overwrite selected nodes with fixed states.
#[derive(Clone, Debug, PartialEq)]
pub struct Dirichlet {
    nodes: Vec<usize>,
    states: Vec<State>,
}

impl Dirichlet {
    /// One state per node.
    ///
    /// # Panics
    ///
    /// Panics if `nodes` and `states` differ in length.
    pub fn new(nodes: Vec<usize>, states: Vec<State>) -> Self {
        assert_eq!(nodes.len(), states.len(), "one state per Dirichlet node");
        Self { nodes, states }
    }

    /// The same state on every node.
    pub fn uniform(nodes: Vec<usize>, state: State) -> Self {
        let states = vec![state; nodes.len()];
        Self { nodes, states }
    }

    /// Constrained nodes.
    pub fn nodes(&self) -> &[usize] {
        &self.nodes
    }
}

impl BoundaryCondition for Dirichlet {
    fn name(&self) -> &'static str {
        "dirichlet"
    }

    fn apply(&self, _graph: &Graph, u: &mut [State], _t: f64) {
        for (&node, state) in self.nodes.iter().zip(&self.states) {
            if let Some(target) = u.get_mut(node) {
                *target = *state;
            }
        }
    }

    fn boundary_nodes(&self) -> Vec<usize> {
        self.nodes.clone()
    }
}
