//! Boundary applicators.
//!
//! The graph-based update treats every node alike; boundary conditions are
//! imposed afterwards by overwriting nodal states. An applicator is invoked
//! once per step, after assembly, at the new time t + τ.
//!
//! | Applicator       | Description                                   |
//! |------------------|-----------------------------------------------|
//! | `Dirichlet`      | Fixed states on a node set                    |
//! | `ReflectingWall` | Removes the normal momentum on boundary nodes |

mod dirichlet;
mod reflecting;

pub use dirichlet::Dirichlet;
pub use reflecting::ReflectingWall;

use std::fmt::Debug;

use crate::graph::Graph;
use crate::types::State;

/// Post-step boundary treatment.
///
/// Implementations must map admissible states to admissible states.
pub trait BoundaryCondition: Send + Sync + Debug {
    /// Name for logging.
    fn name(&self) -> &'static str;

    /// Modify the boundary nodes of `u` at time `t`.
    fn apply(&self, graph: &Graph, u: &mut [State], t: f64);

    /// Nodes touched by [`apply`](Self::apply).
    fn boundary_nodes(&self) -> Vec<usize>;
}
