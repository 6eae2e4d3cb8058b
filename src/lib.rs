//! # convex-idp
//!
//! Invariant-domain-preserving explicit time stepping on unstructured graphs.
//!
//! This crate provides the building blocks of a convex-limited graph
//! viscosity scheme for hyperbolic conservation laws:
//! - Guaranteed maximal wave speed estimates (Euler, shallow water)
//! - Hyperbolic systems behind one capability trait (polytropic Euler,
//!   Euler with a general equation of state, shallow water)
//! - Local admissible bounds and a convex limiter
//! - A step orchestrator with restart handling
//! - Boundary applicators, diagnostics and initial states for verification
//!
//! ## Example
//!
//! ```
//! use convex_idp::equations::{Model, ModelConfig};
//! use convex_idp::graph::StructuredGraph;
//! use convex_idp::initial_states::{InitialState, Sod};
//! use convex_idp::equations::Euler;
//! use convex_idp::time::{StepConfig, StepOrchestrator};
//!
//! let mesh = StructuredGraph::uniform_1d(51, 0.0, 1.0);
//! let model = Model::from_config(&ModelConfig::euler(1, 1.4)).unwrap();
//! let mut u = Sod::new(&Euler::new(1, 1.4), 0.5).interpolate(&mesh.points, 0.0);
//!
//! let mut orchestrator = StepOrchestrator::new(StepConfig::new(0.5)).unwrap();
//! let mut ctx = orchestrator.context();
//! while ctx.time() < 0.05 {
//!     orchestrator.step(&model, &mesh.graph, &mut ctx, &mut u, None, &[]).unwrap();
//! }
//! ```

pub mod boundary;
pub mod bounds;
pub mod diagnostics;
pub mod equations;
pub mod graph;
pub mod indicator;
pub mod initial_states;
pub mod limiter;
pub mod newton;
pub mod riemann;
pub mod time;
pub mod types;

// Re-export main types for convenience
pub use boundary::{BoundaryCondition, Dirichlet, ReflectingWall};
pub use bounds::{Bounds, BoundsConfig, compute_bounds};
pub use diagnostics::{ConservedTotals, StepStats};
pub use equations::{
    EquationOfState, Euler, EulerAeos, HyperbolicSystem, Model, ModelConfig, ModelKind,
    ShallowWater,
};
pub use graph::{EdgeMatrix, Graph, GraphBuilder, GraphError, Partition, StructuredGraph};
pub use limiter::{LimiterConfig, limit};
pub use riemann::{
    PolytropicRiemannSolver, RiemannData, ShallowWaterRiemannSolver, WaveSpeedEstimate,
    WaveSpeedGuarantee,
};
pub use time::{
    ConfigError, RestartReason, Stage, StepConfig, StepContext, StepError, StepOrchestrator,
    StepOutcome, StepPhase, ViolationStrategy,
};
pub use types::{State, Vector3};
