//! Explicit invariant-domain-preserving time stepping.
//!
//! - [`low_order`]: graph viscosity, admissible step size, low-order update
//! - [`StepOrchestrator`]: one full step with limiting and restart handling
//! - [`StepConfig`], [`StepContext`]: parameters and run-time counters

mod config;
mod context;
mod error;
pub mod low_order;
mod step;

pub use config::{StepConfig, ViolationStrategy};
pub use context::StepContext;
pub use error::{ConfigError, RestartReason, StepError};
pub use low_order::{
    build_viscosity, edge_flux, low_order_update, max_step_size, max_step_size_excluding,
};
pub use step::{Stage, StepOrchestrator, StepOutcome, StepPhase};
