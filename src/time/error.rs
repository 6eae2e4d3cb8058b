//! Error types of the time-stepping core.

use thiserror::Error;

/// Invalid configuration values.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// CFL number must be positive and finite.
    #[error("Invalid CFL number {0} (expected a positive value)")]
    InvalidCfl(f64),

    /// Space dimension not supported by the model.
    #[error("Invalid space dimension {dim} (expected 1..={max})")]
    InvalidDimension { dim: usize, max: usize },

    /// Ratio of specific heats must exceed one.
    #[error("Invalid ratio of specific heats {0} (expected > 1)")]
    InvalidGamma(f64),

    /// Gravity must be positive.
    #[error("Invalid gravitational acceleration {0} (expected > 0)")]
    InvalidGravity(f64),

    /// A tolerance or factor is out of range.
    #[error("Invalid value {value} for '{name}'")]
    InvalidParameter { name: &'static str, value: f64 },
}

impl ConfigError {
    /// Create an out-of-range parameter error.
    pub fn invalid_parameter(name: &'static str, value: f64) -> Self {
        Self::InvalidParameter { name, value }
    }
}

/// Why a step has to be repeated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RestartReason {
    /// Requested step size exceeds the admissible one.
    StepSizeExceeded { tau: f64, tau_max: f64 },
    /// The low-order update left the admissible set at a node.
    LowOrderInadmissible { node: usize },
    /// The limited high-order state left the admissible set at a node.
    AssembledInadmissible { node: usize },
}

impl std::fmt::Display for RestartReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RestartReason::StepSizeExceeded { tau, tau_max } => {
                write!(f, "step size {tau:.6e} exceeds admissible {tau_max:.6e}")
            }
            RestartReason::LowOrderInadmissible { node } => {
                write!(f, "low-order state inadmissible at node {node}")
            }
            RestartReason::AssembledInadmissible { node } => {
                write!(f, "assembled state inadmissible at node {node}")
            }
        }
    }
}

/// Errors returned by [`StepOrchestrator::step`](crate::time::StepOrchestrator::step).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StepError {
    /// The input state is outside the admissible set.
    #[error("Inadmissible input state at node {node}")]
    ContractViolation { node: usize },

    /// Invariant-domain violation; the step must be repeated with a
    /// smaller step size.
    #[error("Step rejected: {reason}")]
    Restart { reason: RestartReason },

    /// Array sizes do not match the graph.
    #[error("Dimension mismatch: expected {expected} {what}, got {actual}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// No step size was given and every graph viscosity vanishes, so τ_max
    /// is unbounded.
    #[error("No finite step size: all graph viscosities vanish, pass an explicit tau")]
    UnboundedStepSize,

    /// Stage weights must be non-negative and sum to at most one.
    #[error("Invalid stage weights: {0:?}")]
    InvalidStageWeights(Vec<f64>),

    /// Invalid configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl StepError {
    /// Create a dimension mismatch error.
    pub fn dimension_mismatch(what: &'static str, expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch {
            what,
            expected,
            actual,
        }
    }

    /// True if the step may be retried with a smaller step size.
    pub fn is_restart(&self) -> bool {
        matches!(self, StepError::Restart { .. })
    }
}
