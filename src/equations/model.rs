//! Run-time model selection.
//!
//! [`Model`] wraps the provided systems in an enum so that the model can be
//! chosen from configuration while the step kernels stay monomorphic:
//!
//! ```
//! use convex_idp::equations::{HyperbolicSystem, Model, ModelConfig};
//!
//! let model = Model::from_config(&ModelConfig::shallow_water(2, 9.81)).unwrap();
//! assert_eq!(model.name(), "shallow_water");
//! assert_eq!(model.n_components(), 3);
//! ```

use crate::bounds::Bounds;
use crate::equations::{Euler, EulerAeos, HyperbolicSystem, ShallowWater, StandardEos};
use crate::riemann::{WaveSpeedEstimate, WaveSpeedGuarantee};
use crate::time::ConfigError;
use crate::types::{State, Vector3};

/// Which hyperbolic system to build.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModelKind {
    /// Euler equations, polytropic gas
    Euler,
    /// Euler equations, general equation of state
    EulerAeos,
    /// Shallow water equations
    ShallowWater,
}

/// Model parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ModelConfig {
    /// System to build
    pub kind: ModelKind,
    /// Space dimension
    pub dim: usize,
    /// Ratio of specific heats (Euler)
    pub gamma: f64,
    /// Equation of state (general-EOS Euler)
    pub eos: StandardEos,
    /// Gravitational acceleration (shallow water)
    pub gravity: f64,
    /// Newton steps in the wave-speed estimate
    pub newton_iterations: usize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            kind: ModelKind::Euler,
            dim: 1,
            gamma: 1.4,
            eos: StandardEos::default(),
            gravity: 9.81,
            newton_iterations: 0,
        }
    }
}

impl ModelConfig {
    /// Polytropic Euler equations.
    pub fn euler(dim: usize, gamma: f64) -> Self {
        Self {
            kind: ModelKind::Euler,
            dim,
            gamma,
            ..Self::default()
        }
    }

    /// Euler equations with a general equation of state.
    pub fn euler_aeos(dim: usize, eos: StandardEos) -> Self {
        Self {
            kind: ModelKind::EulerAeos,
            dim,
            eos,
            ..Self::default()
        }
    }

    /// Shallow water equations.
    pub fn shallow_water(dim: usize, gravity: f64) -> Self {
        Self {
            kind: ModelKind::ShallowWater,
            dim,
            gravity,
            ..Self::default()
        }
    }

    /// Set the number of Newton steps in the wave-speed estimate.
    pub fn with_newton_iterations(mut self, n: usize) -> Self {
        self.newton_iterations = n;
        self
    }

    /// Check the parameters of the selected model.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let max_dim = match self.kind {
            ModelKind::ShallowWater => 2,
            _ => 3,
        };
        if self.dim == 0 || self.dim > max_dim {
            return Err(ConfigError::InvalidDimension {
                dim: self.dim,
                max: max_dim,
            });
        }
        match self.kind {
            ModelKind::Euler if !(self.gamma > 1.0) => Err(ConfigError::InvalidGamma(self.gamma)),
            ModelKind::EulerAeos => {
                let gamma = match self.eos {
                    StandardEos::Polytropic(eos) => eos.gamma,
                    StandardEos::NobleAbelStiffened(eos) => eos.gamma,
                };
                if gamma > 1.0 {
                    Ok(())
                } else {
                    Err(ConfigError::InvalidGamma(gamma))
                }
            }
            ModelKind::ShallowWater if !(self.gravity > 0.0) => {
                Err(ConfigError::InvalidGravity(self.gravity))
            }
            _ => Ok(()),
        }
    }
}

/// A hyperbolic system selected at run time.
#[derive(Clone, Debug, PartialEq)]
pub enum Model {
    /// Polytropic Euler equations
    Euler(Euler),
    /// General-EOS Euler equations
    EulerAeos(EulerAeos<StandardEos>),
    /// Shallow water equations
    ShallowWater(ShallowWater),
}

impl Model {
    /// Build a model from validated parameters.
    pub fn from_config(config: &ModelConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let n = config.newton_iterations;
        let model = match config.kind {
            ModelKind::Euler => {
                Model::Euler(Euler::new(config.dim, config.gamma).with_newton_iterations(n))
            }
            ModelKind::EulerAeos => {
                Model::EulerAeos(EulerAeos::new(config.dim, config.eos).with_newton_iterations(n))
            }
            ModelKind::ShallowWater => Model::ShallowWater(
                ShallowWater::new(config.dim, config.gravity).with_newton_iterations(n),
            ),
        };
        log::debug!("Selected model '{}' in {}D", model.name(), config.dim);
        Ok(model)
    }
}

macro_rules! dispatch {
    ($self:ident, $sys:ident => $body:expr) => {
        match $self {
            Model::Euler($sys) => $body,
            Model::EulerAeos($sys) => $body,
            Model::ShallowWater($sys) => $body,
        }
    };
}

impl HyperbolicSystem for Model {
    fn name(&self) -> &'static str {
        dispatch!(self, s => s.name())
    }

    fn dim(&self) -> usize {
        dispatch!(self, s => s.dim())
    }

    fn n_components(&self) -> usize {
        dispatch!(self, s => s.n_components())
    }

    #[inline]
    fn is_admissible(&self, u: &State) -> bool {
        dispatch!(self, s => s.is_admissible(u))
    }

    #[inline]
    fn flux_contract(&self, u: &State, c: &Vector3) -> State {
        dispatch!(self, s => s.flux_contract(u, c))
    }

    #[inline]
    fn wave_speed(&self, u_i: &State, u_j: &State, n_ij: &Vector3) -> WaveSpeedEstimate {
        dispatch!(self, s => s.wave_speed(u_i, u_j, n_ij))
    }

    fn wave_speed_guarantee(&self) -> WaveSpeedGuarantee {
        dispatch!(self, s => s.wave_speed_guarantee())
    }

    fn bounds(&self, stencil: &[State]) -> Bounds {
        dispatch!(self, s => s.bounds(stencil))
    }

    fn n_constraints(&self) -> usize {
        dispatch!(self, s => s.n_constraints())
    }

    #[inline]
    fn constraint(&self, k: usize, bounds: &Bounds, u: &State) -> Option<(f64, State)> {
        dispatch!(self, s => s.constraint(k, bounds, u))
    }

    fn indicator_variable(&self, u: &State) -> f64 {
        dispatch!(self, s => s.indicator_variable(u))
    }
}
