//! Configuration of the explicit step.

use crate::bounds::BoundsConfig;
use crate::indicator::DEFAULT_INDICATOR_POWER;
use crate::limiter::LimiterConfig;
use crate::time::ConfigError;

/// Reaction to an invariant-domain violation detected during a step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ViolationStrategy {
    /// Log a warning, count it and complete the step.
    #[default]
    Warn,
    /// Reject the step and ask the caller to retry with a smaller step.
    RaiseAndRetry,
}

/// Configuration of [`StepOrchestrator`](crate::time::StepOrchestrator).
///
/// # Example
///
/// ```
/// use convex_idp::time::{StepConfig, ViolationStrategy};
///
/// let config = StepConfig::new(0.5)
///     .with_violation_strategy(ViolationStrategy::RaiseAndRetry)
///     .with_limiter_iterations(4)
///     .with_limiter_passes(3);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepConfig {
    /// CFL number; the invariant-domain guarantee requires cfl in (0, 1)
    pub cfl: f64,
    /// Convex limiter parameters
    pub limiter: LimiterConfig,
    /// Bounds evaluator parameters
    pub bounds: BoundsConfig,
    /// Reaction to violations
    pub violation_strategy: ViolationStrategy,
    /// Relative tolerance on tau > tau_max before a violation is flagged
    pub tau_tolerance: f64,
    /// Apply the limited high-order correction (false: low-order only)
    pub high_order: bool,
    /// Exponent of the smoothness indicator; 0 uses d^H = d everywhere
    pub indicator_power: f64,
    /// Factor applied to wave speeds of systems with an approximate bound
    pub wave_speed_safety: f64,
    /// Include the nodes of the boundary applicator in the τ_max minimum
    pub cfl_with_boundary_nodes: bool,
}

impl Default for StepConfig {
    fn default() -> Self {
        Self {
            cfl: 0.5,
            limiter: LimiterConfig::default(),
            bounds: BoundsConfig::default(),
            violation_strategy: ViolationStrategy::Warn,
            tau_tolerance: 0.1,
            high_order: true,
            indicator_power: DEFAULT_INDICATOR_POWER,
            wave_speed_safety: 1.0,
            cfl_with_boundary_nodes: true,
        }
    }
}

impl StepConfig {
    /// Create a configuration with the given CFL number.
    pub fn new(cfl: f64) -> Self {
        Self {
            cfl,
            ..Self::default()
        }
    }

    /// Set the violation strategy.
    pub fn with_violation_strategy(mut self, strategy: ViolationStrategy) -> Self {
        self.violation_strategy = strategy;
        self
    }

    /// Set the number of Newton steps in the limiter.
    pub fn with_limiter_iterations(mut self, iterations: usize) -> Self {
        self.limiter.iterations = iterations;
        self
    }

    /// Set the number of limiting passes.
    pub fn with_limiter_passes(mut self, passes: usize) -> Self {
        self.limiter.passes = passes;
        self
    }

    /// Set the relative step-size tolerance.
    pub fn with_tau_tolerance(mut self, tolerance: f64) -> Self {
        self.tau_tolerance = tolerance;
        self
    }

    /// Enable or disable the high-order correction.
    pub fn with_high_order(mut self, high_order: bool) -> Self {
        self.high_order = high_order;
        self
    }

    /// Set the bounds relaxation factor.
    pub fn with_bounds_relaxation(mut self, factor: f64) -> Self {
        self.bounds.relaxation_factor = factor;
        self
    }

    /// Set the smoothness indicator exponent.
    pub fn with_indicator_power(mut self, power: f64) -> Self {
        self.indicator_power = power;
        self
    }

    /// Set the wave-speed safety factor for approximate bounds.
    pub fn with_wave_speed_safety(mut self, factor: f64) -> Self {
        self.wave_speed_safety = factor;
        self
    }

    /// Include or skip boundary nodes when computing τ_max.
    pub fn with_cfl_with_boundary_nodes(mut self, include: bool) -> Self {
        self.cfl_with_boundary_nodes = include;
        self
    }

    /// Check all parameters.
    ///
    /// A CFL number >= 1 is accepted with a warning: the step runs, but the
    /// invariant-domain guarantee no longer holds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.cfl > 0.0) || !self.cfl.is_finite() {
            return Err(ConfigError::InvalidCfl(self.cfl));
        }
        if self.cfl >= 1.0 {
            log::warn!(
                "CFL number {} >= 1: invariant-domain preservation is not guaranteed",
                self.cfl
            );
        }
        if !(self.tau_tolerance >= 0.0) {
            return Err(ConfigError::invalid_parameter("tau_tolerance", self.tau_tolerance));
        }
        if !(self.limiter.tolerance > 0.0) {
            return Err(ConfigError::invalid_parameter("limiter.tolerance", self.limiter.tolerance));
        }
        if self.limiter.passes == 0 {
            return Err(ConfigError::invalid_parameter("limiter.passes", 0.0));
        }
        if !(self.bounds.relaxation_factor >= 0.0) {
            return Err(ConfigError::invalid_parameter(
                "bounds.relaxation_factor",
                self.bounds.relaxation_factor,
            ));
        }
        if !(self.indicator_power >= 0.0) || !self.indicator_power.is_finite() {
            return Err(ConfigError::invalid_parameter("indicator_power", self.indicator_power));
        }
        if !(self.wave_speed_safety >= 1.0) {
            return Err(ConfigError::invalid_parameter(
                "wave_speed_safety",
                self.wave_speed_safety,
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = StepConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.limiter.iterations, 2);
        assert_eq!(config.limiter.passes, 2);
        assert!(config.cfl_with_boundary_nodes);
        assert_eq!(config.tau_tolerance, 0.1);
        assert_eq!(config.violation_strategy, ViolationStrategy::Warn);
    }

    #[test]
    fn test_invalid_values() {
        assert_eq!(StepConfig::new(0.0).validate(), Err(ConfigError::InvalidCfl(0.0)));
        assert!(StepConfig::new(f64::NAN).validate().is_err());
        assert!(StepConfig::default().with_tau_tolerance(-0.1).validate().is_err());
        assert!(StepConfig::default().with_wave_speed_safety(0.9).validate().is_err());
        assert!(StepConfig::default().with_bounds_relaxation(-1.0).validate().is_err());
        assert_eq!(
            StepConfig::default().with_limiter_passes(0).validate(),
            Err(ConfigError::invalid_parameter("limiter.passes", 0.0))
        );
    }

    #[test]
    fn test_large_cfl_accepted() {
        assert!(StepConfig::new(1.5).validate().is_ok());
    }
}
