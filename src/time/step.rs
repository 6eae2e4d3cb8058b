//! One invariant-domain-preserving explicit step.
//!
//! The step runs through fixed phases:
//!
//! ```text
//! Idle -> ViscosityBuilt -> LowOrderComputed -> BoundsComputed -> Limited -> Assembled -> Idle
//!                                 |                                              |
//!                                 +------------------> Restart <-----------------+
//! ```
//!
//! 1. Graph viscosity d_ij and the admissible step size τ_max.
//! 2. Low-order update U^L (provably admissible for τ <= τ_max).
//! 3. Local bounds from U^L.
//! 4. High-order corrections P_ij = τ/m_i (F^H_ij - F^L_ij) and symmetric
//!    limiter coefficients l_ij = min(t_ij, t_ji).
//! 5. Assembly U_i = U^L_i + Σ_j l_ij P_ij.
//!
//! Limiting and assembly run for up to
//! [`LimiterConfig::passes`](crate::limiter::LimiterConfig::passes) passes.
//! Each pass limits the remainder (1 - l_ij) P_ij of the previous one
//! against the same bounds, starting from the state assembled so far; the
//! combined coefficient of two passes is l + (1 - l) l'.
//!
//! A too large step size or an inadmissible low-order (or assembled) state
//! is a violation. Depending on [`ViolationStrategy`] the orchestrator logs
//! a warning and completes the step, or rejects it and leaves the caller's
//! state untouched.
//!
//! # Example
//!
//! ```
//! use convex_idp::equations::{Euler, EulerPrimitive};
//! use convex_idp::graph::StructuredGraph;
//! use convex_idp::time::{StepConfig, StepOrchestrator};
//!
//! let mesh = StructuredGraph::uniform_1d(101, 0.0, 1.0);
//! let euler = Euler::new(1, 1.4);
//! let mut u: Vec<_> = mesh
//!     .points
//!     .iter()
//!     .map(|x| {
//!         let prim = if x[0] < 0.5 {
//!             EulerPrimitive::new_1d(1.0, 0.0, 1.0)
//!         } else {
//!             EulerPrimitive::new_1d(0.125, 0.0, 0.1)
//!         };
//!         euler.from_primitive(&prim)
//!     })
//!     .collect();
//!
//! let mut orchestrator = StepOrchestrator::new(StepConfig::new(0.5)).unwrap();
//! let mut ctx = orchestrator.context();
//! let outcome = orchestrator.step(&euler, &mesh.graph, &mut ctx, &mut u, None, &[]).unwrap();
//!
//! assert!(outcome.tau > 0.0);
//! assert_eq!(ctx.n_steps(), 1);
//! ```

use crate::boundary::BoundaryCondition;
use crate::bounds::compute_bounds;
use crate::diagnostics::StepStats;
use crate::equations::HyperbolicSystem;
use crate::graph::{EdgeMatrix, Graph};
use crate::indicator::{compute_indicators, high_order_viscosity};
use crate::limiter::limit;
use crate::riemann::WaveSpeedGuarantee;
use crate::time::low_order::{
    build_viscosity, edge_flux, low_order_update, max_step_size, max_step_size_excluding,
};
use crate::time::{
    ConfigError, RestartReason, StepConfig, StepContext, StepError, ViolationStrategy,
};
use crate::types::State;

/// Slack on the stage-weight sum.
const WEIGHT_TOLERANCE: f64 = 1.0e-12;

/// Phase of the step state machine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StepPhase {
    /// No step in progress
    #[default]
    Idle,
    /// Graph viscosity and τ_max available
    ViscosityBuilt,
    /// Low-order state available
    LowOrderComputed,
    /// Local bounds available
    BoundsComputed,
    /// Limiter coefficients available
    Limited,
    /// New state assembled
    Assembled,
    /// Step rejected; the caller should retry with a smaller step
    Restart,
}

/// An earlier stage of a multi-stage scheme contributing to the high-order
/// flux with weight `weight`.
#[derive(Clone, Copy, Debug)]
pub struct Stage<'a> {
    /// Stage state
    pub state: &'a [State],
    /// High-order viscosity recorded for the stage
    pub dij: &'a EdgeMatrix<f64>,
    /// Weight in the high-order flux
    pub weight: f64,
}

/// Result of a completed step.
#[derive(Clone, Debug, PartialEq)]
pub struct StepOutcome {
    /// Step size used
    pub tau: f64,
    /// Admissible step size
    pub tau_max: f64,
    /// High-order viscosity d^H of the old state (None for low-order steps)
    pub high_order_dij: Option<EdgeMatrix<f64>>,
    /// Symmetric limiter coefficients l_ij combined over all passes (None for
    /// low-order steps)
    pub limiter_coefficients: Option<EdgeMatrix<f64>>,
    /// Diagnostics
    pub stats: StepStats,
}

/// Drives one explicit step through the phases above.
#[derive(Debug)]
pub struct StepOrchestrator {
    config: StepConfig,
    phase: StepPhase,
    boundary: Option<Box<dyn BoundaryCondition>>,
}

impl StepOrchestrator {
    /// Create an orchestrator from a validated configuration.
    pub fn new(config: StepConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            phase: StepPhase::Idle,
            boundary: None,
        })
    }

    /// Apply `boundary` after every step.
    pub fn with_boundary(mut self, boundary: impl BoundaryCondition + 'static) -> Self {
        self.boundary = Some(Box::new(boundary));
        self
    }

    /// Configuration.
    pub fn config(&self) -> &StepConfig {
        &self.config
    }

    /// Current phase.
    pub fn phase(&self) -> StepPhase {
        self.phase
    }

    /// Fresh context with the configured CFL number.
    pub fn context(&self) -> StepContext {
        StepContext::new(self.config.cfl)
    }

    fn enter(&mut self, phase: StepPhase) {
        log::trace!("{:?} -> {:?}", self.phase, phase);
        self.phase = phase;
    }

    fn check_inputs(
        &self,
        graph: &Graph,
        u: &[State],
        stages: &[Stage<'_>],
    ) -> Result<(), StepError> {
        let n_nodes = graph.n_nodes();
        if u.len() != n_nodes {
            return Err(StepError::dimension_mismatch("states", n_nodes, u.len()));
        }
        for stage in stages {
            if stage.state.len() != n_nodes {
                return Err(StepError::dimension_mismatch(
                    "stage states",
                    n_nodes,
                    stage.state.len(),
                ));
            }
            if stage.dij.len() != graph.n_entries() {
                return Err(StepError::dimension_mismatch(
                    "stage viscosity entries",
                    graph.n_entries(),
                    stage.dij.len(),
                ));
            }
        }

        let weights: Vec<f64> = stages.iter().map(|s| s.weight).collect();
        let valid = weights.iter().all(|w| w.is_finite() && *w >= 0.0)
            && weights.iter().sum::<f64>() <= 1.0 + WEIGHT_TOLERANCE;
        if !valid {
            return Err(StepError::InvalidStageWeights(weights));
        }
        Ok(())
    }

    /// Count a violation and decide whether the step continues.
    fn flag_violation(
        &mut self,
        system_name: &str,
        ctx: &mut StepContext,
        reason: RestartReason,
    ) -> Result<(), StepError> {
        match self.config.violation_strategy {
            ViolationStrategy::Warn => {
                log::warn!("{} step at t = {}: {}; continuing", system_name, ctx.time(), reason);
                ctx.record_warning();
                Ok(())
            }
            ViolationStrategy::RaiseAndRetry => {
                log::debug!("{} step at t = {} rejected: {}", system_name, ctx.time(), reason);
                ctx.record_restart();
                self.enter(StepPhase::Restart);
                Err(StepError::Restart { reason })
            }
        }
    }

    /// Advance `u` by one step.
    ///
    /// # Arguments
    /// * `system` - Hyperbolic system
    /// * `graph` - Computational graph
    /// * `ctx` - CFL number, time and counters
    /// * `u` - State, overwritten on success
    /// * `tau` - Step size; `None` uses τ_max
    /// * `stages` - Earlier stages entering the high-order flux
    ///
    /// # Errors
    /// * [`StepError::ContractViolation`] if `u` is not admissible
    /// * [`StepError::Restart`] on a violation under
    ///   [`ViolationStrategy::RaiseAndRetry`]; `u` is left untouched
    /// * [`StepError::UnboundedStepSize`] if `tau` is `None` and τ_max is
    ///   infinite (every graph viscosity vanishes)
    /// * [`StepError::DimensionMismatch`], [`StepError::InvalidStageWeights`]
    ///   and [`StepError::Config`] for invalid arguments
    pub fn step<S: HyperbolicSystem + ?Sized>(
        &mut self,
        system: &S,
        graph: &Graph,
        ctx: &mut StepContext,
        u: &mut [State],
        tau: Option<f64>,
        stages: &[Stage<'_>],
    ) -> Result<StepOutcome, StepError> {
        self.enter(StepPhase::Idle);
        let config = self.config;
        self.check_inputs(graph, u, stages)?;

        if let Some(node) = u.iter().position(|s| !system.is_admissible(s)) {
            log::error!("Inadmissible {} state at node {}: {:?}", system.name(), node, u[node]);
            return Err(StepError::ContractViolation { node });
        }
        let u_old: &[State] = u;

        // 1. Graph viscosity
        let safety = match system.wave_speed_guarantee() {
            WaveSpeedGuarantee::Provable => 1.0,
            WaveSpeedGuarantee::Approximate => config.wave_speed_safety,
        };
        let dij = build_viscosity(graph, system, u_old, safety);
        let tau_max = match &self.boundary {
            Some(boundary) if !config.cfl_with_boundary_nodes => {
                max_step_size_excluding(graph, &dij, ctx.cfl(), &boundary.boundary_nodes())
            }
            _ => max_step_size(graph, &dij, ctx.cfl()),
        };
        self.enter(StepPhase::ViscosityBuilt);

        let tau = match tau {
            Some(tau) => tau,
            None if tau_max.is_finite() => tau_max,
            None => return Err(StepError::UnboundedStepSize),
        };
        if !(tau > 0.0) || !tau.is_finite() {
            return Err(ConfigError::invalid_parameter("tau", tau).into());
        }

        // 2. Low-order update
        let low = low_order_update(graph, system, u_old, &dij, tau);
        self.enter(StepPhase::LowOrderComputed);

        let mut violation = if tau > tau_max * (1.0 + config.tau_tolerance) {
            Some(RestartReason::StepSizeExceeded { tau, tau_max })
        } else {
            low.iter()
                .position(|s| !system.is_admissible(s))
                .map(|node| RestartReason::LowOrderInadmissible { node })
        };
        if let Some(reason) = violation {
            self.flag_violation(system.name(), ctx, reason)?;
        }

        let mut stats = StepStats {
            tau,
            tau_max,
            min_low_order_density: low.iter().map(|s| s[0]).fold(f64::INFINITY, f64::min),
            ..StepStats::default()
        };

        let (mut new_state, high_order_dij, limiter_coefficients) = if config.high_order {
            // 3. Bounds
            let bounds = compute_bounds(graph, system, &low, &config.bounds);
            self.enter(StepPhase::BoundsComputed);

            // 4. Corrections and limiting
            let alpha = compute_indicators(graph, system, u_old, config.indicator_power);
            let d_high = high_order_viscosity(graph, &dij, &alpha);
            let old_weight = 1.0 - stages.iter().map(|s| s.weight).sum::<f64>();

            let pij = EdgeMatrix::from_fn(graph, |i, e, j| {
                let low_flux = edge_flux(graph, system, u_old, *dij.get(e), e, i, j);
                let mut high_flux =
                    edge_flux(graph, system, u_old, *d_high.get(e), e, i, j) * old_weight;
                for stage in stages {
                    let flux = edge_flux(graph, system, stage.state, *stage.dij.get(e), e, i, j);
                    high_flux.axpy(stage.weight, &flux);
                }
                (high_flux - low_flux) * (tau / graph.lumped_mass(i))
            });

            // 5. Limiting passes and assembly
            let mut state = low;
            let mut remainder = pij;
            let mut applied = EdgeMatrix::filled(graph, 0.0);
            for pass in 1..=config.limiter.passes {
                let one_sided = EdgeMatrix::from_fn(graph, |i, e, _| {
                    let scaled = *remainder.get(e) * graph.degree(i) as f64;
                    limit(system, &bounds[i], &state[i], &scaled, &config.limiter).0
                });
                let lij = EdgeMatrix::from_fn(graph, |_, e, _| {
                    one_sided.get(e).min(*one_sided.get(graph.transposed(e)))
                });

                state = graph.partition().map_nodes(|i| {
                    let mut node_state = state[i];
                    for (e, _) in graph.neighbors(i) {
                        node_state.axpy(*lij.get(e), remainder.get(e));
                    }
                    node_state
                });
                applied = EdgeMatrix::from_fn(graph, |_, e, _| {
                    let l = *applied.get(e);
                    (l + (1.0 - l) * lij.get(e)).min(1.0)
                });
                remainder =
                    EdgeMatrix::from_fn(graph, |_, e, _| *remainder.get(e) * (1.0 - lij.get(e)));

                let fully_applied = lij.as_slice().iter().all(|&l| l >= 1.0);
                log::trace!("limiter pass {}: fully applied = {}", pass, fully_applied);
                if fully_applied {
                    break;
                }
            }
            self.enter(StepPhase::Limited);

            stats.n_limited_entries = applied.as_slice().iter().filter(|&&l| l < 1.0).count();
            stats.min_limiter = applied.as_slice().iter().copied().fold(1.0, f64::min);
            (state, Some(d_high), Some(applied))
        } else {
            (low, None, None)
        };
        self.enter(StepPhase::Assembled);

        if violation.is_none() {
            violation = new_state
                .iter()
                .position(|s| !system.is_admissible(s))
                .map(|node| RestartReason::AssembledInadmissible { node });
            if let Some(reason) = violation {
                self.flag_violation(system.name(), ctx, reason)?;
            }
        }
        stats.violation = violation;

        if let Some(boundary) = &self.boundary {
            boundary.apply(graph, &mut new_state, ctx.time() + tau);
        }

        u.copy_from_slice(&new_state);
        ctx.advance(tau);
        self.enter(StepPhase::Idle);

        log::debug!(
            "{} step {}: tau = {:.4e} (tau_max = {:.4e}), {} limited entries, min l = {:.3}",
            system.name(),
            ctx.n_steps(),
            tau,
            tau_max,
            stats.n_limited_entries,
            stats.min_limiter
        );

        Ok(StepOutcome {
            tau,
            tau_max,
            high_order_dij,
            limiter_coefficients,
            stats,
        })
    }
}
