//! Mutable run-time context shared between consecutive steps.

/// CFL number, simulation time and violation counters.
///
/// Only the orchestrator writes to the context; drivers read the counters
/// to decide how to react to rejected steps.
#[derive(Clone, Debug, PartialEq)]
pub struct StepContext {
    cfl: f64,
    time: f64,
    n_steps: u64,
    n_restarts: u64,
    n_warnings: u64,
}

impl StepContext {
    /// Create a context at t = 0.
    pub fn new(cfl: f64) -> Self {
        Self {
            cfl,
            time: 0.0,
            n_steps: 0,
            n_restarts: 0,
            n_warnings: 0,
        }
    }

    /// Start at time `t`.
    pub fn with_time(mut self, t: f64) -> Self {
        self.time = t;
        self
    }

    /// CFL number used for the admissible step size.
    #[inline]
    pub fn cfl(&self) -> f64 {
        self.cfl
    }

    /// Current simulation time.
    #[inline]
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Number of completed steps.
    #[inline]
    pub fn n_steps(&self) -> u64 {
        self.n_steps
    }

    /// Number of rejected steps.
    #[inline]
    pub fn n_restarts(&self) -> u64 {
        self.n_restarts
    }

    /// Number of steps completed despite a violation.
    #[inline]
    pub fn n_warnings(&self) -> u64 {
        self.n_warnings
    }

    pub(crate) fn record_restart(&mut self) {
        self.n_restarts += 1;
    }

    pub(crate) fn record_warning(&mut self) {
        self.n_warnings += 1;
    }

    pub(crate) fn advance(&mut self, tau: f64) {
        self.time += tau;
        self.n_steps += 1;
    }
}
