//! Compressible Euler equations for a polytropic gas.
//!
//! Conserved variables U = (ρ, m, E) with momentum m = ρv and total energy
//! E = ρe + |m|²/(2ρ). The pressure is p = (γ - 1) ρe.
//!
//! Admissible set: ρ > 0 and ρe > 0. The convex limiter additionally
//! enforces a local minimum principle on the specific entropy
//! s = ρe / ρ^γ through the concave functional
//!
//! ψ(U) = ρe(U) - s_min ρ^γ.

use crate::bounds::Bounds;
use crate::equations::HyperbolicSystem;
use crate::riemann::{PolytropicRiemannSolver, RiemannData, WaveSpeedEstimate};
use crate::types::{State, Vector3};

/// Primitive variables (ρ, v, p).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EulerPrimitive {
    /// Density
    pub rho: f64,
    /// Velocity
    pub velocity: Vector3,
    /// Pressure
    pub pressure: f64,
}

impl EulerPrimitive {
    /// Create primitive variables.
    pub fn new(rho: f64, velocity: Vector3, pressure: f64) -> Self {
        Self {
            rho,
            velocity,
            pressure,
        }
    }

    /// 1D primitive state (ρ, u, p).
    pub fn new_1d(rho: f64, u: f64, pressure: f64) -> Self {
        Self::new(rho, Vector3::new(u, 0.0, 0.0), pressure)
    }
}

/// Momentum vector of an Euler state in `dim` dimensions.
#[inline(always)]
pub(crate) fn momentum(dim: usize, u: &State) -> Vector3 {
    let mut m = Vector3::zero();
    for d in 0..dim {
        m.0[d] = u[1 + d];
    }
    m
}

/// Internal energy density ρe = E - |m|²/(2ρ).
#[inline(always)]
pub(crate) fn internal_energy(dim: usize, u: &State) -> f64 {
    let m = momentum(dim, u);
    u[dim + 1] - 0.5 * m.dot(&m) / u[0]
}

/// Flux contraction f(U) · c for a given pressure.
#[inline(always)]
pub(crate) fn flux_contract(dim: usize, u: &State, pressure: f64, c: &Vector3) -> State {
    let rho = u[0];
    let m = momentum(dim, u);
    let v_dot_c = m.dot(c) / rho;

    let mut f = State::zero();
    f[0] = m.dot(c);
    for d in 0..dim {
        f[1 + d] = m[d] * v_dot_c + pressure * c[d];
    }
    f[dim + 1] = (u[dim + 1] + pressure) * v_dot_c;
    f
}

/// ψ(U) = ρe - s_min ρ^γ and its gradient with respect to U.
pub(crate) fn entropy_constraint(dim: usize, u: &State, s_min: f64, gamma: f64) -> (f64, State) {
    let rho = u[0];
    if !(rho > 0.0) {
        return (f64::NEG_INFINITY, State::zero());
    }
    let m = momentum(dim, u);
    let rho_inverse = 1.0 / rho;
    let rho_e = u[dim + 1] - 0.5 * m.dot(&m) * rho_inverse;
    let rho_gamma = rho.powf(gamma);

    let value = rho_e - s_min * rho_gamma;

    let mut gradient = State::zero();
    gradient[0] =
        0.5 * m.dot(&m) * rho_inverse * rho_inverse - s_min * gamma * rho_gamma * rho_inverse;
    for d in 0..dim {
        gradient[1 + d] = -m[d] * rho_inverse;
    }
    gradient[dim + 1] = 1.0;

    (value, gradient)
}

/// Compressible Euler equations with a polytropic equation of state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Euler {
    dim: usize,
    gamma: f64,
    riemann: PolytropicRiemannSolver,
}

impl Euler {
    /// Create the system in `dim` dimensions with ratio of specific heats `gamma`.
    ///
    /// # Example
    ///
    /// ```
    /// use convex_idp::equations::{Euler, EulerPrimitive};
    ///
    /// let euler = Euler::new(1, 1.4);
    /// let u = euler.from_primitive(&EulerPrimitive::new_1d(1.0, 0.0, 1.0));
    /// assert!((euler.pressure(&u) - 1.0).abs() < 1e-14);
    /// ```
    pub fn new(dim: usize, gamma: f64) -> Self {
        Self {
            dim,
            gamma,
            riemann: PolytropicRiemannSolver::new(gamma),
        }
    }

    /// Use up to `n` Newton steps in the wave-speed estimate.
    pub fn with_newton_iterations(mut self, n: usize) -> Self {
        self.riemann = self.riemann.with_newton_iterations(n);
        self
    }

    /// Ratio of specific heats.
    #[inline]
    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    /// The wave-speed estimator.
    pub fn riemann_solver(&self) -> &PolytropicRiemannSolver {
        &self.riemann
    }

    /// Momentum vector.
    #[inline]
    pub fn momentum(&self, u: &State) -> Vector3 {
        momentum(self.dim, u)
    }

    /// Total energy E.
    #[inline]
    pub fn total_energy(&self, u: &State) -> f64 {
        u[self.dim + 1]
    }

    /// Internal energy density ρe.
    #[inline]
    pub fn internal_energy(&self, u: &State) -> f64 {
        internal_energy(self.dim, u)
    }

    /// Pressure p = (γ - 1) ρe.
    #[inline]
    pub fn pressure(&self, u: &State) -> f64 {
        (self.gamma - 1.0) * self.internal_energy(u)
    }

    /// Specific entropy s = ρe / ρ^γ (up to a monotone transformation).
    #[inline]
    pub fn specific_entropy(&self, u: &State) -> f64 {
        self.internal_energy(u) / u[0].powf(self.gamma)
    }

    /// Speed of sound a = sqrt(γ p / ρ).
    #[inline]
    pub fn sound_speed(&self, u: &State) -> f64 {
        (self.gamma * self.pressure(u) / u[0]).sqrt()
    }

    /// Convert to primitive variables.
    pub fn to_primitive(&self, u: &State) -> EulerPrimitive {
        let rho = u[0];
        EulerPrimitive {
            rho,
            velocity: self.momentum(u) * (1.0 / rho),
            pressure: self.pressure(u),
        }
    }

    /// Convert from primitive variables.
    pub fn from_primitive(&self, prim: &EulerPrimitive) -> State {
        let mut u = State::zero();
        u[0] = prim.rho;
        let mut kinetic = 0.0;
        for d in 0..self.dim {
            u[1 + d] = prim.rho * prim.velocity[d];
            kinetic += prim.velocity[d] * prim.velocity[d];
        }
        u[self.dim + 1] = prim.pressure / (self.gamma - 1.0) + 0.5 * prim.rho * kinetic;
        u
    }

    /// 1D Riemann data of `u` projected on the unit direction `n`.
    pub fn riemann_data(&self, u: &State, n: &Vector3) -> RiemannData {
        let rho = u[0];
        let p = self.pressure(u);
        RiemannData {
            rho,
            u: self.momentum(u).dot(n) / rho,
            p,
            a: (self.gamma * p / rho).sqrt(),
        }
    }
}

impl HyperbolicSystem for Euler {
    fn name(&self) -> &'static str {
        "euler"
    }

    fn dim(&self) -> usize {
        self.dim
    }

    fn n_components(&self) -> usize {
        self.dim + 2
    }

    fn is_admissible(&self, u: &State) -> bool {
        let rho = u[0];
        let rho_e = self.internal_energy(u);
        rho > 0.0 && rho_e > 0.0 && u.is_finite() && rho_e.is_finite()
    }

    #[inline]
    fn flux_contract(&self, u: &State, c: &Vector3) -> State {
        flux_contract(self.dim, u, self.pressure(u), c)
    }

    fn wave_speed(&self, u_i: &State, u_j: &State, n_ij: &Vector3) -> WaveSpeedEstimate {
        let data_i = self.riemann_data(u_i, n_ij);
        let data_j = self.riemann_data(u_j, n_ij);
        self.riemann.estimate(&data_i, &data_j)
    }

    fn bounds(&self, stencil: &[State]) -> Bounds {
        let mut bounds = Bounds::unbounded();
        bounds.rho_min = f64::INFINITY;
        bounds.rho_max = f64::NEG_INFINITY;
        bounds.s_min = f64::INFINITY;
        bounds.gamma_min = self.gamma;
        for u in stencil {
            bounds.rho_min = bounds.rho_min.min(u[0]);
            bounds.rho_max = bounds.rho_max.max(u[0]);
            bounds.s_min = bounds.s_min.min(self.specific_entropy(u));
        }
        bounds
    }

    fn n_constraints(&self) -> usize {
        1
    }

    fn constraint(&self, k: usize, bounds: &Bounds, u: &State) -> Option<(f64, State)> {
        (k == 0 && bounds.s_min.is_finite())
            .then(|| entropy_constraint(self.dim, u, bounds.s_min, self.gamma))
    }

    fn indicator_variable(&self, u: &State) -> f64 {
        u[0]
    }
}
