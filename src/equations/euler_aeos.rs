//! Compressible Euler equations with an arbitrary equation of state.
//!
//! The pressure comes from an [`EquationOfState`]. Wave speeds and the
//! entropy bound use a surrogate adiabatic exponent per state,
//!
//! γ_Z = 1 + p_Z / (ρ_Z e_Z),
//!
//! and feed γ_min = min(γ_i, γ_j) into the ideal-gas closed forms. The
//! resulting wave-speed bound is not provable for every equation of state,
//! so the system reports [`WaveSpeedGuarantee::Approximate`]. The step
//! orchestrator scales the viscosity of such systems by
//! [`StepConfig::wave_speed_safety`](crate::time::StepConfig::wave_speed_safety).

use crate::bounds::Bounds;
use crate::equations::euler::{entropy_constraint, flux_contract, internal_energy, momentum};
use crate::equations::{EquationOfState, EulerPrimitive, HyperbolicSystem, StandardEos};
use crate::riemann::{PolytropicRiemannSolver, RiemannData, WaveSpeedEstimate, WaveSpeedGuarantee};
use crate::types::{State, Vector3};

/// Euler equations closed by a general equation of state.
#[derive(Clone, Debug, PartialEq)]
pub struct EulerAeos<E: EquationOfState = StandardEos> {
    dim: usize,
    eos: E,
    newton_max_iter: usize,
}

impl<E: EquationOfState> EulerAeos<E> {
    /// Create the system in `dim` dimensions.
    pub fn new(dim: usize, eos: E) -> Self {
        Self {
            dim,
            eos,
            newton_max_iter: 0,
        }
    }

    /// Use up to `n` Newton steps in the wave-speed estimate.
    pub fn with_newton_iterations(mut self, n: usize) -> Self {
        self.newton_max_iter = n;
        self
    }

    /// The equation of state.
    pub fn eos(&self) -> &E {
        &self.eos
    }

    /// Internal energy density ρe.
    #[inline]
    pub fn internal_energy(&self, u: &State) -> f64 {
        internal_energy(self.dim, u)
    }

    /// Pressure from the equation of state.
    #[inline]
    pub fn pressure(&self, u: &State) -> f64 {
        let rho = u[0];
        self.eos.pressure(rho, self.internal_energy(u) / rho)
    }

    /// Speed of sound from the equation of state.
    #[inline]
    pub fn sound_speed(&self, u: &State) -> f64 {
        let rho = u[0];
        self.eos.sound_speed(rho, self.internal_energy(u) / rho)
    }

    /// Surrogate adiabatic exponent γ = 1 + p / (ρe).
    #[inline]
    pub fn surrogate_gamma(&self, u: &State) -> f64 {
        1.0 + self.pressure(u) / self.internal_energy(u)
    }

    /// Surrogate specific entropy ρe / ρ^γ for a given exponent.
    #[inline]
    pub fn surrogate_entropy(&self, u: &State, gamma: f64) -> f64 {
        self.internal_energy(u) / u[0].powf(gamma)
    }

    /// Convert to primitive variables.
    pub fn to_primitive(&self, u: &State) -> EulerPrimitive {
        let rho = u[0];
        EulerPrimitive {
            rho,
            velocity: momentum(self.dim, u) * (1.0 / rho),
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
        let e = self.eos.specific_internal_energy(prim.rho, prim.pressure);
        u[self.dim + 1] = prim.rho * e + 0.5 * prim.rho * kinetic;
        u
    }

    /// Surrogate Riemann data using the exponent `gamma`.
    fn riemann_data(&self, u: &State, n: &Vector3, gamma: f64) -> RiemannData {
        let rho = u[0];
        let p = self.pressure(u);
        RiemannData {
            rho,
            u: momentum(self.dim, u).dot(n) / rho,
            p,
            a: (gamma * p / rho).sqrt(),
        }
    }
}

impl<E: EquationOfState> HyperbolicSystem for EulerAeos<E> {
    fn name(&self) -> &'static str {
        "euler_aeos"
    }

    fn dim(&self) -> usize {
        self.dim
    }

    fn n_components(&self) -> usize {
        self.dim + 2
    }

    fn is_admissible(&self, u: &State) -> bool {
        let rho = u[0];
        if !(rho > 0.0) || !u.is_finite() {
            return false;
        }
        let rho_e = self.internal_energy(u);
        let p = self.pressure(u);
        rho_e > 0.0 && p > 0.0 && p.is_finite()
    }

    #[inline]
    fn flux_contract(&self, u: &State, c: &Vector3) -> State {
        flux_contract(self.dim, u, self.pressure(u), c)
    }

    fn wave_speed(&self, u_i: &State, u_j: &State, n_ij: &Vector3) -> WaveSpeedEstimate {
        let gamma_min = self.surrogate_gamma(u_i).min(self.surrogate_gamma(u_j));
        let solver =
            PolytropicRiemannSolver::new(gamma_min).with_newton_iterations(self.newton_max_iter);

        let data_i = self.riemann_data(u_i, n_ij, gamma_min);
        let data_j = self.riemann_data(u_j, n_ij, gamma_min);
        let mut estimate = solver.estimate(&data_i, &data_j);

        // The surrogate exponent may underestimate the true sound speed.
        let local_i = data_i.u.abs() + self.sound_speed(u_i);
        let local_j = data_j.u.abs() + self.sound_speed(u_j);
        let lambda = estimate.lambda_max.max(local_i).max(local_j);
        if lambda.is_finite() {
            estimate.lambda_max = lambda;
        }
        estimate
    }

    fn wave_speed_guarantee(&self) -> WaveSpeedGuarantee {
        WaveSpeedGuarantee::Approximate
    }

    fn bounds(&self, stencil: &[State]) -> Bounds {
        let mut bounds = Bounds::unbounded();
        bounds.rho_min = f64::INFINITY;
        bounds.rho_max = f64::NEG_INFINITY;
        for u in stencil {
            bounds.rho_min = bounds.rho_min.min(u[0]);
            bounds.rho_max = bounds.rho_max.max(u[0]);
            bounds.gamma_min = bounds.gamma_min.min(self.surrogate_gamma(u));
        }

        // The entropy floor depends on the stencil-wide exponent.
        bounds.s_min = f64::INFINITY;
        for u in stencil {
            bounds.s_min = bounds.s_min.min(self.surrogate_entropy(u, bounds.gamma_min));
        }
        bounds
    }

    fn n_constraints(&self) -> usize {
        1
    }

    fn constraint(&self, k: usize, bounds: &Bounds, u: &State) -> Option<(f64, State)> {
        (k == 0 && bounds.s_min.is_finite() && bounds.gamma_min.is_finite())
            .then(|| entropy_constraint(self.dim, u, bounds.s_min, bounds.gamma_min))
    }
}
