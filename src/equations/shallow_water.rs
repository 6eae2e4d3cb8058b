//! Shallow water equations over a flat bottom.
//!
//! ∂h/∂t + ∇·q = 0                               (mass conservation)
//! ∂q/∂t + ∇·(q ⊗ q / h + g h²/2 I) = 0          (momentum conservation)
//!
//! where:
//! - h = water depth
//! - q = h v = discharge
//! - g = gravitational acceleration
//!
//! The convex limiter bounds the depth from both sides and the velocity
//! magnitude from above through the concave speed cone
//!
//! ψ(U) = v_max h - |q|.

use crate::bounds::Bounds;
use crate::equations::HyperbolicSystem;
use crate::riemann::{RiemannData, ShallowWaterRiemannSolver, WaveSpeedEstimate};
use crate::types::{State, Vector3};

/// Primitive variables (h, v).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ShallowWaterPrimitive {
    /// Water depth
    pub h: f64,
    /// Depth-averaged velocity
    pub velocity: Vector3,
}

impl ShallowWaterPrimitive {
    /// Create primitive variables.
    pub fn new(h: f64, velocity: Vector3) -> Self {
        Self { h, velocity }
    }

    /// 1D primitive state (h, u).
    pub fn new_1d(h: f64, u: f64) -> Self {
        Self::new(h, Vector3::new(u, 0.0, 0.0))
    }
}

/// Shallow water equations.
///
/// State vector: U = [h, q_x, (q_y)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShallowWater {
    dim: usize,
    gravity: f64,
    riemann: ShallowWaterRiemannSolver,
}

impl ShallowWater {
    /// Create the system in `dim` (1 or 2) dimensions.
    pub fn new(dim: usize, gravity: f64) -> Self {
        Self {
            dim,
            gravity,
            riemann: ShallowWaterRiemannSolver::new(gravity),
        }
    }

    /// Standard gravity (9.81 m/s²).
    pub fn standard(dim: usize) -> Self {
        Self::new(dim, 9.81)
    }

    /// Use up to `n` Newton steps in the wave-speed estimate.
    pub fn with_newton_iterations(mut self, n: usize) -> Self {
        self.riemann = self.riemann.with_newton_iterations(n);
        self
    }

    /// Gravitational acceleration.
    #[inline]
    pub fn gravity(&self) -> f64 {
        self.gravity
    }

    /// Discharge vector q.
    #[inline]
    pub fn discharge(&self, u: &State) -> Vector3 {
        let mut q = Vector3::zero();
        for d in 0..self.dim {
            q.0[d] = u[1 + d];
        }
        q
    }

    /// Velocity v = q / h.
    #[inline]
    pub fn velocity(&self, u: &State) -> Vector3 {
        self.discharge(u) * (1.0 / u[0])
    }

    /// Celerity sqrt(g h).
    #[inline]
    pub fn celerity(&self, u: &State) -> f64 {
        (self.gravity * u[0]).sqrt()
    }

    /// Convert to primitive variables.
    pub fn to_primitive(&self, u: &State) -> ShallowWaterPrimitive {
        ShallowWaterPrimitive {
            h: u[0],
            velocity: self.velocity(u),
        }
    }

    /// Convert from primitive variables.
    pub fn from_primitive(&self, prim: &ShallowWaterPrimitive) -> State {
        let mut u = State::zero();
        u[0] = prim.h;
        for d in 0..self.dim {
            u[1 + d] = prim.h * prim.velocity[d];
        }
        u
    }

    /// 1D Riemann data of `u` projected on the unit direction `n`.
    pub fn riemann_data(&self, u: &State, n: &Vector3) -> RiemannData {
        let h = u[0];
        RiemannData {
            rho: h,
            u: self.discharge(u).dot(n) / h,
            p: h,
            a: self.celerity(u),
        }
    }
}

impl HyperbolicSystem for ShallowWater {
    fn name(&self) -> &'static str {
        "shallow_water"
    }

    fn dim(&self) -> usize {
        self.dim
    }

    fn n_components(&self) -> usize {
        self.dim + 1
    }

    fn is_admissible(&self, u: &State) -> bool {
        u[0] > 0.0 && u.is_finite()
    }

    #[inline]
    fn flux_contract(&self, u: &State, c: &Vector3) -> State {
        let h = u[0];
        let q = self.discharge(u);
        let v_dot_c = q.dot(c) / h;
        let hydrostatic = 0.5 * self.gravity * h * h;

        let mut f = State::zero();
        f[0] = q.dot(c);
        for d in 0..self.dim {
            f[1 + d] = q[d] * v_dot_c + hydrostatic * c[d];
        }
        f
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
        bounds.speed_max = 0.0;
        for u in stencil {
            bounds.rho_min = bounds.rho_min.min(u[0]);
            bounds.rho_max = bounds.rho_max.max(u[0]);
            bounds.speed_max = bounds.speed_max.max(self.velocity(u).norm());
        }
        bounds
    }

    fn n_constraints(&self) -> usize {
        1
    }

    fn constraint(&self, k: usize, bounds: &Bounds, u: &State) -> Option<(f64, State)> {
        if k != 0 || !bounds.speed_max.is_finite() {
            return None;
        }
        let q = self.discharge(u);
        let q_norm = q.norm();

        let mut gradient = State::zero();
        gradient[0] = bounds.speed_max;
        if q_norm > 0.0 {
            for d in 0..self.dim {
                gradient[1 + d] = -q[d] / q_norm;
            }
        }
        Some((bounds.speed_max * u[0] - q_norm, gradient))
    }
}
