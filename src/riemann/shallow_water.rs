//! Wave-speed estimate for the shallow water equations.
//!
//! Same structure as the Euler estimator with the depth h in place of the
//! pressure. The two-rarefaction depth is
//!
//! h~ = ((a_i + a_j - (u_j - u_i) / 2)_+)² / (4 g),   a = sqrt(g h),
//!
//! and the extreme speeds at a star depth h* read
//!
//! λ = u ∓ a sqrt((1 + x)(1 + x / 2)),   x = (h* - h)_+ / h.

use crate::newton::quadratic_newton_step;
use crate::riemann::{RiemannData, WaveSpeedEstimate};
use crate::types::{negative_part, positive_part};

/// Relative bracket width below which Newton refinement stops.
const NEWTON_TOLERANCE: f64 = 1.0e-10;

/// Non-iterative wave-speed estimator for the shallow water equations.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShallowWaterRiemannSolver {
    gravity: f64,
    newton_max_iter: usize,
}

impl ShallowWaterRiemannSolver {
    /// Create an estimator for gravitational acceleration `gravity`.
    pub fn new(gravity: f64) -> Self {
        Self {
            gravity,
            newton_max_iter: 0,
        }
    }

    /// Tighten the depth bracket with up to `n` quadratic Newton steps.
    pub fn with_newton_iterations(mut self, n: usize) -> Self {
        self.newton_max_iter = n;
        self
    }

    /// Gravitational acceleration.
    #[inline]
    pub fn gravity(&self) -> f64 {
        self.gravity
    }

    /// φ(h_max), where only the shock branch is needed.
    #[inline]
    fn phi_of_h_max(&self, data_i: &RiemannData, data_j: &RiemannData) -> f64 {
        let h_max = data_i.rho.max(data_j.rho);
        let g = self.gravity;

        let value_i =
            (h_max - data_i.rho) * (g * (h_max + data_i.rho) / (2.0 * h_max * data_i.rho)).sqrt();
        let value_j =
            (h_max - data_j.rho) * (g * (h_max + data_j.rho) / (2.0 * h_max * data_j.rho)).sqrt();

        value_i + value_j + data_j.u - data_i.u
    }

    fn f_and_derivative(&self, data: &RiemannData, h: f64) -> (f64, f64) {
        let g = self.gravity;
        let h_z = data.rho;
        if h >= h_z {
            let root = (g * (h + h_z) / (2.0 * h * h_z)).sqrt();
            let value = (h - h_z) * root;
            let derivative = root - (h - h_z) * g / (4.0 * root * h * h);
            (value, derivative)
        } else {
            let c = (g * h).sqrt();
            (2.0 * (c - data.a), (g / h).sqrt())
        }
    }

    /// φ(h) = f_i(h) + f_j(h) + u_j - u_i and φ'(h).
    pub fn phi(&self, data_i: &RiemannData, data_j: &RiemannData, h: f64) -> (f64, f64) {
        let (f_i, df_i) = self.f_and_derivative(data_i, h);
        let (f_j, df_j) = self.f_and_derivative(data_j, h);
        (f_i + f_j + data_j.u - data_i.u, df_i + df_j)
    }

    /// Left-going extreme wave speed for a given star depth.
    #[inline]
    pub fn lambda1_minus(&self, data: &RiemannData, h_star: f64) -> f64 {
        let x = positive_part(h_star - data.rho) / data.rho;
        data.u - data.a * ((1.0 + x) * (1.0 + 0.5 * x)).sqrt()
    }

    /// Right-going extreme wave speed for a given star depth.
    #[inline]
    pub fn lambda2_plus(&self, data: &RiemannData, h_star: f64) -> f64 {
        let x = positive_part(h_star - data.rho) / data.rho;
        data.u + data.a * ((1.0 + x) * (1.0 + 0.5 * x)).sqrt()
    }

    /// Upper bound on the maximal wave speed for a star depth from above.
    #[inline]
    pub fn compute_lambda(&self, data_i: &RiemannData, data_j: &RiemannData, h_star: f64) -> f64 {
        let nu_1 = self.lambda1_minus(data_i, h_star);
        let nu_2 = self.lambda2_plus(data_j, h_star);
        positive_part(nu_2).max(negative_part(nu_1))
    }

    /// Two-rarefaction approximation of the star depth.
    #[inline]
    pub fn h_star_two_rarefaction(&self, data_i: &RiemannData, data_j: &RiemannData) -> f64 {
        let numerator = positive_part(data_i.a + data_j.a - 0.5 * (data_j.u - data_i.u));
        numerator * numerator / (4.0 * self.gravity)
    }

    /// Estimate the maximal wave speed for the Riemann problem (i, j).
    pub fn estimate(&self, data_i: &RiemannData, data_j: &RiemannData) -> WaveSpeedEstimate {
        let valid_i = data_i.is_valid();
        let valid_j = data_j.is_valid();
        if !valid_i && !valid_j {
            return WaveSpeedEstimate::zero();
        }
        debug_assert!(
            valid_i && valid_j,
            "inadmissible Riemann data: {:?} / {:?}",
            data_i,
            data_j
        );

        let h_min = data_i.rho.min(data_j.rho);
        let h_max = data_i.rho.max(data_j.rho);

        let h_star_tilde = self.h_star_two_rarefaction(data_i, data_j);
        let phi_h_max = self.phi_of_h_max(data_i, data_j);

        let (mut h_1, mut h_2) = if phi_h_max < 0.0 {
            (h_max, h_star_tilde)
        } else {
            (h_min, h_max.min(h_star_tilde))
        };

        let mut iterations = 0;
        while iterations < self.newton_max_iter {
            if h_2 <= h_1 || h_2 - h_1 <= NEWTON_TOLERANCE * h_2 {
                break;
            }
            let (phi_1, dphi_1) = self.phi(data_i, data_j, h_1);
            let (phi_2, dphi_2) = self.phi(data_i, data_j, h_2);
            if phi_1 > 0.0 || phi_2 < 0.0 {
                break;
            }
            let (new_1, new_2) = quadratic_newton_step(h_1, h_2, phi_1, phi_2, dphi_1, dphi_2);
            h_1 = new_1;
            h_2 = new_2;
            iterations += 1;
        }

        WaveSpeedEstimate {
            lambda_max: self.compute_lambda(data_i, data_j, h_2),
            p_star: h_2,
            iterations,
        }
    }
}
