//! Wave-speed estimate for the compressible Euler equations (polytropic gas).

use crate::newton::quadratic_newton_step;
use crate::riemann::{RiemannData, WaveSpeedEstimate};
use crate::types::{negative_part, positive_part};

/// Relative bracket width below which Newton refinement stops.
const NEWTON_TOLERANCE: f64 = 1.0e-10;

/// Non-iterative wave-speed estimator for a polytropic (γ-law) gas.
///
/// The default configuration performs no Newton iteration: the upper end of
/// the initial bracket is used directly. Cost per call is two `pow`, a few
/// divisions and square roots.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PolytropicRiemannSolver {
    gamma: f64,
    gamma_inverse: f64,
    gamma_minus_one_inverse: f64,
    newton_max_iter: usize,
}

impl PolytropicRiemannSolver {
    /// Create an estimator for ratio of specific heats `gamma > 1`.
    pub fn new(gamma: f64) -> Self {
        Self {
            gamma,
            gamma_inverse: 1.0 / gamma,
            gamma_minus_one_inverse: 1.0 / (gamma - 1.0),
            newton_max_iter: 0,
        }
    }

    /// Tighten the pressure bracket with up to `n` quadratic Newton steps.
    pub fn with_newton_iterations(mut self, n: usize) -> Self {
        self.newton_max_iter = n;
        self
    }

    /// Ratio of specific heats.
    #[inline]
    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    /// Configured number of Newton iterations.
    #[inline]
    pub fn newton_max_iter(&self) -> usize {
        self.newton_max_iter
    }

    /// φ(p_max), specialised so that only the shock branch is evaluated.
    ///
    /// Cost: 0x pow, 2x division, 2x sqrt
    #[inline]
    fn phi_of_p_max(&self, data_i: &RiemannData, data_j: &RiemannData) -> f64 {
        let p_max = data_i.p.max(data_j.p);
        let gamma = self.gamma;

        let radicand_inverse_i =
            0.5 * data_i.rho * ((gamma + 1.0) * p_max + (gamma - 1.0) * data_i.p);
        let value_i = (p_max - data_i.p) / radicand_inverse_i.sqrt();

        let radicand_inverse_j =
            0.5 * data_j.rho * ((gamma + 1.0) * p_max + (gamma - 1.0) * data_j.p);
        let value_j = (p_max - data_j.p) / radicand_inverse_j.sqrt();

        value_i + value_j + data_j.u - data_i.u
    }

    /// One-sided wave function f_Z(p) and its derivative.
    fn f_and_derivative(&self, data: &RiemannData, p: f64) -> (f64, f64) {
        let gamma = self.gamma;
        if p >= data.p {
            // Shock branch
            let a_z = 2.0 / ((gamma + 1.0) * data.rho);
            let b_z = (gamma - 1.0) / (gamma + 1.0) * data.p;
            let root = (a_z / (p + b_z)).sqrt();
            let value = (p - data.p) * root;
            let derivative = root * (1.0 - 0.5 * (p - data.p) / (p + b_z));
            (value, derivative)
        } else {
            // Rarefaction branch
            let exponent = 0.5 * (gamma - 1.0) * self.gamma_inverse;
            let ratio = p / data.p;
            let value = 2.0 * data.a * self.gamma_minus_one_inverse * (ratio.powf(exponent) - 1.0);
            let derivative =
                ratio.powf(-0.5 * (gamma + 1.0) * self.gamma_inverse) / (data.rho * data.a);
            (value, derivative)
        }
    }

    /// φ(p) = f_i(p) + f_j(p) + u_j - u_i and φ'(p).
    ///
    /// φ is increasing and concave; its root is the exact star pressure.
    pub fn phi(&self, data_i: &RiemannData, data_j: &RiemannData, p: f64) -> (f64, f64) {
        let (f_i, df_i) = self.f_and_derivative(data_i, p);
        let (f_j, df_j) = self.f_and_derivative(data_j, p);
        (f_i + f_j + data_j.u - data_i.u, df_i + df_j)
    }

    /// Left-going extreme wave speed for a given star pressure.
    ///
    /// Cost: 0x pow, 1x division, 1x sqrt
    #[inline]
    pub fn lambda1_minus(&self, data: &RiemannData, p_star: f64) -> f64 {
        let factor = (self.gamma + 1.0) * 0.5 * self.gamma_inverse;
        let tmp = positive_part((p_star - data.p) / data.p);
        data.u - data.a * (1.0 + factor * tmp).sqrt()
    }

    /// Right-going extreme wave speed for a given star pressure.
    ///
    /// Cost: 0x pow, 1x division, 1x sqrt
    #[inline]
    pub fn lambda3_plus(&self, data: &RiemannData, p_star: f64) -> f64 {
        let factor = (self.gamma + 1.0) * 0.5 * self.gamma_inverse;
        let tmp = positive_part((p_star - data.p) / data.p);
        data.u + data.a * (1.0 + factor * tmp).sqrt()
    }

    /// Upper bound on the maximal wave speed for a star pressure estimate
    /// from above.
    #[inline]
    pub fn compute_lambda(&self, data_i: &RiemannData, data_j: &RiemannData, p_star: f64) -> f64 {
        let nu_11 = self.lambda1_minus(data_i, p_star);
        let nu_32 = self.lambda3_plus(data_j, p_star);
        positive_part(nu_32).max(negative_part(nu_11))
    }

    /// Two-rarefaction approximation of the star pressure.
    ///
    /// Exact if both waves are rarefactions, an upper bound otherwise. A
    /// non-positive numerator is the vacuum condition, for which zero is
    /// the correct star pressure.
    ///
    /// Cost: 2x pow, 2x division, 0x sqrt
    pub fn p_star_two_rarefaction(&self, data_i: &RiemannData, data_j: &RiemannData) -> f64 {
        let gamma = self.gamma;
        let factor = 0.5 * (gamma - 1.0);

        let numerator = positive_part(data_i.a + data_j.a - factor * (data_j.u - data_i.u));
        let denominator =
            data_i.a * (data_i.p / data_j.p).powf(-factor * self.gamma_inverse) + data_j.a;

        let exponent = 2.0 * gamma * self.gamma_minus_one_inverse;
        data_j.p * (numerator / denominator).powf(exponent)
    }

    /// Estimate the maximal wave speed for the Riemann problem (i, j).
    ///
    /// Bracket selection:
    /// - φ(p_max) < 0: p_1 = p_max, p_2 = p~
    /// - φ(p_max) >= 0: p_1 = p_min, p_2 = min(p_max, p~)
    ///
    /// Only the upper end p_2 >= p* enters the speed bound.
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

        let p_min = data_i.p.min(data_j.p);
        let p_max = data_i.p.max(data_j.p);

        let p_star_tilde = self.p_star_two_rarefaction(data_i, data_j);
        let phi_p_max = self.phi_of_p_max(data_i, data_j);

        let (mut p_1, mut p_2) = if phi_p_max < 0.0 {
            (p_max, p_star_tilde)
        } else {
            (p_min, p_max.min(p_star_tilde))
        };

        let mut iterations = 0;
        while iterations < self.newton_max_iter {
            if p_2 <= p_1 || p_2 - p_1 <= NEWTON_TOLERANCE * p_2 {
                break;
            }
            let (phi_1, dphi_1) = self.phi(data_i, data_j, p_1);
            let (phi_2, dphi_2) = self.phi(data_i, data_j, p_2);
            if phi_1 > 0.0 || phi_2 < 0.0 {
                // Round-off broke the bracket; keep the safe upper end.
                break;
            }
            let (new_1, new_2) = quadratic_newton_step(p_1, p_2, phi_1, phi_2, dphi_1, dphi_2);
            p_1 = new_1;
            p_2 = new_2;
            iterations += 1;
        }

        WaveSpeedEstimate {
            lambda_max: self.compute_lambda(data_i, data_j, p_2),
            p_star: p_2,
            iterations,
        }
    }
}
