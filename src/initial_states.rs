//! Initial configurations for verification runs.
//!
//! - [`Uniform`]: constant state
//! - [`Sod`]: Sod shock tube (1, 0, 1) / (0.125, 0, 0.1)
//! - [`Leblanc`]: Leblanc shock tube with its exact self-similar solution
//! - [`DamBreak`]: shallow water dam break over a flat bottom
//!
//! All configurations are one-dimensional in the first coordinate and
//! constant in the others.

use crate::equations::{Euler, EulerPrimitive, ShallowWater, ShallowWaterPrimitive};
use crate::types::{State, Vector3};

/// Initial (or exact) state as a function of position and time.
pub trait InitialState: Send + Sync {
    /// Name of the configuration.
    fn name(&self) -> &'static str;

    /// State at `point` and time `t`.
    fn compute(&self, point: &Vector3, t: f64) -> State;

    /// Nodal interpolation at `points`.
    fn interpolate(&self, points: &[Vector3], t: f64) -> Vec<State> {
        points.iter().map(|x| self.compute(x, t)).collect()
    }
}

/// Constant state.
#[derive(Clone, Copy, Debug)]
pub struct Uniform {
    state: State,
}

impl Uniform {
    pub fn new(state: State) -> Self {
        Self { state }
    }
}

impl InitialState for Uniform {
    fn name(&self) -> &'static str {
        "uniform"
    }

    fn compute(&self, _point: &Vector3, _t: f64) -> State {
        self.state
    }
}

/// Sod shock tube with the discontinuity at `position`.
///
/// Only the initial data is provided; `t` is ignored.
#[derive(Clone, Debug)]
pub struct Sod {
    left: State,
    right: State,
    position: f64,
}

impl Sod {
    pub fn new(euler: &Euler, position: f64) -> Self {
        Self {
            left: euler.from_primitive(&EulerPrimitive::new_1d(1.0, 0.0, 1.0)),
            right: euler.from_primitive(&EulerPrimitive::new_1d(0.125, 0.0, 0.1)),
            position,
        }
    }
}

impl InitialState for Sod {
    fn name(&self) -> &'static str {
        "sod"
    }

    fn compute(&self, point: &Vector3, _t: f64) -> State {
        if point[0] < self.position {
            self.left
        } else {
            self.right
        }
    }
}

/// Leblanc shock tube, gamma = 5/3, discontinuity at x = 0.
///
/// Left (1, 0, 1/15), right (1e-3, 0, 2/3 1e-10). The exact solution
/// consists of a rarefaction, a contact and a shock.
#[derive(Clone, Debug)]
pub struct Leblanc {
    euler: Euler,
}

impl Leblanc {
    const RAREFACTION_SPEED: f64 = 0.495_784_895_188_979_34;
    const CONTACT_VELOCITY: f64 = 0.621_838_671_391_734_54;
    const SHOCK_SPEED: f64 = 0.829_118_362_533_469_82;
    const PRE_CONTACT_DENSITY: f64 = 5.407_933_534_931_624_9e-2;
    const POST_CONTACT_DENSITY: f64 = 3.999_998_060_429_996_3e-3;
    const CONTACT_PRESSURE: f64 = 5.155_779_276_509_699_6e-4;

    pub fn new(dim: usize) -> Self {
        Self {
            euler: Euler::new(dim, 5.0 / 3.0),
        }
    }

    /// The polytropic gas the solution is computed for.
    pub fn system(&self) -> &Euler {
        &self.euler
    }

    /// Exact primitive state (rho, u, p) at `x` and time `t`.
    pub fn primitive(&self, x: f64, t: f64) -> (f64, f64, f64) {
        if x <= -t / 3.0 {
            (1.0, 0.0, 1.0 / 15.0)
        } else if x < Self::RAREFACTION_SPEED * t {
            let chi = x / t;
            let base = 0.75 - 0.75 * chi;
            (base.powi(3), 0.75 * (1.0 / 3.0 + chi), base.powi(5) / 15.0)
        } else if x < Self::CONTACT_VELOCITY * t {
            (Self::PRE_CONTACT_DENSITY, Self::CONTACT_VELOCITY, Self::CONTACT_PRESSURE)
        } else if x < Self::SHOCK_SPEED * t {
            (Self::POST_CONTACT_DENSITY, Self::CONTACT_VELOCITY, Self::CONTACT_PRESSURE)
        } else {
            (1.0e-3, 0.0, 2.0 / 3.0 * 1.0e-10)
        }
    }
}

impl InitialState for Leblanc {
    fn name(&self) -> &'static str {
        "leblanc"
    }

    fn compute(&self, point: &Vector3, t: f64) -> State {
        let (rho, u, p) = self.primitive(point[0], t);
        let velocity = Vector3::new(u, 0.0, 0.0);
        self.euler.from_primitive(&EulerPrimitive::new(rho, velocity, p))
    }
}

/// Dam break: depth `h_left` for x < `position`, `h_right` beyond, at rest.
#[derive(Clone, Debug)]
pub struct DamBreak {
    left: State,
    right: State,
    position: f64,
}

impl DamBreak {
    pub fn new(swe: &ShallowWater, h_left: f64, h_right: f64, position: f64) -> Self {
        Self {
            left: swe.from_primitive(&ShallowWaterPrimitive::new_1d(h_left, 0.0)),
            right: swe.from_primitive(&ShallowWaterPrimitive::new_1d(h_right, 0.0)),
            position,
        }
    }
}

impl InitialState for DamBreak {
    fn name(&self) -> &'static str {
        "dam_break"
    }

    fn compute(&self, point: &Vector3, _t: f64) -> State {
        if point[0] < self.position {
            self.left
        } else {
            self.right
        }
    }
}
