//! Conserved state and geometric vector types.
//!
//! A [`State`] holds up to [`MAX_COMPONENTS`] conserved variables. Systems
//! with fewer components (1D Euler has 3, 2D shallow water has 3) leave the
//! tail at zero, so the arithmetic below is uniform across all models.

use std::ops::{Add, AddAssign, Index, IndexMut, Mul, Neg, Sub, SubAssign};

/// Maximal number of conserved components (3D Euler: rho, m_x, m_y, m_z, E).
pub const MAX_COMPONENTS: usize = 5;

/// Conserved state of a single graph node.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct State(pub [f64; MAX_COMPONENTS]);

impl State {
    /// Create a state from its component array.
    #[inline(always)]
    pub const fn new(components: [f64; MAX_COMPONENTS]) -> Self {
        Self(components)
    }

    /// Create a zero state.
    #[inline(always)]
    pub const fn zero() -> Self {
        Self([0.0; MAX_COMPONENTS])
    }

    /// Create a state from a slice, zero padding missing components.
    ///
    /// Extra entries beyond [`MAX_COMPONENTS`] are ignored.
    pub fn from_slice(values: &[f64]) -> Self {
        let mut data = [0.0; MAX_COMPONENTS];
        for (dst, src) in data.iter_mut().zip(values) {
            *dst = *src;
        }
        Self(data)
    }

    /// Component array.
    #[inline(always)]
    pub fn as_array(&self) -> &[f64; MAX_COMPONENTS] {
        &self.0
    }

    /// Euclidean inner product.
    #[inline(always)]
    pub fn dot(&self, other: &State) -> f64 {
        self.0.iter().zip(other.0.iter()).map(|(a, b)| a * b).sum()
    }

    /// True if every component is exactly zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&v| v == 0.0)
    }

    /// True if every component is finite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|v| v.is_finite())
    }

    /// Maximum absolute component.
    pub fn max_abs(&self) -> f64 {
        self.0.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()))
    }

    /// `self + alpha * other`, in place.
    #[inline(always)]
    pub fn axpy(&mut self, alpha: f64, other: &State) {
        for (a, b) in self.0.iter_mut().zip(other.0.iter()) {
            *a += alpha * b;
        }
    }
}

impl Index<usize> for State {
    type Output = f64;

    #[inline(always)]
    fn index(&self, i: usize) -> &f64 {
        &self.0[i]
    }
}

impl IndexMut<usize> for State {
    #[inline(always)]
    fn index_mut(&mut self, i: usize) -> &mut f64 {
        &mut self.0[i]
    }
}

impl Add for State {
    type Output = Self;

    #[inline(always)]
    fn add(mut self, other: Self) -> Self {
        self += other;
        self
    }
}

impl AddAssign for State {
    #[inline(always)]
    fn add_assign(&mut self, other: Self) {
        for (a, b) in self.0.iter_mut().zip(other.0.iter()) {
            *a += b;
        }
    }
}

impl Sub for State {
    type Output = Self;

    #[inline(always)]
    fn sub(mut self, other: Self) -> Self {
        self -= other;
        self
    }
}

impl SubAssign for State {
    #[inline(always)]
    fn sub_assign(&mut self, other: Self) {
        for (a, b) in self.0.iter_mut().zip(other.0.iter()) {
            *a -= b;
        }
    }
}

impl Neg for State {
    type Output = Self;

    #[inline(always)]
    fn neg(self) -> Self {
        self * -1.0
    }
}

impl Mul<f64> for State {
    type Output = Self;

    #[inline(always)]
    fn mul(mut self, scalar: f64) -> Self {
        for a in self.0.iter_mut() {
            *a *= scalar;
        }
        self
    }
}

impl Mul<State> for f64 {
    type Output = State;

    #[inline(always)]
    fn mul(self, state: State) -> State {
        state * self
    }
}

/// Geometric vector in up to three space dimensions (zero padded).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vector3(pub [f64; 3]);

impl Vector3 {
    /// Create a vector from its components.
    #[inline(always)]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self([x, y, z])
    }

    /// Zero vector.
    #[inline(always)]
    pub const fn zero() -> Self {
        Self([0.0; 3])
    }

    /// Create a vector from a slice of at most three entries.
    pub fn from_slice(values: &[f64]) -> Self {
        let mut data = [0.0; 3];
        for (dst, src) in data.iter_mut().zip(values) {
            *dst = *src;
        }
        Self(data)
    }

    /// Dot product.
    #[inline(always)]
    pub fn dot(&self, other: &Vector3) -> f64 {
        self.0[0] * other.0[0] + self.0[1] * other.0[1] + self.0[2] * other.0[2]
    }

    /// Euclidean norm.
    #[inline(always)]
    pub fn norm(&self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Unit vector in the same direction, or zero for a zero vector.
    #[inline]
    pub fn normalized(&self) -> Vector3 {
        let norm = self.norm();
        if norm > 0.0 {
            *self * (1.0 / norm)
        } else {
            Vector3::zero()
        }
    }
}

impl Index<usize> for Vector3 {
    type Output = f64;

    #[inline(always)]
    fn index(&self, i: usize) -> &f64 {
        &self.0[i]
    }
}

impl Mul<f64> for Vector3 {
    type Output = Self;

    #[inline(always)]
    fn mul(self, scalar: f64) -> Self {
        Self([self.0[0] * scalar, self.0[1] * scalar, self.0[2] * scalar])
    }
}

impl Neg for Vector3 {
    type Output = Self;

    #[inline(always)]
    fn neg(self) -> Self {
        self * -1.0
    }
}
