//! Strongly-typed building blocks shared by all modules.
//!
//! - [`State`]: conserved variables of one node, fixed capacity
//! - [`Vector3`]: geometric coefficients and directions
//! - [`NodeIndex`], [`EntryIndex`]: graph node and CSR entry indices
//!
//! # Example
//!
//! ```
//! use convex_idp::types::{State, Vector3};
//!
//! let u = State::from_slice(&[1.0, 0.0, 2.5]);
//! let c = Vector3::new(0.5, 0.0, 0.0);
//! assert_eq!(u[2], 2.5);
//! assert_eq!(c.norm(), 0.5);
//! ```

mod indices;
mod state;

pub use indices::{EntryIndex, NodeIndex};
pub use state::{MAX_COMPONENTS, State, Vector3};

/// Positive part max(x, 0).
#[inline(always)]
pub fn positive_part(x: f64) -> f64 {
    x.max(0.0)
}

/// Negative part max(-x, 0).
#[inline(always)]
pub fn negative_part(x: f64) -> f64 {
    (-x).max(0.0)
}
