//! Static computational graph.
//!
//! The graph is produced by an external discretisation and is read-only for
//! the time-stepping core:
//!
//! - [`Graph`]: CSR adjacency without the diagonal, `c_ij`, `m_i`
//! - [`EdgeMatrix`]: one value per stored entry (d_ij, l_ij, P_ij)
//! - [`Partition`]: contiguous ownership ranges for parallel loops
//! - [`GraphBuilder`], [`StructuredGraph`]: assembly helpers

mod builder;
mod partition;
mod sparsity;

pub use builder::{GraphBuilder, StructuredGraph};
pub use partition::Partition;
pub use sparsity::{EdgeMatrix, Graph, GraphError};
