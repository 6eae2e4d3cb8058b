//! CSR storage of the computational graph and per-edge matrices.

use std::ops::Range;

use thiserror::Error;

use crate::graph::Partition;
use crate::types::{EntryIndex, NodeIndex, Vector3};

/// Errors raised while assembling a [`Graph`].
#[derive(Debug, Error, PartialEq)]
pub enum GraphError {
    /// Space dimension outside 1..=3.
    #[error("Unsupported space dimension {0} (expected 1, 2 or 3)")]
    InvalidDimension(usize),

    /// Node index out of range.
    #[error("Node {node} out of range for a graph with {n_nodes} nodes")]
    NodeOutOfRange { node: usize, n_nodes: usize },

    /// Self-loops are not part of the graph.
    #[error("Self edge at node {0}")]
    SelfEdge(usize),

    /// The same ordered pair was inserted twice.
    #[error("Duplicate edge ({i}, {j})")]
    DuplicateEdge { i: usize, j: usize },

    /// Lumped masses must be positive and finite.
    #[error("Invalid lumped mass {mass} at node {node}")]
    InvalidMass { node: usize, mass: f64 },

    /// Partition does not cover the node range.
    #[error("Partition covers {covered} nodes, graph has {n_nodes}")]
    PartitionMismatch { covered: usize, n_nodes: usize },
}

/// Static computational graph: symmetric sparsity without the diagonal,
/// geometric coefficients `c_ij`, and lumped masses `m_i`.
///
/// Entries of row `i` are sorted by column. For every entry (i, j) the
/// position of (j, i) is stored, so that symmetric per-edge quantities can
/// be evaluated independently on both rows.
#[derive(Clone, Debug)]
pub struct Graph {
    pub(crate) dim: usize,
    pub(crate) row_offsets: Vec<usize>,
    pub(crate) columns: Vec<usize>,
    pub(crate) transposed: Vec<usize>,
    pub(crate) cij: Vec<Vector3>,
    pub(crate) lumped_mass: Vec<f64>,
    pub(crate) partition: Partition,
}

impl Graph {
    /// Number of nodes.
    #[inline]
    pub fn n_nodes(&self) -> usize {
        self.lumped_mass.len()
    }

    /// Number of stored off-diagonal entries (twice the number of edges).
    #[inline]
    pub fn n_entries(&self) -> usize {
        self.columns.len()
    }

    /// Space dimension.
    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Entry range of row `i`.
    #[inline(always)]
    pub fn row(&self, i: usize) -> Range<usize> {
        self.row_offsets[i]..self.row_offsets[i + 1]
    }

    /// Number of neighbours of node `i`.
    #[inline(always)]
    pub fn degree(&self, i: usize) -> usize {
        self.row_offsets[i + 1] - self.row_offsets[i]
    }

    /// Column (neighbour node) of entry `e`.
    #[inline(always)]
    pub fn column(&self, e: usize) -> usize {
        self.columns[e]
    }

    /// Position of the transposed entry (j, i) for entry `e = (i, j)`.
    #[inline(always)]
    pub fn transposed(&self, e: usize) -> usize {
        self.transposed[e]
    }

    /// Geometric coefficient `c_ij` of entry `e`.
    #[inline(always)]
    pub fn cij(&self, e: usize) -> &Vector3 {
        &self.cij[e]
    }

    /// Lumped mass `m_i`.
    #[inline(always)]
    pub fn lumped_mass(&self, i: usize) -> f64 {
        self.lumped_mass[i]
    }

    /// All lumped masses.
    pub fn lumped_masses(&self) -> &[f64] {
        &self.lumped_mass
    }

    /// Sum of lumped masses (measure of the domain).
    pub fn total_mass(&self) -> f64 {
        self.lumped_mass.iter().sum()
    }

    /// Ownership partition used for parallel loops.
    pub fn partition(&self) -> &Partition {
        &self.partition
    }

    /// Replace the ownership partition.
    pub fn with_partition(mut self, partition: Partition) -> Result<Self, GraphError> {
        if partition.n_nodes() != self.n_nodes() {
            return Err(GraphError::PartitionMismatch {
                covered: partition.n_nodes(),
                n_nodes: self.n_nodes(),
            });
        }
        self.partition = partition;
        Ok(self)
    }

    /// Iterate over `(entry, neighbour)` pairs of row `i`.
    #[inline]
    pub fn neighbors(&self, i: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.row(i).map(move |e| (e, self.columns[e]))
    }

    /// Entry index of (i, j), if j is a neighbour of i.
    pub fn find_entry(&self, i: NodeIndex, j: NodeIndex) -> Option<EntryIndex> {
        let range = self.row(i.get());
        self.columns[range.clone()]
            .binary_search(&j.get())
            .ok()
            .map(|offset| EntryIndex::new(range.start + offset))
    }
}

/// Per-entry values aligned with the CSR layout of a [`Graph`].
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeMatrix<T> {
    values: Vec<T>,
}

impl<T: Clone> EdgeMatrix<T> {
    /// Matrix with every entry set to `value`.
    pub fn filled(graph: &Graph, value: T) -> Self {
        Self {
            values: vec![value; graph.n_entries()],
        }
    }
}

impl<T: Send> EdgeMatrix<T> {
    /// Evaluate `f(i, e, j)` for every entry, row by row over the partition.
    pub fn from_fn<F>(graph: &Graph, f: F) -> Self
    where
        F: Fn(usize, usize, usize) -> T + Sync + Send,
    {
        let rows = graph.partition().map_nodes(|i| {
            graph
                .neighbors(i)
                .map(|(e, j)| f(i, e, j))
                .collect::<Vec<_>>()
        });
        Self {
            values: rows.into_iter().flatten().collect(),
        }
    }
}

impl<T> EdgeMatrix<T> {
    /// Wrap a vector with one value per CSR entry.
    pub fn from_values(values: Vec<T>) -> Self {
        Self { values }
    }

    /// Number of stored entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if there are no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value of entry `e`.
    #[inline(always)]
    pub fn get(&self, e: usize) -> &T {
        &self.values[e]
    }

    /// Mutable value of entry `e`.
    #[inline(always)]
    pub fn get_mut(&mut self, e: usize) -> &mut T {
        &mut self.values[e]
    }

    /// Raw values.
    pub fn as_slice(&self) -> &[T] {
        &self.values
    }

    /// Mutable raw values.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.values
    }
}

impl EdgeMatrix<f64> {
    /// Maximal absolute difference between entry (i, j) and (j, i).
    pub fn asymmetry(&self, graph: &Graph) -> f64 {
        (0..self.values.len())
            .map(|e| (self.values[e] - self.values[graph.transposed(e)]).abs())
            .fold(0.0, f64::max)
    }

    /// Row sum of row `i`.
    pub fn row_sum(&self, graph: &Graph, i: usize) -> f64 {
        self.values[graph.row(i)].iter().sum()
    }
}
