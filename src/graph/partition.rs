//! Ownership ranges for data-parallel node loops.
//!
//! Every per-node phase of a step is a pure function of read-only data, so
//! each worker evaluates its own contiguous range without synchronisation.
//! With the `parallel` feature the ranges are distributed over rayon
//! workers; without it they run in order on the calling thread. The result
//! vector is identical in both modes.

use std::ops::Range;

/// Partition of `0..n_nodes` into contiguous ownership ranges.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Partition {
    n_nodes: usize,
    ranges: Vec<Range<usize>>,
}

impl Partition {
    /// A single range owning every node.
    pub fn single(n_nodes: usize) -> Self {
        Self {
            n_nodes,
            ranges: vec![0..n_nodes],
        }
    }

    /// Split `0..n_nodes` into `n_parts` ranges of (almost) equal length.
    ///
    /// Empty ranges are dropped, so there are never more parts than nodes.
    pub fn contiguous(n_nodes: usize, n_parts: usize) -> Self {
        let n_parts = n_parts.max(1).min(n_nodes.max(1));
        let base = n_nodes / n_parts;
        let extra = n_nodes % n_parts;

        let mut ranges = Vec::with_capacity(n_parts);
        let mut start = 0;
        for p in 0..n_parts {
            let len = base + usize::from(p < extra);
            if len > 0 {
                ranges.push(start..start + len);
            }
            start += len;
        }
        if ranges.is_empty() {
            ranges.push(0..0);
        }

        Self { n_nodes, ranges }
    }

    /// Build a partition from explicit ranges.
    ///
    /// Returns `None` unless the ranges are contiguous, ordered and cover
    /// `0..n_nodes` exactly.
    pub fn from_ranges(n_nodes: usize, ranges: Vec<Range<usize>>) -> Option<Self> {
        let mut expected = 0;
        for r in &ranges {
            if r.start != expected || r.end < r.start {
                return None;
            }
            expected = r.end;
        }
        (expected == n_nodes && !ranges.is_empty()).then_some(Self { n_nodes, ranges })
    }

    /// Number of nodes covered.
    pub fn n_nodes(&self) -> usize {
        self.n_nodes
    }

    /// Number of ownership ranges.
    pub fn n_parts(&self) -> usize {
        self.ranges.len()
    }

    /// The ownership ranges in node order.
    pub fn ranges(&self) -> &[Range<usize>] {
        &self.ranges
    }

    /// Part owning `node`, or `None` if out of range.
    pub fn owner(&self, node: usize) -> Option<usize> {
        self.ranges.iter().position(|r| r.contains(&node))
    }

    /// Evaluate `f` for every node, range by range, and collect in node order.
    #[cfg(feature = "parallel")]
    pub fn map_nodes<T, F>(&self, f: F) -> Vec<T>
    where
        T: Send,
        F: Fn(usize) -> T + Sync + Send,
    {
        use rayon::prelude::*;

        let chunks: Vec<Vec<T>> = self
            .ranges
            .par_iter()
            .map(|range| range.clone().map(&f).collect())
            .collect();
        chunks.into_iter().flatten().collect()
    }

    /// Evaluate `f` for every node, range by range, and collect in node order.
    #[cfg(not(feature = "parallel"))]
    pub fn map_nodes<T, F>(&self, f: F) -> Vec<T>
    where
        T: Send,
        F: Fn(usize) -> T + Sync + Send,
    {
        self.ranges
            .iter()
            .flat_map(|range| range.clone().map(&f))
            .collect()
    }
}
