//! Builder for [`Graph`] and structured test graphs.
//!
//! Real discretisations assemble `c_ij = ∫ φ_i ∇φ_j` and `m_i = ∫ φ_i`
//! elsewhere and hand them over edge by edge. The structured helpers below
//! reproduce the P1 (1D) and lattice (2D) coefficients, which is enough for
//! tests, benchmarks and demos.
//!
//! # Example
//!
//! ```
//! use convex_idp::graph::GraphBuilder;
//! use convex_idp::types::Vector3;
//!
//! let mut builder = GraphBuilder::new(2, 1);
//! builder.lumped_mass(0, 0.5).lumped_mass(1, 0.5);
//! builder.edge(0, 1, Vector3::new(0.5, 0.0, 0.0), Vector3::new(-0.5, 0.0, 0.0));
//! let graph = builder.build().unwrap();
//!
//! assert_eq!(graph.n_entries(), 2);
//! assert_eq!(graph.transposed(0), 1);
//! ```

use std::collections::BTreeMap;

use crate::graph::{Graph, GraphError, Partition};
use crate::types::Vector3;

/// Incremental graph assembly.
#[derive(Clone, Debug)]
pub struct GraphBuilder {
    n_nodes: usize,
    dim: usize,
    masses: Vec<f64>,
    rows: Vec<BTreeMap<usize, Vector3>>,
    n_parts: usize,
    duplicate: Option<(usize, usize)>,
    out_of_range: Option<usize>,
    self_edge: Option<usize>,
}

impl GraphBuilder {
    /// Start a graph with `n_nodes` nodes in `dim` space dimensions.
    pub fn new(n_nodes: usize, dim: usize) -> Self {
        Self {
            n_nodes,
            dim,
            masses: vec![0.0; n_nodes],
            rows: vec![BTreeMap::new(); n_nodes],
            n_parts: 1,
            duplicate: None,
            out_of_range: None,
            self_edge: None,
        }
    }

    /// Set the lumped mass of `node`.
    pub fn lumped_mass(&mut self, node: usize, mass: f64) -> &mut Self {
        match self.masses.get_mut(node) {
            Some(m) => *m = mass,
            None => {
                self.out_of_range.get_or_insert(node);
            }
        }
        self
    }

    /// Insert the edge {i, j} with coefficients `c_ij` and `c_ji`.
    pub fn edge(&mut self, i: usize, j: usize, cij: Vector3, cji: Vector3) -> &mut Self {
        if i >= self.n_nodes || j >= self.n_nodes {
            self.out_of_range.get_or_insert(i.max(j));
            return self;
        }
        if i == j {
            self.self_edge.get_or_insert(i);
            return self;
        }
        if self.rows[i].insert(j, cij).is_some() || self.rows[j].insert(i, cji).is_some() {
            self.duplicate.get_or_insert((i, j));
        }
        self
    }

    /// Split nodes into `n_parts` contiguous ownership ranges.
    pub fn with_parts(&mut self, n_parts: usize) -> &mut Self {
        self.n_parts = n_parts;
        self
    }

    /// Validate and produce the CSR graph.
    pub fn build(&self) -> Result<Graph, GraphError> {
        if !(1..=3).contains(&self.dim) {
            return Err(GraphError::InvalidDimension(self.dim));
        }
        if let Some(node) = self.out_of_range {
            return Err(GraphError::NodeOutOfRange {
                node,
                n_nodes: self.n_nodes,
            });
        }
        if let Some(node) = self.self_edge {
            return Err(GraphError::SelfEdge(node));
        }
        if let Some((i, j)) = self.duplicate {
            return Err(GraphError::DuplicateEdge { i, j });
        }
        for (node, &mass) in self.masses.iter().enumerate() {
            if !(mass.is_finite() && mass > 0.0) {
                return Err(GraphError::InvalidMass { node, mass });
            }
        }

        let mut row_offsets = Vec::with_capacity(self.n_nodes + 1);
        let mut columns = Vec::new();
        let mut cij = Vec::new();
        row_offsets.push(0);
        for row in &self.rows {
            for (&j, c) in row {
                columns.push(j);
                cij.push(*c);
            }
            row_offsets.push(columns.len());
        }

        let mut transposed = vec![0; columns.len()];
        for i in 0..self.n_nodes {
            for e in row_offsets[i]..row_offsets[i + 1] {
                let j = columns[e];
                let row_j = row_offsets[j]..row_offsets[j + 1];
                // Rows are sorted and symmetric by construction.
                let offset = columns[row_j.clone()]
                    .binary_search(&i)
                    .map_err(|_| GraphError::NodeOutOfRange {
                        node: i,
                        n_nodes: self.n_nodes,
                    })?;
                transposed[e] = row_j.start + offset;
            }
        }

        Ok(Graph {
            dim: self.dim,
            row_offsets,
            columns,
            transposed,
            cij,
            lumped_mass: self.masses.clone(),
            partition: Partition::contiguous(self.n_nodes, self.n_parts),
        })
    }
}

impl Graph {
    /// Assemble a graph from lumped masses and symmetric edges
    /// `(i, j, c_ij, c_ji)`, each listed once.
    pub fn from_edges(
        dim: usize,
        lumped_masses: &[f64],
        edges: &[(usize, usize, Vector3, Vector3)],
    ) -> Result<Graph, GraphError> {
        let mut builder = GraphBuilder::new(lumped_masses.len(), dim);
        for (node, &mass) in lumped_masses.iter().enumerate() {
            builder.lumped_mass(node, mass);
        }
        for &(i, j, cij, cji) in edges {
            builder.edge(i, j, cij, cji);
        }
        builder.build()
    }
}

/// A structured graph together with node coordinates.
#[derive(Clone, Debug)]
pub struct StructuredGraph {
    /// The computational graph.
    pub graph: Graph,
    /// Coordinates of every node.
    pub points: Vec<Vector3>,
}

impl StructuredGraph {
    /// Uniform 1D P1 discretisation of `[x0, x1]` with `n_nodes` nodes.
    ///
    /// `m_i = h` (h/2 at the end points), `c_{i,i±1} = ±1/2`.
    ///
    /// # Panics
    ///
    /// Panics if `n_nodes < 2` or `x1 <= x0`.
    pub fn uniform_1d(n_nodes: usize, x0: f64, x1: f64) -> Self {
        assert!(n_nodes >= 2, "need at least two nodes");
        assert!(x1 > x0, "x1 must be greater than x0");

        let h = (x1 - x0) / (n_nodes - 1) as f64;
        let mut builder = GraphBuilder::new(n_nodes, 1);
        for i in 0..n_nodes {
            let mass = if i == 0 || i == n_nodes - 1 { 0.5 * h } else { h };
            builder.lumped_mass(i, mass);
        }
        for i in 0..n_nodes - 1 {
            builder.edge(i, i + 1, Vector3::new(0.5, 0.0, 0.0), Vector3::new(-0.5, 0.0, 0.0));
        }

        let points = (0..n_nodes)
            .map(|i| Vector3::new(x0 + i as f64 * h, 0.0, 0.0))
            .collect();

        Self {
            // Validation cannot fail for the coefficients above.
            graph: builder.build().unwrap_or_else(|e| unreachable!("{e}")),
            points,
        }
    }

    /// Five-point lattice on `[0, lx] x [0, ly]` with `nx x ny` nodes.
    ///
    /// Lumped masses are the dual cell areas; the coefficient towards the
    /// east neighbour is `(dy/2, 0)`, towards the north neighbour `(0, dx/2)`,
    /// halved along the boundary.
    ///
    /// # Panics
    ///
    /// Panics if `nx < 2`, `ny < 2`, or a length is not positive.
    pub fn lattice_2d(nx: usize, ny: usize, lx: f64, ly: f64) -> Self {
        assert!(nx >= 2 && ny >= 2, "need at least 2x2 nodes");
        assert!(lx > 0.0 && ly > 0.0, "domain lengths must be positive");

        let dx = lx / (nx - 1) as f64;
        let dy = ly / (ny - 1) as f64;
        let id = |ix: usize, iy: usize| iy * nx + ix;
        let edge_factor = |on_boundary: bool| if on_boundary { 0.5 } else { 1.0 };

        let mut builder = GraphBuilder::new(nx * ny, 2);
        let mut points = Vec::with_capacity(nx * ny);
        for iy in 0..ny {
            for ix in 0..nx {
                let wx = if ix == 0 || ix == nx - 1 { 0.5 } else { 1.0 };
                let wy = if iy == 0 || iy == ny - 1 { 0.5 } else { 1.0 };
                builder.lumped_mass(id(ix, iy), wx * wy * dx * dy);
                points.push(Vector3::new(ix as f64 * dx, iy as f64 * dy, 0.0));

                if ix + 1 < nx {
                    let c = 0.5 * dy * edge_factor(iy == 0 || iy == ny - 1);
                    builder.edge(
                        id(ix, iy),
                        id(ix + 1, iy),
                        Vector3::new(c, 0.0, 0.0),
                        Vector3::new(-c, 0.0, 0.0),
                    );
                }
                if iy + 1 < ny {
                    let c = 0.5 * dx * edge_factor(ix == 0 || ix == nx - 1);
                    builder.edge(
                        id(ix, iy),
                        id(ix, iy + 1),
                        Vector3::new(0.0, c, 0.0),
                        Vector3::new(0.0, -c, 0.0),
                    );
                }
            }
        }

        Self {
            graph: builder.build().unwrap_or_else(|e| unreachable!("{e}")),
            points,
        }
    }

    /// Split the graph into `n_parts` ownership ranges.
    pub fn with_parts(mut self, n_parts: usize) -> Self {
        let partition = Partition::contiguous(self.graph.n_nodes(), n_parts);
        self.graph.partition = partition;
        self
    }
}
