//! Built grid graph
//!
//! [`GridGraph`] is the output of a build: a fixed vertex set (one per grid
//! cell), the weighted edges in insertion order, CSR adjacency for
//! algorithm libraries, and the [`GridCodec`] needed to map algorithm results
//! (paths, cut sides, flows) back to grid coordinates.

use crate::error::{Error, Result};
use crate::grid::{GridCodec, Index};
use crate::storage::{CsrGraph, VertexId};

/// Whether edges have an orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Directedness {
    /// At most one edge per unordered vertex pair
    #[default]
    Undirected,
    /// One arc per offset occurrence, `u -> v`
    Directed,
}

/// Weighted edge as inserted by the builder
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    /// Cell the offset was applied from
    pub source: VertexId,
    /// Cell the offset landed on
    pub target: VertexId,
    /// Metric value, fixed at insertion
    pub weight: f32,
}

/// Weighted graph over the cells of a grid
#[derive(Debug, Clone, PartialEq)]
pub struct GridGraph<const D: usize> {
    directedness: Directedness,
    codec: GridCodec<D>,
    edges: Vec<Edge>,
    csr: CsrGraph,
}

impl<const D: usize> GridGraph<D> {
    /// Freeze `edges` into a graph with one vertex per cell of `codec`
    ///
    /// Undirected edges are stored once in [`GridGraph::edges`] and as two
    /// arcs in the adjacency.
    ///
    /// # Errors
    ///
    /// Returns [`Error::VertexOutOfRange`] if an endpoint is not a cell of
    /// `codec`, [`Error::Overflow`] if the arc count exceeds `u32`.
    pub fn from_edges(
        codec: GridCodec<D>,
        directedness: Directedness,
        edges: Vec<Edge>,
    ) -> Result<Self> {
        let arcs: Vec<(VertexId, VertexId, f32)> = match directedness {
            Directedness::Directed => edges
                .iter()
                .map(|e| (e.source, e.target, e.weight))
                .collect(),
            Directedness::Undirected => edges
                .iter()
                .flat_map(|e| [(e.source, e.target, e.weight), (e.target, e.source, e.weight)])
                .collect(),
        };
        let csr = CsrGraph::from_arcs(codec.num_cells(), &arcs)?;

        Ok(Self {
            directedness,
            codec,
            edges,
            csr,
        })
    }

    /// Number of vertices (the grid's cell count at build time)
    #[must_use]
    pub const fn num_vertices(&self) -> usize {
        self.csr.num_vertices()
    }

    /// Number of edges; an undirected edge counts once
    #[must_use]
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Edges in insertion order
    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Directedness the graph was built with
    #[must_use]
    pub const fn directedness(&self) -> Directedness {
        self.directedness
    }

    /// Whether edges are oriented
    #[must_use]
    pub fn is_directed(&self) -> bool {
        self.directedness == Directedness::Directed
    }

    /// Coordinate codec of the grid the graph was built from
    #[must_use]
    pub const fn codec(&self) -> &GridCodec<D> {
        &self.codec
    }

    /// Underlying CSR adjacency
    #[must_use]
    pub const fn csr(&self) -> &CsrGraph {
        &self.csr
    }

    /// Vertex of a grid coordinate, `None` if outside the grid
    #[must_use]
    pub fn vertex(&self, index: &Index<D>) -> Option<VertexId> {
        self.codec.to_vertex(index)
    }

    /// Grid coordinate of `vertex`
    ///
    /// # Errors
    ///
    /// Returns [`Error::VertexOutOfRange`] if `vertex` is not a vertex of
    /// this graph.
    pub fn coordinate(&self, vertex: VertexId) -> Result<Index<D>> {
        self.check(vertex)?;
        Ok(self.codec.to_coordinate(vertex))
    }

    /// Map a vertex path (e.g. from a shortest-path search) to coordinates
    ///
    /// # Errors
    ///
    /// Returns [`Error::VertexOutOfRange`] on the first vertex that is not
    /// part of this graph.
    pub fn path_to_coordinates(&self, path: &[VertexId]) -> Result<Vec<Index<D>>> {
        path.iter().map(|&v| self.coordinate(v)).collect()
    }

    fn check(&self, vertex: VertexId) -> Result<()> {
        if (vertex.0 as usize) < self.num_vertices() {
            Ok(())
        } else {
            Err(Error::VertexOutOfRange {
                vertex: vertex.0,
                num_vertices: self.num_vertices(),
            })
        }
    }

    /// Vertices reachable from `vertex` over one edge
    ///
    /// Undirected: every incident edge. Directed: outgoing arcs.
    ///
    /// # Errors
    ///
    /// Returns [`Error::VertexOutOfRange`] if `vertex` is out of bounds
    pub fn neighbors(&self, vertex: VertexId) -> Result<&[u32]> {
        self.csr.outgoing_neighbors(vertex)
    }

    /// Neighbors of `vertex` with the matching edge weights
    ///
    /// # Errors
    ///
    /// Returns [`Error::VertexOutOfRange`] if `vertex` is out of bounds
    pub fn adjacency(&self, vertex: VertexId) -> Result<(&[u32], &[f32])> {
        self.csr.adjacency(vertex)
    }

    /// Outgoing arc count (incident edge count when undirected)
    ///
    /// # Errors
    ///
    /// Returns [`Error::VertexOutOfRange`] if `vertex` is out of bounds
    pub fn out_degree(&self, vertex: VertexId) -> Result<usize> {
        Ok(self.csr.outgoing_neighbors(vertex)?.len())
    }

    /// Incoming arc count (incident edge count when undirected)
    ///
    /// # Errors
    ///
    /// Returns [`Error::VertexOutOfRange`] if `vertex` is out of bounds
    pub fn in_degree(&self, vertex: VertexId) -> Result<usize> {
        Ok(self.csr.incoming_neighbors(vertex)?.len())
    }

    /// Incident edge count; for directed graphs, in-degree plus out-degree
    ///
    /// # Errors
    ///
    /// Returns [`Error::VertexOutOfRange`] if `vertex` is out of bounds
    pub fn degree(&self, vertex: VertexId) -> Result<usize> {
        match self.directedness {
            Directedness::Undirected => self.out_degree(vertex),
            Directedness::Directed => Ok(self.out_degree(vertex)? + self.in_degree(vertex)?),
        }
    }

    /// Weight of the first edge from `u` to `v`
    ///
    /// Symmetric in `u` and `v` for undirected graphs. `None` if there is no
    /// such edge or either vertex is out of bounds.
    #[must_use]
    pub fn edge_weight(&self, u: VertexId, v: VertexId) -> Option<f32> {
        let (targets, weights) = self.csr.adjacency(u).ok()?;
        targets
            .iter()
            .position(|&t| t == v.0)
            .map(|i| weights[i])
    }

    /// Whether an edge from `u` to `v` exists
    #[must_use]
    pub fn has_edge(&self, u: VertexId, v: VertexId) -> bool {
        self.edge_weight(u, v).is_some()
    }

    /// `(source, target, weight)` list in the form graph libraries ingest
    #[must_use]
    pub fn weighted_edges(&self) -> Vec<(usize, usize, f64)> {
        self.edges
            .iter()
            .map(|e| (e.source.0 as usize, e.target.0 as usize, f64::from(e.weight)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(source: u32, target: u32, weight: f32) -> Edge {
        Edge {
            source: VertexId(source),
            target: VertexId(target),
            weight,
        }
    }

    fn line(directedness: Directedness) -> GridGraph<1> {
        // 0 - 1 - 2 - 3
        let codec = GridCodec::new([4]).unwrap();
        let edges = vec![edge(0, 1, 1.0), edge(1, 2, 4.0), edge(2, 3, 9.0)];
        GridGraph::from_edges(codec, directedness, edges).unwrap()
    }

    #[test]
    fn test_undirected_adjacency_both_ways() {
        let graph = line(Directedness::Undirected);
        assert_eq!(graph.num_vertices(), 4);
        assert_eq!(graph.num_edges(), 3);
        assert_eq!(graph.csr().num_arcs(), 6);

        assert_eq!(graph.neighbors(VertexId(1)).unwrap(), &[0, 2]);
        assert_eq!(graph.edge_weight(VertexId(2), VertexId(1)), Some(4.0));
        assert_eq!(graph.edge_weight(VertexId(1), VertexId(2)), Some(4.0));
        assert_eq!(graph.degree(VertexId(0)).unwrap(), 1);
        assert_eq!(graph.degree(VertexId(2)).unwrap(), 2);
    }

    #[test]
    fn test_directed_degrees() {
        let graph = line(Directedness::Directed);
        assert!(graph.is_directed());
        assert_eq!(graph.out_degree(VertexId(1)).unwrap(), 1);
        assert_eq!(graph.in_degree(VertexId(1)).unwrap(), 1);
        assert_eq!(graph.degree(VertexId(1)).unwrap(), 2);
        assert_eq!(graph.degree(VertexId(3)).unwrap(), 1);
        assert!(graph.has_edge(VertexId(0), VertexId(1)));
        assert!(!graph.has_edge(VertexId(1), VertexId(0)));
    }

    #[test]
    fn test_coordinate_mapping() {
        let codec = GridCodec::new([3, 2]).unwrap();
        let graph = GridGraph::from_edges(codec, Directedness::Undirected, vec![]).unwrap();

        assert_eq!(graph.vertex(&[2, 1]), Some(VertexId(5)));
        assert_eq!(graph.coordinate(VertexId(4)).unwrap(), [1, 1]);
        assert_eq!(
            graph
                .path_to_coordinates(&[VertexId(0), VertexId(1), VertexId(4)])
                .unwrap(),
            vec![[0, 0], [1, 0], [1, 1]]
        );
        assert!(graph.coordinate(VertexId(6)).is_err());
    }

    #[test]
    fn test_out_of_range_queries() {
        let graph = line(Directedness::Undirected);
        assert!(graph.neighbors(VertexId(4)).is_err());
        assert_eq!(graph.edge_weight(VertexId(9), VertexId(0)), None);
    }

    #[test]
    fn test_edge_outside_codec_rejected() {
        let codec = GridCodec::new([2]).unwrap();
        let err = GridGraph::from_edges(codec, Directedness::Directed, vec![edge(0, 5, 1.0)])
            .unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Bounds);
    }

    #[test]
    fn test_weighted_edges_export() {
        let graph = line(Directedness::Undirected);
        assert_eq!(
            graph.weighted_edges(),
            vec![(0, 1, 1.0), (1, 2, 4.0), (2, 3, 9.0)]
        );
    }
}
