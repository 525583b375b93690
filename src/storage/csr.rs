//! CSR (Compressed Sparse Row) adjacency for built grid graphs
//!
//! Based on `GraphBLAST` (Yang et al., ACM `ToMS` 2022) for GPU-optimized sparse matrix operations.
//!
//! # CSR Format
//!
//! ```text
//! Arcs: 0 → 1, 0 → 2, 1 → 2   (3 vertices)
//!
//! CSR:
//!   row_offsets: [0, 2, 3, 3]  // Vertex 0: arcs [0..2), vertex 1: [2..3), vertex 2: [3..3)
//!   col_indices: [1, 2, 2]      // Arc 0 → vertex 1, arc 1 → vertex 2, arc 2 → vertex 2
//!   arc_weights: [1.0, 1.0, 1.0]
//! ```
//!
//! The vertex count is fixed up front (the grid's cell count), so isolated
//! vertices at the end of the range still get rows. An undirected edge is
//! stored as two arcs, one per direction.

use crate::error::{Error, Result};

/// Vertex identifier: the linear offset of a grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexId(pub u32);

/// Frozen CSR adjacency (forward and reverse)
///
/// Optimized for:
/// - O(1) access to outgoing arcs (via forward CSR)
/// - O(1) access to incoming arcs (via reverse CSR)
/// - Slices that can be handed to sparse-matrix code unchanged
///
/// # Example
///
/// ```
/// use grid_graph::{CsrGraph, VertexId};
///
/// let arcs = [(VertexId(0), VertexId(1), 1.0), (VertexId(0), VertexId(2), 4.0)];
/// let csr = CsrGraph::from_arcs(4, &arcs).unwrap();
///
/// assert_eq!(csr.num_vertices(), 4);
/// assert_eq!(csr.outgoing_neighbors(VertexId(0)).unwrap(), &[1, 2]);
/// assert_eq!(csr.incoming_neighbors(VertexId(2)).unwrap(), &[0]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CsrGraph {
    /// Forward CSR: vertex i's arcs start at `row_offsets[i]`
    /// Length: `num_vertices` + 1
    row_offsets: Vec<u32>,

    /// Forward CSR: arc targets
    col_indices: Vec<u32>,

    /// Forward CSR: arc weights
    arc_weights: Vec<f32>,

    /// Reverse CSR: vertex i's incoming arcs start at `rev_row_offsets[i]`
    rev_row_offsets: Vec<u32>,

    /// Reverse CSR: arc sources
    rev_col_indices: Vec<u32>,

    /// Reverse CSR: arc weights (same as forward, reordered)
    rev_arc_weights: Vec<f32>,

    num_vertices: usize,
}

/// Bucket arcs by `key` into CSR rows, keeping input order within a row
fn compress(
    num_vertices: usize,
    arcs: &[(VertexId, VertexId, f32)],
    key: impl Fn(&(VertexId, VertexId, f32)) -> (u32, u32),
) -> Result<(Vec<u32>, Vec<u32>, Vec<f32>)> {
    let num_arcs = u32::try_from(arcs.len())
        .map_err(|_| Error::overflow(format!("{} arcs exceed u32 offsets", arcs.len())))?;

    let mut row_offsets = vec![0_u32; num_vertices + 1];
    for arc in arcs {
        let (row, _) = key(arc);
        if row as usize >= num_vertices {
            return Err(Error::VertexOutOfRange {
                vertex: row,
                num_vertices,
            });
        }
        row_offsets[row as usize + 1] += 1;
    }
    for i in 0..num_vertices {
        row_offsets[i + 1] += row_offsets[i];
    }
    debug_assert_eq!(row_offsets[num_vertices], num_arcs);

    let mut cursor = row_offsets.clone();
    let mut col_indices = vec![0_u32; arcs.len()];
    let mut weights = vec![0.0_f32; arcs.len()];
    for arc in arcs {
        let (row, col) = key(arc);
        if col as usize >= num_vertices {
            return Err(Error::VertexOutOfRange {
                vertex: col,
                num_vertices,
            });
        }
        let slot = &mut cursor[row as usize];
        col_indices[*slot as usize] = col;
        weights[*slot as usize] = arc.2;
        *slot += 1;
    }

    Ok((row_offsets, col_indices, weights))
}

impl CsrGraph {
    /// Graph with `num_vertices` isolated vertices
    #[must_use]
    pub fn with_vertices(num_vertices: usize) -> Self {
        Self {
            row_offsets: vec![0; num_vertices + 1],
            col_indices: Vec::new(),
            arc_weights: Vec::new(),
            rev_row_offsets: vec![0; num_vertices + 1],
            rev_col_indices: Vec::new(),
            rev_arc_weights: Vec::new(),
            num_vertices,
        }
    }

    /// Build from a list of `(source, target, weight)` arcs
    ///
    /// Arcs of the same source keep their input order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::VertexOutOfRange`] if an endpoint is not below
    /// `num_vertices`, [`Error::Overflow`] if the arc count exceeds `u32`.
    pub fn from_arcs(num_vertices: usize, arcs: &[(VertexId, VertexId, f32)]) -> Result<Self> {
        let (row_offsets, col_indices, arc_weights) =
            compress(num_vertices, arcs, |(src, dst, _)| (src.0, dst.0))?;
        let (rev_row_offsets, rev_col_indices, rev_arc_weights) =
            compress(num_vertices, arcs, |(src, dst, _)| (dst.0, src.0))?;

        Ok(Self {
            row_offsets,
            col_indices,
            arc_weights,
            rev_row_offsets,
            rev_col_indices,
            rev_arc_weights,
            num_vertices,
        })
    }

    fn check(&self, vertex: VertexId) -> Result<usize> {
        let idx = vertex.0 as usize;
        if idx >= self.num_vertices {
            return Err(Error::VertexOutOfRange {
                vertex: vertex.0,
                num_vertices: self.num_vertices,
            });
        }
        Ok(idx)
    }

    /// Targets of the arcs leaving `vertex`
    ///
    /// # Errors
    ///
    /// Returns [`Error::VertexOutOfRange`] if `vertex` is out of bounds
    pub fn outgoing_neighbors(&self, vertex: VertexId) -> Result<&[u32]> {
        let idx = self.check(vertex)?;
        let start = self.row_offsets[idx] as usize;
        let end = self.row_offsets[idx + 1] as usize;
        Ok(&self.col_indices[start..end])
    }

    /// Sources of the arcs entering `vertex`
    ///
    /// # Errors
    ///
    /// Returns [`Error::VertexOutOfRange`] if `vertex` is out of bounds
    pub fn incoming_neighbors(&self, vertex: VertexId) -> Result<&[u32]> {
        let idx = self.check(vertex)?;
        let start = self.rev_row_offsets[idx] as usize;
        let end = self.rev_row_offsets[idx + 1] as usize;
        Ok(&self.rev_col_indices[start..end])
    }

    /// Outgoing `(targets, weights)` of `vertex`
    ///
    /// # Errors
    ///
    /// Returns [`Error::VertexOutOfRange`] if `vertex` is out of bounds
    pub fn adjacency(&self, vertex: VertexId) -> Result<(&[u32], &[f32])> {
        let idx = self.check(vertex)?;
        let start = self.row_offsets[idx] as usize;
        let end = self.row_offsets[idx + 1] as usize;
        Ok((&self.col_indices[start..end], &self.arc_weights[start..end]))
    }

    /// Incoming `(sources, weights)` of `vertex`
    ///
    /// # Errors
    ///
    /// Returns [`Error::VertexOutOfRange`] if `vertex` is out of bounds
    pub fn reverse_adjacency(&self, vertex: VertexId) -> Result<(&[u32], &[f32])> {
        let idx = self.check(vertex)?;
        let start = self.rev_row_offsets[idx] as usize;
        let end = self.rev_row_offsets[idx + 1] as usize;
        Ok((
            &self.rev_col_indices[start..end],
            &self.rev_arc_weights[start..end],
        ))
    }

    /// Get number of vertices
    #[must_use]
    pub const fn num_vertices(&self) -> usize {
        self.num_vertices
    }

    /// Get number of stored arcs
    #[must_use]
    pub fn num_arcs(&self) -> usize {
        self.col_indices.len()
    }

    /// Get forward CSR components `(row_offsets, col_indices, weights)`
    #[must_use]
    pub fn csr_components(&self) -> (&[u32], &[u32], &[f32]) {
        (&self.row_offsets, &self.col_indices, &self.arc_weights)
    }
}

impl Default for CsrGraph {
    fn default() -> Self {
        Self::with_vertices(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arc(src: u32, dst: u32, weight: f32) -> (VertexId, VertexId, f32) {
        (VertexId(src), VertexId(dst), weight)
    }

    #[test]
    fn test_empty_graph() {
        let graph = CsrGraph::default();
        assert_eq!(graph.num_vertices(), 0);
        assert_eq!(graph.num_arcs(), 0);
        assert_eq!(graph.csr_components().0, &[0]);
    }

    #[test]
    fn test_from_arcs_simple() {
        let arcs = vec![arc(0, 1, 1.0), arc(0, 2, 1.0), arc(1, 2, 1.0)];
        let graph = CsrGraph::from_arcs(3, &arcs).unwrap();

        assert_eq!(graph.num_vertices(), 3);
        assert_eq!(graph.num_arcs(), 3);

        assert_eq!(graph.row_offsets, vec![0, 2, 3, 3]);
        assert_eq!(graph.col_indices, vec![1, 2, 2]);
        assert_eq!(graph.arc_weights, vec![1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_isolated_trailing_vertices_keep_rows() {
        let graph = CsrGraph::from_arcs(5, &[arc(0, 1, 2.0)]).unwrap();
        assert_eq!(graph.num_vertices(), 5);
        let empty: &[u32] = &[];
        assert_eq!(graph.outgoing_neighbors(VertexId(4)).unwrap(), empty);
        assert_eq!(graph.incoming_neighbors(VertexId(4)).unwrap(), empty);
    }

    #[test]
    fn test_unsorted_input_is_bucketed() {
        let arcs = vec![arc(2, 0, 3.0), arc(0, 1, 1.0), arc(2, 1, 4.0), arc(0, 2, 2.0)];
        let graph = CsrGraph::from_arcs(3, &arcs).unwrap();

        assert_eq!(
            graph.adjacency(VertexId(0)).unwrap(),
            (&[1, 2][..], &[1.0, 2.0][..])
        );
        assert_eq!(
            graph.adjacency(VertexId(2)).unwrap(),
            (&[0, 1][..], &[3.0, 4.0][..])
        );
    }

    #[test]
    fn test_reverse_csr_structure() {
        let arcs = vec![arc(0, 1, 1.0), arc(0, 2, 2.0), arc(1, 2, 3.0)];
        let graph = CsrGraph::from_arcs(3, &arcs).unwrap();

        let empty: &[u32] = &[];
        assert_eq!(graph.incoming_neighbors(VertexId(0)).unwrap(), empty);
        assert_eq!(graph.incoming_neighbors(VertexId(1)).unwrap(), &[0]);
        assert_eq!(
            graph.reverse_adjacency(VertexId(2)).unwrap(),
            (&[0, 1][..], &[2.0, 3.0][..])
        );
    }

    #[test]
    fn test_parallel_arcs_kept() {
        let arcs = vec![arc(0, 1, 1.0), arc(0, 1, 2.0), arc(2, 1, 3.0)];
        let graph = CsrGraph::from_arcs(3, &arcs).unwrap();

        let incoming = graph.incoming_neighbors(VertexId(1)).unwrap();
        assert_eq!(incoming.len(), 3);
        assert_eq!(incoming.iter().filter(|&&x| x == 0).count(), 2);
    }

    #[test]
    fn test_out_of_range_endpoint() {
        let err = CsrGraph::from_arcs(2, &[arc(0, 2, 1.0)]).unwrap_err();
        assert_eq!(
            err,
            Error::VertexOutOfRange {
                vertex: 2,
                num_vertices: 2
            }
        );

        let graph = CsrGraph::with_vertices(2);
        assert!(graph.outgoing_neighbors(VertexId(2)).is_err());
    }

    #[test]
    fn test_csr_components() {
        let graph = CsrGraph::from_arcs(3, &[arc(0, 1, 1.0), arc(0, 2, 2.0)]).unwrap();
        let (row_offsets, col_indices, weights) = graph.csr_components();

        assert_eq!(row_offsets, &[0, 2, 2, 2]);
        assert_eq!(col_indices, &[1, 2]);
        assert_eq!(weights, &[1.0, 2.0]);
    }
}
