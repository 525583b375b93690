//! Coordinate ↔ vertex id codec
//!
//! Vertex ids are the row-major linear offset of a cell, axis 0 fastest:
//!
//! ```text
//! shape [3, 2]        strides [1, 3]
//!
//!   y=0:  0  1  2     id = x * 1 + y * 3
//!   y=1:  3  4  5
//! ```
//!
//! Ids are `u32` (see [`VertexId`]), so a grid with more than `u32::MAX`
//! cells cannot be encoded and [`GridCodec::new`] rejects it with a range
//! error.

use super::{Index, Offset};
use crate::error::{Error, Result};
use crate::storage::VertexId;

/// Largest cell count whose ids fit in `u32`
const MAX_CELLS: u64 = u32::MAX as u64;

/// Bijection between in-bounds coordinates and `[0, num_cells)`
///
/// # Example
///
/// ```
/// use grid_graph::{GridCodec, VertexId};
///
/// let codec = GridCodec::new([3, 3]).unwrap();
/// assert_eq!(codec.to_vertex(&[1, 2]), Some(VertexId(7)));
/// assert_eq!(codec.to_coordinate(VertexId(7)), [1, 2]);
/// assert_eq!(codec.to_vertex(&[3, 0]), None); // outside, not an error
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridCodec<const D: usize> {
    shape: [usize; D],
    extents: [i64; D],
    strides: [i64; D],
    num_cells: usize,
}

impl<const D: usize> GridCodec<D> {
    /// Create a codec for `shape`
    ///
    /// # Errors
    ///
    /// Returns [`Error::Overflow`] if an extent does not fit `i64` or the
    /// cell count exceeds the `u32` vertex id range.
    pub fn new(shape: [usize; D]) -> Result<Self> {
        let mut extents = [0_i64; D];
        let mut strides = [0_i64; D];
        let mut running = 1_u64;

        for axis in 0..D {
            extents[axis] = i64::try_from(shape[axis]).map_err(|_| {
                Error::overflow(format!("axis {axis} extent {} exceeds i64", shape[axis]))
            })?;
            strides[axis] = i64::try_from(running)
                .map_err(|_| Error::overflow(format!("stride of axis {axis} exceeds i64")))?;
            running = running
                .checked_mul(shape[axis] as u64)
                .ok_or_else(|| Error::overflow(format!("cell count of shape {shape:?}")))?;
        }

        if running > MAX_CELLS {
            return Err(Error::overflow(format!(
                "shape {shape:?} has {running} cells, vertex ids are limited to {MAX_CELLS}"
            )));
        }

        #[allow(clippy::cast_possible_truncation)] // bounded by MAX_CELLS
        let num_cells = running as usize;

        Ok(Self {
            shape,
            extents,
            strides,
            num_cells,
        })
    }

    /// Vertex id of `index`, `None` if `index` lies outside the shape
    #[must_use]
    pub fn to_vertex(&self, index: &Index<D>) -> Option<VertexId> {
        if !self.contains(index) {
            return None;
        }
        let linear: i64 = index
            .iter()
            .zip(&self.strides)
            .map(|(i, stride)| i * stride)
            .sum();
        u32::try_from(linear).ok().map(VertexId)
    }

    /// Coordinate of `vertex`
    ///
    /// `vertex` must be below [`GridCodec::num_cells`]; this is checked only
    /// in debug builds.
    #[must_use]
    pub fn to_coordinate(&self, vertex: VertexId) -> Index<D> {
        debug_assert!(
            (vertex.0 as usize) < self.num_cells,
            "vertex {} outside [0, {})",
            vertex.0,
            self.num_cells
        );

        let mut rest = i64::from(vertex.0);
        let mut index = [0_i64; D];
        for axis in (0..D).rev() {
            let stride = self.strides[axis];
            if stride > 0 {
                index[axis] = rest / stride;
                rest %= stride;
            }
        }
        index
    }

    /// Whether `index` lies inside the shape
    #[must_use]
    pub fn contains(&self, index: &Index<D>) -> bool {
        index
            .iter()
            .zip(&self.extents)
            .all(|(&i, &extent)| (0..extent).contains(&i))
    }

    /// Vertex id displacement produced by `offset`
    ///
    /// Valid for any cell whose displaced neighbor is in bounds:
    /// `to_vertex(c + offset) == to_vertex(c) + linear_delta(offset)`.
    /// `None` on overflow.
    #[must_use]
    pub fn linear_delta(&self, offset: &Offset<D>) -> Option<i64> {
        offset
            .iter()
            .zip(&self.strides)
            .try_fold(0_i64, |acc, (o, stride)| acc.checked_add(o.checked_mul(*stride)?))
    }

    /// Per-axis extent
    #[must_use]
    pub const fn shape(&self) -> [usize; D] {
        self.shape
    }

    /// Per-axis extent as signed coordinates
    #[must_use]
    pub const fn extents(&self) -> &[i64; D] {
        &self.extents
    }

    /// Linear stride of each axis
    #[must_use]
    pub const fn strides(&self) -> &[i64; D] {
        &self.strides
    }

    /// Number of cells (and vertices)
    #[must_use]
    pub const fn num_cells(&self) -> usize {
        self.num_cells
    }
}

/// Step `index` to the next cell in linear order, axis 0 fastest
///
/// Wraps to all zeros after the last cell.
pub(crate) fn advance<const D: usize>(index: &mut Index<D>, extents: &[i64; D]) {
    for (i, &extent) in index.iter_mut().zip(extents) {
        *i += 1;
        if *i < extent {
            return;
        }
        *i = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn test_strides_axis0_fastest() {
        let codec = GridCodec::new([4, 3, 2]).unwrap();
        assert_eq!(codec.strides(), &[1, 4, 12]);
        assert_eq!(codec.num_cells(), 24);
    }

    #[test]
    fn test_to_vertex_row_major() {
        let codec = GridCodec::new([3, 3]).unwrap();
        assert_eq!(codec.to_vertex(&[0, 0]), Some(VertexId(0)));
        assert_eq!(codec.to_vertex(&[1, 0]), Some(VertexId(1)));
        assert_eq!(codec.to_vertex(&[0, 1]), Some(VertexId(3)));
        assert_eq!(codec.to_vertex(&[2, 2]), Some(VertexId(8)));
    }

    #[test]
    fn test_out_of_bounds_is_none() {
        let codec = GridCodec::new([3, 3]).unwrap();
        assert_eq!(codec.to_vertex(&[-1, 0]), None);
        assert_eq!(codec.to_vertex(&[0, 3]), None);
        assert_eq!(codec.to_vertex(&[3, 3]), None);
    }

    #[test]
    fn test_round_trip_3d() {
        let codec = GridCodec::new([5, 4, 3]).unwrap();
        for z in 0..3 {
            for y in 0..4 {
                for x in 0..5 {
                    let v = codec.to_vertex(&[x, y, z]).unwrap();
                    assert_eq!(codec.to_coordinate(v), [x, y, z]);
                }
            }
        }
    }

    #[test]
    fn test_linear_delta() {
        let codec = GridCodec::new([10, 7]).unwrap();
        assert_eq!(codec.linear_delta(&[1, 0]), Some(1));
        assert_eq!(codec.linear_delta(&[0, -1]), Some(-10));
        assert_eq!(codec.linear_delta(&[-2, 3]), Some(28));
        assert_eq!(codec.linear_delta(&[i64::MAX, 1]), None);
    }

    #[test]
    fn test_too_many_cells_is_range_error() {
        let err = GridCodec::new([100_000, 100_000]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Range);
    }

    #[test]
    fn test_empty_shape_has_no_cells() {
        let codec = GridCodec::new([0, 5]).unwrap();
        assert_eq!(codec.num_cells(), 0);
        assert_eq!(codec.to_vertex(&[0, 0]), None);
    }

    #[test]
    fn test_advance_visits_linear_order() {
        let codec = GridCodec::new([3, 2]).unwrap();
        let mut index = [0, 0];
        for v in 0..6 {
            assert_eq!(codec.to_vertex(&index), Some(VertexId(v)));
            advance(&mut index, codec.extents());
        }
        assert_eq!(index, [0, 0]);
    }
}
