//! Grid provider abstraction
//!
//! A grid is any read-only n-dimensional sample array with a per-axis shape.
//! The builder only needs three things from it: the shape, a bounds test and
//! a sample accessor. Loading grids from storage is left to the caller;
//! [`DenseGrid`] and [`GridView`] cover the in-memory case.
//!
//! Coordinates are `[i64; D]`. Axis 0 varies fastest in the linear layout
//! (x within a row, then y, then z), which is also the vertex numbering used
//! by [`GridCodec`].

pub mod codec;
pub mod dense;

pub use codec::GridCodec;
pub use dense::{DenseGrid, GridView};

/// Absolute cell coordinate
pub type Index<const D: usize> = [i64; D];

/// Relative displacement between two cells
pub type Offset<const D: usize> = [i64; D];

/// Read-only n-dimensional sample grid
pub trait Grid<const D: usize> {
    /// Sample stored per cell
    type Sample: Copy;

    /// Per-axis extent, axis 0 first
    fn shape(&self) -> [usize; D];

    /// Sample at `index`
    ///
    /// # Panics
    ///
    /// Implementations may panic when `index` is out of bounds; callers check
    /// [`Grid::in_bounds`] first.
    fn sample(&self, index: &Index<D>) -> Self::Sample;

    /// Whether `index` lies inside the grid's shape
    fn in_bounds(&self, index: &Index<D>) -> bool {
        index
            .iter()
            .zip(self.shape())
            .all(|(&i, extent)| usize::try_from(i).is_ok_and(|i| i < extent))
    }

    /// Total number of cells, `None` if the product overflows `usize`
    fn num_cells(&self) -> Option<usize> {
        self.shape()
            .iter()
            .try_fold(1_usize, |acc, &extent| acc.checked_mul(extent))
    }
}

impl<G, const D: usize> Grid<D> for &G
where
    G: Grid<D> + ?Sized,
{
    type Sample = G::Sample;

    fn shape(&self) -> [usize; D] {
        (**self).shape()
    }

    fn sample(&self, index: &Index<D>) -> Self::Sample {
        (**self).sample(index)
    }

    fn in_bounds(&self, index: &Index<D>) -> bool {
        (**self).in_bounds(index)
    }
}

/// `center + offset`, `None` when any axis overflows `i64`
#[must_use]
pub fn displace<const D: usize>(center: &Index<D>, offset: &Offset<D>) -> Option<Index<D>> {
    let mut out = *center;
    for (c, o) in out.iter_mut().zip(offset) {
        *c = c.checked_add(*o)?;
    }
    Some(out)
}
