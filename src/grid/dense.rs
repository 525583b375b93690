//! In-memory grids: owned [`DenseGrid`] and borrowed [`GridView`]
//!
//! Both store samples contiguously in the same linear order as vertex ids,
//! axis 0 fastest.

use super::{Grid, Index};
use crate::error::{Error, Result};

/// Contiguous strides for `shape` plus its cell count
fn dense_layout<const D: usize>(shape: [usize; D]) -> Result<([usize; D], usize)> {
    let mut strides = [0_usize; D];
    let mut running = 1_usize;
    for (stride, &extent) in strides.iter_mut().zip(&shape) {
        *stride = running;
        running = running
            .checked_mul(extent)
            .ok_or_else(|| Error::overflow(format!("cell count of shape {shape:?}")))?;
    }
    Ok((strides, running))
}

fn linear_index<const D: usize>(
    shape: &[usize; D],
    strides: &[usize; D],
    index: &Index<D>,
) -> Option<usize> {
    let mut linear = 0_usize;
    for ((&i, &extent), &stride) in index.iter().zip(shape).zip(strides) {
        let i = usize::try_from(i).ok().filter(|&i| i < extent)?;
        linear += i * stride;
    }
    Some(linear)
}

/// Owned n-dimensional grid
///
/// # Example
///
/// ```
/// use grid_graph::{DenseGrid, Grid};
///
/// let grid = DenseGrid::from_vec([3, 2], vec![1_u8, 2, 3, 4, 5, 6]).unwrap();
/// assert_eq!(grid.sample(&[2, 1]), 6);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DenseGrid<T, const D: usize> {
    shape: [usize; D],
    strides: [usize; D],
    data: Vec<T>,
}

impl<T, const D: usize> DenseGrid<T, D> {
    /// Wrap `data` laid out in linear order
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShapeMismatch`] if `data.len()` differs from the cell
    /// count, [`Error::Overflow`] if the cell count overflows `usize`.
    pub fn from_vec(shape: [usize; D], data: Vec<T>) -> Result<Self> {
        let (strides, expected) = dense_layout(shape)?;
        if data.len() != expected {
            return Err(Error::ShapeMismatch {
                shape: shape.to_vec(),
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            shape,
            strides,
            data,
        })
    }

    /// Fill every cell from its coordinate
    ///
    /// # Errors
    ///
    /// Returns [`Error::Overflow`] if the cell count overflows `usize`.
    pub fn from_fn<F>(shape: [usize; D], mut f: F) -> Result<Self>
    where
        F: FnMut(Index<D>) -> T,
    {
        let (strides, len) = dense_layout(shape)?;
        let mut data = Vec::with_capacity(len);
        let mut index = [0_i64; D];
        for _ in 0..len {
            data.push(f(index));
            for (i, &extent) in index.iter_mut().zip(&shape) {
                *i += 1;
                if usize::try_from(*i).is_ok_and(|i| i < extent) {
                    break;
                }
                *i = 0;
            }
        }
        Ok(Self {
            shape,
            strides,
            data,
        })
    }

    /// Samples in linear order
    #[must_use]
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Sample at `index`, `None` if out of bounds
    #[must_use]
    pub fn get(&self, index: &Index<D>) -> Option<&T> {
        linear_index(&self.shape, &self.strides, index).map(|i| &self.data[i])
    }

    /// Mutable sample at `index`, `None` if out of bounds
    pub fn get_mut(&mut self, index: &Index<D>) -> Option<&mut T> {
        let i = linear_index(&self.shape, &self.strides, index)?;
        Some(&mut self.data[i])
    }

    /// Borrow as a [`GridView`]
    #[must_use]
    pub fn as_view(&self) -> GridView<'_, T, D> {
        GridView {
            shape: self.shape,
            strides: self.strides,
            data: &self.data,
        }
    }
}

impl<T: Clone, const D: usize> DenseGrid<T, D> {
    /// Grid with every cell set to `value`
    ///
    /// # Errors
    ///
    /// Returns [`Error::Overflow`] if the cell count overflows `usize`.
    pub fn new_fill(shape: [usize; D], value: T) -> Result<Self> {
        let (strides, len) = dense_layout(shape)?;
        Ok(Self {
            shape,
            strides,
            data: vec![value; len],
        })
    }
}

impl<T: Copy, const D: usize> Grid<D> for DenseGrid<T, D> {
    type Sample = T;

    fn shape(&self) -> [usize; D] {
        self.shape
    }

    fn sample(&self, index: &Index<D>) -> T {
        match linear_index(&self.shape, &self.strides, index) {
            Some(i) => self.data[i],
            None => panic!("index {index:?} outside grid of shape {:?}", self.shape),
        }
    }
}

/// Borrowed grid over a caller-owned sample slice
#[derive(Debug, Clone, Copy)]
pub struct GridView<'a, T, const D: usize> {
    shape: [usize; D],
    strides: [usize; D],
    data: &'a [T],
}

impl<'a, T, const D: usize> GridView<'a, T, D> {
    /// View `data` laid out in linear order
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShapeMismatch`] if `data.len()` differs from the cell
    /// count, [`Error::Overflow`] if the cell count overflows `usize`.
    pub fn from_slice(shape: [usize; D], data: &'a [T]) -> Result<Self> {
        let (strides, expected) = dense_layout(shape)?;
        if data.len() != expected {
            return Err(Error::ShapeMismatch {
                shape: shape.to_vec(),
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            shape,
            strides,
            data,
        })
    }

    /// Samples in linear order
    #[must_use]
    pub fn data(&self) -> &'a [T] {
        self.data
    }
}

impl<T: Copy, const D: usize> Grid<D> for GridView<'_, T, D> {
    type Sample = T;

    fn shape(&self) -> [usize; D] {
        self.shape
    }

    fn sample(&self, index: &Index<D>) -> T {
        match linear_index(&self.shape, &self.strides, index) {
            Some(i) => self.data[i],
            None => panic!("index {index:?} outside grid of shape {:?}", self.shape),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn test_from_vec_layout() {
        let grid = DenseGrid::from_vec([3, 3], (1..=9).collect::<Vec<i32>>()).unwrap();
        assert_eq!(grid.sample(&[0, 0]), 1);
        assert_eq!(grid.sample(&[1, 0]), 2);
        assert_eq!(grid.sample(&[0, 1]), 4);
        assert_eq!(grid.sample(&[2, 2]), 9);
    }

    #[test]
    fn test_from_vec_size_mismatch() {
        let err = DenseGrid::from_vec([2, 2], vec![0_u8; 3]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert!(matches!(
            err,
            Error::ShapeMismatch {
                expected: 4,
                actual: 3,
                ..
            }
        ));
    }

    #[test]
    fn test_from_fn_matches_coordinates() {
        let grid = DenseGrid::from_fn([4, 3, 2], |[x, y, z]| x + 10 * y + 100 * z).unwrap();
        assert_eq!(grid.data().len(), 24);
        assert_eq!(grid.sample(&[3, 2, 1]), 123);
        assert_eq!(grid.sample(&[1, 0, 0]), 1);
    }

    #[test]
    fn test_get_out_of_bounds() {
        let mut grid = DenseGrid::new_fill([2, 2], 0.5_f32).unwrap();
        assert_eq!(grid.get(&[2, 0]), None);
        assert_eq!(grid.get(&[0, -1]), None);
        *grid.get_mut(&[1, 1]).unwrap() = 2.0;
        assert_eq!(grid.sample(&[1, 1]), 2.0);
    }

    #[test]
    fn test_view_shares_layout() {
        let samples = [10_u16, 20, 30, 40, 50, 60];
        let view = GridView::from_slice([2, 3], &samples).unwrap();
        assert_eq!(view.sample(&[1, 2]), 60);
        assert!(view.in_bounds(&[1, 2]));
        assert!(!view.in_bounds(&[2, 0]));

        let owned = DenseGrid::from_vec([2, 3], samples.to_vec()).unwrap();
        assert_eq!(owned.as_view().sample(&[0, 1]), 30);
    }
}
