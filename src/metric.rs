//! Pairwise edge cost functions
//!
//! A metric turns the samples at the two endpoints of an edge into its
//! weight. It is evaluated exactly once per inserted edge and must be pure:
//! the same grid and coordinates always give the same weight.

use crate::error::{Error, Result};
use crate::grid::{Grid, Index};

/// Edge weight from two grid cells
pub trait PairwiseMetric<G, const D: usize>
where
    G: Grid<D> + ?Sized,
{
    /// Weight of the edge between cells `a` and `b`
    fn evaluate(&self, grid: &G, a: &Index<D>, b: &Index<D>) -> f32;
}

impl<G, M, const D: usize> PairwiseMetric<G, D> for &M
where
    G: Grid<D> + ?Sized,
    M: PairwiseMetric<G, D> + ?Sized,
{
    fn evaluate(&self, grid: &G, a: &Index<D>, b: &Index<D>) -> f32 {
        (**self).evaluate(grid, a, b)
    }
}

fn sample_difference<G, const D: usize>(grid: &G, a: &Index<D>, b: &Index<D>) -> f64
where
    G: Grid<D> + ?Sized,
    G::Sample: Into<f64>,
{
    grid.sample(a).into() - grid.sample(b).into()
}

/// `(a - b)²`, the default cost
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SquaredDifference;

impl<G, const D: usize> PairwiseMetric<G, D> for SquaredDifference
where
    G: Grid<D> + ?Sized,
    G::Sample: Into<f64>,
{
    #[allow(clippy::cast_possible_truncation)] // weights are stored as f32
    fn evaluate(&self, grid: &G, a: &Index<D>, b: &Index<D>) -> f32 {
        let d = sample_difference(grid, a, b);
        (d * d) as f32
    }
}

/// `|a - b|`, the gradient magnitude along the offset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AbsoluteDifference;

impl<G, const D: usize> PairwiseMetric<G, D> for AbsoluteDifference
where
    G: Grid<D> + ?Sized,
    G::Sample: Into<f64>,
{
    #[allow(clippy::cast_possible_truncation)]
    fn evaluate(&self, grid: &G, a: &Index<D>, b: &Index<D>) -> f32 {
        sample_difference(grid, a, b).abs() as f32
    }
}

/// `exp(-(a - b)² / 2σ²)`
///
/// High for similar samples, near zero across strong edges: the boundary
/// term of graph-cut segmentation, where cutting between dissimilar cells
/// must be cheap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaussianSimilarity {
    sigma: f64,
}

impl GaussianSimilarity {
    /// Create with bandwidth `sigma`
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] unless `sigma` is finite and
    /// positive.
    pub fn new(sigma: f64) -> Result<Self> {
        if !(sigma.is_finite() && sigma > 0.0) {
            return Err(Error::InvalidParameter {
                name: "sigma",
                reason: format!("must be finite and positive, got {sigma}"),
            });
        }
        Ok(Self { sigma })
    }

    /// Bandwidth
    #[must_use]
    pub const fn sigma(&self) -> f64 {
        self.sigma
    }
}

impl<G, const D: usize> PairwiseMetric<G, D> for GaussianSimilarity
where
    G: Grid<D> + ?Sized,
    G::Sample: Into<f64>,
{
    #[allow(clippy::cast_possible_truncation)]
    fn evaluate(&self, grid: &G, a: &Index<D>, b: &Index<D>) -> f32 {
        let d = sample_difference(grid, a, b);
        (-(d * d) / (2.0 * self.sigma * self.sigma)).exp() as f32
    }
}

/// Adapt a closure over the two samples into a metric
///
/// ```
/// use grid_graph::{DenseGrid, PairwiseMetric, SampleFn};
///
/// let grid = DenseGrid::from_vec([2], vec![3_u8, 10]).unwrap();
/// let max = SampleFn(|a: u8, b: u8| f32::from(a.max(b)));
/// assert_eq!(max.evaluate(&grid, &[0], &[1]), 10.0);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SampleFn<F>(pub F);

impl<G, F, const D: usize> PairwiseMetric<G, D> for SampleFn<F>
where
    G: Grid<D> + ?Sized,
    F: Fn(G::Sample, G::Sample) -> f32,
{
    fn evaluate(&self, grid: &G, a: &Index<D>, b: &Index<D>) -> f32 {
        (self.0)(grid.sample(a), grid.sample(b))
    }
}
