//! Grid → graph construction
//!
//! The build visits every cell once in linear order and tries each
//! registered offset from it:
//!
//! ```text
//! for u in 0..num_cells:
//!     c = coordinate(u)
//!     for o in offsets:
//!         n = c + o                      (skip if outside the grid)
//!         v = vertex(n)
//!         undirected: insert {u, v} unless already present
//!         directed:   insert u -> v
//!         weight = metric(grid, c, n)    (once, at insertion)
//! ```
//!
//! The neighborhood radius splits the grid into an interior, where every
//! offset lands in bounds and `v = u + linear_delta(o)`, and a border band
//! that takes the full bounds test. Per-cell work is proportional to the
//! number of offsets, never to the volume of the radius window.

use crate::error::{Error, Result};
use crate::graph::{Directedness, Edge, GridGraph};
use crate::grid::codec::advance;
use crate::grid::{displace, Grid, GridCodec, Index, Offset};
use crate::metric::{PairwiseMetric, SquaredDifference};
use crate::neighborhood::Neighborhood;
use crate::storage::VertexId;
use std::collections::HashSet;
use std::ops::Range;
use tracing::{debug, trace};

/// Cells per rayon task in [`build_graph_par`]
pub const DEFAULT_CHUNK_SIZE: usize = 4096;

/// Build options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildConfig {
    /// Edge orientation policy
    pub directedness: Directedness,
    /// Decode every computed vertex id back and compare with its coordinate
    pub verify_vertex_mapping: bool,
    /// Cells per task in parallel builds
    pub chunk_size: usize,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            directedness: Directedness::Undirected,
            verify_vertex_mapping: cfg!(debug_assertions),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl BuildConfig {
    /// Undirected defaults
    #[must_use]
    pub fn undirected() -> Self {
        Self::default()
    }

    /// Directed defaults
    #[must_use]
    pub fn directed() -> Self {
        Self::default().with_directedness(Directedness::Directed)
    }

    /// Set the directedness policy
    #[must_use]
    pub const fn with_directedness(mut self, directedness: Directedness) -> Self {
        self.directedness = directedness;
        self
    }

    /// Enable or disable vertex round-trip verification
    #[must_use]
    pub const fn with_verify_vertex_mapping(mut self, verify: bool) -> Self {
        self.verify_vertex_mapping = verify;
        self
    }

    /// Set the parallel chunk size
    #[must_use]
    pub const fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Check option values
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if `chunk_size` is zero.
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(Error::InvalidParameter {
                name: "chunk_size",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

fn unordered(u: u32, v: u32) -> (u32, u32) {
    if u <= v {
        (u, v)
    } else {
        (v, u)
    }
}

/// Offsets resolved against one grid shape
struct ScanPlan<const D: usize> {
    codec: GridCodec<D>,
    offsets: Vec<Offset<D>>,
    /// Vertex id displacement per offset, `None` when the grid has no interior
    deltas: Option<Vec<i64>>,
    interior_lo: [i64; D],
    interior_hi: [i64; D],
    verify: bool,
}

impl<const D: usize> ScanPlan<D> {
    fn new(shape: [usize; D], neighborhood: &Neighborhood<D>, verify: bool) -> Result<Self> {
        let codec = GridCodec::new(shape)?;
        let radius = neighborhood.radius();
        let extents = codec.extents();

        let mut interior_lo = [0_i64; D];
        let mut interior_hi = [0_i64; D];
        let mut has_interior = codec.num_cells() > 0;
        for axis in 0..D {
            let r = i64::try_from(radius[axis]).unwrap_or(i64::MAX);
            interior_lo[axis] = r;
            interior_hi[axis] = extents[axis].saturating_sub(r);
            if interior_lo[axis] >= interior_hi[axis] {
                has_interior = false;
            }
        }

        let deltas = if has_interior {
            let deltas = neighborhood
                .offsets()
                .iter()
                .map(|offset| {
                    codec.linear_delta(offset).ok_or_else(|| {
                        Error::overflow(format!("linear displacement of offset {offset:?}"))
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            Some(deltas)
        } else {
            None
        };

        trace!(
            "scan plan: radius {:?}, interior {:?}..{:?}, interior fast path {}",
            radius,
            interior_lo,
            interior_hi,
            deltas.is_some()
        );

        Ok(Self {
            codec,
            offsets: neighborhood.offsets().to_vec(),
            deltas,
            interior_lo,
            interior_hi,
            verify,
        })
    }

    fn num_vertices(&self) -> Result<u32> {
        u32::try_from(self.codec.num_cells())
            .map_err(|_| Error::overflow("cell count exceeds u32 vertex ids"))
    }

    fn is_interior(&self, cell: &Index<D>) -> bool {
        cell.iter()
            .zip(&self.interior_lo)
            .zip(&self.interior_hi)
            .all(|((c, lo), hi)| (*lo..*hi).contains(c))
    }

    fn check_mapping(&self, vertex: u32, index: &Index<D>) -> Result<()> {
        if !self.verify {
            return Ok(());
        }
        let decoded = self.codec.to_coordinate(VertexId(vertex));
        if decoded == *index {
            Ok(())
        } else {
            Err(Error::VertexMismatch {
                vertex,
                expected: index.to_vec(),
                actual: decoded.to_vec(),
            })
        }
    }

    /// Call `emit(v, neighbor)` for every in-bounds neighbor of cell `u`
    fn visit<F>(&self, u: u32, cell: &Index<D>, mut emit: F) -> Result<()>
    where
        F: FnMut(u32, &Index<D>) -> Result<()>,
    {
        self.check_mapping(u, cell)?;

        match &self.deltas {
            Some(deltas) if self.is_interior(cell) => {
                for (offset, &delta) in self.offsets.iter().zip(deltas) {
                    let mut neighbor = *cell;
                    for (n, o) in neighbor.iter_mut().zip(offset) {
                        *n += o;
                    }
                    let v = u32::try_from(i64::from(u) + delta).map_err(|_| {
                        Error::overflow(format!("vertex {u} displaced by {delta}"))
                    })?;
                    self.check_mapping(v, &neighbor)?;
                    emit(v, &neighbor)?;
                }
            }
            _ => {
                for offset in &self.offsets {
                    let neighbor = displace(cell, offset).ok_or_else(|| {
                        Error::overflow(format!("coordinate {cell:?} displaced by {offset:?}"))
                    })?;
                    if neighbor == *cell {
                        continue;
                    }
                    let Some(v) = self.codec.to_vertex(&neighbor) else {
                        continue;
                    };
                    self.check_mapping(v.0, &neighbor)?;
                    emit(v.0, &neighbor)?;
                }
            }
        }
        Ok(())
    }

    /// Visit the cells with vertex ids in `range`, in order
    fn scan<F>(&self, range: Range<u32>, mut emit: F) -> Result<()>
    where
        F: FnMut(u32, &Index<D>, u32, &Index<D>) -> Result<()>,
    {
        if range.is_empty() {
            return Ok(());
        }
        let mut cell = self.codec.to_coordinate(VertexId(range.start));
        for u in range {
            self.visit(u, &cell, |v, neighbor| emit(u, &cell, v, neighbor))?;
            advance(&mut cell, self.codec.extents());
        }
        Ok(())
    }
}

fn log_start<G, const D: usize>(grid: &G, neighborhood: &Neighborhood<D>, config: &BuildConfig)
where
    G: Grid<D> + ?Sized,
{
    debug!(
        "building {:?} graph over shape {:?} with {} offsets ({:?}, radius {:?})",
        config.directedness,
        grid.shape(),
        neighborhood.len(),
        neighborhood.policy(),
        neighborhood.radius()
    );
    if config.directedness == Directedness::Directed && !neighborhood.is_symmetric() {
        debug!("neighborhood is not symmetric: some arcs will have no reverse arc");
    }
}

/// Build the graph of `grid` under `neighborhood`
///
/// The grid is only borrowed for the duration of the call. Either a complete
/// graph is returned or an error; no partial graph is observable.
///
/// # Errors
///
/// - [`Error::InvalidParameter`] for an invalid `config`
/// - [`Error::Overflow`] if the grid has more cells than `u32` vertex ids or
///   a coordinate plus offset overflows `i64`
/// - [`Error::VertexMismatch`] if verification is on and a vertex id fails
///   to decode back to its coordinate
///
/// # Example
///
/// ```
/// use grid_graph::{build_graph, BuildConfig, DenseGrid, Neighborhood, OffsetPolicy,
///                  SquaredDifference, VertexId};
///
/// let grid = DenseGrid::from_vec([3, 3], (1..=9).collect::<Vec<u8>>()).unwrap();
/// let hood = Neighborhood::von_neumann(OffsetPolicy::Ordered);
///
/// let graph = build_graph(&grid, &hood, &SquaredDifference, &BuildConfig::undirected()).unwrap();
/// assert_eq!(graph.num_vertices(), 9);
/// assert_eq!(graph.num_edges(), 12);
/// assert_eq!(graph.edge_weight(VertexId(0), VertexId(3)), Some(9.0));
/// ```
pub fn build_graph<G, M, const D: usize>(
    grid: &G,
    neighborhood: &Neighborhood<D>,
    metric: &M,
    config: &BuildConfig,
) -> Result<GridGraph<D>>
where
    G: Grid<D> + ?Sized,
    M: PairwiseMetric<G, D> + ?Sized,
{
    config.validate()?;
    log_start(grid, neighborhood, config);

    let plan = ScanPlan::new(grid.shape(), neighborhood, config.verify_vertex_mapping)?;
    let num_vertices = plan.num_vertices()?;

    let mut edges = Vec::new();
    match config.directedness {
        Directedness::Directed => {
            plan.scan(0..num_vertices, |u, cell, v, neighbor| {
                edges.push(Edge {
                    source: VertexId(u),
                    target: VertexId(v),
                    weight: metric.evaluate(grid, cell, neighbor),
                });
                Ok(())
            })?;
        }
        Directedness::Undirected => {
            let mut present = HashSet::new();
            plan.scan(0..num_vertices, |u, cell, v, neighbor| {
                if present.insert(unordered(u, v)) {
                    edges.push(Edge {
                        source: VertexId(u),
                        target: VertexId(v),
                        weight: metric.evaluate(grid, cell, neighbor),
                    });
                }
                Ok(())
            })?;
        }
    }

    let graph = GridGraph::from_edges(plan.codec, config.directedness, edges)?;
    debug!(
        "built graph: {} vertices, {} edges",
        graph.num_vertices(),
        graph.num_edges()
    );
    Ok(graph)
}

/// Parallel [`build_graph`]: contiguous cell chunks on the rayon pool
///
/// The result is identical to the sequential build, edge order included.
/// Directed chunks compute weights inline. Undirected chunks emit candidate
/// pairs only; a sequential merge keeps the first occurrence of every
/// unordered pair, then each kept edge is weighted once.
///
/// # Errors
///
/// Same as [`build_graph`].
#[cfg(feature = "parallel")]
pub fn build_graph_par<G, M, const D: usize>(
    grid: &G,
    neighborhood: &Neighborhood<D>,
    metric: &M,
    config: &BuildConfig,
) -> Result<GridGraph<D>>
where
    G: Grid<D> + Sync + ?Sized,
    M: PairwiseMetric<G, D> + Sync + ?Sized,
{
    use rayon::prelude::*;

    config.validate()?;
    log_start(grid, neighborhood, config);

    let plan = ScanPlan::new(grid.shape(), neighborhood, config.verify_vertex_mapping)?;
    let num_vertices = plan.num_vertices()?;
    let chunk = u32::try_from(config.chunk_size).unwrap_or(u32::MAX);
    let chunks: Vec<Range<u32>> = (0..num_vertices.div_ceil(chunk))
        .map(|k| {
            let start = k * chunk;
            start..start.saturating_add(chunk).min(num_vertices)
        })
        .collect();
    debug!("parallel build over {} chunks of {} cells", chunks.len(), chunk);

    let edges: Vec<Edge> = match config.directedness {
        Directedness::Directed => {
            let parts = chunks
                .into_par_iter()
                .map(|range| -> Result<Vec<Edge>> {
                    let mut local = Vec::new();
                    plan.scan(range, |u, cell, v, neighbor| {
                        local.push(Edge {
                            source: VertexId(u),
                            target: VertexId(v),
                            weight: metric.evaluate(grid, cell, neighbor),
                        });
                        Ok(())
                    })?;
                    Ok(local)
                })
                .collect::<Result<Vec<_>>>()?;
            parts.concat()
        }
        Directedness::Undirected => {
            let parts = chunks
                .into_par_iter()
                .map(|range| -> Result<Vec<(u32, u32)>> {
                    let mut local = Vec::new();
                    plan.scan(range, |u, _, v, _| {
                        local.push((u, v));
                        Ok(())
                    })?;
                    Ok(local)
                })
                .collect::<Result<Vec<_>>>()?;

            let mut present = HashSet::new();
            let kept: Vec<(u32, u32)> = parts
                .into_iter()
                .flatten()
                .filter(|&(u, v)| present.insert(unordered(u, v)))
                .collect();

            kept.into_par_iter()
                .map(|(u, v)| {
                    let cell = plan.codec.to_coordinate(VertexId(u));
                    let neighbor = plan.codec.to_coordinate(VertexId(v));
                    Edge {
                        source: VertexId(u),
                        target: VertexId(v),
                        weight: metric.evaluate(grid, &cell, &neighbor),
                    }
                })
                .collect()
        }
    };

    let graph = GridGraph::from_edges(plan.codec, config.directedness, edges)?;
    debug!(
        "built graph: {} vertices, {} edges",
        graph.num_vertices(),
        graph.num_edges()
    );
    Ok(graph)
}

/// Stateful adaptor: configure once, build, then query
///
/// Holds a borrowed grid, the neighborhood, the metric and the build
/// options. Every [`GraphBuilder::build`] replaces the previously built graph;
/// a rebuild never appends to it.
///
/// # Example
///
/// ```
/// use grid_graph::{DenseGrid, GraphBuilder, VertexId};
///
/// let grid = DenseGrid::from_vec([4, 2], vec![0_u8, 1, 2, 3, 4, 5, 6, 7]).unwrap();
///
/// let mut builder = GraphBuilder::new();
/// builder.set_input(&grid);
/// builder.add_offset([-1, 0]).unwrap();
/// builder.add_offset([1, 0]).unwrap();
///
/// let graph = builder.build().unwrap();
/// assert_eq!(graph.num_edges(), 6);
/// assert_eq!(graph.degree(VertexId(0)).unwrap(), 1);
/// assert_eq!(graph.degree(VertexId(5)).unwrap(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct GraphBuilder<'g, G: ?Sized, M, const D: usize> {
    grid: Option<&'g G>,
    neighborhood: Neighborhood<D>,
    metric: M,
    config: BuildConfig,
    graph: Option<GridGraph<D>>,
}

impl<'g, G, const D: usize> GraphBuilder<'g, G, SquaredDifference, D>
where
    G: Grid<D> + ?Sized,
{
    /// Builder with the squared-difference metric, an empty ordered
    /// neighborhood and default options
    #[must_use]
    pub fn new() -> Self {
        Self {
            grid: None,
            neighborhood: Neighborhood::ordered(),
            metric: SquaredDifference,
            config: BuildConfig::default(),
            graph: None,
        }
    }
}

impl<'g, G, const D: usize> Default for GraphBuilder<'g, G, SquaredDifference, D>
where
    G: Grid<D> + ?Sized,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<'g, G, M, const D: usize> GraphBuilder<'g, G, M, D>
where
    G: Grid<D> + ?Sized,
    M: PairwiseMetric<G, D>,
{
    /// Replace the metric; drops any built graph
    #[must_use]
    pub fn with_metric<N>(self, metric: N) -> GraphBuilder<'g, G, N, D>
    where
        N: PairwiseMetric<G, D>,
    {
        GraphBuilder {
            grid: self.grid,
            neighborhood: self.neighborhood,
            metric,
            config: self.config,
            graph: None,
        }
    }

    /// Replace the build options
    #[must_use]
    pub fn with_config(mut self, config: BuildConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the input grid
    pub fn set_input(&mut self, grid: &'g G) {
        self.grid = Some(grid);
    }

    /// Input grid, if set
    #[must_use]
    pub fn input(&self) -> Option<&'g G> {
        self.grid
    }

    /// Replace the neighborhood
    pub fn set_neighborhood(&mut self, neighborhood: Neighborhood<D>) {
        self.neighborhood = neighborhood;
    }

    /// Register one more offset
    ///
    /// # Errors
    ///
    /// Returns [`Error::ZeroOffset`] for the all-zero offset.
    pub fn add_offset(&mut self, offset: Offset<D>) -> Result<bool> {
        self.neighborhood.add(offset)
    }

    /// Current neighborhood
    #[must_use]
    pub fn neighborhood(&self) -> &Neighborhood<D> {
        &self.neighborhood
    }

    /// Set the directedness policy
    pub fn set_directedness(&mut self, directedness: Directedness) {
        self.config.directedness = directedness;
    }

    /// Build options
    #[must_use]
    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Mutable build options
    pub fn config_mut(&mut self) -> &mut BuildConfig {
        &mut self.config
    }

    /// Metric
    #[must_use]
    pub fn metric(&self) -> &M {
        &self.metric
    }

    /// Codec of the input grid
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingGrid`] without an input, [`Error::Overflow`]
    /// if the grid is too large for `u32` vertex ids.
    pub fn codec(&self) -> Result<GridCodec<D>> {
        let grid = self.grid.ok_or(Error::MissingGrid)?;
        GridCodec::new(grid.shape())
    }

    /// Build a fresh graph, replacing any previous one
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingGrid`] if no input is set, otherwise the
    /// errors of [`build_graph`]. On error no graph is held afterwards.
    pub fn build(&mut self) -> Result<&GridGraph<D>> {
        let grid = self.grid.ok_or(Error::MissingGrid)?;
        self.graph = None;
        let graph = build_graph(grid, &self.neighborhood, &self.metric, &self.config)?;
        Ok(self.graph.insert(graph))
    }

    /// Most recently built graph
    #[must_use]
    pub fn graph(&self) -> Option<&GridGraph<D>> {
        self.graph.as_ref()
    }

    /// Take ownership of the built graph
    pub fn take_graph(&mut self) -> Option<GridGraph<D>> {
        self.graph.take()
    }
}

#[cfg(feature = "parallel")]
impl<'g, G, M, const D: usize> GraphBuilder<'g, G, M, D>
where
    G: Grid<D> + Sync + ?Sized,
    M: PairwiseMetric<G, D> + Sync,
{
    /// [`GraphBuilder::build`] on the rayon pool
    ///
    /// # Errors
    ///
    /// Same as [`GraphBuilder::build`].
    pub fn build_par(&mut self) -> Result<&GridGraph<D>> {
        let grid = self.grid.ok_or(Error::MissingGrid)?;
        self.graph = None;
        let graph = build_graph_par(grid, &self.neighborhood, &self.metric, &self.config)?;
        Ok(self.graph.insert(graph))
    }
}
