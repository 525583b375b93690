//! grid-graph: weighted graphs from n-dimensional grids
//!
//! # Overview
//!
//! grid-graph turns a rectangular grid of samples (an image, a volume, a
//! field) into a weighted graph: one vertex per cell, one edge per neighbor
//! relation chosen by a set of coordinate offsets, weighted by a pairwise
//! metric over the two samples. The result exposes CSR adjacency and a
//! coordinate codec so shortest-path, min-cut or community results map back
//! to grid positions.
//!
//! # Quick Start
//!
//! ```
//! use grid_graph::{DenseGrid, GraphBuilder, Neighborhood, OffsetPolicy, VertexId};
//!
//! # fn main() -> grid_graph::Result<()> {
//! // 3x3 image, values 1..=9, axis 0 varies fastest
//! let image = DenseGrid::from_vec([3, 3], (1..=9).collect::<Vec<u8>>())?;
//!
//! let mut builder = GraphBuilder::new();
//! builder.set_input(&image);
//! builder.set_neighborhood(Neighborhood::von_neumann(OffsetPolicy::Ordered));
//!
//! let graph = builder.build()?;
//! assert_eq!(graph.num_vertices(), 9);
//! assert_eq!(graph.num_edges(), 12);
//!
//! // (a - b)² between (0,0) and (0,1)
//! let below = graph.vertex(&[0, 1]).unwrap();
//! assert_eq!(graph.edge_weight(VertexId(0), below), Some(9.0));
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - **Grid**: [`Grid`] trait over any shape, [`DenseGrid`] / [`GridView`] storage
//! - **Mapping**: [`GridCodec`] row-major coordinate ↔ [`VertexId`] bijection
//! - **Neighborhood**: ordered or deduplicated offset sets with presets
//! - **Build**: sequential [`build_graph`], rayon-backed `build_graph_par`
//! - **Storage**: CSR (Compressed Sparse Row) forward and reverse adjacency

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod builder;
pub mod error;
pub mod graph;
pub mod grid;
pub mod metric;
pub mod neighborhood;
pub mod storage;

// aprender hand-off (optional)
#[cfg(feature = "aprender")]
pub mod interop;

pub use builder::{build_graph, BuildConfig, GraphBuilder, DEFAULT_CHUNK_SIZE};
pub use error::{Error, ErrorKind, Result};
pub use graph::{Directedness, Edge, GridGraph};
pub use grid::{DenseGrid, Grid, GridCodec, GridView, Index, Offset};
pub use metric::{AbsoluteDifference, GaussianSimilarity, PairwiseMetric, SampleFn, SquaredDifference};
pub use neighborhood::{Neighborhood, OffsetPolicy};
pub use storage::{CsrGraph, VertexId};

#[cfg(feature = "parallel")]
pub use builder::build_graph_par;

#[cfg(feature = "aprender")]
pub use interop::Regions;
