//! Error types for grid-to-graph construction
//!
//! Every failure belongs to one of three kinds (see [`ErrorKind`]):
//! configuration mistakes caught before any graph state exists, bounds
//! violations in the vertex mapping, and integer range overflow on very large
//! grids. A coordinate that is merely outside the grid is not an error;
//! [`GridCodec::to_vertex`](crate::GridCodec::to_vertex) reports it as `None`.

use thiserror::Error;

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Missing input, invalid offset or parameter
    Configuration,
    /// Vertex id inconsistent with the grid shape
    Bounds,
    /// Coordinate or vertex arithmetic out of the representable range
    Range,
}

/// Errors raised while configuring or running a graph build
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// `build` was called before an input grid was set
    #[error("no input grid set; call set_input before build")]
    MissingGrid,

    /// The all-zero offset would only ever produce self-loops
    #[error("zero offset cannot be registered as a neighbor")]
    ZeroOffset,

    /// A sample buffer does not cover the declared shape
    #[error("shape {shape:?} needs {expected} samples, got {actual}")]
    ShapeMismatch {
        /// Declared per-axis extent
        shape: Vec<usize>,
        /// Cells implied by the shape
        expected: usize,
        /// Samples supplied
        actual: usize,
    },

    /// A configuration value outside its valid domain
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        /// Parameter name
        name: &'static str,
        /// What is wrong with it
        reason: String,
    },

    /// A computed vertex id does not decode back to the coordinate it came from
    #[error("vertex {vertex} decodes to {actual:?}, expected {expected:?}")]
    VertexMismatch {
        /// Offending vertex id
        vertex: u32,
        /// Coordinate the id was computed from
        expected: Vec<i64>,
        /// Coordinate the codec maps it back to
        actual: Vec<i64>,
    },

    /// Adjacency query on a vertex the graph does not have
    #[error("vertex {vertex} out of bounds for graph with {num_vertices} vertices")]
    VertexOutOfRange {
        /// Requested vertex id
        vertex: u32,
        /// Vertex count of the graph
        num_vertices: usize,
    },

    /// Integer overflow in coordinate or vertex arithmetic
    #[error("arithmetic overflow: {context}")]
    Overflow {
        /// What was being computed
        context: String,
    },
}

impl Error {
    /// Classify this error
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingGrid
            | Self::ZeroOffset
            | Self::ShapeMismatch { .. }
            | Self::InvalidParameter { .. } => ErrorKind::Configuration,
            Self::VertexMismatch { .. } | Self::VertexOutOfRange { .. } => ErrorKind::Bounds,
            Self::Overflow { .. } => ErrorKind::Range,
        }
    }

    pub(crate) fn overflow(context: impl Into<String>) -> Self {
        Self::Overflow {
            context: context.into(),
        }
    }
}
