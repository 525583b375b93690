//! Graph storage layer
//!
//! Provides the CSR (Compressed Sparse Row) adjacency behind [`crate::GridGraph`].

pub mod csr;

pub use csr::{CsrGraph, VertexId};
