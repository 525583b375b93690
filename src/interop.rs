//! Hand-off to aprender's graph algorithms
//!
//! Louvain community detection over a grid graph is a region segmentation:
//! each community is a set of cells connected by heavy edges.

use crate::graph::GridGraph;
use crate::grid::Index;
use crate::storage::VertexId;
use aprender::graph::Graph as AprenderGraph;
use tracing::debug;

/// Louvain communities mapped back to the grid
#[derive(Debug, Clone, PartialEq)]
pub struct Regions<const D: usize> {
    /// Cells per community in aprender's order, then singleton regions
    pub regions: Vec<Vec<Index<D>>>,
    /// Modularity of the partition
    pub modularity: f64,
}

impl<const D: usize> Regions<D> {
    /// Number of non-empty regions
    #[must_use]
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Whether no region was found
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Region containing `index`
    #[must_use]
    pub fn region_of(&self, index: &Index<D>) -> Option<usize> {
        self.regions.iter().position(|r| r.contains(index))
    }
}

impl<const D: usize> GridGraph<D> {
    /// Convert into an aprender [`AprenderGraph`] over the same vertex ids
    ///
    /// aprender sizes its node set from the largest edge endpoint plus one,
    /// so cells with no edge after the last connected vertex are absent, and
    /// an edgeless graph has no nodes at all. Parallel arcs from a duplicated
    /// offset collapse into one; which weight survives is unspecified.
    #[must_use]
    pub fn to_aprender(&self) -> AprenderGraph {
        AprenderGraph::from_weighted_edges(&self.weighted_edges(), self.is_directed())
    }

    /// Louvain communities with every vertex translated to its coordinate
    ///
    /// Every cell of the grid lands in exactly one region. Cells aprender never
    /// saw (see [`GridGraph::to_aprender`]) follow the detected communities as
    /// singleton regions, in vertex order. `modularity` is aprender's value
    /// for the detected communities.
    #[must_use]
    pub fn louvain_regions(&self) -> Regions<D> {
        let graph = self.to_aprender();
        let communities = graph.louvain();
        let modularity = graph.modularity(&communities);

        let mut covered = vec![false; self.num_vertices()];
        let mut regions: Vec<Vec<Index<D>>> = communities
            .into_iter()
            .map(|community| {
                community
                    .into_iter()
                    .filter_map(|v| u32::try_from(v).ok())
                    .filter_map(|v| {
                        let index = self.coordinate(VertexId(v)).ok()?;
                        covered[v as usize] = true;
                        Some(index)
                    })
                    .collect()
            })
            .filter(|region: &Vec<Index<D>>| !region.is_empty())
            .collect();

        let detected = regions.len();
        for (v, _) in covered.iter().enumerate().filter(|&(_, &seen)| !seen) {
            #[allow(clippy::cast_possible_truncation)] // v < num_vertices <= u32::MAX
            regions.push(vec![self.codec().to_coordinate(VertexId(v as u32))]);
        }
        if regions.len() > detected {
            debug!(
                "louvain: {} cells outside aprender's node set kept as singletons",
                regions.len() - detected
            );
        }
        debug!(
            "louvain: {} regions, modularity {:.3}",
            regions.len(),
            modularity
        );

        Regions {
            regions,
            modularity,
        }
    }
}
