//! Graph and hypergraph models (C1): an ordered edge list is the single
//! source of truth for the ZDD's variable order.

mod hypergraph;
mod model;

pub use hypergraph::{HyperEdge, HyperGraph};
pub use model::{Edge, Graph};

/// The construction engine's view of an edge source, common to [`Graph`]
/// (two endpoints per edge) and [`HyperGraph`] (any number of incident
/// vertices per hyper-edge). Grounded on `GraphInterface.hpp`, the original
/// sources' shared base between its `Graph` and `HyperGraph` classes.
pub trait EdgeSource {
    fn vertex_count(&self) -> u32;
    fn edge_count(&self) -> usize;

    /// The incident vertices of edge `edge_index` (two for [`Graph`], any
    /// number for [`HyperGraph`]). Returned by value since `Graph`'s
    /// `src`/`dest` pair isn't laid out as a contiguous slice; called once
    /// per edge by the construction engine, not per node, so the allocation
    /// is not on the per-node hot path.
    fn vertices_of(&self, edge_index: usize) -> Vec<u32>;
    fn weight_of(&self, edge_index: usize) -> i64;
    fn last_occurrence(&self, vertex: u32) -> Option<usize>;

    /// True iff some vertex referenced by an edge at or past `edge_index`
    /// is absent from `frontier_next` (the frontier manager's
    /// `is_any_unprocessed_vertex_missing` query), used by Hamiltonian and
    /// spanning-family terminal checks to reject early.
    fn is_any_unprocessed_vertex_missing(&self, edge_index: usize, frontier_next: &[u32]) -> bool {
        (edge_index..self.edge_count()).any(|future| {
            self.vertices_of(future)
                .iter()
                .any(|v| !frontier_next.contains(v) && self.last_occurrence(*v) != Some(edge_index))
        })
    }
}

impl EdgeSource for Graph {
    fn vertex_count(&self) -> u32 {
        Self::vertex_count(self)
    }

    fn edge_count(&self) -> usize {
        Self::edge_count(self)
    }

    fn vertices_of(&self, edge_index: usize) -> Vec<u32> {
        self.edge(edge_index).endpoints().to_vec()
    }

    fn weight_of(&self, edge_index: usize) -> i64 {
        self.edge(edge_index).weight
    }

    fn last_occurrence(&self, vertex: u32) -> Option<usize> {
        Self::last_occurrence(self, vertex)
    }

    fn is_any_unprocessed_vertex_missing(&self, edge_index: usize, frontier_next: &[u32]) -> bool {
        Self::is_any_unprocessed_vertex_missing(self, edge_index, frontier_next)
    }
}

impl EdgeSource for HyperGraph {
    fn vertex_count(&self) -> u32 {
        Self::vertex_count(self)
    }

    fn edge_count(&self) -> usize {
        self.edges().len()
    }

    fn vertices_of(&self, edge_index: usize) -> Vec<u32> {
        self.edge(edge_index).vertices.clone()
    }

    fn weight_of(&self, edge_index: usize) -> i64 {
        self.edge(edge_index).weight
    }

    fn last_occurrence(&self, vertex: u32) -> Option<usize> {
        Self::last_occurrence(self, vertex)
    }
}
