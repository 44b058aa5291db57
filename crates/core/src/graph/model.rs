use hashbrown::HashMap;

use crate::error::{Error, Result};

/// A single edge of the input graph. The edge's position in
/// [`Graph::edges`] is also its ZDD variable index (1-based in the spec's
/// terms, 0-based here).
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub src: u32,
    pub dest: u32,
    pub weight: i64,
}

impl Edge {
    #[must_use]
    pub const fn new(src: u32, dest: u32, weight: i64) -> Self {
        Self { src, dest, weight }
    }

    #[must_use]
    pub const fn endpoints(&self) -> [u32; 2] {
        [self.src, self.dest]
    }
}

/// Ordered edge list over vertices numbered `1..=vertex_count`. The edge
/// order fixes the ZDD's variable order (C1).
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Graph {
    vertex_count: u32,
    edges: Vec<Edge>,
    vertex_weights: Option<Vec<i64>>,
    /// `last_occurrence[v]` is the index of the last edge referencing vertex
    /// `v`, or `None` if `v` is isolated. Precomputed so the frontier
    /// manager's "is this vertex still needed" check is O(1) per vertex
    /// rather than a rescan of the remaining edges.
    last_occurrence: Vec<Option<usize>>,
}

impl Graph {
    /// Builds a graph from an explicit edge list, validating that every
    /// endpoint lies within `1..=vertex_count`.
    pub fn from_edges(vertex_count: u32, edges: Vec<Edge>) -> Result<Self> {
        for edge in &edges {
            for v in edge.endpoints() {
                if v == 0 || v > vertex_count {
                    return Err(Error::VertexOutOfRange {
                        vertex: v,
                        vertex_count,
                    });
                }
            }
        }

        let mut last_occurrence = vec![None; vertex_count as usize + 1];
        for (index, edge) in edges.iter().enumerate() {
            for v in edge.endpoints() {
                last_occurrence[v as usize] = Some(index);
            }
        }

        Ok(Self {
            vertex_count,
            edges,
            vertex_weights: None,
            last_occurrence,
        })
    }

    #[must_use]
    pub const fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    #[must_use]
    pub fn edge(&self, index: usize) -> &Edge {
        &self.edges[index]
    }

    /// Index of the last edge that references `vertex`, or `None` if the
    /// vertex never appears in the edge list.
    #[must_use]
    pub fn last_occurrence(&self, vertex: u32) -> Option<usize> {
        self.last_occurrence.get(vertex as usize).copied().flatten()
    }

    /// True iff no edge past `edge_index` references a vertex absent from
    /// `frontier` (the frontier manager's `is_any_unprocessed_vertex_missing`
    /// query, precomputed against `last_occurrence` rather than rescanning).
    #[must_use]
    pub fn is_any_unprocessed_vertex_missing(&self, edge_index: usize, frontier: &[u32]) -> bool {
        self.edges[edge_index..].iter().any(|edge| {
            edge.endpoints()
                .iter()
                .any(|v| !frontier.contains(v) && self.last_occurrence(*v) != Some(edge_index))
        })
    }

    /// Assigns per-vertex weights (1-based, so `weights.len()` must equal
    /// `vertex_count`). Errors rather than silently defaulting missing
    /// entries to `1`.
    pub fn set_vertex_weights(&mut self, weights: Vec<i64>) -> Result<()> {
        if weights.len() != self.vertex_count as usize {
            return Err(Error::TruncatedWeights {
                expected: self.vertex_count as usize,
                found: weights.len(),
            });
        }
        self.vertex_weights = Some(weights);
        Ok(())
    }

    /// Overwrites the per-edge weights in edge order. Errors if the sidecar
    /// is shorter than the edge list.
    pub fn set_edge_weights(&mut self, weights: Vec<i64>) -> Result<()> {
        if weights.len() != self.edges.len() {
            return Err(Error::TruncatedWeights {
                expected: self.edges.len(),
                found: weights.len(),
            });
        }
        for (edge, weight) in self.edges.iter_mut().zip(weights) {
            edge.weight = weight;
        }
        Ok(())
    }

    /// Vertex weight, defaulting to `1` when no sidecar was ever loaded
    /// (distinct from a *truncated* sidecar, which is rejected at load
    /// time by [`Self::set_vertex_weights`]).
    #[must_use]
    pub fn vertex_weight(&self, vertex: u32) -> i64 {
        self.vertex_weights
            .as_ref()
            .and_then(|w| w.get(vertex as usize - 1).copied())
            .unwrap_or(1)
    }

    /// Relabels vertices in breadth-first visitation order from `root`,
    /// rewriting the edge list in place. Vertices unreachable from `root`
    /// keep appearing, relabelled after the reachable set, in their original
    /// relative order. Grounded on `Graph::RearrangeByBreadthFirst` in the
    /// original sources: BFS order tends to shrink the running frontier
    /// width for path/tree families.
    pub fn rearrange_by_breadth_first(&mut self, root: u32) -> Result<()> {
        if root == 0 || root > self.vertex_count {
            return Err(Error::VertexOutOfRange {
                vertex: root,
                vertex_count: self.vertex_count,
            });
        }

        let mut adjacency: HashMap<u32, Vec<u32>> = HashMap::new();
        for edge in &self.edges {
            adjacency.entry(edge.src).or_default().push(edge.dest);
            adjacency.entry(edge.dest).or_default().push(edge.src);
        }

        let mut relabel = vec![0u32; self.vertex_count as usize + 1];
        let mut next_label = 1u32;
        let mut queue = std::collections::VecDeque::new();
        queue.push_back(root);
        relabel[root as usize] = next_label;
        next_label += 1;

        while let Some(v) = queue.pop_front() {
            if let Some(neighbors) = adjacency.get(&v) {
                for &n in neighbors {
                    if relabel[n as usize] == 0 {
                        relabel[n as usize] = next_label;
                        next_label += 1;
                        queue.push_back(n);
                    }
                }
            }
        }
        for v in 1..=self.vertex_count {
            if relabel[v as usize] == 0 {
                relabel[v as usize] = next_label;
                next_label += 1;
            }
        }

        for edge in &mut self.edges {
            edge.src = relabel[edge.src as usize];
            edge.dest = relabel[edge.dest as usize];
        }
        if let Some(weights) = self.vertex_weights.take() {
            let mut relabelled = vec![0i64; weights.len()];
            for (old_index, &w) in weights.iter().enumerate() {
                let old_vertex = old_index as u32 + 1;
                relabelled[relabel[old_vertex as usize] as usize - 1] = w;
            }
            self.vertex_weights = Some(relabelled);
        }

        let mut last_occurrence = vec![None; self.vertex_count as usize + 1];
        for (index, edge) in self.edges.iter().enumerate() {
            for v in edge.endpoints() {
                last_occurrence[v as usize] = Some(index);
            }
        }
        self.last_occurrence = last_occurrence;

        Ok(())
    }

    /// Appends one synthetic vertex connected to every existing vertex, used
    /// by the any-terminal path family (`DSTPATH`) to express "a path
    /// between some two vertices" as an ordinary s-t path between the
    /// dummy's two incident edges. Returns the new vertex's id.
    pub fn add_dummy_vertex(&mut self) -> u32 {
        let dummy = self.vertex_count + 1;
        self.vertex_count = dummy;
        for v in 1..dummy {
            self.edges.push(Edge::new(dummy, v, 1));
        }
        if let Some(weights) = &mut self.vertex_weights {
            weights.push(1);
        }
        self.last_occurrence.push(None);
        for (index, edge) in self.edges.iter().enumerate() {
            for v in edge.endpoints() {
                self.last_occurrence[v as usize] = Some(index);
            }
        }
        dummy
    }

    /// Renders the graph as a Graphviz `graph` block, with `bold_edges`
    /// (1-based edge numbers, as in a sampled ZDD solution) drawn in red.
    /// Grounded on `Graph::PrintForGraphviz` in the original sources.
    #[must_use]
    pub fn export_graphviz(&self, bold_edges: &[usize]) -> String {
        use std::fmt::Write as _;

        let mut out = String::from("graph G {\n");
        for v in 1..=self.vertex_count {
            let _ = writeln!(out, "\t{v};");
        }
        for (index, edge) in self.edges.iter().enumerate() {
            let number = index + 1;
            let _ = write!(out, "\t{} -- {} [label={number}", edge.src, edge.dest);
            if bold_edges.contains(&number) {
                out.push_str(", color=red, penwidth=5");
            }
            out.push_str("];\n");
        }
        out.push_str("}\n");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_graph() -> Graph {
        Graph::from_edges(
            4,
            vec![
                Edge::new(1, 2, 1),
                Edge::new(2, 3, 1),
                Edge::new(3, 4, 1),
                Edge::new(4, 1, 1),
            ],
        )
        .unwrap()
    }

    #[test]
    fn rejects_out_of_range_vertex() {
        let err = Graph::from_edges(2, vec![Edge::new(1, 3, 1)]).unwrap_err();
        assert!(matches!(err, Error::VertexOutOfRange { vertex: 3, .. }));
    }

    #[test]
    fn last_occurrence_tracks_final_edge_per_vertex() {
        let graph = sample_graph();
        assert_eq!(graph.last_occurrence(1), Some(3));
        assert_eq!(graph.last_occurrence(2), Some(1));
        assert_eq!(graph.last_occurrence(3), Some(2));
        assert_eq!(graph.last_occurrence(4), Some(3));
    }

    #[test]
    fn truncated_vertex_weights_is_an_error() {
        let mut graph = sample_graph();
        let err = graph.set_vertex_weights(vec![1, 2]).unwrap_err();
        assert!(matches!(err, Error::TruncatedWeights { expected: 4, found: 2 }));
    }

    #[test]
    fn default_vertex_weight_is_one_without_sidecar() {
        let graph = sample_graph();
        assert_eq!(graph.vertex_weight(1), 1);
    }

    #[test]
    fn breadth_first_rearrange_labels_root_first() {
        let mut graph = sample_graph();
        graph.rearrange_by_breadth_first(3).unwrap();
        assert_eq!(graph.vertex_count(), 4);
        // root 3 becomes vertex 1 under the new labelling.
        assert!(graph
            .edges()
            .iter()
            .any(|e| e.src == 1 || e.dest == 1));
    }

    #[test]
    fn graphviz_export_marks_bold_edges_by_one_based_number() {
        let graph = sample_graph();
        let dot = graph.export_graphviz(&[2]);
        assert!(dot.starts_with("graph G {\n"));
        assert!(dot.contains("1 -- 2 [label=1];"));
        assert!(dot.contains("2 -- 3 [label=2, color=red, penwidth=5];"));
        assert!(!dot.contains("3 -- 4 [label=3, color=red"));
    }

    #[test]
    fn dummy_vertex_connects_to_every_vertex() {
        let mut graph = sample_graph();
        let dummy = graph.add_dummy_vertex();
        assert_eq!(dummy, 5);
        assert_eq!(graph.vertex_count(), 5);
        assert_eq!(graph.edge_count(), 8);
        for v in 1..5 {
            assert!(graph
                .edges()
                .iter()
                .any(|e| e.src == dummy && e.dest == v));
        }
    }
}
