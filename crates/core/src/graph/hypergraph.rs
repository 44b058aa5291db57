use crate::error::{Error, Result};

/// One hyper-edge: an ordered small vector of incident vertices.
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HyperEdge {
    pub vertices: Vec<u32>,
    pub weight: i64,
}

/// Hypergraph variant of [`Graph`](super::Graph): the ZDD variable order is
/// the hyper-edge order, and each hyper-edge carries an arbitrary number of
/// incident vertices rather than exactly two.
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HyperGraph {
    vertex_count: u32,
    edges: Vec<HyperEdge>,
    vertex_weights: Option<Vec<i64>>,
    last_occurrence: Vec<Option<usize>>,
}

impl HyperGraph {
    pub fn from_edges(vertex_count: u32, edges: Vec<HyperEdge>) -> Result<Self> {
        for edge in &edges {
            for &v in &edge.vertices {
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
            for &v in &edge.vertices {
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
    pub fn edges(&self) -> &[HyperEdge] {
        &self.edges
    }

    #[must_use]
    pub fn edge(&self, index: usize) -> &HyperEdge {
        &self.edges[index]
    }

    #[must_use]
    pub fn last_occurrence(&self, vertex: u32) -> Option<usize> {
        self.last_occurrence.get(vertex as usize).copied().flatten()
    }

    /// Assigns per-vertex weights (1-based, so `weights.len()` must equal
    /// `vertex_count`). Mirrors [`super::Graph::set_vertex_weights`]:
    /// errors rather than silently defaulting missing entries to `1`.
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

    /// Overwrites the per-hyper-edge weights in edge order. Errors if the
    /// sidecar is shorter than the edge list.
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

    /// Vertex weight, defaulting to `1` when no sidecar was ever loaded.
    #[must_use]
    pub fn vertex_weight(&self, vertex: u32) -> i64 {
        self.vertex_weights
            .as_ref()
            .and_then(|w| w.get(vertex as usize - 1).copied())
            .unwrap_or(1)
    }

    /// Renders the hypergraph as a Graphviz `graph` block. Graphviz has no
    /// native hyperedge primitive, so each hyper-edge is drawn as a small
    /// filled point connected to every one of its incident vertices, the
    /// same star-expansion a reader would sketch by hand; `bold_edges`
    /// (1-based hyper-edge numbers) draws that star's spokes in red.
    #[must_use]
    pub fn export_graphviz(&self, bold_edges: &[usize]) -> String {
        use std::fmt::Write as _;

        let mut out = String::from("graph G {\n");
        for v in 1..=self.vertex_count {
            let _ = writeln!(out, "\t{v};");
        }
        for (index, edge) in self.edges.iter().enumerate() {
            let number = index + 1;
            let hub = format!("e{number}");
            let _ = writeln!(out, "\t{hub} [shape=point, label=\"{number}\"];");
            let bold = bold_edges.contains(&number);
            for &v in &edge.vertices {
                let _ = write!(out, "\t{hub} -- {v}");
                if bold {
                    out.push_str(" [color=red, penwidth=5]");
                }
                out.push_str(";\n");
            }
        }
        out.push_str("}\n");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range_vertex() {
        let err = HyperGraph::from_edges(
            3,
            vec![HyperEdge {
                vertices: vec![1, 4],
                weight: 1,
            }],
        )
        .unwrap_err();
        assert!(matches!(err, Error::VertexOutOfRange { vertex: 4, .. }));
    }

    #[test]
    fn last_occurrence_spans_multi_vertex_edges() {
        let hg = HyperGraph::from_edges(
            4,
            vec![
                HyperEdge {
                    vertices: vec![1, 2, 3],
                    weight: 1,
                },
                HyperEdge {
                    vertices: vec![3, 4],
                    weight: 1,
                },
            ],
        )
        .unwrap();
        assert_eq!(hg.last_occurrence(1), Some(0));
        assert_eq!(hg.last_occurrence(3), Some(1));
        assert_eq!(hg.last_occurrence(4), Some(1));
    }

    #[test]
    fn truncated_edge_weights_is_an_error() {
        let mut hg = HyperGraph::from_edges(
            3,
            vec![HyperEdge {
                vertices: vec![1, 2],
                weight: 1,
            }],
        )
        .unwrap();
        let err = hg.set_edge_weights(vec![]).unwrap_err();
        assert!(matches!(err, Error::TruncatedWeights { expected: 1, found: 0 }));
    }

    #[test]
    fn default_vertex_weight_is_one_without_sidecar() {
        let hg = HyperGraph::from_edges(2, vec![]).unwrap();
        assert_eq!(hg.vertex_weight(1), 1);
    }

    #[test]
    fn graphviz_export_stars_each_hyperedge_through_a_hub() {
        let hg = HyperGraph::from_edges(
            3,
            vec![HyperEdge {
                vertices: vec![1, 2, 3],
                weight: 1,
            }],
        )
        .unwrap();
        let dot = hg.export_graphviz(&[1]);
        assert!(dot.contains("e1 [shape=point"));
        assert!(dot.contains("e1 -- 1 [color=red, penwidth=5];"));
        assert!(dot.contains("e1 -- 2 [color=red, penwidth=5];"));
        assert!(dot.contains("e1 -- 3 [color=red, penwidth=5];"));
    }
}
