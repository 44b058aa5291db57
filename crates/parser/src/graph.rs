//! Plain-graph input formats (spec's "External interfaces" for [`Graph`]):
//! edge lists and adjacency lists, grounded on `Graph.cpp`'s `LoadEdgeList`
//! / `LoadAdjacencyListDirected` / `LoadAdjacencyListUndirected`.
//!
//! The weight-sidecar reader here only tokenises numbers; the decision of
//! what a short sidecar means belongs to `frontier_core::graph::Graph`'s
//! `set_vertex_weights`/`set_edge_weights` (`Error::TruncatedWeights`), not
//! to this module.

use frontier_core::graph::{Edge, Graph};

use crate::error::{ParseError, Result};

impl From<frontier_core::Error> for ParseError {
    fn from(err: frontier_core::Error) -> Self {
        ParseError::new(err.to_string(), 0, 0)
    }
}

fn parse_u32(field: &str, line: usize) -> Result<u32> {
    field.parse().map_err(|_| ParseError::new(format!("expected an integer, found {field:?}"), line, 1))
}

/// Parses the edge-list format: a vertex-count header line followed by one
/// `src dest [weight]` line per edge. A missing trailing weight defaults to
/// `1`, mirroring `LoadEdgeList`'s inline (not sidecar) weight column.
pub fn parse_edge_list(input: &str) -> Result<Graph> {
    let mut lines = input.lines().enumerate();
    let (_, header) = lines
        .next()
        .ok_or_else(|| ParseError::new("empty edge list: missing vertex count header", 1, 1))?;
    let vertex_count = parse_u32(header.trim(), 1)?;

    let mut edges = Vec::new();
    for (line_no, line) in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let mut fields = line.split_whitespace();
        let lineno = line_no + 1;
        let src = fields
            .next()
            .ok_or_else(|| ParseError::new(format!("expected a source vertex, found {line:?}"), lineno, 1))
            .and_then(|f| parse_u32(f, lineno))?;
        let dest = fields
            .next()
            .ok_or_else(|| ParseError::new(format!("expected a destination vertex, found {line:?}"), lineno, 1))
            .and_then(|f| parse_u32(f, lineno))?;
        let weight = fields.next().and_then(|f| f.parse().ok()).unwrap_or(1);
        edges.push(Edge::new(src, dest, weight));
    }
    Ok(Graph::from_edges(vertex_count, edges)?)
}

/// Parses the adjacency-list format: one line per vertex, in order,
/// containing the ids of its neighbours. Self-loops are dropped. In the
/// undirected case each `{u, v}` pair is kept once no matter which of its
/// two endpoints lists the other, with the smaller id recorded as `src`;
/// the directed case keeps every line exactly as written.
pub fn parse_adjacency_list(input: &str, directed: bool) -> Result<Graph> {
    let mut edges: Vec<Edge> = Vec::new();
    let mut vertex_count = 0u32;
    for (line_no, line) in input.lines().enumerate() {
        vertex_count += 1;
        let current = vertex_count;
        for field in line.split_whitespace() {
            let neighbour = parse_u32(field, line_no + 1)?;
            if neighbour == current {
                continue;
            }
            let (src, dest) = if directed || current <= neighbour { (current, neighbour) } else { (neighbour, current) };
            if !directed && edges.iter().any(|e| e.src == src && e.dest == dest) {
                continue;
            }
            edges.push(Edge::new(src, dest, 1));
        }
    }
    Ok(Graph::from_edges(vertex_count, edges)?)
}

/// Parses a whitespace-separated sequence of integer weights, in file
/// order, for use with [`Graph::set_vertex_weights`]/[`Graph::set_edge_weights`]
/// or their [`frontier_core::graph::HyperGraph`] equivalents.
pub fn parse_weights(input: &str) -> Result<Vec<i64>> {
    input
        .split_whitespace()
        .enumerate()
        .map(|(i, field)| field.parse::<i64>().map_err(|_| ParseError::new(format!("expected a weight, found {field:?}"), 1, i + 1)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_list_defaults_missing_weight_to_one() {
        let graph = parse_edge_list("3\n1 2\n2 3 5\n").unwrap();
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.edge(0).weight, 1);
        assert_eq!(graph.edge(1).weight, 5);
    }

    #[test]
    fn edge_list_rejects_missing_header() {
        assert!(parse_edge_list("").is_err());
    }

    #[test]
    fn adjacency_list_undirected_dedups_and_drops_self_loops() {
        // vertex 1: neighbours 2, 1 (self-loop, dropped)
        // vertex 2: neighbours 1 (already recorded from vertex 1's line)
        let graph = parse_adjacency_list("2 1\n1\n", false).unwrap();
        assert_eq!(graph.vertex_count(), 2);
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.edge(0).src, 1);
        assert_eq!(graph.edge(0).dest, 2);
    }

    #[test]
    fn adjacency_list_directed_keeps_every_line_as_written() {
        let graph = parse_adjacency_list("2\n1\n", true).unwrap();
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.edge(0).src, 1);
        assert_eq!(graph.edge(0).dest, 2);
        assert_eq!(graph.edge(1).src, 2);
        assert_eq!(graph.edge(1).dest, 1);
    }

    #[test]
    fn weights_parses_whitespace_separated_integers() {
        assert_eq!(parse_weights("1 2\n3").unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn weights_rejects_non_integer_field() {
        assert!(parse_weights("1 x 3").is_err());
    }
}
