//! Hypergraph input formats: incidence matrices and hyper-edge lists,
//! grounded on `HyperGraph.cpp`'s `LoadIncidenceMatrix`.
//!
//! The original's `HyperGraph::LoadEdgeList` and `LoadAdjacencyList` are
//! both stubs that print "not implemented" and exit -- there is no original
//! behaviour to match for a hyper-edge list, so this module's
//! [`parse_edge_list`] is this crate's own design: one hyper-edge per line,
//! given as a whitespace-separated list of incident vertex ids, with
//! weights supplied separately via a sidecar file rather than an inline
//! trailing column (unlike the plain-graph edge list, a hyper-edge's
//! vertex count is unbounded, so an inline weight can't be distinguished
//! from one more incident vertex).

use frontier_core::graph::{HyperEdge, HyperGraph};

use crate::error::{ParseError, Result};

fn parse_u32(field: &str, line: usize) -> Result<u32> {
    field.parse().map_err(|_| ParseError::new(format!("expected an integer, found {field:?}"), line, 1))
}

/// Parses the incidence-matrix format: one line per hyper-edge, `0`/`1`
/// tokens per vertex column. Every row must have the same column count,
/// fixed by the first row (`LoadIncidenceMatrix`'s "input error" check).
pub fn parse_incidence_matrix(input: &str) -> Result<HyperGraph> {
    let mut edges = Vec::new();
    let mut vertex_count = None;
    for (line_no, line) in input.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            break;
        }
        let lineno = line_no + 1;
        let mut vertices = Vec::new();
        for (column, token) in line.split_whitespace().enumerate() {
            match token {
                "1" => vertices.push(column as u32 + 1),
                "0" => {}
                other => return Err(ParseError::new(format!("expected 0 or 1, found {other:?}"), lineno, column + 1)),
            }
        }
        let columns = line.split_whitespace().count() as u32;
        match vertex_count {
            None => vertex_count = Some(columns),
            Some(expected) if expected != columns => {
                return Err(ParseError::new(format!("row has {columns} columns, expected {expected}"), lineno, 1));
            }
            Some(_) => {}
        }
        edges.push(HyperEdge { vertices, weight: 1 });
    }
    let vertex_count = vertex_count.unwrap_or(0);
    Ok(HyperGraph::from_edges(vertex_count, edges)?)
}

/// Parses a hyper-edge list: a vertex-count header line followed by one
/// line per hyper-edge, each a whitespace-separated list of incident
/// vertex ids.
pub fn parse_edge_list(input: &str) -> Result<HyperGraph> {
    let mut lines = input.lines().enumerate();
    let (_, header) = lines
        .next()
        .ok_or_else(|| ParseError::new("empty hyper-edge list: missing vertex count header", 1, 1))?;
    let vertex_count = parse_u32(header.trim(), 1)?;

    let mut edges = Vec::new();
    for (line_no, line) in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let lineno = line_no + 1;
        let vertices = line
            .split_whitespace()
            .map(|field| parse_u32(field, lineno))
            .collect::<Result<Vec<_>>>()?;
        edges.push(HyperEdge { vertices, weight: 1 });
    }
    Ok(HyperGraph::from_edges(vertex_count, edges)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incidence_matrix_reads_membership_columns() {
        let hg = parse_incidence_matrix("1 1 0\n0 1 1\n").unwrap();
        assert_eq!(hg.edges().len(), 2);
        assert_eq!(hg.edge(0).vertices, vec![1, 2]);
        assert_eq!(hg.edge(1).vertices, vec![2, 3]);
    }

    #[test]
    fn incidence_matrix_rejects_ragged_rows() {
        assert!(parse_incidence_matrix("1 1 0\n1 1\n").is_err());
    }

    #[test]
    fn edge_list_reads_one_hyperedge_per_line() {
        let hg = parse_edge_list("4\n1 2 3\n3 4\n").unwrap();
        assert_eq!(hg.edges().len(), 2);
        assert_eq!(hg.edge(0).vertices, vec![1, 2, 3]);
        assert_eq!(hg.edge(1).vertices, vec![3, 4]);
    }

    #[test]
    fn edge_list_skips_blank_lines() {
        let hg = parse_edge_list("2\n\n1 2\n \n").unwrap();
        assert_eq!(hg.edges().len(), 1);
    }
}
