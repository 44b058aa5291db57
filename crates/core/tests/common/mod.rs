//! Shared fixtures for the integration tests in this directory.

use frontier_core::graph::{Edge, Graph};
use rand::rngs::StdRng;
use rand::Rng;

/// `K(n)`: every pair of the `n` vertices joined by one weight-1 edge.
pub fn complete_graph(n: u32) -> Graph {
    let mut edges = Vec::new();
    for src in 1..=n {
        for dest in (src + 1)..=n {
            edges.push(Edge::new(src, dest, 1));
        }
    }
    Graph::from_edges(n, edges).unwrap()
}

/// A random simple graph over `n` vertices, each of the `n * (n - 1) / 2`
/// possible edges kept independently with probability `density`. Reseed
/// with the same `rng` for a reproducible fixture across a test run.
pub fn random_graph(n: u32, density: f64, rng: &mut StdRng) -> Graph {
    let mut edges = Vec::new();
    for src in 1..=n {
        for dest in (src + 1)..=n {
            if rng.random::<f64>() < density {
                edges.push(Edge::new(src, dest, 1));
            }
        }
    }
    Graph::from_edges(n, edges).unwrap()
}

/// Brute-force spanning tree count over `graph`'s edges, for cross-checking
/// the frontier-method count on inputs small enough to enumerate directly.
pub fn brute_force_spanning_tree_count(vertex_count: u32, edges: &[Edge]) -> u64 {
    let m = edges.len();
    assert!(m < 24, "brute force is exponential in edge count");
    let mut total = 0u64;
    for mask in 0u32..(1u32 << m) {
        if mask.count_ones() != vertex_count - 1 {
            continue;
        }
        let mut parent: Vec<u32> = (0..=vertex_count).collect();
        fn find(parent: &mut [u32], x: u32) -> u32 {
            if parent[x as usize] != x {
                parent[x as usize] = find(parent, parent[x as usize]);
            }
            parent[x as usize]
        }
        let mut acyclic = true;
        for (index, edge) in edges.iter().enumerate() {
            if mask & (1 << index) == 0 {
                continue;
            }
            let (ra, rb) = (find(&mut parent, edge.src), find(&mut parent, edge.dest));
            if ra == rb {
                acyclic = false;
                break;
            }
            parent[ra as usize] = rb;
        }
        if !acyclic {
            continue;
        }
        let root = find(&mut parent, 1);
        let spanning = (2..=vertex_count).all(|v| find(&mut parent, v) == root);
        if spanning {
            total += 1;
        }
    }
    total
}
