//! Frontier construction throughput across graph sizes.
//!
//! Grounded on `crates/core/benches/consistency.rs`'s shape: one
//! `criterion_group` over a small/medium/large size ladder, a private
//! fixture builder, and `black_box` around both inputs to the call under
//! measurement.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use frontier_core::engine::Engine;
use frontier_core::families::component::{ComponentConfig, ComponentFamily};
use frontier_core::graph::{Edge, Graph};

/// A `size`-by-`size` grid graph: vertex `(r, c)` numbered `r * size + c +
/// 1`, with an edge to its right and below neighbor wherever one exists.
fn grid(size: u32) -> Graph {
    let vertex_count = size * size;
    let mut edges = Vec::new();
    for r in 0..size {
        for c in 0..size {
            let v = r * size + c + 1;
            if c + 1 < size {
                edges.push(Edge::new(v, v + 1, 1));
            }
            if r + 1 < size {
                edges.push(Edge::new(v, v + size, 1));
            }
        }
    }
    Graph::from_edges(vertex_count, edges).unwrap()
}

fn bench_construction(c: &mut Criterion) {
    let small = grid(3);
    let medium = grid(4);
    let large = grid(5);

    let mut group = c.benchmark_group("construction");

    group.bench_function("spanning_tree_small", |b| {
        b.iter(|| Engine::new(ComponentFamily::new(ComponentConfig::tree(), vec![])).construct(black_box(&small)))
    });

    group.bench_function("spanning_tree_medium", |b| {
        b.iter(|| Engine::new(ComponentFamily::new(ComponentConfig::tree(), vec![])).construct(black_box(&medium)))
    });

    group.bench_function("spanning_tree_large", |b| {
        b.iter(|| Engine::new(ComponentFamily::new(ComponentConfig::tree(), vec![])).construct(black_box(&large)))
    });

    group.bench_function("spanning_forest_medium", |b| {
        b.iter(|| Engine::new(ComponentFamily::new(ComponentConfig::forest(), vec![])).construct(black_box(&medium)))
    });

    group.finish();
}

criterion_group!(benches, bench_construction);
criterion_main!(benches);
