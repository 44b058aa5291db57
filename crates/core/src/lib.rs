//! Frontier-method construction of Zero-suppressed Binary Decision Diagrams
//! (ZDDs) over combinatorial subgraph families.
//!
//! `frontier_core` builds a ZDD whose accepting paths correspond bijectively
//! to the members of a subgraph family selected over an input graph: simple
//! `s`-`t` paths, cycles, Hamiltonian variants, spanning forests/trees,
//! rooted forests, bounded-component partitions, cuts, path-matchings, and
//! hypergraph set-partition/cover/packing families. Once built, the ZDD
//! supports exact counting (machine integer, floating point, or arbitrary
//! precision), uniform random sampling, full enumeration, export to on-disk
//! formats, and reloading.
//!
//! # Entry point
//!
//! An [`engine::Engine`] is built from one concrete [`families::FamilyLogic`]
//! implementation and drives it across the edges of a [`graph::Graph`] (or
//! [`graph::HyperGraph`]) via [`engine::Engine::construct`], producing a
//! [`zdd::PseudoZdd`]. From there [`count::count`] and [`count::sample`]
//! answer counting/sampling queries. Choosing *which* family to build for a
//! given run -- the tagged-union dispatch a CLI needs -- is `frontier_cli`'s
//! job, not this crate's; `frontier_core` only ever monomorphises one family
//! at a time.
//!
//! ```rust,ignore
//! use frontier_core::count::count;
//! use frontier_core::engine::Engine;
//! use frontier_core::families::path::{PathConfig, PathFamily};
//! use frontier_core::graph::{Edge, Graph};
//!
//! let graph = Graph::from_edges(4, vec![Edge::new(1, 2, 1), Edge::new(2, 3, 1), Edge::new(3, 4, 1)])?;
//! let family = PathFamily::new(PathConfig { start: 1, end: 4, hamilton: false, cycle: false, distance_bound: None });
//! let zdd = Engine::new(family).construct(&graph)?.reduce();
//! let total: u64 = count(&zdd)?;
//! # Ok::<(), frontier_core::error::Error>(())
//! ```
//!
//! # Crate features
//!
//! - **`serde`** -- enables `Serialize`/`Deserialize` on the ZDD container
//!   and the graph model, mirroring the optional-serde convention the
//!   teacher workspace uses for its own core crate.
//!
//! Graph/ZDD text parsing lives in the separate `frontier_parser` crate; the
//! `frontier_cli` crate wires both into a command-line driver.

pub mod count;
pub mod engine;
pub mod error;
pub mod families;
pub mod frontier;
pub mod graph;
pub mod hashcons;
pub mod mate;
pub mod number;
pub mod subsetting;
pub mod zdd;

pub use error::Error;
pub use zdd::PseudoZdd;
