//! Text format readers for `frontier_core`'s graph, hypergraph, weight
//! sidecar, root-list, and general-family parameter inputs.
//!
//! Grounded on `OptionParser.hpp`'s input readers, reworked onto `winnow`
//! for the line-oriented formats and `logos` for the general family's
//! section grammar -- the same parsing split the rest of the retrieval
//! pack reaches for rather than a hand-rolled character scanner.

pub mod error;
pub mod general;
pub mod graph;
pub mod hypergraph;
pub mod roots;

pub use error::{ParseError, Result};
