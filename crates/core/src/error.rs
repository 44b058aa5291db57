//! The three error kinds the construction engine and its collaborators can
//! raise: input validation, resource exhaustion, and logic invariant
//! violations.

use ::derive_more::{Display, From};

/// Unified error type for `frontier_core`.
///
/// Input-validation and resource-exhaustion variants are expected failure
/// modes a caller should handle; [`Error::InvariantViolation`] indicates a
/// bug in a family's state machine and should never occur in a release that
/// has passed the test suite.
#[derive(Debug, Display, From)]
pub enum Error {
    /// An edge, vertex, or root reference points outside the graph's vertex
    /// range.
    #[display("vertex {vertex} is out of range (graph has {vertex_count} vertices)")]
    VertexOutOfRange { vertex: u32, vertex_count: u32 },

    /// A weight sidecar file has fewer entries than the graph has
    /// vertices/edges. Treated as malformed input rather than silently
    /// defaulting the missing entries to weight `1`.
    #[display("truncated weight file: expected {expected} entries, found {found}")]
    TruncatedWeights { expected: usize, found: usize },

    /// A family-specific configuration value (e.g. a component-count range,
    /// a cut bound) is internally inconsistent.
    #[display("invalid family configuration: {reason}")]
    InvalidConfiguration { reason: &'static str },

    /// The level-scoped hash table could not find room even after doubling.
    #[display("hash table saturated at size {size}")]
    HashTableSaturated { size: usize },

    /// A counting pass overflowed its numeric representation.
    #[display("solution count overflowed while counting node {node}")]
    CountOverflow { node: u32 },

    /// An operation was requested that HDD streaming mode does not support
    /// (in-memory reduce/count/sample/enumerate once arcs are streamed to
    /// disk as they are produced).
    #[display("operation unavailable while streaming ZDD arcs to disk")]
    StreamingUnsupportedOperation,

    /// A ZDD text import encountered a line that does not parse as
    /// `id:lo,hi` or a `#L` level header.
    #[display("malformed ZDD text at line {line}: {reason}")]
    MalformedZddText { line: usize, reason: &'static str },

    /// A family-state invariant was violated. Indicates a bug rather than
    /// bad input; surfaced rather than aborting so a library caller keeps
    /// control of the process.
    #[display("invariant violation: {0}")]
    InvariantViolation(&'static str),
}

impl ::std::error::Error for Error {}

/// Convenience alias used throughout the crate.
pub type Result<T> = ::std::result::Result<T, Error>;
