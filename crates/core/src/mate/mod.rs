//! Mate abstraction (C3) and its arena backing store (C4).

pub mod arena;
pub mod packed;

pub use arena::RBuffer;
pub use packed::{mix_hash, MateArena, PackedMate, HASH_MULTIPLIER};
