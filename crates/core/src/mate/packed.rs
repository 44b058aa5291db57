//! Mate pack/unpack (C3): the arena-backed snapshot taken of a node's
//! frontier state, plus the generic `Mate` container families mutate during
//! a transition.
//!
//! Grounded on `Mate.hpp`'s `MateS`/`MateF`/`MateFD`/`MateFDV1` layering:
//! an always-present subsetting cursor, a per-frontier-vertex record `F`, an
//! optional fixed scalar `D`, and an optional variable-length auxiliary
//! region (flattened here into a flat `u32` arena with an explicit
//! `(start, len)` table per component rather than the original's `9999`
//! sentinel -- see `DESIGN.md`'s Open Question resolution).

use super::arena::RBuffer;
use crate::zdd::NodeId;

/// Multiplier used to combine the four mate regions into one hash, per
/// spec §4.3 (chosen in the original to avoid collisions dominated by
/// low-entropy fields).
pub const HASH_MULTIPLIER: u64 = 15_284_356_289;

/// The arena-resident coordinates of one node's packed mate. Indices are
/// only valid until the construction engine's tail cursor passes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PackedMate {
    pub sdd_pos: usize,
    pub frontier_pos: usize,
    pub frontier_len: usize,
    pub fixed_pos: usize,
    pub aux_pos: usize,
    pub aux_len: usize,
}

/// Owns the four arena buffers backing [`PackedMate`] snapshots for one
/// family. `F` is the per-frontier-vertex record, `D` the fixed scalar.
/// The auxiliary region is a flat `u32` buffer; families that don't use it
/// (most of them) simply never call [`Self::pack`] with a non-empty `aux`
/// slice.
pub struct MateArena<F, D> {
    sdd: RBuffer<NodeId>,
    frontier: RBuffer<F>,
    fixed: RBuffer<D>,
    aux: RBuffer<u32>,
}

impl<F: Copy + Default, D: Copy + Default> MateArena<F, D> {
    #[must_use]
    pub fn new(block_size: usize) -> Self {
        Self {
            sdd: RBuffer::new(block_size),
            frontier: RBuffer::new(block_size),
            fixed: RBuffer::new(block_size),
            aux: RBuffer::new(block_size),
        }
    }

    /// Packs one node's worth of state: the subsetting cursor, the
    /// frontier-ordered slice of `F` values, the fixed scalar, and a flat
    /// auxiliary slice (empty for families with no `V` region).
    pub fn pack(&mut self, sdd_cursor: NodeId, frontier: &[F], fixed: D, aux: &[u32]) -> PackedMate {
        let sdd_pos = self.sdd.write_and_advance_head(sdd_cursor);
        let frontier_pos = self.frontier.write_run_and_advance_head(frontier);
        let fixed_pos = self.fixed.write_and_advance_head(fixed);
        let aux_pos = self.aux.write_run_and_advance_head(aux);
        PackedMate {
            sdd_pos,
            frontier_pos,
            frontier_len: frontier.len(),
            fixed_pos,
            aux_pos,
            aux_len: aux.len(),
        }
    }

    /// Inverts [`Self::pack`], writing the frontier slice into `out`
    /// (caller-sized to `packed.frontier_len`). On `child_num == 1` the
    /// tails of all four buffers advance, releasing the parent's bytes --
    /// the `child_num == 0` call leaves them in place since the `Hi` call
    /// re-reads the same parent next.
    pub fn unpack(&mut self, packed: PackedMate, child_num: u8, out: &mut Vec<F>) -> (NodeId, D) {
        let sdd_cursor = self.sdd.value_from_tail(packed.sdd_pos - self.sdd.tail_index());
        let fixed = self.fixed.value_from_tail(packed.fixed_pos - self.fixed.tail_index());
        out.clear();
        for i in 0..packed.frontier_len {
            out.push(self.frontier.value_from_tail(packed.frontier_pos + i - self.frontier.tail_index()));
        }

        if child_num == 1 {
            self.sdd.advance_tail(1);
            self.frontier.advance_tail(packed.frontier_len);
            self.fixed.advance_tail(1);
            self.aux.advance_tail(packed.aux_len);
        }

        (sdd_cursor, fixed)
    }

    /// Reads the auxiliary slice without consuming it (call after
    /// [`Self::unpack`]; the tail only advances together with the other
    /// three regions).
    #[must_use]
    pub fn read_aux(&self, packed: PackedMate) -> Vec<u32> {
        (0..packed.aux_len)
            .map(|i| self.aux.value_from_tail(packed.aux_pos + i - self.aux.tail_index()))
            .collect()
    }

    /// Undoes the most recent [`Self::pack`] call (all four regions),
    /// called when a speculative child turned out to be a terminal.
    pub fn revert(&mut self, packed: PackedMate) {
        self.aux.back_head(packed.aux_len);
        self.fixed.back_head(1);
        self.frontier.back_head(packed.frontier_len);
        self.sdd.back_head(1);
    }
}

/// Combines a frontier slice, fixed scalar, and auxiliary slice into the
/// hash spec §4.3 describes, so [`crate::hashcons::LevelHashTable`] can use
/// it directly without re-deriving the mixing rule per family.
pub fn mix_hash<F: std::hash::Hash, D: std::hash::Hash>(frontier: &[F], fixed: &D, aux: &[u32]) -> u64 {
    use std::hash::{Hash, Hasher};

    struct Mixer(u64);
    impl Hasher for Mixer {
        fn finish(&self) -> u64 {
            self.0
        }
        fn write(&mut self, bytes: &[u8]) {
            for &b in bytes {
                self.0 = self.0.wrapping_mul(HASH_MULTIPLIER).wrapping_add(u64::from(b));
            }
        }
    }

    let mut mixer = Mixer(0);
    for f in frontier {
        f.hash(&mut mixer);
    }
    fixed.hash(&mut mixer);
    aux.hash(&mut mixer);
    mixer.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_unpack_round_trips_frontier_and_fixed() {
        let mut arena: MateArena<i32, u32> = MateArena::new(8);
        let packed = arena.pack(NodeId::terminal_one(), &[1, 2, 3], 7, &[]);
        let mut out = Vec::new();
        let (sdd, fixed) = arena.unpack(packed, 0, &mut out);
        assert_eq!(sdd, NodeId::terminal_one());
        assert_eq!(fixed, 7);
        assert_eq!(out, vec![1, 2, 3]);
    }

    #[test]
    fn child_one_unpack_advances_tail() {
        let mut arena: MateArena<i32, u32> = MateArena::new(8);
        let packed = arena.pack(NodeId::terminal_zero(), &[9], 0, &[]);
        let mut out = Vec::new();
        arena.unpack(packed, 0, &mut out);
        arena.unpack(packed, 1, &mut out);
        assert_eq!(arena.frontier.tail_index(), 1);
    }

    #[test]
    fn revert_undoes_pack() {
        let mut arena: MateArena<i32, u32> = MateArena::new(8);
        arena.pack(NodeId::terminal_zero(), &[1, 2], 0, &[]);
        let packed = arena.pack(NodeId::terminal_zero(), &[3, 4], 0, &[]);
        arena.revert(packed);
        assert_eq!(arena.frontier.head_index(), 2);
    }

    #[test]
    fn aux_round_trips_through_read_aux() {
        let mut arena: MateArena<i32, u32> = MateArena::new(8);
        let packed = arena.pack(NodeId::terminal_zero(), &[1], 0, &[10, 20, 30]);
        let mut out = Vec::new();
        arena.unpack(packed, 0, &mut out);
        assert_eq!(arena.read_aux(packed), vec![10, 20, 30]);
    }
}
