//! Level-scoped hash-consing table (C5): flushed between levels so lookups
//! only ever see state inserted at the current level.
//!
//! Grounded on `HashTable.hpp`'s `Set`/`Get`/`Flush`/`Expand` contract,
//! rebuilt atop `hashbrown::HashMap` (already a workspace dependency for
//! adjacency maps) rather than a hand-rolled open-addressed array.

use std::hash::{Hash, Hasher};

use hashbrown::HashMap;

use crate::mate::packed::{mix_hash, HASH_MULTIPLIER};
use crate::zdd::NodeId;

/// The equality key for hash-consing: the frontier-ordered `F` values, the
/// fixed scalar `D`, the flattened auxiliary region, and the subsetting
/// cursor. Two states with the same key are the same ZDD node after
/// canonical relabelling (§3) -- the cursor is included because two
/// otherwise-identical frontier states that have advanced to different
/// positions in the subsetting DD (C10) can diverge later, mirroring
/// `MateS::Equals`, which compares `sdd` alongside the family-specific
/// fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MateKey<F, D> {
    pub frontier: Vec<F>,
    pub fixed: D,
    pub aux: Vec<u32>,
    pub sdd_cursor: NodeId,
}

impl<F: Hash, D: Hash> Hash for MateKey<F, D> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Pre-mixed with a fixed multiplier rather than delegating
        // field-by-field to the `Hasher` -- see `mate::packed::mix_hash`.
        state.write_u64(mix_hash(&self.frontier, &self.fixed, &self.aux));
        state.write_u64(self.sdd_cursor.0.into());
        state.write_u64(HASH_MULTIPLIER); // avoid a degenerate all-same-bucket seed
    }
}

/// Open-addressing semantics implemented as a `HashMap`
/// wrapped in an epoch counter: `flush()` bumps the epoch instead of
/// clearing the table, so entries from the previous level are simply
/// ignored rather than removed -- removal happens lazily, amortised across
/// the whole run, by `HashMap`'s own growth policy.
pub struct LevelHashTable<F, D> {
    table: HashMap<MateKey<F, D>, (u64, NodeId)>,
    epoch: u64,
}

impl<F: Eq + Hash + Clone, D: Eq + Hash + Clone> LevelHashTable<F, D> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            table: HashMap::new(),
            epoch: 1,
        }
    }

    /// Advances to the next level's epoch. Old entries become invisible to
    /// [`Self::get`] without being physically removed.
    pub fn flush(&mut self) {
        self.epoch += 1;
        // Mirrors the original's "resize when the *current* level's
        // occupancy exceeds 50%" policy: once live (this-epoch) entries
        // accumulate to more than half the backing capacity, reclaim the
        // stale slots by rebuilding rather than growing unboundedly.
        if self.table.len() > self.table.capacity() / 2 {
            self.table.retain(|_, &mut (e, _)| e == self.epoch - 1);
            self.table.shrink_to_fit();
        }
    }

    /// Looks up `key` at the current epoch. Returns the existing node id on
    /// a hit; on a miss, inserts `key -> node` at the current epoch and
    /// returns `None`.
    pub fn get_or_insert(&mut self, key: MateKey<F, D>, node: NodeId) -> Option<NodeId> {
        if let Some(&(epoch, id)) = self.table.get(&key) {
            if epoch == self.epoch {
                return Some(id);
            }
        }
        self.table.insert(key, (self.epoch, node));
        None
    }

    /// Looks up `key` at the current epoch; on a miss, calls `make` to
    /// obtain a node id and inserts it. Lets the caller defer creating (and
    /// packing) a speculative node until a miss is confirmed, avoiding the
    /// pack-then-revert dance a pre-built hash key doesn't need.
    pub fn get_or_insert_with(&mut self, key: MateKey<F, D>, make: impl FnOnce() -> NodeId) -> NodeId {
        if let Some(&(epoch, id)) = self.table.get(&key) {
            if epoch == self.epoch {
                return id;
            }
        }
        let id = make();
        self.table.insert(key, (self.epoch, id));
        id
    }

    #[must_use]
    pub fn live_len(&self) -> usize {
        let epoch = self.epoch;
        self.table.iter().filter(|&(_, &(e, _))| e == epoch).count()
    }
}

impl<F: Eq + Hash + Clone, D: Eq + Hash + Clone> Default for LevelHashTable<F, D> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_insert_misses_second_hits() {
        let mut table: LevelHashTable<i32, u32> = LevelHashTable::new();
        let key = MateKey {
            frontier: vec![1, 2],
            fixed: 0,
            aux: vec![],
            sdd_cursor: NodeId::terminal_one(),
        };
        assert_eq!(table.get_or_insert(key.clone(), NodeId(5)), None);
        assert_eq!(table.get_or_insert(key, NodeId(6)), Some(NodeId(5)));
    }

    #[test]
    fn flush_hides_previous_level_entries() {
        let mut table: LevelHashTable<i32, u32> = LevelHashTable::new();
        let key = MateKey {
            frontier: vec![1],
            fixed: 0,
            aux: vec![],
            sdd_cursor: NodeId::terminal_one(),
        };
        table.get_or_insert(key.clone(), NodeId(2));
        table.flush();
        assert_eq!(table.get_or_insert(key, NodeId(3)), None);
    }

    #[test]
    fn distinct_aux_regions_are_distinct_keys() {
        let mut table: LevelHashTable<i32, u32> = LevelHashTable::new();
        let a = MateKey {
            frontier: vec![1],
            fixed: 0,
            aux: vec![7],
            sdd_cursor: NodeId::terminal_one(),
        };
        let b = MateKey {
            frontier: vec![1],
            fixed: 0,
            aux: vec![8],
            sdd_cursor: NodeId::terminal_one(),
        };
        assert_eq!(table.get_or_insert(a, NodeId(2)), None);
        assert_eq!(table.get_or_insert(b, NodeId(3)), None);
    }
}
