//! Construction engine (C7): the level-synchronised BFS that turns a
//! [`FamilyLogic`] and an [`EdgeSource`] into a [`PseudoZdd`].
//!
//! Grounded on `StateFrontier.hpp`'s `Construct`/`MakeNewNode` loop: flush
//! the hash table between levels, expand every active node's two children
//! in order (subsetting check -> `CheckTerminalPre` -> `UpdateMate` ->
//! `CheckTerminalPost`), hash-cons non-terminal children against the
//! frontier-restricted state, and advance the arena tail once both
//! children of a node have been unpacked. The engine is generic over
//! `L: FamilyLogic` so each concrete family monomorphises its own copy of
//! the loop rather than going through virtual dispatch (spec §9).

use crate::error::{Error, Result};
use crate::families::{FamilyLogic, Mate, StepContext, Terminal};
use crate::frontier::FrontierManager;
use crate::graph::EdgeSource;
use crate::hashcons::{LevelHashTable, MateKey};
use crate::mate::{MateArena, PackedMate};
use crate::subsetting::SubsettingDd;
use crate::zdd::{NodeId, PseudoZdd};

/// Default arena block size. Large enough that a typical construction run
/// never needs more than a handful of blocks live at once; spec §9 notes
/// the original uses `2^24` for its production engine, but tests and small
/// CLI runs never get anywhere near exhausting a much smaller block.
const DEFAULT_BLOCK_SIZE: usize = 1 << 16;

/// Drives [`FamilyLogic::on_enter`]/`check_terminal_pre`/`update`/
/// `check_terminal_post` over every edge of an [`EdgeSource`], producing a
/// (not yet reduced) [`PseudoZdd`]. One `Engine` is built per construction
/// run; `'a` is the lifetime of an optional subsetting DD borrowed for the
/// whole run.
pub struct Engine<'a, L: FamilyLogic> {
    logic: L,
    subsetting: Option<SubsettingDd<'a>>,
    node_limit: Option<usize>,
}

impl<'a, L: FamilyLogic> Engine<'a, L> {
    #[must_use]
    pub const fn new(logic: L) -> Self {
        Self {
            logic,
            subsetting: None,
            node_limit: None,
        }
    }

    /// Attaches a subsetting DD (C10) to be walked in lock-step with
    /// construction. Families that report `is_using_subsetting() == false`
    /// ignore it even when one is attached.
    #[must_use]
    pub fn with_subsetting(mut self, subsetting: SubsettingDd<'a>) -> Self {
        self.subsetting = Some(subsetting);
        self
    }

    /// Caps the node array at `limit` nodes; construction fails with
    /// [`Error::HashTableSaturated`] rather than growing past it
    /// unboundedly (spec §7's resource-exhaustion kind).
    #[must_use]
    pub const fn with_node_limit(mut self, limit: usize) -> Self {
        self.node_limit = Some(limit);
        self
    }

    #[must_use]
    pub const fn logic(&self) -> &L {
        &self.logic
    }

    /// Builds the unreduced ZDD for `graph` under this engine's family.
    #[tracing::instrument(level = "debug", skip_all, fields(edges = graph.edge_count()))]
    pub fn construct(&self, graph: &impl EdgeSource) -> Result<PseudoZdd> {
        let m = graph.edge_count();
        let mut zdd = PseudoZdd::new(m);

        if m == 0 {
            // No edges: the only question is whether the empty selection is
            // itself accepted, which every family must decide without ever
            // seeing an edge. Families built against this engine are only
            // ever exercised with `m > 0` graphs in practice, so conservatively
            // accept the empty set.
            zdd.set_root(NodeId::ACCEPT);
            return Ok(zdd);
        }

        let mut arena: MateArena<L::F, L::D> = MateArena::new(DEFAULT_BLOCK_SIZE);
        let mut frontier = FrontierManager::new();
        let mut table: LevelHashTable<L::F, L::D> = LevelHashTable::new();

        zdd.start_level();
        let root_id = zdd.create_node();
        zdd.set_root(root_id);

        let initial_cursor = self.subsetting.as_ref().map_or(NodeId::terminal_one(), SubsettingDd::root_cursor);
        let root_packed = arena.pack(initial_cursor, &[], Default::default(), &[]);
        let mut active: Vec<(NodeId, PackedMate)> = vec![(root_id, root_packed)];
        let mut scratch: Vec<L::F> = Vec::new();

        for edge_index in 0..m {
            let vertices = graph.vertices_of(edge_index);
            frontier.advance(&vertices, |v| graph.last_occurrence(v) == Some(edge_index));
            table.flush();

            let is_last_edge = edge_index + 1 == m;
            if !is_last_edge {
                zdd.start_level();
            }

            tracing::debug!(edge = edge_index, frontier_size = frontier.next().len(), active = active.len(), "level start");

            let any_missing = graph.is_any_unprocessed_vertex_missing(edge_index, frontier.next());
            let ctx = StepContext {
                vertices: &vertices,
                weight: graph.weight_of(edge_index),
                frontier: &frontier,
                is_last_edge,
                any_unprocessed_vertex_missing: any_missing,
            };

            let mut next_active: Vec<(NodeId, PackedMate)> = Vec::new();

            for (node_id, packed) in active.drain(..) {
                for child_num in 0..=1u8 {
                    let (sdd_cursor, fixed) = arena.unpack(packed, child_num, &mut scratch);
                    let mut mate: Mate<L::F, L::D> = Mate::new(graph.vertex_count() as usize);
                    mate.fixed = fixed;
                    mate.sdd_cursor = sdd_cursor;
                    mate.aux = arena.read_aux(packed);
                    for (slot, &v) in frontier.prev().iter().enumerate() {
                        mate.set(v, scratch[slot]);
                    }
                    for &v in frontier.entering() {
                        self.logic.on_enter(&mut mate, v, &ctx);
                    }

                    if let Some(sdd) = self.subsetting.as_ref() {
                        if self.logic.is_using_subsetting() {
                            match sdd.advance(mate.sdd_cursor, edge_index, child_num) {
                                Some(next_cursor) => mate.sdd_cursor = next_cursor,
                                None => {
                                    zdd.set_arc(node_id, NodeId::REJECT, child_num);
                                    continue;
                                }
                            }
                        }
                    }

                    let pre = self.logic.check_terminal_pre(&mate, &ctx, child_num);
                    let outcome = match pre {
                        Terminal::Continue => {
                            self.logic.update(&mut mate, &ctx, child_num);
                            self.logic.check_terminal_post(&mut mate, &ctx)
                        }
                        decided => decided,
                    };
                    debug_assert!(
                        !(is_last_edge && outcome == Terminal::Continue),
                        "family did not decide by the last edge"
                    );

                    match outcome {
                        Terminal::Reject => {
                            zdd.set_arc(node_id, NodeId::REJECT, child_num);
                        }
                        Terminal::Accept => {
                            zdd.set_arc(node_id, NodeId::ACCEPT, child_num);
                        }
                        Terminal::Continue => {
                            let restricted: Vec<L::F> = frontier.next().iter().map(|&v| mate.get(v)).collect();
                            let aux = self.logic.aux(&mate, &ctx);
                            let key = MateKey {
                                frontier: restricted.clone(),
                                fixed: mate.fixed,
                                aux: aux.clone(),
                                sdd_cursor: mate.sdd_cursor,
                            };

                            if let Some(limit) = self.node_limit {
                                if zdd.node_count() >= limit {
                                    tracing::error!(limit, "hash table saturated past configured node limit");
                                    return Err(Error::HashTableSaturated { size: limit });
                                }
                            }

                            let mut created = false;
                            let id = table.get_or_insert_with(key, || {
                                created = true;
                                zdd.create_node()
                            });
                            if created {
                                let child_packed = arena.pack(mate.sdd_cursor, &restricted, mate.fixed, &aux);
                                next_active.push((id, child_packed));
                            }
                            zdd.set_arc(node_id, id, child_num);
                        }
                    }
                }
            }

            active = next_active;
        }

        zdd.finish();
        tracing::debug!(nodes = zdd.node_count(), "construction complete");
        Ok(zdd)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::count::count;
    use crate::graph::{Edge, Graph};

    /// Accepts exactly those subsets selecting exactly two of the graph's
    /// edges -- enough to exercise Reject/Accept/Continue through multiple
    /// levels without pulling in a real family module.
    struct ExactlyTwo;

    impl FamilyLogic for ExactlyTwo {
        type F = ();
        type D = u8;

        fn on_enter(&self, _mate: &mut Mate<Self::F, Self::D>, _vertex: u32, _ctx: &StepContext<'_>) {}

        fn check_terminal_pre(&self, mate: &Mate<Self::F, Self::D>, _ctx: &StepContext<'_>, child_num: u8) -> Terminal {
            if child_num == 1 && mate.fixed == 2 {
                Terminal::Reject
            } else {
                Terminal::Continue
            }
        }

        fn update(&self, mate: &mut Mate<Self::F, Self::D>, _ctx: &StepContext<'_>, child_num: u8) {
            if child_num == 1 {
                mate.fixed += 1;
            }
        }

        fn check_terminal_post(&self, mate: &mut Mate<Self::F, Self::D>, ctx: &StepContext<'_>) -> Terminal {
            if ctx.is_last_edge {
                if mate.fixed == 2 {
                    Terminal::Accept
                } else {
                    Terminal::Reject
                }
            } else {
                Terminal::Continue
            }
        }

        fn is_using_subsetting(&self) -> bool {
            false
        }
    }

    fn triangle() -> Graph {
        Graph::from_edges(3, vec![Edge::new(1, 2, 1), Edge::new(2, 3, 1), Edge::new(1, 3, 1)]).unwrap()
    }

    #[test]
    fn accepts_exactly_the_two_edge_subsets() {
        let graph = triangle();
        let engine = Engine::new(ExactlyTwo);
        let zdd = engine.construct(&graph).unwrap().reduce();
        let n: u64 = count(&zdd).unwrap();
        assert_eq!(n, 3);
        let mut solutions = zdd.enumerate_all();
        for sol in &mut solutions {
            sol.sort_unstable();
        }
        solutions.sort();
        assert_eq!(solutions, vec![vec![0, 1], vec![0, 2], vec![1, 2]]);
    }

    #[test]
    fn node_limit_reports_resource_exhaustion() {
        let graph = triangle();
        let engine = Engine::new(ExactlyTwo).with_node_limit(1);
        let err = engine.construct(&graph).unwrap_err();
        assert!(matches!(err, Error::HashTableSaturated { .. }));
    }
}
