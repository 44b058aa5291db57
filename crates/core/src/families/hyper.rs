//! Hypergraph families: set partition/cover/packing and the hyper-edge
//! generalisations of the component-merge families (spanning forest,
//! reliability).
//!
//! Grounded on `MateSetPartition.cpp`/`MateSetCover.cpp` for the cover
//! families and `MateHyperSForest.cpp`/`MateHyperReli.cpp` for the
//! component-merge ones. A hyper-edge's incident vertices are whatever
//! [`StepContext::vertices`] holds for the current step -- unlike the
//! two-endpoint families, these never call `edge_endpoints()`.

use super::{FamilyLogic, Mate, StepContext, Terminal};

/// Per-vertex record for the cover families: has some selected hyper-edge
/// already covered this vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct HyperCoverMate {
    pub covered: bool,
}

/// `setpt` (every vertex covered by exactly one edge), `setc` (at least
/// one), `setpk` (at most one).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoverMode {
    Partition,
    Cover,
    Packing,
}

pub struct HyperCoverFamily {
    pub mode: CoverMode,
}

impl HyperCoverFamily {
    #[must_use]
    pub const fn new(mode: CoverMode) -> Self {
        Self { mode }
    }

    const fn requires_overlap_check(&self) -> bool {
        matches!(self.mode, CoverMode::Partition | CoverMode::Packing)
    }

    const fn requires_completeness(&self) -> bool {
        matches!(self.mode, CoverMode::Partition | CoverMode::Cover)
    }
}

impl FamilyLogic for HyperCoverFamily {
    type F = HyperCoverMate;
    type D = ();

    fn on_enter(&self, mate: &mut Mate<Self::F, Self::D>, vertex: u32, _ctx: &StepContext<'_>) {
        mate.set(vertex, HyperCoverMate::default());
    }

    /// `MateSetPartition::CheckTerminalPre` does both of its checks before
    /// `Update` ever runs, against the mate value the edge's selection
    /// *would* produce; this mirrors that rather than deferring the
    /// completeness check to `check_terminal_post`.
    fn check_terminal_pre(&self, mate: &Mate<Self::F, Self::D>, ctx: &StepContext<'_>, child_num: u8) -> Terminal {
        if child_num == 1 && self.requires_overlap_check() && ctx.vertices.iter().any(|&v| mate.get(v).covered) {
            return Terminal::Reject;
        }
        if self.requires_completeness() {
            for &v in ctx.frontier.leaving() {
                let will_be_covered = mate.get(v).covered || (child_num == 1 && ctx.vertices.contains(&v));
                if !will_be_covered {
                    return Terminal::Reject;
                }
            }
        }
        Terminal::Continue
    }

    fn update(&self, mate: &mut Mate<Self::F, Self::D>, ctx: &StepContext<'_>, child_num: u8) {
        if child_num == 1 {
            for &v in ctx.vertices {
                mate.set(v, HyperCoverMate { covered: true });
            }
        }
    }

    fn check_terminal_post(&self, _mate: &mut Mate<Self::F, Self::D>, ctx: &StepContext<'_>) -> Terminal {
        if ctx.is_last_edge {
            Terminal::Accept
        } else {
            Terminal::Continue
        }
    }
}

/// Per-vertex record shared by the forest and reliability families: the id
/// (by representative vertex) of the component this vertex currently
/// belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct HyperComponentMate {
    pub label: u32,
}

/// Collects the distinct labels `vertices` currently carry, in
/// first-seen order.
fn distinct_labels<D>(mate: &Mate<HyperComponentMate, D>, vertices: &[u32]) -> Vec<u32> {
    let mut labels = Vec::new();
    for &v in vertices {
        let l = mate.get(v).label;
        if !labels.contains(&l) {
            labels.push(l);
        }
    }
    labels
}

/// Relabels every frontier vertex carrying one of `old_labels` to
/// `new_label`.
fn relabel(mate: &mut Mate<HyperComponentMate, ()>, candidates: &[u32], old_labels: &[u32], new_label: u32) {
    for &w in candidates {
        if old_labels.contains(&mate.get(w).label) {
            mate.set(w, HyperComponentMate { label: new_label });
        }
    }
}

/// `hforest`: counts hyper-edge subsets whose selected edges never close a
/// cycle. Grounded on `MateHyperSForest.cpp`, which (despite the "S" in its
/// name) never checks spanning-ness, only acyclicity -- the commented-out
/// `number_of_components_` bookkeeping in the original is dead code, and
/// this crate follows what the original actually executes rather than what
/// its name suggests.
pub struct HyperForestFamily;

impl FamilyLogic for HyperForestFamily {
    type F = HyperComponentMate;
    type D = ();

    fn on_enter(&self, mate: &mut Mate<Self::F, Self::D>, vertex: u32, _ctx: &StepContext<'_>) {
        mate.set(vertex, HyperComponentMate { label: vertex });
    }

    fn check_terminal_pre(&self, mate: &Mate<Self::F, Self::D>, ctx: &StepContext<'_>, child_num: u8) -> Terminal {
        if child_num == 1 && distinct_labels(mate, ctx.vertices).len() < ctx.vertices.len() {
            // Two endpoints of this hyper-edge already share a component:
            // selecting it would close a cycle.
            return Terminal::Reject;
        }
        Terminal::Continue
    }

    fn update(&self, mate: &mut Mate<Self::F, Self::D>, ctx: &StepContext<'_>, child_num: u8) {
        if child_num == 0 {
            return;
        }
        let old_labels = distinct_labels(mate, ctx.vertices);
        let new_label = old_labels.iter().copied().min().unwrap_or(0);
        relabel(mate, ctx.frontier.both(), &old_labels, new_label);
    }

    fn check_terminal_post(&self, _mate: &mut Mate<Self::F, Self::D>, ctx: &StepContext<'_>) -> Terminal {
        if ctx.is_last_edge {
            Terminal::Accept
        } else {
            Terminal::Continue
        }
    }
}

/// Extracts the member list of `label`'s record from a flattened
/// `[label, count, members...]*` auxiliary stream, removing it in place.
/// This is the offset-pair scheme `DESIGN.md` describes: each record's own
/// `count` field is its length, and the record's start is wherever the scan
/// finds `label`, so no separate side table is needed.
fn take_record(aux: &mut Vec<u32>, label: u32) -> Vec<u32> {
    let mut i = 0;
    while i < aux.len() {
        let rec_label = aux[i];
        let count = aux[i + 1] as usize;
        if rec_label == label {
            let members = aux[i + 2..i + 2 + count].to_vec();
            aux.drain(i..i + 2 + count);
            return members;
        }
        i += 2 + count;
    }
    Vec::new()
}

fn push_record(aux: &mut Vec<u32>, label: u32, members: &[u32]) {
    if members.is_empty() {
        return;
    }
    aux.push(label);
    aux.push(u32::try_from(members.len()).unwrap_or(u32::MAX));
    aux.extend_from_slice(members);
}

/// `hreli`: accepts hyper-edge subsets under which every vertex in
/// `terminals` ends up in one common component, rejecting a subset the
/// instant some (but not all) of those vertices seal into a component that
/// can never grow further -- and accepting early, without examining
/// remaining edges, the instant a single sealed component already holds
/// every one of them. Grounded on `MateHyperReli.cpp`'s `CheckTerminalPost`
/// and its `vset`/`FindComponentNumber` machinery, reworked onto
/// [`Mate::aux`] instead of a parallel array of `vector<mate_t>*`.
pub struct HyperReliFamily {
    pub terminals: Vec<u32>,
}

impl HyperReliFamily {
    #[must_use]
    pub fn new(terminals: Vec<u32>) -> Self {
        Self { terminals }
    }
}

impl FamilyLogic for HyperReliFamily {
    type F = HyperComponentMate;
    type D = ();

    fn on_enter(&self, mate: &mut Mate<Self::F, Self::D>, vertex: u32, _ctx: &StepContext<'_>) {
        mate.set(vertex, HyperComponentMate { label: vertex });
        if self.terminals.contains(&vertex) {
            push_record(&mut mate.aux, vertex, &[vertex]);
        }
    }

    /// The original explicitly skips the cycle check this family's
    /// sibling (`MateHyperSForest`) performs: reliability counts every
    /// edge subset, redundant cycles included, and only cares whether the
    /// terminal set ends up connected.
    fn check_terminal_pre(&self, _mate: &Mate<Self::F, Self::D>, _ctx: &StepContext<'_>, _child_num: u8) -> Terminal {
        Terminal::Continue
    }

    fn update(&self, mate: &mut Mate<Self::F, Self::D>, ctx: &StepContext<'_>, child_num: u8) {
        if child_num == 0 {
            return;
        }
        let old_labels = distinct_labels(mate, ctx.vertices);
        if old_labels.len() <= 1 {
            return;
        }
        let new_label = old_labels.iter().copied().min().unwrap_or(0);
        let mut combined = Vec::new();
        for &label in &old_labels {
            combined.extend(take_record(&mut mate.aux, label));
        }
        push_record(&mut mate.aux, new_label, &combined);
        relabel(mate, ctx.frontier.both(), &old_labels, new_label);
    }

    fn check_terminal_post(&self, mate: &mut Mate<Self::F, Self::D>, ctx: &StepContext<'_>) -> Terminal {
        for &v in ctx.frontier.leaving() {
            let label = mate.get(v).label;
            let alive_elsewhere = ctx.frontier.next().iter().any(|&w| mate.get(w).label == label);
            if alive_elsewhere {
                continue;
            }
            let members = take_record(&mut mate.aux, label);
            if self.terminals.is_empty() {
                continue;
            }
            let is_same = !members.is_empty();
            let is_different = members.len() < self.terminals.len();
            if is_same && is_different {
                return Terminal::Reject;
            }
            if is_same {
                return Terminal::Accept;
            }
        }
        if ctx.is_last_edge {
            return Terminal::Accept;
        }
        Terminal::Continue
    }

    fn aux(&self, mate: &Mate<Self::F, Self::D>, _ctx: &StepContext<'_>) -> Vec<u32> {
        mate.aux.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::count::count;
    use crate::engine::Engine;
    use crate::graph::{HyperEdge, HyperGraph};

    /// Two edges {1,2} and {3,4} covering a 4-vertex set: set-partition
    /// accepts only the all-both selection, since neither edge alone
    /// covers every vertex.
    fn two_disjoint_edges() -> HyperGraph {
        HyperGraph::from_edges(
            4,
            vec![
                HyperEdge {
                    vertices: vec![1, 2],
                    weight: 1,
                },
                HyperEdge {
                    vertices: vec![3, 4],
                    weight: 1,
                },
            ],
        )
        .unwrap()
    }

    #[test]
    fn set_partition_requires_every_disjoint_edge_selected() {
        let graph = two_disjoint_edges();
        let family = HyperCoverFamily::new(CoverMode::Partition);
        let engine = Engine::new(family);
        let zdd = engine.construct(&graph).unwrap().reduce();
        let n: u64 = count(&zdd).unwrap();
        assert_eq!(n, 1);
    }

    #[test]
    fn set_cover_accepts_either_edge_alone_when_covering_is_impossible_otherwise() {
        // Overlapping hyper-edges {1,2,3} and {2,3,4} over 4 vertices: set
        // cover accepts any selection that leaves no vertex uncovered,
        // including both edges together, but not the empty selection.
        let graph = HyperGraph::from_edges(
            4,
            vec![
                HyperEdge {
                    vertices: vec![1, 2, 3],
                    weight: 1,
                },
                HyperEdge {
                    vertices: vec![2, 3, 4],
                    weight: 1,
                },
            ],
        )
        .unwrap();
        let family = HyperCoverFamily::new(CoverMode::Cover);
        let engine = Engine::new(family);
        let zdd = engine.construct(&graph).unwrap().reduce();
        let n: u64 = count(&zdd).unwrap();
        // Neither edge alone covers vertex 1 or vertex 4 respectively, so
        // only the both-selected subset is a valid cover.
        assert_eq!(n, 1);
    }

    #[test]
    fn set_packing_forbids_overlapping_edges() {
        let graph = HyperGraph::from_edges(
            3,
            vec![
                HyperEdge {
                    vertices: vec![1, 2],
                    weight: 1,
                },
                HyperEdge {
                    vertices: vec![2, 3],
                    weight: 1,
                },
            ],
        )
        .unwrap();
        let family = HyperCoverFamily::new(CoverMode::Packing);
        let engine = Engine::new(family);
        let zdd = engine.construct(&graph).unwrap().reduce();
        // Both edges share vertex 2: selecting both is forbidden, leaving
        // the empty selection and each edge alone -- three subsets.
        let n: u64 = count(&zdd).unwrap();
        assert_eq!(n, 3);
    }

    #[test]
    fn hyper_forest_rejects_edge_closing_a_cycle() {
        // Edges {1,2,3} then {1,3}: the second edge's endpoints already
        // share a component once the first is selected, so selecting both
        // closes a cycle.
        let graph = HyperGraph::from_edges(
            3,
            vec![
                HyperEdge {
                    vertices: vec![1, 2, 3],
                    weight: 1,
                },
                HyperEdge {
                    vertices: vec![1, 3],
                    weight: 1,
                },
            ],
        )
        .unwrap();
        let family = HyperForestFamily;
        let engine = Engine::new(family);
        let zdd = engine.construct(&graph).unwrap().reduce();
        let solutions = zdd.enumerate_all();
        assert!(solutions.iter().all(|sol| !(sol.contains(&0) && sol.contains(&1))));
    }

    #[test]
    fn hyper_reliability_accepts_only_when_terminals_share_a_component() {
        let graph = HyperGraph::from_edges(
            3,
            vec![
                HyperEdge {
                    vertices: vec![1, 2],
                    weight: 1,
                },
                HyperEdge {
                    vertices: vec![2, 3],
                    weight: 1,
                },
            ],
        )
        .unwrap();
        let family = HyperReliFamily::new(vec![1, 3]);
        let engine = Engine::new(family);
        let zdd = engine.construct(&graph).unwrap().reduce();
        let solutions = zdd.enumerate_all();
        // 1 and 3 share a component only when both edges are selected.
        assert_eq!(solutions, vec![vec![0, 1]]);
    }
}
