//! PseudoZDD container (C8): the node array, per-level offsets, reduction,
//! and the text/Graphviz/Sapporo-BDD export formats.
//!
//! Grounded on `PseudoZDD.hpp`'s `ReduceAsZDD`, `OutputZDD`,
//! `OutputZDDForGraphviz`, and `OutputZDDForSapporoBDD`.

use std::fmt::Write as _;

use hashbrown::HashMap;

use crate::error::{Error, Result};

/// Index into [`PseudoZdd`]'s node array. `0` and `1` are the fixed reject
/// and accept terminals; every other value indexes a real node.
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const REJECT: Self = Self(0);
    pub const ACCEPT: Self = Self(1);

    #[must_use]
    pub const fn terminal_zero() -> Self {
        Self::REJECT
    }

    #[must_use]
    pub const fn terminal_one() -> Self {
        Self::ACCEPT
    }

    #[must_use]
    pub const fn is_terminal(self) -> bool {
        self.0 <= 1
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// One ZDD node: two arcs to other nodes or to a terminal.
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Node {
    pub lo: NodeId,
    pub hi: NodeId,
}

/// Node array plus per-level offsets (C8). Indices `0`/`1` are reserved
/// placeholders for the reject/accept terminals; real nodes start at index
/// `2`, matching the convention the original sources use so level math
/// reads the same way.
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PseudoZdd {
    nodes: Vec<Node>,
    /// `level_first[i]` is the first node index at level `i` (0-based,
    /// corresponding to the spec's 1-based edge `i + 1`); `level_first.last()`
    /// is the half-open upper bound of the deepest level. Populated by
    /// matched `start_level()`/`finish()` calls, one `start_level()` per
    /// level before its nodes are created.
    level_first: Vec<usize>,
    root: NodeId,
    num_vars: usize,
    reduced: bool,
}

impl PseudoZdd {
    #[must_use]
    pub fn new(num_vars: usize) -> Self {
        Self {
            nodes: vec![
                Node {
                    lo: NodeId::REJECT,
                    hi: NodeId::REJECT,
                },
                Node {
                    lo: NodeId::ACCEPT,
                    hi: NodeId::ACCEPT,
                },
            ],
            level_first: Vec::new(),
            root: NodeId::REJECT,
            num_vars,
            reduced: false,
        }
    }

    #[must_use]
    pub fn num_vars(&self) -> usize {
        self.num_vars
    }

    #[must_use]
    pub fn is_reduced(&self) -> bool {
        self.reduced
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn node(&self, id: NodeId) -> Node {
        self.nodes[id.index()]
    }

    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Sets the root node id, called once by the construction engine right
    /// after the root node (or terminal, for a zero-edge graph) is known.
    pub fn set_root(&mut self, root: NodeId) {
        self.root = root;
    }

    /// Records the start of a new level (called by the engine before
    /// expanding the nodes of the previous level).
    pub fn start_level(&mut self) {
        self.level_first.push(self.nodes.len());
    }

    /// Closes out construction once the last edge's level has been fully
    /// expanded.
    pub fn finish(&mut self) {
        self.level_first.push(self.nodes.len());
    }

    /// Allocates a fresh non-terminal node with placeholder arcs, returning
    /// its id. The engine fills in the arcs with [`Self::set_arc`] once
    /// both children are known.
    pub fn create_node(&mut self) -> NodeId {
        let id = NodeId(u32::try_from(self.nodes.len()).expect("node count exceeds u32::MAX"));
        self.nodes.push(Node {
            lo: NodeId::REJECT,
            hi: NodeId::REJECT,
        });
        id
    }

    pub fn set_arc(&mut self, node: NodeId, child: NodeId, child_num: u8) {
        let slot = &mut self.nodes[node.index()];
        if child_num == 0 {
            slot.lo = child;
        } else {
            slot.hi = child;
        }
    }

    /// Levels as half-open `[start, end)` ranges, shallowest-first.
    fn levels(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let n = self.level_first.len();
        (0..n.saturating_sub(1)).map(move |i| (self.level_first[i], self.level_first[i + 1]))
    }

    /// The 0-based level (and so the 0-based edge/variable index) a
    /// non-terminal node's decision belongs to. Used by C9's sampler and
    /// C11's enumerator to record which variable each traversed arc
    /// corresponds to.
    #[must_use]
    pub fn level_of(&self, id: NodeId) -> usize {
        debug_assert!(!id.is_terminal(), "terminals have no level");
        match self.level_first.binary_search(&id.index()) {
            Ok(level) => level,
            Err(insertion_point) => insertion_point - 1,
        }
    }

    /// Depth-first enumeration of every accepting path, each rendered as the
    /// sorted list of 0-based variable (edge) indices selected along it.
    /// Intended for small DDs (tests, CLI `--enum`) -- no sharing of work
    /// across branches beyond what the DAG itself already provides.
    #[must_use]
    pub fn enumerate_all(&self) -> Vec<Vec<usize>> {
        let mut solutions = Vec::new();
        let mut path = Vec::new();
        self.enumerate_from(self.root, &mut path, &mut solutions);
        solutions
    }

    fn enumerate_from(&self, id: NodeId, path: &mut Vec<usize>, out: &mut Vec<Vec<usize>>) {
        if id == NodeId::REJECT {
            return;
        }
        if id == NodeId::ACCEPT {
            out.push(path.clone());
            return;
        }
        let node = self.nodes[id.index()];
        let level = self.level_of(id);
        self.enumerate_from(node.lo, path, out);
        path.push(level);
        self.enumerate_from(node.hi, path, out);
        path.pop();
    }

    /// Reduces the ZDD: collapses any node with `hi == 0` to its `lo`
    /// child, and merges nodes at the same level sharing `(lo, hi)`.
    ///
    /// Two passes: the first walks levels deepest-first, canonicalising
    /// each old node index to either a terminal or the (old-indexed)
    /// representative of its equivalence class -- safe because by the time
    /// a level is processed, every node it points to has already been
    /// canonicalised. The second walks levels shallowest-first renumbering
    /// the surviving representatives into a fresh, level-contiguous array,
    /// which is what gives the result its `level_first` layout. Grounded
    /// on `PseudoZDD::ReduceAsZDD`, restructured into two explicit passes
    /// rather than reusing the node array in place.
    #[must_use]
    pub fn reduce(&self) -> Self {
        let n = self.nodes.len();
        let mut canon = vec![NodeId::REJECT; n];
        canon[0] = NodeId::REJECT;
        canon[1] = NodeId::ACCEPT;
        let mut kept = vec![false; n];

        for (start, end) in self.levels().collect::<Vec<_>>().into_iter().rev() {
            let mut seen: HashMap<(NodeId, NodeId), NodeId> = HashMap::new();
            for old_index in start..end {
                let old = self.nodes[old_index];
                let lo = canon[old.lo.index()];
                let hi = canon[old.hi.index()];
                if hi == NodeId::REJECT {
                    canon[old_index] = lo;
                } else if let Some(&existing) = seen.get(&(lo, hi)) {
                    canon[old_index] = existing;
                } else {
                    let id = NodeId(u32::try_from(old_index).unwrap());
                    seen.insert((lo, hi), id);
                    canon[old_index] = id;
                    kept[old_index] = true;
                }
            }
        }

        let mut new_nodes = vec![
            Node {
                lo: NodeId::REJECT,
                hi: NodeId::REJECT,
            },
            Node {
                lo: NodeId::ACCEPT,
                hi: NodeId::ACCEPT,
            },
        ];
        let mut final_id: HashMap<usize, NodeId> = HashMap::new();
        let mut new_level_first = Vec::with_capacity(self.level_first.len());

        for (start, end) in self.levels() {
            new_level_first.push(new_nodes.len());
            let mut next_id = new_nodes.len();
            for old_index in start..end {
                if kept[old_index] {
                    final_id.insert(old_index, NodeId(u32::try_from(next_id).unwrap()));
                    next_id += 1;
                }
            }
            for old_index in start..end {
                if kept[old_index] {
                    let old = self.nodes[old_index];
                    let resolve = |id: NodeId| -> NodeId {
                        let c = canon[id.index()];
                        if c.is_terminal() {
                            c
                        } else {
                            final_id[&c.index()]
                        }
                    };
                    new_nodes.push(Node {
                        lo: resolve(old.lo),
                        hi: resolve(old.hi),
                    });
                }
            }
        }
        new_level_first.push(new_nodes.len());

        let new_root = if self.root.is_terminal() {
            self.root
        } else {
            let c = canon[self.root.index()];
            if c.is_terminal() { c } else { final_id[&c.index()] }
        };

        Self {
            nodes: new_nodes,
            level_first: new_level_first,
            root: new_root,
            num_vars: self.num_vars,
            reduced: true,
        }
    }

    /// Line-oriented text dump: `#L` level headers (1-based), each line
    /// `id:lo,hi` in decimal or hex. Grounded on `PseudoZDD::OutputZDD`.
    #[must_use]
    pub fn export_text(&self, hex: bool) -> String {
        let mut out = String::new();
        for level in 0..self.level_first.len().saturating_sub(1) {
            let (start, end) = (self.level_first[level], self.level_first[level + 1]);
            let _ = writeln!(out, "#{}:", level + 1);
            for j in start..end {
                let node = self.nodes[j];
                if hex {
                    let _ = writeln!(out, "{j:x}:{:x},{:x}", node.lo.0, node.hi.0);
                } else {
                    let _ = writeln!(out, "{j}:{},{}", node.lo.0, node.hi.0);
                }
            }
        }
        out
    }

    #[must_use]
    pub fn export_graphviz(&self, print_zero: bool) -> String {
        let mut out = String::from("digraph zdd {\n");
        for level in 0..self.level_first.len().saturating_sub(1) {
            let (start, end) = (self.level_first[level], self.level_first[level + 1]);
            for j in start..end {
                let node = self.nodes[j];
                let _ = writeln!(out, "\tn{j} [label = \"{}, {j}\"];", level + 1);
                if print_zero || node.lo != NodeId::REJECT {
                    let _ = writeln!(out, "\tn{j} -> n{} [style = dashed];", node.lo.0);
                }
                if print_zero || node.hi != NodeId::REJECT {
                    let _ = writeln!(out, "\tn{j} -> n{};", node.hi.0);
                }
            }
            out.push_str("\t{rank = same;");
            for j in start..end {
                let _ = write!(out, " n{j};");
            }
            out.push_str("}\n");
        }
        if print_zero {
            out.push_str("\tn0 [shape = box, label = \"0\"];\n");
        }
        out.push_str("\tn1 [shape = box, label = \"1\"];\n");
        out.push_str("\t{ rank = same;");
        if print_zero {
            out.push_str(" n0;");
        }
        out.push_str(" n1 }\n}\n");
        out
    }

    /// Sapporo-BDD-compatible export: the `lo`-only chain is complemented
    /// (a `negative` bit tracked bottom-up) so the accept terminal is
    /// always reached through a positive edge. Grounded on
    /// `PseudoZDD::OutputZDDForSapporoBDD`.
    #[must_use]
    pub fn export_sapporo(&self) -> String {
        let mut out = String::new();
        let mut negative = vec![false; self.nodes.len()];
        negative[1] = true;
        let n_levels = self.level_first.len().saturating_sub(1);

        let _ = writeln!(out, "_i {n_levels}");
        out.push_str("_o 1\n");
        let _ = writeln!(out, "_n {}", self.nodes.len() - 2);

        for level in (0..self.level_first.len().saturating_sub(1)).rev() {
            let (start, end) = (self.level_first[level], self.level_first[level + 1]);
            for j in start..end {
                let node = self.nodes[j];
                negative[j] = negative[node.lo.index()];
                let lo_str = if node.lo.0 <= 1 { "F".to_string() } else { (node.lo.0 * 2).to_string() };
                let hi_str = if node.hi == NodeId::ACCEPT {
                    "T".to_string()
                } else if negative[node.hi.index()] {
                    (node.hi.0 * 2 + 1).to_string()
                } else {
                    (node.hi.0 * 2).to_string()
                };
                let _ = writeln!(out, "{} {} {} {}", j * 2, n_levels - level, lo_str, hi_str);
            }
        }
        out.push_str(if negative.get(2).copied().unwrap_or(false) { "5\n" } else { "4\n" });
        out
    }

    /// Parses [`Self::export_text`]'s format back into a `PseudoZdd`. Node
    /// ids in the dump are the node array's own indices (export writes
    /// them out directly rather than through a remap table), so import
    /// only needs to track where each `#L` header's first id falls to
    /// rebuild `level_first`.
    pub fn import_text(text: &str, num_vars: usize) -> Result<Self> {
        let mut zdd = Self::new(num_vars);
        let mut current_level_start: Option<usize> = None;
        let mut max_id = 1usize;
        let mut assignments: Vec<(usize, usize, usize)> = Vec::new();

        let parse = |s: &str, line_no: usize| -> Result<usize> {
            let s = s.trim();
            if let Some(hex) = s.strip_prefix("0x") {
                usize::from_str_radix(hex, 16)
            } else {
                s.parse::<usize>()
            }
            .map_err(|_| Error::MalformedZddText {
                line: line_no + 1,
                reason: "bad integer",
            })
        };

        for (line_no, raw_line) in text.lines().enumerate() {
            let line = raw_line.trim();
            if line.is_empty() {
                continue;
            }
            if line.starts_with('#') {
                current_level_start = None;
                continue;
            }

            let (id_part, rest) = line.split_once(':').ok_or(Error::MalformedZddText {
                line: line_no + 1,
                reason: "missing ':'",
            })?;
            let (lo_part, hi_part) = rest.split_once(',').ok_or(Error::MalformedZddText {
                line: line_no + 1,
                reason: "missing ','",
            })?;

            let id = parse(id_part, line_no)?;
            let lo = parse(lo_part, line_no)?;
            let hi = parse(hi_part, line_no)?;
            max_id = max_id.max(id).max(lo).max(hi);

            if current_level_start.is_none() {
                current_level_start = Some(id);
                zdd.level_first.push(id);
            }
            assignments.push((id, lo, hi));
        }

        if assignments.is_empty() {
            return Ok(zdd);
        }

        zdd.nodes.resize(
            max_id + 1,
            Node {
                lo: NodeId::REJECT,
                hi: NodeId::REJECT,
            },
        );
        for (id, lo, hi) in assignments {
            zdd.nodes[id] = Node {
                lo: NodeId(u32::try_from(lo).unwrap()),
                hi: NodeId(u32::try_from(hi).unwrap()),
            };
        }
        zdd.level_first.push(max_id + 1);
        zdd.root = NodeId(u32::try_from(zdd.level_first[0]).unwrap());
        zdd.reduced = false;
        Ok(zdd)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Builds the ZDD for "paths of length exactly 2 out of 3 boolean
    /// variables" by hand: level 1 -> level 2 -> level 3 -> terminals, with
    /// a duplicate node at level 2 to exercise merging.
    fn small_zdd() -> PseudoZdd {
        let mut zdd = PseudoZdd::new(2);
        zdd.start_level();
        let a = zdd.create_node();
        zdd.set_root(a);
        zdd.start_level();
        let b = zdd.create_node();
        let c = zdd.create_node();
        zdd.set_arc(a, b, 0);
        zdd.set_arc(a, c, 1);
        zdd.set_arc(b, NodeId::REJECT, 0);
        zdd.set_arc(b, NodeId::ACCEPT, 1);
        zdd.set_arc(c, NodeId::REJECT, 0);
        zdd.set_arc(c, NodeId::ACCEPT, 1);
        zdd.finish();
        zdd
    }

    #[test]
    fn reduce_merges_duplicate_nodes_at_a_level() {
        let zdd = small_zdd();
        let reduced = zdd.reduce();
        // b and c are identical (lo=0, hi=1) so they merge into one node.
        assert_eq!(reduced.node_count(), 2 + 1 + 1);
    }

    #[test]
    fn reduce_is_idempotent() {
        let zdd = small_zdd();
        let once = zdd.reduce();
        let twice = once.reduce();
        assert_eq!(once.node_count(), twice.node_count());
        assert_eq!(once.level_first, twice.level_first);
    }

    #[test]
    fn reduced_nodes_never_have_hi_zero() {
        let zdd = small_zdd();
        let reduced = zdd.reduce();
        for level in 0..reduced.level_first.len().saturating_sub(1) {
            let (start, end) = (reduced.level_first[level], reduced.level_first[level + 1]);
            for j in start..end {
                assert_ne!(reduced.nodes[j].hi, NodeId::REJECT);
            }
        }
    }

    #[test]
    fn graphviz_export_is_nonempty_and_starts_with_digraph() {
        let zdd = small_zdd();
        let dot = zdd.export_graphviz(false);
        assert!(dot.starts_with("digraph zdd {"));
    }

    #[test]
    fn text_export_import_round_trips_node_count_and_levels() {
        let zdd = small_zdd().reduce();
        let text = zdd.export_text(false);
        let reimported = PseudoZdd::import_text(&text, zdd.num_vars()).unwrap();
        assert_eq!(reimported.node_count(), zdd.node_count());
        assert_eq!(reimported.level_first, zdd.level_first);
    }

    #[test]
    fn hex_text_export_import_round_trips() {
        let zdd = small_zdd().reduce();
        let text = zdd.export_text(true);
        let reimported = PseudoZdd::import_text(&text, zdd.num_vars()).unwrap();
        assert_eq!(reimported.node_count(), zdd.node_count());
    }

    #[test]
    fn enumerate_all_lists_every_accepting_path() {
        // "exactly one of {var0, var1}" over root -> b -> terminals, with c
        // merged away (distinct from `small_zdd`, whose root selects var0
        // then always accepts on var1 regardless).
        let zdd = small_zdd();
        let mut solutions = zdd.enumerate_all();
        for sol in &mut solutions {
            sol.sort_unstable();
        }
        solutions.sort();
        assert_eq!(solutions, vec![vec![1], vec![0, 1]]);
    }

    #[test]
    fn level_of_matches_level_first_layout() {
        let zdd = small_zdd();
        assert_eq!(zdd.level_of(zdd.root()), 0);
    }
}
