//! Subsetting DD (C10): a second, pre-built [`PseudoZdd`] walked in
//! lock-step with construction to restrict which edges may be selected.
//!
//! Grounded on `Mate.hpp`'s `MateS` (`sdd` cursor field, `SetUseSubsetting`)
//! and spec §4.8. The subsetting DD is read-only during construction --
//! it is typically itself the output of a previous `Engine::construct` call
//! (or an import via [`PseudoZdd::import_text`]) being reused to prune a new
//! family's search.

use crate::zdd::{NodeId, PseudoZdd};

/// Borrows a constraint DD and answers "given I'm at `cursor` and the
/// engine is deciding level `level`'s edge, where does child `child_num`
/// lead" -- or `None` if that child is forbidden.
pub struct SubsettingDd<'a> {
    zdd: &'a PseudoZdd,
}

impl<'a> SubsettingDd<'a> {
    #[must_use]
    pub const fn new(zdd: &'a PseudoZdd) -> Self {
        Self { zdd }
    }

    /// The cursor value a fresh root mate should start with.
    #[must_use]
    pub fn root_cursor(&self) -> NodeId {
        self.zdd.root()
    }

    /// Advances `cursor` across the decision at 0-based `level` for
    /// `child_num` (`0` = edge absent, `1` = edge present). Per spec §4.8:
    /// if the subsetting DD has a node at exactly `level` reachable from
    /// `cursor`, follow its matching arc and reject if that arc leads to
    /// its own reject terminal; otherwise the subsetting DD's variable
    /// order has zero-suppressed this level, so taking the edge (`hi`) is
    /// unconditionally forbidden while not taking it (`lo`) leaves the
    /// cursor exactly where it was.
    #[must_use]
    pub fn advance(&self, cursor: NodeId, level: usize, child_num: u8) -> Option<NodeId> {
        if cursor == NodeId::REJECT {
            return None;
        }
        if cursor == NodeId::ACCEPT {
            // The constraint has already been fully satisfied; nothing past
            // this point is restricted.
            return Some(NodeId::ACCEPT);
        }

        let cursor_level = self.zdd.level_of(cursor);
        match cursor_level.cmp(&level) {
            std::cmp::Ordering::Equal => {
                let node = self.zdd.node(cursor);
                let next = if child_num == 0 { node.lo } else { node.hi };
                if next == NodeId::REJECT {
                    None
                } else {
                    Some(next)
                }
            }
            std::cmp::Ordering::Greater if child_num == 1 => None,
            std::cmp::Ordering::Greater => Some(cursor),
            std::cmp::Ordering::Less => {
                unreachable!("subsetting cursor fell behind the construction level")
            }
        }
    }
}

/// Builds a constraint DD accepting exactly the edge subsets whose size
/// (number of selected edges) falls in the inclusive `[min, max]` range,
/// over `num_edges` variables. Meant to be handed to
/// [`crate::engine::Engine::with_subsetting`] so a family with no native
/// notion of "total edges selected" -- `stpath`'s `--elimit`, in
/// particular, once `distance_bound` isn't in play -- can still be
/// constrained by one. Grounded on spec §4.8's zero-suppression rule: a
/// level absent from this DD's variable order would forbid its `hi`
/// child, so every level from `0` to `num_edges - 1` is represented
/// explicitly, with `count > max` states collapsed straight to the
/// reject terminal rather than materialised as dead nodes.
#[must_use]
pub fn count_range_dd(num_edges: usize, min: u32, max: u32) -> PseudoZdd {
    let mut zdd = PseudoZdd::new(num_edges);
    if num_edges == 0 {
        zdd.set_root(if min == 0 { NodeId::ACCEPT } else { NodeId::REJECT });
        return zdd;
    }

    zdd.start_level();
    let root = zdd.create_node();
    zdd.set_root(root);
    let mut current: Vec<(u32, NodeId)> = vec![(0, root)];

    for level in 0..num_edges {
        let is_last = level + 1 == num_edges;
        if !is_last {
            zdd.start_level();
        }
        let mut next: Vec<(u32, NodeId)> = Vec::new();
        let mut get_or_create = |zdd: &mut PseudoZdd, next: &mut Vec<(u32, NodeId)>, count: u32| -> NodeId {
            if let Some(&(_, id)) = next.iter().find(|&&(c, _)| c == count) {
                return id;
            }
            let id = zdd.create_node();
            next.push((count, id));
            id
        };

        for (count, node_id) in current {
            let lo_target = if is_last {
                if (min..=max).contains(&count) {
                    NodeId::ACCEPT
                } else {
                    NodeId::REJECT
                }
            } else {
                get_or_create(&mut zdd, &mut next, count)
            };
            zdd.set_arc(node_id, lo_target, 0);

            let hi_count = count + 1;
            let hi_target = if hi_count > max {
                NodeId::REJECT
            } else if is_last {
                if (min..=max).contains(&hi_count) {
                    NodeId::ACCEPT
                } else {
                    NodeId::REJECT
                }
            } else {
                get_or_create(&mut zdd, &mut next, hi_count)
            };
            zdd.set_arc(node_id, hi_target, 1);
        }

        current = next;
    }

    zdd.finish();
    zdd
}
