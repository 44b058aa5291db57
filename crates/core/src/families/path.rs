//! s-t path / cycle / Hamiltonian families.
//!
//! Grounded on `MateSTPath.cpp`/`StateSTPath.cpp`. The per-vertex mate
//! records, for each frontier vertex `v`, one of three states:
//!
//! * `0` -- isolated, no selected edge has touched `v` yet.
//! * `v` itself -- "closed": `v` already has its full allotment of
//!   selected incident edges (two, for an interior path vertex).
//! * any other vertex `u` -- "open": `v` currently has exactly one
//!   selected edge and sits at the end of a chain whose other end is `u`.
//!
//! Plain s-t paths reduce to the same bookkeeping as cycle-closing by
//! pre-linking `s` and `t` to each other in [`FamilyLogic::on_enter`]
//! (`MateSTPath.cpp`'s well-known trick): the real edges the search adds
//! then grow an open chain from each side until the two meet, at which
//! point the generic "two open ends join on a real edge" update closes
//! both `start` and `end` to themselves, uniformly with how every other
//! interior vertex closes. Acceptance is then the same uniform rule for
//! every vertex regardless of whether it's a designated terminal.

use super::{FamilyLogic, Mate, StepContext, Terminal};

pub type PathMate = u32;

/// Fixed scalar: accumulated edge weight, used only when `distance_bound`
/// is set (stays `0`, and so never distinguishes states, when unused).
pub type PathFixed = i64;

#[derive(Debug, Clone, Copy)]
pub struct PathConfig {
    pub start: u32,
    pub end: u32,
    pub hamilton: bool,
    pub cycle: bool,
    pub distance_bound: Option<(i64, i64)>,
}

pub struct PathFamily {
    pub config: PathConfig,
}

impl PathFamily {
    #[must_use]
    pub fn new(config: PathConfig) -> Self {
        Self { config }
    }

    fn is_terminal_vertex(&self, v: u32) -> bool {
        !self.config.cycle && (v == self.config.start || v == self.config.end)
    }

    /// Mirrors `StateSTPath::STEnteringFrontier()`: rejects a cycle that
    /// closes before `start`/`end` have ever touched the frontier, so an
    /// unrelated sub-cycle elsewhere in the graph can't be mistaken for the
    /// designated s-t path closing. Not meaningful in cycle mode, where
    /// there's no designated anchor (`start == end == 0`).
    fn cycle_anchor_entered(&self, mate: &Mate<PathMate, PathFixed>) -> bool {
        self.config.cycle || mate.get(self.config.start) != 0 || mate.get(self.config.end) != 0
    }
}

impl FamilyLogic for PathFamily {
    type F = PathMate;
    type D = PathFixed;

    fn on_enter(&self, mate: &mut Mate<Self::F, Self::D>, vertex: u32, ctx: &StepContext<'_>) {
        let (start, end) = (self.config.start, self.config.end);
        if !self.config.cycle && vertex == start {
            mate.set(vertex, end);
            for &w in ctx.frontier.prev() {
                if mate.get(w) == start {
                    mate.set(w, vertex);
                }
            }
        } else if !self.config.cycle && vertex == end {
            mate.set(vertex, start);
            for &w in ctx.frontier.prev() {
                if mate.get(w) == end {
                    mate.set(w, vertex);
                }
            }
        } else {
            mate.set(vertex, 0);
        }
    }

    fn check_terminal_pre(&self, mate: &Mate<Self::F, Self::D>, ctx: &StepContext<'_>, child_num: u8) -> Terminal {
        if child_num == 0 {
            return Terminal::Continue;
        }
        let (src, dst) = ctx.edge_endpoints();
        if mate.get(src) == src || mate.get(dst) == dst {
            // Either endpoint already has its full degree allotment.
            return Terminal::Reject;
        }
        if mate.get(src) == dst {
            // This edge closes `src`/`dst`'s open chain into a cycle (or,
            // with `start`/`end` pre-linked, completes the s-t path).
            // Zero-suppression means accepting now forces every other
            // undecided edge to "not selected", so every other vertex
            // still active on the frontier must already be closed or
            // untouched -- otherwise we'd be silently discarding a
            // second, disjoint open chain elsewhere in the graph.
            if !self.cycle_anchor_entered(mate) {
                return Terminal::Reject;
            }
            for &v in ctx.frontier.next() {
                if v == src || v == dst {
                    continue;
                }
                let value = mate.get(v);
                let closed = value == v;
                let isolated = value == 0;
                if self.config.hamilton {
                    if !closed {
                        return Terminal::Reject;
                    }
                } else if !closed && !isolated {
                    return Terminal::Reject;
                }
            }
            if self.config.hamilton && ctx.any_unprocessed_vertex_missing {
                return Terminal::Reject;
            }
            if let Some((min, max)) = self.config.distance_bound {
                let total = mate.fixed + ctx.weight;
                if total < min || total > max {
                    return Terminal::Reject;
                }
            }
            return Terminal::Accept;
        }
        Terminal::Continue
    }

    fn update(&self, mate: &mut Mate<Self::F, Self::D>, ctx: &StepContext<'_>, child_num: u8) {
        if child_num == 0 {
            return;
        }
        let (src, dst) = ctx.edge_endpoints();
        let s = mate.get(src);
        let d = mate.get(dst);
        if s == dst {
            // `src` and `dst` were each other's open chain ends: this edge
            // closes the chain into a cycle (or, in path mode, completes
            // the direct s-t edge).
            mate.set(src, src);
            mate.set(dst, dst);
        } else {
            let s_end = if s == 0 { src } else { s };
            let d_end = if d == 0 { dst } else { d };
            mate.set(s_end, d_end);
            mate.set(d_end, s_end);
            if s != 0 {
                mate.set(src, src);
            }
            if d != 0 {
                mate.set(dst, dst);
            }
        }
        if let Some((_, max)) = self.config.distance_bound {
            mate.fixed = (mate.fixed + ctx.weight).min(max + 1);
        }
    }

    fn check_terminal_post(&self, mate: &mut Mate<Self::F, Self::D>, ctx: &StepContext<'_>) -> Terminal {
        if let Some((_, max)) = self.config.distance_bound {
            if mate.fixed > max {
                return Terminal::Reject;
            }
        }

        for &v in ctx.frontier.leaving() {
            let value = mate.get(v);
            let closed = value == v;
            let isolated = value == 0;
            if self.is_terminal_vertex(v) {
                if !closed {
                    return Terminal::Reject;
                }
            } else if self.config.hamilton {
                if !closed {
                    return Terminal::Reject;
                }
            } else if !closed && !isolated {
                return Terminal::Reject;
            }
        }

        if self.config.hamilton && ctx.any_unprocessed_vertex_missing {
            return Terminal::Reject;
        }

        if ctx.is_last_edge {
            if let Some((min, _)) = self.config.distance_bound {
                if mate.fixed < min {
                    return Terminal::Reject;
                }
            }
            if self.config.cycle {
                let any_used = ctx.frontier.next().iter().any(|&v| mate.get(v) != 0);
                return if any_used { Terminal::Accept } else { Terminal::Reject };
            }
            return Terminal::Accept;
        }
        Terminal::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontier::FrontierManager;

    fn ctx<'a>(frontier: &'a FrontierManager, vertices: &'a [u32], is_last_edge: bool) -> StepContext<'a> {
        StepContext {
            vertices,
            weight: 1,
            frontier,
            is_last_edge,
            any_unprocessed_vertex_missing: false,
        }
    }

    #[test]
    fn direct_edge_between_terminals_is_accepted() {
        let family = PathFamily::new(PathConfig {
            start: 1,
            end: 2,
            hamilton: false,
            cycle: false,
            distance_bound: None,
        });
        let mut fm = FrontierManager::new();
        fm.advance(&[1, 2], |v| v == 1 || v == 2);
        let mut mate: Mate<PathMate, PathFixed> = Mate::new(2);
        let edge = [1u32, 2u32];
        let c = ctx(&fm, &edge, true);
        family.on_enter(&mut mate, 1, &c);
        family.on_enter(&mut mate, 2, &c);
        // The edge immediately closes the pre-linked start/end chain, so
        // acceptance is decided early rather than falling through to
        // `update`/`check_terminal_post`.
        assert_eq!(family.check_terminal_pre(&mate, &c, 1), Terminal::Accept);
    }

    #[test]
    fn disjoint_cycle_elsewhere_on_the_frontier_blocks_early_accept() {
        let family = PathFamily::new(PathConfig {
            start: 1,
            end: 2,
            hamilton: false,
            cycle: false,
            distance_bound: None,
        });
        let mut mate: Mate<PathMate, PathFixed> = Mate::new(6);
        mate.set(1, 2); // start/end pre-linked, about to close directly
        mate.set(2, 1);
        mate.set(5, 6); // an unrelated open chain still active elsewhere
        mate.set(6, 5);
        let mut fm = FrontierManager::new();
        fm.advance(&[1, 2, 5, 6], |_| false);
        let edge = [1u32, 2u32];
        let c = ctx(&fm, &edge, false);
        // Vertex 5/6's open chain is neither closed nor untouched, so the
        // s-t edge closing must not be accepted yet.
        assert_eq!(family.check_terminal_pre(&mate, &c, 1), Terminal::Reject);
    }

    #[test]
    fn vertex_with_two_selected_edges_cannot_take_a_third() {
        let family = PathFamily::new(PathConfig {
            start: 1,
            end: 4,
            hamilton: false,
            cycle: false,
            distance_bound: None,
        });
        let mut mate: Mate<PathMate, PathFixed> = Mate::new(4);
        mate.set(2, 2); // already closed
        let edge = [2u32, 3u32];
        let fm = FrontierManager::new();
        let c = ctx(&fm, &edge, false);
        assert_eq!(family.check_terminal_pre(&mate, &c, 1), Terminal::Reject);
    }

    #[test]
    fn distance_bound_rejects_a_path_shorter_than_the_minimum() {
        let family = PathFamily::new(PathConfig {
            start: 1,
            end: 2,
            hamilton: false,
            cycle: false,
            distance_bound: Some((5, 10)),
        });
        let mut fm = FrontierManager::new();
        fm.advance(&[1, 2], |v| v == 1 || v == 2);
        let mut mate: Mate<PathMate, PathFixed> = Mate::new(2);
        let edge = [1u32, 2u32];
        let c = ctx(&fm, &edge, true);
        family.on_enter(&mut mate, 1, &c);
        family.on_enter(&mut mate, 2, &c);
        family.update(&mut mate, &c, 1);
        // The direct edge has weight 1, below the configured minimum of 5.
        assert_eq!(family.check_terminal_post(&mate, &c), Terminal::Reject);
    }
}
