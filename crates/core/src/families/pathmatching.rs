//! Path-matching / multi-terminal path ("number link") family: `K`
//! vertex-disjoint paths, each connecting one designated pair of
//! terminals, optionally required to cover every other vertex as well.
//!
//! Grounded on the same `MateSTPath.cpp` mechanism [`super::path`] uses,
//! generalised from one pre-linked pair to `K` of them -- since paths are
//! vertex-disjoint, a chain's far-end vertex id alone still identifies
//! which pair it belongs to, so the per-vertex mate representation is
//! unchanged (`0` isolated / `v` closed / `u` open, linked to `u`).

use super::{FamilyLogic, Mate, StepContext, Terminal};

pub type PathMatchingMate = u32;
pub type PathMatchingFixed = ();

#[derive(Debug, Clone, Copy)]
pub struct TerminalPair {
    pub a: u32,
    pub b: u32,
}

pub struct PathMatchingFamily {
    pub pairs: Vec<TerminalPair>,
    /// "mtpath" mode: every non-terminal vertex must also end up on some
    /// path (closed), not merely optionally used.
    pub cover_all: bool,
}

impl PathMatchingFamily {
    #[must_use]
    pub fn new(pairs: Vec<TerminalPair>, cover_all: bool) -> Self {
        Self { pairs, cover_all }
    }

    fn partner_of(&self, vertex: u32) -> Option<u32> {
        self.pairs.iter().find_map(|p| {
            if p.a == vertex {
                Some(p.b)
            } else if p.b == vertex {
                Some(p.a)
            } else {
                None
            }
        })
    }

    fn is_terminal(&self, vertex: u32) -> bool {
        self.pairs.iter().any(|p| p.a == vertex || p.b == vertex)
    }
}

impl FamilyLogic for PathMatchingFamily {
    type F = PathMatchingMate;
    type D = PathMatchingFixed;

    fn on_enter(&self, mate: &mut Mate<Self::F, Self::D>, vertex: u32, ctx: &StepContext<'_>) {
        if let Some(partner) = self.partner_of(vertex) {
            mate.set(vertex, partner);
            for &w in ctx.frontier.prev() {
                if mate.get(w) == vertex {
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
            return Terminal::Reject;
        }
        if mate.get(src) == dst {
            // This edge closes src/dst's open chain. A chain that closes
            // without ever reaching one of its two designated terminals is
            // a disjoint cycle unrelated to any required pair -- once
            // closed it can never connect to a terminal, so it must be
            // rejected rather than silently accepted as "optional" extra
            // structure.
            if !self.is_terminal(src) && !self.is_terminal(dst) {
                return Terminal::Reject;
            }
            // Zero-suppression means an early accept forces every other
            // undecided edge to "not selected", so every other designated
            // pair must already be closed before this one's closure can be
            // the final decision point.
            for pair in &self.pairs {
                if pair.a == src || pair.a == dst || pair.b == src || pair.b == dst {
                    continue;
                }
                if mate.get(pair.a) != pair.a || mate.get(pair.b) != pair.b {
                    return Terminal::Continue;
                }
            }
            for &v in ctx.frontier.next() {
                if v == src || v == dst {
                    continue;
                }
                let value = mate.get(v);
                let closed = value == v;
                let isolated = value == 0;
                if self.cover_all {
                    if !closed {
                        return Terminal::Reject;
                    }
                } else if !closed && !isolated {
                    return Terminal::Reject;
                }
            }
            if self.cover_all && ctx.any_unprocessed_vertex_missing {
                return Terminal::Reject;
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
    }

    fn check_terminal_post(&self, mate: &mut Mate<Self::F, Self::D>, ctx: &StepContext<'_>) -> Terminal {
        for &v in ctx.frontier.leaving() {
            let value = mate.get(v);
            let closed = value == v;
            let isolated = value == 0;
            if self.is_terminal(v) {
                if !closed {
                    return Terminal::Reject;
                }
            } else if self.cover_all {
                if !closed {
                    return Terminal::Reject;
                }
            } else if !closed && !isolated {
                return Terminal::Reject;
            }
        }
        if self.cover_all && ctx.any_unprocessed_vertex_missing {
            return Terminal::Reject;
        }
        if ctx.is_last_edge {
            return Terminal::Accept;
        }
        Terminal::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontier::FrontierManager;

    #[test]
    fn two_independent_direct_pairs_accept() {
        let family = PathMatchingFamily::new(vec![TerminalPair { a: 1, b: 2 }, TerminalPair { a: 3, b: 4 }], false);
        let mut fm = FrontierManager::new();
        fm.advance(&[1, 2], |v| v == 1 || v == 2);
        let mut mate: Mate<PathMatchingMate, PathMatchingFixed> = Mate::new(4);
        let edge_a = [1u32, 2u32];
        let ca = StepContext {
            vertices: &edge_a,
            weight: 1,
            frontier: &fm,
            is_last_edge: false,
            any_unprocessed_vertex_missing: false,
        };
        family.on_enter(&mut mate, 1, &ca);
        family.on_enter(&mut mate, 2, &ca);
        family.update(&mut mate, &ca, 1);
        assert_eq!(mate.get(1), 1);
        assert_eq!(mate.get(2), 2);

        fm.advance(&[3, 4], |v| v == 3 || v == 4);
        let edge_b = [3u32, 4u32];
        let cb = StepContext {
            vertices: &edge_b,
            weight: 1,
            frontier: &fm,
            is_last_edge: true,
            any_unprocessed_vertex_missing: false,
        };
        family.on_enter(&mut mate, 3, &cb);
        family.on_enter(&mut mate, 4, &cb);
        family.update(&mut mate, &cb, 1);
        assert_eq!(family.check_terminal_post(&mate, &cb), Terminal::Accept);
    }

    #[test]
    fn disjoint_non_terminal_cycle_is_rejected() {
        let family = PathMatchingFamily::new(vec![TerminalPair { a: 1, b: 2 }], false);
        let mut mate: Mate<PathMatchingMate, PathMatchingFixed> = Mate::new(6);
        mate.set(5, 6); // an open chain between two plain, non-terminal vertices
        mate.set(6, 5);
        let fm = FrontierManager::new();
        let edge = [5u32, 6u32];
        let c = StepContext {
            vertices: &edge,
            weight: 1,
            frontier: &fm,
            is_last_edge: false,
            any_unprocessed_vertex_missing: false,
        };
        // Closing this chain would seal a standalone cycle touching neither
        // terminal of the only designated pair -- never valid.
        assert_eq!(family.check_terminal_pre(&mate, &c, 1), Terminal::Reject);
    }

    #[test]
    fn pair_closing_waits_for_other_pairs_before_accepting() {
        let family = PathMatchingFamily::new(vec![TerminalPair { a: 1, b: 2 }, TerminalPair { a: 3, b: 4 }], false);
        let mut mate: Mate<PathMatchingMate, PathMatchingFixed> = Mate::new(4);
        mate.set(1, 2);
        mate.set(2, 1);
        mate.set(3, 0); // second pair's path hasn't been built yet
        mate.set(4, 0);
        let mut fm = FrontierManager::new();
        fm.advance(&[1, 2, 3, 4], |_| false);
        let edge = [1u32, 2u32];
        let c = StepContext {
            vertices: &edge,
            weight: 1,
            frontier: &fm,
            is_last_edge: false,
            any_unprocessed_vertex_missing: false,
        };
        // The first pair closes here, but the second pair is still open, so
        // this can't be the final accept point yet.
        assert_eq!(family.check_terminal_pre(&mate, &c, 1), Terminal::Continue);
    }
}
