//! The general-purpose family: arbitrary per-vertex degree ranges, pairwise
//! same-component / different-component constraints, and bounds on the
//! total component count, cycle count, and edge count.
//!
//! Grounded on `MateFGeneral.hpp`/`.cpp`. The original drives this family
//! from an ad hoc text grammar (`D`/`P`/`S`/`C`/`Q`/`T` sections, each
//! optionally `all`); this crate keeps that as the *parsed* shape
//! (`frontier_parser`'s job) but represents it here as a plain semantic
//! config rather than re-deriving it from the grammar at construction time.
//!
//! `P`/`S` pairs need to know, once a component can never grow again,
//! whether it contains one, both, or neither pair endpoint. The original
//! answers this with `vset`, a per-component set of absorbed vertex ids.
//! This crate tracks the same fact with a bitmask instead: each vertex that
//! appears in some `P` or `S` pair is assigned a bit, and a component's
//! `tag` is the OR of every such bit absorbed into it so far. `P` is
//! satisfied or violated at the moment a component carrying exactly one of
//! a pair's two bits seals; `S` is violated the moment a merge produces a
//! tag carrying both. This caps the family at 32 distinct watched vertices
//! (`Self::new` rejects configs that exceed it) -- ample for the kind of
//! targeted connectivity constraints this family is meant for, at the cost
//! of not supporting graphs with dozens of independent `P`/`S` pairs.

use hashbrown::HashSet;

use super::{FamilyLogic, Mate, StepContext, Terminal};
use crate::error::{Error, Result};

/// Per-vertex record: current component label, selected-edge degree so
/// far, and the bitmask of watched (`P`/`S`-pair) vertices absorbed into
/// this vertex's component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct GeneralMate {
    pub label: u32,
    pub degree: u8,
    pub tag: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct GeneralFixed {
    pub sealed_components: u32,
    pub cycles: u32,
    pub edges_selected: u32,
}

/// A vertex pair from a `P` (must end up in the same component) or `S`
/// (must end up in different components) constraint.
#[derive(Debug, Clone, Copy)]
pub struct VertexPair {
    pub a: u32,
    pub b: u32,
}

/// Semantic form of `MateFGeneral.hpp`'s `D`/`P`/`S`/`C`/`Q`/`T` sections.
/// A missing or empty entry in `degree_allowed` means "every degree is
/// allowed" (the grammar's `all` keyword); `None` in the three count
/// fields means the same for that count.
#[derive(Debug, Clone, Default)]
pub struct GeneralConfig {
    pub degree_allowed: hashbrown::HashMap<u32, Vec<u8>>,
    pub same_component: Vec<VertexPair>,
    pub different_component: Vec<VertexPair>,
    pub component_counts_allowed: Option<Vec<u32>>,
    pub cycle_counts_allowed: Option<Vec<u32>>,
    pub edge_counts_allowed: Option<Vec<u32>>,
}

pub struct GeneralFamily {
    config: GeneralConfig,
    /// Vertices appearing in some `P`/`S` pair, in first-appearance order;
    /// bit index = position in this list.
    watched: Vec<u32>,
}

impl GeneralFamily {
    pub fn new(config: GeneralConfig) -> Result<Self> {
        let mut watched: Vec<u32> = Vec::new();
        for pair in config.same_component.iter().chain(config.different_component.iter()) {
            for v in [pair.a, pair.b] {
                if !watched.contains(&v) {
                    watched.push(v);
                }
            }
        }
        if watched.len() > 32 {
            return Err(Error::InvalidConfiguration {
                reason: "general family supports at most 32 vertices across all P/S pairs",
            });
        }
        Ok(Self { config, watched })
    }

    fn bit_of(&self, vertex: u32) -> u32 {
        self.watched.iter().position(|&v| v == vertex).map_or(0, |i| 1u32 << i)
    }

    fn degree_ok(&self, vertex: u32, degree: u8) -> bool {
        match self.config.degree_allowed.get(&vertex) {
            None => true,
            Some(allowed) => allowed.is_empty() || allowed.contains(&degree),
        }
    }
}

/// Folds every currently-sealing component's label into `sealed`/rejects
/// as appropriate, mutating `mate.fixed` in place. Returns `Some(reject)`
/// the first time an `S` pair is found violated or a `P` pair is found
/// permanently broken.
fn seal_and_check(family: &GeneralFamily, mate: &mut Mate<GeneralMate, GeneralFixed>, ctx: &StepContext<'_>) -> Option<Terminal> {
    let mut newly_sealed = HashSet::new();
    for &v in ctx.frontier.leaving() {
        let rec = mate.get(v);
        if !family.degree_ok(v, rec.degree) {
            return Some(Terminal::Reject);
        }
        let alive_elsewhere = ctx.frontier.next().iter().any(|&w| mate.get(w).label == rec.label);
        if alive_elsewhere {
            continue;
        }
        newly_sealed.insert(rec.label);

        for pair in &family.config.same_component {
            let bit_a = family.bit_of(pair.a);
            let bit_b = family.bit_of(pair.b);
            if bit_a == 0 || bit_b == 0 {
                continue;
            }
            let has_a = rec.tag & bit_a != 0;
            let has_b = rec.tag & bit_b != 0;
            if has_a != has_b {
                return Some(Terminal::Reject);
            }
        }
    }
    mate.fixed.sealed_components += u32::try_from(newly_sealed.len()).unwrap_or(u32::MAX);
    None
}

impl FamilyLogic for GeneralFamily {
    type F = GeneralMate;
    type D = GeneralFixed;

    fn on_enter(&self, mate: &mut Mate<Self::F, Self::D>, vertex: u32, _ctx: &StepContext<'_>) {
        mate.set(
            vertex,
            GeneralMate {
                label: vertex,
                degree: 0,
                tag: self.bit_of(vertex),
            },
        );
    }

    fn check_terminal_pre(&self, mate: &Mate<Self::F, Self::D>, ctx: &StepContext<'_>, child_num: u8) -> Terminal {
        if child_num == 0 {
            return Terminal::Continue;
        }
        let (src, dst) = ctx.edge_endpoints();
        let src_rec = mate.get(src);
        let dst_rec = mate.get(dst);
        // A vertex whose every allowed degree is already below what
        // selecting this edge would require can never recover: reject now
        // rather than waiting for it to seal.
        for (v, rec) in [(src, src_rec), (dst, dst_rec)] {
            if let Some(allowed) = self.config.degree_allowed.get(&v) {
                if !allowed.is_empty() && allowed.iter().all(|&d| d < rec.degree + 1) {
                    return Terminal::Reject;
                }
            }
        }
        // S: rejecting early the moment a merge would bring both pair
        // endpoints' bits into one component.
        if src_rec.label != dst_rec.label {
            let combined = src_rec.tag | dst_rec.tag;
            for pair in &self.config.different_component {
                let bit_a = self.bit_of(pair.a);
                let bit_b = self.bit_of(pair.b);
                if bit_a != 0 && bit_b != 0 && combined & bit_a != 0 && combined & bit_b != 0 {
                    return Terminal::Reject;
                }
            }
        }
        Terminal::Continue
    }

    fn update(&self, mate: &mut Mate<Self::F, Self::D>, ctx: &StepContext<'_>, child_num: u8) {
        if child_num == 0 {
            return;
        }
        let (src, dst) = ctx.edge_endpoints();
        mate.fixed.edges_selected += 1;

        let mut src_rec = mate.get(src);
        let mut dst_rec = mate.get(dst);
        src_rec.degree += 1;
        dst_rec.degree += 1;

        if src_rec.label == dst_rec.label {
            mate.fixed.cycles += 1;
            mate.set(src, src_rec);
            mate.set(dst, dst_rec);
            return;
        }

        let merged_tag = src_rec.tag | dst_rec.tag;
        let winning_label = src_rec.label.min(dst_rec.label);
        let losing_label = src_rec.label.max(dst_rec.label);
        for &w in ctx.frontier.both() {
            let mut rec = mate.get(w);
            if rec.label == losing_label {
                rec.label = winning_label;
                rec.tag = merged_tag;
                mate.set(w, rec);
            }
        }
        src_rec.label = winning_label;
        src_rec.tag = merged_tag;
        dst_rec.label = winning_label;
        dst_rec.tag = merged_tag;
        mate.set(src, src_rec);
        mate.set(dst, dst_rec);
    }

    fn check_terminal_post(&self, mate: &mut Mate<Self::F, Self::D>, ctx: &StepContext<'_>) -> Terminal {
        if let Some(reject) = seal_and_check(self, mate, ctx) {
            return reject;
        }

        if let Some(allowed) = &self.config.component_counts_allowed {
            if !ctx.is_last_edge && mate.fixed.sealed_components > allowed.iter().copied().max().unwrap_or(u32::MAX) {
                return Terminal::Reject;
            }
        }

        if ctx.is_last_edge {
            if let Some(allowed) = &self.config.component_counts_allowed {
                if !allowed.contains(&mate.fixed.sealed_components) {
                    return Terminal::Reject;
                }
            }
            if let Some(allowed) = &self.config.cycle_counts_allowed {
                if !allowed.contains(&mate.fixed.cycles) {
                    return Terminal::Reject;
                }
            }
            if let Some(allowed) = &self.config.edge_counts_allowed {
                if !allowed.contains(&mate.fixed.edges_selected) {
                    return Terminal::Reject;
                }
            }
            return Terminal::Accept;
        }
        Terminal::Continue
    }

    fn is_using_subsetting(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::count::count;
    use crate::engine::Engine;
    use crate::graph::{Edge, Graph};

    fn triangle() -> Graph {
        Graph::from_edges(3, vec![Edge::new(1, 2, 1), Edge::new(2, 3, 1), Edge::new(1, 3, 1)]).unwrap()
    }

    #[test]
    fn unconstrained_general_family_counts_every_subset() {
        let graph = triangle();
        let family = GeneralFamily::new(GeneralConfig::default()).unwrap();
        let engine = Engine::new(family);
        let zdd = engine.construct(&graph).unwrap().reduce();
        let n: u64 = count(&zdd).unwrap();
        assert_eq!(n, 8); // 2^3 subsets, nothing excludes any of them
    }

    #[test]
    fn component_count_bound_keeps_only_the_spanning_tree_subsets() {
        let graph = triangle();
        let config = GeneralConfig {
            component_counts_allowed: Some(vec![1]),
            ..GeneralConfig::default()
        };
        let family = GeneralFamily::new(config).unwrap();
        let engine = Engine::new(family);
        let zdd = engine.construct(&graph).unwrap().reduce();
        let n: u64 = count(&zdd).unwrap();
        // A triangle has 3 distinct two-edge spanning trees and one
        // three-edge (cyclic) connected subgraph: 4 single-component
        // subsets in total.
        assert_eq!(n, 4);
    }

    #[test]
    fn different_component_pair_forbids_connecting_edge() {
        let graph = triangle();
        let config = GeneralConfig {
            different_component: vec![VertexPair { a: 1, b: 2 }],
            ..GeneralConfig::default()
        };
        let family = GeneralFamily::new(config).unwrap();
        let engine = Engine::new(family);
        let zdd = engine.construct(&graph).unwrap().reduce();
        let solutions = zdd.enumerate_all();
        assert!(solutions.iter().all(|sol| !sol.contains(&0)));
    }

    #[test]
    fn too_many_watched_vertices_is_rejected_at_construction() {
        let pairs: Vec<VertexPair> = (0..40).map(|i| VertexPair { a: i, b: i + 100 }).collect();
        let config = GeneralConfig {
            same_component: pairs,
            ..GeneralConfig::default()
        };
        assert!(matches!(GeneralFamily::new(config), Err(Error::InvalidConfiguration { .. })));
    }
}
