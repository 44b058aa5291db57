//! Family state machines (C6): one state object per subgraph family.
//!
//! Every family implements [`FamilyLogic`], whose three hooks
//! (`check_terminal_pre` / `update` / `check_terminal_post`) the
//! construction engine calls in the order spec §4.5 fixes. The engine
//! (`crate::engine`) is generic over `L: FamilyLogic` and is monomorphised
//! once per concrete family; picking which monomorphisation to build for a
//! given run is `frontier_cli`'s job (its `Family`-shaped `Subcommand`
//! match), not this module's -- nothing here needs to name every family at
//! once.
//!
//! Grounded on `StateFrontier.hpp`'s `MakeNewNode` control flow: subsetting
//! check (handled by the engine itself, §C10) -> `CheckTerminalPre` ->
//! `UpdateMate` -> `CheckTerminalPost`.

pub mod component;
pub mod general;
pub mod hyper;
pub mod path;
pub mod pathmatching;

use crate::zdd::NodeId;

/// Outcome of a terminal check: reject (ZDD `0`), accept (ZDD `1`), or keep
/// going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminal {
    Reject,
    Accept,
    Continue,
}

/// The runtime working mate the engine mutates in place while expanding
/// one node's two children. `F` is the per-frontier-vertex record, `D` the
/// optional fixed scalar (spec §3's "Mate: layered composition").
///
/// Unlike the packed, arena-resident snapshot ([`crate::mate::PackedMate`]),
/// `values` here is indexed directly by vertex id (`1..=vertex_count`) for
/// O(1) access during a transition, mirroring the original's
/// `mate_t* frontier_array` sized to the whole vertex set.
#[derive(Debug, Clone)]
pub struct Mate<F, D> {
    pub values: Vec<F>,
    pub fixed: D,
    pub sdd_cursor: NodeId,
    /// The current node's flattened auxiliary region (spec §3's variable-
    /// length `V`), unpacked fresh from the arena before `on_enter` runs and
    /// re-flattened by [`FamilyLogic::aux`] when the resulting child is
    /// packed. Empty for every family except [`hyper::HyperReliFamily`].
    pub aux: Vec<u32>,
}

impl<F: Copy + Default, D: Copy + Default> Mate<F, D> {
    #[must_use]
    pub fn new(vertex_count: usize) -> Self {
        Self {
            values: vec![F::default(); vertex_count + 1],
            fixed: D::default(),
            sdd_cursor: NodeId::terminal_one(),
            aux: Vec::new(),
        }
    }

    #[must_use]
    pub fn get(&self, vertex: u32) -> F {
        self.values[vertex as usize]
    }

    pub fn set(&mut self, vertex: u32, value: F) {
        self.values[vertex as usize] = value;
    }
}

/// Everything a family's `check_terminal_pre`/`update`/`check_terminal_post`
/// need to know about the edge currently being decided, supplied fresh by
/// the engine on every call.
pub struct StepContext<'a> {
    /// Incident vertices of the current edge (two for a plain graph, any
    /// number for a hyper-edge).
    pub vertices: &'a [u32],
    pub weight: i64,
    pub frontier: &'a crate::frontier::FrontierManager,
    pub is_last_edge: bool,
    /// True iff some vertex referenced by a later edge is absent from the
    /// post-update frontier (`Graph::is_any_unprocessed_vertex_missing`),
    /// used by Hamiltonian variants to reject early.
    pub any_unprocessed_vertex_missing: bool,
}

impl StepContext<'_> {
    #[must_use]
    pub fn edge_endpoints(&self) -> (u32, u32) {
        (self.vertices[0], self.vertices[1])
    }
}

/// The three-hook contract every family implements (spec §4.4).
pub trait FamilyLogic {
    type F: Copy + Default + Eq + std::hash::Hash;
    type D: Copy + Default + Eq + std::hash::Hash;

    /// Initialises a vertex's record the moment it enters the frontier.
    /// Called once per node, for every vertex in `StepContext::frontier`'s
    /// `entering()` list, after the parent's surviving values have been
    /// unpacked but before either child's transition runs.
    fn on_enter(&self, mate: &mut Mate<Self::F, Self::D>, vertex: u32, ctx: &StepContext<'_>);

    /// Pre-transition terminal check (`CheckTerminalPre`).
    fn check_terminal_pre(&self, mate: &Mate<Self::F, Self::D>, ctx: &StepContext<'_>, child_num: u8) -> Terminal;

    /// Mutates `mate` to reflect having taken `child_num` (0 = edge absent,
    /// 1 = edge present) for the current edge.
    fn update(&self, mate: &mut Mate<Self::F, Self::D>, ctx: &StepContext<'_>, child_num: u8);

    /// Post-transition terminal check (`CheckTerminalPost`). Takes `mate`
    /// mutably because sealing a component's final state (e.g. folding a
    /// count into `fixed` once a label can never be extended again) is
    /// itself part of the post-transition step, not a side effect of it.
    fn check_terminal_post(&self, mate: &mut Mate<Self::F, Self::D>, ctx: &StepContext<'_>) -> Terminal;

    /// Flattened auxiliary region packed alongside `values`/`fixed` (spec
    /// §3's variable-length `V`). Empty for every family except
    /// [`hyper::HyperReliFamily`], whose per-component "must all survive
    /// together" vertex sets don't fit in a fixed-width bitmask the way the
    /// general family's `P`/`S` tags do.
    fn aux(&self, _mate: &Mate<Self::F, Self::D>, _ctx: &StepContext<'_>) -> Vec<u32> {
        Vec::new()
    }

    /// Whether this family is capable of participating in subsetting
    /// (C10). Every family's mate carries the `sdd_cursor` field needed to
    /// do so, hence `true` by default; the engine only actually walks a
    /// second DD when both this returns `true` *and* the caller supplied
    /// one via [`crate::engine::Engine::with_subsetting`].
    fn is_using_subsetting(&self) -> bool {
        true
    }
}
