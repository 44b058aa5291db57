//! Frontier manager (C2): tracks which vertices are "in play" as edges are
//! processed in order, split into `prev`/`entering`/`next`/`leaving`/`both`.

/// Per-step frontier bookkeeping. Owns no graph state; [`Self::advance`] is
/// fed the endpoint list of the edge about to be processed plus a
/// last-occurrence oracle (backed by [`crate::graph::Graph::last_occurrence`]
/// or the hypergraph equivalent).
#[derive(Debug, Default, Clone)]
pub struct FrontierManager {
    prev: Vec<u32>,
    entering: Vec<u32>,
    next: Vec<u32>,
    leaving: Vec<u32>,
    both: Vec<u32>,
}

impl FrontierManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances the frontier past the edge at `edge_index` whose incident
    /// vertices are `vertices`. `is_last_occurrence(v)` must answer whether
    /// `edge_index` is the last edge in the input order that references `v`.
    pub fn advance(&mut self, vertices: &[u32], is_last_occurrence: impl Fn(u32) -> bool) {
        self.prev.clone_from(&self.next);
        self.both.clone_from(&self.prev);
        self.entering.clear();

        for &v in vertices {
            if !self.next.contains(&v) {
                self.next.push(v);
                self.both.push(v);
                self.entering.push(v);
            }
        }

        self.leaving.clear();
        for &v in vertices {
            if is_last_occurrence(v) {
                self.leaving.push(v);
                self.next.retain(|&x| x != v);
            }
        }
    }

    #[must_use]
    pub fn prev(&self) -> &[u32] {
        &self.prev
    }

    #[must_use]
    pub fn entering(&self) -> &[u32] {
        &self.entering
    }

    #[must_use]
    pub fn next(&self) -> &[u32] {
        &self.next
    }

    #[must_use]
    pub fn leaving(&self) -> &[u32] {
        &self.leaving
    }

    #[must_use]
    pub fn both(&self) -> &[u32] {
        &self.both
    }

    #[must_use]
    pub fn is_entering(&self, vertex: u32) -> bool {
        self.entering.contains(&vertex)
    }
}
