//! Counting and sampling (C9): a bottom-up DP over the node array,
//! parameterised by [`crate::number::Count`], plus uniform-random sampling
//! that descends the DD using the DP table as a probability oracle.

use rand::Rng;

use crate::error::Result;
use crate::number::Count;
use crate::zdd::{NodeId, PseudoZdd};

/// `count[node] = count[lo] + count[hi]` for every node, computed once and
/// reused by both [`count`] (which just reads the root's entry) and
/// [`sample`] (which reads every node visited along its random descent).
pub struct CountTable<T> {
    counts: Vec<T>,
}

impl<T: Count> CountTable<T> {
    /// Builds the table in one backward pass: nodes are stored with every
    /// arc pointing to a strictly higher index than its source (spec's
    /// node-array invariant), so processing indices from the end of the
    /// array towards the front guarantees both children of a node are
    /// already resolved when the node itself is computed.
    pub fn build(zdd: &PseudoZdd) -> Result<Self> {
        let mut counts = vec![T::zero(); zdd.node_count()];
        counts[NodeId::ACCEPT.index()] = T::one();
        for index in (2..zdd.node_count()).rev() {
            let node = zdd.node(NodeId(u32::try_from(index).expect("node count exceeds u32::MAX")));
            let lo = counts[node.lo.index()].clone();
            let hi = counts[node.hi.index()].clone();
            counts[index] = lo.checked_add(&hi, NodeId(u32::try_from(index).unwrap()))?;
        }
        Ok(Self { counts })
    }

    #[must_use]
    pub fn get(&self, node: NodeId) -> &T {
        &self.counts[node.index()]
    }

    #[must_use]
    pub fn total(&self, zdd: &PseudoZdd) -> &T {
        self.get(zdd.root())
    }
}

/// Convenience wrapper around [`CountTable::build`] for callers that only
/// need the root's count, not the whole table (e.g. a one-shot CLI `--si`
/// query).
pub fn count<T: Count>(zdd: &PseudoZdd) -> Result<T> {
    let table = CountTable::<T>::build(zdd)?;
    Ok(table.total(zdd).clone())
}

/// Draws one uniformly random accepting path, returning the sorted list of
/// 0-based variable (edge) indices it selects. At each internal node, `hi`
/// is taken with probability `count(hi) / (count(lo) + count(hi))` (spec
/// §4.7); a DD with zero solutions has no accepting path to draw, so the
/// descent from its root always lands on the reject terminal immediately.
pub fn sample<T: Count>(zdd: &PseudoZdd, table: &CountTable<T>, rng: &mut impl Rng) -> Vec<usize> {
    let mut selected = Vec::new();
    let mut current = zdd.root();
    while !current.is_terminal() {
        let node = zdd.node(current);
        let lo_count = table.get(node.lo);
        let hi_count = table.get(node.hi);
        let p_hi = T::hi_probability(lo_count, hi_count);
        let take_hi = rng.random::<f64>() < p_hi;
        if take_hi {
            selected.push(zdd.level_of(current));
            current = node.hi;
        } else {
            current = node.lo;
        }
    }
    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zdd::PseudoZdd;
    use num_bigint::BigUint;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Root selects var0 freely; var1 is mandatory either way -- 2
    /// solutions total: `{1}` and `{0, 1}`.
    fn two_solution_zdd() -> PseudoZdd {
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
    fn u64_count_matches_enumeration() {
        let zdd = two_solution_zdd();
        let n: u64 = count(&zdd).unwrap();
        assert_eq!(n, 2);
        assert_eq!(zdd.enumerate_all().len(), n as usize);
    }

    #[test]
    fn f64_and_biguint_counts_agree_with_u64() {
        let zdd = two_solution_zdd();
        let as_f64: f64 = count(&zdd).unwrap();
        let as_big: BigUint = count(&zdd).unwrap();
        assert!((as_f64 - 2.0).abs() < f64::EPSILON);
        assert_eq!(as_big, BigUint::from(2u32));
    }

    #[test]
    fn sample_always_draws_an_enumerated_solution() {
        let zdd = two_solution_zdd();
        let table = CountTable::<u64>::build(&zdd).unwrap();
        let mut solutions = zdd.enumerate_all();
        for sol in &mut solutions {
            sol.sort_unstable();
        }
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..50 {
            let mut drawn = sample(&zdd, &table, &mut rng);
            drawn.sort_unstable();
            assert!(solutions.contains(&drawn));
        }
    }

    #[test]
    fn sampling_distribution_is_reasonably_uniform() {
        let zdd = two_solution_zdd();
        let table = CountTable::<u64>::build(&zdd).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let mut short_count = 0;
        for _ in 0..2000 {
            if sample(&zdd, &table, &mut rng) == vec![1] {
                short_count += 1;
            }
        }
        let frac = f64::from(short_count) / 2000.0;
        assert!((frac - 0.5).abs() < 0.05, "empirical fraction {frac} too far from 0.5");
    }
}
