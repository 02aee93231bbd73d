//! Test support: assertions and seeded data builders.
//!
//! Everything here is deterministic given a seed, so test failures
//! reproduce. The graph builders are generic over the back-end, which is
//! how the integration suites run the same scenarios against every
//! storage flavour.

use std::collections::HashSet;
use std::fmt::Debug;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::graph::{Graph, NodeId};

/// A reproducible RNG for tests.
pub fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Assert that `items` is sorted non-decreasingly.
///
/// # Panics
/// Panics with the offending adjacent pair.
pub fn assert_sorted<T: Ord + Debug>(items: &[T]) {
    for (i, w) in items.windows(2).enumerate() {
        assert!(
            w[0] <= w[1],
            "not sorted at index {i}: {:?} > {:?}\n  Full: {items:?}",
            w[0],
            w[1]
        );
    }
}

/// Assert that two slices hold the same multiset of elements.
pub fn assert_same_elements<T: Ord + Debug + Clone>(actual: &[T], expected: &[T]) {
    let mut a = actual.to_vec();
    let mut e = expected.to_vec();
    a.sort();
    e.sort();
    assert_eq!(a, e, "element multisets differ\n  Actual: {actual:?}\n  Expected: {expected:?}");
}

/// `0..n` in a seeded random order.
pub fn shuffled(seed: u64, n: usize) -> Vec<u64> {
    let mut v: Vec<u64> = (0..n as u64).collect();
    v.shuffle(&mut rng(seed));
    v
}

/// `n` distinct random keys below `bound`.
pub fn distinct_keys(rng: &mut StdRng, n: usize, bound: u64) -> Vec<u64> {
    assert!(bound as usize >= n, "cannot draw {n} distinct keys below {bound}");
    let mut seen = HashSet::with_capacity(n);
    let mut out = Vec::with_capacity(n);
    while out.len() < n {
        let k = rng.gen_range(0..bound);
        if seen.insert(k) {
            out.push(k);
        }
    }
    out
}

/// Build a graph over any back-end: `n` nodes whose payload is their
/// build index, plus unweighted edges given as index pairs. Returns the
/// graph and the index-ordered node ids.
pub fn graph_from_edges<G>(n: usize, edges: &[(usize, usize)]) -> (G, Vec<NodeId>)
where
    G: Graph<NodeInfo = usize, ArcInfo = ()> + Default,
{
    let mut g = G::default();
    let ids: Vec<NodeId> = (0..n).map(|i| g.insert_node(i)).collect();
    for &(u, v) in edges {
        g.insert_arc(ids[u], ids[v], ()).expect("endpoints exist");
    }
    (g, ids)
}

/// Like [`graph_from_edges`], with a weight per edge.
pub fn weighted_graph_from_edges<G, W>(n: usize, edges: &[(usize, usize, W)]) -> (G, Vec<NodeId>)
where
    W: Clone,
    G: Graph<NodeInfo = usize, ArcInfo = W> + Default,
{
    let mut g = G::default();
    let ids: Vec<NodeId> = (0..n).map(|i| g.insert_node(i)).collect();
    for (u, v, w) in edges {
        g.insert_arc(ids[*u], ids[*v], w.clone()).expect("endpoints exist");
    }
    (g, ids)
}

/// A seeded connected random graph: a spanning path plus `extra` random
/// arcs.
pub fn random_connected_graph<G>(seed: u64, n: usize, extra: usize) -> (G, Vec<NodeId>)
where
    G: Graph<NodeInfo = usize, ArcInfo = ()> + Default,
{
    let mut r = rng(seed);
    let mut g = G::default();
    let ids: Vec<NodeId> = (0..n).map(|i| g.insert_node(i)).collect();
    for w in ids.windows(2) {
        g.insert_arc(w[0], w[1], ()).expect("endpoints exist");
    }
    for _ in 0..extra {
        let u = r.gen_range(0..n);
        let v = r.gen_range(0..n);
        if u != v {
            g.insert_arc(ids[u], ids[v], ()).expect("endpoints exist");
        }
    }
    (g, ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::LinkedGraph;

    #[test]
    fn builders_are_deterministic() {
        assert_eq!(shuffled(7, 50), shuffled(7, 50));
        let a = distinct_keys(&mut rng(1), 100, 1000);
        let b = distinct_keys(&mut rng(1), 100, 1000);
        assert_eq!(a, b);
        let set: HashSet<u64> = a.iter().copied().collect();
        assert_eq!(set.len(), 100);
    }

    #[test]
    fn random_graph_is_connected() {
        let (g, ids) = random_connected_graph::<LinkedGraph<usize, ()>>(3, 20, 10);
        assert_eq!(g.num_nodes(), 20);
        assert!(g.num_arcs() >= 19);
        assert!(crate::algo::is_connected(&g));
        assert_eq!(*g.node(ids[5]), 5);
    }
}
