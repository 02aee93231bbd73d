//! Single-source shortest paths: Dijkstra (with optional A* heuristic) and
//! Bellman-Ford.
//!
//! Weights are any [`Weight`]: totally ordered, with zero and closed
//! addition/subtraction. The integer primitives implement it, as does
//! `ordered_float::OrderedFloat`, which is the supported way to run these
//! algorithms over floating-point weights.

use ordered_float::OrderedFloat;

use crate::error::{Error, Result};
use crate::graph::{ArcId, Directed, Graph, NodeId, NodeMap};
use crate::heap::{BinHeap, PriorityQueue};
use crate::order::Keyed;

/// Arithmetic the path and flow algorithms need from a weight type.
pub trait Weight: Copy + Ord {
    /// The additive identity.
    const ZERO: Self;

    /// Closed addition.
    fn add(self, rhs: Self) -> Self;

    /// Closed subtraction (used by residual updates and reweighting).
    fn sub(self, rhs: Self) -> Self;
}

macro_rules! int_weight {
    ($($t:ty),*) => {
        $(
            impl Weight for $t {
                const ZERO: Self = 0;

                fn add(self, rhs: Self) -> Self {
                    self + rhs
                }

                fn sub(self, rhs: Self) -> Self {
                    self - rhs
                }
            }
        )*
    };
}

int_weight!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);

impl Weight for OrderedFloat<f32> {
    const ZERO: Self = OrderedFloat(0.0);

    fn add(self, rhs: Self) -> Self {
        OrderedFloat(self.0 + rhs.0)
    }

    fn sub(self, rhs: Self) -> Self {
        OrderedFloat(self.0 - rhs.0)
    }
}

impl Weight for OrderedFloat<f64> {
    const ZERO: Self = OrderedFloat(0.0);

    fn add(self, rhs: Self) -> Self {
        OrderedFloat(self.0 + rhs.0)
    }

    fn sub(self, rhs: Self) -> Self {
        OrderedFloat(self.0 - rhs.0)
    }
}

/// Distances and predecessors from one source.
pub struct ShortestPaths<W> {
    source: NodeId,
    /// Tentative-turned-final distance per reached node.
    pub dist: NodeMap<W>,
    pred: NodeMap<(NodeId, ArcId)>,
}

impl<W: Weight> ShortestPaths<W> {
    /// Distance to `v`, if reached.
    pub fn distance(&self, v: NodeId) -> Option<W> {
        self.dist.get(v).copied()
    }

    /// The node sequence of the shortest path `source -> v`, inclusive.
    pub fn path_to(&self, v: NodeId) -> Option<Vec<NodeId>> {
        if !self.dist.contains(v) {
            return None;
        }
        let mut path = vec![v];
        let mut cur = v;
        while cur != self.source {
            let &(p, _) = self.pred.get(cur)?;
            path.push(p);
            cur = p;
        }
        path.reverse();
        Some(path)
    }

    /// The arc sequence of the shortest path `source -> v`.
    pub fn arcs_to(&self, v: NodeId) -> Option<Vec<ArcId>> {
        if !self.dist.contains(v) {
            return None;
        }
        let mut arcs = Vec::new();
        let mut cur = v;
        while cur != self.source {
            let &(p, a) = self.pred.get(cur)?;
            arcs.push(a);
            cur = p;
        }
        arcs.reverse();
        Some(arcs)
    }
}

/// Dijkstra from `source` with non-negative arc weights; lazy-deletion
/// binary heap, O((V+E) log V). Works on either graph flavour.
pub fn dijkstra<G, W, F>(g: &G, source: NodeId, weight: F) -> ShortestPaths<W>
where
    G: Graph,
    W: Weight,
    F: Fn(&G, ArcId) -> W,
{
    let mut dist: NodeMap<W> = NodeMap::for_graph(g);
    let mut pred = NodeMap::for_graph(g);
    let mut settled = NodeMap::for_graph(g);
    let mut heap: BinHeap<Keyed<W, NodeId>> = BinHeap::new();
    dist.insert(source, W::ZERO);
    heap.push(Keyed::new(W::ZERO, source));
    while let Some(Keyed { prio: d, item: u }) = heap.pop() {
        if settled.contains(u) {
            continue;
        }
        settled.insert(u, ());
        for a in g.adjacent(u) {
            let w = weight(g, a);
            debug_assert!(w >= W::ZERO, "Dijkstra requires non-negative weights");
            let v = g.arc_head(a, u);
            let nd = d.add(w);
            if dist.get(v).is_none_or(|&dv| nd < dv) {
                dist.insert(v, nd);
                pred.insert(v, (u, a));
                heap.push(Keyed::new(nd, v));
            }
        }
    }
    ShortestPaths { source, dist, pred }
}

/// A* from `source` to `goal`. The heuristic must be admissible (it never
/// overestimates the remaining distance); priority is `g + h`. Returns the
/// distance and node path when the goal is reachable.
pub fn astar<G, W, F, H>(
    g: &G,
    source: NodeId,
    goal: NodeId,
    weight: F,
    heuristic: H,
) -> Option<(W, Vec<NodeId>)>
where
    G: Graph,
    W: Weight,
    F: Fn(&G, ArcId) -> W,
    H: Fn(&G, NodeId) -> W,
{
    let mut best: NodeMap<W> = NodeMap::for_graph(g);
    let mut pred: NodeMap<(NodeId, ArcId)> = NodeMap::for_graph(g);
    let mut settled = NodeMap::for_graph(g);
    let mut heap: BinHeap<Keyed<W, NodeId>> = BinHeap::new();
    best.insert(source, W::ZERO);
    heap.push(Keyed::new(heuristic(g, source), source));
    while let Some(Keyed { item: u, .. }) = heap.pop() {
        if settled.contains(u) {
            continue;
        }
        settled.insert(u, ());
        let du = *best.get(u).expect("queued nodes have a tentative distance");
        if u == goal {
            let mut path = vec![goal];
            let mut cur = goal;
            while cur != source {
                let &(p, _) = pred.get(cur)?;
                path.push(p);
                cur = p;
            }
            path.reverse();
            return Some((du, path));
        }
        for a in g.adjacent(u) {
            let v = g.arc_head(a, u);
            let nd = du.add(weight(g, a));
            if best.get(v).is_none_or(|&dv| nd < dv) {
                best.insert(v, nd);
                pred.insert(v, (u, a));
                heap.push(Keyed::new(nd.add(heuristic(g, v)), v));
            }
        }
    }
    None
}

/// Bellman-Ford from `source` on a digraph: V-1 relaxation rounds over all
/// arcs; a V-th round that still relaxes means a reachable negative cycle,
/// reported as [`Error::NegativeCycle`].
pub fn bellman_ford<G, W, F>(g: &G, source: NodeId, weight: F) -> Result<ShortestPaths<W>>
where
    G: Graph<Dir = Directed>,
    W: Weight,
    F: Fn(&G, ArcId) -> W,
{
    let mut dist: NodeMap<W> = NodeMap::for_graph(g);
    let mut pred = NodeMap::for_graph(g);
    dist.insert(source, W::ZERO);
    let rounds = g.num_nodes().saturating_sub(1);
    for _ in 0..rounds {
        let mut relaxed = false;
        for a in g.arcs() {
            let u = g.src(a);
            let Some(&du) = dist.get(u) else {
                continue;
            };
            let nd = du.add(weight(g, a));
            let v = g.tgt(a);
            if dist.get(v).is_none_or(|&dv| nd < dv) {
                dist.insert(v, nd);
                pred.insert(v, (u, a));
                relaxed = true;
            }
        }
        if !relaxed {
            break;
        }
    }
    for a in g.arcs() {
        let u = g.src(a);
        let Some(&du) = dist.get(u) else {
            continue;
        };
        let nd = du.add(weight(g, a));
        if dist.get(g.tgt(a)).is_none_or(|&dv| nd < dv) {
            return Err(Error::NegativeCycle);
        }
    }
    Ok(ShortestPaths { source, dist, pred })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Graph, LinkedDigraph, LinkedGraph};

    #[test]
    fn dijkstra_relaxation_optimality() {
        let mut g: LinkedGraph<(), u32> = LinkedGraph::new();
        let n: Vec<_> = (0..5).map(|_| g.insert_node(())).collect();
        for (u, v, w) in [(0, 1, 7u32), (0, 2, 3), (2, 1, 2), (1, 3, 1), (2, 3, 8), (3, 4, 2)] {
            g.insert_arc(n[u], n[v], w).unwrap();
        }
        let sp = dijkstra(&g, n[0], |g, a| *g.arc(a));
        assert_eq!(sp.distance(n[1]), Some(5));
        assert_eq!(sp.distance(n[3]), Some(6));
        assert_eq!(sp.distance(n[4]), Some(8));
        assert_eq!(sp.path_to(n[4]).unwrap(), vec![n[0], n[2], n[1], n[3], n[4]]);
        // dist(t) <= dist(u) + w(u, t) for every arc
        for a in g.arcs() {
            let (u, v) = (g.src(a), g.tgt(a));
            let (du, dv) = (sp.distance(u).unwrap(), sp.distance(v).unwrap());
            assert!(dv <= du + *g.arc(a));
            assert!(du <= dv + *g.arc(a)); // undirected: both directions
        }
    }

    #[test]
    fn astar_with_zero_heuristic_matches_dijkstra() {
        let mut g: LinkedDigraph<(), u32> = LinkedDigraph::new();
        let n: Vec<_> = (0..4).map(|_| g.insert_node(())).collect();
        for (u, v, w) in [(0, 1, 1u32), (1, 2, 1), (0, 2, 5), (2, 3, 1)] {
            g.insert_arc(n[u], n[v], w).unwrap();
        }
        let sp = dijkstra(&g, n[0], |g, a| *g.arc(a));
        let (d, path) = astar(&g, n[0], n[3], |g, a| *g.arc(a), |_, _| 0u32).unwrap();
        assert_eq!(Some(d), sp.distance(n[3]));
        assert_eq!(path, sp.path_to(n[3]).unwrap());
    }

    #[test]
    fn bellman_ford_handles_negative_arcs() {
        let mut g: LinkedDigraph<(), i32> = LinkedDigraph::new();
        let n: Vec<_> = (0..4).map(|_| g.insert_node(())).collect();
        for (u, v, w) in [(0, 1, 4i32), (0, 2, 5), (1, 3, 3), (2, 3, -4), (3, 1, 1)] {
            g.insert_arc(n[u], n[v], w).unwrap();
        }
        let sp = bellman_ford(&g, n[0], |g, a| *g.arc(a)).unwrap();
        assert_eq!(sp.distance(n[3]), Some(1));
        assert_eq!(sp.distance(n[1]), Some(2));
    }

    #[test]
    fn bellman_ford_reports_negative_cycles() {
        let mut g: LinkedDigraph<(), i32> = LinkedDigraph::new();
        let a = g.insert_node(());
        let b = g.insert_node(());
        let c = g.insert_node(());
        g.insert_arc(a, b, 1).unwrap();
        g.insert_arc(b, c, -3).unwrap();
        g.insert_arc(c, a, 1).unwrap();
        assert!(matches!(bellman_ford(&g, a, |g, x| *g.arc(x)), Err(Error::NegativeCycle)));
    }

    #[test]
    fn zero_sum_cycle_is_not_negative() {
        let mut g: LinkedDigraph<(), i32> = LinkedDigraph::new();
        let a = g.insert_node(());
        let b = g.insert_node(());
        let c = g.insert_node(());
        g.insert_arc(a, b, 1).unwrap();
        g.insert_arc(b, c, -2).unwrap();
        g.insert_arc(c, a, 1).unwrap();
        let sp = bellman_ford(&g, a, |g, x| *g.arc(x)).unwrap();
        assert_eq!(sp.distance(c), Some(-1));
    }

    #[test]
    fn float_weights_via_ordered_float() {
        let mut g: LinkedGraph<(), OrderedFloat<f64>> = LinkedGraph::new();
        let a = g.insert_node(());
        let b = g.insert_node(());
        let c = g.insert_node(());
        g.insert_arc(a, b, OrderedFloat(1.5)).unwrap();
        g.insert_arc(b, c, OrderedFloat(2.25)).unwrap();
        let sp = dijkstra(&g, a, |g, x| *g.arc(x));
        assert_eq!(sp.distance(c), Some(OrderedFloat(3.75)));
    }
}
