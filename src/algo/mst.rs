//! Minimum spanning trees: Kruskal and Prim.
//!
//! Kruskal sorts arcs by weight (stable, so ties keep insertion order) and
//! admits an arc iff its endpoints are in different [`UnionFind`]
//! components. Prim grows the tree from a root, keeping the frontier in a
//! [`PairingHeap`] and lowering crossing-arc keys with `decrease_key`.
//! Both report [`Error::Disconnected`] when the graph has no spanning
//! tree, and both produce the same total weight.

use crate::algo::paths::Weight;
use crate::error::{Error, Result};
use crate::graph::{ArcId, Graph, NodeId, NodeMap, Undirected};
use crate::heap::{Handle, PairingHeap, PriorityQueue};
use crate::order::Keyed;

/// Disjoint-set forest with union by rank and path compression.
pub struct UnionFind {
    parent: Vec<u32>,
    rank: Vec<u8>,
    sets: usize,
}

impl UnionFind {
    /// `n` singleton sets `0..n`.
    pub fn new(n: usize) -> Self {
        Self { parent: (0..n as u32).collect(), rank: vec![0; n], sets: n }
    }

    /// Representative of `x`'s set. Compresses by path halving.
    pub fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] as usize != x {
            let grand = self.parent[self.parent[x] as usize];
            self.parent[x] = grand;
            x = grand as usize;
        }
        x
    }

    /// Merge the sets of `a` and `b`; `false` when they were already one.
    pub fn union(&mut self, a: usize, b: usize) -> bool {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return false;
        }
        let (hi, lo) = if self.rank[ra] >= self.rank[rb] { (ra, rb) } else { (rb, ra) };
        self.parent[lo] = hi as u32;
        if self.rank[hi] == self.rank[lo] {
            self.rank[hi] += 1;
        }
        self.sets -= 1;
        true
    }

    /// `true` when `a` and `b` share a set.
    pub fn same_set(&mut self, a: usize, b: usize) -> bool {
        self.find(a) == self.find(b)
    }

    /// Number of disjoint sets.
    pub fn num_sets(&self) -> usize {
        self.sets
    }
}

/// Kruskal's MST. Returns the accepted arcs (ascending weight) and the
/// total. O(E log E).
pub fn kruskal<G, W, F>(g: &G, weight: F) -> Result<(Vec<ArcId>, W)>
where
    G: Graph<Dir = Undirected>,
    W: Weight,
    F: Fn(&G, ArcId) -> W,
{
    let n = g.num_nodes();
    if n == 0 {
        return Ok((Vec::new(), W::ZERO));
    }
    let mut index = NodeMap::for_graph(g);
    for (i, v) in g.nodes().enumerate() {
        index.insert(v, i);
    }
    let mut arcs: Vec<(W, ArcId)> = g.arcs().map(|a| (weight(g, a), a)).collect();
    arcs.sort_by_key(|&(w, _)| w); // stable: equal weights keep insertion order
    let mut uf = UnionFind::new(n);
    let mut tree = Vec::with_capacity(n - 1);
    let mut total = W::ZERO;
    for (w, a) in arcs {
        if uf.union(index[g.src(a)], index[g.tgt(a)]) {
            tree.push(a);
            total = total.add(w);
            if tree.len() == n - 1 {
                break;
            }
        }
    }
    if tree.len() != n - 1 {
        return Err(Error::Disconnected);
    }
    Ok((tree, total))
}

/// Prim's MST from an arbitrary root. Returns the tree arcs (in the order
/// nodes joined the tree) and the total. O(E log V).
pub fn prim<G, W, F>(g: &G, weight: F) -> Result<(Vec<ArcId>, W)>
where
    G: Graph<Dir = Undirected>,
    W: Weight,
    F: Fn(&G, ArcId) -> W,
{
    let n = g.num_nodes();
    if n == 0 {
        return Ok((Vec::new(), W::ZERO));
    }
    let root = g.nodes().next().expect("non-empty graph");
    let mut in_tree: NodeMap<()> = NodeMap::for_graph(g);
    // best crossing arc per frontier node, plus its heap handle
    let mut best: NodeMap<(W, ArcId, Handle)> = NodeMap::for_graph(g);
    let mut heap: PairingHeap<Keyed<W, NodeId>> = PairingHeap::new();
    let mut tree = Vec::with_capacity(n - 1);
    let mut total = W::ZERO;

    in_tree.insert(root, ());
    let relax = |u: NodeId,
                     in_tree: &NodeMap<()>,
                     best: &mut NodeMap<(W, ArcId, Handle)>,
                     heap: &mut PairingHeap<Keyed<W, NodeId>>| {
        for a in g.adjacent(u) {
            let v = g.arc_head(a, u);
            if in_tree.contains(v) {
                continue;
            }
            let w = weight(g, a);
            match best.get(v).copied() {
                None => {
                    let h = heap.push(Keyed::new(w, v));
                    best.insert(v, (w, a, h));
                }
                Some((old, _, h)) if w < old => {
                    heap.decrease_key(h, Keyed::new(w, v)).expect("handle is live");
                    best.insert(v, (w, a, h));
                }
                Some(_) => {}
            }
        }
    };
    relax(root, &in_tree, &mut best, &mut heap);

    while let Some(Keyed { prio: w, item: v }) = heap.pop() {
        debug_assert!(!in_tree.contains(v), "decrease-key keeps one entry per node");
        in_tree.insert(v, ());
        let (_, arc, _) = *best.get(v).expect("popped nodes carry a best arc");
        tree.push(arc);
        total = total.add(w);
        relax(v, &in_tree, &mut best, &mut heap);
    }

    if tree.len() != n - 1 {
        return Err(Error::Disconnected);
    }
    Ok((tree, total))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::LinkedGraph;

    fn weighted(edges: &[(usize, usize, u32)], n: usize) -> (LinkedGraph<usize, u32>, Vec<NodeId>) {
        let mut g = LinkedGraph::new();
        let ids: Vec<_> = (0..n).map(|i| g.insert_node(i)).collect();
        for &(u, v, w) in edges {
            g.insert_arc(ids[u], ids[v], w).unwrap();
        }
        (g, ids)
    }

    #[test]
    fn union_find_basics() {
        let mut uf = UnionFind::new(6);
        assert!(uf.union(0, 1));
        assert!(uf.union(2, 3));
        assert!(!uf.union(1, 0));
        assert!(uf.union(0, 2));
        assert!(uf.same_set(1, 3));
        assert!(!uf.same_set(1, 4));
        assert_eq!(uf.num_sets(), 3);
    }

    #[test]
    fn kruskal_and_prim_agree_on_total() {
        // A-B:4 A-C:2 B-C:3 B-D:2 C-D:4 C-E:3 D-E:3 D-F:2 E-F:3  => MST 13
        let (g, _) = weighted(
            &[
                (0, 1, 4),
                (0, 2, 2),
                (1, 2, 3),
                (1, 3, 2),
                (2, 3, 4),
                (2, 4, 3),
                (3, 4, 3),
                (3, 5, 2),
                (4, 5, 3),
            ],
            6,
        );
        let (k_arcs, k_total) = kruskal(&g, |g, a| *g.arc(a)).unwrap();
        let (p_arcs, p_total) = prim(&g, |g, a| *g.arc(a)).unwrap();
        assert_eq!(k_total, 13);
        assert_eq!(p_total, 13);
        assert_eq!(k_arcs.len(), 5);
        assert_eq!(p_arcs.len(), 5);
    }

    #[test]
    fn disconnected_graphs_are_rejected() {
        let (g, _) = weighted(&[(0, 1, 1)], 3);
        assert!(matches!(kruskal(&g, |g, a| *g.arc(a)), Err(Error::Disconnected)));
        assert!(matches!(prim(&g, |g, a| *g.arc(a)), Err(Error::Disconnected)));
    }

    #[test]
    fn single_node_graph_has_an_empty_tree() {
        let (g, _) = weighted(&[], 1);
        let (arcs, total) = kruskal(&g, |g, a| *g.arc(a)).unwrap();
        assert!(arcs.is_empty());
        assert_eq!(total, 0);
        let (arcs, total) = prim(&g, |g, a| *g.arc(a)).unwrap();
        assert!(arcs.is_empty());
        assert_eq!(total, 0);
    }
}
