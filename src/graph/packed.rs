//! Packed-array graph storage.
//!
//! Nodes and arcs sit in dense vectors; adjacency is a per-node vector of
//! arc indices. Removal swaps with the last element, so it is O(degree)
//! and **invalidates the id of whatever was swapped in**: ids are stable
//! only while no removal happens. In exchange, everything is
//! cache-friendly and `node_bound == num_nodes`.

use std::marker::PhantomData;

use crate::error::Result;
use crate::graph::{ArcId, Directed, Direction, Graph, NodeId, Undirected, stale};

struct PNode<N> {
    info: N,
    /// Incident arcs (out-arcs for digraphs).
    adj: Vec<u32>,
    /// In-arcs; digraphs only.
    in_adj: Vec<u32>,
}

struct PArc<A> {
    info: A,
    src: u32,
    tgt: u32,
}

/// Dense vector-backed graph.
pub struct PackedGraph<N, A, D = Undirected> {
    nodes: Vec<PNode<N>>,
    arcs: Vec<PArc<A>>,
    _dir: PhantomData<D>,
}

/// Digraph flavour of [`PackedGraph`].
pub type PackedDigraph<N, A> = PackedGraph<N, A, Directed>;

impl<N, A, D: Direction> PackedGraph<N, A, D> {
    /// An empty graph.
    pub fn new() -> Self {
        Self { nodes: Vec::new(), arcs: Vec::new(), _dir: PhantomData }
    }

    fn drop_from_list(list: &mut Vec<u32>, arc: u32) {
        if let Some(pos) = list.iter().position(|&x| x == arc) {
            list.swap_remove(pos);
        }
    }

    fn rename_in_list(list: &mut [u32], from: u32, to: u32) {
        for x in list.iter_mut() {
            if *x == from {
                *x = to;
            }
        }
    }
}

impl<N, A, D: Direction> Default for PackedGraph<N, A, D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N, A, D: Direction> Graph for PackedGraph<N, A, D> {
    type NodeInfo = N;
    type ArcInfo = A;
    type Dir = D;

    fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    fn num_arcs(&self) -> usize {
        self.arcs.len()
    }

    fn insert_node(&mut self, info: N) -> NodeId {
        self.nodes.push(PNode { info, adj: Vec::new(), in_adj: Vec::new() });
        NodeId((self.nodes.len() - 1) as u32)
    }

    fn remove_node(&mut self, n: NodeId) -> Result<N> {
        if !self.contains_node(n) {
            return stale();
        }
        // cascade to incident arcs first
        loop {
            let node = &self.nodes[n.index()];
            let Some(&a) = node.adj.first().or_else(|| node.in_adj.first()) else {
                break;
            };
            self.remove_arc(ArcId(a))?;
        }
        let node = self.nodes.swap_remove(n.index());
        // the node that moved into slot `n` (if any) keeps its arcs; those
        // arcs must now name the new slot
        let moved_old = self.nodes.len() as u32;
        if n.0 != moved_old {
            let adj: Vec<u32> = {
                let m = &self.nodes[n.index()];
                m.adj.iter().chain(m.in_adj.iter()).copied().collect()
            };
            for a in adj {
                let arc = &mut self.arcs[a as usize];
                if arc.src == moved_old {
                    arc.src = n.0;
                }
                if arc.tgt == moved_old {
                    arc.tgt = n.0;
                }
            }
        }
        Ok(node.info)
    }

    fn insert_arc(&mut self, src: NodeId, tgt: NodeId, info: A) -> Result<ArcId> {
        if !self.contains_node(src) || !self.contains_node(tgt) {
            return stale();
        }
        self.arcs.push(PArc { info, src: src.0, tgt: tgt.0 });
        let id = (self.arcs.len() - 1) as u32;
        self.nodes[src.index()].adj.push(id);
        if D::DIRECTED {
            self.nodes[tgt.index()].in_adj.push(id);
        } else if tgt != src {
            self.nodes[tgt.index()].adj.push(id);
        }
        Ok(ArcId(id))
    }

    fn remove_arc(&mut self, a: ArcId) -> Result<A> {
        if !self.contains_arc(a) {
            return stale();
        }
        let (s, t) = (self.arcs[a.index()].src, self.arcs[a.index()].tgt);
        Self::drop_from_list(&mut self.nodes[s as usize].adj, a.0);
        if D::DIRECTED {
            Self::drop_from_list(&mut self.nodes[t as usize].in_adj, a.0);
        } else if s != t {
            Self::drop_from_list(&mut self.nodes[t as usize].adj, a.0);
        }
        let arc = self.arcs.swap_remove(a.index());
        // the arc that moved into slot `a` must be renamed in its
        // endpoints' lists
        let moved_old = self.arcs.len() as u32;
        if a.0 != moved_old {
            let (ms, mt) = (self.arcs[a.index()].src, self.arcs[a.index()].tgt);
            Self::rename_in_list(&mut self.nodes[ms as usize].adj, moved_old, a.0);
            Self::rename_in_list(&mut self.nodes[ms as usize].in_adj, moved_old, a.0);
            if mt != ms {
                Self::rename_in_list(&mut self.nodes[mt as usize].adj, moved_old, a.0);
                Self::rename_in_list(&mut self.nodes[mt as usize].in_adj, moved_old, a.0);
            }
        }
        Ok(arc.info)
    }

    fn contains_node(&self, n: NodeId) -> bool {
        n.index() < self.nodes.len()
    }

    fn contains_arc(&self, a: ArcId) -> bool {
        a.index() < self.arcs.len()
    }

    fn node(&self, n: NodeId) -> &N {
        &self.nodes[n.index()].info
    }

    fn node_mut(&mut self, n: NodeId) -> &mut N {
        &mut self.nodes[n.index()].info
    }

    fn arc(&self, a: ArcId) -> &A {
        &self.arcs[a.index()].info
    }

    fn arc_mut(&mut self, a: ArcId) -> &mut A {
        &mut self.arcs[a.index()].info
    }

    fn src(&self, a: ArcId) -> NodeId {
        NodeId(self.arcs[a.index()].src)
    }

    fn tgt(&self, a: ArcId) -> NodeId {
        NodeId(self.arcs[a.index()].tgt)
    }

    fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len() as u32).map(NodeId)
    }

    fn arcs(&self) -> impl Iterator<Item = ArcId> + '_ {
        (0..self.arcs.len() as u32).map(ArcId)
    }

    fn adjacent(&self, n: NodeId) -> impl Iterator<Item = ArcId> + '_ {
        self.nodes[n.index()].adj.iter().map(|&a| ArcId(a))
    }

    fn node_bound(&self) -> usize {
        self.nodes.len()
    }

    fn arc_bound(&self) -> usize {
        self.arcs.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dense_ids_and_indexed_access() {
        let mut g: PackedGraph<u32, u32> = PackedGraph::new();
        let ids: Vec<_> = (0..5).map(|i| g.insert_node(i)).collect();
        assert_eq!(ids.iter().map(|n| n.index()).collect::<Vec<_>>(), vec![0, 1, 2, 3, 4]);
        let ab = g.insert_arc(ids[0], ids[1], 7).unwrap();
        assert_eq!(*g.arc(ab), 7);
        assert_eq!(g.node_bound(), g.num_nodes());
    }

    #[test]
    fn arc_swap_remove_renames_the_moved_arc() {
        let mut g: PackedGraph<(), u32> = PackedGraph::new();
        let a = g.insert_node(());
        let b = g.insert_node(());
        let c = g.insert_node(());
        let ab = g.insert_arc(a, b, 1).unwrap();
        g.insert_arc(b, c, 2).unwrap();
        g.insert_arc(c, a, 3).unwrap();
        g.remove_arc(ab).unwrap();
        assert_eq!(g.num_arcs(), 2);
        // every adjacency entry must still point at a live, correct arc
        for n in g.nodes().collect::<Vec<_>>() {
            for arc in g.adjacent(n).collect::<Vec<_>>() {
                assert!(g.contains_arc(arc));
                assert!(g.src(arc) == n || g.tgt(arc) == n);
            }
        }
        let weights: Vec<u32> = g.arcs().map(|x| *g.arc(x)).collect();
        assert_eq!(
            {
                let mut w = weights;
                w.sort_unstable();
                w
            },
            vec![2, 3]
        );
    }

    #[test]
    fn node_swap_remove_renames_endpoints() {
        let mut g: PackedDigraph<u32, ()> = PackedGraph::new();
        let n0 = g.insert_node(0);
        let _n1 = g.insert_node(1);
        let n2 = g.insert_node(2);
        let n3 = g.insert_node(3);
        g.insert_arc(n2, n3, ()).unwrap();
        g.insert_arc(n3, n2, ()).unwrap();
        g.remove_node(n0).unwrap();
        // node 3 moved into slot 0; its arcs must follow
        assert_eq!(g.num_nodes(), 3);
        for a in g.arcs().collect::<Vec<_>>() {
            assert!(g.contains_node(g.src(a)));
            assert!(g.contains_node(g.tgt(a)));
            let (s, t) = (g.src(a), g.tgt(a));
            let infos = (*g.node(s), *g.node(t));
            assert!(infos == (2, 3) || infos == (3, 2));
        }
    }
}
