//! Singly-linked adjacency storage.
//!
//! Same slab layout as [`LinkedGraph`](crate::graph::LinkedGraph) but arcs
//! carry only forward links, halving the per-arc threading footprint.
//! The price: removing an arc walks its endpoint lists to find the
//! predecessors, so `remove_arc` is O(degree).

use std::marker::PhantomData;

use crate::error::Result;
use crate::graph::{ArcId, Directed, Direction, Graph, NodeId, Undirected, stale};

struct NodeSlot<N> {
    info: N,
    heads: [Option<u32>; 2],
    tails: [Option<u32>; 2],
}

struct ArcSlot<A> {
    info: A,
    src: u32,
    tgt: u32,
    /// `next[0]` threads `src`'s list, `next[1]` threads `tgt`'s list.
    next: [Option<u32>; 2],
}

/// Graph with singly-linked adjacency lists.
pub struct CompactGraph<N, A, D = Undirected> {
    nodes: Vec<Option<NodeSlot<N>>>,
    node_free: Vec<u32>,
    arcs: Vec<Option<ArcSlot<A>>>,
    arc_free: Vec<u32>,
    num_nodes: usize,
    num_arcs: usize,
    _dir: PhantomData<D>,
}

/// Digraph flavour of [`CompactGraph`].
pub type CompactDigraph<N, A> = CompactGraph<N, A, Directed>;

impl<N, A, D: Direction> CompactGraph<N, A, D> {
    /// An empty graph.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            node_free: Vec::new(),
            arcs: Vec::new(),
            arc_free: Vec::new(),
            num_nodes: 0,
            num_arcs: 0,
            _dir: PhantomData,
        }
    }

    fn pair_for(&self, arc: u32, node: u32, list: usize) -> usize {
        let a = self.arcs[arc as usize].as_ref().expect("live arc");
        if list == 0 && a.src == node { 0 } else { 1 }
    }

    fn append(&mut self, node: u32, list: usize, arc: u32, pair: usize) {
        self.arcs[arc as usize].as_mut().expect("live arc").next[pair] = None;
        let tail = self.nodes[node as usize].as_ref().expect("live node").tails[list];
        match tail {
            Some(t) => {
                let tp = self.pair_for(t, node, list);
                self.arcs[t as usize].as_mut().expect("live arc").next[tp] = Some(arc);
            }
            None => self.nodes[node as usize].as_mut().expect("live node").heads[list] = Some(arc),
        }
        self.nodes[node as usize].as_mut().expect("live node").tails[list] = Some(arc);
    }

    /// O(degree): walk the list to find the predecessor, then relink.
    fn unlink(&mut self, node: u32, list: usize, arc: u32, pair: usize) {
        let next = self.arcs[arc as usize].as_ref().expect("live arc").next[pair];
        let head = self.nodes[node as usize].as_ref().expect("live node").heads[list];
        if head == Some(arc) {
            self.nodes[node as usize].as_mut().expect("live node").heads[list] = next;
        } else {
            let mut cur = head;
            while let Some(id) = cur {
                let p = self.pair_for(id, node, list);
                let id_next = self.arcs[id as usize].as_ref().expect("live arc").next[p];
                if id_next == Some(arc) {
                    self.arcs[id as usize].as_mut().expect("live arc").next[p] = next;
                    break;
                }
                cur = id_next;
            }
        }
        if next.is_none() {
            // removed the tail: rescan for the new one
            let mut tail = None;
            let mut cur = self.nodes[node as usize].as_ref().expect("live node").heads[list];
            while let Some(id) = cur {
                tail = Some(id);
                let p = self.pair_for(id, node, list);
                cur = self.arcs[id as usize].as_ref().expect("live arc").next[p];
            }
            self.nodes[node as usize].as_mut().expect("live node").tails[list] = tail;
        }
    }

    fn list_arcs(&self, node: u32, list: usize) -> Vec<u32> {
        let mut out = Vec::new();
        let mut cur = self.nodes[node as usize].as_ref().expect("live node").heads[list];
        while let Some(id) = cur {
            out.push(id);
            let p = self.pair_for(id, node, list);
            cur = self.arcs[id as usize].as_ref().expect("live arc").next[p];
        }
        out
    }
}

impl<N, A, D: Direction> Default for CompactGraph<N, A, D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N, A, D: Direction> Graph for CompactGraph<N, A, D> {
    type NodeInfo = N;
    type ArcInfo = A;
    type Dir = D;

    fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    fn num_arcs(&self) -> usize {
        self.num_arcs
    }

    fn insert_node(&mut self, info: N) -> NodeId {
        let slot = NodeSlot { info, heads: [None, None], tails: [None, None] };
        let id = match self.node_free.pop() {
            Some(i) => {
                self.nodes[i as usize] = Some(slot);
                i
            }
            None => {
                self.nodes.push(Some(slot));
                (self.nodes.len() - 1) as u32
            }
        };
        self.num_nodes += 1;
        NodeId(id)
    }

    fn remove_node(&mut self, n: NodeId) -> Result<N> {
        if !self.contains_node(n) {
            return stale();
        }
        let mut incident = self.list_arcs(n.0, 0);
        if D::DIRECTED {
            incident.extend(self.list_arcs(n.0, 1));
        }
        for a in incident {
            if self.arcs[a as usize].is_some() {
                self.remove_arc(ArcId(a))?;
            }
        }
        let slot = self.nodes[n.index()].take().expect("live node");
        self.node_free.push(n.0);
        self.num_nodes -= 1;
        Ok(slot.info)
    }

    fn insert_arc(&mut self, src: NodeId, tgt: NodeId, info: A) -> Result<ArcId> {
        if !self.contains_node(src) || !self.contains_node(tgt) {
            return stale();
        }
        let slot = ArcSlot { info, src: src.0, tgt: tgt.0, next: [None, None] };
        let id = match self.arc_free.pop() {
            Some(i) => {
                self.arcs[i as usize] = Some(slot);
                i
            }
            None => {
                self.arcs.push(Some(slot));
                (self.arcs.len() - 1) as u32
            }
        };
        self.append(src.0, 0, id, 0);
        if D::DIRECTED {
            self.append(tgt.0, 1, id, 1);
        } else if tgt != src {
            self.append(tgt.0, 0, id, 1);
        }
        self.num_arcs += 1;
        Ok(ArcId(id))
    }

    fn remove_arc(&mut self, a: ArcId) -> Result<A> {
        if !self.contains_arc(a) {
            return stale();
        }
        let (s, t) = {
            let slot = self.arcs[a.index()].as_ref().expect("live arc");
            (slot.src, slot.tgt)
        };
        self.unlink(s, 0, a.0, 0);
        if D::DIRECTED {
            self.unlink(t, 1, a.0, 1);
        } else if s != t {
            self.unlink(t, 0, a.0, 1);
        }
        let slot = self.arcs[a.index()].take().expect("live arc");
        self.arc_free.push(a.0);
        self.num_arcs -= 1;
        Ok(slot.info)
    }

    fn contains_node(&self, n: NodeId) -> bool {
        matches!(self.nodes.get(n.index()), Some(Some(_)))
    }

    fn contains_arc(&self, a: ArcId) -> bool {
        matches!(self.arcs.get(a.index()), Some(Some(_)))
    }

    fn node(&self, n: NodeId) -> &N {
        &self.nodes[n.index()].as_ref().expect("stale node id").info
    }

    fn node_mut(&mut self, n: NodeId) -> &mut N {
        &mut self.nodes[n.index()].as_mut().expect("stale node id").info
    }

    fn arc(&self, a: ArcId) -> &A {
        &self.arcs[a.index()].as_ref().expect("stale arc id").info
    }

    fn arc_mut(&mut self, a: ArcId) -> &mut A {
        &mut self.arcs[a.index()].as_mut().expect("stale arc id").info
    }

    fn src(&self, a: ArcId) -> NodeId {
        NodeId(self.arcs[a.index()].as_ref().expect("stale arc id").src)
    }

    fn tgt(&self, a: ArcId) -> NodeId {
        NodeId(self.arcs[a.index()].as_ref().expect("stale arc id").tgt)
    }

    fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|_| NodeId(i as u32)))
    }

    fn arcs(&self) -> impl Iterator<Item = ArcId> + '_ {
        self.arcs.iter().enumerate().filter_map(|(i, s)| s.as_ref().map(|_| ArcId(i as u32)))
    }

    fn adjacent(&self, n: NodeId) -> impl Iterator<Item = ArcId> + '_ {
        let mut cur =
            self.nodes.get(n.index()).and_then(|s| s.as_ref()).and_then(|s| s.heads[0]);
        std::iter::from_fn(move || {
            let id = cur?;
            let p = self.pair_for(id, n.0, 0);
            cur = self.arcs[id as usize].as_ref().expect("live arc").next[p];
            Some(ArcId(id))
        })
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
    fn adjacency_keeps_insertion_order() {
        let mut g: CompactGraph<(), u32> = CompactGraph::new();
        let a = g.insert_node(());
        let b = g.insert_node(());
        for i in 0..4 {
            g.insert_arc(a, b, i).unwrap();
        }
        let infos: Vec<u32> = g.adjacent(a).map(|x| *g.arc(x)).collect();
        assert_eq!(infos, vec![0, 1, 2, 3]);
    }

    #[test]
    fn middle_and_tail_removal_relink() {
        let mut g: CompactGraph<(), u32> = CompactGraph::new();
        let a = g.insert_node(());
        let b = g.insert_node(());
        let arcs: Vec<_> = (0..4).map(|i| g.insert_arc(a, b, i).unwrap()).collect();
        g.remove_arc(arcs[1]).unwrap();
        g.remove_arc(arcs[3]).unwrap();
        let infos: Vec<u32> = g.adjacent(a).map(|x| *g.arc(x)).collect();
        assert_eq!(infos, vec![0, 2]);
        // appending after a tail removal still works
        g.insert_arc(a, b, 9).unwrap();
        let infos: Vec<u32> = g.adjacent(a).map(|x| *g.arc(x)).collect();
        assert_eq!(infos, vec![0, 2, 9]);
    }

    #[test]
    fn digraph_node_removal_clears_in_arcs() {
        let mut g: CompactDigraph<u8, ()> = CompactGraph::new();
        let a = g.insert_node(0);
        let b = g.insert_node(1);
        let c = g.insert_node(2);
        g.insert_arc(a, b, ()).unwrap();
        g.insert_arc(c, b, ()).unwrap();
        g.insert_arc(b, c, ()).unwrap();
        g.remove_node(b).unwrap();
        assert_eq!(g.num_arcs(), 0);
        assert_eq!(g.adjacent(a).count(), 0);
        assert_eq!(g.adjacent(c).count(), 0);
    }
}
