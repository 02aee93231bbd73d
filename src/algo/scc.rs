//! Strongly connected components: Tarjan (one pass) and Kosaraju (two
//! passes over the reversal).
//!
//! Both return `(component count, component id per node)` and produce the
//! same partition of the vertex set; the numeric ids may differ.

use crate::graph::{ArcId, Directed, Graph, NodeId, NodeMap, reverse_graph};
use crate::slist::ListStack;

struct TarjanCtx<'g, G: Graph> {
    g: &'g G,
    index: NodeMap<usize>,
    low: NodeMap<usize>,
    on_stack: NodeMap<()>,
    stack: Vec<NodeId>,
    time: usize,
    comp: NodeMap<usize>,
    count: usize,
}

impl<'g, G: Graph<Dir = Directed>> TarjanCtx<'g, G> {
    fn dfs(&mut self, u: NodeId) {
        self.time += 1;
        self.index.insert(u, self.time);
        self.low.insert(u, self.time);
        self.stack.push(u);
        self.on_stack.insert(u, ());
        for a in self.g.adjacent(u).collect::<Vec<_>>() {
            let v = self.g.tgt(a);
            if !self.index.contains(v) {
                self.dfs(v);
                if self.low[v] < self.low[u] {
                    let lv = self.low[v];
                    self.low.insert(u, lv);
                }
            } else if self.on_stack.contains(v) && self.index[v] < self.low[u] {
                let iv = self.index[v];
                self.low.insert(u, iv);
            }
        }
        if self.low[u] == self.index[u] {
            // u roots a component: pop it off the stack
            loop {
                let v = self.stack.pop().expect("component root is on the stack");
                self.on_stack.remove(v);
                self.comp.insert(v, self.count);
                if v == u {
                    break;
                }
            }
            self.count += 1;
        }
    }
}

/// Tarjan's single-pass low-link SCC.
pub fn tarjan_scc<G>(g: &G) -> (usize, NodeMap<usize>)
where
    G: Graph<Dir = Directed>,
{
    let mut ctx = TarjanCtx {
        g,
        index: NodeMap::for_graph(g),
        low: NodeMap::for_graph(g),
        on_stack: NodeMap::for_graph(g),
        stack: Vec::new(),
        time: 0,
        comp: NodeMap::for_graph(g),
        count: 0,
    };
    for n in g.nodes() {
        if !ctx.index.contains(n) {
            ctx.dfs(n);
        }
    }
    (ctx.count, ctx.comp)
}

/// Iterative DFS post-order (finish order) over the whole digraph.
fn finish_order<G: Graph<Dir = Directed>>(g: &G) -> Vec<NodeId> {
    let mut visited = NodeMap::for_graph(g);
    let mut order = Vec::with_capacity(g.num_nodes());
    for root in g.nodes() {
        if visited.contains(root) {
            continue;
        }
        visited.insert(root, ());
        let mut stack: Vec<(NodeId, Vec<ArcId>, usize)> =
            vec![(root, g.adjacent(root).collect(), 0)];
        loop {
            let step = match stack.last_mut() {
                None => break,
                Some(top) if top.2 >= top.1.len() => None,
                Some(top) => {
                    let a = top.1[top.2];
                    top.2 += 1;
                    Some(a)
                }
            };
            match step {
                None => {
                    let (n, _, _) = stack.pop().expect("non-empty stack");
                    order.push(n);
                }
                Some(a) => {
                    let v = g.tgt(a);
                    if !visited.contains(v) {
                        visited.insert(v, ());
                        stack.push((v, g.adjacent(v).collect(), 0));
                    }
                }
            }
        }
    }
    order
}

/// Kosaraju's two-pass SCC: finish order on `g`, then DFS on the reversal
/// in reverse finish order. The reversal is built through
/// [`reverse_graph`] and its [`Correspondence`](crate::graph::Correspondence).
pub fn kosaraju_scc<G>(g: &G) -> (usize, NodeMap<usize>)
where
    G: Graph<Dir = Directed> + Default,
    G::NodeInfo: Clone,
    G::ArcInfo: Clone,
{
    let order = finish_order(g);
    let (rev, corr) = reverse_graph(g);
    let mut comp: NodeMap<usize> = NodeMap::for_graph(g);
    let mut count = 0;
    for &u in order.iter().rev() {
        if comp.contains(u) {
            continue;
        }
        // paint u's component by walking the reversal
        let mut stack = ListStack::new();
        comp.insert(u, count);
        stack.push(corr.node(u).expect("every node is mapped"));
        while let Some(rv) = stack.pop() {
            for a in rev.adjacent(rv) {
                let rw = rev.tgt(a);
                let w = corr.node_rev(rw).expect("every node is mapped");
                if !comp.contains(w) {
                    comp.insert(w, count);
                    stack.push(rw);
                }
            }
        }
        count += 1;
    }
    (count, comp)
}

/// `true` when `a` and `b` define the same partition of the same node set.
pub fn same_partition(
    nodes: impl Iterator<Item = NodeId>,
    a: &NodeMap<usize>,
    b: &NodeMap<usize>,
) -> bool {
    // ids may differ, so check pairwise agreement through a bijection
    let mut a_to_b: Vec<Option<usize>> = Vec::new();
    let mut b_to_a: Vec<Option<usize>> = Vec::new();
    for n in nodes {
        let (Some(&ca), Some(&cb)) = (a.get(n), b.get(n)) else {
            return false;
        };
        if a_to_b.len() <= ca {
            a_to_b.resize(ca + 1, None);
        }
        if b_to_a.len() <= cb {
            b_to_a.resize(cb + 1, None);
        }
        match (a_to_b[ca], b_to_a[cb]) {
            (None, None) => {
                a_to_b[ca] = Some(cb);
                b_to_a[cb] = Some(ca);
            }
            (Some(x), Some(y)) if x == cb && y == ca => {}
            _ => return false,
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::LinkedDigraph;

    fn sample() -> (LinkedDigraph<u32, ()>, Vec<NodeId>) {
        // components: {0,1,2}, {3,4}, {5}
        let mut g = LinkedDigraph::new();
        let n: Vec<_> = (0..6).map(|i| g.insert_node(i)).collect();
        for (u, v) in [(0, 1), (1, 2), (2, 0), (1, 3), (3, 4), (4, 3), (4, 5)] {
            g.insert_arc(n[u], n[v], ()).unwrap();
        }
        (g, n)
    }

    #[test]
    fn tarjan_partitions() {
        let (g, n) = sample();
        let (count, comp) = tarjan_scc(&g);
        assert_eq!(count, 3);
        assert_eq!(comp[n[0]], comp[n[1]]);
        assert_eq!(comp[n[1]], comp[n[2]]);
        assert_eq!(comp[n[3]], comp[n[4]]);
        assert_ne!(comp[n[0]], comp[n[3]]);
        assert_ne!(comp[n[4]], comp[n[5]]);
    }

    #[test]
    fn kosaraju_matches_tarjan() {
        let (g, _) = sample();
        let (ct, t) = tarjan_scc(&g);
        let (ck, k) = kosaraju_scc(&g);
        assert_eq!(ct, ck);
        assert!(same_partition(g.nodes(), &t, &k));
    }

    #[test]
    fn single_nodes_are_their_own_component() {
        let mut g: LinkedDigraph<(), ()> = LinkedDigraph::new();
        let a = g.insert_node(());
        let b = g.insert_node(());
        g.insert_arc(a, b, ()).unwrap();
        let (count, comp) = tarjan_scc(&g);
        assert_eq!(count, 2);
        assert_ne!(comp[a], comp[b]);
    }
}
