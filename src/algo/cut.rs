//! Cut vertices (articulation points) and biconnected blocks.
//!
//! One low-link DFS computes, per node, the discovery order `df` and
//! `low = min(df, back-edge targets, children's low)`. A non-root `u` is a
//! cut vertex iff some DFS child `v` has `low(v) >= df(u)`; the root is a
//! cut vertex iff it has two or more DFS children. Blocks are painted by
//! popping the DFS edge stack at each such boundary.

use crate::graph::{ArcId, ArcMap, Graph, NodeId, NodeMap, Undirected};

/// Result of the block decomposition.
pub struct BlockDecomposition {
    /// The articulation points, deduplicated, in detection order.
    pub cut_nodes: Vec<NodeId>,
    /// Block (biconnected component) id per arc.
    pub block_of_arc: ArcMap<usize>,
    /// Number of blocks painted.
    pub num_blocks: usize,
}

struct Ctx<'g, G: Graph> {
    g: &'g G,
    df: NodeMap<usize>,
    low: NodeMap<usize>,
    time: usize,
    cut_marked: NodeMap<()>,
    cut_nodes: Vec<NodeId>,
    edge_stack: Vec<ArcId>,
    block_of_arc: ArcMap<usize>,
    num_blocks: usize,
}

impl<'g, G: Graph<Dir = Undirected>> Ctx<'g, G> {
    fn new(g: &'g G) -> Self {
        Self {
            g,
            df: NodeMap::for_graph(g),
            low: NodeMap::for_graph(g),
            time: 0,
            cut_marked: NodeMap::for_graph(g),
            cut_nodes: Vec::new(),
            edge_stack: Vec::new(),
            block_of_arc: ArcMap::for_graph(g),
            num_blocks: 0,
        }
    }

    fn mark_cut(&mut self, n: NodeId) {
        if !self.cut_marked.contains(n) {
            self.cut_marked.insert(n, ());
            self.cut_nodes.push(n);
        }
    }

    /// Pop the edge stack down to (and including) `boundary`, painting the
    /// popped arcs as one block.
    fn close_block(&mut self, boundary: ArcId) {
        let id = self.num_blocks;
        self.num_blocks += 1;
        while let Some(a) = self.edge_stack.pop() {
            self.block_of_arc.insert(a, id);
            if a == boundary {
                break;
            }
        }
    }

    fn dfs(&mut self, u: NodeId, parent_arc: Option<ArcId>) -> usize {
        self.time += 1;
        let du = self.time;
        self.df.insert(u, du);
        self.low.insert(u, du);
        let mut children = 0;
        for a in self.g.adjacent(u).collect::<Vec<_>>() {
            if Some(a) == parent_arc {
                continue;
            }
            let v = self.g.arc_head(a, u);
            match self.df.get(v).copied() {
                Some(dv) => {
                    // back edge (up the tree): joins the current block
                    if dv < du {
                        self.edge_stack.push(a);
                        if dv < self.low[u] {
                            self.low.insert(u, dv);
                        }
                    }
                }
                None => {
                    self.edge_stack.push(a);
                    children += 1;
                    let low_v = self.dfs(v, Some(a));
                    if low_v < self.low[u] {
                        self.low.insert(u, low_v);
                    }
                    if low_v >= du {
                        // block boundary at u
                        self.close_block(a);
                        if parent_arc.is_some() {
                            self.mark_cut(u);
                        }
                    }
                }
            }
        }
        if parent_arc.is_none() && children >= 2 {
            self.mark_cut(u);
        }
        self.low[u]
    }
}

/// Full block decomposition of an undirected graph.
pub fn blocks<G>(g: &G) -> BlockDecomposition
where
    G: Graph<Dir = Undirected>,
{
    let mut ctx = Ctx::new(g);
    for n in g.nodes() {
        if !ctx.df.contains(n) {
            ctx.dfs(n, None);
        }
    }
    BlockDecomposition {
        cut_nodes: ctx.cut_nodes,
        block_of_arc: ctx.block_of_arc,
        num_blocks: ctx.num_blocks,
    }
}

/// Just the articulation points.
pub fn cut_nodes<G>(g: &G) -> Vec<NodeId>
where
    G: Graph<Dir = Undirected>,
{
    blocks(g).cut_nodes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::LinkedGraph;

    /// Two triangles sharing the node `m`: `m` is the only cut vertex and
    /// there are exactly two blocks.
    #[test]
    fn bowtie_has_one_cut_vertex_and_two_blocks() {
        let mut g: LinkedGraph<char, ()> = LinkedGraph::new();
        let a = g.insert_node('a');
        let b = g.insert_node('b');
        let m = g.insert_node('m');
        let c = g.insert_node('c');
        let d = g.insert_node('d');
        for (u, v) in [(a, b), (b, m), (m, a), (m, c), (c, d), (d, m)] {
            g.insert_arc(u, v, ()).unwrap();
        }
        let dec = blocks(&g);
        assert_eq!(dec.cut_nodes, vec![m]);
        assert_eq!(dec.num_blocks, 2);
        // arcs of one triangle share a block id, and the two triangles differ
        let ab = g.find_arc(a, b).unwrap();
        let bm = g.find_arc(b, m).unwrap();
        let cd = g.find_arc(c, d).unwrap();
        assert_eq!(dec.block_of_arc[ab], dec.block_of_arc[bm]);
        assert_ne!(dec.block_of_arc[ab], dec.block_of_arc[cd]);
    }

    #[test]
    fn path_interior_nodes_are_cuts() {
        let mut g: LinkedGraph<u32, ()> = LinkedGraph::new();
        let n: Vec<_> = (0..4).map(|i| g.insert_node(i)).collect();
        for w in n.windows(2) {
            g.insert_arc(w[0], w[1], ()).unwrap();
        }
        let mut cuts = cut_nodes(&g);
        cuts.sort();
        assert_eq!(cuts, vec![n[1], n[2]]);
        // each bridge arc is its own block
        assert_eq!(blocks(&g).num_blocks, 3);
    }

    #[test]
    fn cycle_has_no_cut_vertex() {
        let mut g: LinkedGraph<u32, ()> = LinkedGraph::new();
        let n: Vec<_> = (0..5).map(|i| g.insert_node(i)).collect();
        for i in 0..5 {
            g.insert_arc(n[i], n[(i + 1) % 5], ()).unwrap();
        }
        assert!(cut_nodes(&g).is_empty());
        assert_eq!(blocks(&g).num_blocks, 1);
    }
}
