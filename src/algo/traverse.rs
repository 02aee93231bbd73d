//! Depth-first and breadth-first traversal drivers.
//!
//! Both drivers are parameterised by a [`Visitor`] (hooks for nodes, tree
//! arcs, non-tree arcs and node finish) and an arc-filter predicate that
//! hides arcs from the walk. The filter is how residual-style walks run
//! over an existing graph without copying it: pass a predicate that skips
//! saturated arcs.
//!
//! Every hook returns [`Control`]; `Stop` short-circuits the entire
//! traversal and is reported through [`Traversal::stopped`].
//!
//! Note for undirected graphs: the arc used to reach a node is seen again
//! when that node's adjacency is scanned, and is then reported as a
//! non-tree arc. Algorithms that need to ignore the parent arc (cycle
//! tests, cut vertices) track it themselves.

use crate::graph::{ArcId, Graph, NodeId, NodeMap};
use crate::slist::ListQueue;

/// Continue or short-circuit a traversal.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Control {
    /// Keep going.
    Continue,
    /// Abort the traversal now.
    Stop,
}

/// Hooks invoked by the traversal drivers. All default to no-ops.
pub trait Visitor<G: Graph> {
    /// A node is visited for the first time.
    fn on_node(&mut self, _g: &G, _n: NodeId) -> Control {
        Control::Continue
    }

    /// An arc leads to an unvisited node (it joins the traversal tree).
    fn on_tree_arc(&mut self, _g: &G, _a: ArcId, _to: NodeId) -> Control {
        Control::Continue
    }

    /// An arc leads to an already-visited node.
    fn on_non_tree_arc(&mut self, _g: &G, _a: ArcId) -> Control {
        Control::Continue
    }

    /// A node's adjacency is exhausted (DFS post-order; BFS: dequeue end).
    fn on_finish_node(&mut self, _g: &G, _n: NodeId) -> Control {
        Control::Continue
    }
}

/// The arc filter that hides nothing.
pub fn every_arc<G: Graph>(_g: &G, _a: ArcId) -> bool {
    true
}

/// Outcome of a traversal.
pub struct Traversal {
    /// Every node the walk reached.
    pub visited: NodeMap<()>,
    /// `true` when a visitor hook stopped the walk early.
    pub stopped: bool,
}

impl Traversal {
    fn new<G: Graph>(g: &G) -> Self {
        Self { visited: NodeMap::for_graph(g), stopped: false }
    }

    /// Number of nodes reached.
    pub fn reached(&self) -> usize {
        self.visited.len()
    }
}

struct DfsFrame {
    node: NodeId,
    arcs: Vec<ArcId>,
    next: usize,
}

fn dfs_walk<G, V, F>(g: &G, start: NodeId, vis: &mut V, filter: &F, t: &mut Traversal)
where
    G: Graph,
    V: Visitor<G>,
    F: Fn(&G, ArcId) -> bool,
{
    if t.visited.contains(start) {
        return;
    }
    t.visited.insert(start, ());
    if vis.on_node(g, start) == Control::Stop {
        t.stopped = true;
        return;
    }
    let mut stack =
        vec![DfsFrame { node: start, arcs: g.adjacent(start).collect(), next: 0 }];
    while !t.stopped {
        enum Step {
            Arc(NodeId, ArcId),
            Finish(NodeId),
            Done,
        }
        let step = match stack.last_mut() {
            None => Step::Done,
            Some(frame) => {
                if frame.next < frame.arcs.len() {
                    let a = frame.arcs[frame.next];
                    frame.next += 1;
                    Step::Arc(frame.node, a)
                } else {
                    Step::Finish(frame.node)
                }
            }
        };
        match step {
            Step::Done => break,
            Step::Finish(n) => {
                stack.pop();
                if vis.on_finish_node(g, n) == Control::Stop {
                    t.stopped = true;
                }
            }
            Step::Arc(from, a) => {
                if !filter(g, a) {
                    continue;
                }
                let to = g.arc_head(a, from);
                if t.visited.contains(to) {
                    if vis.on_non_tree_arc(g, a) == Control::Stop {
                        t.stopped = true;
                    }
                } else {
                    if vis.on_tree_arc(g, a, to) == Control::Stop {
                        t.stopped = true;
                        break;
                    }
                    t.visited.insert(to, ());
                    if vis.on_node(g, to) == Control::Stop {
                        t.stopped = true;
                        break;
                    }
                    stack.push(DfsFrame { node: to, arcs: g.adjacent(to).collect(), next: 0 });
                }
            }
        }
    }
}

/// Depth-first traversal from `start`.
pub fn dfs_from<G, V, F>(g: &G, start: NodeId, vis: &mut V, filter: F) -> Traversal
where
    G: Graph,
    V: Visitor<G>,
    F: Fn(&G, ArcId) -> bool,
{
    let mut t = Traversal::new(g);
    dfs_walk(g, start, vis, &filter, &mut t);
    t
}

/// Depth-first traversal restarted from every unvisited node, so every
/// node is visited exactly once even across components.
pub fn dfs_all<G, V, F>(g: &G, vis: &mut V, filter: F) -> Traversal
where
    G: Graph,
    V: Visitor<G>,
    F: Fn(&G, ArcId) -> bool,
{
    let mut t = Traversal::new(g);
    for n in g.nodes() {
        if t.stopped {
            break;
        }
        dfs_walk(g, n, vis, &filter, &mut t);
    }
    t
}

/// Breadth-first traversal from `start`.
pub fn bfs_from<G, V, F>(g: &G, start: NodeId, vis: &mut V, filter: F) -> Traversal
where
    G: Graph,
    V: Visitor<G>,
    F: Fn(&G, ArcId) -> bool,
{
    let mut t = Traversal::new(g);
    let mut queue = ListQueue::new();
    t.visited.insert(start, ());
    if vis.on_node(g, start) == Control::Stop {
        t.stopped = true;
        return t;
    }
    queue.put(start);
    'outer: while let Some(u) = queue.get() {
        for a in g.adjacent(u) {
            if !filter(g, a) {
                continue;
            }
            let v = g.arc_head(a, u);
            if t.visited.contains(v) {
                if vis.on_non_tree_arc(g, a) == Control::Stop {
                    t.stopped = true;
                    break 'outer;
                }
            } else {
                if vis.on_tree_arc(g, a, v) == Control::Stop {
                    t.stopped = true;
                    break 'outer;
                }
                t.visited.insert(v, ());
                if vis.on_node(g, v) == Control::Stop {
                    t.stopped = true;
                    break 'outer;
                }
                queue.put(v);
            }
        }
        if vis.on_finish_node(g, u) == Control::Stop {
            t.stopped = true;
            break;
        }
    }
    t
}

/// The BFS spanning tree rooted at `root`: the tree arcs in discovery
/// order, plus each reached node's parent arc.
pub fn spanning_tree<G: Graph>(g: &G, root: NodeId) -> (Vec<ArcId>, NodeMap<ArcId>) {
    struct Collect {
        arcs: Vec<ArcId>,
        parent: NodeMap<ArcId>,
    }
    impl<G: Graph> Visitor<G> for Collect {
        fn on_tree_arc(&mut self, _g: &G, a: ArcId, to: NodeId) -> Control {
            self.arcs.push(a);
            self.parent.insert(to, a);
            Control::Continue
        }
    }
    let mut c = Collect { arcs: Vec::new(), parent: NodeMap::for_graph(g) };
    bfs_from(g, root, &mut c, every_arc);
    (c.arcs, c.parent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Graph, LinkedGraph};

    fn path_graph(n: usize) -> (LinkedGraph<usize, ()>, Vec<NodeId>) {
        let mut g = LinkedGraph::new();
        let ids: Vec<_> = (0..n).map(|i| g.insert_node(i)).collect();
        for w in ids.windows(2) {
            g.insert_arc(w[0], w[1], ()).unwrap();
        }
        (g, ids)
    }

    struct Order(Vec<usize>);
    impl<G: Graph<NodeInfo = usize>> Visitor<G> for Order {
        fn on_node(&mut self, g: &G, n: NodeId) -> Control {
            self.0.push(*g.node(n));
            Control::Continue
        }
    }

    #[test]
    fn dfs_visits_every_node_once() {
        let (g, ids) = path_graph(6);
        let mut vis = Order(Vec::new());
        let t = dfs_from(&g, ids[0], &mut vis, every_arc);
        assert!(!t.stopped);
        assert_eq!(t.reached(), 6);
        assert_eq!(vis.0, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn stop_short_circuits() {
        struct StopAt(usize);
        impl<G: Graph<NodeInfo = usize>> Visitor<G> for StopAt {
            fn on_node(&mut self, g: &G, n: NodeId) -> Control {
                if *g.node(n) == self.0 { Control::Stop } else { Control::Continue }
            }
        }
        let (g, ids) = path_graph(6);
        let t = dfs_from(&g, ids[0], &mut StopAt(3), every_arc);
        assert!(t.stopped);
        assert!(t.reached() < 6);
    }

    #[test]
    fn filter_hides_arcs() {
        let (g, ids) = path_graph(6);
        // hide the arc into node 3: traversal stalls at 2
        let t = dfs_from(&g, ids[0], &mut Order(Vec::new()), |g: &LinkedGraph<usize, ()>, a| {
            *g.node(g.tgt(a)) != 3
        });
        assert_eq!(t.reached(), 3);
    }

    #[test]
    fn bfs_spanning_tree_covers_reachable_nodes() {
        let (g, ids) = path_graph(5);
        let (arcs, parent) = spanning_tree(&g, ids[0]);
        assert_eq!(arcs.len(), 4);
        for &n in &ids[1..] {
            assert!(parent.contains(n));
        }
        assert!(!parent.contains(ids[0]));
    }
}
