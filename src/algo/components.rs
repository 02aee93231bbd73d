//! Connectivity, reachability and cycle tests.

use crate::graph::{ArcId, Directed, Graph, NodeId, NodeMap, Undirected};
use crate::slist::ListQueue;

/// Assign every node a component id; returns `(component count, ids)`.
/// Linear time.
pub fn connected_components<G>(g: &G) -> (usize, NodeMap<usize>)
where
    G: Graph<Dir = Undirected>,
{
    let mut comp = NodeMap::for_graph(g);
    let mut count = 0;
    for root in g.nodes() {
        if comp.contains(root) {
            continue;
        }
        let mut queue = ListQueue::new();
        comp.insert(root, count);
        queue.put(root);
        while let Some(u) = queue.get() {
            for a in g.adjacent(u) {
                let v = g.arc_head(a, u);
                if !comp.contains(v) {
                    comp.insert(v, count);
                    queue.put(v);
                }
            }
        }
        count += 1;
    }
    (count, comp)
}

/// `true` when the graph has at most one connected component.
pub fn is_connected<G>(g: &G) -> bool
where
    G: Graph<Dir = Undirected>,
{
    connected_components(g).0 <= 1
}

/// A shortest (fewest-arcs) path `from -> to`, as the node sequence
/// including both endpoints. Works on either flavour.
pub fn find_path<G: Graph>(g: &G, from: NodeId, to: NodeId) -> Option<Vec<NodeId>> {
    if from == to {
        return Some(vec![from]);
    }
    let mut pred: NodeMap<NodeId> = NodeMap::for_graph(g);
    let mut seen = NodeMap::for_graph(g);
    let mut queue = ListQueue::new();
    seen.insert(from, ());
    queue.put(from);
    'search: while let Some(u) = queue.get() {
        for a in g.adjacent(u) {
            let v = g.arc_head(a, u);
            if seen.contains(v) {
                continue;
            }
            seen.insert(v, ());
            pred.insert(v, u);
            if v == to {
                break 'search;
            }
            queue.put(v);
        }
    }
    if !seen.contains(to) {
        return None;
    }
    let mut path = vec![to];
    let mut cur = to;
    while let Some(&p) = pred.get(cur) {
        path.push(p);
        cur = p;
    }
    path.reverse();
    Some(path)
}

/// `true` when the undirected graph contains a cycle (parallel arcs and
/// self-loops count).
pub fn has_cycle<G>(g: &G) -> bool
where
    G: Graph<Dir = Undirected>,
{
    let mut visited = NodeMap::for_graph(g);
    for root in g.nodes() {
        if visited.contains(root) {
            continue;
        }
        visited.insert(root, ());
        let mut stack: Vec<(NodeId, Option<ArcId>, Vec<ArcId>, usize)> =
            vec![(root, None, g.adjacent(root).collect(), 0)];
        loop {
            let step = match stack.last_mut() {
                None => break,
                Some(top) if top.3 >= top.2.len() => None,
                Some(top) => {
                    let a = top.2[top.3];
                    top.3 += 1;
                    Some((top.0, top.1, a))
                }
            };
            match step {
                None => {
                    stack.pop();
                }
                Some((u, incoming, a)) => {
                    if Some(a) == incoming {
                        continue;
                    }
                    let v = g.arc_head(a, u);
                    if visited.contains(v) {
                        return true;
                    }
                    visited.insert(v, ());
                    stack.push((v, Some(a), g.adjacent(v).collect(), 0));
                }
            }
        }
    }
    false
}

/// `true` when the digraph has no directed cycle.
pub fn is_acyclic<G>(g: &G) -> bool
where
    G: Graph<Dir = Directed>,
{
    #[derive(Clone, Copy, PartialEq)]
    enum Color {
        Gray,
        Black,
    }
    let mut color: NodeMap<Color> = NodeMap::for_graph(g);
    for root in g.nodes() {
        if color.contains(root) {
            continue;
        }
        let mut stack: Vec<(NodeId, Vec<ArcId>, usize)> =
            vec![(root, g.adjacent(root).collect(), 0)];
        color.insert(root, Color::Gray);
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
                    color.insert(n, Color::Black);
                }
                Some(a) => {
                    let v = g.tgt(a);
                    match color.get(v) {
                        Some(Color::Gray) => return false,
                        Some(Color::Black) => {}
                        None => {
                            color.insert(v, Color::Gray);
                            stack.push((v, g.adjacent(v).collect(), 0));
                        }
                    }
                }
            }
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{LinkedDigraph, LinkedGraph};

    #[test]
    fn counts_components() {
        let mut g: LinkedGraph<(), ()> = LinkedGraph::new();
        let n: Vec<_> = (0..6).map(|_| g.insert_node(())).collect();
        g.insert_arc(n[0], n[1], ()).unwrap();
        g.insert_arc(n[1], n[2], ()).unwrap();
        g.insert_arc(n[3], n[4], ()).unwrap();
        let (count, comp) = connected_components(&g);
        assert_eq!(count, 3);
        assert_eq!(comp[n[0]], comp[n[2]]);
        assert_eq!(comp[n[3]], comp[n[4]]);
        assert_ne!(comp[n[0]], comp[n[5]]);
        assert!(!is_connected(&g));
    }

    #[test]
    fn finds_a_shortest_path() {
        let mut g: LinkedDigraph<u32, ()> = LinkedDigraph::new();
        let n: Vec<_> = (0..5).map(|i| g.insert_node(i)).collect();
        g.insert_arc(n[0], n[1], ()).unwrap();
        g.insert_arc(n[1], n[2], ()).unwrap();
        g.insert_arc(n[2], n[4], ()).unwrap();
        g.insert_arc(n[0], n[3], ()).unwrap();
        g.insert_arc(n[3], n[4], ()).unwrap();
        let p = find_path(&g, n[0], n[4]).unwrap();
        assert_eq!(p.len(), 3);
        assert_eq!(p[0], n[0]);
        assert_eq!(p[2], n[4]);
        assert_eq!(find_path(&g, n[4], n[0]), None);
    }

    #[test]
    fn detects_undirected_cycles() {
        let mut g: LinkedGraph<(), ()> = LinkedGraph::new();
        let n: Vec<_> = (0..4).map(|_| g.insert_node(())).collect();
        g.insert_arc(n[0], n[1], ()).unwrap();
        g.insert_arc(n[1], n[2], ()).unwrap();
        assert!(!has_cycle(&g));
        g.insert_arc(n[2], n[0], ()).unwrap();
        assert!(has_cycle(&g));
    }

    #[test]
    fn parallel_arcs_are_a_cycle() {
        let mut g: LinkedGraph<(), ()> = LinkedGraph::new();
        let a = g.insert_node(());
        let b = g.insert_node(());
        g.insert_arc(a, b, ()).unwrap();
        assert!(!has_cycle(&g));
        g.insert_arc(a, b, ()).unwrap();
        assert!(has_cycle(&g));
    }

    #[test]
    fn dag_test() {
        let mut g: LinkedDigraph<(), ()> = LinkedDigraph::new();
        let n: Vec<_> = (0..3).map(|_| g.insert_node(())).collect();
        g.insert_arc(n[0], n[1], ()).unwrap();
        g.insert_arc(n[1], n[2], ()).unwrap();
        assert!(is_acyclic(&g));
        g.insert_arc(n[2], n[0], ()).unwrap();
        assert!(!is_acyclic(&g));
    }
}
