//! The storage contract, exercised identically against every back-end.

use alder::testing::*;
use alder::{
    CompactDigraph, CompactGraph, Graph, LinkedDigraph, LinkedGraph, PackedDigraph, PackedGraph,
    clone_graph, reverse_graph,
};

/// Every arc must appear in its source's adjacency (and its target's for
/// undirected graphs); counters must match the live structure.
fn adjacency_consistency<G>(g: &G)
where
    G: Graph,
{
    assert_eq!(g.nodes().count(), g.num_nodes());
    assert_eq!(g.arcs().count(), g.num_arcs());
    for a in g.arcs() {
        let (s, t) = (g.src(a), g.tgt(a));
        assert!(g.adjacent(s).any(|x| x == a), "arc missing from source adjacency");
        if !g.is_directed() {
            assert!(g.adjacent(t).any(|x| x == a), "arc missing from target adjacency");
            assert_eq!(g.other_endpoint(a, s), t);
            assert_eq!(g.other_endpoint(a, t), s);
        }
    }
}

fn undirected_contract<G>()
where
    G: Graph<NodeInfo = usize, ArcInfo = (), Dir = alder::Undirected> + Default,
{
    let (mut g, ids) =
        graph_from_edges::<G>(6, &[(0, 1), (1, 2), (2, 3), (3, 0), (2, 4), (4, 5)]);
    adjacency_consistency(&g);
    assert_eq!(g.num_nodes(), 6);
    assert_eq!(g.num_arcs(), 6);
    assert_eq!(g.degree(ids[2]), 3);
    assert!(g.find_arc(ids[0], ids[3]).is_some());
    assert!(g.find_arc(ids[3], ids[0]).is_some());
    assert!(g.find_arc(ids[0], ids[5]).is_none());

    let a = g.find_arc(ids[1], ids[2]).unwrap();
    g.remove_arc(a).unwrap();
    adjacency_consistency(&g);
    assert_eq!(g.num_arcs(), 5);
    assert!(g.find_arc(ids[1], ids[2]).is_none());

    g.remove_node(ids[2]).unwrap();
    adjacency_consistency(&g);
    assert_eq!(g.num_nodes(), 5);
    // node 2 had arcs to 3 and 4 left; both must be gone
    assert_eq!(g.num_arcs(), 3);
}

fn directed_contract<G>()
where
    G: Graph<NodeInfo = usize, ArcInfo = (), Dir = alder::Directed> + Default,
{
    let (mut g, ids) = graph_from_edges::<G>(4, &[(0, 1), (1, 2), (2, 0), (2, 3)]);
    adjacency_consistency(&g);
    // adjacency is out-arcs only
    assert_eq!(g.degree(ids[0]), 1);
    assert!(g.find_arc(ids[0], ids[1]).is_some());
    assert!(g.find_arc(ids[1], ids[0]).is_none());

    // removing a node clears both its out-arcs and its in-arcs
    g.remove_node(ids[2]).unwrap();
    adjacency_consistency(&g);
    assert_eq!(g.num_arcs(), 1);
    assert!(g.find_arc(ids[0], ids[1]).is_some());
}

#[test]
fn linked_undirected_contract() {
    undirected_contract::<LinkedGraph<usize, ()>>();
}

#[test]
fn compact_undirected_contract() {
    undirected_contract::<CompactGraph<usize, ()>>();
}

#[test]
fn packed_undirected_contract() {
    undirected_contract::<PackedGraph<usize, ()>>();
}

#[test]
fn linked_directed_contract() {
    directed_contract::<LinkedDigraph<usize, ()>>();
}

#[test]
fn compact_directed_contract() {
    directed_contract::<CompactDigraph<usize, ()>>();
}

#[test]
fn packed_directed_contract() {
    directed_contract::<PackedDigraph<usize, ()>>();
}

#[test]
fn clone_establishes_a_two_way_correspondence() {
    let (g, ids) = graph_from_edges::<LinkedGraph<usize, ()>>(5, &[(0, 1), (1, 2), (3, 4)]);
    let (copy, corr) = clone_graph(&g);
    assert_eq!(copy.num_nodes(), g.num_nodes());
    assert_eq!(copy.num_arcs(), g.num_arcs());
    for &n in &ids {
        let m = corr.node(n).unwrap();
        assert_eq!(copy.node(m), g.node(n));
        assert_eq!(corr.node_rev(m), Some(n));
    }
    for a in g.arcs() {
        let b = corr.arc(a).unwrap();
        assert_eq!(corr.node(g.src(a)), Some(copy.src(b)));
        assert_eq!(corr.node(g.tgt(a)), Some(copy.tgt(b)));
        assert_eq!(corr.arc_rev(b), Some(a));
    }
}

#[test]
fn reversal_flips_every_arc() {
    let (g, _) = graph_from_edges::<LinkedDigraph<usize, ()>>(4, &[(0, 1), (1, 2), (3, 1)]);
    let (rev, corr) = reverse_graph(&g);
    assert_eq!(rev.num_arcs(), 3);
    for a in g.arcs() {
        let b = corr.arc(a).unwrap();
        assert_eq!(corr.node(g.src(a)), Some(rev.tgt(b)));
        assert_eq!(corr.node(g.tgt(a)), Some(rev.src(b)));
    }
}

#[test]
fn payload_access_is_mutable() {
    let mut g: LinkedGraph<String, u32> = LinkedGraph::new();
    let n = g.insert_node("hello".into());
    let m = g.insert_node("world".into());
    let a = g.insert_arc(n, m, 1).unwrap();
    g.node_mut(n).push('!');
    *g.arc_mut(a) += 41;
    assert_eq!(g.node(n), "hello!");
    assert_eq!(*g.arc(a), 42);
}
