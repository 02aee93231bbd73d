//! Storage-agnostic graph and digraph model.
//!
//! The [`Graph`] trait is the contract every algorithm in
//! [`crate::algo`] is written against. Three back-ends implement it:
//!
//! - [`LinkedGraph`](linked::LinkedGraph): slab arenas with doubly-linked
//!   adjacency threading; O(1) arc removal, ids stable until their own
//!   removal. The general-purpose default.
//! - [`CompactGraph`](compact::CompactGraph): singly-linked threading;
//!   smaller arc slots, O(degree) arc removal.
//! - [`PackedGraph`](packed::PackedGraph): dense vectors with
//!   swap-with-last removal; O(1) indexed access, but a removal
//!   invalidates the swapped-in id.
//!
//! Directedness is a type-level marker ([`Directed`] / [`Undirected`]), so
//! an algorithm that requires one flavour states it in its bounds and the
//! mismatch is a compile error.
//!
//! Algorithms keep their per-node and per-arc scratch state in
//! [`NodeMap`]/[`ArcMap`] side maps they own, sized by
//! [`Graph::node_bound`]; the graph itself carries only user payloads.
//! Relationships between a graph and a derived graph (a clone, a reversal,
//! a residual network) travel in a [`Correspondence`].

use crate::error::{Error, Result};

pub mod compact;
#[cfg(feature = "io-graph")]
pub mod io;
pub mod linked;
pub mod packed;

pub use compact::{CompactDigraph, CompactGraph};
pub use linked::{LinkedDigraph, LinkedGraph};
pub use packed::{PackedDigraph, PackedGraph};

/// Identifier of a node within one graph.
///
/// Opaque and `Copy`; only valid for the graph that produced it, and (in
/// the linked back-ends) until that node is removed.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// The underlying slot index. Mainly for debugging and serialization.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Identifier of an arc within one graph. Same validity rules as
/// [`NodeId`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct ArcId(pub(crate) u32);

impl ArcId {
    /// The underlying slot index.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Type-level directedness marker.
pub trait Direction {
    /// `true` for digraphs.
    const DIRECTED: bool;
}

/// Marker for undirected graphs.
#[derive(Debug)]
pub enum Undirected {}

impl Direction for Undirected {
    const DIRECTED: bool = false;
}

/// Marker for directed graphs.
#[derive(Debug)]
pub enum Directed {}

impl Direction for Directed {
    const DIRECTED: bool = true;
}

/// The storage-agnostic graph contract.
pub trait Graph: Sized {
    /// Per-node user payload.
    type NodeInfo;
    /// Per-arc user payload.
    type ArcInfo;
    /// Directedness marker.
    type Dir: Direction;

    /// `true` when this is a digraph.
    fn is_directed(&self) -> bool {
        Self::Dir::DIRECTED
    }

    /// Number of live nodes.
    fn num_nodes(&self) -> usize;

    /// Number of live arcs.
    fn num_arcs(&self) -> usize;

    /// Add a node.
    fn insert_node(&mut self, info: Self::NodeInfo) -> NodeId;

    /// Remove a node and every arc incident to it.
    fn remove_node(&mut self, n: NodeId) -> Result<Self::NodeInfo>;

    /// Add an arc. For a digraph the arc goes `src -> tgt`; for a graph it
    /// joins the endpoints symmetrically (both adjacency lists see it).
    fn insert_arc(&mut self, src: NodeId, tgt: NodeId, info: Self::ArcInfo) -> Result<ArcId>;

    /// Remove an arc.
    fn remove_arc(&mut self, a: ArcId) -> Result<Self::ArcInfo>;

    /// `true` when `n` refers to a live node.
    fn contains_node(&self, n: NodeId) -> bool;

    /// `true` when `a` refers to a live arc.
    fn contains_arc(&self, a: ArcId) -> bool;

    /// Payload of a live node.
    ///
    /// # Panics
    /// Panics on a stale or foreign id.
    fn node(&self, n: NodeId) -> &Self::NodeInfo;

    /// Mutable payload of a live node.
    fn node_mut(&mut self, n: NodeId) -> &mut Self::NodeInfo;

    /// Payload of a live arc.
    fn arc(&self, a: ArcId) -> &Self::ArcInfo;

    /// Mutable payload of a live arc.
    fn arc_mut(&mut self, a: ArcId) -> &mut Self::ArcInfo;

    /// First endpoint (source for digraphs).
    fn src(&self, a: ArcId) -> NodeId;

    /// Second endpoint (target for digraphs).
    fn tgt(&self, a: ArcId) -> NodeId;

    /// The endpoint of `a` that is not `n`.
    ///
    /// # Panics
    /// Panics when `n` is not an endpoint of `a`.
    fn other_endpoint(&self, a: ArcId, n: NodeId) -> NodeId {
        let (s, t) = (self.src(a), self.tgt(a));
        if n == s {
            t
        } else if n == t {
            s
        } else {
            panic!("node is not an endpoint of the arc")
        }
    }

    /// The node an adjacency arc of `from` leads to: the target for a
    /// digraph, the other endpoint for a graph.
    fn arc_head(&self, a: ArcId, from: NodeId) -> NodeId {
        if Self::Dir::DIRECTED { self.tgt(a) } else { self.other_endpoint(a, from) }
    }

    /// An arc connecting `u` to `v`, if any. O(degree of `u`).
    fn find_arc(&self, u: NodeId, v: NodeId) -> Option<ArcId> {
        self.adjacent(u).find(|&a| self.arc_head(a, u) == v)
    }

    /// Iterate every live node once.
    fn nodes(&self) -> impl Iterator<Item = NodeId> + '_;

    /// Iterate every live arc once.
    fn arcs(&self) -> impl Iterator<Item = ArcId> + '_;

    /// Arcs incident to `n`: out-arcs for a digraph, all incident arcs for
    /// a graph. Linked back-ends yield insertion order.
    fn adjacent(&self, n: NodeId) -> impl Iterator<Item = ArcId> + '_;

    /// Number of adjacency arcs at `n`.
    fn degree(&self, n: NodeId) -> usize {
        self.adjacent(n).count()
    }

    /// Exclusive upper bound on live node slot indices; sizes dense side
    /// maps.
    fn node_bound(&self) -> usize;

    /// Exclusive upper bound on live arc slot indices.
    fn arc_bound(&self) -> usize;
}

macro_rules! side_map {
    ($(#[$doc:meta])* $name:ident keyed_by $id:ident sized_by $bound:ident) => {
        $(#[$doc])*
        #[derive(Clone, Debug)]
        pub struct $name<T> {
            slots: Vec<Option<T>>,
        }

        impl<T> $name<T> {
            /// An empty map sized for `g`.
            pub fn for_graph<G: Graph>(g: &G) -> Self {
                let mut slots = Vec::with_capacity(g.$bound());
                slots.resize_with(g.$bound(), || None);
                Self { slots }
            }

            /// An empty map with no preallocated slots.
            pub fn new() -> Self {
                Self { slots: Vec::new() }
            }

            /// Bind `value` to `id`, returning the previous binding.
            pub fn insert(&mut self, id: $id, value: T) -> Option<T> {
                let i = id.index();
                if i >= self.slots.len() {
                    self.slots.resize_with(i + 1, || None);
                }
                self.slots[i].replace(value)
            }

            /// The value bound to `id`, if any.
            pub fn get(&self, id: $id) -> Option<&T> {
                self.slots.get(id.index()).and_then(|s| s.as_ref())
            }

            /// Mutable access to the value bound to `id`.
            pub fn get_mut(&mut self, id: $id) -> Option<&mut T> {
                self.slots.get_mut(id.index()).and_then(|s| s.as_mut())
            }

            /// Remove the binding for `id`.
            pub fn remove(&mut self, id: $id) -> Option<T> {
                self.slots.get_mut(id.index()).and_then(|s| s.take())
            }

            /// `true` when `id` has a binding.
            pub fn contains(&self, id: $id) -> bool {
                self.get(id).is_some()
            }

            /// Iterate the live bindings.
            pub fn iter(&self) -> impl Iterator<Item = ($id, &T)> + '_ {
                self.slots
                    .iter()
                    .enumerate()
                    .filter_map(|(i, s)| s.as_ref().map(|v| ($id(i as u32), v)))
            }

            /// Number of live bindings.
            pub fn len(&self) -> usize {
                self.slots.iter().filter(|s| s.is_some()).count()
            }

            /// `true` when no binding is live.
            pub fn is_empty(&self) -> bool {
                self.slots.iter().all(|s| s.is_none())
            }
        }

        impl<T> Default for $name<T> {
            fn default() -> Self {
                Self::new()
            }
        }

        impl<T> std::ops::Index<$id> for $name<T> {
            type Output = T;

            fn index(&self, id: $id) -> &T {
                self.get(id).expect("no binding for id")
            }
        }
    };
}

side_map! {
    /// Dense algorithm-owned side state keyed by [`NodeId`].
    ///
    /// This is where traversal marks, distances, predecessors and the like
    /// live; the graph itself never carries algorithm scratch.
    NodeMap keyed_by NodeId sized_by node_bound
}

side_map! {
    /// Dense algorithm-owned side state keyed by [`ArcId`].
    ArcMap keyed_by ArcId sized_by arc_bound
}

/// Bidirectional node/arc maps between a graph and a graph derived from it
/// (clone, reversal, residual network).
#[derive(Default, Clone, Debug)]
pub struct Correspondence {
    node_to: NodeMap<NodeId>,
    node_from: NodeMap<NodeId>,
    arc_to: ArcMap<ArcId>,
    arc_from: ArcMap<ArcId>,
}

impl Correspondence {
    /// An empty correspondence.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that original node `a` maps to derived node `b`.
    pub fn bind_nodes(&mut self, a: NodeId, b: NodeId) {
        self.node_to.insert(a, b);
        self.node_from.insert(b, a);
    }

    /// Record that original arc `a` maps to derived arc `b`.
    pub fn bind_arcs(&mut self, a: ArcId, b: ArcId) {
        self.arc_to.insert(a, b);
        self.arc_from.insert(b, a);
    }

    /// Derived node for original node `n`.
    pub fn node(&self, n: NodeId) -> Option<NodeId> {
        self.node_to.get(n).copied()
    }

    /// Original node for derived node `n`.
    pub fn node_rev(&self, n: NodeId) -> Option<NodeId> {
        self.node_from.get(n).copied()
    }

    /// Derived arc for original arc `a`.
    pub fn arc(&self, a: ArcId) -> Option<ArcId> {
        self.arc_to.get(a).copied()
    }

    /// Original arc for derived arc `a`.
    pub fn arc_rev(&self, a: ArcId) -> Option<ArcId> {
        self.arc_from.get(a).copied()
    }
}

/// Deep-copy `g`, returning the copy and the two-way node/arc maps.
pub fn clone_graph<G>(g: &G) -> (G, Correspondence)
where
    G: Graph + Default,
    G::NodeInfo: Clone,
    G::ArcInfo: Clone,
{
    let mut out = G::default();
    let mut map = Correspondence::new();
    for n in g.nodes() {
        let m = out.insert_node(g.node(n).clone());
        map.bind_nodes(n, m);
    }
    for a in g.arcs() {
        let s = map.node(g.src(a)).expect("endpoint was copied");
        let t = map.node(g.tgt(a)).expect("endpoint was copied");
        let b = out.insert_arc(s, t, g.arc(a).clone()).expect("copied endpoints are live");
        map.bind_arcs(a, b);
    }
    (out, map)
}

/// Copy a digraph with every arc reversed; used by Kosaraju's second pass.
pub fn reverse_graph<G>(g: &G) -> (G, Correspondence)
where
    G: Graph<Dir = Directed> + Default,
    G::NodeInfo: Clone,
    G::ArcInfo: Clone,
{
    let mut out = G::default();
    let mut map = Correspondence::new();
    for n in g.nodes() {
        let m = out.insert_node(g.node(n).clone());
        map.bind_nodes(n, m);
    }
    for a in g.arcs() {
        let s = map.node(g.src(a)).expect("endpoint was copied");
        let t = map.node(g.tgt(a)).expect("endpoint was copied");
        let b = out.insert_arc(t, s, g.arc(a).clone()).expect("copied endpoints are live");
        map.bind_arcs(a, b);
    }
    (out, map)
}

/// Shared validity error for stale ids.
pub(crate) fn stale<T>() -> Result<T> {
    Err(Error::NotFound)
}
