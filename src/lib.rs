//! # Alder
//!
//! A library of **ordered containers, hash tables, priority queues,
//! graphs and graph algorithms**, plus a small concurrent runtime (a
//! monotonic timeout queue and a queue-driven worker pool).
//!
//! ## Key pieces
//!
//! - **Ordered sets** - five interchangeable engines behind one
//!   [`OrderedSet`] contract: [`Avl`], [`RbTree`], [`Splay`], [`Treap`],
//!   [`RandTree`]. All support order statistics (`select` /
//!   `position_of`), ordered split and join, and a functional surface
//!   (`fold`, `all`, `exists`, `partition_by`, ...) derived once from
//!   in-order iteration.
//! - **Hash tables** - separate chaining ([`ChainedHash`]) and open
//!   addressing ([`OpenHash`]) with linear or double-hash probing, both
//!   resizing over a prime ladder by a configurable load-factor band.
//! - **Priority queues** - a dynamic binary heap ([`BinHeap`]) and an
//!   arena pairing heap ([`PairingHeap`]) with stable handles,
//!   `decrease_key` and meld.
//! - **Graphs** - a storage-agnostic [`Graph`] contract with three
//!   back-ends ([`LinkedGraph`], [`CompactGraph`], [`PackedGraph`]),
//!   directed and undirected flavours selected by a type-level marker,
//!   and algorithm state kept in [`NodeMap`]/[`ArcMap`] side maps.
//! - **Graph algorithms** - DFS/BFS with visitor hooks and arc filters,
//!   connectivity, cut vertices and blocks, Dijkstra/A*/Bellman-Ford,
//!   Floyd-Warshall/Warshall/Johnson, Kruskal/Prim, Tarjan/Kosaraju SCC,
//!   Edmonds-Karp max-flow and min-cut (arc and node capacities).
//! - **Concurrency** - [`TimeoutQueue`], a monotonic timer with one
//!   dispatcher thread, and [`WorkQueuePool`], a bounded FIFO with
//!   consumer threads.
//!
//! ## Quick start: ordered sets
//!
//! ```
//! use alder::{Avl, OrderedSet};
//!
//! let mut set = Avl::new();
//! for k in [5, 3, 8, 1, 4, 7, 9, 2] {
//!     set.insert(k).unwrap();
//! }
//! assert_eq!(set.select(0).unwrap(), &1);
//! assert_eq!(set.position_of(&4), Some(3));
//! assert!(set.all(|k| *k < 10));
//!
//! // ordered split: keys < 5 left, keys >= 5 right
//! let (low, high) = set.split_by_key(&5);
//! assert_eq!(low.len(), 4);
//! assert_eq!(high.min(), Some(&5));
//! ```
//!
//! Engines are interchangeable: swap `Avl` for `RbTree`, `Splay`,
//! `Treap` or `RandTree` and the code above still holds (the randomised
//! engines take an explicit seed via `with_seed` when reproducible
//! shapes matter).
//!
//! ## Quick start: graphs
//!
//! ```
//! use alder::algo::{dijkstra, kruskal};
//! use alder::{Graph, LinkedGraph};
//!
//! let mut g: LinkedGraph<&str, u32> = LinkedGraph::new();
//! let a = g.insert_node("a");
//! let b = g.insert_node("b");
//! let c = g.insert_node("c");
//! g.insert_arc(a, b, 1).unwrap();
//! g.insert_arc(b, c, 2).unwrap();
//! g.insert_arc(a, c, 9).unwrap();
//!
//! let sp = dijkstra(&g, a, |g, e| *g.arc(e));
//! assert_eq!(sp.distance(c), Some(3));
//! assert_eq!(sp.path_to(c).unwrap(), vec![a, b, c]);
//!
//! let (tree, total) = kruskal(&g, |g, e| *g.arc(e)).unwrap();
//! assert_eq!(total, 3);
//! assert_eq!(tree.len(), 2);
//! ```
//!
//! Algorithms own their scratch state (side maps keyed by node/arc ids),
//! so any number of them can read the same graph.
//!
//! ## Quick start: the timeout queue
//!
//! ```no_run
//! use alder::sched::{Event, TimeoutQueue};
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let fired = Arc::new(AtomicUsize::new(0));
//! let q = TimeoutQueue::new();
//! let f = Arc::clone(&fired);
//! let tick = Event::new(move || {
//!     f.fetch_add(1, Ordering::SeqCst);
//! });
//! q.schedule_in(&tick, Duration::from_millis(10)).unwrap();
//! std::thread::sleep(Duration::from_millis(100));
//! q.shutdown();
//! assert_eq!(fired.load(Ordering::SeqCst), 1);
//! ```
//!
//! ## Errors
//!
//! Fallible operations return the crate-wide [`Result`] with a typed
//! [`Error`]: lookup misses, duplicate keys, out-of-range indices,
//! domain violations (overlapping join ranges, a decrease-key that
//! increases, a negative cycle in Bellman-Ford), exhausted open-addressed
//! tables, and use-after-shutdown. The serialization entry points in
//! [`graph::io`] (feature `io-graph`) use `anyhow` instead, carrying
//! file/line context.
//!
//! ## Feature flags
//!
//! - `io-graph` *(default)* - the line-oriented graph interchange format
//!   with Serde-encoded payloads.
//!
//! ## Testing support
//!
//! The [`testing`] module ships the assertion helpers and seeded data
//! builders the integration suites are written with; they are public so
//! downstream code can reuse them.

pub mod algo;
pub mod bitarray;
pub mod dynarray;
pub mod error;
pub mod graph;
pub mod hash;
pub mod heap;
pub mod order;
pub mod sched;
pub mod slist;
pub mod testing;
pub mod tree;

pub use error::{Error, Result};

pub use tree::OrderedSet;
pub use tree::avl::Avl;
pub use tree::rand_tree::RandTree;
pub use tree::rb::RbTree;
pub use tree::splay::Splay;
pub use tree::treap::Treap;

pub use hash::{ChainedHash, DoubleHash, HashedSet, LinearProbe, OpenHash};

pub use heap::{BinHeap, Handle, PairingHeap, PriorityQueue};

pub use graph::{
    ArcId, ArcMap, CompactDigraph, CompactGraph, Correspondence, Directed, Direction, Graph,
    LinkedDigraph, LinkedGraph, NodeId, NodeMap, PackedDigraph, PackedGraph, Undirected,
    clone_graph, reverse_graph,
};

pub use algo::Weight;

pub use sched::{Consumer, Event, EventStatus, PutError, TimeoutQueue, WorkQueuePool};

pub use bitarray::BitArray;
pub use dynarray::DynArray;
pub use order::Keyed;
pub use slist::{ListQueue, ListStack, SList};
