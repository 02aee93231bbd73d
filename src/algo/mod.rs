//! Graph algorithms.
//!
//! Everything here is generic over the [`Graph`](crate::graph::Graph)
//! contract and keeps its working state in algorithm-owned
//! [`NodeMap`](crate::graph::NodeMap)/[`ArcMap`](crate::graph::ArcMap)
//! side maps, so concurrent read-only use of the same graph by different
//! algorithms is safe by construction.
//!
//! - [`traverse`]: DFS/BFS drivers with visitor hooks and arc filters.
//! - [`components`]: connectivity, path finding, cycle tests.
//! - [`cut`]: cut vertices and biconnected blocks.
//! - [`paths`]: Dijkstra (with optional A* heuristic), Bellman-Ford.
//! - [`allpairs`]: Floyd-Warshall, Warshall closure, Johnson.
//! - [`mst`]: union-find, Kruskal, Prim.
//! - [`scc`]: Tarjan and Kosaraju strongly connected components.
//! - [`flow`]: residual networks, Edmonds-Karp max-flow and min-cut.

pub mod allpairs;
pub mod components;
pub mod cut;
pub mod flow;
pub mod mst;
pub mod paths;
pub mod scc;
pub mod traverse;

pub use allpairs::{DistMatrix, Reachability, floyd_warshall, johnson, warshall_closure};
pub use components::{connected_components, find_path, has_cycle, is_acyclic, is_connected};
pub use cut::{BlockDecomposition, blocks, cut_nodes};
pub use flow::{MaxFlow, edmonds_karp, edmonds_karp_node_caps};
pub use mst::{UnionFind, kruskal, prim};
pub use paths::{ShortestPaths, Weight, astar, bellman_ford, dijkstra};
pub use scc::{kosaraju_scc, same_partition, tarjan_scc};
pub use traverse::{Control, Traversal, Visitor, bfs_from, dfs_all, dfs_from, every_arc, spanning_tree};
