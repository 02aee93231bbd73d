//! All-pairs shortest paths and transitive closure.
//!
//! - [`floyd_warshall`]: O(V³) dynamic program over a dense matrix, with a
//!   predecessor matrix for path reconstruction.
//! - [`warshall_closure`]: the same relaxation on
//!   [`BitArray`](crate::bitarray::BitArray) rows, yielding reachability.
//! - [`johnson`]: Bellman-Ford potentials (from an implicit zero-weight
//!   dummy source) reweight every arc to non-negative, then one Dijkstra
//!   per source; good for sparse graphs with negative arcs.

use crate::algo::paths::{Weight, dijkstra};
use crate::bitarray::BitArray;
use crate::error::{Error, Result};
use crate::graph::{Directed, Graph, NodeId, NodeMap};

/// Dense all-pairs distances with path reconstruction.
pub struct DistMatrix<W> {
    ids: Vec<NodeId>,
    index: NodeMap<usize>,
    n: usize,
    dist: Vec<Option<W>>,
    /// Predecessor of `j` on the path `i -> j`, as a dense index.
    prev: Vec<Option<u32>>,
}

impl<W: Weight> DistMatrix<W> {
    fn empty<G: Graph>(g: &G) -> Self {
        let ids: Vec<NodeId> = g.nodes().collect();
        let mut index = NodeMap::for_graph(g);
        for (i, &n) in ids.iter().enumerate() {
            index.insert(n, i);
        }
        let n = ids.len();
        Self { ids, index, n, dist: vec![None; n * n], prev: vec![None; n * n] }
    }

    fn at(&self, i: usize, j: usize) -> usize {
        i * self.n + j
    }

    /// Distance `u -> v`, if a path exists.
    pub fn distance(&self, u: NodeId, v: NodeId) -> Option<W> {
        let (i, j) = (*self.index.get(u)?, *self.index.get(v)?);
        self.dist[self.at(i, j)]
    }

    /// The node sequence of a shortest path `u -> v`, inclusive.
    pub fn path(&self, u: NodeId, v: NodeId) -> Option<Vec<NodeId>> {
        let (i, j) = (*self.index.get(u)?, *self.index.get(v)?);
        self.dist[self.at(i, j)]?;
        let mut rev = vec![self.ids[j]];
        let mut cur = j;
        while cur != i {
            cur = self.prev[self.at(i, cur)]? as usize;
            rev.push(self.ids[cur]);
        }
        rev.reverse();
        Some(rev)
    }

    /// `true` when some `dist(v, v)` went negative (a negative cycle
    /// touches `v`). Only Floyd-Warshall can observe this; Johnson fails
    /// earlier instead.
    pub fn has_negative_cycle(&self) -> bool {
        (0..self.n).any(|i| self.dist[self.at(i, i)].is_some_and(|d| d < W::ZERO))
    }
}

/// Floyd-Warshall all-pairs shortest distances on a digraph.
pub fn floyd_warshall<G, W, F>(g: &G, weight: F) -> DistMatrix<W>
where
    G: Graph<Dir = Directed>,
    W: Weight,
    F: Fn(&G, crate::graph::ArcId) -> W,
{
    let mut m = DistMatrix::empty(g);
    let n = m.n;
    for i in 0..n {
        let ii = m.at(i, i);
        m.dist[ii] = Some(W::ZERO);
        m.prev[ii] = Some(i as u32);
    }
    for a in g.arcs() {
        let i = m.index[g.src(a)];
        let j = m.index[g.tgt(a)];
        let w = weight(g, a);
        let ij = m.at(i, j);
        if m.dist[ij].is_none_or(|d| w < d) {
            m.dist[ij] = Some(w);
            m.prev[ij] = Some(i as u32);
        }
    }
    for k in 0..n {
        for i in 0..n {
            let Some(dik) = m.dist[m.at(i, k)] else {
                continue;
            };
            for j in 0..n {
                let Some(dkj) = m.dist[m.at(k, j)] else {
                    continue;
                };
                let through = dik.add(dkj);
                let ij = m.at(i, j);
                if m.dist[ij].is_none_or(|d| through < d) {
                    m.dist[ij] = Some(through);
                    m.prev[ij] = m.prev[m.at(k, j)];
                }
            }
        }
    }
    m
}

/// Dense reachability matrix.
pub struct Reachability {
    ids: Vec<NodeId>,
    index: NodeMap<usize>,
    rows: Vec<BitArray>,
}

impl Reachability {
    /// `true` when `v` is reachable from `u` (every node reaches itself).
    pub fn reaches(&self, u: NodeId, v: NodeId) -> bool {
        match (self.index.get(u), self.index.get(v)) {
            (Some(&i), Some(&j)) => self.rows[i].get(j),
            _ => false,
        }
    }

    /// All nodes reachable from `u`, in dense order.
    pub fn reachable_from(&self, u: NodeId) -> Vec<NodeId> {
        match self.index.get(u) {
            Some(&i) => self.rows[i].ones().map(|j| self.ids[j]).collect(),
            None => Vec::new(),
        }
    }
}

/// Warshall's transitive closure on bit rows; O(V³ / 64) in practice.
pub fn warshall_closure<G>(g: &G) -> Reachability
where
    G: Graph<Dir = Directed>,
{
    let ids: Vec<NodeId> = g.nodes().collect();
    let mut index = NodeMap::for_graph(g);
    for (i, &n) in ids.iter().enumerate() {
        index.insert(n, i);
    }
    let n = ids.len();
    let mut rows = vec![BitArray::new(n); n];
    for (i, row) in rows.iter_mut().enumerate() {
        row.set(i);
    }
    for a in g.arcs() {
        rows[index[g.src(a)]].set(index[g.tgt(a)]);
    }
    for k in 0..n {
        let row_k = rows[k].clone();
        for row in rows.iter_mut() {
            if row.get(k) {
                row.or_assign(&row_k);
            }
        }
    }
    Reachability { ids, index, rows }
}

/// Johnson's all-pairs shortest paths for sparse digraphs with possibly
/// negative arc weights. Fails with [`Error::NegativeCycle`] when one is
/// present.
pub fn johnson<G, W, F>(g: &G, weight: F) -> Result<DistMatrix<W>>
where
    G: Graph<Dir = Directed>,
    W: Weight,
    F: Fn(&G, crate::graph::ArcId) -> W,
{
    // Potentials from an implicit dummy source with zero-weight arcs to
    // every node: start all distances at zero and relax V rounds.
    let mut h: NodeMap<W> = NodeMap::for_graph(g);
    for n in g.nodes() {
        h.insert(n, W::ZERO);
    }
    for _ in 0..g.num_nodes().saturating_sub(1) {
        let mut relaxed = false;
        for a in g.arcs() {
            let nd = h[g.src(a)].add(weight(g, a));
            if nd < h[g.tgt(a)] {
                h.insert(g.tgt(a), nd);
                relaxed = true;
            }
        }
        if !relaxed {
            break;
        }
    }
    for a in g.arcs() {
        if h[g.src(a)].add(weight(g, a)) < h[g.tgt(a)] {
            return Err(Error::NegativeCycle);
        }
    }

    let mut m = DistMatrix::empty(g);
    let ids = m.ids.clone();
    for (i, &u) in ids.iter().enumerate() {
        // reweighted arcs are non-negative: w + h(u) - h(v) >= 0
        let sp = dijkstra(g, u, |g, a| weight(g, a).add(h[g.src(a)]).sub(h[g.tgt(a)]));
        for (j, &v) in ids.iter().enumerate() {
            if let Some(d) = sp.distance(v) {
                let ij = m.at(i, j);
                // translate back: d(u, v) = d'(v) - h(u) + h(v)
                m.dist[ij] = Some(d.sub(h[u]).add(h[v]));
                if let Some(path) = sp.path_to(v)
                    && path.len() >= 2
                {
                    m.prev[ij] = Some(m.index[path[path.len() - 2]] as u32);
                } else if u == v {
                    m.prev[ij] = Some(i as u32);
                }
            }
        }
    }
    Ok(m)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Graph, LinkedDigraph};

    fn sample() -> (LinkedDigraph<(), i32>, Vec<NodeId>) {
        let mut g = LinkedDigraph::new();
        let n: Vec<_> = (0..4).map(|_| g.insert_node(())).collect();
        for (u, v, w) in [(0, 1, 3i32), (0, 3, 7), (1, 0, 8), (1, 2, 2), (2, 0, 5), (2, 3, 1), (3, 0, 2)]
        {
            g.insert_arc(n[u], n[v], w).unwrap();
        }
        (g, n)
    }

    #[test]
    fn floyd_warshall_known_matrix() {
        let (g, n) = sample();
        let m = floyd_warshall(&g, |g, a| *g.arc(a));
        assert_eq!(m.distance(n[0], n[2]), Some(5));
        assert_eq!(m.distance(n[0], n[3]), Some(6));
        assert_eq!(m.distance(n[3], n[1]), Some(5));
        assert_eq!(m.path(n[0], n[3]).unwrap(), vec![n[0], n[1], n[2], n[3]]);
        assert!(!m.has_negative_cycle());
    }

    #[test]
    fn johnson_agrees_with_floyd_warshall() {
        let (g, n) = sample();
        let fw = floyd_warshall(&g, |g, a| *g.arc(a));
        let j = johnson(&g, |g, a| *g.arc(a)).unwrap();
        for &u in &n {
            for &v in &n {
                assert_eq!(fw.distance(u, v), j.distance(u, v), "mismatch {u:?}->{v:?}");
            }
        }
    }

    #[test]
    fn johnson_with_negative_arcs() {
        let mut g: LinkedDigraph<(), i32> = LinkedDigraph::new();
        let n: Vec<_> = (0..3).map(|_| g.insert_node(())).collect();
        g.insert_arc(n[0], n[1], 2).unwrap();
        g.insert_arc(n[1], n[2], -1).unwrap();
        g.insert_arc(n[0], n[2], 4).unwrap();
        let m = johnson(&g, |g, a| *g.arc(a)).unwrap();
        assert_eq!(m.distance(n[0], n[2]), Some(1));
        assert_eq!(m.path(n[0], n[2]).unwrap(), vec![n[0], n[1], n[2]]);
    }

    #[test]
    fn johnson_rejects_negative_cycles() {
        let mut g: LinkedDigraph<(), i32> = LinkedDigraph::new();
        let a = g.insert_node(());
        let b = g.insert_node(());
        g.insert_arc(a, b, -2).unwrap();
        g.insert_arc(b, a, 1).unwrap();
        assert!(matches!(johnson(&g, |g, x| *g.arc(x)), Err(Error::NegativeCycle)));
    }

    #[test]
    fn closure_reaches() {
        let (g, n) = sample();
        let r = warshall_closure(&g);
        for &u in &n {
            for &v in &n {
                assert!(r.reaches(u, v)); // the sample digraph is strongly connected
            }
        }
        let mut g2: LinkedDigraph<(), ()> = LinkedDigraph::new();
        let a = g2.insert_node(());
        let b = g2.insert_node(());
        g2.insert_arc(a, b, ()).unwrap();
        let r2 = warshall_closure(&g2);
        assert!(r2.reaches(a, b));
        assert!(!r2.reaches(b, a));
        assert!(r2.reaches(b, b));
    }
}
