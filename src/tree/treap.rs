//! Treap: BST order on keys, max-heap order on random priorities.
//!
//! Priorities come from a per-container [`StdRng`]; construct with
//! [`Treap::with_seed`] for reproducible shapes. Expected O(log n) for all
//! operations. The heap rule makes split and merge natural, so this engine
//! also supports [`join`](crate::tree::OrderedSet::join) over interleaved
//! key ranges (a split-based union).

use std::cmp::Ordering;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{Error, Result};
use crate::tree::{self, BstNode, Inorder, OrderedSet, set_common};

type Link<K> = Option<Box<Node<K>>>;

struct Node<K> {
    key: K,
    prio: u64,
    left: Link<K>,
    right: Link<K>,
    count: usize,
}

impl<K> Node<K> {
    fn leaf(key: K, prio: u64) -> Box<Self> {
        Box::new(Node { key, prio, left: None, right: None, count: 1 })
    }

    fn update(&mut self) {
        self.count = 1 + count(&self.left) + count(&self.right);
    }
}

impl<K> BstNode<K> for Node<K> {
    fn key(&self) -> &K {
        &self.key
    }
    fn left(&self) -> Option<&Self> {
        self.left.as_deref()
    }
    fn right(&self) -> Option<&Self> {
        self.right.as_deref()
    }
    fn count(&self) -> usize {
        self.count
    }
}

fn count<K>(link: &Link<K>) -> usize {
    link.as_ref().map_or(0, |n| n.count)
}

fn prio<K>(link: &Link<K>) -> u64 {
    link.as_ref().map_or(0, |n| n.prio)
}

fn rot_right<K>(mut n: Box<Node<K>>) -> Box<Node<K>> {
    let mut l = n.left.take().expect("right rotation without left child");
    n.left = l.right.take();
    n.update();
    l.right = Some(n);
    l.update();
    l
}

fn rot_left<K>(mut n: Box<Node<K>>) -> Box<Node<K>> {
    let mut r = n.right.take().expect("left rotation without right child");
    n.right = r.left.take();
    n.update();
    r.left = Some(n);
    r.update();
    r
}

fn insert_rec<K: Ord>(
    link: Link<K>,
    key: K,
    p: u64,
    allow_dup: bool,
) -> (Box<Node<K>>, std::result::Result<(), K>) {
    let Some(mut node) = link else {
        return (Node::leaf(key, p), Ok(()));
    };
    match key.cmp(&node.key) {
        Ordering::Less => {
            let (child, res) = insert_rec(node.left.take(), key, p, allow_dup);
            node.left = Some(child);
            node.update();
            if res.is_ok() && prio(&node.left) > node.prio {
                node = rot_right(node);
            }
            (node, res)
        }
        Ordering::Equal if !allow_dup => (node, Err(key)),
        _ => {
            let (child, res) = insert_rec(node.right.take(), key, p, allow_dup);
            node.right = Some(child);
            node.update();
            if res.is_ok() && prio(&node.right) > node.prio {
                node = rot_left(node);
            }
            (node, res)
        }
    }
}

/// Merge two treaps whose key ranges are separated (`a < b`), keeping the
/// heap rule by always descending under the higher-priority root.
fn merge<K: Ord>(a: Link<K>, b: Link<K>) -> Link<K> {
    match (a, b) {
        (None, x) | (x, None) => x,
        (Some(mut a), Some(b)) if a.prio >= b.prio => {
            a.right = merge(a.right.take(), Some(b));
            a.update();
            Some(a)
        }
        (a, Some(mut b)) => {
            b.left = merge(a, b.left.take());
            b.update();
            Some(b)
        }
    }
}

fn remove_rec<K: Ord>(link: Link<K>, key: &K) -> (Link<K>, Option<K>) {
    let Some(mut node) = link else {
        return (None, None);
    };
    match key.cmp(&node.key) {
        Ordering::Less => {
            let (child, removed) = remove_rec(node.left.take(), key);
            node.left = child;
            node.update();
            (Some(node), removed)
        }
        Ordering::Greater => {
            let (child, removed) = remove_rec(node.right.take(), key);
            node.right = child;
            node.update();
            (Some(node), removed)
        }
        Ordering::Equal => {
            let merged = merge(node.left.take(), node.right.take());
            (merged, Some(node.key))
        }
    }
}

/// Keys `< key` left, keys `>= key` right.
fn split_rec<K: Ord>(link: Link<K>, key: &K) -> (Link<K>, Link<K>) {
    let Some(mut node) = link else {
        return (None, None);
    };
    if node.key < *key {
        let (a, b) = split_rec(node.right.take(), key);
        node.right = a;
        node.update();
        (Some(node), b)
    } else {
        let (a, b) = split_rec(node.left.take(), key);
        node.left = b;
        node.update();
        (a, Some(node))
    }
}

fn split_at_rec<K: Ord>(link: Link<K>, i: usize) -> (Link<K>, Link<K>) {
    let Some(mut node) = link else {
        return (None, None);
    };
    let lc = count(&node.left);
    if i <= lc {
        let (a, b) = split_at_rec(node.left.take(), i);
        node.left = b;
        node.update();
        (a, Some(node))
    } else {
        let (a, b) = split_at_rec(node.right.take(), i - lc - 1);
        node.right = a;
        node.update();
        (Some(node), b)
    }
}

/// Union of two treaps with arbitrary (possibly interleaved) key ranges.
fn union<K: Ord>(a: Link<K>, b: Link<K>) -> Link<K> {
    match (a, b) {
        (None, x) | (x, None) => x,
        (Some(a), Some(b)) => {
            let (mut hi, lo) = if a.prio >= b.prio { (a, b) } else { (b, a) };
            let (l, r) = split_rec(Some(lo), &hi.key);
            hi.left = union(hi.left.take(), l);
            hi.right = union(hi.right.take(), r);
            hi.update();
            Some(hi)
        }
    }
}

/// Randomised-priority treap.
pub struct Treap<K> {
    root: Link<K>,
    rng: StdRng,
}

impl<K> Default for Treap<K> {
    fn default() -> Self {
        Self { root: None, rng: StdRng::from_entropy() }
    }
}

impl<K: Ord> Treap<K> {
    /// An empty treap with an entropy-seeded RNG.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty treap with a reproducible priority stream.
    pub fn with_seed(seed: u64) -> Self {
        Self { root: None, rng: StdRng::seed_from_u64(seed) }
    }

    /// Validate BST order, the heap rule on priorities and the subtree
    /// counts. Intended for tests; panics on a violation.
    pub fn check_invariants(&self) {
        fn walk<K: Ord>(link: &Link<K>, lo: Option<&K>, hi: Option<&K>, cap: u64) -> usize {
            let Some(node) = link else {
                return 0;
            };
            if let Some(lo) = lo {
                assert!(*lo <= node.key, "BST order violated");
            }
            if let Some(hi) = hi {
                assert!(node.key <= *hi, "BST order violated");
            }
            assert!(node.prio <= cap, "heap rule violated");
            let cl = walk(&node.left, lo, Some(&node.key), node.prio);
            let cr = walk(&node.right, Some(&node.key), hi, node.prio);
            assert_eq!(node.count, 1 + cl + cr, "stale count");
            node.count
        }
        walk(&self.root, None, None, u64::MAX);
    }
}

impl<K: Ord> OrderedSet<K> for Treap<K> {
    type Iter<'a>
        = Iter<'a, K>
    where
        Self: 'a,
        K: 'a;

    fn len(&self) -> usize {
        count(&self.root)
    }

    fn clear(&mut self) {
        drop_subtree(&mut self.root);
    }

    fn search(&self, key: &K) -> Option<&K> {
        tree::search_in(self.root.as_deref(), key)
    }

    fn try_insert(&mut self, key: K) -> std::result::Result<(), K> {
        let p = self.rng.r#gen();
        let (root, res) = insert_rec(self.root.take(), key, p, false);
        self.root = Some(root);
        res
    }

    fn insert_dup(&mut self, key: K) {
        let p = self.rng.r#gen();
        let (root, _) = insert_rec(self.root.take(), key, p, true);
        self.root = Some(root);
    }

    fn remove(&mut self, key: &K) -> Option<K> {
        let (root, removed) = remove_rec(self.root.take(), key);
        self.root = root;
        removed
    }

    fn select(&self, i: usize) -> Result<&K> {
        tree::select_in(self.root.as_deref(), i)
            .ok_or(Error::OutOfRange { index: i, len: self.len() })
    }

    fn position_of(&self, key: &K) -> Option<usize> {
        tree::position_in(self.root.as_deref(), key)
    }

    fn split_by_key(&mut self, key: &K) -> (Self, Self) {
        let (l, r) = split_rec(self.root.take(), key);
        (
            Self { root: l, rng: StdRng::seed_from_u64(self.rng.r#gen()) },
            Self { root: r, rng: StdRng::seed_from_u64(self.rng.r#gen()) },
        )
    }

    fn split_at(&mut self, i: usize) -> Result<(Self, Self)> {
        if i > self.len() {
            return Err(Error::OutOfRange { index: i, len: self.len() });
        }
        let (l, r) = split_at_rec(self.root.take(), i);
        Ok((
            Self { root: l, rng: StdRng::seed_from_u64(self.rng.r#gen()) },
            Self { root: r, rng: StdRng::seed_from_u64(self.rng.r#gen()) },
        ))
    }

    /// Treaps merge interleaved ranges: split-based union, duplicates kept.
    fn join(&mut self, mut other: Self) -> Result<()> {
        let a = self.root.take();
        let b = other.root.take();
        self.root = union(a, b);
        Ok(())
    }

    fn join_exclusive(&mut self, mut other: Self) -> Result<()> {
        if let (Some(a), Some(b)) = (self.max(), other.min())
            && a >= b
        {
            return Err(Error::Domain("key ranges overlap"));
        }
        let a = self.root.take();
        let b = other.root.take();
        self.root = merge(a, b);
        Ok(())
    }

    fn iter(&self) -> Iter<'_, K> {
        Iter { inner: Inorder::new(self.root.as_deref()) }
    }
}

set_common!(Treap);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heap_rule_holds() {
        let mut t = Treap::with_seed(7);
        for i in 0..400 {
            t.insert(i * 3 % 400).unwrap_or_default();
        }
        t.check_invariants();
        let keys: Vec<i32> = t.iter().copied().collect();
        assert!(keys.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn union_merges_interleaved_ranges() {
        let mut a = Treap::with_seed(1);
        let mut b = Treap::with_seed(2);
        for i in 0..50 {
            a.insert(i * 2).unwrap();
            b.insert(i * 2 + 1).unwrap();
        }
        a.join(b).unwrap();
        a.check_invariants();
        assert_eq!(a.len(), 100);
        assert_eq!(a.iter().copied().collect::<Vec<_>>(), (0..100).collect::<Vec<_>>());
    }

    #[test]
    fn split_then_exclusive_join_round_trips() {
        let mut t = Treap::with_seed(11);
        for i in 0..80 {
            t.insert(i).unwrap();
        }
        let (mut l, r) = t.split_by_key(&30);
        assert_eq!(l.len(), 30);
        l.join_exclusive(r).unwrap();
        l.check_invariants();
        assert_eq!(l.iter().copied().collect::<Vec<_>>(), (0..80).collect::<Vec<_>>());
    }
}
