//! Randomised binary search tree.
//!
//! Insertion places the new key at the root of the visited subtree with
//! probability `1/(n+1)` (root insertion via split), which makes the tree
//! shape equivalent to a BST built from a random permutation: expected
//! O(log n) everywhere, independent of the insertion order. Deletion joins
//! the children with a size-weighted coin flip.
//!
//! The RNG is per-container; construct with [`RandTree::with_seed`] for
//! reproducible shapes.

use std::cmp::Ordering;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{Error, Result};
use crate::tree::{self, BstNode, Inorder, OrderedSet, set_common};

type Link<K> = Option<Box<Node<K>>>;

struct Node<K> {
    key: K,
    left: Link<K>,
    right: Link<K>,
    count: usize,
}

impl<K> Node<K> {
    fn leaf(key: K) -> Box<Self> {
        Box::new(Node { key, left: None, right: None, count: 1 })
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

/// Keys `<= key` left, keys `> key` right; root insertion of a duplicate
/// uses this so the new occurrence lands after the existing ones.
fn split_le_rec<K: Ord>(link: Link<K>, key: &K) -> (Link<K>, Link<K>) {
    let Some(mut node) = link else {
        return (None, None);
    };
    if node.key <= *key {
        let (a, b) = split_le_rec(node.right.take(), key);
        node.right = a;
        node.update();
        (Some(node), b)
    } else {
        let (a, b) = split_le_rec(node.left.take(), key);
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

/// Join separated trees (`a < b`), choosing the root from `a` with
/// probability `|a| / (|a| + |b|)`.
fn rand_join<K: Ord>(rng: &mut StdRng, a: Link<K>, b: Link<K>) -> Link<K> {
    match (a, b) {
        (None, x) | (x, None) => x,
        (Some(mut a), Some(b)) => {
            let na = a.count;
            let nb = b.count;
            if rng.gen_range(0..na + nb) < na {
                a.right = rand_join(rng, a.right.take(), Some(b));
                a.update();
                Some(a)
            } else {
                let mut b = b;
                b.left = rand_join(rng, Some(a), b.left.take());
                b.update();
                Some(b)
            }
        }
    }
}

fn insert_dup_rec<K: Ord>(rng: &mut StdRng, link: Link<K>, key: K) -> Box<Node<K>> {
    let n = count(&link);
    // Root insertion with probability 1/(n+1)
    if rng.gen_range(0..=n) == 0 {
        let (l, r) = split_le_rec(link, &key);
        let mut node = Node::leaf(key);
        node.left = l;
        node.right = r;
        node.update();
        return node;
    }
    let mut node = link.expect("non-empty by the probability check");
    if key < node.key {
        node.left = Some(insert_dup_rec(rng, node.left.take(), key));
    } else {
        node.right = Some(insert_dup_rec(rng, node.right.take(), key));
    }
    node.update();
    node
}

fn remove_rec<K: Ord>(rng: &mut StdRng, link: Link<K>, key: &K) -> (Link<K>, Option<K>) {
    let Some(mut node) = link else {
        return (None, None);
    };
    match key.cmp(&node.key) {
        Ordering::Less => {
            let (child, removed) = remove_rec(rng, node.left.take(), key);
            node.left = child;
            node.update();
            (Some(node), removed)
        }
        Ordering::Greater => {
            let (child, removed) = remove_rec(rng, node.right.take(), key);
            node.right = child;
            node.update();
            (Some(node), removed)
        }
        Ordering::Equal => {
            let joined = rand_join(rng, node.left.take(), node.right.take());
            (joined, Some(node.key))
        }
    }
}

/// Randomised BST.
pub struct RandTree<K> {
    root: Link<K>,
    rng: StdRng,
}

impl<K> Default for RandTree<K> {
    fn default() -> Self {
        Self { root: None, rng: StdRng::from_entropy() }
    }
}

impl<K: Ord> RandTree<K> {
    /// An empty tree with an entropy-seeded RNG.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty tree with a reproducible coin-flip stream.
    pub fn with_seed(seed: u64) -> Self {
        Self { root: None, rng: StdRng::seed_from_u64(seed) }
    }

    /// Validate BST order and subtree counts. Intended for tests; panics on
    /// a violation.
    pub fn check_invariants(&self) {
        fn walk<K: Ord>(link: &Link<K>, lo: Option<&K>, hi: Option<&K>) -> usize {
            let Some(node) = link else {
                return 0;
            };
            if let Some(lo) = lo {
                assert!(*lo <= node.key, "BST order violated");
            }
            if let Some(hi) = hi {
                assert!(node.key <= *hi, "BST order violated");
            }
            let cl = walk(&node.left, lo, Some(&node.key));
            let cr = walk(&node.right, Some(&node.key), hi);
            assert_eq!(node.count, 1 + cl + cr, "stale count");
            node.count
        }
        walk(&self.root, None, None);
    }
}

impl<K: Ord> OrderedSet<K> for RandTree<K> {
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
        if self.contains(&key) {
            return Err(key);
        }
        self.insert_dup(key);
        Ok(())
    }

    fn insert_dup(&mut self, key: K) {
        let root = insert_dup_rec(&mut self.rng, self.root.take(), key);
        self.root = Some(root);
    }

    fn remove(&mut self, key: &K) -> Option<K> {
        let (root, removed) = remove_rec(&mut self.rng, self.root.take(), key);
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

    /// Interleaved ranges are merged by re-inserting the other tree's keys
    /// (duplicates from `other` follow the receiver's).
    fn join(&mut self, other: Self) -> Result<()> {
        let overlap = match (self.max(), other.min()) {
            (Some(a), Some(b)) => a >= b,
            _ => false,
        };
        if overlap {
            for k in other {
                self.insert_dup(k);
            }
            Ok(())
        } else {
            self.join_exclusive(other)
        }
    }

    fn join_exclusive(&mut self, mut other: Self) -> Result<()> {
        if let (Some(a), Some(b)) = (self.max(), other.min())
            && a >= b
        {
            return Err(Error::Domain("key ranges overlap"));
        }
        let a = self.root.take();
        let b = other.root.take();
        self.root = rand_join(&mut self.rng, a, b);
        Ok(())
    }

    fn iter(&self) -> Iter<'_, K> {
        Iter { inner: Inorder::new(self.root.as_deref()) }
    }
}

set_common!(RandTree);
