//! Height-balanced (AVL) ordered set.
//!
//! The classic rule: for every node the heights of its children differ by
//! at most one, restored after each mutation by single or double rotations.
//! Split and join go through a height-directed three-way join, so they keep
//! the balance invariant without rebuilding.

use std::cmp::Ordering;

use crate::error::{Error, Result};
use crate::tree::{self, BstNode, Inorder, OrderedSet, set_common};

type Link<K> = Option<Box<Node<K>>>;

struct Node<K> {
    key: K,
    left: Link<K>,
    right: Link<K>,
    count: usize,
    height: i32,
}

impl<K> Node<K> {
    fn leaf(key: K) -> Box<Self> {
        Box::new(Node { key, left: None, right: None, count: 1, height: 1 })
    }

    fn update(&mut self) {
        self.count = 1 + count(&self.left) + count(&self.right);
        self.height = 1 + height(&self.left).max(height(&self.right));
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

fn height<K>(link: &Link<K>) -> i32 {
    link.as_ref().map_or(0, |n| n.height)
}

fn count<K>(link: &Link<K>) -> usize {
    link.as_ref().map_or(0, |n| n.count)
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

/// Refresh `n`'s cached data and restore the balance rule at `n`.
fn rebalance<K>(mut n: Box<Node<K>>) -> Box<Node<K>> {
    n.update();
    let bf = height(&n.left) - height(&n.right);
    if bf > 1 {
        let l = n.left.as_ref().unwrap();
        if height(&l.left) < height(&l.right) {
            let l = n.left.take().unwrap();
            n.left = Some(rot_left(l));
        }
        rot_right(n)
    } else if bf < -1 {
        let r = n.right.as_ref().unwrap();
        if height(&r.right) < height(&r.left) {
            let r = n.right.take().unwrap();
            n.right = Some(rot_right(r));
        }
        rot_left(n)
    } else {
        n
    }
}

fn insert_rec<K: Ord>(
    link: Link<K>,
    key: K,
    allow_dup: bool,
) -> (Box<Node<K>>, std::result::Result<(), K>) {
    let Some(mut node) = link else {
        return (Node::leaf(key), Ok(()));
    };
    let res = match key.cmp(&node.key) {
        Ordering::Less => {
            let (child, res) = insert_rec(node.left.take(), key, allow_dup);
            node.left = Some(child);
            res
        }
        Ordering::Equal if !allow_dup => return (node, Err(key)),
        // Equal keys with duplicates allowed descend right: in-order keeps
        // insertion order among ties.
        _ => {
            let (child, res) = insert_rec(node.right.take(), key, allow_dup);
            node.right = Some(child);
            res
        }
    };
    match res {
        Ok(()) => (rebalance(node), Ok(())),
        Err(k) => (node, Err(k)),
    }
}

/// Detach the minimum node of the subtree rooted at `node`.
fn take_min<K: Ord>(mut node: Box<Node<K>>) -> (Link<K>, Box<Node<K>>) {
    match node.left.take() {
        None => {
            let right = node.right.take();
            (right, node)
        }
        Some(l) => {
            let (rest, min) = take_min(l);
            node.left = rest;
            (Some(rebalance(node)), min)
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
            if removed.is_some() { (Some(rebalance(node)), removed) } else { (Some(node), None) }
        }
        Ordering::Greater => {
            let (child, removed) = remove_rec(node.right.take(), key);
            node.right = child;
            if removed.is_some() { (Some(rebalance(node)), removed) } else { (Some(node), None) }
        }
        Ordering::Equal => {
            let left = node.left.take();
            let right = node.right.take();
            match right {
                None => (left, Some(node.key)),
                Some(r) => {
                    let (rest, mut succ) = take_min(r);
                    succ.left = left;
                    succ.right = rest;
                    (Some(rebalance(succ)), Some(node.key))
                }
            }
        }
    }
}

/// Join `left`, `mid` and `right` (`left < mid < right`) into one balanced
/// tree, descending the taller side until the heights meet.
fn join3<K: Ord>(left: Link<K>, mut mid: Box<Node<K>>, right: Link<K>) -> Box<Node<K>> {
    let hl = height(&left);
    let hr = height(&right);
    if (hl - hr).abs() <= 1 {
        mid.left = left;
        mid.right = right;
        mid.update();
        mid
    } else if hl > hr {
        let mut l = left.unwrap();
        let lr = l.right.take();
        l.right = Some(join3(lr, mid, right));
        rebalance(l)
    } else {
        let mut r = right.unwrap();
        let rl = r.left.take();
        r.left = Some(join3(left, mid, rl));
        rebalance(r)
    }
}

/// Concatenate two trees whose key ranges are already separated.
fn join_links<K: Ord>(left: Link<K>, right: Link<K>) -> Link<K> {
    match right {
        None => left,
        Some(r) => {
            let (rest, min) = take_min(r);
            Some(join3(left, min, rest))
        }
    }
}

fn split_rec<K: Ord>(link: Link<K>, key: &K) -> (Link<K>, Link<K>) {
    let Some(mut node) = link else {
        return (None, None);
    };
    let left = node.left.take();
    let right = node.right.take();
    if node.key < *key {
        let (a, b) = split_rec(right, key);
        (Some(join3(left, node, a)), b)
    } else {
        let (a, b) = split_rec(left, key);
        (a, Some(join3(b, node, right)))
    }
}

fn split_at_rec<K: Ord>(link: Link<K>, i: usize) -> (Link<K>, Link<K>) {
    let Some(mut node) = link else {
        return (None, None);
    };
    let left = node.left.take();
    let right = node.right.take();
    let lc = count(&left);
    if i <= lc {
        let (a, b) = split_at_rec(left, i);
        (a, Some(join3(b, node, right)))
    } else {
        let (a, b) = split_at_rec(right, i - lc - 1);
        (Some(join3(left, node, a)), b)
    }
}

/// AVL-balanced ordered set.
pub struct Avl<K> {
    root: Link<K>,
}

impl<K> Default for Avl<K> {
    fn default() -> Self {
        Self { root: None }
    }
}

impl<K: Ord> Avl<K> {
    /// An empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the BST order, the height rule and the subtree counts.
    /// Intended for tests; panics on a violation.
    pub fn check_invariants(&self) {
        fn walk<K: Ord>(link: &Link<K>, lo: Option<&K>, hi: Option<&K>) -> (i32, usize) {
            let Some(node) = link else {
                return (0, 0);
            };
            if let Some(lo) = lo {
                assert!(*lo <= node.key, "BST order violated");
            }
            if let Some(hi) = hi {
                assert!(node.key <= *hi, "BST order violated");
            }
            let (hl, cl) = walk(&node.left, lo, Some(&node.key));
            let (hr, cr) = walk(&node.right, Some(&node.key), hi);
            assert!((hl - hr).abs() <= 1, "height rule violated");
            assert_eq!(node.height, 1 + hl.max(hr), "stale height");
            assert_eq!(node.count, 1 + cl + cr, "stale count");
            (node.height, node.count)
        }
        walk(&self.root, None, None);
    }
}

impl<K: Ord> OrderedSet<K> for Avl<K> {
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
        let (root, res) = insert_rec(self.root.take(), key, false);
        self.root = Some(root);
        res
    }

    fn insert_dup(&mut self, key: K) {
        let (root, _) = insert_rec(self.root.take(), key, true);
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
        (Self { root: l }, Self { root: r })
    }

    fn split_at(&mut self, i: usize) -> Result<(Self, Self)> {
        if i > self.len() {
            return Err(Error::OutOfRange { index: i, len: self.len() });
        }
        let (l, r) = split_at_rec(self.root.take(), i);
        Ok((Self { root: l }, Self { root: r }))
    }

    fn join(&mut self, other: Self) -> Result<()> {
        self.join_exclusive(other)
    }

    fn join_exclusive(&mut self, mut other: Self) -> Result<()> {
        if let (Some(a), Some(b)) = (self.max(), other.min())
            && a >= b
        {
            return Err(Error::Domain("key ranges overlap"));
        }
        let left = self.root.take();
        let right = other.root.take();
        self.root = join_links(left, right);
        Ok(())
    }

    fn iter(&self) -> Iter<'_, K> {
        Iter { inner: Inorder::new(self.root.as_deref()) }
    }
}

set_common!(Avl);
