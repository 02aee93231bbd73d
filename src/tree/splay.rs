//! Self-adjusting (splay) ordered set.
//!
//! No structural invariant beyond BST order: every mutating access splays
//! the touched key's node (or the last node on its search path) to the
//! root, which yields the amortised O(log n) bound. Lookups through a
//! shared reference cannot restructure, so [`OrderedSet::search`] is a
//! plain descent; [`Splay::access`] is the splaying entry point.

use std::cmp::Ordering;

use crate::error::{Error, Result};
use crate::order::ord_eq;
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

/// Bring the node holding `key` (or the last node on its search path) to
/// the root with zig-zig / zig-zag rotations. Splaying permutes links only,
/// so subtree counts are maintained entirely by the rotations.
fn splay<K: Ord>(mut root: Box<Node<K>>, key: &K) -> Box<Node<K>> {
    match key.cmp(&root.key) {
        Ordering::Equal => root,
        Ordering::Less => {
            let Some(mut l) = root.left.take() else {
                return root;
            };
            match key.cmp(&l.key) {
                Ordering::Less => {
                    if let Some(ll) = l.left.take() {
                        l.left = Some(splay(ll, key));
                        l.update();
                    }
                    root.left = Some(l);
                    root.update();
                    root = rot_right(root);
                }
                Ordering::Greater => {
                    if let Some(lr) = l.right.take() {
                        l.right = Some(splay(lr, key));
                        l.update();
                        l = rot_left(l);
                    }
                    root.left = Some(l);
                    root.update();
                }
                Ordering::Equal => {
                    root.left = Some(l);
                    root.update();
                }
            }
            if root.left.is_some() { rot_right(root) } else { root }
        }
        Ordering::Greater => {
            let Some(mut r) = root.right.take() else {
                return root;
            };
            match key.cmp(&r.key) {
                Ordering::Greater => {
                    if let Some(rr) = r.right.take() {
                        r.right = Some(splay(rr, key));
                        r.update();
                    }
                    root.right = Some(r);
                    root.update();
                    root = rot_left(root);
                }
                Ordering::Less => {
                    if let Some(rl) = r.left.take() {
                        r.left = Some(splay(rl, key));
                        r.update();
                        r = rot_right(r);
                    }
                    root.right = Some(r);
                    root.update();
                }
                Ordering::Equal => {
                    root.right = Some(r);
                    root.update();
                }
            }
            if root.right.is_some() { rot_left(root) } else { root }
        }
    }
}

/// Rotate the maximum up to the root (leaves it without a right child).
fn splay_max<K>(mut node: Box<Node<K>>) -> Box<Node<K>> {
    while node.right.is_some() {
        node = rot_left(node);
    }
    node
}

/// Concatenate separated trees: splay the left maximum, hang the right
/// tree off it.
fn join_links<K: Ord>(left: Link<K>, right: Link<K>) -> Link<K> {
    match left {
        None => right,
        Some(l) => {
            let mut m = splay_max(l);
            m.right = right;
            m.update();
            Some(m)
        }
    }
}

/// Plain BST insertion descending right on equal keys; used by
/// `insert_dup` so ties keep insertion order before the follow-up splay.
fn bst_insert_dup<K: Ord>(link: Link<K>, key: K) -> Box<Node<K>> {
    let Some(mut node) = link else {
        return Node::leaf(key);
    };
    if key < node.key {
        node.left = Some(bst_insert_dup(node.left.take(), key));
    } else {
        node.right = Some(bst_insert_dup(node.right.take(), key));
    }
    node.update();
    node
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

/// Splay ordered set.
pub struct Splay<K> {
    root: Link<K>,
}

impl<K> Default for Splay<K> {
    fn default() -> Self {
        Self { root: None }
    }
}

impl<K: Ord> Splay<K> {
    /// An empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Splaying lookup: restructures so the found key (or its would-be
    /// neighbour) ends up at the root, then returns the match if any.
    pub fn access(&mut self, key: &K) -> Option<&K> {
        let root = self.root.take()?;
        let root = splay(root, key);
        self.root = Some(root);
        let k = &self.root.as_ref().unwrap().key;
        ord_eq(k, key).then_some(k)
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

impl<K: Ord> OrderedSet<K> for Splay<K> {
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
        let Some(root) = self.root.take() else {
            self.root = Some(Node::leaf(key));
            return Ok(());
        };
        let mut root = splay(root, &key);
        match key.cmp(&root.key) {
            Ordering::Equal => {
                self.root = Some(root);
                Err(key)
            }
            Ordering::Less => {
                // root is the successor: its left subtree is entirely < key
                let mut n = Node::leaf(key);
                n.left = root.left.take();
                root.update();
                n.right = Some(root);
                n.update();
                self.root = Some(n);
                Ok(())
            }
            Ordering::Greater => {
                let mut n = Node::leaf(key);
                n.right = root.right.take();
                root.update();
                n.left = Some(root);
                n.update();
                self.root = Some(n);
                Ok(())
            }
        }
    }

    fn insert_dup(&mut self, key: K) {
        let Some(root) = self.root.take() else {
            self.root = Some(Node::leaf(key));
            return;
        };
        let mut root = splay(root, &key);
        match key.cmp(&root.key) {
            Ordering::Less => {
                let mut n = Node::leaf(key);
                n.left = root.left.take();
                root.update();
                n.right = Some(root);
                n.update();
                self.root = Some(n);
            }
            Ordering::Greater => {
                let mut n = Node::leaf(key);
                n.right = root.right.take();
                root.update();
                n.left = Some(root);
                n.update();
                self.root = Some(n);
            }
            // An equal key goes after every existing occurrence: descend the
            // right subtree, where ties keep insertion order.
            Ordering::Equal => {
                root.right = Some(bst_insert_dup(root.right.take(), key));
                root.update();
                self.root = Some(root);
            }
        }
    }

    fn remove(&mut self, key: &K) -> Option<K> {
        let root = self.root.take()?;
        let mut root = splay(root, key);
        if !ord_eq(&root.key, key) {
            self.root = Some(root);
            return None;
        }
        let left = root.left.take();
        let right = root.right.take();
        self.root = join_links(left, right);
        Some(root.key)
    }

    fn select(&self, i: usize) -> Result<&K> {
        tree::select_in(self.root.as_deref(), i)
            .ok_or(Error::OutOfRange { index: i, len: self.len() })
    }

    fn position_of(&self, key: &K) -> Option<usize> {
        tree::position_in(self.root.as_deref(), key)
    }

    fn split_by_key(&mut self, key: &K) -> (Self, Self) {
        let Some(root) = self.root.take() else {
            return (Self::default(), Self::default());
        };
        let mut root = splay(root, key);
        let (mut lpart, mut rpart) = if root.key < *key {
            let r = root.right.take();
            root.update();
            (Some(root), r)
        } else {
            let l = root.left.take();
            root.update();
            (l, Some(root))
        };
        // Restructuring may have left keys equal to `key` on the low side;
        // move that run over so equal keys always land in R.
        while let Some(l) = lpart {
            let mut m = splay_max(l);
            if ord_eq(&m.key, key) {
                lpart = m.left.take();
                m.right = rpart;
                m.update();
                rpart = Some(m);
            } else {
                lpart = Some(m);
                break;
            }
        }
        (Self { root: lpart }, Self { root: rpart })
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

set_common!(Splay);
