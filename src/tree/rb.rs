//! Red-black ordered set.
//!
//! Insertion recolors and rotates red-red violations on the unwind path and
//! blackens the root. The structural operations (split, join, remove) are
//! built on a black-height-directed three-way join, which re-establishes
//! the color rules while concatenating, so no separate deletion fixup pass
//! is needed.

use std::cmp::Ordering;

use crate::error::{Error, Result};
use crate::order::ord_eq;
use crate::tree::{self, BstNode, Inorder, OrderedSet, set_common};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Color {
    Red,
    Black,
}

use Color::{Black, Red};

type Link<K> = Option<Box<Node<K>>>;

struct Node<K> {
    key: K,
    left: Link<K>,
    right: Link<K>,
    count: usize,
    color: Color,
}

impl<K> Node<K> {
    fn leaf(key: K) -> Box<Self> {
        Box::new(Node { key, left: None, right: None, count: 1, color: Red })
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

fn is_red<K>(link: &Link<K>) -> bool {
    matches!(link, Some(n) if n.color == Red)
}

/// Blacks on the left spine; a missing child counts as a black leaf of
/// height zero.
fn black_height<K>(link: &Link<K>) -> usize {
    let mut h = 0;
    let mut cur = link;
    while let Some(n) = cur {
        if n.color == Black {
            h += 1;
        }
        cur = &n.left;
    }
    h
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

/// Resolve a red child with a red grandchild under a black node, rebuilding
/// the local shape as a red node with two black children.
fn balance<K>(mut n: Box<Node<K>>) -> Box<Node<K>> {
    n.update();
    if n.color == Red {
        return n;
    }
    if is_red(&n.left) {
        if is_red(&n.left.as_ref().unwrap().right) {
            let l = n.left.take().unwrap();
            n.left = Some(rot_left(l));
        }
        if is_red(&n.left) && is_red(&n.left.as_ref().unwrap().left) {
            let mut top = rot_right(n);
            top.color = Red;
            top.left.as_mut().unwrap().color = Black;
            top.right.as_mut().unwrap().color = Black;
            return top;
        }
    }
    if is_red(&n.right) {
        if is_red(&n.right.as_ref().unwrap().left) {
            let r = n.right.take().unwrap();
            n.right = Some(rot_right(r));
        }
        if is_red(&n.right) && is_red(&n.right.as_ref().unwrap().right) {
            let mut top = rot_left(n);
            top.color = Red;
            top.left.as_mut().unwrap().color = Black;
            top.right.as_mut().unwrap().color = Black;
            return top;
        }
    }
    n
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
        _ => {
            let (child, res) = insert_rec(node.right.take(), key, allow_dup);
            node.right = Some(child);
            res
        }
    };
    match res {
        Ok(()) => (balance(node), Ok(())),
        Err(k) => (node, Err(k)),
    }
}

/// Join when the left tree is the taller one: descend its right spine until
/// the black heights meet, then repair red-red pairs on the way out.
fn join_right<K: Ord>(
    left: Link<K>,
    mut mid: Box<Node<K>>,
    right: Link<K>,
    bl: usize,
    br: usize,
) -> Box<Node<K>> {
    if !is_red(&left) && bl == br {
        mid.color = Red;
        mid.left = left;
        mid.right = right;
        mid.update();
        return mid;
    }
    let mut l = left.expect("taller side cannot be empty");
    let child_bh = if l.color == Black { bl - 1 } else { bl };
    let lr = l.right.take();
    l.right = Some(join_right(lr, mid, right, child_bh, br));
    if l.color == Black && is_red(&l.right) && is_red(&l.right.as_ref().unwrap().right) {
        l.right.as_mut().unwrap().right.as_mut().unwrap().color = Black;
        l.update();
        return rot_left(l);
    }
    l.update();
    l
}

fn join_left<K: Ord>(
    left: Link<K>,
    mut mid: Box<Node<K>>,
    right: Link<K>,
    bl: usize,
    br: usize,
) -> Box<Node<K>> {
    if !is_red(&right) && bl == br {
        mid.color = Red;
        mid.left = left;
        mid.right = right;
        mid.update();
        return mid;
    }
    let mut r = right.expect("taller side cannot be empty");
    let child_bh = if r.color == Black { br - 1 } else { br };
    let rl = r.left.take();
    r.left = Some(join_left(left, mid, rl, bl, child_bh));
    if r.color == Black && is_red(&r.left) && is_red(&r.left.as_ref().unwrap().left) {
        r.left.as_mut().unwrap().left.as_mut().unwrap().color = Black;
        r.update();
        return rot_right(r);
    }
    r.update();
    r
}

/// Three-way join (`left < mid < right`) preserving the color rules; the
/// result's root may be red and is blackened at the public boundary.
fn join3<K: Ord>(left: Link<K>, mut mid: Box<Node<K>>, right: Link<K>) -> Box<Node<K>> {
    let bl = black_height(&left);
    let br = black_height(&right);
    let mut root = match bl.cmp(&br) {
        Ordering::Greater => join_right(left, mid, right, bl, br),
        Ordering::Less => join_left(left, mid, right, bl, br),
        Ordering::Equal => {
            mid.color = if is_red(&left) || is_red(&right) { Black } else { Red };
            mid.left = left;
            mid.right = right;
            mid.update();
            mid
        }
    };
    if root.color == Red && (is_red(&root.left) || is_red(&root.right)) {
        root.color = Black;
    }
    root
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

/// Concatenate separated trees by re-joining around the right side's
/// minimum.
fn join_links<K: Ord>(left: Link<K>, right: Link<K>) -> Link<K> {
    match right {
        None => left,
        Some(r) => {
            let (min, rest) = split_at_rec(Some(r), 1);
            Some(join3(left, min.expect("non-empty right side"), rest))
        }
    }
}

fn blacken<K>(link: &mut Link<K>) {
    if let Some(n) = link {
        n.color = Black;
    }
}

/// Red-black ordered set.
pub struct RbTree<K> {
    root: Link<K>,
}

impl<K> Default for RbTree<K> {
    fn default() -> Self {
        Self { root: None }
    }
}

impl<K: Ord> RbTree<K> {
    /// An empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the BST order, the color rules, the black-height balance
    /// and the subtree counts. Intended for tests; panics on a violation.
    pub fn check_invariants(&self) {
        fn walk<K: Ord>(link: &Link<K>, lo: Option<&K>, hi: Option<&K>) -> (usize, usize) {
            let Some(node) = link else {
                return (0, 0);
            };
            if let Some(lo) = lo {
                assert!(*lo <= node.key, "BST order violated");
            }
            if let Some(hi) = hi {
                assert!(node.key <= *hi, "BST order violated");
            }
            if node.color == Red {
                assert!(!is_red(&node.left) && !is_red(&node.right), "red node with red child");
            }
            let (bl, cl) = walk(&node.left, lo, Some(&node.key));
            let (br, cr) = walk(&node.right, Some(&node.key), hi);
            assert_eq!(bl, br, "unequal black heights");
            assert_eq!(node.count, 1 + cl + cr, "stale count");
            (bl + (node.color == Black) as usize, node.count)
        }
        assert!(!is_red(&self.root), "red root");
        walk(&self.root, None, None);
    }
}

impl<K: Ord> OrderedSet<K> for RbTree<K> {
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
        blacken(&mut self.root);
        res
    }

    fn insert_dup(&mut self, key: K) {
        let (root, _) = insert_rec(self.root.take(), key, true);
        self.root = Some(root);
        blacken(&mut self.root);
    }

    fn remove(&mut self, key: &K) -> Option<K> {
        let (l, geq) = split_rec(self.root.take(), key);
        let removed = match geq {
            None => {
                self.root = l;
                None
            }
            Some(g) => {
                let (first, rest) = split_at_rec(Some(g), 1);
                let first = first.expect("non-empty split");
                if ord_eq(&first.key, key) {
                    self.root = join_links(l, rest);
                    Some(first.key)
                } else {
                    self.root = Some(join3(l, first, rest));
                    None
                }
            }
        };
        blacken(&mut self.root);
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
        let (mut l, mut r) = split_rec(self.root.take(), key);
        blacken(&mut l);
        blacken(&mut r);
        (Self { root: l }, Self { root: r })
    }

    fn split_at(&mut self, i: usize) -> Result<(Self, Self)> {
        if i > self.len() {
            return Err(Error::OutOfRange { index: i, len: self.len() });
        }
        let (mut l, mut r) = split_at_rec(self.root.take(), i);
        blacken(&mut l);
        blacken(&mut r);
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
        blacken(&mut self.root);
        Ok(())
    }

    fn iter(&self) -> Iter<'_, K> {
        Iter { inner: Inorder::new(self.root.as_deref()) }
    }
}

set_common!(RbTree);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colors_hold_under_ordered_inserts() {
        let mut t = RbTree::new();
        for i in 0..500 {
            t.insert(i).unwrap();
            t.check_invariants();
        }
        assert_eq!(t.len(), 500);
        assert_eq!(t.iter().copied().collect::<Vec<_>>(), (0..500).collect::<Vec<_>>());
    }

    #[test]
    fn remove_preserves_colors_and_order() {
        let mut t: RbTree<i32> = (0..300).collect();
        for i in 0..150 {
            assert_eq!(t.remove(&(i * 2)), Some(i * 2));
            t.check_invariants();
        }
        assert_eq!(t.remove(&0), None);
        assert_eq!(t.len(), 150);
        assert!(t.iter().all(|k| k % 2 == 1));
    }

    #[test]
    fn split_join_round_trip() {
        let mut t: RbTree<i32> = (0..128).collect();
        let (mut l, r) = t.split_by_key(&77);
        l.check_invariants();
        r.check_invariants();
        assert_eq!(l.len(), 77);
        l.join_exclusive(r).unwrap();
        l.check_invariants();
        assert_eq!(l.iter().copied().collect::<Vec<_>>(), (0..128).collect::<Vec<_>>());
    }

    #[test]
    fn split_at_respects_counts() {
        let mut t: RbTree<i32> = (0..64).collect();
        let (l, r) = t.split_at(10).unwrap();
        assert_eq!(l.len(), 10);
        assert_eq!(r.len(), 54);
        l.check_invariants();
        r.check_invariants();
    }
}
