//! Plain binary search tree mutations.
//!
//! The functions here know nothing about balance. Insert and remove accept a
//! fix-up hook that is called on every child slot along the mutation path,
//! deepest slot first, after that slot's cached height has been refreshed.
//! The balancing layer hooks its rotations in there.

use std::cmp::{self, Ordering};
use std::mem;

use crate::error::{Result, TreeError};

pub(crate) type Link<K, V> = Option<Box<Node<K, V>>>;

#[derive(Clone)]
pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) left: Link<K, V>,
    pub(crate) right: Link<K, V>,
    /// Number of nodes on the longest path down to a leaf, this node included.
    pub(crate) height: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Side {
    Left,
    Right,
}

/// The sides taken from a node toward the slot that was mutated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Trail {
    /// Side taken at the node itself.
    pub(crate) near: Option<Side>,
    /// Side taken at the child reached through `near`.
    pub(crate) far: Option<Side>,
}

impl Trail {
    pub(crate) fn toward(side: Side) -> Self {
        Self {
            near: Some(side),
            far: None,
        }
    }

    fn extend(side: Side, below: Trail) -> Self {
        Self {
            near: Some(side),
            far: below.near,
        }
    }
}

impl<K, V> Node<K, V> {
    pub(crate) fn create(key: K, value: V) -> Box<Self> {
        Box::new(Node {
            key,
            value,
            left: None,
            right: None,
            height: 1,
        })
    }

    pub(crate) fn child(&self, side: Side) -> &Link<K, V> {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    pub(crate) fn child_mut(&mut self, side: Side) -> &mut Link<K, V> {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    pub(crate) fn adjust_height(&mut self) {
        self.height = cmp::max(height(&self.left), height(&self.right)) + 1;
    }
}

/// Height of the subtree behind `link`; an empty subtree has height 0.
pub(crate) fn height<K, V>(link: &Link<K, V>) -> usize {
    link.as_ref().map_or(0, |node| node.height)
}

pub(crate) fn find<'a, K: Ord, V>(link: &'a Link<K, V>, key: &K) -> Option<&'a Node<K, V>> {
    let mut current = link.as_deref();
    while let Some(node) = current {
        current = match key.cmp(&node.key) {
            Ordering::Equal => return Some(node),
            Ordering::Less => node.left.as_deref(),
            Ordering::Greater => node.right.as_deref(),
        };
    }
    None
}

pub(crate) fn find_mut<'a, K: Ord, V>(
    link: &'a mut Link<K, V>,
    key: &K,
) -> Option<&'a mut Node<K, V>> {
    let mut current = link.as_deref_mut();
    while let Some(node) = current {
        current = match key.cmp(&node.key) {
            Ordering::Equal => return Some(node),
            Ordering::Less => node.left.as_deref_mut(),
            Ordering::Greater => node.right.as_deref_mut(),
        };
    }
    None
}

/// Follows `side` from `link` as far as possible.
pub(crate) fn outermost<K, V>(link: &Link<K, V>, side: Side) -> Option<&Node<K, V>> {
    let mut node = link.as_deref()?;
    while let Some(child) = node.child(side).as_deref() {
        node = child;
    }
    Some(node)
}

/// Attaches a new leaf at the position `key` sorts into.
///
/// Returns the trail from the node behind `link` toward the new leaf.
/// Fails with [`TreeError::DuplicateKey`] without touching the tree if the key
/// is already present.
pub(crate) fn insert<K, V, F>(
    link: &mut Link<K, V>,
    key: K,
    value: V,
    fixup: &mut F,
) -> Result<Trail>
where
    K: Ord,
    F: FnMut(&mut Link<K, V>, Trail),
{
    let trail = match *link {
        None => {
            *link = Some(Node::create(key, value));
            return Ok(Trail::default());
        }
        Some(ref mut node) => {
            let side = match key.cmp(&node.key) {
                Ordering::Equal => return Err(TreeError::DuplicateKey),
                Ordering::Less => Side::Left,
                Ordering::Greater => Side::Right,
            };
            let below = insert(node.child_mut(side), key, value, fixup)?;
            node.adjust_height();
            Trail::extend(side, below)
        }
    };
    fixup(link, trail);
    Ok(trail)
}

/// Removes `key` and returns the stored pair.
///
/// Fails with [`TreeError::KeyNotFound`] without touching the tree if the key
/// is not present.
pub(crate) fn remove<K, V, F>(link: &mut Link<K, V>, key: &K, fixup: &mut F) -> Result<(K, V)>
where
    K: Ord,
    F: FnMut(&mut Link<K, V>, Trail),
{
    let Some(mut node) = link.take() else {
        return Err(TreeError::KeyNotFound);
    };
    let side = match key.cmp(&node.key) {
        Ordering::Equal => {
            let (head, entry) = unlink(node, fixup);
            *link = head;
            return Ok(entry);
        }
        Ordering::Less => Side::Left,
        Ordering::Greater => Side::Right,
    };
    let removed = remove(node.child_mut(side), key, fixup);
    node.adjust_height();
    *link = Some(node);
    if removed.is_ok() {
        fixup(link, Trail::toward(side));
    }
    removed
}

/// Takes `node` out of its subtree and returns the subtree's new head.
fn unlink<K, V, F>(mut node: Box<Node<K, V>>, fixup: &mut F) -> (Link<K, V>, (K, V))
where
    F: FnMut(&mut Link<K, V>, Trail),
{
    if node.left.is_some() {
        // Two children: the in-order successor takes over this node's entry
        if let Some((key, value)) = remove_min(&mut node.right, fixup) {
            let key = mem::replace(&mut node.key, key);
            let value = mem::replace(&mut node.value, value);
            node.adjust_height();
            let mut head = Some(node);
            fixup(&mut head, Trail::toward(Side::Right));
            return (head, (key, value));
        }
    }

    // Stem or leaf, splice the only child up
    let Node {
        key,
        value,
        left,
        right,
        ..
    } = *node;
    (left.or(right), (key, value))
}

fn remove_min<K, V, F>(link: &mut Link<K, V>, fixup: &mut F) -> Option<(K, V)>
where
    F: FnMut(&mut Link<K, V>, Trail),
{
    let mut node = link.take()?;
    if node.left.is_none() {
        let Node {
            key, value, right, ..
        } = *node;
        *link = right;
        return Some((key, value));
    }
    let min = remove_min(&mut node.left, fixup);
    node.adjust_height();
    *link = Some(node);
    fixup(link, Trail::toward(Side::Left));
    min
}

/// Depth-first walk calling `preorder`, `inorder` and `postorder` at the
/// matching visits of every node.
pub(crate) fn traverse<'a, K, V, Pre, In, Post>(
    link: &'a Link<K, V>,
    preorder: &mut Pre,
    inorder: &mut In,
    postorder: &mut Post,
) where
    Pre: FnMut(&'a Node<K, V>),
    In: FnMut(&'a Node<K, V>),
    Post: FnMut(&'a Node<K, V>),
{
    if let Some(node) = link.as_deref() {
        preorder(node);
        traverse(&node.left, preorder, inorder, postorder);
        inorder(node);
        traverse(&node.right, preorder, inorder, postorder);
        postorder(node);
    }
}
