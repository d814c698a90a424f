//! AVL balance evaluation and rotations.

use log::trace;

use crate::bst::{self, Link, Node, Side, Trail};

/// Height of the left subtree minus height of the right subtree.
pub(crate) fn balance_factor<K, V>(node: &Node<K, V>) -> isize {
    bst::height(&node.left) as isize - bst::height(&node.right) as isize
}

fn is_within_bounds(factor: isize) -> bool {
    (-1..=1).contains(&factor)
}

/// Returns whether every node in the subtree satisfies the AVL condition.
pub(crate) fn is_balanced<K, V>(link: &Link<K, V>) -> bool {
    match link.as_deref() {
        None => true,
        Some(node) => {
            is_within_bounds(balance_factor(node))
                && is_balanced(&node.left)
                && is_balanced(&node.right)
        }
    }
}

/// Returns the deepest node whose balance factor is out of bounds.
///
/// The heavier child is searched first, which is where the imbalance left by
/// a single insert lives.
pub(crate) fn find_lowest_unbalanced<K, V>(link: &Link<K, V>) -> Option<&Node<K, V>> {
    let node = link.as_deref()?;
    let factor = balance_factor(node);
    let (heavy, light) = if factor >= 0 {
        (&node.left, &node.right)
    } else {
        (&node.right, &node.left)
    };
    find_lowest_unbalanced(heavy)
        .or_else(|| find_lowest_unbalanced(light))
        .or_else(|| (!is_within_bounds(factor)).then_some(node))
}

/// The four AVL rebalancing cases, named after the region holding the excess height.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Rotation {
    LeftLeft,
    LeftRight,
    RightRight,
    RightLeft,
}

impl Rotation {
    /// Picks the rotation for `node` from the region an insert went into.
    /// Returns `None` if `node` is balanced.
    pub(crate) fn for_insert<K, V>(node: &Node<K, V>, trail: Trail) -> Option<Self> {
        if is_within_bounds(balance_factor(node)) {
            return None;
        }
        match (trail.near?, trail.far?) {
            (Side::Left, Side::Left) => Some(Rotation::LeftLeft),
            (Side::Left, Side::Right) => Some(Rotation::LeftRight),
            (Side::Right, Side::Right) => Some(Rotation::RightRight),
            (Side::Right, Side::Left) => Some(Rotation::RightLeft),
        }
    }

    /// Picks the rotation for `node` after a remove shortened one of its sides.
    /// The heavy child decides between the single and the double rotation.
    /// Returns `None` if `node` is balanced.
    pub(crate) fn for_remove<K, V>(node: &Node<K, V>) -> Option<Self> {
        let factor = balance_factor(node);
        if factor > 1 {
            let left = node.left.as_deref()?;
            Some(if balance_factor(left) >= 0 {
                Rotation::LeftLeft
            } else {
                Rotation::LeftRight
            })
        } else if factor < -1 {
            let right = node.right.as_deref()?;
            Some(if balance_factor(right) <= 0 {
                Rotation::RightRight
            } else {
                Rotation::RightLeft
            })
        } else {
            None
        }
    }

    pub(crate) fn apply<K, V>(self, node: Box<Node<K, V>>) -> Box<Node<K, V>> {
        match self {
            Rotation::LeftLeft => rotate_right(node),
            Rotation::LeftRight => rotate_left_right(node),
            Rotation::RightRight => rotate_left(node),
            Rotation::RightLeft => rotate_right_left(node),
        }
    }
}

/// Fix-up hook for inserts: rotates the slot if its node went out of balance.
pub(crate) fn rebalance_inserted<K, V>(link: &mut Link<K, V>, trail: Trail) {
    let rotation = link
        .as_deref()
        .and_then(|node| Rotation::for_insert(node, trail));
    if let Some(rotation) = rotation {
        rotate_at(link, rotation);
    }
}

/// Fix-up hook for removes.
pub(crate) fn rebalance_removed<K, V>(link: &mut Link<K, V>, _trail: Trail) {
    let rotation = link.as_deref().and_then(Rotation::for_remove);
    if let Some(rotation) = rotation {
        rotate_at(link, rotation);
    }
}

fn rotate_at<K, V>(link: &mut Link<K, V>, rotation: Rotation) {
    if let Some(node) = link.take() {
        trace!(
            "{:?} rotation at subtree of height {} (balance factor {})",
            rotation,
            node.height,
            balance_factor(&node)
        );
        *link = Some(rotation.apply(node));
    }
}

/// Left child becomes the head, the old head becomes its right child.
pub(crate) fn rotate_right<K, V>(mut node: Box<Node<K, V>>) -> Box<Node<K, V>> {
    let Some(mut left) = node.left.take() else {
        return node;
    };
    node.left = left.right.take();
    node.adjust_height();
    left.right = Some(node);
    left.adjust_height();
    left
}

/// Right child becomes the head, the old head becomes its left child.
pub(crate) fn rotate_left<K, V>(mut node: Box<Node<K, V>>) -> Box<Node<K, V>> {
    let Some(mut right) = node.right.take() else {
        return node;
    };
    node.right = right.left.take();
    node.adjust_height();
    right.left = Some(node);
    right.adjust_height();
    right
}

pub(crate) fn rotate_left_right<K, V>(mut node: Box<Node<K, V>>) -> Box<Node<K, V>> {
    if let Some(left) = node.left.take() {
        node.left = Some(rotate_left(left));
    }
    rotate_right(node)
}

pub(crate) fn rotate_right_left<K, V>(mut node: Box<Node<K, V>>) -> Box<Node<K, V>> {
    if let Some(right) = node.right.take() {
        node.right = Some(rotate_right(right));
    }
    rotate_left(node)
}
