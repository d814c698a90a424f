use std::collections::VecDeque;
use std::fmt;

use log::debug;

use crate::balance;
use crate::bst::{self, Link, Node, Side};
use crate::error::{Result, TreeError};
use crate::iter::{IntoIter, Iter, IterMut, Keys, Values};

/// An ordered map implemented with an AVL tree.
///
/// ```
/// use balanced_tree::{BalancedTree, TreeError};
/// let mut tree = BalancedTree::new();
/// tree.insert(0, "zero").unwrap();
/// tree.insert(1, "one").unwrap();
/// tree.insert(2, "two").unwrap();
/// assert_eq!(tree.insert(2, "deux"), Err(TreeError::DuplicateKey));
/// assert_eq!(tree.get(&1), Some(&"one"));
/// assert_eq!(tree.remove(&1), Ok("one"));
/// assert_eq!(tree.remove(&1), Err(TreeError::KeyNotFound));
/// ```
#[derive(Clone)]
pub struct BalancedTree<K, V> {
    root: Link<K, V>,
    num_nodes: usize,
}

impl<K: Ord, V> BalancedTree<K, V> {
    /// Creates an empty tree.
    /// No memory is allocated until the first entry is inserted.
    pub fn new() -> Self {
        Self {
            root: None,
            num_nodes: 0,
        }
    }

    /// Returns true if the tree contains no entries.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns the number of entries in the tree.
    pub fn len(&self) -> usize {
        self.num_nodes
    }

    /// Returns the number of nodes on the longest root-to-leaf path.
    pub fn height(&self) -> usize {
        bst::height(&self.root)
    }

    /// Clears the tree, deallocating all memory.
    pub fn clear(&mut self) {
        self.root = None;
        self.num_nodes = 0;
    }

    /// Returns a reference to the value corresponding to the key.
    pub fn get(&self, key: &K) -> Option<&V> {
        bst::find(&self.root, key).map(|node| &node.value)
    }

    /// Returns a mutable reference to the value corresponding to the key.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        bst::find_mut(&mut self.root, key).map(|node| &mut node.value)
    }

    /// Returns references to the key-value pair corresponding to the key.
    pub fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
        bst::find(&self.root, key).map(|node| (&node.key, &node.value))
    }

    /// Returns true if the tree contains a value for the key.
    pub fn contains_key(&self, key: &K) -> bool {
        bst::find(&self.root, key).is_some()
    }

    /// Looks up the value for the key.
    ///
    /// # Errors
    ///
    /// [`TreeError::KeyNotFound`] if the key is not in the tree.
    pub fn lookup(&self, key: &K) -> Result<&V> {
        self.get(key).ok_or(TreeError::KeyNotFound)
    }

    /// Returns the entry stored at the root node.
    pub fn root(&self) -> Option<(&K, &V)> {
        self.root.as_deref().map(|node| (&node.key, &node.value))
    }

    /// Returns the entry with the smallest key.
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        bst::outermost(&self.root, Side::Left).map(|node| (&node.key, &node.value))
    }

    /// Returns the entry with the largest key.
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        bst::outermost(&self.root, Side::Right).map(|node| (&node.key, &node.value))
    }

    /// Inserts a key-value pair into the tree.
    ///
    /// At most one single or double rotation is applied to restore balance.
    ///
    /// # Errors
    ///
    /// [`TreeError::DuplicateKey`] if the key is already present. The tree is
    /// left unchanged and the stored value is not replaced.
    pub fn insert(&mut self, key: K, value: V) -> Result<()> {
        bst::insert(
            &mut self.root,
            key,
            value,
            &mut balance::rebalance_inserted::<K, V>,
        )
        .inspect_err(|err| debug!("insert rejected: {err}"))?;
        self.num_nodes += 1;
        Ok(())
    }

    /// Inserts a key-value pair, rejecting an absent key.
    ///
    /// # Errors
    ///
    /// [`TreeError::InvalidKey`] if `key` is `None`, otherwise as [`insert`].
    ///
    /// [`insert`]: BalancedTree::insert
    pub fn insert_nullable(&mut self, key: Option<K>, value: V) -> Result<()> {
        match key {
            Some(key) => self.insert(key, value),
            None => {
                debug!("insert rejected: {}", TreeError::InvalidKey);
                Err(TreeError::InvalidKey)
            }
        }
    }

    /// Removes a key from the tree.
    /// Returns the value that was stored for the key.
    ///
    /// # Errors
    ///
    /// [`TreeError::KeyNotFound`] if the key is not in the tree. The tree is
    /// left unchanged.
    pub fn remove(&mut self, key: &K) -> Result<V> {
        self.remove_entry(key).map(|(_, value)| value)
    }

    /// Removes a key from the tree, rejecting an absent key.
    ///
    /// # Errors
    ///
    /// [`TreeError::InvalidKey`] if `key` is `None`, otherwise as [`remove`].
    ///
    /// [`remove`]: BalancedTree::remove
    pub fn remove_nullable(&mut self, key: Option<&K>) -> Result<V> {
        match key {
            Some(key) => self.remove(key),
            None => {
                debug!("remove rejected: {}", TreeError::InvalidKey);
                Err(TreeError::InvalidKey)
            }
        }
    }

    /// Removes a key from the tree.
    /// Returns the stored key and value.
    ///
    /// # Errors
    ///
    /// [`TreeError::KeyNotFound`] if the key is not in the tree.
    pub fn remove_entry(&mut self, key: &K) -> Result<(K, V)> {
        let entry = bst::remove(
            &mut self.root,
            key,
            &mut balance::rebalance_removed::<K, V>,
        )
        .inspect_err(|err| debug!("remove rejected: {err}"))?;
        debug_assert!(self.num_nodes >= 1);
        self.num_nodes -= 1;
        Ok(entry)
    }

    /// Returns true if every node satisfies the AVL condition.
    pub fn is_balanced(&self) -> bool {
        balance::is_balanced(&self.root)
    }

    /// Returns the key of the deepest node violating the AVL condition, if any.
    pub fn lowest_unbalanced_key(&self) -> Option<&K> {
        balance::find_lowest_unbalanced(&self.root).map(|node| &node.key)
    }

    /// Gets an iterator over the entries of the tree, sorted by key.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(&self.root, self.num_nodes)
    }

    /// Gets a mutable iterator over the entries of the tree, sorted by key.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut::new(&mut self.root, self.num_nodes)
    }

    /// Gets an iterator over the keys of the tree, in sorted order.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys::new(self.iter())
    }

    /// Gets an iterator over the values of the tree, in order by key.
    pub fn values(&self) -> Values<'_, K, V> {
        Values::new(self.iter())
    }

    /// Visits every entry, each node before its subtrees.
    pub fn traverse_pre_order<F: FnMut(&K, &V)>(&self, mut f: F) {
        bst::traverse(
            &self.root,
            &mut |node: &Node<K, V>| f(&node.key, &node.value),
            &mut |_| {},
            &mut |_| {},
        );
    }

    /// Visits every entry in ascending key order.
    pub fn traverse_in_order<F: FnMut(&K, &V)>(&self, mut f: F) {
        bst::traverse(
            &self.root,
            &mut |_| {},
            &mut |node: &Node<K, V>| f(&node.key, &node.value),
            &mut |_| {},
        );
    }

    /// Visits every entry, each node after its subtrees.
    pub fn traverse_post_order<F: FnMut(&K, &V)>(&self, mut f: F) {
        bst::traverse(
            &self.root,
            &mut |_| {},
            &mut |_| {},
            &mut |node: &Node<K, V>| f(&node.key, &node.value),
        );
    }

    /// Visits every entry level by level, left to right within a level.
    pub fn traverse_level_order<F: FnMut(&K, &V)>(&self, mut f: F) {
        let mut queue = VecDeque::new();
        queue.extend(self.root.as_deref());
        while let Some(node) = queue.pop_front() {
            f(&node.key, &node.value);
            queue.extend(node.left.as_deref());
            queue.extend(node.right.as_deref());
        }
    }

    /// Asserts every structural invariant of the tree.
    ///
    /// Panics if a key is out of order, a cached height is stale, a node
    /// violates the AVL condition or the entry count is off.
    #[cfg(any(test, feature = "consistency_check"))]
    pub fn check_consistency(&self) {
        // Returns measured height and number of nodes
        fn check<K: Ord, V>(
            link: &Link<K, V>,
            lower: Option<&K>,
            upper: Option<&K>,
        ) -> (usize, usize) {
            let Some(node) = link.as_deref() else {
                return (0, 0);
            };

            // Check ordering against all ancestors
            if let Some(lower) = lower {
                assert!(node.key > *lower);
            }
            if let Some(upper) = upper {
                assert!(node.key < *upper);
            }

            let (left_height, left_count) = check(&node.left, lower, Some(&node.key));
            let (right_height, right_count) = check(&node.right, Some(&node.key), upper);

            // Check height
            assert_eq!(node.height, left_height.max(right_height) + 1);

            // Check AVL condition (nearly balance)
            assert!(left_height <= right_height + 1);
            assert!(right_height <= left_height + 1);

            (node.height, left_count + right_count + 1)
        }

        let (_, num_nodes) = check(&self.root, None, None);

        // Check number of nodes
        assert_eq!(num_nodes, self.num_nodes);
        assert!(self.is_balanced());
        assert!(self.lowest_unbalanced_key().is_none());
    }
}

impl<K: Ord, V> Default for BalancedTree<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord + fmt::Debug, V: fmt::Debug> fmt::Debug for BalancedTree<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Ord, V> Extend<(K, V)> for BalancedTree<K, V> {
    /// Inserts every pair from `iter`.
    ///
    /// The first value seen for a key wins; later duplicates are dropped.
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            // Duplicates are already logged by insert
            let _ = self.insert(key, value);
        }
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for BalancedTree<K, V> {
    /// Builds a tree from key-value pairs.
    ///
    /// The first value seen for a key wins; later duplicates are dropped.
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

impl<'a, K: Ord, V> IntoIterator for &'a BalancedTree<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K: Ord, V> IntoIterator for &'a mut BalancedTree<K, V> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<K: Ord, V> IntoIterator for BalancedTree<K, V> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self.root, self.num_nodes)
    }
}
