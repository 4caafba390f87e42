//! Red-black tree over an index-addressed node arena.

use std::cmp::Ordering;

use crate::InvariantViolation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    Red,
    Black,
}

/// Arena slot index. Slot 0 is the nil sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct NodeId(usize);

impl NodeId {
    const NIL: Self = Self(0);

    fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
struct Node<K, V> {
    /// `None` for the sentinel and for recycled slots.
    entry: Option<(K, V)>,
    parent: NodeId,
    left: NodeId,
    right: NodeId,
    color: Color,
}

impl<K, V> Node<K, V> {
    fn sentinel() -> Self {
        Self {
            entry: None,
            parent: NodeId::NIL,
            left: NodeId::NIL,
            right: NodeId::NIL,
            color: Color::Black,
        }
    }
}

/// A red-black tree mapping keys to values, ordered by key.
///
/// Removed nodes are recycled through a free list, so a long-running index
/// under churn does not grow its arena beyond the peak number of entries.
#[derive(Debug, Clone)]
pub struct OrderedIndex<K, V> {
    nodes: Vec<Node<K, V>>,
    root: NodeId,
    free: Vec<NodeId>,
    len: usize,
}

impl<K, V> Default for OrderedIndex<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> OrderedIndex<K, V> {
    /// Create an empty index.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::sentinel()],
            root: NodeId::NIL,
            free: Vec::new(),
            len: 0,
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the index holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Remove every entry and release the arena.
    pub fn clear(&mut self) {
        self.nodes.truncate(1);
        self.nodes[0] = Node::sentinel();
        self.root = NodeId::NIL;
        self.free.clear();
        self.len = 0;
    }

    /// Iterate entries in ascending key order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        let mut iter = Iter {
            index: self,
            stack: Vec::new(),
            remaining: self.len,
        };
        iter.push_left_spine(self.root);
        iter
    }

    /// Entry with the smallest key.
    pub fn first(&self) -> Option<(&K, &V)> {
        if self.root == NodeId::NIL {
            return None;
        }
        self.entry(self.minimum(self.root))
    }

    /// Entry with the largest key.
    pub fn last(&self) -> Option<(&K, &V)> {
        let mut cur = self.root;
        if cur == NodeId::NIL {
            return None;
        }
        while self.right(cur) != NodeId::NIL {
            cur = self.right(cur);
        }
        self.entry(cur)
    }

    // ------------------------------------------------------------------
    // Link accessors
    // ------------------------------------------------------------------

    fn node(&self, id: NodeId) -> &Node<K, V> {
        &self.nodes[id.index()]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node<K, V> {
        &mut self.nodes[id.index()]
    }

    fn entry(&self, id: NodeId) -> Option<(&K, &V)> {
        self.node(id).entry.as_ref().map(|(k, v)| (k, v))
    }

    fn parent(&self, id: NodeId) -> NodeId {
        self.node(id).parent
    }

    fn left(&self, id: NodeId) -> NodeId {
        self.node(id).left
    }

    fn right(&self, id: NodeId) -> NodeId {
        self.node(id).right
    }

    fn color(&self, id: NodeId) -> Color {
        self.node(id).color
    }

    fn set_parent(&mut self, id: NodeId, parent: NodeId) {
        self.node_mut(id).parent = parent;
    }

    fn set_left(&mut self, id: NodeId, left: NodeId) {
        self.node_mut(id).left = left;
    }

    fn set_right(&mut self, id: NodeId, right: NodeId) {
        self.node_mut(id).right = right;
    }

    fn set_color(&mut self, id: NodeId, color: Color) {
        self.node_mut(id).color = color;
    }

    fn minimum(&self, mut id: NodeId) -> NodeId {
        while self.left(id) != NodeId::NIL {
            id = self.left(id);
        }
        id
    }

    // ------------------------------------------------------------------
    // Arena management
    // ------------------------------------------------------------------

    fn alloc(&mut self, key: K, value: V, parent: NodeId) -> NodeId {
        let node = Node {
            entry: Some((key, value)),
            parent,
            left: NodeId::NIL,
            right: NodeId::NIL,
            color: Color::Red,
        };

        match self.free.pop() {
            Some(id) => {
                self.nodes[id.index()] = node;
                id
            }
            None => {
                self.nodes.push(node);
                NodeId(self.nodes.len() - 1)
            }
        }
    }

    fn release(&mut self, id: NodeId) -> Option<V> {
        let node = self.node_mut(id);
        let entry = node.entry.take();
        node.parent = NodeId::NIL;
        node.left = NodeId::NIL;
        node.right = NodeId::NIL;
        node.color = Color::Black;
        self.free.push(id);
        entry.map(|(_, v)| v)
    }

    // ------------------------------------------------------------------
    // Rotations
    // ------------------------------------------------------------------

    fn rotate_left(&mut self, x: NodeId) {
        let y = self.right(x);
        let y_left = self.left(y);

        self.set_right(x, y_left);
        if y_left != NodeId::NIL {
            self.set_parent(y_left, x);
        }

        let xp = self.parent(x);
        self.set_parent(y, xp);
        if xp == NodeId::NIL {
            self.root = y;
        } else if x == self.left(xp) {
            self.set_left(xp, y);
        } else {
            self.set_right(xp, y);
        }

        self.set_left(y, x);
        self.set_parent(x, y);
    }

    fn rotate_right(&mut self, x: NodeId) {
        let y = self.left(x);
        let y_right = self.right(y);

        self.set_left(x, y_right);
        if y_right != NodeId::NIL {
            self.set_parent(y_right, x);
        }

        let xp = self.parent(x);
        self.set_parent(y, xp);
        if xp == NodeId::NIL {
            self.root = y;
        } else if x == self.right(xp) {
            self.set_right(xp, y);
        } else {
            self.set_left(xp, y);
        }

        self.set_right(y, x);
        self.set_parent(x, y);
    }

    // ------------------------------------------------------------------
    // Fix-up passes
    // ------------------------------------------------------------------

    fn insert_fixup(&mut self, mut z: NodeId) {
        while self.color(self.parent(z)) == Color::Red {
            let p = self.parent(z);
            let g = self.parent(p);

            if p == self.left(g) {
                let uncle = self.right(g);
                if self.color(uncle) == Color::Red {
                    self.set_color(p, Color::Black);
                    self.set_color(uncle, Color::Black);
                    self.set_color(g, Color::Red);
                    z = g;
                } else {
                    if z == self.right(p) {
                        z = p;
                        self.rotate_left(z);
                    }
                    let p = self.parent(z);
                    let g = self.parent(p);
                    self.set_color(p, Color::Black);
                    self.set_color(g, Color::Red);
                    self.rotate_right(g);
                }
            } else {
                let uncle = self.left(g);
                if self.color(uncle) == Color::Red {
                    self.set_color(p, Color::Black);
                    self.set_color(uncle, Color::Black);
                    self.set_color(g, Color::Red);
                    z = g;
                } else {
                    if z == self.left(p) {
                        z = p;
                        self.rotate_right(z);
                    }
                    let p = self.parent(z);
                    let g = self.parent(p);
                    self.set_color(p, Color::Black);
                    self.set_color(g, Color::Red);
                    self.rotate_left(g);
                }
            }
        }

        let root = self.root;
        self.set_color(root, Color::Black);
    }

    /// Replace the subtree rooted at `u` with the one rooted at `v`.
    ///
    /// Writes `v`'s parent link even when `v` is the sentinel; the delete
    /// fix-up walks up from there.
    fn transplant(&mut self, u: NodeId, v: NodeId) {
        let up = self.parent(u);
        if up == NodeId::NIL {
            self.root = v;
        } else if u == self.left(up) {
            self.set_left(up, v);
        } else {
            self.set_right(up, v);
        }
        self.set_parent(v, up);
    }

    fn delete_fixup(&mut self, mut x: NodeId) {
        while x != self.root && self.color(x) == Color::Black {
            let xp = self.parent(x);

            if x == self.left(xp) {
                let mut w = self.right(xp);
                if self.color(w) == Color::Red {
                    self.set_color(w, Color::Black);
                    self.set_color(xp, Color::Red);
                    self.rotate_left(xp);
                    w = self.right(self.parent(x));
                }

                if self.color(self.left(w)) == Color::Black
                    && self.color(self.right(w)) == Color::Black
                {
                    self.set_color(w, Color::Red);
                    x = self.parent(x);
                } else {
                    if self.color(self.right(w)) == Color::Black {
                        let wl = self.left(w);
                        self.set_color(wl, Color::Black);
                        self.set_color(w, Color::Red);
                        self.rotate_right(w);
                        w = self.right(self.parent(x));
                    }
                    let xp = self.parent(x);
                    self.set_color(w, self.color(xp));
                    self.set_color(xp, Color::Black);
                    let wr = self.right(w);
                    self.set_color(wr, Color::Black);
                    self.rotate_left(xp);
                    x = self.root;
                }
            } else {
                let mut w = self.left(xp);
                if self.color(w) == Color::Red {
                    self.set_color(w, Color::Black);
                    self.set_color(xp, Color::Red);
                    self.rotate_right(xp);
                    w = self.left(self.parent(x));
                }

                if self.color(self.right(w)) == Color::Black
                    && self.color(self.left(w)) == Color::Black
                {
                    self.set_color(w, Color::Red);
                    x = self.parent(x);
                } else {
                    if self.color(self.left(w)) == Color::Black {
                        let wr = self.right(w);
                        self.set_color(wr, Color::Black);
                        self.set_color(w, Color::Red);
                        self.rotate_left(w);
                        w = self.left(self.parent(x));
                    }
                    let xp = self.parent(x);
                    self.set_color(w, self.color(xp));
                    self.set_color(xp, Color::Black);
                    let wl = self.left(w);
                    self.set_color(wl, Color::Black);
                    self.rotate_right(xp);
                    x = self.root;
                }
            }
        }

        self.set_color(x, Color::Black);
    }
}

impl<K: Ord, V> OrderedIndex<K, V> {
    fn find(&self, key: &K) -> Option<NodeId> {
        let mut cur = self.root;
        while cur != NodeId::NIL {
            let (k, _) = self.node(cur).entry.as_ref()?;
            cur = match key.cmp(k) {
                Ordering::Less => self.left(cur),
                Ordering::Greater => self.right(cur),
                Ordering::Equal => return Some(cur),
            };
        }
        None
    }

    /// Insert `key -> value`.
    ///
    /// Returns the previous value if the key was already present; in that
    /// case only the payload changes and the tree shape is untouched.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let mut parent = NodeId::NIL;
        let mut cur = self.root;
        let mut go_left = false;

        while cur != NodeId::NIL {
            parent = cur;
            let ord = match self.node(cur).entry.as_ref() {
                Some((k, _)) => key.cmp(k),
                None => break,
            };
            match ord {
                Ordering::Less => {
                    go_left = true;
                    cur = self.left(cur);
                }
                Ordering::Greater => {
                    go_left = false;
                    cur = self.right(cur);
                }
                Ordering::Equal => {
                    return self
                        .node_mut(cur)
                        .entry
                        .as_mut()
                        .map(|(_, v)| std::mem::replace(v, value));
                }
            }
        }

        let z = self.alloc(key, value, parent);
        if parent == NodeId::NIL {
            self.root = z;
        } else if go_left {
            self.set_left(parent, z);
        } else {
            self.set_right(parent, z);
        }
        self.len += 1;

        self.insert_fixup(z);
        None
    }

    /// Look up the value stored under `key`.
    pub fn get(&self, key: &K) -> Option<&V> {
        let id = self.find(key)?;
        self.entry(id).map(|(_, v)| v)
    }

    /// Returns true if `key` is present.
    pub fn contains_key(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    /// Remove `key`, returning its value if it was present.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let z = self.find(key)?;

        let mut y_color = self.color(z);
        let x;

        if self.left(z) == NodeId::NIL {
            x = self.right(z);
            self.transplant(z, x);
        } else if self.right(z) == NodeId::NIL {
            x = self.left(z);
            self.transplant(z, x);
        } else {
            // Splice out the in-order successor and move it into z's place.
            let y = self.minimum(self.right(z));
            y_color = self.color(y);
            x = self.right(y);

            if self.parent(y) == z {
                self.set_parent(x, y);
            } else {
                self.transplant(y, x);
                let zr = self.right(z);
                self.set_right(y, zr);
                self.set_parent(zr, y);
            }

            self.transplant(z, y);
            let zl = self.left(z);
            self.set_left(y, zl);
            self.set_parent(zl, y);
            self.set_color(y, self.color(z));
        }

        if y_color == Color::Black {
            self.delete_fixup(x);
        }

        // The sentinel may have picked up a parent link during the fix-up.
        self.set_parent(NodeId::NIL, NodeId::NIL);
        self.len -= 1;
        self.release(z)
    }

    /// Snapshot of all entries in ascending key order.
    pub fn in_order(&self) -> Vec<(K, V)>
    where
        K: Clone,
        V: Clone,
    {
        self.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }

    /// Verify every red-black and search-tree invariant.
    ///
    /// Returns the black height of the tree (counting the nil leaves).
    /// Walks the whole tree; intended for tests and debugging.
    pub fn check_invariants(&self) -> Result<usize, InvariantViolation> {
        if self.color(NodeId::NIL) != Color::Black {
            return Err(InvariantViolation::RedSentinel);
        }
        if self.color(self.root) != Color::Black {
            return Err(InvariantViolation::RedRoot);
        }
        if self.root != NodeId::NIL && self.parent(self.root) != NodeId::NIL {
            return Err(InvariantViolation::ParentLink);
        }

        let (height, reachable) = self.check_subtree(self.root, None, None)?;
        if reachable != self.len {
            return Err(InvariantViolation::Length {
                recorded: self.len,
                reachable,
            });
        }
        Ok(height)
    }

    fn check_subtree(
        &self,
        id: NodeId,
        lower: Option<&K>,
        upper: Option<&K>,
    ) -> Result<(usize, usize), InvariantViolation> {
        if id == NodeId::NIL {
            return Ok((1, 0));
        }

        let Some((key, _)) = self.node(id).entry.as_ref() else {
            return Err(InvariantViolation::ParentLink);
        };
        if lower.is_some_and(|lo| key <= lo) || upper.is_some_and(|hi| key >= hi) {
            return Err(InvariantViolation::KeyOrder);
        }

        let (left, right) = (self.left(id), self.right(id));
        for child in [left, right] {
            if child != NodeId::NIL && self.parent(child) != id {
                return Err(InvariantViolation::ParentLink);
            }
        }

        let red = self.color(id) == Color::Red;
        if red && (self.color(left) == Color::Red || self.color(right) == Color::Red) {
            return Err(InvariantViolation::RedRed);
        }

        let (lh, lc) = self.check_subtree(left, lower, Some(key))?;
        let (rh, rc) = self.check_subtree(right, Some(key), upper)?;
        if lh != rh {
            return Err(InvariantViolation::BlackHeight {
                left: lh,
                right: rh,
            });
        }

        Ok((lh + usize::from(!red), lc + rc + 1))
    }
}

/// In-order iterator over an [`OrderedIndex`].
pub struct Iter<'a, K, V> {
    index: &'a OrderedIndex<K, V>,
    stack: Vec<NodeId>,
    remaining: usize,
}

impl<K, V> Iter<'_, K, V> {
    fn push_left_spine(&mut self, mut id: NodeId) {
        while id != NodeId::NIL {
            self.stack.push(id);
            id = self.index.left(id);
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        self.push_left_spine(self.index.right(id));
        self.remaining = self.remaining.saturating_sub(1);
        let index: &'a OrderedIndex<K, V> = self.index;
        index.entry(id)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<'a, K, V> IntoIterator for &'a OrderedIndex<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::BTreeMap;

    fn index_of(keys: &[i64]) -> OrderedIndex<i64, u64> {
        let mut index = OrderedIndex::new();
        for (seat, key) in keys.iter().enumerate() {
            index.insert(*key, seat as u64 + 1);
        }
        index
    }

    #[test]
    fn test_empty_index() {
        let index: OrderedIndex<i64, u64> = OrderedIndex::new();
        assert!(index.is_empty());
        assert_eq!(index.get(&1), None);
        assert_eq!(index.first(), None);
        assert_eq!(index.last(), None);
        assert_eq!(index.check_invariants(), Ok(1));
    }

    #[test]
    fn test_insert_and_get() {
        let index = index_of(&[50, 20, 70, 10, 30]);
        assert_eq!(index.len(), 5);
        assert_eq!(index.get(&20), Some(&2));
        assert_eq!(index.get(&30), Some(&5));
        assert_eq!(index.get(&40), None);
        index.check_invariants().unwrap();
    }

    #[test]
    fn test_insert_existing_key_replaces_value() {
        let mut index = index_of(&[1, 2, 3]);
        assert_eq!(index.insert(2, 99), Some(2));
        assert_eq!(index.len(), 3);
        assert_eq!(index.get(&2), Some(&99));
        index.check_invariants().unwrap();
    }

    #[test]
    fn test_in_order_is_sorted_by_key() {
        let index = index_of(&[5, 3, 8, 1, 4, 9, 7]);
        let keys: Vec<i64> = index.in_order().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec![1, 3, 4, 5, 7, 8, 9]);
        assert_eq!(index.iter().len(), 7);
    }

    #[test]
    fn test_ascending_inserts_stay_balanced() {
        let mut index = OrderedIndex::new();
        for key in 0..1024i64 {
            index.insert(key, key as u64);
        }
        let height = index.check_invariants().unwrap();
        // A red-black tree with n nodes has black height <= log2(n + 1) + 1.
        assert!(height <= 11, "black height {height}");
        assert_eq!(index.first(), Some((&0, &0)));
        assert_eq!(index.last(), Some((&1023, &1023)));
    }

    #[test]
    fn test_remove_leaf_inner_and_root() {
        let mut index = index_of(&[50, 20, 70, 10, 30, 60, 80]);

        assert_eq!(index.remove(&10), Some(4));
        index.check_invariants().unwrap();

        // Two children: spliced via successor.
        assert_eq!(index.remove(&20), Some(2));
        index.check_invariants().unwrap();

        assert_eq!(index.remove(&50), Some(1));
        index.check_invariants().unwrap();

        assert_eq!(index.remove(&50), None);
        let keys: Vec<i64> = index.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec![30, 60, 70, 80]);
    }

    #[test]
    fn test_remove_everything() {
        let keys: Vec<i64> = (0..200).map(|i| (i * 37) % 200).collect();
        let mut index = index_of(&keys);
        for key in keys.iter().rev() {
            assert!(index.remove(key).is_some());
            index.check_invariants().unwrap();
        }
        assert!(index.is_empty());
        assert_eq!(index.first(), None);
    }

    #[test]
    fn test_released_slots_are_reused() {
        let mut index = index_of(&[1, 2, 3, 4]);
        let arena = index.nodes.len();
        index.remove(&2);
        index.remove(&3);
        index.insert(10, 10);
        index.insert(11, 11);
        assert_eq!(index.nodes.len(), arena);
        index.check_invariants().unwrap();
    }

    #[test]
    fn test_clear() {
        let mut index = index_of(&[3, 1, 2]);
        index.clear();
        assert!(index.is_empty());
        assert_eq!(index.get(&1), None);
        index.insert(7, 7);
        assert_eq!(index.in_order(), vec![(7, 7)]);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Insert(i16, u16),
        Remove(i16),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (any::<i16>(), any::<u16>()).prop_map(|(k, v)| Op::Insert(k % 64, v)),
            any::<i16>().prop_map(|k| Op::Remove(k % 64)),
        ]
    }

    proptest! {
        #[test]
        fn prop_matches_btreemap(ops in prop::collection::vec(op(), 0..300)) {
            let mut index = OrderedIndex::new();
            let mut model = BTreeMap::new();

            for op in ops {
                match op {
                    Op::Insert(k, v) => {
                        prop_assert_eq!(index.insert(k, v), model.insert(k, v));
                    }
                    Op::Remove(k) => {
                        prop_assert_eq!(index.remove(&k), model.remove(&k));
                    }
                }
                prop_assert!(index.check_invariants().is_ok());
            }

            prop_assert_eq!(index.len(), model.len());
            let expected: Vec<(i16, u16)> = model.into_iter().collect();
            prop_assert_eq!(index.in_order(), expected);
        }
    }
}
