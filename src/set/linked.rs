//! Unordered singly linked set
//!
//! Nodes live in an index arena; links are arena indices and deleted nodes
//! are threaded onto a free list that later inserts reuse. New keys go to
//! the head, so insertion order is the reverse of iteration order.

use super::Key;

#[derive(Debug, Clone, Copy)]
struct Node {
    key: Key,
    next: Option<usize>,
}

/// Linked set of unique keys with O(n) member, insert and delete
#[derive(Debug, Clone, Default)]
pub struct LinkedSet {
    nodes: Vec<Node>,
    head: Option<usize>,
    free: Option<usize>,
    len: usize,
}

impl LinkedSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty set with room for `capacity` nodes
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            ..Self::default()
        }
    }

    /// Number of keys in the set
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the set holds no keys
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// True iff a node with `key` is linked into the list
    pub fn member(&self, key: Key) -> bool {
        self.iter().any(|k| k == key)
    }

    /// Insert `key` at the head unless it is already present
    pub fn insert(&mut self, key: Key) -> bool {
        if self.member(key) {
            return false;
        }

        let node = Node {
            key,
            next: self.head,
        };
        let index = match self.free {
            Some(index) => {
                self.free = self.nodes[index].next;
                self.nodes[index] = node;
                index
            }
            None => {
                self.nodes.push(node);
                self.nodes.len() - 1
            }
        };

        self.head = Some(index);
        self.len += 1;
        true
    }

    /// Unlink the node holding `key`, if any
    pub fn delete(&mut self, key: Key) -> bool {
        let mut prev: Option<usize> = None;
        let mut cursor = self.head;

        while let Some(index) = cursor {
            let node = self.nodes[index];
            if node.key == key {
                match prev {
                    Some(prev) => self.nodes[prev].next = node.next,
                    None => self.head = node.next,
                }
                self.nodes[index].next = self.free;
                self.free = Some(index);
                self.len -= 1;
                return true;
            }
            prev = cursor;
            cursor = node.next;
        }

        false
    }

    /// Iterate keys from head to tail
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            nodes: &self.nodes,
            cursor: self.head,
        }
    }
}

/// Head-to-tail iterator over a [`LinkedSet`]
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    nodes: &'a [Node],
    cursor: Option<usize>,
}

impl Iterator for Iter<'_> {
    type Item = Key;

    fn next(&mut self) -> Option<Key> {
        let node = self.nodes.get(self.cursor?)?;
        self.cursor = node.next;
        Some(node.key)
    }
}

impl<'a> IntoIterator for &'a LinkedSet {
    type Item = Key;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}
