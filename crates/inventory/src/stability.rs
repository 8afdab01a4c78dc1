//! Stability index: an AVL tree ordered by `(days_remaining, sku)`.
//!
//! Keys hold only the SKU and its current forecast; the product record itself
//! stays in the store. Height is bounded by ~1.44·log2(n) whatever order
//! products arrive in (SKUs from the catalog are usually monotonic).

use std::cmp::Ordering;
use std::iter::FusedIterator;

use crate::product::UrgencyKey;

type Link = Option<Box<Node>>;

#[derive(Debug)]
struct Node {
    key: UrgencyKey,
    height: i32,
    left: Link,
    right: Link,
}

impl Node {
    fn leaf(key: UrgencyKey) -> Box<Self> {
        Box::new(Self {
            key,
            height: 1,
            left: None,
            right: None,
        })
    }

    fn update_height(&mut self) {
        self.height = 1 + height(&self.left).max(height(&self.right));
    }

    fn balance_factor(&self) -> i32 {
        height(&self.left) - height(&self.right)
    }
}

fn height(link: &Link) -> i32 {
    link.as_ref().map_or(0, |n| n.height)
}

fn rotate_right(mut node: Box<Node>) -> Box<Node> {
    let Some(mut pivot) = node.left.take() else {
        return node;
    };
    node.left = pivot.right.take();
    node.update_height();
    pivot.right = Some(node);
    pivot.update_height();
    pivot
}

fn rotate_left(mut node: Box<Node>) -> Box<Node> {
    let Some(mut pivot) = node.right.take() else {
        return node;
    };
    node.right = pivot.left.take();
    node.update_height();
    pivot.left = Some(node);
    pivot.update_height();
    pivot
}

fn rebalance(mut node: Box<Node>) -> Box<Node> {
    node.update_height();
    let bf = node.balance_factor();

    if bf > 1 {
        if node.left.as_ref().map_or(0, |l| l.balance_factor()) < 0 {
            node.left = node.left.take().map(rotate_left);
        }
        return rotate_right(node);
    }
    if bf < -1 {
        if node.right.as_ref().map_or(0, |r| r.balance_factor()) > 0 {
            node.right = node.right.take().map(rotate_right);
        }
        return rotate_left(node);
    }
    node
}

fn insert_node(link: Link, key: UrgencyKey, inserted: &mut bool) -> Box<Node> {
    let Some(mut node) = link else {
        *inserted = true;
        return Node::leaf(key);
    };
    match key.cmp(&node.key) {
        Ordering::Less => node.left = Some(insert_node(node.left.take(), key, inserted)),
        Ordering::Greater => node.right = Some(insert_node(node.right.take(), key, inserted)),
        Ordering::Equal => return node,
    }
    rebalance(node)
}

fn remove_node(link: Link, key: &UrgencyKey, removed: &mut bool) -> Link {
    let mut node = link?;
    match key.cmp(&node.key) {
        Ordering::Less => node.left = remove_node(node.left.take(), key, removed),
        Ordering::Greater => node.right = remove_node(node.right.take(), key, removed),
        Ordering::Equal => {
            *removed = true;
            match (node.left.take(), node.right.take()) {
                (None, None) => return None,
                (Some(child), None) | (None, Some(child)) => return Some(child),
                (Some(left), Some(right)) => {
                    let (rest, successor) = take_min(right);
                    node.key = successor;
                    node.left = Some(left);
                    node.right = rest;
                }
            }
        }
    }
    Some(rebalance(node))
}

/// Detach the minimum key of a subtree, returning the rebalanced remainder.
fn take_min(mut node: Box<Node>) -> (Link, UrgencyKey) {
    match node.left.take() {
        None => {
            let Node { key, right, .. } = *node;
            (right, key)
        }
        Some(left) => {
            let (rest, min) = take_min(left);
            node.left = rest;
            (Some(rebalance(node)), min)
        }
    }
}

/// Balanced ordered index over `(days_remaining, sku)`.
#[derive(Debug, Default)]
pub struct StabilityIndex {
    root: Link,
    len: usize,
}

impl StabilityIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn height(&self) -> usize {
        height(&self.root) as usize
    }

    /// Insert a key. Returns `false` if it was already present.
    pub fn insert(&mut self, key: UrgencyKey) -> bool {
        let mut inserted = false;
        self.root = Some(insert_node(self.root.take(), key, &mut inserted));
        if inserted {
            self.len += 1;
        }
        inserted
    }

    /// Remove a key. Returns `false` if it was absent.
    pub fn remove(&mut self, key: &UrgencyKey) -> bool {
        let mut removed = false;
        self.root = remove_node(self.root.take(), key, &mut removed);
        if removed {
            self.len -= 1;
        }
        removed
    }

    /// Re-key an entry (remove + insert, so rotations keep the tree balanced).
    ///
    /// Returns `false` without inserting if `old` was not present.
    pub fn update_key(&mut self, old: &UrgencyKey, new: UrgencyKey) -> bool {
        if !self.remove(old) {
            return false;
        }
        self.insert(new)
    }

    pub fn contains(&self, key: &UrgencyKey) -> bool {
        let mut cur = self.root.as_deref();
        while let Some(node) = cur {
            cur = match key.cmp(&node.key) {
                Ordering::Less => node.left.as_deref(),
                Ordering::Greater => node.right.as_deref(),
                Ordering::Equal => return true,
            };
        }
        false
    }

    /// All keys, most urgent first.
    pub fn iter(&self) -> Ascending<'_> {
        Ascending::new(self.root.as_deref(), None)
    }

    /// Keys with `days_remaining < threshold`, ascending.
    ///
    /// Lazy: walks only the matching prefix of the tree and stops at the first
    /// key at or above the threshold. Calling it again restarts from the top.
    pub fn range_below(&self, threshold: f64) -> Ascending<'_> {
        Ascending::new(self.root.as_deref(), Some(threshold))
    }

    /// Structural self-check: ordering, cached heights, AVL balance, length.
    pub fn check_invariants(&self) -> Result<(), String> {
        fn walk<'a>(
            link: &'a Link,
            prev: &mut Option<&'a UrgencyKey>,
            count: &mut usize,
        ) -> Result<i32, String> {
            let Some(node) = link else {
                return Ok(0);
            };
            let lh = walk(&node.left, prev, count)?;
            if let Some(p) = prev {
                if *p >= &node.key {
                    return Err(format!("stability index out of order at {}", node.key.sku));
                }
            }
            *prev = Some(&node.key);
            *count += 1;
            let rh = walk(&node.right, prev, count)?;

            if (lh - rh).abs() > 1 {
                return Err(format!("stability index unbalanced at {}", node.key.sku));
            }
            let h = 1 + lh.max(rh);
            if h != node.height {
                return Err(format!("stale height cached at {}", node.key.sku));
            }
            Ok(h)
        }

        let mut prev = None;
        let mut count = 0;
        walk(&self.root, &mut prev, &mut count)?;
        if count != self.len {
            return Err(format!(
                "stability index length {} but {} nodes reachable",
                self.len, count
            ));
        }
        Ok(())
    }
}

/// In-order iterator with an optional exclusive upper bound on `days_remaining`.
#[derive(Debug, Clone)]
pub struct Ascending<'a> {
    stack: Vec<&'a Node>,
    below: Option<f64>,
}

impl<'a> Ascending<'a> {
    fn new(root: Option<&'a Node>, below: Option<f64>) -> Self {
        let mut it = Self {
            stack: Vec::new(),
            below,
        };
        it.push_left(root);
        it
    }

    fn push_left(&mut self, mut link: Option<&'a Node>) {
        while let Some(node) = link {
            self.stack.push(node);
            link = node.left.as_deref();
        }
    }
}

impl<'a> Iterator for Ascending<'a> {
    type Item = &'a UrgencyKey;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        if let Some(threshold) = self.below {
            if !node.key.days_remaining.is_below(threshold) {
                self.stack.clear();
                return None;
            }
        }
        self.push_left(node.right.as_deref());
        Some(&node.key)
    }
}

impl FusedIterator for Ascending<'_> {}
