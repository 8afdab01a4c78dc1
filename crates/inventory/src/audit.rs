//! Audit rotation ring.
//!
//! Circular doubly-linked list over every stored SKU, kept in a dense arena
//! (`Vec` + SKU → slot map) so links are plain indices. The cursor marks the
//! SKU pending inspection and survives across requests.

use std::collections::{HashMap, HashSet};

use pirs_core::Sku;

#[derive(Debug, Clone)]
struct RingNode {
    sku: Sku,
    prev: usize,
    next: usize,
}

#[derive(Debug, Default)]
pub struct AuditRing {
    nodes: Vec<RingNode>,
    index: HashMap<Sku, usize>,
    cursor: Option<usize>,
}

impl AuditRing {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, sku: &Sku) -> bool {
        self.index.contains_key(sku)
    }

    /// The SKU pending inspection (`None` when the ring is empty).
    pub fn cursor(&self) -> Option<&Sku> {
        self.cursor.map(|c| &self.nodes[c].sku)
    }

    /// Link `sku` in directly after the cursor: it comes up right after the
    /// currently pending item, never ahead of it. The first SKU becomes the cursor.
    pub fn insert_after_cursor(&mut self, sku: Sku) -> bool {
        if self.index.contains_key(&sku) {
            return false;
        }
        let i = self.nodes.len();
        match self.cursor {
            None => {
                self.nodes.push(RingNode { sku: sku.clone(), prev: i, next: i });
                self.cursor = Some(i);
            }
            Some(c) => {
                let after = self.nodes[c].next;
                self.nodes.push(RingNode { sku: sku.clone(), prev: c, next: after });
                self.nodes[c].next = i;
                self.nodes[after].prev = i;
            }
        }
        self.index.insert(sku, i);
        true
    }

    /// Unlink `sku`. If it was the cursor, the cursor moves on to the next SKU
    /// (or becomes empty with the ring).
    pub fn remove(&mut self, sku: &Sku) -> bool {
        let Some(i) = self.index.remove(sku) else {
            return false;
        };

        if self.nodes.len() == 1 {
            self.nodes.clear();
            self.cursor = None;
            return true;
        }

        let (prev, next) = (self.nodes[i].prev, self.nodes[i].next);
        self.nodes[prev].next = next;
        self.nodes[next].prev = prev;
        if self.cursor == Some(i) {
            self.cursor = Some(next);
        }

        // Keep the arena dense: the last node moves into the freed slot.
        let last = self.nodes.len() - 1;
        self.nodes.swap_remove(i);
        if i != last {
            let (p, n) = (self.nodes[i].prev, self.nodes[i].next);
            if p == last {
                self.nodes[i].prev = i;
            } else {
                self.nodes[p].next = i;
            }
            if n == last {
                self.nodes[i].next = i;
            } else {
                self.nodes[n].prev = i;
            }
            if let Some(slot) = self.index.get_mut(&self.nodes[i].sku) {
                *slot = i;
            }
            if self.cursor == Some(last) {
                self.cursor = Some(i);
            }
        }
        true
    }

    /// Move the cursor one position forward; returns the new pending SKU.
    pub fn advance(&mut self) -> Option<&Sku> {
        let c = self.cursor?;
        let next = self.nodes[c].next;
        self.cursor = Some(next);
        Some(&self.nodes[next].sku)
    }

    /// The next `k` SKUs starting at the cursor, without moving it.
    ///
    /// The first element is the pending item. `k` is capped at the ring size so
    /// no SKU appears twice in one window.
    pub fn next_n(&self, k: usize) -> Vec<Sku> {
        let Some(mut c) = self.cursor else {
            return Vec::new();
        };
        let take = k.min(self.nodes.len());
        let mut out = Vec::with_capacity(take);
        for _ in 0..take {
            out.push(self.nodes[c].sku.clone());
            c = self.nodes[c].next;
        }
        out
    }

    /// Verify the cycle: following `next` from the cursor returns after exactly
    /// `len()` steps, visiting each SKU once, with `prev` links mirroring `next`.
    pub fn check_invariants(&self) -> Result<(), String> {
        if self.index.len() != self.nodes.len() {
            return Err(format!(
                "audit ring has {} nodes but {} index entries",
                self.nodes.len(),
                self.index.len()
            ));
        }
        let Some(start) = self.cursor else {
            return if self.nodes.is_empty() {
                Ok(())
            } else {
                Err("audit ring has nodes but no cursor".to_string())
            };
        };

        let mut seen = HashSet::with_capacity(self.nodes.len());
        let mut c = start;
        for _ in 0..self.nodes.len() {
            let node = self
                .nodes
                .get(c)
                .ok_or_else(|| format!("audit ring link {c} out of bounds"))?;
            if self.index.get(&node.sku) != Some(&c) {
                return Err(format!("audit ring index stale for {}", node.sku));
            }
            if self.nodes.get(node.next).map(|n| n.prev) != Some(c) {
                return Err(format!("audit ring back-link broken after {}", node.sku));
            }
            if !seen.insert(c) {
                return Err(format!("audit ring revisits {} before closing", node.sku));
            }
            c = node.next;
        }
        if c != start {
            return Err("audit ring does not close after len() steps".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sku(s: &str) -> Sku {
        Sku::parse(s).unwrap()
    }

    fn names(v: Vec<Sku>) -> Vec<String> {
        v.into_iter().map(String::from).collect()
    }

    #[test]
    fn empty_ring_has_no_cursor() {
        let mut ring = AuditRing::new();
        assert!(ring.cursor().is_none());
        assert!(ring.advance().is_none());
        assert!(ring.next_n(5).is_empty());
    }

    #[test]
    fn new_skus_join_right_behind_the_cursor() {
        let mut ring = AuditRing::new();
        ring.insert_after_cursor(sku("A"));
        ring.insert_after_cursor(sku("B"));
        ring.insert_after_cursor(sku("C"));
        // A stays pending; C was linked after A most recently.
        assert_eq!(names(ring.next_n(3)), vec!["A", "C", "B"]);
        ring.check_invariants().unwrap();
    }

    #[test]
    fn next_n_does_not_move_cursor_and_caps_at_size() {
        let mut ring = AuditRing::new();
        for s in ["A", "B"] {
            ring.insert_after_cursor(sku(s));
        }
        assert_eq!(ring.next_n(5).len(), 2);
        assert_eq!(ring.next_n(1), vec![sku("A")]);
        assert_eq!(ring.cursor(), Some(&sku("A")));
    }

    #[test]
    fn advance_wraps_back_to_start() {
        let mut ring = AuditRing::new();
        for s in ["A", "B", "C", "D"] {
            ring.insert_after_cursor(sku(s));
        }
        let start = ring.cursor().cloned();
        for _ in 0..ring.len() {
            ring.advance();
        }
        assert_eq!(ring.cursor().cloned(), start);
    }

    #[test]
    fn removing_cursor_moves_to_next() {
        let mut ring = AuditRing::new();
        for s in ["A", "B", "C"] {
            ring.insert_after_cursor(sku(s));
        }
        // Order from cursor: A, C, B
        assert!(ring.remove(&sku("A")));
        assert_eq!(ring.cursor(), Some(&sku("C")));
        ring.check_invariants().unwrap();

        assert!(ring.remove(&sku("C")));
        assert!(ring.remove(&sku("B")));
        assert!(ring.cursor().is_none());
        assert!(!ring.remove(&sku("B")));
        ring.check_invariants().unwrap();
    }

    #[test]
    fn removal_compacts_arena_without_breaking_links() {
        let mut ring = AuditRing::new();
        for i in 0..20 {
            ring.insert_after_cursor(sku(&format!("S{i:02}")));
        }
        for i in (0..20).step_by(3) {
            assert!(ring.remove(&sku(&format!("S{i:02}"))));
            ring.check_invariants().unwrap();
        }
        let window = ring.next_n(ring.len());
        let unique: HashSet<_> = window.iter().collect();
        assert_eq!(unique.len(), ring.len());
    }
}
