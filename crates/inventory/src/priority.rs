//! Indexed min-heap over `days_remaining`.
//!
//! A SKU → slot map makes every entry addressable, so a stock change or a
//! deletion is O(log n) instead of a linear scan plus re-heapify.

use std::collections::HashMap;

use pirs_core::{DomainError, DomainResult, Sku};

use crate::forecast::DaysRemaining;
use crate::product::UrgencyKey;

#[derive(Debug, Default)]
pub struct PriorityHeap {
    slots: Vec<UrgencyKey>,
    positions: HashMap<Sku, usize>,
}

impl PriorityHeap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn contains(&self, sku: &Sku) -> bool {
        self.positions.contains_key(sku)
    }

    /// Current key of `sku`, if present.
    pub fn get(&self, sku: &Sku) -> Option<DaysRemaining> {
        self.positions
            .get(sku)
            .map(|&i| self.slots[i].days_remaining)
    }

    /// The most urgent entry (ties broken by smallest SKU).
    ///
    /// `None` means "nothing to alert on", not a failure.
    pub fn peek_min(&self) -> Option<&UrgencyKey> {
        self.slots.first()
    }

    /// Insert a new entry. Returns `false` if the SKU is already present.
    pub fn insert(&mut self, key: UrgencyKey) -> bool {
        if self.positions.contains_key(&key.sku) {
            return false;
        }
        let i = self.slots.len();
        self.positions.insert(key.sku.clone(), i);
        self.slots.push(key);
        self.sift_up(i);
        true
    }

    /// Re-key `sku`, sifting in whichever direction the change requires.
    ///
    /// Returns the previous key, or `None` if the SKU is not in the heap.
    pub fn update_key(&mut self, sku: &Sku, days: DaysRemaining) -> Option<DaysRemaining> {
        let i = *self.positions.get(sku)?;
        let old = self.slots[i].days_remaining;
        self.slots[i].days_remaining = days;
        if days < old {
            self.sift_up(i);
        } else if days > old {
            self.sift_down(i);
        }
        Some(old)
    }

    /// Lower the key of `sku` (stock fell or demand rose).
    pub fn decrease_key(&mut self, sku: &Sku, days: DaysRemaining) -> DomainResult<()> {
        let current = self
            .get(sku)
            .ok_or_else(|| DomainError::not_found(format!("sku {sku} not in priority heap")))?;
        if days > current {
            return Err(DomainError::invalid(format!(
                "decrease_key: {days} is above current {current}"
            )));
        }
        self.update_key(sku, days);
        Ok(())
    }

    /// Raise the key of `sku` (restock or demand dropped).
    pub fn increase_key(&mut self, sku: &Sku, days: DaysRemaining) -> DomainResult<()> {
        let current = self
            .get(sku)
            .ok_or_else(|| DomainError::not_found(format!("sku {sku} not in priority heap")))?;
        if days < current {
            return Err(DomainError::invalid(format!(
                "increase_key: {days} is below current {current}"
            )));
        }
        self.update_key(sku, days);
        Ok(())
    }

    /// Remove `sku` from the heap, returning its key.
    pub fn remove(&mut self, sku: &Sku) -> Option<UrgencyKey> {
        let i = self.positions.remove(sku)?;
        let last = self.slots.len() - 1;
        if i != last {
            self.swap(i, last);
        }
        let removed = self.slots.pop();
        if i < self.slots.len() {
            self.sift_down(i);
            self.sift_up(i);
        }
        removed
    }

    /// SKUs currently held, in slot order (unsorted).
    pub fn skus(&self) -> impl Iterator<Item = &Sku> {
        self.slots.iter().map(|k| &k.sku)
    }

    /// Verify heap order and that the position map points at the right slots.
    pub fn check_invariants(&self) -> Result<(), String> {
        if self.positions.len() != self.slots.len() {
            return Err(format!(
                "priority heap has {} slots but {} positions",
                self.slots.len(),
                self.positions.len()
            ));
        }
        for (i, key) in self.slots.iter().enumerate() {
            if self.positions.get(&key.sku) != Some(&i) {
                return Err(format!("priority heap position map stale for {}", key.sku));
            }
            if i > 0 {
                let parent = (i - 1) / 2;
                if self.slots[parent] > *key {
                    return Err(format!("priority heap order violated at {}", key.sku));
                }
            }
        }
        Ok(())
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.slots.swap(a, b);
        if let Some(p) = self.positions.get_mut(&self.slots[a].sku) {
            *p = a;
        }
        if let Some(p) = self.positions.get_mut(&self.slots[b].sku) {
            *p = b;
        }
    }

    fn sift_up(&mut self, mut i: usize) {
        while i > 0 {
            let parent = (i - 1) / 2;
            if self.slots[i] >= self.slots[parent] {
                break;
            }
            self.swap(i, parent);
            i = parent;
        }
    }

    fn sift_down(&mut self, mut i: usize) {
        let n = self.slots.len();
        loop {
            let left = 2 * i + 1;
            let right = left + 1;
            let mut smallest = i;
            if left < n && self.slots[left] < self.slots[smallest] {
                smallest = left;
            }
            if right < n && self.slots[right] < self.slots[smallest] {
                smallest = right;
            }
            if smallest == i {
                break;
            }
            self.swap(i, smallest);
            i = smallest;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn days(v: f64) -> DaysRemaining {
        DaysRemaining::new(v).unwrap()
    }

    fn key(d: f64, sku: &str) -> UrgencyKey {
        UrgencyKey {
            days_remaining: days(d),
            sku: Sku::parse(sku).unwrap(),
        }
    }

    fn sku(s: &str) -> Sku {
        Sku::parse(s).unwrap()
    }

    #[test]
    fn empty_heap_has_no_alert() {
        let heap = PriorityHeap::new();
        assert!(heap.peek_min().is_none());
    }

    #[test]
    fn peek_min_breaks_ties_by_sku() {
        let mut heap = PriorityHeap::new();
        heap.insert(key(3.0, "B"));
        heap.insert(key(3.0, "A"));
        heap.insert(key(8.0, "C"));
        assert_eq!(heap.peek_min().unwrap().sku.as_str(), "A");
    }

    #[test]
    fn update_key_moves_in_both_directions() {
        let mut heap = PriorityHeap::new();
        for (d, s) in [(5.0, "A"), (6.0, "B"), (7.0, "C"), (8.0, "D")] {
            heap.insert(key(d, s));
        }
        assert_eq!(heap.update_key(&sku("D"), days(1.0)), Some(days(8.0)));
        assert_eq!(heap.peek_min().unwrap().sku.as_str(), "D");

        heap.update_key(&sku("D"), days(100.0));
        assert_eq!(heap.peek_min().unwrap().sku.as_str(), "A");
        heap.check_invariants().unwrap();

        assert!(heap.update_key(&sku("nope"), days(1.0)).is_none());
    }

    #[test]
    fn decrease_and_increase_key_validate_direction() {
        let mut heap = PriorityHeap::new();
        heap.insert(key(5.0, "A"));
        assert!(heap.decrease_key(&sku("A"), days(6.0)).is_err());
        heap.decrease_key(&sku("A"), days(2.0)).unwrap();
        assert!(heap.increase_key(&sku("A"), days(1.0)).is_err());
        heap.increase_key(&sku("A"), days(4.0)).unwrap();
        assert_eq!(heap.get(&sku("A")), Some(days(4.0)));
        assert!(matches!(
            heap.decrease_key(&sku("Z"), days(1.0)),
            Err(DomainError::NotFound(_))
        ));
    }

    #[test]
    fn remove_arbitrary_entries() {
        let mut heap = PriorityHeap::new();
        for i in 0..50 {
            heap.insert(key(((i * 7) % 13) as f64, &format!("S{i:02}")));
        }
        for i in (0..50).step_by(4) {
            assert!(heap.remove(&sku(&format!("S{i:02}"))).is_some());
            heap.check_invariants().unwrap();
        }
        assert!(heap.remove(&sku("S00")).is_none());
        assert_eq!(heap.len(), 50 - (0..50).step_by(4).count());
    }
}
