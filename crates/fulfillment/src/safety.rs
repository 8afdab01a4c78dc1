//! Lot safety gate.
//!
//! Holds the lots that must not ship (recalled or expired). Lookups are O(1);
//! the pipeline consults the gate when an order is enqueued and sweeps the
//! queue when a lot is newly blocked.

use std::collections::HashSet;

use pirs_core::LotId;

#[derive(Debug, Clone, Default)]
pub struct SafetyGate {
    blocked: HashSet<LotId>,
}

impl SafetyGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a lot to the block list. Returns `false` if it was already blocked.
    pub fn block_lot(&mut self, lot: LotId) -> bool {
        self.blocked.insert(lot)
    }

    pub fn is_lot_safe(&self, lot: &LotId) -> bool {
        !self.blocked.contains(lot)
    }

    pub fn len(&self) -> usize {
        self.blocked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocked.is_empty()
    }

    /// Blocked lots, sorted.
    pub fn blocked_lots(&self) -> Vec<LotId> {
        let mut lots: Vec<LotId> = self.blocked.iter().cloned().collect();
        lots.sort();
        lots
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lot(s: &str) -> LotId {
        LotId::parse(s).unwrap()
    }

    #[test]
    fn unknown_lots_are_safe() {
        let gate = SafetyGate::new();
        assert!(gate.is_lot_safe(&lot("LOT-001")));
        assert!(gate.is_empty());
    }

    #[test]
    fn blocked_lots_are_unsafe_and_listed_once() {
        let mut gate = SafetyGate::new();
        assert!(gate.block_lot(lot("LOT-EXP-202X")));
        assert!(!gate.block_lot(lot("LOT-EXP-202X")));
        assert!(gate.block_lot(lot("LOT-A")));

        assert!(!gate.is_lot_safe(&lot("LOT-EXP-202X")));
        assert!(gate.is_lot_safe(&lot("LOT-B")));
        assert_eq!(gate.blocked_lots(), vec![lot("LOT-A"), lot("LOT-EXP-202X")]);
    }
}
