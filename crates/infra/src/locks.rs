//! Per-item mutual exclusion.
//!
//! Every stock check and the write it guards run while holding the item's slot.
//! Code that needs several items takes them through [`ItemLocks::slots`], which
//! hands them out in ascending id order so two settlements can never wait on
//! each other.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use storefront_core::ItemId;

use crate::store::StoreError;

/// One exclusion slot per item id, created lazily and reused for the lifetime of
/// the registry.
#[derive(Debug, Default)]
pub struct ItemLocks {
    slots: Mutex<HashMap<ItemId, Arc<Mutex<()>>>>,
}

impl ItemLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// The slot for `item_id`; repeated lookups return the same slot.
    pub fn slot(&self, item_id: ItemId) -> Result<Arc<Mutex<()>>, StoreError> {
        let mut slots = self
            .slots
            .lock()
            .map_err(|e| StoreError::Poisoned(e.to_string()))?;
        Ok(slots
            .entry(item_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone())
    }

    /// Slots for several items, deduplicated and sorted by id. Acquire them in the
    /// returned order.
    pub fn slots(&self, item_ids: &[ItemId]) -> Result<Vec<(ItemId, Arc<Mutex<()>>)>, StoreError> {
        let mut ids = item_ids.to_vec();
        ids.sort_unstable();
        ids.dedup();
        ids.into_iter()
            .map(|id| self.slot(id).map(|slot| (id, slot)))
            .collect()
    }

    /// Block until `slot` is free.
    pub fn acquire(slot: &Mutex<()>) -> Result<MutexGuard<'_, ()>, StoreError> {
        slot.lock().map_err(|e| StoreError::Poisoned(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_item_shares_a_slot() {
        let locks = ItemLocks::new();
        let a = locks.slot(ItemId::new(1)).unwrap();
        let b = locks.slot(ItemId::new(1)).unwrap();
        let c = locks.slot(ItemId::new(2)).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert!(!Arc::ptr_eq(&a, &c));
    }

    #[test]
    fn slots_come_back_sorted_and_deduplicated() {
        let locks = ItemLocks::new();
        let ids = [3, 1, 3, 2].map(ItemId::new);
        let slots = locks.slots(&ids).unwrap();
        let ordered: Vec<i64> = slots.iter().map(|(id, _)| id.get()).collect();
        assert_eq!(ordered, vec![1, 2, 3]);
    }

    #[test]
    fn held_slot_blocks_other_holders() {
        let locks = ItemLocks::new();
        let slot = locks.slot(ItemId::new(1)).unwrap();
        let guard = ItemLocks::acquire(&slot).unwrap();
        assert!(slot.try_lock().is_err());
        drop(guard);
        assert!(slot.try_lock().is_ok());
    }
}
