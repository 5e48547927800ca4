use std::sync::Arc;

use tracing::{debug, instrument, warn};

use storefront_cart::{CartChange, CartItem, decide_add, decide_remove};
use storefront_core::{DomainError, ItemId, UserId};

use crate::locks::ItemLocks;
use crate::store::StoreHandles;

use super::{ServiceError, ServiceResult};

/// Per (user, item) reservations against item stock.
#[derive(Debug, Clone)]
pub struct CartService {
    stores: StoreHandles,
    locks: Arc<ItemLocks>,
}

impl CartService {
    pub fn new(stores: StoreHandles, locks: Arc<ItemLocks>) -> Self {
        Self { stores, locks }
    }

    /// Reserve `quantity` more units. The stock read, the bound check and the
    /// entry write all happen under the item's slot.
    #[instrument(skip(self), fields(user_id = %user_id, item_id = %item_id), err)]
    pub fn add_to_cart(
        &self,
        user_id: UserId,
        item_id: ItemId,
        quantity: i64,
    ) -> ServiceResult<()> {
        let slot = self.locks.slot(item_id)?;
        let _held = ItemLocks::acquire(&slot)?;

        let item = self
            .stores
            .items
            .get(item_id)?
            .ok_or_else(|| ServiceError::not_found(format!("item {item_id}")))?;
        let existing = self.stores.carts.get(user_id, item_id)?;

        let change = decide_add(user_id, item_id, existing.as_ref(), item.in_stock, quantity)
            .inspect_err(|e| {
                if let DomainError::InsufficientStock { requested, available, .. } = e {
                    warn!(requested, available, "reservation rejected");
                }
            })?;
        self.apply(change)
    }

    /// Release `quantity` units; releasing everything (or more) clears the entry.
    #[instrument(skip(self), fields(user_id = %user_id, item_id = %item_id), err)]
    pub fn remove_from_cart(
        &self,
        user_id: UserId,
        item_id: ItemId,
        quantity: i64,
    ) -> ServiceResult<()> {
        let slot = self.locks.slot(item_id)?;
        let _held = ItemLocks::acquire(&slot)?;

        let existing = self.stores.carts.get(user_id, item_id)?;
        let change = decide_remove(user_id, item_id, existing.as_ref(), quantity)?;
        self.apply(change)
    }

    /// The user's cart, each line labelled against the stock left after its
    /// reservation. Lines whose item no longer resolves are left out.
    pub fn list_cart(&self, user_id: UserId) -> ServiceResult<Vec<CartItem>> {
        let entries = self.stores.carts.list_for_user(user_id)?;
        let mut lines = Vec::with_capacity(entries.len());
        for entry in &entries {
            match self.stores.items.get(entry.item_id)? {
                Some(item) => lines.push(CartItem::new(entry, item)),
                None => {
                    debug!(item_id = %entry.item_id, "cart entry references unknown item; skipped")
                }
            }
        }
        Ok(lines)
    }

    fn apply(&self, change: CartChange) -> ServiceResult<()> {
        match change {
            CartChange::Insert(entry) | CartChange::Update(entry) => {
                self.stores.carts.upsert(entry)?
            }
            CartChange::Delete { user_id, item_id } => self.stores.carts.delete(user_id, item_id)?,
        }
        Ok(())
    }
}
