use std::sync::Arc;

use chrono::Utc;
use tracing::{info, instrument, warn};

use storefront_cart::CartEntry;
use storefront_core::{ItemId, UserId};
use storefront_inventory::Item;
use storefront_sales::{Order, plan_settlement};

use crate::config::StorefrontConfig;
use crate::locks::ItemLocks;
use crate::store::StoreHandles;

use super::{ServiceError, ServiceResult, not_found_on_missing};

/// Order settlement: turns a whole cart into an order and decrements stock.
#[derive(Debug, Clone)]
pub struct OrderService {
    stores: StoreHandles,
    locks: Arc<ItemLocks>,
    clear_cart_on_order: bool,
}

impl OrderService {
    pub fn new(stores: StoreHandles, locks: Arc<ItemLocks>, config: &StorefrontConfig) -> Self {
        Self {
            stores,
            locks,
            clear_cart_on_order: config.clear_cart_on_order,
        }
    }

    /// Settle the user's cart.
    ///
    /// The order id is allocated first, so a settlement that fails still uses one
    /// up. Every item in the cart is then locked in ascending id order, its stock
    /// re-read, and every line validated before any stock is written; a short
    /// line fails the call with `InsufficientStock` and nothing is written. A
    /// storage failure during the writes can leave earlier lines decremented with
    /// no order recorded.
    #[instrument(skip(self), fields(user_id = %user_id), err)]
    pub fn place_order(&self, user_id: UserId) -> ServiceResult<Order> {
        let snapshot = self.stores.carts.list_for_user(user_id)?;
        let order_id = self.stores.orders.next_order_id()?;

        let item_ids: Vec<ItemId> = snapshot.iter().map(|e| e.item_id).collect();
        let slots = self.locks.slots(&item_ids)?;
        let _held = slots
            .iter()
            .map(|(_, slot)| ItemLocks::acquire(slot))
            .collect::<Result<Vec<_>, _>>()?;

        let lines = self.locked_lines(user_id, &slots)?;
        let settlement =
            plan_settlement(order_id, user_id, lines, Utc::now()).inspect_err(|e| {
                warn!(order_id = %order_id, error = %e, "settlement rejected");
            })?;

        for write in &settlement.stock_writes {
            self.stores
                .items
                .set_stock(write.item_id, write.new_stock)
                .map_err(not_found_on_missing)?;
        }

        let order = settlement.order;
        self.stores.orders.insert(order.clone())?;

        if self.clear_cart_on_order {
            for line in &order.lines {
                self.stores.carts.delete(user_id, line.item.id)?;
            }
        }

        info!(
            order_id = %order.id,
            lines = order.lines.len(),
            total_quantity = order.total_quantity(),
            "order placed"
        );
        Ok(order)
    }

    /// Re-read the cart under the held slots and pair each entry with the item's
    /// current state. Entries added after the snapshot for items we do not hold
    /// are left for a later order.
    fn locked_lines(
        &self,
        user_id: UserId,
        slots: &[(ItemId, Arc<std::sync::Mutex<()>>)],
    ) -> ServiceResult<Vec<(CartEntry, Item)>> {
        let mut lines = Vec::with_capacity(slots.len());
        for (item_id, _) in slots {
            let Some(entry) = self.stores.carts.get(user_id, *item_id)? else {
                continue;
            };
            let item = self
                .stores
                .items
                .get(*item_id)?
                .ok_or_else(|| ServiceError::not_found(format!("item {item_id}")))?;
            lines.push((entry, item));
        }
        Ok(lines)
    }

    /// Every order placed by the user, oldest first.
    pub fn list_orders(&self, user_id: UserId) -> ServiceResult<Vec<Order>> {
        Ok(self.stores.orders.list_for_user(user_id)?)
    }
}
