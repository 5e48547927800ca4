use std::sync::Arc;

use tracing::{info, instrument};

use storefront_core::{ItemId, SellerId};
use storefront_inventory::{Item, ItemInput, Seller};

use crate::locks::ItemLocks;
use crate::store::{ItemFilter, Page, StoreHandles};

use super::{ServiceError, ServiceResult, conflict_on_duplicate, not_found_on_missing};

/// Authoritative item stock and seller records.
#[derive(Debug, Clone)]
pub struct InventoryService {
    stores: StoreHandles,
    locks: Arc<ItemLocks>,
}

impl InventoryService {
    pub fn new(stores: StoreHandles, locks: Arc<ItemLocks>) -> Self {
        Self { stores, locks }
    }

    /// Create an item. Negative stock is a validation failure, a taken id a conflict.
    #[instrument(skip(self, input), fields(item_id = %input.item_id), err)]
    pub fn add_item(&self, input: &ItemInput) -> ServiceResult<Item> {
        let item = Item::create(input)?;
        self.stores
            .items
            .insert(item.clone())
            .map_err(conflict_on_duplicate)?;
        info!(in_stock = item.in_stock, "item added");
        Ok(item)
    }

    /// Overwrite the stock count. No floor check.
    #[instrument(skip(self), err)]
    pub fn adjust_stock(&self, item_id: ItemId, quantity: i64) -> ServiceResult<Item> {
        let slot = self.locks.slot(item_id)?;
        let _held = ItemLocks::acquire(&slot)?;
        self.stores
            .items
            .set_stock(item_id, quantity)
            .map_err(not_found_on_missing)
    }

    pub fn get_item(&self, item_id: ItemId) -> ServiceResult<Item> {
        self.stores
            .items
            .get(item_id)?
            .ok_or_else(|| ServiceError::not_found(format!("item {item_id}")))
    }

    /// Items offered by `seller_id`, ordered by id. No limit means all of them.
    pub fn items_by_seller(
        &self,
        seller_id: SellerId,
        limit: Option<usize>,
        offset: Option<usize>,
    ) -> ServiceResult<Vec<Item>> {
        let page = Page::new(limit, offset.unwrap_or(0));
        Ok(self.stores.items.find(ItemFilter::Seller(seller_id), page)?)
    }

    #[instrument(skip(self, seller), fields(seller_id = %seller.id), err)]
    pub fn add_seller(&self, seller: Seller) -> ServiceResult<Seller> {
        self.stores
            .sellers
            .insert(seller.clone())
            .map_err(conflict_on_duplicate)?;
        Ok(seller)
    }

    pub fn lookup_seller(&self, seller_id: SellerId) -> ServiceResult<Option<Seller>> {
        Ok(self.stores.sellers.get(seller_id)?)
    }

    /// The seller of an existing item; `None` if that seller was never registered.
    pub fn item_seller(&self, item_id: ItemId) -> ServiceResult<Option<Seller>> {
        let item = self.get_item(item_id)?;
        self.lookup_seller(item.seller_id)
    }
}
