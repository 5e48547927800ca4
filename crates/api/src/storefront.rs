use std::sync::Arc;

use tracing::{debug, info};

use storefront_cart::CartItem;
use storefront_catalog::{CatalogInput, CatalogNode};
use storefront_core::{CatalogId, CommentId, ItemId, SellerId, UserId};
use storefront_infra::{
    CartService, CatalogService, FeedbackService, InventoryService, ItemLocks, OrderService,
    SeedReport, ServiceError, ServiceResult, StoreHandles, StorefrontConfig,
};
use storefront_inventory::{Comment, Item, ItemInput, Seller};
use storefront_sales::Order;

use crate::authz::require_user;
use crate::seed::SeedDocument;

/// Every operation the query layer can call.
///
/// Shopper operations take the caller as `Option<UserId>`; `None` is refused
/// with `Unauthorized`. Catalog and item reads, item administration and seeding
/// need no caller.
#[derive(Debug, Clone)]
pub struct Storefront {
    config: StorefrontConfig,
    catalog: CatalogService,
    inventory: InventoryService,
    cart: CartService,
    orders: OrderService,
    feedback: FeedbackService,
}

impl Storefront {
    pub fn new(stores: StoreHandles, config: StorefrontConfig) -> Self {
        let locks = Arc::new(ItemLocks::new());
        Self {
            catalog: CatalogService::new(stores.clone(), &config),
            inventory: InventoryService::new(stores.clone(), locks.clone()),
            cart: CartService::new(stores.clone(), locks.clone()),
            orders: OrderService::new(stores.clone(), locks.clone(), &config),
            feedback: FeedbackService::new(stores, locks),
            config,
        }
    }

    pub fn in_memory(config: StorefrontConfig) -> Self {
        Self::new(StoreHandles::in_memory(), config)
    }

    pub fn config(&self) -> &StorefrontConfig {
        &self.config
    }

    /// Apply a seed document: the catalog tree first, then the sellers. Sellers
    /// that already exist are skipped.
    pub fn seed(&self, document: &SeedDocument) -> ServiceResult<SeedReport> {
        let mut report = self.catalog.seed_tree(&document.catalog)?;
        for seller in &document.sellers {
            match self.inventory.add_seller(seller.clone()) {
                Ok(_) => report.sellers_inserted += 1,
                Err(ServiceError::Conflict(_)) => {
                    debug!(seller_id = %seller.id, "seller exists; skipped");
                    report.sellers_skipped += 1;
                }
                Err(e) => return Err(e),
            }
        }
        info!(
            sellers_inserted = report.sellers_inserted,
            sellers_skipped = report.sellers_skipped,
            "seed document applied"
        );
        Ok(report)
    }

    // -- catalog ----------------------------------------------------------

    pub fn add_catalog(&self, input: &CatalogInput) -> ServiceResult<CatalogNode> {
        self.catalog.add_catalog(input)
    }

    pub fn lookup_catalog(&self, id: CatalogId) -> ServiceResult<Option<CatalogNode>> {
        self.catalog.lookup_catalog(id)
    }

    pub fn catalog_children(&self, id: CatalogId) -> ServiceResult<Vec<CatalogNode>> {
        self.catalog.catalog_children(id)
    }

    pub fn catalog_parent(&self, id: CatalogId) -> ServiceResult<Option<CatalogNode>> {
        self.catalog.catalog_parent(id)
    }

    /// A missing or zero `limit` means the configured catalog page size.
    pub fn items_by_catalog(
        &self,
        catalog_id: CatalogId,
        limit: Option<usize>,
        offset: Option<usize>,
    ) -> ServiceResult<Vec<Item>> {
        self.catalog.items_by_catalog(catalog_id, limit, offset)
    }

    // -- items and sellers ------------------------------------------------

    pub fn items_by_seller(
        &self,
        seller_id: SellerId,
        limit: Option<usize>,
        offset: Option<usize>,
    ) -> ServiceResult<Vec<Item>> {
        self.inventory.items_by_seller(seller_id, limit, offset)
    }

    pub fn add_item(&self, input: &ItemInput) -> ServiceResult<Item> {
        self.inventory.add_item(input)
    }

    pub fn get_item(&self, item_id: ItemId) -> ServiceResult<Item> {
        self.inventory.get_item(item_id)
    }

    pub fn adjust_stock(&self, item_id: ItemId, quantity: i64) -> ServiceResult<Item> {
        self.inventory.adjust_stock(item_id, quantity)
    }

    pub fn add_seller(&self, seller: Seller) -> ServiceResult<Seller> {
        self.inventory.add_seller(seller)
    }

    pub fn lookup_seller(&self, seller_id: SellerId) -> ServiceResult<Option<Seller>> {
        self.inventory.lookup_seller(seller_id)
    }

    pub fn item_seller(&self, item_id: ItemId) -> ServiceResult<Option<Seller>> {
        self.inventory.item_seller(item_id)
    }

    // -- ratings and comments ---------------------------------------------

    pub fn rate_item(
        &self,
        user: Option<UserId>,
        item_id: ItemId,
        score: i32,
    ) -> ServiceResult<Item> {
        let user_id = require_user(user)?;
        self.feedback.rate_item(user_id, item_id, score)
    }

    pub fn item_average_rating(&self, item_id: ItemId) -> ServiceResult<f64> {
        self.feedback.average_rating(item_id)
    }

    pub fn add_comment(
        &self,
        user: Option<UserId>,
        item_id: ItemId,
        text: &str,
    ) -> ServiceResult<Comment> {
        let user_id = require_user(user)?;
        self.feedback.add_comment(user_id, item_id, text)
    }

    pub fn reply_to_comment(
        &self,
        user: Option<UserId>,
        parent_id: CommentId,
        text: &str,
    ) -> ServiceResult<Comment> {
        let user_id = require_user(user)?;
        self.feedback.reply_to_comment(user_id, parent_id, text)
    }

    pub fn item_comments(&self, item_id: ItemId) -> ServiceResult<Vec<Comment>> {
        self.feedback.item_comments(item_id)
    }

    pub fn comment_replies(&self, parent_id: CommentId) -> ServiceResult<Vec<Comment>> {
        self.feedback.comment_replies(parent_id)
    }

    // -- cart and orders --------------------------------------------------

    pub fn add_to_cart(
        &self,
        user: Option<UserId>,
        item_id: ItemId,
        quantity: i64,
    ) -> ServiceResult<()> {
        let user_id = require_user(user)?;
        self.cart.add_to_cart(user_id, item_id, quantity)
    }

    pub fn remove_from_cart(
        &self,
        user: Option<UserId>,
        item_id: ItemId,
        quantity: i64,
    ) -> ServiceResult<()> {
        let user_id = require_user(user)?;
        self.cart.remove_from_cart(user_id, item_id, quantity)
    }

    pub fn list_cart(&self, user: Option<UserId>) -> ServiceResult<Vec<CartItem>> {
        let user_id = require_user(user)?;
        self.cart.list_cart(user_id)
    }

    pub fn place_order(&self, user: Option<UserId>) -> ServiceResult<Order> {
        let user_id = require_user(user)?;
        self.orders.place_order(user_id)
    }

    pub fn list_orders(&self, user: Option<UserId>) -> ServiceResult<Vec<Order>> {
        let user_id = require_user(user)?;
        self.orders.list_orders(user_id)
    }
}
