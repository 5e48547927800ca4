use std::sync::Arc;

use thiserror::Error;

use storefront_cart::CartEntry;
use storefront_catalog::CatalogNode;
use storefront_core::{CatalogId, CommentId, ItemId, OrderId, SellerId, UserId};
use storefront_inventory::{Comment, Item, Rating, Seller};
use storefront_sales::Order;

/// Persistence operation error.
///
/// These are **infrastructure errors** (storage availability, key collisions,
/// poisoned locks) as opposed to domain errors (validation, stock bounds).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("lock poisoned: {0}")]
    Poisoned(String),

    /// Insert hit an existing key.
    #[error("duplicate key: {0}")]
    Duplicate(String),

    /// Update targeted a key that does not exist.
    #[error("missing record: {0}")]
    Missing(String),
}

/// Item query filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemFilter {
    Catalog(CatalogId),
    Seller(SellerId),
}

/// Offset pagination; `limit: None` means unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Page {
    pub limit: Option<usize>,
    pub offset: usize,
}

impl Page {
    pub fn new(limit: Option<usize>, offset: usize) -> Self {
        Self { limit, offset }
    }
}

/// Catalog node persistence.
pub trait CatalogStore: Send + Sync {
    /// Insert a node; `Duplicate` if the id is taken.
    fn insert(&self, node: CatalogNode) -> Result<(), StoreError>;
    fn get(&self, id: CatalogId) -> Result<Option<CatalogNode>, StoreError>;
}

/// Item persistence; owns the authoritative stock count.
pub trait ItemStore: Send + Sync {
    /// Insert an item; `Duplicate` if the id is taken.
    fn insert(&self, item: Item) -> Result<(), StoreError>;
    fn get(&self, id: ItemId) -> Result<Option<Item>, StoreError>;
    /// Replace a stored item; `Missing` if absent.
    fn update(&self, item: Item) -> Result<(), StoreError>;
    /// Overwrite the stock count (and its label) and return the stored item.
    /// No floor check. `Missing` if absent.
    fn set_stock(&self, id: ItemId, quantity: i64) -> Result<Item, StoreError>;
    /// Items matching `filter`, ordered by id, paginated.
    fn find(&self, filter: ItemFilter, page: Page) -> Result<Vec<Item>, StoreError>;
}

/// Cart entry persistence, keyed by (user, item).
pub trait CartStore: Send + Sync {
    fn get(&self, user_id: UserId, item_id: ItemId) -> Result<Option<CartEntry>, StoreError>;
    fn upsert(&self, entry: CartEntry) -> Result<(), StoreError>;
    /// Deleting an absent entry is not an error.
    fn delete(&self, user_id: UserId, item_id: ItemId) -> Result<(), StoreError>;
    /// All entries of one user, ordered by item id.
    fn list_for_user(&self, user_id: UserId) -> Result<Vec<CartEntry>, StoreError>;
}

/// Order persistence plus the order id sequence.
pub trait OrderStore: Send + Sync {
    /// Allocate the next order id. The sequence lives with the orders it numbers,
    /// starts at 1, and never hands out an id twice.
    fn next_order_id(&self) -> Result<OrderId, StoreError>;
    /// Insert an order; `Duplicate` if the id is taken.
    fn insert(&self, order: Order) -> Result<(), StoreError>;
    /// All orders of one user, ordered by id.
    fn list_for_user(&self, user_id: UserId) -> Result<Vec<Order>, StoreError>;
}

/// Rating persistence, at most one per (user, item).
pub trait RatingStore: Send + Sync {
    /// Insert or overwrite the (user, item) rating.
    fn upsert(&self, rating: Rating) -> Result<(), StoreError>;
    fn list_for_item(&self, item_id: ItemId) -> Result<Vec<Rating>, StoreError>;
}

/// Append-only comment persistence.
pub trait CommentStore: Send + Sync {
    fn insert(&self, comment: Comment) -> Result<(), StoreError>;
    fn get(&self, id: CommentId) -> Result<Option<Comment>, StoreError>;
    /// Comments on an item, in insertion order (replies included).
    fn list_for_item(&self, item_id: ItemId) -> Result<Vec<Comment>, StoreError>;
    /// Direct replies to a comment, in insertion order.
    fn replies_to(&self, parent_id: CommentId) -> Result<Vec<Comment>, StoreError>;
}

/// Seller persistence.
pub trait SellerStore: Send + Sync {
    /// Insert a seller; `Duplicate` if the id is taken.
    fn insert(&self, seller: Seller) -> Result<(), StoreError>;
    fn get(&self, id: SellerId) -> Result<Option<Seller>, StoreError>;
}

/// The persistence handles the services are wired with.
#[derive(Clone)]
pub struct StoreHandles {
    pub catalogs: Arc<dyn CatalogStore>,
    pub items: Arc<dyn ItemStore>,
    pub carts: Arc<dyn CartStore>,
    pub orders: Arc<dyn OrderStore>,
    pub ratings: Arc<dyn RatingStore>,
    pub comments: Arc<dyn CommentStore>,
    pub sellers: Arc<dyn SellerStore>,
}

impl StoreHandles {
    /// In-memory handles for tests/dev.
    pub fn in_memory() -> Self {
        use super::in_memory::*;

        Self {
            catalogs: Arc::new(InMemoryCatalogStore::new()),
            items: Arc::new(InMemoryItemStore::new()),
            carts: Arc::new(InMemoryCartStore::new()),
            orders: Arc::new(InMemoryOrderStore::new()),
            ratings: Arc::new(InMemoryRatingStore::new()),
            comments: Arc::new(InMemoryCommentStore::new()),
            sellers: Arc::new(InMemorySellerStore::new()),
        }
    }
}

impl core::fmt::Debug for StoreHandles {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("StoreHandles").finish_non_exhaustive()
    }
}
