//! Persistence handles, one per entity family.

pub mod in_memory;
pub mod traits;

pub use in_memory::{
    InMemoryCartStore, InMemoryCatalogStore, InMemoryCommentStore, InMemoryItemStore,
    InMemoryOrderStore, InMemoryRatingStore, InMemorySellerStore,
};
pub use traits::{
    CartStore, CatalogStore, CommentStore, ItemFilter, ItemStore, OrderStore, Page, RatingStore,
    SellerStore, StoreError, StoreHandles,
};
