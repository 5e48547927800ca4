//! Application services.
//!
//! Each service reads current state through the store handles, asks a pure domain
//! function what should change, and writes the result. Stock-sensitive paths do
//! the read, the decision and the write while holding the item's slot in the
//! shared [`ItemLocks`](crate::locks::ItemLocks).

mod cart;
mod catalog;
mod error;
mod feedback;
mod inventory;
mod orders;

pub use cart::CartService;
pub use catalog::{CatalogService, SeedReport};
pub use error::{ServiceError, ServiceResult};
pub use feedback::FeedbackService;
pub use inventory::InventoryService;
pub use orders::OrderService;

use crate::store::StoreError;

/// Map an insert collision to a domain conflict, leaving other store errors as-is.
pub(crate) fn conflict_on_duplicate(err: StoreError) -> ServiceError {
    match err {
        StoreError::Duplicate(what) => ServiceError::Conflict(format!("{what} already exists")),
        other => ServiceError::Persistence(other),
    }
}

/// Map an update against a missing key to `NotFound`.
pub(crate) fn not_found_on_missing(err: StoreError) -> ServiceError {
    match err {
        StoreError::Missing(what) => ServiceError::NotFound(what),
        other => ServiceError::Persistence(other),
    }
}
