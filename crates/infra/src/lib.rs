//! Infrastructure layer: persistence handles, per-item locking, configuration,
//! and the application services that orchestrate the pure domain crates.

pub mod config;
pub mod locks;
pub mod services;
pub mod store;


pub use config::StorefrontConfig;
pub use locks::ItemLocks;
pub use services::{
    CartService, CatalogService, FeedbackService, InventoryService, OrderService, SeedReport,
    ServiceError, ServiceResult,
};
pub use store::{StoreError, StoreHandles};
