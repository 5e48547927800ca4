//! Storefront facade: the operations the query layer calls, with the caller's
//! identity passed explicitly on every shopper operation.

pub mod authz;
pub mod seed;
pub mod storefront;

pub use seed::{SeedDocument, SeedError};
pub use storefront::Storefront;
