//! Inventory domain module.
//!
//! Items and their stock, the shopper-facing stock label, ratings, comments and
//! sellers. Pure domain logic (no IO, no storage).

pub mod comment;
pub mod item;
pub mod rating;
pub mod seller;
pub mod stock;

pub use comment::Comment;
pub use item::{Item, ItemInput};
pub use rating::{Rating, average_rating};
pub use seller::Seller;
pub use stock::StockLabel;
