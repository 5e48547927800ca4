//! Orders domain module.
//!
//! Turning a shopper's cart into an immutable order snapshot and the stock
//! writes that settle it. Pure domain logic (no IO, no storage).

pub mod order;

pub use order::{Order, OrderLine, OrderStatus, Settlement, StockWrite, plan_settlement};
