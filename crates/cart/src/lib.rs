//! Cart domain module.
//!
//! Per (user, item) reservations against item stock, and the rules for growing,
//! shrinking and clearing them. Decisions are pure: they return the change to
//! persist and leave reading/writing to the caller.

pub mod entry;
pub mod ledger;

pub use entry::{CartEntry, CartItem};
pub use ledger::{CartChange, decide_add, decide_remove};
