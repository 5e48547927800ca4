//! Catalog domain module.
//!
//! The hierarchical product taxonomy: nested catalog documents as supplied by
//! callers, the flat per-node records the store keeps, and the traversal that
//! turns one into the other. Pure domain logic (no IO, no storage).

pub mod arena;
pub mod node;

pub use arena::{ArenaNode, CatalogArena};
pub use node::{CatalogInput, CatalogNode};
