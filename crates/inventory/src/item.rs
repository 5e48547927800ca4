use serde::{Deserialize, Serialize};

use storefront_core::{CatalogId, DomainError, DomainResult, Entity, ItemId, SellerId};

use crate::stock::StockLabel;

/// Input for creating an item, either directly or as part of a catalog document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemInput {
    #[serde(rename = "id")]
    pub item_id: ItemId,
    pub name: String,
    pub seller_id: SellerId,
    /// Overwritten with the containing node's id when seeded from a catalog.
    #[serde(default)]
    pub catalog_id: Option<CatalogId>,
    pub in_stock: i64,
}

/// A sellable item and its authoritative stock count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub seller_id: SellerId,
    pub catalog_id: Option<CatalogId>,
    pub in_stock: i64,
    pub stock_label: StockLabel,
    /// Mean of all ratings; `None` until the first rating exists.
    pub rating: Option<f64>,
}

impl Item {
    /// Build a new item from input, rejecting negative stock.
    pub fn create(input: &ItemInput) -> DomainResult<Self> {
        if input.in_stock < 0 {
            return Err(DomainError::validation(format!(
                "item {}: in_stock cannot be negative (got {})",
                input.item_id, input.in_stock
            )));
        }

        Ok(Self {
            id: input.item_id,
            name: input.name.clone(),
            seller_id: input.seller_id,
            catalog_id: input.catalog_id,
            in_stock: input.in_stock,
            stock_label: StockLabel::for_quantity(input.in_stock),
            rating: None,
        })
    }

    /// Overwrite the stock count. No floor check: callers that decrement are
    /// responsible for staying non-negative.
    pub fn with_stock(mut self, quantity: i64) -> Self {
        self.in_stock = quantity;
        self.stock_label = StockLabel::for_quantity(quantity);
        self
    }

    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }

    /// Label for what remains once `reserved` units are set aside. Saturates,
    /// since stock overwrites carry no floor.
    pub fn label_after_reservation(&self, reserved: i64) -> StockLabel {
        StockLabel::for_quantity(self.in_stock.saturating_sub(reserved))
    }
}

impl Entity for Item {
    type Id = ItemId;
    const KIND: &'static str = "item";

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
