use serde::{Deserialize, Serialize};

use storefront_core::{ItemId, UserId};
use storefront_inventory::Item;

/// A shopper's reservation of `quantity` units of one item. Quantity is always
/// positive; an entry that would reach zero is deleted instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CartEntry {
    pub user_id: UserId,
    pub item_id: ItemId,
    pub quantity: i64,
}

impl CartEntry {
    pub fn key(&self) -> (UserId, ItemId) {
        (self.user_id, self.item_id)
    }
}

/// Cart line as shown to the shopper: the item with its stock label computed
/// against what remains after this reservation, plus the reserved quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub item: Item,
    pub quantity: i64,
}

impl CartItem {
    pub fn new(entry: &CartEntry, mut item: Item) -> Self {
        item.stock_label = item.label_after_reservation(entry.quantity);
        Self {
            item,
            quantity: entry.quantity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_core::SellerId;
    use storefront_inventory::{ItemInput, StockLabel};

    #[test]
    fn cart_item_labels_remaining_stock_not_raw_stock() {
        let item = Item::create(&ItemInput {
            item_id: ItemId::new(1),
            name: "mug".to_string(),
            seller_id: SellerId::new(1),
            catalog_id: None,
            in_stock: 5,
        })
        .unwrap();
        let entry = CartEntry {
            user_id: UserId::new(1),
            item_id: ItemId::new(1),
            quantity: 4,
        };

        let line = CartItem::new(&entry, item);
        assert_eq!(line.quantity, 4);
        assert_eq!(line.item.in_stock, 5);
        assert_eq!(line.item.stock_label, StockLabel::Low);
    }
}
