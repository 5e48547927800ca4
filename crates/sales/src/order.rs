use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storefront_cart::CartEntry;
use storefront_core::{DomainError, DomainResult, Entity, ItemId, OrderId, UserId, ValueObject};
use storefront_inventory::Item;

/// Order status. Orders are created in their final state; no further transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Created,
}

/// Snapshot of one settled cart line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    /// The item as it stood right after this line was settled.
    pub item: Item,
    pub quantity: i64,
}

impl ValueObject for OrderLine {}

/// Immutable record of a settled cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub lines: Vec<OrderLine>,
    pub status: OrderStatus,
    pub placed_at: DateTime<Utc>,
}

impl Order {
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }
}

impl Entity for Order {
    type Id = OrderId;
    const KIND: &'static str = "order";

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Stock overwrite produced by settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockWrite {
    pub item_id: ItemId,
    pub new_stock: i64,
}

/// Everything a settlement must persist: the stock writes, then the order.
#[derive(Debug, Clone, PartialEq)]
pub struct Settlement {
    pub order: Order,
    pub stock_writes: Vec<StockWrite>,
}

/// Plan the settlement of `lines` (cart entries paired with the current item
/// state) into order `order_id`.
///
/// Every line is validated before anything is planned: a reservation larger than
/// current stock fails the whole settlement with `InsufficientStock`. An empty
/// cart settles into an order with no lines.
pub fn plan_settlement(
    order_id: OrderId,
    user_id: UserId,
    lines: Vec<(CartEntry, Item)>,
    placed_at: DateTime<Utc>,
) -> DomainResult<Settlement> {
    for (entry, item) in &lines {
        if entry.user_id != user_id {
            return Err(DomainError::invariant(format!(
                "cart entry for item {} belongs to user {}, not {}",
                entry.item_id, entry.user_id, user_id
            )));
        }
        if entry.item_id != item.id {
            return Err(DomainError::invariant(format!(
                "cart entry for item {} paired with item {}",
                entry.item_id, item.id
            )));
        }
        if entry.quantity > item.in_stock {
            return Err(DomainError::insufficient_stock(
                item.id,
                entry.quantity,
                item.in_stock,
            ));
        }
    }

    let mut stock_writes = Vec::with_capacity(lines.len());
    let mut order_lines = Vec::with_capacity(lines.len());
    for (entry, item) in lines {
        let new_stock = item.in_stock - entry.quantity;
        stock_writes.push(StockWrite {
            item_id: item.id,
            new_stock,
        });
        order_lines.push(OrderLine {
            item: item.with_stock(new_stock),
            quantity: entry.quantity,
        });
    }

    Ok(Settlement {
        order: Order {
            id: order_id,
            user_id,
            lines: order_lines,
            status: OrderStatus::Created,
            placed_at,
        },
        stock_writes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_core::SellerId;
    use storefront_inventory::{ItemInput, StockLabel};

    const USER: UserId = UserId::new(7);

    fn item(id: i64, stock: i64) -> Item {
        Item::create(&ItemInput {
            item_id: ItemId::new(id),
            name: format!("item-{id}"),
            seller_id: SellerId::new(1),
            catalog_id: None,
            in_stock: stock,
        })
        .unwrap()
    }

    fn entry(id: i64, quantity: i64) -> CartEntry {
        CartEntry {
            user_id: USER,
            item_id: ItemId::new(id),
            quantity,
        }
    }

    #[test]
    fn settlement_decrements_stock_and_snapshots_lines() {
        let settlement = plan_settlement(
            OrderId::new(1),
            USER,
            vec![(entry(1, 3), item(1, 5))],
            Utc::now(),
        )
        .unwrap();

        assert_eq!(
            settlement.stock_writes,
            vec![StockWrite {
                item_id: ItemId::new(1),
                new_stock: 2
            }]
        );
        let order = &settlement.order;
        assert_eq!(order.status, OrderStatus::Created);
        assert_eq!(order.lines.len(), 1);
        assert_eq!(order.lines[0].quantity, 3);
        assert_eq!(order.lines[0].item.in_stock, 2);
        assert_eq!(order.lines[0].item.stock_label, StockLabel::Adequate);
    }

    #[test]
    fn any_short_line_fails_the_whole_settlement() {
        let err = plan_settlement(
            OrderId::new(1),
            USER,
            vec![(entry(1, 1), item(1, 5)), (entry(2, 4), item(2, 3))],
            Utc::now(),
        )
        .unwrap_err();

        assert_eq!(err, DomainError::insufficient_stock(ItemId::new(2), 4, 3));
    }

    #[test]
    fn empty_cart_settles_into_empty_order() {
        let settlement = plan_settlement(OrderId::new(4), USER, vec![], Utc::now()).unwrap();
        assert!(settlement.order.lines.is_empty());
        assert!(settlement.stock_writes.is_empty());
        assert_eq!(settlement.order.id, OrderId::new(4));
    }

    #[test]
    fn foreign_cart_entry_is_an_invariant_violation() {
        let mut foreign = entry(1, 1);
        foreign.user_id = UserId::new(99);
        let err = plan_settlement(OrderId::new(1), USER, vec![(foreign, item(1, 5))], Utc::now())
            .unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
    }

    #[test]
    fn total_quantity_sums_lines() {
        let settlement = plan_settlement(
            OrderId::new(1),
            USER,
            vec![(entry(1, 1), item(1, 5)), (entry(2, 2), item(2, 3))],
            Utc::now(),
        )
        .unwrap();
        assert_eq!(settlement.order.total_quantity(), 3);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: accepted settlements never write negative stock.
            #[test]
            fn accepted_settlements_keep_stock_non_negative(
                lines in prop::collection::vec((1i64..10, 0i64..10), 0..6)
            ) {
                let pairs: Vec<(CartEntry, Item)> = lines
                    .iter()
                    .enumerate()
                    .map(|(i, (q, s))| (entry(i as i64, *q), item(i as i64, *s)))
                    .collect();

                if let Ok(settlement) = plan_settlement(OrderId::new(1), USER, pairs, Utc::now()) {
                    for write in settlement.stock_writes {
                        prop_assert!(write.new_stock >= 0);
                    }
                }
            }
        }
    }
}
