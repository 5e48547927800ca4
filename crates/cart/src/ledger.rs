//! Reservation decisions.
//!
//! The check and the write must run under the same per-item exclusion for the
//! bound to hold across concurrent shoppers; these functions only decide.

use storefront_core::{DomainError, DomainResult, ItemId, UserId};

use crate::entry::CartEntry;

/// What to persist for one (user, item) cart slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartChange {
    Insert(CartEntry),
    Update(CartEntry),
    Delete { user_id: UserId, item_id: ItemId },
}

fn ensure_positive(quantity: i64) -> DomainResult<()> {
    if quantity <= 0 {
        return Err(DomainError::validation(format!(
            "quantity must be positive (got {quantity})"
        )));
    }
    Ok(())
}

/// Reserve `quantity` more units of `item_id` for `user_id`.
///
/// A new entry needs `quantity <= stock`; an existing entry is merged and needs
/// `existing + quantity <= stock`.
pub fn decide_add(
    user_id: UserId,
    item_id: ItemId,
    existing: Option<&CartEntry>,
    stock: i64,
    quantity: i64,
) -> DomainResult<CartChange> {
    ensure_positive(quantity)?;

    match existing {
        None => {
            if quantity > stock {
                return Err(DomainError::insufficient_stock(item_id, quantity, stock));
            }
            Ok(CartChange::Insert(CartEntry {
                user_id,
                item_id,
                quantity,
            }))
        }
        Some(entry) => {
            let total = entry.quantity.saturating_add(quantity);
            if total > stock {
                return Err(DomainError::insufficient_stock(item_id, total, stock));
            }
            Ok(CartChange::Update(CartEntry {
                quantity: total,
                ..*entry
            }))
        }
    }
}

/// Release `quantity` units of a reservation.
///
/// Missing entry is `NotFound`. Releasing as much as or more than is reserved
/// clears the entry without error. Shrinking never re-checks stock: the smaller
/// quantity is bounded by the one that already passed the check.
pub fn decide_remove(
    user_id: UserId,
    item_id: ItemId,
    existing: Option<&CartEntry>,
    quantity: i64,
) -> DomainResult<CartChange> {
    ensure_positive(quantity)?;

    let entry = existing.ok_or_else(|| {
        DomainError::not_found(format!("cart entry for user {user_id}, item {item_id}"))
    })?;

    let remaining = entry.quantity - quantity;
    if remaining <= 0 {
        return Ok(CartChange::Delete { user_id, item_id });
    }

    Ok(CartChange::Update(CartEntry {
        quantity: remaining,
        ..*entry
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    const USER: UserId = UserId::new(1);
    const ITEM: ItemId = ItemId::new(10);

    fn entry(quantity: i64) -> CartEntry {
        CartEntry {
            user_id: USER,
            item_id: ITEM,
            quantity,
        }
    }

    #[test]
    fn first_add_within_stock_inserts() {
        let change = decide_add(USER, ITEM, None, 10, 2).unwrap();
        assert_eq!(change, CartChange::Insert(entry(2)));
    }

    #[test]
    fn repeated_add_merges_quantities() {
        let change = decide_add(USER, ITEM, Some(&entry(2)), 10, 3).unwrap();
        assert_eq!(change, CartChange::Update(entry(5)));
    }

    #[test]
    fn add_over_stock_is_insufficient() {
        let err = decide_add(USER, ITEM, None, 2, 3).unwrap_err();
        assert_eq!(err, DomainError::insufficient_stock(ITEM, 3, 2));
    }

    #[test]
    fn merge_over_stock_reports_the_total() {
        let err = decide_add(USER, ITEM, Some(&entry(4)), 5, 2).unwrap_err();
        assert_eq!(err, DomainError::insufficient_stock(ITEM, 6, 5));
    }

    #[test]
    fn add_exactly_stock_is_allowed() {
        assert!(decide_add(USER, ITEM, Some(&entry(2)), 5, 3).is_ok());
    }

    #[test]
    fn non_positive_quantities_are_rejected() {
        assert!(matches!(
            decide_add(USER, ITEM, None, 5, 0),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            decide_remove(USER, ITEM, Some(&entry(2)), -1),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn remove_without_entry_is_not_found() {
        let err = decide_remove(USER, ITEM, None, 1).unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[test]
    fn remove_overshoot_clears_entry_without_error() {
        // Lenient by contract: asking to remove 5 of 2 just empties the slot.
        let change = decide_remove(USER, ITEM, Some(&entry(2)), 5).unwrap();
        assert_eq!(change, CartChange::Delete { user_id: USER, item_id: ITEM });
    }

    #[test]
    fn remove_exact_quantity_clears_entry() {
        let change = decide_remove(USER, ITEM, Some(&entry(2)), 2).unwrap();
        assert_eq!(change, CartChange::Delete { user_id: USER, item_id: ITEM });
    }

    #[test]
    fn partial_remove_shrinks_entry() {
        let change = decide_remove(USER, ITEM, Some(&entry(5)), 2).unwrap();
        assert_eq!(change, CartChange::Update(entry(3)));
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        #[derive(Debug, Clone)]
        enum Op {
            Add(i64),
            Remove(i64),
        }

        fn arb_op() -> impl Strategy<Value = Op> {
            prop_oneof![(1i64..8).prop_map(Op::Add), (1i64..8).prop_map(Op::Remove)]
        }

        proptest! {
            /// Property: applying any sequence of accepted decisions never leaves
            /// more reserved than the stock the check saw.
            #[test]
            fn sequential_reservations_never_exceed_stock(
                stock in 0i64..20,
                ops in prop::collection::vec(arb_op(), 0..40)
            ) {
                let mut slot: Option<CartEntry> = None;
                for op in ops {
                    let decided = match op {
                        Op::Add(q) => decide_add(USER, ITEM, slot.as_ref(), stock, q),
                        Op::Remove(q) => decide_remove(USER, ITEM, slot.as_ref(), q),
                    };
                    match decided {
                        Ok(CartChange::Insert(e)) | Ok(CartChange::Update(e)) => slot = Some(e),
                        Ok(CartChange::Delete { .. }) => slot = None,
                        Err(_) => {}
                    }
                    if let Some(e) = slot {
                        prop_assert!(e.quantity > 0);
                        prop_assert!(e.quantity <= stock);
                    }
                }
            }
        }
    }
}
