//! In-memory persistence backends.
//!
//! Intended for tests/dev. Ordered maps keep listings deterministic.

use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use storefront_cart::CartEntry;
use storefront_catalog::CatalogNode;
use storefront_core::{CatalogId, CommentId, Entity, ItemId, OrderId, SellerId, UserId};
use storefront_inventory::{Comment, Item, Rating, Seller};
use storefront_sales::Order;

use super::traits::{
    CartStore, CatalogStore, CommentStore, ItemFilter, ItemStore, OrderStore, Page, RatingStore,
    SellerStore, StoreError,
};

fn read<'a, T>(lock: &'a RwLock<T>, table: &str) -> Result<RwLockReadGuard<'a, T>, StoreError> {
    lock.read()
        .map_err(|_| StoreError::Poisoned(format!("{table} table")))
}

fn write<'a, T>(lock: &'a RwLock<T>, table: &str) -> Result<RwLockWriteGuard<'a, T>, StoreError> {
    lock.write()
        .map_err(|_| StoreError::Poisoned(format!("{table} table")))
}

/// Insert into an id-keyed table, refusing to overwrite.
fn insert_new<E: Entity>(rows: &mut HashMap<E::Id, E>, row: E) -> Result<(), StoreError> {
    match rows.entry(*row.id()) {
        Entry::Occupied(_) => Err(StoreError::Duplicate(row.describe())),
        Entry::Vacant(slot) => {
            slot.insert(row);
            Ok(())
        }
    }
}

fn paginate<T>(rows: impl Iterator<Item = T>, page: Page) -> Vec<T> {
    rows.skip(page.offset)
        .take(page.limit.unwrap_or(usize::MAX))
        .collect()
}

#[derive(Debug, Default)]
pub struct InMemoryCatalogStore {
    nodes: RwLock<HashMap<CatalogId, CatalogNode>>,
}

impl InMemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CatalogStore for InMemoryCatalogStore {
    fn insert(&self, node: CatalogNode) -> Result<(), StoreError> {
        let mut nodes = write(&self.nodes, "catalog")?;
        insert_new(&mut *nodes, node)
    }

    fn get(&self, id: CatalogId) -> Result<Option<CatalogNode>, StoreError> {
        Ok(read(&self.nodes, "catalog")?.get(&id).cloned())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryItemStore {
    items: RwLock<BTreeMap<ItemId, Item>>,
}

impl InMemoryItemStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ItemStore for InMemoryItemStore {
    fn insert(&self, item: Item) -> Result<(), StoreError> {
        let mut items = write(&self.items, "item")?;
        if items.contains_key(&item.id) {
            return Err(StoreError::Duplicate(item.describe()));
        }
        items.insert(item.id, item);
        Ok(())
    }

    fn get(&self, id: ItemId) -> Result<Option<Item>, StoreError> {
        Ok(read(&self.items, "item")?.get(&id).cloned())
    }

    fn update(&self, item: Item) -> Result<(), StoreError> {
        let mut items = write(&self.items, "item")?;
        match items.get_mut(&item.id) {
            Some(slot) => {
                *slot = item;
                Ok(())
            }
            None => Err(StoreError::Missing(item.describe())),
        }
    }

    fn set_stock(&self, id: ItemId, quantity: i64) -> Result<Item, StoreError> {
        let mut items = write(&self.items, "item")?;
        let slot = items
            .get_mut(&id)
            .ok_or_else(|| StoreError::Missing(format!("item {id}")))?;
        *slot = slot.clone().with_stock(quantity);
        Ok(slot.clone())
    }

    fn find(&self, filter: ItemFilter, page: Page) -> Result<Vec<Item>, StoreError> {
        let items = read(&self.items, "item")?;
        let matching = items.values().filter(|item| match filter {
            ItemFilter::Catalog(id) => item.catalog_id == Some(id),
            ItemFilter::Seller(id) => item.seller_id == id,
        });
        Ok(paginate(matching.cloned(), page))
    }
}

#[derive(Debug, Default)]
pub struct InMemoryCartStore {
    entries: RwLock<BTreeMap<(UserId, ItemId), CartEntry>>,
}

impl InMemoryCartStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CartStore for InMemoryCartStore {
    fn get(&self, user_id: UserId, item_id: ItemId) -> Result<Option<CartEntry>, StoreError> {
        Ok(read(&self.entries, "cart")?.get(&(user_id, item_id)).copied())
    }

    fn upsert(&self, entry: CartEntry) -> Result<(), StoreError> {
        write(&self.entries, "cart")?.insert(entry.key(), entry);
        Ok(())
    }

    fn delete(&self, user_id: UserId, item_id: ItemId) -> Result<(), StoreError> {
        write(&self.entries, "cart")?.remove(&(user_id, item_id));
        Ok(())
    }

    fn list_for_user(&self, user_id: UserId) -> Result<Vec<CartEntry>, StoreError> {
        let entries = read(&self.entries, "cart")?;
        Ok(entries
            .range((user_id, ItemId::new(i64::MIN))..=(user_id, ItemId::new(i64::MAX)))
            .map(|(_, e)| *e)
            .collect())
    }
}

#[derive(Debug)]
struct OrderTable {
    next_id: i64,
    orders: BTreeMap<OrderId, Order>,
}

#[derive(Debug)]
pub struct InMemoryOrderStore {
    table: RwLock<OrderTable>,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self {
            table: RwLock::new(OrderTable {
                next_id: 1,
                orders: BTreeMap::new(),
            }),
        }
    }

    /// Rebuild from previously persisted orders; the sequence resumes after the
    /// highest stored id.
    pub fn from_orders(orders: impl IntoIterator<Item = Order>) -> Self {
        let orders: BTreeMap<OrderId, Order> = orders.into_iter().map(|o| (o.id, o)).collect();
        let next_id = orders.keys().next_back().map_or(1, |id| id.get() + 1);
        Self {
            table: RwLock::new(OrderTable { next_id, orders }),
        }
    }
}

impl Default for InMemoryOrderStore {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderStore for InMemoryOrderStore {
    fn next_order_id(&self) -> Result<OrderId, StoreError> {
        let mut table = write(&self.table, "order")?;
        let id = OrderId::new(table.next_id);
        table.next_id += 1;
        Ok(id)
    }

    fn insert(&self, order: Order) -> Result<(), StoreError> {
        let mut table = write(&self.table, "order")?;
        if table.orders.contains_key(&order.id) {
            return Err(StoreError::Duplicate(order.describe()));
        }
        table.next_id = table.next_id.max(order.id.get() + 1);
        table.orders.insert(order.id, order);
        Ok(())
    }

    fn list_for_user(&self, user_id: UserId) -> Result<Vec<Order>, StoreError> {
        let table = read(&self.table, "order")?;
        Ok(table
            .orders
            .values()
            .filter(|o| o.user_id == user_id)
            .cloned()
            .collect())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryRatingStore {
    ratings: RwLock<BTreeMap<(ItemId, UserId), Rating>>,
}

impl InMemoryRatingStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RatingStore for InMemoryRatingStore {
    fn upsert(&self, rating: Rating) -> Result<(), StoreError> {
        write(&self.ratings, "rating")?.insert((rating.item_id, rating.user_id), rating);
        Ok(())
    }

    fn list_for_item(&self, item_id: ItemId) -> Result<Vec<Rating>, StoreError> {
        let ratings = read(&self.ratings, "rating")?;
        Ok(ratings
            .range((item_id, UserId::new(i64::MIN))..=(item_id, UserId::new(i64::MAX)))
            .map(|(_, r)| *r)
            .collect())
    }
}

#[derive(Debug, Default)]
struct CommentLog {
    rows: Vec<Comment>,
    index: HashMap<CommentId, usize>,
}

#[derive(Debug, Default)]
pub struct InMemoryCommentStore {
    log: RwLock<CommentLog>,
}

impl InMemoryCommentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CommentStore for InMemoryCommentStore {
    fn insert(&self, comment: Comment) -> Result<(), StoreError> {
        let mut log = write(&self.log, "comment")?;
        if log.index.contains_key(&comment.id) {
            return Err(StoreError::Duplicate(comment.describe()));
        }
        let pos = log.rows.len();
        log.index.insert(comment.id, pos);
        log.rows.push(comment);
        Ok(())
    }

    fn get(&self, id: CommentId) -> Result<Option<Comment>, StoreError> {
        let log = read(&self.log, "comment")?;
        Ok(log.index.get(&id).map(|&pos| log.rows[pos].clone()))
    }

    fn list_for_item(&self, item_id: ItemId) -> Result<Vec<Comment>, StoreError> {
        let log = read(&self.log, "comment")?;
        Ok(log
            .rows
            .iter()
            .filter(|c| c.item_id == item_id)
            .cloned()
            .collect())
    }

    fn replies_to(&self, parent_id: CommentId) -> Result<Vec<Comment>, StoreError> {
        let log = read(&self.log, "comment")?;
        Ok(log
            .rows
            .iter()
            .filter(|c| c.parent_id == Some(parent_id))
            .cloned()
            .collect())
    }
}

#[derive(Debug, Default)]
pub struct InMemorySellerStore {
    sellers: RwLock<HashMap<SellerId, Seller>>,
}

impl InMemorySellerStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SellerStore for InMemorySellerStore {
    fn insert(&self, seller: Seller) -> Result<(), StoreError> {
        let mut sellers = write(&self.sellers, "seller")?;
        insert_new(&mut *sellers, seller)
    }

    fn get(&self, id: SellerId) -> Result<Option<Seller>, StoreError> {
        Ok(read(&self.sellers, "seller")?.get(&id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use storefront_core::SellerId;
    use storefront_inventory::{ItemInput, StockLabel};
    use storefront_sales::OrderStatus;

    fn item(id: i64, catalog: i64, seller: i64) -> Item {
        Item::create(&ItemInput {
            item_id: ItemId::new(id),
            name: format!("item-{id}"),
            seller_id: SellerId::new(seller),
            catalog_id: Some(CatalogId::new(catalog)),
            in_stock: 5,
        })
        .unwrap()
    }

    fn order(id: i64, user: i64) -> Order {
        Order {
            id: OrderId::new(id),
            user_id: UserId::new(user),
            lines: vec![],
            status: OrderStatus::Created,
            placed_at: Utc::now(),
        }
    }

    #[test]
    fn item_insert_rejects_duplicates() {
        let store = InMemoryItemStore::new();
        store.insert(item(1, 1, 1)).unwrap();
        let err = store.insert(item(1, 2, 2)).unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(_)));
        assert_eq!(store.get(ItemId::new(1)).unwrap().unwrap().catalog_id, Some(CatalogId::new(1)));
    }

    #[test]
    fn set_stock_recomputes_label_and_reports_missing() {
        let store = InMemoryItemStore::new();
        store.insert(item(1, 1, 1)).unwrap();
        let updated = store.set_stock(ItemId::new(1), 2).unwrap();
        assert_eq!(updated.stock_label, StockLabel::Adequate);
        assert!(matches!(
            store.set_stock(ItemId::new(9), 1),
            Err(StoreError::Missing(_))
        ));
    }

    #[test]
    fn find_filters_orders_and_paginates() {
        let store = InMemoryItemStore::new();
        for id in [5, 1, 4, 2, 3] {
            store.insert(item(id, 7, id % 2)).unwrap();
        }
        store.insert(item(6, 8, 0)).unwrap();

        let page = store
            .find(ItemFilter::Catalog(CatalogId::new(7)), Page::new(Some(2), 1))
            .unwrap();
        let ids: Vec<i64> = page.iter().map(|i| i.id.get()).collect();
        assert_eq!(ids, vec![2, 3]);

        let by_seller = store
            .find(ItemFilter::Seller(SellerId::new(0)), Page::default())
            .unwrap();
        let ids: Vec<i64> = by_seller.iter().map(|i| i.id.get()).collect();
        assert_eq!(ids, vec![2, 4, 6]);
    }

    #[test]
    fn cart_listing_is_scoped_to_user() {
        let store = InMemoryCartStore::new();
        for (user, item_id) in [(1, 3), (2, 1), (1, 1)] {
            store
                .upsert(CartEntry {
                    user_id: UserId::new(user),
                    item_id: ItemId::new(item_id),
                    quantity: 1,
                })
                .unwrap();
        }
        let mine = store.list_for_user(UserId::new(1)).unwrap();
        let ids: Vec<i64> = mine.iter().map(|e| e.item_id.get()).collect();
        assert_eq!(ids, vec![1, 3]);

        store.delete(UserId::new(1), ItemId::new(1)).unwrap();
        store.delete(UserId::new(1), ItemId::new(1)).unwrap();
        assert_eq!(store.list_for_user(UserId::new(1)).unwrap().len(), 1);
    }

    #[test]
    fn order_sequence_starts_at_one_and_never_repeats() {
        let store = InMemoryOrderStore::new();
        assert_eq!(store.next_order_id().unwrap(), OrderId::new(1));
        assert_eq!(store.next_order_id().unwrap(), OrderId::new(2));
    }

    #[test]
    fn order_sequence_resumes_after_persisted_orders() {
        let store = InMemoryOrderStore::from_orders(vec![order(1, 1), order(4, 2)]);
        assert_eq!(store.next_order_id().unwrap(), OrderId::new(5));
        assert_eq!(store.list_for_user(UserId::new(2)).unwrap().len(), 1);
    }

    #[test]
    fn inserting_an_order_moves_the_sequence_past_it() {
        let store = InMemoryOrderStore::new();
        store.insert(order(10, 1)).unwrap();
        assert_eq!(store.next_order_id().unwrap(), OrderId::new(11));
        assert!(matches!(store.insert(order(10, 1)), Err(StoreError::Duplicate(_))));
    }

    #[test]
    fn rating_upsert_overwrites_per_user() {
        let store = InMemoryRatingStore::new();
        let item_id = ItemId::new(1);
        store.upsert(Rating::new(UserId::new(1), item_id, 4).unwrap()).unwrap();
        store.upsert(Rating::new(UserId::new(1), item_id, 2).unwrap()).unwrap();
        store.upsert(Rating::new(UserId::new(2), ItemId::new(2), 5).unwrap()).unwrap();

        let ratings = store.list_for_item(item_id).unwrap();
        assert_eq!(ratings.len(), 1);
        assert_eq!(ratings[0].score, 2);
    }
}
