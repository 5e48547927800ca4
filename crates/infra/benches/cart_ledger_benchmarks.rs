use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use std::sync::Arc;

use storefront_core::{ItemId, SellerId, UserId};
use storefront_infra::{
    CartService, InventoryService, ItemLocks, OrderService, StoreHandles, StorefrontConfig,
};
use storefront_inventory::ItemInput;

struct Fixture {
    inventory: InventoryService,
    cart: CartService,
    orders: OrderService,
}

fn fixture(items: i64, stock: i64) -> Fixture {
    let stores = StoreHandles::in_memory();
    let locks = Arc::new(ItemLocks::new());
    let config = StorefrontConfig::default();
    let inventory = InventoryService::new(stores.clone(), locks.clone());
    for id in 1..=items {
        inventory
            .add_item(&ItemInput {
                item_id: ItemId::new(id),
                name: format!("item-{id}"),
                seller_id: SellerId::new(1),
                catalog_id: None,
                in_stock: stock,
            })
            .unwrap();
    }
    Fixture {
        cart: CartService::new(stores.clone(), locks.clone()),
        orders: OrderService::new(stores, locks, &config),
        inventory,
    }
}

fn bench_add_to_cart(c: &mut Criterion) {
    let mut group = c.benchmark_group("add_to_cart");
    group.sample_size(1000);

    group.bench_function("merge_existing_entry", |b| {
        let f = fixture(1, i64::MAX / 2);
        let user = UserId::new(1);
        b.iter(|| {
            f.cart
                .add_to_cart(black_box(user), black_box(ItemId::new(1)), 1)
                .unwrap();
        });
    });

    group.bench_function("rejected_over_stock", |b| {
        let f = fixture(1, 1);
        let user = UserId::new(1);
        b.iter(|| {
            let _ = black_box(f.cart.add_to_cart(user, ItemId::new(1), 2));
        });
    });

    group.finish();
}

fn bench_place_order(c: &mut Criterion) {
    let mut group = c.benchmark_group("place_order");

    for lines in [1i64, 10, 50].iter() {
        group.throughput(Throughput::Elements(*lines as u64));
        group.bench_with_input(BenchmarkId::from_parameter(lines), lines, |b, &lines| {
            let f = fixture(lines, i64::MAX / 2);
            let user = UserId::new(1);
            b.iter(|| {
                for id in 1..=lines {
                    f.cart.add_to_cart(user, ItemId::new(id), 1).unwrap();
                }
                black_box(f.orders.place_order(user).unwrap());
            });
        });
    }

    group.finish();
}

fn bench_adjust_stock(c: &mut Criterion) {
    let mut group = c.benchmark_group("adjust_stock");
    group.bench_function("overwrite", |b| {
        let f = fixture(1, 10);
        let mut qty = 0;
        b.iter(|| {
            qty = (qty + 1) % 8;
            black_box(f.inventory.adjust_stock(ItemId::new(1), qty).unwrap());
        });
    });
    group.finish();
}

criterion_group!(benches, bench_add_to_cart, bench_place_order, bench_adjust_stock);
criterion_main!(benches);
