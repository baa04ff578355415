//! Cart and wishlist invariants and reload survival.

use std::collections::HashSet;
use std::sync::Arc;

use sungrove_client::{
    CartEngine, ClientEvent, NullSink, SharedSink, StoreHandle, WishlistEngine,
};
use sungrove_core::ProductId;

use sungrove_integration_tests::{RecordingSink, product};

#[test]
fn product_ids_stay_unique_under_mixed_operations() {
    let mut cart = CartEngine::load(StoreHandle::memory(), Arc::new(NullSink));

    cart.add_item(&product("1", "9.99"), 2).expect("add");
    cart.add_item(&product("2", "5.00"), 1).expect("add");
    cart.add_item(&product("1", "9.99"), 1).expect("merge");
    cart.update_quantity(&ProductId::new("2"), 4).expect("set");
    cart.add_item(&product("3", "2.50"), 3).expect("add");
    cart.remove_item(&ProductId::new("3"));
    cart.add_item(&product("3", "2.50"), 1).expect("re-add");
    cart.update_quantity(&ProductId::new("1"), 0).expect("zero removes");

    let ids: Vec<_> = cart.lines().iter().map(|line| &line.product_id).collect();
    let unique: HashSet<_> = ids.iter().collect();
    assert_eq!(ids.len(), unique.len(), "no duplicate product ids");

    let quantity_sum: u32 = cart.lines().iter().map(|line| line.quantity).sum();
    assert_eq!(cart.totals().item_count, quantity_sum);
}

#[test]
fn cart_of_three_lines_survives_reload() {
    let store = StoreHandle::memory();
    let events: SharedSink = Arc::new(NullSink);

    let mut cart = CartEngine::load(store.clone(), Arc::clone(&events));
    cart.add_item(&product("1", "9.99"), 2).expect("add");
    cart.add_item(&product("2", "5.00"), 1).expect("add");
    cart.add_item(&product("3", "1.25"), 4).expect("add");

    let lines_before = cart.lines().to_vec();
    let totals_before = cart.totals();

    // simulated reload: drop the in-memory engine, rebuild from the store
    drop(cart);
    let reloaded = CartEngine::load(store, events);

    assert_eq!(reloaded.lines(), lines_before.as_slice());
    assert_eq!(reloaded.totals(), totals_before);
}

#[test]
fn cart_survives_process_restart_on_disk() {
    let dir = std::env::temp_dir().join(format!("sungrove-it-cart-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);

    {
        let store = StoreHandle::file(&dir, "customer");
        let mut cart = CartEngine::load(store, Arc::new(NullSink));
        cart.add_item(&product("1", "18.00"), 2).expect("add");
    }

    let store = StoreHandle::file(&dir, "customer");
    let cart = CartEngine::load(store, Arc::new(NullSink));
    assert_eq!(cart.lines().len(), 1);
    assert_eq!(cart.totals().item_count, 2);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn every_mutation_emits_cart_changed_with_totals() {
    let sink = Arc::new(RecordingSink::new());
    let shared: SharedSink = sink.clone();
    let mut cart = CartEngine::load(StoreHandle::memory(), shared);

    cart.add_item(&product("1", "9.99"), 2).expect("add");
    cart.update_quantity(&ProductId::new("1"), 3).expect("set");
    cart.clear();

    let cart_events: Vec<_> = sink
        .events()
        .into_iter()
        .filter(|event| matches!(event, ClientEvent::CartChanged(_)))
        .collect();
    assert_eq!(cart_events.len(), 3);

    // the final event carries the recomputed (empty) totals
    match cart_events.last() {
        Some(ClientEvent::CartChanged(totals)) => assert_eq!(totals.item_count, 0),
        _ => panic!("expected a cart event"),
    }
}

#[test]
fn wishlist_double_toggle_is_identity() {
    let mut wishlist = WishlistEngine::load(StoreHandle::memory(), Arc::new(NullSink));
    wishlist.toggle(&product("keep", "3.00"));

    let before = wishlist.entries().to_vec();

    wishlist.toggle(&product("flip", "1.00"));
    wishlist.toggle(&product("flip", "1.00"));

    assert_eq!(wishlist.entries(), before.as_slice());
}

#[test]
fn wishlist_and_cart_identity_spaces_are_independent() {
    let store = StoreHandle::memory();
    let mut cart = CartEngine::load(store.clone(), Arc::new(NullSink));
    let mut wishlist = WishlistEngine::load(store, Arc::new(NullSink));

    cart.add_item(&product("both", "2.00"), 1).expect("add");
    wishlist.toggle(&product("both", "2.00"));
    wishlist.toggle(&product("wish-only", "4.00"));

    // removing from the cart leaves the wishlist untouched
    cart.remove_item(&ProductId::new("both"));
    assert!(wishlist.contains(&ProductId::new("both")));
    assert!(wishlist.contains(&ProductId::new("wish-only")));
    assert!(cart.lines().is_empty());
}

#[test]
fn malformed_entries_are_dropped_not_fatal() {
    let store = StoreHandle::memory();
    store.set(
        "cart",
        r#"[
            {"product_id":"ok","name":"Fine","price":{"amount":"2.00","currency_code":"USD"},"image":null,"quantity":1},
            {"product_id":"no-price","name":"Broken"},
            42
        ]"#,
    );

    let cart = CartEngine::load(store, Arc::new(NullSink));
    assert_eq!(cart.lines().len(), 1);
    assert_eq!(
        cart.lines().first().expect("one line").product_id,
        ProductId::new("ok")
    );
}
