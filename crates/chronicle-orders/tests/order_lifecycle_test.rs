//! End-to-end tests for the Orders context against the in-memory store.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use chronicle_core::aggregate::Aggregate;
use chronicle_core::error::StoreError;
use chronicle_core::repository::EventSourcedRepository;
use chronicle_core::store::EventStore;
use chronicle_memory::InMemoryEventStore;
use chronicle_orders::application::command_handlers::{
    handle_cancel_order, handle_place_order, handle_ship_order,
};
use chronicle_orders::application::projections::OrderSummaryProjection;
use chronicle_orders::application::query_handlers::get_order_by_id;
use chronicle_orders::domain::aggregates::{Order, OrderStatus};
use chronicle_orders::domain::commands::{CancelOrder, PlaceOrder, ShipOrder};
use chronicle_orders::error::OrderError;
use chronicle_test_support::FixedClock;

fn repo(store: &Arc<InMemoryEventStore>) -> EventSourcedRepository<Order, InMemoryEventStore> {
    EventSourcedRepository::new(Arc::clone(store))
}

fn place(order_id: &str) -> PlaceOrder {
    PlaceOrder {
        correlation_id: Uuid::new_v4(),
        order_id: order_id.to_string(),
        customer_id: "cust-7".to_string(),
        total_cents: 10,
    }
}

fn ship(order_id: &str) -> ShipOrder {
    ShipOrder {
        correlation_id: Uuid::new_v4(),
        order_id: order_id.to_string(),
        tracking_number: "T1".to_string(),
    }
}

#[tokio::test]
async fn test_place_then_ship_then_reload() {
    let store = Arc::new(InMemoryEventStore::new());
    let repo = repo(&store);
    let clock = FixedClock(Utc::now());

    handle_place_order(&place("o-1"), &clock, &repo).await.unwrap();
    handle_ship_order(&ship("o-1"), &clock, &repo).await.unwrap();

    let order = repo.get_by_id("o-1").await.unwrap().unwrap();
    assert_eq!(order.version(), 2);
    assert_eq!(order.state().status, OrderStatus::Shipped);
    assert_eq!(order.state().tracking_number.as_deref(), Some("T1"));

    let view = get_order_by_id("o-1", store.as_ref()).await.unwrap();
    assert_eq!(view.status, "shipped");
    assert_eq!(view.total_cents, 10);
    assert_eq!(view.version, 2);
}

#[tokio::test]
async fn test_placing_the_same_order_twice_is_rejected() {
    let store = Arc::new(InMemoryEventStore::new());
    let repo = repo(&store);
    let clock = FixedClock(Utc::now());

    handle_place_order(&place("o-1"), &clock, &repo).await.unwrap();
    let result = handle_place_order(&place("o-1"), &clock, &repo).await;

    assert!(matches!(result, Err(OrderError::AlreadyExists(id)) if id == "o-1"));
}

#[tokio::test]
async fn test_competing_writers_exactly_one_wins() {
    let store = Arc::new(InMemoryEventStore::new());
    let repo = repo(&store);
    let clock = FixedClock(Utc::now());
    handle_place_order(&place("o-1"), &clock, &repo).await.unwrap();

    // Two independently loaded copies of the same order, both at version 1.
    let mut shipper: Order = repo.get_by_id("o-1").await.unwrap().unwrap();
    let mut canceller: Order = repo.get_by_id("o-1").await.unwrap().unwrap();
    shipper
        .ship("T1".into(), Uuid::new_v4(), &clock)
        .unwrap();
    canceller
        .cancel("out of stock".into(), Uuid::new_v4(), &clock)
        .unwrap();

    repo.save(&mut shipper, Some(1)).await.unwrap();
    let conflict = repo.save(&mut canceller, Some(1)).await;

    match conflict {
        Err(StoreError::Concurrency {
            expected, actual, ..
        }) => {
            assert_eq!(expected, 1);
            assert_eq!(actual, 2);
        }
        other => panic!("expected concurrency error, got {other:?}"),
    }

    // The losing copy keeps its uncommitted event; the stream shows the
    // winner's outcome.
    assert_eq!(canceller.uncommitted_events().len(), 1);
    let order = repo.get_by_id("o-1").await.unwrap().unwrap();
    assert_eq!(order.state().status, OrderStatus::Shipped);
}

#[tokio::test]
async fn test_cancel_flow_via_handler() {
    let store = Arc::new(InMemoryEventStore::new());
    let repo = repo(&store);
    let clock = FixedClock(Utc::now());
    handle_place_order(&place("o-1"), &clock, &repo).await.unwrap();

    let command = CancelOrder {
        correlation_id: Uuid::new_v4(),
        order_id: "o-1".to_string(),
        reason: "out of stock".to_string(),
    };
    handle_cancel_order(&command, &clock, &repo).await.unwrap();

    let view = get_order_by_id("o-1", store.as_ref()).await.unwrap();
    assert_eq!(view.status, "cancelled");
}

#[tokio::test]
async fn test_snapshot_cadence_does_not_change_observable_state() {
    let store = Arc::new(InMemoryEventStore::new());
    let repo: EventSourcedRepository<Order, _> =
        EventSourcedRepository::with_snapshots(Arc::clone(&store), 2);
    let clock = FixedClock(Utc::now());

    let mut order = Order::new("o-1");
    order
        .place("cust-7".into(), 10, Uuid::new_v4(), &clock)
        .unwrap();
    order.ship("T1".into(), Uuid::new_v4(), &clock).unwrap();
    repo.save(&mut order, Some(0)).await.unwrap();

    // Version 2 hit the cadence.
    let snapshot = store.latest_snapshot("o-1").await.unwrap().unwrap();
    assert_eq!(snapshot.version, 2);
    assert_eq!(snapshot.aggregate_type, "Order");

    let loaded = repo.get_by_id("o-1").await.unwrap().unwrap();
    assert_eq!(loaded.version(), 2);
    assert_eq!(loaded.state().status, OrderStatus::Shipped);
    assert_eq!(loaded.state().customer_id.as_deref(), Some("cust-7"));
}

#[tokio::test]
async fn test_projection_catches_up_incrementally_from_the_commit_log() {
    let store = Arc::new(InMemoryEventStore::new());
    let repo = repo(&store);
    let clock = FixedClock(Utc::now());
    handle_place_order(&place("o-1"), &clock, &repo).await.unwrap();
    handle_place_order(&place("o-2"), &clock, &repo).await.unwrap();

    let mut projection = OrderSummaryProjection::new();
    projection.refresh_from(store.as_ref(), 1).await.unwrap();
    assert_eq!(projection.summary("o-1").unwrap().status, "placed");
    assert_eq!(projection.summary("o-2").unwrap().status, "placed");

    handle_ship_order(&ship("o-1"), &clock, &repo).await.unwrap();

    // Only the tail past the cursor is folded on the second refresh.
    projection.refresh_from(store.as_ref(), 100).await.unwrap();
    assert_eq!(projection.summary("o-1").unwrap().status, "shipped");
    assert_eq!(projection.summary("o-2").unwrap().status, "placed");
}
