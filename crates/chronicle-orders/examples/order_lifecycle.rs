//! Walkthrough of the event-sourcing core: place and ship an order, reload
//! it from its event stream, and build a read model from the commit log.
//!
//! Run with `RUST_LOG=debug cargo run --example order_lifecycle`.

use std::error::Error;
use std::sync::Arc;

use uuid::Uuid;

use chronicle_core::clock::SystemClock;
use chronicle_core::repository::EventSourcedRepository;
use chronicle_core::store::EventStore;
use chronicle_memory::InMemoryEventStore;
use chronicle_orders::application::command_handlers::{handle_place_order, handle_ship_order};
use chronicle_orders::application::projections::OrderSummaryProjection;
use chronicle_orders::application::query_handlers::get_order_by_id;
use chronicle_orders::domain::aggregates::Order;
use chronicle_orders::domain::commands::{PlaceOrder, ShipOrder};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Read configuration from environment.
    let snapshot_frequency: u64 = std::env::var("SNAPSHOT_FREQUENCY")
        .unwrap_or_else(|_| "2".to_string())
        .parse()
        .map_err(|e| format!("SNAPSHOT_FREQUENCY must be a valid u64: {e}"))?;

    let store = Arc::new(InMemoryEventStore::new());
    let repo: EventSourcedRepository<Order, _> =
        EventSourcedRepository::with_snapshots(Arc::clone(&store), snapshot_frequency);
    let clock = SystemClock;

    // Command side: place and ship an order.
    let correlation_id = Uuid::new_v4();
    handle_place_order(
        &PlaceOrder {
            correlation_id,
            order_id: "o-1".to_string(),
            customer_id: "cust-7".to_string(),
            total_cents: 10,
        },
        &clock,
        &repo,
    )
    .await?;
    handle_ship_order(
        &ShipOrder {
            correlation_id,
            order_id: "o-1".to_string(),
            tracking_number: "T1".to_string(),
        },
        &clock,
        &repo,
    )
    .await?;

    // Query side: reconstitute from the stream.
    let view = get_order_by_id("o-1", store.as_ref()).await?;
    tracing::info!(status = %view.status, version = view.version, "order reloaded");

    // Read model: fold the global commit log.
    let mut projection = OrderSummaryProjection::new();
    projection.refresh_from(store.as_ref(), 100).await?;
    if let Some(summary) = projection.summary("o-1") {
        tracing::info!(
            status = %summary.status,
            tracking = summary.tracking_number.as_deref().unwrap_or("-"),
            "read model caught up"
        );
    }

    if let Some(snapshot) = store.latest_snapshot("o-1").await? {
        tracing::info!(version = snapshot.version, "snapshot on record");
    }

    Ok(())
}
