//! Command handlers for the Orders context.
//!
//! Each handler orchestrates one command: load (or create) the aggregate,
//! execute the domain method, persist through the repository with the
//! version observed at load time as the optimistic-concurrency guard.

use tracing::instrument;

use chronicle_core::aggregate::Aggregate;
use chronicle_core::clock::Clock;
use chronicle_core::command::Command;
use chronicle_core::repository::EventSourcedRepository;
use chronicle_core::store::EventStore;

use crate::domain::aggregates::Order;
use crate::domain::commands::{CancelOrder, PlaceOrder, ShipOrder};
use crate::error::OrderError;

/// Handles the `PlaceOrder` command: creates a fresh aggregate, places it,
/// and persists the first event.
///
/// # Errors
///
/// Returns `OrderError::AlreadyExists` if the order already has history,
/// `OrderError::Validation` if the command is malformed, or a store error
/// from persistence.
#[instrument(
    skip(clock, repo),
    fields(command_type = command.command_type(), order_id = %command.order_id)
)]
pub async fn handle_place_order<S: EventStore>(
    command: &PlaceOrder,
    clock: &dyn Clock,
    repo: &EventSourcedRepository<Order, S>,
) -> Result<(), OrderError> {
    if command.customer_id.trim().is_empty() {
        return Err(OrderError::Validation(
            "customer id must not be empty".into(),
        ));
    }
    if repo.exists(&command.order_id).await? {
        return Err(OrderError::AlreadyExists(command.order_id.clone()));
    }

    let mut order = Order::new(&command.order_id);
    order.place(
        command.customer_id.clone(),
        command.total_cents,
        command.correlation_id(),
        clock,
    )?;

    repo.save(&mut order, Some(0)).await?;
    Ok(())
}

/// Handles the `ShipOrder` command: reconstitutes the order, ships it, and
/// persists the resulting event.
///
/// # Errors
///
/// Returns `OrderError::NotFound` if the order has no history,
/// `OrderError::Validation` on an illegal transition, or a store error,
/// including `StoreError::Concurrency` if another writer advanced the stream
/// since this handler loaded it.
#[instrument(
    skip(clock, repo),
    fields(command_type = command.command_type(), order_id = %command.order_id)
)]
pub async fn handle_ship_order<S: EventStore>(
    command: &ShipOrder,
    clock: &dyn Clock,
    repo: &EventSourcedRepository<Order, S>,
) -> Result<(), OrderError> {
    let mut order = repo
        .get_by_id(&command.order_id)
        .await?
        .ok_or_else(|| OrderError::NotFound(command.order_id.clone()))?;
    let expected_version = order.version();

    order.ship(
        command.tracking_number.clone(),
        command.correlation_id(),
        clock,
    )?;

    repo.save(&mut order, Some(expected_version)).await?;
    Ok(())
}

/// Handles the `CancelOrder` command: reconstitutes the order, cancels it,
/// and persists the resulting event.
///
/// # Errors
///
/// Returns `OrderError::NotFound` if the order has no history,
/// `OrderError::Validation` on an illegal transition, or a store error.
#[instrument(
    skip(clock, repo),
    fields(command_type = command.command_type(), order_id = %command.order_id)
)]
pub async fn handle_cancel_order<S: EventStore>(
    command: &CancelOrder,
    clock: &dyn Clock,
    repo: &EventSourcedRepository<Order, S>,
) -> Result<(), OrderError> {
    let mut order = repo
        .get_by_id(&command.order_id)
        .await?
        .ok_or_else(|| OrderError::NotFound(command.order_id.clone()))?;
    let expected_version = order.version();

    order.cancel(command.reason.clone(), command.correlation_id(), clock)?;

    repo.save(&mut order, Some(expected_version)).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;
    use uuid::Uuid;

    use chronicle_core::command::Command;
    use chronicle_core::repository::EventSourcedRepository;
    use chronicle_test_support::{EmptyEventStore, FailingEventStore, FixedClock, RecordingEventStore};

    use super::{handle_place_order, handle_ship_order};
    use crate::domain::commands::{PlaceOrder, ShipOrder};
    use crate::error::OrderError;

    fn place_command(order_id: &str) -> PlaceOrder {
        PlaceOrder {
            correlation_id: Uuid::new_v4(),
            order_id: order_id.to_string(),
            customer_id: "cust-7".to_string(),
            total_cents: 10,
        }
    }

    #[tokio::test]
    async fn test_place_order_appends_with_expected_version_zero() {
        let store = Arc::new(RecordingEventStore::new());
        let repo = EventSourcedRepository::new(Arc::clone(&store));
        let clock = FixedClock(Utc::now());

        handle_place_order(&place_command("o-1"), &clock, &repo)
            .await
            .unwrap();

        let appended = store.appended_events();
        assert_eq!(appended.len(), 1);
        let (aggregate_id, expected_version, events) = &appended[0];
        assert_eq!(aggregate_id, "o-1");
        assert_eq!(*expected_version, Some(0));
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type, "orders.order_placed");
    }

    #[tokio::test]
    async fn test_appended_events_carry_the_command_correlation_id() {
        let store = Arc::new(RecordingEventStore::new());
        let repo = EventSourcedRepository::new(Arc::clone(&store));
        let clock = FixedClock(Utc::now());
        let command = place_command("o-1");

        handle_place_order(&command, &clock, &repo).await.unwrap();

        let appended = store.appended_events();
        let (_, _, events) = &appended[0];
        assert_eq!(
            events[0].metadata.get("correlation_id").unwrap(),
            &command.correlation_id().to_string()
        );
    }

    #[tokio::test]
    async fn test_place_order_rejects_blank_customer() {
        let repo = EventSourcedRepository::new(Arc::new(EmptyEventStore));
        let clock = FixedClock(Utc::now());
        let mut command = place_command("o-1");
        command.customer_id = "   ".to_string();

        let result = handle_place_order(&command, &clock, &repo).await;

        assert!(matches!(result, Err(OrderError::Validation(_))));
    }

    #[tokio::test]
    async fn test_ship_order_of_unknown_aggregate_is_not_found() {
        let repo = EventSourcedRepository::new(Arc::new(EmptyEventStore));
        let clock = FixedClock(Utc::now());
        let command = ShipOrder {
            correlation_id: Uuid::new_v4(),
            order_id: "missing".to_string(),
            tracking_number: "T1".to_string(),
        };

        let result = handle_ship_order(&command, &clock, &repo).await;

        assert!(matches!(result, Err(OrderError::NotFound(id)) if id == "missing"));
    }

    #[tokio::test]
    async fn test_store_failures_propagate() {
        let repo = EventSourcedRepository::new(Arc::new(FailingEventStore));
        let clock = FixedClock(Utc::now());

        let result = handle_place_order(&place_command("o-1"), &clock, &repo).await;

        assert!(matches!(result, Err(OrderError::Store(_))));
    }
}
