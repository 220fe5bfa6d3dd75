//! Aggregate roots for the Orders context.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use chronicle_core::aggregate::{Aggregate, AggregateRoot};
use chronicle_core::clock::Clock;
use chronicle_core::error::StoreError;
use chronicle_core::event::EventEnvelope;

use super::events::OrderEvent;
use crate::error::OrderError;

/// Lifecycle status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Created but not yet placed.
    #[default]
    Draft,
    /// Placed and awaiting shipment.
    Placed,
    /// Handed to a carrier.
    Shipped,
    /// Cancelled before shipping.
    Cancelled,
}

impl OrderStatus {
    /// Returns the status as its wire string.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Placed => "placed",
            Self::Shipped => "shipped",
            Self::Cancelled => "cancelled",
        }
    }
}

/// Snapshot-serializable state of an order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderState {
    /// Current lifecycle status.
    pub status: OrderStatus,
    /// The ordering customer, once placed.
    pub customer_id: Option<String>,
    /// Order total in cents.
    pub total_cents: u64,
    /// Carrier tracking number, once shipped.
    pub tracking_number: Option<String>,
    /// Cancellation reason, if cancelled.
    pub cancellation_reason: Option<String>,
}

/// The aggregate root for a customer order.
#[derive(Debug)]
pub struct Order {
    root: AggregateRoot<OrderEvent>,
    state: OrderState,
}

impl Order {
    /// Returns the order's current state.
    #[must_use]
    pub fn state(&self) -> &OrderState {
        &self.state
    }

    fn raise(&mut self, event: OrderEvent, correlation_id: Uuid, clock: &dyn Clock) {
        self.raise_event(
            EventEnvelope::new(event, clock.now())
                .with_metadata("correlation_id", correlation_id.to_string()),
        );
    }

    /// Places the order.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Validation` if the order has already been placed
    /// or the total is zero.
    pub fn place(
        &mut self,
        customer_id: String,
        total_cents: u64,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), OrderError> {
        if self.state.status != OrderStatus::Draft {
            return Err(OrderError::Validation(format!(
                "order {} is already {}",
                self.id(),
                self.state.status.as_str()
            )));
        }
        if total_cents == 0 {
            return Err(OrderError::Validation(
                "order total must be greater than zero".into(),
            ));
        }
        self.raise(
            OrderEvent::OrderPlaced {
                customer_id,
                total_cents,
            },
            correlation_id,
            clock,
        );
        Ok(())
    }

    /// Ships the order.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Validation` unless the order is currently placed.
    pub fn ship(
        &mut self,
        tracking_number: String,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), OrderError> {
        if self.state.status != OrderStatus::Placed {
            return Err(OrderError::Validation(format!(
                "order {} cannot ship while {}",
                self.id(),
                self.state.status.as_str()
            )));
        }
        if tracking_number.trim().is_empty() {
            return Err(OrderError::Validation(
                "tracking number must not be empty".into(),
            ));
        }
        self.raise(
            OrderEvent::OrderShipped { tracking_number },
            correlation_id,
            clock,
        );
        Ok(())
    }

    /// Cancels the order.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Validation` unless the order is currently placed.
    pub fn cancel(
        &mut self,
        reason: String,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), OrderError> {
        if self.state.status != OrderStatus::Placed {
            return Err(OrderError::Validation(format!(
                "order {} cannot be cancelled while {}",
                self.id(),
                self.state.status.as_str()
            )));
        }
        self.raise(OrderEvent::OrderCancelled { reason }, correlation_id, clock);
        Ok(())
    }
}

impl Aggregate for Order {
    type Event = OrderEvent;

    fn new(id: &str) -> Self {
        Self {
            root: AggregateRoot::new(id),
            state: OrderState::default(),
        }
    }

    fn aggregate_type() -> &'static str {
        "Order"
    }

    fn root(&self) -> &AggregateRoot<Self::Event> {
        &self.root
    }

    fn root_mut(&mut self) -> &mut AggregateRoot<Self::Event> {
        &mut self.root
    }

    fn apply(&mut self, event: &Self::Event) {
        match event {
            OrderEvent::OrderPlaced {
                customer_id,
                total_cents,
            } => {
                self.state.status = OrderStatus::Placed;
                self.state.customer_id = Some(customer_id.clone());
                self.state.total_cents = *total_cents;
            }
            OrderEvent::OrderShipped { tracking_number } => {
                self.state.status = OrderStatus::Shipped;
                self.state.tracking_number = Some(tracking_number.clone());
            }
            OrderEvent::OrderCancelled { reason } => {
                self.state.status = OrderStatus::Cancelled;
                self.state.cancellation_reason = Some(reason.clone());
            }
        }
    }

    fn snapshot_state(&self) -> Result<serde_json::Value, StoreError> {
        Ok(serde_json::to_value(&self.state)?)
    }

    fn restore_from_snapshot_state(&mut self, state: &serde_json::Value) -> Result<(), StoreError> {
        self.state = serde_json::from_value(state.clone())?;
        Ok(())
    }
}
