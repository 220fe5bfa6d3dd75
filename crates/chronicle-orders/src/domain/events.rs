//! Domain events for the Orders context.

use serde::{Deserialize, Serialize};

use chronicle_core::event::DomainEvent;

/// Events in an order's lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OrderEvent {
    /// A customer placed the order.
    OrderPlaced {
        /// The ordering customer.
        customer_id: String,
        /// Order total in cents.
        total_cents: u64,
    },
    /// The order left the warehouse.
    OrderShipped {
        /// Carrier tracking number.
        tracking_number: String,
    },
    /// The order was cancelled before shipping.
    OrderCancelled {
        /// Why the order was cancelled.
        reason: String,
    },
}

impl DomainEvent for OrderEvent {
    fn event_type(&self) -> &'static str {
        match self {
            Self::OrderPlaced { .. } => "orders.order_placed",
            Self::OrderShipped { .. } => "orders.order_shipped",
            Self::OrderCancelled { .. } => "orders.order_cancelled",
        }
    }
}
