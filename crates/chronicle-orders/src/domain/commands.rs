//! Commands for the Orders context.

use uuid::Uuid;

use chronicle_core::command::Command;

/// Command to place a new order.
#[derive(Debug, Clone)]
pub struct PlaceOrder {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The order identifier.
    pub order_id: String,
    /// The ordering customer.
    pub customer_id: String,
    /// Order total in cents.
    pub total_cents: u64,
}

impl Command for PlaceOrder {
    fn command_type(&self) -> &'static str {
        "orders.place_order"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to ship a placed order.
#[derive(Debug, Clone)]
pub struct ShipOrder {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The order identifier.
    pub order_id: String,
    /// Carrier tracking number.
    pub tracking_number: String,
}

impl Command for ShipOrder {
    fn command_type(&self) -> &'static str {
        "orders.ship_order"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to cancel a placed order.
#[derive(Debug, Clone)]
pub struct CancelOrder {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The order identifier.
    pub order_id: String,
    /// Why the order is being cancelled.
    pub reason: String,
}

impl Command for CancelOrder {
    fn command_type(&self) -> &'static str {
        "orders.cancel_order"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
