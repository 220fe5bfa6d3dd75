//! Query handlers for the Orders context.
//!
//! Queries reconstitute the aggregate through the store and return
//! read-only view DTOs.

use serde::Serialize;

use chronicle_core::aggregate::Aggregate;
use chronicle_core::store::EventStore;

use crate::domain::aggregates::Order;
use crate::error::OrderError;

/// Read-only view of one order.
#[derive(Debug, Serialize)]
pub struct OrderView {
    /// The order identifier.
    pub order_id: String,
    /// Current lifecycle status as a wire string.
    pub status: String,
    /// The ordering customer.
    pub customer_id: Option<String>,
    /// Order total in cents.
    pub total_cents: u64,
    /// Carrier tracking number, once shipped.
    pub tracking_number: Option<String>,
    /// Current version (event count).
    pub version: u64,
}

/// Retrieves an order by its aggregate ID.
///
/// # Errors
///
/// Returns `OrderError::NotFound` if the order has no history, or a store
/// error if replay fails.
pub async fn get_order_by_id<S: EventStore>(
    order_id: &str,
    store: &S,
) -> Result<OrderView, OrderError> {
    let order: Order = store
        .load(order_id)
        .await?
        .ok_or_else(|| OrderError::NotFound(order_id.to_string()))?;

    Ok(OrderView {
        order_id: order_id.to_string(),
        status: order.state().status.as_str().to_string(),
        customer_id: order.state().customer_id.clone(),
        total_cents: order.state().total_cents,
        tracking_number: order.state().tracking_number.clone(),
        version: order.version(),
    })
}
