//! Read-model projections for the Orders context.

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use chronicle_core::aggregate::Aggregate;
use chronicle_core::error::StoreError;
use chronicle_core::event::StoredEvent;
use chronicle_core::projection::Projection;
use chronicle_core::store::EventStore;

use crate::domain::aggregates::Order;
use crate::domain::events::OrderEvent;

/// Queryable summary of one order, derived purely from its events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderSummary {
    /// Current lifecycle status as a wire string.
    pub status: String,
    /// The ordering customer.
    pub customer_id: String,
    /// Order total in cents.
    pub total_cents: u64,
    /// Carrier tracking number, once shipped.
    pub tracking_number: Option<String>,
}

/// Folds order events from the global commit log into per-order summaries.
///
/// Events of other aggregate types are skipped, so the projection can be fed
/// the raw, cross-aggregate `all_events` stream.
#[derive(Debug, Default)]
pub struct OrderSummaryProjection {
    summaries: HashMap<String, OrderSummary>,
    position: u64,
}

impl OrderSummaryProjection {
    /// Creates an empty projection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the summary for one order, if the projection has
    /// seen it.
    #[must_use]
    pub fn summary(&self, order_id: &str) -> Option<OrderSummary> {
        self.summaries.get(order_id).cloned()
    }

    /// Returns a copy of all summaries keyed by order id.
    #[must_use]
    pub fn summaries(&self) -> HashMap<String, OrderSummary> {
        self.summaries.clone()
    }

    /// Catches up with the store by draining `all_events` in batches from
    /// the projection's cursor.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the store cannot be read.
    pub async fn refresh_from<S: EventStore>(
        &mut self,
        store: &S,
        batch_size: usize,
    ) -> Result<(), StoreError> {
        loop {
            let events = store.all_events(self.position(), batch_size).await?;
            if events.is_empty() {
                return Ok(());
            }
            debug!(batch = events.len(), position = self.position(), "folding batch");
            self.project(&events);
        }
    }
}

impl Projection for OrderSummaryProjection {
    fn apply(&mut self, event: &StoredEvent) {
        if event.aggregate_type != Order::aggregate_type() {
            return;
        }
        // Unknown payload shapes are skipped rather than failing the fold.
        let Ok(payload) = serde_json::from_value::<OrderEvent>(event.payload.clone()) else {
            return;
        };
        match payload {
            OrderEvent::OrderPlaced {
                customer_id,
                total_cents,
            } => {
                self.summaries.insert(
                    event.aggregate_id.clone(),
                    OrderSummary {
                        status: "placed".to_string(),
                        customer_id,
                        total_cents,
                        tracking_number: None,
                    },
                );
            }
            OrderEvent::OrderShipped { tracking_number } => {
                if let Some(summary) = self.summaries.get_mut(&event.aggregate_id) {
                    summary.status = "shipped".to_string();
                    summary.tracking_number = Some(tracking_number);
                }
            }
            OrderEvent::OrderCancelled { .. } => {
                if let Some(summary) = self.summaries.get_mut(&event.aggregate_id) {
                    summary.status = "cancelled".to_string();
                }
            }
        }
    }

    fn reset(&mut self) {
        self.summaries.clear();
    }

    fn position(&self) -> u64 {
        self.position
    }

    fn set_position(&mut self, position: u64) {
        self.position = position;
    }
}
