//! Shared test aggregate for the in-memory store tests.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use chronicle_core::aggregate::{Aggregate, AggregateRoot};
use chronicle_core::error::StoreError;
use chronicle_core::event::{DomainEvent, EventEnvelope};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LedgerEvent {
    Deposited { amount_cents: i64 },
    Withdrawn { amount_cents: i64 },
}

impl DomainEvent for LedgerEvent {
    fn event_type(&self) -> &'static str {
        match self {
            Self::Deposited { .. } => "ledger.deposited",
            Self::Withdrawn { .. } => "ledger.withdrawn",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LedgerState {
    pub balance_cents: i64,
    pub transactions: u64,
}

/// A minimal account ledger aggregate.
#[derive(Debug)]
pub struct LedgerAccount {
    root: AggregateRoot<LedgerEvent>,
    pub state: LedgerState,
}

impl LedgerAccount {
    pub fn deposit(&mut self, amount_cents: i64) {
        self.raise_event(EventEnvelope::new(
            LedgerEvent::Deposited { amount_cents },
            Utc::now(),
        ));
    }

    pub fn withdraw(&mut self, amount_cents: i64) {
        self.raise_event(EventEnvelope::new(
            LedgerEvent::Withdrawn { amount_cents },
            Utc::now(),
        ));
    }
}

impl Aggregate for LedgerAccount {
    type Event = LedgerEvent;

    fn new(id: &str) -> Self {
        Self {
            root: AggregateRoot::new(id),
            state: LedgerState::default(),
        }
    }

    fn aggregate_type() -> &'static str {
        "LedgerAccount"
    }

    fn root(&self) -> &AggregateRoot<Self::Event> {
        &self.root
    }

    fn root_mut(&mut self) -> &mut AggregateRoot<Self::Event> {
        &mut self.root
    }

    fn apply(&mut self, event: &Self::Event) {
        match event {
            LedgerEvent::Deposited { amount_cents } => self.state.balance_cents += amount_cents,
            LedgerEvent::Withdrawn { amount_cents } => self.state.balance_cents -= amount_cents,
        }
        self.state.transactions += 1;
    }

    fn snapshot_state(&self) -> Result<serde_json::Value, StoreError> {
        Ok(serde_json::to_value(&self.state)?)
    }

    fn restore_from_snapshot_state(&mut self, state: &serde_json::Value) -> Result<(), StoreError> {
        self.state = serde_json::from_value(state.clone())?;
        Ok(())
    }
}
