use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::types::{ChargeId, LoanId};

/// all events emitted by the servicing operations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    // charge lifecycle
    ChargeIssued {
        charge_id: ChargeId,
        installment_number: u32,
        amount_due: Money,
        days_overdue: u32,
        timestamp: DateTime<Utc>,
    },

    // reconciliation outcomes
    PaymentReconciled {
        charge_id: ChargeId,
        loan_id: LoanId,
        installment_number: u32,
        amount_received: Money,
        end_to_end_id: Option<String>,
        paid_on: NaiveDate,
        timestamp: DateTime<Utc>,
    },
    PaymentUnmatched {
        charge_id: ChargeId,
        amount_received: Money,
        timestamp: DateTime<Utc>,
    },
    PaymentBelowMinimum {
        charge_id: ChargeId,
        loan_id: LoanId,
        installment_number: u32,
        expected_minimum: Money,
        amount_received: Money,
        timestamp: DateTime<Utc>,
    },
    InstallmentSettledManually {
        loan_id: LoanId,
        installment_number: u32,
        paid_on: NaiveDate,
        timestamp: DateTime<Utc>,
    },

    // status derivation
    InstallmentFellOverdue {
        installment_number: u32,
        days_overdue: u32,
        amount_due: Money,
        timestamp: DateTime<Utc>,
    },
}

/// event store for collecting events during operations
#[derive(Debug, Default)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    /// drain collected events, leaving the store empty
    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
