use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use hourglass_rs::SafeTimeProvider;
use rust_decimal::Decimal;

use crate::config::ServicingConfig;
use crate::decimal::Money;
use crate::events::{Event, EventStore};
use crate::model::{Client, Installment, Loan};
use crate::types::InstallmentStatus;

const MS_PER_DAY: i64 = 86_400_000;

/// whole days overdue from a date-only due date to an instant; any partial
/// day counts as a full day (ceiling), never negative
pub fn days_overdue(due_date: NaiveDate, as_of: DateTime<Utc>) -> u32 {
    let due = due_date.and_time(NaiveTime::MIN).and_utc();
    let elapsed_ms = (as_of - due).num_milliseconds();
    if elapsed_ms <= 0 {
        0
    } else {
        ((elapsed_ms + MS_PER_DAY - 1) / MS_PER_DAY) as u32
    }
}

/// amount owed and display status as of an evaluation instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assessment {
    pub amount_due: Money,
    pub days_overdue: u32,
    pub status: InstallmentStatus,
}

/// engine deriving the currently-owed amount for an installment
#[derive(Debug, Clone, Copy, Default)]
pub struct InterestEngine {
    pub config: ServicingConfig,
}

impl InterestEngine {
    pub fn new(config: ServicingConfig) -> Self {
        Self { config }
    }

    /// compute the amount due as of `as_of`, side-effect free.
    ///
    /// overdue installments owe simple daily interest on the face value:
    /// `face + face * daily_rate * days`, rounded half-up to cents, with no
    /// cap on accrual. paid installments are returned untouched: stored
    /// amount and days, nothing recomputed.
    pub fn assess(&self, installment: &Installment, as_of: DateTime<Utc>) -> Assessment {
        if installment.is_paid() {
            return Assessment {
                amount_due: installment.current_amount(),
                days_overdue: installment.days_overdue,
                status: InstallmentStatus::Paid,
            };
        }

        let days = days_overdue(installment.due_date, as_of);
        if days == 0 {
            return Assessment {
                amount_due: installment.face_value,
                days_overdue: 0,
                status: InstallmentStatus::Pending,
            };
        }

        let face = installment.face_value.as_decimal();
        let penalty = face * self.config.daily_penalty_rate.as_decimal() * Decimal::from(days);
        Assessment {
            amount_due: Money::from_decimal(face + penalty),
            days_overdue: days,
            status: InstallmentStatus::Overdue,
        }
    }

    /// persist the derived amount, days overdue, and status onto the
    /// record, as done on each read of a client's loans. paid installments
    /// are skipped entirely.
    pub fn refresh(
        &self,
        installment: &mut Installment,
        time_provider: &SafeTimeProvider,
        events: &mut EventStore,
    ) {
        if installment.is_paid() {
            return;
        }

        let assessment = self.assess(installment, time_provider.now());
        let fell_overdue = installment.status != InstallmentStatus::Overdue
            && assessment.status == InstallmentStatus::Overdue;

        installment.adjusted_amount = Some(assessment.amount_due);
        installment.days_overdue = assessment.days_overdue;
        installment.status = assessment.status;

        if fell_overdue {
            events.emit(Event::InstallmentFellOverdue {
                installment_number: installment.number,
                days_overdue: assessment.days_overdue,
                amount_due: assessment.amount_due,
                timestamp: time_provider.now(),
            });
        }
    }

    /// refresh every installment of a loan
    pub fn refresh_loan(
        &self,
        loan: &mut Loan,
        time_provider: &SafeTimeProvider,
        events: &mut EventStore,
    ) {
        for installment in &mut loan.installments {
            self.refresh(installment, time_provider, events);
        }
    }

    /// refresh every installment across a client's loans
    pub fn refresh_client(
        &self,
        client: &mut Client,
        time_provider: &SafeTimeProvider,
        events: &mut EventStore,
    ) {
        for loan in &mut client.loans {
            self.refresh_loan(loan, time_provider, events);
        }
    }
}
