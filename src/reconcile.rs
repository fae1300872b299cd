use chrono::NaiveDate;
use hourglass_rs::SafeTimeProvider;
use tracing::{info, warn};

use crate::config::ServicingConfig;
use crate::decimal::Money;
use crate::errors::{Result, ServicingError};
use crate::events::{Event, EventStore};
use crate::repository::LoanRepository;
use crate::types::{ChargeId, LoanId, TaxId};

/// inbound notification that a payment was received against a charge
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentNotification {
    pub charge_id: ChargeId,
    pub amount_received: Money,
    /// settlement identifier supplied by the payment network
    pub end_to_end_id: Option<String>,
}

/// outcome of reconciling a single notification. misses are outcomes, not
/// errors: the caller logs and moves on.
#[derive(Debug, Clone, PartialEq)]
pub enum ReconciliationOutcome {
    /// matched an unpaid installment and the amount was sufficient
    Settled {
        charge_id: ChargeId,
        loan_id: LoanId,
        installment_number: u32,
        amount_received: Money,
        paid_on: NaiveDate,
    },
    /// no unpaid installment carries this charge id; also the redelivery
    /// outcome once an installment is paid
    NotFound {
        charge_id: ChargeId,
    },
    /// matched, but the amount fell below the acceptance threshold; the
    /// installment remains unpaid for manual follow-up
    InsufficientAmount {
        charge_id: ChargeId,
        expected_minimum: Money,
        amount_received: Money,
    },
}

impl ReconciliationOutcome {
    pub fn is_settled(&self) -> bool {
        matches!(self, ReconciliationOutcome::Settled { .. })
    }
}

/// matches inbound payment notifications to unpaid installments
#[derive(Debug, Clone, Copy, Default)]
pub struct Reconciler {
    pub config: ServicingConfig,
}

impl Reconciler {
    pub fn new(config: ServicingConfig) -> Self {
        Self { config }
    }

    /// reconcile one notification against the repository.
    ///
    /// the lookup predicate excludes paid installments, so redelivering a
    /// consumed notification yields `NotFound` instead of a double credit.
    /// a payment is sufficient when it reaches the acceptance threshold
    /// (default 95%) of the expected amount, where the expected amount is
    /// the adjusted amount computed at charge issuance, falling back to
    /// the face value.
    pub fn reconcile(
        &self,
        notification: &PaymentNotification,
        repository: &mut dyn LoanRepository,
        time_provider: &SafeTimeProvider,
        events: &mut EventStore,
    ) -> Result<ReconciliationOutcome> {
        if !notification.amount_received.is_positive() {
            return Err(ServicingError::InvalidAmountReceived {
                amount: notification.amount_received,
            });
        }

        let now = time_provider.now();
        let Some(matched) = repository.find_installment_by_charge_id(&notification.charge_id)?
        else {
            warn!(
                charge_id = %notification.charge_id,
                amount = %notification.amount_received,
                "payment notification matched no unpaid installment"
            );
            events.emit(Event::PaymentUnmatched {
                charge_id: notification.charge_id.clone(),
                amount_received: notification.amount_received,
                timestamp: now,
            });
            return Ok(ReconciliationOutcome::NotFound {
                charge_id: notification.charge_id.clone(),
            });
        };

        let mut client = matched.client;
        let installment = client.installment_mut(matched.loan_id, matched.installment_number)?;

        let expected = installment.current_amount();
        let minimum = expected * self.config.acceptance_threshold.as_decimal();
        if notification.amount_received < minimum {
            warn!(
                charge_id = %notification.charge_id,
                expected_minimum = %minimum,
                received = %notification.amount_received,
                "payment below acceptance threshold, holding for manual review"
            );
            events.emit(Event::PaymentBelowMinimum {
                charge_id: notification.charge_id.clone(),
                loan_id: matched.loan_id,
                installment_number: matched.installment_number,
                expected_minimum: minimum,
                amount_received: notification.amount_received,
                timestamp: now,
            });
            return Ok(ReconciliationOutcome::InsufficientAmount {
                charge_id: notification.charge_id.clone(),
                expected_minimum: minimum,
                amount_received: notification.amount_received,
            });
        }

        let paid_on = now.date_naive();
        installment.mark_paid(paid_on, notification.end_to_end_id.clone())?;
        repository.save_client(&client)?;

        info!(
            charge_id = %notification.charge_id,
            installment = matched.installment_number,
            amount = %notification.amount_received,
            "installment settled by payment notification"
        );
        events.emit(Event::PaymentReconciled {
            charge_id: notification.charge_id.clone(),
            loan_id: matched.loan_id,
            installment_number: matched.installment_number,
            amount_received: notification.amount_received,
            end_to_end_id: notification.end_to_end_id.clone(),
            paid_on,
            timestamp: now,
        });

        Ok(ReconciliationOutcome::Settled {
            charge_id: notification.charge_id.clone(),
            loan_id: matched.loan_id,
            installment_number: matched.installment_number,
            amount_received: notification.amount_received,
            paid_on,
        })
    }

    /// reconcile a batch of notifications independently and sequentially;
    /// a failure on one never aborts the siblings
    pub fn reconcile_batch(
        &self,
        notifications: &[PaymentNotification],
        repository: &mut dyn LoanRepository,
        time_provider: &SafeTimeProvider,
        events: &mut EventStore,
    ) -> Vec<Result<ReconciliationOutcome>> {
        notifications
            .iter()
            .map(|n| self.reconcile(n, repository, time_provider, events))
            .collect()
    }

    /// admin path into `Paid`: same terminal transition as reconciliation,
    /// without a settlement identifier
    pub fn settle_manually(
        &self,
        tax_id: &TaxId,
        loan_id: LoanId,
        installment_number: u32,
        repository: &mut dyn LoanRepository,
        time_provider: &SafeTimeProvider,
        events: &mut EventStore,
    ) -> Result<()> {
        let mut client = repository
            .find_client_by_tax_id(tax_id)?
            .ok_or_else(|| ServicingError::ClientNotFound {
                tax_id: tax_id.clone(),
            })?;

        let now = time_provider.now();
        let paid_on = now.date_naive();
        client
            .installment_mut(loan_id, installment_number)?
            .mark_paid(paid_on, None)?;
        repository.save_client(&client)?;

        events.emit(Event::InstallmentSettledManually {
            loan_id,
            installment_number,
            paid_on,
            timestamp: now,
        });
        Ok(())
    }
}
