use hourglass_rs::SafeTimeProvider;

use crate::config::ServicingConfig;
use crate::decimal::Money;
use crate::events::{Event, EventStore};
use crate::interest::InterestEngine;
use crate::model::Installment;
use crate::types::ChargeId;

/// the data a payment-code builder needs to produce a redeemable code
#[derive(Debug, Clone, PartialEq)]
pub struct ChargeRequest {
    pub charge_id: ChargeId,
    pub amount_due: Money,
    pub days_overdue: u32,
}

/// external collaborator turning a charge into a vendor-specific,
/// externally-redeemable payment code. the byte layout of the code is the
/// vendor's concern, not this crate's.
pub trait PaymentCodeBuilder {
    fn payment_code(&self, charge: &ChargeRequest) -> String;
}

/// a charge handed back to the caller for QR/code rendering
#[derive(Debug, Clone, PartialEq)]
pub struct IssuedCharge {
    pub charge_id: ChargeId,
    pub amount_due: Money,
    pub payment_code: String,
}

/// issues payment charges against installments
#[derive(Debug, Clone, Copy, Default)]
pub struct ChargeIssuer {
    engine: InterestEngine,
}

impl ChargeIssuer {
    pub fn new(config: ServicingConfig) -> Self {
        Self {
            engine: InterestEngine::new(config),
        }
    }

    /// assess the amount due as of now, associate a fresh charge id with
    /// the installment (overwriting any prior unconsumed one), and return
    /// the charge with its payment code.
    ///
    /// callers must check the installment is not already paid; this
    /// operation does not.
    pub fn issue(
        &self,
        installment: &mut Installment,
        code_builder: &dyn PaymentCodeBuilder,
        time_provider: &SafeTimeProvider,
        events: &mut EventStore,
    ) -> IssuedCharge {
        let now = time_provider.now();
        let assessment = self.engine.assess(installment, now);

        let charge_id = ChargeId::generate();
        installment.charge_id = Some(charge_id.clone());
        installment.adjusted_amount = Some(assessment.amount_due);
        installment.days_overdue = assessment.days_overdue;
        installment.status = assessment.status;

        let request = ChargeRequest {
            charge_id: charge_id.clone(),
            amount_due: assessment.amount_due,
            days_overdue: assessment.days_overdue,
        };
        let payment_code = code_builder.payment_code(&request);

        events.emit(Event::ChargeIssued {
            charge_id: charge_id.clone(),
            installment_number: installment.number,
            amount_due: assessment.amount_due,
            days_overdue: assessment.days_overdue,
            timestamp: now,
        });

        IssuedCharge {
            charge_id,
            amount_due: assessment.amount_due,
            payment_code,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::InstallmentStatus;
    use chrono::{NaiveDate, TimeZone, Utc};
    use hourglass_rs::TimeSource;

    struct StubCodeBuilder;

    impl PaymentCodeBuilder for StubCodeBuilder {
        fn payment_code(&self, charge: &ChargeRequest) -> String {
            format!("CODE|{}|{}", charge.charge_id, charge.amount_due)
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_issue_assesses_and_associates_charge() {
        let issuer = ChargeIssuer::default();
        let mut installment =
            Installment::new(2, Money::from_str_exact("1573.20").unwrap(), date(2024, 3, 1))
                .unwrap();
        let mut events = EventStore::new();
        let time = SafeTimeProvider::new(TimeSource::Test(
            Utc.with_ymd_and_hms(2024, 3, 11, 0, 0, 0).unwrap(),
        ));

        let issued = issuer.issue(&mut installment, &StubCodeBuilder, &time, &mut events);

        let expected = Money::from_str_exact("1730.52").unwrap();
        assert_eq!(issued.amount_due, expected);
        assert_eq!(
            issued.payment_code,
            format!("CODE|{}|1730.52", issued.charge_id)
        );

        assert_eq!(installment.charge_id, Some(issued.charge_id.clone()));
        assert_eq!(installment.adjusted_amount, Some(expected));
        assert_eq!(installment.days_overdue, 10);
        assert_eq!(installment.status, InstallmentStatus::Overdue);

        assert!(matches!(
            events.events(),
            [Event::ChargeIssued { installment_number: 2, days_overdue: 10, .. }]
        ));
    }

    #[test]
    fn test_reissue_overwrites_prior_charge() {
        let issuer = ChargeIssuer::default();
        let mut installment =
            Installment::new(1, Money::from_major(100), date(2024, 6, 1)).unwrap();
        let mut events = EventStore::new();
        let time = SafeTimeProvider::new(TimeSource::Test(
            Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap(),
        ));

        let first = issuer.issue(&mut installment, &StubCodeBuilder, &time, &mut events);
        let second = issuer.issue(&mut installment, &StubCodeBuilder, &time, &mut events);

        assert_ne!(first.charge_id, second.charge_id);
        assert_eq!(installment.charge_id, Some(second.charge_id));
    }

    #[test]
    fn test_pending_installment_charged_at_face_value() {
        let issuer = ChargeIssuer::default();
        let mut installment =
            Installment::new(1, Money::from_str_exact("1666.67").unwrap(), date(2024, 3, 11))
                .unwrap();
        let mut events = EventStore::new();
        let time = SafeTimeProvider::new(TimeSource::Test(
            Utc.with_ymd_and_hms(2024, 3, 11, 0, 0, 0).unwrap(),
        ));

        let issued = issuer.issue(&mut installment, &StubCodeBuilder, &time, &mut events);

        assert_eq!(issued.amount_due, Money::from_str_exact("1666.67").unwrap());
        assert_eq!(installment.status, InstallmentStatus::Pending);
        assert_eq!(installment.days_overdue, 0);
    }
}
