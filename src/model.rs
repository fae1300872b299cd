use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::Money;
use crate::errors::{Result, ServicingError};
use crate::types::{ChargeId, InstallmentStatus, LoanId, TaxId};

/// one scheduled payment obligation within a loan ("boleto")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Installment {
    /// 1-based sequence number, unique within the loan
    pub number: u32,
    /// originally contracted amount, before interest
    pub face_value: Money,
    pub due_date: NaiveDate,
    pub status: InstallmentStatus,

    // populated once a charge is issued or the installment is settled
    pub charge_id: Option<ChargeId>,
    /// amount owed as of the last assessment, face value plus accrued penalty
    pub adjusted_amount: Option<Money>,
    pub days_overdue: u32,
    pub paid_on: Option<NaiveDate>,
    /// identifier supplied by the payment network confirming the transfer
    pub end_to_end_id: Option<String>,
}

impl Installment {
    pub fn new(number: u32, face_value: Money, due_date: NaiveDate) -> Result<Self> {
        if !face_value.is_positive() {
            return Err(ServicingError::InvalidFaceValue { amount: face_value });
        }
        Ok(Self {
            number,
            face_value,
            due_date,
            status: InstallmentStatus::Pending,
            charge_id: None,
            adjusted_amount: None,
            days_overdue: 0,
            paid_on: None,
            end_to_end_id: None,
        })
    }

    /// amount currently expected for this installment: the adjusted amount
    /// computed at the last assessment, falling back to the face value
    pub fn current_amount(&self) -> Money {
        self.adjusted_amount.unwrap_or(self.face_value)
    }

    pub fn is_paid(&self) -> bool {
        self.status.is_paid()
    }

    /// the single transition into `Paid`; terminal, fails on redelivery
    pub fn mark_paid(&mut self, paid_on: NaiveDate, end_to_end_id: Option<String>) -> Result<()> {
        if self.is_paid() {
            return Err(ServicingError::InstallmentAlreadyPaid { number: self.number });
        }
        self.status = InstallmentStatus::Paid;
        self.paid_on = Some(paid_on);
        self.end_to_end_id = end_to_end_id;
        Ok(())
    }
}

/// a contracted loan owning its installment schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    pub id: LoanId,
    /// total contracted principal
    pub principal: Money,
    pub installment_count: u32,
    pub contracted_on: NaiveDate,
    pub installments: Vec<Installment>,
}

impl Loan {
    /// build a loan from an explicit schedule, enforcing the invariants:
    /// numbers are exactly 1..=n and the face values sum to the principal
    /// within one cent per installment
    pub fn new(
        principal: Money,
        contracted_on: NaiveDate,
        installments: Vec<Installment>,
    ) -> Result<Self> {
        if installments.is_empty() {
            return Err(ServicingError::InvalidSchedule {
                message: "loan requires at least one installment".to_string(),
            });
        }
        for (i, installment) in installments.iter().enumerate() {
            if installment.number != (i + 1) as u32 {
                return Err(ServicingError::DuplicateInstallmentNumber {
                    number: installment.number,
                });
            }
        }

        let scheduled = installments
            .iter()
            .fold(Money::ZERO, |acc, i| acc + i.face_value);
        let tolerance = Money::from_minor(installments.len() as i64);
        if (scheduled - principal).abs() > tolerance {
            return Err(ServicingError::PrincipalMismatch { principal, scheduled });
        }

        Ok(Self {
            id: Uuid::new_v4(),
            principal,
            installment_count: installments.len() as u32,
            contracted_on,
            installments,
        })
    }

    /// build an equal-installment monthly schedule; the last installment
    /// absorbs the rounding remainder so the schedule sums to the principal
    pub fn schedule(
        principal: Money,
        count: u32,
        contracted_on: NaiveDate,
        first_due: NaiveDate,
    ) -> Result<Self> {
        if count == 0 {
            return Err(ServicingError::InvalidSchedule {
                message: "installment count must be at least 1".to_string(),
            });
        }
        if !principal.is_positive() {
            return Err(ServicingError::InvalidSchedule {
                message: format!("principal must be positive, got {principal}"),
            });
        }

        let per = Money::from_decimal(principal.as_decimal() / Decimal::from(count));
        let mut installments = Vec::with_capacity(count as usize);
        for i in 0..count {
            let due_date = first_due
                .checked_add_months(Months::new(i))
                .ok_or_else(|| ServicingError::InvalidSchedule {
                    message: format!("due date overflow at installment {}", i + 1),
                })?;
            let face_value = if i + 1 == count {
                principal - per * Decimal::from(count - 1)
            } else {
                per
            };
            installments.push(Installment::new(i + 1, face_value, due_date)?);
        }

        Loan::new(principal, contracted_on, installments)
    }

    pub fn installment(&self, number: u32) -> Option<&Installment> {
        self.installments.iter().find(|i| i.number == number)
    }

    pub fn installment_mut(&mut self, number: u32) -> Option<&mut Installment> {
        self.installments.iter_mut().find(|i| i.number == number)
    }

    /// total still owed across unpaid installments, at current amounts
    pub fn outstanding(&self) -> Money {
        self.installments
            .iter()
            .filter(|i| !i.is_paid())
            .fold(Money::ZERO, |acc, i| acc + i.current_amount())
    }
}

/// a client owning its loans; the tax id never changes once created
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    tax_id: TaxId,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub loans: Vec<Loan>,
}

impl Client {
    pub fn new(tax_id: TaxId, name: impl Into<String>) -> Self {
        Self {
            tax_id,
            name: name.into(),
            phone: None,
            email: None,
            loans: Vec::new(),
        }
    }

    pub fn tax_id(&self) -> &TaxId {
        &self.tax_id
    }

    pub fn loan(&self, id: LoanId) -> Option<&Loan> {
        self.loans.iter().find(|l| l.id == id)
    }

    pub fn loan_mut(&mut self, id: LoanId) -> Option<&mut Loan> {
        self.loans.iter_mut().find(|l| l.id == id)
    }

    pub fn installment_mut(&mut self, loan_id: LoanId, number: u32) -> Result<&mut Installment> {
        let loan = self
            .loan_mut(loan_id)
            .ok_or(ServicingError::LoanNotFound { id: loan_id })?;
        loan.installment_mut(number)
            .ok_or(ServicingError::InstallmentNotFound { loan_id, number })
    }

    /// first unpaid installment carrying the given charge id; paid
    /// installments are excluded so a consumed charge never matches again
    pub fn locate_charge(&self, charge_id: &ChargeId) -> Option<(LoanId, u32)> {
        for loan in &self.loans {
            for installment in &loan.installments {
                if installment.is_paid() {
                    continue;
                }
                if installment.charge_id.as_ref() == Some(charge_id) {
                    return Some((loan.id, installment.number));
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_installment_rejects_non_positive_face_value() {
        assert!(Installment::new(1, Money::ZERO, date(2024, 1, 10)).is_err());
        assert!(Installment::new(1, Money::from_major(-5), date(2024, 1, 10)).is_err());
        assert!(Installment::new(1, Money::from_minor(1), date(2024, 1, 10)).is_ok());
    }

    #[test]
    fn test_paid_is_terminal() {
        let mut installment =
            Installment::new(1, Money::from_major(100), date(2024, 1, 10)).unwrap();
        installment
            .mark_paid(date(2024, 1, 12), Some("E2E123".to_string()))
            .unwrap();

        assert!(installment.is_paid());
        assert_eq!(installment.paid_on, Some(date(2024, 1, 12)));

        let err = installment.mark_paid(date(2024, 1, 13), None).unwrap_err();
        assert!(matches!(
            err,
            ServicingError::InstallmentAlreadyPaid { number: 1 }
        ));
        // first settlement untouched
        assert_eq!(installment.paid_on, Some(date(2024, 1, 12)));
        assert_eq!(installment.end_to_end_id.as_deref(), Some("E2E123"));
    }

    #[test]
    fn test_schedule_sums_to_principal() {
        let loan = Loan::schedule(
            Money::from_major(5_000),
            3,
            date(2024, 1, 1),
            date(2024, 2, 10),
        )
        .unwrap();

        assert_eq!(loan.installment_count, 3);
        // 5000 / 3 = 1666.67 per installment, last absorbs the remainder
        assert_eq!(loan.installments[0].face_value, Money::from_str_exact("1666.67").unwrap());
        assert_eq!(loan.installments[1].face_value, Money::from_str_exact("1666.67").unwrap());
        assert_eq!(loan.installments[2].face_value, Money::from_str_exact("1666.66").unwrap());

        let sum = loan
            .installments
            .iter()
            .fold(Money::ZERO, |acc, i| acc + i.face_value);
        assert_eq!(sum, loan.principal);
    }

    #[test]
    fn test_schedule_monthly_due_dates() {
        let loan = Loan::schedule(
            Money::from_major(900),
            3,
            date(2024, 1, 5),
            date(2024, 1, 31),
        )
        .unwrap();

        assert_eq!(loan.installments[0].due_date, date(2024, 1, 31));
        // clamped to the end of shorter months
        assert_eq!(loan.installments[1].due_date, date(2024, 2, 29));
        assert_eq!(loan.installments[2].due_date, date(2024, 3, 31));
    }

    #[test]
    fn test_loan_rejects_principal_mismatch() {
        let installments = vec![
            Installment::new(1, Money::from_major(100), date(2024, 1, 10)).unwrap(),
            Installment::new(2, Money::from_major(100), date(2024, 2, 10)).unwrap(),
        ];
        let err = Loan::new(Money::from_major(300), date(2024, 1, 1), installments).unwrap_err();
        assert!(matches!(err, ServicingError::PrincipalMismatch { .. }));
    }

    #[test]
    fn test_loan_tolerates_cent_rounding() {
        // 1666.67 * 3 = 5000.01, one cent over a 5000.00 principal
        let installments = (1..=3)
            .map(|n| {
                Installment::new(n, Money::from_str_exact("1666.67").unwrap(), date(2024, n, 10))
                    .unwrap()
            })
            .collect();
        assert!(Loan::new(Money::from_major(5_000), date(2024, 1, 1), installments).is_ok());
    }

    #[test]
    fn test_loan_rejects_bad_numbering() {
        let installments = vec![
            Installment::new(1, Money::from_major(100), date(2024, 1, 10)).unwrap(),
            Installment::new(3, Money::from_major(100), date(2024, 2, 10)).unwrap(),
        ];
        let err = Loan::new(Money::from_major(200), date(2024, 1, 1), installments).unwrap_err();
        assert!(matches!(
            err,
            ServicingError::DuplicateInstallmentNumber { number: 3 }
        ));
    }

    #[test]
    fn test_locate_charge_skips_paid() {
        let mut loan = Loan::schedule(
            Money::from_major(200),
            2,
            date(2024, 1, 1),
            date(2024, 2, 10),
        )
        .unwrap();
        let charge = ChargeId::generate();
        loan.installments[0].charge_id = Some(charge.clone());

        let mut client = Client::new(TaxId::new("12345678901").unwrap(), "Maria");
        client.loans.push(loan);
        let loan_id = client.loans[0].id;

        assert_eq!(client.locate_charge(&charge), Some((loan_id, 1)));

        client
            .installment_mut(loan_id, 1)
            .unwrap()
            .mark_paid(date(2024, 2, 11), None)
            .unwrap();
        assert_eq!(client.locate_charge(&charge), None);
    }
}
