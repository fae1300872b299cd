use thiserror::Error;

use crate::decimal::Money;
use crate::types::{LoanId, TaxId};

#[derive(Error, Debug)]
pub enum ServicingError {
    #[error("invalid tax id: {value:?} (expected 11 digits)")]
    InvalidTaxId {
        value: String,
    },

    #[error("invalid face value: {amount}")]
    InvalidFaceValue {
        amount: Money,
    },

    #[error("invalid amount received: {amount}")]
    InvalidAmountReceived {
        amount: Money,
    },

    #[error("invalid charge id: must not be empty")]
    InvalidChargeId,

    #[error("installment {number} is already paid")]
    InstallmentAlreadyPaid {
        number: u32,
    },

    #[error("installment count mismatch: expected {expected}, got {actual}")]
    InstallmentCountMismatch {
        expected: u32,
        actual: usize,
    },

    #[error("duplicate or out-of-sequence installment number: {number}")]
    DuplicateInstallmentNumber {
        number: u32,
    },

    #[error("installment sum {scheduled} does not match loan principal {principal}")]
    PrincipalMismatch {
        principal: Money,
        scheduled: Money,
    },

    #[error("invalid schedule: {message}")]
    InvalidSchedule {
        message: String,
    },

    #[error("client not found: {tax_id}")]
    ClientNotFound {
        tax_id: TaxId,
    },

    #[error("loan not found: {id}")]
    LoanNotFound {
        id: LoanId,
    },

    #[error("installment {number} not found in loan {loan_id}")]
    InstallmentNotFound {
        loan_id: LoanId,
        number: u32,
    },

    #[error("storage error: {message}")]
    Storage {
        message: String,
    },
}

pub type Result<T> = std::result::Result<T, ServicingError>;
