use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::errors::{Result, ServicingError};

/// unique identifier for a loan
pub type LoanId = Uuid;

/// national tax id, 11 digits, immutable once created
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaxId(String);

impl TaxId {
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        if value.len() != 11 || !value.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ServicingError::InvalidTaxId { value });
        }
        Ok(TaxId(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for TaxId {
    type Err = ServicingError;

    fn from_str(s: &str) -> Result<Self> {
        TaxId::new(s)
    }
}

impl fmt::Display for TaxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// opaque charge identifier ("txid") correlating a payment request
/// with its settlement notification
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChargeId(String);

impl ChargeId {
    /// wrap an externally supplied identifier
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        if value.is_empty() {
            return Err(ServicingError::InvalidChargeId);
        }
        Ok(ChargeId(value))
    }

    /// generate a fresh 32-char hex identifier
    pub fn generate() -> Self {
        ChargeId(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChargeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// installment lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstallmentStatus {
    /// not yet due
    Pending,
    /// past due date, penalty interest accruing; derived on read
    Overdue,
    /// settled; terminal
    Paid,
}

impl InstallmentStatus {
    pub fn is_paid(&self) -> bool {
        matches!(self, InstallmentStatus::Paid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tax_id_accepts_eleven_digits() {
        let id = TaxId::new("12345678901").unwrap();
        assert_eq!(id.as_str(), "12345678901");
    }

    #[test]
    fn test_tax_id_rejects_bad_input() {
        assert!(TaxId::new("1234567890").is_err()); // 10 digits
        assert!(TaxId::new("123456789012").is_err()); // 12 digits
        assert!(TaxId::new("1234567890a").is_err()); // non-digit
        assert!(TaxId::new("123.456.789").is_err());
    }

    #[test]
    fn test_charge_id_generation_is_opaque_hex() {
        let id = ChargeId::generate();
        assert_eq!(id.as_str().len(), 32);
        assert!(id.as_str().chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(id, ChargeId::generate());
    }

    #[test]
    fn test_charge_id_rejects_empty() {
        assert!(ChargeId::new("").is_err());
        assert!(ChargeId::new("tx-abc123").is_ok());
    }
}
