use std::collections::BTreeMap;

use crate::errors::Result;
use crate::model::Client;
use crate::types::{ChargeId, TaxId};

use super::{ChargeMatch, LoanRepository};

/// in-process repository, keyed by tax id
#[derive(Debug, Default)]
pub struct MemoryRepository {
    clients: BTreeMap<TaxId, Client>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    pub fn clients(&self) -> impl Iterator<Item = &Client> {
        self.clients.values()
    }
}

impl LoanRepository for MemoryRepository {
    fn find_client_by_tax_id(&self, tax_id: &TaxId) -> Result<Option<Client>> {
        Ok(self.clients.get(tax_id).cloned())
    }

    fn find_installment_by_charge_id(&self, charge_id: &ChargeId) -> Result<Option<ChargeMatch>> {
        for client in self.clients.values() {
            if let Some((loan_id, installment_number)) = client.locate_charge(charge_id) {
                return Ok(Some(ChargeMatch {
                    client: client.clone(),
                    loan_id,
                    installment_number,
                }));
            }
        }
        Ok(None)
    }

    fn save_client(&mut self, client: &Client) -> Result<()> {
        self.clients.insert(client.tax_id().clone(), client.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::Money;
    use crate::model::Loan;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn seeded_client(tax: &str) -> Client {
        let mut client = Client::new(TaxId::new(tax).unwrap(), "João");
        client.loans.push(
            Loan::schedule(Money::from_major(600), 2, date(2024, 1, 1), date(2024, 2, 10))
                .unwrap(),
        );
        client
    }

    #[test]
    fn test_save_and_find_by_tax_id() {
        let mut repo = MemoryRepository::new();
        let client = seeded_client("12345678901");
        repo.save_client(&client).unwrap();

        let found = repo
            .find_client_by_tax_id(&TaxId::new("12345678901").unwrap())
            .unwrap()
            .unwrap();
        assert_eq!(found, client);

        assert!(repo
            .find_client_by_tax_id(&TaxId::new("00000000000").unwrap())
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_save_replaces_existing_record() {
        let mut repo = MemoryRepository::new();
        let mut client = seeded_client("12345678901");
        repo.save_client(&client).unwrap();

        client.name = "João Silva".to_string();
        repo.save_client(&client).unwrap();

        assert_eq!(repo.len(), 1);
        let found = repo.find_client_by_tax_id(client.tax_id()).unwrap().unwrap();
        assert_eq!(found.name, "João Silva");
    }

    #[test]
    fn test_find_by_charge_id_excludes_paid() {
        let mut repo = MemoryRepository::new();
        let mut client = seeded_client("12345678901");
        let loan_id = client.loans[0].id;
        let charge = ChargeId::generate();
        client.loans[0].installments[0].charge_id = Some(charge.clone());
        repo.save_client(&client).unwrap();

        let matched = repo.find_installment_by_charge_id(&charge).unwrap().unwrap();
        assert_eq!(matched.loan_id, loan_id);
        assert_eq!(matched.installment_number, 1);

        client
            .installment_mut(loan_id, 1)
            .unwrap()
            .mark_paid(date(2024, 2, 11), None)
            .unwrap();
        repo.save_client(&client).unwrap();

        assert!(repo.find_installment_by_charge_id(&charge).unwrap().is_none());
    }
}
