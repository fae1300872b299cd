pub mod file;
pub mod memory;

pub use file::JsonFileRepository;
pub use memory::MemoryRepository;

use crate::errors::Result;
use crate::model::Client;
use crate::types::{ChargeId, LoanId, TaxId};

/// a matched charge: the owning client plus the coordinates of the
/// installment carrying the charge id
#[derive(Debug, Clone, PartialEq)]
pub struct ChargeMatch {
    pub client: Client,
    pub loan_id: LoanId,
    pub installment_number: u32,
}

/// capability interface over client/loan storage. the engines depend only
/// on this trait, never on a concrete storage technology.
///
/// the model is read-full-record, mutate in memory, write-full-record back;
/// last write wins. at most one in-flight mutation per installment is
/// assumed.
pub trait LoanRepository {
    /// look up a client by their immutable tax id
    fn find_client_by_tax_id(&self, tax_id: &TaxId) -> Result<Option<Client>>;

    /// first installment across all clients whose stored charge id matches
    /// and whose status is not `Paid`; a consumed charge never matches again
    fn find_installment_by_charge_id(&self, charge_id: &ChargeId) -> Result<Option<ChargeMatch>>;

    /// write a client record back, replacing any stored record with the
    /// same tax id
    fn save_client(&mut self, client: &Client) -> Result<()>;
}
