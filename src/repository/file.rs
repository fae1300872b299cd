use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::errors::{Result, ServicingError};
use crate::model::Client;
use crate::types::{ChargeId, TaxId};

use super::{ChargeMatch, LoanRepository};

/// whole-file JSON persistence: the client list is loaded on open and the
/// complete file is rewritten on every save. a missing file loads as empty.
#[derive(Debug)]
pub struct JsonFileRepository {
    path: PathBuf,
    clients: BTreeMap<TaxId, Client>,
}

impl JsonFileRepository {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let clients = if path.exists() {
            let raw = fs::read_to_string(&path).map_err(|e| ServicingError::Storage {
                message: format!("read {}: {e}", path.display()),
            })?;
            let list: Vec<Client> =
                serde_json::from_str(&raw).map_err(|e| ServicingError::Storage {
                    message: format!("parse {}: {e}", path.display()),
                })?;
            list.into_iter()
                .map(|c| (c.tax_id().clone(), c))
                .collect()
        } else {
            BTreeMap::new()
        };

        debug!(path = %path.display(), clients = clients.len(), "opened repository");
        Ok(Self { path, clients })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    fn persist(&self) -> Result<()> {
        let list: Vec<&Client> = self.clients.values().collect();
        let raw = serde_json::to_string_pretty(&list).map_err(|e| ServicingError::Storage {
            message: format!("serialize clients: {e}"),
        })?;
        fs::write(&self.path, raw).map_err(|e| ServicingError::Storage {
            message: format!("write {}: {e}", self.path.display()),
        })
    }
}

impl LoanRepository for JsonFileRepository {
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
        self.persist()
    }
}
