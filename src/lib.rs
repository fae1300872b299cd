pub mod charges;
pub mod config;
pub mod decimal;
pub mod errors;
pub mod events;
pub mod interest;
pub mod model;
pub mod reconcile;
pub mod repository;
pub mod types;

// re-export key types
pub use charges::{ChargeIssuer, ChargeRequest, IssuedCharge, PaymentCodeBuilder};
pub use config::ServicingConfig;
pub use decimal::{Money, Rate};
pub use errors::{Result, ServicingError};
pub use events::{Event, EventStore};
pub use interest::{days_overdue, Assessment, InterestEngine};
pub use model::{Client, Installment, Loan};
pub use reconcile::{PaymentNotification, ReconciliationOutcome, Reconciler};
pub use repository::{ChargeMatch, JsonFileRepository, LoanRepository, MemoryRepository};
pub use types::{ChargeId, InstallmentStatus, LoanId, TaxId};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
