pub mod entry_service;
pub mod summary_service;

pub use entry_service::EntryService;
pub use summary_service::{FixedMetrics, SummaryReport, SummaryService, SummaryView};

use crate::core::errors::SummaryError;
use crate::domain::{RangeError, ValidationError};
use crate::errors::LedgerError;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Summary(#[from] SummaryError),
}

impl From<RangeError> for ServiceError {
    fn from(err: RangeError) -> Self {
        ServiceError::Summary(SummaryError::InvalidRange(err))
    }
}
