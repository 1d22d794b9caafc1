pub mod calendar_service;
pub mod summary_service;
pub mod transaction_service;

pub use calendar_service::{CalendarEvent, CalendarPalette, CalendarService, EventKind, TradeMarkers};
pub use summary_service::{
    Balance, CategoryStatistics, CategoryTotal, MonthlySummary, SummaryService,
};
pub use transaction_service::TransactionService;

use crate::errors::{LedgerError, ValidationError};

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error("no transaction at index {index} (ledger holds {len})")]
    IndexOutOfRange { index: usize, len: usize },
}

impl From<ValidationError> for ServiceError {
    fn from(err: ValidationError) -> Self {
        ServiceError::Ledger(err.into())
    }
}
