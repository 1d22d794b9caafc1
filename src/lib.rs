#![doc(test(attr(deny(warnings))))]

//! Ledger Core records personal income and expense entries in a flat CSV ledger
//! and derives balances, category rankings, monthly summaries, and calendar views
//! from them.

pub mod cli;
pub mod config;
pub mod core;
pub mod currency;
pub mod errors;
pub mod ledger;
pub mod quotes;
pub mod storage;
pub mod utils;

pub use crate::core::services::{
    Balance, CalendarEvent, CalendarService, CategoryStatistics, EventKind, MonthlySummary,
    ServiceError, SummaryService, TransactionService,
};
pub use errors::{LedgerError, ParseWarning, ValidationError};
pub use ledger::{DateWindow, Transaction, TransactionRecord, TransactionType, TypeLabels};
pub use storage::{CsvLedgerStore, LoadReport, TransactionStore};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup debug log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::debug!("Ledger Core tracing initialized.");
    });
}
