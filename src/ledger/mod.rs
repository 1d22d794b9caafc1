//! Ledger domain models, persistence-friendly types, and helpers.

pub mod category;
pub mod transaction;
pub mod window;

pub use category::{is_suggested, CategoryKind, EXPENSE_CATEGORIES, INCOME_CATEGORIES};
pub use transaction::{
    parse_amount, parse_date, Transaction, TransactionRecord, TransactionType, TypeLabels,
    RECORD_HEADERS,
};
pub use window::DateWindow;
