pub mod csv_backend;

use chrono::NaiveDateTime;

use crate::{
    errors::{ParseWarning, Result},
    ledger::{DateWindow, Transaction},
};

/// Transactions read from the backing store plus the rows that had to be skipped.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub transactions: Vec<Transaction>,
    pub warnings: Vec<ParseWarning>,
}

/// Durable, ordered collection of transactions. Order is insertion order.
pub trait TransactionStore: Send + Sync {
    /// Creates the backing storage if absent. Idempotent.
    fn ensure_initialized(&self) -> Result<()>;

    /// Every readable transaction in stored order, with a warning per skipped row.
    fn load_with_report(&self) -> Result<LoadReport>;

    /// Rewrites the whole store from `transactions`, keeping their order.
    fn replace_all(&self, transactions: &[Transaction]) -> Result<()>;

    fn load_all(&self) -> Result<Vec<Transaction>> {
        Ok(self.load_with_report()?.transactions)
    }

    fn append(&self, transaction: &Transaction) -> Result<()> {
        let mut transactions = self.load_all()?;
        transactions.push(transaction.clone());
        self.replace_all(&transactions)
    }

    /// Transactions inside the inclusive window, sorted ascending by date.
    /// Same-day entries keep their stored order.
    fn load_by_range(&self, start: NaiveDateTime, end: NaiveDateTime) -> Result<Vec<Transaction>> {
        let mut matching: Vec<Transaction> = self
            .load_all()?
            .into_iter()
            .filter(|txn| txn.in_range(start, end))
            .collect();
        matching.sort_by_key(|txn| txn.date());
        tracing::debug!(%start, %end, count = matching.len(), "range query");
        Ok(matching)
    }

    fn load_window(&self, window: &DateWindow) -> Result<Vec<Transaction>> {
        self.load_by_range(window.start, window.end)
    }

    fn load_by_month(&self, year: i32, month: u32) -> Result<Vec<Transaction>> {
        let window = DateWindow::month(year, month)?;
        self.load_window(&window)
    }

    fn delete_all(&self) -> Result<()> {
        self.replace_all(&[])
    }
}

pub use csv_backend::CsvLedgerStore;
