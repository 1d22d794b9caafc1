use crate::{ledger::Transaction, storage::TransactionStore};

use super::{ServiceError, ServiceResult};

/// Position-addressed edits over the stored collection. Every edit rewrites the
/// whole store; an out-of-range index leaves it untouched.
pub struct TransactionService;

impl TransactionService {
    pub fn record(store: &dyn TransactionStore, txn: &Transaction) -> ServiceResult<()> {
        store.append(txn)?;
        tracing::info!(date = %txn.date(), category = txn.category(), "recorded transaction");
        Ok(())
    }

    /// Replaces the entry at `index` and returns the previous one.
    pub fn update_at(
        store: &dyn TransactionStore,
        index: usize,
        txn: Transaction,
    ) -> ServiceResult<Transaction> {
        let mut transactions = store.load_all()?;
        let len = transactions.len();
        let slot = transactions
            .get_mut(index)
            .ok_or(ServiceError::IndexOutOfRange { index, len })?;
        let previous = std::mem::replace(slot, txn);
        store.replace_all(&transactions)?;
        Ok(previous)
    }

    /// Removes the entry at `index` and returns it.
    pub fn delete_at(store: &dyn TransactionStore, index: usize) -> ServiceResult<Transaction> {
        let mut transactions = store.load_all()?;
        if index >= transactions.len() {
            return Err(ServiceError::IndexOutOfRange {
                index,
                len: transactions.len(),
            });
        }
        let removed = transactions.remove(index);
        store.replace_all(&transactions)?;
        Ok(removed)
    }

    pub fn clear(store: &dyn TransactionStore) -> ServiceResult<()> {
        store.delete_all()?;
        tracing::info!("deleted all transactions");
        Ok(())
    }
}
