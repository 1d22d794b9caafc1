use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::{
    ledger::{DateWindow, Transaction, TransactionType},
    storage::TransactionStore,
};

use super::ServiceResult;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Balance {
    pub income: Decimal,
    pub expense: Decimal,
    pub balance: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub amount: Decimal,
}

/// Per-category sums ranked by amount, largest first. Equal sums keep the order in
/// which their categories were first encountered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CategoryStatistics {
    entries: Vec<CategoryTotal>,
}

impl CategoryStatistics {
    pub fn get(&self, category: &str) -> Option<Decimal> {
        self.entries
            .iter()
            .find(|entry| entry.category == category)
            .map(|entry| entry.amount)
    }

    pub fn contains(&self, category: &str) -> bool {
        self.get(category).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CategoryTotal> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Saturates at `Decimal::MAX`.
    pub fn total(&self) -> Decimal {
        self.entries
            .iter()
            .fold(Decimal::ZERO, |sum, entry| sum.saturating_add(entry.amount))
    }

    pub fn into_vec(self) -> Vec<CategoryTotal> {
        self.entries
    }
}

impl<'a> IntoIterator for &'a CategoryStatistics {
    type Item = &'a CategoryTotal;
    type IntoIter = std::slice::Iter<'a, CategoryTotal>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlySummary {
    pub year: i32,
    pub month: u32,
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub balance: Decimal,
    pub income_by_category: CategoryStatistics,
    pub expense_by_category: CategoryStatistics,
    pub transaction_count: usize,
}

/// Balance, category, and period aggregations over transaction collections.
pub struct SummaryService;

impl SummaryService {
    /// Totals saturate at `Decimal::MAX` instead of overflowing.
    pub fn calculate_balance(transactions: &[Transaction]) -> Balance {
        let mut totals = Balance::default();
        for txn in transactions {
            match txn.transaction_type() {
                TransactionType::Income => {
                    totals.income = totals.income.saturating_add(txn.amount())
                }
                TransactionType::Expense => {
                    totals.expense = totals.expense.saturating_add(txn.amount())
                }
            }
        }
        totals.balance = totals.income.saturating_sub(totals.expense);
        totals
    }

    /// Sums amounts per category, optionally restricted to one transaction type.
    pub fn category_statistics(
        transactions: &[Transaction],
        filter: Option<TransactionType>,
    ) -> CategoryStatistics {
        let mut positions: HashMap<&str, usize> = HashMap::new();
        let mut entries: Vec<CategoryTotal> = Vec::new();
        for txn in transactions {
            if filter.is_some_and(|kind| kind != txn.transaction_type()) {
                continue;
            }
            match positions.get(txn.category()) {
                Some(&index) => {
                    let entry = &mut entries[index];
                    entry.amount = entry.amount.saturating_add(txn.amount());
                }
                None => {
                    positions.insert(txn.category(), entries.len());
                    entries.push(CategoryTotal {
                        category: txn.category().to_string(),
                        amount: txn.amount(),
                    });
                }
            }
        }
        // stable: ties stay in encounter order
        entries.sort_by(|a, b| b.amount.cmp(&a.amount));
        CategoryStatistics { entries }
    }

    /// Composes the month's balance, per-type category breakdowns, and count.
    pub fn summarize(year: i32, month: u32, transactions: &[Transaction]) -> MonthlySummary {
        let balance = Self::calculate_balance(transactions);
        MonthlySummary {
            year,
            month,
            total_income: balance.income,
            total_expense: balance.expense,
            balance: balance.balance,
            income_by_category: Self::category_statistics(
                transactions,
                Some(TransactionType::Income),
            ),
            expense_by_category: Self::category_statistics(
                transactions,
                Some(TransactionType::Expense),
            ),
            transaction_count: transactions.len(),
        }
    }

    pub fn monthly_summary(
        store: &dyn TransactionStore,
        year: i32,
        month: u32,
    ) -> ServiceResult<MonthlySummary> {
        let transactions = store.load_by_month(year, month)?;
        Ok(Self::summarize(year, month, &transactions))
    }

    /// Transactions dated on `date`, `00:00:00` through `23:59:59` inclusive.
    pub fn daily_transactions(
        store: &dyn TransactionStore,
        date: NaiveDate,
    ) -> ServiceResult<Vec<Transaction>> {
        Ok(store.load_window(&DateWindow::day(date))?)
    }
}
