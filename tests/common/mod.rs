#![allow(dead_code)]

use std::{
    fs,
    path::PathBuf,
    sync::Mutex,
};

use chrono::NaiveDate;
use ledger_core::{CsvLedgerStore, Transaction, TransactionStore};
use once_cell::sync::Lazy;
use rust_decimal_macros::dec;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// A fresh directory that outlives the calling test.
pub fn test_dir() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

/// A store pointing at `<tmp>/data/ledger.csv`; the file is not created.
pub fn setup_store() -> CsvLedgerStore {
    CsvLedgerStore::new(test_dir().join("data").join("ledger.csv"))
}

/// A store whose file holds exactly `contents`.
pub fn store_with_file(contents: &str) -> CsvLedgerStore {
    let store = setup_store();
    fs::create_dir_all(store.path().parent().expect("ledger parent")).expect("create data dir");
    fs::write(store.path(), contents).expect("write ledger fixture");
    store
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

/// Salary, lunch, bus fare, and a February dinner.
pub fn sample_transactions() -> Vec<Transaction> {
    vec![
        Transaction::income(date(2024, 1, 15), "급여", dec!(3000000), "월급").unwrap(),
        Transaction::expense(date(2024, 1, 16), "식비", dec!(15000), "점심").unwrap(),
        Transaction::expense(date(2024, 1, 16), "교통비", dec!(5000), "버스").unwrap(),
        Transaction::income(date(2024, 2, 1), "용돈", dec!(100000), "").unwrap(),
    ]
}

pub fn seeded_store() -> CsvLedgerStore {
    let store = setup_store();
    store
        .replace_all(&sample_transactions())
        .expect("seed ledger");
    store
}

/// Four January entries: two incomes totalling 3,100,000 and two expenses totalling 20,000.
pub fn january_transactions() -> Vec<Transaction> {
    vec![
        Transaction::income(date(2024, 1, 15), "급여", dec!(3000000), "월급").unwrap(),
        Transaction::expense(date(2024, 1, 16), "식비", dec!(15000), "점심").unwrap(),
        Transaction::expense(date(2024, 1, 17), "교통비", dec!(5000), "버스").unwrap(),
        Transaction::income(date(2024, 1, 20), "용돈", dec!(100000), "용돈").unwrap(),
    ]
}

pub fn store_with(transactions: &[Transaction]) -> CsvLedgerStore {
    let store = setup_store();
    store.replace_all(transactions).expect("seed ledger");
    store
}
