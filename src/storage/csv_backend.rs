use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use crate::{
    core::utils::write_atomic,
    errors::{LedgerError, ParseWarning, Result},
    ledger::{Transaction, TransactionRecord, TypeLabels, RECORD_HEADERS},
};

use super::{LoadReport, TransactionStore};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Ledger store backed by a single UTF-8 CSV file with a
/// `date,category,amount,type,description` header.
///
/// Every write rewrites the whole file through a staging file. There is no locking;
/// concurrent writers race and the last one wins.
#[derive(Debug, Clone)]
pub struct CsvLedgerStore {
    path: PathBuf,
    labels: TypeLabels,
}

impl CsvLedgerStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_labels(path, TypeLabels::default())
    }

    pub fn with_labels(path: impl Into<PathBuf>, labels: TypeLabels) -> Self {
        Self {
            path: path.into(),
            labels,
        }
    }

    /// Builds the store and makes sure the file exists.
    pub fn open(path: impl Into<PathBuf>, labels: TypeLabels) -> Result<Self> {
        let store = Self::with_labels(path, labels);
        store.ensure_initialized()?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_rows(&self, transactions: &[Transaction]) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(UTF8_BOM.to_vec());
        writer.write_record(RECORD_HEADERS)?;
        for txn in transactions {
            writer.serialize(txn.to_record_with(&self.labels))?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|err| LedgerError::Storage(err.error().to_string()))?;
        write_atomic(&self.path, &bytes)
    }
}

impl TransactionStore for CsvLedgerStore {
    fn ensure_initialized(&self) -> Result<()> {
        if self.path.exists() {
            return Ok(());
        }
        self.write_rows(&[])?;
        tracing::info!(path = %self.path.display(), "created empty ledger file");
        Ok(())
    }

    fn load_with_report(&self) -> Result<LoadReport> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(LoadReport::default()),
            Err(err) => return Err(err.into()),
        };
        let data = bytes.strip_prefix(UTF8_BOM).unwrap_or(&bytes);

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(data);
        let headers = reader.headers()?.clone();

        let mut report = LoadReport::default();
        for row in reader.records() {
            let parsed = row.map_err(|err| {
                let line = err.position().map(|pos| pos.line()).unwrap_or_default();
                (line, err.to_string())
            });
            let outcome = parsed.and_then(|record| {
                let line = record.position().map(|pos| pos.line()).unwrap_or_default();
                record
                    .deserialize::<TransactionRecord>(Some(&headers))
                    .map_err(|err| err.to_string())
                    .and_then(|raw| {
                        Transaction::from_record_with(&raw, &self.labels)
                            .map_err(|err| err.to_string())
                    })
                    .map_err(|reason| (line, reason))
            });
            match outcome {
                Ok(txn) => report.transactions.push(txn),
                Err((line, reason)) => {
                    tracing::warn!(line, %reason, "skipping unreadable ledger row");
                    report.warnings.push(ParseWarning { line, reason });
                }
            }
        }

        tracing::debug!(
            path = %self.path.display(),
            loaded = report.transactions.len(),
            skipped = report.warnings.len(),
            "loaded ledger file"
        );
        Ok(report)
    }

    fn replace_all(&self, transactions: &[Transaction]) -> Result<()> {
        self.write_rows(transactions)?;
        tracing::info!(
            path = %self.path.display(),
            count = transactions.len(),
            "rewrote ledger file"
        );
        Ok(())
    }
}
