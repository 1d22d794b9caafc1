use std::{fmt, str::FromStr};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{currency::format_currency, errors::ValidationError};

/// Column order of the persisted ledger file.
pub const RECORD_HEADERS: [&str; 5] = ["date", "category", "amount", "type", "description"];

const STORAGE_DATE_FORMAT: &str = "%Y-%m-%d";
const ACCEPTED_DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];

/// Direction of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    /// Literal tag written to the ledger file for this variant.
    pub fn label<'a>(&self, labels: &'a TypeLabels) -> &'a str {
        match self {
            TransactionType::Income => &labels.income,
            TransactionType::Expense => &labels.expense,
        }
    }

    /// Maps a boundary tag back to a variant. The configured labels are tried first,
    /// then the variant names themselves, case-insensitively.
    pub fn parse(value: &str, labels: &TypeLabels) -> Result<Self, ValidationError> {
        let trimmed = value.trim();
        if trimmed == labels.income {
            return Ok(TransactionType::Income);
        }
        if trimmed == labels.expense {
            return Ok(TransactionType::Expense);
        }
        match trimmed.to_ascii_lowercase().as_str() {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            _ => Err(ValidationError::UnknownTransactionType(value.to_string())),
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label(&TypeLabels::default()))
    }
}

/// Locale-specific literal tags used for the `type` column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeLabels {
    pub income: String,
    pub expense: String,
}

impl Default for TypeLabels {
    fn default() -> Self {
        Self {
            income: "수입".into(),
            expense: "지출".into(),
        }
    }
}

/// One recorded financial event. Immutable once constructed.
///
/// Equality and hashing are structural over all five fields; amounts compare
/// numerically, so `15000` and `15000.00` are the same amount.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Transaction {
    date: NaiveDate,
    category: String,
    amount: Decimal,
    transaction_type: TransactionType,
    description: String,
}

impl Transaction {
    pub fn new(
        date: NaiveDate,
        category: impl AsRef<str>,
        amount: Decimal,
        transaction_type: TransactionType,
        description: impl AsRef<str>,
    ) -> Result<Self, ValidationError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(ValidationError::NegativeAmount(amount));
        }
        let category = category.as_ref().trim();
        if category.is_empty() {
            return Err(ValidationError::EmptyCategory);
        }
        Ok(Self {
            date,
            category: category.to_string(),
            amount,
            transaction_type,
            description: description.as_ref().trim().to_string(),
        })
    }

    pub fn income(
        date: NaiveDate,
        category: impl AsRef<str>,
        amount: Decimal,
        description: impl AsRef<str>,
    ) -> Result<Self, ValidationError> {
        Self::new(date, category, amount, TransactionType::Income, description)
    }

    pub fn expense(
        date: NaiveDate,
        category: impl AsRef<str>,
        amount: Decimal,
        description: impl AsRef<str>,
    ) -> Result<Self, ValidationError> {
        Self::new(date, category, amount, TransactionType::Expense, description)
    }

    /// Builds a transaction from a timestamp, dropping the time of day.
    pub fn at(
        timestamp: NaiveDateTime,
        category: impl AsRef<str>,
        amount: Decimal,
        transaction_type: TransactionType,
        description: impl AsRef<str>,
    ) -> Result<Self, ValidationError> {
        Self::new(
            timestamp.date(),
            category,
            amount,
            transaction_type,
            description,
        )
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// The transaction date at 00:00:00, used for range comparisons.
    pub fn timestamp(&self) -> NaiveDateTime {
        self.date.and_time(NaiveTime::MIN)
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn transaction_type(&self) -> TransactionType {
        self.transaction_type
    }

    /// Empty when no description was given.
    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn is_income(&self) -> bool {
        matches!(self.transaction_type, TransactionType::Income)
    }

    pub fn is_expense(&self) -> bool {
        matches!(self.transaction_type, TransactionType::Expense)
    }

    /// `+amount` for income, `-amount` for expenses.
    pub fn signed_amount(&self) -> Decimal {
        match self.transaction_type {
            TransactionType::Income => self.amount,
            TransactionType::Expense => -self.amount,
        }
    }

    pub fn matches_category(&self, name: &str) -> bool {
        self.category.trim().to_lowercase() == name.trim().to_lowercase()
    }

    /// Inclusive on both ends.
    pub fn in_range(&self, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        let at = self.timestamp();
        start <= at && at <= end
    }

    pub fn to_record(&self) -> TransactionRecord {
        self.to_record_with(&TypeLabels::default())
    }

    pub fn to_record_with(&self, labels: &TypeLabels) -> TransactionRecord {
        TransactionRecord {
            date: Some(self.date.format(STORAGE_DATE_FORMAT).to_string()),
            category: Some(self.category.clone()),
            amount: Some(self.amount.normalize().to_string()),
            kind: Some(self.transaction_type.label(labels).to_string()),
            description: Some(self.description.clone()),
        }
    }

    pub fn from_record(record: &TransactionRecord) -> Result<Self, ValidationError> {
        Self::from_record_with(record, &TypeLabels::default())
    }

    pub fn from_record_with(
        record: &TransactionRecord,
        labels: &TypeLabels,
    ) -> Result<Self, ValidationError> {
        let date = parse_date(required(&record.date, "date")?)?;
        let category = required(&record.category, "category")?;
        let amount = parse_amount(required(&record.amount, "amount")?)?;
        let transaction_type = TransactionType::parse(required(&record.kind, "type")?, labels)?;
        let description = record.description.as_deref().unwrap_or_default();
        Self::new(date, category, amount, transaction_type, description)
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | {} | {} | {} | {}",
            self.date.format(STORAGE_DATE_FORMAT),
            self.transaction_type,
            self.category,
            format_currency(self.amount),
            self.description
        )
    }
}

/// Flat row form of a transaction as it appears in the ledger file.
///
/// Every column is optional so that incomplete rows still deserialize and can be
/// rejected with a precise [`ValidationError`] instead of a codec error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub amount: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

fn required<'a>(
    value: &'a Option<String>,
    field: &'static str,
) -> Result<&'a str, ValidationError> {
    match value.as_deref() {
        Some(raw) if !raw.is_empty() => Ok(raw),
        _ => Err(ValidationError::MissingField(field)),
    }
}

/// Parses a date in `YYYY-MM-DD`, `YYYY/MM/DD` or ISO-8601 form. For ISO-8601 only the
/// date portion is used; any time or zone suffix is ignored.
pub fn parse_date(raw: &str) -> Result<NaiveDate, ValidationError> {
    let value = raw.trim();
    for format in ACCEPTED_DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Ok(date);
        }
    }
    let date_part = value
        .split(|c| c == 'T' || c == ' ')
        .next()
        .unwrap_or_default();
    NaiveDate::parse_from_str(date_part, STORAGE_DATE_FORMAT)
        .map_err(|_| ValidationError::InvalidDate(raw.to_string()))
}

/// Parses a decimal amount, accepting scientific notation as a fallback.
/// The sign is not checked here.
pub fn parse_amount(raw: &str) -> Result<Decimal, ValidationError> {
    let value = raw.trim();
    Decimal::from_str(value)
        .or_else(|_| Decimal::from_scientific(value))
        .map_err(|_| ValidationError::InvalidAmount(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn jan(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    #[test]
    fn construction_trims_category_and_description() {
        let txn = Transaction::expense(jan(15), "  식비 ", dec!(15000), " 점심 식사  ").unwrap();
        assert_eq!(txn.category(), "식비");
        assert_eq!(txn.description(), "점심 식사");
        assert!(txn.is_expense());
        assert!(!txn.is_income());
    }

    #[test]
    fn negative_amount_is_rejected() {
        let err = Transaction::expense(jan(15), "식비", dec!(-5000), "").unwrap_err();
        assert_eq!(err, ValidationError::NegativeAmount(dec!(-5000)));
    }

    #[test]
    fn zero_amount_is_allowed_by_the_type() {
        assert!(Transaction::income(jan(1), "기타", Decimal::ZERO, "").is_ok());
    }

    #[test]
    fn blank_category_is_rejected() {
        let err = Transaction::income(jan(1), "   ", dec!(10), "").unwrap_err();
        assert_eq!(err, ValidationError::EmptyCategory);
    }

    #[test]
    fn signed_amount_follows_type() {
        let income = Transaction::income(jan(25), "급여", dec!(3000000), "").unwrap();
        let expense = Transaction::expense(jan(15), "식비", dec!(15000), "").unwrap();
        assert_eq!(income.signed_amount(), dec!(3000000));
        assert_eq!(expense.signed_amount(), dec!(-15000));
    }

    #[test]
    fn unknown_type_tag_is_rejected() {
        let err = TransactionType::parse("잘못된타입", &TypeLabels::default()).unwrap_err();
        assert!(matches!(err, ValidationError::UnknownTransactionType(_)));
        assert_eq!(
            TransactionType::parse("EXPENSE", &TypeLabels::default()).unwrap(),
            TransactionType::Expense
        );
    }

    #[test]
    fn to_record_writes_storage_format() {
        let txn = Transaction::income(jan(15), "급여", dec!(3000000.00), "월급").unwrap();
        let record = txn.to_record();
        assert_eq!(record.date.as_deref(), Some("2024-01-15"));
        assert_eq!(record.amount.as_deref(), Some("3000000"));
        assert_eq!(record.kind.as_deref(), Some("수입"));
        assert_eq!(record.description.as_deref(), Some("월급"));
    }

    #[test]
    fn record_round_trip_preserves_equality() {
        let txn = Transaction::expense(jan(16), "교통비", dec!(1250.5), "버스, 지하철").unwrap();
        assert_eq!(Transaction::from_record(&txn.to_record()).unwrap(), txn);
    }

    #[test]
    fn from_record_reports_missing_fields() {
        let record = TransactionRecord {
            date: Some("2024-01-15".into()),
            category: Some("식비".into()),
            amount: None,
            kind: Some("지출".into()),
            description: None,
        };
        assert_eq!(
            Transaction::from_record(&record).unwrap_err(),
            ValidationError::MissingField("amount")
        );
    }

    #[test]
    fn from_record_accepts_float_style_amounts() {
        let record = TransactionRecord {
            date: Some("2024-01-15".into()),
            category: Some("식비".into()),
            amount: Some("15000.0".into()),
            kind: Some("지출".into()),
            description: None,
        };
        let txn = Transaction::from_record(&record).unwrap();
        assert_eq!(txn.amount(), dec!(15000));
        assert_eq!(txn.description(), "");
    }

    #[test]
    fn date_formats_are_tried_in_order() {
        let expected = NaiveDate::from_ymd_opt(2024, 2, 20).unwrap();
        assert_eq!(parse_date("2024-02-20").unwrap(), expected);
        assert_eq!(parse_date("2024/02/20").unwrap(), expected);
        assert_eq!(parse_date("2024-02-20T13:45:00+09:00").unwrap(), expected);
        assert_eq!(parse_date("2024-02-20 00:00:00").unwrap(), expected);
        assert!(parse_date("20-02-2024").is_err());
        assert!(parse_date("20240220").is_err());
        assert!(parse_date("20240220T13:45:00").is_err());
    }

    #[test]
    fn amount_parsing_rejects_text() {
        assert!(matches!(
            parse_amount("abc"),
            Err(ValidationError::InvalidAmount(_))
        ));
        assert_eq!(parse_amount("1.5e3").unwrap(), dec!(1500));
    }

    #[test]
    fn category_matching_ignores_case_and_padding() {
        let txn = Transaction::expense(jan(3), "Coffee", dec!(4500), "").unwrap();
        assert!(txn.matches_category("  coffee "));
        assert!(!txn.matches_category("tea"));
    }

    #[test]
    fn range_check_is_inclusive() {
        let txn = Transaction::expense(jan(31), "식비", dec!(1), "").unwrap();
        let start = jan(1).and_hms_opt(0, 0, 0).unwrap();
        let end = jan(31).and_hms_opt(23, 59, 59).unwrap();
        assert!(txn.in_range(start, end));
        assert!(txn.in_range(txn.timestamp(), txn.timestamp()));
        assert!(!txn.in_range(start, jan(30).and_hms_opt(23, 59, 59).unwrap()));
    }

    #[test]
    fn display_matches_ledger_line_format() {
        let txn = Transaction::expense(jan(15), "식비", dec!(15000), "점심 식사").unwrap();
        assert_eq!(txn.to_string(), "2024-01-15 | 지출 | 식비 | 15,000원 | 점심 식사");
    }
}
