use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// How amounts are rendered for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyFormat {
    pub grouping_separator: char,
    pub suffix: String,
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self {
            grouping_separator: ',',
            suffix: "원".into(),
        }
    }
}

impl CurrencyFormat {
    /// Rounds to whole units and appends the currency suffix, e.g. `1,000,000원`.
    pub fn format(&self, amount: Decimal) -> String {
        let rounded = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven);
        format!("{}{}", self.group(rounded), self.suffix)
    }

    /// Drops the fractional part without rounding and groups the digits, e.g. `15,000`.
    pub fn whole_units(&self, amount: Decimal) -> String {
        self.group(amount.trunc())
    }

    fn group(&self, value: Decimal) -> String {
        let mut body = value.normalize().to_string();
        insert_grouping(&mut body, self.grouping_separator);
        body
    }
}

/// Formats with the default won layout.
pub fn format_currency(amount: Decimal) -> String {
    CurrencyFormat::default().format(amount)
}

fn insert_grouping(int_part: &mut String, separator: char) {
    if let Some(digits) = int_part.strip_prefix('-') {
        let grouped = group_digits(digits, separator);
        *int_part = format!("-{}", grouped);
    } else {
        *int_part = group_digits(int_part, separator);
    }
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut grouped = String::new();
    for (count, ch) in digits.chars().rev().enumerate() {
        if count != 0 && count % 3 == 0 {
            grouped.insert(0, separator);
        }
        grouped.insert(0, ch);
    }
    grouped
}
