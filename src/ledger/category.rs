use serde::{Deserialize, Serialize};

use super::TransactionType;

/// Suggested income categories offered to users. Not enforced.
pub const INCOME_CATEGORIES: [&str; 6] = ["급여", "보너스", "용돈", "사업소득", "이자소득", "기타"];

/// Suggested expense categories offered to users. Not enforced.
pub const EXPENSE_CATEGORIES: [&str; 12] = [
    "식비",
    "교통비",
    "문화생활",
    "쇼핑",
    "공과금",
    "의료비",
    "교육비",
    "통신비",
    "주거비",
    "보험",
    "저축",
    "기타",
];

/// Supported category types.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CategoryKind {
    Expense,
    Income,
}

impl CategoryKind {
    pub fn suggestions(self) -> &'static [&'static str] {
        match self {
            CategoryKind::Income => &INCOME_CATEGORIES,
            CategoryKind::Expense => &EXPENSE_CATEGORIES,
        }
    }
}

impl From<TransactionType> for CategoryKind {
    fn from(value: TransactionType) -> Self {
        match value {
            TransactionType::Income => CategoryKind::Income,
            TransactionType::Expense => CategoryKind::Expense,
        }
    }
}

/// Whether `category` is one of the default suggestions for `transaction_type`.
pub fn is_suggested(category: &str, transaction_type: TransactionType) -> bool {
    CategoryKind::from(transaction_type)
        .suggestions()
        .contains(&category.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggestions_are_split_by_type() {
        assert!(is_suggested("급여", TransactionType::Income));
        assert!(!is_suggested("식비", TransactionType::Income));
        assert!(is_suggested(" 식비", TransactionType::Expense));
        assert!(is_suggested("기타", TransactionType::Expense));
    }
}
