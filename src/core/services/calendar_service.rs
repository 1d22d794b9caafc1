//! Projection of transactions into calendar events.
//!
//! Every transaction becomes one event. Market trades are recognised by marker
//! substrings in the category name; the markers are configuration, not fixed
//! vocabulary.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{config::Config, currency::CurrencyFormat, ledger::Transaction};

/// The four-way classification calendar consumers colour by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    TradeBuy,
    TradeSell,
    Income,
    Expense,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarEvent {
    pub title: String,
    pub date: NaiveDate,
    pub kind: EventKind,
    pub color: String,
}

/// Category substrings that mark a transaction as a market trade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeMarkers {
    pub buy: Vec<String>,
    pub sell: Vec<String>,
}

impl Default for TradeMarkers {
    fn default() -> Self {
        Self {
            buy: vec!["매수".into()],
            sell: vec!["매도".into()],
        }
    }
}

impl TradeMarkers {
    /// Buy markers win over sell markers when a category carries both.
    pub fn classify(&self, category: &str) -> Option<EventKind> {
        if contains_any(category, &self.buy) {
            Some(EventKind::TradeBuy)
        } else if contains_any(category, &self.sell) {
            Some(EventKind::TradeSell)
        } else {
            None
        }
    }
}

fn contains_any(category: &str, markers: &[String]) -> bool {
    markers
        .iter()
        .map(|marker| marker.trim())
        .any(|marker| !marker.is_empty() && category.contains(marker))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarPalette {
    pub trade_buy: String,
    pub trade_sell: String,
    pub income: String,
    pub expense: String,
}

impl Default for CalendarPalette {
    fn default() -> Self {
        Self {
            trade_buy: "#FF6B6B".into(),
            trade_sell: "#4ECDC4".into(),
            income: "#51CF66".into(),
            expense: "#FFA94D".into(),
        }
    }
}

impl CalendarPalette {
    pub fn color_for(&self, kind: EventKind) -> &str {
        match kind {
            EventKind::TradeBuy => &self.trade_buy,
            EventKind::TradeSell => &self.trade_sell,
            EventKind::Income => &self.income,
            EventKind::Expense => &self.expense,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CalendarService {
    markers: TradeMarkers,
    palette: CalendarPalette,
    currency: CurrencyFormat,
}

impl CalendarService {
    pub fn new(markers: TradeMarkers, palette: CalendarPalette, currency: CurrencyFormat) -> Self {
        Self {
            markers,
            palette,
            currency,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.trade_markers.clone(),
            config.palette.clone(),
            config.currency.clone(),
        )
    }

    pub fn classify(&self, txn: &Transaction) -> EventKind {
        match self.markers.classify(txn.category()) {
            Some(kind) => kind,
            None if txn.is_income() => EventKind::Income,
            None => EventKind::Expense,
        }
    }

    pub fn events(&self, transactions: &[Transaction]) -> Vec<CalendarEvent> {
        transactions.iter().map(|txn| self.event_for(txn)).collect()
    }

    fn event_for(&self, txn: &Transaction) -> CalendarEvent {
        let kind = self.classify(txn);
        let is_trade = matches!(kind, EventKind::TradeBuy | EventKind::TradeSell);
        let title = if is_trade && !txn.description().is_empty() {
            txn.description().to_string()
        } else {
            format!(
                "[{}] {}{}",
                txn.category(),
                self.currency.whole_units(txn.amount()),
                self.currency.suffix
            )
        };
        CalendarEvent {
            title,
            date: txn.date(),
            kind,
            color: self.palette.color_for(kind).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, d).unwrap()
    }

    #[test]
    fn classifies_into_four_kinds() {
        let service = CalendarService::default();
        let buy = Transaction::expense(day(1), "주식매수", dec!(500000), "AAPL 3주").unwrap();
        let sell = Transaction::income(day(2), "주식매도", dec!(700000), "").unwrap();
        let income = Transaction::income(day(3), "급여", dec!(3000000), "").unwrap();
        let expense = Transaction::expense(day(4), "식비", dec!(15000), "").unwrap();

        let kinds: Vec<EventKind> = service
            .events(&[buy, sell, income, expense])
            .into_iter()
            .map(|event| event.kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                EventKind::TradeBuy,
                EventKind::TradeSell,
                EventKind::Income,
                EventKind::Expense
            ]
        );
    }

    #[test]
    fn trade_with_description_uses_description_as_title() {
        let service = CalendarService::default();
        let buy = Transaction::expense(day(1), "주식매수", dec!(500000), "AAPL 3주").unwrap();
        let events = service.events(&[buy]);
        assert_eq!(events[0].title, "AAPL 3주");
        assert_eq!(events[0].color, "#FF6B6B");
        assert_eq!(events[0].date, day(1));
    }

    #[test]
    fn other_titles_show_category_and_grouped_amount() {
        let service = CalendarService::default();
        let sell = Transaction::income(day(2), "주식매도", dec!(700000.75), "").unwrap();
        let lunch = Transaction::expense(day(4), "식비", dec!(15000), "점심").unwrap();
        let events = service.events(&[sell, lunch]);
        assert_eq!(events[0].title, "[주식매도] 700,000원");
        assert_eq!(events[1].title, "[식비] 15,000원");
        assert_eq!(events[1].color, "#FFA94D");
    }

    #[test]
    fn markers_are_configurable() {
        let markers = TradeMarkers {
            buy: vec!["Buy".into()],
            sell: vec!["Sell".into(), "".into()],
        };
        let service =
            CalendarService::new(markers, CalendarPalette::default(), CurrencyFormat::default());
        let buy = Transaction::expense(day(5), "Stock Buy", dec!(10), "").unwrap();
        let korean = Transaction::expense(day(5), "주식매수", dec!(10), "").unwrap();
        assert_eq!(service.classify(&buy), EventKind::TradeBuy);
        assert_eq!(service.classify(&korean), EventKind::Expense);
    }
}
