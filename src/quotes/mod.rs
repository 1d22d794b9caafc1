//! Contract for the external market-quote source behind the investment view.
//!
//! Gateways may fail in any way they like; [`QuoteService`] turns every failure,
//! including a slow call, into a reported outcome so ledger features never depend
//! on the network.

pub mod manual;

use std::{
    fmt,
    str::FromStr,
    sync::{mpsc, Arc},
    thread,
    time::Duration,
};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use manual::ManualQuoteGateway;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuoteError {
    #[error("ticker symbol is empty")]
    EmptyTicker,
    #[error("no data found for `{0}`")]
    NotFound(String),
    #[error("rate limit exceeded")]
    RateLimited,
    #[error("quote request timed out after {0:?}")]
    Timeout(Duration),
    #[error("unknown period `{0}`")]
    UnknownPeriod(String),
    #[error("provider error: {0}")]
    Provider(String),
}

/// Look-back span for price history requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuotePeriod {
    FiveDays,
    #[default]
    OneMonth,
    ThreeMonths,
    SixMonths,
    OneYear,
    FiveYears,
    Max,
}

impl QuotePeriod {
    /// Calendar days covered, `None` for unbounded.
    pub fn days(self) -> Option<i64> {
        match self {
            QuotePeriod::FiveDays => Some(5),
            QuotePeriod::OneMonth => Some(30),
            QuotePeriod::ThreeMonths => Some(91),
            QuotePeriod::SixMonths => Some(182),
            QuotePeriod::OneYear => Some(365),
            QuotePeriod::FiveYears => Some(5 * 365),
            QuotePeriod::Max => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            QuotePeriod::FiveDays => "5d",
            QuotePeriod::OneMonth => "1mo",
            QuotePeriod::ThreeMonths => "3mo",
            QuotePeriod::SixMonths => "6mo",
            QuotePeriod::OneYear => "1y",
            QuotePeriod::FiveYears => "5y",
            QuotePeriod::Max => "max",
        }
    }
}

impl fmt::Display for QuotePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for QuotePeriod {
    type Err = QuoteError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "5d" => Ok(QuotePeriod::FiveDays),
            "1mo" => Ok(QuotePeriod::OneMonth),
            "3mo" => Ok(QuotePeriod::ThreeMonths),
            "6mo" => Ok(QuotePeriod::SixMonths),
            "1y" => Ok(QuotePeriod::OneYear),
            "5y" => Ok(QuotePeriod::FiveYears),
            "max" => Ok(QuotePeriod::Max),
            _ => Err(QuoteError::UnknownPeriod(value.to_string())),
        }
    }
}

/// One trading day of price history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: u64,
}

/// Best-effort descriptive data for a ticker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteInfo {
    pub name: String,
    pub current_price: Option<Decimal>,
    pub currency: Option<String>,
    pub sector: Option<String>,
}

impl QuoteInfo {
    pub fn unknown(ticker: &str) -> Self {
        Self {
            name: ticker.to_string(),
            ..Self::default()
        }
    }
}

/// External supplier of price data. Implementations receive normalized tickers.
pub trait QuoteGateway: Send + Sync {
    fn history(&self, ticker: &str, period: QuotePeriod) -> Result<Vec<PriceBar>, QuoteError>;
    fn info(&self, ticker: &str) -> Result<QuoteInfo, QuoteError>;
}

/// Result of a history request. Never an error; failures set `success = false`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryOutcome {
    pub bars: Vec<PriceBar>,
    pub success: bool,
    pub message: String,
}

impl HistoryOutcome {
    fn failed(message: impl Into<String>) -> Self {
        Self {
            bars: Vec::new(),
            success: false,
            message: message.into(),
        }
    }
}

/// Calls a gateway on a worker thread with a bounded wait.
#[derive(Clone)]
pub struct QuoteService {
    gateway: Arc<dyn QuoteGateway>,
    timeout: Duration,
}

impl QuoteService {
    pub fn new(gateway: Arc<dyn QuoteGateway>, timeout: Duration) -> Self {
        Self { gateway, timeout }
    }

    pub fn fetch_history(&self, ticker: &str, period: QuotePeriod) -> HistoryOutcome {
        let ticker = normalize_ticker(ticker);
        let result = match ticker.as_deref() {
            Some(symbol) => {
                let symbol_owned = symbol.to_string();
                self.call(move |gateway| gateway.history(&symbol_owned, period))
            }
            None => Err(QuoteError::EmptyTicker),
        };
        let symbol = ticker.unwrap_or_default();
        match result {
            Ok(bars) if bars.is_empty() => {
                HistoryOutcome::failed(QuoteError::NotFound(symbol).to_string())
            }
            Ok(bars) => HistoryOutcome {
                message: format!("loaded {} bars for {} ({})", bars.len(), symbol, period),
                bars,
                success: true,
            },
            Err(err) => {
                tracing::warn!(ticker = %symbol, error = %err, "quote history unavailable");
                HistoryOutcome::failed(err.to_string())
            }
        }
    }

    /// Never fails; unknown or unreachable tickers yield an info carrying only the name.
    pub fn fetch_info(&self, ticker: &str) -> QuoteInfo {
        let Some(symbol) = normalize_ticker(ticker) else {
            return QuoteInfo::unknown(ticker.trim());
        };
        let request = symbol.clone();
        match self.call(move |gateway| gateway.info(&request)) {
            Ok(info) => info,
            Err(err) => {
                tracing::warn!(ticker = %symbol, error = %err, "quote info unavailable");
                QuoteInfo::unknown(&symbol)
            }
        }
    }

    fn call<T, F>(&self, request: F) -> Result<T, QuoteError>
    where
        T: Send + 'static,
        F: FnOnce(&dyn QuoteGateway) -> Result<T, QuoteError> + Send + 'static,
    {
        let gateway = Arc::clone(&self.gateway);
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let _ = tx.send(request(gateway.as_ref()));
        });
        match rx.recv_timeout(self.timeout) {
            Ok(result) => result,
            Err(mpsc::RecvTimeoutError::Timeout) => Err(QuoteError::Timeout(self.timeout)),
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                Err(QuoteError::Provider("quote worker stopped unexpectedly".into()))
            }
        }
    }
}

fn normalize_ticker(ticker: &str) -> Option<String> {
    let symbol = ticker.trim().to_uppercase();
    if symbol.is_empty() {
        None
    } else {
        Some(symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    struct SlowGateway;

    impl QuoteGateway for SlowGateway {
        fn history(&self, _: &str, _: QuotePeriod) -> Result<Vec<PriceBar>, QuoteError> {
            thread::sleep(Duration::from_millis(500));
            Ok(Vec::new())
        }

        fn info(&self, _: &str) -> Result<QuoteInfo, QuoteError> {
            Err(QuoteError::RateLimited)
        }
    }

    struct PanickingGateway;

    impl QuoteGateway for PanickingGateway {
        fn history(&self, _: &str, _: QuotePeriod) -> Result<Vec<PriceBar>, QuoteError> {
            panic!("gateway bug")
        }

        fn info(&self, _: &str) -> Result<QuoteInfo, QuoteError> {
            panic!("gateway bug")
        }
    }

    fn bar(day: u32, close: Decimal) -> PriceBar {
        PriceBar {
            date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
            open: close,
            high: close,
            low: close,
            close,
            volume: 1_000,
        }
    }

    #[test]
    fn history_is_fetched_for_normalized_ticker() {
        let gateway = ManualQuoteGateway::new().with_history("AAPL", vec![bar(1, dec!(170))]);
        let service = QuoteService::new(Arc::new(gateway), Duration::from_secs(2));
        let outcome = service.fetch_history("  aapl ", QuotePeriod::Max);
        assert!(outcome.success, "{}", outcome.message);
        assert_eq!(outcome.bars.len(), 1);
    }

    #[test]
    fn empty_ticker_is_reported_not_raised() {
        let service = QuoteService::new(Arc::new(ManualQuoteGateway::new()), Duration::from_secs(1));
        let outcome = service.fetch_history("   ", QuotePeriod::OneMonth);
        assert!(!outcome.success);
        assert_eq!(outcome.message, QuoteError::EmptyTicker.to_string());
    }

    #[test]
    fn slow_gateway_times_out() {
        let service = QuoteService::new(Arc::new(SlowGateway), Duration::from_millis(50));
        let outcome = service.fetch_history("AAPL", QuotePeriod::OneMonth);
        assert!(!outcome.success);
        assert!(outcome.message.contains("timed out"), "{}", outcome.message);
    }

    #[test]
    fn info_falls_back_to_ticker_name() {
        let service = QuoteService::new(Arc::new(SlowGateway), Duration::from_secs(1));
        let info = service.fetch_info("msft");
        assert_eq!(info, QuoteInfo::unknown("MSFT"));
    }

    #[test]
    fn panicking_gateway_is_contained() {
        let service = QuoteService::new(Arc::new(PanickingGateway), Duration::from_secs(1));
        assert!(!service.fetch_history("AAPL", QuotePeriod::OneMonth).success);
        assert_eq!(service.fetch_info("AAPL").name, "AAPL");
    }

    #[test]
    fn periods_parse_from_codes() {
        assert_eq!("1mo".parse::<QuotePeriod>().unwrap(), QuotePeriod::OneMonth);
        assert_eq!("MAX".parse::<QuotePeriod>().unwrap(), QuotePeriod::Max);
        assert!("2w".parse::<QuotePeriod>().is_err());
    }
}
