use std::collections::HashMap;

use chrono::Duration;

use super::{PriceBar, QuoteError, QuoteGateway, QuoteInfo, QuotePeriod};

/// In-memory gateway fed by hand. Useful offline and in tests.
#[derive(Debug, Clone, Default)]
pub struct ManualQuoteGateway {
    history: HashMap<String, Vec<PriceBar>>,
    info: HashMap<String, QuoteInfo>,
}

impl ManualQuoteGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_history(mut self, ticker: &str, mut bars: Vec<PriceBar>) -> Self {
        bars.sort_by_key(|bar| bar.date);
        self.history.insert(ticker.trim().to_uppercase(), bars);
        self
    }

    pub fn with_info(mut self, ticker: &str, info: QuoteInfo) -> Self {
        self.info.insert(ticker.trim().to_uppercase(), info);
        self
    }
}

impl QuoteGateway for ManualQuoteGateway {
    /// Bars within `period` of the most recent bar.
    fn history(&self, ticker: &str, period: QuotePeriod) -> Result<Vec<PriceBar>, QuoteError> {
        let bars = self
            .history
            .get(ticker)
            .ok_or_else(|| QuoteError::NotFound(ticker.to_string()))?;
        let (Some(days), Some(latest)) = (period.days(), bars.last()) else {
            return Ok(bars.clone());
        };
        let cutoff = latest.date - Duration::days(days);
        Ok(bars.iter().filter(|bar| bar.date > cutoff).cloned().collect())
    }

    fn info(&self, ticker: &str) -> Result<QuoteInfo, QuoteError> {
        self.info
            .get(ticker)
            .cloned()
            .ok_or_else(|| QuoteError::NotFound(ticker.to_string()))
    }
}
