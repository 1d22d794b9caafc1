use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{
    core::{
        services::calendar_service::{CalendarPalette, TradeMarkers},
        utils::{ensure_dir, write_atomic, PathResolver},
    },
    currency::CurrencyFormat,
    errors::LedgerError,
    ledger::TypeLabels,
};

const DEFAULT_QUOTE_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Ledger file location. Falls back to `<base>/data/ledger.csv`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ledger_path: Option<PathBuf>,
    pub type_labels: TypeLabels,
    pub trade_markers: TradeMarkers,
    pub palette: CalendarPalette,
    pub currency: CurrencyFormat,
    /// Seconds to wait on a quote gateway. Must be at least 1.
    pub quote_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ledger_path: None,
            type_labels: TypeLabels::default(),
            trade_markers: TradeMarkers::default(),
            palette: CalendarPalette::default(),
            currency: CurrencyFormat::default(),
            quote_timeout_secs: DEFAULT_QUOTE_TIMEOUT_SECS,
        }
    }
}

impl Config {
    pub fn quote_timeout(&self) -> Duration {
        Duration::from_secs(self.quote_timeout_secs)
    }

    fn validate(&self) -> Result<(), LedgerError> {
        if self.quote_timeout_secs == 0 {
            return Err(LedgerError::Config(
                "quote_timeout_secs must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

pub struct ConfigManager {
    base: PathBuf,
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, LedgerError> {
        Self::with_base_dir(PathResolver::base_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, LedgerError> {
        ensure_dir(&base)?;
        Ok(Self {
            path: PathResolver::config_file_in(&base),
            base,
        })
    }

    pub fn load(&self) -> Result<Config, LedgerError> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            let config: Config = serde_json::from_str(&data)?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<(), LedgerError> {
        config.validate()?;
        let json = serde_json::to_string_pretty(config)?;
        write_atomic(&self.path, json.as_bytes())
    }

    /// The ledger file the given config points at.
    pub fn ledger_path(&self, config: &Config) -> PathBuf {
        config
            .ledger_path
            .clone()
            .unwrap_or_else(|| PathResolver::ledger_file_in(&self.base))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        let config = manager.load().unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(
            manager.ledger_path(&config),
            dir.path().join("data").join("ledger.csv")
        );
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        let mut config = Config::default();
        config.type_labels = TypeLabels {
            income: "Income".into(),
            expense: "Expense".into(),
        };
        config.quote_timeout_secs = 3;
        manager.save(&config).unwrap();
        assert_eq!(manager.load().unwrap(), config);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        fs::write(manager.path(), r#"{ "quote_timeout_secs": 2 }"#).unwrap();
        let config = manager.load().unwrap();
        assert_eq!(config.quote_timeout(), Duration::from_secs(2));
        assert_eq!(config.type_labels, TypeLabels::default());
    }

    #[test]
    fn zero_quote_timeout_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        fs::write(manager.path(), r#"{ "quote_timeout_secs": 0 }"#).unwrap();
        assert!(matches!(manager.load(), Err(LedgerError::Config(_))));

        let config = Config {
            quote_timeout_secs: 0,
            ..Config::default()
        };
        assert!(manager.save(&config).is_err());
    }

    #[test]
    fn malformed_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        fs::write(manager.path(), "not json").unwrap();
        assert!(matches!(manager.load(), Err(LedgerError::Config(_))));
    }
}
