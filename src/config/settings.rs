//! User settings for the cashflow ledger
//!
//! Display preferences, forecast horizon and logging verbosity, persisted as
//! `config.json` in the base directory. Every field has a default so older or
//! hand-edited files keep loading.

use serde::{Deserialize, Serialize};

use super::paths::CashflowPaths;
use crate::error::CashflowError;

/// User settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Currency symbol shown next to amounts
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Date format for listings (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Number of months the seasonal forecaster projects
    #[serde(default = "default_forecast_horizon")]
    pub forecast_horizon: usize,

    /// Default tracing level when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Generate due fixed occurrences whenever the program starts
    #[serde(default = "default_materialize_on_start")]
    pub materialize_on_start: bool,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "€".to_string()
}

fn default_date_format() -> String {
    "%d/%m/%Y %H:%M".to_string()
}

fn default_forecast_horizon() -> usize {
    12
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_materialize_on_start() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: default_currency(),
            date_format: default_date_format(),
            forecast_horizon: default_forecast_horizon(),
            log_level: default_log_level(),
            materialize_on_start: default_materialize_on_start(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or return defaults if the file doesn't exist
    pub fn load_or_create(paths: &CashflowPaths) -> Result<Self, CashflowError> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            // Don't save yet - let caller decide when to persist
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| CashflowError::Io(format!("Failed to read settings file: {}", e)))?;

        let settings: Settings = serde_json::from_str(&contents)
            .map_err(|e| CashflowError::Config(format!("Failed to parse settings file: {}", e)))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Reject values the forecasting pipeline cannot work with
    pub fn validate(&self) -> Result<(), CashflowError> {
        if self.forecast_horizon == 0 {
            return Err(CashflowError::Config(
                "forecast_horizon must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Save settings to disk
    pub fn save(&self, paths: &CashflowPaths) -> Result<(), CashflowError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| CashflowError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| CashflowError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.currency_symbol, "€");
        assert_eq!(settings.forecast_horizon, 12);
        assert!(settings.materialize_on_start);
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = CashflowPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.currency_symbol = "$".to_string();
        settings.forecast_horizon = 6;
        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.currency_symbol, "$");
        assert_eq!(loaded.forecast_horizon, 6);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"currency_symbol": "£"}"#).unwrap();
        assert_eq!(settings.currency_symbol, "£");
        assert_eq!(settings.forecast_horizon, 12);
        assert_eq!(settings.log_level, "warn");
    }

    #[test]
    fn test_zero_horizon_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let paths = CashflowPaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(paths.settings_file(), r#"{"forecast_horizon": 0}"#).unwrap();

        let err = Settings::load_or_create(&paths).unwrap_err();
        assert!(matches!(err, CashflowError::Config(_)));
    }
}
