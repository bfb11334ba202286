//! User settings for SpendScan
//!
//! Manages user preferences: the fallback currency for detected candidates,
//! the base currency used for insight reports, and the default log filter.

use serde::{Deserialize, Serialize};

use super::paths::SpendPaths;
use crate::detection::TransactionDetector;
use crate::error::SpendError;

/// User settings for SpendScan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Currency assigned to detected amounts when the line names none
    #[serde(default = "default_currency")]
    pub default_currency: String,

    /// Currency reported on monthly insight summaries
    #[serde(default = "default_currency")]
    pub base_currency: String,

    /// Default tracing filter when RUST_LOG is unset
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "MYR".to_string()
}

fn default_log_filter() -> String {
    "warn".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            default_currency: default_currency(),
            base_currency: default_currency(),
            log_filter: default_log_filter(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &SpendPaths) -> Result<Self, SpendError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| SpendError::Io(format!("Failed to read settings file: {}", e)))?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                SpendError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &SpendPaths) -> Result<(), SpendError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| SpendError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| SpendError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }

    /// Build a transaction detector configured with these settings
    pub fn detector(&self) -> TransactionDetector {
        TransactionDetector::new().with_default_currency(&self.default_currency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.default_currency, "MYR");
        assert_eq!(settings.base_currency, "MYR");
        assert_eq!(settings.log_filter, "warn");
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = SpendPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.default_currency = "USD".into();
        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.default_currency, "USD");
        assert_eq!(loaded.base_currency, "MYR");
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let loaded: Settings = serde_json::from_str(r#"{"base_currency":"SGD"}"#).unwrap();
        assert_eq!(loaded.base_currency, "SGD");
        assert_eq!(loaded.default_currency, "MYR");
        assert_eq!(loaded.schema_version, 1);
    }

    #[test]
    fn test_legacy_date_format_field_is_ignored() {
        let loaded: Settings =
            serde_json::from_str(r#"{"date_format":"%d/%m/%Y","default_currency":"USD"}"#)
                .unwrap();
        assert_eq!(loaded.default_currency, "USD");
        let json = serde_json::to_string(&loaded).unwrap();
        assert!(!json.contains("date_format"));
    }

    #[test]
    fn test_detector_uses_default_currency() {
        let mut settings = Settings::default();
        settings.default_currency = "SGD".into();
        let detector = settings.detector();
        assert_eq!(detector.default_currency(), "SGD");
    }
}
