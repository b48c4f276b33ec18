use serde::{Deserialize, Serialize};
use std::{
    fmt, fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use crate::{
    core::utils::{app_data_dir, config_file_in, ensure_dir, ledger_file_in, write_atomic},
    domain::Granularity,
    errors::LedgerError,
};

/// On-disk format of the ledger snapshot.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageFormat {
    #[default]
    Json,
    Csv,
}

impl StorageFormat {
    pub fn extension(self) -> &'static str {
        match self {
            StorageFormat::Json => "json",
            StorageFormat::Csv => "csv",
        }
    }
}

impl fmt::Display for StorageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for StorageFormat {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(StorageFormat::Json),
            "csv" => Ok(StorageFormat::Csv),
            other => Err(LedgerError::Config(format!(
                "unknown storage format `{other}` (expected json or csv)"
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub storage_format: StorageFormat,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ledger_file: Option<PathBuf>,
    #[serde(default = "Config::default_granularity")]
    pub default_granularity: Granularity,
    #[serde(default = "Config::default_currency_symbol")]
    pub currency_symbol: String,
    /// When set, the CLI requires this password before running any command.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_password: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_format: StorageFormat::default(),
            ledger_file: None,
            default_granularity: Self::default_granularity(),
            currency_symbol: Self::default_currency_symbol(),
            access_password: None,
        }
    }
}

impl Config {
    fn default_granularity() -> Granularity {
        Granularity::Monthly
    }

    fn default_currency_symbol() -> String {
        "$".into()
    }
}

pub struct ConfigManager {
    base: PathBuf,
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, LedgerError> {
        Self::with_base_dir(app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, LedgerError> {
        ensure_dir(&base)?;
        Ok(Self {
            path: config_file_in(&base),
            base,
        })
    }

    pub fn load(&self) -> Result<Config, LedgerError> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<(), LedgerError> {
        let json = serde_json::to_string_pretty(config)?;
        write_atomic(&self.path, json.as_bytes())?;
        Ok(())
    }

    /// Resolves the ledger file: the configured override (relative paths are
    /// taken from the base dir) or `ledger.<ext>` in the base dir.
    pub fn ledger_path(&self, config: &Config) -> PathBuf {
        match &config.ledger_file {
            Some(path) if path.is_absolute() => path.clone(),
            Some(path) => self.base.join(path),
            None => ledger_file_in(&self.base, config.storage_format.extension()),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        let config = manager.load().unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(manager.ledger_path(&config), dir.path().join("ledger.json"));
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        let config = Config {
            storage_format: StorageFormat::Csv,
            ledger_file: Some(PathBuf::from("books/main.csv")),
            default_granularity: Granularity::Weekly,
            currency_symbol: "€".into(),
            access_password: Some("hunter2".into()),
        };
        manager.save(&config).unwrap();
        assert_eq!(manager.load().unwrap(), config);
        assert_eq!(
            manager.ledger_path(&config),
            dir.path().join("books").join("main.csv")
        );
    }

    #[test]
    fn partial_config_fills_defaults() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        fs::write(manager.path(), r#"{"storage_format": "csv"}"#).unwrap();
        let config = manager.load().unwrap();
        assert_eq!(config.storage_format, StorageFormat::Csv);
        assert_eq!(config.default_granularity, Granularity::Monthly);
        assert_eq!(manager.ledger_path(&config), dir.path().join("ledger.csv"));
    }

    #[test]
    fn storage_format_parses() {
        assert_eq!("CSV".parse::<StorageFormat>().unwrap(), StorageFormat::Csv);
        assert!("xml".parse::<StorageFormat>().is_err());
    }
}
