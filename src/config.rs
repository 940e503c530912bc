//! Configuration management module.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Log levels accepted by `logging.level`.
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Configuration load result.
#[derive(Debug)]
pub enum ConfigLoadResult {
    /// Config loaded successfully.
    Loaded(AppConfig),
    /// Config file missing (first run).
    Missing,
    /// Config file exists but invalid.
    Invalid(ConfigError),
}

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Main application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// SQLite database location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database file. Relative paths resolve against the config file's directory.
    pub path: String,
}

/// KPI report settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    pub title: String,
    pub currency_symbol: String,
    /// Directory holding `<family>-Regular.ttf`, `-Bold`, `-Italic`, `-BoldItalic`.
    pub font_dir: String,
    pub font_family: String,
}

/// Log output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file_enabled: bool,
    /// Empty means the platform data directory.
    #[serde(default)]
    pub directory: String,
}

impl AppConfig {
    /// Get config file path (same directory as executable).
    pub fn default_path() -> PathBuf {
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
            .unwrap_or_else(|| PathBuf::from("."))
            .join("config.toml")
    }

    /// Attempt to load config with detailed result.
    pub fn try_load(path: &Path) -> ConfigLoadResult {
        if !path.exists() {
            return ConfigLoadResult::Missing;
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str::<AppConfig>(&content) {
                Ok(config) => match config.validate() {
                    Ok(()) => ConfigLoadResult::Loaded(config),
                    Err(e) => ConfigLoadResult::Invalid(e),
                },
                Err(e) => ConfigLoadResult::Invalid(ConfigError::Parse(e)),
            },
            Err(e) => ConfigLoadResult::Invalid(ConfigError::Read(e)),
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.path.trim().is_empty() {
            return Err(ConfigError::Validation("Database path cannot be empty".to_string()));
        }
        if self.report.font_family.trim().is_empty() {
            return Err(ConfigError::Validation("Report font family cannot be empty".to_string()));
        }
        if self.report.currency_symbol.trim().is_empty() {
            return Err(ConfigError::Validation(
                "Report currency symbol cannot be empty".to_string(),
            ));
        }
        let level = self.logging.level.to_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::Validation(format!(
                "Unknown log level '{}' (expected one of: {})",
                self.logging.level,
                LOG_LEVELS.join(", ")
            )));
        }
        Ok(())
    }

    /// Save configuration to file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

impl DatabaseConfig {
    /// Resolve the database file against the directory holding the config.
    pub fn resolve_path(&self, config_dir: &Path) -> PathBuf {
        let path = Path::new(&self.path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            config_dir.join(path)
        }
    }

    /// Build connection string for SeaORM. `mode=rwc` creates the file on first run.
    pub fn connection_string(&self, config_dir: &Path) -> String {
        format!("sqlite://{}?mode=rwc", self.resolve_path(config_dir).display())
    }
}

impl ReportConfig {
    /// Resolve the font directory against the directory holding the config.
    pub fn resolve_font_dir(&self, config_dir: &Path) -> PathBuf {
        let path = Path::new(&self.font_dir);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            config_dir.join(path)
        }
    }
}

impl LoggingConfig {
    /// Directory for rolling log files.
    pub fn log_dir(&self) -> PathBuf {
        if !self.directory.trim().is_empty() {
            return PathBuf::from(&self.directory);
        }
        directories::ProjectDirs::from("", "", "filiale-sales")
            .map(|dirs| dirs.data_local_dir().join("logs"))
            .unwrap_or_else(|| PathBuf::from("logs"))
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: "sales.db".to_string(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            title: "Sales KPI Report".to_string(),
            currency_symbol: "€".to_string(),
            font_dir: "fonts".to_string(),
            font_family: "LiberationSans".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_enabled: false,
            directory: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_connection_string_relative() {
        let db = DatabaseConfig {
            path: "data/sales.db".to_string(),
        };
        let conn = db.connection_string(Path::new("/opt/app"));
        assert_eq!(conn, "sqlite:///opt/app/data/sales.db?mode=rwc");
    }

    #[test]
    fn test_connection_string_absolute() {
        let db = DatabaseConfig {
            path: "/var/lib/sales.db".to_string(),
        };
        assert_eq!(db.resolve_path(Path::new("/opt/app")), PathBuf::from("/var/lib/sales.db"));
    }

    #[test]
    fn test_validation_empty_database_path() {
        let mut config = AppConfig::default();
        config.database.path = "   ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_log_level() {
        let mut config = AppConfig::default();

        config.logging.level = "verbose".to_string();
        assert!(config.validate().is_err());

        config.logging.level = "DEBUG".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_currency_symbol() {
        let mut config = AppConfig::default();
        config.report.currency_symbol = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_minimal_toml() {
        let config: AppConfig = toml::from_str("[database]\npath = \"other.db\"\n").unwrap();
        assert_eq!(config.database.path, "other.db");
        assert_eq!(config.report.font_family, "LiberationSans");
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = std::env::temp_dir().join(format!("filiale-sales-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");

        let mut config = AppConfig::default();
        config.report.title = "Quarterly".to_string();
        config.save(&path).unwrap();

        match AppConfig::try_load(&path) {
            ConfigLoadResult::Loaded(loaded) => assert_eq!(loaded.report.title, "Quarterly"),
            other => panic!("unexpected load result: {other:?}"),
        }

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_missing_config() {
        let path = std::env::temp_dir().join("filiale-sales-definitely-missing.toml");
        assert!(matches!(AppConfig::try_load(&path), ConfigLoadResult::Missing));
    }
}
