use crate::errors::{AppError, AppResult};
use crate::models::period_type::PeriodType;
use crate::utils::path::expand_tilde;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "rtimeledger";
const CONFIG_NAME: &str = "rtimeledger.conf";
const DB_NAME: &str = "rtimeledger.sqlite";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: String,
    #[serde(default)]
    pub default_period_type: PeriodType,
    #[serde(default = "default_stats_window")]
    pub stats_window_days: u32,
    #[serde(default = "default_rollback_delay")]
    pub rollback_delay_secs: u64,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub show_seconds: bool,
}

fn default_stats_window() -> u32 {
    30
}
fn default_rollback_delay() -> u64 {
    2
}
fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self::with_database(Self::database_file())
    }
}

impl Config {
    fn with_database(db: PathBuf) -> Self {
        Self {
            database: db.to_string_lossy().to_string(),
            default_period_type: PeriodType::default(),
            stats_window_days: default_stats_window(),
            rollback_delay_secs: default_rollback_delay(),
            log_level: default_log_level(),
            show_seconds: false,
        }
    }

    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join(APP_DIR)
        } else {
            let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(format!(".{APP_DIR}"))
        }
    }

    pub fn config_file() -> PathBuf {
        Self::config_dir().join(CONFIG_NAME)
    }

    pub fn database_file() -> PathBuf {
        Self::config_dir().join(DB_NAME)
    }

    /// Load configuration from file, or defaults if there is none.
    pub fn load() -> AppResult<Self> {
        Self::load_from(&Self::config_file())
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|_| AppError::ConfigLoad)?;
        serde_yaml::from_str(&content)
            .map_err(|e| AppError::Config(format!("{}: {e}", path.display())))
    }

    /// `~` expansion and relative names resolved against the config dir.
    pub fn resolve_db_path(name: &str) -> PathBuf {
        let p = expand_tilde(name);
        if p.is_absolute() || p.components().count() > 1 {
            p
        } else {
            Self::config_dir().join(p)
        }
    }

    pub fn rollback_delay(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.rollback_delay_secs as i64)
    }

    pub fn to_yaml(&self) -> AppResult<String> {
        serde_yaml::to_string(self).map_err(|e| AppError::Config(e.to_string()))
    }

    /// Create the config directory, the config file (skipped in test mode)
    /// and an empty database file. Returns the resulting configuration.
    pub fn init_all(custom_db: Option<&str>, is_test: bool) -> AppResult<Self> {
        let db_path = match custom_db {
            Some(name) => Self::resolve_db_path(name),
            None => Self::database_file(),
        };

        if !is_test {
            fs::create_dir_all(Self::config_dir())?;
        }
        if let Some(parent) = db_path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let config = Self::with_database(db_path.clone());

        if !is_test {
            let yaml = config.to_yaml()?;
            let mut file = fs::File::create(Self::config_file())?;
            file.write_all(yaml.as_bytes())?;
        }

        if !db_path.exists() {
            fs::File::create(&db_path)?;
        }

        Ok(config)
    }
}
