//! Ledger configuration.
//!
//! Values are layered: built-in defaults, then an optional TOML file, then
//! `BUDGET_`-prefixed environment variables (`__` separates nested keys,
//! e.g. `BUDGET_STORAGE__PATH`).

use std::path::{Path, PathBuf};
use std::time::Duration;

use budget_ledger_core::UserId;
use budget_ledger_store::SqliteOptions;
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;

use crate::error::Result;

const ENV_PREFIX: &str = "BUDGET";

/// Where and how the ledger is stored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// SQLite database file.
    pub path: PathBuf,
    pub busy_timeout_ms: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/budget.db"),
            busy_timeout_ms: 5000,
        }
    }
}

impl StorageConfig {
    pub fn sqlite_options(&self) -> SqliteOptions {
        SqliteOptions {
            busy_timeout: Duration::from_millis(self.busy_timeout_ms),
        }
    }
}

/// Configuration for the Ledger.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    pub storage: StorageConfig,
    /// Attribution for entries written by `reset_balance`.
    pub system_user_id: UserId,
    pub reset_description: String,
    pub adjustment_description: String,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            storage: StorageConfig::default(),
            system_user_id: UserId::SYSTEM,
            reset_description: "Balance reset".to_string(),
            adjustment_description: "Balance adjustment".to_string(),
        }
    }
}

impl LedgerConfig {
    /// Load configuration from defaults, an optional file, and the environment.
    ///
    /// A file that is named explicitly must exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with(path, environment())
    }

    fn load_with(path: Option<&Path>, env: Environment) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(true));
        }
        builder = builder.add_source(env.try_parsing(true));

        let config = builder.build()?.try_deserialize()?;
        Ok(config)
    }
}

/// `BUDGET_` then the key, with `__` between nested keys.
fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(vars: &[(&str, &str)]) -> Environment {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        environment().source(Some(map))
    }

    #[test]
    fn test_defaults() {
        let config = LedgerConfig::load_with(None, env(&[])).unwrap();
        assert_eq!(config, LedgerConfig::default());
        assert_eq!(config.storage.path, PathBuf::from("data/budget.db"));
        assert_eq!(
            config.storage.sqlite_options().busy_timeout,
            Duration::from_secs(5)
        );
        assert_eq!(config.system_user_id, UserId(0));
    }

    #[test]
    fn test_file_then_env_override() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            system_user_id = 77
            reset_description = "Monthly close"

            [storage]
            path = "/var/lib/budget/ledger.db"
            "#
        )
        .unwrap();

        let config = LedgerConfig::load_with(
            Some(file.path()),
            env(&[
                ("BUDGET_STORAGE__BUSY_TIMEOUT_MS", "250"),
                ("BUDGET_RESET_DESCRIPTION", "Zeroed"),
            ]),
        )
        .unwrap();

        assert_eq!(config.system_user_id, UserId(77));
        assert_eq!(config.reset_description, "Zeroed");
        assert_eq!(config.adjustment_description, "Balance adjustment");
        assert_eq!(config.storage.path, PathBuf::from("/var/lib/budget/ledger.db"));
        assert_eq!(config.storage.busy_timeout_ms, 250);
    }

    #[test]
    fn test_env_nested_key_uses_single_underscore_after_prefix() {
        let config = LedgerConfig::load_with(
            None,
            env(&[
                ("BUDGET_STORAGE__PATH", "/tmp/x.db"),
                ("BUDGET_SYSTEM_USER_ID", "-5"),
            ]),
        )
        .unwrap();

        assert_eq!(config.storage.path, PathBuf::from("/tmp/x.db"));
        assert_eq!(config.system_user_id, UserId(-5));
        assert_eq!(config.storage.busy_timeout_ms, 5000);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");
        assert!(LedgerConfig::load_with(Some(&missing), env(&[])).is_err());
    }
}
