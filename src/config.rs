//! Configuration management for Bankchain

use crate::blockchain::MAX_DIFFICULTY;
use crate::error::{ChainError, Result};
use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

pub const DEFAULT_CONFIG_PATH: &str = "bankchain.toml";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub ledger: LedgerConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LedgerConfig {
    #[serde(default = "default_difficulty")]
    pub difficulty: u32,
    #[serde(default = "default_creator_id")]
    pub creator_id: u64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            difficulty: default_difficulty(),
            creator_id: default_creator_id(),
        }
    }
}

fn default_difficulty() -> u32 {
    2
}

fn default_creator_id() -> u64 {
    42
}

/// Load configuration from `path`, falling back to defaults when the file
/// is missing or empty.
pub fn load_config(path: impl AsRef<Path>) -> Result<Config> {
    let config_str = match fs::read_to_string(path.as_ref()) {
        Ok(s) => s,
        Err(e) if e.kind() == ErrorKind::NotFound => String::new(),
        Err(e) => return Err(e.into()),
    };

    let config: Config = if config_str.trim().is_empty() {
        Config::default()
    } else {
        toml::from_str(&config_str)?
    };

    if config.ledger.difficulty > MAX_DIFFICULTY {
        return Err(ChainError::Config(format!(
            "ledger.difficulty must be at most {}, got {}",
            MAX_DIFFICULTY, config.ledger.difficulty
        )));
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.ledger.difficulty, 2);
        assert_eq!(config.ledger.creator_id, 42);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let file = write_config("[ledger]\ndifficulty = 3\n");
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.ledger.difficulty, 3);
        assert_eq!(config.ledger.creator_id, 42);
    }

    #[test]
    fn test_rejects_unsatisfiable_difficulty() {
        let file = write_config("[ledger]\ndifficulty = 65\n");
        let err = load_config(file.path()).unwrap_err();
        assert!(err.to_string().contains("ledger.difficulty must be at most 64"));
    }

    #[test]
    fn test_rejects_malformed_toml() {
        let file = write_config("[ledger\ndifficulty = ");
        assert!(matches!(load_config(file.path()), Err(ChainError::Config(_))));
    }
}
