use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};

use crate::tracker::{DEFAULT_MONTHLY_MESSAGE_LIMIT, DEFAULT_STORAGE_KEY};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Sqlite,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.to_ascii_lowercase().as_str() {
            "sqlite" => Ok(StorageBackend::Sqlite),
            "memory" => Ok(StorageBackend::Memory),
            _ => anyhow::bail!("unknown storage backend {value}"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct QuotaTrackerConfig {
    pub server_host: String,
    pub server_port: u16,
    pub data_dir: PathBuf,
    pub storage_backend: StorageBackend,
    pub storage_key: String,
    pub monthly_message_limit: u64,
    pub log_level: String,
}

impl Default for QuotaTrackerConfig {
    fn default() -> Self {
        Self {
            server_host: "127.0.0.1".to_string(),
            server_port: 8183,
            data_dir: PathBuf::from("data/quota"),
            storage_backend: StorageBackend::Sqlite,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            monthly_message_limit: DEFAULT_MONTHLY_MESSAGE_LIMIT,
            log_level: "info".to_string(),
        }
    }
}

impl QuotaTrackerConfig {
    pub fn from_env() -> Result<Self> {
        let mut cfg = Self::default();

        if let Ok(host) = env::var("QUOTA_HOST") {
            cfg.server_host = host;
        }
        if let Ok(port) = env::var("QUOTA_PORT") {
            cfg.server_port = port.parse().context("QUOTA_PORT must be a valid u16")?;
        }
        if let Ok(dir) = env::var("QUOTA_DATA_DIR") {
            cfg.data_dir = PathBuf::from(dir);
        }
        if let Ok(backend) = env::var("QUOTA_STORAGE_BACKEND") {
            cfg.storage_backend = backend
                .parse()
                .context("QUOTA_STORAGE_BACKEND must be 'sqlite' or 'memory'")?;
        }
        if let Ok(key) = env::var("QUOTA_STORAGE_KEY") {
            cfg.storage_key = key;
        }
        if let Ok(limit) = env::var("MONTHLY_MESSAGE_LIMIT") {
            cfg.monthly_message_limit = limit
                .parse()
                .context("MONTHLY_MESSAGE_LIMIT must be a positive integer")?;
        }
        if let Ok(level) = env::var("LOG_LEVEL") {
            cfg.log_level = level;
        }

        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.storage_backend == StorageBackend::Sqlite {
            ensure_directory(&self.data_dir)?;
        }

        if self.monthly_message_limit == 0 {
            anyhow::bail!("MONTHLY_MESSAGE_LIMIT must be greater than zero");
        }
        if self.storage_key.trim().is_empty() {
            anyhow::bail!("QUOTA_STORAGE_KEY cannot be empty");
        }

        Ok(())
    }
}

fn ensure_directory(path: &Path) -> Result<()> {
    if path.exists() {
        if !path.is_dir() {
            anyhow::bail!("{} exists but is not a directory", path.display());
        }
    } else {
        fs::create_dir_all(path)
            .with_context(|| format!("unable to create data directory {}", path.display()))?;
    }
    Ok(())
}
