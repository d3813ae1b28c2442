use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::application::services::ServiceConfig;

/// Default filename used to persist configuration within the data directory.
const CONFIG_FILENAME: &str = "config.json";

pub const ENV_DATA_DIR: &str = "ARTICLES_DATA_DIR";
pub const ENV_SERVICE_HOST: &str = "ARTICLES_SERVICE_HOST";
pub const ENV_SERVICE_PORT: &str = "ARTICLES_SERVICE_PORT";
pub const ENV_LOG: &str = "ARTICLES_LOG";

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 3200;

/// Storage engines compiled into the binary.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "backend", rename_all = "kebab-case")]
pub enum StorageBackend {
    /// Embedded sled database under `<data_dir>/store`.
    #[default]
    Sled,
    /// Process-local map; contents are lost on restart.
    Memory,
}

impl StorageBackend {
    pub fn id(&self) -> &'static str {
        match self {
            StorageBackend::Sled => "sled",
            StorageBackend::Memory => "memory",
        }
    }
}

/// Complete persisted configuration payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub storage: StorageBackend,
    #[serde(default)]
    pub service: ServiceConfig,
}

/// Thread-safe manager responsible for loading and persisting `AppConfig`.
pub struct ConfigManager {
    path: PathBuf,
    state: RwLock<AppConfig>,
}

impl ConfigManager {
    /// Create a manager rooted at `data_dir`. The JSON file will be located at
    /// `<data_dir>/config.json`. A missing or unreadable file yields defaults.
    pub fn load(data_dir: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = data_dir.as_ref().join(CONFIG_FILENAME);
        let config = if path.exists() {
            fs::read(&path)
                .ok()
                .and_then(|bytes| serde_json::from_slice::<AppConfig>(&bytes).ok())
                .unwrap_or_default()
        } else {
            AppConfig::default()
        };

        Ok(Self {
            path,
            state: RwLock::new(config),
        })
    }

    /// Snapshot of the current configuration.
    pub fn current(&self) -> AppConfig {
        self.state.read().clone()
    }

    /// Switch the storage backend and persist to disk.
    pub fn set_storage(&self, storage: StorageBackend) -> std::io::Result<AppConfig> {
        {
            let mut guard = self.state.write();
            guard.storage = storage;
            self.persist_locked(&guard)?;
        }
        Ok(self.current())
    }

    /// Ensure the backing directory exists and write the JSON payload.
    fn persist_locked(&self, config: &AppConfig) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let payload = serde_json::to_vec_pretty(config)?;
        fs::write(&self.path, payload)
    }
}

/// Bind address for the HTTP service, from the environment.
pub fn service_addr() -> (String, u16) {
    let host = std::env::var(ENV_SERVICE_HOST).unwrap_or_else(|_| DEFAULT_HOST.to_string());
    let port = std::env::var(ENV_SERVICE_PORT)
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(DEFAULT_PORT);
    (host, port)
}
