use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use tracing::info;

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod settings;

use application::services::{ArticleStore, IdGenerator};
use application::ArticleService;
use infrastructure::{InMemoryArticleStore, SledArticleStore, TimeOrderedIdGenerator};
use settings::{ConfigManager, StorageBackend, ENV_DATA_DIR, ENV_LOG};

/// Everything the service binary needs once bootstrapping succeeded.
pub struct AppHandles {
    pub service: Arc<ArticleService>,
    pub store: Arc<dyn ArticleStore>,
    pub config: Arc<ConfigManager>,
    pub data_dir: PathBuf,
}

/// Installs the global tracing subscriber once. Later calls are no-ops.
pub fn init_tracing() {
    init_tracing_with_writer(std::io::stderr);
}

fn init_tracing_with_writer<W>(make_writer: fn() -> W)
where
    W: std::io::Write + Send + Sync + 'static,
{
    static INIT: std::sync::OnceLock<()> = std::sync::OnceLock::new();

    let _ = INIT.get_or_init(|| {
        let filter = std::env::var(ENV_LOG).unwrap_or_else(|_| "info".into());
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(make_writer)
            .compact()
            .try_init();
    });
}

/// Resolves the data directory, loads config and opens the configured store.
pub fn build_environment() -> Result<AppHandles> {
    let data_dir = resolve_data_dir()?;
    build_environment_at(data_dir)
}

pub fn build_environment_at(data_dir: PathBuf) -> Result<AppHandles> {
    std::fs::create_dir_all(&data_dir).context("failed to create data directory")?;

    let config = Arc::new(ConfigManager::load(&data_dir).context("failed to load config file")?);
    let active_config = config.current();

    let store = open_store(&active_config.storage, &data_dir)?;
    info!(
        backend = active_config.storage.id(),
        data_dir = %data_dir.display(),
        "article store ready"
    );

    let ids: Arc<dyn IdGenerator> = Arc::new(TimeOrderedIdGenerator);
    let service = Arc::new(ArticleService::new(
        Arc::clone(&store),
        ids,
        active_config.service,
    ));

    Ok(AppHandles {
        service,
        store,
        config,
        data_dir,
    })
}

fn open_store(backend: &StorageBackend, data_dir: &Path) -> Result<Arc<dyn ArticleStore>> {
    match backend {
        StorageBackend::Sled => {
            let store_path = data_dir.join("store");
            let store = SledArticleStore::open(&store_path)
                .map_err(|err| anyhow!(err.to_string()))
                .context("failed to open embedded store")?;
            Ok(Arc::new(store))
        }
        StorageBackend::Memory => Ok(Arc::new(InMemoryArticleStore::new())),
    }
}

fn resolve_data_dir() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os(ENV_DATA_DIR) {
        return Ok(PathBuf::from(dir));
    }

    let dirs = directories::ProjectDirs::from("dev", "articles", "Articles")
        .ok_or_else(|| anyhow!("unable to determine OS data dir"))?;
    Ok(dirs.data_dir().to_path_buf())
}
