use std::path::Path;

use bincode::Options;
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use sled::{Config, Db, IVec, Tree};

use crate::{
    application::services::ArticleStore,
    domain::{Article, DomainError},
};

const ARTICLES_TREE: &str = "articles";

/// Embedded article store backed by `sled`.
///
/// Articles live in a single tree keyed by the raw id bytes, so iteration
/// order follows id order. Writes are serialized through `write_lock` so the
/// existence checks in `insert` and `update` cannot race with each other.
pub struct SledArticleStore {
    db: Db,
    articles: Tree,
    write_lock: Mutex<()>,
}

impl SledArticleStore {
    /// Opens (or creates) a sled database rooted at `data_dir`.
    pub fn open(data_dir: impl AsRef<Path>) -> Result<Self, DomainError> {
        let dir = data_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir).map_err(|err| {
            DomainError::storage(format!("failed to create data directory {:?}: {err}", dir))
        })?;

        let db = Config::default()
            .path(&dir)
            .cache_capacity(16 * 1024 * 1024)
            .open()
            .map_err(|err| engine_error("failed to open sled db", err))?;

        let articles = db
            .open_tree(ARTICLES_TREE)
            .map_err(|err| engine_error("failed to open articles tree", err))?;

        Ok(Self {
            db,
            articles,
            write_lock: Mutex::new(()),
        })
    }

    fn serialize<T: serde::Serialize>(value: &T) -> Result<Vec<u8>, DomainError> {
        bincode::options()
            .with_fixint_encoding()
            .allow_trailing_bytes()
            .serialize(value)
            .map_err(|err| DomainError::storage(format!("serialization error: {err}")))
    }

    fn deserialize<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, DomainError> {
        bincode::options()
            .with_fixint_encoding()
            .allow_trailing_bytes()
            .deserialize(bytes)
            .map_err(|err| DomainError::storage(format!("deserialization error: {err}")))
    }

    fn decode_article(bytes: &IVec) -> Result<Article, DomainError> {
        Self::deserialize(bytes.as_ref())
    }

    fn write(&self, article: &Article) -> Result<(), DomainError> {
        let bytes = Self::serialize(article)?;
        self.articles
            .insert(article.id.as_bytes(), bytes)
            .map_err(|err| engine_error("failed to persist article", err))?;

        self.flush()
    }

    fn exists(&self, id: &str) -> Result<bool, DomainError> {
        self.articles
            .contains_key(id.as_bytes())
            .map_err(|err| engine_error("failed to read article", err))
    }

    fn flush(&self) -> Result<(), DomainError> {
        self.articles
            .flush()
            .map_err(|err| engine_error("failed to flush articles", err))?;
        Ok(())
    }
}

impl ArticleStore for SledArticleStore {
    fn list(&self) -> Result<Vec<Article>, DomainError> {
        let mut items = Vec::new();

        for entry in self.articles.iter() {
            let (_, value) =
                entry.map_err(|err| engine_error("failed to read article record", err))?;
            items.push(Self::decode_article(&value)?);
        }

        Ok(items)
    }

    fn insert(&self, article: &Article) -> Result<(), DomainError> {
        let _guard = self.write_lock.lock();

        if self.exists(&article.id)? {
            return Err(DomainError::conflict(format!(
                "article `{}` already exists",
                article.id
            )));
        }

        self.write(article)
    }

    fn get(&self, id: &str) -> Result<Article, DomainError> {
        let value = self
            .articles
            .get(id.as_bytes())
            .map_err(|err| engine_error("failed to read article", err))?
            .ok_or_else(|| DomainError::not_found(format!("article `{id}`")))?;

        Self::decode_article(&value)
    }

    fn update(&self, article: &Article) -> Result<(), DomainError> {
        let _guard = self.write_lock.lock();

        if !self.exists(&article.id)? {
            return Err(DomainError::not_found(format!("article `{}`", article.id)));
        }

        self.write(article)
    }

    fn delete(&self, id: &str) -> Result<(), DomainError> {
        let _guard = self.write_lock.lock();

        self.articles
            .remove(id.as_bytes())
            .map_err(|err| engine_error("failed to delete article", err))?
            .ok_or_else(|| DomainError::not_found(format!("article `{id}`")))?;

        self.flush()
    }

    fn ping(&self) -> Result<(), DomainError> {
        self.db
            .flush()
            .map_err(|err| engine_error("failed to flush db", err))?;

        Ok(())
    }
}

fn engine_error(context: &str, err: sled::Error) -> DomainError {
    match err {
        sled::Error::Io(io) => DomainError::unavailable(format!("{context}: {io}")),
        other => DomainError::storage(format!("{context}: {other}")),
    }
}
