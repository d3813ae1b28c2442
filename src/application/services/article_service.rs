use std::sync::Arc;

use chrono::Utc;
use parking_lot::Mutex;
use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use tracing::{debug, error, info_span, warn, Span};

use crate::{
    application::dtos::HealthStatusResponse,
    domain::{Article, DomainError},
};

const DEFAULT_MAX_PAYLOAD_BYTES: usize = 64 * 1024;
/// Limits below this would reject ordinary payloads.
const MIN_PAYLOAD_BYTES: usize = 256;

/// Tunables for the article service, persisted under `service` in `config.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(
        default = "default_max_payload_bytes",
        deserialize_with = "deserialize_payload_limit"
    )]
    pub max_payload_bytes: usize,
    /// Fixed seed for random selection. `None` seeds from the OS.
    #[serde(default)]
    pub random_seed: Option<u64>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            max_payload_bytes: DEFAULT_MAX_PAYLOAD_BYTES,
            random_seed: None,
        }
    }
}

impl ServiceConfig {
    pub fn new(max_payload_bytes: usize, random_seed: Option<u64>) -> Self {
        Self {
            max_payload_bytes: payload_limit_or_default(max_payload_bytes),
            random_seed,
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::new(DEFAULT_MAX_PAYLOAD_BYTES, Some(seed))
    }
}

/// Contract for the article persistence engine.
///
/// Implementations report a missing id as [`DomainError::NotFound`] and a
/// duplicate insert as [`DomainError::Conflict`].
pub trait ArticleStore: Send + Sync {
    fn list(&self) -> Result<Vec<Article>, DomainError>;

    fn insert(&self, article: &Article) -> Result<(), DomainError>;

    fn get(&self, id: &str) -> Result<Article, DomainError>;

    fn update(&self, article: &Article) -> Result<(), DomainError>;

    fn delete(&self, id: &str) -> Result<(), DomainError>;

    fn ping(&self) -> Result<(), DomainError>;
}

/// Source of fresh article identifiers.
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> String;
}

/// The usecase layer: decodes payloads, assigns identifiers, delegates to the
/// store and reports every failure through its span before returning it.
pub struct ArticleService {
    store: Arc<dyn ArticleStore>,
    ids: Arc<dyn IdGenerator>,
    config: ServiceConfig,
    rng: Mutex<fastrand::Rng>,
    span: Span,
}

impl ArticleService {
    pub fn new(
        store: Arc<dyn ArticleStore>,
        ids: Arc<dyn IdGenerator>,
        config: ServiceConfig,
    ) -> Self {
        Self::with_span(store, ids, config, info_span!("article_service"))
    }

    pub fn with_span(
        store: Arc<dyn ArticleStore>,
        ids: Arc<dyn IdGenerator>,
        config: ServiceConfig,
        span: Span,
    ) -> Self {
        let rng = match config.random_seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        };

        Self {
            store,
            ids,
            config,
            rng: Mutex::new(rng),
            span,
        }
    }

    pub fn list(&self) -> Result<Vec<Article>, DomainError> {
        self.store.list().map_err(|err| self.report("list", err))
    }

    /// Decodes `payload`, assigns a fresh id and persists the article.
    /// Any id present in the payload is discarded.
    pub fn create(&self, payload: &[u8]) -> Result<String, DomainError> {
        let draft: Article = self.decode("create", payload)?;
        let article = draft.with_id(self.ids.next_id());

        self.store
            .insert(&article)
            .map_err(|err| self.report("create", err))?;

        self.span
            .in_scope(|| debug!(id = %article.id, "article created"));
        Ok(article.id)
    }

    pub fn show(&self, id: &str) -> Result<Article, DomainError> {
        self.store.get(id).map_err(|err| self.report("show", err))
    }

    pub fn update(&self, payload: &[u8]) -> Result<(), DomainError> {
        let article: Article = self.decode("update", payload)?;
        if !article.has_id() {
            return Err(self.report("update", DomainError::validation("id is required")));
        }

        self.store
            .update(&article)
            .map_err(|err| self.report("update", err))
    }

    pub fn delete(&self, id: &str) -> Result<(), DomainError> {
        self.store.delete(id).map_err(|err| self.report("delete", err))
    }

    /// Picks one stored article uniformly at random.
    pub fn random(&self) -> Result<Article, DomainError> {
        let mut articles = self.store.list().map_err(|err| self.report("random", err))?;
        if articles.is_empty() {
            return Err(self.report("random", DomainError::not_found("no articles available")));
        }

        let index = self.rng.lock().usize(..articles.len());
        Ok(articles.swap_remove(index))
    }

    /// Readiness probe. Any store failure is reported as `Unavailable`.
    pub fn health(&self) -> Result<HealthStatusResponse, DomainError> {
        self.store.ping().map_err(|err| {
            let err = match err {
                DomainError::Storage(msg) => DomainError::unavailable(msg),
                other => other,
            };
            self.report("health", err)
        })?;

        Ok(HealthStatusResponse {
            ok: true,
            message: "ready".into(),
            details: Some(format!("checked_at: {}", Utc::now())),
        })
    }

    fn decode<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        payload: &[u8],
    ) -> Result<T, DomainError> {
        if payload.len() > self.config.max_payload_bytes {
            return Err(self.report(
                operation,
                DomainError::limit(format!(
                    "payload of {} bytes exceeds {} bytes",
                    payload.len(),
                    self.config.max_payload_bytes
                )),
            ));
        }

        serde_json::from_slice(payload)
            .map_err(|err| self.report(operation, DomainError::validation(err.to_string())))
    }

    fn report(&self, operation: &'static str, err: DomainError) -> DomainError {
        self.span.in_scope(|| {
            if err.is_client_error() {
                warn!(operation, error = %err, "rejected article payload");
            } else {
                error!(operation, error = %err, "article operation failed");
            }
        });
        err
    }
}

const fn default_max_payload_bytes() -> usize {
    DEFAULT_MAX_PAYLOAD_BYTES
}

fn payload_limit_or_default(limit: usize) -> usize {
    if limit < MIN_PAYLOAD_BYTES {
        DEFAULT_MAX_PAYLOAD_BYTES
    } else {
        limit
    }
}

fn deserialize_payload_limit<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    usize::deserialize(deserializer).map(payload_limit_or_default)
}
