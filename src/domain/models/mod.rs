use serde::{Deserialize, Serialize};

/// A single stored article.
///
/// `title` and `body` are opaque to the service and passed through unchanged.
/// `id` is optional on the wire so create payloads may omit it; the service
/// replaces whatever the caller sent with a freshly generated identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    #[serde(default)]
    pub id: String,
    pub title: String,
    pub body: String,
}

impl Article {
    pub fn new(id: impl Into<String>, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            body: body.into(),
        }
    }

    /// Same content under a different identifier.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn has_id(&self) -> bool {
        !self.id.trim().is_empty()
    }
}
