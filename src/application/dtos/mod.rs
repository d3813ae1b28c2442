use serde::{Deserialize, Serialize};

/// Readiness of the article store, served from `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatusResponse {
    pub ok: bool,
    pub message: String,
    pub details: Option<String>,
}
