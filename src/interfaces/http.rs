//! HTTP surface for the article service.
//!
//! # Endpoints
//!
//! - `GET /health` - Store readiness
//! - `GET /articles` - List all articles
//! - `POST /articles` - Create an article (any `id` in the body is ignored)
//! - `PUT /articles` - Update the article named by the body's `id`
//! - `GET /articles/random` - One article chosen uniformly at random
//! - `GET /articles/:id` - Fetch one article
//! - `DELETE /articles/:id` - Delete one article
//!
//! Write endpoints answer `null` on success. Failures carry the raw error
//! text: plain text for client errors, a JSON string otherwise.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use tracing::{debug, info};

use crate::{
    application::{ArticleService, HealthStatusResponse},
    domain::{Article, DomainError},
};

/// Error wrapper translating domain failures into HTTP responses.
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            DomainError::Validation(_) | DomainError::LimitExceeded(_) => StatusCode::BAD_REQUEST,
            DomainError::NotFound(_) => StatusCode::NOT_FOUND,
            DomainError::Conflict(_) => StatusCode::CONFLICT,
            DomainError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            DomainError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.0.to_string();

        if self.0.is_client_error() {
            (status, message).into_response()
        } else {
            (status, Json(message)).into_response()
        }
    }
}

/// Builds the router with every article route bound to `service`.
pub fn router(service: Arc<ArticleService>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route(
            "/articles",
            get(list_articles).post(create_article).put(update_article),
        )
        .route("/articles/random", get(random_article))
        .route("/articles/:id", get(show_article).delete(delete_article))
        .with_state(service)
}

/// Store calls block, so they run on the blocking pool.
async fn run_blocking<T, F>(service: Arc<ArticleService>, op: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&ArticleService) -> Result<T, DomainError> + Send + 'static,
{
    tokio::task::spawn_blocking(move || op(&service))
        .await
        .map_err(|err| ApiError(DomainError::storage(format!("worker task failed: {err}"))))?
        .map_err(ApiError)
}

async fn health_check(
    State(service): State<Arc<ArticleService>>,
) -> Result<Json<HealthStatusResponse>, ApiError> {
    let status = run_blocking(service, |s| s.health()).await?;
    Ok(Json(status))
}

async fn list_articles(
    State(service): State<Arc<ArticleService>>,
) -> Result<Json<Vec<Article>>, ApiError> {
    let articles = run_blocking(service, |s| s.list()).await?;
    debug!(count = articles.len(), "listed articles");
    Ok(Json(articles))
}

async fn create_article(
    State(service): State<Arc<ArticleService>>,
    body: Bytes,
) -> Result<Json<()>, ApiError> {
    run_blocking(service, move |s| s.create(&body)).await?;
    Ok(Json(()))
}

async fn show_article(
    State(service): State<Arc<ArticleService>>,
    Path(id): Path<String>,
) -> Result<Json<Article>, ApiError> {
    let article = run_blocking(service, move |s| s.show(&id)).await?;
    Ok(Json(article))
}

async fn update_article(
    State(service): State<Arc<ArticleService>>,
    body: Bytes,
) -> Result<Json<()>, ApiError> {
    run_blocking(service, move |s| s.update(&body)).await?;
    Ok(Json(()))
}

async fn delete_article(
    State(service): State<Arc<ArticleService>>,
    Path(id): Path<String>,
) -> Result<Json<()>, ApiError> {
    run_blocking(service, move |s| s.delete(&id)).await?;
    info!("article deleted");
    Ok(Json(()))
}

async fn random_article(
    State(service): State<Arc<ArticleService>>,
) -> Result<Json<Article>, ApiError> {
    let article = run_blocking(service, |s| s.random()).await?;
    Ok(Json(article))
}

#[cfg(test)]
mod tests {
    use axum::{body::Body, http::Request};
    use tower::ServiceExt;

    use super::*;
    use crate::{
        application::services::{ArticleStore, IdGenerator, ServiceConfig},
        infrastructure::{InMemoryArticleStore, TimeOrderedIdGenerator},
    };

    fn app_with(articles: &[Article]) -> Router {
        let store = Arc::new(InMemoryArticleStore::new());
        for article in articles {
            store.insert(article).unwrap();
        }
        let service = ArticleService::new(
            store,
            Arc::new(TimeOrderedIdGenerator),
            ServiceConfig::with_seed(1),
        );
        router(Arc::new(service))
    }

    struct FailingStore;

    impl ArticleStore for FailingStore {
        fn list(&self) -> Result<Vec<Article>, DomainError> {
            Err(DomainError::storage("disk on fire"))
        }

        fn insert(&self, _article: &Article) -> Result<(), DomainError> {
            Err(DomainError::storage("disk on fire"))
        }

        fn get(&self, _id: &str) -> Result<Article, DomainError> {
            Err(DomainError::storage("disk on fire"))
        }

        fn update(&self, _article: &Article) -> Result<(), DomainError> {
            Err(DomainError::storage("disk on fire"))
        }

        fn delete(&self, _id: &str) -> Result<(), DomainError> {
            Err(DomainError::storage("disk on fire"))
        }

        fn ping(&self) -> Result<(), DomainError> {
            Err(DomainError::storage("disk on fire"))
        }
    }

    /// Hands out the same id every time.
    struct FixedId;

    impl IdGenerator for FixedId {
        fn next_id(&self) -> String {
            "fixed".to_string()
        }
    }

    fn app_over(store: Arc<dyn ArticleStore>, ids: Arc<dyn IdGenerator>) -> Router {
        router(Arc::new(ArticleService::new(
            store,
            ids,
            ServiceConfig::with_seed(1),
        )))
    }

    async fn send(app: &Router, method: &str, uri: &str, body: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn create_then_list_and_show() {
        let app = app_with(&[]);

        let (status, body) = send(
            &app,
            "POST",
            "/articles",
            r#"{"id":"mine","title":"x","body":"y"}"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "null");

        let (status, body) = send(&app, "GET", "/articles", "").await;
        assert_eq!(status, StatusCode::OK);
        let listed: Vec<Article> = serde_json::from_str(&body).unwrap();
        assert_eq!(listed.len(), 1);
        assert_ne!(listed[0].id, "mine");

        let (status, body) = send(&app, "GET", &format!("/articles/{}", listed[0].id), "").await;
        assert_eq!(status, StatusCode::OK);
        let shown: Article = serde_json::from_str(&body).unwrap();
        assert_eq!(shown, listed[0]);
    }

    #[tokio::test]
    async fn malformed_payload_is_a_plain_text_bad_request() {
        let app = app_with(&[]);

        let (status, body) = send(&app, "POST", "/articles", r#"{"title":3}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.starts_with("validation error"));

        let (status, _) = send(&app, "PUT", "/articles", "garbage").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, body) = send(&app, "GET", "/articles", "").await;
        assert_eq!(body, "[]");
    }

    #[tokio::test]
    async fn scenario_delete_removes_only_the_target() {
        let app = app_with(&[Article::new("a1", "x", ""), Article::new("a2", "y", "")]);

        let (status, body) = send(&app, "GET", "/articles/a1", "").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            serde_json::from_str::<Article>(&body).unwrap(),
            Article::new("a1", "x", "")
        );

        let (status, body) = send(&app, "DELETE", "/articles/a1", "").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "null");

        let (_, body) = send(&app, "GET", "/articles", "").await;
        assert_eq!(
            serde_json::from_str::<Vec<Article>>(&body).unwrap(),
            vec![Article::new("a2", "y", "")]
        );

        let (status, body) = send(&app, "GET", "/articles/a1", "").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(serde_json::from_str::<String>(&body).unwrap().contains("a1"));
    }

    #[tokio::test]
    async fn update_overwrites_existing_article() {
        let app = app_with(&[Article::new("a1", "x", "")]);

        let (status, body) = send(
            &app,
            "PUT",
            "/articles",
            r#"{"id":"a1","title":"edited","body":"b"}"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "null");

        let (_, body) = send(&app, "GET", "/articles/a1", "").await;
        assert_eq!(
            serde_json::from_str::<Article>(&body).unwrap(),
            Article::new("a1", "edited", "b")
        );

        let (status, _) = send(
            &app,
            "PUT",
            "/articles",
            r#"{"id":"nope","title":"t","body":"b"}"#,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn random_route_is_not_shadowed_by_id_route() {
        let app = app_with(&[Article::new("a1", "only", "")]);

        let (status, body) = send(&app, "GET", "/articles/random", "").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(serde_json::from_str::<Article>(&body).unwrap().id, "a1");
    }

    #[tokio::test]
    async fn random_on_empty_store_is_not_found() {
        let app = app_with(&[]);

        let (status, _) = send(&app, "GET", "/articles/random", "").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn health_reports_ready() {
        let app = app_with(&[]);

        let (status, body) = send(&app, "GET", "/health", "").await;
        assert_eq!(status, StatusCode::OK);
        let health: HealthStatusResponse = serde_json::from_str(&body).unwrap();
        assert!(health.ok);
    }

    #[tokio::test]
    async fn health_on_failing_store_is_service_unavailable() {
        let app = app_over(Arc::new(FailingStore), Arc::new(TimeOrderedIdGenerator));

        let (status, body) = send(&app, "GET", "/health", "").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        let message: String = serde_json::from_str(&body).unwrap();
        assert!(message.starts_with("storage unavailable"));
    }

    #[tokio::test]
    async fn duplicate_id_on_create_is_a_conflict() {
        let app = app_over(Arc::new(InMemoryArticleStore::new()), Arc::new(FixedId));

        let (status, _) = send(&app, "POST", "/articles", r#"{"title":"a","body":""}"#).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(&app, "POST", "/articles", r#"{"title":"b","body":""}"#).await;
        assert_eq!(status, StatusCode::CONFLICT);
        let message: String = serde_json::from_str(&body).unwrap();
        assert!(message.contains("fixed"));

        let (_, body) = send(&app, "GET", "/articles/fixed", "").await;
        assert_eq!(serde_json::from_str::<Article>(&body).unwrap().title, "a");
    }

    #[tokio::test]
    async fn store_failures_are_json_string_server_errors() {
        let app = app_over(Arc::new(FailingStore), Arc::new(TimeOrderedIdGenerator));

        for (method, uri) in [
            ("GET", "/articles/a1"),
            ("DELETE", "/articles/a1"),
            ("GET", "/articles"),
            ("GET", "/articles/random"),
        ] {
            let (status, body) = send(&app, method, uri, "").await;
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{method} {uri}");
            assert_eq!(
                serde_json::from_str::<String>(&body).unwrap(),
                "storage failure: disk on fire"
            );
        }
    }

    #[test]
    fn statuses_follow_error_kind() {
        assert_eq!(
            ApiError(DomainError::conflict("dup")).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError(DomainError::unavailable("closed")).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ApiError(DomainError::storage("io")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError(DomainError::limit("big")).status(),
            StatusCode::BAD_REQUEST
        );
    }
}
