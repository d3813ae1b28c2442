//! Service layer orchestrating domain operations and infrastructure adapters.

mod article_service;

pub use article_service::{ArticleService, ArticleStore, IdGenerator, ServiceConfig};
