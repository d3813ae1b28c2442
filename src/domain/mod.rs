//! Domain layer: the article entity and the errors shared across layers.

pub mod errors;
pub mod models;

pub use errors::DomainError;
pub use models::Article;
