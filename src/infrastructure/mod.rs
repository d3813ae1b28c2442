//! Infrastructure layer wiring concrete adapters (storage, identifiers).

pub mod identity;
pub mod storage;

pub use identity::TimeOrderedIdGenerator;
pub use storage::{InMemoryArticleStore, SledArticleStore};
