//! Storage adapters for articles.
//!
//! The sled-backed store persists to the data directory; the in-memory store
//! keeps everything in process and is used for ephemeral runs and tests.

pub mod memory_store;
pub mod sled_store;

pub use memory_store::InMemoryArticleStore;
pub use sled_store::SledArticleStore;
