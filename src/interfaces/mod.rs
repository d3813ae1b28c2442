//! Transport adapters exposing the article service.

pub mod http;

pub use http::{router, ApiError};
