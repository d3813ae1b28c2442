//! Application layer wiring DTOs and services for the article API.

pub mod dtos;
pub mod services;

pub use dtos::HealthStatusResponse;
pub use services::ArticleService;
