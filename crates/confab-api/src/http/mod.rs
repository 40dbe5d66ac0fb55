//! HTTP/REST API layer for Confab.
//!
//! Axum-based REST API with bearer-token authentication, a JSON error
//! envelope, and CORS support.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod router;
