//! HTTP request handlers.

pub mod auth;
pub mod chat;
pub mod message;
pub mod upload;
