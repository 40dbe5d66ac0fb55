//! Business logic and repository trait definitions for Confab.
//!
//! This crate defines the "ports" (repository and client traits) that the
//! infrastructure layer implements. It depends only on `confab-types` --
//! never on `confab-infra` or any database/IO crate.

pub mod auth;
pub mod chat;
pub mod llm;
pub mod repository;
pub mod storage;
