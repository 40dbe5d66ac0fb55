//! Completion provider abstractions for Confab.
//!
//! This module defines the `CompletionClient` trait that the infrastructure
//! layer implements for text and vision completions.

pub mod client;
