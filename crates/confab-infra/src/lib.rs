//! Infrastructure layer for Confab.
//!
//! Contains implementations of the ports defined in `confab-core`:
//! SQLite storage, password hashing and bearer tokens, the OpenAI-compatible
//! completion client, and local upload storage.

pub mod crypto;
pub mod llm;
pub mod sqlite;
pub mod storage;
