//! Completion provider adapters.

pub mod openai;
