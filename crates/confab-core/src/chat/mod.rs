//! Chat lifecycle and turn orchestration for Confab.
//!
//! `ChatService` manages the chat containers; `TurnService` runs the
//! persist-complete-persist pipeline for text and image turns; `title`
//! derives chat titles from the first exchange.

pub mod service;
pub mod title;
pub mod turn;
