//! Application orchestration: state, the document, event reading, and input handling.

pub mod document;
pub mod event;
pub mod handler;
pub mod state;
