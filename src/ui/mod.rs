//! UI / rendering layer: everything that touches Ratatui widgets.
//!
//! This layer takes application state and turns it into cells on the
//! terminal.  It never mutates the document or the controller.

pub mod back_to_top;
pub mod document_view;
pub mod layout;
pub mod theme;
