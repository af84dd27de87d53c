//! Core logic of the back-to-top control: scroll sampling, the debounced
//! pulse, the scroll-to-top animator, and the controller that ties them
//! together.
//!
//! Nothing in this module depends on any TUI or rendering crate.  The
//! viewport and the clock come in through the [`surface::ScrollSurface`]
//! and [`scheduler::Scheduler`] traits.

pub mod animator;
pub mod controller;
pub mod presentation;
pub mod pulse;
pub mod sample;
pub mod scheduler;
pub mod surface;
