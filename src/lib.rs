//! TPOS - Terminal Point of Sale Library
//!
//! The coordination core of a touch-style point-of-sale front end: an
//! application coordinator with ordered async startup, a typed domain-event
//! dispatch table, a navigation state machine and switchable themes.

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

pub use domain::*;
pub use application::*;
