//! Presentation layer handling the terminal UI, screens and user input.
//!
//! This module renders the application container with ratatui, maps key
//! presses to domain events and provides the concrete screens.

pub mod input;
pub mod screen_manager;
pub mod screens;
pub mod session;
pub mod ui;

pub use input::*;
pub use screen_manager::*;
pub use screens::*;
pub use session::*;
pub use ui::*;
