//! Infrastructure layer providing external service integrations.
//!
//! This module contains the file-backed store, configuration loading,
//! receipt export and log setup.

pub mod config;
pub mod logging;
pub mod persistence;
pub mod receipt;

pub use config::*;
pub use logging::*;
pub use persistence::*;
pub use receipt::*;
