//! Application layer coordinating collaborators and application state.
//!
//! This module owns the coordinator, the event bus, the collaborator
//! contracts and the cart that persists itself through storage.

pub mod cart;
pub mod collaborators;
pub mod container;
pub mod coordinator;
pub mod event_bus;
pub mod state;
pub mod themes;

#[cfg(test)]
pub(crate) mod testing;

pub use cart::*;
pub use collaborators::*;
pub use container::*;
pub use coordinator::*;
pub use event_bus::*;
pub use state::*;
pub use themes::*;
