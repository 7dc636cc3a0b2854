//! Application state owned by the coordinator.
//!
//! Collaborators never write here; only navigation, theme loading and the
//! startup sequence do.

use crate::domain::{ScreenId, ThemeVariant};
use std::fmt;

/// Steps of the startup sequence, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum InitStage {
    Storage,
    Cart,
    Screens,
    Subscriptions,
    InitialNavigation,
}

impl fmt::Display for InitStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InitStage::Storage => "storage",
            InitStage::Cart => "cart",
            InitStage::Screens => "screens",
            InitStage::Subscriptions => "subscriptions",
            InitStage::InitialNavigation => "initial navigation",
        };
        f.write_str(name)
    }
}

/// Coordinator-owned state.
///
/// # Examples
///
/// ```
/// use tpos::application::ApplicationState;
///
/// let state = ApplicationState::default();
/// assert!(state.current_screen().is_none());
/// assert!(!state.is_initialized());
/// ```
#[derive(Debug, Default)]
pub struct ApplicationState {
    /// `None` until the first navigation.
    current_screen: Option<ScreenId>,
    /// Set once the startup sequence completes; never reset.
    initialized: bool,
    active_theme: Option<ThemeVariant>,
}

impl ApplicationState {
    pub fn current_screen(&self) -> Option<&ScreenId> {
        self.current_screen.as_ref()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn active_theme(&self) -> Option<ThemeVariant> {
        self.active_theme
    }

    /// Records a navigation target. Applied before the mount is attempted.
    pub(crate) fn enter_screen(&mut self, screen: ScreenId) {
        self.current_screen = Some(screen);
    }

    pub(crate) fn mark_initialized(&mut self) {
        self.initialized = true;
    }

    pub(crate) fn set_active_theme(&mut self, variant: ThemeVariant) {
        self.active_theme = Some(variant);
    }
}
