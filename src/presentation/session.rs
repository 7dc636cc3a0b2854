//! Terminal session state and execution of user actions.

use crate::application::{AppCoordinator, AppError};
use crate::domain::{CART_SCREEN, DomainEvent, ScreenData, ThemeVariant};
use crate::infrastructure::ReceiptExporter;
use serde_json::json;
use std::path::PathBuf;
use tracing::{info, warn};

/// What a key press asks the shell to do.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Events handed to the coordinator in order; a failure stops the rest.
    Dispatch(Vec<DomainEvent>),
    LoadTheme(ThemeVariant),
    SelectLine(isize),
    ExportReceipt,
    ToggleHelp,
    Quit,
    Ignore,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// UI-only state that never reaches the coordinator.
#[derive(Debug)]
pub struct Session {
    pub store_name: String,
    pub receipt_dir: PathBuf,
    pub selected_line: usize,
    pub status_message: Option<String>,
    pub receipts_printed: u64,
    pub show_help: bool,
    /// True while a restaurant or express screen fills the container.
    pub theme_mounted: bool,
}

impl Session {
    pub fn new(store_name: impl Into<String>, receipt_dir: impl Into<PathBuf>) -> Self {
        Self {
            store_name: store_name.into(),
            receipt_dir: receipt_dir.into(),
            selected_line: 0,
            status_message: None,
            receipts_printed: 0,
            show_help: false,
            theme_mounted: false,
        }
    }

    /// Navigation data describing the session's cart selection.
    pub fn cart_data(&self) -> ScreenData {
        let mut data = ScreenData::new();
        data.insert("selected".to_string(), json!(self.selected_line));
        data
    }

    pub async fn apply(&mut self, coordinator: &mut AppCoordinator, action: Action) -> Flow {
        match action {
            Action::Quit => return Flow::Quit,
            Action::Ignore => {}
            Action::Dispatch(events) => self.dispatch_all(coordinator, events).await,
            Action::LoadTheme(variant) => self.load_theme(coordinator, variant).await,
            Action::SelectLine(delta) => self.select_line(coordinator, delta).await,
            Action::ExportReceipt => self.export_receipt(coordinator),
            Action::ToggleHelp => self.show_help = !self.show_help,
        }
        Flow::Continue
    }

    async fn dispatch_all(&mut self, coordinator: &mut AppCoordinator, events: Vec<DomainEvent>) {
        let mut cart_changed = false;
        let mut failure = None;
        for event in events {
            let navigates = matches!(event, DomainEvent::Navigate { .. });
            if let Err(err) = coordinator.dispatch(event).await {
                failure = Some(err);
                break;
            }
            if navigates {
                self.theme_mounted = false;
            } else {
                cart_changed = true;
            }
        }

        // Events before a failure stay applied, so the display still follows them.
        self.status_message = None;
        self.clamp_selection(coordinator);
        if cart_changed {
            self.refresh(coordinator).await;
        }
        if let Some(err) = failure {
            self.report(&err);
        }
    }

    async fn load_theme(&mut self, coordinator: &mut AppCoordinator, variant: ThemeVariant) {
        match coordinator.load_theme(variant).await {
            Ok(()) => {
                self.theme_mounted = variant != ThemeVariant::Evolution;
                self.status_message = Some(format!("{} theme", variant));
            }
            Err(err) => self.report(&err),
        }
    }

    async fn select_line(&mut self, coordinator: &mut AppCoordinator, delta: isize) {
        let lines = coordinator.cart_manager().cart().items.len();
        if lines == 0 {
            return;
        }
        self.selected_line = self.selected_line.saturating_add_signed(delta).min(lines - 1);
        if coordinator.current_screen().is_some_and(|screen| *screen == CART_SCREEN) {
            self.refresh(coordinator).await;
        }
    }

    fn export_receipt(&mut self, coordinator: &AppCoordinator) {
        let number = self.receipts_printed + 1;
        let cart = coordinator.cart_manager().cart();
        match ReceiptExporter::export(cart, &self.receipt_dir, number) {
            Ok(path) => {
                self.receipts_printed = number;
                info!(path = %path.display(), "receipt exported");
                self.status_message = Some(format!("Receipt written to {}", path.display()));
            }
            Err(err) => {
                warn!(error = %err, "receipt export failed");
                self.status_message = Some(format!("Receipt failed: {}", err));
            }
        }
    }

    /// Re-mounts whatever is on display so it reflects the latest cart.
    async fn refresh(&mut self, coordinator: &mut AppCoordinator) {
        let result = match (self.theme_mounted, coordinator.active_theme()) {
            (true, Some(variant)) => coordinator.load_theme(variant).await,
            _ => {
                let Some(screen) = coordinator.current_screen().cloned() else {
                    return;
                };
                let data = if screen == CART_SCREEN {
                    self.cart_data()
                } else {
                    ScreenData::new()
                };
                coordinator.dispatch(DomainEvent::Navigate { screen, data }).await
            }
        };
        if let Err(err) = result {
            self.report(&err);
        }
    }

    fn clamp_selection(&mut self, coordinator: &AppCoordinator) {
        let lines = coordinator.cart_manager().cart().items.len();
        self.selected_line = self.selected_line.min(lines.saturating_sub(1));
    }

    fn report(&mut self, err: &AppError) {
        self.status_message = Some(err.to_string());
    }
}
