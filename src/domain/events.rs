//! Application-level events, decoupled from the controls that raise them.

use crate::domain::models::{Product, ScreenData, ScreenId};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum DomainEvent {
    Navigate {
        screen: ScreenId,
        #[serde(default)]
        data: ScreenData,
    },
    AddToCart {
        product: Product,
    },
    UpdateCart {
        item_id: String,
        quantity: u32,
    },
    RemoveFromCart {
        item_id: String,
    },
    ClearCart,
}

impl DomainEvent {
    pub fn navigate(screen: impl Into<ScreenId>) -> Self {
        DomainEvent::Navigate {
            screen: screen.into(),
            data: ScreenData::new(),
        }
    }

    pub fn kind(&self) -> EventKind {
        match self {
            DomainEvent::Navigate { .. } => EventKind::Navigate,
            DomainEvent::AddToCart { .. } => EventKind::AddToCart,
            DomainEvent::UpdateCart { .. } => EventKind::UpdateCart,
            DomainEvent::RemoveFromCart { .. } => EventKind::RemoveFromCart,
            DomainEvent::ClearCart => EventKind::ClearCart,
        }
    }
}

/// Discriminant of [`DomainEvent`], used as the subscription key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventKind {
    Navigate,
    AddToCart,
    UpdateCart,
    RemoveFromCart,
    ClearCart,
}

impl EventKind {
    pub const ALL: [EventKind; 5] = [
        EventKind::Navigate,
        EventKind::AddToCart,
        EventKind::UpdateCart,
        EventKind::RemoveFromCart,
        EventKind::ClearCart,
    ];

    pub fn name(self) -> &'static str {
        match self {
            EventKind::Navigate => "navigate",
            EventKind::AddToCart => "add-to-cart",
            EventKind::UpdateCart => "update-cart",
            EventKind::RemoveFromCart => "remove-from-cart",
            EventKind::ClearCart => "clear-cart",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
