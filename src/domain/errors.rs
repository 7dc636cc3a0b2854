use crate::domain::models::{ScreenId, ThemeVariant};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage used before init")]
    NotInitialized,
    #[error("storage file {path} is corrupt: {reason}")]
    Corrupt { path: String, reason: String },
    #[error("storage i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum CartError {
    #[error("cart used before init")]
    NotInitialized,
    #[error("no cart line for item {0}")]
    UnknownItem(String),
    #[error("quantity of item {0} would exceed the line limit")]
    QuantityOverflow(String),
    #[error("stored cart is unreadable: {0}")]
    InvalidSnapshot(#[source] serde_json::Error),
    #[error("cart persistence failed: {0}")]
    Storage(#[from] StorageError),
}

#[derive(Debug, Error)]
pub enum ScreenError {
    #[error("no screens registered")]
    NoScreens,
    #[error("unknown screen: {0}")]
    UnknownScreen(ScreenId),
    #[error("no loader registered for the {0} theme")]
    ThemeNotRegistered(ThemeVariant),
    #[error("render failed: {0}")]
    Render(String),
    #[error("mount failed: {0}")]
    Mount(String),
}

pub type CartResult<T> = Result<T, CartError>;
pub type StorageResult<T> = Result<T, StorageError>;
pub type ScreenResult<T> = Result<T, ScreenError>;
