//! Contracts the coordinator consumes.
//!
//! Everything here runs on a single thread: the traits are `?Send` and
//! suspend only at the async methods.

use crate::domain::{
    Cart, CartResult, Catalog, Markup, Product, ScreenData, ScreenId, ScreenResult, StorageResult,
};
use async_trait::async_trait;
use serde_json::Value;
use std::rc::Rc;

/// Durable key-value persistence.
///
/// Shared between the coordinator and the cart, hence `&self` everywhere.
#[async_trait(?Send)]
pub trait StorageManager {
    async fn init(&self) -> StorageResult<()>;
    fn get(&self, key: &str) -> StorageResult<Option<Value>>;
    fn set(&self, key: &str, value: Value) -> StorageResult<()>;
}

#[async_trait(?Send)]
pub trait CartManager {
    /// Prepares the cart, possibly restoring persisted state from `storage`.
    async fn init(&mut self, storage: Rc<dyn StorageManager>) -> CartResult<()>;
    fn add_item(&mut self, product: Product) -> CartResult<()>;
    fn update_quantity(&mut self, item_id: &str, quantity: u32) -> CartResult<()>;
    fn remove_item(&mut self, item_id: &str) -> CartResult<()>;
    fn clear(&mut self) -> CartResult<()>;
    fn cart(&self) -> &Cart;
}

/// Resolves screen names and mounts the resulting screen.
#[async_trait(?Send)]
pub trait ScreenManager {
    fn init(&mut self, app: &AppContext<'_>) -> ScreenResult<()>;
    async fn show_screen(
        &mut self,
        name: &ScreenId,
        data: &ScreenData,
        app: &AppContext<'_>,
    ) -> ScreenResult<()>;
}

/// A mountable unit of UI with a render / after-render lifecycle.
#[async_trait(?Send)]
pub trait Screen {
    async fn render(&self, app: &AppContext<'_>) -> ScreenResult<Markup>;
    async fn after_render(&mut self, app: &AppContext<'_>) -> ScreenResult<()>;
}

/// Read-only view of the coordinator handed to screens.
#[derive(Clone, Copy)]
pub struct AppContext<'a> {
    pub cart: &'a dyn CartManager,
    pub storage: &'a dyn StorageManager,
    pub catalog: &'a Catalog,
    pub current_screen: Option<&'a ScreenId>,
}

impl<'a> AppContext<'a> {
    pub fn cart(&self) -> &'a Cart {
        self.cart.cart()
    }
}
