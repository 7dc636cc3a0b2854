//! Recording collaborators for coordinator tests.

use crate::application::collaborators::{
    AppContext, CartManager, Screen, ScreenManager, StorageManager,
};
use crate::application::container::Container;
use crate::application::themes::ThemeLoader;
use crate::domain::{
    Cart, CartError, CartResult, CartRules, Markup, Product, ScreenData, ScreenError, ScreenId,
    ScreenResult, StorageError, StorageResult,
};
use async_trait::async_trait;
use serde_json::Value;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

/// Shared, ordered log of collaborator calls.
#[derive(Debug, Clone, Default)]
pub struct Journal {
    entries: Rc<RefCell<Vec<String>>>,
    payloads: Rc<RefCell<Vec<String>>>,
}

impl Journal {
    pub fn record(&self, entry: impl Into<String>) {
        self.entries.borrow_mut().push(entry.into());
    }

    pub fn record_payload(&self, payload: impl Into<String>) {
        self.payloads.borrow_mut().push(payload.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries.borrow().clone()
    }

    pub fn payloads(&self) -> Vec<String> {
        self.payloads.borrow().clone()
    }

    pub fn contains(&self, entry: &str) -> bool {
        self.entries.borrow().iter().any(|e| e == entry)
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.entries.borrow().iter().filter(|e| e.starts_with(prefix)).count()
    }

    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
        self.payloads.borrow_mut().clear();
    }
}

/// Lets the executor run other work between the start and end of a step.
async fn suspend() {
    tokio::task::yield_now().await;
}

pub struct MockStorage {
    journal: Journal,
    fail_init: bool,
    values: RefCell<BTreeMap<String, Value>>,
}

impl MockStorage {
    pub fn new(journal: &Journal) -> Self {
        Self {
            journal: journal.clone(),
            fail_init: false,
            values: RefCell::new(BTreeMap::new()),
        }
    }

    pub fn failing(journal: &Journal) -> Self {
        Self {
            fail_init: true,
            ..Self::new(journal)
        }
    }

    pub fn journal(&self) -> Journal {
        self.journal.clone()
    }
}

#[async_trait(?Send)]
impl StorageManager for MockStorage {
    async fn init(&self) -> StorageResult<()> {
        self.journal.record("storage.init:start");
        suspend().await;
        if self.fail_init {
            return Err(StorageError::NotInitialized);
        }
        self.journal.record("storage.init:end");
        Ok(())
    }

    fn get(&self, key: &str) -> StorageResult<Option<Value>> {
        self.journal.record(format!("storage.get:{}", key));
        Ok(self.values.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: Value) -> StorageResult<()> {
        self.journal.record(format!("storage.set:{}", key));
        self.values.borrow_mut().insert(key.to_string(), value);
        Ok(())
    }
}

pub struct MockCart {
    journal: Journal,
    fail_init: bool,
    reject_mutations: bool,
    cart: Cart,
}

impl MockCart {
    pub fn new(journal: &Journal) -> Self {
        Self {
            journal: journal.clone(),
            fail_init: false,
            reject_mutations: false,
            cart: Cart::default(),
        }
    }

    pub fn failing(journal: &Journal) -> Self {
        Self {
            fail_init: true,
            ..Self::new(journal)
        }
    }

    /// Updates and removals report the item as unknown.
    pub fn rejecting_mutations(journal: &Journal) -> Self {
        Self {
            reject_mutations: true,
            ..Self::new(journal)
        }
    }
}

#[async_trait(?Send)]
impl CartManager for MockCart {
    async fn init(&mut self, _storage: Rc<dyn StorageManager>) -> CartResult<()> {
        self.journal.record("cart.init:start");
        suspend().await;
        if self.fail_init {
            return Err(CartError::NotInitialized);
        }
        self.journal.record("cart.init:end");
        Ok(())
    }

    fn add_item(&mut self, product: Product) -> CartResult<()> {
        self.journal.record(format!("cart.add:{}", product.id));
        CartRules::add(&mut self.cart, product)
    }

    fn update_quantity(&mut self, item_id: &str, quantity: u32) -> CartResult<()> {
        self.journal.record(format!("cart.update:{}:{}", item_id, quantity));
        if self.reject_mutations {
            return Err(CartError::UnknownItem(item_id.to_string()));
        }
        Ok(())
    }

    fn remove_item(&mut self, item_id: &str) -> CartResult<()> {
        self.journal.record(format!("cart.remove:{}", item_id));
        if self.reject_mutations {
            return Err(CartError::UnknownItem(item_id.to_string()));
        }
        Ok(())
    }

    fn clear(&mut self) -> CartResult<()> {
        self.journal.record("cart.clear");
        self.cart.items.clear();
        Ok(())
    }

    fn cart(&self) -> &Cart {
        &self.cart
    }
}

pub struct MockScreens {
    journal: Journal,
    container: Container,
    fail_init: bool,
    rejected: Vec<String>,
}

impl MockScreens {
    pub fn new(journal: &Journal) -> Self {
        Self {
            journal: journal.clone(),
            container: Container::new(),
            fail_init: false,
            rejected: Vec::new(),
        }
    }

    pub fn failing_init(journal: &Journal) -> Self {
        Self {
            fail_init: true,
            ..Self::new(journal)
        }
    }

    /// Fails `show_screen` for the given names, as an unregistered screen would.
    pub fn rejecting(journal: &Journal, names: &[&str]) -> Self {
        Self {
            rejected: names.iter().map(|name| name.to_string()).collect(),
            ..Self::new(journal)
        }
    }

    pub fn container(&self) -> Container {
        self.container.clone()
    }
}

#[async_trait(?Send)]
impl ScreenManager for MockScreens {
    fn init(&mut self, _app: &AppContext<'_>) -> ScreenResult<()> {
        if self.fail_init {
            return Err(ScreenError::NoScreens);
        }
        self.journal.record("screens.init");
        Ok(())
    }

    async fn show_screen(
        &mut self,
        name: &ScreenId,
        data: &ScreenData,
        _app: &AppContext<'_>,
    ) -> ScreenResult<()> {
        self.journal.record(format!("screens.show:{}", name));
        self.journal.record_payload(format!(
            "{}:{}",
            name,
            serde_json::to_string(data).unwrap_or_default()
        ));
        suspend().await;
        if self.rejected.iter().any(|rejected| rejected == name.as_str()) {
            return Err(ScreenError::UnknownScreen(name.clone()));
        }
        self.container.replace(Markup::new(format!("screen {}", name)));
        Ok(())
    }
}

struct JournalScreen {
    journal: Journal,
    markup: Option<String>,
}

#[async_trait(?Send)]
impl Screen for JournalScreen {
    async fn render(&self, _app: &AppContext<'_>) -> ScreenResult<Markup> {
        self.journal.record("theme.render");
        suspend().await;
        self.markup
            .clone()
            .map(Markup::new)
            .ok_or_else(|| ScreenError::Render("template missing".to_string()))
    }

    async fn after_render(&mut self, _app: &AppContext<'_>) -> ScreenResult<()> {
        self.journal.record("theme.after_render");
        Ok(())
    }
}

/// Theme whose screen renders fixed markup.
pub struct StaticTheme {
    journal: Journal,
    markup: String,
}

impl StaticTheme {
    pub fn new(journal: &Journal, markup: &str) -> Self {
        Self {
            journal: journal.clone(),
            markup: markup.to_string(),
        }
    }
}

#[async_trait(?Send)]
impl ThemeLoader for StaticTheme {
    async fn resolve(&self, _app: &AppContext<'_>) -> ScreenResult<Box<dyn Screen>> {
        self.journal.record("theme.resolve");
        Ok(Box::new(JournalScreen {
            journal: self.journal.clone(),
            markup: Some(self.markup.clone()),
        }))
    }
}

/// Theme whose screen always fails to render.
pub struct FailingRenderTheme {
    journal: Journal,
}

impl FailingRenderTheme {
    pub fn new(journal: &Journal) -> Self {
        Self {
            journal: journal.clone(),
        }
    }
}

#[async_trait(?Send)]
impl ThemeLoader for FailingRenderTheme {
    async fn resolve(&self, _app: &AppContext<'_>) -> ScreenResult<Box<dyn Screen>> {
        self.journal.record("theme.resolve");
        Ok(Box::new(JournalScreen {
            journal: self.journal.clone(),
            markup: None,
        }))
    }
}
