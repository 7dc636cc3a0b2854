use crate::application::collaborators::{CartManager, StorageManager};
use crate::domain::{Cart, CartError, CartResult, CartRules, Product};
use async_trait::async_trait;
use std::rc::Rc;
use tracing::debug;

/// Storage key holding the cart snapshot.
pub const CART_KEY: &str = "cart";

/// Cart that restores itself from storage on init and writes every
/// mutation back.
///
/// Each mutation is applied to a copy of the cart and only becomes visible
/// once the snapshot has been stored, so a failed write leaves both the
/// cart and the store as they were.
///
/// # Examples
///
/// ```
/// use std::rc::Rc;
/// use tpos::application::{CartManager, PersistentCart, StorageManager};
/// use tpos::domain::Product;
/// use tpos::infrastructure::MemoryStorage;
///
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// let storage = Rc::new(MemoryStorage::new());
/// storage.init().await.unwrap();
///
/// let mut cart = PersistentCart::new();
/// cart.init(storage).await.unwrap();
/// cart.add_item(Product::priced("tea", "Green Tea", 300, "drinks")).unwrap();
/// assert_eq!(cart.cart().subtotal_cents(), 300);
/// # });
/// ```
#[derive(Default)]
pub struct PersistentCart {
    cart: Cart,
    storage: Option<Rc<dyn StorageManager>>,
}

impl PersistentCart {
    /// Creates an empty cart. Every mutation fails with
    /// [`CartError::NotInitialized`] until [`CartManager::init`] has run.
    pub fn new() -> Self {
        Self::default()
    }

    fn storage(&self) -> CartResult<&Rc<dyn StorageManager>> {
        self.storage.as_ref().ok_or(CartError::NotInitialized)
    }

    fn mutate(&mut self, change: impl FnOnce(&mut Cart) -> CartResult<()>) -> CartResult<()> {
        let mut next = self.cart.clone();
        change(&mut next)?;
        self.persist(&next)?;
        self.cart = next;
        Ok(())
    }

    fn persist(&self, cart: &Cart) -> CartResult<()> {
        let storage = self.storage()?;
        let snapshot = serde_json::to_value(cart).map_err(CartError::InvalidSnapshot)?;
        storage.set(CART_KEY, snapshot)?;
        debug!(lines = cart.items.len(), "cart persisted");
        Ok(())
    }
}

#[async_trait(?Send)]
impl CartManager for PersistentCart {
    async fn init(&mut self, storage: Rc<dyn StorageManager>) -> CartResult<()> {
        self.cart = match storage.get(CART_KEY)? {
            Some(snapshot) => {
                serde_json::from_value(snapshot).map_err(CartError::InvalidSnapshot)?
            }
            None => Cart::default(),
        };
        debug!(lines = self.cart.items.len(), "cart restored");
        self.storage = Some(storage);
        Ok(())
    }

    fn add_item(&mut self, product: Product) -> CartResult<()> {
        self.mutate(|cart| CartRules::add(cart, product))
    }

    fn update_quantity(&mut self, item_id: &str, quantity: u32) -> CartResult<()> {
        self.mutate(|cart| CartRules::set_quantity(cart, item_id, quantity))
    }

    fn remove_item(&mut self, item_id: &str) -> CartResult<()> {
        self.mutate(|cart| CartRules::remove(cart, item_id))
    }

    fn clear(&mut self) -> CartResult<()> {
        self.mutate(|cart| {
            cart.items.clear();
            Ok(())
        })
    }

    fn cart(&self) -> &Cart {
        &self.cart
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::StorageError;
    use crate::infrastructure::{JsonFileStorage, MemoryStorage};
    use serde_json::json;
    use tempfile::tempdir;

    async fn ready_cart() -> (PersistentCart, Rc<MemoryStorage>) {
        let storage = Rc::new(MemoryStorage::new());
        storage.init().await.unwrap();
        let mut cart = PersistentCart::new();
        cart.init(storage.clone()).await.unwrap();
        (cart, storage)
    }

    #[tokio::test]
    async fn test_mutation_before_init_fails() {
        let mut cart = PersistentCart::new();
        assert!(matches!(
            cart.add_item(Product::new("p1")),
            Err(CartError::NotInitialized)
        ));
        assert!(cart.cart().is_empty());
    }

    #[tokio::test]
    async fn test_mutations_write_through() {
        let (mut cart, storage) = ready_cart().await;
        cart.add_item(Product::priced("p1", "Tea", 300, "drinks")).unwrap();
        cart.add_item(Product::priced("p1", "Tea", 300, "drinks")).unwrap();

        let stored: Cart = serde_json::from_value(storage.get(CART_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(stored.get("p1").unwrap().quantity, 2);

        cart.clear().unwrap();
        let stored: Cart = serde_json::from_value(storage.get(CART_KEY).unwrap().unwrap()).unwrap();
        assert!(stored.is_empty());
    }

    #[tokio::test]
    async fn test_init_restores_snapshot() {
        let storage = Rc::new(MemoryStorage::new());
        storage.init().await.unwrap();
        storage
            .set(
                CART_KEY,
                json!({"items": [{"product": {"id": "p9", "price_cents": 100}, "quantity": 4}]}),
            )
            .unwrap();

        let mut cart = PersistentCart::new();
        cart.init(storage).await.unwrap();
        assert_eq!(cart.cart().item_count(), 4);
        assert_eq!(cart.cart().subtotal_cents(), 400);
    }

    #[tokio::test]
    async fn test_invalid_snapshot_fails_init() {
        let storage = Rc::new(MemoryStorage::new());
        storage.init().await.unwrap();
        storage.set(CART_KEY, json!("not a cart")).unwrap();

        let mut cart = PersistentCart::new();
        assert!(matches!(
            cart.init(storage).await,
            Err(CartError::InvalidSnapshot(_))
        ));
    }

    #[tokio::test]
    async fn test_update_and_remove() {
        let (mut cart, _storage) = ready_cart().await;
        cart.add_item(Product::new("p1")).unwrap();
        cart.update_quantity("p1", 5).unwrap();
        assert_eq!(cart.cart().item_count(), 5);

        assert!(matches!(
            cart.remove_item("p2"),
            Err(CartError::UnknownItem(_))
        ));
        cart.remove_item("p1").unwrap();
        assert!(cart.cart().is_empty());
    }

    #[tokio::test]
    async fn test_failed_write_leaves_cart_unchanged() {
        let dir = tempdir().unwrap();
        let data_dir = dir.path().join("data");
        std::fs::create_dir(&data_dir).unwrap();
        let storage = Rc::new(JsonFileStorage::new(data_dir.join("store.json")));
        storage.init().await.unwrap();

        let mut cart = PersistentCart::new();
        cart.init(storage.clone()).await.unwrap();
        cart.add_item(Product::new("p1")).unwrap();

        std::fs::remove_dir_all(&data_dir).unwrap();
        assert!(matches!(
            cart.add_item(Product::new("p2")),
            Err(CartError::Storage(StorageError::Io(_)))
        ));
        assert!(cart.clear().is_err());

        assert_eq!(cart.cart().items.len(), 1);
        assert!(cart.cart().get("p2").is_none());
        let stored: Cart = serde_json::from_value(storage.get(CART_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(&stored, cart.cart());
    }

    #[tokio::test]
    async fn test_add_past_quantity_limit_is_rejected() {
        let (mut cart, storage) = ready_cart().await;
        cart.add_item(Product::new("p1")).unwrap();
        cart.update_quantity("p1", u32::MAX).unwrap();

        assert!(matches!(
            cart.add_item(Product::new("p1")),
            Err(CartError::QuantityOverflow(id)) if id == "p1"
        ));
        assert_eq!(cart.cart().get("p1").unwrap().quantity, u32::MAX);
        let stored: Cart = serde_json::from_value(storage.get(CART_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(stored.get("p1").unwrap().quantity, u32::MAX);
    }
}
