use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of the screen shown on application start.
pub const HOME_SCREEN: &str = "home";
pub const CART_SCREEN: &str = "cart";
pub const CHECKOUT_SCREEN: &str = "checkout";

/// Payload handed to a screen when navigating to it.
pub type ScreenData = serde_json::Map<String, serde_json::Value>;

/// Opaque key into the screen registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScreenId(String);

impl ScreenId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ScreenId {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for ScreenId {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl PartialEq<&str> for ScreenId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Rendered screen content, one terminal line per text line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Markup(String);

impl Markup {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.0.lines()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for Markup {
    fn from(text: String) -> Self {
        Self(text)
    }
}

impl fmt::Display for Markup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Alternate top-level screen set selected at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeVariant {
    Restaurant,
    Express,
    /// Default theme, backed by the regular screen registry.
    Evolution,
}

impl ThemeVariant {
    pub fn name(self) -> &'static str {
        match self {
            ThemeVariant::Restaurant => "restaurant",
            ThemeVariant::Express => "express",
            ThemeVariant::Evolution => "evolution",
        }
    }
}

impl fmt::Display for ThemeVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A sellable item. Only `id` is required on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub price_cents: i64,
    #[serde(default)]
    pub category: String,
}

impl Product {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            price_cents: 0,
            category: String::new(),
        }
    }

    pub fn priced(
        id: impl Into<String>,
        name: impl Into<String>,
        price_cents: i64,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price_cents,
            category: category.into(),
        }
    }

    /// Name for display, falling back to the id for bare products.
    pub fn label(&self) -> &str {
        if self.name.is_empty() { &self.id } else { &self.name }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub product: Product,
    pub quantity: u32,
}

impl CartItem {
    pub fn id(&self) -> &str {
        &self.product.id
    }

    /// Saturates at the `i64` bounds instead of wrapping.
    pub fn line_total_cents(&self) -> i64 {
        self.product.price_cents.saturating_mul(i64::from(self.quantity))
    }
}

/// Ordered cart line items, one line per product id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    pub items: Vec<CartItem>,
}

impl Cart {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, item_id: &str) -> Option<&CartItem> {
        self.items.iter().find(|item| item.id() == item_id)
    }

    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    pub fn subtotal_cents(&self) -> i64 {
        self.items
            .iter()
            .map(CartItem::line_total_cents)
            .fold(0, i64::saturating_add)
    }
}

/// Products offered on the home and theme screens.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn get(&self, index: usize) -> Option<&Product> {
        self.products.get(index)
    }

    pub fn find(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|product| product.id == id)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Categories in first-seen order.
    pub fn categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = Vec::new();
        for product in &self.products {
            if !categories.contains(&product.category.as_str()) {
                categories.push(&product.category);
            }
        }
        categories
    }

    pub fn demo() -> Self {
        Self::new(vec![
            Product::priced("espresso", "Espresso", 250, "drinks"),
            Product::priced("latte", "Latte", 380, "drinks"),
            Product::priced("tea", "Green Tea", 300, "drinks"),
            Product::priced("croissant", "Croissant", 290, "bakery"),
            Product::priced("muffin", "Blueberry Muffin", 320, "bakery"),
            Product::priced("bagel", "Sesame Bagel", 275, "bakery"),
            Product::priced("salad", "Garden Salad", 850, "kitchen"),
            Product::priced("soup", "Soup of the Day", 650, "kitchen"),
            Product::priced("sandwich", "Club Sandwich", 950, "kitchen"),
        ])
    }
}
