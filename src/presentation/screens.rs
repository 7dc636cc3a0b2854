//! Built-in screens and theme screens.
//!
//! Screens render plain text markup; the terminal shell paints it into the
//! application container.

use crate::application::{AppContext, Screen, ThemeLoader};
use crate::domain::{
    Cart, Markup, Product, ScreenData, ScreenError, ScreenResult, format_cents,
};
use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

/// Storage key for the totals of the last checkout shown.
pub const CHECKOUT_KEY: &str = "checkout";

/// Products reachable through the digit keys.
pub const QUICK_KEYS: usize = 9;

fn product_line(index: usize, product: &Product) -> String {
    let key = if index < QUICK_KEYS {
        format!("[{}]", index + 1)
    } else {
        "   ".to_string()
    };
    format!("{} {:<24} {:>8}", key, product.label(), format_cents(product.price_cents))
}

fn totals_line(cart: &Cart) -> String {
    format!(
        "{} item(s)   subtotal {}",
        cart.item_count(),
        format_cents(cart.subtotal_cents())
    )
}

/// Product list, optionally narrowed by a `category` entry in the data.
pub struct HomeScreen {
    category: Option<String>,
}

impl HomeScreen {
    pub fn new(data: &ScreenData) -> Self {
        Self {
            category: data.get("category").and_then(|v| v.as_str()).map(str::to_string),
        }
    }
}

#[async_trait(?Send)]
impl Screen for HomeScreen {
    async fn render(&self, app: &AppContext<'_>) -> ScreenResult<Markup> {
        let mut lines = vec![match &self.category {
            Some(category) => format!("Products: {}", category),
            None => "Products".to_string(),
        }];
        lines.push(String::new());

        let mut shown = 0;
        for (index, product) in app.catalog.products().iter().enumerate() {
            if self.category.as_deref().is_some_and(|c| c != product.category) {
                continue;
            }
            lines.push(product_line(index, product));
            shown += 1;
        }
        if shown == 0 {
            lines.push("(no products)".to_string());
        }

        lines.push(String::new());
        lines.push(totals_line(app.cart()));
        Ok(Markup::new(lines.join("\n")))
    }

    async fn after_render(&mut self, app: &AppContext<'_>) -> ScreenResult<()> {
        debug!(products = app.catalog.len(), "home mounted");
        Ok(())
    }
}

/// Cart lines with a selection marker taken from the `selected` entry.
pub struct CartScreen {
    selected: usize,
}

impl CartScreen {
    pub fn new(data: &ScreenData) -> Self {
        Self {
            selected: data.get("selected").and_then(|v| v.as_u64()).unwrap_or(0) as usize,
        }
    }
}

#[async_trait(?Send)]
impl Screen for CartScreen {
    async fn render(&self, app: &AppContext<'_>) -> ScreenResult<Markup> {
        let cart = app.cart();
        let mut lines = vec!["Cart".to_string(), String::new()];

        if cart.is_empty() {
            lines.push("(empty)".to_string());
        }
        for (index, item) in cart.items.iter().enumerate() {
            let marker = if index == self.selected { '>' } else { ' ' };
            lines.push(format!(
                "{} {:<24} x{:<3} {:>8}",
                marker,
                item.product.label(),
                item.quantity,
                format_cents(item.line_total_cents())
            ));
        }

        lines.push(String::new());
        lines.push(totals_line(cart));
        Ok(Markup::new(lines.join("\n")))
    }

    async fn after_render(&mut self, _app: &AppContext<'_>) -> ScreenResult<()> {
        Ok(())
    }
}

/// Totals for tender. Records them in storage once shown.
pub struct CheckoutScreen {
    note: Option<String>,
}

impl CheckoutScreen {
    pub fn new(data: &ScreenData) -> Self {
        Self {
            note: data.get("note").and_then(|v| v.as_str()).map(str::to_string),
        }
    }
}

#[async_trait(?Send)]
impl Screen for CheckoutScreen {
    async fn render(&self, app: &AppContext<'_>) -> ScreenResult<Markup> {
        let cart = app.cart();
        let mut lines = vec!["Checkout".to_string(), String::new()];
        for item in &cart.items {
            lines.push(format!(
                "{:>3} x {:<24} {:>8}",
                item.quantity,
                item.product.label(),
                format_cents(item.line_total_cents())
            ));
        }
        lines.push(String::new());
        lines.push(format!("TOTAL {:>30}", format_cents(cart.subtotal_cents())));
        if let Some(note) = &self.note {
            lines.push(format!("Note: {}", note));
        }
        Ok(Markup::new(lines.join("\n")))
    }

    async fn after_render(&mut self, app: &AppContext<'_>) -> ScreenResult<()> {
        let cart = app.cart();
        app.storage
            .set(
                CHECKOUT_KEY,
                json!({
                    "items": cart.item_count(),
                    "subtotal_cents": cart.subtotal_cents(),
                }),
            )
            .map_err(|e| ScreenError::Mount(e.to_string()))
    }
}

/// Table-service layout: the catalog grouped by category.
pub struct RestaurantScreen;

#[async_trait(?Send)]
impl Screen for RestaurantScreen {
    async fn render(&self, app: &AppContext<'_>) -> ScreenResult<Markup> {
        if app.catalog.is_empty() {
            return Err(ScreenError::Render("no products for the menu".to_string()));
        }

        let mut lines = vec!["Restaurant - table service".to_string()];
        for category in app.catalog.categories() {
            lines.push(String::new());
            lines.push(format!("== {} ==", if category.is_empty() { "other" } else { category }));
            for (index, product) in app.catalog.products().iter().enumerate() {
                if product.category == category {
                    lines.push(product_line(index, product));
                }
            }
        }
        lines.push(String::new());
        lines.push(format!("Open check: {}", totals_line(app.cart())));
        Ok(Markup::new(lines.join("\n")))
    }

    async fn after_render(&mut self, app: &AppContext<'_>) -> ScreenResult<()> {
        debug!(categories = app.catalog.categories().len(), "restaurant theme mounted");
        Ok(())
    }
}

/// Quick-sale layout: one big key per product and the running total.
pub struct ExpressScreen;

impl ExpressScreen {
    const PER_ROW: usize = 3;
}

#[async_trait(?Send)]
impl Screen for ExpressScreen {
    async fn render(&self, app: &AppContext<'_>) -> ScreenResult<Markup> {
        let products = app.catalog.products();
        if products.is_empty() {
            return Err(ScreenError::Render("no products for quick keys".to_string()));
        }

        let mut lines = vec!["Express lane".to_string(), String::new()];
        let keys: Vec<String> = products
            .iter()
            .take(QUICK_KEYS)
            .enumerate()
            .map(|(index, product)| format!("[{}] {:<16}", index + 1, product.label()))
            .collect();
        for row in keys.chunks(Self::PER_ROW) {
            lines.push(row.join("  "));
        }
        lines.push(String::new());
        lines.push(format!(
            "TOTAL {}   ({} item(s))",
            format_cents(app.cart().subtotal_cents()),
            app.cart().item_count()
        ));
        Ok(Markup::new(lines.join("\n")))
    }

    async fn after_render(&mut self, _app: &AppContext<'_>) -> ScreenResult<()> {
        debug!("express theme mounted");
        Ok(())
    }
}

pub struct RestaurantTheme;

#[async_trait(?Send)]
impl ThemeLoader for RestaurantTheme {
    async fn resolve(&self, _app: &AppContext<'_>) -> ScreenResult<Box<dyn Screen>> {
        Ok(Box::new(RestaurantScreen))
    }
}

pub struct ExpressTheme;

#[async_trait(?Send)]
impl ThemeLoader for ExpressTheme {
    async fn resolve(&self, _app: &AppContext<'_>) -> ScreenResult<Box<dyn Screen>> {
        Ok(Box::new(ExpressScreen))
    }
}
