use crate::domain::errors::{CartError, CartResult};
use crate::domain::models::{Cart, CartItem, Product};

/// Pure cart rules shared by every cart implementation.
pub struct CartRules;

impl CartRules {
    /// Adds one unit of `product`, merging with an existing line of the same id.
    ///
    /// A line already at `u32::MAX` is left untouched and the add fails with
    /// [`CartError::QuantityOverflow`].
    pub fn add(cart: &mut Cart, product: Product) -> CartResult<()> {
        match cart.items.iter_mut().find(|item| item.product.id == product.id) {
            Some(item) => {
                item.quantity = item
                    .quantity
                    .checked_add(1)
                    .ok_or_else(|| CartError::QuantityOverflow(product.id.clone()))?;
            }
            None => cart.items.push(CartItem { product, quantity: 1 }),
        }
        Ok(())
    }

    /// Sets the quantity of an existing line; zero removes the line.
    pub fn set_quantity(cart: &mut Cart, item_id: &str, quantity: u32) -> CartResult<()> {
        if quantity == 0 {
            return Self::remove(cart, item_id);
        }
        let item = cart
            .items
            .iter_mut()
            .find(|item| item.id() == item_id)
            .ok_or_else(|| CartError::UnknownItem(item_id.to_string()))?;
        item.quantity = quantity;
        Ok(())
    }

    pub fn remove(cart: &mut Cart, item_id: &str) -> CartResult<()> {
        let index = cart
            .items
            .iter()
            .position(|item| item.id() == item_id)
            .ok_or_else(|| CartError::UnknownItem(item_id.to_string()))?;
        cart.items.remove(index);
        Ok(())
    }
}

/// Formats integer cents as a currency amount, e.g. `-1234` -> `-12.34`.
pub fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{}{}.{:02}", sign, abs / 100, abs % 100)
}
