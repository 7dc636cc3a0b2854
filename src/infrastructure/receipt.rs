use crate::domain::{Cart, format_cents};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReceiptError {
    #[error("cart is empty, nothing to print")]
    EmptyCart,
    #[error("receipt write failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("receipt write failed: {0}")]
    Io(#[from] std::io::Error),
}

pub struct ReceiptExporter;

impl ReceiptExporter {
    pub const HEADER: [&'static str; 5] = ["id", "name", "quantity", "unit_price", "line_total"];

    /// Writes one row per cart line followed by a total row and returns the
    /// path written.
    pub fn export(cart: &Cart, dir: &Path, number: u64) -> Result<PathBuf, ReceiptError> {
        if cart.is_empty() {
            return Err(ReceiptError::EmptyCart);
        }

        let path = dir.join(format!("receipt-{:05}.csv", number));
        let mut writer = csv::Writer::from_path(&path)?;
        writer.write_record(Self::HEADER)?;

        for item in &cart.items {
            writer.write_record([
                item.product.id.as_str(),
                item.product.label(),
                &item.quantity.to_string(),
                &format_cents(item.product.price_cents),
                &format_cents(item.line_total_cents()),
            ])?;
        }

        writer.write_record([
            "",
            "TOTAL",
            &cart.item_count().to_string(),
            "",
            &format_cents(cart.subtotal_cents()),
        ])?;
        writer.flush()?;
        Ok(path)
    }
}
