use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Width of the zero-padded order number in the external order id.
pub const ORDER_NUMBER_WIDTH: usize = 4;

/// One product line within one order.
///
/// Identity is the `(owner_id, order_number, product_sku)` triple; see [`LineItem::key`].
/// A SKU repeated inside a single order is folded into one record by bumping `quantity`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub owner_id: String,
    /// Zero-padded decimal form, e.g. `"0007"`.
    pub order_number: String,
    pub product_sku: String,
    pub seller_name: String,
    pub product_name: String,
    pub product_link: String,
    pub product_image: String,
    /// Price exactly as the source rendered it (e.g. `"1 299 ₽"`).
    pub product_price: String,
    pub quantity: u32,
    pub added_date: DateTime<Utc>,
}

impl LineItem {
    /// Composite storage key.
    pub fn key(&self) -> (&str, &str, &str) {
        (&self.owner_id, &self.order_number, &self.product_sku)
    }

    /// Numeric order number, or `None` when the stored text is not an integer.
    pub fn order_number_value(&self) -> Option<u64> {
        parse_order_number(&self.order_number)
    }
}

/// Renders an order number the way the source addresses it: at least four digits.
pub fn format_order_number(order_number: u64) -> String {
    format!("{:0width$}", order_number, width = ORDER_NUMBER_WIDTH)
}

/// Reads a stored order number back. Anything that is not an integer yields `None`
/// and is left out of high-water-mark calculations.
pub fn parse_order_number(order_number: &str) -> Option<u64> {
    order_number.trim().parse().ok()
}

/// External order identifier, `"{owner}-{NNNN}"`.
pub fn external_order_id(owner_id: &str, order_number: u64) -> String {
    format!("{}-{}", owner_id, format_order_number(order_number))
}
