//! Turns the nested order-detail payload into flat [`LineItem`]s.
//!
//! The shape is `state { shipmentId, items[] { sellers[] { name, products[] } } }`. Every level
//! can be missing or malformed; whatever is broken is skipped and the rest still counts.

use crate::model::{format_order_number, LineItem};
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use std::collections::HashMap;

const UNKNOWN: &str = "Unknown";
const DEFAULT_PRICE: &str = "0 ₽";

/// Line items of one order, with repeated SKUs merged into `quantity`.
///
/// Items come out in the order their SKU was first seen.
pub fn flatten_order(
    owner_id: &str,
    order_number: u64,
    states: &[Map<String, Value>],
    now: DateTime<Utc>,
) -> Vec<LineItem> {
    let order_number = format_order_number(order_number);
    let mut items: Vec<LineItem> = Vec::new();
    let mut by_sku: HashMap<String, usize> = HashMap::new();

    for state in states {
        if !truthy(state.get("shipmentId")) {
            continue;
        }
        let Some(order_items) = state.get("items").and_then(Value::as_array) else {
            continue;
        };

        for order_item in order_items {
            let Some(sellers) = order_item.get("sellers").and_then(Value::as_array) else {
                continue;
            };

            for seller in sellers {
                let Some(products) = seller.get("products").and_then(Value::as_array) else {
                    continue;
                };

                for product in products {
                    let Some(sku) = product_sku(product) else {
                        continue;
                    };

                    if let Some(&idx) = by_sku.get(&sku) {
                        items[idx].quantity += 1;
                        continue;
                    }

                    by_sku.insert(sku.clone(), items.len());
                    items.push(LineItem {
                        owner_id: owner_id.to_string(),
                        order_number: order_number.clone(),
                        seller_name: text_or(seller, "/name/text", UNKNOWN),
                        product_name: text_or(product, "/title/name/text", UNKNOWN),
                        product_link: text_or(product, "/title/common/action/link", ""),
                        product_image: text_or(product, "/picture/image/image", ""),
                        product_sku: sku,
                        product_price: text_or(product, "/price/price/0/text", DEFAULT_PRICE),
                        quantity: 1,
                        added_date: now,
                    });
                }
            }
        }
    }

    items
}

/// `title.common.action.id`, as text. Empty strings and zero don't count.
fn product_sku(product: &Value) -> Option<String> {
    match product.pointer("/title/common/action/id")? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        _ => None,
    }
}

fn text_or(value: &Value, pointer: &str, default: &str) -> String {
    value
        .pointer(pointer)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .unwrap_or(default)
        .to_string()
}

fn truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64() != Some(0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn product(sku: Value, name: &str, price: &str) -> Value {
        json!({
            "title": {
                "name": { "text": name },
                "common": { "action": { "id": sku, "link": format!("/product/{name}") } }
            },
            "picture": { "image": { "image": format!("https://img/{name}.jpg") } },
            "price": { "price": [ { "text": price } ] }
        })
    }

    fn state(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("state must be an object"),
        }
    }

    #[test]
    fn test_flattens_nested_shipments() {
        let states = vec![
            state(json!({ "header": { "number": "42-0007" } })),
            state(json!({
                "shipmentId": "s1",
                "items": [
                    { "sellers": [ {
                        "name": { "text": "Acme" },
                        "products": [ product(json!("111"), "Kettle", "1 299 ₽"), product(json!(222), "Cup", "99 ₽") ]
                    } ] }
                ]
            })),
            state(json!({
                "shipmentId": 2,
                "items": [ { "sellers": [ { "products": [ product(json!("333"), "Spoon", "10 ₽") ] } ] } ]
            })),
        ];

        let now = Utc::now();
        let items = flatten_order("42", 7, &states, now);
        assert_eq!(items.len(), 3);

        assert_eq!(items[0].owner_id, "42");
        assert_eq!(items[0].order_number, "0007");
        assert_eq!(items[0].product_sku, "111");
        assert_eq!(items[0].seller_name, "Acme");
        assert_eq!(items[0].product_name, "Kettle");
        assert_eq!(items[0].product_link, "/product/Kettle");
        assert_eq!(items[0].product_image, "https://img/Kettle.jpg");
        assert_eq!(items[0].product_price, "1 299 ₽");
        assert_eq!(items[0].added_date, now);

        assert_eq!(items[1].product_sku, "222");
        assert_eq!(items[2].seller_name, "Unknown");
    }

    #[test]
    fn test_duplicate_sku_increments_quantity() {
        let states = vec![
            state(json!({
                "shipmentId": "s1",
                "items": [ { "sellers": [ { "products": [ product(json!("111"), "Kettle", "1 ₽") ] } ] } ]
            })),
            state(json!({
                "shipmentId": "s2",
                "items": [ { "sellers": [ { "products": [
                    product(json!("111"), "Kettle", "1 ₽"),
                    product(json!("222"), "Cup", "2 ₽")
                ] } ] } ]
            })),
        ];

        let items = flatten_order("42", 1, &states, Utc::now());
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].product_sku, "111");
        assert_eq!(items[0].quantity, 2);
        assert_eq!(items[1].quantity, 1);
    }

    #[test]
    fn test_skips_malformed_levels() {
        let states = vec![
            // No shipment id.
            state(json!({ "items": [ { "sellers": [ { "products": [ product(json!("1"), "A", "1 ₽") ] } ] } ] })),
            state(json!({ "shipmentId": "", "items": [] })),
            state(json!({ "shipmentId": "s", "items": "oops" })),
            state(json!({
                "shipmentId": "s",
                "items": [
                    { "nosellers": true },
                    { "sellers": [ { "products": null }, { "products": [
                        { "title": { "name": { "text": "No sku" } } },
                        product(json!(""), "Empty sku", "1 ₽"),
                        product(json!(0), "Zero sku", "1 ₽"),
                        { "title": { "common": { "action": { "id": "777" } } } }
                    ] } ] }
                ]
            })),
        ];

        let items = flatten_order("42", 3, &states, Utc::now());
        assert_eq!(items.len(), 1);
        let only = &items[0];
        assert_eq!(only.product_sku, "777");
        assert_eq!(only.product_name, "Unknown");
        assert_eq!(only.product_link, "");
        assert_eq!(only.product_image, "");
        assert_eq!(only.product_price, "0 ₽");
    }
}
