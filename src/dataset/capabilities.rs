use serde::Serialize;
use serde_json::Value;

/// Optional order columns the export may or may not carry.
///
/// Detected once when the export is loaded and handed to the aggregation
/// layer; nothing re-inspects the raw rows afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SchemaCapabilities {
    pub order_type: bool,
    pub product: bool,
    pub seats: bool,
}

impl SchemaCapabilities {
    /// Every optional column present.
    pub fn full() -> Self {
        Self {
            order_type: true,
            product: true,
            seats: true,
        }
    }

    /// A column counts as present when any order row carries the key, even with
    /// a null value.
    pub fn detect(raw: &Value) -> Self {
        let orders = match raw.get("orders").and_then(Value::as_array) {
            Some(orders) => orders,
            None => return Self::default(),
        };
        let has_key = |key: &str| {
            orders
                .iter()
                .any(|o| o.as_object().is_some_and(|obj| obj.contains_key(key)))
        };
        Self {
            order_type: has_key("order_type"),
            product: has_key("product"),
            seats: has_key("seats"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_detect_present_columns() {
        let raw = json!({
            "orders": [
                { "id": "SO-1", "product": null },
                { "id": "SO-2", "seats": 5 }
            ]
        });
        let caps = SchemaCapabilities::detect(&raw);
        assert!(caps.product);
        assert!(caps.seats);
        assert!(!caps.order_type);
    }

    #[test]
    fn test_detect_without_orders() {
        let caps = SchemaCapabilities::detect(&json!({ "customers": [] }));
        assert_eq!(caps, SchemaCapabilities::default());
    }
}
