//! Catalogue products returned by the product search calls.

use serde_json::{Map, Value};

use super::AttributeBag;

/// A product record from a `FindProducts` reply.
///
/// Like [`Item`](super::Item), the full attribute mapping is retained and
/// attributes without a typed accessor remain reachable through
/// [`AttributeBag::get`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    attrs: Map<String, Value>,
}

impl Product {
    /// Builds a product from the attribute mapping extracted from a reply.
    pub fn new(value: Value) -> Self {
        Self {
            attrs: match value {
                Value::Object(map) => map,
                _ => Map::new(),
            },
        }
    }

    /// Catalogue product id.
    ///
    /// The reply may collapse this to a bare string or ship it as a mapping
    /// with the id as text content, depending on whether attributes are
    /// attached; both shapes are handled.
    pub fn product_id(&self) -> Option<&str> {
        match self.get("ProductID") {
            Some(Value::String(id)) => Some(id),
            Some(Value::Object(map)) => map.get("content").and_then(Value::as_str),
            _ => None,
        }
    }

    /// Product title.
    pub fn title(&self) -> Option<&str> {
        self.text("Title")
    }
}

impl AttributeBag for Product {
    fn attributes(&self) -> &Map<String, Value> {
        &self.attrs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn typed_accessors_read_known_attributes() {
        let product = Product::new(json!({"ProductID": "foo123", "Title": "Dummy ebay product"}));
        assert_eq!(product.product_id(), Some("foo123"));
        assert_eq!(product.title(), Some("Dummy ebay product"));
    }

    #[test]
    fn product_id_handles_the_attributed_shape() {
        let product = Product::new(json!({
            "ProductID": {"type": "Reference", "content": "59951265"}
        }));
        assert_eq!(product.product_id(), Some("59951265"));
    }

    #[test]
    fn unknown_attributes_stay_reachable_through_raw_lookup() {
        let product = Product::new(json!({"ProductID": "foo123", "DisplayStockPhotos": "true"}));
        assert_eq!(product.get("DisplayStockPhotos"), Some(&json!("true")));
    }
}
