//! Typed domain entities built from reply attribute mappings.
//!
//! Each entity wraps the flat attribute mapping extracted for one record and
//! exposes typed accessors for its well-known attributes. The original
//! mapping is always retained in full, so nothing the API sends is lost:
//! anything without a typed accessor is reachable through
//! [`AttributeBag::get`].

use serde_json::{Map, Value};

mod item;
mod money;
mod product;

pub use item::Item;
pub use money::Money;
pub use product::Product;

/// Shared behaviour of entities built from a flat attribute mapping.
pub trait AttributeBag {
    /// The full attribute mapping the entity was built from.
    fn attributes(&self) -> &Map<String, Value>;

    /// Raw lookup by the attribute's wire name, e.g. `item.get("Storefront")`.
    fn get(&self, name: &str) -> Option<&Value> {
        self.attributes().get(name)
    }

    /// String attribute by wire name.
    fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    /// Integer attribute by wire name. The XML layer delivers numbers as
    /// strings, so both shapes are accepted.
    fn int(&self, name: &str) -> Option<i64> {
        self.get(name)
            .and_then(|v| v.as_i64().or_else(|| v.as_str()?.parse().ok()))
    }
}
