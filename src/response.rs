//! Reply parsing, error classification and entity extraction.
//!
//! A [`Response`] is built from a raw XML body by [`Response::parse`]. The
//! acknowledgement field decides what happens: `Success` and `Warning`
//! replies expose their contents through the typed extraction methods,
//! while a `Failure` reply is turned into a classified [`Error`] after the
//! originating request's error hook has observed the error record.
//!
//! Where the items live in the reply differs by call; the mapping is a pure
//! data-location table on [`CallName`], not behaviour.

use std::str::FromStr;

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{ApiErrorDetails, Error, Result};
use crate::request::{Attempt, RequestHooks};
use crate::types::{Item, Product};
use crate::xml;

/// The remote operations this crate supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum CallName {
    /// Basic item search.
    FindItems,
    /// Item search with paging, sorting and filters.
    FindItemsAdvanced,
    /// Most-watched item listing.
    FindPopularItems,
    /// Single item lookup by id.
    GetSingleItem,
    /// Batched item lookup by ids.
    GetMultipleItems,
    /// Category metadata lookup.
    GetCategoryInfo,
    /// Catalogue product search.
    FindProducts,
}

impl CallName {
    /// The wire name of the operation, as it appears in `callname=`.
    pub fn api_name(self) -> &'static str {
        match self {
            Self::FindItems => "FindItems",
            Self::FindItemsAdvanced => "FindItemsAdvanced",
            Self::FindPopularItems => "FindPopularItems",
            Self::GetSingleItem => "GetSingleItem",
            Self::GetMultipleItems => "GetMultipleItems",
            Self::GetCategoryInfo => "GetCategoryInfo",
            Self::FindProducts => "FindProducts",
        }
    }

    /// Where the item records live within the parsed reply.
    fn item_path(self) -> &'static [&'static str] {
        match self {
            Self::FindItemsAdvanced => &["SearchResult", "ItemArray", "Item"],
            Self::FindPopularItems => &["ItemArray", "Item"],
            Self::FindProducts => &["Product"],
            _ => &["Item"],
        }
    }
}

impl FromStr for CallName {
    type Err = Error;

    /// Parses the lower-case/underscored form, e.g. `find_items_advanced`.
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "find_items" => Ok(Self::FindItems),
            "find_items_advanced" => Ok(Self::FindItemsAdvanced),
            "find_popular_items" => Ok(Self::FindPopularItems),
            "get_single_item" => Ok(Self::GetSingleItem),
            "get_multiple_items" => Ok(Self::GetMultipleItems),
            "get_category_info" => Ok(Self::GetCategoryInfo),
            "find_products" => Ok(Self::FindProducts),
            other => Err(Error::request(format!("unsupported call name: {other}"))),
        }
    }
}

/// A successfully acknowledged API reply.
///
/// Failure acknowledgements never produce a `Response`; they are classified
/// into an [`Error`] during parsing, so a `Response` in hand means the reply
/// contents are safe to extract.
#[derive(Debug, Clone)]
pub struct Response {
    call: CallName,
    full: Value,
    attempt: Attempt,
}

impl Response {
    /// Parses a raw reply body for the given call.
    ///
    /// On a `Failure` acknowledgement the error record is extracted, handed
    /// to `hooks` for observation, and classified: a fresh internal timeout
    /// (code `1.23`) becomes [`Error::InternalTimeout`], a repeated one or a
    /// `SystemError` classification becomes [`Error::System`], anything else
    /// [`Error::ApiRequest`].
    pub fn parse(
        body: &str,
        call: CallName,
        attempt: Attempt,
        hooks: &dyn RequestHooks,
    ) -> Result<Self> {
        let full = xml::parse_document(body)?;
        match full.get("Ack").and_then(Value::as_str) {
            Some("Failure") => {
                let details = ApiErrorDetails::from_reply(&full)?;
                debug!(code = ?details.code, "failure acknowledgement");
                hooks.on_api_error(&details);
                Err(details.classify(attempt.is_retried()))
            }
            Some("Warning") => {
                warn!(call = call.api_name(), "reply acknowledged with warning");
                Ok(Self {
                    call,
                    full,
                    attempt,
                })
            }
            _ => Ok(Self {
                call,
                full,
                attempt,
            }),
        }
    }

    /// The call this reply answered.
    pub fn call(&self) -> CallName {
        self.call
    }

    /// The full parsed reply, for anything without a typed accessor.
    pub fn full(&self) -> &Value {
        &self.full
    }

    /// Whether this reply came from the one permitted retry after an
    /// internal timeout.
    pub fn repeat_call(&self) -> bool {
        self.attempt.is_retried()
    }

    /// Total number of items matching the query, when the reply carries it.
    pub fn total_items(&self) -> Option<i64> {
        self.int_field("TotalItems")
    }

    /// Total number of result pages, when the reply carries it.
    pub fn total_pages(&self) -> Option<i64> {
        self.int_field("TotalPages")
    }

    /// Current page number, when the reply carries it.
    pub fn page_number(&self) -> Option<i64> {
        self.int_field("PageNumber")
    }

    /// The item records of the reply as typed entities.
    ///
    /// When the reply says zero items matched, no extraction is attempted.
    /// A single item collapsed to a bare mapping by the XML layer is
    /// re-wrapped into a one-element list.
    pub fn items(&self) -> Vec<Item> {
        if self.total_items() == Some(0) {
            return Vec::new();
        }
        match self.records(self.call.item_path()) {
            Some(records) => records.into_iter().map(Item::new).collect(),
            None => Vec::new(),
        }
    }

    /// The single item of a [`CallName::GetSingleItem`] reply.
    pub fn item(&self) -> Option<Item> {
        self.full.get("Item").cloned().map(Item::new)
    }

    /// The product records of a [`CallName::FindProducts`] reply.
    pub fn products(&self) -> Vec<Product> {
        if self.total_items() == Some(0) {
            return Vec::new();
        }
        match self.records(&["Product"]) {
            Some(records) => records.into_iter().map(Product::new).collect(),
            None => Vec::new(),
        }
    }

    /// Walks a data-location path and normalizes the result to a sequence.
    fn records(&self, path: &[&str]) -> Option<Vec<Value>> {
        let mut value = &self.full;
        for key in path {
            value = value.get(key)?;
        }
        Some(match value {
            Value::Array(items) => items.clone(),
            single => vec![single.clone()],
        })
    }

    fn int_field(&self, key: &str) -> Option<i64> {
        self.full
            .get(key)
            .and_then(|v| v.as_i64().or_else(|| v.as_str()?.trim().parse().ok()))
    }
}
