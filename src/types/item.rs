//! Auction items returned by the item search calls.

use chrono::{DateTime, Local};
use serde_json::{Map, Value};

use super::{AttributeBag, Money};

/// Duration units rendered by [`Item::time_left`], largest first.
const TIME_UNITS: [(&str, i64); 3] = [("days", 86_400), ("hours", 3_600), ("minutes", 60)];

/// An item record from a search reply.
///
/// The full attribute mapping extracted for the item is retained, so
/// attributes without a typed accessor stay reachable through
/// [`AttributeBag::get`]:
///
/// ```rust
/// use ebay_shopping::types::{AttributeBag, Item};
/// use serde_json::json;
///
/// let item = Item::new(json!({"Title": "Dummy item", "Storefront": "yes"}));
/// assert_eq!(item.title(), Some("Dummy item"));
/// assert_eq!(item.get("Storefront"), Some(&json!("yes")));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    attrs: Map<String, Value>,
}

impl Item {
    /// Builds an item from the attribute mapping extracted from a reply.
    /// Non-mapping values produce an item with no attributes.
    pub fn new(value: Value) -> Self {
        Self {
            attrs: match value {
                Value::Object(map) => map,
                _ => Map::new(),
            },
        }
    }

    /// Item id.
    pub fn item_id(&self) -> Option<&str> {
        self.text("ItemID")
    }

    /// Listing title.
    pub fn title(&self) -> Option<&str> {
        self.text("Title")
    }

    /// Number of bids placed so far.
    pub fn bid_count(&self) -> Option<i64> {
        self.int("BidCount")
    }

    /// Item description, when the call was asked to include it.
    pub fn description(&self) -> Option<&str> {
        self.text("Description")
    }

    /// Gallery thumbnail URL.
    pub fn gallery_url(&self) -> Option<&str> {
        self.text("GalleryURL")
    }

    /// Name of the item's primary category.
    pub fn primary_category_name(&self) -> Option<&str> {
        self.text("PrimaryCategoryName")
    }

    /// Listing URL optimised for natural search.
    pub fn view_item_url_for_natural_search(&self) -> Option<&str> {
        self.text("ViewItemURLForNaturalSearch")
    }

    /// Current price converted to the site's currency, when present.
    pub fn converted_current_price(&self) -> Option<Money> {
        self.get("ConvertedCurrentPrice").and_then(Money::from_value)
    }

    /// Auction end time, converted to local time.
    ///
    /// The reply carries an XML-schema timestamp such as
    /// `2008-01-06T22:50:09.000Z`; unparseable values yield `None`.
    pub fn end_time(&self) -> Option<DateTime<Local>> {
        self.text("EndTime")
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Local))
    }

    /// Time remaining until the auction ends, as `"<n> days, <n> hours,
    /// <n> minutes"` with zero-magnitude components omitted.
    ///
    /// Computed from [`Item::end_time`] rather than the `TimeLeft`
    /// attribute, which arrives in the ISO-8601 duration format. Returns an
    /// empty string when less than a minute remains and `None` when the end
    /// time is absent.
    pub fn time_left(&self) -> Option<String> {
        self.time_left_at(Local::now())
    }

    /// [`Item::time_left`] measured against an explicit instant.
    pub fn time_left_at(&self, now: DateTime<Local>) -> Option<String> {
        let end = self.end_time()?;
        let mut remaining = (end - now).num_seconds().max(0);
        let mut parts = Vec::new();
        for (unit, seconds) in TIME_UNITS {
            let magnitude = remaining / seconds;
            remaining %= seconds;
            if magnitude > 0 {
                parts.push(format!("{magnitude} {unit}"));
            }
        }
        Some(parts.join(", "))
    }
}

impl AttributeBag for Item {
    fn attributes(&self) -> &Map<String, Value> {
        &self.attrs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use serde_json::json;

    #[test]
    fn typed_accessors_read_known_attributes() {
        let item = Item::new(json!({
            "ItemID": "foo123",
            "Title": "Dummy ebay item",
            "BidCount": "7",
            "GalleryURL": "http://thumbs.example.com/1.jpg",
            "PrimaryCategoryName": "Music:CDs",
        }));
        assert_eq!(item.item_id(), Some("foo123"));
        assert_eq!(item.title(), Some("Dummy ebay item"));
        assert_eq!(item.bid_count(), Some(7));
        assert_eq!(item.gallery_url(), Some("http://thumbs.example.com/1.jpg"));
        assert_eq!(item.primary_category_name(), Some("Music:CDs"));
    }

    #[test]
    fn typed_accessor_and_raw_lookup_agree_for_known_fields() {
        let item = Item::new(json!({"ItemID": "foo123", "Title": "Dummy ebay item"}));
        assert_eq!(item.get("Title").and_then(Value::as_str), item.title());
        assert_eq!(item.get("ItemID").and_then(Value::as_str), item.item_id());
    }

    #[test]
    fn unknown_attributes_stay_reachable_through_raw_lookup() {
        let item = Item::new(json!({"ItemID": "foo123", "Storefront": "bar"}));
        assert_eq!(item.get("Storefront"), Some(&json!("bar")));
        assert_eq!(item.get("NoSuchAttribute"), None);
    }

    #[test]
    fn converted_current_price_builds_a_money_value() {
        let item = Item::new(json!({
            "ConvertedCurrentPrice": {"currencyID": "GBP", "content": "0.99"}
        }));
        assert_eq!(item.converted_current_price().unwrap().format(), "£0.99");
    }

    #[test]
    fn converted_current_price_is_none_when_absent() {
        let item = Item::new(json!({"ItemID": "foo123"}));
        assert!(item.converted_current_price().is_none());
    }

    #[test]
    fn end_time_parses_xml_schema_timestamps() {
        let item = Item::new(json!({"EndTime": "2008-01-06T22:50:09.000Z"}));
        let end = item.end_time().unwrap();
        assert_eq!(end.timestamp(), 1_199_659_809);
    }

    #[test]
    fn time_left_renders_nonzero_components() {
        let now = Local::now();
        let end = now + Duration::seconds(((3 * 24 + 4) * 60 + 32) * 60 + 1);
        let item = Item::new(json!({"EndTime": end.to_rfc3339()}));
        assert_eq!(
            item.time_left_at(now).unwrap(),
            "3 days, 4 hours, 32 minutes"
        );
    }

    #[test]
    fn time_left_skips_zero_components() {
        let now = Local::now();
        let end = now + Duration::seconds(2 * 86_400 + 15 * 60);
        let item = Item::new(json!({"EndTime": end.to_rfc3339()}));
        assert_eq!(item.time_left_at(now).unwrap(), "2 days, 15 minutes");
    }

    #[test]
    fn time_left_is_empty_under_one_minute() {
        let now = Local::now();
        let end = now + Duration::seconds(59);
        let item = Item::new(json!({"EndTime": end.to_rfc3339()}));
        assert_eq!(item.time_left_at(now).unwrap(), "");
    }

    #[test]
    fn time_left_is_none_without_an_end_time() {
        let item = Item::new(json!({"ItemID": "foo123"}));
        assert!(item.time_left().is_none());
    }
}
