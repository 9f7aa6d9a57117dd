//! XML reply parsing into a nested [`serde_json::Value`] mapping.
//!
//! The Shopping API speaks XML; the rest of the crate works on nested string
//! maps. [`parse_document`] turns a reply body into a `Value` with the same
//! shape the rest of the pipeline expects:
//!
//! - a text-only element becomes a string;
//! - an element with attributes becomes a mapping of its attributes, with
//!   any text content under the `"content"` key (this is how currency
//!   values like `<Price currencyID="GBP">5.99</Price>` arrive);
//! - child elements become mapping entries keyed by element name;
//! - repeated sibling elements collapse into a sequence, while a single
//!   occurrence stays a bare value. Callers extracting lists must re-wrap
//!   single elements themselves.
//!
//! The document root's name is dropped; its contents are the result.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde_json::{Map, Value};

use crate::error::{ParseError, Result};

/// One partially parsed element.
struct Frame {
    name: String,
    attrs: Map<String, Value>,
    children: Map<String, Value>,
    text: String,
}

impl Frame {
    fn open(start: &BytesStart<'_>) -> Result<Self> {
        let mut attrs = Map::new();
        for attr in start.attributes() {
            let attr = attr.map_err(ParseError::from)?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr
                .unescape_value()
                .map_err(ParseError::from)?
                .into_owned();
            attrs.insert(key, Value::String(value));
        }
        Ok(Self {
            name: String::from_utf8_lossy(start.name().as_ref()).into_owned(),
            attrs,
            children: Map::new(),
            text: String::new(),
        })
    }

    /// Collapses the frame into its element name and final value.
    fn finish(self) -> (String, Value) {
        let text = self.text.trim();
        let value = if !self.children.is_empty() {
            // Mixed content is not part of the API surface; text between
            // child elements is dropped.
            let mut map = self.attrs;
            map.extend(self.children);
            Value::Object(map)
        } else if !self.attrs.is_empty() {
            let mut map = self.attrs;
            if !text.is_empty() {
                map.insert("content".to_string(), Value::String(text.to_string()));
            }
            Value::Object(map)
        } else {
            Value::String(text.to_string())
        };
        (self.name, value)
    }
}

/// Inserts a child value, promoting repeated siblings to a sequence.
fn attach(children: &mut Map<String, Value>, name: String, value: Value) {
    match children.get_mut(&name) {
        None => {
            children.insert(name, value);
        }
        Some(Value::Array(items)) => items.push(value),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, value]);
        }
    }
}

/// Parses a raw reply body into a nested mapping.
///
/// # Errors
///
/// Returns [`ParseError::Xml`] for malformed XML and
/// [`ParseError::MissingField`] when the document has no root element.
pub fn parse_document(body: &str) -> Result<Value> {
    let mut reader = Reader::from_str(body);
    let mut stack: Vec<Frame> = Vec::new();

    loop {
        match reader.read_event().map_err(ParseError::from)? {
            Event::Start(start) => stack.push(Frame::open(&start)?),
            Event::Empty(start) => {
                let (name, value) = Frame::open(&start)?.finish();
                match stack.last_mut() {
                    Some(parent) => attach(&mut parent.children, name, value),
                    None => return Ok(value),
                }
            }
            Event::Text(text) => {
                if let Some(frame) = stack.last_mut() {
                    frame.text.push_str(&text.unescape().map_err(ParseError::from)?);
                }
            }
            Event::CData(data) => {
                if let Some(frame) = stack.last_mut() {
                    frame
                        .text
                        .push_str(&String::from_utf8_lossy(&data.into_inner()));
                }
            }
            Event::End(_) => {
                let frame = stack.pop().ok_or_else(|| ParseError::Xml(
                    "unbalanced closing tag".to_string(),
                ))?;
                let (name, value) = frame.finish();
                match stack.last_mut() {
                    Some(parent) => attach(&mut parent.children, name, value),
                    None => return Ok(value),
                }
            }
            Event::Eof => {
                return Err(ParseError::missing_field("document root").into());
            }
            // Declarations, comments, processing instructions and doctypes
            // carry no reply data.
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn text_only_element_becomes_a_string() {
        let value = parse_document("<Response><Ack>Success</Ack></Response>").unwrap();
        assert_eq!(value["Ack"], json!("Success"));
    }

    #[test]
    fn root_name_is_dropped_and_root_attributes_kept() {
        let value = parse_document(
            r#"<FindItemsResponse xmlns="urn:ebay:apis:eBLBaseComponents"><Ack>Success</Ack></FindItemsResponse>"#,
        )
        .unwrap();
        assert_eq!(value["xmlns"], json!("urn:ebay:apis:eBLBaseComponents"));
        assert_eq!(value["Ack"], json!("Success"));
    }

    #[test]
    fn attributes_and_text_merge_with_content_key() {
        let value = parse_document(
            r#"<R><ConvertedCurrentPrice currencyID="GBP">5.99</ConvertedCurrentPrice></R>"#,
        )
        .unwrap();
        assert_eq!(
            value["ConvertedCurrentPrice"],
            json!({"currencyID": "GBP", "content": "5.99"})
        );
    }

    #[test]
    fn single_child_element_stays_a_bare_value() {
        let value = parse_document("<R><Item><Title>one</Title></Item></R>").unwrap();
        assert_eq!(value["Item"], json!({"Title": "one"}));
    }

    #[test]
    fn repeated_siblings_collapse_into_a_sequence() {
        let value = parse_document(
            "<R><Item><Title>one</Title></Item><Item><Title>two</Title></Item><Item><Title>three</Title></Item></R>",
        )
        .unwrap();
        assert_eq!(
            value["Item"],
            json!([{"Title": "one"}, {"Title": "two"}, {"Title": "three"}])
        );
    }

    #[test]
    fn nested_structure_is_preserved() {
        let value = parse_document(
            "<R><SearchResult><ItemArray><Item><Title>one</Title></Item></ItemArray></SearchResult></R>",
        )
        .unwrap();
        assert_eq!(
            value["SearchResult"]["ItemArray"]["Item"]["Title"],
            json!("one")
        );
    }

    #[test]
    fn closed_elements_attach_under_their_own_names() {
        let value = parse_document(
            r#"<R><Seller><UserID>bob</UserID></Seller><GalleryURL/><Site Name="UK"/></R>"#,
        )
        .unwrap();
        assert_eq!(value["Seller"]["UserID"], json!("bob"));
        assert_eq!(value["GalleryURL"], json!(""));
        assert_eq!(value["Site"], json!({"Name": "UK"}));
    }

    #[test]
    fn entities_are_unescaped() {
        let value = parse_document("<R><Title>dog &amp; cat</Title></R>").unwrap();
        assert_eq!(value["Title"], json!("dog & cat"));
    }

    #[test]
    fn whitespace_between_elements_is_ignored() {
        let value = parse_document("<R>\n  <Ack>Success</Ack>\n  <TotalItems>117</TotalItems>\n</R>")
            .unwrap();
        assert_eq!(value["Ack"], json!("Success"));
        assert_eq!(value["TotalItems"], json!("117"));
    }

    #[test]
    fn malformed_xml_is_a_parse_error() {
        assert!(parse_document("<R><Unclosed></R>").is_err());
        assert!(parse_document("").is_err());
    }
}
