//! # eBay Shopping API client
//!
//! Client library for the eBay Shopping API: builds signed query URLs with
//! deterministic parameter ordering, performs blocking HTTP GETs, parses
//! the XML replies into typed response objects, and classifies API-reported
//! errors into a small taxonomy with a one-shot retry for eBay's internal
//! timeout error.
//!
//! # Features
//!
//! - **Reproducible URLs**: query parameters are ordered deterministically,
//!   so the same request always builds the same URL (and cached responses
//!   stay addressable)
//! - **Typed entities**: items, products and money values built from the
//!   reply, with the full attribute mapping retained for everything else
//! - **Error classification**: `thiserror`-based taxonomy separating
//!   configuration, transport, request and eBay-system failures
//! - **One-shot retry**: eBay's internal timeout (code `1.23`) is retried
//!   exactly once, then escalated
//!
//! # Example
//!
//! ```rust,no_run
//! use ebay_shopping::prelude::*;
//! use serde_json::json;
//!
//! # fn main() -> ebay_shopping::Result<()> {
//! let config = Config::new("my-app-id").with_site_id(3);
//! let params = Params::from([("query_keywords".to_string(), json!("dog collar"))]);
//! let mut request = Request::new(&config, CallName::FindItemsAdvanced, params)?;
//! let response = request.execute()?;
//! for item in response.items() {
//!     println!("{}: {}", item.title().unwrap_or("?"),
//!         item.converted_current_price().map_or_else(String::new, |p| p.format()));
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// Re-exports of external dependencies callers interact with.
pub use rust_decimal;
pub use serde_json;

pub mod config;
pub mod error;
pub mod http;
pub mod logging;
pub mod request;
pub mod response;
pub mod types;
pub mod xml;

pub use config::Config;
pub use error::{ApiErrorDetails, Error, ParseError, Result};
pub use http::{HttpTransport, Transport, REQUEST_TIMEOUT};
pub use request::{site_name, Attempt, NoopHooks, Params, Request, RequestHooks};
pub use response::{CallName, Response};
pub use types::{AttributeBag, Item, Money, Product};

/// Prelude module for convenient imports
///
/// Import everything you need with:
/// ```rust
/// use ebay_shopping::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::error::{ApiErrorDetails, Error, ParseError, Result};
    pub use crate::http::{HttpTransport, Transport};
    pub use crate::logging::{init_logging, try_init_logging};
    pub use crate::request::{Attempt, NoopHooks, Params, Request, RequestHooks};
    pub use crate::response::{CallName, Response};
    pub use crate::types::{AttributeBag, Item, Money, Product};
    pub use rust_decimal::Decimal;
}

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
        assert_eq!(NAME, "ebay-shopping");
    }
}
