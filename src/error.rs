//! Error handling for the eBay Shopping client.
//!
//! The error taxonomy mirrors the failure modes of one Shopping API call:
//!
//! ```text
//! Error
//! ├── Config          - Bad or missing configuration
//! ├── Timeout         - Transport-level timeout (caller may retry)
//! ├── InternalTimeout - eBay-reported internal timeout, code 1.23
//! │                     (retried exactly once by Request, never surfaced)
//! ├── Request         - Invalid request as reported by eBay, or any
//! │                     non-2xx transport status
//! ├── System          - eBay-side failure, or a second internal timeout
//! │                     after the one permitted retry
//! └── Parse           - Malformed XML or unexpected reply shape
//! ```
//!
//! API-reported failures carry an [`ApiErrorDetails`] record extracted from
//! the reply's `Errors` element; [`ApiErrorDetails::classify`] is the single
//! place where an acknowledged failure is turned into an error kind.

use std::borrow::Cow;

use serde_json::Value;
use thiserror::Error;

/// Result type alias for all eBay Shopping operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Remote error code eBay uses for its own internal timeouts.
const INTERNAL_TIMEOUT_CODE: &str = "1.23";

/// Error record extracted from a failure acknowledgement.
///
/// Boxed inside [`Error`] variants to keep the enum size small.
///
/// # Example
///
/// ```rust
/// use ebay_shopping::error::ApiErrorDetails;
///
/// let details = ApiErrorDetails::new("1.23", "Internal error to the application.");
/// assert_eq!(details.code.as_deref(), Some("1.23"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct ApiErrorDetails {
    /// Error code as reported by eBay (e.g. `"1.23"`, `"10.12"`).
    pub code: Option<String>,
    /// `RequestError` or `SystemError`.
    pub classification: Option<String>,
    /// Short human-readable summary.
    pub short_message: Option<String>,
    /// Longer human-readable description.
    pub long_message: Option<String>,
    /// Severity as reported by eBay (usually `Error` or `Warning`).
    pub severity: Option<String>,
}

impl ApiErrorDetails {
    /// Creates a new record with the given code and long message.
    pub fn new(code: impl Into<String>, long_message: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            classification: None,
            short_message: None,
            long_message: Some(long_message.into()),
            severity: None,
        }
    }

    /// Extracts the error record from a parsed reply.
    ///
    /// The upstream parser collapses a single `Errors` element to a bare
    /// mapping; multiple errors become a sequence, of which the first is
    /// taken.
    pub fn from_reply(reply: &Value) -> Result<Self> {
        let errors = reply
            .get("Errors")
            .ok_or_else(|| ParseError::missing_field("Errors"))?;
        let record = match errors {
            Value::Array(items) => items
                .first()
                .ok_or_else(|| ParseError::missing_field("Errors"))?,
            other => other,
        };
        let field = |name: &str| {
            record
                .get(name)
                .and_then(Value::as_str)
                .map(ToString::to_string)
        };
        Ok(Self {
            code: field("ErrorCode"),
            classification: field("ErrorClassification"),
            short_message: field("ShortMessage"),
            long_message: field("LongMessage"),
            severity: field("SeverityCode"),
        })
    }

    /// Whether this record carries eBay's internal-timeout code.
    pub fn is_internal_timeout(&self) -> bool {
        self.code.as_deref() == Some(INTERNAL_TIMEOUT_CODE)
    }

    /// Classifies an acknowledged failure into an error kind.
    ///
    /// A fresh internal timeout (code `1.23`) is eligible for the one-shot
    /// retry; the same code on the retried attempt escalates to
    /// [`Error::System`], as does an explicit `SystemError` classification.
    /// Everything else is an invalid request.
    pub fn classify(self, retried: bool) -> Error {
        if self.is_internal_timeout() {
            if retried {
                Error::System(Box::new(self))
            } else {
                Error::InternalTimeout(Box::new(self))
            }
        } else if self.classification.as_deref() == Some("SystemError") {
            Error::System(Box::new(self))
        } else {
            Error::ApiRequest(Box::new(self))
        }
    }

    /// Best available human-readable message.
    pub fn message(&self) -> &str {
        self.long_message
            .as_deref()
            .or(self.short_message.as_deref())
            .unwrap_or("unknown eBay error")
    }
}

impl std::fmt::Display for ApiErrorDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.code {
            Some(code) => write!(f, "{} (code: {code})", self.message()),
            None => write!(f, "{}", self.message()),
        }
    }
}

/// Errors raised while parsing a reply body.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ParseError {
    /// Malformed XML in the reply body.
    #[error("failed to parse XML: {0}")]
    Xml(String),

    /// A field the reply shape requires was absent.
    #[error("missing required field: {0}")]
    MissingField(Cow<'static, str>),

    /// A field was present but held an unusable value.
    #[error("invalid value for '{field}': {message}")]
    InvalidValue {
        /// Field name.
        field: Cow<'static, str>,
        /// What was wrong with it.
        message: Cow<'static, str>,
    },
}

impl ParseError {
    /// Creates a `MissingField` error with a static string (no allocation).
    #[must_use]
    pub fn missing_field(field: &'static str) -> Self {
        Self::MissingField(Cow::Borrowed(field))
    }

    /// Creates an `InvalidValue` error.
    pub fn invalid_value(
        field: impl Into<Cow<'static, str>>,
        message: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl From<quick_xml::Error> for ParseError {
    fn from(err: quick_xml::Error) -> Self {
        Self::Xml(err.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for ParseError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Self::Xml(err.to_string())
    }
}

/// The primary error type for the `ebay-shopping` library.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Bad or missing configuration.
    #[error("configuration error: {0}")]
    Config(Cow<'static, str>),

    /// Transport-level timeout. eBay is currently unavailable; the caller
    /// may retry later. The library never auto-retries this kind.
    #[error("eBay is currently unavailable: {0}")]
    Timeout(Cow<'static, str>),

    /// eBay reported its own internal timeout (code `1.23`).
    ///
    /// [`Request::execute`](crate::request::Request::execute) retries such a
    /// call exactly once, so this kind is not normally surfaced to callers.
    #[error("eBay internal timeout: {0}")]
    InternalTimeout(Box<ApiErrorDetails>),

    /// Invalid request as acknowledged by eBay.
    #[error("eBay request error: {0}")]
    ApiRequest(Box<ApiErrorDetails>),

    /// Transport-level request failure (non-2xx status, connection error).
    #[error("request failed: {0}")]
    Request(Cow<'static, str>),

    /// eBay-side failure, or a recurring internal timeout after the one
    /// permitted retry.
    #[error("eBay system error: {0}")]
    System(Box<ApiErrorDetails>),

    /// The reply body could not be parsed.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
}

impl Error {
    /// Creates a configuration error.
    /// Accepts both `&'static str` (zero allocation) and `String`.
    pub fn config(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates a transport timeout error.
    pub fn timeout(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::Timeout(msg.into())
    }

    /// Creates a transport-level request error.
    pub fn request(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::Request(msg.into())
    }

    /// The API-reported error record, when this error was classified from a
    /// failure acknowledgement.
    pub fn api_details(&self) -> Option<&ApiErrorDetails> {
        match self {
            Self::InternalTimeout(d) | Self::ApiRequest(d) | Self::System(d) => Some(d),
            _ => None,
        }
    }

    /// Whether the caller may reasonably retry the whole call.
    ///
    /// Only transport timeouts qualify; everything else is either fatal or
    /// already retried internally.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }
}
