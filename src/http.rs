//! Blocking HTTP transport.
//!
//! The pipeline needs exactly one transport operation: a blocking GET of an
//! absolute URL with a short fixed timeout. [`Transport`] is the seam that
//! keeps the rest of the crate off the wire in tests; [`HttpTransport`] is
//! the live implementation on `reqwest`.

use std::fmt;
use std::time::Duration;

use tracing::debug;

use crate::error::{Error, Result};

/// Fixed per-attempt timeout for calls to eBay.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// A blocking GET of an absolute URL.
///
/// # Contract
///
/// - success returns the raw response body;
/// - a transport-level timeout fails with [`Error::Timeout`];
/// - any non-2xx status fails with [`Error::Request`].
pub trait Transport: fmt::Debug + Send + Sync {
    /// Performs the GET and returns the raw body.
    fn get(&self, url: &str) -> Result<String>;
}

/// Live transport on a shared `reqwest` blocking client.
#[derive(Debug)]
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    /// Creates a transport with the fixed [`REQUEST_TIMEOUT`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Request`] if the underlying client cannot be built.
    pub fn new() -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::request(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str) -> Result<String> {
        debug!(%url, "shopping api request");
        let response = self.client.get(url).send().map_err(|e| {
            if e.is_timeout() {
                Error::timeout("eBay is currently unavailable. Please try again later")
            } else {
                Error::request(format!("problem retrieving info from eBay: {e}"))
            }
        })?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::request(format!(
                "problem retrieving info from eBay (status {status})"
            )));
        }
        let body = response
            .text()
            .map_err(|e| Error::request(format!("problem reading eBay response: {e}")))?;
        debug!(status = %status, bytes = body.len(), "shopping api response");
        Ok(body)
    }
}
