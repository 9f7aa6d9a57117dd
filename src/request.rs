//! Request construction, URL building and execution.
//!
//! A [`Request`] owns its configuration, call name and parameter map. It
//! builds the signed query URL with deterministic parameter ordering (the
//! same request always yields the same URL, which is what makes cached
//! responses addressable), performs the blocking call through a
//! [`Transport`], and drives the one-shot retry for eBay's internal timeout
//! error:
//!
//! ```text
//! Attempt::Fresh --[code 1.23]--> Attempt::Retried --[code 1.23]--> System
//!       |                              |
//!       +--[any other failure]---------+--[any other failure]-----> error
//! ```
//!
//! Caching is not implemented here; the [`RequestHooks`] trait is the
//! extension point for response caching, error caching and failure logging.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{ApiErrorDetails, Error, Result};
use crate::http::{HttpTransport, Transport};
use crate::response::{CallName, Response};

/// Host of the Shopping API.
pub const API_HOST: &str = "open.api.ebay.com";
/// Path of the Shopping API endpoint.
pub const API_PATH: &str = "/shopping";
/// Version of the API this library was written against.
pub const API_VERSION: u16 = 547;

/// Call parameters: attribute name to scalar or sequence value. A `null`
/// value means "omit this parameter".
pub type Params = BTreeMap<String, Value>;

/// Which attempt of a call is being made.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attempt {
    /// First attempt; an internal timeout here triggers the one retry.
    Fresh,
    /// The one permitted retry; an internal timeout here escalates.
    Retried,
}

impl Attempt {
    /// Whether this is the retried attempt.
    pub fn is_retried(self) -> bool {
        matches!(self, Self::Retried)
    }
}

/// Observation and caching extension points, all no-ops by default.
///
/// `on_api_error` fires whenever a failure acknowledgement is parsed, and
/// only then; transport-level failures do not reach it. The cache methods
/// bracket every call attempt and are keyed by the deterministic request
/// URL. Expiry of stale entries is the implementation's responsibility:
/// return `None` from [`RequestHooks::cached_response`] and a live call is
/// made.
pub trait RequestHooks: fmt::Debug + Send + Sync {
    /// Called with the parsed error record of every failure acknowledgement.
    fn on_api_error(&self, _details: &ApiErrorDetails) {}

    /// Called before every call attempt. An error here aborts the attempt;
    /// use it to refuse URLs that previously failed.
    fn check_error_cache(&self, _url: &str) -> Result<()> {
        Ok(())
    }

    /// A non-empty body returned here short-circuits the live fetch.
    fn cached_response(&self, _url: &str) -> Option<String> {
        None
    }

    /// Called with the raw body after every live fetch.
    fn store_response(&self, _url: &str, _body: &str) {}
}

/// The default hook set: observes nothing, caches nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHooks;

impl RequestHooks for NoopHooks {}

/// One call to the Shopping API.
///
/// # Example
///
/// ```rust,no_run
/// use ebay_shopping::{CallName, Config, Params, Request};
/// use serde_json::json;
///
/// # fn main() -> ebay_shopping::Result<()> {
/// let config = Config::new("my-app-id").with_site_id(3);
/// let params = Params::from([
///     ("query_keywords".to_string(), json!("dog collar")),
///     ("max_results".to_string(), json!(5)),
/// ]);
/// let mut request = Request::new(&config, CallName::FindItemsAdvanced, params)?;
/// let response = request.execute()?;
/// for item in response.items() {
///     println!("{:?}", item.title());
/// }
/// # Ok(())
/// # }
/// ```
///
/// Retry state is private to the instance: one `Request` value must not be
/// shared across concurrent invocations.
#[derive(Debug)]
pub struct Request {
    config: Config,
    call: CallName,
    params: Params,
    site_id: Option<u32>,
    repeat_call: bool,
    transport: Box<dyn Transport>,
    hooks: Box<dyn RequestHooks>,
}

impl Request {
    /// Creates a request using the configuration's default site id.
    pub fn new(config: &Config, call: CallName, params: Params) -> Result<Self> {
        Self::with_site_id(config, call, params, None)
    }

    /// Creates a request with an explicit site id, overriding the
    /// configuration default.
    ///
    /// The parameter map is copied; a stray `site_id` entry in it is taken
    /// as an override (losing to the explicit argument) and never submitted
    /// as a plain parameter.
    pub fn with_site_id(
        config: &Config,
        call: CallName,
        mut params: Params,
        site_id: Option<u32>,
    ) -> Result<Self> {
        config.validate()?;
        let from_params = params
            .remove("site_id")
            .and_then(|v| v.as_u64())
            .and_then(|v| u32::try_from(v).ok());
        Ok(Self {
            config: config.clone(),
            call,
            params,
            site_id: site_id.or(from_params).or(config.site_id),
            repeat_call: false,
            transport: Box::new(HttpTransport::new()?),
            hooks: Box::new(NoopHooks),
        })
    }

    /// Replaces the transport. Intended for tests and custom wiring.
    pub fn set_transport(&mut self, transport: Box<dyn Transport>) {
        self.transport = transport;
    }

    /// Replaces the hook set.
    pub fn set_hooks(&mut self, hooks: Box<dyn RequestHooks>) {
        self.hooks = hooks;
    }

    /// The call this request will make.
    pub fn call(&self) -> CallName {
        self.call
    }

    /// The call parameters, minus any stripped `site_id` entry.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// The effective site id after override resolution.
    pub fn site_id(&self) -> Option<u32> {
        self.site_id
    }

    /// Application id from the configuration.
    pub fn app_id(&self) -> &str {
        &self.config.app_id
    }

    /// Affiliate tracking id from the configuration.
    pub fn affiliate_id(&self) -> Option<&str> {
        self.config.affiliate_id.as_deref()
    }

    /// Affiliate partner code from the configuration.
    pub fn affiliate_partner(&self) -> Option<&str> {
        self.config.affiliate_partner.as_deref()
    }

    /// Affiliate shopper id from the configuration.
    pub fn affiliate_shopper_id(&self) -> Option<&str> {
        self.config.affiliate_shopper_id.as_deref()
    }

    /// Whether the one permitted retry has been attempted.
    pub fn repeat_call(&self) -> bool {
        self.repeat_call
    }

    /// Country name for the effective site id.
    ///
    /// An unset site id resolves to `US`, which is what the API defaults
    /// to; an unknown id yields `None`.
    pub fn site_name(&self) -> Option<&'static str> {
        site_name(self.site_id.unwrap_or(0))
    }

    /// Builds the absolute request URL.
    ///
    /// Query components appear in this exact order: `version`, `appid`,
    /// `callname`, `siteid` (omitted when unset), the affiliate block
    /// (emitted as a group only when both affiliate partner and tracking id
    /// are configured; the shopper id is included even when empty), then
    /// the call parameters. Parameter keys are upper-camel-cased, `null`
    /// values dropped, sequences comma-joined, values percent-encoded with
    /// space as `%20`, and the fragments sorted lexicographically so the
    /// same request always yields the same URL.
    pub fn url(&self) -> String {
        let mut url = format!(
            "http://{API_HOST}{API_PATH}?version={API_VERSION}&appid={}&callname={}",
            self.config.app_id,
            self.call.api_name()
        );
        if let Some(site_id) = self.site_id {
            url.push_str(&format!("&siteid={site_id}"));
        }
        if let (Some(partner), Some(tracking_id)) =
            (&self.config.affiliate_partner, &self.config.affiliate_id)
        {
            let shopper_id = self.config.affiliate_shopper_id.as_deref().unwrap_or("");
            url.push_str(&format!(
                "&trackingpartnercode={partner}&trackingid={tracking_id}&affiliateuserid={shopper_id}"
            ));
        }
        let query = query_from(&self.params);
        if !query.is_empty() {
            url.push('&');
            url.push_str(&query);
        }
        url
    }

    /// Performs the call and parses the reply.
    ///
    /// An eBay-internal timeout (error code `1.23`) is retried exactly
    /// once; all other classified errors, and a second internal timeout,
    /// propagate to the caller unmodified.
    pub fn execute(&mut self) -> Result<Response> {
        match self.attempt(Attempt::Fresh) {
            Err(Error::InternalTimeout(details)) => {
                warn!(%details, "internal timeout, retrying once");
                self.repeat_call = true;
                self.attempt(Attempt::Retried)
            }
            other => other,
        }
    }

    /// One call attempt: error-cache check, cached-response short-circuit
    /// or live fetch, then parsing.
    fn attempt(&self, attempt: Attempt) -> Result<Response> {
        let url = self.url();
        self.hooks.check_error_cache(&url)?;
        let body = match self.hooks.cached_response(&url) {
            Some(cached) if !cached.is_empty() => {
                debug!(%url, "serving cached response");
                cached
            }
            _ => {
                let body = self.transport.get(&url)?;
                self.hooks.store_response(&url, &body);
                body
            }
        };
        Response::parse(&body, self.call, attempt, self.hooks.as_ref())
    }
}

/// Renders the caller's parameters as sorted `Key=value` fragments.
fn query_from(params: &Params) -> String {
    let mut fragments: Vec<String> = params
        .iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(key, value)| format!("{}={}", camelize(key), encode_value(value)))
        .collect();
    fragments.sort();
    fragments.join("&")
}

/// Percent-encodes a scalar or comma-joins an encoded sequence.
fn encode_value(value: &Value) -> String {
    let scalars: Vec<String> = match value {
        Value::Array(items) => items.iter().map(encode_scalar).collect(),
        single => vec![encode_scalar(single)],
    };
    scalars.join(",")
}

fn encode_scalar(value: &Value) -> String {
    let raw = match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    urlencoding::encode(&raw).into_owned()
}

/// Converts a lower-case/underscored name to upper-camel-case, e.g.
/// `find_items_advanced` to `FindItemsAdvanced`.
pub(crate) fn camelize(name: &str) -> String {
    name.split('_')
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// Country name for a marketplace site id. The table must match the API's
/// verbatim.
pub fn site_name(site_id: u32) -> Option<&'static str> {
    let name = match site_id {
        15 => "Australia",
        16 => "Austria",
        123 => "Belgium (Dutch)",
        23 => "Belgium (French)",
        2 => "Canada",
        210 => "Canada (French)",
        71 => "France",
        77 => "Germany",
        223 => "China",
        201 => "Hong Kong",
        203 => "India",
        205 => "Ireland",
        101 => "Italy",
        207 => "Malaysia",
        146 => "Netherlands",
        211 => "Philippines",
        212 => "Poland",
        216 => "Singapore",
        186 => "Spain",
        218 => "Sweden",
        193 => "Switzerland",
        196 => "Taiwan",
        3 => "UK",
        0 => "US",
        _ => return None,
    };
    Some(name)
}
