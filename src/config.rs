//! Client configuration.
//!
//! A [`Config`] carries the application id eBay issues per developer, the
//! optional affiliate identifiers folded into every request URL, and an
//! optional default site id. Configuration is normally loaded once at
//! application start, either from a YAML document layered by environment or
//! built directly:
//!
//! ```yaml
//! production:
//!   app_id: your_ebay_app_id
//!   affiliate_id: "1234"
//!   affiliate_partner: "56"
//!   affiliate_shopper_id: "789"
//!   site_id: 3
//! development:
//!   app_id: your_sandbox_app_id
//! ```
//!
//! Requests take a `Config` explicitly at construction. For applications
//! that prefer a single process-wide configuration, [`Config::init_shared`]
//! stores the first successfully loaded value; later calls return the cached
//! value unconditionally. [`Config::reset_shared`] exists for tests.

use std::collections::HashMap;
use std::path::Path;
use std::sync::RwLock;

use serde::Deserialize;

use crate::error::{Error, Result};

/// Environment layer selected when none is named.
const DEFAULT_ENVIRONMENT: &str = "production";

static SHARED: RwLock<Option<Config>> = RwLock::new(None);

/// Immutable client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Application id issued by eBay. Required.
    pub app_id: String,
    /// Affiliate tracking id.
    pub affiliate_id: Option<String>,
    /// Affiliate partner code.
    pub affiliate_partner: Option<String>,
    /// Affiliate shopper id.
    pub affiliate_shopper_id: Option<String>,
    /// Default site id, used when a request does not override it.
    pub site_id: Option<u32>,
}

/// One environment layer of the configuration document. All fields optional
/// at parse time; `app_id` presence is checked when the layer is resolved.
#[derive(Debug, Clone, Default, Deserialize)]
struct Layer {
    app_id: Option<String>,
    affiliate_id: Option<String>,
    affiliate_partner: Option<String>,
    affiliate_shopper_id: Option<String>,
    site_id: Option<u32>,
}

impl TryFrom<Layer> for Config {
    type Error = Error;

    fn try_from(layer: Layer) -> Result<Self> {
        let config = Self {
            app_id: layer.app_id.unwrap_or_default(),
            affiliate_id: layer.affiliate_id,
            affiliate_partner: layer.affiliate_partner,
            affiliate_shopper_id: layer.affiliate_shopper_id,
            site_id: layer.site_id,
        };
        config.validate()?;
        Ok(config)
    }
}

impl Config {
    /// Creates a configuration with just an application id.
    pub fn new(app_id: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            affiliate_id: None,
            affiliate_partner: None,
            affiliate_shopper_id: None,
            site_id: None,
        }
    }

    /// Sets the affiliate block. The partner code and tracking id are only
    /// emitted into request URLs when both are present.
    pub fn with_affiliate(
        mut self,
        partner: impl Into<String>,
        tracking_id: impl Into<String>,
        shopper_id: Option<String>,
    ) -> Self {
        self.affiliate_partner = Some(partner.into());
        self.affiliate_id = Some(tracking_id.into());
        self.affiliate_shopper_id = shopper_id;
        self
    }

    /// Sets the default site id.
    pub fn with_site_id(mut self, site_id: u32) -> Self {
        self.site_id = Some(site_id);
        self
    }

    /// Loads configuration from a YAML document layered by environment.
    ///
    /// The named environment's layer is selected; when `env` is `None` the
    /// `production` layer is used.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the file cannot be read or parsed, the
    /// requested layer is absent, or the layer lacks an `app_id`.
    pub fn from_yaml_file(path: impl AsRef<Path>, env: Option<&str>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("cannot read {}: {e}", path.display())))?;
        Self::from_yaml(&raw, env)
    }

    /// Loads configuration from a YAML string layered by environment.
    pub fn from_yaml(document: &str, env: Option<&str>) -> Result<Self> {
        let layers: HashMap<String, Layer> = serde_yaml::from_str(document)
            .map_err(|e| Error::config(format!("invalid configuration document: {e}")))?;
        let env = env.unwrap_or(DEFAULT_ENVIRONMENT);
        layers
            .get(env)
            .or_else(|| layers.get(DEFAULT_ENVIRONMENT))
            .cloned()
            .ok_or_else(|| Error::config(format!("no configuration layer for '{env}'")))?
            .try_into()
    }

    /// Checks the invariants a usable configuration must hold.
    pub fn validate(&self) -> Result<()> {
        if self.app_id.is_empty() {
            return Err(Error::config("app_id is required"));
        }
        Ok(())
    }

    /// Stores a process-wide configuration.
    ///
    /// The first successful call wins: later calls return the already stored
    /// value unchanged, even with different arguments.
    pub fn init_shared(config: Config) -> Result<Config> {
        config.validate()?;
        let mut slot = SHARED.write().expect("config lock poisoned");
        Ok(slot.get_or_insert(config).clone())
    }

    /// Loads from a YAML file and stores the result process-wide, with the
    /// same first-load-wins behaviour as [`Config::init_shared`].
    pub fn init_shared_from_file(path: impl AsRef<Path>, env: Option<&str>) -> Result<Config> {
        {
            let slot = SHARED.read().expect("config lock poisoned");
            if let Some(existing) = slot.as_ref() {
                return Ok(existing.clone());
            }
        }
        Self::init_shared(Self::from_yaml_file(path, env)?)
    }

    /// Returns the process-wide configuration, if one has been stored.
    pub fn shared() -> Option<Config> {
        SHARED.read().expect("config lock poisoned").clone()
    }

    /// Clears the process-wide configuration. Intended for tests.
    pub fn reset_shared() {
        *SHARED.write().expect("config lock poisoned") = None;
    }
}
