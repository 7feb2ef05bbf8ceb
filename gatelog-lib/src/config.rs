//! Environment-backed store configuration.
//!
//! The process is parameterized by exactly two values, both read from the
//! environment at startup: the base endpoint of the record store and the
//! access credential sent with every request. There is no configuration
//! file and no other surface.

use std::env;

use url::Url;

use crate::{Error, Result};

/// Environment variable holding the store's base endpoint URL.
pub const STORE_URL_VAR: &str = "GATELOG_STORE_URL";
/// Environment variable holding the store's access credential.
pub const STORE_KEY_VAR: &str = "GATELOG_STORE_KEY";

/// Connection parameters for the remote record store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub base_url: Url,
    pub api_key: String,
}

impl StoreConfig {
    /// Read the configuration from [`STORE_URL_VAR`] and [`STORE_KEY_VAR`].
    pub fn from_env() -> Result<Self> {
        let base_url =
            env::var(STORE_URL_VAR).map_err(|_| Error::Config(format!("{STORE_URL_VAR} is not set")))?;
        let api_key =
            env::var(STORE_KEY_VAR).map_err(|_| Error::Config(format!("{STORE_KEY_VAR} is not set")))?;

        Self::new(&base_url, api_key)
    }

    /// Build a configuration from explicit values, applying the same
    /// validation as [`StoreConfig::from_env`].
    pub fn new(base_url: &str, api_key: impl Into<String>) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|err| Error::Config(format!("{STORE_URL_VAR} is not a valid url: {err}")))?;

        let scheme = base_url.scheme();
        if scheme != "http" && scheme != "https" {
            return Err(Error::Config(format!(
                "{STORE_URL_VAR} must use the http or https scheme, got {scheme}"
            )));
        }

        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(Error::Config(format!("{STORE_KEY_VAR} is empty")));
        }

        Ok(Self { base_url, api_key })
    }
}

#[cfg(test)]
mod tests {
    use super::StoreConfig;
    use crate::Error;

    #[test]
    fn accepts_https_endpoint() {
        let config = StoreConfig::new("https://demo.supabase.co", "anon-key").expect("config");
        assert_eq!(config.base_url.as_str(), "https://demo.supabase.co/");
        assert_eq!(config.api_key, "anon-key");
    }

    #[test]
    fn accepts_plain_http_endpoint() {
        let config = StoreConfig::new("http://127.0.0.1:3000", "k").expect("config");
        assert_eq!(config.base_url.scheme(), "http");
    }

    #[test]
    fn rejects_non_http_scheme() {
        let err = StoreConfig::new("ftp://demo.supabase.co", "k").expect_err("scheme");
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn rejects_unparseable_url() {
        let err = StoreConfig::new("not a url", "k").expect_err("parse");
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn rejects_empty_key() {
        let err = StoreConfig::new("https://demo.supabase.co", "").expect_err("key");
        assert!(matches!(err, Error::Config(_)));
    }
}
