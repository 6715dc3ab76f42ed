//! Client configuration loading
//!
//! Embedding applications point the session core at their backend with a
//! small TOML file. Only `base_url` is required; everything else has
//! defaults. Validation happens at load time so a bad URL fails fast
//! instead of surfacing as a transport error on the first operation.

use std::path::Path;

use serde::Deserialize;

/// Session client configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Backend origin, e.g. `http://localhost:8090`.
    pub base_url: String,
    /// Destination for the post-sign-out redirect.
    #[serde(default = "default_sign_in_path")]
    pub sign_in_path: String,
    /// Request timeout for remote calls.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_sign_in_path() -> String {
    "/login".to_string()
}

fn default_timeout() -> u64 {
    30
}

impl SessionConfig {
    /// Configuration with defaults for everything but the backend URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            sign_in_path: default_sign_in_path(),
            timeout_secs: default_timeout(),
        }
    }

    /// Load and validate configuration from a TOML file.
    pub fn load(path: &Path) -> common::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: SessionConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate field values. Called by `load`; programmatic constructors
    /// can call it directly.
    pub fn validate(&self) -> common::Result<()> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(common::Error::Config(format!(
                "base_url must start with http:// or https://, got: {}",
                self.base_url
            )));
        }

        if !self.sign_in_path.starts_with('/') {
            return Err(common::Error::Config(format!(
                "sign_in_path must be absolute (start with /), got: {}",
                self.sign_in_path
            )));
        }

        if self.timeout_secs == 0 {
            return Err(common::Error::Config(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        Ok(())
    }
}
