//! Client configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::auth::Credentials;
use crate::endpoint::Endpoint;
use crate::error::{ConfigError, Error};
use crate::traffic_log::LogLevel;

/// Default API base path on the appliance.
pub const DEFAULT_BASE_PATH: &str = "/nitro/v1";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default traffic log location.
pub const DEFAULT_LOG_FILE: &str = "logs/nitro.log";

/// Validated, immutable configuration for a [`NitroClient`](crate::NitroClient).
///
/// Required fields are checked once at construction; a config that exists
/// is a config a request can trust. The optional knobs use chainable
/// setters:
///
/// ```
/// use nitrous::{ClientConfig, LogLevel};
/// use std::time::Duration;
///
/// let config = ClientConfig::new("https://10.0.0.20", "nsroot", "secret")
///     .unwrap()
///     .with_verify_ssl(false)
///     .with_timeout(Duration::from_secs(10))
///     .with_logging(true)
///     .with_log_level(LogLevel::Info);
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    credentials: Credentials,
    endpoint: Endpoint,
    base_path: String,
    verify_ssl: bool,
    timeout: Duration,
    logging: bool,
    log_level: LogLevel,
    log_file: PathBuf,
    clear_log: bool,
}

impl ClientConfig {
    /// Create a configuration with the required fields and defaults for the
    /// rest: base path `/nitro/v1`, TLS verification on, a 30 second
    /// timeout, and the traffic log disabled.
    ///
    /// # Errors
    ///
    /// Fails fast on an empty username or password, or an endpoint that is
    /// not an absolute http(s) URL.
    pub fn new(
        endpoint: impl AsRef<str>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, Error> {
        let username = username.into();
        let password = password.into();
        if username.is_empty() || password.is_empty() {
            return Err(ConfigError::MissingCredentials.into());
        }

        Ok(Self {
            credentials: Credentials::new(username, password),
            endpoint: Endpoint::new(endpoint)?,
            base_path: DEFAULT_BASE_PATH.to_string(),
            verify_ssl: true,
            timeout: DEFAULT_TIMEOUT,
            logging: false,
            log_level: LogLevel::default(),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            clear_log: true,
        })
    }

    /// Replace the API base path (default `/nitro/v1`).
    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = base_path.into();
        self
    }

    /// Toggle TLS certificate verification.
    ///
    /// Disabling verification is an accepted trade-off for appliances with
    /// self-signed management certificates; the client warns when it is off.
    pub fn with_verify_ssl(mut self, verify_ssl: bool) -> Self {
        self.verify_ssl = verify_ssl;
        self
    }

    /// Replace the request timeout (default 30 seconds).
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Enable or disable the traffic log.
    pub fn with_logging(mut self, logging: bool) -> Self {
        self.logging = logging;
        self
    }

    /// Minimum severity written to the traffic log (default `DEBUG`).
    pub fn with_log_level(mut self, log_level: LogLevel) -> Self {
        self.log_level = log_level;
        self
    }

    /// Replace the traffic log path (default `logs/nitro.log`).
    pub fn with_log_file(mut self, log_file: impl Into<PathBuf>) -> Self {
        self.log_file = log_file.into();
        self
    }

    /// Whether to truncate the traffic log at client construction
    /// (default true).
    pub fn with_clear_log(mut self, clear_log: bool) -> Self {
        self.clear_log = clear_log;
        self
    }

    /// Returns the login credentials.
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Returns the appliance endpoint.
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Returns the API base path.
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Whether TLS certificates are verified.
    pub fn verify_ssl(&self) -> bool {
        self.verify_ssl
    }

    /// Returns the request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Whether the traffic log is enabled.
    pub fn logging(&self) -> bool {
        self.logging
    }

    /// Returns the traffic log minimum severity.
    pub fn log_level(&self) -> LogLevel {
        self.log_level
    }

    /// Returns the traffic log path.
    pub fn log_file(&self) -> &Path {
        &self.log_file
    }

    /// Whether the traffic log is truncated at construction.
    pub fn clear_log(&self) -> bool {
        self.clear_log
    }

    /// The full URL for a resource path under this configuration.
    pub(crate) fn resource_url(&self, path: &str) -> String {
        self.endpoint.resource_url(&self.base_path, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_applied() {
        let config = ClientConfig::new("http://10.0.0.20", "nsroot", "secret").unwrap();
        assert_eq!(config.base_path(), "/nitro/v1");
        assert!(config.verify_ssl());
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert!(!config.logging());
        assert_eq!(config.log_level(), LogLevel::Debug);
        assert!(config.clear_log());
    }

    #[test]
    fn empty_credentials_rejected() {
        assert!(matches!(
            ClientConfig::new("http://10.0.0.20", "", "secret"),
            Err(Error::Config(ConfigError::MissingCredentials))
        ));
        assert!(matches!(
            ClientConfig::new("http://10.0.0.20", "nsroot", ""),
            Err(Error::Config(ConfigError::MissingCredentials))
        ));
    }

    #[test]
    fn invalid_endpoint_rejected() {
        assert!(matches!(
            ClientConfig::new("not a url", "nsroot", "secret"),
            Err(Error::Config(ConfigError::InvalidEndpoint { .. }))
        ));
    }

    #[test]
    fn resource_url_uses_base_path() {
        let config = ClientConfig::new("http://10.0.0.20/", "nsroot", "secret")
            .unwrap()
            .with_base_path("/nitro/v1/");
        assert_eq!(
            config.resource_url("/stat/system"),
            "http://10.0.0.20/nitro/v1/stat/system"
        );
    }
}
