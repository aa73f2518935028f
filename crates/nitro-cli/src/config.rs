//! Configuration resolution.
//!
//! Merges command-line flags with an optional JSON config file into a
//! validated [`ClientConfig`]. Flags always take precedence over file
//! values; library defaults fill whatever remains.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use nitrous::{ClientConfig, LogLevel};

use crate::cli::ConnectionArgs;

/// Values loaded from a JSON config file. Keys match the long flag names
/// without the leading dashes, e.g. `{"endpoint": "...", "verify_ssl": false}`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub endpoint: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub base_path: Option<String>,
    pub verify_ssl: Option<bool>,
    pub timeout: Option<u64>,
    pub logging: Option<bool>,
    pub log_level: Option<String>,
    pub log: Option<PathBuf>,
    pub clear_log: Option<bool>,
}

impl FileConfig {
    /// Load and parse a JSON config file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }
}

/// Resolve the effective client configuration from flags and the optional
/// config file.
pub fn resolve(conn: &ConnectionArgs) -> Result<ClientConfig> {
    let file = match &conn.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };
    merge(conn, file)
}

fn merge(conn: &ConnectionArgs, file: FileConfig) -> Result<ClientConfig> {
    let endpoint = conn
        .endpoint
        .clone()
        .or(file.endpoint)
        .context("an appliance endpoint is required (--endpoint or the config file)")?;
    let username = conn
        .username
        .clone()
        .or(file.username)
        .context("a username is required (--username or the config file)")?;
    let password = conn
        .password
        .clone()
        .or(file.password)
        .context("a password is required (--password or the config file)")?;

    let mut config = ClientConfig::new(&endpoint, username, password)?;

    if let Some(base_path) = conn.base_path.clone().or(file.base_path) {
        config = config.with_base_path(base_path);
    }
    if let Some(verify_ssl) = conn.verify_ssl.or(file.verify_ssl) {
        config = config.with_verify_ssl(verify_ssl);
    }
    if let Some(timeout) = conn.timeout.or(file.timeout) {
        config = config.with_timeout(Duration::from_secs(timeout));
    }
    // The CLI mirrors traffic by default, matching the appliance tooling;
    // the library itself stays silent unless asked.
    config = config.with_logging(conn.logging.or(file.logging).unwrap_or(true));
    if let Some(level) = conn.log_level.as_deref().or(file.log_level.as_deref()) {
        config = config.with_log_level(level.parse::<LogLevel>()?);
    }
    if let Some(log) = conn.log.clone().or(file.log) {
        config = config.with_log_file(log);
    }
    if let Some(clear_log) = conn.clear_log.or(file.clear_log) {
        config = config.with_clear_log(clear_log);
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(json: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    #[test]
    fn file_fills_missing_values() {
        let file = write_config(
            r#"{
                "endpoint": "http://10.0.0.20",
                "username": "nsroot",
                "password": "secret",
                "verify_ssl": false,
                "timeout": 5,
                "log_level": "INFO"
            }"#,
        );
        let conn = ConnectionArgs {
            config: Some(file.path().to_path_buf()),
            ..Default::default()
        };

        let config = resolve(&conn).unwrap();
        assert_eq!(config.endpoint().host(), Some("10.0.0.20"));
        assert!(!config.verify_ssl());
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(config.log_level(), LogLevel::Info);
        assert!(config.logging());
    }

    #[test]
    fn flags_override_file_values() {
        let file = write_config(
            r#"{
                "endpoint": "http://10.0.0.20",
                "username": "nsroot",
                "password": "from-file",
                "base_path": "/nitro/v2"
            }"#,
        );
        let conn = ConnectionArgs {
            config: Some(file.path().to_path_buf()),
            endpoint: Some("https://10.0.0.99".to_string()),
            password: Some("from-flag".to_string()),
            ..Default::default()
        };

        let config = resolve(&conn).unwrap();
        assert_eq!(config.endpoint().host(), Some("10.0.0.99"));
        assert!(config.endpoint().is_https());
        // File still supplies what the flags left out.
        assert_eq!(config.base_path(), "/nitro/v2");
    }

    #[test]
    fn missing_endpoint_is_an_error() {
        let conn = ConnectionArgs {
            username: Some("nsroot".to_string()),
            password: Some("secret".to_string()),
            ..Default::default()
        };

        let err = resolve(&conn).unwrap_err();
        assert!(err.to_string().contains("endpoint"));
    }

    #[test]
    fn invalid_log_level_is_an_error() {
        let conn = ConnectionArgs {
            endpoint: Some("http://10.0.0.20".to_string()),
            username: Some("nsroot".to_string()),
            password: Some("secret".to_string()),
            log_level: Some("verbose".to_string()),
            ..Default::default()
        };

        assert!(resolve(&conn).is_err());
    }

    #[test]
    fn unreadable_config_file_is_an_error() {
        let conn = ConnectionArgs {
            config: Some(PathBuf::from("/nonexistent/nitro.json")),
            ..Default::default()
        };

        assert!(resolve(&conn).is_err());
    }
}
