//! Append-only request/response traffic log.
//!
//! The traffic log mirrors every request and response to a file for later
//! diagnosis. It is a side effect of [`request()`](crate::NitroClient::request),
//! not part of its return contract: append failures are reported through the
//! diagnostic logger and never fail the request.

use std::collections::BTreeMap;
use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use fs2::FileExt;
use serde_json::Value;
use tracing::warn;

use crate::error::ConfigError;
use crate::response::NormalizedResponse;
use crate::wire::{self, Verb};

/// Severity of a traffic log entry.
///
/// Entries below the configured minimum are skipped. The names follow the
/// appliance tooling convention (`CRITICAL` down to `NOTSET`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    NotSet,
    #[default]
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl LogLevel {
    /// The level name as written to the log.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::NotSet => "NOTSET",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
            LogLevel::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "NOTSET" => Ok(LogLevel::NotSet),
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "WARNING" => Ok(LogLevel::Warning),
            "ERROR" => Ok(LogLevel::Error),
            "CRITICAL" => Ok(LogLevel::Critical),
            _ => Err(ConfigError::InvalidLogLevel {
                value: s.to_string(),
            }),
        }
    }
}

/// File-backed traffic log with a minimum severity.
#[derive(Debug)]
pub(crate) struct TrafficLog {
    path: PathBuf,
    min_level: LogLevel,
}

impl TrafficLog {
    /// Prepare the log file: create missing parent directories and, when
    /// `clear` is set, truncate any previous contents.
    pub(crate) fn create(
        path: &Path,
        min_level: LogLevel,
        clear: bool,
    ) -> Result<Self, ConfigError> {
        let setup = |err: io::Error| ConfigError::LogSetup {
            path: path.display().to_string(),
            reason: err.to_string(),
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(setup)?;
            }
        }
        if clear {
            File::create(path).map_err(setup)?;
        }

        Ok(Self {
            path: path.to_path_buf(),
            min_level,
        })
    }

    /// Record the outgoing half of a request. A login password in the
    /// payload is replaced by [`wire::MASKED_PASSWORD`] before writing.
    pub(crate) fn record_request(
        &self,
        verb: Verb,
        url: &str,
        headers: &BTreeMap<String, String>,
        payload: Option<&Value>,
    ) {
        let mut entries = vec![
            (LogLevel::Info, format!("{verb} {url}")),
            (
                LogLevel::Debug,
                format!("Request Headers: \n{}\n", pretty_map(headers)),
            ),
        ];
        if let Some(payload) = payload {
            let masked = wire::mask_credentials(payload);
            entries.push((
                LogLevel::Debug,
                format!("Request Payload: \n{}\n", pretty(&masked)),
            ));
        }
        self.append(&entries);
    }

    /// Record a successful response: headers, then the normalized result.
    pub(crate) fn record_success(
        &self,
        headers: &BTreeMap<String, String>,
        result: &NormalizedResponse,
    ) {
        self.append(&[
            (
                LogLevel::Debug,
                format!("Response Headers: \n{}\n", pretty_map(headers)),
            ),
            (
                LogLevel::Info,
                format!("Response Object: \n{}\n", pretty(&result.to_value())),
            ),
        ]);
    }

    /// Record the raw body of a failed response.
    pub(crate) fn record_failure(&self, body: &str) {
        self.append(&[(LogLevel::Error, format!("Response Text: \n{body}\n"))]);
    }

    fn append(&self, entries: &[(LogLevel, String)]) {
        let mut block = String::new();
        for (level, message) in entries {
            if *level < self.min_level {
                continue;
            }
            let stamp = chrono::Local::now().format("%d-%m-%Y %I:%M:%S %p");
            block.push_str(&format!("{stamp} {message}\n"));
        }
        if block.is_empty() {
            return;
        }

        if let Err(err) = self.try_append(&block) {
            warn!(path = %self.path.display(), error = %err, "traffic log append failed");
        }
    }

    fn try_append(&self, block: &str) -> io::Result<()> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        // Serialize writers sharing this log path; the lock is released
        // when the descriptor closes.
        file.lock_exclusive()?;
        (&file).write_all(block.as_bytes())
    }
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

fn pretty_map(map: &BTreeMap<String, String>) -> String {
    let value: Value = map
        .iter()
        .map(|(k, v)| (k.clone(), Value::String(v.clone())))
        .collect::<serde_json::Map<_, _>>()
        .into();
    pretty(&value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn level_parsing_is_case_insensitive() {
        assert_eq!("debug".parse::<LogLevel>().unwrap(), LogLevel::Debug);
        assert_eq!("WARNING".parse::<LogLevel>().unwrap(), LogLevel::Warning);
        assert_eq!("NotSet".parse::<LogLevel>().unwrap(), LogLevel::NotSet);
        assert!("verbose".parse::<LogLevel>().is_err());
    }

    #[test]
    fn levels_order_by_severity() {
        assert!(LogLevel::NotSet < LogLevel::Debug);
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Warning);
        assert!(LogLevel::Warning < LogLevel::Error);
        assert!(LogLevel::Error < LogLevel::Critical);
    }

    #[test]
    fn create_makes_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("nested").join("api.log");
        let log = TrafficLog::create(&path, LogLevel::Debug, false).unwrap();
        log.record_failure("boom");
        assert!(path.exists());
    }

    #[test]
    fn create_with_clear_truncates_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("api.log");
        fs::write(&path, "previous run\n").unwrap();

        TrafficLog::create(&path, LogLevel::Debug, true).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn create_without_clear_keeps_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("api.log");
        fs::write(&path, "previous run\n").unwrap();

        TrafficLog::create(&path, LogLevel::Debug, false).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "previous run\n");
    }

    #[test]
    fn min_level_filters_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("api.log");
        let log = TrafficLog::create(&path, LogLevel::Info, false).unwrap();

        log.record_request(
            Verb::Get,
            "http://10.0.0.20/nitro/v1/stat/system",
            &BTreeMap::new(),
            None,
        );

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("GET http://10.0.0.20/nitro/v1/stat/system"));
        assert!(!contents.contains("Request Headers"));
    }

    #[test]
    fn login_password_is_masked_in_log() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("api.log");
        let log = TrafficLog::create(&path, LogLevel::Debug, false).unwrap();

        let payload = json!({"login": {"username": "nsroot", "password": "secret123"}});
        log.record_request(
            Verb::Post,
            "http://10.0.0.20/nitro/v1/config/login",
            &BTreeMap::new(),
            Some(&payload),
        );

        let contents = fs::read_to_string(&path).unwrap();
        assert!(!contents.contains("secret123"));
        assert!(contents.contains(wire::MASKED_PASSWORD));
    }
}
