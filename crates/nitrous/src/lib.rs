//! nitrous - NITRO appliance API client
//!
//! This library is a thin wrapper around the NITRO REST interface of a
//! NetScaler appliance: it logs in, dispatches requests against versioned
//! resource paths, normalizes the appliance's heterogeneous response bodies,
//! and mirrors traffic to an append-only log file.
//!
//! # Example
//!
//! ```no_run
//! use nitrous::{ClientConfig, NitroClient};
//!
//! # async fn example() -> Result<(), nitrous::Error> {
//! let config = ClientConfig::new("https://10.0.0.20", "nsroot", "app-password")?
//!     .with_logging(true);
//! let mut client = NitroClient::new(config)?;
//!
//! let stats = client
//!     .with_session(|api| Box::pin(async move {
//!         api.request("/stat/system", None, None).await
//!     }))
//!     .await?;
//!
//! println!("{}", stats.to_value());
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod client;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod response;
pub mod traffic_log;
pub mod wire;

// Re-export primary types at crate root for convenience
pub use auth::{Credentials, SessionToken};
pub use client::{NitroClient, SessionState};
pub use config::ClientConfig;
pub use endpoint::Endpoint;
pub use error::{AuthError, ConfigError, Error, ServerError, TransportError};
pub use response::NormalizedResponse;
pub use traffic_log::LogLevel;
pub use wire::Verb;

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
