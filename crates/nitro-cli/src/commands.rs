//! Subcommand implementations.

use anyhow::{Context, Result};
use clap::Args;
use serde_json::Value;
use tracing::debug;

use nitrous::{NitroClient, Verb};

use crate::cli::ConnectionArgs;
use crate::config;
use crate::output;

#[derive(Args, Debug)]
pub struct RequestArgs {
    /// Resource path appended to the base path, e.g. /stat/system
    pub path: String,

    /// JSON payload for the request body
    #[arg(long, value_name = "JSON")]
    pub data: Option<String>,

    /// Explicit request method (GET, POST, PUT or DELETE)
    #[arg(long, value_name = "METHOD")]
    pub method: Option<String>,
}

/// Run one request inside a login/logout session and print the normalized
/// result.
pub async fn request(conn: &ConnectionArgs, args: &RequestArgs) -> Result<()> {
    let config = config::resolve(conn)?;
    debug!(endpoint = %config.endpoint(), "configuration resolved");

    let payload: Option<Value> = args
        .data
        .as_deref()
        .map(serde_json::from_str)
        .transpose()
        .context("--data must be valid JSON")?;
    let method = args.method.as_deref().map(str::parse::<Verb>).transpose()?;

    let mut client = NitroClient::new(config).context("failed to construct client")?;

    let path = args.path.clone();
    let result = client
        .with_session(move |api| {
            Box::pin(async move { api.request(&path, payload, method).await })
        })
        .await?;

    output::json_pretty(&result.to_value())
}
