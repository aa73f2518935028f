//! Session client for the NITRO API.

use std::collections::BTreeMap;

use futures_util::future::BoxFuture;
use reqwest::header::{ACCEPT, CONNECTION, CONTENT_TYPE, COOKIE, HeaderMap, HeaderValue};
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::auth::SessionToken;
use crate::config::ClientConfig;
use crate::error::{AuthError, ConfigError, Error, ServerError, TransportError};
use crate::response::NormalizedResponse;
use crate::traffic_log::TrafficLog;
use crate::wire::{self, Verb};

/// Authentication state of a client.
///
/// Owned exclusively by one [`NitroClient`]; there is no terminal state,
/// so a client can log in again after logging out.
#[derive(Debug, Default)]
pub enum SessionState {
    /// No session held; only login requests may be sent.
    #[default]
    Unauthenticated,
    /// Holding a session token, attached as a cookie on every call.
    Authenticated(SessionToken),
}

impl SessionState {
    /// Whether a session token is currently held.
    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated(_))
    }

    fn token(&self) -> Option<&SessionToken> {
        match self {
            SessionState::Authenticated(token) => Some(token),
            SessionState::Unauthenticated => None,
        }
    }
}

/// Client for the NITRO configuration and statistics API.
///
/// The client owns the connection configuration, the session state, and the
/// request/response pipeline. Requests are sequential: each call borrows the
/// client mutably and completes before the next one starts. For parallel
/// traffic, create one client per task — session state is per-instance.
///
/// # Example
///
/// ```no_run
/// use nitrous::{ClientConfig, NitroClient};
///
/// # async fn example() -> Result<(), nitrous::Error> {
/// let config = ClientConfig::new("https://10.0.0.20", "nsroot", "secret")?;
/// let mut client = NitroClient::new(config)?;
///
/// let stats = client
///     .with_session(|api| Box::pin(async move {
///         api.request("/stat/system", None, None).await
///     }))
///     .await?;
/// println!("{}", stats.to_value());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct NitroClient {
    config: ClientConfig,
    http: reqwest::Client,
    session: SessionState,
    traffic_log: Option<TrafficLog>,
}

impl NitroClient {
    /// Build a client from a validated configuration.
    ///
    /// Prepares the traffic log (creating parent directories and honoring
    /// `clear_log`) when logging is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed or the
    /// traffic log file cannot be prepared.
    pub fn new(config: ClientConfig) -> Result<Self, Error> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("nitrous/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout());

        if !config.verify_ssl() {
            warn!(
                endpoint = %config.endpoint(),
                "TLS certificate verification disabled by configuration"
            );
            builder = builder.danger_accept_invalid_certs(true);
        }

        let http = builder.build().map_err(TransportError::from)?;

        let traffic_log = if config.logging() {
            Some(TrafficLog::create(
                config.log_file(),
                config.log_level(),
                config.clear_log(),
            )?)
        } else {
            None
        };

        Ok(Self {
            config,
            http,
            session: SessionState::Unauthenticated,
            traffic_log,
        })
    }

    /// Returns the client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Returns the current session state.
    pub fn session(&self) -> &SessionState {
        &self.session
    }

    /// Drop the local session token without contacting the appliance.
    pub fn end_session(&mut self) {
        self.session = SessionState::Unauthenticated;
    }

    /// Log in with the configured credentials.
    ///
    /// On success the session token from the `NITRO_AUTH_TOKEN` cookie is
    /// stored and attached to every subsequent request.
    #[instrument(skip(self), fields(endpoint = %self.config.endpoint()))]
    pub async fn login(&mut self) -> Result<NormalizedResponse, Error> {
        let body = wire::login_body(self.config.credentials());
        self.request(wire::LOGIN_PATH, Some(body), None).await
    }

    /// Log out and clear the local session state.
    ///
    /// Local state is cleared even when the HTTP call fails, since the
    /// server-side session is presumed gone either way.
    #[instrument(skip(self), fields(endpoint = %self.config.endpoint()))]
    pub async fn logout(&mut self) -> Result<NormalizedResponse, Error> {
        let result = self
            .request(wire::LOGOUT_PATH, Some(wire::logout_body()), None)
            .await;
        // A transport failure returns before the logout marker is
        // processed; the local token must still be dropped.
        self.session = SessionState::Unauthenticated;
        result
    }

    /// Run `body` inside a session: log in, execute, then always log out.
    ///
    /// The logout fires on every exit path once the login succeeded,
    /// including when `body` returns an error. A logout failure is logged
    /// and swallowed; the caller sees the body's result.
    ///
    /// # Errors
    ///
    /// Returns the login error if session acquisition fails, otherwise
    /// whatever `body` returns.
    pub async fn with_session<T, F>(&mut self, body: F) -> Result<T, Error>
    where
        F: for<'c> FnOnce(&'c mut NitroClient) -> BoxFuture<'c, Result<T, Error>>,
    {
        self.login().await?;
        let result = body(self).await;
        if let Err(err) = self.logout().await {
            warn!(error = %err, "logout failed during session teardown");
        }
        result
    }

    /// Issue one request against `{endpoint}/{base_path}/{path}`.
    ///
    /// A payload selects POST semantics by default and no payload selects
    /// GET; an explicit `method` overrides either. The payload goes on the
    /// wire only for POST and PUT. POST bodies carry the vendor content
    /// type derived from the final path segment.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::NotAuthenticated`] when no session is held and the
    ///   payload is not a login — nothing is sent in that case
    /// - [`TransportError`] for network-level failures
    /// - [`ServerError`] for non-2xx responses
    /// - [`AuthError`] when a successful login reply carries no token
    #[instrument(skip(self, payload), fields(endpoint = %self.config.endpoint()))]
    pub async fn request(
        &mut self,
        path: &str,
        payload: Option<Value>,
        method: Option<Verb>,
    ) -> Result<NormalizedResponse, Error> {
        let is_login = payload.as_ref().is_some_and(wire::is_login);
        let is_logout = payload.as_ref().is_some_and(wire::is_logout);

        if !self.session.is_authenticated() && !is_login {
            return Err(ConfigError::NotAuthenticated.into());
        }

        let resource = wire::resource_name(path)
            .ok_or_else(|| ConfigError::EmptyResourceName {
                path: path.to_string(),
            })?
            .to_string();
        let url = self.config.resource_url(path);

        // Explicit method wins; otherwise the payload's presence decides.
        // Without a payload only DELETE survives as an override.
        let verb = match (payload.as_ref(), method) {
            (Some(_), None) => Verb::Post,
            (Some(_), Some(v)) => v,
            (None, Some(Verb::Delete)) => Verb::Delete,
            (None, _) => Verb::Get,
        };
        let send_body = payload.is_some() && matches!(verb, Verb::Post | Verb::Put);

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
        if send_body && verb == Verb::Post {
            headers.insert(
                CONTENT_TYPE,
                HeaderValue::from_str(&wire::content_type(&resource))
                    .expect("invalid resource name characters"),
            );
        }
        // Kept out of the logged header set below.
        if let Some(token) = self.session.token() {
            headers.insert(
                COOKIE,
                HeaderValue::from_str(&format!("{}={}", wire::AUTH_COOKIE, token.as_str()))
                    .expect("invalid token characters"),
            );
        }
        let logged_headers = log_view(&headers);

        let mut request = match verb {
            Verb::Get => self.http.get(&url),
            Verb::Post => self.http.post(&url),
            Verb::Put => self.http.put(&url),
            Verb::Delete => self.http.delete(&url),
        }
        .headers(headers);

        if send_body {
            if let Some(body) = payload.as_ref() {
                request = request.body(body.to_string());
            }
        }

        debug!(%verb, %url, "dispatching request");
        let response = match request.send().await {
            Ok(response) => response,
            Err(err) => {
                if is_logout {
                    self.session = SessionState::Unauthenticated;
                }
                return Err(TransportError::from(err).into());
            }
        };

        let status = response.status();
        let wire_headers = response.headers().clone();
        let text = response.text().await.map_err(TransportError::from)?;
        let response_headers = header_view(&wire_headers);

        let outcome: Result<NormalizedResponse, Error> = if status.is_success() {
            if is_login {
                // Token extraction is unconditional on a successful login;
                // the login body itself is never JSON-parsed.
                match wire::session_cookie(&wire_headers) {
                    Some(token) => {
                        self.session = SessionState::Authenticated(SessionToken::new(token));
                        info!("session established");
                        Ok(if text.is_empty() {
                            NormalizedResponse::Headers(response_headers.clone())
                        } else {
                            NormalizedResponse::Text(text.clone())
                        })
                    }
                    None => Err(AuthError::MissingSessionToken.into()),
                }
            } else {
                // Only JSON objects count as decoded results; arrays and
                // scalars degrade to raw text like any other non-JSON body.
                Ok(match serde_json::from_str::<Value>(&text) {
                    Ok(value @ Value::Object(_)) => NormalizedResponse::Json(value),
                    _ if text.is_empty() => NormalizedResponse::Headers(response_headers.clone()),
                    _ => NormalizedResponse::Text(text.clone()),
                })
            }
        } else {
            Err(ServerError::new(status.as_u16(), text.clone()).into())
        };

        if is_logout {
            self.session = SessionState::Unauthenticated;
            debug!("session cleared after logout");
        }

        if let Some(log) = &self.traffic_log {
            log.record_request(verb, &url, &logged_headers, payload.as_ref());
            match &outcome {
                Ok(result) => log.record_success(&response_headers, result),
                Err(_) => log.record_failure(&text),
            }
        }

        outcome
    }
}

/// Header map rendered for the traffic log, with the session cookie left
/// out so the token never reaches the log file.
fn log_view(headers: &HeaderMap) -> BTreeMap<String, String> {
    headers
        .iter()
        .filter(|(name, _)| name.as_str() != COOKIE.as_str())
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect()
}

fn header_view(headers: &HeaderMap) -> BTreeMap<String, String> {
    headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect()
}
