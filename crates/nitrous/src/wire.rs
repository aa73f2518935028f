//! NITRO wire-protocol vocabulary.
//!
//! Paths, payload builders, the session cookie, and the vendor media type
//! used for content negotiation.

use std::fmt;
use std::str::FromStr;

use reqwest::header::{HeaderMap, SET_COOKIE};
use serde_json::{Value, json};

use crate::auth::Credentials;
use crate::error::ConfigError;

/// Name of the session cookie issued on login.
pub const AUTH_COOKIE: &str = "NITRO_AUTH_TOKEN";

/// Login resource path, relative to the base path.
pub const LOGIN_PATH: &str = "/config/login";

/// Logout resource path, relative to the base path.
pub const LOGOUT_PATH: &str = "/config/logout";

/// Placeholder written to the traffic log in place of a login password.
pub const MASKED_PASSWORD: &str = "...masked...";

const VENDOR_MEDIA_PREFIX: &str = "application/vnd.com.citrix.netscaler.";

/// An HTTP request method accepted by the appliance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Get,
    Post,
    Put,
    Delete,
}

impl Verb {
    /// The method name as sent on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::Get => "GET",
            Verb::Post => "POST",
            Verb::Put => "PUT",
            Verb::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Verb {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Verb::Get),
            "POST" => Ok(Verb::Post),
            "PUT" => Ok(Verb::Put),
            "DELETE" => Ok(Verb::Delete),
            _ => Err(ConfigError::InvalidMethod {
                value: s.to_string(),
            }),
        }
    }
}

/// Build the login payload for the given credentials.
pub fn login_body(credentials: &Credentials) -> Value {
    json!({
        "login": {
            "username": credentials.username(),
            "password": credentials.password(),
        }
    })
}

/// Build the logout payload.
pub fn logout_body() -> Value {
    json!({ "logout": {} })
}

/// Whether the payload carries a login marker.
pub(crate) fn is_login(payload: &Value) -> bool {
    payload.get("login").is_some()
}

/// Whether the payload carries a logout marker.
pub(crate) fn is_logout(payload: &Value) -> bool {
    payload.get("logout").is_some()
}

/// The final non-empty path segment, used as the resource name for the
/// vendor content type. Query strings do not count as part of the name.
pub(crate) fn resource_name(path: &str) -> Option<&str> {
    let path = path.split(['?', '#']).next().unwrap_or(path);
    path.rsplit('/').find(|segment| !segment.is_empty())
}

/// The vendor media type for a resource, e.g.
/// `application/vnd.com.citrix.netscaler.lbvserver+json`.
pub(crate) fn content_type(resource: &str) -> String {
    format!("{VENDOR_MEDIA_PREFIX}{resource}+json")
}

/// Extract the session token from the response `Set-Cookie` headers.
pub(crate) fn session_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|cookie| cookie.split(';').next())
        .filter_map(|pair| pair.split_once('='))
        .find(|(name, _)| name.trim() == AUTH_COOKIE)
        .map(|(_, token)| token.trim().to_string())
}

/// A copy of the payload safe for the traffic log: a login password is
/// replaced by [`MASKED_PASSWORD`]. The original payload is untouched.
pub(crate) fn mask_credentials(payload: &Value) -> Value {
    let mut masked = payload.clone();
    if let Some(password) = masked
        .get_mut("login")
        .and_then(|login| login.get_mut("password"))
    {
        *password = Value::String(MASKED_PASSWORD.to_string());
    }
    masked
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn verb_parses_case_insensitively() {
        assert_eq!("get".parse::<Verb>().unwrap(), Verb::Get);
        assert_eq!("Put".parse::<Verb>().unwrap(), Verb::Put);
        assert_eq!("DELETE".parse::<Verb>().unwrap(), Verb::Delete);
        assert!("PATCH".parse::<Verb>().is_err());
    }

    #[test]
    fn resource_name_takes_final_segment() {
        assert_eq!(resource_name("/stat/system"), Some("system"));
        assert_eq!(resource_name("/config/lbvserver/"), Some("lbvserver"));
        assert_eq!(resource_name("/config/lbvserver?action=enable"), Some("lbvserver"));
        assert_eq!(resource_name("/"), None);
        assert_eq!(resource_name(""), None);
    }

    #[test]
    fn content_type_embeds_resource_name() {
        assert_eq!(
            content_type("lbvserver"),
            "application/vnd.com.citrix.netscaler.lbvserver+json"
        );
    }

    #[test]
    fn payload_markers() {
        let creds = Credentials::new("nsroot", "secret");
        assert!(is_login(&login_body(&creds)));
        assert!(!is_logout(&login_body(&creds)));
        assert!(is_logout(&logout_body()));
        assert!(!is_login(&logout_body()));
    }

    #[test]
    fn session_cookie_extraction() {
        let mut headers = HeaderMap::new();
        headers.append(
            SET_COOKIE,
            HeaderValue::from_static("SESSID=other; Path=/"),
        );
        headers.append(
            SET_COOKIE,
            HeaderValue::from_static("NITRO_AUTH_TOKEN=abc123; Path=/nitro; HttpOnly"),
        );
        assert_eq!(session_cookie(&headers), Some("abc123".to_string()));
    }

    #[test]
    fn session_cookie_missing() {
        let headers = HeaderMap::new();
        assert_eq!(session_cookie(&headers), None);
    }

    #[test]
    fn masking_replaces_password_and_preserves_original() {
        let creds = Credentials::new("nsroot", "secret123");
        let payload = login_body(&creds);
        let masked = mask_credentials(&payload);

        assert_eq!(masked["login"]["password"], MASKED_PASSWORD);
        assert_eq!(masked["login"]["username"], "nsroot");
        assert_eq!(payload["login"]["password"], "secret123");
    }

    #[test]
    fn masking_leaves_other_payloads_alone() {
        let payload = json!({"lbvserver": {"name": "web"}});
        assert_eq!(mask_credentials(&payload), payload);
    }
}
