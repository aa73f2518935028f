//! Credential and session token types.
//!
//! Both types redact their secret in `Debug` output so that diagnostic
//! logging can never leak them.

use std::fmt;

/// Login credentials for the appliance.
///
/// # Security
///
/// The password is never exposed in Debug output to prevent accidental
/// logging.
///
/// # Example
///
/// ```
/// use nitrous::Credentials;
///
/// let creds = Credentials::new("nsroot", "app-password-here");
/// assert_eq!(creds.username(), "nsroot");
/// ```
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    /// Create new credentials.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Returns the username.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the password.
    ///
    /// # Security
    ///
    /// Use this only when constructing a login payload.
    /// Never log or display this value.
    pub(crate) fn password(&self) -> &str {
        &self.password
    }
}

// Intentionally hide password in Debug output
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

// Clone is intentionally implemented to allow credentials to be reused,
// but the type is not Copy to make credential passing explicit.
impl Clone for Credentials {
    fn clone(&self) -> Self {
        Self {
            username: self.username.clone(),
            password: self.password.clone(),
        }
    }
}

/// An opaque session token issued by the appliance on login.
///
/// Carried as the `NITRO_AUTH_TOKEN` cookie on every authenticated call.
///
/// # Security
///
/// - Never logged or displayed in Debug output
/// - Treat as opaque; do not parse or inspect
#[derive(Clone)]
pub struct SessionToken(pub(crate) String);

impl SessionToken {
    /// Create a new session token.
    pub(crate) fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the token value for use in the session cookie.
    ///
    /// # Security
    ///
    /// Use only when constructing the request cookie header.
    pub(crate) fn as_str(&self) -> &str {
        &self.0
    }
}

// Hide token value in Debug output
impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SessionToken").field(&"[REDACTED]").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_hides_password_in_debug() {
        let creds = Credentials::new("nsroot", "secret123");
        let debug = format!("{:?}", creds);
        assert!(debug.contains("nsroot"));
        assert!(!debug.contains("secret123"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn session_token_hides_value_in_debug() {
        let token = SessionToken::new("3d5890d85c8d0a4a9fcdbcb7a79d2ab2");
        let debug = format!("{:?}", token);
        assert!(!debug.contains("3d5890d85c8d0a4a9fcdbcb7a79d2ab2"));
        assert!(debug.contains("[REDACTED]"));
    }
}
