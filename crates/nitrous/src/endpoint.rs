//! Appliance endpoint URL type.

use std::fmt;
use std::str::FromStr;
use url::Url;

use crate::error::{ConfigError, Error};

/// A validated appliance endpoint URL.
///
/// This type ensures the URL is absolute, uses HTTP or HTTPS (the scheme is
/// how the `protocol` option is expressed), and is normalized so that
/// resource URL construction is insensitive to redundant slashes.
///
/// # Example
///
/// ```
/// use nitrous::Endpoint;
///
/// let endpoint = Endpoint::new("https://10.0.0.20/").unwrap();
/// assert_eq!(endpoint.resource_url("/nitro/v1/", "/stat/system"),
///            "https://10.0.0.20/nitro/v1/stat/system");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Endpoint(Url);

impl Endpoint {
    /// Create a new endpoint from a string, validating the format.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is not absolute, has no host, or uses a
    /// scheme other than `http` or `https`.
    pub fn new(s: impl AsRef<str>) -> Result<Self, Error> {
        let s = s.as_ref();
        let url = Url::parse(s).map_err(|e| ConfigError::InvalidEndpoint {
            value: s.to_string(),
            reason: e.to_string(),
        })?;

        Self::validate(&url, s)?;

        // Normalize: remove trailing slash
        let normalized = if url.path() == "/" {
            let mut u = url.clone();
            u.set_path("");
            u
        } else {
            url
        };

        Ok(Self(normalized))
    }

    /// Build the full URL for a resource path.
    ///
    /// Leading and trailing slashes are trimmed from `base_path` and `path`,
    /// then the segments are joined with exactly one separator, so
    /// `"/nitro/v1/"` + `"/stat/system"` and `"nitro/v1"` + `"stat/system"`
    /// produce the same URL.
    pub fn resource_url(&self, base_path: &str, path: &str) -> String {
        let mut url = self.0.as_str().trim_end_matches('/').to_string();
        for segment in [base_path, path] {
            let segment = segment.trim_matches('/');
            if !segment.is_empty() {
                url.push('/');
                url.push_str(segment);
            }
        }
        url
    }

    /// Returns the endpoint as a string.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns the host string.
    pub fn host(&self) -> Option<&str> {
        self.0.host_str()
    }

    /// Whether the endpoint uses HTTPS.
    pub fn is_https(&self) -> bool {
        self.0.scheme() == "https"
    }

    fn validate(url: &Url, original: &str) -> Result<(), Error> {
        if url.cannot_be_a_base() {
            return Err(ConfigError::InvalidEndpoint {
                value: original.to_string(),
                reason: "must be an absolute URL".to_string(),
            }
            .into());
        }

        // Management interfaces are commonly reached over plain HTTP, so
        // both schemes are accepted here.
        let scheme = url.scheme();
        if scheme != "http" && scheme != "https" {
            return Err(ConfigError::InvalidEndpoint {
                value: original.to_string(),
                reason: "must use http or https".to_string(),
            }
            .into());
        }

        if url.host_str().is_none() {
            return Err(ConfigError::InvalidEndpoint {
                value: original.to_string(),
                reason: "must have a host".to_string(),
            }
            .into());
        }

        Ok(())
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Endpoint {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for Endpoint {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_https_url() {
        let endpoint = Endpoint::new("https://10.0.0.20").unwrap();
        assert_eq!(endpoint.host(), Some("10.0.0.20"));
        assert!(endpoint.is_https());
    }

    #[test]
    fn valid_plain_http_url() {
        let endpoint = Endpoint::new("http://ns.example.com").unwrap();
        assert_eq!(endpoint.host(), Some("ns.example.com"));
        assert!(!endpoint.is_https());
    }

    #[test]
    fn resource_url_construction() {
        let endpoint = Endpoint::new("http://10.0.0.20").unwrap();
        assert_eq!(
            endpoint.resource_url("/nitro/v1", "/stat/system"),
            "http://10.0.0.20/nitro/v1/stat/system"
        );
    }

    #[test]
    fn resource_url_is_insensitive_to_redundant_slashes() {
        let slashed = Endpoint::new("http://10.0.0.20/").unwrap();
        let plain = Endpoint::new("http://10.0.0.20").unwrap();
        let expected = "http://10.0.0.20/nitro/v1/stat/system";

        assert_eq!(slashed.resource_url("/nitro/v1/", "/stat/system"), expected);
        assert_eq!(slashed.resource_url("nitro/v1", "stat/system"), expected);
        assert_eq!(plain.resource_url("/nitro/v1/", "stat/system/"), expected);
    }

    #[test]
    fn resource_url_with_empty_base_path() {
        let endpoint = Endpoint::new("http://10.0.0.20").unwrap();
        assert_eq!(
            endpoint.resource_url("", "/stat/system"),
            "http://10.0.0.20/stat/system"
        );
    }

    #[test]
    fn invalid_scheme_rejected() {
        assert!(Endpoint::new("ftp://10.0.0.20").is_err());
    }

    #[test]
    fn invalid_relative_url() {
        assert!(Endpoint::new("/nitro/v1").is_err());
    }
}
