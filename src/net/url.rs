//! Redis target URL parsing.
//!
//! Accepts `redis://[[username]:password@]host[:port][/db]`. The port
//! defaults to 6379, the database to 0 and an empty host to `localhost`.

use percent_encoding::percent_decode_str;
use thiserror::Error;
use url::Url;

/// Default Redis port.
pub const DEFAULT_PORT: u16 = 6379;

/// Error returned for malformed or unsupported target URLs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TargetUrlError {
    #[error("invalid target url: {0}")]
    Malformed(String),

    #[error("unsupported scheme {0:?} (expected \"redis\")")]
    UnsupportedScheme(String),

    #[error("invalid database index {0:?}")]
    InvalidDatabase(String),
}

/// A parsed Redis endpoint.
#[derive(Clone, PartialEq, Eq)]
pub struct TargetUrl {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub db: u32,
}

impl TargetUrl {
    /// Parse a `redis://` URL.
    pub fn parse(input: &str) -> Result<Self, TargetUrlError> {
        let url = Url::parse(input).map_err(|e| TargetUrlError::Malformed(e.to_string()))?;

        if url.scheme() != "redis" {
            return Err(TargetUrlError::UnsupportedScheme(url.scheme().to_string()));
        }

        let host = match url.host_str() {
            Some(host) if !host.is_empty() => host.to_string(),
            _ => "localhost".to_string(),
        };
        let port = url.port().unwrap_or(DEFAULT_PORT);

        let username = Some(decode_credential(url.username())?).filter(|u| !u.is_empty());
        let password = match url.password() {
            Some(raw) => Some(decode_credential(raw)?).filter(|p| !p.is_empty()),
            None => None,
        };

        let db = match url.path().trim_start_matches('/') {
            "" => 0,
            raw => raw
                .parse()
                .map_err(|_| TargetUrlError::InvalidDatabase(raw.to_string()))?,
        };

        Ok(Self {
            host,
            port,
            username,
            password,
            db,
        })
    }

    /// `host:port` pair used for dialing and as the record's `target`.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// Credentials are redacted so the URL can be logged.
impl std::fmt::Debug for TargetUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TargetUrl")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("db", &self.db)
            .finish()
    }
}

fn decode_credential(raw: &str) -> Result<String, TargetUrlError> {
    percent_decode_str(raw)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .map_err(|_| TargetUrlError::Malformed("credentials are not valid UTF-8".into()))
}
