use thiserror::Error;

/// Top-level error type for the `kraken-api` crate.
///
/// Covers every failure mode of talking to the appliance: transport,
/// non-success responses, and payloads that do not parse. A rejected
/// login is not an error here; `login()` reports it as no session.
/// `kraken-core` tags these with the collection section that failed.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS configuration or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Device API ──────────────────────────────────────────────────
    /// The appliance answered with a non-success HTTP status.
    #[error("Device API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// The payload parsed but did not have the expected structure.
    #[error("Unexpected response shape from {path}: {message}")]
    UnexpectedShape { path: String, message: String },
}

impl Error {
    /// Returns `true` if the appliance refused the session (HTTP 401/403).
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Api { status, .. } if *status == 401 || *status == 403)
    }

    /// Returns `true` if the request ran past the configured timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_timeout())
    }
}
