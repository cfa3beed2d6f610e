// Appliance HTTP client
//
// Wraps `reqwest::Client` with base-URL resolution, session cookie
// injection and JSON decoding. Session handling lives in `session.rs`
// and the typed endpoints in `endpoints.rs`, both as inherent methods.

use std::sync::RwLock;

use reqwest::header::COOKIE;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::session::Session;
use crate::transport::TransportConfig;

/// Sent alongside the session cookie so the web UI's unsaved-changes
/// prompt never interferes with API calls.
pub(crate) const WARNING_COOKIE: &str = "DisplayUnsavedWarning=true; Path=/; Secure;";

const BODY_PREVIEW_CHARS: usize = 200;

/// Raw HTTP client for the appliance's REST management API.
///
/// Holds the current [`Session`]; every request issued while a session
/// with a non-empty token is held carries the two session cookies.
/// Nothing is retried and no response is cached.
pub struct KrakenClient {
    http: reqwest::Client,
    base_url: Url,
    session: RwLock<Option<Session>>,
}

impl KrakenClient {
    /// Create a client for the appliance at `base_url` (e.g. `https://10.0.0.5`).
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url))
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url,
            session: RwLock::new(None),
        }
    }

    /// The appliance base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    // ── Session state ────────────────────────────────────────────────

    /// The currently held session, if any.
    pub fn session(&self) -> Option<Session> {
        self.session.read().expect("session lock poisoned").clone()
    }

    /// The current token, or an empty string when unauthenticated.
    pub fn token(&self) -> String {
        self.session
            .read()
            .expect("session lock poisoned")
            .as_ref()
            .map(|s| s.token.clone())
            .unwrap_or_default()
    }

    pub(crate) fn set_session(&self, session: Option<Session>) {
        *self.session.write().expect("session lock poisoned") = session;
    }

    /// Forget the current session without contacting the appliance.
    pub fn clear_session(&self) {
        trace!("clearing session");
        self.set_session(None);
    }

    /// Attach the session cookies when a non-empty token is held.
    pub(crate) fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let token = self.token();
        if token.is_empty() {
            return builder;
        }
        builder
            .header(COOKIE, WARNING_COOKIE)
            .header(COOKIE, format!("id={token}; Path=/; Secure; HttpOnly;"))
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Resolve an API path against the base URL.
    pub(crate) fn endpoint_url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Url::parse(&format!("{base}/{path}")).map_err(Error::InvalidUrl)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send an authenticated GET and decode the JSON body.
    pub async fn get_json(&self, path: &str) -> Result<Value, Error> {
        let url = self.endpoint_url(path)?;
        debug!("GET {}", url);

        let resp = self
            .authorize(self.http.get(url))
            .send()
            .await
            .map_err(Error::Transport)?;

        parse_json(resp).await
    }

    /// Send an authenticated POST with a JSON body and decode the JSON reply.
    pub async fn post_json(
        &self,
        path: &str,
        body: &(impl Serialize + Sync),
    ) -> Result<Value, Error> {
        let url = self.endpoint_url(path)?;
        debug!("POST {}", url);

        let resp = self
            .authorize(self.http.post(url).json(body))
            .send()
            .await
            .map_err(Error::Transport)?;

        parse_json(resp).await
    }
}

/// Check the status and decode the body as JSON.
async fn parse_json(resp: reqwest::Response) -> Result<Value, Error> {
    let status = resp.status();

    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(Error::Api {
            status: status.as_u16(),
            message: preview(&body),
        });
    }

    let body = resp.text().await.map_err(Error::Transport)?;

    serde_json::from_str(&body).map_err(|e| Error::Deserialization {
        message: format!("{e} (body preview: {:?})", preview(&body)),
        body,
    })
}

pub(crate) fn preview(body: &str) -> String {
    body.chars().take(BODY_PREVIEW_CHARS).collect()
}
