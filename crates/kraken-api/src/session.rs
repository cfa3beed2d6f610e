// Session authentication
//
// Cookie-style session login/logout. The appliance hands out a session
// identifier either as a UUID inside `Set-Cookie` or as the `id` field of
// the login response body. The identifier is returned from `login()` and
// stored on the client, which attaches it to every later request.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use reqwest::header::{HeaderMap, SET_COOKIE};
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::client::{KrakenClient, preview};
use crate::error::Error;
use crate::paths;

static UUID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[a-fA-F0-9]{8}-[a-fA-F0-9]{4}-[a-fA-F0-9]{4}-[a-fA-F0-9]{4}-[a-fA-F0-9]{12}")
        .expect("UUID pattern is valid")
});

/// An authenticated session on the appliance.
///
/// Exists only in memory. An empty token never forms a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub established_at: DateTime<Utc>,
}

impl Session {
    fn new(token: String) -> Self {
        Self {
            token,
            established_at: Utc::now(),
        }
    }
}

impl KrakenClient {
    /// Authenticate with username/password.
    ///
    /// `POST apis/v2/login` with `{"username", "password"}`.
    ///
    /// Returns `Ok(None)` when the appliance answered but no session
    /// identifier could be extracted (rejected credentials, empty token).
    /// Failing to reach the appliance at all is an `Err`.
    pub async fn login(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<Option<Session>, Error> {
        let url = self.endpoint_url(paths::LOGIN)?;
        debug!("logging in at {}", url);

        let body = json!({
            "username": username,
            "password": password.expose_secret(),
        });

        let resp = self
            .http()
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), body = %preview(&body), "login rejected");
            self.clear_session();
            return Ok(None);
        }

        let headers = resp.headers().clone();
        let body = resp.text().await.map_err(Error::Transport)?;

        match extract_token(&headers, &body) {
            Some(token) => {
                debug!("login successful");
                let session = Session::new(token);
                self.set_session(Some(session.clone()));
                Ok(Some(session))
            }
            None => {
                warn!("session id not found in login response");
                self.clear_session();
                Ok(None)
            }
        }
    }

    /// End the current session.
    ///
    /// `GET apis/v2/logout` carrying the current cookies. Failures are
    /// logged and swallowed; the stored session is cleared either way.
    pub async fn logout(&self) {
        match self.endpoint_url(paths::LOGOUT) {
            Ok(url) => {
                debug!("logging out at {}", url);
                match self.authorize(self.http().get(url)).send().await {
                    Ok(resp) if resp.status().is_success() => debug!("logout complete"),
                    Ok(resp) => {
                        warn!(status = resp.status().as_u16(), "logout returned non-success");
                    }
                    Err(e) => warn!(error = %e, "error while deleting session"),
                }
            }
            Err(e) => warn!(error = %e, "cannot build logout URL"),
        }

        self.clear_session();
    }

    /// Force a fresh session: logout (best-effort), then login.
    ///
    /// No "still valid" shortcut: every call re-authenticates. Returns
    /// `Ok(true)` when a non-empty session identifier was obtained.
    pub async fn ensure_session(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<bool, Error> {
        self.logout().await;
        let session = self.login(username, password).await?;
        Ok(session.is_some())
    }
}

/// Pull the session identifier out of a login response.
///
/// `Set-Cookie` values win: the first UUID in each header is taken and the
/// matches are concatenated in header order. When no header yields one,
/// the body is read as JSON and its `id` field used verbatim.
pub fn extract_token(headers: &HeaderMap, body: &str) -> Option<String> {
    let from_cookies: String = headers
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(|cookie| UUID_PATTERN.find(cookie))
        .map(|m| m.as_str())
        .collect();

    if !from_cookies.is_empty() {
        return Some(from_cookies);
    }

    let parsed: Value = match serde_json::from_str(body) {
        Ok(v) => v,
        Err(e) => {
            debug!(error = %e, "login body is not JSON");
            return None;
        }
    };

    let id = match parsed.get("id")? {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };

    (!id.is_empty()).then_some(id)
}
