// ── Core error types ──
//
// Errors surfaced by a collection cycle. Consumers see which part of the
// cycle failed (login vs. a section) rather than raw HTTP details; the
// transport error is kept as the source.

use strum::Display;
use thiserror::Error;

/// Resource sections of a collection cycle, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Section {
    #[strum(serialize = "system info")]
    SystemInfo,
    #[strum(serialize = "network info")]
    Network,
    #[strum(serialize = "license info")]
    License,
    #[strum(serialize = "stream info")]
    Streams,
    #[strum(serialize = "system load")]
    SystemLoad,
    #[strum(serialize = "service info")]
    Services,
}

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Session errors ───────────────────────────────────────────────
    #[error("Failed to send login request to device at {url}: {reason}")]
    LoginUnreachable { url: String, reason: String },

    #[error("Failed to login to device: {message}")]
    AuthenticationFailed { message: String },

    // ── Cycle errors ─────────────────────────────────────────────────
    #[error("Error when retrieving {section}")]
    ResourceUnreachable {
        section: Section,
        #[source]
        source: kraken_api::Error,
    },

    // ── Caller errors ────────────────────────────────────────────────
    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// `true` when the cycle stopped because no session could be established.
    pub fn is_login_failure(&self) -> bool {
        matches!(
            self,
            Self::LoginUnreachable { .. } | Self::AuthenticationFailed { .. }
        )
    }

    /// The section that failed, for resource-unreachable errors.
    pub fn section(&self) -> Option<Section> {
        match self {
            Self::ResourceUnreachable { section, .. } => Some(*section),
            _ => None,
        }
    }
}
