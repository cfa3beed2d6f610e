//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use kraken_config::ConfigError;
use kraken_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not connect to appliance at {url}")]
    #[diagnostic(
        code(kraken::connection_failed),
        help(
            "Check that the appliance is reachable over HTTPS.\n\
             URL: {url}\n\
             Self-signed certificate? Try: kraken collect --insecure"
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Error when retrieving {section}")]
    #[diagnostic(
        code(kraken::resource_unreachable),
        help("The cycle was aborted; the appliance answered: {reason}")
    )]
    ResourceUnreachable { section: String, reason: String },

    #[error("Request timed out")]
    #[diagnostic(
        code(kraken::timeout),
        help("Increase timeout with --timeout or check appliance responsiveness.")
    )]
    Timeout,

    // ── Authentication ───────────────────────────────────────────────

    #[error("Failed to login to device: {message}")]
    #[diagnostic(
        code(kraken::auth_failed),
        help(
            "Verify the username and password.\n\
             The password is read from the profile's password_env variable,\n\
             then KRAKEN_PASSWORD, then the profile itself."
        )
    )]
    AuthFailed { message: String },

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(kraken::no_credentials),
        help(
            "Set KRAKEN_USERNAME and KRAKEN_PASSWORD, or configure the profile with:\n\
             kraken config init --host <HOST> --username <USER> --password-env <VAR>"
        )
    )]
    NoCredentials { profile: String },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(kraken::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(kraken::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: kraken config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("Configuration file not found")]
    #[diagnostic(
        code(kraken::no_config),
        help(
            "Create one with: kraken config init --host <HOST> --username <USER>\n\
             or pass --host directly. Expected at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(kraken::config))]
    Config(Box<figment::Error>),

    // ── IO / Serialization ────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::ResourceUnreachable { .. } => {
                exit_code::CONNECTION
            }
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::Timeout => exit_code::TIMEOUT,
            Self::Validation { .. }
            | Self::ProfileNotFound { .. }
            | Self::NoConfig { .. }
            | Self::Config(_) => exit_code::USAGE,
            Self::Io(_) => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::LoginUnreachable { url, reason } => CliError::ConnectionFailed {
                url,
                source: reason.into(),
            },

            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },

            CoreError::ResourceUnreachable { section, source } => {
                if source.is_timeout() {
                    CliError::Timeout
                } else if source.is_auth_failure() {
                    CliError::AuthFailed {
                        message: format!("session rejected while retrieving {section}"),
                    }
                } else {
                    CliError::ResourceUnreachable {
                        section: section.to_string(),
                        reason: source.to_string(),
                    }
                }
            }

            CoreError::ValidationFailed { message } => CliError::Validation {
                field: "input".into(),
                reason: message,
            },

            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::UnknownProfile { name } => CliError::ProfileNotFound {
                name,
                available: String::new(),
            },
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::Serialization(e) => CliError::Validation {
                field: "config".into(),
                reason: format!("failed to serialize config: {e}"),
            },
            ConfigError::Figment(e) => CliError::Config(e),
            ConfigError::Io(e) => CliError::Io(e),
        }
    }
}
