// ── Runtime collector configuration ──
//
// These types describe *how* to reach one appliance. They carry
// credential data and transport tuning, but never touch disk.
// The CLI (via kraken-config) constructs a `CollectorConfig` and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use kraken_api::transport::{TlsMode, TransportConfig};

/// Username/password used for the per-cycle session login.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification. Appliances ship with self-signed certificates.
    #[default]
    DangerAcceptInvalid,
}

/// Configuration for collecting from a single appliance.
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    /// Appliance URL (e.g., `https://10.0.0.5`).
    pub url: Url,
    pub credentials: Credentials,
    pub tls: TlsVerification,
    /// Per-request timeout. A hung call blocks the cycle until it fires.
    pub timeout: Duration,
    /// Cycle period used by polling front-ends. The collector itself
    /// never schedules cycles.
    pub poll_interval: Duration,
}

impl CollectorConfig {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
    pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(60);

    pub fn new(url: Url, credentials: Credentials) -> Self {
        Self {
            url,
            credentials,
            tls: TlsVerification::default(),
            timeout: Self::DEFAULT_TIMEOUT,
            poll_interval: Self::DEFAULT_POLL_INTERVAL,
        }
    }

    pub(crate) fn transport(&self) -> TransportConfig {
        let tls = match &self.tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        };
        TransportConfig {
            tls,
            timeout: self.timeout,
        }
    }
}
