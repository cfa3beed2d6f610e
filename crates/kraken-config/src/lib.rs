//! Collector configuration.
//!
//! TOML profiles (one per appliance), credential resolution (env +
//! plaintext), and translation to `kraken_core::CollectorConfig`. The CLI
//! layers its flag overrides on top.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use kraken_core::{CollectorConfig, Credentials, TlsVerification};

/// Environment variable consulted for the password when a profile names none.
pub const PASSWORD_ENV: &str = "KRAKEN_PASSWORD";
/// Environment variable consulted for the username when a profile has none.
pub const USERNAME_ENV: &str = "KRAKEN_USERNAME";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' not found")]
    UnknownProfile { name: String },

    #[error("no credentials configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when none is given on the command line.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named appliance profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

impl Config {
    pub fn profile(&self, name: &str) -> Result<&Profile, ConfigError> {
        self.profiles
            .get(name)
            .ok_or_else(|| ConfigError::UnknownProfile { name: name.into() })
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    /// Accept self-signed appliance certificates unless a profile says otherwise.
    #[serde(default = "default_insecure")]
    pub insecure: bool,

    /// Per-request timeout, seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Seconds between cycles in `watch` mode.
    #[serde(default = "default_poll_interval")]
    pub poll_interval: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            insecure: default_insecure(),
            timeout: default_timeout(),
            poll_interval: default_poll_interval(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_insecure() -> bool {
    true
}
fn default_timeout() -> u64 {
    30
}
fn default_poll_interval() -> u64 {
    60
}

/// A named appliance profile.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Profile {
    /// Appliance address: `10.0.0.5`, `kraken.local:8443` or a full URL.
    pub host: String,

    pub username: Option<String>,

    /// Password (plaintext; prefer `password_env`).
    pub password: Option<String>,

    /// Environment variable name containing the password.
    pub password_env: Option<String>,

    /// Path to a custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override the default TLS leniency.
    pub insecure: Option<bool>,

    /// Override the request timeout, seconds.
    pub timeout: Option<u64>,

    /// Override the polling interval, seconds.
    pub poll_interval: Option<u64>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "kraken", "kraken-collector").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("kraken-collector");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file; `KRAKEN_*` variables still apply on top
/// (`KRAKEN_DEFAULTS__TIMEOUT=10`).
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("KRAKEN_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution ───────────────────────────────────────────

pub fn resolve_username(profile: &Profile, profile_name: &str) -> Result<String, ConfigError> {
    profile
        .username
        .clone()
        .or_else(|| std::env::var(USERNAME_ENV).ok())
        .filter(|u| !u.is_empty())
        .ok_or_else(|| ConfigError::NoCredentials {
            profile: profile_name.into(),
        })
}

/// Resolve the login password.
///
/// Order: the variable named by `password_env`, then `KRAKEN_PASSWORD`,
/// then the plaintext profile value.
pub fn resolve_password(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    if let Some(ref env_name) = profile.password_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    if let Ok(pw) = std::env::var(PASSWORD_ENV) {
        return Ok(SecretString::from(pw));
    }

    if let Some(ref pw) = profile.password {
        return Ok(SecretString::from(pw.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

pub fn resolve_credentials(
    profile: &Profile,
    profile_name: &str,
) -> Result<Credentials, ConfigError> {
    Ok(Credentials {
        username: resolve_username(profile, profile_name)?,
        password: resolve_password(profile, profile_name)?,
    })
}

// ── Translation ─────────────────────────────────────────────────────

/// Parse an appliance address, assuming `https://` when no scheme is given.
pub fn parse_host(host: &str) -> Result<Url, ConfigError> {
    let host = host.trim();
    if host.is_empty() {
        return Err(ConfigError::Validation {
            field: "host".into(),
            reason: "host is empty".into(),
        });
    }
    let candidate = if host.contains("://") {
        host.to_owned()
    } else {
        format!("https://{host}")
    };
    Url::parse(&candidate).map_err(|e| ConfigError::Validation {
        field: "host".into(),
        reason: format!("invalid URL '{host}': {e}"),
    })
}

/// TLS mode for a profile.
///
/// An explicit `insecure = true` wins, then a CA file, then an explicit
/// `insecure = false`, then the global default.
pub fn tls_for(profile: &Profile, defaults: &Defaults) -> TlsVerification {
    match (profile.insecure, &profile.ca_cert) {
        (Some(true), _) => TlsVerification::DangerAcceptInvalid,
        (_, Some(ca)) => TlsVerification::CustomCa(ca.clone()),
        (Some(false), None) => TlsVerification::SystemDefaults,
        (None, None) if defaults.insecure => TlsVerification::DangerAcceptInvalid,
        (None, None) => TlsVerification::SystemDefaults,
    }
}

/// Build a `CollectorConfig` from a profile, without CLI flag overrides.
pub fn profile_to_collector_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<CollectorConfig, ConfigError> {
    let url = parse_host(&profile.host)?;
    let credentials = resolve_credentials(profile, profile_name)?;

    let mut config = CollectorConfig::new(url, credentials);
    config.tls = tls_for(profile, defaults);
    config.timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));
    config.poll_interval =
        Duration::from_secs(profile.poll_interval.unwrap_or(defaults.poll_interval));
    Ok(config)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io::Write;

    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    use super::*;

    fn profile(host: &str) -> Profile {
        Profile {
            host: host.into(),
            username: Some("admin".into()),
            password: Some("s3cret".into()),
            ..Profile::default()
        }
    }

    #[test]
    fn host_without_scheme_gets_https() {
        assert_eq!(parse_host("10.0.0.5").unwrap().as_str(), "https://10.0.0.5/");
        assert_eq!(
            parse_host("kraken.local:8443").unwrap().as_str(),
            "https://kraken.local:8443/"
        );
        assert_eq!(parse_host("http://10.0.0.5").unwrap().scheme(), "http");
        assert!(matches!(parse_host("  "), Err(ConfigError::Validation { .. })));
    }

    #[test]
    fn tls_precedence() {
        let defaults = Defaults::default();
        let mut p = profile("10.0.0.5");
        assert_eq!(tls_for(&p, &defaults), TlsVerification::DangerAcceptInvalid);

        p.ca_cert = Some(PathBuf::from("/etc/kraken/ca.pem"));
        assert_eq!(
            tls_for(&p, &defaults),
            TlsVerification::CustomCa(PathBuf::from("/etc/kraken/ca.pem"))
        );

        p.insecure = Some(true);
        assert_eq!(tls_for(&p, &defaults), TlsVerification::DangerAcceptInvalid);

        p.insecure = Some(false);
        p.ca_cert = None;
        assert_eq!(tls_for(&p, &defaults), TlsVerification::SystemDefaults);
    }

    #[test]
    fn plaintext_password_used_when_env_var_missing() {
        let mut p = profile("10.0.0.5");
        p.password_env = Some("KRAKEN_TEST_SURELY_UNSET_VAR".into());
        if std::env::var(PASSWORD_ENV).is_err() {
            let pw = resolve_password(&p, "lab").unwrap();
            assert_eq!(pw.expose_secret(), "s3cret");
        }
    }

    #[test]
    fn missing_username_is_no_credentials() {
        let mut p = profile("10.0.0.5");
        p.username = None;
        if std::env::var(USERNAME_ENV).is_err() {
            assert!(matches!(
                resolve_username(&p, "lab"),
                Err(ConfigError::NoCredentials { .. })
            ));
        }
    }

    #[test]
    fn profile_translation_applies_overrides() {
        let defaults = Defaults::default();
        let mut p = profile("10.0.0.5");
        p.timeout = Some(5);

        let cfg = profile_to_collector_config(&p, "lab", &defaults).unwrap();

        assert_eq!(cfg.url.as_str(), "https://10.0.0.5/");
        assert_eq!(cfg.credentials.username, "admin");
        assert_eq!(cfg.timeout, Duration::from_secs(5));
        assert_eq!(cfg.poll_interval, Duration::from_secs(60));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
default_profile = "lab"

[defaults]
poll_interval = 15

[profiles.lab]
host = "10.0.0.5"
username = "admin"
password_env = "LAB_PASSWORD"
"#
        )
        .unwrap();

        let cfg = load_config_from(file.path()).unwrap();

        assert_eq!(cfg.default_profile.as_deref(), Some("lab"));
        assert_eq!(cfg.defaults.poll_interval, 15);
        assert_eq!(cfg.defaults.timeout, 30);
        let lab = cfg.profile("lab").unwrap();
        assert_eq!(lab.host, "10.0.0.5");
        assert_eq!(lab.password_env.as_deref(), Some("LAB_PASSWORD"));
        assert!(matches!(cfg.profile("prod"), Err(ConfigError::UnknownProfile { .. })));
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.profiles.insert("default".into(), profile("kraken.local"));
        save_config_to(&cfg, &path).unwrap();

        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded.profile("default").unwrap().host, "kraken.local");
    }
}
