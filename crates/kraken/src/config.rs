//! CLI configuration: a thin wrapper around `kraken_config` shared types.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides (--host,
//! --username, --insecure, --timeout).

use clap::ValueEnum;
use kraken_core::CollectorConfig;

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;

pub use kraken_config::{Config, Profile, config_path, load_config, save_config};

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// `defaults.output` from the config file, used when `--output` is absent.
///
/// A missing or unreadable config, or an unknown format name, falls back
/// to the table.
pub fn configured_output() -> OutputFormat {
    let name = kraken_config::load_config_or_default().defaults.output;
    OutputFormat::from_str(&name, true).unwrap_or_else(|_| {
        tracing::warn!(output = %name, "unknown defaults.output in config, using table");
        OutputFormat::Table
    })
}

/// Apply flag overrides on top of a profile.
fn apply_overrides(profile: &mut Profile, global: &GlobalOpts) {
    if let Some(ref host) = global.host {
        profile.host.clone_from(host);
    }
    if let Some(ref username) = global.username {
        profile.username = Some(username.clone());
    }
    if global.insecure {
        profile.insecure = Some(true);
    }
    if let Some(timeout) = global.timeout {
        profile.timeout = Some(timeout);
    }
}

/// Build a `CollectorConfig` from the config file, profile, and CLI overrides.
///
/// Without a matching profile, `--host` alone is enough; credentials then
/// come from `KRAKEN_USERNAME` / `KRAKEN_PASSWORD`.
pub fn resolve_collector_config(global: &GlobalOpts) -> Result<CollectorConfig, CliError> {
    let cfg = load_config()?;
    let profile_name = active_profile_name(global, &cfg);

    let mut profile = match cfg.profiles.get(&profile_name) {
        Some(profile) => profile.clone(),
        None if global.host.is_some() => Profile::default(),
        None if global.profile.is_some() => {
            let mut available: Vec<_> = cfg.profiles.keys().cloned().collect();
            available.sort();
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: available.join(", "),
            });
        }
        None => {
            return Err(CliError::NoConfig {
                path: config_path().display().to_string(),
            });
        }
    };

    apply_overrides(&mut profile, global);
    Ok(kraken_config::profile_to_collector_config(
        &profile,
        &profile_name,
        &cfg.defaults,
    )?)
}
