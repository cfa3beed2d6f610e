//! Config subcommand handlers.

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts, InitArgs, OutputFormat};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

const REDACTED: &str = "********";

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = redacted(config::load_config()?);
            let rendered = match global.format() {
                OutputFormat::Json => output::render_json(&cfg, false),
                OutputFormat::JsonCompact => output::render_json(&cfg, true),
                OutputFormat::Yaml => output::render_yaml(&cfg),
                OutputFormat::Table | OutputFormat::Plain => {
                    toml::to_string_pretty(&cfg).map_err(|e| CliError::Validation {
                        field: "config".into(),
                        reason: format!("failed to serialize config: {e}"),
                    })?
                }
            };
            output::print_output(&rendered, global.quiet);
            Ok(())
        }

        ConfigCommand::Init(init) => handle_init(&init, global),
    }
}

/// Write (or replace, with `--force`) one profile from the global flags.
fn handle_init(init: &InitArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let host = global.host.clone().ok_or_else(|| CliError::Validation {
        field: "host".into(),
        reason: "config init needs --host".into(),
    })?;
    // Fail early on an address that would never resolve to a URL.
    kraken_config::parse_host(&host)?;

    let mut cfg = config::load_config()?;
    let name = global.profile.clone().unwrap_or_else(|| "default".into());

    if cfg.profiles.contains_key(&name) && !init.force {
        return Err(CliError::Validation {
            field: "profile".into(),
            reason: format!("profile '{name}' already exists (use --force to replace it)"),
        });
    }

    let profile = Profile {
        host,
        username: global.username.clone(),
        password_env: init.password_env.clone(),
        insecure: global.insecure.then_some(true),
        timeout: global.timeout,
        poll_interval: init.poll_interval,
        ..Profile::default()
    };

    if cfg.profiles.is_empty() {
        cfg.default_profile = Some(name.clone());
    }
    cfg.profiles.insert(name.clone(), profile);

    let path = config::save_config(&cfg)?;
    if !global.quiet {
        eprintln!("Profile '{name}' written to {}", path.display());
    }
    Ok(())
}

/// Copy of `cfg` with plaintext passwords masked.
fn redacted(mut cfg: Config) -> Config {
    for profile in cfg.profiles.values_mut() {
        if profile.password.is_some() {
            profile.password = Some(REDACTED.into());
        }
    }
    cfg
}
