mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use kraken_core::Collector;

use crate::cli::{Cli, Command, GlobalOpts};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let mut cli = Cli::parse();

    init_tracing(cli.global.verbose);
    if cli.global.output.is_none() {
        cli.global.output = Some(config::configured_output());
    }

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config commands never touch the appliance
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "kraken", &mut std::io::stdout());
            Ok(())
        }

        Command::Collect(args) => {
            let (collector, _) = build_collector(&cli.global)?;
            commands::collect::handle(&collector, args, &cli.global).await
        }

        Command::Watch(args) => {
            let (collector, poll_interval) = build_collector(&cli.global)?;
            commands::watch::handle(&collector, args, &cli.global, poll_interval).await
        }

        Command::Control(args) => {
            let (collector, _) = build_collector(&cli.global)?;
            commands::control::handle(&collector, &args, &cli.global)
        }
    }
}

/// Resolve configuration and build a collector. Does not contact the device.
fn build_collector(global: &GlobalOpts) -> Result<(Collector, std::time::Duration), CliError> {
    let collector_config = config::resolve_collector_config(global)?;
    let poll_interval = collector_config.poll_interval;
    tracing::debug!(url = %collector_config.url, "building collector");
    Ok((Collector::new(collector_config)?, poll_interval))
}
