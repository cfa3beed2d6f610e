//! Polling loop: one cycle per interval until Ctrl-C or `--count`.

use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use kraken_core::Collector;

use crate::cli::{GlobalOpts, OutputFormat, WatchArgs};
use crate::error::CliError;
use crate::output;

pub async fn handle(
    collector: &Collector,
    args: WatchArgs,
    global: &GlobalOpts,
    poll_interval: Duration,
) -> Result<(), CliError> {
    let period = args
        .interval
        .map_or(poll_interval, Duration::from_secs)
        .max(Duration::from_secs(1));
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    info!(period_secs = period.as_secs(), "watching");

    let mut cycles: u64 = 0;
    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = tokio::signal::ctrl_c() => {
                info!("interrupted");
                break;
            }
        }

        match collector.collect().await {
            Ok(snapshot) => {
                if global.format() == OutputFormat::Table && !global.quiet {
                    eprintln!("── {} ──", snapshot.collected_at().to_rfc3339());
                }
                let rendered =
                    output::render_snapshot(global.format(), &snapshot, args.filter.as_deref());
                output::print_output(&rendered, global.quiet);
            }
            // A failed cycle keeps the previous snapshot; keep polling.
            Err(e) => warn!(error = %e, "collection cycle failed"),
        }

        cycles += 1;
        if args.count.is_some_and(|limit| cycles >= limit) {
            break;
        }
    }

    collector.shutdown().await;
    Ok(())
}
