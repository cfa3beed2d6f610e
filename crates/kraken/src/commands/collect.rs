//! One-shot collection.

use kraken_core::Collector;

use crate::cli::{CollectArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;

pub async fn handle(
    collector: &Collector,
    args: CollectArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let result = collector.collect().await;
    // Leave no session behind, whatever the cycle's outcome.
    collector.shutdown().await;
    let snapshot = result?;

    let rendered = output::render_snapshot(global.format(), &snapshot, args.filter.as_deref());
    output::print_output(&rendered, global.quiet);
    Ok(())
}
