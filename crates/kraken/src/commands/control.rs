//! Control requests.

use kraken_core::{Collector, ControlProperty};

use crate::cli::{ControlArgs, GlobalOpts};
use crate::error::CliError;

pub fn handle(collector: &Collector, args: &ControlArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let controls = args
        .assignments
        .iter()
        .map(String::as_str)
        .map(parse_assignment)
        .collect::<Result<Vec<_>, _>>()?;

    collector.apply_controls(&controls)?;

    if !global.quiet {
        eprintln!(
            "Accepted {} control request(s); device controls are not supported, nothing was sent.",
            controls.len()
        );
    }
    Ok(())
}

fn parse_assignment(raw: &str) -> Result<ControlProperty, CliError> {
    match raw.split_once('=') {
        Some((property, value)) if !property.trim().is_empty() => {
            Ok(ControlProperty::new(property.trim(), value.trim()))
        }
        _ => Err(CliError::Validation {
            field: "control".into(),
            reason: format!("expected PROPERTY=VALUE, got '{raw}'"),
        }),
    }
}
