//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders a snapshot in the format selected by `--output`. Table uses
//! `tabled`, structured formats use serde and keep key order, plain emits
//! one `key=value` per line.

use std::io::{self, Write};

use indexmap::IndexMap;
use tabled::{Table, Tabled, settings::Style};

use kraken_core::Snapshot;

use crate::cli::OutputFormat;

#[derive(Tabled)]
struct StatRow<'a> {
    #[tabled(rename = "Key")]
    key: &'a str,
    #[tabled(rename = "Value")]
    value: &'a str,
}

/// Render the snapshot, keeping only keys that start with `filter`.
pub fn render_snapshot(format: OutputFormat, snapshot: &Snapshot, filter: Option<&str>) -> String {
    let entries: IndexMap<&str, &str> = snapshot
        .iter()
        .filter(|(key, _)| filter.is_none_or(|prefix| key.starts_with(prefix)))
        .collect();

    match format {
        OutputFormat::Table => {
            let rows: Vec<StatRow<'_>> = entries
                .iter()
                .map(|(&key, &value)| StatRow { key, value })
                .collect();
            render_table(&rows)
        }
        OutputFormat::Json => render_json(&entries, false),
        OutputFormat::JsonCompact => render_json(&entries, true),
        OutputFormat::Yaml => render_yaml(&entries),
        OutputFormat::Plain => entries
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Format-specific renderers ────────────────────────────────────────

fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

pub(crate) fn render_json<T: serde::Serialize + ?Sized>(data: &T, compact: bool) -> String {
    let rendered = if compact {
        serde_json::to_string(data)
    } else {
        serde_json::to_string_pretty(data)
    };
    rendered.expect("serialization should not fail")
}

pub(crate) fn render_yaml<T: serde::Serialize + ?Sized>(data: &T) -> String {
    serde_yaml::to_string(data).expect("serialization should not fail")
}

#[cfg(test)]
mod tests {
    use kraken_core::StatMap;

    use super::*;

    fn snapshot() -> Snapshot {
        let values: StatMap = [
            ("Version", "3.2.0"),
            ("Network#Hostname", "kraken-01"),
            ("Stream_Main#State", "running"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_owned(), v.to_owned()))
        .collect();
        Snapshot::new(values)
    }

    #[test]
    fn plain_keeps_order_and_filters() {
        let snap = snapshot();
        assert_eq!(
            render_snapshot(OutputFormat::Plain, &snap, None),
            "Version=3.2.0\nNetwork#Hostname=kraken-01\nStream_Main#State=running"
        );
        assert_eq!(
            render_snapshot(OutputFormat::Plain, &snap, Some("Stream_")),
            "Stream_Main#State=running"
        );
    }

    #[test]
    fn compact_json_is_an_ordered_object() {
        let snap = snapshot();
        assert_eq!(
            render_snapshot(OutputFormat::JsonCompact, &snap, Some("N")),
            r#"{"Network#Hostname":"kraken-01"}"#
        );
    }

    #[test]
    fn table_has_headers() {
        let table = render_snapshot(OutputFormat::Table, &snapshot(), None);
        assert!(table.contains("Key"));
        assert!(table.contains("kraken-01"));
    }
}
