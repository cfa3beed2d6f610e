//! Rules for turning heterogeneous JSON into flat display strings.

use chrono::DateTime;
use serde_json::Value;

use crate::metrics::{Metric, Render};

/// Placeholder for missing, null or unparseable values.
pub const NONE: &str = "None";

/// Separates a category/instance prefix from the metric name.
pub const NAMESPACE_DELIMITER: char = '#';

const DATE_FORMAT: &str = "%b %-d, %Y, %-I:%M %p";

/// Follow a dotted path (`memory.memload`) into a JSON object.
pub fn lookup<'a>(object: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(object, |node, segment| node.get(segment))
}

/// Scalar text of a JSON value; `None` for missing, null and containers.
pub fn raw_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Apply the null-safety rule to raw text.
pub fn or_none(text: Option<&str>) -> String {
    match text {
        Some(t) if !t.is_empty() && !t.eq_ignore_ascii_case("null") => t.to_owned(),
        _ => NONE.to_owned(),
    }
}

/// Scalar text with the null-safety rule applied.
pub fn text_of(value: Option<&Value>) -> String {
    or_none(raw_text(value).as_deref())
}

/// Epoch seconds as `MMM d, yyyy, h:mm a` in UTC.
///
/// `"None"` passes through; anything that is not an integer becomes `"None"`.
pub fn format_epoch(value: &str) -> String {
    if value == NONE {
        return value.to_owned();
    }
    value
        .parse::<i64>()
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .map_or_else(
            || NONE.to_owned(),
            |dt| dt.format(DATE_FORMAT).to_string(),
        )
}

/// Render defaulted text according to the metric's rule.
pub fn render(metric: &Metric, text: String) -> String {
    match metric.render {
        Render::Text => text,
        Render::EpochDate => format_epoch(&text),
    }
}

/// Upper-case the first character only.
pub fn capitalize(input: &str) -> String {
    let mut chars = input.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Stream mode as shown to operators: `iorouter` is "Bypass".
pub fn rewrite_mode(mode: &str) -> String {
    if mode.eq_ignore_ascii_case("iorouter") {
        "Bypass".to_owned()
    } else {
        capitalize(mode)
    }
}

/// `<prefix>#<metric>`
pub fn key(prefix: &str, metric: &str) -> String {
    format!("{prefix}{NAMESPACE_DELIMITER}{metric}")
}

/// `<category>_<Instance>` for per-instance metrics.
pub fn instance_prefix(category: &str, instance: &str) -> String {
    format!("{category}_{}", capitalize(instance))
}

/// Truthiness the way the appliance reports `result` flags.
pub fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => s.eq_ignore_ascii_case("true"),
        _ => false,
    }
}
