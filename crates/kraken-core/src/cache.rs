// ── Per-cycle lookup cache ──
//
// Raw values keyed `<scope>#<metric>`, rebuilt at the start of every
// section and read straight back while that section writes its keys.
// Owned by a single cycle; nothing survives into the next one.

use std::collections::HashMap;

use serde_json::Value;

use crate::flatten::{self, NAMESPACE_DELIMITER};
use crate::metrics::Metric;

#[derive(Debug, Default)]
pub struct LookupCache {
    values: HashMap<String, String>,
}

impl LookupCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Replace the raw text of every table field for `scope` with what
    /// `object` holds.
    ///
    /// Fields that are absent or not scalar are dropped from the scope and
    /// read back as `"None"`, even if an earlier record filled the same
    /// scope.
    pub fn fill(&mut self, scope: &str, table: &[Metric], object: &Value) {
        for metric in table {
            match flatten::raw_text(flatten::lookup(object, metric.field)) {
                Some(text) => self.insert(scope, metric.name, text),
                None => {
                    self.values.remove(&cache_key(scope, metric.name));
                }
            }
        }
    }

    pub fn insert(&mut self, scope: &str, metric: &str, raw: String) {
        self.values.insert(cache_key(scope, metric), raw);
    }

    /// The cached value with the null-safety rule applied.
    pub fn get(&self, scope: &str, metric: &str) -> String {
        flatten::or_none(self.values.get(&cache_key(scope, metric)).map(String::as_str))
    }
}

fn cache_key(scope: &str, metric: &str) -> String {
    if scope.is_empty() {
        metric.to_owned()
    } else {
        format!("{scope}{NAMESPACE_DELIMITER}{metric}")
    }
}
