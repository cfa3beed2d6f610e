// ── Snapshot and snapshot store ──
//
// A snapshot is the flat key/value map produced by one successful cycle.
// The store holds exactly one and swaps it wholesale, so readers never
// wait on a cycle in progress and never see a half-built map.

use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwapOption;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Serialize;

use crate::flatten;
use crate::metrics::{CPU_LOAD, SYSTEM_PREFIX, UPTIME};

/// Flat key/value map under construction. Insertion order is kept and a
/// repeated key overwrites the earlier value in place.
pub type StatMap = IndexMap<String, String>;

/// The complete output of one collection cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    values: StatMap,
    collected_at: DateTime<Utc>,
}

/// Host-level statistics derived from a snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GenericStats {
    pub cpu_percentage: Option<f32>,
    pub uptime: Option<Duration>,
}

impl Snapshot {
    pub fn new(values: StatMap) -> Self {
        Self {
            values,
            collected_at: Utc::now(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn values(&self) -> &StatMap {
        &self.values
    }

    pub fn into_map(self) -> StatMap {
        self.values
    }

    pub fn collected_at(&self) -> DateTime<Utc> {
        self.collected_at
    }

    /// CPU percentage and uptime, when the load section reported them.
    pub fn generic(&self) -> GenericStats {
        let cpu_percentage = self
            .get(&flatten::key(SYSTEM_PREFIX, CPU_LOAD))
            .and_then(|v| v.parse::<f32>().ok());
        let uptime = self
            .get(&flatten::key(SYSTEM_PREFIX, UPTIME))
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_secs);
        GenericStats {
            cpu_percentage,
            uptime,
        }
    }
}

/// Holds the latest snapshot; replaced atomically, read lock-free.
#[derive(Debug, Default)]
pub struct SnapshotStore {
    current: ArcSwapOption<Snapshot>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(&self) -> Option<Arc<Snapshot>> {
        self.current.load_full()
    }

    pub fn replace(&self, snapshot: Arc<Snapshot>) {
        self.current.store(Some(snapshot));
    }

    pub fn clear(&self) {
        self.current.store(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> StatMap {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[test]
    fn generic_stats_parse_load_keys() {
        let snap = Snapshot::new(map(&[
            ("System#SystemCPULoad", "12.5"),
            ("System#SystemUptime", "3600"),
        ]));
        let generic = snap.generic();
        assert_eq!(generic.cpu_percentage, Some(12.5));
        assert_eq!(generic.uptime, Some(Duration::from_secs(3600)));
    }

    #[test]
    fn generic_stats_tolerate_none() {
        let snap = Snapshot::new(map(&[("System#SystemCPULoad", "None")]));
        assert_eq!(snap.generic(), GenericStats::default());
    }

    #[test]
    fn later_write_wins_in_place() {
        let mut values = map(&[("Service#WebServerInterfaces", "eth0, eth1"), ("Version", "3.2")]);
        values.insert("Service#WebServerInterfaces".into(), "eth0".into());
        let snap = Snapshot::new(values);

        let keys: Vec<_> = snap.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["Service#WebServerInterfaces", "Version"]);
        assert_eq!(snap.get("Service#WebServerInterfaces"), Some("eth0"));
    }

    #[test]
    fn store_replace_and_clear() {
        let store = SnapshotStore::new();
        assert!(store.load().is_none());

        let first = Arc::new(Snapshot::new(map(&[("Version", "1")])));
        store.replace(Arc::clone(&first));
        let held = store.load();
        assert_eq!(held.as_deref().and_then(|s| s.get("Version")), Some("1"));

        store.replace(Arc::new(Snapshot::new(map(&[("Version", "2")]))));
        // A reader holding the old Arc keeps seeing the old map.
        assert_eq!(held.as_deref().and_then(|s| s.get("Version")), Some("1"));
        assert_eq!(store.load().as_deref().and_then(|s| s.get("Version")), Some("2"));

        store.clear();
        assert!(store.load().is_none());
    }
}
