//! Session lifecycle and snapshot aggregation between `kraken-api` and
//! monitoring consumers (CLI, pollers).
//!
//! - **[`Collector`]**: Runs one collection cycle per
//!   [`collect()`](Collector::collect): forced re-login, then system info,
//!   network, license, streams, system load and services in that order,
//!   then an atomic swap of the [`SnapshotStore`]. Cycles never overlap.
//!
//! - **[`Snapshot`]**: Flat `key → value` map (`Network#Hostname`,
//!   `Stream_<Name>#State`, ...) built by one cycle, with
//!   [`GenericStats`] derived from it.
//!
//! - **Field tables** ([`metrics`]): Ordered `(display name, source field)`
//!   pairs, one table per device resource, plus the flattening rules in
//!   [`flatten`] (`"None"` defaulting, epoch dates, capitalized instance
//!   prefixes).
//!
//! - **[`Resolver`]**: Turns the UUIDs embedded in stream records into
//!   input/output/transcoder/metadata names, degrading to `"None"` per
//!   field when a lookup fails.

pub mod cache;
pub mod collector;
pub mod config;
pub mod control;
pub mod error;
pub mod flatten;
pub mod metrics;
pub mod resolver;
pub mod sections;
pub mod snapshot;

// ── Primary re-exports ──────────────────────────────────────────────
pub use cache::LookupCache;
pub use collector::Collector;
pub use config::{CollectorConfig, Credentials, TlsVerification};
pub use control::ControlProperty;
pub use error::{CoreError, Section};
pub use resolver::Resolver;
pub use snapshot::{GenericStats, Snapshot, SnapshotStore, StatMap};
