// ── Collector ──
//
// Runs collection cycles against one appliance: fresh session, then every
// section in a fixed order, then an atomic swap of the snapshot store.
// Cycles are serialized by one async mutex held for the whole cycle.

use std::future::Future;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use kraken_api::KrakenClient;

use crate::cache::LookupCache;
use crate::config::{CollectorConfig, Credentials};
use crate::error::{CoreError, Section};
use crate::flatten;
use crate::metrics::STREAM_REFERENCES;
use crate::resolver::Resolver;
use crate::sections;
use crate::snapshot::{Snapshot, SnapshotStore, StatMap};

/// Polls one appliance and keeps the latest snapshot.
///
/// Cheaply cloneable via `Arc<CollectorInner>`. Clones share the client,
/// the store and the cycle lock, so concurrent `collect()` calls from any
/// clone run one after the other.
#[derive(Clone)]
pub struct Collector {
    inner: Arc<CollectorInner>,
}

struct CollectorInner {
    client: KrakenClient,
    credentials: Credentials,
    store: SnapshotStore,
    /// Held for the duration of a cycle (and of shutdown).
    cycle: Mutex<()>,
}

impl Collector {
    /// Build a collector and its HTTP client. Does not contact the device.
    pub fn new(config: CollectorConfig) -> Result<Self, CoreError> {
        let client = KrakenClient::new(config.url.clone(), &config.transport()).map_err(|e| {
            CoreError::Config {
                message: format!("cannot build HTTP client: {e}"),
            }
        })?;
        Ok(Self::with_client(client, config.credentials))
    }

    /// Build a collector around an existing client.
    pub fn with_client(client: KrakenClient, credentials: Credentials) -> Self {
        Self {
            inner: Arc::new(CollectorInner {
                client,
                credentials,
                store: SnapshotStore::new(),
                cycle: Mutex::new(()),
            }),
        }
    }

    pub fn client(&self) -> &KrakenClient {
        &self.inner.client
    }

    /// The last successfully collected snapshot. Never blocks on a cycle.
    pub fn latest(&self) -> Option<Arc<Snapshot>> {
        self.inner.store.load()
    }

    // ── Collection cycle ─────────────────────────────────────────────

    /// Run one full collection cycle.
    ///
    /// On any error the store keeps whatever it held before. Failed
    /// stream cross-references are logged and defaulted instead.
    pub async fn collect(&self) -> Result<Arc<Snapshot>, CoreError> {
        let _cycle = self.inner.cycle.lock().await;
        debug!("collection cycle starting");

        self.establish_session().await?;

        let client = &self.inner.client;
        let mut cache = LookupCache::new();
        let mut out = StatMap::new();

        let info = fetch(Section::SystemInfo, client.system_info()).await?;
        sections::system_info(&info, &mut cache, &mut out);

        let network = fetch(Section::Network, client.network()).await?;
        sections::network(&network, &mut cache, &mut out);

        let license = fetch(Section::License, client.license()).await?;
        sections::license(&license, &mut cache, &mut out);

        let streams = fetch(Section::Streams, client.streams()).await?;
        self.flatten_streams(&streams, &mut cache, &mut out).await;

        let load = fetch(Section::SystemLoad, client.system_load()).await?;
        sections::system_load(&load, &mut cache, &mut out);

        let rtsp = fetch(Section::Services, client.rtsp_service()).await?;
        let webserver = fetch(Section::Services, client.webserver_service()).await?;
        sections::services(&rtsp, &webserver, &mut cache, &mut out);

        let snapshot = Arc::new(Snapshot::new(out));
        self.inner.store.replace(Arc::clone(&snapshot));
        info!(keys = snapshot.len(), "collection cycle complete");
        Ok(snapshot)
    }

    /// Logout, then login. Both failure kinds abort the cycle before any
    /// section runs.
    async fn establish_session(&self) -> Result<(), CoreError> {
        let client = &self.inner.client;
        let credentials = &self.inner.credentials;

        match client
            .ensure_session(&credentials.username, &credentials.password)
            .await
        {
            Ok(true) => Ok(()),
            Ok(false) => Err(CoreError::AuthenticationFailed {
                message: "no session identifier in login response".into(),
            }),
            Err(e) => Err(CoreError::LoginUnreachable {
                url: client.base_url().to_string(),
                reason: e.to_string(),
            }),
        }
    }

    async fn flatten_streams(&self, streams: &Value, cache: &mut LookupCache, out: &mut StatMap) {
        cache.clear();
        let Some(list) = sections::stream_list(streams) else {
            debug!("streams payload has no stream_list, skipping");
            return;
        };

        let resolver = Resolver::new(&self.inner.client);
        for stream in list {
            let Some(prefix) = sections::stream_prefix(stream) else {
                warn!("stream without a name, skipping");
                continue;
            };
            sections::stream_fields(stream, &prefix, cache, out);

            for reference in STREAM_REFERENCES {
                let key = flatten::key(&prefix, reference.name);
                match resolver.resolve(reference, stream).await {
                    Some(value) => {
                        out.insert(key, value);
                    }
                    // Omitted for this stream, so nothing left by a
                    // same-named stream before it.
                    None => {
                        out.shift_remove(&key);
                    }
                }
            }
        }
        debug!(streams = list.len(), "streams flattened");
    }

    // ── Teardown ─────────────────────────────────────────────────────

    /// Log out (best-effort) and drop the last snapshot.
    ///
    /// Waits for a running cycle to finish first.
    pub async fn shutdown(&self) {
        let _cycle = self.inner.cycle.lock().await;
        if self.inner.client.session().is_some() {
            self.inner.client.logout().await;
        }
        self.inner.store.clear();
        debug!("collector shut down");
    }
}

/// Await one section request, tagging a failure with its section.
async fn fetch(
    section: Section,
    request: impl Future<Output = Result<Value, kraken_api::Error>>,
) -> Result<Value, CoreError> {
    request.await.map_err(|source| {
        warn!(%section, error = %source, "section retrieval failed");
        CoreError::ResourceUnreachable { section, source }
    })
}
