//! Per-section flatteners.
//!
//! Each function takes one endpoint payload, rebuilds the lookup cache
//! from it and writes the section's keys into the snapshot under
//! construction. None of them do I/O; stream cross-references are
//! resolved by the collector once the plain stream fields are written.

use serde_json::Value;
use tracing::{debug, warn};

use crate::cache::LookupCache;
use crate::flatten;
use crate::metrics::{
    self, GPU_PREFIX, LICENSE_PREFIX, Metric, NETWORK_INTERFACE_PREFIX, NETWORK_PREFIX,
    RTSP_SERVER_PORT, SERVICE_PREFIX, STREAM_MODE, STREAM_PREFIX, SYSTEM_PREFIX,
    WEBSERVER_INTERFACES,
};
use crate::snapshot::StatMap;

/// Write every metric of `table` for `scope`, keyed under `prefix`.
///
/// An empty prefix writes bare metric names.
fn write_table(
    out: &mut StatMap,
    cache: &LookupCache,
    prefix: &str,
    scope: &str,
    table: &[Metric],
) {
    for metric in table {
        let value = flatten::render(metric, cache.get(scope, metric.name));
        let key = if prefix.is_empty() {
            metric.name.to_owned()
        } else {
            flatten::key(prefix, metric.name)
        };
        out.insert(key, value);
    }
}

/// Non-empty scalar `name` of an instance record.
fn instance_name(record: &Value) -> Option<String> {
    flatten::raw_text(record.get("name")).filter(|n| !n.is_empty())
}

// ── System info ─────────────────────────────────────────────────────

/// `CurrentTime` and `Version`, written only when the payload's `result`
/// flag is set.
pub fn system_info(info: &Value, cache: &mut LookupCache, out: &mut StatMap) {
    cache.clear();
    if !flatten::is_truthy(info.get("result")) {
        debug!("system info reported no result, skipping");
        return;
    }
    cache.fill("", metrics::SYSTEM, info);
    write_table(out, cache, "", "", metrics::SYSTEM);
}

// ── Network ─────────────────────────────────────────────────────────

/// Global settings, one block per NIC, and the NIC list as the initial
/// value of `Service#WebServerInterfaces`.
pub fn network(net: &Value, cache: &mut LookupCache, out: &mut StatMap) {
    cache.clear();
    let Some(nics) = net.get("nics").and_then(Value::as_array) else {
        debug!("network payload has no nics array, skipping");
        return;
    };

    cache.fill("", metrics::NETWORK, net);
    write_table(out, cache, NETWORK_PREFIX, "", metrics::NETWORK);

    let mut names = Vec::with_capacity(nics.len());
    for nic in nics {
        let Some(name) = instance_name(nic) else {
            warn!("network interface without a name, skipping");
            continue;
        };
        cache.fill(&name, metrics::NETWORK_INTERFACE, nic);
        let prefix = flatten::instance_prefix(NETWORK_INTERFACE_PREFIX, &name);
        write_table(out, cache, &prefix, &name, metrics::NETWORK_INTERFACE);
        names.push(name);
    }

    out.insert(
        flatten::key(SERVICE_PREFIX, WEBSERVER_INTERFACES),
        flatten::or_none(Some(names.join(", ").as_str())),
    );
}

// ── License ─────────────────────────────────────────────────────────

pub fn license(license: &Value, cache: &mut LookupCache, out: &mut StatMap) {
    cache.clear();
    cache.fill("", metrics::LICENSE, license);
    write_table(out, cache, LICENSE_PREFIX, "", metrics::LICENSE);
}

// ── Streams ─────────────────────────────────────────────────────────

/// Entries of `stream_list`, or `None` when the payload has none.
pub fn stream_list(streams: &Value) -> Option<&[Value]> {
    streams
        .get("stream_list")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
}

/// Key prefix for a stream (`Stream_<Name>`), or `None` for an unnamed one.
pub fn stream_prefix(stream: &Value) -> Option<String> {
    instance_name(stream).map(|name| flatten::instance_prefix(STREAM_PREFIX, &name))
}

/// Plain (non-reference) fields of one stream under `prefix`.
///
/// The cache is not cleared here: all streams of a section share it,
/// scoped by prefix.
pub fn stream_fields(stream: &Value, prefix: &str, cache: &mut LookupCache, out: &mut StatMap) {
    cache.fill(prefix, metrics::STREAM, stream);
    for metric in metrics::STREAM {
        let raw = cache.get(prefix, metric.name);
        let value = if metric.name == STREAM_MODE {
            flatten::rewrite_mode(&raw)
        } else {
            flatten::render(metric, raw)
        };
        out.insert(flatten::key(prefix, metric.name), value);
    }
}

// ── System load ─────────────────────────────────────────────────────

/// Memory, CPU and uptime under `System#`, plus one block per GPU.
/// Written only when the payload carries a `memory` object.
pub fn system_load(load: &Value, cache: &mut LookupCache, out: &mut StatMap) {
    cache.clear();
    if load.get("memory").is_none() {
        debug!("system load payload has no memory block, skipping");
        return;
    }

    cache.fill("", metrics::LOAD, load);
    write_table(out, cache, SYSTEM_PREFIX, "", metrics::LOAD);

    let Some(gpus) = load.get("gpus").and_then(Value::as_array) else {
        return;
    };
    for (index, gpu) in gpus.iter().enumerate() {
        let name = instance_name(gpu).unwrap_or_else(|| format!("Gpu{index}"));
        cache.fill(&name, metrics::GPU, gpu);
        let prefix = flatten::instance_prefix(GPU_PREFIX, &name);
        write_table(out, cache, &prefix, &name, metrics::GPU);
    }
}

// ── Services ────────────────────────────────────────────────────────

/// RTSP port, and the web server's listening interfaces when the
/// service reports them. The latter replaces the NIC list written by
/// the network section.
pub fn services(rtsp: &Value, webserver: &Value, cache: &mut LookupCache, out: &mut StatMap) {
    cache.clear();
    if let Some(port) = flatten::raw_text(rtsp.get("rtsp_port")) {
        cache.insert("", RTSP_SERVER_PORT, port);
    }
    out.insert(
        flatten::key(SERVICE_PREFIX, RTSP_SERVER_PORT),
        cache.get("", RTSP_SERVER_PORT),
    );

    if let Some(interfaces) = listener_interfaces(webserver) {
        out.insert(flatten::key(SERVICE_PREFIX, WEBSERVER_INTERFACES), interfaces);
    }
}

fn listener_interfaces(webserver: &Value) -> Option<String> {
    match flatten::lookup(webserver, "data.listeners.interfaces")? {
        Value::Array(items) => {
            let names: Vec<String> = items
                .iter()
                .filter_map(|item| flatten::raw_text(Some(item)))
                .collect();
            Some(flatten::or_none(Some(names.join(", ").as_str())))
        }
        other => flatten::raw_text(Some(other)).map(|t| flatten::or_none(Some(t.as_str()))),
    }
}
