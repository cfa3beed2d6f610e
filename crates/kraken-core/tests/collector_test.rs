#![allow(clippy::unwrap_used)]
// Integration tests for `Collector` against a wiremock appliance.

use std::time::Duration;

use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::{Value, json};
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use kraken_api::KrakenClient;
use kraken_core::{
    Collector, CollectorConfig, ControlProperty, CoreError, Credentials, Section, TlsVerification,
};

const TOKEN: &str = "6c1f0d2e-8b3a-4f5c-9e7d-1a2b3c4d5e6f";

// ── Fixture ─────────────────────────────────────────────────────────

fn device() -> Vec<(&'static str, Value)> {
    vec![
        (
            "/apis/v2/systeminfo",
            json!({ "result": true, "currenttime": 1_700_000_000, "version": "3.2.0" }),
        ),
        (
            "/apis/v2/system/network",
            json!({
                "hostname": "kraken-01",
                "defaultInterface": "eth0",
                "nics": [
                    { "name": "eth0", "ipAddress": "10.0.0.5", "mtu": 1500 },
                    { "name": "eth1", "ipAddress": "192.168.1.9" },
                ],
            }),
        ),
        (
            "/apis/v2/license",
            json!({ "expiration": 1_735_689_600, "max_encoders": 8, "is_license_valid": true }),
        ),
        (
            "/apis/v2/streams",
            json!({
                "stream_list": [
                    {
                        "uuid": "s-1",
                        "name": "main feed",
                        "mode": "iorouter",
                        "state": "running",
                        "input": "in-1",
                        "outputs": ["u1", "u2"],
                        "passthru": "None",
                        "transcoder": "tc-1",
                        "metadatas": ["m-1"],
                    },
                    {
                        "uuid": "s-2",
                        "name": "backup",
                        "mode": "live",
                        "input": null,
                        "outputs": [],
                        "metadatas": [],
                    },
                ],
            }),
        ),
        (
            "/apis/v2/metadata",
            json!({
                "metadata_list": [
                    { "uuid": "m-1", "name": "KLV" },
                    { "uuid": "m-2", "name": "SCTE-35" },
                ],
            }),
        ),
        ("/apis/v2/inputs/in-1", json!({ "name": "Camera 1" })),
        ("/apis/v2/outputs/u1", json!({ "name": "OutA" })),
        ("/apis/v2/outputs/u2", json!({ "name": "OutB" })),
        ("/apis/v2/transcoders/tc-1", json!({ "name": "H264 720p" })),
        (
            "/apis/v2/system/load",
            json!({
                "memory": { "memload": 40 },
                "cpu": { "cpuload": 12.5 },
                "system": { "uptime": 3600 },
            }),
        ),
        ("/apis/v2/system/services/rtspserver", json!({ "rtsp_port": 554 })),
        (
            "/apis/v2/system/services/webserver",
            json!({ "data": { "listeners": { "interfaces": ["eth0"] } } }),
        ),
    ]
}

async fn mount_session(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/apis/v2/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Set-Cookie", format!("id={TOKEN}; Path=/; Secure; HttpOnly").as_str()),
        )
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/apis/v2/logout"))
        .respond_with(ResponseTemplate::new(200))
        .mount(server)
        .await;
}

/// Mount the session endpoints and every fixture path not in `except`.
async fn mount_device(server: &MockServer, except: &[&str]) {
    mount_session(server).await;
    for (p, body) in device() {
        if except.contains(&p) {
            continue;
        }
        Mock::given(method("GET"))
            .and(path(p))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(server)
            .await;
    }
}

fn credentials() -> Credentials {
    Credentials {
        username: "admin".into(),
        password: SecretString::from("s3cret".to_string()),
    }
}

fn collector_for(uri: &str) -> Collector {
    let client = KrakenClient::with_client(reqwest::Client::new(), Url::parse(uri).unwrap());
    Collector::with_client(client, credentials())
}

async fn setup(except: &[&str]) -> (MockServer, Collector) {
    let server = MockServer::start().await;
    mount_device(&server, except).await;
    let collector = collector_for(&server.uri());
    (server, collector)
}

async fn request_paths(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .map(|r| r.url.path().to_owned())
        .collect()
}

// ── Full cycle ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_collect_flattens_every_section() {
    let (_server, collector) = setup(&[]).await;

    let snap = collector.collect().await.unwrap();

    let expected = [
        ("CurrentTime", "Nov 14, 2023, 10:13 PM"),
        ("Version", "3.2.0"),
        ("Network#Hostname", "kraken-01"),
        ("Network#DefaultInterface", "eth0"),
        ("Network#NTPAddress", "None"),
        ("NetworkInterface_Eth0#IPAddress", "10.0.0.5"),
        ("NetworkInterface_Eth0#MTU", "1500"),
        ("NetworkInterface_Eth1#IPAddress", "192.168.1.9"),
        ("NetworkInterface_Eth1#MTU", "None"),
        ("License#Expiration", "Jan 1, 2025, 12:00 AM"),
        ("License#CreationDate", "None"),
        ("License#Max_Encoders", "8"),
        ("Stream_Main feed#StreamID", "s-1"),
        ("Stream_Main feed#Mode", "Bypass"),
        ("Stream_Main feed#State", "running"),
        ("Stream_Main feed#Input", "Camera 1"),
        ("Stream_Main feed#Output", "OutA, OutB"),
        ("Stream_Main feed#Passthru", "None"),
        ("Stream_Main feed#Transcoder", "H264 720p"),
        ("Stream_Main feed#Metadata", "KLV"),
        ("Stream_Backup#Mode", "Live"),
        ("Stream_Backup#Input", "None"),
        ("Stream_Backup#Output", "None"),
        ("Stream_Backup#Transcoder", "None"),
        ("Stream_Backup#Metadata", "None"),
        ("System#SystemMemoryLoad", "40"),
        ("System#SystemCPULoad", "12.5"),
        ("System#SystemUptime", "3600"),
        ("Service#RtspServerPort", "554"),
        ("Service#WebServerInterfaces", "eth0"),
    ];
    for (key, value) in expected {
        assert_eq!(snap.get(key), Some(value), "key {key}");
    }

    let generic = snap.generic();
    assert_eq!(generic.cpu_percentage, Some(12.5));
    assert_eq!(generic.uptime, Some(Duration::from_secs(3600)));

    let latest = collector.latest().unwrap();
    assert_eq!(latest.values(), snap.values());
}

#[tokio::test]
async fn test_cycle_logs_out_then_in_before_sections() {
    let (server, collector) = setup(&[]).await;

    collector.collect().await.unwrap();

    let paths = request_paths(&server).await;
    assert_eq!(&paths[..3], ["/apis/v2/logout", "/apis/v2/login", "/apis/v2/systeminfo"]);
    assert_eq!(paths.last().map(String::as_str), Some("/apis/v2/system/services/webserver"));
}

#[tokio::test]
async fn test_collect_is_idempotent() {
    let (_server, collector) = setup(&[]).await;

    let first = collector.collect().await.unwrap();
    let second = collector.collect().await.unwrap();

    assert_eq!(first.values(), second.values());
}

// ── Login failures ──────────────────────────────────────────────────

#[tokio::test]
async fn test_rejected_login_keeps_previous_snapshot() {
    let (server, collector) = setup(&[]).await;
    let before = collector.collect().await.unwrap();

    server.reset().await;
    Mock::given(method("POST"))
        .and(path("/apis/v2/login"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/apis/v2/logout"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let err = collector.collect().await.unwrap_err();

    assert!(matches!(err, CoreError::AuthenticationFailed { .. }), "got: {err:?}");
    assert!(err.is_login_failure());
    assert_eq!(collector.latest().unwrap().values(), before.values());
    assert!(!request_paths(&server).await.contains(&"/apis/v2/systeminfo".to_owned()));
}

#[tokio::test]
async fn test_unreachable_login_is_login_failure() {
    let collector = collector_for("http://127.0.0.1:1");

    let err = collector.collect().await.unwrap_err();

    assert!(matches!(err, CoreError::LoginUnreachable { .. }), "got: {err:?}");
    assert!(err.is_login_failure());
    assert!(collector.latest().is_none());
}

#[tokio::test]
async fn test_login_transport_failure_keeps_previous_snapshot() {
    let server = MockServer::start().await;
    mount_device(&server, &[]).await;
    let http = reqwest::Client::builder()
        .timeout(Duration::from_millis(500))
        .build()
        .unwrap();
    let client = KrakenClient::with_client(http, Url::parse(&server.uri()).unwrap());
    let collector = Collector::with_client(client, credentials());
    let before = collector.collect().await.unwrap();

    server.reset().await;
    Mock::given(method("POST"))
        .and(path("/apis/v2/login"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    let err = collector.collect().await.unwrap_err();

    assert!(matches!(err, CoreError::LoginUnreachable { .. }), "got: {err:?}");
    assert_eq!(collector.latest().unwrap().values(), before.values());
    assert!(!request_paths(&server).await.contains(&"/apis/v2/systeminfo".to_owned()));
}

// ── Section failures ────────────────────────────────────────────────

#[tokio::test]
async fn test_section_failure_aborts_cycle() {
    let (server, collector) = setup(&["/apis/v2/license"]).await;
    Mock::given(method("GET"))
        .and(path("/apis/v2/license"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = collector.collect().await.unwrap_err();

    assert_eq!(err.section(), Some(Section::License));
    assert_eq!(err.to_string(), "Error when retrieving license info");
    assert!(collector.latest().is_none());
    assert!(!request_paths(&server).await.contains(&"/apis/v2/streams".to_owned()));
}

#[tokio::test]
async fn test_malformed_section_payload_aborts_cycle() {
    let (server, collector) = setup(&["/apis/v2/system/load"]).await;
    Mock::given(method("GET"))
        .and(path("/apis/v2/system/load"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let err = collector.collect().await.unwrap_err();

    assert_eq!(err.section(), Some(Section::SystemLoad));
}

#[tokio::test]
async fn test_failed_reference_lookup_degrades_to_none() {
    let (server, collector) = setup(&["/apis/v2/inputs/in-1", "/apis/v2/outputs/u2"]).await;
    for p in ["/apis/v2/inputs/in-1", "/apis/v2/outputs/u2"] {
        Mock::given(method("GET"))
            .and(path(p))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
    }

    let snap = collector.collect().await.unwrap();

    assert_eq!(snap.get("Stream_Main feed#Input"), Some("None"));
    assert_eq!(snap.get("Stream_Main feed#Output"), Some("OutA"));
    assert_eq!(snap.get("Stream_Main feed#Transcoder"), Some("H264 720p"));
}

// ── Metadata ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_unmatched_metadata_omits_key() {
    let (server, collector) = setup(&["/apis/v2/streams"]).await;
    Mock::given(method("GET"))
        .and(path("/apis/v2/streams"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "stream_list": [
                { "name": "ghost", "metadatas": ["m-9"] },
                { "name": "pair", "metadatas": ["m-1", "m-2"] },
            ],
        })))
        .mount(&server)
        .await;

    let snap = collector.collect().await.unwrap();

    assert_eq!(snap.get("Stream_Ghost#Metadata"), None);
    assert_eq!(snap.get("Stream_Ghost#Input"), Some("None"));
    assert_eq!(snap.get("Stream_Pair#Metadata"), Some("KLV, SCTE-35"));
}

#[tokio::test]
async fn test_same_named_streams_do_not_mix_fields() {
    let (server, collector) = setup(&["/apis/v2/streams"]).await;
    Mock::given(method("GET"))
        .and(path("/apis/v2/streams"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "stream_list": [
                {
                    "name": "feed",
                    "description": "from first",
                    "input": "in-1",
                    "metadatas": ["m-1"],
                },
                { "name": "Feed", "state": "stopped", "metadatas": ["m-9"] },
            ],
        })))
        .mount(&server)
        .await;

    let snap = collector.collect().await.unwrap();

    assert_eq!(snap.get("Stream_Feed#State"), Some("stopped"));
    assert_eq!(snap.get("Stream_Feed#Description"), Some("None"));
    assert_eq!(snap.get("Stream_Feed#Input"), Some("None"));
    assert_eq!(snap.get("Stream_Feed#Metadata"), None);
}

#[tokio::test]
async fn test_metadata_catalogue_fetched_per_stream() {
    let (server, collector) = setup(&[]).await;

    collector.collect().await.unwrap();

    // "main feed" references metadata; "backup" has an empty list.
    let fetched = request_paths(&server)
        .await
        .iter()
        .filter(|p| p.as_str() == "/apis/v2/metadata")
        .count();
    assert_eq!(fetched, 1);
}

// ── Concurrency ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_concurrent_cycles_do_not_interleave() {
    let (server, collector) = setup(&[]).await;
    let other = collector.clone();

    let (a, b) = tokio::join!(collector.collect(), other.collect());
    a.unwrap();
    b.unwrap();

    let paths = request_paths(&server).await;
    let (first, second) = paths.split_at(paths.len() / 2);
    assert_eq!(first, second);
    assert_eq!(first[0], "/apis/v2/logout");
}

// ── Teardown & controls ─────────────────────────────────────────────

#[tokio::test]
async fn test_shutdown_logs_out_and_clears_store() {
    let (server, collector) = setup(&[]).await;
    collector.collect().await.unwrap();

    collector.shutdown().await;

    assert!(collector.latest().is_none());
    assert!(collector.client().session().is_none());
    let paths = request_paths(&server).await;
    assert_eq!(paths.last().map(String::as_str), Some("/apis/v2/logout"));
}

#[test]
fn test_unreadable_ca_cert_is_config_error() {
    let mut config = CollectorConfig::new(Url::parse("https://10.0.0.5").unwrap(), credentials());
    config.tls = TlsVerification::CustomCa("/nonexistent/kraken-ca.pem".into());

    let err = Collector::new(config).err().unwrap();

    assert!(matches!(err, CoreError::Config { .. }), "got: {err:?}");
    assert!(err.to_string().contains("CA cert"), "got: {err}");
}

#[tokio::test]
async fn test_apply_controls_rejects_empty_list() {
    let collector = collector_for("http://127.0.0.1:1");

    let err = collector.apply_controls(&[]).unwrap_err();
    assert!(matches!(err, CoreError::ValidationFailed { .. }), "got: {err:?}");

    collector
        .apply_controls(&[ControlProperty::new("Stream_Main feed#State", "stopped")])
        .unwrap();
}
