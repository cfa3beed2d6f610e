//! Declarative field tables, one per device resource.
//!
//! Each entry maps the display name used in snapshot keys to the JSON
//! field it is read from. `field` may be a dotted path into nested
//! objects (`memory.memload`). Table order is the order keys are written.

/// How a metric's raw text is rendered into the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Render {
    /// Raw text, defaulted to `"None"`.
    Text,
    /// Epoch seconds rendered as a UTC date.
    EpochDate,
}

/// One (display name, source field) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Metric {
    pub name: &'static str,
    pub field: &'static str,
    pub render: Render,
}

impl Metric {
    const fn text(name: &'static str, field: &'static str) -> Self {
        Self {
            name,
            field,
            render: Render::Text,
        }
    }

    const fn date(name: &'static str, field: &'static str) -> Self {
        Self {
            name,
            field,
            render: Render::EpochDate,
        }
    }
}

/// Stream fields holding UUIDs that must be resolved to names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reference {
    /// Single input UUID.
    Input,
    /// Array of output UUIDs.
    Outputs,
    /// Single passthru output UUID.
    Passthru,
    /// Single transcoder UUID.
    Transcoder,
    /// Array of metadata definition UUIDs.
    Metadata,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferenceMetric {
    pub name: &'static str,
    pub field: &'static str,
    pub kind: Reference,
}

// ── Key prefixes ────────────────────────────────────────────────────

pub const NETWORK_PREFIX: &str = "Network";
pub const NETWORK_INTERFACE_PREFIX: &str = "NetworkInterface";
pub const LICENSE_PREFIX: &str = "License";
pub const STREAM_PREFIX: &str = "Stream";
pub const SYSTEM_PREFIX: &str = "System";
pub const GPU_PREFIX: &str = "SystemGPU";
pub const SERVICE_PREFIX: &str = "Service";

pub const RTSP_SERVER_PORT: &str = "RtspServerPort";
pub const WEBSERVER_INTERFACES: &str = "WebServerInterfaces";

// ── Tables ──────────────────────────────────────────────────────────

/// `apis/v2/systeminfo`; written without a prefix.
pub const SYSTEM: &[Metric] = &[
    Metric::date("CurrentTime", "currenttime"),
    Metric::text("Version", "version"),
];

/// `apis/v2/system/network`, top-level settings.
pub const NETWORK: &[Metric] = &[
    Metric::text("DefaultInterface", "defaultInterface"),
    Metric::text("DNSServer0", "dnsServer-0"),
    Metric::text("Hostname", "hostname"),
    Metric::text("IPForward", "ipForward"),
    Metric::text("NTPAddress", "ntpAddress"),
    Metric::text("SubnetMask", "subnetMask"),
];

/// One entry of the `nics` array.
pub const NETWORK_INTERFACE: &[Metric] = &[
    Metric::text("Address", "addressing"),
    Metric::text("Gateway", "gateway"),
    Metric::text("IPAddress", "ipAddress"),
    Metric::text("MACAddress", "macAddress"),
    Metric::text("MTU", "mtu"),
    Metric::text("Name", "name"),
    Metric::text("PeerDNS", "peerDns"),
    Metric::text("Speed", "speed"),
    Metric::text("SubnetMask", "subnetMask"),
];

/// `apis/v2/license`
pub const LICENSE: &[Metric] = &[
    Metric::text("ActiveBypassSessions", "active_bypass_sessions"),
    Metric::text("ActiveTranscoderSessions", "active_transcoder_sessions"),
    Metric::date("CreationDate", "creation_date"),
    Metric::date("Expiration", "expiration"),
    Metric::text("IsLicenseValid", "is_license_valid"),
    Metric::text("LicenseMACAddress", "license_mac_address"),
    Metric::text("Max_Encoders", "max_encoders"),
    Metric::text("SystemInstanceUUID", "system_instance_uuid"),
    Metric::text("VersionLimit", "version_limit"),
    Metric::text("VersionLimitText", "version_limit_text"),
];

/// Plain fields of one `stream_list` entry. `Mode` gets rewritten.
pub const STREAM: &[Metric] = &[
    Metric::text("StreamID", "uuid"),
    Metric::text("StreamName", "name"),
    Metric::text("Description", "description"),
    Metric::text("AUTO_START", "auto_start"),
    Metric::text("Log_To_File", "log_to_file"),
    Metric::text("Mode", "mode"),
    Metric::text("State", "state"),
    Metric::text("status", "status"),
    Metric::text("sub_status", "sub_status"),
];

pub const STREAM_MODE: &str = "Mode";

/// Cross-referenced fields of one `stream_list` entry.
pub const STREAM_REFERENCES: &[ReferenceMetric] = &[
    ReferenceMetric {
        name: "Input",
        field: "input",
        kind: Reference::Input,
    },
    ReferenceMetric {
        name: "Output",
        field: "outputs",
        kind: Reference::Outputs,
    },
    ReferenceMetric {
        name: "Passthru",
        field: "passthru",
        kind: Reference::Passthru,
    },
    ReferenceMetric {
        name: "Transcoder",
        field: "transcoder",
        kind: Reference::Transcoder,
    },
    ReferenceMetric {
        name: "Metadata",
        field: "metadatas",
        kind: Reference::Metadata,
    },
];

/// `apis/v2/system/load`
pub const LOAD: &[Metric] = &[
    Metric::text("SystemMemoryLoad", "memory.memload"),
    Metric::text("SystemCPULoad", "cpu.cpuload"),
    Metric::text("SystemUptime", "system.uptime"),
];

pub const CPU_LOAD: &str = "SystemCPULoad";
pub const UPTIME: &str = "SystemUptime";

/// One entry of the `gpus` array in `apis/v2/system/load`.
pub const GPU: &[Metric] = &[
    Metric::text("SystemGPUsVideoClock", "videoClock"),
    Metric::text("SystemGPUsTemperature", "temperature"),
    Metric::text("SystemGPUsName", "name"),
    Metric::text("SystemGPUsSerial", "serial"),
    Metric::text("SystemGPUsMemoryUsed", "memoryUsed"),
    Metric::text("SystemGPUsMemoryTotal", "memoryTotal"),
];
