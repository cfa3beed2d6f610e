// Fixed REST paths of the appliance management API.
//
// Data paths are relative so they resolve against the configured base URL.

/// `POST` with `{"username", "password"}`.
pub const LOGIN: &str = "apis/v2/login";
/// `GET`, invalidates the current session identifier.
pub const LOGOUT: &str = "apis/v2/logout";

pub const SYSTEM_INFO: &str = "apis/v2/systeminfo";
pub const NETWORK: &str = "apis/v2/system/network";
pub const LICENSE: &str = "apis/v2/license";
pub const STREAMS: &str = "apis/v2/streams";
pub const METADATA: &str = "apis/v2/metadata";
/// CPU, memory, uptime and (on GPU models) per-GPU load.
pub const SYSTEM_LOAD: &str = "apis/v2/system/load";
pub const RTSP_SERVICE: &str = "apis/v2/system/services/rtspserver";
pub const WEBSERVER_SERVICE: &str = "apis/v2/system/services/webserver";

const INPUTS: &str = "apis/v2/inputs";
const OUTPUTS: &str = "apis/v2/outputs";
const TRANSCODERS: &str = "apis/v2/transcoders";

/// `GET apis/v2/inputs/{id}`
pub fn input(id: &str) -> String {
    by_id(INPUTS, id)
}

/// `GET apis/v2/outputs/{id}`. Passthru outputs live here too.
pub fn output(id: &str) -> String {
    by_id(OUTPUTS, id)
}

/// `GET apis/v2/transcoders/{id}`
pub fn transcoder(id: &str) -> String {
    by_id(TRANSCODERS, id)
}

fn by_id(collection: &str, id: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(id.as_bytes()).collect();
    format!("{collection}/{encoded}")
}
