// Appliance data endpoints
//
// One method per fixed REST path. Payloads come back as loosely-typed
// JSON because field sets vary across firmware releases; flattening
// happens in kraken-core.

use serde_json::Value;
use tracing::debug;

use crate::client::KrakenClient;
use crate::error::Error;
use crate::paths;

impl KrakenClient {
    /// Appliance clock and firmware version.
    ///
    /// `GET apis/v2/systeminfo`
    pub async fn system_info(&self) -> Result<Value, Error> {
        debug!("fetching system info");
        self.get_json(paths::SYSTEM_INFO).await
    }

    /// Global network settings plus the `nics` array.
    ///
    /// `GET apis/v2/system/network`
    pub async fn network(&self) -> Result<Value, Error> {
        debug!("fetching network info");
        self.get_json(paths::NETWORK).await
    }

    /// `GET apis/v2/license`
    pub async fn license(&self) -> Result<Value, Error> {
        debug!("fetching license info");
        self.get_json(paths::LICENSE).await
    }

    /// All configured streams under `stream_list`.
    ///
    /// `GET apis/v2/streams`
    pub async fn streams(&self) -> Result<Value, Error> {
        debug!("fetching streams");
        self.get_json(paths::STREAMS).await
    }

    /// The full metadata catalogue under `metadata_list`.
    ///
    /// `GET apis/v2/metadata`
    pub async fn metadata(&self) -> Result<Value, Error> {
        debug!("fetching metadata catalogue");
        self.get_json(paths::METADATA).await
    }

    /// `GET apis/v2/system/load`
    pub async fn system_load(&self) -> Result<Value, Error> {
        debug!("fetching system load");
        self.get_json(paths::SYSTEM_LOAD).await
    }

    /// `GET apis/v2/system/services/rtspserver`
    pub async fn rtsp_service(&self) -> Result<Value, Error> {
        debug!("fetching RTSP service");
        self.get_json(paths::RTSP_SERVICE).await
    }

    /// `GET apis/v2/system/services/webserver`
    pub async fn webserver_service(&self) -> Result<Value, Error> {
        debug!("fetching web server service");
        self.get_json(paths::WEBSERVER_SERVICE).await
    }

    /// `GET apis/v2/inputs/{id}`
    pub async fn input(&self, id: &str) -> Result<Value, Error> {
        debug!(id, "fetching input");
        self.get_json(&paths::input(id)).await
    }

    /// `GET apis/v2/outputs/{id}`
    pub async fn output(&self, id: &str) -> Result<Value, Error> {
        debug!(id, "fetching output");
        self.get_json(&paths::output(id)).await
    }

    /// `GET apis/v2/transcoders/{id}`
    pub async fn transcoder(&self, id: &str) -> Result<Value, Error> {
        debug!(id, "fetching transcoder");
        self.get_json(&paths::transcoder(id)).await
    }
}
