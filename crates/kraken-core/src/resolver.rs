// ── Cross-reference resolver ──
//
// Streams reference their input, outputs, passthru output, transcoder
// and metadata definitions by UUID. Each reference is resolved with its
// own GET; nothing is cached between streams. A failed lookup degrades
// that one value and never aborts the cycle.

use serde_json::Value;
use strum::Display;
use tracing::{debug, warn};

use kraken_api::{Error, KrakenClient, paths};

use crate::flatten::{self, NONE};
use crate::metrics::{Reference, ReferenceMetric};

/// Resource kinds that can be fetched by ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
enum Entity {
    Input,
    Output,
    Transcoder,
}

impl Entity {
    fn path(self, id: &str) -> String {
        match self {
            Self::Input => paths::input(id),
            Self::Output => paths::output(id),
            Self::Transcoder => paths::transcoder(id),
        }
    }
}

pub struct Resolver<'a> {
    client: &'a KrakenClient,
}

impl<'a> Resolver<'a> {
    pub fn new(client: &'a KrakenClient) -> Self {
        Self { client }
    }

    /// Display value for one reference field of `stream`.
    ///
    /// `None` means the key is left out of the snapshot; this only
    /// happens for metadata references that match nothing.
    pub async fn resolve(&self, reference: &ReferenceMetric, stream: &Value) -> Option<String> {
        let raw = stream.get(reference.field);
        match reference.kind {
            Reference::Input => Some(self.single(Entity::Input, raw).await),
            Reference::Passthru => Some(self.single(Entity::Output, raw).await),
            Reference::Transcoder => Some(self.single(Entity::Transcoder, raw).await),
            Reference::Outputs => Some(self.outputs(raw).await),
            Reference::Metadata => self.metadata(raw).await,
        }
    }

    /// One UUID (or `"None"`) resolved to a name.
    async fn single(&self, entity: Entity, raw: Option<&Value>) -> String {
        let id = flatten::text_of(raw);
        if id == NONE {
            return id;
        }
        match self.name_by_id(entity, &id).await {
            Ok(name) => name,
            Err(e) => {
                warn!(%entity, id = %id, error = %e, "reference lookup failed");
                NONE.to_owned()
            }
        }
    }

    /// Output UUIDs resolved and joined with `", "`. Outputs that fail
    /// to resolve are left out.
    async fn outputs(&self, raw: Option<&Value>) -> String {
        let mut names = Vec::new();
        for id in reference_ids(raw) {
            match self.name_by_id(Entity::Output, &id).await {
                Ok(name) => names.push(name),
                Err(e) => warn!(id = %id, error = %e, "output lookup failed"),
            }
        }
        flatten::or_none(Some(names.join(", ").as_str()))
    }

    /// Metadata definition names, matched against the full catalogue.
    async fn metadata(&self, raw: Option<&Value>) -> Option<String> {
        let ids = reference_ids(raw);
        if ids.is_empty() {
            return Some(NONE.to_owned());
        }

        let catalogue = match self.client.metadata().await {
            Ok(catalogue) => catalogue,
            Err(e) => {
                warn!(error = %e, "metadata catalogue lookup failed");
                return Some(NONE.to_owned());
            }
        };
        let Some(entries) = catalogue.get("metadata_list").and_then(Value::as_array) else {
            warn!("metadata catalogue has no metadata_list");
            return Some(NONE.to_owned());
        };

        let names: Vec<String> = ids
            .iter()
            .filter_map(|id| {
                entries
                    .iter()
                    .find(|entry| {
                        flatten::raw_text(entry.get("uuid")).as_deref() == Some(id.as_str())
                    })
                    .and_then(|entry| flatten::raw_text(entry.get("name")))
            })
            .collect();

        if names.is_empty() {
            debug!(?ids, "no metadata definition matched");
            return None;
        }
        Some(names.join(", "))
    }

    async fn name_by_id(&self, entity: Entity, id: &str) -> Result<String, Error> {
        let payload = match entity {
            Entity::Input => self.client.input(id).await?,
            Entity::Output => self.client.output(id).await?,
            Entity::Transcoder => self.client.transcoder(id).await?,
        };
        flatten::raw_text(payload.get("name"))
            .map(|name| flatten::or_none(Some(name.as_str())))
            .ok_or_else(|| Error::UnexpectedShape {
                path: entity.path(id),
                message: "missing name".into(),
            })
    }
}

/// UUIDs held by a reference field: an array, a lone string, or nothing.
fn reference_ids(raw: Option<&Value>) -> Vec<String> {
    match raw {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| flatten::raw_text(Some(item)))
            .filter(|id| flatten::or_none(Some(id.as_str())) != NONE)
            .collect(),
        Some(other) => {
            let id = flatten::text_of(Some(other));
            if id == NONE { Vec::new() } else { vec![id] }
        }
        None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn ids_from_array_string_and_null() {
        assert_eq!(reference_ids(Some(&json!(["u1", "u2"]))), ["u1", "u2"]);
        assert_eq!(reference_ids(Some(&json!(["u1", null, "null"]))), ["u1"]);
        assert_eq!(reference_ids(Some(&json!("u9"))), ["u9"]);
        assert!(reference_ids(Some(&json!("None"))).is_empty());
        assert!(reference_ids(Some(&json!(null))).is_empty());
        assert!(reference_ids(Some(&json!([]))).is_empty());
        assert!(reference_ids(None).is_empty());
    }

    #[test]
    fn entity_paths() {
        assert_eq!(Entity::Input.path("a"), "apis/v2/inputs/a");
        assert_eq!(Entity::Output.path("b"), "apis/v2/outputs/b");
        assert_eq!(Entity::Transcoder.to_string(), "transcoder");
    }
}
