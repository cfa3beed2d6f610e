// ── Controls ──
//
// The appliance accepts no control writes from the collector. Requests
// are validated and logged so callers get a stable contract.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::collector::Collector;
use crate::error::CoreError;

/// One requested property change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlProperty {
    pub property: String,
    pub value: String,
}

impl ControlProperty {
    pub fn new(property: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            value: value.into(),
        }
    }
}

impl Collector {
    /// Accept a control request. Nothing is sent to the device.
    pub fn apply_control(&self, control: &ControlProperty) -> Result<(), CoreError> {
        debug!(
            device = %self.client().base_url(),
            property = %control.property,
            value = %control.value,
            "control requested; device controls are not supported, ignoring"
        );
        Ok(())
    }

    /// Apply a batch of controls in order.
    ///
    /// An empty batch is rejected. A failing entry is logged and the rest
    /// are still applied.
    pub fn apply_controls(&self, controls: &[ControlProperty]) -> Result<(), CoreError> {
        if controls.is_empty() {
            return Err(CoreError::ValidationFailed {
                message: "control properties cannot be empty".into(),
            });
        }
        for control in controls {
            if let Err(e) = self.apply_control(control) {
                warn!(property = %control.property, error = %e, "control failed");
            }
        }
        Ok(())
    }
}
