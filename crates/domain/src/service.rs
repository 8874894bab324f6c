//! Service: a callable command exposed by an integration.
//!
//! Examples: `switch.turn_on`, `time.set_value`, `media_player.media_stop`.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::id::EntityId;

pub const TURN_ON: &str = "turn_on";
pub const TURN_OFF: &str = "turn_off";
pub const TOGGLE: &str = "toggle";
pub const SET_VALUE: &str = "set_value";
pub const MEDIA_PLAY: &str = "media_play";
pub const MEDIA_PAUSE: &str = "media_pause";
pub const MEDIA_STOP: &str = "media_stop";
pub const SPEAK: &str = "speak";

/// A request to run `service` against one entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceCall {
    pub entity_id: EntityId,
    pub service: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

impl ServiceCall {
    #[must_use]
    pub fn new(entity_id: EntityId, service: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            entity_id,
            service: service.into(),
            data,
        }
    }

    /// Read a required string field from the call data.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingServiceField`] when the field is
    /// absent or not a string.
    pub fn required_str(&self, field: &'static str) -> Result<&str, ValidationError> {
        required_str(&self.service, &self.data, field)
    }
}

/// Read a required string `field` out of service `data`.
///
/// # Errors
///
/// Returns [`ValidationError::MissingServiceField`] when the field is absent
/// or not a string.
pub fn required_str<'a>(
    service: &str,
    data: &'a serde_json::Value,
    field: &'static str,
) -> Result<&'a str, ValidationError> {
    data.get(field)
        .and_then(serde_json::Value::as_str)
        .ok_or_else(|| ValidationError::MissingServiceField {
            service: service.to_string(),
            field,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_read_required_string_field() {
        let call = ServiceCall::new(
            EntityId::new(),
            SET_VALUE,
            serde_json::json!({"value": "21:30"}),
        );
        assert_eq!(call.required_str("value").unwrap(), "21:30");
    }

    #[test]
    fn should_reject_missing_field() {
        let call = ServiceCall::new(EntityId::new(), SPEAK, serde_json::json!({}));
        assert_eq!(
            call.required_str("message"),
            Err(ValidationError::MissingServiceField {
                service: "speak".to_string(),
                field: "message",
            })
        );
    }

    #[test]
    fn should_reject_non_string_field() {
        let data = serde_json::json!({"value": 12});
        assert!(required_str(SET_VALUE, &data, "value").is_err());
    }
}
