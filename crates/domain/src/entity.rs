//! Entity: the central state-holding concept in playguard.
//!
//! An entity represents a single observable/controllable aspect of a device
//! (e.g., a speaker's playback state, a switch, a configured time).
//!
//! Entities are addressed two ways: by their stable [`EntityId`] and by a
//! human-readable `entity_id` string of the form `domain.object_id`
//! (`media_player.kitchen_echo`).

mod attribute_value;
mod state;

pub use attribute_value::AttributeValue;
pub use state::EntityState;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{PlayGuardError, ValidationError};
use crate::id::{DeviceId, EntityId};
use crate::time::{Timestamp, now};

/// Entity domain for voice-assistant media players.
pub const MEDIA_PLAYER_DOMAIN: &str = "media_player";

/// A state holder exposed by a device.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub device_id: DeviceId,
    pub entity_id: String,
    pub friendly_name: String,
    pub state: EntityState,
    pub attributes: HashMap<String, AttributeValue>,
    pub last_changed: Timestamp,
    pub last_updated: Timestamp,
}

impl Entity {
    /// Create a builder for constructing an [`Entity`].
    #[must_use]
    pub fn builder() -> EntityBuilder {
        EntityBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`PlayGuardError::Validation`] when:
    /// - `entity_id` is empty ([`ValidationError::EmptyEntityId`])
    /// - `entity_id` is not `domain.object_id` ([`ValidationError::MalformedEntityId`])
    /// - `friendly_name` is empty ([`ValidationError::EmptyName`])
    pub fn validate(&self) -> Result<(), PlayGuardError> {
        if self.entity_id.is_empty() {
            return Err(ValidationError::EmptyEntityId.into());
        }
        match self.entity_id.split_once('.') {
            Some((domain, object_id)) if !domain.is_empty() && !object_id.is_empty() => {}
            _ => return Err(ValidationError::MalformedEntityId(self.entity_id.clone()).into()),
        }
        if self.friendly_name.is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        Ok(())
    }

    /// The part of `entity_id` before the first dot (`media_player`).
    #[must_use]
    pub fn domain(&self) -> &str {
        split_entity_id(&self.entity_id).0
    }

    /// The part of `entity_id` after the first dot (`kitchen_echo`).
    #[must_use]
    pub fn object_id(&self) -> &str {
        split_entity_id(&self.entity_id).1
    }

    /// Whether this entity is a media player.
    #[must_use]
    pub fn is_media_player(&self) -> bool {
        self.domain() == MEDIA_PLAYER_DOMAIN
    }

    /// Set a new state. `last_changed` only moves when the state differs.
    pub fn update_state(&mut self, state: EntityState, at: Timestamp) {
        if self.state != state {
            self.last_changed = at;
        }
        self.state = state;
        self.last_updated = at;
    }

    /// Look up an attribute by key.
    #[must_use]
    pub fn get_attribute(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes.get(key)
    }

    /// Insert or replace an attribute.
    pub fn set_attribute(&mut self, key: impl Into<String>, value: AttributeValue) {
        self.attributes.insert(key.into(), value);
    }
}

/// Split `domain.object_id`; an id without a dot is all object id.
#[must_use]
pub fn split_entity_id(entity_id: &str) -> (&str, &str) {
    entity_id.split_once('.').unwrap_or(("", entity_id))
}

/// Step-by-step builder for [`Entity`].
#[derive(Debug, Default)]
pub struct EntityBuilder {
    id: Option<EntityId>,
    device_id: Option<DeviceId>,
    entity_id: Option<String>,
    friendly_name: Option<String>,
    state: EntityState,
    attributes: HashMap<String, AttributeValue>,
}

impl EntityBuilder {
    #[must_use]
    pub fn id(mut self, id: EntityId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn device_id(mut self, device_id: DeviceId) -> Self {
        self.device_id = Some(device_id);
        self
    }

    #[must_use]
    pub fn entity_id(mut self, entity_id: impl Into<String>) -> Self {
        self.entity_id = Some(entity_id.into());
        self
    }

    #[must_use]
    pub fn friendly_name(mut self, friendly_name: impl Into<String>) -> Self {
        self.friendly_name = Some(friendly_name.into());
        self
    }

    #[must_use]
    pub fn state(mut self, state: EntityState) -> Self {
        self.state = state;
        self
    }

    #[must_use]
    pub fn attribute(mut self, key: impl Into<String>, value: AttributeValue) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }

    /// Consume the builder, validate, and return an [`Entity`].
    ///
    /// # Errors
    ///
    /// Returns [`PlayGuardError::Validation`] if required fields are missing or malformed.
    pub fn build(self) -> Result<Entity, PlayGuardError> {
        let ts = now();
        let entity = Entity {
            id: self.id.unwrap_or_default(),
            device_id: self.device_id.unwrap_or_default(),
            entity_id: self.entity_id.unwrap_or_default(),
            friendly_name: self.friendly_name.unwrap_or_default(),
            state: self.state,
            attributes: self.attributes,
            last_changed: ts,
            last_updated: ts,
        };
        entity.validate()?;
        Ok(entity)
    }
}
