//! Event: an immutable record of something that happened.
//!
//! Events are produced when entity state changes, entities are created,
//! services are called, and when playback gets interrupted.

use serde::{Deserialize, Serialize};

use crate::entity::EntityState;
use crate::id::{EntityId, EventId};
use crate::time::{Timestamp, now};

/// Kind of an [`Event`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    StateChanged,
    EntityCreated,
    ServiceCalled,
    PlaybackInterrupted,
}

impl EventType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::StateChanged => "state_changed",
            Self::EntityCreated => "entity_created",
            Self::ServiceCalled => "service_called",
            Self::PlaybackInterrupted => "playback_interrupted",
        }
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An immutable record of something that happened.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub event_type: EventType,
    pub entity_id: Option<EntityId>,
    pub data: serde_json::Value,
    pub timestamp: Timestamp,
}

impl Event {
    /// Create a new event stamped with the current time.
    #[must_use]
    pub fn new(event_type: EventType, entity_id: Option<EntityId>, data: serde_json::Value) -> Self {
        Self {
            id: EventId::new(),
            event_type,
            entity_id,
            data,
            timestamp: now(),
        }
    }

    /// A `StateChanged` event carrying `{"from": …, "to": …}`.
    #[must_use]
    pub fn state_changed(entity_id: EntityId, from: &EntityState, to: &EntityState) -> Self {
        Self::new(
            EventType::StateChanged,
            Some(entity_id),
            serde_json::json!({
                "from": from.to_string(),
                "to": to.to_string(),
            }),
        )
    }
}

/// The `from → to` pair carried by a `StateChanged` event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateTransition {
    pub entity_id: EntityId,
    pub from: EntityState,
    pub to: EntityState,
}

impl StateTransition {
    /// Extract the transition from a `StateChanged` event.
    ///
    /// Returns `None` for other event types or malformed payloads.
    #[must_use]
    pub fn from_event(event: &Event) -> Option<Self> {
        if event.event_type != EventType::StateChanged {
            return None;
        }
        let entity_id = event.entity_id?;
        let from = event.data.get("from")?.as_str()?;
        let to = event.data.get("to")?.as_str()?;
        Some(Self {
            entity_id,
            from: EntityState::parse(from),
            to: EntityState::parse(to),
        })
    }

    /// Edge trigger: the entity has just entered the playing state.
    #[must_use]
    pub fn started_playing(&self) -> bool {
        self.to.is_playing() && !self.from.is_playing()
    }
}
