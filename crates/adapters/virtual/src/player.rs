//! Virtual media player: a stand-in for a voice-assistant speaker.

use std::sync::{Mutex, MutexGuard, PoisonError};

use playguard_domain::device::Device;
use playguard_domain::entity::{AttributeValue, Entity, EntityState, MEDIA_PLAYER_DOMAIN};
use playguard_domain::error::PlayGuardError;
use playguard_domain::id::{DeviceId, EntityId};
use playguard_domain::service::{self, ServiceCall};

/// Integration attribute reported by the simulated players.
pub const PLAYER_INTEGRATION: &str = "alexa_media";

#[derive(Debug, Default)]
struct Playback {
    state: EntityState,
    last_announcement: Option<String>,
    announcements: i64,
}

/// A simulated speaker that can play, pause, stop and announce.
pub struct VirtualMediaPlayer {
    name: String,
    slug: String,
    device_id: DeviceId,
    entity_id: EntityId,
    playback: Mutex<Playback>,
}

impl VirtualMediaPlayer {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            slug: slugify(name),
            device_id: DeviceId::new(),
            entity_id: EntityId::new(),
            playback: Mutex::new(Playback {
                state: EntityState::Idle,
                ..Playback::default()
            }),
        }
    }

    /// The entity id, as last persisted.
    #[must_use]
    pub fn entity_id(&self) -> EntityId {
        self.entity_id
    }

    /// Adopt the ids storage assigned on upsert.
    pub fn bind(&mut self, entity: &Entity) {
        self.entity_id = entity.id;
        self.device_id = entity.device_id;
    }

    /// `media_player.<slug>`.
    #[must_use]
    pub fn entity_id_str(&self) -> String {
        format!("{MEDIA_PLAYER_DOMAIN}.{}", self.slug)
    }

    /// Produce the [`Device`] and [`Entity`] descriptors.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the name yields an empty slug.
    pub fn discover(&self) -> Result<(Device, Entity), PlayGuardError> {
        let device = Device::builder()
            .id(self.device_id)
            .name(&self.name)
            .manufacturer("Amazon")
            .model("Echo (virtual)")
            .integration(crate::INTEGRATION_NAME)
            .unique_id(&self.slug)
            .build()?;

        let playback = self.lock();
        let mut builder = Entity::builder()
            .id(self.entity_id)
            .device_id(self.device_id)
            .entity_id(self.entity_id_str())
            .friendly_name(&self.name)
            .state(playback.state.clone())
            .attribute("integration", AttributeValue::from(PLAYER_INTEGRATION))
            .attribute("announcements", AttributeValue::Int(playback.announcements));
        if let Some(message) = &playback.last_announcement {
            builder = builder.attribute("last_announcement", AttributeValue::from(message.as_str()));
        }
        let entity = builder.build()?;

        Ok((device, entity))
    }

    /// Handle a service call, returning the updated entity snapshot.
    ///
    /// # Errors
    ///
    /// Returns a validation error when `speak` has no `message`.
    pub fn handle_service(&self, call: &ServiceCall) -> Result<Entity, PlayGuardError> {
        {
            let mut playback = self.lock();
            match call.service.as_str() {
                service::MEDIA_PLAY => playback.state = EntityState::Playing,
                service::MEDIA_PAUSE => playback.state = EntityState::Paused,
                service::MEDIA_STOP => playback.state = EntityState::Idle,
                service::SPEAK => {
                    let message = call.required_str("message")?;
                    tracing::info!(player = %self.name, message, "announcement");
                    playback.last_announcement = Some(message.to_string());
                    playback.announcements += 1;
                }
                other => tracing::debug!(player = %self.name, service = other, "ignoring service"),
            }
        }
        Ok(self.discover()?.1)
    }

    fn lock(&self) -> MutexGuard<'_, Playback> {
        self.playback.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Lowercase ASCII alphanumerics, everything else collapsed into `_`.
fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('_') {
            slug.push('_');
        }
    }
    while slug.ends_with('_') {
        slug.pop();
    }
    slug
}
