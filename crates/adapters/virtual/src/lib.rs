//! # playguard-adapter-virtual
//!
//! Virtual integration that provides simulated voice-assistant players for
//! testing and demonstration purposes.
//!
//! ## Provided devices
//!
//! One device per configured name, each exposing a `media_player.<slug>`
//! entity that reports `integration = alexa_media`.
//!
//! | Service | Behaviour |
//! |---------|-----------|
//! | `media_play` | state becomes `playing` |
//! | `media_pause` | state becomes `paused` |
//! | `media_stop` | state becomes `idle` |
//! | `speak` | stores `message` in `last_announcement`, counts `announcements` |
//!
//! ## Dependency rule
//!
//! Depends on `playguard-app` (port traits) and `playguard-domain` only.

mod player;

use std::collections::HashMap;

use playguard_app::ports::{DiscoveredDevice, Integration, IntegrationContext};
use playguard_domain::entity::Entity;
use playguard_domain::error::{NotFoundError, PlayGuardError};
use playguard_domain::id::EntityId;
use playguard_domain::service::ServiceCall;

pub use player::{PLAYER_INTEGRATION, VirtualMediaPlayer};

/// Name under which the virtual devices are registered.
pub const INTEGRATION_NAME: &str = "virtual";

/// Player names used when none are configured.
pub const DEFAULT_PLAYERS: [&str; 2] = ["Kitchen Echo", "Bedroom Echo"];

/// Virtual integration that creates simulated media players.
pub struct VirtualIntegration {
    players: Vec<VirtualMediaPlayer>,
    by_entity: HashMap<EntityId, usize>,
}

impl Default for VirtualIntegration {
    fn default() -> Self {
        Self::new(DEFAULT_PLAYERS)
    }
}

impl VirtualIntegration {
    /// Create one simulated player per name.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let players: Vec<_> = names
            .into_iter()
            .map(|name| VirtualMediaPlayer::new(name.as_ref()))
            .collect();
        let by_entity = Self::index(&players);
        Self { players, by_entity }
    }

    fn index(players: &[VirtualMediaPlayer]) -> HashMap<EntityId, usize> {
        players
            .iter()
            .enumerate()
            .map(|(idx, player)| (player.entity_id(), idx))
            .collect()
    }

    fn player(&self, id: EntityId) -> Option<&VirtualMediaPlayer> {
        self.by_entity.get(&id).map(|&idx| &self.players[idx])
    }
}

impl Integration for VirtualIntegration {
    fn name(&self) -> &'static str {
        INTEGRATION_NAME
    }

    async fn setup(&mut self, ctx: &impl IntegrationContext) -> Result<(), PlayGuardError> {
        for player in &mut self.players {
            let (device, entity) = player.discover()?;
            let stored = ctx
                .persist_discovered(DiscoveredDevice {
                    device,
                    entities: vec![entity],
                })
                .await?;
            if let Some(entity) = stored.first() {
                player.bind(entity);
            }
            tracing::info!(player = %player.entity_id_str(), "virtual player ready");
        }
        self.by_entity = Self::index(&self.players);
        Ok(())
    }

    fn owns_entity(&self, entity: &Entity) -> bool {
        self.by_entity.contains_key(&entity.id)
    }

    async fn handle_service_call(&self, call: ServiceCall) -> Result<Entity, PlayGuardError> {
        let player = self.player(call.entity_id).ok_or_else(|| NotFoundError {
            entity: "Entity",
            id: call.entity_id.to_string(),
        })?;
        player.handle_service(&call)
    }

    async fn teardown(&mut self) -> Result<(), PlayGuardError> {
        tracing::debug!(players = self.players.len(), "virtual integration stopped");
        Ok(())
    }
}
