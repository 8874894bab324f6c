//! # playguard-adapter-time-control
//!
//! Integration that attaches a time control to every voice-assistant media
//! player registered by the other integrations.
//!
//! For each player it registers a device and five companion entities
//! (see [`playguard_domain::control`]): two switches, two times and a text.
//! The companion values are what the playback guard evaluates; this
//! integration only owns them and applies service calls to them.
//!
//! ## Dependency rule
//!
//! Depends on `playguard-app` (port traits) and `playguard-domain` only.

mod companion;
mod discovery;

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use playguard_app::ports::{DiscoveredDevice, Integration, IntegrationContext};
use playguard_domain::control::ControlKind;
use playguard_domain::device::Device;
use playguard_domain::entity::Entity;
use playguard_domain::error::{NotFoundError, PlayGuardError};
use playguard_domain::id::EntityId;
use playguard_domain::service::ServiceCall;
use playguard_domain::time::now;

pub use discovery::{DEFAULT_END, DEFAULT_START, TimeControlConfig};

/// Name under which the time control devices are registered.
pub const INTEGRATION_NAME: &str = "time_control";

const MANUFACTURER: &str = "Amazon";
const MODEL: &str = "Alexa Device with Time Control";

struct Control {
    kind: ControlKind,
    entity: Mutex<Entity>,
}

/// The time control integration.
pub struct TimeControlIntegration {
    config: TimeControlConfig,
    controls: HashMap<EntityId, Control>,
}

impl TimeControlIntegration {
    #[must_use]
    pub fn new(config: TimeControlConfig) -> Self {
        Self {
            config,
            controls: HashMap::new(),
        }
    }

    /// Number of players currently under control.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.controls.len() / ControlKind::ALL.len()
    }

    fn discovered_for(
        &self,
        player: &Entity,
        known: &HashMap<&str, &Entity>,
    ) -> Result<DiscoveredDevice, PlayGuardError> {
        let device = Device::builder()
            .name(companion::player_label(player))
            .manufacturer(MANUFACTURER)
            .model(MODEL)
            .integration(INTEGRATION_NAME)
            .unique_id(&player.entity_id)
            .build()?;

        let entities = ControlKind::ALL
            .into_iter()
            .map(|kind| {
                let previous = known.get(kind.entity_id_for(&player.entity_id).as_str());
                companion::build(&self.config, player, device.id, kind, previous.copied())
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(DiscoveredDevice { device, entities })
    }

    /// Replace the tracked copy of a companion with its stored version.
    ///
    /// Entities this integration does not own are ignored.
    pub fn refresh(&self, stored: &Entity) {
        let Some(control) = self.controls.get(&stored.id) else {
            return;
        };
        let mut entity = control.entity.lock().unwrap_or_else(PoisonError::into_inner);
        if entity.state != stored.state {
            tracing::debug!(
                entity_id = %stored.entity_id,
                tracked = %entity.state,
                stored = %stored.state,
                "time control resynced from storage"
            );
        }
        *entity = stored.clone();
    }

    fn apply(&self, call: &ServiceCall) -> Result<Entity, PlayGuardError> {
        let control = self.controls.get(&call.entity_id).ok_or_else(|| NotFoundError {
            entity: "Entity",
            id: call.entity_id.to_string(),
        })?;

        let mut entity = control.entity.lock().unwrap_or_else(PoisonError::into_inner);
        match companion::apply(control.kind, &entity.state, call)? {
            Some(next) => {
                tracing::info!(
                    entity_id = %entity.entity_id,
                    service = %call.service,
                    value = %next,
                    "time control updated"
                );
                entity.update_state(next, now());
            }
            None => {
                tracing::debug!(
                    entity_id = %entity.entity_id,
                    service = %call.service,
                    "ignoring service"
                );
            }
        }
        Ok(entity.clone())
    }
}

impl Integration for TimeControlIntegration {
    fn name(&self) -> &'static str {
        INTEGRATION_NAME
    }

    async fn setup(&mut self, ctx: &impl IntegrationContext) -> Result<(), PlayGuardError> {
        let existing = ctx.entities().await?;
        let known: HashMap<&str, &Entity> = existing
            .iter()
            .map(|entity| (entity.entity_id.as_str(), entity))
            .collect();

        let mut discovered = Vec::new();
        for player in existing.iter().filter(|e| self.config.is_candidate(e)) {
            discovered.push(self.discovered_for(player, &known)?);
        }

        for dd in discovered {
            let player = dd.device.unique_id.clone();
            for entity in ctx.persist_discovered(dd).await? {
                let Some(kind) = ControlKind::from_entity_id(&entity.entity_id) else {
                    continue;
                };
                self.controls.insert(
                    entity.id,
                    Control {
                        kind,
                        entity: Mutex::new(entity),
                    },
                );
            }
            tracing::info!(%player, "time control attached");
        }

        if self.controls.is_empty() {
            tracing::warn!("no voice-assistant players found, nothing to control");
        }
        Ok(())
    }

    fn owns_entity(&self, entity: &Entity) -> bool {
        self.controls.contains_key(&entity.id)
    }

    async fn handle_service_call(&self, call: ServiceCall) -> Result<Entity, PlayGuardError> {
        self.apply(&call)
    }

    async fn teardown(&mut self) -> Result<(), PlayGuardError> {
        self.controls.clear();
        Ok(())
    }
}
