//! Integration port: lifecycle and service-call handling for device integrations.
//!
//! An integration bridges an external system (simulated players, the time
//! control layer, …) into playguard. It discovers devices/entities on startup
//! and handles service calls directed at entities it owns.

use std::future::Future;

use playguard_domain::device::Device;
use playguard_domain::entity::Entity;
use playguard_domain::error::PlayGuardError;
use playguard_domain::event::Event;
use playguard_domain::service::ServiceCall;

/// Context provided to integrations for persisting discoveries.
///
/// This is a **port**: adapters call it to persist devices and entities
/// they discover. The binary crate provides a concrete implementation
/// backed by `DeviceService` and `EntityService`.
pub trait IntegrationContext: Send + Sync {
    /// Persist a discovered device (create or update by `integration`+`unique_id`).
    fn upsert_device(
        &self,
        device: Device,
    ) -> impl Future<Output = Result<Device, PlayGuardError>> + Send;

    /// Persist a discovered entity (create or update by `entity_id` string).
    ///
    /// Also publishes `StateChanged` / `EntityCreated` events through the
    /// event bus when appropriate (delegated to `EntityService`).
    fn upsert_entity(
        &self,
        entity: Entity,
    ) -> impl Future<Output = Result<Entity, PlayGuardError>> + Send;

    /// Every entity currently registered, across all integrations.
    ///
    /// Integrations that build on top of others (time control) discover
    /// their targets through this.
    fn entities(&self) -> impl Future<Output = Result<Vec<Entity>, PlayGuardError>> + Send;

    /// Publish a domain event to the event bus.
    fn publish(&self, event: Event) -> impl Future<Output = Result<(), PlayGuardError>> + Send;

    /// Convenience: persist a full [`DiscoveredDevice`] (device + all entities).
    ///
    /// Entities are re-parented onto the stored device, so the returned
    /// entities carry the persisted ids.
    fn persist_discovered(
        &self,
        dd: DiscoveredDevice,
    ) -> impl Future<Output = Result<Vec<Entity>, PlayGuardError>> + Send {
        async move {
            let device = self.upsert_device(dd.device).await?;
            let mut stored = Vec::with_capacity(dd.entities.len());
            for mut entity in dd.entities {
                entity.device_id = device.id;
                stored.push(self.upsert_entity(entity).await?);
            }
            Ok(stored)
        }
    }
}

/// A pluggable device integration.
///
/// Implementations live in adapter crates (e.g. `playguard-adapter-virtual`).
/// The binary crate calls the lifecycle methods in order:
///
/// 1. [`setup`](Self::setup): discover and persist devices and entities
/// 2. (the server runs, forwarding service calls via [`handle_service_call`](Self::handle_service_call))
/// 3. [`teardown`](Self::teardown): clean up resources
pub trait Integration {
    /// Unique name identifying this integration (e.g. `"virtual"`).
    fn name(&self) -> &'static str;

    /// Discover devices and persist them via `ctx`.
    fn setup(
        &mut self,
        ctx: &impl IntegrationContext,
    ) -> impl Future<Output = Result<(), PlayGuardError>> + Send;

    /// Whether `entity` was registered by this integration.
    fn owns_entity(&self, entity: &Entity) -> bool;

    /// Handle a service call (e.g. `turn_on`, `set_value`, `media_stop`) for
    /// an entity owned by this integration.
    ///
    /// Returns the new [`Entity`] state after handling the call.
    fn handle_service_call(
        &self,
        call: ServiceCall,
    ) -> impl Future<Output = Result<Entity, PlayGuardError>> + Send;

    /// Called on graceful shutdown.
    fn teardown(&mut self) -> impl Future<Output = Result<(), PlayGuardError>> + Send;
}

/// A device and its associated entities discovered during integration setup.
#[derive(Debug, Clone)]
pub struct DiscoveredDevice {
    pub device: Device,
    pub entities: Vec<Entity>,
}
