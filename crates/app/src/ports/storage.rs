//! Storage port: repository traits for persistence.

use std::future::Future;
use std::sync::Arc;

use playguard_domain::device::Device;
use playguard_domain::entity::Entity;
use playguard_domain::error::PlayGuardError;
use playguard_domain::id::{DeviceId, EntityId};

/// Repository for persisting and querying [`Entity`]s.
pub trait EntityRepository {
    /// Create a new entity in storage.
    fn create(&self, entity: Entity) -> impl Future<Output = Result<Entity, PlayGuardError>> + Send;

    /// Get an entity by its unique identifier.
    fn get_by_id(
        &self,
        id: EntityId,
    ) -> impl Future<Output = Result<Option<Entity>, PlayGuardError>> + Send;

    /// Get all entities.
    fn get_all(&self) -> impl Future<Output = Result<Vec<Entity>, PlayGuardError>> + Send;

    /// Get all entities exposed by a device.
    fn find_by_device_id(
        &self,
        device_id: DeviceId,
    ) -> impl Future<Output = Result<Vec<Entity>, PlayGuardError>> + Send;

    /// Find an entity by its `domain.object_id` string.
    fn find_by_entity_id(
        &self,
        entity_id: &str,
    ) -> impl Future<Output = Result<Option<Entity>, PlayGuardError>> + Send;

    /// Update an existing entity.
    fn update(&self, entity: Entity) -> impl Future<Output = Result<Entity, PlayGuardError>> + Send;

    /// Delete an entity by its unique identifier.
    fn delete(&self, id: EntityId) -> impl Future<Output = Result<(), PlayGuardError>> + Send;
}

/// Repository for persisting and querying [`Device`]s.
pub trait DeviceRepository {
    /// Create a new device in storage.
    fn create(&self, device: Device) -> impl Future<Output = Result<Device, PlayGuardError>> + Send;

    /// Get a device by its unique identifier.
    fn get_by_id(
        &self,
        id: DeviceId,
    ) -> impl Future<Output = Result<Option<Device>, PlayGuardError>> + Send;

    /// Get all devices.
    fn get_all(&self) -> impl Future<Output = Result<Vec<Device>, PlayGuardError>> + Send;

    /// Find a device by the integration that registered it and its unique id there.
    fn find_by_integration_unique_id(
        &self,
        integration: &str,
        unique_id: &str,
    ) -> impl Future<Output = Result<Option<Device>, PlayGuardError>> + Send;

    /// Update an existing device.
    fn update(&self, device: Device) -> impl Future<Output = Result<Device, PlayGuardError>> + Send;

    /// Delete a device by its unique identifier.
    fn delete(&self, id: DeviceId) -> impl Future<Output = Result<(), PlayGuardError>> + Send;
}

impl<T: EntityRepository + Send + Sync> EntityRepository for Arc<T> {
    fn create(&self, entity: Entity) -> impl Future<Output = Result<Entity, PlayGuardError>> + Send {
        (**self).create(entity)
    }

    fn get_by_id(
        &self,
        id: EntityId,
    ) -> impl Future<Output = Result<Option<Entity>, PlayGuardError>> + Send {
        (**self).get_by_id(id)
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<Entity>, PlayGuardError>> + Send {
        (**self).get_all()
    }

    fn find_by_device_id(
        &self,
        device_id: DeviceId,
    ) -> impl Future<Output = Result<Vec<Entity>, PlayGuardError>> + Send {
        (**self).find_by_device_id(device_id)
    }

    fn find_by_entity_id(
        &self,
        entity_id: &str,
    ) -> impl Future<Output = Result<Option<Entity>, PlayGuardError>> + Send {
        (**self).find_by_entity_id(entity_id)
    }

    fn update(&self, entity: Entity) -> impl Future<Output = Result<Entity, PlayGuardError>> + Send {
        (**self).update(entity)
    }

    fn delete(&self, id: EntityId) -> impl Future<Output = Result<(), PlayGuardError>> + Send {
        (**self).delete(id)
    }
}

impl<T: DeviceRepository + Send + Sync> DeviceRepository for Arc<T> {
    fn create(&self, device: Device) -> impl Future<Output = Result<Device, PlayGuardError>> + Send {
        (**self).create(device)
    }

    fn get_by_id(
        &self,
        id: DeviceId,
    ) -> impl Future<Output = Result<Option<Device>, PlayGuardError>> + Send {
        (**self).get_by_id(id)
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<Device>, PlayGuardError>> + Send {
        (**self).get_all()
    }

    fn find_by_integration_unique_id(
        &self,
        integration: &str,
        unique_id: &str,
    ) -> impl Future<Output = Result<Option<Device>, PlayGuardError>> + Send {
        (**self).find_by_integration_unique_id(integration, unique_id)
    }

    fn update(&self, device: Device) -> impl Future<Output = Result<Device, PlayGuardError>> + Send {
        (**self).update(device)
    }

    fn delete(&self, id: DeviceId) -> impl Future<Output = Result<(), PlayGuardError>> + Send {
        (**self).delete(id)
    }
}
