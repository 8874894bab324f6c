//! Entity service: use-cases for managing entities.
//!
//! Every mutation that goes through here is announced on the event bus:
//! `EntityCreated` on creation and `StateChanged` whenever the state
//! actually differs from the stored one.

use playguard_domain::entity::{Entity, EntityState};
use playguard_domain::error::{NotFoundError, PlayGuardError};
use playguard_domain::event::{Event, EventType};
use playguard_domain::id::{DeviceId, EntityId};
use playguard_domain::time::now;

use crate::ports::{EntityRepository, EventPublisher};

/// Application service for entity CRUD and state management.
pub struct EntityService<R, EP> {
    repo: R,
    publisher: EP,
}

impl<R: EntityRepository, EP: EventPublisher> EntityService<R, EP> {
    /// Create a new service backed by the given repository and publisher.
    pub fn new(repo: R, publisher: EP) -> Self {
        Self { repo, publisher }
    }

    /// Create a new entity after validating domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`PlayGuardError::Validation`] if invariants fail, or a
    /// storage error propagated from the repository.
    #[tracing::instrument(skip(self, entity), fields(entity_id = %entity.entity_id))]
    pub async fn create_entity(&self, mut entity: Entity) -> Result<Entity, PlayGuardError> {
        entity.validate()?;
        let ts = now();
        entity.last_updated = ts;
        entity.last_changed = ts;
        let created = self.repo.create(entity).await?;
        self.publisher
            .publish(Event::new(
                EventType::EntityCreated,
                Some(created.id),
                serde_json::json!({
                    "entity_id": created.entity_id,
                    "state": created.state.to_string(),
                }),
            ))
            .await?;
        Ok(created)
    }

    /// Look up an entity by id, returning an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`PlayGuardError::NotFound`] when no entity with `id` exists,
    /// or a storage error from the repository.
    pub async fn get_entity(&self, id: EntityId) -> Result<Entity, PlayGuardError> {
        self.repo.get_by_id(id).await?.ok_or_else(|| {
            NotFoundError {
                entity: "Entity",
                id: id.to_string(),
            }
            .into()
        })
    }

    /// Look up an entity by its `domain.object_id` string.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn find_by_entity_id(&self, entity_id: &str) -> Result<Option<Entity>, PlayGuardError> {
        self.repo.find_by_entity_id(entity_id).await
    }

    /// List all entities.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_entities(&self) -> Result<Vec<Entity>, PlayGuardError> {
        self.repo.get_all().await
    }

    /// List the entities exposed by one device.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_by_device(&self, device_id: DeviceId) -> Result<Vec<Entity>, PlayGuardError> {
        self.repo.find_by_device_id(device_id).await
    }

    /// Update the state of an existing entity.
    ///
    /// # Errors
    ///
    /// Returns [`PlayGuardError::NotFound`] if the entity does not exist,
    /// or a storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn update_entity_state(
        &self,
        id: EntityId,
        new_state: EntityState,
    ) -> Result<Entity, PlayGuardError> {
        let mut entity = self.get_entity(id).await?;
        let previous = entity.state.clone();
        entity.update_state(new_state, now());
        let updated = self.repo.update(entity).await?;
        self.announce_change(&updated, &previous).await?;
        Ok(updated)
    }

    /// Create or update an entity by its `entity_id` string.
    ///
    /// An existing entity keeps its id; everything else is replaced and a
    /// `StateChanged` event is published if the state moved.
    ///
    /// # Errors
    ///
    /// Returns [`PlayGuardError::Validation`] if invariants fail, or a
    /// storage error propagated from the repository.
    #[tracing::instrument(skip(self, entity), fields(entity_id = %entity.entity_id))]
    pub async fn upsert_entity(&self, entity: Entity) -> Result<Entity, PlayGuardError> {
        entity.validate()?;
        let Some(mut existing) = self.repo.find_by_entity_id(&entity.entity_id).await? else {
            return self.create_entity(entity).await;
        };

        let previous = existing.state.clone();
        existing.device_id = entity.device_id;
        existing.friendly_name = entity.friendly_name;
        existing.attributes = entity.attributes;
        existing.update_state(entity.state, now());
        let updated = self.repo.update(existing).await?;
        self.announce_change(&updated, &previous).await?;
        Ok(updated)
    }

    /// Delete an entity by id.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn delete_entity(&self, id: EntityId) -> Result<(), PlayGuardError> {
        self.repo.delete(id).await
    }

    async fn announce_change(
        &self,
        entity: &Entity,
        previous: &EntityState,
    ) -> Result<(), PlayGuardError> {
        if *previous == entity.state {
            return Ok(());
        }
        tracing::debug!(
            entity_id = %entity.entity_id,
            from = %previous,
            to = %entity.state,
            "state changed"
        );
        self.publisher
            .publish(Event::state_changed(entity.id, previous, &entity.state))
            .await
    }
}
