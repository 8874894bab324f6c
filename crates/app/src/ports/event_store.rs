//! Event store port: persistence for domain events.

use std::future::Future;

use playguard_domain::error::PlayGuardError;
use playguard_domain::event::Event;
use playguard_domain::id::{EntityId, EventId};

/// Repository for persisting and querying [`Event`]s.
pub trait EventStore {
    /// Persist a new event.
    fn store(&self, event: Event) -> impl Future<Output = Result<Event, PlayGuardError>> + Send;

    /// Get an event by its unique identifier.
    fn get_by_id(
        &self,
        id: EventId,
    ) -> impl Future<Output = Result<Option<Event>, PlayGuardError>> + Send;

    /// Get the most recent events, ordered newest-first.
    fn get_recent(
        &self,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<Event>, PlayGuardError>> + Send;

    /// Find events for a specific entity, ordered newest-first.
    fn find_by_entity(
        &self,
        entity_id: EntityId,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<Event>, PlayGuardError>> + Send;
}

impl<T: EventStore + Send + Sync> EventStore for std::sync::Arc<T> {
    fn store(&self, event: Event) -> impl Future<Output = Result<Event, PlayGuardError>> + Send {
        (**self).store(event)
    }

    fn get_by_id(
        &self,
        id: EventId,
    ) -> impl Future<Output = Result<Option<Event>, PlayGuardError>> + Send {
        (**self).get_by_id(id)
    }

    fn get_recent(
        &self,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<Event>, PlayGuardError>> + Send {
        (**self).get_recent(limit)
    }

    fn find_by_entity(
        &self,
        entity_id: EntityId,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<Event>, PlayGuardError>> + Send {
        (**self).find_by_entity(entity_id, limit)
    }
}
