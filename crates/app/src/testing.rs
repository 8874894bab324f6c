//! In-memory port implementations shared by the unit tests of this crate.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Mutex;

use playguard_domain::device::Device;
use playguard_domain::entity::Entity;
use playguard_domain::error::PlayGuardError;
use playguard_domain::event::{Event, EventType};
use playguard_domain::id::{DeviceId, EntityId, EventId};
use playguard_domain::service::ServiceCall;

use crate::ports::{
    DeviceRepository, EntityRepository, EventPublisher, EventStore, MediaPlayerControl,
    ServiceCaller,
};

#[derive(Default)]
pub struct InMemoryEntityRepo {
    store: Mutex<HashMap<EntityId, Entity>>,
}

impl InMemoryEntityRepo {
    pub fn with(entities: impl IntoIterator<Item = Entity>) -> Self {
        let repo = Self::default();
        {
            let mut store = repo.store.lock().unwrap();
            for entity in entities {
                store.insert(entity.id, entity);
            }
        }
        repo
    }
}

impl EntityRepository for InMemoryEntityRepo {
    fn create(&self, entity: Entity) -> impl Future<Output = Result<Entity, PlayGuardError>> + Send {
        let mut store = self.store.lock().unwrap();
        store.insert(entity.id, entity.clone());
        async { Ok(entity) }
    }

    fn get_by_id(
        &self,
        id: EntityId,
    ) -> impl Future<Output = Result<Option<Entity>, PlayGuardError>> + Send {
        let result = self.store.lock().unwrap().get(&id).cloned();
        async { Ok(result) }
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<Entity>, PlayGuardError>> + Send {
        let result: Vec<Entity> = self.store.lock().unwrap().values().cloned().collect();
        async { Ok(result) }
    }

    fn find_by_device_id(
        &self,
        device_id: DeviceId,
    ) -> impl Future<Output = Result<Vec<Entity>, PlayGuardError>> + Send {
        let result: Vec<Entity> = self
            .store
            .lock()
            .unwrap()
            .values()
            .filter(|ent| ent.device_id == device_id)
            .cloned()
            .collect();
        async { Ok(result) }
    }

    fn find_by_entity_id(
        &self,
        entity_id: &str,
    ) -> impl Future<Output = Result<Option<Entity>, PlayGuardError>> + Send {
        let result = self
            .store
            .lock()
            .unwrap()
            .values()
            .find(|ent| ent.entity_id == entity_id)
            .cloned();
        async { Ok(result) }
    }

    fn update(&self, entity: Entity) -> impl Future<Output = Result<Entity, PlayGuardError>> + Send {
        self.store.lock().unwrap().insert(entity.id, entity.clone());
        async { Ok(entity) }
    }

    fn delete(&self, id: EntityId) -> impl Future<Output = Result<(), PlayGuardError>> + Send {
        self.store.lock().unwrap().remove(&id);
        async { Ok(()) }
    }
}

#[derive(Default)]
pub struct InMemoryDeviceRepo {
    store: Mutex<HashMap<DeviceId, Device>>,
}

impl DeviceRepository for InMemoryDeviceRepo {
    fn create(&self, device: Device) -> impl Future<Output = Result<Device, PlayGuardError>> + Send {
        self.store.lock().unwrap().insert(device.id, device.clone());
        async { Ok(device) }
    }

    fn get_by_id(
        &self,
        id: DeviceId,
    ) -> impl Future<Output = Result<Option<Device>, PlayGuardError>> + Send {
        let result = self.store.lock().unwrap().get(&id).cloned();
        async { Ok(result) }
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<Device>, PlayGuardError>> + Send {
        let result: Vec<Device> = self.store.lock().unwrap().values().cloned().collect();
        async { Ok(result) }
    }

    fn find_by_integration_unique_id(
        &self,
        integration: &str,
        unique_id: &str,
    ) -> impl Future<Output = Result<Option<Device>, PlayGuardError>> + Send {
        let result = self
            .store
            .lock()
            .unwrap()
            .values()
            .find(|dev| dev.integration == integration && dev.unique_id == unique_id)
            .cloned();
        async { Ok(result) }
    }

    fn update(&self, device: Device) -> impl Future<Output = Result<Device, PlayGuardError>> + Send {
        self.store.lock().unwrap().insert(device.id, device.clone());
        async { Ok(device) }
    }

    fn delete(&self, id: DeviceId) -> impl Future<Output = Result<(), PlayGuardError>> + Send {
        self.store.lock().unwrap().remove(&id);
        async { Ok(()) }
    }
}

#[derive(Default)]
pub struct InMemoryEventStore {
    events: Mutex<Vec<Event>>,
}

impl InMemoryEventStore {
    pub fn count(&self) -> usize {
        self.events.lock().unwrap().len()
    }
}

impl EventStore for InMemoryEventStore {
    fn store(&self, event: Event) -> impl Future<Output = Result<Event, PlayGuardError>> + Send {
        self.events.lock().unwrap().push(event.clone());
        async { Ok(event) }
    }

    fn get_by_id(
        &self,
        id: EventId,
    ) -> impl Future<Output = Result<Option<Event>, PlayGuardError>> + Send {
        let result = self
            .events
            .lock()
            .unwrap()
            .iter()
            .find(|ev| ev.id == id)
            .cloned();
        async { Ok(result) }
    }

    fn get_recent(
        &self,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<Event>, PlayGuardError>> + Send {
        let result: Vec<Event> = self
            .events
            .lock()
            .unwrap()
            .iter()
            .rev()
            .take(limit)
            .cloned()
            .collect();
        async { Ok(result) }
    }

    fn find_by_entity(
        &self,
        entity_id: EntityId,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<Event>, PlayGuardError>> + Send {
        let result: Vec<Event> = self
            .events
            .lock()
            .unwrap()
            .iter()
            .rev()
            .filter(|ev| ev.entity_id == Some(entity_id))
            .take(limit)
            .cloned()
            .collect();
        async { Ok(result) }
    }
}

/// Publisher that keeps every event it is given.
#[derive(Default)]
pub struct RecordingPublisher {
    events: Mutex<Vec<Event>>,
}

impl RecordingPublisher {
    pub fn of_type(&self, event_type: EventType) -> Vec<Event> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|ev| ev.event_type == event_type)
            .cloned()
            .collect()
    }
}

impl EventPublisher for RecordingPublisher {
    fn publish(&self, event: Event) -> impl Future<Output = Result<(), PlayGuardError>> + Send {
        self.events.lock().unwrap().push(event);
        async { Ok(()) }
    }
}

/// A command observed by [`RecordingPlayer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerCommand {
    Speak(String, String),
    Stop(String),
}

/// Player control that records commands and optionally fails to speak.
#[derive(Default)]
pub struct RecordingPlayer {
    commands: Mutex<Vec<PlayerCommand>>,
    fail_speak: bool,
}

impl RecordingPlayer {
    pub fn failing_speak() -> Self {
        Self {
            fail_speak: true,
            ..Self::default()
        }
    }

    pub fn commands(&self) -> Vec<PlayerCommand> {
        self.commands.lock().unwrap().clone()
    }
}

impl MediaPlayerControl for RecordingPlayer {
    fn speak(
        &self,
        player: &Entity,
        message: &str,
    ) -> impl Future<Output = Result<(), PlayGuardError>> + Send {
        let result = if self.fail_speak {
            Err(PlayGuardError::Storage("speaker offline".into()))
        } else {
            self.commands.lock().unwrap().push(PlayerCommand::Speak(
                player.entity_id.clone(),
                message.to_string(),
            ));
            Ok(())
        };
        async { result }
    }

    fn stop(&self, player: &Entity) -> impl Future<Output = Result<(), PlayGuardError>> + Send {
        self.commands
            .lock()
            .unwrap()
            .push(PlayerCommand::Stop(player.entity_id.clone()));
        async { Ok(()) }
    }
}

/// Service caller that records calls and echoes back a stub entity.
#[derive(Default)]
pub struct RecordingCaller {
    calls: Mutex<Vec<ServiceCall>>,
}

impl RecordingCaller {
    pub fn calls(&self) -> Vec<ServiceCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl ServiceCaller for RecordingCaller {
    fn call_service(
        &self,
        call: ServiceCall,
    ) -> impl Future<Output = Result<Entity, PlayGuardError>> + Send {
        let entity = Entity::builder()
            .id(call.entity_id)
            .entity_id("media_player.stub")
            .friendly_name("Stub")
            .build();
        self.calls.lock().unwrap().push(call);
        async { entity }
    }
}
