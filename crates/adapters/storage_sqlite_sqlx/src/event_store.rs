//! `SQLite` implementation of [`EventStore`].

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use playguard_app::ports::EventStore;
use playguard_domain::error::PlayGuardError;
use playguard_domain::event::{Event, EventType};
use playguard_domain::id::{EntityId, EventId};

use crate::codec::{decode_id, decode_json, decode_timestamp, encode_timestamp};
use crate::error::StorageError;

struct Wrapper(Event);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<Event> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let event_type: String = row.try_get("event_type")?;
        let entity_id: Option<String> = row.try_get("entity_id")?;
        let timestamp: String = row.try_get("timestamp")?;
        let data: String = row.try_get("data")?;

        let event_type: EventType =
            serde_json::from_value(serde_json::Value::String(event_type))
                .map_err(|err| sqlx::Error::Decode(Box::new(err)))?;

        Ok(Self(Event {
            id: decode_id(&id)?,
            event_type,
            entity_id: entity_id.as_deref().map(decode_id::<EntityId>).transpose()?,
            data: decode_json(&data)?,
            timestamp: decode_timestamp(&timestamp)?,
        }))
    }
}

const INSERT: &str = r"
    INSERT INTO events (id, event_type, entity_id, timestamp, data)
    VALUES (?, ?, ?, ?, ?)
";

const SELECT_BY_ID: &str = "SELECT * FROM events WHERE id = ?";
const SELECT_RECENT: &str = "SELECT * FROM events ORDER BY timestamp DESC, rowid DESC LIMIT ?";
const SELECT_BY_ENTITY: &str =
    "SELECT * FROM events WHERE entity_id = ? ORDER BY timestamp DESC, rowid DESC LIMIT ?";

/// `SQLite`-backed event store.
#[derive(Clone)]
pub struct SqliteEventStore {
    pool: SqlitePool,
}

impl SqliteEventStore {
    /// Create a new event store using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn sql_limit(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

impl EventStore for SqliteEventStore {
    async fn store(&self, event: Event) -> Result<Event, PlayGuardError> {
        let data_json = serde_json::to_string(&event.data).map_err(StorageError::from)?;

        sqlx::query(INSERT)
            .bind(event.id.to_string())
            .bind(event.event_type.as_str())
            .bind(event.entity_id.map(|id| id.to_string()))
            .bind(encode_timestamp(event.timestamp))
            .bind(&data_json)
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(event)
    }

    async fn get_by_id(&self, id: EventId) -> Result<Option<Event>, PlayGuardError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(Wrapper::maybe(row))
    }

    async fn get_recent(&self, limit: usize) -> Result<Vec<Event>, PlayGuardError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_RECENT)
            .bind(sql_limit(limit))
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn find_by_entity(
        &self,
        entity_id: EntityId,
        limit: usize,
    ) -> Result<Vec<Event>, PlayGuardError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_BY_ENTITY)
            .bind(entity_id.to_string())
            .bind(sql_limit(limit))
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::memory_pool;
    use playguard_domain::entity::EntityState;

    async fn setup() -> SqliteEventStore {
        SqliteEventStore::new(memory_pool().await)
    }

    fn started_playing(entity_id: EntityId) -> Event {
        Event::state_changed(entity_id, &EntityState::Idle, &EntityState::Playing)
    }

    #[tokio::test]
    async fn should_store_and_retrieve_event_by_id() {
        let store = setup().await;
        let entity_id = EntityId::new();
        let event = started_playing(entity_id);
        let id = event.id;

        store.store(event).await.unwrap();

        let fetched = store.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(fetched.id, id);
        assert_eq!(fetched.event_type, EventType::StateChanged);
        assert_eq!(fetched.entity_id, Some(entity_id));
        assert_eq!(fetched.data["to"], "playing");
    }

    #[tokio::test]
    async fn should_return_none_when_event_not_found() {
        let store = setup().await;
        assert!(store.get_by_id(EventId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn should_store_event_without_entity_id() {
        let store = setup().await;
        let event = Event::new(EventType::ServiceCalled, None, serde_json::json!({}));
        let id = event.id;

        store.store(event).await.unwrap();

        let fetched = store.get_by_id(id).await.unwrap().unwrap();
        assert!(fetched.entity_id.is_none());
    }

    #[tokio::test]
    async fn should_get_recent_events_ordered_newest_first() {
        let store = setup().await;
        let first = started_playing(EntityId::new());
        let second = Event::new(
            EventType::PlaybackInterrupted,
            None,
            serde_json::json!({"decision": "blocked_by_flag"}),
        );
        let (first_id, second_id) = (first.id, second.id);
        store.store(first).await.unwrap();
        store.store(second).await.unwrap();

        let recent = store.get_recent(10).await.unwrap();
        assert_eq!(
            recent.iter().map(|e| e.id).collect::<Vec<_>>(),
            vec![second_id, first_id]
        );
        assert_eq!(store.get_recent(1).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn should_find_events_by_entity_id() {
        let store = setup().await;
        let entity_id = EntityId::new();
        store.store(started_playing(entity_id)).await.unwrap();
        store.store(started_playing(EntityId::new())).await.unwrap();

        let found = store.find_by_entity(entity_id, 10).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].entity_id, Some(entity_id));
    }
}
