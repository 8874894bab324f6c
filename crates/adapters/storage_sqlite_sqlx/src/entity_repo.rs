//! `SQLite` implementation of [`EntityRepository`].

use std::collections::HashMap;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use playguard_app::ports::EntityRepository;
use playguard_domain::entity::{AttributeValue, Entity, EntityState, split_entity_id};
use playguard_domain::error::PlayGuardError;
use playguard_domain::id::{DeviceId, EntityId};

use crate::codec::{decode_id, decode_json, decode_timestamp, encode_timestamp};
use crate::error::StorageError;

/// Wrapper for converting database rows into domain types without polluting
/// domain structs with database concerns.
struct Wrapper(Entity);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<Entity> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let device_id: String = row.try_get("device_id")?;
        let state: String = row.try_get("state")?;
        let attributes: String = row.try_get("attributes")?;
        let last_changed: String = row.try_get("last_changed")?;
        let last_updated: String = row.try_get("last_updated")?;
        let entity_id: String = row.try_get("entity_id")?;

        let attributes: HashMap<String, AttributeValue> = decode_json(&attributes)?;

        Ok(Self(Entity {
            id: decode_id(&id)?,
            device_id: decode_id(&device_id)?,
            state: EntityState::parse_in_domain(split_entity_id(&entity_id).0, &state),
            entity_id,
            friendly_name: row.try_get("friendly_name")?,
            attributes,
            last_changed: decode_timestamp(&last_changed)?,
            last_updated: decode_timestamp(&last_updated)?,
        }))
    }
}

const INSERT: &str = r"
    INSERT INTO entities (id, device_id, entity_id, friendly_name, state, attributes, last_changed, last_updated)
    VALUES (?, ?, ?, ?, ?, ?, ?, ?)
";

const SELECT_BY_ID: &str = "SELECT * FROM entities WHERE id = ?";
const SELECT_ALL: &str = "SELECT * FROM entities ORDER BY entity_id";
const SELECT_BY_DEVICE: &str = "SELECT * FROM entities WHERE device_id = ? ORDER BY entity_id";
const SELECT_BY_ENTITY_ID: &str = "SELECT * FROM entities WHERE entity_id = ?";

const UPDATE: &str = r"
    UPDATE entities
    SET device_id = ?, entity_id = ?, friendly_name = ?, state = ?, attributes = ?,
        last_changed = ?, last_updated = ?
    WHERE id = ?
";

const DELETE_BY_ID: &str = "DELETE FROM entities WHERE id = ?";

/// `SQLite`-backed entity repository.
#[derive(Clone)]
pub struct SqliteEntityRepository {
    pool: SqlitePool,
}

impl SqliteEntityRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl EntityRepository for SqliteEntityRepository {
    async fn create(&self, entity: Entity) -> Result<Entity, PlayGuardError> {
        let attributes_json =
            serde_json::to_string(&entity.attributes).map_err(StorageError::from)?;

        sqlx::query(INSERT)
            .bind(entity.id.to_string())
            .bind(entity.device_id.to_string())
            .bind(&entity.entity_id)
            .bind(&entity.friendly_name)
            .bind(entity.state.to_string())
            .bind(&attributes_json)
            .bind(encode_timestamp(entity.last_changed))
            .bind(encode_timestamp(entity.last_updated))
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(entity)
    }

    async fn get_by_id(&self, id: EntityId) -> Result<Option<Entity>, PlayGuardError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(Wrapper::maybe(row))
    }

    async fn get_all(&self) -> Result<Vec<Entity>, PlayGuardError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_ALL)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn find_by_device_id(&self, device_id: DeviceId) -> Result<Vec<Entity>, PlayGuardError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_BY_DEVICE)
            .bind(device_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn find_by_entity_id(&self, entity_id: &str) -> Result<Option<Entity>, PlayGuardError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ENTITY_ID)
            .bind(entity_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(Wrapper::maybe(row))
    }

    async fn update(&self, entity: Entity) -> Result<Entity, PlayGuardError> {
        let attributes_json =
            serde_json::to_string(&entity.attributes).map_err(StorageError::from)?;

        sqlx::query(UPDATE)
            .bind(entity.device_id.to_string())
            .bind(&entity.entity_id)
            .bind(&entity.friendly_name)
            .bind(entity.state.to_string())
            .bind(&attributes_json)
            .bind(encode_timestamp(entity.last_changed))
            .bind(encode_timestamp(entity.last_updated))
            .bind(entity.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(entity)
    }

    async fn delete(&self, id: EntityId) -> Result<(), PlayGuardError> {
        sqlx::query(DELETE_BY_ID)
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(())
    }
}
