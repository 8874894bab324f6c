//! `SQLite` implementation of [`DeviceRepository`].

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use playguard_app::ports::DeviceRepository;
use playguard_domain::device::Device;
use playguard_domain::error::PlayGuardError;
use playguard_domain::id::DeviceId;

use crate::codec::decode_id;
use crate::error::StorageError;

/// Wrapper for converting database rows into domain [`Device`].
struct Wrapper(Device);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<Device> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;

        Ok(Self(Device {
            id: decode_id(&id)?,
            name: row.try_get("name")?,
            manufacturer: row.try_get("manufacturer")?,
            model: row.try_get("model")?,
            integration: row.try_get("integration")?,
            unique_id: row.try_get("unique_id")?,
        }))
    }
}

const INSERT: &str = r"
    INSERT INTO devices (id, name, manufacturer, model, integration, unique_id)
    VALUES (?, ?, ?, ?, ?, ?)
";
const SELECT_BY_ID: &str = "SELECT * FROM devices WHERE id = ?";
const SELECT_ALL: &str = "SELECT * FROM devices ORDER BY name";
const SELECT_BY_INTEGRATION_UNIQUE_ID: &str =
    "SELECT * FROM devices WHERE integration = ? AND unique_id = ?";
const UPDATE: &str = r"
    UPDATE devices
    SET name = ?, manufacturer = ?, model = ?, integration = ?, unique_id = ?
    WHERE id = ?
";
const DELETE_BY_ID: &str = "DELETE FROM devices WHERE id = ?";

/// `SQLite`-backed device repository.
#[derive(Clone)]
pub struct SqliteDeviceRepository {
    pool: SqlitePool,
}

impl SqliteDeviceRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl DeviceRepository for SqliteDeviceRepository {
    async fn create(&self, device: Device) -> Result<Device, PlayGuardError> {
        sqlx::query(INSERT)
            .bind(device.id.to_string())
            .bind(&device.name)
            .bind(&device.manufacturer)
            .bind(&device.model)
            .bind(&device.integration)
            .bind(&device.unique_id)
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(device)
    }

    async fn get_by_id(&self, id: DeviceId) -> Result<Option<Device>, PlayGuardError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(Wrapper::maybe(row))
    }

    async fn get_all(&self) -> Result<Vec<Device>, PlayGuardError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_ALL)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn find_by_integration_unique_id(
        &self,
        integration: &str,
        unique_id: &str,
    ) -> Result<Option<Device>, PlayGuardError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_INTEGRATION_UNIQUE_ID)
            .bind(integration)
            .bind(unique_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(Wrapper::maybe(row))
    }

    async fn update(&self, device: Device) -> Result<Device, PlayGuardError> {
        sqlx::query(UPDATE)
            .bind(&device.name)
            .bind(&device.manufacturer)
            .bind(&device.model)
            .bind(&device.integration)
            .bind(&device.unique_id)
            .bind(device.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(device)
    }

    async fn delete(&self, id: DeviceId) -> Result<(), PlayGuardError> {
        sqlx::query(DELETE_BY_ID)
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(())
    }
}
