//! Device service: use-cases for managing devices.

use playguard_domain::device::Device;
use playguard_domain::error::{NotFoundError, PlayGuardError};
use playguard_domain::id::DeviceId;

use crate::ports::DeviceRepository;

/// Application service for device CRUD operations.
pub struct DeviceService<R> {
    repo: R,
}

impl<R: DeviceRepository> DeviceService<R> {
    /// Create a new service backed by the given repository.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Create a new device after validating domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`PlayGuardError::Validation`] if invariants fail, or a
    /// storage error propagated from the repository.
    #[tracing::instrument(skip(self, device), fields(device_name = %device.name))]
    pub async fn create_device(&self, device: Device) -> Result<Device, PlayGuardError> {
        device.validate()?;
        self.repo.create(device).await
    }

    /// Look up a device by id, returning an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`PlayGuardError::NotFound`] when no device with `id` exists,
    /// or a storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn get_device(&self, id: DeviceId) -> Result<Device, PlayGuardError> {
        self.repo.get_by_id(id).await?.ok_or_else(|| {
            NotFoundError {
                entity: "Device",
                id: id.to_string(),
            }
            .into()
        })
    }

    /// List all devices.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_devices(&self) -> Result<Vec<Device>, PlayGuardError> {
        self.repo.get_all().await
    }

    /// Create or update a device by its `(integration, unique_id)` pair.
    ///
    /// An existing device keeps its id; name, manufacturer and model are
    /// replaced.
    ///
    /// # Errors
    ///
    /// Returns [`PlayGuardError::Validation`] if invariants fail, or a
    /// storage error propagated from the repository.
    #[tracing::instrument(skip(self, device), fields(device_name = %device.name))]
    pub async fn upsert_device(&self, device: Device) -> Result<Device, PlayGuardError> {
        device.validate()?;
        if let Some(existing) = self
            .repo
            .find_by_integration_unique_id(&device.integration, &device.unique_id)
            .await?
        {
            return self.repo.update(Device {
                id: existing.id,
                ..device
            })
            .await;
        }
        self.repo.create(device).await
    }

    /// Delete a device by id.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn delete_device(&self, id: DeviceId) -> Result<(), PlayGuardError> {
        self.repo.delete(id).await
    }
}
