//! Shared application state for axum handlers.

use std::sync::Arc;

use playguard_app::services::device_service::DeviceService;
use playguard_app::services::entity_service::EntityService;

/// Application state shared across all axum handlers.
///
/// Generic over the repository types, event publisher, event store and
/// service caller to avoid dynamic dispatch. `Clone` is implemented manually
/// so the underlying types themselves do not need to be `Clone`; only the
/// `Arc` wrappers are cloned.
pub struct AppState<ER, DR, EP, ES, SC> {
    /// Entity CRUD service.
    pub entity_service: Arc<EntityService<ER, EP>>,
    /// Device CRUD service.
    pub device_service: Arc<DeviceService<DR>>,
    /// Event store for querying persisted events.
    pub event_store: Arc<ES>,
    /// Routes service calls to the owning integration.
    pub service_caller: Arc<SC>,
}

impl<ER, DR, EP, ES, SC> Clone for AppState<ER, DR, EP, ES, SC> {
    fn clone(&self) -> Self {
        Self {
            entity_service: Arc::clone(&self.entity_service),
            device_service: Arc::clone(&self.device_service),
            event_store: Arc::clone(&self.event_store),
            service_caller: Arc::clone(&self.service_caller),
        }
    }
}

impl<ER, DR, EP, ES, SC> AppState<ER, DR, EP, ES, SC> {
    /// Create a new application state from pre-wrapped `Arc` services.
    ///
    /// The services are shared with the integrations and background tasks,
    /// hence the `Arc`s.
    pub fn new(
        entity_service: Arc<EntityService<ER, EP>>,
        device_service: Arc<DeviceService<DR>>,
        event_store: Arc<ES>,
        service_caller: Arc<SC>,
    ) -> Self {
        Self {
            entity_service,
            device_service,
            event_store,
            service_caller,
        }
    }
}
