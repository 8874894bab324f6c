//! JSON REST API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod devices;
#[allow(clippy::missing_errors_doc)]
pub mod entities;
#[allow(clippy::missing_errors_doc)]
pub mod events;

use axum::Router;
use axum::routing::{get, post, put};

use playguard_app::ports::{
    DeviceRepository, EntityRepository, EventPublisher, EventStore, ServiceCaller,
};

use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes<ER, DR, EP, ES, SC>() -> Router<AppState<ER, DR, EP, ES, SC>>
where
    ER: EntityRepository + Send + Sync + 'static,
    DR: DeviceRepository + Send + Sync + 'static,
    EP: EventPublisher + Send + Sync + 'static,
    ES: EventStore + Send + Sync + 'static,
    SC: ServiceCaller + 'static,
{
    Router::new()
        // Entities
        .route("/entities", get(entities::list::<ER, DR, EP, ES, SC>))
        .route("/entities/{id}", get(entities::get::<ER, DR, EP, ES, SC>))
        .route(
            "/entities/{id}/state",
            put(entities::update_state::<ER, DR, EP, ES, SC>),
        )
        .route(
            "/entities/{id}/services/{service}",
            post(entities::call_service::<ER, DR, EP, ES, SC>),
        )
        // Devices
        .route("/devices", get(devices::list::<ER, DR, EP, ES, SC>))
        .route("/devices/{id}", get(devices::get::<ER, DR, EP, ES, SC>))
        .route(
            "/devices/{id}/entities",
            get(devices::entities::<ER, DR, EP, ES, SC>),
        )
        // Events
        .route("/events", get(events::list::<ER, DR, EP, ES, SC>))
        .route("/events/{id}", get(events::get::<ER, DR, EP, ES, SC>))
}
