//! JSON REST handlers for devices.

use std::str::FromStr;

use axum::Json;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};

use playguard_app::ports::{
    DeviceRepository, EntityRepository, EventPublisher, EventStore, ServiceCaller,
};
use playguard_domain::device::Device;
use playguard_domain::entity::Entity;
use playguard_domain::id::DeviceId;

use crate::error::ApiError;
use crate::state::AppState;

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<Device>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the get endpoint.
pub enum GetResponse {
    Ok(Json<Device>),
}

impl IntoResponse for GetResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the device entities endpoint.
pub enum EntitiesResponse {
    Ok(Json<Vec<Entity>>),
}

impl IntoResponse for EntitiesResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

fn parse_id(id: &str) -> Result<DeviceId, ApiError> {
    DeviceId::from_str(id).map_err(|_| ApiError::invalid_id(id))
}

/// `GET /api/devices`
pub async fn list<ER, DR, EP, ES, SC>(
    State(state): State<AppState<ER, DR, EP, ES, SC>>,
) -> Result<ListResponse, ApiError>
where
    ER: EntityRepository + Send + Sync + 'static,
    DR: DeviceRepository + Send + Sync + 'static,
    EP: EventPublisher + Send + Sync + 'static,
    ES: EventStore + Send + Sync + 'static,
    SC: ServiceCaller + 'static,
{
    let devices = state.device_service.list_devices().await?;
    Ok(ListResponse::Ok(Json(devices)))
}

/// `GET /api/devices/{id}`
pub async fn get<ER, DR, EP, ES, SC>(
    State(state): State<AppState<ER, DR, EP, ES, SC>>,
    Path(id): Path<String>,
) -> Result<GetResponse, ApiError>
where
    ER: EntityRepository + Send + Sync + 'static,
    DR: DeviceRepository + Send + Sync + 'static,
    EP: EventPublisher + Send + Sync + 'static,
    ES: EventStore + Send + Sync + 'static,
    SC: ServiceCaller + 'static,
{
    let device = state.device_service.get_device(parse_id(&id)?).await?;
    Ok(GetResponse::Ok(Json(device)))
}

/// `GET /api/devices/{id}/entities`
pub async fn entities<ER, DR, EP, ES, SC>(
    State(state): State<AppState<ER, DR, EP, ES, SC>>,
    Path(id): Path<String>,
) -> Result<EntitiesResponse, ApiError>
where
    ER: EntityRepository + Send + Sync + 'static,
    DR: DeviceRepository + Send + Sync + 'static,
    EP: EventPublisher + Send + Sync + 'static,
    ES: EventStore + Send + Sync + 'static,
    SC: ServiceCaller + 'static,
{
    let device = state.device_service.get_device(parse_id(&id)?).await?;
    let entities = state.entity_service.list_by_device(device.id).await?;
    Ok(EntitiesResponse::Ok(Json(entities)))
}
