//! JSON REST handlers for entities.

use std::str::FromStr;

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use playguard_app::ports::{
    DeviceRepository, EntityRepository, EventPublisher, EventStore, ServiceCaller,
};
use playguard_domain::control::ControlKind;
use playguard_domain::entity::{Entity, EntityState};
use playguard_domain::id::EntityId;
use playguard_domain::service::ServiceCall;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for updating entity state.
#[derive(Deserialize)]
pub struct UpdateStateRequest {
    pub state: EntityState,
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<Entity>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the single-entity endpoints.
pub enum GetResponse {
    Ok(Json<Entity>),
}

impl IntoResponse for GetResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

fn parse_id(id: &str) -> Result<EntityId, ApiError> {
    EntityId::from_str(id).map_err(|_| ApiError::invalid_id(id))
}

/// `GET /api/entities`
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
    let entities = state.entity_service.list_entities().await?;
    Ok(ListResponse::Ok(Json(entities)))
}

/// `GET /api/entities/{id}`
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
    let entity = state.entity_service.get_entity(parse_id(&id)?).await?;
    Ok(GetResponse::Ok(Json(entity)))
}

/// `PUT /api/entities/{id}/state`
///
/// Writes the state directly, the way a player reports what it is doing.
/// A transition into `playing` is what the playback guard reacts to.
/// Time control companions are only set through their services.
pub async fn update_state<ER, DR, EP, ES, SC>(
    State(state): State<AppState<ER, DR, EP, ES, SC>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateStateRequest>,
) -> Result<GetResponse, ApiError>
where
    ER: EntityRepository + Send + Sync + 'static,
    DR: DeviceRepository + Send + Sync + 'static,
    EP: EventPublisher + Send + Sync + 'static,
    ES: EventStore + Send + Sync + 'static,
    SC: ServiceCaller + 'static,
{
    let target = state.entity_service.get_entity(parse_id(&id)?).await?;
    if ControlKind::from_entity_id(&target.entity_id).is_some() {
        return Err(ApiError::BadRequest(format!(
            "{} is a time control; use its services to change it",
            target.entity_id
        )));
    }
    let updated = state
        .entity_service
        .update_entity_state(target.id, req.state)
        .await?;
    Ok(GetResponse::Ok(Json(updated)))
}

/// `POST /api/entities/{id}/services/{service}`
///
/// The optional JSON body is passed on as the service data.
pub async fn call_service<ER, DR, EP, ES, SC>(
    State(state): State<AppState<ER, DR, EP, ES, SC>>,
    Path((id, service)): Path<(String, String)>,
    body: Bytes,
) -> Result<GetResponse, ApiError>
where
    ER: EntityRepository + Send + Sync + 'static,
    DR: DeviceRepository + Send + Sync + 'static,
    EP: EventPublisher + Send + Sync + 'static,
    ES: EventStore + Send + Sync + 'static,
    SC: ServiceCaller + 'static,
{
    let entity_id = parse_id(&id)?;
    let data = if body.iter().all(u8::is_ascii_whitespace) {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body)
            .map_err(|err| ApiError::BadRequest(format!("invalid service data: {err}")))?
    };

    let entity = state
        .service_caller
        .call_service(ServiceCall::new(entity_id, service, data))
        .await?;
    Ok(GetResponse::Ok(Json(entity)))
}
