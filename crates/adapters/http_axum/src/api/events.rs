//! JSON REST handlers for events.

use std::str::FromStr;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use playguard_app::ports::{
    DeviceRepository, EntityRepository, EventPublisher, EventStore, ServiceCaller,
};
use playguard_domain::error::{NotFoundError, PlayGuardError};
use playguard_domain::event::Event;
use playguard_domain::id::{EntityId, EventId};

use crate::error::ApiError;
use crate::state::AppState;

const DEFAULT_LIMIT: usize = 100;
const MAX_LIMIT: usize = 1000;

/// Query parameters of the list endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// Only events about this entity.
    pub entity_id: Option<String>,
    pub limit: Option<usize>,
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<Event>>),
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
    Ok(Json<Event>),
}

impl IntoResponse for GetResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `GET /api/events`: recent events, newest first.
pub async fn list<ER, DR, EP, ES, SC>(
    State(state): State<AppState<ER, DR, EP, ES, SC>>,
    Query(query): Query<ListQuery>,
) -> Result<ListResponse, ApiError>
where
    ER: EntityRepository + Send + Sync + 'static,
    DR: DeviceRepository + Send + Sync + 'static,
    EP: EventPublisher + Send + Sync + 'static,
    ES: EventStore + Send + Sync + 'static,
    SC: ServiceCaller + 'static,
{
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
    let events = match query.entity_id.as_deref() {
        Some(id) => {
            let entity_id = EntityId::from_str(id).map_err(|_| ApiError::invalid_id(id))?;
            state.event_store.find_by_entity(entity_id, limit).await?
        }
        None => state.event_store.get_recent(limit).await?,
    };
    Ok(ListResponse::Ok(Json(events)))
}

/// `GET /api/events/{id}`
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
    let event_id = EventId::from_str(&id).map_err(|_| ApiError::invalid_id(&id))?;
    let event = state
        .event_store
        .get_by_id(event_id)
        .await?
        .ok_or_else(|| {
            PlayGuardError::from(NotFoundError {
                entity: "Event",
                id,
            })
        })?;
    Ok(GetResponse::Ok(Json(event)))
}
