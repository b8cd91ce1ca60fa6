use crate::cabin::{Cabin, CabinDetails, CabinService, CabinSummary, NewCabin};
use crate::task::api::v1::TaskJson;
use crate::web::AppState;
use crate::web::api::v1::{ApiError, ErrorResponse, parse_id};
use axum::{
    Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::Json,
    routing::get,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

/// JSON representation of a Cabin for API responses.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CabinJson {
    /// Unique identifier of the cabin
    pub id: Uuid,
    pub name: String,
    pub location: String,
    pub description: Option<String>,
    /// When the cabin was registered
    pub created_at: DateTime<Utc>,
}

impl From<Cabin> for CabinJson {
    fn from(cabin: Cabin) -> Self {
        Self {
            id: cabin.id(),
            name: cabin.name().to_string(),
            location: cabin.location().to_string(),
            description: cabin.description().map(str::to_string),
            created_at: cabin.created_at(),
        }
    }
}

/// A cabin with its maintenance tasks, newest first.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CabinDetailsJson {
    #[serde(flatten)]
    pub cabin: CabinJson,
    pub maintenance_tasks: Vec<TaskJson>,
}

impl From<CabinDetails> for CabinDetailsJson {
    fn from(details: CabinDetails) -> Self {
        let (cabin, tasks) = details.into_parts();
        Self {
            cabin: CabinJson::from(cabin),
            maintenance_tasks: tasks.into_iter().map(TaskJson::from).collect(),
        }
    }
}

/// Pending task counts for one cabin.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CabinSummaryJson {
    pub id: Uuid,
    pub name: String,
    pub location: String,
    pub description: Option<String>,
    /// Pending tasks with High priority
    pub pending_high_priority: u64,
    /// Pending tasks with Medium priority
    pub pending_medium_priority: u64,
    /// Pending tasks with Low priority
    pub pending_low_priority: u64,
    /// All pending tasks of the cabin
    pub total_pending_tasks: u64,
}

impl From<CabinSummary> for CabinSummaryJson {
    fn from(summary: CabinSummary) -> Self {
        let pending = summary.pending();
        let cabin = summary.cabin();
        Self {
            id: cabin.id(),
            name: cabin.name().to_string(),
            location: cabin.location().to_string(),
            description: cabin.description().map(str::to_string),
            pending_high_priority: pending.high(),
            pending_medium_priority: pending.medium(),
            pending_low_priority: pending.low(),
            total_pending_tasks: pending.total(),
        }
    }
}

/// Request payload for registering a cabin.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCabinRequest {
    pub name: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
}

/// Handler for POST /api/cabins - Registers a new cabin.
#[tracing::instrument(skip(state, payload))]
#[utoipa::path(
    post,
    path = "/api/cabins",
    request_body = CreateCabinRequest,
    responses(
        (status = 201, description = "Cabin created", body = CabinJson),
        (status = 400, description = "Invalid cabin", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Cabins"
)]
pub async fn create_cabin_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateCabinRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CabinJson>), ApiError> {
    let Json(request) = payload?;
    let new_cabin = NewCabin::parse(request.name, request.location, request.description)?;

    let service = CabinService::new(&state.db);
    let cabin = service.create_cabin(new_cabin).await?;
    Ok((StatusCode::CREATED, Json(CabinJson::from(cabin))))
}

/// Handler for GET /api/cabins - Returns all cabins, newest first.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/api/cabins",
    responses(
        (status = 200, description = "Successfully retrieved cabins", body = [CabinJson]),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Cabins"
)]
pub async fn get_cabins_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<CabinJson>>, ApiError> {
    let service = CabinService::new(&state.db);
    let cabins = service.get_all_cabins().await?;
    Ok(Json(cabins.into_iter().map(CabinJson::from).collect()))
}

/// Handler for GET /api/cabins/summary - Returns pending task counts per cabin.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/api/cabins/summary",
    responses(
        (status = 200, description = "Successfully summarised cabins", body = [CabinSummaryJson]),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Cabins"
)]
pub async fn get_cabins_summary_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<CabinSummaryJson>>, ApiError> {
    let service = CabinService::new(&state.db);
    let summaries = service.get_cabins_summary().await?;
    Ok(Json(
        summaries.into_iter().map(CabinSummaryJson::from).collect(),
    ))
}

/// Handler for GET /api/cabins/{id} - Returns a cabin and its tasks.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/api/cabins/{id}",
    params(
        ("id" = String, Path, description = "Cabin UUID")
    ),
    responses(
        (status = 200, description = "Cabin found", body = CabinDetailsJson),
        (status = 400, description = "Malformed ID", body = ErrorResponse),
        (status = 404, description = "Cabin not found", body = ErrorResponse)
    ),
    tag = "Cabins"
)]
pub async fn get_cabin_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<CabinDetailsJson>, ApiError> {
    let id = parse_id(&id)?;
    let service = CabinService::new(&state.db);
    let details = service.get_cabin_details(id).await?;
    Ok(Json(CabinDetailsJson::from(details)))
}

/// Handler for DELETE /api/cabins/{id} - Deletes a cabin and all of its tasks.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    delete,
    path = "/api/cabins/{id}",
    params(
        ("id" = String, Path, description = "Cabin UUID")
    ),
    responses(
        (status = 204, description = "Cabin deleted"),
        (status = 400, description = "Malformed ID", body = ErrorResponse),
        (status = 404, description = "Cabin not found", body = ErrorResponse)
    ),
    tag = "Cabins"
)]
pub async fn delete_cabin_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    let service = CabinService::new(&state.db);
    service.delete_cabin_by_id(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Creates and returns the cabins API router.
pub fn create_api_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/cabins",
            get(get_cabins_handler).post(create_cabin_handler),
        )
        .route("/cabins/summary", get(get_cabins_summary_handler))
        .route(
            "/cabins/{id}",
            get(get_cabin_handler).delete(delete_cabin_handler),
        )
        .with_state(state)
}
