use crate::entities::sea_orm_active_enums::{TaskPriority, TaskStatus};
use crate::task::{NewTask, Task, TaskService, TaskUpdate};
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

/// JSON representation of a MaintenanceTask for API responses.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaskJson {
    /// Unique identifier of the task
    pub id: Uuid,
    /// Cabin the task belongs to
    pub cabin_id: Uuid,
    pub description: String,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
    /// Refreshed on every change
    pub updated_at: DateTime<Utc>,
}

impl From<Task> for TaskJson {
    fn from(task: Task) -> Self {
        Self {
            id: task.id(),
            cabin_id: task.cabin_id(),
            description: task.description().to_string(),
            priority: task.priority(),
            status: task.status(),
            created_at: task.created_at(),
            updated_at: task.updated_at(),
        }
    }
}

/// Request payload for creating a task.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    /// UUID of an existing cabin
    pub cabin_id: Option<String>,
    pub description: Option<String>,
    /// High, Medium or Low; defaults to Medium
    pub priority: Option<String>,
    /// Pending, In Progress or Complete; defaults to Pending
    pub status: Option<String>,
}

/// Request payload for a partial task update. Absent fields are left unchanged.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateTaskRequest {
    pub description: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
}

/// Handler for POST /api/tasks - Creates a task for an existing cabin.
#[tracing::instrument(skip(state, payload))]
#[utoipa::path(
    post,
    path = "/api/tasks",
    request_body = CreateTaskRequest,
    responses(
        (status = 201, description = "Task created", body = TaskJson),
        (status = 400, description = "Invalid task or cabin does not exist", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Tasks"
)]
pub async fn create_task_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TaskJson>), ApiError> {
    let Json(request) = payload?;
    let new_task = NewTask::parse(
        request.cabin_id,
        request.description,
        request.priority,
        request.status,
    )?;

    let service = TaskService::new(&state.db);
    let task = service.create_task(new_task).await?;
    Ok((StatusCode::CREATED, Json(TaskJson::from(task))))
}

/// Handler for GET /api/tasks - Returns every task, newest first.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/api/tasks",
    responses(
        (status = 200, description = "Successfully retrieved tasks", body = [TaskJson]),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Tasks"
)]
pub async fn get_tasks_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<TaskJson>>, ApiError> {
    let service = TaskService::new(&state.db);
    let tasks = service.get_all_tasks().await?;
    Ok(Json(tasks.into_iter().map(TaskJson::from).collect()))
}

/// Handler for GET /api/tasks/cabin/{cabin_id} - Returns the tasks of one cabin.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/api/tasks/cabin/{cabin_id}",
    params(
        ("cabin_id" = String, Path, description = "Cabin UUID")
    ),
    responses(
        (status = 200, description = "Successfully retrieved tasks", body = [TaskJson]),
        (status = 400, description = "Malformed ID", body = ErrorResponse),
        (status = 404, description = "Cabin not found", body = ErrorResponse)
    ),
    tag = "Tasks"
)]
pub async fn get_tasks_for_cabin_handler(
    State(state): State<Arc<AppState>>,
    Path(cabin_id): Path<String>,
) -> Result<Json<Vec<TaskJson>>, ApiError> {
    let cabin_id = parse_id(&cabin_id)?;
    let service = TaskService::new(&state.db);
    let tasks = service.get_tasks_for_cabin(cabin_id).await?;
    Ok(Json(tasks.into_iter().map(TaskJson::from).collect()))
}

/// Handler for GET /api/tasks/{id} - Returns one task.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/api/tasks/{id}",
    params(
        ("id" = String, Path, description = "Task UUID")
    ),
    responses(
        (status = 200, description = "Task found", body = TaskJson),
        (status = 400, description = "Malformed ID", body = ErrorResponse),
        (status = 404, description = "Task not found", body = ErrorResponse)
    ),
    tag = "Tasks"
)]
pub async fn get_task_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<TaskJson>, ApiError> {
    let id = parse_id(&id)?;
    let service = TaskService::new(&state.db);
    let task = service.get_task_by_id(id).await?;
    Ok(Json(TaskJson::from(task)))
}

/// Handler for PATCH /api/tasks/{id} - Applies a partial update.
#[tracing::instrument(skip(state, payload))]
#[utoipa::path(
    patch,
    path = "/api/tasks/{id}",
    params(
        ("id" = String, Path, description = "Task UUID")
    ),
    request_body = UpdateTaskRequest,
    responses(
        (status = 200, description = "Task updated", body = TaskJson),
        (status = 400, description = "Malformed ID or invalid fields", body = ErrorResponse),
        (status = 404, description = "Task not found", body = ErrorResponse)
    ),
    tag = "Tasks"
)]
pub async fn update_task_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateTaskRequest>, JsonRejection>,
) -> Result<Json<TaskJson>, ApiError> {
    let id = parse_id(&id)?;
    let Json(request) = payload?;
    let update = TaskUpdate::parse(request.description, request.priority, request.status)?;

    let service = TaskService::new(&state.db);
    let task = service.update_task(id, update).await?;
    Ok(Json(TaskJson::from(task)))
}

/// Handler for DELETE /api/tasks/{id} - Permanently removes a task.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    delete,
    path = "/api/tasks/{id}",
    params(
        ("id" = String, Path, description = "Task UUID")
    ),
    responses(
        (status = 204, description = "Task deleted"),
        (status = 400, description = "Malformed ID", body = ErrorResponse),
        (status = 404, description = "Task not found", body = ErrorResponse)
    ),
    tag = "Tasks"
)]
pub async fn delete_task_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    let service = TaskService::new(&state.db);
    service.delete_task_by_id(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Creates and returns the tasks API router.
pub fn create_api_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/tasks", get(get_tasks_handler).post(create_task_handler))
        .route("/tasks/cabin/{cabin_id}", get(get_tasks_for_cabin_handler))
        .route(
            "/tasks/{id}",
            get(get_task_handler)
                .patch(update_task_handler)
                .delete(delete_task_handler),
        )
        .with_state(state)
}
