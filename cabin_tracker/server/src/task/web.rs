use askama::Template;
use axum::{
    Form, Router,
    extract::{Path, State},
    response::Html,
    routing::{get, post},
};
use serde::Deserialize;
use std::sync::Arc;

use crate::cabin::CabinService;
use crate::task::{NewTask, TaskService, TaskUpdate};
use crate::web::AppState;
use crate::web::dashboard::{
    DashboardError, SelectOption, TaskRow, parse_dashboard_id, priority_options,
    render_cabin_details, status_options,
};

/// Form fields posted by the task dialogs.
#[derive(Debug, Deserialize)]
pub struct TaskForm {
    pub description: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
}

#[derive(Template)]
#[template(path = "tasks/add_task_form.html")]
struct AddTaskFormTemplate {
    cabin_id: String,
    cabin_name: String,
    priorities: Vec<SelectOption>,
    statuses: Vec<SelectOption>,
}

#[derive(Template)]
#[template(path = "tasks/edit_task_form.html")]
struct EditTaskFormTemplate {
    task: TaskRow,
    priorities: Vec<SelectOption>,
    statuses: Vec<SelectOption>,
}

/// Handler for GET /dashboard/cabins/{id}/tasks/form - Renders an empty task form.
#[tracing::instrument(skip(state))]
pub async fn add_task_form_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Html<String>, DashboardError> {
    let cabin_id = parse_dashboard_id(&id)?;
    let cabin = CabinService::new(&state.db).get_cabin_by_id(cabin_id).await?;

    let template = AddTaskFormTemplate {
        cabin_id: cabin.id().to_string(),
        cabin_name: cabin.name().to_string(),
        priorities: priority_options(Default::default()),
        statuses: status_options(Default::default()),
    };
    template.render().map(Html).map_err(DashboardError::from)
}

/// Handler for POST /dashboard/cabins/{id}/tasks - Adds a task and re-renders the cabin.
#[tracing::instrument(skip(state))]
pub async fn create_task_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Form(form): Form<TaskForm>,
) -> Result<Html<String>, DashboardError> {
    let cabin_id = parse_dashboard_id(&id)?;
    let new_task = NewTask::parse(
        Some(cabin_id.to_string()),
        form.description,
        form.priority,
        form.status,
    )?;

    let service = TaskService::new(&state.db);
    let task = service.create_task(new_task).await?;
    tracing::info!("Task {} added to cabin {} from the dashboard", task.id(), cabin_id);

    render_cabin_details(&state.db, cabin_id).await
}

/// Handler for GET /dashboard/tasks/{id}/edit - Renders a task form with its current values.
#[tracing::instrument(skip(state))]
pub async fn edit_task_form_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Html<String>, DashboardError> {
    let id = parse_dashboard_id(&id)?;
    let task = TaskService::new(&state.db).get_task_by_id(id).await?;

    let template = EditTaskFormTemplate {
        priorities: priority_options(task.priority()),
        statuses: status_options(task.status()),
        task: TaskRow::from(&task),
    };
    template.render().map(Html).map_err(DashboardError::from)
}

/// Handler for POST /dashboard/tasks/{id} - Saves an edited task.
#[tracing::instrument(skip(state))]
pub async fn update_task_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Form(form): Form<TaskForm>,
) -> Result<Html<String>, DashboardError> {
    let id = parse_dashboard_id(&id)?;
    let update = TaskUpdate::parse(form.description, form.priority, form.status)?;

    let service = TaskService::new(&state.db);
    let task = service.update_task(id, update).await?;

    render_cabin_details(&state.db, task.cabin_id()).await
}

/// Handler for POST /dashboard/tasks/{id}/delete - Removes a task.
#[tracing::instrument(skip(state))]
pub async fn delete_task_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Html<String>, DashboardError> {
    let id = parse_dashboard_id(&id)?;

    let service = TaskService::new(&state.db);
    let task = service.get_task_by_id(id).await?;
    service.delete_task_by_id(id).await?;

    render_cabin_details(&state.db, task.cabin_id()).await
}

/// Creates the dashboard routes that deal with maintenance tasks.
pub fn create_dashboard_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/dashboard/cabins/{id}/tasks/form",
            get(add_task_form_handler),
        )
        .route("/dashboard/cabins/{id}/tasks", post(create_task_handler))
        .route("/dashboard/tasks/{id}/edit", get(edit_task_form_handler))
        .route("/dashboard/tasks/{id}", post(update_task_handler))
        .route("/dashboard/tasks/{id}/delete", post(delete_task_handler))
        .with_state(state)
}
