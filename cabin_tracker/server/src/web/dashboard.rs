//! Shared pieces of the server-rendered dashboard.

use askama::Template;
use axum::{
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::Html,
};
use sea_orm::{DatabaseConnection, Iterable};
use uuid::Uuid;

use crate::cabin::{Cabin, CabinService, CabinServiceError, CabinSummary};
use crate::entities::sea_orm_active_enums::{TaskPriority, TaskStatus};
use crate::task::{Task, TaskServiceError};
use crate::validation::{ValidationErrors, parse_hyphenated_uuid};

/// Custom error type for dashboard handler operations.
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    /// Represents an error during template rendering.
    #[error("Template rendering failed")]
    Template(#[from] askama::Error),
    /// Represents a cabin service error.
    #[error("Cabin service error: {0}")]
    Cabin(#[from] CabinServiceError),
    /// Represents a task service error.
    #[error("Task service error: {0}")]
    Task(#[from] TaskServiceError),
    /// Represents rejected form input.
    #[error("{0}")]
    Validation(#[from] ValidationErrors),
    /// Represents a malformed identifier in the URL.
    #[error("\"{0}\" is not a valid UUID")]
    InvalidId(String),
}

impl axum::response::IntoResponse for DashboardError {
    fn into_response(self) -> axum::response::Response {
        let (status_code, user_facing_error_message) = match &self {
            DashboardError::Cabin(CabinServiceError::CabinNotFound(_))
            | DashboardError::Task(TaskServiceError::TaskNotFound(_))
            | DashboardError::Task(TaskServiceError::CabinNotFound(_)) => {
                (StatusCode::NOT_FOUND, self.to_string())
            }
            DashboardError::Task(TaskServiceError::CabinDoesNotExist(id)) => (
                StatusCode::BAD_REQUEST,
                format!("Cabin with ID {id} does not exist"),
            ),
            DashboardError::InvalidId(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            DashboardError::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                errors
                    .field_errors()
                    .iter()
                    .map(|error| error.message.as_str())
                    .collect::<Vec<_>>()
                    .join(". "),
            ),
            DashboardError::Template(_)
            | DashboardError::Cabin(CabinServiceError::Database(_))
            | DashboardError::Task(TaskServiceError::Database(_)) => {
                tracing::error!("Dashboard request failed: {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected error occurred while processing your request. Please try again later."
                        .to_string(),
                )
            }
        };

        let error_template = ErrorMessageTemplate::new(user_facing_error_message);
        let Ok(rendered) = error_template.render() else {
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        };

        let mut response = (status_code, Html(rendered)).into_response();
        // Add HTMX headers to retarget the error message to the error div
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static("hx-retarget"),
            HeaderValue::from_static("#error-message"),
        );
        headers.insert(
            HeaderName::from_static("hx-reswap"),
            HeaderValue::from_static("innerHTML"),
        );
        response.headers_mut().extend(headers);
        response
    }
}

/// Parses an identifier taken from a dashboard URL.
pub(crate) fn parse_dashboard_id(raw: &str) -> Result<Uuid, DashboardError> {
    parse_hyphenated_uuid(raw).ok_or_else(|| DashboardError::InvalidId(raw.to_string()))
}

pub(crate) fn priority_badge_class(priority: TaskPriority) -> &'static str {
    match priority {
        TaskPriority::High => "badge badge-high",
        TaskPriority::Medium => "badge badge-medium",
        TaskPriority::Low => "badge badge-low",
    }
}

pub(crate) fn status_badge_class(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Pending => "badge badge-pending",
        TaskStatus::InProgress => "badge badge-in-progress",
        TaskStatus::Complete => "badge badge-complete",
    }
}

/// A task prepared for display.
#[derive(Debug, Clone)]
pub(crate) struct TaskRow {
    pub id: Uuid,
    pub description: String,
    pub priority: &'static str,
    pub priority_class: &'static str,
    pub status: &'static str,
    pub status_class: &'static str,
    pub created_at: String,
}

impl From<&Task> for TaskRow {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id(),
            description: task.description().to_string(),
            priority: task.priority().as_str(),
            priority_class: priority_badge_class(task.priority()),
            status: task.status().as_str(),
            status_class: status_badge_class(task.status()),
            created_at: task.created_at().format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// One `<option>` of a select box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SelectOption {
    pub value: &'static str,
    pub selected: bool,
}

pub(crate) fn priority_options(selected: TaskPriority) -> Vec<SelectOption> {
    TaskPriority::iter()
        .map(|priority| SelectOption {
            value: priority.as_str(),
            selected: priority == selected,
        })
        .collect()
}

pub(crate) fn status_options(selected: TaskStatus) -> Vec<SelectOption> {
    TaskStatus::iter()
        .map(|status| SelectOption {
            value: status.as_str(),
            selected: status == selected,
        })
        .collect()
}

#[derive(Template)]
#[template(path = "dashboard.html")]
struct DashboardTemplate;

#[derive(Template)]
#[template(path = "error_message.html")]
struct ErrorMessageTemplate {
    message: String,
}

impl ErrorMessageTemplate {
    pub fn new(message: String) -> Self {
        Self { message }
    }
}

#[derive(Template)]
#[template(path = "cabins/cabin_grid.html")]
struct CabinGridTemplate {
    summaries: Vec<CabinSummary>,
}

#[derive(Template)]
#[template(path = "cabins/cabin_details.html")]
struct CabinDetailsTemplate {
    cabin: Cabin,
    tasks: Vec<TaskRow>,
}

/// Handler for the dashboard page.
#[tracing::instrument]
pub async fn dashboard_handler() -> Result<Html<String>, DashboardError> {
    let template = DashboardTemplate;
    template.render().map(Html).map_err(DashboardError::from)
}

/// Renders the cabin cards with their pending task counts.
#[tracing::instrument(skip(db))]
pub(crate) async fn render_cabin_grid(
    db: &DatabaseConnection,
) -> Result<Html<String>, DashboardError> {
    let cabin_service = CabinService::new(db);
    let summaries = cabin_service.get_cabins_summary().await?;
    let template = CabinGridTemplate { summaries };
    template.render().map(Html).map_err(DashboardError::from)
}

/// Renders the details panel of one cabin with its tasks.
#[tracing::instrument(skip(db))]
pub(crate) async fn render_cabin_details(
    db: &DatabaseConnection,
    cabin_id: Uuid,
) -> Result<Html<String>, DashboardError> {
    let cabin_service = CabinService::new(db);
    let details = cabin_service.get_cabin_details(cabin_id).await?;
    let tasks = details.tasks().iter().map(TaskRow::from).collect();
    let (cabin, _) = details.into_parts();
    let template = CabinDetailsTemplate { cabin, tasks };
    template.render().map(Html).map_err(DashboardError::from)
}
