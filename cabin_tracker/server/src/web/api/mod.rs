use std::sync::Arc;

use axum::Router;
use utoipa::OpenApi;

use crate::web::AppState;

pub mod v1;

/// OpenAPI document for the JSON API.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::cabin::api::v1::create_cabin_handler,
        crate::cabin::api::v1::get_cabins_handler,
        crate::cabin::api::v1::get_cabins_summary_handler,
        crate::cabin::api::v1::get_cabin_handler,
        crate::cabin::api::v1::delete_cabin_handler,
        crate::task::api::v1::create_task_handler,
        crate::task::api::v1::get_tasks_handler,
        crate::task::api::v1::get_tasks_for_cabin_handler,
        crate::task::api::v1::get_task_handler,
        crate::task::api::v1::update_task_handler,
        crate::task::api::v1::delete_task_handler,
    ),
    components(schemas(
        v1::ErrorResponse,
        crate::validation::FieldError,
        crate::entities::sea_orm_active_enums::TaskPriority,
        crate::entities::sea_orm_active_enums::TaskStatus,
        crate::cabin::api::v1::CabinJson,
        crate::cabin::api::v1::CabinDetailsJson,
        crate::cabin::api::v1::CabinSummaryJson,
        crate::cabin::api::v1::CreateCabinRequest,
        crate::task::api::v1::TaskJson,
        crate::task::api::v1::CreateTaskRequest,
        crate::task::api::v1::UpdateTaskRequest,
    )),
    tags(
        (name = "Cabins", description = "Rental cabins and their pending work"),
        (name = "Tasks", description = "Maintenance tasks")
    )
)]
pub struct ApiDoc;

/// Creates the API routes for JSON API endpoints.
pub fn create_api_router(state: Arc<AppState>) -> Router {
    let cabins_router = crate::cabin::api::v1::create_api_router(state.clone());
    let tasks_router = crate::task::api::v1::create_api_router(state);
    Router::new().nest("/api", cabins_router.merge(tasks_router))
}
