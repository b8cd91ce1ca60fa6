use askama::Template;
use axum::{
    Form, Router,
    extract::{Path, State},
    response::Html,
    routing::{get, post},
};
use serde::Deserialize;
use std::sync::Arc;

use crate::cabin::{CabinService, NewCabin};
use crate::web::AppState;
use crate::web::dashboard::{
    DashboardError, parse_dashboard_id, render_cabin_details, render_cabin_grid,
};

/// Form fields posted by the "Add cabin" dialog.
#[derive(Debug, Deserialize)]
pub struct CabinForm {
    pub name: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
}

#[derive(Template)]
#[template(path = "cabins/add_cabin_form.html")]
struct AddCabinFormTemplate;

/// Handler for GET /dashboard/cabins - Renders the cabin cards.
#[tracing::instrument(skip(state))]
pub async fn cabin_grid_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Html<String>, DashboardError> {
    render_cabin_grid(&state.db).await
}

/// Handler for GET /dashboard/cabins/form - Renders an empty cabin form.
#[tracing::instrument]
pub async fn add_cabin_form_handler() -> Result<Html<String>, DashboardError> {
    let template = AddCabinFormTemplate;
    template.render().map(Html).map_err(DashboardError::from)
}

/// Handler for POST /dashboard/cabins - Registers a cabin and re-renders the cards.
#[tracing::instrument(skip(state))]
pub async fn create_cabin_handler(
    State(state): State<Arc<AppState>>,
    Form(form): Form<CabinForm>,
) -> Result<Html<String>, DashboardError> {
    // Browsers submit untouched inputs as empty strings.
    let description = form.description.filter(|text| !text.trim().is_empty());
    let new_cabin = NewCabin::parse(form.name, form.location, description)?;

    let service = CabinService::new(&state.db);
    let cabin = service.create_cabin(new_cabin).await?;
    tracing::info!("Cabin {} registered from the dashboard", cabin.id());

    render_cabin_grid(&state.db).await
}

/// Handler for GET /dashboard/cabins/{id} - Renders a cabin with its tasks.
#[tracing::instrument(skip(state))]
pub async fn cabin_details_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Html<String>, DashboardError> {
    let id = parse_dashboard_id(&id)?;
    render_cabin_details(&state.db, id).await
}

/// Handler for POST /dashboard/cabins/{id}/delete - Removes a cabin and its tasks.
#[tracing::instrument(skip(state))]
pub async fn delete_cabin_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Html<String>, DashboardError> {
    let id = parse_dashboard_id(&id)?;
    let service = CabinService::new(&state.db);
    service.delete_cabin_by_id(id).await?;

    render_cabin_grid(&state.db).await
}

/// Creates the dashboard routes that deal with cabins.
pub fn create_dashboard_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/dashboard/cabins",
            get(cabin_grid_handler).post(create_cabin_handler),
        )
        .route("/dashboard/cabins/form", get(add_cabin_form_handler))
        .route("/dashboard/cabins/{id}", get(cabin_details_handler))
        .route("/dashboard/cabins/{id}/delete", post(delete_cabin_handler))
        .with_state(state)
}
