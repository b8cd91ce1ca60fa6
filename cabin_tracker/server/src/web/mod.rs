use axum::http::HeaderName;
use axum::{Router, routing::get};
use migration::MigratorTrait;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::Config;

pub mod api;
pub mod dashboard;

/// State shared by every handler.
#[derive(Clone, Debug)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
}

impl AppState {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db: Arc::new(db) }
    }
}

/// Builds the complete application: health check, dashboard, JSON API and API docs.
pub fn create_app_router(state: Arc<AppState>) -> Router {
    let dashboard_router = Router::new()
        .route("/", get(dashboard::dashboard_handler))
        .merge(crate::cabin::web::create_dashboard_router(state.clone()))
        .merge(crate::task::web::create_dashboard_router(state.clone()));

    Router::new()
        .route("/health", get(health_check_handler))
        .merge(dashboard_router)
        .merge(api::create_api_router(state))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api::ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::new().expose_headers([
                    HeaderName::from_static("hx-retarget"),
                    HeaderName::from_static("hx-reswap"),
                ])),
        )
}

#[tracing::instrument(skip(config))]
pub async fn start_web_server(config: Config) -> anyhow::Result<()> {
    let mut options = ConnectOptions::new(&config.database_url);
    options.sqlx_logging(config.is_development());
    let db = Database::connect(options).await?;

    if config.is_development() {
        migration::Migrator::up(&db, None).await?;
        tracing::info!("Database migrations applied successfully");
    } else {
        tracing::info!("Skipping migrations outside development");
    }

    let server_address = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&server_address).await?;
    tracing::info!("Web server running on http://{}", server_address);

    let app = create_app_router(Arc::new(AppState::new(db)));
    axum::serve(listener, app).await?;
    Ok(())
}

#[tracing::instrument]
pub async fn health_check_handler() -> &'static str {
    "OK"
}
