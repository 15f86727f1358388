use anyhow::{anyhow, Result};
use axum::{routing::get, Router};
use sea_orm::DatabaseConnection;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};

use super::handlers::{form_submissions, health, salesforce_forms};

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
}

pub async fn create_app(db: DatabaseConnection, cors_origin: Option<&str>) -> Result<Router> {
    let state = AppState { db };

    let cors = match cors_origin {
        Some(origin) => CorsLayer::new()
            .allow_origin(
                origin
                    .parse::<axum::http::HeaderValue>()
                    .map_err(|e| anyhow!("Invalid CORS origin: {}", e))?,
            )
            .allow_methods(Any)
            .allow_headers(Any),
        None => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    };

    let app = Router::new()
        // Health check endpoint
        .route("/health", get(health::health_check))
        // Admin routes (operator UI)
        .nest("/admin", admin_routes())
        // Content API routes (end-user facing; overlapping paths by design)
        .nest("/api", content_api_routes())
        // Add middleware
        .layer(ServiceBuilder::new().layer(cors))
        .with_state(state);

    Ok(app)
}

fn admin_routes() -> Router<AppState> {
    Router::new()
        // Salesforce form routes
        .route(
            "/salesforce-forms",
            get(salesforce_forms::list_forms).post(salesforce_forms::create_form),
        )
        .route(
            "/salesforce-forms/:id",
            get(salesforce_forms::get_form)
                .put(salesforce_forms::update_form)
                .delete(salesforce_forms::delete_form),
        )
        // Form submission routes
        .route(
            "/form-submissions",
            get(form_submissions::list_submissions).post(form_submissions::create_submission),
        )
        .route(
            "/form-submissions/export",
            get(form_submissions::export_submissions),
        )
        .route(
            "/form-submissions/:id",
            get(form_submissions::get_submission)
                .put(form_submissions::update_submission)
                .delete(form_submissions::delete_submission),
        )
}

fn content_api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/salesforce-forms",
            get(salesforce_forms::list_forms).post(salesforce_forms::create_form),
        )
        .route("/salesforce-forms/active", get(salesforce_forms::find_active))
        .route(
            "/salesforce-forms/name/:formName",
            get(salesforce_forms::find_by_form_name),
        )
        .route(
            "/salesforce-forms/:id",
            get(salesforce_forms::get_form)
                .put(salesforce_forms::update_form)
                .delete(salesforce_forms::delete_form),
        )
        .route(
            "/form-submissions",
            get(form_submissions::list_submissions).post(form_submissions::create_submission),
        )
        .route(
            "/form-submissions/:id",
            get(form_submissions::get_submission),
        )
        .route(
            "/form-submissions/code/:code",
            get(form_submissions::find_by_code).put(form_submissions::update_by_code),
        )
}
