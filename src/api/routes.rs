use axum::{http::Method, routing::get, Router};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::reports::ReportService;

use super::handlers::{get_report, health_check, list_reports, list_taxonomies, AppState};

pub fn create_api_router(reports: Arc<ReportService>) -> Router {
    let state = Arc::new(AppState { reports });

    let cors = CorsLayer::new()
        .allow_methods([Method::GET])
        .allow_origin(Any);

    Router::new()
        .route("/health", get(health_check))
        .route("/api/reports", get(list_reports))
        .route("/api/reports/{kind}", get(get_report))
        .route("/api/taxonomies", get(list_taxonomies))
        .layer(cors)
        .with_state(state)
}
