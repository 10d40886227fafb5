use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use crate::models::{RawParams, RenderedReport, ReportKind};
use crate::reports::{ReportError, ReportService};

pub struct AppState {
    pub reports: Arc<ReportService>,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Serialize)]
pub struct SuccessResponse {
    pub message: String,
}

#[derive(Serialize)]
pub struct ReportIndexEntry {
    pub kind: ReportKind,
    pub label: &'static str,
    pub paginated: bool,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn error_response(err: ReportError) -> ApiError {
    let (status, error) = match &err {
        ReportError::UnknownKind(_) => (StatusCode::NOT_FOUND, err.to_string()),
        ReportError::MissingDependency => (
            StatusCode::SERVICE_UNAVAILABLE,
            "Koko Analytics is not installed. Please install it first.".to_string(),
        ),
        ReportError::DataSource(_) | ReportError::DuplicateDimension { .. } => {
            tracing::error!("Failed to build report: {}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to retrieve report".to_string(),
            )
        }
    };

    (status, Json(ErrorResponse { error }))
}

/// List the available reports
pub async fn list_reports() -> Json<Vec<ReportIndexEntry>> {
    Json(
        ReportKind::ALL
            .into_iter()
            .map(|kind| ReportIndexEntry {
                kind,
                label: kind.label(),
                paginated: kind.is_paginated(),
            })
            .collect(),
    )
}

/// Render one report
pub async fn get_report(
    State(state): State<Arc<AppState>>,
    Path(kind): Path<String>,
    Query(params): Query<RawParams>,
) -> Result<Json<Arc<RenderedReport>>, ApiError> {
    state
        .reports
        .render_named(&kind, &params)
        .await
        .map(Json)
        .map_err(error_response)
}

/// Taxonomies selectable in the term report
pub async fn list_taxonomies(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<String>>, ApiError> {
    state
        .reports
        .taxonomies()
        .await
        .map(Json)
        .map_err(error_response)
}

/// Health check endpoint
pub async fn health_check() -> Json<SuccessResponse> {
    Json(SuccessResponse {
        message: "OK".to_string(),
    })
}
