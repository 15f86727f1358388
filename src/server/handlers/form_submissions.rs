use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::database::entities::form_submissions;
use crate::server::app::AppState;
use crate::server::error::ApiError;
use crate::services::{
    ExportFilter, ExportService, SubmissionData, SubmissionPatch, SubmissionService,
};

use super::{ApiResponse, DataBody};

#[derive(Deserialize)]
pub struct PageQuery {
    pub limit: Option<u64>,
    pub start: Option<u64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportQuery {
    pub locale: Option<String>,
    pub form_id: Option<i32>,
    pub from_date: Option<DateTime<Utc>>,
    pub to_date: Option<DateTime<Utc>>,
}

pub async fn list_submissions(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ApiResponse<Vec<form_submissions::Model>>>, ApiError> {
    let service = SubmissionService::new(state.db.clone());
    let page = service.list_submissions(query.limit, query.start).await?;

    Ok(Json(ApiResponse::with_total(page.results, page.total)))
}

pub async fn create_submission(
    State(state): State<AppState>,
    Json(body): Json<DataBody<SubmissionData>>,
) -> Result<Json<ApiResponse<form_submissions::Model>>, ApiError> {
    let service = SubmissionService::new(state.db.clone());
    let submission = service.create_submission(body.data).await?;

    Ok(Json(ApiResponse::new(submission)))
}

pub async fn get_submission(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<form_submissions::Model>>, ApiError> {
    let service = SubmissionService::new(state.db.clone());
    let submission = service.get_submission(id).await?;

    Ok(Json(ApiResponse::new(submission)))
}

pub async fn update_submission(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(body): Json<DataBody<SubmissionPatch>>,
) -> Result<Json<ApiResponse<form_submissions::Model>>, ApiError> {
    let service = SubmissionService::new(state.db.clone());
    let submission = service.update_submission(id, body.data).await?;

    Ok(Json(ApiResponse::new(submission)))
}

pub async fn delete_submission(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let service = SubmissionService::new(state.db.clone());
    service.delete_submission(id).await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn find_by_code(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<ApiResponse<form_submissions::Model>>, ApiError> {
    let service = SubmissionService::new(state.db.clone());
    let submission = service.find_by_code(&code).await?;

    Ok(Json(ApiResponse::new(submission)))
}

pub async fn update_by_code(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Json(body): Json<DataBody<SubmissionPatch>>,
) -> Result<Json<ApiResponse<form_submissions::Model>>, ApiError> {
    let service = SubmissionService::new(state.db.clone());
    let submission = service.update_submission_by_code(&code, body.data).await?;

    Ok(Json(ApiResponse::new(submission)))
}

/// Stream matching submissions back as an XLSX attachment.
pub async fn export_submissions(
    State(state): State<AppState>,
    Query(query): Query<ExportQuery>,
) -> Result<Response, ApiError> {
    let service = ExportService::new(state.db.clone());
    let buffer = service
        .export_submissions(ExportFilter {
            locale: query.locale,
            form_id: query.form_id,
            from_date: query.from_date,
            to_date: query.to_date,
        })
        .await?;

    let headers = [
        (
            header::CONTENT_TYPE,
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        ),
        (
            header::CONTENT_DISPOSITION,
            "attachment; filename=\"form-submissions.xlsx\"",
        ),
    ];

    Ok((headers, buffer).into_response())
}
