use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};

use crate::database::entities::salesforce_forms;
use crate::server::app::AppState;
use crate::server::error::ApiError;
use crate::services::{FormData, FormService};

use super::{ApiResponse, DataBody, LocaleQuery};

pub async fn list_forms(
    State(state): State<AppState>,
    Query(query): Query<LocaleQuery>,
) -> Result<Json<ApiResponse<Vec<salesforce_forms::Model>>>, ApiError> {
    let service = FormService::new(state.db.clone());
    let forms = service.list_forms(query.locale.as_deref()).await?;
    let total = forms.len() as u64;

    Ok(Json(ApiResponse::with_total(forms, total)))
}

pub async fn create_form(
    State(state): State<AppState>,
    Query(query): Query<LocaleQuery>,
    Json(body): Json<DataBody<FormData>>,
) -> Result<Json<ApiResponse<salesforce_forms::Model>>, ApiError> {
    let service = FormService::new(state.db.clone());
    let form = service
        .create_form(body.data, query.locale.as_deref())
        .await?;

    Ok(Json(ApiResponse::new(form)))
}

pub async fn get_form(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<salesforce_forms::Model>>, ApiError> {
    let service = FormService::new(state.db.clone());
    let form = service.get_form(id).await?;

    Ok(Json(ApiResponse::new(form)))
}

pub async fn update_form(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(query): Query<LocaleQuery>,
    Json(body): Json<DataBody<FormData>>,
) -> Result<Json<ApiResponse<salesforce_forms::Model>>, ApiError> {
    let service = FormService::new(state.db.clone());
    let form = service
        .update_form(id, body.data, query.locale.as_deref())
        .await?;

    Ok(Json(ApiResponse::new(form)))
}

pub async fn delete_form(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let service = FormService::new(state.db.clone());
    service.delete_form(id).await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn find_active(
    State(state): State<AppState>,
    Query(query): Query<LocaleQuery>,
) -> Result<Json<ApiResponse<Vec<salesforce_forms::Model>>>, ApiError> {
    let service = FormService::new(state.db.clone());
    let forms = service.find_active(query.locale.as_deref()).await?;
    let total = forms.len() as u64;

    Ok(Json(ApiResponse::with_total(forms, total)))
}

pub async fn find_by_form_name(
    State(state): State<AppState>,
    Path(form_name): Path<String>,
    Query(query): Query<LocaleQuery>,
) -> Result<Json<ApiResponse<salesforce_forms::Model>>, ApiError> {
    if form_name.trim().is_empty() {
        return Err(ApiError::bad_request("Missing formName parameter"));
    }

    let service = FormService::new(state.db.clone());
    let form = service
        .find_by_form_name(&form_name, query.locale.as_deref())
        .await?;

    Ok(Json(ApiResponse::new(form)))
}
