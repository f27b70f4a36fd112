use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use camgate_application::RoleWriteOutcome;
use camgate_core::AppError;

use crate::dto::{KeysResponse, RoleRequest, RoleResponse, WarningsResponse};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_roles_handler(State(state): State<AppState>) -> ApiResult<Json<KeysResponse>> {
    let keys = state.role_service.list_roles().await?;

    Ok(Json(KeysResponse { keys }))
}

pub async fn read_role_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Json<RoleResponse>> {
    let role = state
        .role_service
        .read_role(name.as_str())
        .await?
        .ok_or(AppError::RoleNotFound(name))?;

    Ok(Json(RoleResponse::from(role)))
}

pub async fn create_role_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(payload): Json<RoleRequest>,
) -> ApiResult<Response> {
    let input = payload.into_input()?;
    let outcome = if state.role_service.role_exists(name.as_str()).await? {
        state.role_service.update_role(name.as_str(), input).await?
    } else {
        state.role_service.create_role(name.as_str(), input).await?
    };

    Ok(write_response(outcome))
}

pub async fn update_role_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(payload): Json<RoleRequest>,
) -> ApiResult<Response> {
    let outcome = state
        .role_service
        .update_role(name.as_str(), payload.into_input()?)
        .await?;

    Ok(write_response(outcome))
}

pub async fn delete_role_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<StatusCode> {
    state.role_service.delete_role(name.as_str()).await?;

    Ok(StatusCode::NO_CONTENT)
}

fn write_response(outcome: RoleWriteOutcome) -> Response {
    if outcome.warnings.is_empty() {
        return StatusCode::NO_CONTENT.into_response();
    }

    (
        StatusCode::OK,
        Json(WarningsResponse {
            warnings: outcome.warnings,
        }),
    )
        .into_response()
}
