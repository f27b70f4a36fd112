use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use camgate_application::ClientConfigInput;
use camgate_core::AppError;

use crate::dto::{ClientConfigRequest, ClientConfigResponse};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn read_client_config_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<ClientConfigResponse>> {
    let config = state
        .client_config_service
        .read_config()
        .await?
        .ok_or_else(|| AppError::NotFound("client configuration is not set".to_owned()))?;

    Ok(Json(ClientConfigResponse::from(config)))
}

pub async fn create_client_config_handler(
    State(state): State<AppState>,
    Json(payload): Json<ClientConfigRequest>,
) -> ApiResult<StatusCode> {
    state
        .client_config_service
        .create_config(ClientConfigInput::from(payload))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn update_client_config_handler(
    State(state): State<AppState>,
    Json(payload): Json<ClientConfigRequest>,
) -> ApiResult<StatusCode> {
    state
        .client_config_service
        .update_config(ClientConfigInput::from(payload))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_client_config_handler(State(state): State<AppState>) -> ApiResult<StatusCode> {
    state.client_config_service.delete_config().await?;

    Ok(StatusCode::NO_CONTENT)
}
