use axum::Json;
use axum::extract::{Extension, State};

use camgate_application::LoginInput;

use crate::dto::{AuthEnvelope, LoginRequest};
use crate::error::{ApiResult, LoginApiError};
use crate::middleware::RemoteAddress;
use crate::state::AppState;

pub async fn login_handler(
    State(state): State<AppState>,
    Extension(RemoteAddress(remote_address)): Extension<RemoteAddress>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthEnvelope>, LoginApiError> {
    let credential = state
        .login_service
        .login(LoginInput::from(payload), remote_address)
        .await?;

    Ok(Json(AuthEnvelope { auth: credential }))
}

pub async fn renew_handler(
    State(state): State<AppState>,
    Json(payload): Json<AuthEnvelope>,
) -> ApiResult<Json<AuthEnvelope>> {
    let credential = state.login_service.renew(payload.auth).await?;

    Ok(Json(AuthEnvelope { auth: credential }))
}
