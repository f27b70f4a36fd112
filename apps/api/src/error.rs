use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use camgate_core::AppError;
use serde::Serialize;

/// API error payload.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    message: String,
}

/// HTTP API error wrapper around core application errors.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(value: AppError) -> Self {
        Self(value)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        error_response(status, &self.0)
    }
}

/// Error wrapper for the login route.
///
/// A login naming an unknown role is a bad request, not a missing resource.
#[derive(Debug)]
pub struct LoginApiError(pub AppError);

impl From<AppError> for LoginApiError {
    fn from(value: AppError) -> Self {
        Self(value)
    }
}

impl IntoResponse for LoginApiError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            AppError::RoleNotFound(_) => StatusCode::BAD_REQUEST,
            ref error => status_for(error),
        };
        error_response(status, &self.0)
    }
}

fn status_for(error: &AppError) -> StatusCode {
    match error {
        AppError::Validation(_)
        | AppError::MissingField(_)
        | AppError::Decode { .. }
        | AppError::InvalidArn(_)
        | AppError::InvalidRoleArn(_)
        | AppError::TtlExceedsMaxTtl { .. }
        | AppError::MissingMetadata(_) => StatusCode::BAD_REQUEST,
        AppError::Verification(_)
        | AppError::EndpointRejected(_)
        | AppError::UnsupportedIdentityType(_)
        | AppError::UnsupportedArnType(_)
        | AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        AppError::PermissionDenied(_) | AppError::IdentityRoleMismatch { .. } => {
            StatusCode::FORBIDDEN
        }
        AppError::RoleNotFound(_) | AppError::NotFound(_) => StatusCode::NOT_FOUND,
        AppError::Upstream { .. } => StatusCode::BAD_GATEWAY,
        AppError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(status: StatusCode, error: &AppError) -> Response {
    let payload = Json(ErrorResponse {
        message: error.to_string(),
    });

    (status, payload).into_response()
}

/// Standard API result type.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use camgate_core::AppError;

    use super::{ApiError, LoginApiError};

    #[test]
    fn role_not_found_status_depends_on_route() {
        let admin = ApiError(AppError::RoleNotFound("elk".to_owned())).into_response();
        let login = LoginApiError(AppError::RoleNotFound("elk".to_owned())).into_response();

        assert_eq!(admin.status(), StatusCode::NOT_FOUND);
        assert_eq!(login.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn upstream_failures_map_to_gateway_statuses() {
        let upstream = ApiError(AppError::Upstream {
            status: 500,
            body: "boom".to_owned(),
        })
        .into_response();
        let timeout = LoginApiError(AppError::Timeout("sts".to_owned())).into_response();

        assert_eq!(upstream.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(timeout.status(), StatusCode::GATEWAY_TIMEOUT);
    }

    #[test]
    fn binding_failures_are_forbidden() {
        let mismatch = LoginApiError(AppError::IdentityRoleMismatch {
            caller_arn: "qcs::sts:123:assumed-role/1/s".to_owned(),
            role_name: "elk".to_owned(),
        })
        .into_response();

        assert_eq!(mismatch.status(), StatusCode::FORBIDDEN);
    }
}
