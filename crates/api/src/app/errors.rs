use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use loadstar_auth::AuthError;

/// Rejection wrapper so auth failures convert straight into HTTP responses
/// from middleware and handlers alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthRejection(pub AuthError);

impl From<AuthError> for AuthRejection {
    fn from(err: AuthError) -> Self {
        Self(err)
    }
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> axum::response::Response {
        json_error(status_for(self.0), self.0.code(), self.0.to_string())
    }
}

/// Everything short of `Forbidden` means the caller never proved who they
/// are, which is a 401. `Forbidden` is a valid identity without the grant.
pub fn status_for(err: AuthError) -> StatusCode {
    match err {
        AuthError::Forbidden => StatusCode::FORBIDDEN,
        AuthError::AuthRequired
        | AuthError::TokenInvalid
        | AuthError::TokenExpired
        | AuthError::ClaimsMalformed
        | AuthError::IdentityInactive => StatusCode::UNAUTHORIZED,
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
