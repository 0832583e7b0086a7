//! HTTP mapping for callable errors.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use orders::{CallError, ErrorKind};

/// Wraps a [`CallError`] so it can be returned from handlers.
///
/// The body follows the callable protocol: `{"error": {"code", "message"}}`
/// with the closed error code vocabulary, never a raw exception.
#[derive(Debug)]
pub struct ApiError(pub CallError);

impl From<CallError> for ApiError {
    fn from(err: CallError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0.kind {
            ErrorKind::Unauthenticated => StatusCode::UNAUTHORIZED,
            ErrorKind::InvalidArgument => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::PermissionDenied => StatusCode::FORBIDDEN,
            ErrorKind::AlreadyExists => StatusCode::CONFLICT,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self.0.message, "internal error surfaced to caller");
        }

        let body = serde_json::json!({
            "error": {
                "code": self.0.kind.as_str(),
                "message": self.0.message,
            }
        });
        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (CallError::unauthenticated("a"), StatusCode::UNAUTHORIZED),
            (CallError::invalid_argument("b"), StatusCode::BAD_REQUEST),
            (CallError::not_found("c"), StatusCode::NOT_FOUND),
            (CallError::permission_denied("d"), StatusCode::FORBIDDEN),
            (CallError::already_exists("e"), StatusCode::CONFLICT),
            (CallError::internal("f"), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, expected) in cases {
            let response = ApiError(err).into_response();
            assert_eq!(response.status(), expected);
        }
    }

    #[tokio::test]
    async fn test_error_body_shape() {
        let response = ApiError(CallError::not_found("Order not found.")).into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["error"]["code"], "not-found");
        assert_eq!(json["error"]["message"], "Order not found.");
    }
}
