//! HTTP error responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::app::RssProxyError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Missing or malformed `url`, or a bad `filter` pattern (400).
    BadRequest,
    /// Host refused by the admission filter (403).
    Forbidden,
    /// Upstream feed unreachable or unparsable (502).
    BadGateway,
    /// Anything else (500).
    InternalError,
}

impl ErrorCode {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorCode::BadRequest => StatusCode::BAD_REQUEST,
            ErrorCode::Forbidden => StatusCode::FORBIDDEN,
            ErrorCode::BadGateway => StatusCode::BAD_GATEWAY,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: ErrorCode,
    pub message: String,
}

#[derive(Debug)]
pub struct ApiError {
    code: ErrorCode,
    message: String,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.code.status_code();
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (status, Json(body)).into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

impl From<RssProxyError> for ApiError {
    fn from(err: RssProxyError) -> Self {
        if err.is_client_error() {
            ApiError::new(ErrorCode::BadRequest, err.to_string())
        } else if err.is_forbidden() {
            ApiError::new(ErrorCode::Forbidden, err.to_string())
        } else if err.is_upstream() {
            ApiError::new(ErrorCode::BadGateway, err.to_string())
        } else {
            tracing::error!("Internal error: {}", err);
            ApiError::new(ErrorCode::InternalError, "An internal error occurred")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_status() {
        assert_eq!(ErrorCode::BadRequest.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::Forbidden.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(ErrorCode::BadGateway.status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            ErrorCode::InternalError.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_from_proxy_error() {
        let err = ApiError::from(RssProxyError::MissingUrl);
        assert_eq!(err.code(), ErrorCode::BadRequest);
        assert_eq!(err.message(), "Missing required parameter: url");

        let err = ApiError::from(RssProxyError::BlockedDomain("localhost".into()));
        assert_eq!(err.code(), ErrorCode::Forbidden);
        assert!(err.message().contains("localhost"));

        let err = ApiError::from(RssProxyError::FeedParse("bad xml".into()));
        assert_eq!(err.code(), ErrorCode::BadGateway);

        let err = ApiError::from(RssProxyError::Other("boom".into()));
        assert_eq!(err.code(), ErrorCode::InternalError);
        assert!(!err.message().contains("boom"));
    }

    #[test]
    fn test_error_body_shape() {
        let body = ErrorBody {
            error: ErrorDetail {
                code: ErrorCode::BadGateway,
                message: "down".into(),
            },
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["error"]["code"], "BAD_GATEWAY");
        assert_eq!(json["error"]["message"], "down");
    }
}
