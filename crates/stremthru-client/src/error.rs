//! Client error types.

use std::fmt;

use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::ResponseMeta;

/// Client error type.
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// URL parsing failed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Service responded with a non-success status.
    #[error(transparent)]
    Api(Box<ApiError>),
}

impl Error {
    /// The service error, if this is one.
    pub fn api(&self) -> Option<&ApiError> {
        match self {
            Error::Api(err) => Some(err.as_ref()),
            _ => None,
        }
    }

    /// Check if this is a not-found error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Api(err) if err.status_code == StatusCode::NOT_FOUND)
    }

    /// Check if this is an authentication error.
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            Error::Api(err) if matches!(
                err.status_code,
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::PROXY_AUTHENTICATION_REQUIRED
            )
        )
    }

    /// Check if this is a rate limit error.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Error::Api(err) if err.status_code == StatusCode::TOO_MANY_REQUESTS)
    }

    /// Check if this is a server error.
    pub fn is_server_error(&self) -> bool {
        matches!(self, Error::Api(err) if err.status_code.is_server_error())
    }
}

impl From<ApiError> for Error {
    fn from(err: ApiError) -> Self {
        Error::Api(Box::new(err))
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error raised for every non-success response from the service.
///
/// `headers`, `status_code` and `status_text` are always populated, so
/// callers can branch on the status without re-parsing anything.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ApiError {
    /// Human-readable message.
    pub message: String,
    /// Raw response payload, when one was received.
    pub body: Option<serde_json::Value>,
    /// Error classification reported by the service.
    pub kind: ErrorType,
    /// Machine-readable error code reported by the service.
    pub code: ErrorCode,
    /// Response headers.
    pub headers: HeaderMap,
    /// HTTP status code.
    pub status_code: StatusCode,
    /// HTTP status text.
    pub status_text: String,
    /// Underlying cause, when the error wraps another failure.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl ApiError {
    /// Build an error from a plain-text response body.
    ///
    /// The body text is used verbatim as the message.
    pub(crate) fn from_text(body: String, meta: ResponseMeta) -> Self {
        Self {
            message: body.clone(),
            body: Some(serde_json::Value::String(body)),
            kind: ErrorType::Unknown,
            code: ErrorCode::Unknown,
            headers: meta.headers,
            status_code: meta.status_code,
            status_text: meta.status_text,
            source: None,
        }
    }

    /// Build an error from a JSON response body.
    ///
    /// The service wraps failures as `{"error": {"type", "code", "message"?}}`.
    /// With a `message` present the result reads `(<type>) <message>`;
    /// without one the `error` object is serialized as-is.
    pub(crate) fn from_json(body: serde_json::Value, meta: ResponseMeta) -> Self {
        let mut kind = ErrorType::Unknown;
        let mut code = ErrorCode::Unknown;

        let message = match body.get("error") {
            Some(err) => {
                if let Some(t) = err.get("type") {
                    kind = serde_json::from_value(t.clone()).unwrap_or_default();
                }
                if let Some(c) = err.get("code").and_then(|v| v.as_str()) {
                    code = ErrorCode::from(c);
                }
                match err.get("message").and_then(|v| v.as_str()) {
                    Some(msg) => format!("({kind}) {msg}"),
                    None => err.to_string(),
                }
            }
            None => body.to_string(),
        };

        Self {
            message,
            body: Some(body),
            kind,
            code,
            headers: meta.headers,
            status_code: meta.status_code,
            status_text: meta.status_text,
            source: None,
        }
    }
}

/// Classification tag carried by service errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ErrorType {
    /// Client-side request problem.
    #[serde(rename = "api_error")]
    Api,
    /// Store operation failure.
    #[serde(rename = "store_error")]
    Store,
    /// Failure from a third-party service behind StremThru.
    #[serde(rename = "upstream_error")]
    Upstream,
    /// Default / fallback classification.
    #[default]
    #[serde(rename = "unknown_error", other)]
    Unknown,
}

impl ErrorType {
    /// Wire representation of the tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::Api => "api_error",
            ErrorType::Store => "store_error",
            ErrorType::Upstream => "upstream_error",
            ErrorType::Unknown => "unknown_error",
        }
    }
}

impl fmt::Display for ErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Machine-readable error codes reported by the service.
///
/// Codes outside the known vocabulary are preserved in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ErrorCode {
    BadGateway,
    BadRequest,
    Conflict,
    Forbidden,
    Gone,
    InternalServerError,
    MethodNotAllowed,
    NotFound,
    NotImplemented,
    PaymentRequired,
    ProxyAuthenticationRequired,
    ServiceUnavailable,
    StoreLimitExceeded,
    StoreMagnetInvalid,
    StoreNameInvalid,
    TooManyRequests,
    Unauthorized,
    UnavailableForLegalReasons,
    #[default]
    Unknown,
    UnprocessableEntity,
    UnsupportedMediaType,
    Other(String),
}

impl ErrorCode {
    /// Wire representation of the code.
    pub fn as_str(&self) -> &str {
        match self {
            ErrorCode::BadGateway => "BAD_GATEWAY",
            ErrorCode::BadRequest => "BAD_REQUEST",
            ErrorCode::Conflict => "CONFLICT",
            ErrorCode::Forbidden => "FORBIDDEN",
            ErrorCode::Gone => "GONE",
            ErrorCode::InternalServerError => "INTERNAL_SERVER_ERROR",
            ErrorCode::MethodNotAllowed => "METHOD_NOT_ALLOWED",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::NotImplemented => "NOT_IMPLEMENTED",
            ErrorCode::PaymentRequired => "PAYMENT_REQUIRED",
            ErrorCode::ProxyAuthenticationRequired => "PROXY_AUTHENTICATION_REQUIRED",
            ErrorCode::ServiceUnavailable => "SERVICE_UNAVAILABLE",
            ErrorCode::StoreLimitExceeded => "STORE_LIMIT_EXCEEDED",
            ErrorCode::StoreMagnetInvalid => "STORE_MAGNET_INVALID",
            ErrorCode::StoreNameInvalid => "STORE_NAME_INVALID",
            ErrorCode::TooManyRequests => "TOO_MANY_REQUESTS",
            ErrorCode::Unauthorized => "UNAUTHORIZED",
            ErrorCode::UnavailableForLegalReasons => "UNAVAILABLE_FOR_LEGAL_REASONS",
            ErrorCode::Unknown => "UNKNOWN",
            ErrorCode::UnprocessableEntity => "UNPROCESSABLE_ENTITY",
            ErrorCode::UnsupportedMediaType => "UNSUPPORTED_MEDIA_TYPE",
            ErrorCode::Other(code) => code,
        }
    }
}

impl From<&str> for ErrorCode {
    fn from(code: &str) -> Self {
        match code {
            "BAD_GATEWAY" => ErrorCode::BadGateway,
            "BAD_REQUEST" => ErrorCode::BadRequest,
            "CONFLICT" => ErrorCode::Conflict,
            "FORBIDDEN" => ErrorCode::Forbidden,
            "GONE" => ErrorCode::Gone,
            "INTERNAL_SERVER_ERROR" => ErrorCode::InternalServerError,
            "METHOD_NOT_ALLOWED" => ErrorCode::MethodNotAllowed,
            "NOT_FOUND" => ErrorCode::NotFound,
            "NOT_IMPLEMENTED" => ErrorCode::NotImplemented,
            "PAYMENT_REQUIRED" => ErrorCode::PaymentRequired,
            "PROXY_AUTHENTICATION_REQUIRED" => ErrorCode::ProxyAuthenticationRequired,
            "SERVICE_UNAVAILABLE" => ErrorCode::ServiceUnavailable,
            "STORE_LIMIT_EXCEEDED" => ErrorCode::StoreLimitExceeded,
            "STORE_MAGNET_INVALID" => ErrorCode::StoreMagnetInvalid,
            "STORE_NAME_INVALID" => ErrorCode::StoreNameInvalid,
            "TOO_MANY_REQUESTS" => ErrorCode::TooManyRequests,
            "UNAUTHORIZED" => ErrorCode::Unauthorized,
            "UNAVAILABLE_FOR_LEGAL_REASONS" => ErrorCode::UnavailableForLegalReasons,
            "UNKNOWN" => ErrorCode::Unknown,
            "UNPROCESSABLE_ENTITY" => ErrorCode::UnprocessableEntity,
            "UNSUPPORTED_MEDIA_TYPE" => ErrorCode::UnsupportedMediaType,
            other => ErrorCode::Other(other.to_string()),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn meta(status: StatusCode) -> ResponseMeta {
        ResponseMeta {
            headers: HeaderMap::new(),
            status_code: status,
            status_text: status.canonical_reason().unwrap_or("").to_string(),
        }
    }

    #[test]
    fn test_text_body_is_message_verbatim() {
        let err = ApiError::from_text("upstream exploded".to_string(), meta(StatusCode::BAD_GATEWAY));

        assert_eq!(err.message, "upstream exploded");
        assert_eq!(err.kind, ErrorType::Unknown);
        assert_eq!(err.code, ErrorCode::Unknown);
        assert_eq!(err.status_code, StatusCode::BAD_GATEWAY);
        assert_eq!(err.status_text, "Bad Gateway");
    }

    #[test]
    fn test_json_error_with_message() {
        let body = json!({
            "error": {
                "type": "store_error",
                "code": "STORE_LIMIT_EXCEEDED",
                "message": "too many magnets"
            }
        });
        let err = ApiError::from_json(body, meta(StatusCode::UNPROCESSABLE_ENTITY));

        assert_eq!(err.message, "(store_error) too many magnets");
        assert_eq!(err.kind, ErrorType::Store);
        assert_eq!(err.code, ErrorCode::StoreLimitExceeded);
    }

    #[test]
    fn test_json_error_without_message_serializes_error_object() {
        let body = json!({"error": {"type": "api_error"}});
        let err = ApiError::from_json(body, meta(StatusCode::BAD_REQUEST));

        assert_eq!(err.message, r#"{"type":"api_error"}"#);
        assert_eq!(err.kind, ErrorType::Api);
        assert_eq!(err.code, ErrorCode::Unknown);
    }

    #[test]
    fn test_json_error_without_envelope_serializes_body() {
        let body = json!({"detail": "nope"});
        let err = ApiError::from_json(body, meta(StatusCode::INTERNAL_SERVER_ERROR));

        assert_eq!(err.message, r#"{"detail":"nope"}"#);
        assert_eq!(err.kind, ErrorType::Unknown);
    }

    #[test]
    fn test_unrecognized_type_falls_back_to_unknown() {
        let body = json!({"error": {"type": "surprise_error", "message": "m"}});
        let err = ApiError::from_json(body, meta(StatusCode::INTERNAL_SERVER_ERROR));

        assert_eq!(err.kind, ErrorType::Unknown);
        assert_eq!(err.message, "(unknown_error) m");
    }

    #[test]
    fn test_unrecognized_code_is_preserved() {
        assert_eq!(
            ErrorCode::from("STORE_ON_FIRE"),
            ErrorCode::Other("STORE_ON_FIRE".to_string())
        );
        assert_eq!(ErrorCode::from("STORE_ON_FIRE").as_str(), "STORE_ON_FIRE");
    }

    #[test]
    fn test_status_predicates() {
        let not_found: Error = ApiError::from_text("missing".into(), meta(StatusCode::NOT_FOUND)).into();
        assert!(not_found.is_not_found());
        assert!(!not_found.is_server_error());

        let rate_limited: Error =
            ApiError::from_text("slow down".into(), meta(StatusCode::TOO_MANY_REQUESTS)).into();
        assert!(rate_limited.is_rate_limited());

        let unauthorized: Error =
            ApiError::from_text("who".into(), meta(StatusCode::PROXY_AUTHENTICATION_REQUIRED)).into();
        assert!(unauthorized.is_auth_error());
    }
}
