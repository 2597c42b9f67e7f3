use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use miette::{Diagnostic, Result};
use thiserror::Error;
use tracing::error;

/// Main error type for the application
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Environment error: {0}")]
    #[diagnostic(code(kaigi::environment))]
    Environment(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(kaigi::config))]
    Config(String),

    #[error("Invalid booking request: {0}")]
    #[diagnostic(code(kaigi::invalid_request))]
    InvalidRequest(String),

    #[error("Zoom API error: {0}")]
    #[diagnostic(code(kaigi::zoom_api))]
    ZoomApi(String),

    #[error("Google Calendar API error: {0}")]
    #[diagnostic(code(kaigi::google_calendar))]
    GoogleCalendar(String),

    #[error(transparent)]
    #[diagnostic(code(kaigi::io))]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(kaigi::serialization))]
    Serialization(String),

    #[error("Other error: {0}")]
    #[diagnostic(code(kaigi::other))]
    Other(String),
}

// Implement From for JSON deserialization errors (service-account key file)
impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

/// Type alias for Result with our Error type
pub type AppResult<T> = Result<T, Error>;

/// Helper to create environment errors
pub fn env_error(var: &str) -> Error {
    Error::Environment(format!("Missing environment variable: {}", var))
}

/// Helper to create configuration errors
pub fn config_error(message: &str) -> Error {
    Error::Config(message.to_string())
}

/// Helper to create invalid-request errors
pub fn invalid_request(message: &str) -> Error {
    Error::InvalidRequest(message.to_string())
}

/// Helper to create Zoom API errors
pub fn zoom_error(message: &str) -> Error {
    Error::ZoomApi(message.to_string())
}

/// Helper to create Google Calendar errors
pub fn google_calendar_error(message: &str) -> Error {
    Error::GoogleCalendar(message.to_string())
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::InvalidRequest(msg) => {
                // Caller mistake, no upstream call was made
                (StatusCode::UNPROCESSABLE_ENTITY, msg).into_response()
            }
            Error::ZoomApi(msg) => {
                error!("Zoom API failure: {}", msg);
                (StatusCode::BAD_GATEWAY, msg).into_response()
            }
            Error::GoogleCalendar(msg) => {
                error!("Google Calendar failure: {}", msg);
                (StatusCode::BAD_GATEWAY, msg).into_response()
            }
            err => {
                error!("Internal error: {:?}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}
