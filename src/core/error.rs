use axum::{
    extract::rejection::PathRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tokio::sync::mpsc;

/// A common error type that can be used throughout the App
#[derive(thiserror::Error, Debug)]
pub enum Error {
    // 400 Bad Request
    #[error(transparent)]
    Validation(#[from] validator::ValidationErrors),

    // 403 Forbidden
    #[error("Origin is not allowed")]
    Forbidden,

    // 409 Conflict
    #[error("The name `{0}` has been taken")]
    NameTaken(String),

    // 422 UnprocessableEntity
    #[error(transparent)]
    PathRejection(#[from] PathRejection),

    // 500 Internal Server Error
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    // Websocket Error
    #[error("Failed to send message")]
    SendMessage,
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Timed out writing to the peer")]
    WriteTimeout,
}

// Convert mpsc send error to Error
impl<T> From<mpsc::error::SendError<T>> for Error {
    fn from(_: mpsc::error::SendError<T>) -> Self {
        Self::SendMessage
    }
}

impl Error {
    pub fn into_error(self) -> (StatusCode, String) {
        let status = match self {
            // 400
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            // 403
            Error::Forbidden => StatusCode::FORBIDDEN,
            // 409
            Error::NameTaken(_) => StatusCode::CONFLICT,
            // 422
            Error::PathRejection(_) => StatusCode::UNPROCESSABLE_ENTITY,
            _ => {
                tracing::error!("{}", self.to_string());
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Server internal error".into(),
                );
            }
        };
        (status, self.to_string())
    }
}

// Axum allows you to return Error which impl IntoResponse
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        self.into_error().into_response()
    }
}
