use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use std::fmt;

/// Application error taxonomy. Every variant maps to a stable machine-readable
/// kind plus a human-readable message; the UI layer decides retry vs display.
#[derive(Debug)]
pub enum AppError {
    Db(sqlx::Error),
    NotFound,
    Unauthenticated,
    /// Authorization denial with the reason (e.g. "not the idea owner").
    Forbidden(String),
    /// A state-machine precondition was violated; names the observed state.
    InvalidState(String),
    Validation(String),
    /// The submitted base price is not one of the enumerated coefficients.
    InvalidBasePrice(i64),
    /// A concurrent mutation won the race for the same row.
    Conflict(String),
    Internal(String),
}

impl AppError {
    /// Stable kind string carried in the JSON error body.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Db(_) | AppError::Internal(_) => "internal",
            AppError::NotFound => "not_found",
            AppError::Unauthenticated => "unauthenticated",
            AppError::Forbidden(_) => "forbidden",
            AppError::InvalidState(_) => "invalid_state",
            AppError::Validation(_) => "validation_error",
            AppError::InvalidBasePrice(_) => "invalid_base_price",
            AppError::Conflict(_) => "conflict",
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Db(e) => write!(f, "Database error: {e}"),
            AppError::NotFound => write!(f, "Not found"),
            AppError::Unauthenticated => write!(f, "Authentication required"),
            AppError::Forbidden(reason) => write!(f, "Forbidden: {reason}"),
            AppError::InvalidState(msg) => write!(f, "Invalid state: {msg}"),
            AppError::Validation(msg) => write!(f, "Validation failed: {msg}"),
            AppError::InvalidBasePrice(v) => {
                write!(f, "Invalid base price: {v} is not an offered tier")
            }
            AppError::Conflict(msg) => write!(f, "Conflict: {msg}"),
            AppError::Internal(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::InvalidState(_) | AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Validation(_) | AppError::InvalidBasePrice(_) => StatusCode::BAD_REQUEST,
            AppError::Db(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        // Storage failures are transient from the caller's view; the detail
        // goes to the log, the wire carries only the generic kind.
        let message = match self {
            AppError::Db(e) => {
                log::error!("Database error: {e}");
                "Internal Server Error".to_string()
            }
            AppError::Internal(msg) => {
                log::error!("Internal error: {msg}");
                "Internal Server Error".to_string()
            }
            other => other.to_string(),
        };
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": self.kind(),
            "message": message,
        }))
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        AppError::Db(e)
    }
}
