use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;
use thiserror::Error;

/// Errors surfaced by the fetch, persist and query paths.
#[derive(Debug, Error)]
pub enum Error {
    /// The feed could not be reached or answered with a non-success status.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The feed answered with a body that is not a valid rates document.
    #[error("decode error: {0}")]
    Decode(String),

    /// At least one row of a batch failed to be written.
    #[error("persist error: {0}")]
    Persist(String),

    /// Reading from the store failed.
    #[error("store error: {0}")]
    Store(#[from] sqlx::Error),

    /// The query matched no rows.
    #[error("no data found")]
    NotFound,

    /// A required route parameter is missing or blank.
    #[error("missing '{0}' parameter")]
    Validation(&'static str),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<quick_xml::DeError> for Error {
    fn from(err: quick_xml::DeError) -> Self {
        Error::Decode(err.to_string())
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
}

impl Error {
    /// Message returned to the client. Causes stay in the server log.
    pub fn public_message(&self) -> String {
        match self {
            Error::Transport(_) | Error::Decode(_) | Error::Persist(_) => {
                "Error where saving currency".to_string()
            }
            Error::Store(_) => "Internal Server Error".to_string(),
            Error::NotFound => "No data found for the specified parameters".to_string(),
            Error::Validation(param) => format!("Missing '{}' parameter", param),
        }
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::Transport(_) | Error::Decode(_) | Error::Persist(_) | Error::Validation(_) => {
                StatusCode::BAD_REQUEST
            }
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            message: self.public_message(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_error_kind() {
        assert_eq!(
            Error::Decode("bad".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            Error::Persist("bad".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            Error::Validation("date").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(Error::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            Error::Store(sqlx::Error::PoolClosed).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn public_message_hides_cause() {
        let err = Error::Persist("duplicate key value violates constraint".into());
        assert_eq!(err.public_message(), "Error where saving currency");

        let err = Error::Store(sqlx::Error::PoolClosed);
        assert_eq!(err.public_message(), "Internal Server Error");
    }

    #[test]
    fn validation_message_names_parameter() {
        assert_eq!(
            Error::Validation("fdate").public_message(),
            "Missing 'fdate' parameter"
        );
    }
}
