use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{debug, error};

use crate::todos::validation::ValidationError;

/// Everything a handler can fail with. Client mistakes map to 400 and are
/// logged at debug, the rest are server faults logged at error.
#[derive(thiserror::Error, Debug)]
pub(crate) enum AppError {
    #[error("could not find {0} in path")]
    MissingPathParam(&'static str),
    #[error("{0} is required")]
    EmptyPathParam(&'static str),
    #[error("could not parse {param}")]
    InvalidPathParam {
        param: &'static str,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("could not decode todo from body")]
    Decode(#[source] serde_json::Error),
    #[error("validation fail: {0}")]
    Validation(#[from] ValidationError),
    #[error("{context}")]
    Store { context: &'static str, cause: anyhow::Error },
    #[error("could not marshal response")]
    Marshal(#[source] serde_json::Error),
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
}

impl AppError {
    pub(crate) fn store(context: &'static str) -> impl FnOnce(anyhow::Error) -> Self {
        move |cause| AppError::Store { context, cause }
    }

    pub(crate) fn status(&self) -> StatusCode {
        match self {
            AppError::EmptyPathParam(_)
            | AppError::InvalidPathParam { .. }
            | AppError::Decode(_)
            | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::MissingPathParam(_) | AppError::Store { .. } | AppError::Marshal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        match &self {
            AppError::Store { context, cause } => {
                let cause = format!("{cause:#}");
                error!(%cause, "{context}");
            }
            err if status.is_server_error() => error!(err = ?err, "{err}"),
            err => debug!(err = ?err, "{err}"),
        }

        let body = ErrorBody {
            message: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}
