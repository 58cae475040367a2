use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::error;

use tinig_types::api::ErrorResponse;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Walang laman ang mensahe.")]
    EmptyMessage,

    #[error("Hanggang {0} na titik lamang.")]
    TooLong(usize),

    /// Body or query string that could not be read.
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Rejected(&'static str),

    #[error("star not found")]
    StarNotFound,

    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::EmptyMessage | Self::TooLong(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Rejected(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::StarNotFound => StatusCode::NOT_FOUND,
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            Self::Store(e) => {
                error!("Store error: {:#}", e);
                "May problema sa pagpapadala. Subukan muli.".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
