use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::service::ServiceError;

#[derive(Debug, Error)]
pub enum WorkflowError {
    /// A precondition the user can fix; never reaches a remote service.
    #[error("{0}")]
    Validation(String),
    #[error("{0} already in progress")]
    Busy(&'static str),
    #[error("{action} failed: {source}")]
    Remote {
        action: &'static str,
        #[source]
        source: ServiceError,
    },
    /// The composition the request was made for was thrown away while it ran.
    #[error("outfit request outdated, the composition changed while it ran")]
    Discarded,
    #[error("unknown session '{0}'")]
    UnknownSession(String),
}

impl WorkflowError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn remote(action: &'static str, source: ServiceError) -> Self {
        Self::Remote { action, source }
    }
}

impl IntoResponse for WorkflowError {
    fn into_response(self) -> Response {
        let status = match &self {
            WorkflowError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            WorkflowError::Busy(_) | WorkflowError::Discarded => StatusCode::CONFLICT,
            WorkflowError::Remote { .. } => StatusCode::BAD_GATEWAY,
            WorkflowError::UnknownSession(_) => StatusCode::NOT_FOUND,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
