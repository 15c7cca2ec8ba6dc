//! Failure taxonomy for a single prediction request.
//!
//! Variants are distinguished internally and in logs only. On the wire every
//! variant collapses into the same `500` envelope:
//!
//! ```text
//! {"detail": "Error: <message>"}
//! ```
//!
//! News scraping failures never appear here; the news fetcher degrades to an
//! empty link list instead.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Label prepended to every error detail returned to clients.
pub const ERROR_LABEL: &str = "Error: ";

#[derive(Debug, Error)]
pub enum PredictError {
    /// The completion API answered with an empty `choices` list.
    #[error("model API returned an empty response")]
    EmptyResponse,

    /// The first choice carried no message content.
    #[error("model API returned a choice without message content")]
    MissingContent,

    /// The completion API could not be reached or the connection failed.
    #[error("model API request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The completion API answered with a non-success status.
    #[error("model API returned {status}: {body}")]
    UpstreamStatus { status: u16, body: String },

    /// The completion API body was not a chat completion.
    #[error("failed to decode model API response: {0}")]
    Decode(String),
}

/// JSON body of every failed request.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub detail: String,
}

impl IntoResponse for PredictError {
    fn into_response(self) -> Response {
        error!(error = %self, "Prediction failed");
        let body = ErrorBody {
            detail: format!("{ERROR_LABEL}{self}"),
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}
