//! Request and response bodies of the `/api/request` endpoint.
//!
//! Both types are transient and live only for the duration of one request.

use serde::{Deserialize, Serialize};
use url::Url;

/// Maximum number of source URLs attached to a response.
pub const MAX_SOURCES: usize = 3;

/// An incoming question.
///
/// `query` usually contains lines such as `1. Paris`, but may be any text.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PredictionRequest {
    /// The question text, forwarded to the model verbatim.
    pub query: String,
    /// Opaque caller identifier, echoed back unchanged.
    pub id: i64,
}

/// The service's answer to a [`PredictionRequest`].
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct PredictionResponse {
    /// Same value as the request's `id`.
    pub id: i64,
    /// Number of the chosen option, or `null` when none could be recovered.
    pub answer: Option<u64>,
    /// Model reply with a fixed prefix.
    pub reasoning: String,
    /// At most [`MAX_SOURCES`] absolute URLs.
    pub sources: Vec<Url>,
}
