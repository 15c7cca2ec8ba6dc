//! HTTP surface and request orchestration.
//!
//! `POST /api/request` runs one [`Predictor::predict`] per call:
//!
//! 1. Ask the model the question verbatim
//! 2. Take the first choice as the reasoning
//! 3. Gather sources: static search results, then scraped news links
//! 4. Map the reasoning back onto a numbered option
//!
//! The two outbound calls run one after the other. Only the model call can
//! fail the request; every failure becomes the uniform `500` envelope of
//! [`PredictError`].

use crate::answer::extract_answer;
use crate::api::ChatCompletion;
use crate::error::PredictError;
use crate::models::{MAX_SOURCES, PredictionRequest, PredictionResponse};
use crate::scrapers::news::NewsFetcher;
use crate::search::search_web;
use crate::utils::truncate_for_log;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, instrument};

/// Prepended to every model reply in the response.
pub const REASONING_PREFIX: &str = "Generated by the model. ";

/// Request handler state, shared read-only by all requests.
#[derive(Debug)]
pub struct Predictor<C> {
    completion: C,
    news: NewsFetcher,
}

impl<C: ChatCompletion> Predictor<C> {
    pub fn new(completion: C, news: NewsFetcher) -> Self {
        Self { completion, news }
    }

    /// Answer one question.
    ///
    /// # Errors
    ///
    /// Any failure of the model call, or a completion without usable content.
    /// News scraping problems only shrink the source list.
    #[instrument(level = "info", skip_all, fields(id = request.id))]
    pub async fn predict(
        &self,
        request: PredictionRequest,
    ) -> Result<PredictionResponse, PredictError> {
        let t0 = Instant::now();

        let completion = self.completion.complete(&request.query).await?;
        let reasoning = completion.first_content()?;
        debug!(reasoning = %truncate_for_log(reasoning, 300), "Model reply");

        let mut sources = search_web(&request.query);
        sources.truncate(MAX_SOURCES);
        sources.extend(self.news.fetch_latest().await);
        sources.truncate(MAX_SOURCES);

        let answer = extract_answer(&request.query, reasoning);

        info!(
            answer = ?answer,
            sources = sources.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Prediction complete"
        );

        Ok(PredictionResponse {
            id: request.id,
            answer,
            reasoning: format!("{REASONING_PREFIX}{reasoning}"),
            sources,
        })
    }
}

/// Build the service router.
pub fn router<C>(predictor: Arc<Predictor<C>>) -> Router
where
    C: ChatCompletion + Send + Sync + 'static,
{
    Router::new()
        .route("/api/request", post(predict::<C>))
        .with_state(predictor)
}

async fn predict<C>(
    State(predictor): State<Arc<Predictor<C>>>,
    Json(request): Json<PredictionRequest>,
) -> Result<Json<PredictionResponse>, PredictError>
where
    C: ChatCompletion + Send + Sync + 'static,
{
    predictor.predict(request).await.map(Json)
}
