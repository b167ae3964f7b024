use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::AppError;

use super::artifacts::{Classifier, Scaler};
use super::domain::ApplicantRecord;
use super::engine::{ScoreReport, ScoringEngine};
use super::render::form_page;

/// Router serving the intake form and the scoring endpoint it posts to.
pub fn scoring_router<S, C>(engine: Arc<ScoringEngine<S, C>>) -> Router
where
    S: Scaler + 'static,
    C: Classifier + 'static,
{
    Router::new()
        .route("/", get(form_handler))
        .route("/api/v1/risk/score", post(score_handler::<S, C>))
        .with_state(engine)
}

/// JSON view of a scored applicant, including the rendered fragment.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreResponse {
    pub outcome: &'static str,
    pub message: String,
    pub html: String,
    pub probability: Option<f64>,
    pub displayed_probability: Option<f64>,
    pub loan_to_income_ratio: Option<f64>,
    pub debt_to_income_ratio: Option<f64>,
}

impl From<&ScoreReport> for ScoreResponse {
    fn from(report: &ScoreReport) -> Self {
        Self {
            outcome: report.verdict.label(),
            message: report.verdict.summary(),
            html: report.html(),
            probability: report.probability,
            displayed_probability: report.verdict.displayed_probability(),
            loan_to_income_ratio: report.ratios.map(|ratios| ratios.loan_to_income_ratio),
            debt_to_income_ratio: report.ratios.map(|ratios| ratios.debt_to_income_ratio),
        }
    }
}

pub(crate) async fn form_handler() -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, mime::TEXT_HTML_UTF_8.as_ref())],
        form_page(),
    )
        .into_response()
}

pub(crate) async fn score_handler<S, C>(
    State(engine): State<Arc<ScoringEngine<S, C>>>,
    axum::Json(record): axum::Json<ApplicantRecord>,
) -> Result<axum::Json<ScoreResponse>, AppError>
where
    S: Scaler + 'static,
    C: Classifier + 'static,
{
    let report = engine.score(&record).map_err(|error| {
        warn!(%error, "applicant could not be scored");
        AppError::from(error)
    })?;
    debug!(outcome = report.verdict.label(), "applicant scored");
    Ok(axum::Json(ScoreResponse::from(&report)))
}
