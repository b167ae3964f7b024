use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::scoring::artifacts::{Classifier, Scaler};
use crate::scoring::domain::{ApplicantRecord, Education, SelfEmployed};
use crate::scoring::features::{RawFeatures, ScoredFeatureVector, NUMERIC_FEATURES};
use crate::scoring::policy::DecisionPolicy;
use crate::scoring::{scoring_router, ScoringEngine};

/// Passes raw columns through unchanged so tests can inspect contract order.
pub(super) struct IdentityScaler;

impl Scaler for IdentityScaler {
    fn transform(&self, features: &RawFeatures) -> [f64; NUMERIC_FEATURES] {
        features.0
    }
}

pub(super) struct FixedClassifier(pub(super) f64);

impl Classifier for FixedClassifier {
    fn positive_class_probability(&self, _features: &ScoredFeatureVector) -> f64 {
        self.0
    }
}

/// Records every vector it is asked to score.
#[derive(Default)]
pub(super) struct RecordingClassifier {
    pub(super) seen: Mutex<Vec<ScoredFeatureVector>>,
}

impl Classifier for RecordingClassifier {
    fn positive_class_probability(&self, features: &ScoredFeatureVector) -> f64 {
        self.seen
            .lock()
            .expect("recording mutex poisoned")
            .push(*features);
        0.1
    }
}

pub(super) fn worked_example() -> ApplicantRecord {
    ApplicantRecord {
        dependents: Some(2.0),
        education: Education::Graduate,
        self_employed: SelfEmployed::No,
        annual_income: Some(500_000.0),
        loan_amount: Some(200_000.0),
        loan_term_months: Some(120.0),
        cibil_score: Some(750.0),
        residential_assets_value: Some(100_000.0),
        commercial_assets_value: Some(50_000.0),
        luxury_assets_value: Some(80_000.0),
        bank_asset_value: Some(60_000.0),
    }
}

pub(super) fn engine_with(probability: f64) -> ScoringEngine<IdentityScaler, FixedClassifier> {
    ScoringEngine::new(
        Arc::new(IdentityScaler),
        Arc::new(FixedClassifier(probability)),
        DecisionPolicy::default(),
    )
}

pub(super) fn router_with(probability: f64) -> axum::Router {
    scoring_router(Arc::new(engine_with(probability)))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
