use credit_risk::config::ModelConfig;
use credit_risk::scoring::{
    load_classifier, load_scaler, ArtifactError, ClassifierArtifact, DecisionPolicy,
    ScoringEngine, StandardScalerArtifact,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

pub(crate) type ArtifactEngine = ScoringEngine<StandardScalerArtifact, ClassifierArtifact>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Load both artifacts and build the shared engine. Any failure here is fatal.
pub(crate) fn load_engine(
    model: &ModelConfig,
    policy: DecisionPolicy,
) -> Result<ArtifactEngine, ArtifactError> {
    let scaler = load_scaler(&model.scaler_path)?;
    let classifier = load_classifier(&model.classifier_path)?;

    info!(
        scaler = %model.scaler_path.display(),
        classifier = %model.classifier_path.display(),
        kind = classifier.kind(),
        threshold = policy.rejection_threshold(),
        approval_display = %policy.approval_display(),
        "model artifacts loaded"
    );

    Ok(ScoringEngine::new(
        Arc::new(scaler),
        Arc::new(classifier),
        policy,
    ))
}
