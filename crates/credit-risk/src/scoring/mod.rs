//! Applicant risk scoring: validation, feature derivation, model inference, and the verdict
//! shown on the intake form.

pub mod artifacts;
pub mod domain;
pub mod engine;
pub mod features;
pub mod policy;
pub mod render;
pub mod router;

#[cfg(test)]
mod tests;

pub use artifacts::{
    load_classifier, load_scaler, ArtifactError, Classifier, ClassifierArtifact, DecisionTree,
    Scaler, StandardScalerArtifact,
};
pub use domain::{ApplicantRecord, Education, SelfEmployed, ValidationIssue, Verdict};
pub use engine::{ScoreReport, ScoringEngine};
pub use features::{DerivedRatios, RawFeatures, ScoredFeatureVector, NUMERIC_COLUMNS};
pub use policy::{ApprovalDisplay, DecisionPolicy, PolicyError, DEFAULT_REJECTION_THRESHOLD};
pub use router::scoring_router;

/// Scoring faults that are not applicant-correctable warnings.
#[derive(Debug, thiserror::Error)]
pub enum ScoringError {
    #[error("required feature `{column}` is missing")]
    MissingFeature { column: &'static str },
    #[error("feature `{column}` is not a finite number")]
    NonFiniteFeature { column: &'static str },
    #[error("classifier returned a non-finite probability ({0})")]
    InvalidProbability(f64),
}
