use serde::{Deserialize, Serialize};

use super::domain::ApplicantRecord;
use super::ScoringError;

pub const NUMERIC_FEATURES: usize = 11;
pub const MODEL_FEATURES: usize = NUMERIC_FEATURES + 2;

/// Column order shared with the externally fitted scaler and classifier.
///
/// Reordering these silently corrupts every prediction.
pub const NUMERIC_COLUMNS: [&str; NUMERIC_FEATURES] = [
    "no_of_dependents",
    "income_annum",
    "loan_amount",
    "loan_term",
    "cibil_score",
    "residential_assets_value",
    "commercial_assets_value",
    "luxury_assets_value",
    "bank_asset_value",
    "loan_to_income_ratio",
    "debt_to_income_ratio",
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedRatios {
    pub loan_to_income_ratio: f64,
    pub debt_to_income_ratio: f64,
}

impl DerivedRatios {
    pub fn compute(loan_amount: f64, annual_income: f64, bank_asset_value: f64) -> Self {
        Self {
            loan_to_income_ratio: loan_amount / annual_income,
            debt_to_income_ratio: loan_amount / (annual_income + bank_asset_value),
        }
    }
}

/// Unscaled numeric columns in `NUMERIC_COLUMNS` order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawFeatures(pub [f64; NUMERIC_FEATURES]);

impl RawFeatures {
    /// Lay out the record and its ratios in contract order.
    ///
    /// The validated fields are passed in directly; the remaining numerics must be present
    /// and every column must be finite.
    pub fn assemble(
        record: &ApplicantRecord,
        annual_income: f64,
        loan_amount: f64,
        loan_term_months: f64,
        ratios: &DerivedRatios,
    ) -> Result<Self, ScoringError> {
        let values = [
            required(record.dependents, 0)?,
            annual_income,
            loan_amount,
            loan_term_months,
            required(record.cibil_score, 4)?,
            required(record.residential_assets_value, 5)?,
            required(record.commercial_assets_value, 6)?,
            required(record.luxury_assets_value, 7)?,
            required(record.bank_asset_value, 8)?,
            ratios.loan_to_income_ratio,
            ratios.debt_to_income_ratio,
        ];

        if let Some(index) = values.iter().position(|value| !value.is_finite()) {
            return Err(ScoringError::NonFiniteFeature {
                column: NUMERIC_COLUMNS[index],
            });
        }

        Ok(Self(values))
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

fn required(value: Option<f64>, index: usize) -> Result<f64, ScoringError> {
    value.ok_or(ScoringError::MissingFeature {
        column: NUMERIC_COLUMNS[index],
    })
}

/// Scaled numerics followed by the education and self-employment encodings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredFeatureVector(pub [f64; MODEL_FEATURES]);

impl ScoredFeatureVector {
    pub fn from_parts(scaled: [f64; NUMERIC_FEATURES], record: &ApplicantRecord) -> Self {
        let mut values = [0.0; MODEL_FEATURES];
        values[..NUMERIC_FEATURES].copy_from_slice(&scaled);
        values[NUMERIC_FEATURES] = record.education.encoded();
        values[NUMERIC_FEATURES + 1] = record.self_employed.encoded();
        Self(values)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}
