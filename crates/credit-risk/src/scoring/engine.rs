use std::sync::Arc;

use serde::Serialize;

use super::artifacts::{Classifier, Scaler};
use super::domain::{ApplicantRecord, ValidationIssue, Verdict};
use super::features::{DerivedRatios, RawFeatures, ScoredFeatureVector};
use super::policy::DecisionPolicy;
use super::render::verdict_html;
use super::ScoringError;

/// Scores applicants against a frozen scaler and classifier.
///
/// The artifacts are shared read-only, so one engine serves concurrent requests without locks.
pub struct ScoringEngine<S, C> {
    scaler: Arc<S>,
    classifier: Arc<C>,
    policy: DecisionPolicy,
}

/// Verdict together with the intermediate values that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreReport {
    pub verdict: Verdict,
    pub ratios: Option<DerivedRatios>,
    pub probability: Option<f64>,
}

impl ScoreReport {
    fn warning(issue: ValidationIssue) -> Self {
        Self {
            verdict: Verdict::Warning { issue },
            ratios: None,
            probability: None,
        }
    }

    pub fn html(&self) -> String {
        verdict_html(&self.verdict)
    }
}

struct ValidatedLoan {
    annual_income: f64,
    loan_amount: f64,
    loan_term_months: f64,
    bank_asset_value: Option<f64>,
}

impl<S, C> ScoringEngine<S, C>
where
    S: Scaler + 'static,
    C: Classifier + 'static,
{
    pub fn new(scaler: Arc<S>, classifier: Arc<C>, policy: DecisionPolicy) -> Self {
        Self {
            scaler,
            classifier,
            policy,
        }
    }

    pub fn policy(&self) -> &DecisionPolicy {
        &self.policy
    }

    pub fn score(&self, record: &ApplicantRecord) -> Result<ScoreReport, ScoringError> {
        let loan = match validate(record) {
            Ok(loan) => loan,
            Err(issue) => return Ok(ScoreReport::warning(issue)),
        };

        // bank assets are optional until here; a missing value surfaces during assembly
        let ratios = DerivedRatios::compute(
            loan.loan_amount,
            loan.annual_income,
            loan.bank_asset_value.unwrap_or(0.0),
        );
        let raw = RawFeatures::assemble(
            record,
            loan.annual_income,
            loan.loan_amount,
            loan.loan_term_months,
            &ratios,
        )?;

        let scaled = self.scaler.transform(&raw);
        let vector = ScoredFeatureVector::from_parts(scaled, record);
        let probability = self.classifier.positive_class_probability(&vector);
        if !probability.is_finite() {
            return Err(ScoringError::InvalidProbability(probability));
        }

        Ok(ScoreReport {
            verdict: self.policy.decide(probability),
            ratios: Some(ratios),
            probability: Some(probability),
        })
    }

    pub fn score_html(&self, record: &ApplicantRecord) -> Result<String, ScoringError> {
        self.score(record).map(|report| report.html())
    }
}

/// Ordered input checks; the first failing field wins.
fn validate(record: &ApplicantRecord) -> Result<ValidatedLoan, ValidationIssue> {
    let loan_amount = positive(record.loan_amount).ok_or(ValidationIssue::InvalidLoanAmount)?;
    let loan_term_months =
        positive(record.loan_term_months).ok_or(ValidationIssue::InvalidLoanTerm)?;
    let annual_income =
        positive(record.annual_income).ok_or(ValidationIssue::InvalidAnnualIncome)?;

    if let Some(bank_asset_value) = record.bank_asset_value {
        if annual_income + bank_asset_value == 0.0 {
            return Err(ValidationIssue::InvalidBankAssetValue);
        }
    }

    Ok(ValidatedLoan {
        annual_income,
        loan_amount,
        loan_term_months,
        bank_asset_value: record.bank_asset_value,
    })
}

fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|value| *value > 0.0)
}
