use serde::{Deserialize, Deserializer, Serialize};

/// Highest completed education level as offered by the intake form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Education {
    Graduate,
    #[default]
    #[serde(rename = "Not Graduate")]
    NotGraduate,
}

impl Education {
    pub const fn encoded(self) -> f64 {
        match self {
            Education::Graduate => 1.0,
            Education::NotGraduate => 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SelfEmployed {
    Yes,
    #[default]
    No,
}

impl SelfEmployed {
    pub const fn encoded(self) -> f64 {
        match self {
            SelfEmployed::Yes => 1.0,
            SelfEmployed::No => 0.0,
        }
    }
}

/// One applicant as submitted through the form.
///
/// Numeric fields are optional because a blank form input arrives as `null`. Only the loan
/// amount, loan term, and annual income are validated before scoring.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ApplicantRecord {
    #[serde(default)]
    pub dependents: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub education: Education,
    #[serde(default, deserialize_with = "null_as_default")]
    pub self_employed: SelfEmployed,
    #[serde(default)]
    pub annual_income: Option<f64>,
    #[serde(default)]
    pub loan_amount: Option<f64>,
    #[serde(default)]
    pub loan_term_months: Option<f64>,
    #[serde(default)]
    pub cibil_score: Option<f64>,
    #[serde(default)]
    pub residential_assets_value: Option<f64>,
    #[serde(default)]
    pub commercial_assets_value: Option<f64>,
    #[serde(default)]
    pub luxury_assets_value: Option<f64>,
    #[serde(default)]
    pub bank_asset_value: Option<f64>,
}

// a blank dropdown posts `null`; it encodes like an absent key
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Input problems reported back to the applicant instead of a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationIssue {
    InvalidLoanAmount,
    InvalidLoanTerm,
    InvalidAnnualIncome,
    /// Annual income plus bank assets sums to zero, leaving debt-to-income undefined.
    InvalidBankAssetValue,
}

impl ValidationIssue {
    pub const fn field_label(self) -> &'static str {
        match self {
            ValidationIssue::InvalidLoanAmount => "Loan Amount",
            ValidationIssue::InvalidLoanTerm => "Loan Term",
            ValidationIssue::InvalidAnnualIncome => "Annual Income",
            ValidationIssue::InvalidBankAssetValue => "Bank Asset Value",
        }
    }

    pub fn message(self) -> String {
        format!("Please enter a valid {}", self.field_label())
    }
}

/// Outcome of scoring one applicant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Verdict {
    HighRisk { rejection_probability: f64 },
    LowRisk { displayed_probability: f64 },
    Warning { issue: ValidationIssue },
}

impl Verdict {
    pub const fn label(&self) -> &'static str {
        match self {
            Verdict::HighRisk { .. } => "high_risk",
            Verdict::LowRisk { .. } => "low_risk",
            Verdict::Warning { .. } => "warning",
        }
    }

    pub fn summary(&self) -> String {
        match self {
            Verdict::HighRisk {
                rejection_probability,
            } => format!("high risk (rejection probability {rejection_probability:.2})"),
            Verdict::LowRisk {
                displayed_probability,
            } => format!("low risk (approval probability {displayed_probability:.2})"),
            Verdict::Warning { issue } => issue.message(),
        }
    }

    /// Probability shown to the applicant, if the verdict carries one.
    pub fn displayed_probability(&self) -> Option<f64> {
        match self {
            Verdict::HighRisk {
                rejection_probability,
            } => Some(*rejection_probability),
            Verdict::LowRisk {
                displayed_probability,
            } => Some(*displayed_probability),
            Verdict::Warning { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn null_dropdowns_take_their_defaults() {
        let record: ApplicantRecord = serde_json::from_value(json!({
            "education": null,
            "self_employed": null,
            "loan_amount": 1000
        }))
        .expect("null categoricals deserialize");

        assert_eq!(record.education, Education::NotGraduate);
        assert_eq!(record.self_employed, SelfEmployed::No);
        assert_eq!(record.loan_amount, Some(1000.0));
    }

    #[test]
    fn unknown_dropdown_labels_are_rejected() {
        let result = serde_json::from_value::<ApplicantRecord>(json!({ "education": "PhD" }));
        assert!(result.is_err());
    }
}
