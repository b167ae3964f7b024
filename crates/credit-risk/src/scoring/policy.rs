use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::domain::Verdict;

/// Probability at or above which an applicant is treated as high risk.
///
/// Deliberately below the classifier's own 0.5 boundary.
pub const DEFAULT_REJECTION_THRESHOLD: f64 = 0.35;

/// Which probability an approved applicant is shown.
///
/// `Complement` shows `1 - p` (the approval probability); `Raw` shows the model's rejection
/// probability unchanged. Deployments have shipped both; product has not settled which is
/// intended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalDisplay {
    #[default]
    Complement,
    Raw,
}

impl ApprovalDisplay {
    pub const fn label(self) -> &'static str {
        match self {
            ApprovalDisplay::Complement => "complement",
            ApprovalDisplay::Raw => "raw",
        }
    }
}

impl FromStr for ApprovalDisplay {
    type Err = PolicyError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "complement" => Ok(Self::Complement),
            "raw" => Ok(Self::Raw),
            other => Err(PolicyError::UnknownApprovalDisplay(other.to_string())),
        }
    }
}

impl fmt::Display for ApprovalDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Risk policy applied to the classifier's positive-class probability.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecisionPolicy {
    rejection_threshold: f64,
    approval_display: ApprovalDisplay,
}

impl Default for DecisionPolicy {
    fn default() -> Self {
        Self {
            rejection_threshold: DEFAULT_REJECTION_THRESHOLD,
            approval_display: ApprovalDisplay::default(),
        }
    }
}

impl DecisionPolicy {
    pub fn new(
        rejection_threshold: f64,
        approval_display: ApprovalDisplay,
    ) -> Result<Self, PolicyError> {
        if !rejection_threshold.is_finite() || !(0.0..=1.0).contains(&rejection_threshold) {
            return Err(PolicyError::ThresholdOutOfRange(rejection_threshold));
        }
        Ok(Self {
            rejection_threshold,
            approval_display,
        })
    }

    pub fn rejection_threshold(&self) -> f64 {
        self.rejection_threshold
    }

    pub fn approval_display(&self) -> ApprovalDisplay {
        self.approval_display
    }

    pub fn decide(&self, probability: f64) -> Verdict {
        if probability >= self.rejection_threshold {
            return Verdict::HighRisk {
                rejection_probability: probability,
            };
        }

        let displayed_probability = match self.approval_display {
            ApprovalDisplay::Complement => 1.0 - probability,
            ApprovalDisplay::Raw => probability,
        };
        Verdict::LowRisk {
            displayed_probability,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
    #[error("rejection threshold {0} must be a probability in [0, 1]")]
    ThresholdOutOfRange(f64),
    #[error("unknown approval display `{0}` (expected `complement` or `raw`)")]
    UnknownApprovalDisplay(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_boundary_is_high_risk() {
        let policy = DecisionPolicy::default();
        assert_eq!(
            policy.decide(0.35),
            Verdict::HighRisk {
                rejection_probability: 0.35
            }
        );
    }

    #[test]
    fn approvals_show_complement_by_default() {
        let policy = DecisionPolicy::default();
        match policy.decide(0.2) {
            Verdict::LowRisk {
                displayed_probability,
            } => assert!((displayed_probability - 0.8).abs() < 1e-12),
            other => panic!("expected low risk, got {other:?}"),
        }
    }

    #[test]
    fn raw_display_shows_model_probability() {
        let policy = DecisionPolicy::new(0.35, ApprovalDisplay::Raw).expect("valid policy");
        assert_eq!(
            policy.decide(0.2),
            Verdict::LowRisk {
                displayed_probability: 0.2
            }
        );
    }

    #[test]
    fn overridden_threshold_moves_boundary() {
        let policy = DecisionPolicy::new(0.5, ApprovalDisplay::Complement).expect("valid policy");
        assert!(matches!(policy.decide(0.4), Verdict::LowRisk { .. }));
        assert!(matches!(policy.decide(0.5), Verdict::HighRisk { .. }));
    }

    #[test]
    fn rejects_thresholds_outside_unit_interval() {
        assert!(DecisionPolicy::new(1.2, ApprovalDisplay::Raw).is_err());
        assert!(DecisionPolicy::new(f64::NAN, ApprovalDisplay::Raw).is_err());
    }

    #[test]
    fn parses_display_labels() {
        assert_eq!(
            " Raw ".parse::<ApprovalDisplay>().expect("parses"),
            ApprovalDisplay::Raw
        );
        assert!("inverse".parse::<ApprovalDisplay>().is_err());
    }
}
