use crate::infra::load_engine;
use clap::Args;
use credit_risk::config::AppConfig;
use credit_risk::error::AppError;
use credit_risk::scoring::{
    ApplicantRecord, ApprovalDisplay, DecisionPolicy, Education, ScoreReport, SelfEmployed,
};

#[derive(Args, Debug, Default)]
pub(crate) struct ScoreArgs {
    /// Number of dependents
    #[arg(long, allow_hyphen_values = true)]
    pub(crate) dependents: Option<f64>,
    /// Education level: "Graduate" or "Not Graduate"
    #[arg(long, value_parser = parse_education, default_value = "Not Graduate")]
    pub(crate) education: Education,
    /// Self employed: "Yes" or "No"
    #[arg(long, value_parser = parse_self_employed, default_value = "No")]
    pub(crate) self_employed: SelfEmployed,
    #[arg(long, allow_hyphen_values = true)]
    pub(crate) annual_income: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    pub(crate) loan_amount: Option<f64>,
    /// Loan term in months
    #[arg(long, allow_hyphen_values = true)]
    pub(crate) loan_term: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    pub(crate) cibil_score: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    pub(crate) residential_assets: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    pub(crate) commercial_assets: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    pub(crate) luxury_assets: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    pub(crate) bank_assets: Option<f64>,
    /// Override the configured rejection threshold
    #[arg(long)]
    pub(crate) threshold: Option<f64>,
    /// Override the configured approval display ("complement" or "raw")
    #[arg(long)]
    pub(crate) approval_display: Option<ApprovalDisplay>,
    /// Print the full report as JSON instead of a summary
    #[arg(long)]
    pub(crate) json: bool,
}

fn parse_education(raw: &str) -> Result<Education, String> {
    match raw.trim().to_ascii_lowercase().replace(['-', '_'], " ").as_str() {
        "graduate" => Ok(Education::Graduate),
        "not graduate" => Ok(Education::NotGraduate),
        other => Err(format!("unknown education '{other}'")),
    }
}

fn parse_self_employed(raw: &str) -> Result<SelfEmployed, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "yes" | "y" => Ok(SelfEmployed::Yes),
        "no" | "n" => Ok(SelfEmployed::No),
        other => Err(format!("unknown self-employment answer '{other}'")),
    }
}

impl ScoreArgs {
    fn record(&self) -> ApplicantRecord {
        ApplicantRecord {
            dependents: self.dependents,
            education: self.education,
            self_employed: self.self_employed,
            annual_income: self.annual_income,
            loan_amount: self.loan_amount,
            loan_term_months: self.loan_term,
            cibil_score: self.cibil_score,
            residential_assets_value: self.residential_assets,
            commercial_assets_value: self.commercial_assets,
            luxury_assets_value: self.luxury_assets,
            bank_asset_value: self.bank_assets,
        }
    }

    fn policy(&self, configured: DecisionPolicy) -> Result<DecisionPolicy, AppError> {
        let threshold = self
            .threshold
            .unwrap_or_else(|| configured.rejection_threshold());
        let display = self
            .approval_display
            .unwrap_or_else(|| configured.approval_display());
        Ok(DecisionPolicy::new(threshold, display)?)
    }
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let policy = args.policy(config.policy)?;
    let engine = load_engine(&config.model, policy)?;

    let record = args.record();
    let report = engine.score(&record)?;

    if args.json {
        let rendered = serde_json::to_string_pretty(&report)
            .map_err(|err| AppError::Io(std::io::Error::other(err)))?;
        println!("{rendered}");
    } else {
        render_report(&report);
    }

    Ok(())
}

fn render_report(report: &ScoreReport) {
    println!("Verdict: {}", report.verdict.summary());
    if let Some(ratios) = report.ratios {
        println!(
            "- loan-to-income {:.4} | debt-to-income {:.4}",
            ratios.loan_to_income_ratio, ratios.debt_to_income_ratio
        );
    }
    if let Some(probability) = report.probability {
        println!("- model rejection probability {probability:.4}");
    }
    println!("{}", report.html());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_form_labels() {
        assert_eq!(parse_education("Not Graduate"), Ok(Education::NotGraduate));
        assert_eq!(parse_education("not-graduate"), Ok(Education::NotGraduate));
        assert_eq!(parse_education("Graduate"), Ok(Education::Graduate));
        assert_eq!(parse_self_employed("Yes"), Ok(SelfEmployed::Yes));
        assert!(parse_self_employed("maybe").is_err());
    }

    #[test]
    fn cli_overrides_configured_policy() {
        let args = ScoreArgs {
            threshold: Some(0.5),
            ..ScoreArgs::default()
        };
        let policy = args.policy(DecisionPolicy::default()).expect("valid policy");
        assert_eq!(policy.rejection_threshold(), 0.5);
        assert_eq!(policy.approval_display(), ApprovalDisplay::Complement);
    }

    #[test]
    fn out_of_range_threshold_is_rejected() {
        let args = ScoreArgs {
            threshold: Some(-0.1),
            ..ScoreArgs::default()
        };
        assert!(matches!(
            args.policy(DecisionPolicy::default()),
            Err(AppError::Policy(_))
        ));
    }

    #[test]
    fn record_maps_flags_to_fields() {
        let args = ScoreArgs {
            loan_term: Some(120.0),
            bank_assets: Some(60_000.0),
            ..ScoreArgs::default()
        };
        let record = args.record();
        assert_eq!(record.loan_term_months, Some(120.0));
        assert_eq!(record.bank_asset_value, Some(60_000.0));
        assert_eq!(record.education, Education::NotGraduate);
    }
}
