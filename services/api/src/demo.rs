use crate::infra::load_request;
use clap::Args;
use loan_engine::config::AppConfig;
use loan_engine::error::AppError;
use loan_engine::workflows::underwriting::{
    evaluate_batch, DecisionView, EvaluationData, EvaluationResponse, UnderwritingPipeline,
};
use serde_json::{json, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct AssessArgs {
    /// Path to a JSON loan request
    #[arg(long)]
    pub(crate) input: PathBuf,
}

#[derive(Args, Debug)]
pub(crate) struct BatchArgs {
    /// CSV file with one applicant per row (snake_case column names)
    #[arg(long)]
    pub(crate) csv: PathBuf,
}

fn configured_pipeline() -> Result<UnderwritingPipeline, AppError> {
    let config = AppConfig::load()?;
    Ok(UnderwritingPipeline::new(config.underwriting))
}

pub(crate) fn run_assess(args: AssessArgs) -> Result<(), AppError> {
    let pipeline = configured_pipeline()?;
    let request = load_request(&args.input)?;

    let response = pipeline.evaluate(&request);
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

pub(crate) fn run_batch(args: BatchArgs) -> Result<(), AppError> {
    let pipeline = configured_pipeline()?;
    let reader = BufReader::new(File::open(&args.csv)?);

    let outcomes = evaluate_batch(&pipeline, reader)?;
    println!("Evaluated {} applicant(s) from {}", outcomes.len(), args.csv.display());
    for outcome in &outcomes {
        println!("- row {}: {}", outcome.row, summarize(&outcome.response));
    }

    Ok(())
}

pub(crate) fn run_demo() -> Result<(), AppError> {
    let pipeline = configured_pipeline()?;

    println!("Loan eligibility demo");
    for (label, request) in sample_borrowers() {
        let response = pipeline.evaluate(&request);
        println!("\n{label}");
        println!("  {}", summarize(&response));

        if let Some(EvaluationData::Assessment(report)) = &response.data {
            for line in report
                .advisory
                .insights
                .iter()
                .chain(&report.advisory.warnings)
                .chain(&report.advisory.suggestions)
            {
                println!("  * {line}");
            }
        }
    }

    Ok(())
}

/// One-line description of an evaluation outcome.
pub(crate) fn summarize(response: &EvaluationResponse) -> String {
    if let Some(error) = &response.error {
        let detail = match (&error.details, &error.message) {
            (Some(violations), _) => violations
                .iter()
                .map(|violation| violation.message.as_str())
                .collect::<Vec<_>>()
                .join("; "),
            (None, Some(message)) => message.clone(),
            (None, None) => String::new(),
        };
        return format!("{}: {}", error.kind.label(), detail);
    }

    match &response.data {
        Some(EvaluationData::Assessment(report)) => format!(
            "{} | eligible {} | EMI {} over {} years | limited by {}",
            decision_label(&report.decision),
            report.core_results.eligible_loan,
            report.core_results.emi,
            report.core_results.tenure_years,
            report.constraints.limiting_factor.label(),
        ),
        Some(EvaluationData::Rejection { decision }) => decision_label(decision),
        None => "no outcome".to_string(),
    }
}

fn decision_label(decision: &DecisionView) -> String {
    match decision {
        DecisionView::Approved => "APPROVED".to_string(),
        DecisionView::Modified { approved_loan } => format!("MODIFIED to {approved_loan}"),
        DecisionView::Rejected { reason: Some(reason) } => format!("REJECTED ({reason})"),
        DecisionView::Rejected { reason: None } => "REJECTED".to_string(),
    }
}

fn sample_borrowers() -> Vec<(&'static str, Value)> {
    let base = json!({
        "financialProfile": {
            "monthlyIncome": 60000,
            "otherObligations": 5000,
            "age": 30,
            "creditScore": 780,
            "employmentStabilityScore": 0.8
        },
        "loanPreferences": {
            "loanAmountRequested": 2000000,
            "baseInterestRate": 9,
            "ltvRatio": 0.8
        },
        "propertyDetails": {
            "includePlot": false,
            "plotSizeSqft": 1200,
            "floors": 2,
            "baseCostPerSqft": 1500,
            "luxuryLevel": 0.3,
            "locationScore": 0.5
        }
    });

    let mut thin_file = base.clone();
    thin_file["financialProfile"]["creditScore"] = json!(600);

    let mut stretched = base.clone();
    stretched["financialProfile"]["monthlyIncome"] = json!(30000);
    stretched["loanPreferences"]["loanAmountRequested"] = json!(4000000);

    let mut late_career = base.clone();
    late_career["financialProfile"]["age"] = json!(52);
    late_career["propertyDetails"]["includePlot"] = json!(true);
    late_career["propertyDetails"]["plotPrice"] = json!(1500000);

    vec![
        ("Salaried borrower, self-build without plot", base),
        ("Credit score below the policy minimum", thin_file),
        ("Large request on a modest income", stretched),
        ("Eight years to retirement, plot included", late_career),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn samples_cover_each_decision() {
        let pipeline = UnderwritingPipeline::default();

        let summaries: Vec<String> = sample_borrowers()
            .into_iter()
            .map(|(_, request)| summarize(&pipeline.evaluate(&request)))
            .collect();

        assert!(summaries[0].starts_with("APPROVED"));
        assert!(summaries[1].starts_with("REJECTED"));
        assert!(summaries[2].starts_with("MODIFIED"));
    }

    #[test]
    fn validation_failures_list_messages() {
        let pipeline = UnderwritingPipeline::default();

        let summary = summarize(&pipeline.evaluate(&json!({})));

        assert!(summary.starts_with("VALIDATION_ERROR: "));
        assert!(summary.contains("\"financialProfile\" is required"));
    }
}
