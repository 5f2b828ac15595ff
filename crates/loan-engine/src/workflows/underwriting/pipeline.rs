use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, trace};

use super::advisory::generate_advisory;
use super::approval::{resolve_approval, ApprovalInputs};
use super::costs::estimate_property_costs;
use super::domain::{
    Advisory, ApprovalDecision, CostMultipliers, EligibilityResult, InterpretedProfile,
    Interpretation, LimitingFactor, NormalizedInput, PropertyCosts,
};
use super::eligibility::resolve_eligibility;
use super::emi::round_half_up;
use super::interpreter::interpret_profile;
use super::policy::UnderwritingPolicy;
use super::validation::{InputValidator, ValidationError, Violation};

/// Message returned to callers for any internal failure.
pub const INTERNAL_FAILURE_MESSAGE: &str = "Loan evaluation failed";

/// Largest magnitude a currency figure may reach and still be reported as a
/// whole number without loss (2^53 - 1).
pub const MAX_REPORTABLE_AMOUNT: f64 = 9_007_199_254_740_991.0;

/// Pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Validation,
    Interpretation,
    CostEstimation,
    Eligibility,
    Approval,
    Advisory,
}

/// Collaborator receiving stage progress and internal failures.
pub trait DiagnosticSink: Send + Sync {
    fn stage_completed(&self, _stage: Stage) {}

    fn internal_failure(&self, kind: ErrorKind, message: &str);
}

/// Default sink reporting through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl DiagnosticSink for TracingDiagnostics {
    fn stage_completed(&self, stage: Stage) {
        trace!(?stage, "underwriting stage completed");
    }

    fn internal_failure(&self, kind: ErrorKind, message: &str) {
        error!(kind = kind.label(), %message, "loan evaluation failed");
    }
}

/// Defects detected after validation; surfaced to callers as `INTERNAL_ERROR`.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    #[error("{stage:?} produced a non-finite {field} ({value})")]
    NonFiniteFigure {
        stage: Stage,
        field: &'static str,
        value: f64,
    },
    #[error("{stage:?} produced {field} ({value}) beyond the reportable range")]
    FigureOutOfRange {
        stage: Stage,
        field: &'static str,
        value: f64,
    },
}

/// Failure of a single assessment.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AssessmentError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Result of a completed assessment, before response shaping.
#[derive(Debug, Clone, PartialEq)]
pub enum Assessment {
    Completed(Box<AssessmentFigures>),
    Declined { reason: String },
}

/// Full-precision figures from every stage of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct AssessmentFigures {
    pub input: NormalizedInput,
    pub interpreted: InterpretedProfile,
    pub costs: PropertyCosts,
    pub eligibility: EligibilityResult,
    pub decision: ApprovalDecision,
    pub advisory: Advisory,
}

/// Six-stage underwriting pipeline. Holds no mutable state.
pub struct UnderwritingPipeline<D = TracingDiagnostics> {
    policy: UnderwritingPolicy,
    validator: InputValidator,
    diagnostics: Arc<D>,
}

impl UnderwritingPipeline<TracingDiagnostics> {
    pub fn new(policy: UnderwritingPolicy) -> Self {
        Self::with_diagnostics(policy, Arc::new(TracingDiagnostics))
    }
}

impl Default for UnderwritingPipeline<TracingDiagnostics> {
    fn default() -> Self {
        Self::new(UnderwritingPolicy::default())
    }
}

impl<D> UnderwritingPipeline<D>
where
    D: DiagnosticSink + 'static,
{
    pub fn with_diagnostics(policy: UnderwritingPolicy, diagnostics: Arc<D>) -> Self {
        Self {
            validator: InputValidator::new(policy.clone()),
            policy,
            diagnostics,
        }
    }

    pub fn policy(&self) -> &UnderwritingPolicy {
        &self.policy
    }

    /// Evaluate an untyped request and shape the response envelope.
    pub fn evaluate(&self, raw: &Value) -> EvaluationResponse {
        match self.assess(raw) {
            Ok(Assessment::Completed(figures)) => {
                EvaluationResponse::success(EvaluationData::Assessment(Box::new(
                    AssessmentReport::from_figures(&figures),
                )))
            }
            Ok(Assessment::Declined { reason }) => {
                EvaluationResponse::success(EvaluationData::Rejection {
                    decision: DecisionView::Rejected {
                        reason: Some(reason),
                    },
                })
            }
            Err(AssessmentError::Validation(err)) => {
                EvaluationResponse::failure(ErrorBody::validation(err.violations))
            }
            Err(AssessmentError::Engine(err)) => {
                self.diagnostics
                    .internal_failure(ErrorKind::InternalError, &err.to_string());
                EvaluationResponse::failure(ErrorBody::internal(INTERNAL_FAILURE_MESSAGE))
            }
        }
    }

    /// Run every stage and return the unrounded figures.
    pub fn assess(&self, raw: &Value) -> Result<Assessment, AssessmentError> {
        let input = self.validator.validate(raw).map_err(|err| {
            debug!(violations = err.violations.len(), "loan request failed validation");
            err
        })?;
        self.diagnostics.stage_completed(Stage::Validation);

        let interpreted = match interpret_profile(&input, &self.policy) {
            Interpretation::Accepted(interpreted) => interpreted,
            Interpretation::Rejected { reason } => {
                debug!(
                    credit_score = input.financial_profile.credit_score,
                    %reason,
                    "loan request declined"
                );
                self.diagnostics.stage_completed(Stage::Interpretation);
                return Ok(Assessment::Declined { reason });
            }
        };
        ensure_finite(
            Stage::Interpretation,
            &[
                ("foir", interpreted.foir),
                ("riskFactor", interpreted.risk_factor),
                ("adjustedInterestRate", interpreted.adjusted_interest_rate),
                ("luxuryMultiplier", interpreted.luxury_multiplier),
                ("locationMultiplier", interpreted.location_multiplier),
            ],
        )?;
        self.diagnostics.stage_completed(Stage::Interpretation);

        let costs = estimate_property_costs(
            &input.property_details,
            CostMultipliers::from(&interpreted),
        );
        ensure_reportable(
            Stage::CostEstimation,
            &[
                ("plotCost", costs.plot_cost),
                ("constructionCost", costs.construction_cost),
                ("propertyValue", costs.property_value),
            ],
        )?;
        self.diagnostics.stage_completed(Stage::CostEstimation);

        let eligibility = resolve_eligibility(&input.financial_profile, &interpreted, &costs);
        ensure_reportable(
            Stage::Eligibility,
            &[
                ("incomeBasedLimit", eligibility.income_based_limit),
                ("ltvBasedLimit", eligibility.ltv_based_limit),
                ("eligibleLoan", eligibility.eligible_loan),
                ("emi", eligibility.emi),
                ("totalInterest", eligibility.total_interest),
                ("totalRepayment", eligibility.total_repayment),
            ],
        )?;
        self.diagnostics.stage_completed(Stage::Eligibility);

        let decision = resolve_approval(ApprovalInputs::from_eligibility(
            input.loan_preferences.loan_amount_requested,
            &eligibility,
        ));
        self.diagnostics.stage_completed(Stage::Approval);

        let advisory = generate_advisory(&eligibility, &input.financial_profile);
        self.diagnostics.stage_completed(Stage::Advisory);

        debug!(
            decision = decision.label(),
            limiting_factor = eligibility.limiting_factor.label(),
            "loan request assessed"
        );

        Ok(Assessment::Completed(Box::new(AssessmentFigures {
            input,
            interpreted,
            costs,
            eligibility,
            decision,
            advisory,
        })))
    }
}

fn ensure_finite(stage: Stage, figures: &[(&'static str, f64)]) -> Result<(), EngineError> {
    match figures.iter().find(|(_, value)| !value.is_finite()) {
        Some(&(field, value)) => Err(EngineError::NonFiniteFigure {
            stage,
            field,
            value,
        }),
        None => Ok(()),
    }
}

/// Finite and small enough to round into a whole currency amount.
fn ensure_reportable(stage: Stage, figures: &[(&'static str, f64)]) -> Result<(), EngineError> {
    ensure_finite(stage, figures)?;
    match figures.iter().find(|(_, value)| value.abs() > MAX_REPORTABLE_AMOUNT) {
        Some(&(field, value)) => Err(EngineError::FigureOutOfRange {
            stage,
            field,
            value,
        }),
        None => Ok(()),
    }
}

/// Whole currency units, rounding halves up. Callers pass figures already
/// checked by `ensure_reportable`.
fn currency(value: f64) -> i64 {
    round_half_up(value) as i64
}

/// Response envelope returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<EvaluationData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

impl EvaluationResponse {
    fn success(data: EvaluationData) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn failure(error: ErrorBody) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
        }
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.error.as_ref().map(|error| error.kind)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EvaluationData {
    Assessment(Box<AssessmentReport>),
    Rejection { decision: DecisionView },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    ValidationError,
    InternalError,
}

impl ErrorKind {
    pub fn label(&self) -> &'static str {
        match self {
            ErrorKind::ValidationError => "VALIDATION_ERROR",
            ErrorKind::InternalError => "INTERNAL_ERROR",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(rename = "type")]
    pub kind: ErrorKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<Violation>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorBody {
    pub fn validation(details: Vec<Violation>) -> Self {
        Self {
            kind: ErrorKind::ValidationError,
            details: Some(details),
            message: None,
        }
    }

    pub fn internal(message: &str) -> Self {
        Self {
            kind: ErrorKind::InternalError,
            details: None,
            message: Some(message.to_string()),
        }
    }
}

/// Decision as presented to callers; amounts rounded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DecisionView {
    Rejected {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },
    Approved,
    Modified {
        #[serde(rename = "approvedLoan")]
        approved_loan: i64,
    },
}

impl From<ApprovalDecision> for DecisionView {
    fn from(decision: ApprovalDecision) -> Self {
        match decision {
            ApprovalDecision::Rejected => DecisionView::Rejected { reason: None },
            ApprovalDecision::Approved => DecisionView::Approved,
            ApprovalDecision::Modified { approved_loan } => DecisionView::Modified {
                approved_loan: currency(approved_loan),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentReport {
    pub decision: DecisionView,
    pub core_results: CoreResults,
    pub cost_breakdown: CostBreakdown,
    pub constraints: Constraints,
    pub advisory: Advisory,
    pub debug: DebugFigures,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoreResults {
    pub eligible_loan: i64,
    pub emi: i64,
    pub tenure_years: f64,
    pub interest_rate_adjusted: f64,
    pub total_interest: i64,
    pub total_repayment: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostBreakdown {
    pub plot_cost: i64,
    pub construction_cost: i64,
    pub total_project_cost: i64,
    pub down_payment_required: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Constraints {
    pub income_based_limit: i64,
    pub ltv_based_limit: i64,
    pub limiting_factor: LimitingFactor,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugFigures {
    pub foir: f64,
    pub risk_factor: f64,
    pub luxury_multiplier: f64,
    pub location_multiplier: f64,
    pub max_tenure_years: f64,
    pub requested_tenure_years: f64,
}

impl AssessmentReport {
    pub fn from_figures(figures: &AssessmentFigures) -> Self {
        let AssessmentFigures {
            interpreted,
            costs,
            eligibility,
            decision,
            advisory,
            ..
        } = figures;

        let down_payment_required = (costs.property_value - eligibility.eligible_loan).max(0.0);

        Self {
            decision: DecisionView::from(*decision),
            core_results: CoreResults {
                eligible_loan: currency(eligibility.eligible_loan),
                emi: currency(eligibility.emi),
                tenure_years: eligibility.tenure_years,
                interest_rate_adjusted: eligibility.interest_rate_adjusted,
                total_interest: currency(eligibility.total_interest),
                total_repayment: currency(eligibility.total_repayment),
            },
            cost_breakdown: CostBreakdown {
                plot_cost: currency(costs.plot_cost),
                construction_cost: currency(costs.construction_cost),
                total_project_cost: currency(costs.property_value),
                down_payment_required: currency(down_payment_required),
            },
            constraints: Constraints {
                income_based_limit: currency(eligibility.income_based_limit),
                ltv_based_limit: currency(eligibility.ltv_based_limit),
                limiting_factor: eligibility.limiting_factor,
            },
            advisory: advisory.clone(),
            debug: DebugFigures {
                foir: interpreted.foir,
                risk_factor: interpreted.risk_factor,
                luxury_multiplier: interpreted.luxury_multiplier,
                location_multiplier: interpreted.location_multiplier,
                max_tenure_years: interpreted.max_tenure_years,
                requested_tenure_years: interpreted.requested_tenure_years,
            },
        }
    }
}
