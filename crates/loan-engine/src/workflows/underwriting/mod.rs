//! Loan eligibility and underwriting.
//!
//! Six pure stages run in order: validation, profile interpretation, property
//! costing, eligibility resolution, approval, and advisory text. The
//! [`UnderwritingPipeline`] chains them and shapes the caller-facing response.

pub mod advisory;
pub mod approval;
pub mod batch;
pub mod costs;
pub mod domain;
pub mod eligibility;
pub mod emi;
pub mod interpreter;
pub mod pipeline;
pub mod policy;
pub mod router;
pub mod validation;

#[cfg(test)]
mod tests;

pub use advisory::generate_advisory;
pub use approval::{resolve_approval, ApprovalInputs};
pub use batch::{evaluate_batch, parse_batch_requests, BatchOutcome};
pub use costs::estimate_property_costs;
pub use domain::{
    Advisory, ApprovalDecision, CostMultipliers, EligibilityResult, FinancialProfile,
    InterpretedProfile, Interpretation, LimitingFactor, LoanPreferences, NormalizedInput,
    PropertyCosts, PropertyDetails, SystemDerived,
};
pub use eligibility::resolve_eligibility;
pub use emi::{compute_emi, compute_principal_from_emi, compute_totals, RepaymentTotals};
pub use interpreter::interpret_profile;
pub use pipeline::{
    Assessment, AssessmentError, AssessmentFigures, AssessmentReport, DecisionView,
    DiagnosticSink, EngineError, ErrorBody, ErrorKind, EvaluationData, EvaluationResponse, Stage,
    TracingDiagnostics, UnderwritingPipeline,
};
pub use policy::UnderwritingPolicy;
pub use router::underwriting_router;
pub use validation::{InputValidator, ValidationError, Violation};
