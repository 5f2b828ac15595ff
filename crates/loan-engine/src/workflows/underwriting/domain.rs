use serde::{Deserialize, Serialize};

/// Borrower finances captured at intake.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialProfile {
    pub monthly_income: f64,
    pub other_obligations: f64,
    pub age: u32,
    pub credit_score: u32,
    pub employment_stability_score: f64,
    pub down_payment_available: f64,
}

/// Borrower preferences for the loan itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanPreferences {
    /// Normalized tenure; always set once the validator has run.
    pub desired_tenure_years: f64,
    pub loan_amount_requested: f64,
    pub base_interest_rate: f64,
    pub ltv_ratio: f64,
}

/// Physical parameters of the plot and the planned construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDetails {
    pub include_plot: bool,
    pub plot_price: f64,
    pub plot_size_sqft: f64,
    pub floors: u64,
    pub base_cost_per_sqft: f64,
    pub luxury_level: f64,
    pub location_score: f64,
}

/// Values derived by the validator rather than supplied by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemDerived {
    pub max_tenure_years: f64,
}

/// Validated request with defaults applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedInput {
    pub financial_profile: FinancialProfile,
    pub loan_preferences: LoanPreferences,
    pub property_details: PropertyDetails,
    pub system_derived: SystemDerived,
}

/// Underwriting parameters derived from the borrower profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterpretedProfile {
    pub foir: f64,
    pub risk_factor: f64,
    pub adjusted_interest_rate: f64,
    pub luxury_multiplier: f64,
    pub location_multiplier: f64,
    pub max_tenure_years: f64,
    pub requested_tenure_years: f64,
    pub ltv_ratio: f64,
}

/// Outcome of the profile interpreter. `Rejected` is terminal.
#[derive(Debug, Clone, PartialEq)]
pub enum Interpretation {
    Accepted(InterpretedProfile),
    Rejected { reason: String },
}

/// Cost multipliers handed from the interpreter to the cost estimator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostMultipliers {
    pub luxury: f64,
    pub location: f64,
}

impl From<&InterpretedProfile> for CostMultipliers {
    fn from(profile: &InterpretedProfile) -> Self {
        Self {
            luxury: profile.luxury_multiplier,
            location: profile.location_multiplier,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyCosts {
    pub built_up_area: f64,
    pub cost_per_sqft: f64,
    pub construction_cost: f64,
    pub plot_cost: f64,
    pub property_value: f64,
}

/// Which capacity bound decided the eligible loan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LimitingFactor {
    Income,
    Ltv,
}

impl LimitingFactor {
    pub fn label(&self) -> &'static str {
        match self {
            LimitingFactor::Income => "INCOME",
            LimitingFactor::Ltv => "LTV",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibilityResult {
    pub income_based_limit: f64,
    pub ltv_based_limit: f64,
    pub limiting_factor: LimitingFactor,
    pub eligible_loan: f64,
    pub emi: f64,
    pub available_surplus: f64,
    pub tenure_years: f64,
    pub interest_rate_adjusted: f64,
    pub total_interest: f64,
    pub total_repayment: f64,
}

/// Verdict of the approval resolver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApprovalDecision {
    Rejected,
    Approved,
    Modified {
        #[serde(rename = "approvedLoan")]
        approved_loan: f64,
    },
}

impl ApprovalDecision {
    pub fn label(&self) -> &'static str {
        match self {
            ApprovalDecision::Rejected => "REJECTED",
            ApprovalDecision::Approved => "APPROVED",
            ApprovalDecision::Modified { .. } => "MODIFIED",
        }
    }
}

/// Non-binding guidance accompanying a decision.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Advisory {
    pub insights: Vec<String>,
    pub warnings: Vec<String>,
    pub suggestions: Vec<String>,
}
