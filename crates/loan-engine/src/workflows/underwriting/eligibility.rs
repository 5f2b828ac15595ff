use super::domain::{
    EligibilityResult, FinancialProfile, InterpretedProfile, LimitingFactor, PropertyCosts,
};
use super::emi::{compute_emi, compute_principal_from_emi, compute_totals};

/// Resolve the maximum loan as the tighter of income capacity and LTV.
///
/// Equal limits report [`LimitingFactor::Income`].
pub fn resolve_eligibility(
    profile: &FinancialProfile,
    interpreted: &InterpretedProfile,
    costs: &PropertyCosts,
) -> EligibilityResult {
    let rate = interpreted.adjusted_interest_rate;
    let tenure_years = interpreted.requested_tenure_years;

    let max_allowed_total_emi = profile.monthly_income * interpreted.foir;
    let available_surplus = (max_allowed_total_emi - profile.other_obligations).max(0.0);
    let max_emi = available_surplus * interpreted.risk_factor;
    let income_based_limit = compute_principal_from_emi(max_emi, rate, tenure_years);

    let ltv_based_limit = costs.property_value * interpreted.ltv_ratio;

    let eligible_loan = income_based_limit.min(ltv_based_limit);
    let limiting_factor = if eligible_loan == income_based_limit {
        LimitingFactor::Income
    } else {
        LimitingFactor::Ltv
    };

    let emi = compute_emi(eligible_loan, rate, tenure_years);
    let totals = compute_totals(eligible_loan, emi, tenure_years);

    EligibilityResult {
        income_based_limit,
        ltv_based_limit,
        limiting_factor,
        eligible_loan,
        emi,
        available_surplus,
        tenure_years,
        interest_rate_adjusted: rate,
        total_interest: totals.total_interest,
        total_repayment: totals.total_repayment,
    }
}
