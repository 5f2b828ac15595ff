use super::domain::{InterpretedProfile, Interpretation, NormalizedInput};
use super::policy::{UnderwritingPolicy, CREDIT_REJECTION_REASON};

const FOIR_BOUNDS: (f64, f64) = (0.30, 0.60);
const RISK_FACTOR_BOUNDS: (f64, f64) = (0.60, 1.10);

/// Derive underwriting parameters from a normalized request.
///
/// A credit score below the policy minimum is terminal: nothing past the
/// rejection check is computed.
pub fn interpret_profile(input: &NormalizedInput, policy: &UnderwritingPolicy) -> Interpretation {
    let profile = &input.financial_profile;
    if profile.credit_score < policy.min_credit_score {
        return Interpretation::Rejected {
            reason: CREDIT_REJECTION_REASON.to_string(),
        };
    }

    let stability = profile.employment_stability_score;
    let property = &input.property_details;
    let preferences = &input.loan_preferences;

    Interpretation::Accepted(InterpretedProfile {
        foir: foir(profile.monthly_income, profile.credit_score, stability),
        risk_factor: risk_factor(profile.credit_score, stability),
        adjusted_interest_rate: adjusted_interest_rate(
            preferences.base_interest_rate,
            profile.credit_score,
            stability,
            policy.rate_floor_pct,
        ),
        luxury_multiplier: luxury_multiplier(property.luxury_level),
        location_multiplier: location_multiplier(property.location_score),
        max_tenure_years: input.system_derived.max_tenure_years,
        requested_tenure_years: preferences.desired_tenure_years,
        ltv_ratio: preferences.ltv_ratio,
    })
}

pub(crate) fn foir(monthly_income: f64, credit_score: u32, stability: f64) -> f64 {
    let base = if monthly_income < 25_000.0 {
        0.42
    } else if monthly_income < 50_000.0 {
        0.47
    } else {
        0.52
    };

    let credit_adjustment = match credit_score {
        800.. => 0.03,
        750..=799 => 0.02,
        700..=749 => 0.0,
        650..=699 => -0.02,
        _ => -0.05,
    };

    let stability_adjustment = (stability - 0.5) * 0.1;
    clamp(
        base + credit_adjustment + stability_adjustment,
        FOIR_BOUNDS,
    )
}

pub(crate) fn risk_factor(credit_score: u32, stability: f64) -> f64 {
    let base = match credit_score {
        820.. => 1.05,
        760..=819 => 1.00,
        700..=759 => 0.90,
        650..=699 => 0.80,
        _ => 0.70,
    };

    clamp(base + (stability - 0.5) * 0.6, RISK_FACTOR_BOUNDS)
}

pub(crate) fn adjusted_interest_rate(
    base_rate: f64,
    credit_score: u32,
    stability: f64,
    floor_pct: f64,
) -> f64 {
    let credit_spread = match credit_score {
        820.. => -0.3,
        760..=819 => -0.1,
        700..=759 => 0.1,
        650..=699 => 0.3,
        _ => 0.6,
    };

    let rate = base_rate + credit_spread + (0.5 - stability) * 0.6;
    rate.max(floor_pct)
}

pub(crate) fn luxury_multiplier(luxury_level: f64) -> f64 {
    0.8 + 0.6 * luxury_level
}

pub(crate) fn location_multiplier(location_score: f64) -> f64 {
    0.9 + 0.6 * location_score
}

fn clamp(value: f64, (min, max): (f64, f64)) -> f64 {
    value.max(min).min(max)
}
