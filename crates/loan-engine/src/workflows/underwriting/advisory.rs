use super::domain::{Advisory, EligibilityResult, FinancialProfile, LimitingFactor};
use super::emi::round_half_up;

const EMI_BURDEN_WARNING_RATIO: f64 = 0.7;
const EMI_BURDEN_SUGGESTION_RATIO: f64 = 0.6;

/// Build textual guidance from resolved figures. Never alters the decision.
pub fn generate_advisory(results: &EligibilityResult, profile: &FinancialProfile) -> Advisory {
    let free_cash = (profile.monthly_income - profile.other_obligations).max(0.0);
    let emi_ratio = if free_cash > 0.0 {
        results.emi / free_cash
    } else {
        1.0
    };

    let insights = vec![
        format!(
            "Loan eligibility is limited by your {}.",
            results.limiting_factor.label().to_lowercase()
        ),
        format!("Tenure considered: {} years.", results.tenure_years),
    ];

    let mut warnings = Vec::new();
    if emi_ratio > EMI_BURDEN_WARNING_RATIO {
        warnings.push(format!(
            "EMI would take up {}% of your free monthly income.",
            round_half_up(emi_ratio * 100.0)
        ));
    }
    if results.limiting_factor == LimitingFactor::Ltv {
        warnings.push("Property value is limiting your loan more than your income.".to_string());
    }

    let mut suggestions = Vec::new();
    if results.limiting_factor == LimitingFactor::Income {
        let gap = round_half_up(results.ltv_based_limit - results.income_based_limit);
        if gap > 0.0 {
            suggestions.push(format!(
                "Increasing income or reducing obligations could unlock up to {} more in loan eligibility.",
                group_thousands(gap)
            ));
        }
    }
    if emi_ratio > EMI_BURDEN_SUGGESTION_RATIO {
        suggestions
            .push("Consider reducing the loan amount to keep the EMI manageable.".to_string());
    }

    Advisory {
        insights,
        warnings,
        suggestions,
    }
}

/// Render a whole amount with `,` between groups of three digits.
pub(crate) fn group_thousands(amount: f64) -> String {
    let digits = format!("{:.0}", amount.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if amount < 0.0 {
        grouped.push('-');
    }

    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(monthly_income: f64, other_obligations: f64) -> FinancialProfile {
        FinancialProfile {
            monthly_income,
            other_obligations,
            age: 35,
            credit_score: 760,
            employment_stability_score: 0.6,
            down_payment_available: 0.0,
        }
    }

    fn results(limiting_factor: LimitingFactor, emi: f64) -> EligibilityResult {
        EligibilityResult {
            income_based_limit: 2_400_000.0,
            ltv_based_limit: 3_634_567.4,
            limiting_factor,
            eligible_loan: 2_400_000.0,
            emi,
            available_surplus: 30_000.0,
            tenure_years: 20.0,
            interest_rate_adjusted: 8.9,
            total_interest: 0.0,
            total_repayment: 0.0,
        }
    }

    #[test]
    fn insights_name_factor_and_tenure() {
        let advisory = generate_advisory(
            &results(LimitingFactor::Income, 10_000.0),
            &profile(60_000.0, 0.0),
        );

        assert_eq!(advisory.insights.len(), 2);
        assert!(advisory.insights[0].contains("income"));
        assert_eq!(advisory.insights[1], "Tenure considered: 20 years.");
        assert!(advisory.warnings.is_empty());
    }

    #[test]
    fn income_gap_is_suggested_with_separators() {
        let advisory = generate_advisory(
            &results(LimitingFactor::Income, 10_000.0),
            &profile(60_000.0, 0.0),
        );

        assert_eq!(advisory.suggestions.len(), 1);
        assert!(advisory.suggestions[0].contains("1,234,567"));
    }

    #[test]
    fn heavy_emi_triggers_warning_and_suggestion() {
        let advisory = generate_advisory(
            &results(LimitingFactor::Income, 45_000.0),
            &profile(60_000.0, 0.0),
        );

        assert!(advisory
            .warnings
            .iter()
            .any(|warning| warning.contains("75%")));
        assert!(advisory
            .suggestions
            .iter()
            .any(|suggestion| suggestion.contains("reducing the loan amount")));
    }

    #[test]
    fn moderate_emi_only_suggests() {
        let advisory = generate_advisory(
            &results(LimitingFactor::Ltv, 39_000.0),
            &profile(60_000.0, 0.0),
        );

        assert_eq!(advisory.warnings.len(), 1);
        assert!(advisory.warnings[0].contains("Property value"));
        assert_eq!(advisory.suggestions.len(), 1);
    }

    #[test]
    fn no_free_cash_counts_as_full_burden() {
        let advisory = generate_advisory(
            &results(LimitingFactor::Ltv, 0.0),
            &profile(20_000.0, 25_000.0),
        );

        assert!(advisory.warnings.iter().any(|warning| warning.contains("100%")));
    }

    #[test]
    fn tied_limits_offer_no_unlock_suggestion() {
        let mut tied = results(LimitingFactor::Income, 10_000.0);
        tied.ltv_based_limit = tied.income_based_limit;
        let mut nearly_tied = tied;
        nearly_tied.ltv_based_limit = tied.income_based_limit + 0.4;

        for figures in [tied, nearly_tied] {
            let advisory = generate_advisory(&figures, &profile(60_000.0, 0.0));

            assert!(advisory.suggestions.is_empty(), "{:?}", advisory.suggestions);
            assert!(advisory.insights[0].contains("income"));
        }
    }

    #[test]
    fn groups_thousands() {
        assert_eq!(group_thousands(0.0), "0");
        assert_eq!(group_thousands(999.0), "999");
        assert_eq!(group_thousands(1_000.0), "1,000");
        assert_eq!(group_thousands(12_345_678.0), "12,345,678");
    }
}
