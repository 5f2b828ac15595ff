use super::common::*;
use serde_json::json;

use crate::workflows::underwriting::validation::{InputValidator, Violation};

fn messages(violations: &[Violation]) -> Vec<&str> {
    violations
        .iter()
        .map(|violation| violation.message.as_str())
        .collect()
}

#[test]
fn accepts_complete_request_and_applies_defaults() {
    let input = InputValidator::default()
        .validate(&scenario_a())
        .expect("scenario validates");

    assert_eq!(input.financial_profile.down_payment_available, 0.0);
    assert_eq!(input.financial_profile.other_obligations, 5000.0);
    assert_eq!(input.system_derived.max_tenure_years, 30.0);
    assert_eq!(input.loan_preferences.desired_tenure_years, 30.0);
    assert_eq!(input.property_details.plot_price, 0.0);
    assert_eq!(input.property_details.floors, 2);
}

#[test]
fn desired_tenure_is_capped_by_retirement() {
    let request = with_field(scenario_a(), "financialProfile", "age", json!(45));
    let request = with_field(request, "loanPreferences", "desiredTenureYears", json!(25));

    let input = InputValidator::default()
        .validate(&request)
        .expect("request validates");

    assert_eq!(input.system_derived.max_tenure_years, 15.0);
    assert_eq!(input.loan_preferences.desired_tenure_years, 15.0);
}

#[test]
fn shorter_desired_tenure_is_kept() {
    let request = with_field(scenario_a(), "loanPreferences", "desiredTenureYears", json!(12.5));

    let input = InputValidator::default()
        .validate(&request)
        .expect("request validates");

    assert_eq!(input.loan_preferences.desired_tenure_years, 12.5);
}

#[test]
fn borrowers_past_retirement_get_zero_tenure() {
    let request = with_field(scenario_a(), "financialProfile", "age", json!(65));
    let request = with_field(request, "loanPreferences", "desiredTenureYears", json!(10));

    let input = InputValidator::default()
        .validate(&request)
        .expect("request validates");

    assert_eq!(input.system_derived.max_tenure_years, 0.0);
    assert_eq!(input.loan_preferences.desired_tenure_years, 0.0);
}

#[test]
fn plot_price_is_forced_to_zero_without_plot() {
    let request = with_field(scenario_a(), "propertyDetails", "plotPrice", json!(900000));

    let input = InputValidator::default()
        .validate(&request)
        .expect("request validates");

    assert!(!input.property_details.include_plot);
    assert_eq!(input.property_details.plot_price, 0.0);
}

#[test]
fn plot_price_is_required_with_plot() {
    let request = with_field(scenario_a(), "propertyDetails", "includePlot", json!(true));

    let err = InputValidator::default()
        .validate(&request)
        .expect_err("plot price missing");

    assert_eq!(err.violations.len(), 1);
    assert_eq!(
        err.violations[0].message,
        "\"propertyDetails.plotPrice\" is required"
    );
    assert_eq!(err.violations[0].path, vec!["propertyDetails", "plotPrice"]);
}

#[test]
fn collects_every_violation() {
    let request = with_field(scenario_a(), "financialProfile", "age", json!(17));
    let request = with_field(request, "financialProfile", "creditScore", json!(950));
    let request = with_field(request, "loanPreferences", "ltvRatio", json!(1.5));
    let request = without_field(request, "propertyDetails", "floors");

    let err = InputValidator::default()
        .validate(&request)
        .expect_err("request invalid");

    assert_eq!(
        messages(&err.violations),
        vec![
            "\"financialProfile.age\" must be greater than or equal to 18",
            "\"financialProfile.creditScore\" must be less than or equal to 900",
            "\"loanPreferences.ltvRatio\" must be less than or equal to 1",
            "\"propertyDetails.floors\" is required",
        ]
    );
}

#[test]
fn rejects_fractional_integers_and_non_numbers() {
    let request = with_field(scenario_a(), "financialProfile", "age", json!(30.5));
    let request = with_field(request, "financialProfile", "monthlyIncome", json!("lots"));
    let request = with_field(request, "propertyDetails", "includePlot", json!("maybe"));

    let err = InputValidator::default()
        .validate(&request)
        .expect_err("request invalid");

    assert_eq!(
        messages(&err.violations),
        vec![
            "\"financialProfile.monthlyIncome\" must be a number",
            "\"financialProfile.age\" must be an integer",
            "\"propertyDetails.includePlot\" must be a boolean",
        ]
    );
}

#[test]
fn coerces_numeric_strings_and_boolean_strings() {
    let request = with_field(scenario_a(), "financialProfile", "creditScore", json!("810"));
    let request = with_field(request, "propertyDetails", "includePlot", json!("TRUE"));
    let request = with_field(request, "propertyDetails", "plotPrice", json!(" 250000 "));

    let input = InputValidator::default()
        .validate(&request)
        .expect("request validates");

    assert_eq!(input.financial_profile.credit_score, 810);
    assert!(input.property_details.include_plot);
    assert_eq!(input.property_details.plot_price, 250_000.0);
}

#[test]
fn ignores_unknown_fields() {
    let mut request = with_field(scenario_a(), "financialProfile", "nickname", json!("sam"));
    request["trackingId"] = json!("abc-123");

    assert!(InputValidator::default().validate(&request).is_ok());
}

#[test]
fn missing_sections_are_reported_once_each() {
    let err = InputValidator::default()
        .validate(&json!({ "loanPreferences": [] }))
        .expect_err("sections missing");

    assert_eq!(
        messages(&err.violations),
        vec![
            "\"financialProfile\" is required",
            "\"loanPreferences\" must be of type object",
            "\"propertyDetails\" is required",
        ]
    );
}

#[test]
fn rejects_non_object_root() {
    let err = InputValidator::default()
        .validate(&json!("loan please"))
        .expect_err("root must be an object");

    assert_eq!(err.violations.len(), 1);
    assert_eq!(err.violations[0].message, "\"value\" must be of type object");
    assert!(err.violations[0].path.is_empty());
}

#[test]
fn bounds_are_inclusive() {
    let request = with_field(
        scenario_a(),
        "financialProfile",
        "employmentStabilityScore",
        json!(1),
    );
    let request = with_field(request, "financialProfile", "creditScore", json!(300));
    let request = with_field(request, "loanPreferences", "desiredTenureYears", json!(40));
    let request = with_field(request, "loanPreferences", "baseInterestRate", json!(30));

    assert!(InputValidator::default().validate(&request).is_ok());
}

#[test]
fn floors_have_no_upper_bound_below_safe_integers() {
    let request = with_field(scenario_a(), "propertyDetails", "floors", json!(5_000_000_000u64));

    let input = InputValidator::default()
        .validate(&request)
        .expect("large floor count validates");

    assert_eq!(input.property_details.floors, 5_000_000_000);
}

#[test]
fn integers_beyond_safe_range_are_rejected() {
    let request = with_field(scenario_a(), "propertyDetails", "floors", json!(1e16));

    let err = InputValidator::default()
        .validate(&request)
        .expect_err("unsafe integer rejected");

    assert_eq!(
        messages(&err.violations),
        vec!["\"propertyDetails.floors\" must be a safe number"]
    );
}
