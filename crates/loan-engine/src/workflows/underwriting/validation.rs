use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::domain::{
    FinancialProfile, LoanPreferences, NormalizedInput, PropertyDetails, SystemDerived,
};
use super::policy::UnderwritingPolicy;

const FINANCIAL_PROFILE: &str = "financialProfile";
const LOAN_PREFERENCES: &str = "loanPreferences";
const PROPERTY_DETAILS: &str = "propertyDetails";

/// Largest integer held exactly by an `f64` (2^53 - 1).
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Single field-level problem found in a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub message: String,
    pub path: Vec<String>,
}

impl Violation {
    fn at(path: &[&str], text: &str) -> Self {
        let label = if path.is_empty() {
            "value".to_string()
        } else {
            path.join(".")
        };

        Self {
            message: format!("\"{label}\" {text}"),
            path: path.iter().map(|segment| segment.to_string()).collect(),
        }
    }
}

/// Every violation found in a request; never partial.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("request failed validation with {} violation(s)", .violations.len())]
pub struct ValidationError {
    pub violations: Vec<Violation>,
}

impl ValidationError {
    pub(crate) fn malformed_body(detail: &str) -> Self {
        Self {
            violations: vec![Violation {
                message: format!("request body is not valid JSON: {detail}"),
                path: Vec::new(),
            }],
        }
    }
}

/// Numeric constraints applied to one field.
#[derive(Debug, Clone, Copy)]
struct NumberRule {
    min: Option<f64>,
    max: Option<f64>,
    integer: bool,
}

impl NumberRule {
    const fn non_negative() -> Self {
        Self::at_least(0.0)
    }

    const fn at_least(min: f64) -> Self {
        Self {
            min: Some(min),
            max: None,
            integer: false,
        }
    }

    const fn between(min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
            integer: false,
        }
    }

    const fn whole(self) -> Self {
        Self {
            integer: true,
            ..self
        }
    }
}

enum Field<T> {
    Absent,
    Invalid,
    Present(T),
}

impl<T> Field<T> {
    fn or_default(self, default: T) -> Option<T> {
        match self {
            Field::Absent => Some(default),
            Field::Invalid => None,
            Field::Present(value) => Some(value),
        }
    }

    fn map<U>(self, convert: impl FnOnce(T) -> U) -> Field<U> {
        match self {
            Field::Absent => Field::Absent,
            Field::Invalid => Field::Invalid,
            Field::Present(value) => Field::Present(convert(value)),
        }
    }

    fn optional(self) -> Option<Option<T>> {
        match self {
            Field::Absent => Some(None),
            Field::Invalid => None,
            Field::Present(value) => Some(Some(value)),
        }
    }
}

struct PreferencesInput {
    desired_tenure_years: Option<f64>,
    loan_amount_requested: f64,
    base_interest_rate: f64,
    ltv_ratio: f64,
}

/// Gatekeeper turning an untyped request into a [`NormalizedInput`].
///
/// All violations are collected before returning; unknown keys are ignored.
#[derive(Debug, Clone, Default)]
pub struct InputValidator {
    policy: UnderwritingPolicy,
}

impl InputValidator {
    pub fn new(policy: UnderwritingPolicy) -> Self {
        Self { policy }
    }

    pub fn validate(&self, raw: &Value) -> Result<NormalizedInput, ValidationError> {
        let Some(root) = raw.as_object() else {
            return Err(ValidationError {
                violations: vec![Violation::at(&[], "must be of type object")],
            });
        };

        let mut collector = Collector::default();
        let financial = collector.financial_profile(root);
        let preferences = collector.loan_preferences(root);
        let property = collector.property_details(root);

        match (financial, preferences, property) {
            (Some(financial), Some(preferences), Some(property))
                if collector.violations.is_empty() =>
            {
                Ok(self.normalize(financial, preferences, property))
            }
            _ => Err(ValidationError {
                violations: collector.violations,
            }),
        }
    }

    fn normalize(
        &self,
        financial_profile: FinancialProfile,
        preferences: PreferencesInput,
        property_details: PropertyDetails,
    ) -> NormalizedInput {
        let max_tenure_years = self.policy.max_tenure_for_age(financial_profile.age);
        let desired_tenure_years = match preferences.desired_tenure_years {
            Some(desired) => desired.min(max_tenure_years),
            None => max_tenure_years,
        };

        NormalizedInput {
            financial_profile,
            loan_preferences: LoanPreferences {
                desired_tenure_years,
                loan_amount_requested: preferences.loan_amount_requested,
                base_interest_rate: preferences.base_interest_rate,
                ltv_ratio: preferences.ltv_ratio,
            },
            property_details,
            system_derived: SystemDerived { max_tenure_years },
        }
    }
}

#[derive(Default)]
struct Collector {
    violations: Vec<Violation>,
}

impl Collector {
    fn reject(&mut self, path: &[&str], text: &str) {
        self.violations.push(Violation::at(path, text));
    }

    fn required<T>(&mut self, field: Field<T>, path: &[&str]) -> Option<T> {
        match field {
            Field::Absent => {
                self.reject(path, "is required");
                None
            }
            Field::Invalid => None,
            Field::Present(value) => Some(value),
        }
    }

    fn section<'a>(
        &mut self,
        root: &'a Map<String, Value>,
        name: &'static str,
    ) -> Option<&'a Map<String, Value>> {
        match root.get(name) {
            None => {
                self.reject(&[name], "is required");
                None
            }
            Some(Value::Object(fields)) => Some(fields),
            Some(_) => {
                self.reject(&[name], "must be of type object");
                None
            }
        }
    }

    fn number(
        &mut self,
        fields: &Map<String, Value>,
        path: &[&str; 2],
        rule: NumberRule,
    ) -> Field<f64> {
        let Some(raw) = fields.get(path[1]) else {
            return Field::Absent;
        };

        let Some(value) = coerce_number(raw) else {
            self.reject(path, "must be a number");
            return Field::Invalid;
        };

        let mut valid = true;
        if rule.integer && value.fract() != 0.0 {
            self.reject(path, "must be an integer");
            valid = false;
        }
        if let Some(min) = rule.min {
            if value < min {
                self.reject(path, &format!("must be greater than or equal to {min}"));
                valid = false;
            }
        }
        if let Some(max) = rule.max {
            if value > max {
                self.reject(path, &format!("must be less than or equal to {max}"));
                valid = false;
            }
        }
        if rule.integer && value > MAX_SAFE_INTEGER {
            self.reject(path, "must be a safe number");
            valid = false;
        }

        if valid {
            Field::Present(value)
        } else {
            Field::Invalid
        }
    }

    fn whole_number(
        &mut self,
        fields: &Map<String, Value>,
        path: &[&str; 2],
        rule: NumberRule,
    ) -> Field<u64> {
        self.number(fields, path, rule.whole()).map(|value| value as u64)
    }

    /// Whole number whose rule caps it well inside `u32`.
    fn bounded_whole_number(
        &mut self,
        fields: &Map<String, Value>,
        path: &[&str; 2],
        rule: NumberRule,
    ) -> Field<u32> {
        self.whole_number(fields, path, rule).map(|value| value as u32)
    }

    fn boolean(&mut self, fields: &Map<String, Value>, path: &[&str; 2]) -> Field<bool> {
        let Some(raw) = fields.get(path[1]) else {
            return Field::Absent;
        };

        match coerce_bool(raw) {
            Some(value) => Field::Present(value),
            None => {
                self.reject(path, "must be a boolean");
                Field::Invalid
            }
        }
    }

    fn financial_profile(&mut self, root: &Map<String, Value>) -> Option<FinancialProfile> {
        let fields = self.section(root, FINANCIAL_PROFILE)?;
        let path = |key: &'static str| [FINANCIAL_PROFILE, key];

        let monthly_income = {
            let path = path("monthlyIncome");
            let field = self.number(fields, &path, NumberRule::non_negative());
            self.required(field, &path)
        };
        let other_obligations = self
            .number(fields, &path("otherObligations"), NumberRule::non_negative())
            .or_default(0.0);
        let age = {
            let path = path("age");
            let field =
                self.bounded_whole_number(fields, &path, NumberRule::between(18.0, 70.0));
            self.required(field, &path)
        };
        let credit_score = {
            let path = path("creditScore");
            let field =
                self.bounded_whole_number(fields, &path, NumberRule::between(300.0, 900.0));
            self.required(field, &path)
        };
        let employment_stability_score = {
            let path = path("employmentStabilityScore");
            let field = self.number(fields, &path, NumberRule::between(0.0, 1.0));
            self.required(field, &path)
        };
        let down_payment_available = self
            .number(
                fields,
                &path("downPaymentAvailable"),
                NumberRule::non_negative(),
            )
            .or_default(0.0);

        Some(FinancialProfile {
            monthly_income: monthly_income?,
            other_obligations: other_obligations?,
            age: age?,
            credit_score: credit_score?,
            employment_stability_score: employment_stability_score?,
            down_payment_available: down_payment_available?,
        })
    }

    fn loan_preferences(&mut self, root: &Map<String, Value>) -> Option<PreferencesInput> {
        let fields = self.section(root, LOAN_PREFERENCES)?;
        let path = |key: &'static str| [LOAN_PREFERENCES, key];

        let desired_tenure_years = self
            .number(
                fields,
                &path("desiredTenureYears"),
                NumberRule::between(1.0, 40.0),
            )
            .optional();
        let loan_amount_requested = {
            let path = path("loanAmountRequested");
            let field = self.number(fields, &path, NumberRule::non_negative());
            self.required(field, &path)
        };
        let base_interest_rate = {
            let path = path("baseInterestRate");
            let field = self.number(fields, &path, NumberRule::between(0.0, 30.0));
            self.required(field, &path)
        };
        let ltv_ratio = {
            let path = path("ltvRatio");
            let field = self.number(fields, &path, NumberRule::between(0.0, 1.0));
            self.required(field, &path)
        };

        Some(PreferencesInput {
            desired_tenure_years: desired_tenure_years?,
            loan_amount_requested: loan_amount_requested?,
            base_interest_rate: base_interest_rate?,
            ltv_ratio: ltv_ratio?,
        })
    }

    fn property_details(&mut self, root: &Map<String, Value>) -> Option<PropertyDetails> {
        let fields = self.section(root, PROPERTY_DETAILS)?;
        let path = |key: &'static str| [PROPERTY_DETAILS, key];

        let include_plot = {
            let path = path("includePlot");
            let field = self.boolean(fields, &path);
            self.required(field, &path)
        };
        let plot_price = {
            let path = path("plotPrice");
            let field = self.number(fields, &path, NumberRule::non_negative());
            if include_plot == Some(true) {
                self.required(field, &path)
            } else {
                field.or_default(0.0)
            }
        };
        let plot_size_sqft = {
            let path = path("plotSizeSqft");
            let field = self.number(fields, &path, NumberRule::non_negative());
            self.required(field, &path)
        };
        let floors = {
            let path = path("floors");
            let field = self.whole_number(fields, &path, NumberRule::at_least(1.0));
            self.required(field, &path)
        };
        let base_cost_per_sqft = {
            let path = path("baseCostPerSqft");
            let field = self.number(fields, &path, NumberRule::non_negative());
            self.required(field, &path)
        };
        let luxury_level = {
            let path = path("luxuryLevel");
            let field = self.number(fields, &path, NumberRule::between(0.0, 1.0));
            self.required(field, &path)
        };
        let location_score = {
            let path = path("locationScore");
            let field = self.number(fields, &path, NumberRule::between(0.0, 1.0));
            self.required(field, &path)
        };

        let include_plot = include_plot?;
        Some(PropertyDetails {
            include_plot,
            plot_price: if include_plot { plot_price? } else { 0.0 },
            plot_size_sqft: plot_size_sqft?,
            floors: floors?,
            base_cost_per_sqft: base_cost_per_sqft?,
            luxury_level: luxury_level?,
            location_score: location_score?,
        })
    }
}

fn coerce_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|number| number.is_finite())
}

fn coerce_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(flag) => Some(*flag),
        Value::String(text) if text.eq_ignore_ascii_case("true") => Some(true),
        Value::String(text) if text.eq_ignore_ascii_case("false") => Some(false),
        _ => None,
    }
}
