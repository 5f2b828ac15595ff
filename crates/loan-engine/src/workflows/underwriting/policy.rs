use serde::{Deserialize, Serialize};

pub const DEFAULT_MIN_CREDIT_SCORE: u32 = 650;
pub const DEFAULT_RETIREMENT_AGE: u32 = 60;
pub const DEFAULT_MAX_TENURE_YEARS: f64 = 30.0;
pub const DEFAULT_RATE_FLOOR_PCT: f64 = 5.0;

pub const CREDIT_REJECTION_REASON: &str = "Credit score below minimum threshold";

/// Lending policy dials shared by the validator and the profile interpreter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnderwritingPolicy {
    pub min_credit_score: u32,
    pub retirement_age: u32,
    pub max_tenure_years: f64,
    pub rate_floor_pct: f64,
}

impl UnderwritingPolicy {
    /// Years left before retirement, capped at the maximum tenure.
    pub fn max_tenure_for_age(&self, age: u32) -> f64 {
        let remaining = self.retirement_age as f64 - age as f64;
        remaining.max(0.0).min(self.max_tenure_years)
    }
}

impl Default for UnderwritingPolicy {
    fn default() -> Self {
        Self {
            min_credit_score: DEFAULT_MIN_CREDIT_SCORE,
            retirement_age: DEFAULT_RETIREMENT_AGE,
            max_tenure_years: DEFAULT_MAX_TENURE_YEARS,
            rate_floor_pct: DEFAULT_RATE_FLOOR_PCT,
        }
    }
}
