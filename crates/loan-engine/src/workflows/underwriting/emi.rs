//! Amortization helpers shared by the eligibility resolver.
//!
//! The operation order below is fixed; algebraically equivalent forms drift
//! in the last bits and change rounded figures.

/// Monthly rate from an annual percentage.
pub fn monthly_rate(annual_rate_pct: f64) -> f64 {
    (annual_rate_pct / 100.0) / 12.0
}

/// Number of monthly installments for a tenure in years.
pub fn installment_count(tenure_years: f64) -> f64 {
    round_half_up(tenure_years * 12.0)
}

/// Rounds to the nearest integer with halves going toward positive infinity.
pub fn round_half_up(value: f64) -> f64 {
    let floor = value.floor();
    if value - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}

pub fn compute_emi(principal: f64, annual_rate_pct: f64, tenure_years: f64) -> f64 {
    if principal <= 0.0 {
        return 0.0;
    }

    let r = monthly_rate(annual_rate_pct);
    let n = installment_count(tenure_years);
    if r == 0.0 || n == 0.0 {
        return principal / n.max(1.0);
    }

    principal * r * (1.0 + r).powf(n) / ((1.0 + r).powf(n) - 1.0)
}

pub fn compute_principal_from_emi(max_emi: f64, annual_rate_pct: f64, tenure_years: f64) -> f64 {
    let r = monthly_rate(annual_rate_pct);
    let n = installment_count(tenure_years);
    if r == 0.0 || n == 0.0 {
        return max_emi * n;
    }

    max_emi * ((1.0 + r).powf(n) - 1.0) / (r * (1.0 + r).powf(n))
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RepaymentTotals {
    pub total_repayment: f64,
    pub total_interest: f64,
}

pub fn compute_totals(principal: f64, emi: f64, tenure_years: f64) -> RepaymentTotals {
    let total_repayment = emi * installment_count(tenure_years);
    RepaymentTotals {
        total_repayment,
        total_interest: total_repayment - principal,
    }
}
