use super::domain::{ApprovalDecision, EligibilityResult};

/// Figures the approval resolver classifies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApprovalInputs {
    pub requested_loan: f64,
    pub eligible_loan: f64,
    pub emi: f64,
    pub available_surplus: f64,
}

impl ApprovalInputs {
    pub fn from_eligibility(requested_loan: f64, eligibility: &EligibilityResult) -> Self {
        Self {
            requested_loan,
            eligible_loan: eligibility.eligible_loan,
            emi: eligibility.emi,
            available_surplus: eligibility.available_surplus,
        }
    }
}

/// Classify a request against the resolved eligibility.
///
/// The surplus check uses the EMI at the eligible amount, not at the
/// requested amount.
pub fn resolve_approval(inputs: ApprovalInputs) -> ApprovalDecision {
    if inputs.eligible_loan <= 0.0 {
        return ApprovalDecision::Rejected;
    }

    if inputs.requested_loan <= inputs.eligible_loan && inputs.emi <= inputs.available_surplus {
        ApprovalDecision::Approved
    } else {
        ApprovalDecision::Modified {
            approved_loan: inputs.eligible_loan,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(requested_loan: f64, eligible_loan: f64, emi: f64) -> ApprovalInputs {
        ApprovalInputs {
            requested_loan,
            eligible_loan,
            emi,
            available_surplus: 25_000.0,
        }
    }

    #[test]
    fn nothing_eligible_is_rejected() {
        assert_eq!(resolve_approval(inputs(1.0, 0.0, 0.0)), ApprovalDecision::Rejected);
        assert_eq!(resolve_approval(inputs(0.0, -5.0, 0.0)), ApprovalDecision::Rejected);
    }

    #[test]
    fn request_within_limits_is_approved() {
        assert_eq!(
            resolve_approval(inputs(2_000_000.0, 2_000_000.0, 25_000.0)),
            ApprovalDecision::Approved
        );
    }

    #[test]
    fn oversized_request_is_modified() {
        assert_eq!(
            resolve_approval(inputs(5_000_000.0, 2_000_000.0, 18_000.0)),
            ApprovalDecision::Modified {
                approved_loan: 2_000_000.0
            }
        );
    }

    #[test]
    fn emi_above_surplus_is_modified_even_for_small_request() {
        assert_eq!(
            resolve_approval(inputs(100_000.0, 2_000_000.0, 25_000.5)),
            ApprovalDecision::Modified {
                approved_loan: 2_000_000.0
            }
        );
    }
}
