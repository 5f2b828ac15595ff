use std::collections::HashMap;
use std::io::Read;

use serde::Serialize;
use serde_json::{Map, Value};

use super::pipeline::{DiagnosticSink, EvaluationResponse, UnderwritingPipeline};

/// CSV column -> (request section, request key).
const COLUMNS: &[(&str, &str, &str)] = &[
    ("monthly_income", "financialProfile", "monthlyIncome"),
    ("other_obligations", "financialProfile", "otherObligations"),
    ("age", "financialProfile", "age"),
    ("credit_score", "financialProfile", "creditScore"),
    (
        "employment_stability_score",
        "financialProfile",
        "employmentStabilityScore",
    ),
    (
        "down_payment_available",
        "financialProfile",
        "downPaymentAvailable",
    ),
    ("desired_tenure_years", "loanPreferences", "desiredTenureYears"),
    ("loan_amount_requested", "loanPreferences", "loanAmountRequested"),
    ("base_interest_rate", "loanPreferences", "baseInterestRate"),
    ("ltv_ratio", "loanPreferences", "ltvRatio"),
    ("include_plot", "propertyDetails", "includePlot"),
    ("plot_price", "propertyDetails", "plotPrice"),
    ("plot_size_sqft", "propertyDetails", "plotSizeSqft"),
    ("floors", "propertyDetails", "floors"),
    ("base_cost_per_sqft", "propertyDetails", "baseCostPerSqft"),
    ("luxury_level", "propertyDetails", "luxuryLevel"),
    ("location_score", "propertyDetails", "locationScore"),
];

/// Outcome for one CSV row; `row` is 1-based and excludes the header.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchOutcome {
    pub row: usize,
    pub response: EvaluationResponse,
}

/// Read flat applicant rows into nested loan requests.
///
/// Cells are passed through as strings and left to the validator; empty
/// cells are treated as absent so defaults apply.
pub fn parse_batch_requests<R: Read>(reader: R) -> Result<Vec<Value>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut requests = Vec::new();

    for record in csv_reader.deserialize::<HashMap<String, String>>() {
        let row = record?;
        requests.push(request_from_row(&row));
    }

    Ok(requests)
}

pub fn evaluate_batch<R, D>(
    pipeline: &UnderwritingPipeline<D>,
    reader: R,
) -> Result<Vec<BatchOutcome>, csv::Error>
where
    R: Read,
    D: DiagnosticSink + 'static,
{
    let requests = parse_batch_requests(reader)?;
    Ok(requests
        .iter()
        .enumerate()
        .map(|(index, request)| BatchOutcome {
            row: index + 1,
            response: pipeline.evaluate(request),
        })
        .collect())
}

fn request_from_row(row: &HashMap<String, String>) -> Value {
    let mut sections: Map<String, Value> = Map::new();
    for section in ["financialProfile", "loanPreferences", "propertyDetails"] {
        sections.insert(section.to_string(), Value::Object(Map::new()));
    }

    for (column, section, key) in COLUMNS {
        let Some(cell) = row.get(*column).filter(|cell| !cell.is_empty()) else {
            continue;
        };
        if let Some(Value::Object(fields)) = sections.get_mut(*section) {
            fields.insert(key.to_string(), Value::String(cell.clone()));
        }
    }

    Value::Object(sections)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "monthly_income,other_obligations,age,credit_score,employment_stability_score,desired_tenure_years,loan_amount_requested,base_interest_rate,ltv_ratio,include_plot,plot_price,plot_size_sqft,floors,base_cost_per_sqft,luxury_level,location_score";

    #[test]
    fn rows_become_nested_requests() {
        let csv = format!(
            "{HEADER}\n60000,5000,30,780,0.8,,2000000,9,0.8,false,,1200,2,1500,0.3,0.5\n"
        );

        let requests = parse_batch_requests(csv.as_bytes()).expect("csv parses");

        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request["financialProfile"]["creditScore"], "780");
        assert_eq!(request["propertyDetails"]["includePlot"], "false");
        assert!(request["loanPreferences"].get("desiredTenureYears").is_none());
        assert!(request["propertyDetails"].get("plotPrice").is_none());
    }

    #[test]
    fn batch_reports_each_row() {
        let csv = format!(
            "{HEADER}\n60000,5000,30,780,0.8,,2000000,9,0.8,false,,1200,2,1500,0.3,0.5\n60000,5000,30,999,0.8,,2000000,9,0.8,false,,1200,2,1500,0.3,0.5\n"
        );
        let pipeline = UnderwritingPipeline::default();

        let outcomes = evaluate_batch(&pipeline, csv.as_bytes()).expect("batch runs");

        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].row, 1);
        assert!(outcomes[0].response.success);
        assert!(!outcomes[1].response.success);
    }
}
