use std::sync::{Arc, Mutex};

use serde_json::{json, Value};

use crate::workflows::underwriting::pipeline::{
    DiagnosticSink, ErrorKind, Stage, UnderwritingPipeline,
};
use crate::workflows::underwriting::policy::UnderwritingPolicy;

/// Salaried borrower building on land they already own.
pub(super) fn scenario_a() -> Value {
    json!({
        "financialProfile": {
            "monthlyIncome": 60000,
            "otherObligations": 5000,
            "age": 30,
            "creditScore": 780,
            "employmentStabilityScore": 0.8
        },
        "loanPreferences": {
            "loanAmountRequested": 2000000,
            "baseInterestRate": 9,
            "ltvRatio": 0.8
        },
        "propertyDetails": {
            "includePlot": false,
            "plotSizeSqft": 1200,
            "floors": 2,
            "baseCostPerSqft": 1500,
            "luxuryLevel": 0.3,
            "locationScore": 0.5
        }
    })
}

pub(super) fn with_field(mut request: Value, section: &str, key: &str, value: Value) -> Value {
    request[section][key] = value;
    request
}

pub(super) fn without_field(mut request: Value, section: &str, key: &str) -> Value {
    if let Some(fields) = request[section].as_object_mut() {
        fields.remove(key);
    }
    request
}

#[derive(Default)]
pub(super) struct RecordingSink {
    stages: Mutex<Vec<Stage>>,
    failures: Mutex<Vec<(ErrorKind, String)>>,
}

impl RecordingSink {
    pub(super) fn stages(&self) -> Vec<Stage> {
        self.stages.lock().expect("stage mutex poisoned").clone()
    }

    pub(super) fn failures(&self) -> Vec<(ErrorKind, String)> {
        self.failures.lock().expect("failure mutex poisoned").clone()
    }
}

impl DiagnosticSink for RecordingSink {
    fn stage_completed(&self, stage: Stage) {
        self.stages.lock().expect("stage mutex poisoned").push(stage);
    }

    fn internal_failure(&self, kind: ErrorKind, message: &str) {
        self.failures
            .lock()
            .expect("failure mutex poisoned")
            .push((kind, message.to_string()));
    }
}

pub(super) fn recording_pipeline() -> (UnderwritingPipeline<RecordingSink>, Arc<RecordingSink>) {
    let sink = Arc::new(RecordingSink::default());
    let pipeline =
        UnderwritingPipeline::with_diagnostics(UnderwritingPolicy::default(), sink.clone());
    (pipeline, sink)
}
