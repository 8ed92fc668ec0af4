use std::time::Instant;

use crate::error::GateError;
use crate::metrics::MetricsSnapshot;

use super::decision::{GateOutcome, GatekeeperResult};
use super::gate::GateDefinition;
use super::policy::{self, PolicyThresholds};
use super::registry::{GateRegistry, GateSource};
use super::reporter::EvalReporter;
use super::risk;

/// Evaluate one gate. Never panics and never passes a known gate on error:
/// comparator errors turn into a failed outcome carrying the diagnostic.
pub fn evaluate_gate(gate: &GateDefinition, metrics: &MetricsSnapshot) -> GateOutcome {
    try_evaluate_gate(gate, metrics).unwrap_or_else(|e| errored_outcome(gate, &e))
}

fn try_evaluate_gate(
    gate: &GateDefinition,
    metrics: &MetricsSnapshot,
) -> Result<GateOutcome, GateError> {
    let check = gate
        .kind()
        .check(&gate.name, gate.threshold.as_ref(), metrics)?;
    Ok(GateOutcome {
        gate_name: gate.name.clone(),
        required: gate.required,
        passed: check.passed,
        message: check.message,
    })
}

fn errored_outcome(gate: &GateDefinition, e: &GateError) -> GateOutcome {
    GateOutcome {
        gate_name: gate.name.clone(),
        required: gate.required,
        passed: false,
        message: Some(format!("Gate evaluation error: {e}")),
    }
}

pub struct Gatekeeper {
    registry: GateRegistry,
    thresholds: PolicyThresholds,
}

impl Gatekeeper {
    pub fn new(registry: GateRegistry) -> Self {
        Self {
            registry,
            thresholds: PolicyThresholds::default(),
        }
    }

    pub fn from_source(source: &dyn GateSource, reporter: &dyn EvalReporter) -> Self {
        let registry = source.load(reporter);
        reporter.debug(&format!(
            "gate source '{}' provided {} gates",
            source.name(),
            registry.len()
        ));
        Self::new(registry)
    }

    /// Score the snapshot, run every gate in registry order and apply the
    /// decision policy. Always yields a result; problems end up in `warnings`.
    pub fn evaluate(
        &self,
        metrics: &MetricsSnapshot,
        reporter: &dyn EvalReporter,
    ) -> GatekeeperResult {
        let start = Instant::now();

        let risk_score = risk::score(metrics);
        reporter.debug(&format!("risk_score={risk_score:.3}"));

        let mut passed_gates = Vec::new();
        let mut failed_gates = Vec::new();
        let mut warnings = Vec::new();
        let mut outcomes = Vec::with_capacity(self.registry.len());

        for gate in &self.registry {
            let outcome = match try_evaluate_gate(gate, metrics) {
                Ok(o) => o,
                Err(e) => {
                    reporter.error(&format!("Gate evaluation failed for '{}': {e}", gate.name));
                    errored_outcome(gate, &e)
                }
            };

            reporter.debug(&format!(
                "gate {}: passed={}, required={}",
                outcome.gate_name, outcome.passed, outcome.required
            ));

            if outcome.passed {
                passed_gates.push(outcome.gate_name.clone());
            } else {
                failed_gates.push(outcome.gate_name.clone());
                if outcome.required {
                    warnings.push(format!("Required gate '{}' failed", outcome.gate_name));
                }
            }

            if let Some(msg) = &outcome.message {
                warnings.push(msg.clone());
            }

            outcomes.push(outcome);
        }

        let required_failed = policy::required_failures(&outcomes);
        if !required_failed.is_empty() {
            reporter.info(&format!("Required gates failed: {required_failed:?}"));
        }

        let decision = policy::decide(risk_score, &outcomes, &self.thresholds);

        GatekeeperResult {
            decision,
            risk_score,
            passed_gates,
            failed_gates,
            warnings,
            outcomes,
            metrics: metrics.clone(),
            execution_time_s: start.elapsed().as_secs_f64(),
        }
    }
}

impl Default for Gatekeeper {
    fn default() -> Self {
        Self::new(GateRegistry::defaults())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gatekeeper::decision::Decision;
    use crate::gatekeeper::gate::GateThreshold;
    use crate::gatekeeper::registry::default_gates;
    use crate::gatekeeper::reporter::{RecordingReporter, ReportLevel};
    use pretty_assertions::assert_eq;

    fn healthy() -> MetricsSnapshot {
        MetricsSnapshot {
            delta_loc: 0.05,
            novelty: 0.05,
            ext_dep_delta: 0.0,
            mutation: 0.85,
            flakiness: 0.0,
            static_severity: 0.0,
            test_coverage: 0.8,
            devirt_success_rate: 0.7,
            contract_pass_rate: 1.0,
            build_success: true,
            parse_time_ms: 0.0,
            lift_time_ms: 0.0,
            memory_usage_mb: 0.0,
        }
    }

    #[test]
    fn malformed_threshold_fails_the_gate() {
        let gate = GateDefinition::new("mutation_testing", "", true, GateThreshold::Flag(true), 0.3);
        let outcome = evaluate_gate(&gate, &healthy());
        assert!(!outcome.passed);
        assert!(outcome
            .message
            .unwrap()
            .starts_with("Gate evaluation error: gate 'mutation_testing' expects a ratio"));
    }

    #[test]
    fn passing_known_gate_has_no_message() {
        let outcome = evaluate_gate(&default_gates()[0], &healthy());
        assert_eq!(
            outcome,
            GateOutcome {
                gate_name: "mutation_testing".into(),
                required: true,
                passed: true,
                message: None,
            }
        );
    }

    #[test]
    fn evaluation_error_is_isolated_and_reported() {
        let mut gates = default_gates();
        gates[1].threshold = None;
        let gk = Gatekeeper::new(GateRegistry::new(gates).unwrap());
        let rec = RecordingReporter::new();

        let result = gk.evaluate(&healthy(), &rec);

        assert_eq!(result.failed_gates, vec!["sast_security".to_string()]);
        assert_eq!(result.passed_gates.len(), 4);
        assert_eq!(result.decision, Decision::Refine);
        assert_eq!(rec.messages_at(ReportLevel::Error).len(), 1);
        assert_eq!(
            rec.messages_at(ReportLevel::Info),
            vec![r#"Required gates failed: ["sast_security"]"#.to_string()]
        );
    }

    #[test]
    fn required_failure_warnings_precede_gate_message() {
        let mut m = healthy();
        m.devirt_success_rate = 0.5;
        let result = Gatekeeper::default().evaluate(&m, &RecordingReporter::new());

        assert_eq!(
            result.warnings,
            vec![
                "Required gate 'devirtualization_rate' failed".to_string(),
                "Devirtualization rate 0.500 below threshold 0.6".to_string(),
            ]
        );
    }

    #[test]
    fn optional_failure_does_not_force_refine() {
        let mut gates = default_gates();
        gates[3].required = false;
        let gk = Gatekeeper::new(GateRegistry::new(gates).unwrap());
        let mut m = healthy();
        m.devirt_success_rate = 0.1;

        let result = gk.evaluate(&m, &RecordingReporter::new());

        assert_eq!(result.decision, Decision::Promote);
        assert_eq!(result.failed_gates, vec!["devirtualization_rate".to_string()]);
        assert_eq!(
            result.warnings,
            vec!["Devirtualization rate 0.100 below threshold 0.6".to_string()]
        );
    }

    #[test]
    fn result_retains_metrics_and_outcome_order() {
        let m = healthy();
        let result = Gatekeeper::default().evaluate(&m, &RecordingReporter::new());
        assert_eq!(result.metrics, m);
        let order: Vec<&str> = result.outcomes.iter().map(|o| o.gate_name.as_str()).collect();
        assert_eq!(
            order,
            vec![
                "mutation_testing",
                "sast_security",
                "contract_validation",
                "devirtualization_rate",
                "build_success"
            ]
        );
        assert!(result.execution_time_s >= 0.0);
    }
}
