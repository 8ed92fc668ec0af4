use serde::{Deserialize, Serialize};

use super::decision::{Decision, GateOutcome};

pub const T_PROP: f64 = 0.70;
pub const T_MANUAL: f64 = 0.50;

/// Risk cut-offs of the decision policy.
///
/// Note that `t_prop` is the score at or above which a change goes back to
/// refinement; it is not a promotion bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolicyThresholds {
    pub t_prop: f64,
    pub t_manual: f64,
}

impl Default for PolicyThresholds {
    fn default() -> Self {
        Self {
            t_prop: T_PROP,
            t_manual: T_MANUAL,
        }
    }
}

/// Names of required gates that did not pass, in outcome order.
pub fn required_failures(outcomes: &[GateOutcome]) -> Vec<&str> {
    outcomes
        .iter()
        .filter(|o| o.required && !o.passed)
        .map(|o| o.gate_name.as_str())
        .collect()
}

/// Combine the risk score and gate outcomes into a verdict.
///
/// A failed required gate forces `Refine` before the score is looked at.
pub fn decide(risk_score: f64, outcomes: &[GateOutcome], th: &PolicyThresholds) -> Decision {
    if !required_failures(outcomes).is_empty() {
        return Decision::Refine;
    }

    if risk_score >= th.t_prop {
        Decision::Refine
    } else if risk_score >= th.t_manual {
        Decision::ManualQA
    } else {
        Decision::Promote
    }
}
