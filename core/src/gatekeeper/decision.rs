use std::fmt;

use serde::{Deserialize, Serialize};

use crate::metrics::MetricsSnapshot;

/// Terminal verdict of one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Decision {
    #[serde(rename = "PROMOTE")]
    Promote,
    #[serde(rename = "MANUAL_QA")]
    ManualQA,
    #[serde(rename = "AGENT_REFINE")]
    Refine,
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Promote => "PROMOTE",
            Decision::ManualQA => "MANUAL_QA",
            Decision::Refine => "AGENT_REFINE",
        }
    }

    /// Process exit code for this verdict (0, 1 or 2).
    pub fn exit_code(&self) -> i32 {
        match self {
            Decision::Promote => 0,
            Decision::ManualQA => 1,
            Decision::Refine => 2,
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateOutcome {
    pub gate_name: String,
    /// Copied from the definition so the policy needs only the outcomes.
    pub required: bool,
    pub passed: bool,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatekeeperResult {
    pub decision: Decision,
    pub risk_score: f64,
    pub passed_gates: Vec<String>,
    pub failed_gates: Vec<String>,
    pub warnings: Vec<String>,
    pub outcomes: Vec<GateOutcome>,
    pub metrics: MetricsSnapshot,
    pub execution_time_s: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes() {
        assert_eq!(Decision::Promote.exit_code(), 0);
        assert_eq!(Decision::ManualQA.exit_code(), 1);
        assert_eq!(Decision::Refine.exit_code(), 2);
    }

    #[test]
    fn serializes_as_wire_names() {
        let s = serde_json::to_string(&[Decision::Promote, Decision::ManualQA, Decision::Refine])
            .unwrap();
        assert_eq!(s, r#"["PROMOTE","MANUAL_QA","AGENT_REFINE"]"#);
        assert_eq!(Decision::Refine.to_string(), "AGENT_REFINE");
    }
}
