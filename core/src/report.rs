use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::gatekeeper::{Decision, GatekeeperResult};

/// JSON artifact written for external consumers of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatekeeperReport {
    pub decision: Decision,
    pub risk_score: f64,
    pub passed_gates: Vec<String>,
    pub failed_gates: Vec<String>,
    pub warnings: Vec<String>,
    pub execution_time_s: f64,
    /// Seconds since the Unix epoch.
    pub timestamp: f64,
}

impl GatekeeperReport {
    pub fn from_result(result: &GatekeeperResult, now: DateTime<Utc>) -> Self {
        Self {
            decision: result.decision,
            risk_score: result.risk_score,
            passed_gates: result.passed_gates.clone(),
            failed_gates: result.failed_gates.clone(),
            warnings: result.warnings.clone(),
            execution_time_s: result.execution_time_s,
            timestamp: now.timestamp_millis() as f64 / 1000.0,
        }
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

pub fn format_text(result: &GatekeeperResult) -> String {
    let mut out = String::new();

    out.push_str("Quality gate report\n");
    out.push_str(&format!("decision: {}\n", result.decision));
    out.push_str(&format!("risk_score: {:.3}\n", result.risk_score));
    out.push_str(&format!("passed: {}\n", join_or_dash(&result.passed_gates)));
    out.push_str(&format!("failed: {}\n", join_or_dash(&result.failed_gates)));

    if !result.warnings.is_empty() {
        out.push_str("warnings:\n");
        for w in &result.warnings {
            out.push_str(&format!("  - {w}\n"));
        }
    }

    out.push_str(&format!("verdict: {}\n", verdict_line(result.decision)));
    out
}

pub fn verdict_line(decision: Decision) -> &'static str {
    match decision {
        Decision::Promote => "Quality gates passed - PROMOTE",
        Decision::ManualQA => "Manual QA required - MANUAL_QA",
        Decision::Refine => "Quality gates failed - AGENT_REFINE",
    }
}

fn join_or_dash(items: &[String]) -> String {
    if items.is_empty() {
        "-".to_string()
    } else {
        items.join(", ")
    }
}
