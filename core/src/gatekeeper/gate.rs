use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::GateError;
use crate::metrics::MetricsSnapshot;

/// Threshold of a gate: a ratio for numeric gates, a flag for boolean ones.
///
/// Serialized untagged, so `0.8` and `true` both parse from JSON directly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GateThreshold {
    Flag(bool),
    Ratio(f64),
}

impl GateThreshold {
    fn type_name(&self) -> &'static str {
        match self {
            GateThreshold::Flag(_) => "boolean",
            GateThreshold::Ratio(_) => "ratio",
        }
    }
}

impl fmt::Display for GateThreshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GateThreshold::Flag(b) => write!(f, "{b}"),
            // Debug keeps the trailing ".0" on whole numbers.
            GateThreshold::Ratio(r) => write!(f, "{r:?}"),
        }
    }
}

/// Declarative definition of one named gate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateDefinition {
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default = "default_required")]
    pub required: bool,

    /// `None` is accepted at parse time; known gates then fail evaluation.
    #[serde(default)]
    pub threshold: Option<GateThreshold>,

    /// Informational only, not consumed by the decision policy.
    #[serde(default = "default_weight")]
    pub weight: f64,
}

fn default_required() -> bool {
    true
}

fn default_weight() -> f64 {
    1.0
}

impl GateDefinition {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        required: bool,
        threshold: GateThreshold,
        weight: f64,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            required,
            threshold: Some(threshold),
            weight,
        }
    }

    pub fn kind(&self) -> GateKind {
        GateKind::from_name(&self.name)
    }
}

/// The gates the engine knows how to evaluate. Each variant owns its
/// comparator; any other name maps to [`GateKind::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GateKind {
    MutationTesting,
    SastSecurity,
    ContractValidation,
    DevirtualizationRate,
    BuildSuccess,
    Unknown,
}

/// Result of a single comparator run.
#[derive(Debug, Clone, PartialEq)]
pub struct Check {
    pub passed: bool,
    pub message: Option<String>,
}

impl Check {
    fn pass() -> Self {
        Self {
            passed: true,
            message: None,
        }
    }

    fn fail(message: String) -> Self {
        Self {
            passed: false,
            message: Some(message),
        }
    }
}

impl GateKind {
    pub fn from_name(name: &str) -> Self {
        match name {
            "mutation_testing" => GateKind::MutationTesting,
            "sast_security" => GateKind::SastSecurity,
            "contract_validation" => GateKind::ContractValidation,
            "devirtualization_rate" => GateKind::DevirtualizationRate,
            "build_success" => GateKind::BuildSuccess,
            _ => GateKind::Unknown,
        }
    }

    /// Run this gate's comparator.
    ///
    /// `gate_name` is only used for messages; a threshold of the wrong type
    /// (or a missing one) is an error, never a pass.
    pub fn check(
        &self,
        gate_name: &str,
        threshold: Option<&GateThreshold>,
        m: &MetricsSnapshot,
    ) -> Result<Check, GateError> {
        let check = match self {
            GateKind::MutationTesting => {
                let t = ratio_threshold(gate_name, threshold)?;
                at_least("Mutation score", m.mutation, t)
            }
            GateKind::SastSecurity => {
                let t = ratio_threshold(gate_name, threshold)?;
                at_most("SAST severity", m.static_severity, t)
            }
            GateKind::ContractValidation => {
                let t = ratio_threshold(gate_name, threshold)?;
                at_least("Contract pass rate", m.contract_pass_rate, t)
            }
            GateKind::DevirtualizationRate => {
                let t = ratio_threshold(gate_name, threshold)?;
                at_least("Devirtualization rate", m.devirt_success_rate, t)
            }
            GateKind::BuildSuccess => {
                let expected = flag_threshold(gate_name, threshold)?;
                if m.build_success == expected {
                    Check::pass()
                } else {
                    Check::fail(format!(
                        "Build failed or tests not passing (build_success={}, expected {})",
                        m.build_success, expected
                    ))
                }
            }
            GateKind::Unknown => Check {
                passed: true,
                message: Some(format!("Unknown gate '{gate_name}' - defaulting to pass")),
            },
        };

        Ok(check)
    }
}

fn at_least(label: &str, value: f64, threshold: f64) -> Check {
    if value >= threshold {
        Check::pass()
    } else {
        Check::fail(format!(
            "{label} {value:.3} below threshold {}",
            GateThreshold::Ratio(threshold)
        ))
    }
}

fn at_most(label: &str, value: f64, threshold: f64) -> Check {
    if value <= threshold {
        Check::pass()
    } else {
        Check::fail(format!(
            "{label} {value:.3} above threshold {}",
            GateThreshold::Ratio(threshold)
        ))
    }
}

fn ratio_threshold(gate: &str, threshold: Option<&GateThreshold>) -> Result<f64, GateError> {
    match threshold {
        Some(GateThreshold::Ratio(t)) => Ok(*t),
        other => Err(threshold_type_error(gate, "ratio", other)),
    }
}

fn flag_threshold(gate: &str, threshold: Option<&GateThreshold>) -> Result<bool, GateError> {
    match threshold {
        Some(GateThreshold::Flag(b)) => Ok(*b),
        other => Err(threshold_type_error(gate, "boolean", other)),
    }
}

fn threshold_type_error(
    gate: &str,
    expected: &'static str,
    found: Option<&GateThreshold>,
) -> GateError {
    GateError::ThresholdType {
        gate: gate.to_string(),
        expected,
        found: found
            .map(|t| format!("{} {}", t.type_name(), t))
            .unwrap_or_else(|| "none".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics() -> MetricsSnapshot {
        MetricsSnapshot {
            delta_loc: 0.05,
            novelty: 0.05,
            ext_dep_delta: 0.0,
            mutation: 0.85,
            flakiness: 0.0,
            static_severity: 0.0,
            test_coverage: 0.9,
            devirt_success_rate: 0.7,
            contract_pass_rate: 1.0,
            build_success: true,
            parse_time_ms: 0.0,
            lift_time_ms: 0.0,
            memory_usage_mb: 0.0,
        }
    }

    #[test]
    fn kind_from_name() {
        assert_eq!(
            GateKind::from_name("mutation_testing"),
            GateKind::MutationTesting
        );
        assert_eq!(GateKind::from_name("build_success"), GateKind::BuildSuccess);
        assert_eq!(GateKind::from_name("perf_budget"), GateKind::Unknown);
        assert_eq!(GateKind::from_name("Build_Success"), GateKind::Unknown);
    }

    #[test]
    fn mutation_passes_at_threshold() {
        let mut m = metrics();
        m.mutation = 0.80;
        let check = GateKind::MutationTesting
            .check("mutation_testing", Some(&GateThreshold::Ratio(0.80)), &m)
            .unwrap();
        assert_eq!(check, Check::pass());
    }

    #[test]
    fn mutation_failure_names_value_and_threshold() {
        let mut m = metrics();
        m.mutation = 0.75;
        let check = GateKind::MutationTesting
            .check("mutation_testing", Some(&GateThreshold::Ratio(0.80)), &m)
            .unwrap();
        assert!(!check.passed);
        assert_eq!(
            check.message.as_deref(),
            Some("Mutation score 0.750 below threshold 0.8")
        );
    }

    #[test]
    fn sast_is_an_upper_bound() {
        let mut m = metrics();
        let t = GateThreshold::Ratio(0.0);
        assert!(GateKind::SastSecurity
            .check("sast_security", Some(&t), &m)
            .unwrap()
            .passed);

        m.static_severity = 0.3;
        let check = GateKind::SastSecurity
            .check("sast_security", Some(&t), &m)
            .unwrap();
        assert!(!check.passed);
        assert_eq!(
            check.message.as_deref(),
            Some("SAST severity 0.300 above threshold 0.0")
        );
    }

    #[test]
    fn build_success_compares_flags() {
        let mut m = metrics();
        m.build_success = false;
        let check = GateKind::BuildSuccess
            .check("build_success", Some(&GateThreshold::Flag(true)), &m)
            .unwrap();
        assert!(!check.passed);
        assert!(check.message.unwrap().contains("build_success=false"));
    }

    #[test]
    fn wrong_threshold_type_is_an_error() {
        let err = GateKind::DevirtualizationRate
            .check(
                "devirtualization_rate",
                Some(&GateThreshold::Flag(true)),
                &metrics(),
            )
            .unwrap_err();
        assert_eq!(
            err,
            GateError::ThresholdType {
                gate: "devirtualization_rate".into(),
                expected: "ratio",
                found: "boolean true".into(),
            }
        );

        let err = GateKind::BuildSuccess
            .check("build_success", None, &metrics())
            .unwrap_err();
        assert!(err.to_string().contains("got none"));
    }

    #[test]
    fn unknown_gate_passes_with_message() {
        let check = GateKind::Unknown
            .check("perf_budget", None, &metrics())
            .unwrap();
        assert!(check.passed);
        assert_eq!(
            check.message.as_deref(),
            Some("Unknown gate 'perf_budget' - defaulting to pass")
        );
    }

    #[test]
    fn threshold_parses_untagged() {
        let def: GateDefinition = serde_json::from_str(
            r#"{"name": "build_success", "threshold": true, "weight": 0.1}"#,
        )
        .unwrap();
        assert_eq!(def.threshold, Some(GateThreshold::Flag(true)));
        assert!(def.required);

        let def: GateDefinition =
            serde_json::from_str(r#"{"name": "mutation_testing", "threshold": 0.8}"#).unwrap();
        assert_eq!(def.threshold, Some(GateThreshold::Ratio(0.8)));
        assert_eq!(def.weight, 1.0);
    }
}
