use serde::{Deserialize, Serialize};

/// Quantitative inputs for one gatekeeper evaluation.
///
/// Ratio fields are expected in `[0, 1]`; clamping is the producer's job and
/// the engine does not re-validate. Use [`MetricsSnapshot::out_of_range_ratios`]
/// to check the precondition before handing a snapshot over.
///
/// Every field is required on deserialization: a producer that forgets a
/// metric gets a parse error rather than a silent zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// Fraction of the codebase changed.
    pub delta_loc: f64,
    /// Fraction of changed artifacts that are new rather than modified.
    pub novelty: f64,
    /// Fraction of the external dependency set that changed.
    pub ext_dep_delta: f64,
    /// Mutation-test kill ratio (higher is better).
    pub mutation: f64,
    /// Fraction of test runs that were non-deterministic.
    pub flakiness: f64,
    /// Weighted static-analysis severity (higher is worse).
    pub static_severity: f64,

    // Carried for reporting and gates, not part of the risk formula.
    pub test_coverage: f64,
    pub devirt_success_rate: f64,
    pub contract_pass_rate: f64,
    pub build_success: bool,

    pub parse_time_ms: f64,
    pub lift_time_ms: f64,
    pub memory_usage_mb: f64,
}

impl MetricsSnapshot {
    /// Contract pass rate a producer reports when the project has no contracts.
    pub const NO_CONTRACTS_PASS_RATE: f64 = 1.0;

    /// Names of ratio fields outside `[0, 1]` (or NaN).
    pub fn out_of_range_ratios(&self) -> Vec<&'static str> {
        let ratios = [
            ("delta_loc", self.delta_loc),
            ("novelty", self.novelty),
            ("ext_dep_delta", self.ext_dep_delta),
            ("mutation", self.mutation),
            ("flakiness", self.flakiness),
            ("static_severity", self.static_severity),
            ("test_coverage", self.test_coverage),
            ("devirt_success_rate", self.devirt_success_rate),
            ("contract_pass_rate", self.contract_pass_rate),
        ];

        ratios
            .into_iter()
            .filter(|(_, v)| !(0.0..=1.0).contains(v))
            .map(|(name, _)| name)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MetricsSnapshot {
        MetricsSnapshot {
            delta_loc: 0.1,
            novelty: 0.2,
            ext_dep_delta: 0.0,
            mutation: 0.9,
            flakiness: 0.0,
            static_severity: 0.0,
            test_coverage: 0.75,
            devirt_success_rate: 0.7,
            contract_pass_rate: MetricsSnapshot::NO_CONTRACTS_PASS_RATE,
            build_success: true,
            parse_time_ms: 12.5,
            lift_time_ms: 40.0,
            memory_usage_mb: 128.0,
        }
    }

    #[test]
    fn in_range_snapshot_has_no_offenders() {
        assert!(sample().out_of_range_ratios().is_empty());
    }

    #[test]
    fn reports_out_of_range_and_nan_ratios() {
        let mut m = sample();
        m.novelty = 1.0000001;
        m.flakiness = -0.1;
        m.test_coverage = f64::NAN;
        // Timing fields are not ratios.
        m.parse_time_ms = 5000.0;

        assert_eq!(
            m.out_of_range_ratios(),
            vec!["novelty", "flakiness", "test_coverage"]
        );
    }

    #[test]
    fn deserialize_rejects_missing_fields() {
        let json = r#"{"delta_loc": 0.1, "novelty": 0.2}"#;
        let err = serde_json::from_str::<MetricsSnapshot>(json).unwrap_err();
        assert!(err.to_string().contains("missing field"));
    }
}
