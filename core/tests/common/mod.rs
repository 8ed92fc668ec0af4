use qgate_core::metrics::MetricsSnapshot;

/// Low-risk snapshot where every default gate passes.
pub fn healthy_metrics() -> MetricsSnapshot {
    MetricsSnapshot {
        delta_loc: 0.05,
        novelty: 0.05,
        ext_dep_delta: 0.0,
        mutation: 0.85,
        flakiness: 0.0,
        static_severity: 0.0,
        test_coverage: 0.82,
        devirt_success_rate: 0.7,
        contract_pass_rate: 1.0,
        build_success: true,
        parse_time_ms: 14.0,
        lift_time_ms: 31.0,
        memory_usage_mb: 210.0,
    }
}

#[allow(dead_code)]
pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
