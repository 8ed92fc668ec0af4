//! Weighted risk model.
//!
//! ```text
//! R = 0.2*delta_loc + 0.2*novelty + 0.2*ext_dep_delta
//!   + 0.2*(1 - mutation) + 0.1*flakiness + 0.1*static_severity
//! ```
//!
//! clamped to `[0, 1]`. Mutation is the only inverted term: a higher kill
//! ratio means lower risk.

use crate::metrics::MetricsSnapshot;

pub const W_DELTA_LOC: f64 = 0.2;
pub const W_NOVELTY: f64 = 0.2;
pub const W_EXT_DEP_DELTA: f64 = 0.2;
pub const W_MUTATION_GAP: f64 = 0.2;
pub const W_FLAKINESS: f64 = 0.1;
pub const W_STATIC_SEVERITY: f64 = 0.1;

pub fn score(m: &MetricsSnapshot) -> f64 {
    let raw = W_DELTA_LOC * m.delta_loc
        + W_NOVELTY * m.novelty
        + W_EXT_DEP_DELTA * m.ext_dep_delta
        + W_MUTATION_GAP * (1.0 - m.mutation)
        + W_FLAKINESS * m.flakiness
        + W_STATIC_SEVERITY * m.static_severity;

    // NaN scores as maximum risk.
    if raw.is_nan() {
        return 1.0;
    }
    raw.clamp(0.0, 1.0)
}
