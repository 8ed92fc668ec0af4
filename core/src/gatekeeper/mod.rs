//! Quality-gate decision engine.
//!
//! Pure and synchronous: a [`MetricsSnapshot`](crate::metrics::MetricsSnapshot)
//! goes in, a [`GatekeeperResult`] comes out. The only side channel is the
//! [`EvalReporter`] passed to [`Gatekeeper::evaluate`].

pub mod decision;
pub mod evaluate;
pub mod gate;
pub mod policy;
pub mod registry;
pub mod reporter;
pub mod risk;

pub use decision::{Decision, GateOutcome, GatekeeperResult};
pub use evaluate::{evaluate_gate, Gatekeeper};
pub use gate::{Check, GateDefinition, GateKind, GateThreshold};
pub use policy::{decide, PolicyThresholds};
pub use registry::{default_gates, DefaultGateSource, GateRegistry, GateSource};
pub use reporter::{EvalReporter, NullReporter, RecordingReporter, ReportLevel, TracingReporter};
