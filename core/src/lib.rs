//! qgate-core: risk scoring, gate evaluation and promotion policy.

pub mod collector;
pub mod config;
pub mod error;
pub mod gatekeeper;
pub mod metrics;
pub mod report;
