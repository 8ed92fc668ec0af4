mod snapshot;

pub use snapshot::MetricsSnapshot;
