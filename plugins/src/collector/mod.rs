pub mod parse;
pub mod probe;
mod project;
mod snapshot_file;

pub use project::ProjectCollector;
pub use snapshot_file::SnapshotFileCollector;
