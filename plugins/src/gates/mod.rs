mod json_file;

pub use json_file::{parse_gate_document, JsonFileGateSource};
