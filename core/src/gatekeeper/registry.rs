use std::collections::HashSet;

use crate::error::GateError;

use super::gate::{GateDefinition, GateThreshold};
use super::reporter::EvalReporter;

/// Ordered, name-unique set of gates. Order only affects reporting.
#[derive(Debug, Clone, PartialEq)]
pub struct GateRegistry {
    gates: Vec<GateDefinition>,
}

impl GateRegistry {
    pub fn new(gates: Vec<GateDefinition>) -> Result<Self, GateError> {
        let mut seen = HashSet::new();
        for g in &gates {
            if !seen.insert(g.name.as_str()) {
                return Err(GateError::DuplicateGate(g.name.clone()));
            }
        }
        Ok(Self { gates })
    }

    pub fn defaults() -> Self {
        Self {
            gates: default_gates(),
        }
    }

    pub fn gates(&self) -> &[GateDefinition] {
        &self.gates
    }

    pub fn get(&self, name: &str) -> Option<&GateDefinition> {
        self.gates.iter().find(|g| g.name == name)
    }

    pub fn len(&self) -> usize {
        self.gates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }
}

impl Default for GateRegistry {
    fn default() -> Self {
        Self::defaults()
    }
}

impl<'a> IntoIterator for &'a GateRegistry {
    type Item = &'a GateDefinition;
    type IntoIter = std::slice::Iter<'a, GateDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.gates.iter()
    }
}

pub fn default_gates() -> Vec<GateDefinition> {
    vec![
        GateDefinition::new(
            "mutation_testing",
            "Mutation testing score >= 0.80",
            true,
            GateThreshold::Ratio(0.80),
            0.3,
        ),
        GateDefinition::new(
            "sast_security",
            "No high/critical SAST findings",
            true,
            GateThreshold::Ratio(0.0),
            0.2,
        ),
        GateDefinition::new(
            "contract_validation",
            "All contracts passing provider/consumer compatibility",
            true,
            GateThreshold::Ratio(1.0),
            0.2,
        ),
        GateDefinition::new(
            "devirtualization_rate",
            "Devirtualization success rate >= 60%",
            true,
            GateThreshold::Ratio(0.60),
            0.2,
        ),
        GateDefinition::new(
            "build_success",
            "Clean build with all tests passing",
            true,
            GateThreshold::Flag(true),
            0.1,
        ),
    ]
}

/// Where the gate registry comes from.
///
/// Sources must never fail: problems are reported and the default table is
/// used instead.
pub trait GateSource: Send + Sync {
    fn name(&self) -> &str;
    fn load(&self, reporter: &dyn EvalReporter) -> GateRegistry;
}

pub struct DefaultGateSource;

impl GateSource for DefaultGateSource {
    fn name(&self) -> &str {
        "default"
    }

    fn load(&self, _reporter: &dyn EvalReporter) -> GateRegistry {
        GateRegistry::defaults()
    }
}
