//! Fault registry: immutable lookup table from fault id to definition.

use std::collections::BTreeMap;

use crate::core::builtins::builtin_faults;
use crate::core::invariants::validate_invariants;
use crate::core::types::{Category, FaultDefinition, FaultStats, Severity};
use crate::error::{ChaosError, Result};

/// Ordered, validated set of fault definitions.
#[derive(Debug, Clone)]
pub struct Registry {
    faults: Vec<FaultDefinition>,
}

impl Registry {
    /// Build a registry, rejecting definitions that break registry invariants.
    pub fn new(faults: Vec<FaultDefinition>) -> Result<Self> {
        let errors = validate_invariants(&faults);
        if !errors.is_empty() {
            return Err(ChaosError::InvalidRegistry(errors.join("; ")));
        }
        Ok(Self { faults })
    }

    /// The faults shipped with the tool.
    pub fn builtin() -> Self {
        Self {
            faults: builtin_faults(),
        }
    }

    /// Look up a fault by id.
    pub fn get_fault_config(&self, id: &str) -> Option<&FaultDefinition> {
        self.faults.iter().find(|fault| fault.id == id)
    }

    /// Like [`Registry::get_fault_config`], but absence is an `UnknownFault` error.
    pub fn require(&self, id: &str) -> Result<&FaultDefinition> {
        self.get_fault_config(id)
            .ok_or_else(|| ChaosError::UnknownFault { id: id.to_string() })
    }

    /// All fault ids in declaration order.
    pub fn get_all_faults(&self) -> Vec<&str> {
        self.faults.iter().map(|fault| fault.id.as_str()).collect()
    }

    /// Faults grouped by category; every category is present, possibly empty.
    pub fn get_faults_by_category(&self) -> BTreeMap<Category, Vec<&FaultDefinition>> {
        let mut grouped: BTreeMap<Category, Vec<&FaultDefinition>> = Category::ALL
            .iter()
            .map(|category| (*category, Vec::new()))
            .collect();
        for fault in &self.faults {
            grouped.entry(fault.category).or_default().push(fault);
        }
        grouped
    }

    /// Aggregate counts, recomputed on every call.
    pub fn get_fault_stats(&self) -> FaultStats {
        let mut by_category = BTreeMap::new();
        let mut by_severity: BTreeMap<Severity, usize> =
            Severity::ALL.iter().map(|severity| (*severity, 0)).collect();
        for fault in &self.faults {
            *by_category.entry(fault.category).or_insert(0) += 1;
            *by_severity.entry(fault.severity).or_insert(0) += 1;
        }
        FaultStats {
            total: self.faults.len(),
            by_category,
            by_severity,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &FaultDefinition> {
        self.faults.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.faults.is_empty()
    }
}
