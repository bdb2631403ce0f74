//! Semantic invariants for fault definitions.

use std::collections::HashSet;

use crate::core::path::validate_relative_path;
use crate::core::types::FaultDefinition;

/// Check registry invariants:
/// - Ids are non-empty and unique
/// - `target_files` is non-empty and has no duplicates
/// - Every override template key names one of the fault's targets
/// - Every target and template path is relative without `..`
pub fn validate_invariants(faults: &[FaultDefinition]) -> Vec<String> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();
    for fault in faults {
        validate_fault(fault, &mut seen, &mut errors);
    }
    errors
}

fn validate_fault(fault: &FaultDefinition, seen: &mut HashSet<String>, errors: &mut Vec<String>) {
    if fault.id.trim().is_empty() {
        errors.push("fault id must not be empty".to_string());
    } else if !seen.insert(fault.id.clone()) {
        errors.push(format!("duplicate fault id '{}'", fault.id));
    }

    if fault.target_files.is_empty() {
        errors.push(format!("{}: target_files must not be empty", fault.id));
    }

    let mut targets = HashSet::new();
    for target in &fault.target_files {
        if !targets.insert(target.as_str()) {
            errors.push(format!("{}: duplicate target '{}'", fault.id, target));
        }
        if let Err(err) = validate_relative_path(target) {
            errors.push(format!("{}: {}", fault.id, err));
        }
    }

    for (target, template) in &fault.additional_templates {
        if !targets.contains(target.as_str()) {
            errors.push(format!(
                "{}: override template for '{}' which is not a target",
                fault.id, target
            ));
        }
        if let Err(err) = validate_relative_path(template) {
            errors.push(format!("{}: {}", fault.id, err));
        }
    }

    if let Err(err) = validate_relative_path(&fault.template_file) {
        errors.push(format!("{}: {}", fault.id, err));
    }
}
