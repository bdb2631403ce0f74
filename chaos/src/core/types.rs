//! Shared deterministic types for fault definitions.
//!
//! These types are static descriptions of faults. They never touch the
//! filesystem and never change after the registry is built.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// How disruptive a fault is expected to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    /// All severities, most severe first (display order).
    pub const ALL: [Severity; 3] = [Severity::High, Severity::Medium, Severity::Low];

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Closed set of fault categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    BuildErrors,
    RuntimeErrors,
    ResourceErrors,
    PerformanceIssues,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::BuildErrors,
        Category::RuntimeErrors,
        Category::ResourceErrors,
        Category::PerformanceIssues,
    ];

    /// Identifier used in the registry and in template annotations.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::BuildErrors => "build-errors",
            Category::RuntimeErrors => "runtime-errors",
            Category::ResourceErrors => "resource-errors",
            Category::PerformanceIssues => "performance-issues",
        }
    }

    /// Human-facing heading for listings.
    pub fn title(self) -> &'static str {
        match self {
            Category::BuildErrors => "Build Errors",
            Category::RuntimeErrors => "Runtime Errors",
            Category::ResourceErrors => "Resource Loading Errors",
            Category::PerformanceIssues => "Performance Issues",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static description of one injectable fault.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaultDefinition {
    /// Registry key (e.g. `syntax-error`).
    pub id: String,
    pub name: String,
    pub category: Category,
    pub description: String,
    pub severity: Severity,
    /// Repository-relative paths replaced by the fault, in injection order.
    pub target_files: Vec<String>,
    /// Default replacement content for every target.
    pub template_file: String,
    /// Per-target override templates, keyed by target path.
    #[serde(default)]
    pub additional_templates: BTreeMap<String, String>,
    pub expected_error: String,
    pub build_fails: bool,
    pub deploy_fails: bool,
    /// Operator warning shown alongside the fault.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl FaultDefinition {
    /// Template path to apply to `target`: the override if one is registered,
    /// otherwise the primary template.
    pub fn template_for(&self, target: &str) -> &str {
        self.additional_templates
            .get(target)
            .map(String::as_str)
            .unwrap_or(&self.template_file)
    }

    /// Every distinct template path the fault references, primary first.
    pub fn template_paths(&self) -> Vec<&str> {
        let mut paths = vec![self.template_file.as_str()];
        for path in self.additional_templates.values() {
            if !paths.contains(&path.as_str()) {
                paths.push(path);
            }
        }
        paths
    }
}

/// Aggregate counts over a registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FaultStats {
    pub total: usize,
    pub by_category: BTreeMap<Category, usize>,
    pub by_severity: BTreeMap<Severity, usize>,
}
