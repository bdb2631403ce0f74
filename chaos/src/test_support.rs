//! Test-only helpers for building faults and throwaway projects.

use std::collections::BTreeMap;
use std::path::Path;

use crate::core::types::{Category, FaultDefinition, Severity};
use crate::io::project::Project;

/// Create a deterministic build-breaking fault with no overrides.
pub fn fault(id: &str, targets: &[&str], template: &str) -> FaultDefinition {
    FaultDefinition {
        id: id.to_string(),
        name: format!("{} name", id),
        category: Category::BuildErrors,
        description: format!("{} description", id),
        severity: Severity::High,
        target_files: targets.iter().map(|t| t.to_string()).collect(),
        template_file: template.to_string(),
        additional_templates: BTreeMap::new(),
        expected_error: "boom".to_string(),
        build_fails: true,
        deploy_fails: true,
        note: None,
    }
}

/// Template content with every required annotation for `id`.
pub fn template_source(id: &str, body: &str) -> String {
    format!(
        "/**\n * @fault-type: {id}\n * @category: build-errors\n * @description: {id} for tests\n */\n{body}\n"
    )
}

/// A project rooted in a temporary directory, removed on drop.
pub struct TestProject {
    pub temp: tempfile::TempDir,
    pub project: Project,
}

impl TestProject {
    /// Empty project with default configuration.
    pub fn new() -> Self {
        let temp = tempfile::tempdir().expect("tempdir");
        let project = Project::open(temp.path()).expect("open project");
        Self { temp, project }
    }

    pub fn root(&self) -> &Path {
        self.temp.path()
    }

    /// Write `contents` at `rel`, creating parent directories.
    pub fn write(&self, rel: &str, contents: &str) {
        self.project.store().write(rel, contents).expect("write file");
    }

    pub fn read(&self, rel: &str) -> String {
        self.project.store().read(rel).expect("read file")
    }

    pub fn exists(&self, rel: &str) -> bool {
        self.project.store().exists(rel)
    }

    /// Write an annotated template for every path `fault` references.
    pub fn write_templates(&self, fault: &FaultDefinition) {
        for path in fault.template_paths() {
            self.write(path, &template_source(&fault.id, &format!("// broken by {path}")));
        }
    }
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}
