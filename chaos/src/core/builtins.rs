//! Built-in fault table.
//!
//! Every fault here breaks the target application at build time, so a
//! deployment of the injected tree never comes up. Template paths are relative
//! to the project root.

use std::collections::BTreeMap;

use crate::core::types::{Category, FaultDefinition, Severity};

struct Entry<'a> {
    id: &'a str,
    name: &'a str,
    description: &'a str,
    targets: &'a [&'a str],
    template: &'a str,
    overrides: &'a [(&'a str, &'a str)],
    expected_error: &'a str,
    severity: Severity,
}

fn build(entry: Entry<'_>) -> FaultDefinition {
    FaultDefinition {
        id: entry.id.to_string(),
        name: entry.name.to_string(),
        category: Category::BuildErrors,
        description: entry.description.to_string(),
        severity: entry.severity,
        target_files: entry.targets.iter().map(|s| s.to_string()).collect(),
        template_file: entry.template.to_string(),
        additional_templates: entry
            .overrides
            .iter()
            .map(|(target, template)| (target.to_string(), template.to_string()))
            .collect::<BTreeMap<_, _>>(),
        expected_error: entry.expected_error.to_string(),
        build_fails: true,
        deploy_fails: true,
        note: None,
    }
}

/// Returns all built-in fault definitions in display order.
pub fn builtin_faults() -> Vec<FaultDefinition> {
    let mut faults = vec![
        // Syntax and compilation
        build(Entry {
            id: "syntax-error",
            name: "JSX Syntax Error",
            description: "JSX syntax error, missing closing tag causes compilation failure",
            targets: &["src/pages/Home.jsx"],
            template: "chaos-templates/build-errors/syntax-error.template.jsx",
            overrides: &[],
            expected_error: "Unexpected token",
            severity: Severity::High,
        }),
        build(Entry {
            id: "import-error",
            name: "Import Path Error",
            description: "Wrong import path causes module not found, compilation fails",
            targets: &["src/App.jsx"],
            template: "chaos-templates/build-errors/import-error.template.jsx",
            overrides: &[],
            expected_error: "Cannot find module",
            severity: Severity::High,
        }),
        build(Entry {
            id: "typescript-error",
            name: "TypeScript Type Error",
            description: "Type definition error causes TypeScript compilation failure (if using TS)",
            targets: &["src/App.jsx"],
            template: "chaos-templates/build-errors/typescript-error.template.jsx",
            overrides: &[],
            expected_error: "Type error",
            severity: Severity::High,
        }),
        build(Entry {
            id: "undefined-variable",
            name: "Undefined Variable",
            description: "Using undefined variable or function causes compilation failure",
            targets: &["src/pages/TaskListPage.jsx"],
            template: "chaos-templates/build-errors/undefined-variable.template.jsx",
            overrides: &[],
            expected_error: "is not defined",
            severity: Severity::High,
        }),
        // Dependencies and configuration
        build(Entry {
            id: "dependency-missing",
            name: "Missing Dependency",
            description: "Missing required dependency in package.json, npm install fails",
            targets: &["package.json"],
            template: "chaos-templates/build-errors/dependency-missing.template.json",
            overrides: &[],
            expected_error: "Cannot find package",
            severity: Severity::High,
        }),
        build(Entry {
            id: "dependency-version-conflict",
            name: "Dependency Version Conflict",
            description: "Incompatible dependency versions cause installation or compilation failure",
            targets: &["package.json"],
            template: "chaos-templates/build-errors/dependency-version-conflict.template.json",
            overrides: &[],
            expected_error: "ERESOLVE unable to resolve dependency tree",
            severity: Severity::High,
        }),
        build(Entry {
            id: "env-variable-missing",
            name: "Missing Environment Variable",
            description: "Required environment variable missing during build, causes build failure",
            targets: &["vite.config.js"],
            template: "chaos-templates/build-errors/env-variable-missing.template.js",
            overrides: &[],
            expected_error: "Environment variable is not defined",
            severity: Severity::Medium,
        }),
        build(Entry {
            id: "vite-config-error",
            name: "Vite Config Error",
            description: "vite.config.js configuration error, build tool cannot start",
            targets: &["vite.config.js"],
            template: "chaos-templates/build-errors/vite-config-error.template.js",
            overrides: &[],
            expected_error: "Invalid configuration",
            severity: Severity::High,
        }),
        // Resources and bundling
        build(Entry {
            id: "css-syntax-error",
            name: "CSS Syntax Error",
            description: "CSS or TailwindCSS configuration error causes style compilation failure",
            targets: &["src/styles/index.css"],
            template: "chaos-templates/build-errors/css-syntax-error.template.css",
            overrides: &[],
            expected_error: "CssSyntaxError",
            severity: Severity::Medium,
        }),
        build(Entry {
            id: "circular-dependency",
            name: "Circular Dependency",
            description: "Circular dependency between modules causes build failure or infinite loop",
            targets: &[
                "src/utils/helpers.js",
                "src/utils/validators.js",
                "src/App.jsx",
                "vite.config.js",
            ],
            template: "chaos-templates/build-errors/circular-dependency.template.jsx",
            overrides: &[
                (
                    "src/utils/validators.js",
                    "chaos-templates/build-errors/circular-dependency-validators.template.js",
                ),
                (
                    "src/App.jsx",
                    "chaos-templates/build-errors/circular-dependency-app.template.jsx",
                ),
                (
                    "vite.config.js",
                    "chaos-templates/build-errors/circular-dependency-vite.template.js",
                ),
            ],
            expected_error: "Circular dependency detected",
            severity: Severity::Medium,
        }),
        build(Entry {
            id: "build-out-of-memory",
            name: "Build Out of Memory",
            description: "Insufficient memory during build process causes build failure",
            targets: &["src/utils/largeData.js", "src/App.jsx"],
            template: "chaos-templates/build-errors/build-out-of-memory.template.js",
            overrides: &[(
                "src/App.jsx",
                "chaos-templates/build-errors/build-out-of-memory-app.template.jsx",
            )],
            expected_error: "JavaScript heap out of memory",
            severity: Severity::High,
        }),
        build(Entry {
            id: "asset-size-exceeded",
            name: "Asset Size Exceeded",
            description: "Bundled file exceeds size limit, causes deployment failure",
            targets: &["src/pages/Home.jsx"],
            template: "chaos-templates/build-errors/asset-size-exceeded.template.jsx",
            overrides: &[],
            expected_error: "Asset exceeds size limit",
            severity: Severity::Medium,
        }),
    ];

    if let Some(oom) = faults.iter_mut().find(|f| f.id == "build-out-of-memory") {
        oom.note = Some(
            "creates a large data file and imports it from App.jsx; restore deletes the data file"
                .to_string(),
        );
    }

    faults
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multi_target_faults_have_overrides() {
        let faults = builtin_faults();
        let circular = faults
            .iter()
            .find(|f| f.id == "circular-dependency")
            .expect("circular-dependency");
        assert_eq!(circular.target_files.len(), 4);
        assert_eq!(
            circular.template_for("src/utils/helpers.js"),
            circular.template_file
        );
        assert_ne!(circular.template_for("src/App.jsx"), circular.template_file);
    }

    #[test]
    fn out_of_memory_carries_note() {
        let faults = builtin_faults();
        let oom = faults
            .iter()
            .find(|f| f.id == "build-out-of-memory")
            .expect("build-out-of-memory");
        assert!(oom.note.is_some());
    }
}
