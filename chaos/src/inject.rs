//! Orchestration for `chaos inject`.

use std::collections::BTreeMap;

use tracing::{info, warn};

use crate::core::manifest::BackupState;
use crate::core::registry::Registry;
use crate::core::types::FaultDefinition;
use crate::error::{ChaosError, Result};
use crate::io::project::Project;
use crate::io::template::Template;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InjectOptions {
    /// Replace an unrestored injection instead of refusing.
    pub force: bool,
}

/// One target overwritten by the injection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InjectedFile {
    pub path: String,
    /// Template path that supplied the content.
    pub template: String,
}

/// Result of a successful injection.
#[derive(Debug, Clone)]
pub struct InjectOutcome {
    pub fault: FaultDefinition,
    pub backup_id: String,
    /// Targets snapshotted before mutation.
    pub backed_up: Vec<String>,
    /// Targets that did not exist and were created.
    pub missing: Vec<String>,
    pub injected: Vec<InjectedFile>,
    /// Set when `--force` discarded an earlier unrestored injection.
    pub replaced: Option<String>,
}

/// Inject `fault_id` into the project.
///
/// The backup manifest is on disk before the first target is touched. Every
/// template is loaded before the first write, so a missing template leaves the
/// working tree untouched. A write failure partway is not rolled back; the
/// manifest still covers every target, so `restore` reverses it.
pub fn inject(
    project: &Project,
    registry: &Registry,
    fault_id: &str,
    options: InjectOptions,
) -> Result<InjectOutcome> {
    let fault = registry.require(fault_id)?;
    let backups = project.backups();
    let replaced = check_slot(project, options)?;

    let backup = backups.create_backup(&fault.target_files, &fault.id)?;
    let templates = load_templates(project, fault)?;

    let mut injected = Vec::with_capacity(fault.target_files.len());
    for target in &fault.target_files {
        let template_path = fault.template_for(target);
        let template = &templates[template_path];
        if let Err(err) = project.templates().apply(template, target) {
            warn!(
                fault = %fault.id,
                target = %target,
                applied = injected.len(),
                "injection stopped partway; run `chaos restore` to revert"
            );
            return Err(err);
        }
        injected.push(InjectedFile {
            path: target.clone(),
            template: template_path.to_string(),
        });
    }

    info!(fault = %fault.id, backup_id = %backup.backup_id, files = injected.len(), "fault injected");
    Ok(InjectOutcome {
        fault: fault.clone(),
        backup_id: backup.backup_id,
        backed_up: backup.files,
        missing: backup.missing_files,
        injected,
        replaced,
    })
}

/// Enforce the single-slot policy. Returns the fault id that `force` replaced.
fn check_slot(project: &Project, options: InjectOptions) -> Result<Option<String>> {
    let backups = project.backups();
    let previous = match backups.state() {
        Ok(BackupState::Clean) => return Ok(None),
        Ok(BackupState::Injected(manifest)) => {
            if !options.force {
                return Err(ChaosError::AlreadyInjected {
                    fault_type: manifest.fault_type,
                    backup_id: manifest.backup_id,
                });
            }
            manifest.fault_type
        }
        Err(err @ ChaosError::CorruptManifest { .. }) => {
            if !options.force {
                return Err(err);
            }
            warn!(error = %err, "discarding corrupt backup");
            String::from("<unknown>")
        }
        Err(err) => return Err(err),
    };
    warn!(previous = %previous, "discarding unrestored injection");
    backups.clean_backup()?;
    Ok(Some(previous))
}

fn load_templates<'f>(
    project: &Project,
    fault: &'f FaultDefinition,
) -> Result<BTreeMap<&'f str, Template>> {
    let loader = project.templates();
    let mut templates = BTreeMap::new();
    for path in fault.template_paths() {
        templates.insert(path, loader.load(path)?);
    }
    Ok(templates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{TestProject, fault};

    fn registry(faults: Vec<FaultDefinition>) -> Registry {
        Registry::new(faults).expect("registry")
    }

    #[test]
    fn unknown_fault_touches_nothing() {
        let tp = TestProject::new();
        let err = inject(&tp.project, &registry(vec![]), "nope", InjectOptions::default())
            .unwrap_err();
        assert!(matches!(err, ChaosError::UnknownFault { .. }));
        assert!(!tp.exists(".chaos-backup"));
    }

    #[test]
    fn injects_primary_template_and_records_backup() {
        let tp = TestProject::new();
        let def = fault("syntax", &["src/Home.jsx"], "t/syntax.template.jsx");
        tp.write_templates(&def);
        tp.write("src/Home.jsx", "ok");

        let outcome = inject(&tp.project, &registry(vec![def]), "syntax", InjectOptions::default())
            .expect("inject");

        assert_eq!(outcome.backed_up, vec!["src/Home.jsx"]);
        assert!(outcome.missing.is_empty());
        assert_eq!(outcome.injected[0].template, "t/syntax.template.jsx");
        assert_eq!(tp.read("src/Home.jsx"), tp.read("t/syntax.template.jsx"));
        assert!(outcome.replaced.is_none());
    }

    #[test]
    fn missing_template_leaves_targets_untouched() {
        let tp = TestProject::new();
        let mut def = fault("pair", &["a.js", "b.js"], "t/a.template.js");
        def.additional_templates
            .insert("b.js".to_string(), "t/b.template.js".to_string());
        tp.write("t/a.template.js", "broken");
        tp.write("a.js", "A");
        tp.write("b.js", "B");

        let err = inject(&tp.project, &registry(vec![def]), "pair", InjectOptions::default())
            .unwrap_err();
        assert!(matches!(err, ChaosError::NotFound { .. }));
        assert_eq!(tp.read("a.js"), "A");
        assert_eq!(tp.read("b.js"), "B");
        // The backup was taken first, so restore is still possible.
        assert!(tp.project.backups().has_backup());
    }

    #[test]
    fn refuses_second_injection_without_force() {
        let tp = TestProject::new();
        let one = fault("one", &["a.js"], "t/one.template.js");
        let two = fault("two", &["a.js"], "t/two.template.js");
        tp.write_templates(&one);
        tp.write_templates(&two);
        tp.write("a.js", "A");
        let reg = registry(vec![one, two]);

        inject(&tp.project, &reg, "one", InjectOptions::default()).expect("first");
        let err = inject(&tp.project, &reg, "two", InjectOptions::default()).unwrap_err();
        match err {
            ChaosError::AlreadyInjected { fault_type, .. } => assert_eq!(fault_type, "one"),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(tp.read("a.js"), tp.read("t/one.template.js"));
    }

    #[test]
    fn force_replaces_previous_snapshot_root() {
        let tp = TestProject::new();
        let one = fault("one", &["a.js"], "t/one.template.js");
        let two = fault("two", &["a.js"], "t/two.template.js");
        tp.write_templates(&one);
        tp.write_templates(&two);
        tp.write("a.js", "A");
        let reg = registry(vec![one, two]);

        let first = inject(&tp.project, &reg, "one", InjectOptions::default()).expect("first");
        let second =
            inject(&tp.project, &reg, "two", InjectOptions { force: true }).expect("second");

        assert_eq!(second.replaced.as_deref(), Some("one"));
        let snapshots = tp.project.backups().list_snapshots().expect("snapshots");
        assert_eq!(snapshots.len(), 1);
        assert_eq!(snapshots[0].backup_id, second.backup_id);
        if first.backup_id != second.backup_id {
            assert!(!tp.exists(&format!(".chaos-backup/{}", first.backup_id)));
        }
    }
}
