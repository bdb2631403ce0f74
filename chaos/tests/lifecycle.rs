//! End-to-end inject/restore tests against temporary projects.

use chaos::core::registry::Registry;
use chaos::core::types::FaultDefinition;
use chaos::error::ChaosError;
use chaos::inject::{InjectOptions, inject};
use chaos::io::confirm::AssumeYes;
use chaos::restore::{RestoreOutcome, restore};
use chaos::test_support::{TestProject, fault};

fn registry(faults: Vec<FaultDefinition>) -> Registry {
    Registry::new(faults).expect("registry")
}

fn restore_all(tp: &TestProject) -> chaos::io::backup::RestoreReport {
    match restore(&tp.project, &AssumeYes).expect("restore") {
        RestoreOutcome::Restored(report) => report,
        other => panic!("expected a restore, got {other:?}"),
    }
}

#[test]
fn round_trip_restores_exact_bytes() {
    let tp = TestProject::new();
    let def = fault("syntax", &["src/Home.jsx"], "t/syntax.template.jsx");
    tp.write_templates(&def);
    let original = "export default () => <main>\r\n  héllo\t</main>;\n\n";
    tp.write("src/Home.jsx", original);

    inject(&tp.project, &registry(vec![def]), "syntax", InjectOptions::default()).expect("inject");
    assert_ne!(tp.read("src/Home.jsx"), original);

    restore_all(&tp);
    assert_eq!(tp.read("src/Home.jsx"), original);
}

#[test]
fn created_targets_are_deleted_on_restore() {
    let tp = TestProject::new();
    let def = fault("new-file", &["src/generated.js"], "t/new.template.js");
    tp.write_templates(&def);

    let outcome = inject(&tp.project, &registry(vec![def]), "new-file", InjectOptions::default())
        .expect("inject");
    assert_eq!(outcome.missing, vec!["src/generated.js"]);
    assert_eq!(tp.read("src/generated.js"), tp.read("t/new.template.js"));

    let report = restore_all(&tp);
    assert_eq!(report.removed, vec!["src/generated.js"]);
    assert!(!tp.exists("src/generated.js"));
}

#[test]
fn restore_without_backup_changes_nothing() {
    let tp = TestProject::new();
    tp.write("src/App.jsx", "app");

    let outcome = restore(&tp.project, &AssumeYes).expect("restore");
    assert_eq!(outcome, RestoreOutcome::NothingToRestore);
    assert_eq!(tp.read("src/App.jsx"), "app");
    assert!(!tp.exists(".chaos-backup"));
}

#[test]
fn backup_succeeds_when_some_targets_are_missing() {
    let tp = TestProject::new();
    tp.write("b.js", "B");

    let report = tp
        .project
        .backups()
        .create_backup(&["a.js".to_string(), "b.js".to_string()], "partial")
        .expect("backup");
    assert_eq!(report.files, vec!["b.js"]);
    assert_eq!(report.missing_files, vec!["a.js"]);

    let manifest = tp.project.backups().get_backup_info().expect("manifest");
    assert_eq!(manifest.missing_files, vec!["a.js"]);
    assert_eq!(manifest.files, vec!["b.js"]);
}

#[test]
fn override_template_applies_only_to_its_target() {
    let tp = TestProject::new();
    let mut def = fault("pair", &["a.js", "b.js"], "t/primary.template.js");
    def.additional_templates
        .insert("b.js".to_string(), "t/override.template.js".to_string());
    tp.write_templates(&def);
    tp.write("a.js", "A");
    tp.write("b.js", "B");

    inject(&tp.project, &registry(vec![def]), "pair", InjectOptions::default()).expect("inject");
    assert_eq!(tp.read("a.js"), tp.read("t/primary.template.js"));
    assert_eq!(tp.read("b.js"), tp.read("t/override.template.js"));
    assert_ne!(tp.read("a.js"), tp.read("b.js"));
}

/// Forced re-injection keeps only the last manifest; restore reverses only the
/// second fault's targets.
#[test]
fn forced_reinjection_restores_last_fault_only() {
    let tp = TestProject::new();
    let first = fault("first", &["a.js"], "t/first.template.js");
    let second = fault("second", &["b.js"], "t/second.template.js");
    tp.write_templates(&first);
    tp.write_templates(&second);
    tp.write("a.js", "A");
    tp.write("b.js", "B");
    let reg = registry(vec![first, second]);

    inject(&tp.project, &reg, "first", InjectOptions::default()).expect("first");
    inject(&tp.project, &reg, "second", InjectOptions { force: true }).expect("second");

    let manifest = tp.project.backups().get_backup_info().expect("manifest");
    assert_eq!(manifest.fault_type, "second");

    let report = restore_all(&tp);
    assert_eq!(report.fault_type, "second");
    assert_eq!(tp.read("b.js"), "B");
    // The first fault's mutation is not covered by the last manifest.
    assert_eq!(tp.read("a.js"), tp.read("t/first.template.js"));
}

#[test]
fn reinjection_without_force_is_refused() {
    let tp = TestProject::new();
    let def = fault("once", &["a.js"], "t/once.template.js");
    tp.write_templates(&def);
    tp.write("a.js", "A");
    let reg = registry(vec![def]);

    inject(&tp.project, &reg, "once", InjectOptions::default()).expect("first");
    let err = inject(&tp.project, &reg, "once", InjectOptions::default()).unwrap_err();
    assert!(matches!(err, ChaosError::AlreadyInjected { .. }));

    restore_all(&tp);
    assert_eq!(tp.read("a.js"), "A");
}

#[test]
fn circular_dependency_two_file_scenario() {
    let tp = TestProject::new();
    let def = fault(
        "circular-dependency",
        &["a.js", "b.js"],
        "t/circular-dependency.template.js",
    );
    tp.write_templates(&def);
    tp.write("a.js", "original-a");
    tp.write("b.js", "original-b");

    inject(
        &tp.project,
        &registry(vec![def]),
        "circular-dependency",
        InjectOptions::default(),
    )
    .expect("inject");
    let template = tp.read("t/circular-dependency.template.js");
    assert_eq!(tp.read("a.js"), template);
    assert_eq!(tp.read("b.js"), template);

    restore_all(&tp);
    assert_eq!(tp.read("a.js"), "original-a");
    assert_eq!(tp.read("b.js"), "original-b");
    assert!(!tp.exists(".chaos-backup"));
}

#[test]
fn build_out_of_memory_scenario() {
    let tp = TestProject::new();
    let def = fault(
        "build-out-of-memory",
        &["large.js", "App.jsx"],
        "t/oom.template.js",
    );
    tp.write_templates(&def);
    tp.write("App.jsx", "original-app");

    inject(
        &tp.project,
        &registry(vec![def]),
        "build-out-of-memory",
        InjectOptions::default(),
    )
    .expect("inject");
    assert_eq!(tp.read("large.js"), tp.read("t/oom.template.js"));
    assert_ne!(tp.read("App.jsx"), "original-app");

    restore_all(&tp);
    assert!(!tp.exists("large.js"));
    assert_eq!(tp.read("App.jsx"), "original-app");
}

/// Built-in faults inject and restore cleanly once their templates exist.
#[test]
fn builtin_circular_dependency_round_trip() {
    let tp = TestProject::new();
    let reg = Registry::builtin();
    let def = reg.require("circular-dependency").expect("builtin").clone();
    tp.write_templates(&def);
    for target in &def.target_files {
        tp.write(target, &format!("original {target}"));
    }

    let outcome = inject(&tp.project, &reg, "circular-dependency", InjectOptions::default())
        .expect("inject");
    assert_eq!(outcome.injected.len(), def.target_files.len());
    for target in &def.target_files {
        assert_eq!(tp.read(target), tp.read(def.template_for(target)));
    }

    restore_all(&tp);
    for target in &def.target_files {
        assert_eq!(tp.read(target), format!("original {target}"));
    }
    assert!(!tp.exists(".chaos-backup"));
}

#[test]
fn corrupt_manifest_blocks_restore_and_inject() {
    let tp = TestProject::new();
    let def = fault("f", &["a.js"], "t/f.template.js");
    tp.write_templates(&def);
    tp.write("a.js", "A");
    tp.write(".chaos-backup/metadata.json", "{\"backupId\": ");
    let reg = registry(vec![def]);

    assert!(matches!(
        restore(&tp.project, &AssumeYes).unwrap_err(),
        ChaosError::CorruptManifest { .. }
    ));
    assert!(matches!(
        inject(&tp.project, &reg, "f", InjectOptions::default()).unwrap_err(),
        ChaosError::CorruptManifest { .. }
    ));
    assert_eq!(tp.read("a.js"), "A");

    // --force discards the unusable backup and starts over.
    inject(&tp.project, &reg, "f", InjectOptions { force: true }).expect("forced inject");
    restore_all(&tp);
    assert_eq!(tp.read("a.js"), "A");
}

#[test]
fn manifest_write_leaves_no_temp_file() {
    let tp = TestProject::new();
    tp.write("a.js", "A");
    tp.project
        .backups()
        .create_backup(&["a.js".to_string()], "f")
        .expect("backup");

    let leftovers: Vec<_> = std::fs::read_dir(tp.root().join(".chaos-backup"))
        .expect("read backup dir")
        .map(|entry| entry.expect("entry").file_name())
        .filter(|name| name.to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty(), "{leftovers:?}");
}
