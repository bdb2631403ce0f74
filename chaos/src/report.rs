//! Human-readable command output.
//!
//! Rendering is pure: every function returns the text that `main` prints to
//! stdout. Diagnostics go through `tracing` instead.

use std::path::PathBuf;

use crate::core::manifest::{BackupManifest, BackupState};
use crate::core::registry::Registry;
use crate::core::types::{FaultDefinition, Severity};
use crate::error::{ChaosError, Result};
use crate::inject::InjectOutcome;
use crate::io::backup::SnapshotDir;
use crate::io::project::Project;
use crate::io::template::TemplateValidation;
use crate::restore::RestoreOutcome;

/// What `chaos status` knows about a project.
#[derive(Debug, Clone)]
pub struct StatusReport {
    pub root: PathBuf,
    pub config_path: PathBuf,
    pub config_present: bool,
    pub slot: SlotStatus,
    pub snapshots: Vec<SnapshotDir>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotStatus {
    Clean,
    Injected(BackupManifest),
    Corrupt(String),
}

pub fn collect_status(project: &Project) -> Result<StatusReport> {
    let backups = project.backups();
    let slot = match backups.state() {
        Ok(BackupState::Clean) => SlotStatus::Clean,
        Ok(BackupState::Injected(manifest)) => SlotStatus::Injected(manifest),
        Err(err @ ChaosError::CorruptManifest { .. }) => SlotStatus::Corrupt(err.to_string()),
        Err(err) => return Err(err),
    };
    let config_path = project.paths().config_path.clone();
    Ok(StatusReport {
        root: project.root().to_path_buf(),
        config_present: project.store().exists(&config_path),
        config_path,
        slot,
        snapshots: backups.list_snapshots()?,
    })
}

pub fn render_list(registry: &Registry) -> String {
    let mut out = vec!["Available faults:".to_string()];
    for (category, faults) in registry.get_faults_by_category() {
        if faults.is_empty() {
            continue;
        }
        out.push(String::new());
        out.push(format!("{} ({}):", category.title(), category));
        for fault in faults {
            out.push(format!(
                "  {:<28} [{}] {}",
                fault.id, fault.severity, fault.name
            ));
        }
    }

    let stats = registry.get_fault_stats();
    let severities: Vec<String> = Severity::ALL
        .iter()
        .map(|severity| format!("{}: {}", severity, stats.by_severity[severity]))
        .collect();
    out.push(String::new());
    out.push(format!(
        "Total: {} faults ({})",
        stats.total,
        severities.join(", ")
    ));
    finish(out)
}

/// `fault` plus the validation result of each template it references.
///
/// The primary template (first validation) is previewed up to
/// `preview_lines` lines.
pub fn render_info(
    fault: &FaultDefinition,
    templates: &[TemplateValidation],
    preview_lines: usize,
) -> String {
    let mut out = vec![
        format!("{} ({})", fault.name, fault.id),
        format!("  category:       {}", fault.category.title()),
        format!("  severity:       {}", fault.severity),
        format!("  description:    {}", fault.description),
        format!("  expected error: {}", fault.expected_error),
        format!("  build fails:    {}", yes_no(fault.build_fails)),
        format!("  deploy fails:   {}", yes_no(fault.deploy_fails)),
        "  targets:".to_string(),
    ];
    for target in &fault.target_files {
        let template = fault.template_for(target);
        if template == fault.template_file {
            out.push(format!("    {target}"));
        } else {
            out.push(format!("    {target} (override: {template})"));
        }
    }
    if let Some(note) = &fault.note {
        out.push(format!("  note:           {note}"));
    }

    out.push("  templates:".to_string());
    for validation in templates {
        let status = if validation.valid { "ok" } else { "invalid" };
        out.push(format!("    {} [{}]", validation.path.display(), status));
        for error in &validation.errors {
            out.push(format!("      - {error}"));
        }
    }

    if let Some(template) = templates.first().and_then(|v| v.template.as_ref()) {
        let total = template.content.lines().count();
        out.push(String::new());
        out.push(format!("Template preview ({}):", template.path.display()));
        for line in template.content.lines().take(preview_lines) {
            out.push(format!("  | {line}"));
        }
        if total > preview_lines {
            out.push(format!("  | ... ({} more lines)", total - preview_lines));
        }
    }
    finish(out)
}

pub fn render_status(status: &StatusReport) -> String {
    let mut out = vec![format!("Project: {}", status.root.display())];
    out.push(format!(
        "Config:  {} ({})",
        status.config_path.display(),
        if status.config_present { "present" } else { "defaults" }
    ));
    match &status.slot {
        SlotStatus::Clean => out.push("State:   clean".to_string()),
        SlotStatus::Injected(manifest) => {
            out.push(format!("State:   injected ({})", manifest.fault_type));
            out.push(format!("  backup:  {}", manifest.backup_id));
            out.push(format!("  taken:   {}", manifest.timestamp.to_rfc3339()));
            out.push(format!("  files:   {}", manifest.files.len()));
            out.push(format!("  created: {}", manifest.missing_files.len()));
        }
        SlotStatus::Corrupt(reason) => {
            out.push("State:   corrupt backup".to_string());
            out.push(format!("  {reason}"));
        }
    }
    let orphans: Vec<&SnapshotDir> = status.snapshots.iter().filter(|s| !s.referenced).collect();
    if !orphans.is_empty() {
        out.push("Orphaned snapshots:".to_string());
        for snapshot in orphans {
            out.push(format!("  {}", snapshot.path.display()));
        }
    }
    finish(out)
}

pub fn render_templates(validations: &[TemplateValidation]) -> String {
    if validations.is_empty() {
        return "No templates found.\n".to_string();
    }
    let mut out = Vec::new();
    for validation in validations {
        let fault_type = validation
            .template
            .as_ref()
            .and_then(|t| t.metadata.fault_type())
            .unwrap_or("-");
        let status = if validation.valid { "ok" } else { "invalid" };
        out.push(format!(
            "{:<8} {:<24} {}",
            status,
            fault_type,
            validation.path.display()
        ));
        for error in &validation.errors {
            out.push(format!("           - {error}"));
        }
    }
    let invalid = validations.iter().filter(|v| !v.valid).count();
    out.push(String::new());
    out.push(format!(
        "{} template(s), {} invalid",
        validations.len(),
        invalid
    ));
    finish(out)
}

pub fn render_inject(outcome: &InjectOutcome) -> String {
    let mut out = Vec::new();
    if let Some(previous) = &outcome.replaced {
        out.push(format!("Discarded unrestored injection of '{previous}'."));
    }
    out.push(format!(
        "Injected '{}' (backup {}).",
        outcome.fault.id, outcome.backup_id
    ));
    for file in &outcome.backed_up {
        out.push(format!("  backed up: {file}"));
    }
    for file in &outcome.missing {
        out.push(format!("  created:   {file}"));
    }
    for file in &outcome.injected {
        out.push(format!("  injected:  {} <- {}", file.path, file.template));
    }
    out.push(format!("Expected error: {}", outcome.fault.expected_error));
    out.push(format!(
        "Build fails: {}, deploy fails: {}",
        yes_no(outcome.fault.build_fails),
        yes_no(outcome.fault.deploy_fails)
    ));
    if let Some(note) = &outcome.fault.note {
        out.push(format!("Note: {note}"));
    }
    out.push("Run `chaos restore` to revert.".to_string());
    finish(out)
}

pub fn render_restore(outcome: &RestoreOutcome) -> String {
    match outcome {
        RestoreOutcome::NothingToRestore => "Nothing to restore.\n".to_string(),
        RestoreOutcome::Cancelled { fault_type } => {
            format!("Restore cancelled; '{fault_type}' is still injected.\n")
        }
        RestoreOutcome::Restored(report) => {
            let mut out = vec![format!(
                "Restored '{}' (backup {}).",
                report.fault_type, report.backup_id
            )];
            for file in &report.restored {
                out.push(format!("  restored: {file}"));
            }
            for file in &report.removed {
                out.push(format!("  removed:  {file}"));
            }
            for file in &report.skipped {
                out.push(format!("  skipped:  {file} (snapshot missing)"));
            }
            for file in &report.fingerprint_mismatches {
                out.push(format!("  changed:  {file} (fingerprint differs)"));
            }
            finish(out)
        }
    }
}

fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}

fn finish(lines: Vec<String>) -> String {
    let mut text = lines.join("\n");
    text.push('\n');
    text
}
