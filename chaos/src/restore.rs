//! Orchestration for `chaos restore`.

use tracing::info;

use crate::core::manifest::BackupState;
use crate::error::Result;
use crate::io::backup::RestoreReport;
use crate::io::confirm::Confirm;
use crate::io::project::Project;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// No manifest; nothing was touched.
    NothingToRestore,
    /// The operator declined; nothing was touched.
    Cancelled { fault_type: String },
    Restored(RestoreReport),
}

/// Reverse the current injection, then delete the backup root.
///
/// A corrupt manifest is returned as an error before any file is touched.
pub fn restore(project: &Project, confirm: &impl Confirm) -> Result<RestoreOutcome> {
    let backups = project.backups();
    let manifest = match backups.state()? {
        BackupState::Clean => {
            info!("no backup present, nothing to restore");
            return Ok(RestoreOutcome::NothingToRestore);
        }
        BackupState::Injected(manifest) => manifest,
    };

    let prompt = format!(
        "Restore {} file(s) from backup {} (fault '{}')?",
        manifest.files.len() + manifest.missing_files.len(),
        manifest.backup_id,
        manifest.fault_type
    );
    if !confirm.confirm(&prompt)? {
        info!(backup_id = %manifest.backup_id, "restore cancelled by operator");
        return Ok(RestoreOutcome::Cancelled {
            fault_type: manifest.fault_type,
        });
    }

    let report = backups.restore_backup()?;
    backups.clean_backup()?;
    Ok(RestoreOutcome::Restored(report))
}
