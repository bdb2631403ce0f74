//! Snapshot-and-restore of target files.
//!
//! Layout under the project root:
//!
//! ```text
//! .chaos-backup/
//!   metadata.json        # BackupManifest
//!   <backupId>/          # byte-for-byte copies at their original relative paths
//! ```
//!
//! The manifest file is the backup slot: its presence means `Injected`, its
//! absence means `Clean`. It is written atomically after every snapshot copy
//! has landed, so a manifest never references a copy that was not attempted.

use std::path::PathBuf;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use jsonschema::{Draft, Validator};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::core::manifest::{BackupManifest, BackupState};
use crate::core::path::validate_relative_path;
use crate::error::{ChaosError, Result};
use crate::io::file_store::FileStore;
use crate::io::project::ChaosPaths;

const MANIFEST_SCHEMA: &str = include_str!("../../schemas/backup_manifest.schema.json");

static MANIFEST_VALIDATOR: LazyLock<Validator> = LazyLock::new(|| {
    let schema: Value =
        serde_json::from_str(MANIFEST_SCHEMA).expect("bundled manifest schema is valid json");
    jsonschema::options()
        .with_draft(Draft::Draft202012)
        .build(&schema)
        .expect("bundled manifest schema compiles")
});

/// Result of snapshotting a fault's targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupReport {
    pub backup_id: String,
    /// Targets copied into the snapshot, in order.
    pub files: Vec<String>,
    /// Targets that did not exist; restore will delete them.
    pub missing_files: Vec<String>,
    /// Snapshot directory, relative to the project root.
    pub snapshot_dir: PathBuf,
}

/// Result of reversing an injection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoreReport {
    pub backup_id: String,
    pub fault_type: String,
    pub timestamp: DateTime<Utc>,
    /// Files copied back from the snapshot.
    pub restored: Vec<String>,
    /// Files created by the injection and deleted again.
    pub removed: Vec<String>,
    /// Manifest entries whose snapshot copy was missing.
    pub skipped: Vec<String>,
    /// Restored files whose fingerprint differs from the recorded one.
    pub fingerprint_mismatches: Vec<String>,
}

/// A snapshot directory found under the backup root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotDir {
    pub backup_id: String,
    pub path: PathBuf,
    /// False when no manifest references this directory.
    pub referenced: bool,
}

pub struct BackupManager<'a> {
    store: &'a FileStore,
    paths: &'a ChaosPaths,
}

impl<'a> BackupManager<'a> {
    pub fn new(store: &'a FileStore, paths: &'a ChaosPaths) -> Self {
        Self { store, paths }
    }

    /// Whether a manifest file exists. Does not read it.
    pub fn has_backup(&self) -> bool {
        self.store.exists(&self.paths.manifest_path)
    }

    /// Current slot state. A manifest that fails to load is `CorruptManifest`.
    pub fn state(&self) -> Result<BackupState> {
        match self.load_manifest() {
            Ok(manifest) => Ok(BackupState::Injected(manifest)),
            Err(ChaosError::NoBackup) => Ok(BackupState::Clean),
            Err(err) => Err(err),
        }
    }

    /// The current manifest, or `None` if it is absent or unusable.
    pub fn get_backup_info(&self) -> Option<BackupManifest> {
        match self.load_manifest() {
            Ok(manifest) => Some(manifest),
            Err(ChaosError::NoBackup) => None,
            Err(err) => {
                debug!(error = %err, "ignoring unusable manifest");
                None
            }
        }
    }

    /// Snapshot `files` and persist a manifest for `fault_type`.
    ///
    /// Absent targets are recorded in `missing_files` and skipped; any other
    /// filesystem failure aborts before the manifest is written.
    pub fn create_backup(&self, files: &[String], fault_type: &str) -> Result<BackupReport> {
        for file in files {
            validate_relative_path(file)?;
        }
        self.store.create_dir(&self.paths.backup_dir)?;

        let mut manifest = BackupManifest::new(fault_type, Utc::now());
        let snapshot_dir = self.snapshot_dir(&manifest.backup_id);
        debug!(backup_id = %manifest.backup_id, fault_type, targets = files.len(), "creating backup");

        for file in files {
            if !self.store.exists(file) {
                warn!(file = %file, "target does not exist, recording as missing");
                manifest.missing_files.push(file.clone());
                continue;
            }
            self.store.copy(file, snapshot_dir.join(file))?;
            let hash = self.store.fingerprint(file)?;
            manifest.file_hashes.insert(file.clone(), hash);
            manifest.files.push(file.clone());
        }

        self.store.write_json(&self.paths.manifest_path, &manifest)?;
        info!(
            backup_id = %manifest.backup_id,
            files = manifest.files.len(),
            missing = manifest.missing_files.len(),
            "backup created"
        );

        Ok(BackupReport {
            backup_id: manifest.backup_id,
            files: manifest.files,
            missing_files: manifest.missing_files,
            snapshot_dir,
        })
    }

    /// Put every backed-up file back and delete files the injection created.
    ///
    /// Fails with `NoBackup` when there is no manifest. Missing snapshot copies
    /// are skipped with a warning. Does not remove the backup; see
    /// [`BackupManager::clean_backup`].
    pub fn restore_backup(&self) -> Result<RestoreReport> {
        let manifest = self.load_manifest()?;
        let snapshot_dir = self.snapshot_dir(&manifest.backup_id);
        debug!(backup_id = %manifest.backup_id, "restoring backup");

        let mut restored = Vec::new();
        let mut skipped = Vec::new();
        let mut fingerprint_mismatches = Vec::new();
        for file in &manifest.files {
            let snapshot = snapshot_dir.join(file);
            if !self.store.exists(&snapshot) {
                warn!(file = %file, snapshot = %snapshot.display(), "snapshot copy missing, skipping");
                skipped.push(file.clone());
                continue;
            }
            self.store.copy(&snapshot, file)?;
            restored.push(file.clone());

            if let Some(expected) = manifest.file_hashes.get(file) {
                let actual = self.store.fingerprint(file)?;
                if &actual != expected {
                    warn!(file = %file, %expected, %actual, "restored content fingerprint differs");
                    fingerprint_mismatches.push(file.clone());
                }
            }
        }

        let mut removed = Vec::new();
        for file in &manifest.missing_files {
            if self.store.exists(file) {
                self.store.remove(file)?;
                removed.push(file.clone());
            }
        }

        info!(
            backup_id = %manifest.backup_id,
            restored = restored.len(),
            removed = removed.len(),
            skipped = skipped.len(),
            "backup restored"
        );
        Ok(RestoreReport {
            backup_id: manifest.backup_id,
            fault_type: manifest.fault_type,
            timestamp: manifest.timestamp,
            restored,
            removed,
            skipped,
            fingerprint_mismatches,
        })
    }

    /// Delete the whole backup root (manifest and snapshots). Idempotent.
    pub fn clean_backup(&self) -> Result<()> {
        debug!(dir = %self.paths.backup_dir.display(), "cleaning backup root");
        self.store.remove_dir(&self.paths.backup_dir)
    }

    /// Snapshot directories under the backup root, flagging unreferenced ones.
    pub fn list_snapshots(&self) -> Result<Vec<SnapshotDir>> {
        let current = self.get_backup_info().map(|manifest| manifest.backup_id);
        let mut snapshots = Vec::new();
        for path in self.store.subdirectories(&self.paths.backup_dir)? {
            let Some(backup_id) = path.file_name().and_then(|n| n.to_str()).map(str::to_string)
            else {
                continue;
            };
            snapshots.push(SnapshotDir {
                referenced: current.as_deref() == Some(backup_id.as_str()),
                backup_id,
                path,
            });
        }
        Ok(snapshots)
    }

    fn snapshot_dir(&self, backup_id: &str) -> PathBuf {
        self.paths.backup_dir.join(backup_id)
    }

    fn load_manifest(&self) -> Result<BackupManifest> {
        let path = &self.paths.manifest_path;
        if !self.has_backup() {
            return Err(ChaosError::NoBackup);
        }
        let corrupt = |reason: String| ChaosError::CorruptManifest {
            path: path.clone(),
            reason,
        };

        let value: Value = match self.store.read_json(path) {
            Ok(value) => value,
            Err(ChaosError::Json { source, .. }) => return Err(corrupt(source.to_string())),
            Err(err) => return Err(err),
        };
        let messages: Vec<String> = MANIFEST_VALIDATOR
            .iter_errors(&value)
            .map(|err| err.to_string())
            .collect();
        if !messages.is_empty() {
            return Err(corrupt(messages.join("; ")));
        }
        let manifest: BackupManifest =
            serde_json::from_value(value).map_err(|err| corrupt(err.to_string()))?;
        let errors = manifest.validate();
        if !errors.is_empty() {
            return Err(corrupt(errors.join("; ")));
        }
        Ok(manifest)
    }
}
