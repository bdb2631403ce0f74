//! Backup manifest and the two-state backup slot.

use std::collections::BTreeMap;

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::core::path::validate_relative_path;

/// Persisted record of one injection (`<backup_dir>/metadata.json`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupManifest {
    /// Sortable token derived from `timestamp`; names the snapshot directory.
    pub backup_id: String,
    pub timestamp: DateTime<Utc>,
    /// Registry id of the fault that produced this manifest.
    pub fault_type: String,
    /// Targets that existed and were snapshotted, in injection order.
    pub files: Vec<String>,
    /// Targets that did not exist before injection; restore deletes them.
    #[serde(default)]
    pub missing_files: Vec<String>,
    /// Advisory fingerprints of the snapshotted content.
    #[serde(default)]
    pub file_hashes: BTreeMap<String, String>,
}

impl BackupManifest {
    /// Start an empty manifest stamped with `now` (truncated to milliseconds).
    pub fn new(fault_type: &str, now: DateTime<Utc>) -> Self {
        let timestamp = now.trunc_subsecs(3);
        Self {
            backup_id: backup_id_for(timestamp),
            timestamp,
            fault_type: fault_type.to_string(),
            files: Vec::new(),
            missing_files: Vec::new(),
            file_hashes: BTreeMap::new(),
        }
    }

    /// Semantic checks not covered by the JSON schema.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.backup_id.trim().is_empty() {
            errors.push("backupId must not be empty".to_string());
        } else if self.backup_id.contains(['/', '\\']) || self.backup_id.contains("..") {
            errors.push(format!("backupId '{}' is not a plain name", self.backup_id));
        }
        for path in self.files.iter().chain(&self.missing_files) {
            if let Err(err) = validate_relative_path(path) {
                errors.push(err.to_string());
            }
        }
        errors
    }
}

/// `2026-10-19T08:15:30.123Z` -> `2026-10-19T08-15-30-123Z`.
pub fn backup_id_for(timestamp: DateTime<Utc>) -> String {
    timestamp
        .format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string()
        .replace([':', '.'], "-")
}

/// The single pending-injection slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackupState {
    /// No manifest: nothing to restore.
    Clean,
    /// One manifest describing the most recent injection.
    Injected(BackupManifest),
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(ms: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 8, 15, 30)
            .single()
            .expect("valid date")
            + chrono::Duration::milliseconds(i64::from(ms))
    }

    #[test]
    fn backup_id_replaces_colons_and_dots() {
        assert_eq!(backup_id_for(at(123)), "2026-10-19T08-15-30-123Z");
    }

    #[test]
    fn backup_ids_sort_chronologically() {
        let earlier = backup_id_for(at(5));
        let later = backup_id_for(at(900));
        assert!(earlier < later);
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let mut manifest = BackupManifest::new("syntax-error", at(1));
        manifest.files.push("src/App.jsx".to_string());
        manifest.missing_files.push("src/new.js".to_string());
        manifest
            .file_hashes
            .insert("src/App.jsx".to_string(), "abc".to_string());

        let value = serde_json::to_value(&manifest).expect("serialize");
        assert_eq!(value["backupId"], "2026-10-19T08-15-30-001Z");
        assert_eq!(value["timestamp"], "2026-10-19T08:15:30.001Z");
        assert_eq!(value["faultType"], "syntax-error");
        assert_eq!(value["missingFiles"][0], "src/new.js");
        assert_eq!(value["fileHashes"]["src/App.jsx"], "abc");
    }

    #[test]
    fn optional_lists_default_when_absent() {
        let raw = r#"{"backupId":"x","timestamp":"2026-10-19T08:15:30.001Z","faultType":"f","files":["a.js"]}"#;
        let manifest: BackupManifest = serde_json::from_str(raw).expect("parse");
        assert!(manifest.missing_files.is_empty());
        assert!(manifest.file_hashes.is_empty());
    }

    #[test]
    fn validate_rejects_escaping_entries() {
        let mut manifest = BackupManifest::new("f", at(0));
        manifest.files.push("../outside".to_string());
        manifest.backup_id = "../x".to_string();
        let errors = manifest.validate();
        assert_eq!(errors.len(), 2);
    }
}
