//! Checks for repository-relative target paths.

use std::path::{Component, Path};

use crate::error::{ChaosError, Result};

/// Ensure `path` is a plain relative path that stays inside the project root.
///
/// Snapshot copies are stored under `<backup>/<id>/<path>`, so absolute paths
/// and `..` components are rejected.
pub fn validate_relative_path(path: &str) -> Result<()> {
    let invalid = |reason: &str| ChaosError::InvalidPath {
        path: path.to_string(),
        reason: reason.to_string(),
    };
    if path.trim().is_empty() {
        return Err(invalid("must not be empty"));
    }
    for component in Path::new(path).components() {
        match component {
            Component::Normal(_) | Component::CurDir => {}
            Component::ParentDir => return Err(invalid("must not contain '..'")),
            Component::RootDir | Component::Prefix(_) => {
                return Err(invalid("must be relative to the project root"));
            }
        }
    }
    Ok(())
}
