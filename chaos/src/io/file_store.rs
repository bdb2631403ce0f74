//! Filesystem access rooted at the project directory.
//!
//! Relative paths are resolved against the project root; absolute paths are
//! used as given. Nothing here parses or validates file content.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use walkdir::WalkDir;

use crate::core::fingerprint::fingerprint_bytes;
use crate::error::{ChaosError, Result};

#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute path for `path`.
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    pub fn exists(&self, path: impl AsRef<Path>) -> bool {
        self.resolve(path).exists()
    }

    /// Read a UTF-8 file. Fails with `NotFound` if it does not exist.
    pub fn read(&self, path: impl AsRef<Path>) -> Result<String> {
        let full = self.resolve(path);
        fs::read_to_string(&full).map_err(|err| not_found_or_io("read", full, err))
    }

    pub fn read_bytes(&self, path: impl AsRef<Path>) -> Result<Vec<u8>> {
        let full = self.resolve(path);
        fs::read(&full).map_err(|err| not_found_or_io("read", full, err))
    }

    /// Write `contents`, creating parent directories and replacing any existing file.
    ///
    /// Not atomic: a crash mid-write can leave a partial file.
    pub fn write(&self, path: impl AsRef<Path>, contents: impl AsRef<[u8]>) -> Result<()> {
        let full = self.resolve(path);
        ensure_parent(&full)?;
        fs::write(&full, contents).map_err(|err| ChaosError::io("write", full, err))
    }

    /// Write to a sibling temp file, then rename over `path`.
    pub fn write_atomic(&self, path: impl AsRef<Path>, contents: impl AsRef<[u8]>) -> Result<()> {
        let full = self.resolve(path);
        ensure_parent(&full)?;
        let mut tmp_name = full.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        tmp_name.push(".tmp");
        let tmp_path = full.with_file_name(tmp_name);
        fs::write(&tmp_path, contents)
            .map_err(|err| ChaosError::io("write temp file", &tmp_path, err))?;
        fs::rename(&tmp_path, &full).map_err(|err| ChaosError::io("replace", full, err))
    }

    /// Copy `src` to `dst` byte-for-byte, creating `dst`'s parent directories.
    pub fn copy(&self, src: impl AsRef<Path>, dst: impl AsRef<Path>) -> Result<()> {
        let src = self.resolve(src);
        let dst = self.resolve(dst);
        if !src.exists() {
            return Err(ChaosError::NotFound { path: src });
        }
        if !src.is_file() {
            return Err(ChaosError::InvalidPath {
                path: src.display().to_string(),
                reason: "not a regular file".to_string(),
            });
        }
        ensure_parent(&dst)?;
        debug!(src = %src.display(), dst = %dst.display(), "copy");
        fs::copy(&src, &dst).map_err(|err| ChaosError::io("copy to", dst, err))?;
        Ok(())
    }

    /// Delete a file; no-op if it does not exist.
    pub fn remove(&self, path: impl AsRef<Path>) -> Result<()> {
        let full = self.resolve(path);
        match fs::remove_file(&full) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(ChaosError::io("remove", full, err)),
        }
    }

    pub fn create_dir(&self, path: impl AsRef<Path>) -> Result<()> {
        let full = self.resolve(path);
        fs::create_dir_all(&full).map_err(|err| ChaosError::io("create directory", full, err))
    }

    /// Recursively delete a directory; no-op if it does not exist.
    pub fn remove_dir(&self, path: impl AsRef<Path>) -> Result<()> {
        let full = self.resolve(path);
        match fs::remove_dir_all(&full) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(ChaosError::io("remove directory", full, err)),
        }
    }

    /// Files under `dir`, sorted, as paths relative to the project root.
    ///
    /// Returns an empty list if `dir` does not exist.
    pub fn list(&self, dir: impl AsRef<Path>, recursive: bool) -> Result<Vec<PathBuf>> {
        let full = self.resolve(dir);
        if !full.is_dir() {
            return Ok(Vec::new());
        }
        let max_depth = if recursive { usize::MAX } else { 1 };
        let mut files = Vec::new();
        for entry in WalkDir::new(&full)
            .min_depth(1)
            .max_depth(max_depth)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|err| walk_error(&full, err))?;
            if entry.file_type().is_file() {
                files.push(self.relativize(entry.path()));
            }
        }
        Ok(files)
    }

    /// Immediate child directories of `dir`, sorted, relative to the project root.
    pub fn subdirectories(&self, dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
        let full = self.resolve(dir);
        if !full.is_dir() {
            return Ok(Vec::new());
        }
        let mut dirs = Vec::new();
        for entry in WalkDir::new(&full)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|err| walk_error(&full, err))?;
            if entry.file_type().is_dir() {
                dirs.push(self.relativize(entry.path()));
            }
        }
        Ok(dirs)
    }

    /// Advisory content fingerprint (see [`crate::core::fingerprint`]).
    pub fn fingerprint(&self, path: impl AsRef<Path>) -> Result<String> {
        Ok(fingerprint_bytes(&self.read_bytes(path)?))
    }

    pub fn read_json<T: DeserializeOwned>(&self, path: impl AsRef<Path>) -> Result<T> {
        let full = self.resolve(path);
        let contents = self.read(&full)?;
        serde_json::from_str(&contents).map_err(|source| ChaosError::Json { path: full, source })
    }

    /// Pretty-printed JSON with a trailing newline, written atomically.
    pub fn write_json<T: Serialize>(&self, path: impl AsRef<Path>, value: &T) -> Result<()> {
        let full = self.resolve(path);
        let mut buf = serde_json::to_string_pretty(value).map_err(|source| ChaosError::Json {
            path: full.clone(),
            source,
        })?;
        buf.push('\n');
        self.write_atomic(full, buf)
    }

    fn relativize(&self, path: &Path) -> PathBuf {
        path.strip_prefix(&self.root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| path.to_path_buf())
    }
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|err| ChaosError::io("create directory", parent, err))?;
    }
    Ok(())
}

fn not_found_or_io(action: &'static str, path: PathBuf, err: std::io::Error) -> ChaosError {
    if err.kind() == ErrorKind::NotFound {
        ChaosError::NotFound { path }
    } else {
        ChaosError::io(action, path, err)
    }
}

fn walk_error(dir: &Path, err: walkdir::Error) -> ChaosError {
    let path = err.path().map(Path::to_path_buf).unwrap_or_else(|| dir.to_path_buf());
    let source = err
        .into_io_error()
        .unwrap_or_else(|| std::io::Error::other("filesystem loop detected"));
    ChaosError::io("walk", path, source)
}
