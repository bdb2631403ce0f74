//! Project handle: root directory, configuration and canonical paths.

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::io::backup::BackupManager;
use crate::io::config::{CONFIG_FILE, ChaosConfig, load_config};
use crate::io::file_store::FileStore;
use crate::io::template::TemplateLoader;

/// Canonical paths for a project, relative to its root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChaosPaths {
    pub config_path: PathBuf,
    pub backup_dir: PathBuf,
    pub manifest_path: PathBuf,
    pub templates_dir: PathBuf,
}

impl ChaosPaths {
    pub fn new(config: &ChaosConfig) -> Self {
        let backup_dir = PathBuf::from(&config.backup_dir);
        Self {
            config_path: PathBuf::from(CONFIG_FILE),
            manifest_path: backup_dir.join(&config.manifest_file),
            backup_dir,
            templates_dir: PathBuf::from(&config.templates_dir),
        }
    }
}

/// Everything a command needs to act on one target project.
#[derive(Debug, Clone)]
pub struct Project {
    store: FileStore,
    config: ChaosConfig,
    paths: ChaosPaths,
}

impl Project {
    /// Open `root`, reading `chaos.toml` if present.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let config = load_config(&root)?;
        Ok(Self::with_config(root, config))
    }

    pub fn with_config(root: impl Into<PathBuf>, config: ChaosConfig) -> Self {
        let paths = ChaosPaths::new(&config);
        Self {
            store: FileStore::new(root),
            config,
            paths,
        }
    }

    pub fn root(&self) -> &Path {
        self.store.root()
    }

    pub fn store(&self) -> &FileStore {
        &self.store
    }

    pub fn config(&self) -> &ChaosConfig {
        &self.config
    }

    pub fn paths(&self) -> &ChaosPaths {
        &self.paths
    }

    pub fn backups(&self) -> BackupManager<'_> {
        BackupManager::new(&self.store, &self.paths)
    }

    pub fn templates(&self) -> TemplateLoader<'_> {
        TemplateLoader::new(&self.store, &self.paths.templates_dir)
    }
}
