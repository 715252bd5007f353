//! Schema file providers.
//!
//! A provider hands back the current config-set as a map of relative
//! filename to raw bytes. Generation of those files is somebody else's
//! job; [`DirectoryFileProvider`] simply reads a directory that already
//! holds them.

use anyhow::{bail, Context, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Filename → content for every file in a config-set.
pub type SchemaFiles = BTreeMap<String, Vec<u8>>;

pub trait SchemaFileProvider: Send + Sync {
    fn schema_files(&self) -> Result<SchemaFiles>;
}

/// Reads every regular file under `root`, keyed by its `/`-separated
/// path relative to `root`.
pub struct DirectoryFileProvider {
    root: PathBuf,
}

impl DirectoryFileProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl SchemaFileProvider for DirectoryFileProvider {
    fn schema_files(&self) -> Result<SchemaFiles> {
        if !self.root.is_dir() {
            bail!(
                "schema directory does not exist: {}",
                self.root.display()
            );
        }

        let mut files = SchemaFiles::new();
        for entry in WalkDir::new(&self.root).follow_links(false) {
            let entry = entry.with_context(|| {
                format!("failed to walk schema directory {}", self.root.display())
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let rel = entry
                .path()
                .strip_prefix(&self.root)
                .with_context(|| format!("{} escaped the schema root", entry.path().display()))?;
            let name = rel
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            let content = std::fs::read(entry.path())
                .with_context(|| format!("failed to read {}", entry.path().display()))?;
            files.insert(name, content);
        }

        if files.is_empty() {
            bail!("schema directory is empty: {}", self.root.display());
        }
        Ok(files)
    }
}
