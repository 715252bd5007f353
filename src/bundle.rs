//! Zip bundling of schema files.
//!
//! [`bundle_schema_files`] writes the provider's files to
//! `<base_dir>/search_api_pantheon-<token>.zip` and leaves the archive on
//! disk for the operator. [`zip_bytes`] builds the same archive in memory
//! for uploading.

use std::fs::File;
use std::io::{Cursor, Seek, Write};
use std::path::{Path, PathBuf};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::{Error, Result};
use crate::logger::Logger;
use crate::schema_files::{SchemaFileProvider, SchemaFiles};

const ARCHIVE_PREFIX: &str = "search_api_pantheon-";

/// A schema archive written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaBundle {
    base: PathBuf,
    entries: usize,
}

impl SchemaBundle {
    /// Unique path without the `.zip` suffix.
    pub fn base(&self) -> &Path {
        &self.base
    }

    /// The file actually written: [`base`](Self::base) plus `.zip`.
    pub fn archive_path(&self) -> PathBuf {
        with_zip_suffix(&self.base)
    }

    pub fn entries(&self) -> usize {
        self.entries
    }
}

fn with_zip_suffix(base: &Path) -> PathBuf {
    let mut name = base.as_os_str().to_owned();
    name.push(".zip");
    PathBuf::from(name)
}

/// `$TMPDIR` if set, otherwise the current working directory.
pub fn temp_base_dir() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os("TMPDIR").filter(|d| !d.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    std::env::current_dir().map_err(|source| Error::Io {
        path: PathBuf::from("."),
        source,
    })
}

/// Write the provider's files into a fresh archive under `base_dir`.
///
/// A failure is logged once at error level and returned.
pub fn bundle_schema_files(
    provider: &dyn SchemaFileProvider,
    base_dir: &Path,
    logger: &dyn Logger,
) -> Result<SchemaBundle> {
    write_bundle(provider, base_dir, logger).inspect_err(|e| {
        logger.error(&format!(
            "Bundling schema files failed ({}): {}",
            e.kind().as_str(),
            e
        ));
    })
}

fn write_bundle(
    provider: &dyn SchemaFileProvider,
    base_dir: &Path,
    logger: &dyn Logger,
) -> Result<SchemaBundle> {
    let files = provider
        .schema_files()
        .map_err(|e| Error::from_delegate("retrieve schema files", e))?;

    let base = base_dir.join(format!("{}{}", ARCHIVE_PREFIX, uuid::Uuid::new_v4().simple()));
    logger.notice(&format!("outputting files to {}", base.display()));

    let archive = with_zip_suffix(&base);
    let file = File::create(&archive).map_err(|source| Error::Io {
        path: archive.clone(),
        source,
    })?;
    write_archive(file, &files)?;
    logger.debug(&format!(
        "wrote {} entries to {}",
        files.len(),
        archive.display()
    ));

    Ok(SchemaBundle {
        base,
        entries: files.len(),
    })
}

/// The archive [`bundle_schema_files`] would write, held in memory.
pub fn zip_bytes(files: &SchemaFiles) -> Result<Vec<u8>> {
    let cursor = write_archive(Cursor::new(Vec::new()), files)?;
    Ok(cursor.into_inner())
}

fn write_archive<W: Write + Seek>(writer: W, files: &SchemaFiles) -> Result<W> {
    let mut zip = ZipWriter::new(writer);
    for (name, content) in files {
        let options =
            SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        zip.start_file(name.as_str(), options)?;
        zip.write_all(content).map_err(|source| Error::Io {
            path: PathBuf::from(name),
            source,
        })?;
    }
    Ok(zip.finish()?)
}
