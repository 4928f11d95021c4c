// Engine.ini export and import

use std::fmt;
use std::path::{Path, PathBuf};

use enginetune_core::{CatalogError, SettingsStore};
use enginetune_engine::{apply_values, flatten_sections, ApplyReport, Catalog};

use crate::ini;

#[derive(Debug, Clone, PartialEq)]
pub enum EngineIniError {
    /// Reading, writing or backing up the file failed.
    Io { path: PathBuf, message: String },
    Catalog(CatalogError),
}

impl fmt::Display for EngineIniError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, message } => write!(f, "{}: {message}", path.display()),
            Self::Catalog(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for EngineIniError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Catalog(e) => Some(e),
            Self::Io { .. } => None,
        }
    }
}

impl From<CatalogError> for EngineIniError {
    fn from(e: CatalogError) -> Self {
        Self::Catalog(e)
    }
}

fn io_error(path: &Path, message: String) -> EngineIniError {
    EngineIniError::Io {
        path: path.to_path_buf(),
        message,
    }
}

/// `Engine.ini` -> `Engine.ini.bak`
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".bak");
    PathBuf::from(name)
}

/// Summary of a completed export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub sections: usize,
    pub settings: usize,
    /// Where the previous file was copied, if there was one.
    pub backup: Option<PathBuf>,
}

/// Write the catalog's current values to `path`.
///
/// With `backup` set, an existing file is first copied next to it with a
/// `.bak` suffix.
pub fn export_engine_ini<S: SettingsStore + ?Sized>(
    catalog: &Catalog<'_, S>,
    path: &Path,
    backup: bool,
) -> Result<ExportSummary, EngineIniError> {
    let doc = catalog.to_ini_document()?;

    let backup = if backup && path.exists() {
        let target = backup_path(path);
        std::fs::copy(path, &target).map_err(|e| io_error(&target, e.to_string()))?;
        log::info!("backed up {} to {}", path.display(), target.display());
        Some(target)
    } else {
        None
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent).map_err(|e| io_error(parent, e.to_string()))?;
        }
    }
    ini::write_ini_file(path, &doc).map_err(|e| io_error(path, e))?;

    let summary = ExportSummary {
        sections: doc.len(),
        settings: doc.values().map(|entries| entries.len()).sum(),
        backup,
    };
    log::info!(
        "exported {} settings in {} sections to {}",
        summary.settings,
        summary.sections,
        path.display()
    );
    Ok(summary)
}

/// Read `path` and apply every `section.key` entry onto the catalog.
/// A missing file applies nothing.
pub fn import_engine_ini<S: SettingsStore + ?Sized>(
    catalog: &mut Catalog<'_, S>,
    path: &Path,
) -> Result<ApplyReport, EngineIniError> {
    let doc = ini::read_ini_file(path).map_err(|e| io_error(path, e))?;
    let values = flatten_sections(&doc);
    let report = apply_values(catalog, &values)?;
    log::info!("imported {}: {}", path.display(), report.summary());
    Ok(report)
}
