//! Applying presets and flat key/value maps onto the catalog.

use std::collections::BTreeMap;

use enginetune_core::{
    qualified_key, CatalogError, PresetError, PresetId, Setting, SettingsPreset, SettingsStore,
    ValidationFailure, ValueUpdate,
};

use crate::catalog::{validate, Catalog};

/// What happened to each entry of an applied preset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyReport {
    /// Qualified keys whose value was written.
    pub updated: Vec<String>,
    /// Qualified keys with no matching setting.
    pub ignored: Vec<String>,
    /// Entries whose value the setting's type rejected.
    pub rejected: Vec<ValidationFailure>,
}

impl ApplyReport {
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }

    /// Short status line for the UI.
    pub fn summary(&self) -> String {
        let mut line = format!("{} updated", self.updated.len());
        if !self.ignored.is_empty() {
            line.push_str(&format!(", {} unknown", self.ignored.len()));
        }
        if !self.rejected.is_empty() {
            line.push_str(&format!(", {} rejected", self.rejected.len()));
        }
        line
    }
}

/// Apply every entry of `values` to the catalog.
///
/// Entries are independent: an unknown key or a rejected value does not stop
/// the rest. All accepted values are persisted in one batch.
pub fn apply_values<'m, S: SettingsStore + ?Sized>(
    catalog: &mut Catalog<'_, S>,
    values: impl IntoIterator<Item = (&'m String, &'m String)>,
) -> Result<ApplyReport, CatalogError> {
    let by_key: BTreeMap<String, Setting> = catalog
        .list_all()?
        .into_iter()
        .map(|s| (s.qualified_key(), s))
        .collect();

    let mut report = ApplyReport::default();
    let mut updates = Vec::new();
    for (key, value) in values {
        let Some(setting) = by_key.get(key) else {
            log::debug!("ignoring unknown setting {key}");
            report.ignored.push(key.clone());
            continue;
        };
        match validate(setting, value) {
            Ok(()) => {
                updates.push(ValueUpdate::new(&setting.section, &setting.name, value.as_str()));
                report.updated.push(key.clone());
            }
            Err(failure) => {
                log::warn!("{failure}");
                report.rejected.push(failure);
            }
        }
    }

    catalog.write_batch(&updates)?;
    Ok(report)
}

/// Apply a preset's entries to the catalog.
pub fn apply_preset<S: SettingsStore + ?Sized>(
    catalog: &mut Catalog<'_, S>,
    preset: &SettingsPreset,
) -> Result<ApplyReport, CatalogError> {
    let report = apply_values(catalog, &preset.settings)?;
    log::info!("applied preset '{}': {}", preset.name, report.summary());
    Ok(report)
}

/// Errors from applying a stored preset by id.
#[derive(Debug, Clone, PartialEq)]
pub enum ApplyError {
    Preset(PresetError),
    Catalog(CatalogError),
}

impl std::fmt::Display for ApplyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Preset(e) => write!(f, "{e}"),
            Self::Catalog(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for ApplyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Preset(e) => Some(e),
            Self::Catalog(e) => Some(e),
        }
    }
}

impl From<PresetError> for ApplyError {
    fn from(e: PresetError) -> Self {
        Self::Preset(e)
    }
}

impl From<CatalogError> for ApplyError {
    fn from(e: CatalogError) -> Self {
        Self::Catalog(e)
    }
}

/// Load a stored preset and apply it. `NotFound` when `id` doesn't exist.
pub fn apply_preset_by_id<S: SettingsStore + ?Sized>(
    store: &mut S,
    id: PresetId,
) -> Result<ApplyReport, ApplyError> {
    let preset = store
        .load_preset(id)
        .map_err(PresetError::from)?
        .ok_or(PresetError::NotFound(id))?;
    let mut catalog = Catalog::new(store);
    Ok(apply_preset(&mut catalog, &preset)?)
}

/// Unsaved preset holding the catalog's current values.
pub fn snapshot_current<S: SettingsStore + ?Sized>(
    catalog: &Catalog<'_, S>,
    name: &str,
    description: &str,
) -> Result<SettingsPreset, CatalogError> {
    Ok(SettingsPreset::new(name, description).with_settings(catalog.to_qualified_map()?))
}

/// Flatten INI-shaped `section -> key -> value` into qualified keys.
pub fn flatten_sections(
    sections: &enginetune_core::SectionMap,
) -> BTreeMap<String, String> {
    sections
        .iter()
        .flat_map(|(section, entries)| {
            entries
                .iter()
                .map(move |(name, value)| (qualified_key(section, name), value.clone()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use enginetune_core::{MemoryStore, SettingValueType};

    fn store() -> MemoryStore {
        MemoryStore::with_settings([
            Setting::new("SystemSettings", "r.VSync", SettingValueType::Boolean, "0"),
            Setting::new("SystemSettings", "r.Streaming.PoolSize", SettingValueType::Integer, "1024"),
            Setting::new("ShaderCompiler", "NumUnusedShaderCompilingThreads", SettingValueType::Integer, "0"),
        ])
    }

    #[test]
    fn test_apply_preset_reports_each_entry() {
        let mut store = store();
        let mut catalog = Catalog::new(&mut store);
        let preset = SettingsPreset::new("Mixed", "")
            .with_setting("SystemSettings.r.VSync", "1")
            .with_setting("SystemSettings.r.Streaming.PoolSize", "lots")
            .with_setting("SystemSettings.r.Unknown", "1")
            .with_setting("ShaderCompiler.NumUnusedShaderCompilingThreads", "3");

        let report = apply_preset(&mut catalog, &preset).unwrap();
        assert_eq!(
            report.updated,
            vec!["ShaderCompiler.NumUnusedShaderCompilingThreads", "SystemSettings.r.VSync"]
        );
        assert_eq!(report.ignored, vec!["SystemSettings.r.Unknown"]);
        assert_eq!(report.rejected.len(), 1);
        assert_eq!(report.rejected[0].key, "SystemSettings.r.Streaming.PoolSize");
        assert!(!report.is_clean());
        assert_eq!(report.summary(), "2 updated, 1 unknown, 1 rejected");

        let flat = catalog.to_qualified_map().unwrap();
        assert_eq!(flat["SystemSettings.r.VSync"], "1");
        assert_eq!(flat["SystemSettings.r.Streaming.PoolSize"], "1024");
        assert_eq!(flat["ShaderCompiler.NumUnusedShaderCompilingThreads"], "3");
    }

    #[test]
    fn test_unknown_only_preset_leaves_catalog_unchanged() {
        let mut store = store();
        let before = store.load_settings().unwrap();
        let mut catalog = Catalog::new(&mut store);
        let preset = SettingsPreset::new("Stale", "").with_setting("Removed.Setting", "1");
        let report = apply_preset(&mut catalog, &preset).unwrap();
        assert!(report.updated.is_empty());
        assert!(report.is_clean());
        assert_eq!(store.load_settings().unwrap(), before);
    }

    #[test]
    fn test_apply_by_id() {
        let mut store = store();
        let id = store
            .insert_preset(&SettingsPreset::new("On", "").with_setting("SystemSettings.r.VSync", "1"))
            .unwrap();
        let report = apply_preset_by_id(&mut store, id).unwrap();
        assert_eq!(report.updated.len(), 1);

        let err = apply_preset_by_id(&mut store, PresetId(404)).unwrap_err();
        assert_eq!(err, ApplyError::Preset(PresetError::NotFound(PresetId(404))));
    }

    #[test]
    fn test_snapshot_current_is_unsaved_copy() {
        let mut store = store();
        let catalog = Catalog::new(&mut store);
        let snapshot = snapshot_current(&catalog, "Mine", "saved from current").unwrap();
        assert!(!snapshot.is_saved());
        assert_eq!(snapshot.settings.len(), 3);
        assert_eq!(snapshot.get("SystemSettings.r.Streaming.PoolSize"), Some("1024"));
    }

    #[test]
    fn test_flatten_sections() {
        let mut sections = enginetune_core::SectionMap::new();
        sections
            .entry("SystemSettings".to_string())
            .or_default()
            .insert("r.VSync".to_string(), "1".to_string());
        let flat = flatten_sections(&sections);
        assert_eq!(flat.get("SystemSettings.r.VSync").map(String::as_str), Some("1"));
    }
}
