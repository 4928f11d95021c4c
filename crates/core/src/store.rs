//! Persistence contract for the catalog and the preset store.
//!
//! The catalog and preset handles only ever talk to a `SettingsStore`.
//! Every method that touches more than one row must be all-or-nothing: a
//! reader sees either the state before the call or the state after it.

use std::collections::BTreeMap;

use crate::error::StoreError;
use crate::preset::{PresetId, SettingsPreset};
use crate::setting::Setting;

/// New current value for the setting identified by (section, name).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueUpdate {
    pub section: String,
    pub name: String,
    pub value: String,
}

impl ValueUpdate {
    pub fn new(section: impl Into<String>, name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            section: section.into(),
            name: name.into(),
            value: value.into(),
        }
    }
}

pub trait SettingsStore {
    /// All settings, ordered by (section, name) ascending.
    fn load_settings(&self) -> Result<Vec<Setting>, StoreError>;

    /// Overwrite current values in one transaction. Rows that don't exist
    /// are skipped.
    fn update_values(&mut self, updates: &[ValueUpdate]) -> Result<(), StoreError>;

    /// All presets with their entries, ordered by name ascending.
    fn list_presets(&self) -> Result<Vec<SettingsPreset>, StoreError>;

    fn load_preset(&self, id: PresetId) -> Result<Option<SettingsPreset>, StoreError>;

    /// Insert a preset and its entries; returns the assigned id.
    fn insert_preset(&mut self, preset: &SettingsPreset) -> Result<PresetId, StoreError>;

    /// Update name/description of `id` and replace its entire entry set.
    /// `created_at` is left untouched. Returns false if `id` doesn't exist,
    /// in which case nothing changes.
    fn replace_preset(&mut self, id: PresetId, preset: &SettingsPreset) -> Result<bool, StoreError>;

    /// Remove a preset and its entries. Returns false if `id` didn't exist.
    fn delete_preset(&mut self, id: PresetId) -> Result<bool, StoreError>;
}

/// In-memory adapter.
///
/// Mutations are computed on the side and committed with a single assignment,
/// which gives the same all-or-nothing visibility as a database transaction.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    settings: Vec<Setting>,
    presets: BTreeMap<PresetId, SettingsPreset>,
    next_id: i64,
    fail_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: impl IntoIterator<Item = Setting>) -> Self {
        let mut settings: Vec<Setting> = settings.into_iter().collect();
        settings.sort_by(|a, b| (&a.section, &a.name).cmp(&(&b.section, &b.name)));
        settings.dedup_by(|a, b| a.section == b.section && a.name == b.name);
        Self {
            settings,
            ..Self::default()
        }
    }

    /// Make every subsequent write fail with `StoreError::Io`.
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    fn check_writable(&self) -> Result<(), StoreError> {
        if self.fail_writes {
            Err(StoreError::Io("memory store is read-only".to_string()))
        } else {
            Ok(())
        }
    }
}

impl SettingsStore for MemoryStore {
    fn load_settings(&self) -> Result<Vec<Setting>, StoreError> {
        Ok(self.settings.clone())
    }

    fn update_values(&mut self, updates: &[ValueUpdate]) -> Result<(), StoreError> {
        self.check_writable()?;
        let mut staged = self.settings.clone();
        for update in updates {
            if let Some(setting) = staged
                .iter_mut()
                .find(|s| s.section == update.section && s.name == update.name)
            {
                setting.current_value = update.value.clone();
            }
        }
        self.settings = staged;
        Ok(())
    }

    fn list_presets(&self) -> Result<Vec<SettingsPreset>, StoreError> {
        let mut presets: Vec<SettingsPreset> = self.presets.values().cloned().collect();
        presets.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(presets)
    }

    fn load_preset(&self, id: PresetId) -> Result<Option<SettingsPreset>, StoreError> {
        Ok(self.presets.get(&id).cloned())
    }

    fn insert_preset(&mut self, preset: &SettingsPreset) -> Result<PresetId, StoreError> {
        self.check_writable()?;
        self.next_id += 1;
        let id = PresetId(self.next_id);
        let mut stored = preset.clone();
        stored.id = Some(id);
        self.presets.insert(id, stored);
        Ok(id)
    }

    fn replace_preset(&mut self, id: PresetId, preset: &SettingsPreset) -> Result<bool, StoreError> {
        self.check_writable()?;
        let Some(existing) = self.presets.get(&id) else {
            return Ok(false);
        };
        let replacement = SettingsPreset {
            id: Some(id),
            name: preset.name.clone(),
            description: preset.description.clone(),
            created_at: existing.created_at.clone(),
            settings: preset.settings.clone(),
        };
        self.presets.insert(id, replacement);
        Ok(true)
    }

    fn delete_preset(&mut self, id: PresetId) -> Result<bool, StoreError> {
        self.check_writable()?;
        Ok(self.presets.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::setting::SettingValueType;

    #[test]
    fn test_settings_are_ordered_by_section_then_name() {
        let store = MemoryStore::with_settings([
            Setting::new("ShaderCompiler", "MaxShaderJobs", SettingValueType::Integer, "500"),
            Setting::new("RenderingThread", "bAllowThreadedRendering", SettingValueType::Boolean, "True"),
            Setting::new("ShaderCompiler", "MaxShaderJobBatchSize", SettingValueType::Integer, "50"),
        ]);
        let keys: Vec<String> = store.load_settings().unwrap().iter().map(|s| s.qualified_key()).collect();
        assert_eq!(
            keys,
            vec![
                "RenderingThread.bAllowThreadedRendering",
                "ShaderCompiler.MaxShaderJobBatchSize",
                "ShaderCompiler.MaxShaderJobs",
            ]
        );
    }

    #[test]
    fn test_replace_missing_preset_changes_nothing() {
        let mut store = MemoryStore::new();
        let ok = store
            .replace_preset(PresetId(42), &SettingsPreset::new("Ghost", ""))
            .unwrap();
        assert!(!ok);
        assert!(store.list_presets().unwrap().is_empty());
    }

    #[test]
    fn test_failed_write_leaves_state() {
        let mut store = MemoryStore::new();
        let id = store
            .insert_preset(&SettingsPreset::new("Low", "").with_setting("a.b", "1"))
            .unwrap();
        store.set_fail_writes(true);
        let err = store.replace_preset(id, &SettingsPreset::new("Low", "").with_setting("c.d", "2"));
        assert!(matches!(err, Err(StoreError::Io(_))));
        let kept = store.load_preset(id).unwrap().unwrap();
        assert_eq!(kept.get("a.b"), Some("1"));
    }
}
