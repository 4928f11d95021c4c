//! Named presets over a `SettingsStore`.

use enginetune_core::{PresetError, PresetId, SettingsPreset, SettingsStore};

pub struct PresetStore<'a, S: SettingsStore + ?Sized> {
    store: &'a mut S,
}

impl<'a, S: SettingsStore + ?Sized> PresetStore<'a, S> {
    pub fn new(store: &'a mut S) -> Self {
        Self { store }
    }

    /// All presets ordered by name.
    pub fn list(&self) -> Result<Vec<SettingsPreset>, PresetError> {
        Ok(self.store.list_presets()?)
    }

    pub fn get_by_id(&self, id: PresetId) -> Result<Option<SettingsPreset>, PresetError> {
        Ok(self.store.load_preset(id)?)
    }

    /// Exact, case-sensitive name lookup. With duplicate names the first in
    /// list order wins.
    pub fn find_by_name(&self, name: &str) -> Result<Option<SettingsPreset>, PresetError> {
        Ok(self.list()?.into_iter().find(|p| p.name == name))
    }

    /// Insert an unsaved preset or replace a saved one.
    ///
    /// On insert the assigned id (and `created_at`, if empty) is written back
    /// into `preset`. On update the stored name, description and full entry
    /// set are replaced in one transaction; `created_at` is kept.
    pub fn save(&mut self, preset: &mut SettingsPreset) -> Result<PresetId, PresetError> {
        match preset.id {
            None => {
                if preset.created_at.is_empty() {
                    preset.created_at = chrono::Local::now().to_rfc3339();
                }
                let id = self.store.insert_preset(preset)?;
                preset.id = Some(id);
                log::info!("saved preset '{}' as {id}", preset.name);
                Ok(id)
            }
            Some(id) => {
                if !self.store.replace_preset(id, preset)? {
                    return Err(PresetError::NotFound(id));
                }
                log::info!("updated preset '{}' ({id})", preset.name);
                Ok(id)
            }
        }
    }

    /// Remove a preset. A missing id is not an error.
    pub fn delete(&mut self, id: PresetId) -> Result<(), PresetError> {
        if self.store.delete_preset(id)? {
            log::info!("deleted preset {id}");
        } else {
            log::debug!("delete of missing preset {id} ignored");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use enginetune_core::MemoryStore;

    #[test]
    fn test_insert_assigns_id_and_timestamp() {
        let mut store = MemoryStore::new();
        let mut presets = PresetStore::new(&mut store);
        let mut preset = SettingsPreset::new("Custom", "mine").with_setting("SystemSettings.r.VSync", "1");
        preset.created_at.clear();

        let id = presets.save(&mut preset).unwrap();
        assert_eq!(preset.id, Some(id));
        assert!(!preset.created_at.is_empty());

        let stored = presets.get_by_id(id).unwrap().unwrap();
        assert_eq!(stored.name, "Custom");
        assert_eq!(stored.get("SystemSettings.r.VSync"), Some("1"));
    }

    #[test]
    fn test_save_existing_replaces_mapping_entirely() {
        let mut store = MemoryStore::new();
        let mut presets = PresetStore::new(&mut store);
        let mut preset = SettingsPreset::new("Custom", "")
            .with_setting("a.x", "1")
            .with_setting("a.y", "2");
        let id = presets.save(&mut preset).unwrap();
        let created_at = preset.created_at.clone();

        let mut edited = preset.clone().with_settings([("a.z", "3")]);
        edited.name = "Renamed".to_string();
        edited.created_at = "1999-01-01T00:00:00+00:00".to_string();
        assert_eq!(presets.save(&mut edited).unwrap(), id);

        let stored = presets.get_by_id(id).unwrap().unwrap();
        assert_eq!(stored.name, "Renamed");
        assert_eq!(stored.settings.len(), 1);
        assert_eq!(stored.get("a.z"), Some("3"));
        assert_eq!(stored.created_at, created_at);
    }

    #[test]
    fn test_save_missing_id_is_not_found() {
        let mut store = MemoryStore::new();
        let mut presets = PresetStore::new(&mut store);
        let mut ghost = SettingsPreset::new("Ghost", "");
        ghost.id = Some(PresetId(7));
        assert_eq!(presets.save(&mut ghost), Err(PresetError::NotFound(PresetId(7))));
        assert!(presets.list().unwrap().is_empty());
    }

    #[test]
    fn test_list_is_ordered_and_find_is_exact() {
        let mut store = MemoryStore::new();
        let mut presets = PresetStore::new(&mut store);
        for name in ["Ultra", "High", "Low"] {
            presets.save(&mut SettingsPreset::new(name, "")).unwrap();
        }
        let names: Vec<String> = presets.list().unwrap().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["High", "Low", "Ultra"]);
        assert!(presets.find_by_name("High").unwrap().is_some());
        assert!(presets.find_by_name("high").unwrap().is_none());
    }

    #[test]
    fn test_delete_missing_is_noop() {
        let mut store = MemoryStore::new();
        let mut presets = PresetStore::new(&mut store);
        let id = presets.save(&mut SettingsPreset::new("Low", "")).unwrap();
        presets.delete(PresetId(999)).unwrap();
        assert_eq!(presets.list().unwrap().len(), 1);
        presets.delete(id).unwrap();
        assert!(presets.list().unwrap().is_empty());
    }

    #[test]
    fn test_failed_save_keeps_previous_state() {
        let mut store = MemoryStore::new();
        let mut preset = SettingsPreset::new("Low", "").with_setting("a.x", "1");
        let id = PresetStore::new(&mut store).save(&mut preset).unwrap();

        store.set_fail_writes(true);
        let mut presets = PresetStore::new(&mut store);
        let mut edited = preset.clone().with_settings([("a.y", "2")]);
        assert!(matches!(presets.save(&mut edited), Err(PresetError::Store(_))));

        let stored = presets.get_by_id(id).unwrap().unwrap();
        assert_eq!(stored.get("a.x"), Some("1"));
        assert_eq!(stored.get("a.y"), None);
    }
}
