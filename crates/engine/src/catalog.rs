//! Settings catalog handle.
//!
//! There is no shared in-memory catalog: every read goes to the store and
//! every write goes through `apply_qualified_value` (or a batch built from
//! the same rules) and is persisted before the call returns.

use std::collections::BTreeMap;

use enginetune_core::{
    BoundsCheck, CatalogError, SectionMap, Setting, SettingsStore, ValidationFailure, ValueUpdate,
};

/// Outcome of a single qualified-key write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    /// The setting existed and now holds the new value.
    Updated { previous: String },
    /// No setting has this qualified key. Nothing was written.
    Ignored,
}

pub struct Catalog<'a, S: SettingsStore + ?Sized> {
    store: &'a mut S,
}

impl<'a, S: SettingsStore + ?Sized> Catalog<'a, S> {
    pub fn new(store: &'a mut S) -> Self {
        Self { store }
    }

    /// Every setting, ordered by (section, name).
    pub fn list_all(&self) -> Result<Vec<Setting>, CatalogError> {
        Ok(self.store.load_settings()?)
    }

    pub fn find(&self, qualified_key: &str) -> Result<Option<Setting>, CatalogError> {
        Ok(self
            .list_all()?
            .into_iter()
            .find(|s| s.qualified_key() == qualified_key))
    }

    /// Overwrite one setting's current value.
    ///
    /// Unknown keys are ignored so presets written against an older or newer
    /// catalog still apply. A known key with a value its type rejects fails
    /// with `CatalogError::Validation` and nothing is written.
    pub fn apply_qualified_value(
        &mut self,
        qualified_key: &str,
        value: &str,
    ) -> Result<Applied, CatalogError> {
        let Some(setting) = self.find(qualified_key)? else {
            log::debug!("ignoring unknown setting {qualified_key}");
            return Ok(Applied::Ignored);
        };
        validate(&setting, value).map_err(CatalogError::Validation)?;

        self.store
            .update_values(&[ValueUpdate::new(&setting.section, &setting.name, value)])?;
        log::debug!("{qualified_key}: {} -> {value}", setting.current_value);
        Ok(Applied::Updated {
            previous: setting.current_value,
        })
    }

    /// Project the catalog into the flat preset representation.
    pub fn to_qualified_map(&self) -> Result<BTreeMap<String, String>, CatalogError> {
        Ok(self
            .list_all()?
            .into_iter()
            .map(|s| (s.qualified_key(), s.current_value))
            .collect())
    }

    /// Current values grouped by section, ready for INI encoding.
    pub fn to_ini_document(&self) -> Result<SectionMap, CatalogError> {
        let mut sections = SectionMap::new();
        for setting in self.list_all()? {
            sections
                .entry(setting.section)
                .or_default()
                .insert(setting.name, setting.current_value);
        }
        Ok(sections)
    }

    /// Advisory bounds report for a candidate value. `None` for unknown keys.
    pub fn check_bounds(
        &self,
        qualified_key: &str,
        value: &str,
    ) -> Result<Option<BoundsCheck>, CatalogError> {
        Ok(self.find(qualified_key)?.map(|s| s.check_bounds(value)))
    }

    /// Put every setting back to its default value. Returns how many changed.
    pub fn reset_to_defaults(&mut self) -> Result<usize, CatalogError> {
        let updates: Vec<ValueUpdate> = self
            .list_all()?
            .into_iter()
            .filter(|s| !s.is_default())
            .map(|s| ValueUpdate::new(s.section, s.name, s.default_value))
            .collect();
        if !updates.is_empty() {
            self.store.update_values(&updates)?;
        }
        Ok(updates.len())
    }

    /// Write a prepared batch in one store transaction.
    pub(crate) fn write_batch(&mut self, updates: &[ValueUpdate]) -> Result<(), CatalogError> {
        if updates.is_empty() {
            return Ok(());
        }
        Ok(self.store.update_values(updates)?)
    }
}

/// Check `value` against `setting`'s type rule.
pub fn validate(setting: &Setting, value: &str) -> Result<(), ValidationFailure> {
    if setting.is_valid(value) {
        Ok(())
    } else {
        Err(ValidationFailure {
            key: setting.qualified_key(),
            value: value.to_string(),
            rule: setting.value_type.rule(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use enginetune_core::{MemoryStore, SettingValueType};

    fn store() -> MemoryStore {
        MemoryStore::with_settings([
            Setting::new("SystemSettings", "r.VSync", SettingValueType::Boolean, "0"),
            Setting::new("SystemSettings", "r.Streaming.PoolSize", SettingValueType::Integer, "1024")
                .with_bounds("1024", "16384")
                .with_current("12288"),
            Setting::new(
                "RenderingThread",
                "bAllowThreadedRendering",
                SettingValueType::Enum(vec!["True".into(), "False".into()]),
                "True",
            ),
        ])
    }

    #[test]
    fn test_list_all_is_ordered() {
        let mut store = store();
        let catalog = Catalog::new(&mut store);
        let keys: Vec<String> = catalog.list_all().unwrap().iter().map(|s| s.qualified_key()).collect();
        assert_eq!(
            keys,
            vec![
                "RenderingThread.bAllowThreadedRendering",
                "SystemSettings.r.Streaming.PoolSize",
                "SystemSettings.r.VSync",
            ]
        );
    }

    #[test]
    fn test_apply_valid_value_persists() {
        let mut store = store();
        let mut catalog = Catalog::new(&mut store);
        let applied = catalog.apply_qualified_value("SystemSettings.r.VSync", "1").unwrap();
        assert_eq!(applied, Applied::Updated { previous: "0".into() });
        let vsync = catalog.find("SystemSettings.r.VSync").unwrap().unwrap();
        assert_eq!(vsync.current_value, "1");
    }

    #[test]
    fn test_apply_unknown_key_is_ignored() {
        let mut store = store();
        let before = store.load_settings().unwrap();
        let mut catalog = Catalog::new(&mut store);
        let applied = catalog.apply_qualified_value("SystemSettings.r.Nope", "1").unwrap();
        assert_eq!(applied, Applied::Ignored);
        assert_eq!(store.load_settings().unwrap(), before);
    }

    #[test]
    fn test_apply_invalid_value_is_rejected() {
        let mut store = store();
        let mut catalog = Catalog::new(&mut store);
        let err = catalog.apply_qualified_value("SystemSettings.r.VSync", "2").unwrap_err();
        match err {
            CatalogError::Validation(f) => {
                assert_eq!(f.key, "SystemSettings.r.VSync");
                assert_eq!(f.value, "2");
                assert!(f.rule.contains("boolean"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
        let vsync = catalog.find("SystemSettings.r.VSync").unwrap().unwrap();
        assert_eq!(vsync.current_value, "0");
    }

    #[test]
    fn test_out_of_bounds_integer_is_not_clamped() {
        let mut store = store();
        let mut catalog = Catalog::new(&mut store);
        catalog
            .apply_qualified_value("SystemSettings.r.Streaming.PoolSize", "99999")
            .unwrap();
        let pool = catalog.find("SystemSettings.r.Streaming.PoolSize").unwrap().unwrap();
        assert_eq!(pool.current_value, "99999");
    }

    #[test]
    fn test_store_failure_propagates() {
        let mut store = store();
        store.set_fail_writes(true);
        let mut catalog = Catalog::new(&mut store);
        let err = catalog.apply_qualified_value("SystemSettings.r.VSync", "1").unwrap_err();
        assert!(matches!(err, CatalogError::Store(_)));
    }

    #[test]
    fn test_projections() {
        let mut store = store();
        let catalog = Catalog::new(&mut store);
        let flat = catalog.to_qualified_map().unwrap();
        assert_eq!(flat.get("SystemSettings.r.Streaming.PoolSize").map(String::as_str), Some("12288"));

        let sections = catalog.to_ini_document().unwrap();
        assert_eq!(sections.len(), 2);
        assert_eq!(sections["SystemSettings"]["r.VSync"], "0");
        assert_eq!(sections["RenderingThread"]["bAllowThreadedRendering"], "True");
    }

    #[test]
    fn test_check_bounds_is_advisory() {
        let mut store = store();
        let catalog = Catalog::new(&mut store);
        let key = "SystemSettings.r.Streaming.PoolSize";
        assert_eq!(catalog.check_bounds(key, "2048").unwrap(), Some(BoundsCheck::Within));
        assert_eq!(catalog.check_bounds(key, "512").unwrap(), Some(BoundsCheck::BelowMin));
        assert_eq!(catalog.check_bounds(key, "99999").unwrap(), Some(BoundsCheck::AboveMax));
        assert_eq!(catalog.check_bounds("Nope.x", "1").unwrap(), None);
    }

    #[test]
    fn test_reset_to_defaults() {
        let mut store = store();
        let mut catalog = Catalog::new(&mut store);
        assert_eq!(catalog.reset_to_defaults().unwrap(), 1);
        let pool = catalog.find("SystemSettings.r.Streaming.PoolSize").unwrap().unwrap();
        assert_eq!(pool.current_value, "1024");
        assert_eq!(catalog.reset_to_defaults().unwrap(), 0);
    }
}
