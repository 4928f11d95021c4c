use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Name given to presets produced by the recommendation engine.
pub const RECOMMENDED_PRESET_NAME: &str = "Recommended";

/// Surrogate id assigned by the store on first save.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PresetId(pub i64);

impl fmt::Display for PresetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A named snapshot of qualified-key -> value pairs.
///
/// Keys are not checked against the catalog when a preset is saved; a preset
/// may reference settings the catalog doesn't know about, or carry values the
/// catalog would reject. Validation happens when the preset is applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingsPreset {
    pub id: Option<PresetId>,
    pub name: String,
    pub description: String,
    /// RFC 3339, set once at creation.
    pub created_at: String,
    pub settings: BTreeMap<String, String>,
}

impl SettingsPreset {
    /// A new, unsaved preset stamped with the current local time.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            description: description.into(),
            created_at: chrono::Local::now().to_rfc3339(),
            settings: BTreeMap::new(),
        }
    }

    pub fn with_settings<K, V>(mut self, settings: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.settings = settings
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self
    }

    pub fn with_setting(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.settings.insert(key.into(), value.into());
        self
    }

    pub fn is_saved(&self) -> bool {
        self.id.is_some()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.settings.get(key).map(String::as_str)
    }
}
