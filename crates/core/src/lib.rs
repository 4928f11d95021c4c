//! `enginetune-core`: settings, presets and hardware descriptors.
//!
//! Pure data model plus the storage and probe contracts. No IO.

pub mod error;
pub mod preset;
pub mod setting;
pub mod store;
pub mod system;

use std::collections::BTreeMap;

pub use error::{CatalogError, PresetError, StoreError, ValidationFailure};
pub use preset::{PresetId, SettingsPreset, RECOMMENDED_PRESET_NAME};
pub use setting::{qualified_key, BoundsCheck, Setting, SettingValueType};
pub use store::{MemoryStore, SettingsStore, ValueUpdate};
pub use system::{HardwareProbe, SystemDescriptor};

/// Section -> key -> value, the shape shared by the INI codec and catalog
/// export.
pub type SectionMap = BTreeMap<String, BTreeMap<String, String>>;
