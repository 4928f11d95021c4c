//! `enginetune-engine`: operations over a `SettingsStore`.
//!
//! [`Catalog`] and [`PresetStore`] borrow the store for the duration of an
//! operation; [`recommend`] scores a `SystemDescriptor` and picks a preset.

pub mod apply;
pub mod catalog;
pub mod presets;
pub mod recommend;

pub use apply::{
    apply_preset, apply_preset_by_id, apply_values, flatten_sections, snapshot_current,
    ApplyError, ApplyReport,
};
pub use catalog::{Applied, Catalog};
pub use presets::PresetStore;
pub use recommend::{
    fallback_preset, materialize, meets_minimum_requirements, meets_recommended_requirements,
    performance_score, performance_tier, recommended_preset, PerformanceTier,
};
