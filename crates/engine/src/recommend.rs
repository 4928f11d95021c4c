//! Hardware scoring and the "Recommended" preset.
//!
//! Score = cpu (max 30) + ram (max 20) + gpu (max 50), mapped to a tier.
//! The tier's stored preset is copied under the name "Recommended"; when no
//! preset carries the tier's name a preset is synthesized from VRAM and core
//! count alone. Nothing here fails: store errors fall back to synthesis.

use std::fmt;

use enginetune_core::{SettingsPreset, SettingsStore, SystemDescriptor, RECOMMENDED_PRESET_NAME};

// ============================================================================
// Scores
// ============================================================================

pub fn cpu_score(cores: u32) -> u32 {
    match cores {
        16.. => 30,
        12.. => 25,
        8.. => 20,
        6.. => 15,
        4.. => 10,
        _ => 5,
    }
}

pub fn ram_score(ram_gb: u64) -> u32 {
    match ram_gb {
        64.. => 20,
        32.. => 15,
        16.. => 10,
        8.. => 5,
        _ => 0,
    }
}

pub fn gpu_score(vram_mb: u64) -> u32 {
    match vram_mb {
        16384.. => 50,
        12288.. => 40,
        8192.. => 30,
        6144.. => 20,
        4096.. => 10,
        _ => 0,
    }
}

pub fn performance_score(info: &SystemDescriptor) -> u32 {
    cpu_score(info.cpu_cores) + ram_score(info.ram_gb) + gpu_score(info.gpu_vram_mb)
}

// ============================================================================
// Tiers
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PerformanceTier {
    Minimum,
    Low,
    Medium,
    High,
    Ultra,
}

impl PerformanceTier {
    pub const ALL: [PerformanceTier; 5] = [
        PerformanceTier::Ultra,
        PerformanceTier::High,
        PerformanceTier::Medium,
        PerformanceTier::Low,
        PerformanceTier::Minimum,
    ];

    pub fn from_score(score: u32) -> Self {
        match score {
            80.. => Self::Ultra,
            60.. => Self::High,
            40.. => Self::Medium,
            20.. => Self::Low,
            _ => Self::Minimum,
        }
    }

    /// Display name; also the name of the stored preset for this tier.
    pub fn label(self) -> &'static str {
        match self {
            Self::Ultra => "Ultra",
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
            Self::Minimum => "Minimum",
        }
    }
}

impl fmt::Display for PerformanceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub fn performance_tier(info: &SystemDescriptor) -> PerformanceTier {
    PerformanceTier::from_score(performance_score(info))
}

pub fn meets_minimum_requirements(info: &SystemDescriptor) -> bool {
    info.cpu_cores >= 4 && info.ram_gb >= 8 && info.gpu_vram_mb >= 6144
}

pub fn meets_recommended_requirements(info: &SystemDescriptor) -> bool {
    info.cpu_cores >= 8 && info.ram_gb >= 16 && info.gpu_vram_mb >= 8192
}

// ============================================================================
// Materialization
// ============================================================================

fn recommended_description(info: &SystemDescriptor) -> String {
    format!(
        "Recommended settings for your system: {} with {} VRAM",
        info.gpu_name, info.gpu_vram_mb
    )
}

/// Streaming pool size for the synthesized preset.
pub fn pool_size_for_vram(vram_mb: u64) -> &'static str {
    if vram_mb > 8000 {
        "12288"
    } else if vram_mb > 6000 {
        "8192"
    } else if vram_mb > 4000 {
        "4096"
    } else {
        "2048"
    }
}

/// Preset synthesized when no stored preset matches the tier.
pub fn fallback_preset(info: &SystemDescriptor) -> SettingsPreset {
    let mut preset = SettingsPreset::new(RECOMMENDED_PRESET_NAME, recommended_description(info))
        .with_setting("SystemSettings.r.VSync", "0")
        .with_setting("RenderingThread.bAllowThreadedRendering", "True")
        .with_setting("RenderingThread.bAllowAsyncRenderThreadUpdates", "True")
        .with_setting("Engine.InputSettings.RawMouseInputEnabled", "1")
        .with_setting("Engine.InputSettings.bEnableMouseSmoothing", "False")
        .with_setting("SystemSettings.r.Streaming.PoolSize", pool_size_for_vram(info.gpu_vram_mb));

    let threads = match info.cpu_cores {
        8.. => Some("3"),
        4.. => Some("1"),
        _ => None,
    };
    let multithreaded = if threads.is_some() { ("1", "True") } else { ("0", "False") };
    preset = preset
        .with_setting("SystemSettings.r.AllowMultiThreadedShaderCreation", multithreaded.0)
        .with_setting("ShaderCompiler.bAllowCompilingThroughWorkerThreads", multithreaded.1);
    if let Some(threads) = threads {
        preset = preset.with_setting("ShaderCompiler.NumUnusedShaderCompilingThreads", threads);
    }
    preset
}

/// Turn the tier's stored preset (if any) into the "Recommended" preset.
///
/// A stored preset keeps its id, entries and timestamp; only the name and
/// description change.
pub fn materialize(info: &SystemDescriptor, tier_preset: Option<SettingsPreset>) -> SettingsPreset {
    match tier_preset {
        Some(mut preset) => {
            preset.name = RECOMMENDED_PRESET_NAME.to_string();
            preset.description = recommended_description(info);
            preset
        }
        None => fallback_preset(info),
    }
}

/// The recommendation for `info`, looked up in `store`.
pub fn recommended_preset<S: SettingsStore + ?Sized>(
    info: &SystemDescriptor,
    store: &S,
) -> SettingsPreset {
    let tier = performance_tier(info);
    let tier_preset = match store.list_presets() {
        Ok(presets) => presets.into_iter().find(|p| p.name == tier.label()),
        Err(e) => {
            log::warn!("preset lookup for tier {tier} failed, using built-in recommendation: {e}");
            None
        }
    };
    if tier_preset.is_none() {
        log::debug!("no stored preset named '{tier}', synthesizing");
    }
    materialize(info, tier_preset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use enginetune_core::{MemoryStore, PresetId, StoreError, Setting, ValueUpdate};

    fn sys(cores: u32, ram: u64, vram: u64) -> SystemDescriptor {
        SystemDescriptor::new(cores, ram, vram).with_names("Test CPU", "RTX 4070")
    }

    #[test]
    fn test_score_boundaries() {
        assert_eq!(cpu_score(3), 5);
        assert_eq!(cpu_score(4), 10);
        assert_eq!(cpu_score(6), 15);
        assert_eq!(cpu_score(16), 30);
        assert_eq!(ram_score(7), 0);
        assert_eq!(ram_score(8), 5);
        assert_eq!(ram_score(64), 20);
        assert_eq!(gpu_score(4095), 0);
        assert_eq!(gpu_score(4096), 10);
        assert_eq!(gpu_score(12288), 40);
        assert_eq!(gpu_score(16384), 50);
    }

    #[test]
    fn test_tiers() {
        assert_eq!(performance_score(&sys(8, 16, 8192)), 60);
        assert_eq!(performance_tier(&sys(8, 16, 8192)), PerformanceTier::High);
        assert_eq!(performance_score(&sys(16, 64, 16384)), 100);
        assert_eq!(performance_tier(&sys(16, 64, 16384)), PerformanceTier::Ultra);
        assert_eq!(performance_score(&sys(2, 4, 2048)), 5);
        assert_eq!(performance_tier(&sys(2, 4, 2048)), PerformanceTier::Minimum);
        assert_eq!(PerformanceTier::from_score(79), PerformanceTier::High);
        assert_eq!(PerformanceTier::from_score(20), PerformanceTier::Low);
        assert_eq!(PerformanceTier::from_score(40).label(), "Medium");
    }

    #[test]
    fn test_requirement_badges() {
        assert!(meets_minimum_requirements(&sys(4, 8, 6144)));
        assert!(!meets_minimum_requirements(&sys(4, 8, 6143)));
        assert!(!meets_recommended_requirements(&sys(8, 16, 6144)));
        assert!(meets_recommended_requirements(&sys(8, 16, 8192)));
    }

    #[test]
    fn test_fallback_for_fast_machine() {
        let preset = fallback_preset(&sys(10, 32, 9000));
        assert_eq!(preset.name, "Recommended");
        assert_eq!(preset.get("SystemSettings.r.Streaming.PoolSize"), Some("12288"));
        assert_eq!(preset.get("SystemSettings.r.AllowMultiThreadedShaderCreation"), Some("1"));
        assert_eq!(preset.get("ShaderCompiler.bAllowCompilingThroughWorkerThreads"), Some("True"));
        assert_eq!(preset.get("ShaderCompiler.NumUnusedShaderCompilingThreads"), Some("3"));
        assert_eq!(preset.get("SystemSettings.r.VSync"), Some("0"));
        assert_eq!(
            preset.description,
            "Recommended settings for your system: RTX 4070 with 9000 VRAM"
        );
    }

    #[test]
    fn test_fallback_for_small_machine() {
        let preset = fallback_preset(&sys(2, 4, 2048));
        assert_eq!(preset.get("SystemSettings.r.Streaming.PoolSize"), Some("2048"));
        assert_eq!(preset.get("SystemSettings.r.AllowMultiThreadedShaderCreation"), Some("0"));
        assert_eq!(preset.get("ShaderCompiler.bAllowCompilingThroughWorkerThreads"), Some("False"));
        assert_eq!(preset.get("ShaderCompiler.NumUnusedShaderCompilingThreads"), None);

        let mid = fallback_preset(&sys(4, 8, 6001));
        assert_eq!(mid.get("SystemSettings.r.Streaming.PoolSize"), Some("8192"));
        assert_eq!(mid.get("ShaderCompiler.NumUnusedShaderCompilingThreads"), Some("1"));
    }

    #[test]
    fn test_stored_tier_preset_is_renamed() {
        let mut store = MemoryStore::new();
        let id = store
            .insert_preset(&SettingsPreset::new("High", "tier").with_setting("SystemSettings.r.VSync", "1"))
            .unwrap();
        let preset = recommended_preset(&sys(8, 16, 8192), &store);
        assert_eq!(preset.id, Some(id));
        assert_eq!(preset.name, "Recommended");
        assert_eq!(preset.get("SystemSettings.r.VSync"), Some("1"));
        assert!(preset.description.contains("RTX 4070 with 8192 VRAM"));
    }

    #[test]
    fn test_missing_tier_preset_synthesizes() {
        let mut store = MemoryStore::new();
        store.insert_preset(&SettingsPreset::new("high", "")).unwrap();
        let preset = recommended_preset(&sys(8, 16, 8192), &store);
        assert_eq!(preset.id, None::<PresetId>);
        assert_eq!(preset.get("SystemSettings.r.Streaming.PoolSize"), Some("12288"));
    }

    struct BrokenStore;

    impl SettingsStore for BrokenStore {
        fn load_settings(&self) -> Result<Vec<Setting>, StoreError> {
            Err(StoreError::Sqlite("disk I/O error".into()))
        }
        fn update_values(&mut self, _: &[ValueUpdate]) -> Result<(), StoreError> {
            Err(StoreError::Sqlite("disk I/O error".into()))
        }
        fn list_presets(&self) -> Result<Vec<SettingsPreset>, StoreError> {
            Err(StoreError::Sqlite("disk I/O error".into()))
        }
        fn load_preset(&self, _: PresetId) -> Result<Option<SettingsPreset>, StoreError> {
            Err(StoreError::Sqlite("disk I/O error".into()))
        }
        fn insert_preset(&mut self, _: &SettingsPreset) -> Result<PresetId, StoreError> {
            Err(StoreError::Sqlite("disk I/O error".into()))
        }
        fn replace_preset(&mut self, _: PresetId, _: &SettingsPreset) -> Result<bool, StoreError> {
            Err(StoreError::Sqlite("disk I/O error".into()))
        }
        fn delete_preset(&mut self, _: PresetId) -> Result<bool, StoreError> {
            Err(StoreError::Sqlite("disk I/O error".into()))
        }
    }

    #[test]
    fn test_store_failure_falls_back() {
        let preset = recommended_preset(&sys(10, 32, 9000), &BrokenStore);
        assert_eq!(preset.name, "Recommended");
        assert_eq!(preset.get("ShaderCompiler.NumUnusedShaderCompilingThreads"), Some("3"));
    }
}
