// End-to-end flows over an on-disk settings database.

use enginetune_core::{PresetError, PresetId, SettingsPreset, SettingsStore, SystemDescriptor};
use enginetune_engine::{
    apply_preset, recommended_preset, snapshot_current, Catalog, PresetStore,
};
use enginetune_io::{export_engine_ini, ini, SqliteStore};
use tempfile::tempdir;

fn sys(cores: u32, ram: u64, vram: u64) -> SystemDescriptor {
    SystemDescriptor::new(cores, ram, vram).with_names("Test CPU", "AMD Radeon RX 7900 XTX")
}

#[test]
fn test_recommend_apply_export() {
    let dir = tempdir().unwrap();
    let mut store = SqliteStore::open(&dir.path().join("settings.db")).unwrap();

    let recommended = recommended_preset(&sys(16, 64, 24576), &store);
    assert_eq!(recommended.name, "Recommended");
    assert!(recommended.id.is_some());
    assert_eq!(recommended.get("SystemSettings.r.Streaming.PoolSize"), Some("12288"));
    assert_eq!(
        recommended.description,
        "Recommended settings for your system: AMD Radeon RX 7900 XTX with 24576 VRAM"
    );

    let mut catalog = Catalog::new(&mut store);
    let report = apply_preset(&mut catalog, &recommended).unwrap();
    assert!(report.is_clean());
    assert!(report.ignored.is_empty());

    let path = dir.path().join("Engine.ini");
    export_engine_ini(&catalog, &path, true).unwrap();
    let doc = ini::read_ini_file(&path).unwrap();
    assert_eq!(doc["SystemSettings"]["r.Streaming.PoolSize"], "12288");
    assert_eq!(doc["ShaderCompiler"]["NumUnusedShaderCompilingThreads"], "3");
}

#[test]
fn test_every_seeded_tier_applies_cleanly() {
    let mut store = SqliteStore::open_in_memory().unwrap();
    let presets = store.list_presets().unwrap();
    let mut catalog = Catalog::new(&mut store);
    for preset in &presets {
        let report = apply_preset(&mut catalog, preset).unwrap();
        assert!(report.is_clean(), "{}: {:?}", preset.name, report.rejected);
        assert!(report.ignored.is_empty(), "{}: {:?}", preset.name, report.ignored);
    }
}

#[test]
fn test_save_current_then_overwrite() {
    let mut store = SqliteStore::open_in_memory().unwrap();

    let mut mine = {
        let mut catalog = Catalog::new(&mut store);
        catalog.apply_qualified_value("SystemSettings.r.VSync", "1").unwrap();
        snapshot_current(&catalog, "Mine", "from current").unwrap()
    };
    let id = PresetStore::new(&mut store).save(&mut mine).unwrap();

    Catalog::new(&mut store)
        .apply_qualified_value("SystemSettings.r.VSync", "0")
        .unwrap();
    let mut overwrite = {
        let catalog = Catalog::new(&mut store);
        let mut snapshot = snapshot_current(&catalog, "Mine", "from current").unwrap();
        snapshot.id = Some(id);
        snapshot
    };

    let mut presets = PresetStore::new(&mut store);
    assert_eq!(presets.save(&mut overwrite).unwrap(), id);
    let stored = presets.get_by_id(id).unwrap().unwrap();
    assert_eq!(stored.get("SystemSettings.r.VSync"), Some("0"));
    assert_eq!(stored.created_at, mine.created_at);

    let mut ghost = SettingsPreset::new("Ghost", "");
    ghost.id = Some(PresetId(12345));
    assert_eq!(presets.save(&mut ghost), Err(PresetError::NotFound(PresetId(12345))));
}

#[test]
fn test_minimum_tier_on_small_machine() {
    let store = SqliteStore::open_in_memory().unwrap();
    let preset = recommended_preset(&sys(2, 4, 2048), &store);
    assert_eq!(preset.get("RenderingThread.bAllowThreadedRendering"), Some("False"));
    assert_eq!(preset.get("SystemSettings.r.Streaming.PoolSize"), Some("1024"));
}
