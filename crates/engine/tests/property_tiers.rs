// Property-based tests for hardware scoring.
// CI: 256 cases (default). Soak: PROPTEST_CASES=10000 cargo test --release

use enginetune_core::SystemDescriptor;
use enginetune_engine::recommend::*;
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

fn config_256() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(256),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

fn arb_system() -> impl Strategy<Value = SystemDescriptor> {
    (1u32..=128, 1u64..=512, 256u64..=49152)
        .prop_map(|(cores, ram, vram)| SystemDescriptor::new(cores, ram, vram))
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config_256())]

    #[test]
    fn score_stays_in_range(info in arb_system()) {
        let score = performance_score(&info);
        prop_assert!((5..=100).contains(&score));
    }

    #[test]
    fn more_cores_never_lowers_tier(info in arb_system(), extra in 0u32..64) {
        let mut better = info.clone();
        better.cpu_cores += extra;
        prop_assert!(performance_score(&better) >= performance_score(&info));
        prop_assert!(performance_tier(&better) >= performance_tier(&info));
    }

    #[test]
    fn more_ram_never_lowers_tier(info in arb_system(), extra in 0u64..256) {
        let mut better = info.clone();
        better.ram_gb += extra;
        prop_assert!(performance_tier(&better) >= performance_tier(&info));
    }

    #[test]
    fn more_vram_never_lowers_tier(info in arb_system(), extra in 0u64..16384) {
        let mut better = info.clone();
        better.gpu_vram_mb += extra;
        prop_assert!(performance_tier(&better) >= performance_tier(&info));
    }

    #[test]
    fn fallback_is_always_named_recommended(info in arb_system()) {
        let preset = fallback_preset(&info);
        prop_assert_eq!(preset.name.as_str(), "Recommended");
        prop_assert!(preset.id.is_none());
        prop_assert!(preset.get("SystemSettings.r.Streaming.PoolSize").is_some());
        prop_assert_eq!(
            preset.get("ShaderCompiler.NumUnusedShaderCompilingThreads").is_some(),
            info.cpu_cores >= 4
        );
    }
}
