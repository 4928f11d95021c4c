// Default catalog and tier presets written into a fresh database

use enginetune_core::{Setting, SettingValueType, SettingsPreset};

fn true_false() -> SettingValueType {
    SettingValueType::Enum(vec!["True".to_string(), "False".to_string()])
}

/// Every setting the tool knows about, with its default value.
pub fn default_settings() -> Vec<Setting> {
    vec![
        // /script/engine.engine
        Setting::new("/script/engine.engine", "bAllowMultiThreadedShaderCompile", true_false(), "True")
            .with_description("Enables multithreaded shader compilation for improved loading times on multi-core CPUs")
            .with_impact("Performance"),
        // /script/engine.streamingsettings
        Setting::new("/script/engine.streamingsettings", "s.AsyncLoadingThreadEnabled", true_false(), "True")
            .with_description("Enables asynchronous loading thread for improved streaming performance")
            .with_impact("Performance"),
        Setting::new("/script/engine.streamingsettings", "s.AsyncLoadingTimeLimit", SettingValueType::Integer, "4")
            .with_description("Time limit for asynchronous loading in milliseconds")
            .with_bounds("1", "10")
            .with_impact("Performance"),
        Setting::new("/script/engine.streamingsettings", "s.AsyncLoadingUseFullTimeLimit", SettingValueType::Boolean, "1")
            .with_description("Uses full time limit for asynchronous loading")
            .with_impact("Performance"),
        Setting::new("/script/engine.streamingsettings", "s.MinBulkDataSizeForAsyncLoading", SettingValueType::Integer, "0")
            .with_description("Minimum size of bulk data for asynchronous loading")
            .with_bounds("0", "1024")
            .with_impact("Performance"),
        Setting::new("/script/engine.streamingsettings", "s.PriorityAsyncLoadingExtraTime", SettingValueType::Float, "0")
            .with_description("Extra time for priority asynchronous loading")
            .with_bounds("0.0", "10.0")
            .with_impact("Performance"),
        // Core.System
        Setting::new("Core.System", "+Suppress", SettingValueType::String, "Scriptwarning")
            .with_description("Suppresses specific log categories (Scriptwarning, Error, Scriptlog, Warning)")
            .with_impact("Debugging"),
        Setting::new("Core.System", "r.IoDispatcher.AsyncBatchReadSizeKB", SettingValueType::Integer, "4096")
            .with_description("Size of asynchronous batch reads in KB")
            .with_bounds("1024", "8192")
            .with_impact("Performance"),
        Setting::new("Core.System", "r.IoDispatcher.CacheSize", SettingValueType::Integer, "4096")
            .with_description("Size of IO dispatcher cache in MB")
            .with_bounds("1024", "8192")
            .with_impact("Performance"),
        Setting::new("Core.System", "r.XGEShaderCompile", SettingValueType::Boolean, "1")
            .with_description("Enables XGE shader compilation for distributed shader compilation")
            .with_impact("Performance"),
        Setting::new("Core.System", "r.XGEShaderCompile.Mode", SettingValueType::Integer, "3")
            .with_description("Mode for XGE shader compilation (1=Local, 2=Distributed, 3=Auto)")
            .with_bounds("1", "3")
            .with_impact("Performance"),
        // Engine.ErrorHandling
        Setting::new("Engine.ErrorHandling", "bPromptForRemoteDebugOnEnsure", true_false(), "False")
            .with_description("Enables prompting for remote debugging when an ensure condition fails")
            .with_impact("Debugging"),
        Setting::new("Engine.ErrorHandling", "bPromptForRemoteDebugging", true_false(), "False")
            .with_description("Enables prompting for remote debugging when an error occurs")
            .with_impact("Debugging"),
        // Engine.GarbageCollectionSettings
        Setting::new("Engine.GarbageCollectionSettings", "gc.MinimalAsyncGarbageCollectionTime", SettingValueType::Float, "0.3")
            .with_description("Minimum time in seconds for asynchronous garbage collection")
            .with_bounds("0.1", "1.0")
            .with_impact("Performance"),
        // Engine.InputSettings
        Setting::new("Engine.InputSettings", "RawMouseInputEnabled", SettingValueType::Boolean, "1")
            .with_description("Enables raw mouse input for more precise cursor movement")
            .with_impact("Input"),
        Setting::new("Engine.InputSettings", "bEnableMouseSmoothing", true_false(), "False")
            .with_description("Enables mouse smoothing. Disabling provides more responsive but potentially less smooth cursor movement")
            .with_impact("Input"),
        Setting::new("Engine.InputSettings", "bViewAccelerationEnabled", true_false(), "False")
            .with_description("Enables view acceleration for smoother camera movement")
            .with_impact("Input"),
        // Engine.RendererSettings
        Setting::new("Engine.RendererSettings", "r.AmbientOcclusion.AsyncComputeBudget", SettingValueType::Integer, "1")
            .with_description("Budget for asynchronous compute of ambient occlusion")
            .with_bounds("0", "2")
            .with_impact("Performance"),
        Setting::new("Engine.RendererSettings", "r.AsyncCreateLightPrimitiveInteractions", SettingValueType::Boolean, "1")
            .with_description("Enables asynchronous creation of light primitive interactions for improved performance")
            .with_impact("Performance"),
        Setting::new("Engine.RendererSettings", "r.AsyncPipelineCompile", SettingValueType::Boolean, "1")
            .with_description("Enables asynchronous pipeline compilation for improved loading times")
            .with_impact("Performance"),
        Setting::new("Engine.RendererSettings", "r.EnableAsyncComputeVolumetricFog", SettingValueType::Boolean, "1")
            .with_description("Enables asynchronous compute for volumetric fog")
            .with_impact("Performance"),
        Setting::new("Engine.RendererSettings", "r.RDG.AsyncCompute", SettingValueType::Boolean, "1")
            .with_description("Enables asynchronous compute for Render Dependency Graph")
            .with_impact("Performance"),
        Setting::new("Engine.RendererSettings", "r.Streaming.UseAsyncRequestsForDDC", SettingValueType::Boolean, "1")
            .with_description("Enables asynchronous requests for Derived Data Cache")
            .with_impact("Performance"),
        // RenderingThread
        Setting::new("RenderingThread", "bAllowAsyncRenderThreadUpdates", true_false(), "True")
            .with_description("Enables asynchronous render thread updates for improved performance")
            .with_impact("Performance"),
        Setting::new("RenderingThread", "bAllowThreadedRendering", true_false(), "True")
            .with_description("Enables threaded rendering for improved performance on multi-core CPUs")
            .with_impact("Performance"),
        // ShaderCompiler
        Setting::new("ShaderCompiler", "MaxShaderJobBatchSize", SettingValueType::Integer, "50")
            .with_description("Maximum size of shader job batches. Higher values improve throughput but may cause longer individual compilation times")
            .with_bounds("10", "100")
            .with_impact("Performance"),
        Setting::new("ShaderCompiler", "MaxShaderJobs", SettingValueType::Integer, "500")
            .with_description("Maximum number of shader jobs. Higher values allow more shaders to be compiled in parallel but use more memory")
            .with_bounds("100", "1000")
            .with_impact("Performance"),
        Setting::new("ShaderCompiler", "NumUnusedShaderCompilingThreads", SettingValueType::Integer, "1")
            .with_description("Number of unused shader compiling threads. Higher values improve compilation speed but use more CPU resources")
            .with_bounds("0", "16")
            .with_impact("Performance"),
        Setting::new("ShaderCompiler", "bAllowAsynchronousShaderCompiling", true_false(), "True")
            .with_description("Enables asynchronous shader compilation for improved loading times")
            .with_impact("Performance"),
        Setting::new("ShaderCompiler", "bAllowCompilingThroughWorkerThreads", true_false(), "True")
            .with_description("Enables shader compilation through worker threads for improved performance")
            .with_impact("Performance"),
        Setting::new("ShaderCompiler", "bAsyncShaderCompileWorkerThreads", true_false(), "True")
            .with_description("Enables asynchronous shader compilation worker threads")
            .with_impact("Performance"),
        Setting::new("ShaderCompiler", "bEnableOptimizedShaderCompilation", true_false(), "True")
            .with_description("Enables optimized shader compilation for improved performance")
            .with_impact("Performance"),
        // SystemSettings
        Setting::new("SystemSettings", "r.AllowMultiThreadedShaderCreation", SettingValueType::Boolean, "1")
            .with_description("Creates shaders on multiple threads")
            .with_impact("Performance"),
        Setting::new("SystemSettings", "r.PSOWarmup.WarmupMaterials", SettingValueType::Boolean, "1")
            .with_description("Warm up materials for shader compilation")
            .with_impact("Performance"),
        Setting::new("SystemSettings", "r.Streaming.PoolSize", SettingValueType::Integer, "1024")
            .with_description("Texture streaming pool size in MB")
            .with_bounds("1024", "16384")
            .with_impact("Visual Quality"),
        Setting::new("SystemSettings", "r.VSync", SettingValueType::Boolean, "0")
            .with_description("Vertical synchronization")
            .with_impact("Performance"),
        // TextureStreaming
        Setting::new("TextureStreaming", "r.Streaming.DefragDynamicBounds", SettingValueType::Boolean, "1")
            .with_description("Enables defragmentation of dynamic texture streaming bounds for improved memory usage")
            .with_impact("Performance"),
        Setting::new("TextureStreaming", "r.Streaming.FramesForFullUpdate", SettingValueType::Integer, "1")
            .with_description("Number of frames between full texture streaming updates")
            .with_bounds("1", "10")
            .with_impact("Performance"),
        Setting::new("TextureStreaming", "r.Streaming.FullyLoadUsedTextures", SettingValueType::Boolean, "1")
            .with_description("Fully loads used textures for improved visual quality")
            .with_impact("Visual Quality"),
        Setting::new("TextureStreaming", "r.Streaming.FullyLoadUsedTextures_Always", SettingValueType::Boolean, "1")
            .with_description("Always fully loads used textures, even during performance-critical moments")
            .with_impact("Visual Quality"),
        Setting::new("TextureStreaming", "r.TextureStreaming", SettingValueType::Boolean, "1")
            .with_description("Enables texture streaming for improved memory usage")
            .with_impact("Performance"),
    ]
}

// Entries shared by every tier preset
const TIER_BASE: [(&str, &str); 4] = [
    ("SystemSettings.r.VSync", "0"),
    ("SystemSettings.r.PSOWarmup.WarmupMaterials", "1"),
    ("Engine.InputSettings.RawMouseInputEnabled", "1"),
    ("Engine.InputSettings.bEnableMouseSmoothing", "False"),
];

struct Tier {
    name: &'static str,
    description: &'static str,
    pool_size: &'static str,
    threaded_rendering: &'static str,
    multithreaded_shaders: bool,
    shader_threads: Option<&'static str>,
}

const TIERS: [Tier; 5] = [
    Tier {
        name: "Ultra",
        description: "Maximum quality settings for high-end systems",
        pool_size: "12288",
        threaded_rendering: "True",
        multithreaded_shaders: true,
        shader_threads: Some("3"),
    },
    Tier {
        name: "High",
        description: "High quality settings for mid to high-end systems",
        pool_size: "8192",
        threaded_rendering: "True",
        multithreaded_shaders: true,
        shader_threads: Some("2"),
    },
    Tier {
        name: "Medium",
        description: "Balanced settings for mid-range systems",
        pool_size: "4096",
        threaded_rendering: "True",
        multithreaded_shaders: true,
        shader_threads: Some("1"),
    },
    Tier {
        name: "Low",
        description: "Performance-focused settings for lower-end systems",
        pool_size: "2048",
        threaded_rendering: "True",
        multithreaded_shaders: false,
        shader_threads: None,
    },
    Tier {
        name: "Minimum",
        description: "Minimum settings for very low-end systems",
        pool_size: "1024",
        threaded_rendering: "False",
        multithreaded_shaders: false,
        shader_threads: None,
    },
];

/// One preset per performance tier, named after the tier.
pub fn default_presets() -> Vec<SettingsPreset> {
    TIERS
        .iter()
        .map(|tier| {
            let (mt_creation, worker_threads) = if tier.multithreaded_shaders {
                ("1", "True")
            } else {
                ("0", "False")
            };
            let mut preset = SettingsPreset::new(tier.name, tier.description)
                .with_settings(TIER_BASE)
                .with_setting("SystemSettings.r.Streaming.PoolSize", tier.pool_size)
                .with_setting("RenderingThread.bAllowThreadedRendering", tier.threaded_rendering)
                .with_setting("RenderingThread.bAllowAsyncRenderThreadUpdates", tier.threaded_rendering)
                .with_setting("SystemSettings.r.AllowMultiThreadedShaderCreation", mt_creation)
                .with_setting("ShaderCompiler.bAllowCompilingThroughWorkerThreads", worker_threads);
            if let Some(threads) = tier.shader_threads {
                preset = preset.with_setting("ShaderCompiler.NumUnusedShaderCompilingThreads", threads);
            }
            preset
        })
        .collect()
}
