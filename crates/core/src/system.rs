//! Hardware snapshot and the probe contract.

use serde::{Deserialize, Serialize};

pub const UNKNOWN_CPU: &str = "Unknown CPU";
pub const UNKNOWN_GPU: &str = "Unknown GPU";

/// Substituted when the core count cannot be measured.
pub const FALLBACK_CPU_CORES: u32 = 4;
/// Substituted when installed memory cannot be measured.
pub const FALLBACK_RAM_GB: u64 = 8;
/// Substituted when video memory cannot be measured or estimated.
pub const FALLBACK_VRAM_MB: u64 = 4096;

/// Read-only hardware snapshot used for recommendations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemDescriptor {
    pub cpu_name: String,
    pub cpu_cores: u32,
    pub ram_gb: u64,
    pub gpu_name: String,
    pub gpu_vram_mb: u64,
}

impl SystemDescriptor {
    pub fn new(cpu_cores: u32, ram_gb: u64, gpu_vram_mb: u64) -> Self {
        Self {
            cpu_name: UNKNOWN_CPU.to_string(),
            cpu_cores,
            ram_gb,
            gpu_name: UNKNOWN_GPU.to_string(),
            gpu_vram_mb,
        }
    }

    pub fn with_names(mut self, cpu_name: impl Into<String>, gpu_name: impl Into<String>) -> Self {
        self.cpu_name = cpu_name.into();
        self.gpu_name = gpu_name.into();
        self
    }

    /// The descriptor a probe reports when nothing could be measured.
    pub fn fallback() -> Self {
        Self::new(FALLBACK_CPU_CORES, FALLBACK_RAM_GB, FALLBACK_VRAM_MB)
    }

    /// One-line summary for display.
    pub fn summary(&self) -> String {
        format!(
            "{} with {} cores, {}GB RAM, {}",
            self.cpu_name, self.cpu_cores, self.ram_gb, self.gpu_name
        )
    }
}

/// Source of a `SystemDescriptor`.
///
/// Implementations must not fail: any field that cannot be measured is
/// replaced by the documented fallback (`FALLBACK_*`).
pub trait HardwareProbe {
    fn probe(&self) -> SystemDescriptor;
}
