//! sysinfo-based implementation of the `HardwareProbe` trait.

use std::path::Path;

use enginetune_core::system::{FALLBACK_CPU_CORES, FALLBACK_RAM_GB, FALLBACK_VRAM_MB, UNKNOWN_CPU, UNKNOWN_GPU};
use enginetune_core::{HardwareProbe, SystemDescriptor};
use sysinfo::{Components, System};

const GIB: u64 = 1024 * 1024 * 1024;
const MIB: u64 = 1024 * 1024;

// Lowercase name fragment -> VRAM in MB. More specific names come first.
const VRAM_TABLE: &[(&str, u64)] = &[
    ("rtx 4090", 24576),
    ("rtx 4080", 16384),
    ("rtx 4070 ti", 12288),
    ("rtx 4070", 12288),
    ("rtx 4060 ti", 8192),
    ("rtx 4060", 8192),
    ("rtx 3090", 24576),
    ("rtx 3080 ti", 12288),
    ("rtx 3080", 10240),
    ("rtx 3070 ti", 8192),
    ("rtx 3070", 8192),
    ("rtx 3060 ti", 8192),
    ("rtx 3060", 12288),
    ("rtx 2080 ti", 11264),
    ("rtx 2080", 8192),
    ("rtx 2070", 8192),
    ("rtx 2060", 6144),
    ("gtx 1080 ti", 11264),
    ("gtx 1080", 8192),
    ("gtx 1070 ti", 8192),
    ("gtx 1070", 8192),
    ("gtx 1060", 6144),
    ("gtx 1050 ti", 4096),
    ("gtx 1050", 2048),
    ("rx 7900 xtx", 24576),
    ("rx 7900 xt", 20480),
    ("rx 7800 xt", 16384),
    ("rx 7700 xt", 12288),
    ("rx 7600", 8192),
    ("rx 6950 xt", 16384),
    ("rx 6900 xt", 16384),
    ("rx 6800 xt", 16384),
    ("rx 6800", 16384),
    ("rx 6750 xt", 12288),
    ("rx 6700 xt", 12288),
    ("rx 6700", 10240),
    ("rx 6650 xt", 8192),
    ("rx 6600 xt", 8192),
    ("rx 6600", 8192),
    ("rx 6500 xt", 4096),
    ("rx 5700 xt", 8192),
    ("rx 5700", 8192),
    ("rx 5600 xt", 6144),
    ("rx 5500 xt", 8192),
    ("rx 590", 8192),
    ("rx 580", 8192),
    ("rx 570", 8192),
    ("rx 560", 4096),
    ("rx 550", 4096),
];

/// VRAM guess from a marketing name; `None` for unknown cards.
pub fn estimate_vram_mb(gpu_name: &str) -> Option<u64> {
    let name = gpu_name.to_lowercase();
    VRAM_TABLE
        .iter()
        .find(|(fragment, _)| name.contains(fragment))
        .map(|&(_, mb)| mb)
}

/// Bytes to whole gigabytes, rounded to nearest.
pub fn bytes_to_gb(bytes: u64) -> u64 {
    (bytes + GIB / 2) / GIB
}

/// A hardware probe backed by the `sysinfo` crate.
///
/// sysinfo has no GPU API, so the GPU name comes from the NVIDIA proc
/// interface or the component list, and VRAM from the amdgpu sysfs node or
/// the name table.
pub struct SysinfoProbe {
    sysfs_root: std::path::PathBuf,
}

impl SysinfoProbe {
    pub fn new() -> Self {
        Self {
            sysfs_root: std::path::PathBuf::from("/"),
        }
    }

    /// Probe against an alternate filesystem root for the `/proc` and
    /// `/sys` lookups.
    pub fn with_root(root: impl Into<std::path::PathBuf>) -> Self {
        Self { sysfs_root: root.into() }
    }

    fn gpu_name(&self) -> Option<String> {
        let nvidia = self.sysfs_root.join("proc/driver/nvidia/gpus");
        if let Ok(entries) = std::fs::read_dir(&nvidia) {
            for entry in entries.flatten() {
                if let Some(model) = read_nvidia_model(&entry.path().join("information")) {
                    return Some(model);
                }
            }
        }

        let components = Components::new_with_refreshed_list();
        for component in &components {
            let label = component.label().to_lowercase();
            if label.contains("gpu") || label.contains("nvidia") || label.contains("amdgpu") {
                return Some(component.label().to_string());
            }
        }
        None
    }

    fn sysfs_vram_mb(&self) -> Option<u64> {
        let node = self
            .sysfs_root
            .join("sys/class/drm/card0/device/mem_info_vram_total");
        let text = std::fs::read_to_string(node).ok()?;
        let bytes: u64 = text.trim().parse().ok()?;
        (bytes > 0).then_some(bytes / MIB)
    }
}

impl Default for SysinfoProbe {
    fn default() -> Self {
        Self::new()
    }
}

fn read_nvidia_model(path: &Path) -> Option<String> {
    let text = std::fs::read_to_string(path).ok()?;
    text.lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(key, _)| key.trim() == "Model")
        .map(|(_, value)| value.trim().to_string())
        .filter(|model| !model.is_empty())
}

impl HardwareProbe for SysinfoProbe {
    fn probe(&self) -> SystemDescriptor {
        let mut system = System::new_all();
        system.refresh_all();

        let cpu_name = system
            .cpus()
            .first()
            .map(|cpu| cpu.brand().trim().to_string())
            .filter(|brand| !brand.is_empty())
            .unwrap_or_else(|| UNKNOWN_CPU.to_string());
        let cpu_cores = match system.cpus().len() {
            0 => FALLBACK_CPU_CORES,
            n => u32::try_from(n).unwrap_or(u32::MAX),
        };
        let ram_gb = match bytes_to_gb(system.total_memory()) {
            0 => FALLBACK_RAM_GB,
            gb => gb,
        };

        let gpu_name = self.gpu_name();
        let gpu_vram_mb = self
            .sysfs_vram_mb()
            .or_else(|| gpu_name.as_deref().and_then(estimate_vram_mb))
            .unwrap_or(FALLBACK_VRAM_MB);

        let info = SystemDescriptor {
            cpu_name,
            cpu_cores,
            ram_gb,
            gpu_name: gpu_name.unwrap_or_else(|| UNKNOWN_GPU.to_string()),
            gpu_vram_mb,
        };
        log::info!("detected {} ({} MB VRAM)", info.summary(), info.gpu_vram_mb);
        info
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_estimate_prefers_specific_names() {
        assert_eq!(estimate_vram_mb("NVIDIA GeForce RTX 4070 Ti"), Some(12288));
        assert_eq!(estimate_vram_mb("NVIDIA GeForce RTX 3080 Ti"), Some(12288));
        assert_eq!(estimate_vram_mb("NVIDIA GeForce RTX 3080"), Some(10240));
        assert_eq!(estimate_vram_mb("AMD Radeon RX 7900 XTX"), Some(24576));
        assert_eq!(estimate_vram_mb("AMD Radeon RX 7900 XT"), Some(20480));
        assert_eq!(estimate_vram_mb("GTX 1050"), Some(2048));
        assert_eq!(estimate_vram_mb("Intel UHD Graphics 630"), None);
    }

    #[test]
    fn test_bytes_to_gb_rounds() {
        assert_eq!(bytes_to_gb(0), 0);
        assert_eq!(bytes_to_gb(16 * GIB - 300 * MIB), 16);
        assert_eq!(bytes_to_gb(8 * GIB + 100 * MIB), 8);
    }

    #[test]
    fn test_sysfs_lookups() {
        let root = tempdir().unwrap();
        let gpu_dir = root.path().join("proc/driver/nvidia/gpus/0000:01:00.0");
        std::fs::create_dir_all(&gpu_dir).unwrap();
        std::fs::write(
            gpu_dir.join("information"),
            "Model: \t\t NVIDIA GeForce RTX 4070\nIRQ:   \t\t 130\n",
        )
        .unwrap();
        let drm = root.path().join("sys/class/drm/card0/device");
        std::fs::create_dir_all(&drm).unwrap();
        std::fs::write(drm.join("mem_info_vram_total"), "8573157376\n").unwrap();

        let probe = SysinfoProbe::with_root(root.path());
        assert_eq!(probe.gpu_name().as_deref(), Some("NVIDIA GeForce RTX 4070"));
        assert_eq!(probe.sysfs_vram_mb(), Some(8176));
    }

    #[test]
    fn test_probe_never_reports_zero() {
        let info = SysinfoProbe::with_root(tempdir().unwrap().path()).probe();
        assert!(info.cpu_cores > 0);
        assert!(info.ram_gb > 0);
        assert!(info.gpu_vram_mb > 0);
        assert!(!info.gpu_name.is_empty());
    }
}
