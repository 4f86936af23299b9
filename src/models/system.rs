// CPU, memory, host identity, battery and snapshot models

use serde::{Deserialize, Serialize};

use super::{DiskInfo, MemoryPressure, NetInfo};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CpuInfo {
    /// Aggregate busy percent since the previous pass.
    pub total: f64,
    pub per_core: Vec<f64>,
    pub model: String,
    /// Physical cores.
    pub cores: u32,
    /// Logical cores.
    pub threads: u32,
    /// MHz.
    pub frequency: f64,
    /// 1, 5 and 15 minute load averages.
    pub load_avg: Vec<f64>,
    /// Degrees Celsius, 0 when no sensor answered.
    pub temp: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemInfo {
    pub total: u64,
    pub used: u64,
    pub available: u64,
    pub used_percent: f64,
    pub cached: u64,
    pub swap_total: u64,
    pub swap_used: u64,
}

impl MemInfo {
    /// Coarse pressure label. `Unknown` when memory stats were unavailable.
    pub fn pressure(&self) -> MemoryPressure {
        if self.total == 0 {
            return MemoryPressure::Unknown;
        }
        MemoryPressure::from_used_percent(Some(self.used_percent))
    }
}

/// Host identity; static per boot but re-read every pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SysInfo {
    pub hostname: String,
    /// "<name> <version>", e.g. "Ubuntu 24.04".
    pub platform: String,
    pub kernel: String,
    pub arch: String,
    /// Seconds since boot.
    pub uptime: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatteryInfo {
    pub present: bool,
    pub percent: f64,
    pub charging: bool,
}

/// One complete sampling pass. Carries no link to earlier snapshots.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    /// Unix epoch milliseconds at which the pass started.
    pub timestamp: u64,
    pub cpu: CpuInfo,
    pub memory: MemInfo,
    pub disks: Vec<DiskInfo>,
    pub networks: Vec<NetInfo>,
    pub system: SysInfo,
    pub battery: BatteryInfo,
}
