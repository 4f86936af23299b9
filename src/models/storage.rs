// Mounted partition model

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiskInfo {
    pub mount_point: String,
    pub device: String,
    pub fstype: String,
    pub total: u64,
    pub used: u64,
    pub free: u64,
    pub used_percent: f64,
    /// Bytes per second read from the backing device; zero on warm-up or when
    /// the device has no I/O counters.
    #[serde(default)]
    pub read_rate: u64,
    #[serde(default)]
    pub write_rate: u64,
}
