// Process census model

use serde::{Deserialize, Serialize};

/// Point-in-time facts about one process. A pid may be reused between calls.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessRecord {
    pub pid: u32,
    pub name: String,
    pub cpu_percent: f64,
    pub memory_percent: f64,
    pub resident_bytes: u64,
    pub status: String,
    pub owner: String,
}
