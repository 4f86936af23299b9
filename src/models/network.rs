// Network interface model

use serde::{Deserialize, Serialize};

/// Cumulative byte counters of one interface plus rates since the previous pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetInfo {
    pub name: String,
    pub bytes_sent: u64,
    pub bytes_recv: u64,
    pub upload_rate: u64,
    pub download_rate: u64,
}
