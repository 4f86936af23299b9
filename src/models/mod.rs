// Snapshot and process models (camelCase JSON)

mod network;
mod pressure;
mod process;
mod storage;
mod system;

pub use network::NetInfo;
pub use pressure::MemoryPressure;
pub use process::ProcessRecord;
pub use storage::DiskInfo;
pub use system::{BatteryInfo, CpuInfo, MemInfo, MetricsSnapshot, SysInfo};
