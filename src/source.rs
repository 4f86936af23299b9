// Raw OS facts consumed by the sampler.
//
// A HostSource reports cumulative counters and point-in-time facts exactly as
// the OS exposes them; turning counters into rates is the sampler's job.

use crate::error::SourceError;
use std::collections::HashMap;

/// Cumulative CPU ticks (jiffies on Linux) for one CPU or the aggregate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CpuTicks {
    pub busy: u64,
    pub total: u64,
}

/// Ticks of one logical CPU, keyed by the kernel's CPU number (`cpuN`).
/// Numbers can skip when a CPU is offline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CoreTicks {
    pub id: u32,
    pub ticks: CpuTicks,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CpuTimes {
    pub aggregate: CpuTicks,
    pub per_core: Vec<CoreTicks>,
}

/// CPU facts that do not change while the host is up.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CpuIdentity {
    pub model: String,
    pub frequency_mhz: f64,
    pub physical_cores: u32,
    pub logical_cores: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LoadAverage {
    pub one: f64,
    pub five: f64,
    pub fifteen: f64,
}

/// Byte counts for primary memory and swap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoryFacts {
    pub total: u64,
    pub available: u64,
    pub cached: u64,
    pub swap_total: u64,
    pub swap_used: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartitionFacts {
    /// Backing device as mounted, e.g. `/dev/nvme0n1p2`.
    pub device: String,
    pub mount_point: String,
    pub fstype: String,
    pub total: u64,
    pub available: u64,
}

/// Cumulative bytes moved by one block device.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiskIoCounters {
    pub read_bytes: u64,
    pub write_bytes: u64,
}

/// Cumulative bytes moved by one network interface.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InterfaceCounters {
    pub name: String,
    pub bytes_sent: u64,
    pub bytes_recv: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostFacts {
    pub hostname: String,
    pub platform: String,
    pub platform_version: String,
    pub kernel: String,
    pub arch: String,
    pub uptime_secs: u64,
}

/// Reader of raw OS facts. Every method is independent: one failing must not
/// affect the others.
pub trait HostSource: Send {
    fn cpu_times(&mut self) -> Result<CpuTimes, SourceError>;
    fn cpu_identity(&mut self) -> Result<CpuIdentity, SourceError>;
    fn load_average(&mut self) -> Result<LoadAverage, SourceError>;
    fn memory(&mut self) -> Result<MemoryFacts, SourceError>;
    fn partitions(&mut self) -> Result<Vec<PartitionFacts>, SourceError>;
    /// Keyed by kernel device name without `/dev/` (e.g. `sda1`).
    fn disk_io(&mut self) -> Result<HashMap<String, DiskIoCounters>, SourceError>;
    fn interfaces(&mut self) -> Result<Vec<InterfaceCounters>, SourceError>;
    fn host(&mut self) -> Result<HostFacts, SourceError>;
}
