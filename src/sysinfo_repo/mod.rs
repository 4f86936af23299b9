// Host facts via sysinfo, with procfs for the counters sysinfo keeps private

mod linux;

use crate::error::SourceError;
use crate::source::{
    CpuIdentity, CpuTimes, DiskIoCounters, HostFacts, HostSource, InterfaceCounters, LoadAverage,
    MemoryFacts, PartitionFacts,
};
use std::collections::HashMap;
use sysinfo::{Disks, Networks, System};
use tracing::instrument;

/// Production `HostSource`.
///
/// CPU usage is not taken from sysinfo's own refresh-to-refresh delta: raw
/// ticks are reported and the sampler derives percentages from its counter
/// store, the same way it does for disk and network rates.
pub struct SysinfoRepo {
    sys: System,
    disks: Disks,
    networks: Networks,
}

impl Default for SysinfoRepo {
    fn default() -> Self {
        Self::new()
    }
}

impl SysinfoRepo {
    pub fn new() -> Self {
        // Processes live in ProcessCensus; only CPU and memory are read here.
        let mut sys = System::new();
        sys.refresh_cpu_all();
        sys.refresh_memory();
        let disks = Disks::new_with_refreshed_list();
        let networks = Networks::new_with_refreshed_list();
        Self {
            sys,
            disks,
            networks,
        }
    }
}

impl HostSource for SysinfoRepo {
    #[instrument(skip(self), fields(repo = "sysinfo", operation = "cpu_times"))]
    fn cpu_times(&mut self) -> Result<CpuTimes, SourceError> {
        linux::read_cpu_times_linux()
    }

    #[instrument(skip(self), fields(repo = "sysinfo", operation = "cpu_identity"))]
    fn cpu_identity(&mut self) -> Result<CpuIdentity, SourceError> {
        self.sys.refresh_cpu_all();
        let cpus = self.sys.cpus();
        if cpus.is_empty() {
            return Err(SourceError::Unsupported { what: "cpu list" });
        }
        let model = linux::read_cpu_model_linux()
            .or_else(|| {
                cpus.first()
                    .map(|c| c.brand().trim().to_string())
                    .filter(|s| !s.is_empty() && s != "cpu0")
            })
            .unwrap_or_else(|| "Unknown".into());
        let frequency_mhz = cpus.first().map(|c| c.frequency()).unwrap_or(0) as f64;
        let logical_cores = cpus.len() as u32;
        let physical_cores = System::physical_core_count()
            .map(|n| n as u32)
            .unwrap_or(logical_cores);
        Ok(CpuIdentity {
            model,
            frequency_mhz,
            physical_cores,
            logical_cores,
        })
    }

    fn load_average(&mut self) -> Result<LoadAverage, SourceError> {
        let load = System::load_average();
        Ok(LoadAverage {
            one: load.one,
            five: load.five,
            fifteen: load.fifteen,
        })
    }

    #[instrument(skip(self), fields(repo = "sysinfo", operation = "memory"))]
    fn memory(&mut self) -> Result<MemoryFacts, SourceError> {
        self.sys.refresh_memory();
        let total = self.sys.total_memory();
        if total == 0 {
            return Err(SourceError::Unsupported {
                what: "memory statistics",
            });
        }
        Ok(MemoryFacts {
            total,
            available: self.sys.available_memory(),
            cached: linux::read_cached_bytes_linux(),
            swap_total: self.sys.total_swap(),
            swap_used: self.sys.used_swap(),
        })
    }

    #[instrument(skip(self), fields(repo = "sysinfo", operation = "partitions"))]
    fn partitions(&mut self) -> Result<Vec<PartitionFacts>, SourceError> {
        self.disks.refresh(true);
        Ok(self
            .disks
            .list()
            .iter()
            .map(|d| PartitionFacts {
                device: d.name().to_string_lossy().into_owned(),
                mount_point: d.mount_point().to_string_lossy().into_owned(),
                fstype: d.file_system().to_string_lossy().into_owned(),
                total: d.total_space(),
                available: d.available_space(),
            })
            .collect())
    }

    #[instrument(skip(self), fields(repo = "sysinfo", operation = "disk_io"))]
    fn disk_io(&mut self) -> Result<HashMap<String, DiskIoCounters>, SourceError> {
        linux::read_diskstats_linux()
    }

    #[instrument(skip(self), fields(repo = "sysinfo", operation = "interfaces"))]
    fn interfaces(&mut self) -> Result<Vec<InterfaceCounters>, SourceError> {
        self.networks.refresh(true);
        Ok(self
            .networks
            .list()
            .iter()
            .map(|(name, data)| InterfaceCounters {
                name: name.clone(),
                bytes_sent: data.total_transmitted(),
                bytes_recv: data.total_received(),
            })
            .collect())
    }

    fn host(&mut self) -> Result<HostFacts, SourceError> {
        Ok(HostFacts {
            hostname: System::host_name().unwrap_or_default(),
            platform: System::name().unwrap_or_else(|| std::env::consts::OS.into()),
            platform_version: System::os_version().unwrap_or_default(),
            kernel: System::kernel_version().unwrap_or_default(),
            // running kernel's machine type, not the target this binary was built for
            arch: System::cpu_arch(),
            uptime_secs: System::uptime(),
        })
    }
}
