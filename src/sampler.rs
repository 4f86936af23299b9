// Snapshot assembler: one sampling pass over CPU, memory, disks, networks,
// host identity and battery.
//
// Every sub-collection is isolated. A source that fails leaves its field at
// the zero value and the pass carries on, so `sample` always returns a
// snapshot.

use crate::config::AppConfig;
use crate::counters::{CounterStore, RateResult, busy_percent, compute_rate};
use crate::error::SourceError;
use crate::filter::DeviceFilter;
use crate::models::{CpuInfo, DiskInfo, MemInfo, MetricsSnapshot, NetInfo, SysInfo};
use crate::sensors::{SensorProbe, platform_probe};
use crate::source::{CpuIdentity, DiskIoCounters, HostSource};
use crate::sysinfo_repo::SysinfoRepo;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Mutex, PoisonError};
use std::time::Instant;

/// Mutable state of one engine. Only touched while the pass lock is held.
struct SamplerState {
    source: Box<dyn HostSource>,
    store: CounterStore,
    /// Read once; model, frequency and core counts do not change while up.
    cpu_identity: Option<CpuIdentity>,
}

/// The sampling engine.
///
/// Owns its counter store: two engines never share baselines. Rates and CPU
/// percentages need two passes, so the first snapshot of a new engine (the
/// warm-up sample) reports zero for all of them.
///
/// `sample` may be called from several threads; passes are serialized so a
/// baseline is never replaced halfway through another pass's delta.
pub struct Sampler {
    state: Mutex<SamplerState>,
    probe: Box<dyn SensorProbe>,
    filter: DeviceFilter,
}

impl Sampler {
    pub fn new(
        source: Box<dyn HostSource>,
        probe: Box<dyn SensorProbe>,
        filter: DeviceFilter,
    ) -> Self {
        Self {
            state: Mutex::new(SamplerState {
                source,
                store: CounterStore::new(),
                cpu_identity: None,
            }),
            probe,
            filter,
        }
    }

    /// Engine backed by sysinfo/procfs and the platform's sensor probe.
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            Box::new(SysinfoRepo::new()),
            platform_probe(Path::new(&config.sensors.sysfs_root)),
            DeviceFilter::from_config(&config.filters),
        )
    }

    /// Run one sampling pass now.
    pub fn sample(&self) -> MetricsSnapshot {
        self.sample_at(Instant::now())
    }

    /// Run one sampling pass, using `now` as the instant counters were read.
    pub fn sample_at(&self, now: Instant) -> MetricsSnapshot {
        let timestamp = chrono::Utc::now().timestamp_millis().max(0) as u64;
        let mut guard = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let state = &mut *guard;

        let cpu = self.collect_cpu(state, now);
        let memory = collect_memory(state);
        let disks = self.collect_disks(state, now);
        let networks = self.collect_networks(state, now);
        let system = collect_system(state);
        drop(guard);

        let battery = self.probe.battery();

        tracing::debug!(
            operation = "sample",
            disks = disks.len(),
            networks = networks.len(),
            "snapshot assembled"
        );

        MetricsSnapshot {
            timestamp,
            cpu,
            memory,
            disks,
            networks,
            system,
            battery,
        }
    }

    fn collect_cpu(&self, state: &mut SamplerState, now: Instant) -> CpuInfo {
        let mut cpu = CpuInfo::default();

        if let Some(times) = degrade("cpu_times", state.source.cpu_times()) {
            cpu.total = busy_percent(
                &mut state.store,
                "cpu",
                times.aggregate.busy,
                times.aggregate.total,
                now,
            );
            // keyed by the kernel's CPU number so an offline CPU does not shift the rest
            cpu.per_core = times
                .per_core
                .iter()
                .map(|core| {
                    busy_percent(
                        &mut state.store,
                        &format!("cpu{}", core.id),
                        core.ticks.busy,
                        core.ticks.total,
                        now,
                    )
                })
                .collect();
        }

        if state.cpu_identity.is_none() {
            state.cpu_identity = degrade("cpu_identity", state.source.cpu_identity());
        }
        if let Some(identity) = &state.cpu_identity {
            cpu.model = identity.model.clone();
            cpu.frequency = identity.frequency_mhz;
            cpu.cores = identity.physical_cores;
            cpu.threads = identity.logical_cores;
        }

        if let Some(load) = degrade("load_average", state.source.load_average()) {
            cpu.load_avg = vec![load.one, load.five, load.fifteen];
        }

        cpu.temp = self.probe.temperature().or_zero();
        cpu
    }

    fn collect_disks(&self, state: &mut SamplerState, now: Instant) -> Vec<DiskInfo> {
        // Rates are computed once per device, then shared by every partition on it.
        let io = degrade("disk_io", state.source.disk_io()).unwrap_or_default();
        let rates = disk_rates(&mut state.store, &io, now);

        let Some(partitions) = degrade("partitions", state.source.partitions()) else {
            return Vec::new();
        };
        partitions
            .into_iter()
            .filter(|p| self.filter.keeps_partition(&p.device))
            .map(|p| {
                let used = p.total.saturating_sub(p.available);
                let device_name = p.device.strip_prefix("/dev/").unwrap_or(&p.device);
                let (read, write) = rates
                    .get(device_name)
                    .copied()
                    .unwrap_or((RateResult::INVALID, RateResult::INVALID));
                DiskInfo {
                    mount_point: p.mount_point,
                    device: p.device,
                    fstype: p.fstype,
                    total: p.total,
                    used,
                    free: p.available,
                    used_percent: percent_of(used, p.total),
                    read_rate: read.value(),
                    write_rate: write.value(),
                }
            })
            .collect()
    }

    fn collect_networks(&self, state: &mut SamplerState, now: Instant) -> Vec<NetInfo> {
        let Some(mut interfaces) = degrade("interfaces", state.source.interfaces()) else {
            return Vec::new();
        };
        interfaces.retain(|i| self.filter.keeps_interface(&i.name));
        interfaces.sort_by(|a, b| a.name.cmp(&b.name));
        interfaces
            .into_iter()
            .map(|i| {
                let upload = compute_rate(
                    &mut state.store,
                    &format!("net/{}/sent", i.name),
                    i.bytes_sent,
                    now,
                );
                let download = compute_rate(
                    &mut state.store,
                    &format!("net/{}/recv", i.name),
                    i.bytes_recv,
                    now,
                );
                NetInfo {
                    name: i.name,
                    bytes_sent: i.bytes_sent,
                    bytes_recv: i.bytes_recv,
                    upload_rate: upload.value(),
                    download_rate: download.value(),
                }
            })
            .collect()
    }
}

/// Read/write rates for every device with I/O counters. Writes back the
/// baseline of each one, including devices seen for the first time.
fn disk_rates(
    store: &mut CounterStore,
    io: &HashMap<String, DiskIoCounters>,
    now: Instant,
) -> HashMap<String, (RateResult, RateResult)> {
    io.iter()
        .map(|(name, counters)| {
            let read = compute_rate(store, &format!("disk/{name}/read"), counters.read_bytes, now);
            let write = compute_rate(
                store,
                &format!("disk/{name}/write"),
                counters.write_bytes,
                now,
            );
            (name.clone(), (read, write))
        })
        .collect()
}

fn collect_memory(state: &mut SamplerState) -> MemInfo {
    let Some(facts) = degrade("memory", state.source.memory()) else {
        return MemInfo::default();
    };
    let used = facts.total.saturating_sub(facts.available);
    MemInfo {
        total: facts.total,
        used,
        available: facts.available,
        used_percent: percent_of(used, facts.total),
        cached: facts.cached,
        swap_total: facts.swap_total,
        swap_used: facts.swap_used,
    }
}

fn collect_system(state: &mut SamplerState) -> SysInfo {
    let Some(host) = degrade("host", state.source.host()) else {
        return SysInfo::default();
    };
    let platform = format!("{} {}", host.platform, host.platform_version)
        .trim()
        .to_string();
    SysInfo {
        hostname: host.hostname,
        platform,
        kernel: host.kernel,
        arch: host.arch,
        uptime: host.uptime_secs,
    }
}

fn percent_of(part: u64, total: u64) -> f64 {
    if total > 0 {
        (part as f64 / total as f64) * 100.0
    } else {
        0.0
    }
}

/// Unwrap a source result, logging failures. Unsupported facts are expected
/// on some platforms and only logged at debug.
fn degrade<T>(operation: &'static str, result: Result<T, SourceError>) -> Option<T> {
    match result {
        Ok(v) => Some(v),
        Err(e @ SourceError::Unsupported { .. }) => {
            tracing::debug!(error = %e, operation, "source unsupported");
            None
        }
        Err(e) => {
            tracing::warn!(error = %e, operation, "collection failed");
            None
        }
    }
}
