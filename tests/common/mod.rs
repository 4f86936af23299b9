// Shared test helpers: scripted host source and fixed sensor probe

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use taskscope::error::SourceError;
use taskscope::filter::DeviceFilter;
use taskscope::models::{BatteryInfo, MetricsSnapshot};
use taskscope::sampler::Sampler;
use taskscope::sensors::{SensorProbe, SensorReading};
use taskscope::source::*;

/// Facts the fake host reports. `None` makes the matching read fail.
#[derive(Debug, Clone, Default)]
pub struct FakeHost {
    pub cpu_times: Option<CpuTimes>,
    pub cpu_identity: Option<CpuIdentity>,
    pub load: Option<LoadAverage>,
    pub memory: Option<MemoryFacts>,
    pub partitions: Option<Vec<PartitionFacts>>,
    pub disk_io: Option<HashMap<String, DiskIoCounters>>,
    pub interfaces: Option<Vec<InterfaceCounters>>,
    pub host: Option<HostFacts>,
    pub cpu_identity_reads: usize,
}

impl FakeHost {
    pub fn set_interface(&mut self, name: &str, sent: u64, recv: u64) {
        let list = self.interfaces.get_or_insert_with(Vec::new);
        match list.iter_mut().find(|i| i.name == name) {
            Some(i) => {
                i.bytes_sent = sent;
                i.bytes_recv = recv;
            }
            None => list.push(InterfaceCounters {
                name: name.into(),
                bytes_sent: sent,
                bytes_recv: recv,
            }),
        }
    }

    pub fn set_disk_io(&mut self, device: &str, read: u64, write: u64) {
        self.disk_io.get_or_insert_with(HashMap::new).insert(
            device.into(),
            DiskIoCounters {
                read_bytes: read,
                write_bytes: write,
            },
        );
    }
}

fn unavailable(what: &str) -> SourceError {
    SourceError::Read {
        path: format!("/fake/{what}"),
        source: std::io::Error::new(std::io::ErrorKind::NotFound, "not scripted"),
    }
}

/// `HostSource` replaying whatever the shared `FakeHost` currently holds.
pub struct FakeSource(pub Arc<Mutex<FakeHost>>);

impl HostSource for FakeSource {
    fn cpu_times(&mut self) -> Result<CpuTimes, SourceError> {
        self.0.lock().unwrap().cpu_times.clone().ok_or_else(|| unavailable("stat"))
    }

    fn cpu_identity(&mut self) -> Result<CpuIdentity, SourceError> {
        let mut host = self.0.lock().unwrap();
        host.cpu_identity_reads += 1;
        host.cpu_identity.clone().ok_or_else(|| unavailable("cpuinfo"))
    }

    fn load_average(&mut self) -> Result<LoadAverage, SourceError> {
        self.0.lock().unwrap().load.ok_or_else(|| unavailable("loadavg"))
    }

    fn memory(&mut self) -> Result<MemoryFacts, SourceError> {
        self.0.lock().unwrap().memory.ok_or_else(|| unavailable("meminfo"))
    }

    fn partitions(&mut self) -> Result<Vec<PartitionFacts>, SourceError> {
        self.0.lock().unwrap().partitions.clone().ok_or_else(|| unavailable("mounts"))
    }

    fn disk_io(&mut self) -> Result<HashMap<String, DiskIoCounters>, SourceError> {
        self.0.lock().unwrap().disk_io.clone().ok_or_else(|| unavailable("diskstats"))
    }

    fn interfaces(&mut self) -> Result<Vec<InterfaceCounters>, SourceError> {
        self.0.lock().unwrap().interfaces.clone().ok_or_else(|| unavailable("net/dev"))
    }

    fn host(&mut self) -> Result<HostFacts, SourceError> {
        self.0.lock().unwrap().host.clone().ok_or_else(|| unavailable("hostname"))
    }
}

/// Probe with fixed answers.
pub struct FixedProbe {
    pub temperature: SensorReading,
    pub battery: BatteryInfo,
}

impl SensorProbe for FixedProbe {
    fn temperature(&self) -> SensorReading {
        self.temperature
    }

    fn battery(&self) -> BatteryInfo {
        self.battery.clone()
    }
}

pub fn absent_probe() -> FixedProbe {
    FixedProbe {
        temperature: SensorReading::ABSENT,
        battery: BatteryInfo::default(),
    }
}

/// A host with every fact available.
pub fn full_host() -> FakeHost {
    let mut host = FakeHost {
        cpu_times: Some(CpuTimes {
            aggregate: CpuTicks {
                busy: 1_000,
                total: 4_000,
            },
            per_core: vec![
                CoreTicks {
                    id: 0,
                    ticks: CpuTicks {
                        busy: 600,
                        total: 2_000,
                    },
                },
                CoreTicks {
                    id: 1,
                    ticks: CpuTicks {
                        busy: 400,
                        total: 2_000,
                    },
                },
            ],
        }),
        cpu_identity: Some(CpuIdentity {
            model: "Test CPU @ 3.00GHz".into(),
            frequency_mhz: 3000.0,
            physical_cores: 1,
            logical_cores: 2,
        }),
        load: Some(LoadAverage {
            one: 0.5,
            five: 0.25,
            fifteen: 0.125,
        }),
        memory: Some(MemoryFacts {
            total: 16_000,
            available: 4_000,
            cached: 2_000,
            swap_total: 8_000,
            swap_used: 1_000,
        }),
        partitions: Some(vec![
            PartitionFacts {
                device: "/dev/sda1".into(),
                mount_point: "/".into(),
                fstype: "ext4".into(),
                total: 1_000,
                available: 250,
            },
            PartitionFacts {
                device: "/dev/loop0".into(),
                mount_point: "/snap/core/1".into(),
                fstype: "squashfs".into(),
                total: 100,
                available: 0,
            },
        ]),
        disk_io: None,
        interfaces: None,
        host: Some(HostFacts {
            hostname: "testbox".into(),
            platform: "Ubuntu".into(),
            platform_version: "24.04".into(),
            kernel: "6.8.0-45-generic".into(),
            arch: "x86_64".into(),
            uptime_secs: 3_600,
        }),
        cpu_identity_reads: 0,
    };
    host.set_disk_io("sda", 10_000, 20_000);
    host.set_disk_io("sda1", 10_000, 20_000);
    for name in ["lo", "eth0", "docker0", "veth123", "wlan0"] {
        host.set_interface(name, 1_000_000, 5_000_000);
    }
    host
}

/// Sampler over a fake host plus the handle used to script it between passes.
pub fn fake_sampler(host: FakeHost, probe: FixedProbe) -> (Sampler, Arc<Mutex<FakeHost>>) {
    let shared = Arc::new(Mutex::new(host));
    let sampler = Sampler::new(
        Box::new(FakeSource(shared.clone())),
        Box::new(probe),
        DeviceFilter::default(),
    );
    (sampler, shared)
}

pub fn minimal_snapshot(timestamp: u64) -> MetricsSnapshot {
    MetricsSnapshot {
        timestamp,
        ..Default::default()
    }
}
