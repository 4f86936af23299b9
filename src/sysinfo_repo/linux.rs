// Linux-specific helpers: /proc/stat, /proc/diskstats, /proc/meminfo, /proc/cpuinfo.

use crate::error::SourceError;
use crate::source::{CoreTicks, CpuTicks, CpuTimes, DiskIoCounters};
use std::collections::HashMap;

/// Bytes per sector as reported by /proc/diskstats (fixed by the kernel).
const DISKSTATS_SECTOR_BYTES: u64 = 512;

#[cfg(target_os = "linux")]
fn read_proc(path: &str) -> Result<String, SourceError> {
    std::fs::read_to_string(path).map_err(|e| SourceError::Read {
        path: path.to_string(),
        source: e,
    })
}

/// Read first "model name" from /proc/cpuinfo (Linux). Prefer over sysinfo when it returns "cpu0" etc.
pub(super) fn read_cpu_model_linux() -> Option<String> {
    #[cfg(target_os = "linux")]
    {
        let content = std::fs::read_to_string("/proc/cpuinfo").ok()?;
        for line in content.lines() {
            if line.starts_with("model name") {
                let name = line
                    .find(": ")
                    .map(|i| line[i + 2..].trim())
                    .filter(|s| !s.is_empty() && *s != "cpu0")?;
                return Some(name.to_string());
            }
        }
    }
    None
}

pub(super) fn read_cpu_times_linux() -> Result<CpuTimes, SourceError> {
    #[cfg(target_os = "linux")]
    {
        parse_proc_stat(&read_proc("/proc/stat")?)
    }
    #[cfg(not(target_os = "linux"))]
    Err(SourceError::Unsupported { what: "cpu ticks" })
}

pub(super) fn read_diskstats_linux() -> Result<HashMap<String, DiskIoCounters>, SourceError> {
    #[cfg(target_os = "linux")]
    {
        Ok(parse_diskstats(&read_proc("/proc/diskstats")?))
    }
    #[cfg(not(target_os = "linux"))]
    Err(SourceError::Unsupported {
        what: "disk I/O counters",
    })
}

/// Page cache size in bytes; 0 where /proc/meminfo is unavailable.
pub(super) fn read_cached_bytes_linux() -> u64 {
    #[cfg(target_os = "linux")]
    {
        if let Ok(content) = std::fs::read_to_string("/proc/meminfo") {
            return parse_meminfo_cached(&content).unwrap_or(0);
        }
    }
    0
}

fn parse_ticks(path: &str, fields: &[&str]) -> Result<CpuTicks, SourceError> {
    let values = fields
        .iter()
        .map(|f| f.parse::<u64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| SourceError::Parse {
            path: path.to_string(),
            detail: format!("bad tick value: {e}"),
        })?;
    if values.len() < 4 {
        return Err(SourceError::Parse {
            path: path.to_string(),
            detail: format!("expected at least 4 tick columns, got {}", values.len()),
        });
    }
    // user nice system idle iowait irq softirq steal; guest time is already in user
    let total: u64 = values.iter().take(8).sum();
    let idle = values[3] + values.get(4).copied().unwrap_or(0);
    Ok(CpuTicks {
        busy: total.saturating_sub(idle),
        total,
    })
}

/// Parse the `cpu` and `cpuN` lines of /proc/stat.
pub(super) fn parse_proc_stat(content: &str) -> Result<CpuTimes, SourceError> {
    const PATH: &str = "/proc/stat";
    let mut aggregate = None;
    let mut per_core = Vec::new();
    for line in content.lines() {
        let mut fields = line.split_whitespace();
        let Some(label) = fields.next() else {
            continue;
        };
        let Some(suffix) = label.strip_prefix("cpu") else {
            continue;
        };
        let rest: Vec<&str> = fields.collect();
        if suffix.is_empty() {
            aggregate = Some(parse_ticks(PATH, &rest)?);
        } else if suffix.bytes().all(|b| b.is_ascii_digit()) {
            let id = suffix.parse::<u32>().map_err(|e| SourceError::Parse {
                path: PATH.to_string(),
                detail: format!("bad cpu label {label}: {e}"),
            })?;
            per_core.push(CoreTicks {
                id,
                ticks: parse_ticks(PATH, &rest)?,
            });
        }
    }
    let aggregate = aggregate.ok_or_else(|| SourceError::Parse {
        path: PATH.to_string(),
        detail: "missing aggregate cpu line".into(),
    })?;
    Ok(CpuTimes {
        aggregate,
        per_core,
    })
}

/// Parse /proc/diskstats into cumulative byte counters keyed by device name.
/// Malformed lines are skipped.
pub(super) fn parse_diskstats(content: &str) -> HashMap<String, DiskIoCounters> {
    content
        .lines()
        .filter_map(|line| {
            let fields: Vec<&str> = line.split_whitespace().collect();
            // major minor name reads merged sectors_read ms writes merged sectors_written ...
            if fields.len() < 10 {
                return None;
            }
            let sectors_read = fields[5].parse::<u64>().ok()?;
            let sectors_written = fields[9].parse::<u64>().ok()?;
            Some((
                fields[2].to_string(),
                DiskIoCounters {
                    read_bytes: sectors_read.saturating_mul(DISKSTATS_SECTOR_BYTES),
                    write_bytes: sectors_written.saturating_mul(DISKSTATS_SECTOR_BYTES),
                },
            ))
        })
        .collect()
}

/// Page cache in bytes: `Cached:` plus reclaimable slab (`SReclaimable:`),
/// the same figure `free` reports as cache. `None` without a `Cached:` line.
pub(super) fn parse_meminfo_cached(content: &str) -> Option<u64> {
    let field = |name: &str| {
        content.lines().find_map(|line| {
            let rest = line.strip_prefix(name)?.strip_prefix(':')?;
            let kib = rest.split_whitespace().next()?.parse::<u64>().ok()?;
            Some(kib.saturating_mul(1024))
        })
    };
    let cached = field("Cached")?;
    Some(cached.saturating_add(field("SReclaimable").unwrap_or(0)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROC_STAT: &str = "\
cpu  100 0 50 800 50 0 0 0 0 0
cpu0 60 0 20 400 20 0 0 0 0 0
cpu1 40 0 30 400 30 0 0 0 0 0
intr 12345 0 0
ctxt 999
";

    #[test]
    fn proc_stat_aggregate_and_cores() {
        let times = parse_proc_stat(PROC_STAT).unwrap();
        assert_eq!(
            times.aggregate,
            CpuTicks {
                busy: 150,
                total: 1000
            }
        );
        assert_eq!(times.per_core.len(), 2);
        assert_eq!(times.per_core[0].id, 0);
        assert_eq!(times.per_core[0].ticks, CpuTicks { busy: 80, total: 500 });
        assert_eq!(times.per_core[1].id, 1);
        assert_eq!(times.per_core[1].ticks, CpuTicks { busy: 70, total: 500 });
    }

    #[test]
    fn proc_stat_keeps_kernel_cpu_numbers_when_one_is_offline() {
        let content = "\
cpu  100 0 50 800 50 0 0 0
cpu0 60 0 20 400 20 0 0 0
cpu2 40 0 30 400 30 0 0 0
";
        let times = parse_proc_stat(content).unwrap();
        let ids: Vec<u32> = times.per_core.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![0, 2]);
    }

    #[test]
    fn proc_stat_without_aggregate_is_an_error() {
        let err = parse_proc_stat("cpu0 1 2 3 4\n").unwrap_err();
        assert!(matches!(err, SourceError::Parse { .. }));
    }

    #[test]
    fn proc_stat_with_garbage_ticks_is_an_error() {
        let err = parse_proc_stat("cpu 1 2 x 4\n").unwrap_err();
        assert!(err.to_string().contains("/proc/stat"));
    }

    #[test]
    fn diskstats_converts_sectors_to_bytes() {
        let content = "\
   8       0 sda 1000 10 2048 500 300 5 4096 900 0 1200 1400 0 0 0 0
   8       1 sda1 900 10 1024 450 250 5 512 800 0 1100 1250 0 0 0 0
   7       0 loop0 1 0 8 0 0 0 0 0 0 0 0
 bad line
";
        let io = parse_diskstats(content);
        assert_eq!(io.len(), 3);
        assert_eq!(
            io["sda"],
            DiskIoCounters {
                read_bytes: 2048 * 512,
                write_bytes: 4096 * 512
            }
        );
        assert_eq!(io["sda1"].write_bytes, 512 * 512);
    }

    #[test]
    fn meminfo_cached_in_bytes() {
        let content = "MemTotal: 16000000 kB\nSwapCached: 10 kB\nCached:  2048 kB\n";
        assert_eq!(parse_meminfo_cached(content), Some(2048 * 1024));
        assert_eq!(parse_meminfo_cached("MemTotal: 1 kB\n"), None);
    }

    #[test]
    fn meminfo_cached_includes_reclaimable_slab() {
        let content = "\
Cached:  2048 kB
SwapCached: 10 kB
Slab: 900 kB
SReclaimable: 512 kB
SUnreclaim: 388 kB
";
        assert_eq!(parse_meminfo_cached(content), Some((2048 + 512) * 1024));
    }
}
