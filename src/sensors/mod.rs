// Temperature and battery probes.
//
// Each platform supplies a SensorProbe; the one for the running platform is
// picked once when the sampler is built. Missing hardware is an ordinary
// outcome (absent reading), never an error.

mod sysfs;

pub use sysfs::SysfsProbe;

use crate::models::BatteryInfo;
use std::path::Path;

/// A single sensor value that may be absent.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SensorReading {
    pub present: bool,
    pub value: f64,
}

impl SensorReading {
    pub const ABSENT: SensorReading = SensorReading {
        present: false,
        value: 0.0,
    };

    pub fn present(value: f64) -> Self {
        Self {
            present: true,
            value,
        }
    }

    /// The value, or 0 when absent.
    pub fn or_zero(&self) -> f64 {
        if self.present { self.value } else { 0.0 }
    }
}

/// Platform-specific reader for temperature and battery state.
pub trait SensorProbe: Send + Sync {
    /// CPU temperature in degrees Celsius.
    fn temperature(&self) -> SensorReading;

    /// Primary battery state; `present == false` when the host has none.
    fn battery(&self) -> BatteryInfo;
}

/// Probe for platforms without a known sensor source.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullProbe;

impl SensorProbe for NullProbe {
    fn temperature(&self) -> SensorReading {
        SensorReading::ABSENT
    }

    fn battery(&self) -> BatteryInfo {
        BatteryInfo::default()
    }
}

/// Probe for the running platform: sysfs under `sysfs_root` on Linux,
/// `NullProbe` elsewhere.
pub fn platform_probe(sysfs_root: &Path) -> Box<dyn SensorProbe> {
    #[cfg(target_os = "linux")]
    {
        Box::new(SysfsProbe::new(sysfs_root))
    }
    #[cfg(not(target_os = "linux"))]
    {
        let _ = sysfs_root;
        Box::new(NullProbe)
    }
}

/// Strict sensor value parser: the trimmed text must be a complete unsigned
/// decimal integer. Stray characters mean "no valid number", not a shorter one.
pub fn parse_sensor_value(text: &str) -> Option<u64> {
    let text = text.trim();
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse::<u64>().ok()
}
