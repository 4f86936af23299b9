// Linux sysfs probe: /sys/class/{hwmon,thermal,power_supply}

use super::{SensorProbe, SensorReading, parse_sensor_value};
use crate::models::BatteryInfo;
use std::path::{Path, PathBuf};

/// Number of hwmon devices scanned (hwmon0..hwmon4).
const HWMON_CANDIDATES: usize = 5;
/// Number of thermal zones scanned (thermal_zone0..thermal_zone9).
const THERMAL_ZONE_CANDIDATES: usize = 10;
/// Battery identities, primary first.
const BATTERY_NAMES: [&str; 2] = ["BAT0", "BAT1"];

/// Reads sensors from a sysfs class directory (normally `/sys/class`).
#[derive(Debug, Clone)]
pub struct SysfsProbe {
    root: PathBuf,
}

impl SysfsProbe {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Temperature sources in probe order: hwmon inputs first, then thermal zones.
    pub fn temperature_candidates(&self) -> Vec<PathBuf> {
        let hwmon = (0..HWMON_CANDIDATES)
            .map(|i| self.root.join(format!("hwmon/hwmon{i}/temp1_input")));
        let zones = (0..THERMAL_ZONE_CANDIDATES)
            .map(|i| self.root.join(format!("thermal/thermal_zone{i}/temp")));
        hwmon.chain(zones).collect()
    }

    fn battery_dir(&self) -> Option<PathBuf> {
        BATTERY_NAMES
            .iter()
            .map(|name| self.root.join("power_supply").join(name))
            .find(|dir| dir.exists())
    }
}

fn read_value(path: &Path) -> Option<u64> {
    let content = std::fs::read_to_string(path).ok()?;
    parse_sensor_value(&content)
}

impl SensorProbe for SysfsProbe {
    fn temperature(&self) -> SensorReading {
        self.temperature_candidates()
            .iter()
            .filter_map(|path| read_value(path))
            .find(|&milli| milli > 0)
            .map(|milli| SensorReading::present(milli as f64 / 1000.0))
            .unwrap_or(SensorReading::ABSENT)
    }

    fn battery(&self) -> BatteryInfo {
        let Some(dir) = self.battery_dir() else {
            return BatteryInfo::default();
        };
        let percent = read_value(&dir.join("capacity")).unwrap_or(0) as f64;
        let charging = std::fs::read_to_string(dir.join("status"))
            .map(|s| matches!(s.trim(), "Charging" | "Full"))
            .unwrap_or(false);
        BatteryInfo {
            present: true,
            percent,
            charging,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    #[test]
    fn candidates_are_hwmon_then_thermal_zones() {
        let probe = SysfsProbe::new("/sys/class");
        let c = probe.temperature_candidates();
        assert_eq!(c.len(), 15);
        assert_eq!(c[0], PathBuf::from("/sys/class/hwmon/hwmon0/temp1_input"));
        assert_eq!(c[4], PathBuf::from("/sys/class/hwmon/hwmon4/temp1_input"));
        assert_eq!(c[5], PathBuf::from("/sys/class/thermal/thermal_zone0/temp"));
        assert_eq!(c[14], PathBuf::from("/sys/class/thermal/thermal_zone9/temp"));
    }

    #[test]
    fn temperature_skips_missing_and_zero_sources() {
        let dir = tempfile::TempDir::new().unwrap();
        write(dir.path(), "hwmon/hwmon0/temp1_input", "0\n");
        // hwmon1 absent
        write(dir.path(), "hwmon/hwmon2/temp1_input", "45000\n");
        write(dir.path(), "thermal/thermal_zone0/temp", "61000\n");
        let probe = SysfsProbe::new(dir.path());
        assert_eq!(probe.temperature(), SensorReading::present(45.0));
    }

    #[test]
    fn temperature_falls_back_to_thermal_zone() {
        let dir = tempfile::TempDir::new().unwrap();
        write(dir.path(), "hwmon/hwmon0/temp1_input", "garbage");
        write(dir.path(), "thermal/thermal_zone3/temp", "52500");
        let probe = SysfsProbe::new(dir.path());
        assert_eq!(probe.temperature(), SensorReading::present(52.5));
    }

    #[test]
    fn temperature_absent_when_nothing_answers() {
        let dir = tempfile::TempDir::new().unwrap();
        write(dir.path(), "thermal/thermal_zone0/temp", "0");
        let probe = SysfsProbe::new(dir.path());
        assert_eq!(probe.temperature(), SensorReading::ABSENT);
        assert_eq!(probe.temperature().or_zero(), 0.0);
    }

    #[test]
    fn corrupted_value_is_not_partially_parsed() {
        let dir = tempfile::TempDir::new().unwrap();
        write(dir.path(), "hwmon/hwmon0/temp1_input", "4x5000");
        let probe = SysfsProbe::new(dir.path());
        assert_eq!(probe.temperature(), SensorReading::ABSENT);
    }

    #[test]
    fn battery_charging_from_bat0() {
        let dir = tempfile::TempDir::new().unwrap();
        write(dir.path(), "power_supply/BAT0/capacity", "87\n");
        write(dir.path(), "power_supply/BAT0/status", "Charging\n");
        let probe = SysfsProbe::new(dir.path());
        assert_eq!(
            probe.battery(),
            BatteryInfo {
                present: true,
                percent: 87.0,
                charging: true,
            }
        );
    }

    #[test]
    fn battery_falls_back_to_bat1() {
        let dir = tempfile::TempDir::new().unwrap();
        write(dir.path(), "power_supply/BAT1/capacity", "40");
        write(dir.path(), "power_supply/BAT1/status", "Discharging");
        let probe = SysfsProbe::new(dir.path());
        let b = probe.battery();
        assert!(b.present);
        assert_eq!(b.percent, 40.0);
        assert!(!b.charging);
    }

    #[test]
    fn full_battery_counts_as_charging() {
        let dir = tempfile::TempDir::new().unwrap();
        write(dir.path(), "power_supply/BAT0/capacity", "100");
        write(dir.path(), "power_supply/BAT0/status", "Full");
        assert!(SysfsProbe::new(dir.path()).battery().charging);
    }

    #[test]
    fn no_battery_when_both_identities_missing() {
        let dir = tempfile::TempDir::new().unwrap();
        write(dir.path(), "power_supply/AC/online", "1");
        let b = SysfsProbe::new(dir.path()).battery();
        assert!(!b.present);
        assert_eq!(b.percent, 0.0);
    }

    #[test]
    fn unreadable_capacity_degrades_to_zero() {
        let dir = tempfile::TempDir::new().unwrap();
        write(dir.path(), "power_supply/BAT0/capacity", "8?7");
        let b = SysfsProbe::new(dir.path()).battery();
        assert!(b.present);
        assert_eq!(b.percent, 0.0);
        assert!(!b.charging);
    }
}
