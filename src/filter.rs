// Which partitions and interfaces a snapshot reports

use crate::config::FiltersConfig;

/// Name-based exclusion of loopback, virtual, bridge and container devices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceFilter {
    excluded_interfaces: Vec<String>,
    excluded_interface_prefixes: Vec<String>,
    excluded_device_prefixes: Vec<String>,
}

impl Default for DeviceFilter {
    fn default() -> Self {
        Self::from_config(&FiltersConfig::default())
    }
}

impl DeviceFilter {
    pub fn from_config(config: &FiltersConfig) -> Self {
        Self {
            excluded_interfaces: config.excluded_interfaces.clone(),
            excluded_interface_prefixes: config.excluded_interface_prefixes.clone(),
            excluded_device_prefixes: config.excluded_device_prefixes.clone(),
        }
    }

    pub fn keeps_interface(&self, name: &str) -> bool {
        !self.excluded_interfaces.iter().any(|n| n == name)
            && !self
                .excluded_interface_prefixes
                .iter()
                .any(|p| name.starts_with(p.as_str()))
    }

    /// `device` is the partition's backing device as mounted, e.g. `/dev/loop3`.
    pub fn keeps_partition(&self, device: &str) -> bool {
        !self
            .excluded_device_prefixes
            .iter()
            .any(|p| device.starts_with(p.as_str()))
    }
}
