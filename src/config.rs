use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub publishing: PublishingConfig,
    pub monitoring: MonitoringConfig,
    #[serde(default)]
    pub sensors: SensorsConfig,
    #[serde(default)]
    pub filters: FiltersConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PublishingConfig {
    /// Max number of snapshots kept in the broadcast channel for /ws/metrics (slow clients may lag).
    pub broadcast_capacity: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MonitoringConfig {
    pub sample_interval_ms: u64,
    /// How often to log app stats (ws clients, snapshots taken) at INFO level.
    pub stats_log_interval_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SensorsConfig {
    /// sysfs class directory holding hwmon/, thermal/ and power_supply/.
    #[serde(default = "default_sysfs_root")]
    pub sysfs_root: String,
}

impl Default for SensorsConfig {
    fn default() -> Self {
        Self {
            sysfs_root: default_sysfs_root(),
        }
    }
}

fn default_sysfs_root() -> String {
    "/sys/class".into()
}

#[derive(Debug, Clone, Deserialize)]
pub struct FiltersConfig {
    /// Interface names dropped exactly (loopback).
    #[serde(default = "default_excluded_interfaces")]
    pub excluded_interfaces: Vec<String>,
    /// Interface name prefixes dropped (virtual, bridge, container).
    #[serde(default = "default_excluded_interface_prefixes")]
    pub excluded_interface_prefixes: Vec<String>,
    /// Partition device prefixes dropped (loop devices).
    #[serde(default = "default_excluded_device_prefixes")]
    pub excluded_device_prefixes: Vec<String>,
}

impl Default for FiltersConfig {
    fn default() -> Self {
        Self {
            excluded_interfaces: default_excluded_interfaces(),
            excluded_interface_prefixes: default_excluded_interface_prefixes(),
            excluded_device_prefixes: default_excluded_device_prefixes(),
        }
    }
}

fn default_excluded_interfaces() -> Vec<String> {
    vec!["lo".into()]
}

fn default_excluded_interface_prefixes() -> Vec<String> {
    vec!["veth".into(), "docker".into(), "br-".into()]
}

fn default_excluded_device_prefixes() -> Vec<String> {
    vec!["/dev/loop".into()]
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        let s = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("reading config {}: {}", path, e))?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.server.port > 0,
            "server.port must be between 1 and 65535, got {}",
            self.server.port
        );
        anyhow::ensure!(
            !self.server.host.is_empty(),
            "server.host must be non-empty"
        );
        anyhow::ensure!(
            self.publishing.broadcast_capacity > 0,
            "publishing.broadcast_capacity must be > 0, got {}",
            self.publishing.broadcast_capacity
        );
        anyhow::ensure!(
            self.monitoring.sample_interval_ms > 0,
            "monitoring.sample_interval_ms must be > 0, got {}",
            self.monitoring.sample_interval_ms
        );
        anyhow::ensure!(
            self.monitoring.stats_log_interval_secs > 0,
            "monitoring.stats_log_interval_secs must be > 0, got {}",
            self.monitoring.stats_log_interval_secs
        );
        anyhow::ensure!(
            !self.sensors.sysfs_root.is_empty(),
            "sensors.sysfs_root must be non-empty"
        );
        anyhow::ensure!(
            self.filters
                .excluded_interface_prefixes
                .iter()
                .chain(&self.filters.excluded_device_prefixes)
                .all(|p| !p.is_empty()),
            "filters prefixes must be non-empty (an empty prefix excludes everything)"
        );
        Ok(())
    }
}
