// Memory pressure classification

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse memory pressure label; serializes lowercase (e.g. "moderate").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemoryPressure {
    Low,
    Moderate,
    High,
    Critical,
    Unknown,
}

impl MemoryPressure {
    /// Step function over used percent: `< 50` low, `< 75` moderate,
    /// `<= 90` high, above that critical. `None` means stats were unavailable.
    pub fn from_used_percent(used_percent: Option<f64>) -> Self {
        match used_percent {
            None => MemoryPressure::Unknown,
            Some(p) if p.is_nan() => MemoryPressure::Unknown,
            Some(p) if p > 90.0 => MemoryPressure::Critical,
            Some(p) if p >= 75.0 => MemoryPressure::High,
            Some(p) if p >= 50.0 => MemoryPressure::Moderate,
            Some(_) => MemoryPressure::Low,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MemoryPressure::Low => "low",
            MemoryPressure::Moderate => "moderate",
            MemoryPressure::High => "high",
            MemoryPressure::Critical => "critical",
            MemoryPressure::Unknown => "unknown",
        }
    }
}

impl fmt::Display for MemoryPressure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
