//! Scan session options.

use std::time::Duration;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// Options applied to every session started from one service instance.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct ScanOptions {
    /// Include well-known OS-protected roots when listing the filesystem
    /// root. Consulted only at listing time.
    #[builder(default = "false")]
    #[serde(default)]
    pub include_protected: bool,

    /// Period of the aggregation tick while any entry is calculating.
    #[builder(default = "Duration::from_millis(250)")]
    #[serde(default = "default_tick_interval")]
    pub tick_interval: Duration,

    /// Entries walked between scheduler yields inside one directory walk.
    #[builder(default = "512")]
    #[serde(default = "default_pacing_stride")]
    pub pacing_stride: u32,
}

fn default_tick_interval() -> Duration {
    Duration::from_millis(250)
}

fn default_pacing_stride() -> u32 {
    512
}

impl ScanOptionsBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(tick) = self.tick_interval {
            if tick.is_zero() {
                return Err("tick interval must be non-zero".to_string());
            }
        }
        if let Some(stride) = self.pacing_stride {
            if stride == 0 {
                return Err("pacing stride must be at least 1".to_string());
            }
        }
        Ok(())
    }
}

impl ScanOptions {
    /// Create a scan options builder.
    pub fn builder() -> ScanOptionsBuilder {
        ScanOptionsBuilder::default()
    }
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            include_protected: false,
            tick_interval: default_tick_interval(),
            pacing_stride: default_pacing_stride(),
        }
    }
}
