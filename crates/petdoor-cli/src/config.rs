//! Daemon configuration file.
//!
//! Every section is optional; a missing file section or key falls back to
//! the defaults in [`petdoor_core::constants`]. Credentials are not part of
//! this file, they live in the persistent store.
//!
//! ```toml
//! [proximity]
//! increase_threshold = 5
//! override_threshold = -75
//! miss_reset_threshold = 10
//!
//! [scan]
//! window_ms = 2000
//! interval_ms = 50
//!
//! [door]
//! max_open_secs = 10
//! switch_poll_ms = 200
//! switch_active_low = true
//!
//! [http]
//! bind = "0.0.0.0:80"
//!
//! [store]
//! path = "petdoor.eeprom"
//! size = 4096
//!
//! [network]
//! retry_interval_ms = 500
//! ```

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use petdoor_core::constants::{
    DEFAULT_MAX_OPEN_SECS, DEFAULT_NETWORK_RETRY_MS, DEFAULT_SCAN_INTERVAL_MS,
    DEFAULT_SCAN_WINDOW_MS, DEFAULT_STORE_SIZE, DEFAULT_SWITCH_POLL_MS,
};
use petdoor_core::{Error, Result};
use petdoor_engine::{LoopConfig, ProximityConfig};
use petdoor_hardware::SwitchPolarity;
use petdoor_storage::layout_end;
use serde::{Deserialize, Serialize};

/// Top-level daemon configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DaemonConfig {
    pub proximity: ProximityConfig,
    pub scan: ScanConfig,
    pub door: DoorConfig,
    pub http: HttpConfig,
    pub store: StoreConfig,
    pub network: NetworkConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScanConfig {
    /// Length of one BLE scan window.
    pub window_ms: u64,
    /// Pause between foreground cycles.
    pub interval_ms: u64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            window_ms: DEFAULT_SCAN_WINDOW_MS,
            interval_ms: DEFAULT_SCAN_INTERVAL_MS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DoorConfig {
    /// Longest the door may stay open before the watchdog closes it.
    pub max_open_secs: u64,
    /// Background loop period.
    pub switch_poll_ms: u64,
    /// Switch input reads low when asserted.
    pub switch_active_low: bool,
}

impl Default for DoorConfig {
    fn default() -> Self {
        Self {
            max_open_secs: DEFAULT_MAX_OPEN_SECS,
            switch_poll_ms: DEFAULT_SWITCH_POLL_MS,
            switch_active_low: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HttpConfig {
    pub bind: SocketAddr,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 80)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    /// File that emulates the non-volatile region.
    pub path: PathBuf,
    pub size: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("petdoor.eeprom"),
            size: DEFAULT_STORE_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NetworkConfig {
    pub retry_interval_ms: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            retry_interval_ms: DEFAULT_NETWORK_RETRY_MS,
        }
    }
}

impl DaemonConfig {
    /// Load and validate the file at `path`.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read, is not valid TOML, or does not
    /// pass [`validate`](Self::validate).
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("loading config file {}", path.display()))
    }

    /// Parse and validate TOML text.
    pub fn parse(text: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` if given, otherwise use the defaults.
    pub fn load_or_default(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Reject settings the controller cannot run with.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] naming the offending key.
    pub fn validate(&self) -> Result<()> {
        self.proximity.validate()?;

        let periods = [
            ("scan.window_ms", self.scan.window_ms),
            ("scan.interval_ms", self.scan.interval_ms),
            ("door.max_open_secs", self.door.max_open_secs),
            ("door.switch_poll_ms", self.door.switch_poll_ms),
            ("network.retry_interval_ms", self.network.retry_interval_ms),
        ];
        if let Some((key, _)) = periods.iter().find(|(_, value)| *value == 0) {
            return Err(Error::Config(format!("{key} must be greater than zero")));
        }

        if self.store.size < layout_end() {
            return Err(Error::Config(format!(
                "store.size must be at least {} bytes (got {})",
                layout_end(),
                self.store.size
            )));
        }

        Ok(())
    }

    pub fn polarity(&self) -> SwitchPolarity {
        if self.door.switch_active_low {
            SwitchPolarity::ActiveLow
        } else {
            SwitchPolarity::ActiveHigh
        }
    }

    pub fn loop_config(&self) -> LoopConfig {
        LoopConfig {
            scan_window: Duration::from_millis(self.scan.window_ms),
            scan_interval: Duration::from_millis(self.scan.interval_ms),
            switch_poll: Duration::from_millis(self.door.switch_poll_ms),
            polarity: self.polarity(),
        }
    }

    pub fn max_open(&self) -> Duration {
        Duration::from_secs(self.door.max_open_secs)
    }

    pub fn retry_interval(&self) -> Duration {
        Duration::from_millis(self.network.retry_interval_ms)
    }
}
