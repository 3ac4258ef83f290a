//! Common types shared across hardware device implementations.
//!
//! This module defines types used by multiple capability traits, such as
//! device information, digital pin levels, switch polarity, and the beacon
//! observations produced by the BLE radio.

use serde::{Deserialize, Serialize};
use tokio::time::Instant;

/// Generic device information.
///
/// Contains metadata about a hardware device such as name, model,
/// serial number, and firmware version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    /// Device name (e.g., "Mock Scanner").
    pub name: String,

    /// Device model identifier.
    pub model: String,

    /// Optional device serial number.
    pub serial_number: Option<String>,

    /// Optional firmware version string.
    pub firmware_version: Option<String>,
}

impl DeviceInfo {
    /// Create a new DeviceInfo with required fields.
    pub fn new(name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
            serial_number: None,
            firmware_version: None,
        }
    }

    /// Set the serial number.
    pub fn with_serial_number(mut self, serial_number: impl Into<String>) -> Self {
        self.serial_number = Some(serial_number.into());
        self
    }

    /// Set the firmware version.
    pub fn with_firmware_version(mut self, firmware_version: impl Into<String>) -> Self {
        self.firmware_version = Some(firmware_version.into());
        self
    }
}

/// Level read from a two-state digital input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PinLevel {
    Low,
    High,
}

impl PinLevel {
    /// Build a level from a boolean (`true` is `High`).
    #[must_use]
    pub fn from_bool(high: bool) -> Self {
        if high { PinLevel::High } else { PinLevel::Low }
    }
}

/// How a raw switch level maps to "lock asserted".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwitchPolarity {
    /// Closed switch pulls the input low (pull-up wiring).
    #[default]
    ActiveLow,

    /// Closed switch drives the input high.
    ActiveHigh,
}

impl SwitchPolarity {
    /// Returns `true` if `level` means the switch is asserted.
    ///
    /// # Examples
    ///
    /// ```
    /// use petdoor_hardware::types::{PinLevel, SwitchPolarity};
    ///
    /// assert!(SwitchPolarity::ActiveLow.is_asserted(PinLevel::Low));
    /// assert!(!SwitchPolarity::ActiveLow.is_asserted(PinLevel::High));
    /// assert!(SwitchPolarity::ActiveHigh.is_asserted(PinLevel::High));
    /// ```
    #[must_use]
    pub fn is_asserted(self, level: PinLevel) -> bool {
        matches!(
            (self, level),
            (SwitchPolarity::ActiveLow, PinLevel::Low)
                | (SwitchPolarity::ActiveHigh, PinLevel::High)
        )
    }

    /// The level that represents an asserted switch under this polarity.
    #[must_use]
    pub fn asserted_level(self) -> PinLevel {
        match self {
            SwitchPolarity::ActiveLow => PinLevel::Low,
            SwitchPolarity::ActiveHigh => PinLevel::High,
        }
    }
}

/// A single BLE advertisement as reported by the radio.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Advertisement {
    /// Advertised device name (may be empty).
    pub name: String,

    /// Received signal strength in dBm.
    pub rssi: i16,
}

impl Advertisement {
    /// Create a new advertisement.
    pub fn new(name: impl Into<String>, rssi: i16) -> Self {
        Self {
            name: name.into(),
            rssi,
        }
    }
}

/// Sighting of the configured beacon.
///
/// Transient: produced per matching advertisement, consumed by the proximity
/// evaluator, then superseded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProximitySample {
    /// Received signal strength in dBm.
    pub rssi: i16,

    /// When the advertisement was delivered.
    pub observed_at: Instant,
}

impl ProximitySample {
    /// Create a sample stamped with the current time.
    #[must_use]
    pub fn now(rssi: i16) -> Self {
        Self {
            rssi,
            observed_at: Instant::now(),
        }
    }
}
