//! Hardware capability trait definitions.
//!
//! This module defines the contract between the door controller and the
//! platform it runs on: the BLE radio, the lockout switch input, the latch
//! relay output, the non-volatile byte store, the core temperature sensor,
//! and the wireless network link. Mock implementations live in
//! [`mock`](crate::mock); real drivers are supplied by the platform.
//!
//! The radio and the network link perform slow I/O and use native `async fn`
//! methods (Rust 1.90 + Edition 2024 RPITIT). The remaining capabilities are
//! single register reads/writes and stay synchronous so they can be called
//! while the arbitration state is locked.

#![allow(async_fn_in_trait)]

use std::time::Duration;

use crate::error::Result;
use crate::mailbox::ObservationMailbox;
use crate::types::{DeviceInfo, PinLevel};

/// BLE radio capable of scanning for advertisements.
///
/// A scan runs for a bounded window. Every advertisement seen during the
/// window is offered to the mailbox, which keeps only the latest sighting of
/// the configured beacon.
///
/// # Object Safety and Dynamic Dispatch
///
/// This trait is NOT object-safe because `async fn` methods return an opaque
/// `impl Future`. Use generic parameters, or the enum wrapper from the
/// [`devices`](crate::devices) module when a concrete type is required
/// (for example to spawn the scan loop on the Tokio runtime):
///
/// ```no_run
/// use std::time::Duration;
/// use petdoor_hardware::devices::AnyBeaconScanner;
/// use petdoor_hardware::mailbox::ObservationMailbox;
/// use petdoor_hardware::mock::MockScanner;
/// use petdoor_hardware::traits::BeaconScanner;
///
/// # async fn example() -> petdoor_hardware::Result<()> {
/// let (scanner, _handle) = MockScanner::new();
/// let mut scanner = AnyBeaconScanner::Mock(scanner);
/// let mailbox = ObservationMailbox::new("Ellie");
///
/// scanner.scan(Duration::from_secs(2), &mailbox).await?;
/// if let Some(sample) = mailbox.take() {
///     println!("beacon at {} dBm", sample.rssi);
/// }
/// # Ok(())
/// # }
/// ```
pub trait BeaconScanner: Send + Sync {
    /// Scan for advertisements for `window`, offering each to `mailbox`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The radio is disconnected
    /// - The scan could not be started
    async fn scan(&mut self, window: Duration, mailbox: &ObservationMailbox) -> Result<()>;

    /// Get device information.
    ///
    /// # Errors
    ///
    /// Returns an error if the radio cannot be queried.
    async fn get_info(&self) -> Result<DeviceInfo>;
}

/// Two-level digital input wired to the lockout switch.
///
/// The trait reports the raw level; mapping a level to "asserted" is the
/// caller's concern (see [`SwitchPolarity`](crate::types::SwitchPolarity)).
pub trait LockoutSwitch: Send {
    /// Read the current input level.
    ///
    /// # Errors
    ///
    /// Returns an error if the input cannot be read.
    fn read_level(&self) -> Result<PinLevel>;

    /// Get device information.
    fn info(&self) -> DeviceInfo;
}

/// Single digital output driving the door latch relay.
pub trait LatchActuator: Send {
    /// Energize (`true`) or de-energize (`false`) the latch.
    ///
    /// # Errors
    ///
    /// Returns an error if the output could not be driven.
    fn set_energized(&mut self, energized: bool) -> Result<()>;

    /// Returns the last level successfully written.
    fn is_energized(&self) -> bool;

    /// Get device information.
    fn info(&self) -> DeviceInfo;
}

/// Byte-addressable non-volatile store.
///
/// Writes may be buffered until [`commit`](ByteStore::commit) is called.
pub trait ByteStore: Send {
    /// Total number of addressable bytes.
    fn size(&self) -> usize;

    /// Read the byte at `address`.
    ///
    /// # Errors
    ///
    /// Returns [`HardwareError::OutOfRange`](crate::HardwareError::OutOfRange)
    /// if `address` is not below [`size`](ByteStore::size).
    fn read_byte(&self, address: usize) -> Result<u8>;

    /// Write `value` at `address`.
    ///
    /// # Errors
    ///
    /// Returns [`HardwareError::OutOfRange`](crate::HardwareError::OutOfRange)
    /// if `address` is not below [`size`](ByteStore::size).
    fn write_byte(&mut self, address: usize, value: u8) -> Result<()>;

    /// Durably persist all buffered writes.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing medium cannot be written.
    fn commit(&mut self) -> Result<()>;
}

/// On-die temperature sensor.
pub trait TemperatureSensor: Send + Sync {
    /// Sample the current core temperature in degrees Celsius.
    ///
    /// # Errors
    ///
    /// Returns an error if the sensor cannot be read.
    fn read_celsius(&self) -> Result<f32>;
}

/// Wireless network interface.
pub trait NetworkLink: Send + Sync {
    /// Attempt to join the network once.
    ///
    /// # Errors
    ///
    /// Returns [`HardwareError::NetworkJoin`](crate::HardwareError::NetworkJoin)
    /// if the attempt fails. Callers decide the retry policy.
    async fn join(&mut self, ssid: &str, password: &str) -> Result<()>;

    /// Returns `true` while associated with a network.
    fn is_connected(&self) -> bool;

    /// Get device information.
    ///
    /// # Errors
    ///
    /// Returns an error if the interface cannot be queried.
    async fn get_info(&self) -> Result<DeviceInfo>;
}
