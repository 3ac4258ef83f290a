//! Error types for hardware operations.
//!
//! This module defines error types specific to hardware capabilities,
//! covering device disconnection, relay faults, scan failures,
//! out-of-range store access, and network join failures.

/// Result type alias for hardware operations.
pub type Result<T> = std::result::Result<T, HardwareError>;

/// Errors that can occur during hardware device operations.
#[derive(Debug, thiserror::Error)]
pub enum HardwareError {
    /// Device is not connected or has been disconnected.
    #[error("Device disconnected: {device}")]
    Disconnected { device: String },

    /// Device communication error.
    #[error("Communication error: {message}")]
    CommunicationError { message: String },

    /// BLE scan could not be started or was aborted.
    #[error("Scan failed: {message}")]
    ScanFailed { message: String },

    /// Byte store access outside the addressable region.
    #[error("Store access out of range: address {address} + {len} exceeds size {size}")]
    OutOfRange {
        address: usize,
        len: usize,
        size: usize,
    },

    /// Joining the wireless network failed.
    #[error("Network join failed for '{ssid}': {message}")]
    NetworkJoin { ssid: String, message: String },

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl HardwareError {
    /// Create a new disconnected error.
    pub fn disconnected(device: impl Into<String>) -> Self {
        Self::Disconnected {
            device: device.into(),
        }
    }

    /// Create a new communication error.
    pub fn communication(message: impl Into<String>) -> Self {
        Self::CommunicationError {
            message: message.into(),
        }
    }

    /// Create a new scan failed error.
    pub fn scan_failed(message: impl Into<String>) -> Self {
        Self::ScanFailed {
            message: message.into(),
        }
    }

    /// Create a new out-of-range store access error.
    pub fn out_of_range(address: usize, len: usize, size: usize) -> Self {
        Self::OutOfRange { address, len, size }
    }

    /// Create a new network join error.
    pub fn network_join(ssid: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NetworkJoin {
            ssid: ssid.into(),
            message: message.into(),
        }
    }
}
