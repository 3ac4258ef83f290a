//! Core constants for the petdoor controller.
//!
//! This module centralizes the tuning defaults used by the proximity
//! evaluator, the two control loops, and the persistent store. Every value
//! here can be overridden from the daemon configuration file; the constants
//! only define what a freshly flashed controller does.
//!
//! # Usage
//!
//! ```
//! use petdoor_core::constants::*;
//!
//! // A reading at the override threshold opens the door regardless of trend
//! let rssi: i16 = -60;
//! assert!(rssi >= DEFAULT_OVERRIDE_THRESHOLD);
//!
//! // RSSI values are always within the radio's reporting range
//! assert!((MIN_RSSI..=MAX_RSSI).contains(&rssi));
//! ```

// ============================================================================
// Proximity Evaluation
// ============================================================================

/// Minimum RSSI delta (dBm) between consecutive sightings that counts as
/// the beacon approaching.
///
/// A delta must be strictly greater than this value.
pub const DEFAULT_INCREASE_THRESHOLD: i16 = 5;

/// Absolute RSSI (dBm) at or above which the beacon is considered in range.
///
/// Readings at or above this level request an open even without a prior
/// baseline. Adjustable at runtime in steps of one.
pub const DEFAULT_OVERRIDE_THRESHOLD: i16 = -75;

/// Number of consecutive scan cycles without a sighting after which the
/// RSSI baseline is discarded.
///
/// The baseline is reset once the miss counter *exceeds* this value.
pub const DEFAULT_MISS_RESET_THRESHOLD: u32 = 10;

/// Weakest RSSI the radio reports (dBm).
pub const MIN_RSSI: i16 = -127;

/// Strongest RSSI the radio reports (dBm).
pub const MAX_RSSI: i16 = 0;

// ============================================================================
// Control Loop Timing
// ============================================================================

/// Duration of a single BLE scan window in milliseconds.
pub const DEFAULT_SCAN_WINDOW_MS: u64 = 2_000;

/// Delay between the end of one scan cycle and the start of the next, in
/// milliseconds.
pub const DEFAULT_SCAN_INTERVAL_MS: u64 = 50;

/// Background loop period in milliseconds (switch poll + open watchdog).
pub const DEFAULT_SWITCH_POLL_MS: u64 = 200;

/// Maximum time the door may stay open before the background loop forces
/// it closed, in seconds.
pub const DEFAULT_MAX_OPEN_SECS: u64 = 10;

/// Delay between network join attempts in milliseconds.
pub const DEFAULT_NETWORK_RETRY_MS: u64 = 500;

// ============================================================================
// Persistent Store
// ============================================================================

/// Size of the non-volatile byte region reserved for the controller.
pub const DEFAULT_STORE_SIZE: usize = 4096;

/// Largest payload a length-prefixed entry can hold.
///
/// The length prefix is a single byte, so longer strings are rejected
/// rather than truncated.
pub const MAX_ENTRY_LENGTH: usize = u8::MAX as usize;

// ============================================================================
// Network Boundary
// ============================================================================

/// Default bind address for the HTTP control panel.
pub const DEFAULT_HTTP_BIND: &str = "0.0.0.0:80";
