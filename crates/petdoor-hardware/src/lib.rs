//! Hardware capability layer for the petdoor controller.
//!
//! This crate defines the boundary between the door logic and the board it
//! runs on. Every peripheral the controller touches is expressed as a trait,
//! so the logic can be driven by mock devices in tests and in the emulator,
//! and by real drivers on a device.
//!
//! # Capabilities
//!
//! | Trait | Peripheral |
//! |-------|------------|
//! | [`BeaconScanner`] | BLE radio |
//! | [`LockoutSwitch`] | lockout switch input |
//! | [`LatchActuator`] | latch relay output |
//! | [`ByteStore`] | non-volatile byte store |
//! | [`TemperatureSensor`] | core temperature sensor |
//! | [`NetworkLink`] | wireless network interface |
//!
//! The radio and the network link are async and dispatched through the enums
//! in [`devices`]. The rest are synchronous and object-safe.
//!
//! # Beacon Sightings
//!
//! The radio hands advertisements to an [`ObservationMailbox`], a single
//! overwrite-on-write slot filtered by beacon name:
//!
//! ```
//! use petdoor_hardware::ObservationMailbox;
//!
//! let mailbox = ObservationMailbox::new("Ellie");
//! mailbox.offer("Ellie", -80);
//! mailbox.offer("Ellie", -65);
//!
//! assert_eq!(mailbox.take().map(|s| s.rssi), Some(-65));
//! ```
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T>`][error::Result] with a
//! [`HardwareError`].
//!
//! [`BeaconScanner`]: traits::BeaconScanner
//! [`LockoutSwitch`]: traits::LockoutSwitch
//! [`LatchActuator`]: traits::LatchActuator
//! [`ByteStore`]: traits::ByteStore
//! [`TemperatureSensor`]: traits::TemperatureSensor
//! [`NetworkLink`]: traits::NetworkLink

pub mod devices;
pub mod error;
pub mod mailbox;
pub mod mock;
pub mod traits;
pub mod types;

// Re-export commonly used types for convenience
pub use error::{HardwareError, Result};
pub use mailbox::ObservationMailbox;
pub use traits::{
    BeaconScanner, ByteStore, LatchActuator, LockoutSwitch, NetworkLink, TemperatureSensor,
};
pub use types::{Advertisement, DeviceInfo, PinLevel, ProximitySample, SwitchPolarity};
