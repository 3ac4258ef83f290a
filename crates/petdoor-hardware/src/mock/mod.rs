//! Mock device implementations for testing and development.
//!
//! This module provides simulated device implementations that can be controlled
//! programmatically without requiring physical hardware. Each constructor
//! returns the device together with a cloneable handle used to drive or
//! observe it from tests or the emulator console.

pub mod latch;
pub mod link;
pub mod scanner;
pub mod sensor;
pub mod store;
pub mod switch;

// Re-export commonly used types
pub use latch::{MockLatch, MockLatchHandle};
pub use link::{MockNetworkLink, MockNetworkLinkHandle};
pub use scanner::{MockScanner, MockScannerHandle};
pub use sensor::{MockTemperature, MockTemperatureHandle};
pub use store::MemoryStore;
pub use switch::{MockSwitch, MockSwitchHandle};
