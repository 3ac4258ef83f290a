//! Enum wrappers for async device dispatch.
//!
//! Native `async fn` in traits (RPITIT, Edition 2024) is not object-safe, so
//! the radio and the network link cannot be boxed as `dyn` trait objects.
//! These enums give the controller a concrete type to own and spawn while
//! still dispatching through the capability traits.
//!
//! The synchronous capabilities (switch, latch, store, sensor) are
//! object-safe and are passed around as `Box<dyn ...>` instead.
//!
//! # Examples
//!
//! ```
//! use petdoor_hardware::devices::AnyBeaconScanner;
//! use petdoor_hardware::mock::MockScanner;
//!
//! let (scanner, _handle) = MockScanner::new();
//! let any_scanner = AnyBeaconScanner::Mock(scanner);
//! ```

use std::time::Duration;

use crate::mailbox::ObservationMailbox;
use crate::mock::{MockNetworkLink, MockScanner};
use crate::traits::{BeaconScanner, NetworkLink};
use crate::{DeviceInfo, Result};

/// Enum wrapper for BLE radio dispatch.
///
/// # Examples
///
/// ```
/// use petdoor_hardware::devices::AnyBeaconScanner;
/// use petdoor_hardware::traits::BeaconScanner;
/// use petdoor_hardware::mock::MockScanner;
///
/// #[tokio::main]
/// async fn main() -> petdoor_hardware::Result<()> {
///     let (scanner, _handle) = MockScanner::new();
///     let any_scanner = AnyBeaconScanner::Mock(scanner);
///
///     let info = any_scanner.get_info().await?;
///     println!("Radio: {}", info.name);
///
///     Ok(())
/// }
/// ```
#[derive(Debug)]
#[non_exhaustive]
pub enum AnyBeaconScanner {
    /// Mock radio for development and testing.
    Mock(MockScanner),
}

impl BeaconScanner for AnyBeaconScanner {
    async fn scan(&mut self, window: Duration, mailbox: &ObservationMailbox) -> Result<()> {
        match self {
            Self::Mock(device) => device.scan(window, mailbox).await,
        }
    }

    async fn get_info(&self) -> Result<DeviceInfo> {
        match self {
            Self::Mock(device) => device.get_info().await,
        }
    }
}

/// Enum wrapper for network interface dispatch.
#[derive(Debug)]
#[non_exhaustive]
pub enum AnyNetworkLink {
    /// Mock interface for development and testing.
    Mock(MockNetworkLink),
}

impl NetworkLink for AnyNetworkLink {
    async fn join(&mut self, ssid: &str, password: &str) -> Result<()> {
        match self {
            Self::Mock(device) => device.join(ssid, password).await,
        }
    }

    fn is_connected(&self) -> bool {
        match self {
            Self::Mock(device) => device.is_connected(),
        }
    }

    async fn get_info(&self) -> Result<DeviceInfo> {
        match self {
            Self::Mock(device) => device.get_info().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_any_scanner_dispatch() {
        let (scanner, handle) = MockScanner::new();
        let mut scanner = AnyBeaconScanner::Mock(scanner);
        let mailbox = ObservationMailbox::new("Ellie");

        handle.advertise("Ellie", -71).unwrap();
        scanner
            .scan(Duration::from_millis(100), &mailbox)
            .await
            .unwrap();

        assert_eq!(mailbox.take().unwrap().rssi, -71);
    }

    #[tokio::test]
    async fn test_any_link_dispatch() {
        let (link, _handle) = MockNetworkLink::new(0);
        let mut link = AnyNetworkLink::Mock(link);

        assert!(!link.is_connected());
        link.join("home", "pw").await.unwrap();
        assert!(link.is_connected());
        assert_eq!(link.get_info().await.unwrap().model, "Mock WLAN v1.0");
    }

    #[test]
    fn test_any_scanner_is_send() {
        fn assert_send<T: Send + 'static>() {}
        assert_send::<AnyBeaconScanner>();
        assert_send::<AnyNetworkLink>();
    }
}
