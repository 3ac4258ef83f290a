//! Mock BLE scanner implementation for testing and development.
//!
//! This module provides a simulated radio that reports advertisements pushed
//! through a handle, so scan cycles can be scripted without a Bluetooth
//! adapter.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{Instant, timeout_at};

use crate::{
    HardwareError, Result,
    mailbox::ObservationMailbox,
    traits::BeaconScanner,
    types::{Advertisement, DeviceInfo},
};

/// Mock BLE scanner for testing and development.
///
/// Advertisements sent through a [`MockScannerHandle`] are queued and
/// delivered to the mailbox during the next scan window. A scan always lasts
/// the full window, like a real radio, unless the handle has made the radio
/// fail; a failed scan returns at once and leaves queued advertisements for
/// the next window.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use petdoor_hardware::mailbox::ObservationMailbox;
/// use petdoor_hardware::mock::MockScanner;
/// use petdoor_hardware::traits::BeaconScanner;
///
/// #[tokio::main]
/// async fn main() -> petdoor_hardware::Result<()> {
///     let (mut scanner, handle) = MockScanner::new();
///     let mailbox = ObservationMailbox::new("Ellie");
///
///     handle.advertise("Ellie", -70)?;
///     scanner.scan(Duration::from_millis(10), &mailbox).await?;
///
///     assert_eq!(mailbox.take().map(|s| s.rssi), Some(-70));
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockScanner {
    /// Channel receiver for simulated advertisements
    advert_rx: mpsc::UnboundedReceiver<Advertisement>,

    /// Device name
    name: String,

    /// Number of completed scans
    scans: u64,

    /// Shared failure switch
    failing: Arc<AtomicBool>,
}

impl MockScanner {
    /// Create a new mock scanner with the default name.
    ///
    /// Returns a tuple of (MockScanner, MockScannerHandle) where the handle
    /// can be used to simulate advertisements.
    pub fn new() -> (Self, MockScannerHandle) {
        Self::with_name("Mock Scanner".to_string())
    }

    /// Create a new mock scanner with a custom name.
    pub fn with_name(name: String) -> (Self, MockScannerHandle) {
        let (advert_tx, advert_rx) = mpsc::unbounded_channel();
        let failing = Arc::new(AtomicBool::new(false));

        let scanner = Self {
            advert_rx,
            name: name.clone(),
            scans: 0,
            failing: Arc::clone(&failing),
        };

        let handle = MockScannerHandle {
            advert_tx,
            name,
            failing,
        };

        (scanner, handle)
    }

    /// Number of scan windows completed so far.
    pub fn scan_count(&self) -> u64 {
        self.scans
    }
}

impl Default for MockScanner {
    fn default() -> Self {
        Self::new().0
    }
}

impl BeaconScanner for MockScanner {
    async fn scan(&mut self, window: Duration, mailbox: &ObservationMailbox) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(HardwareError::scan_failed("radio not responding"));
        }

        let deadline = Instant::now() + window;

        loop {
            match timeout_at(deadline, self.advert_rx.recv()).await {
                Ok(Some(advert)) => {
                    mailbox.offer(&advert.name, advert.rssi);
                }
                Ok(None) => {
                    return Err(HardwareError::disconnected(
                        "Scanner advertisement channel closed",
                    ));
                }
                // Window elapsed
                Err(_) => break,
            }
        }

        self.scans += 1;
        Ok(())
    }

    async fn get_info(&self) -> Result<DeviceInfo> {
        Ok(DeviceInfo::new(self.name.clone(), "Mock BLE Radio v1.0").with_firmware_version("1.0.0"))
    }
}

/// Handle for controlling a mock scanner.
///
/// The handle can be cloned and shared across tasks.
#[derive(Debug, Clone)]
pub struct MockScannerHandle {
    /// Channel sender for simulated advertisements
    advert_tx: mpsc::UnboundedSender<Advertisement>,

    /// Device name
    name: String,

    /// Shared failure switch
    failing: Arc<AtomicBool>,
}

impl MockScannerHandle {
    /// Queue an advertisement for the next scan window.
    ///
    /// # Errors
    ///
    /// Returns an error if the scanner has been dropped.
    pub fn advertise(&self, name: impl Into<String>, rssi: i16) -> Result<()> {
        self.send(Advertisement::new(name, rssi))
    }

    /// Queue a prepared advertisement.
    ///
    /// # Errors
    ///
    /// Returns an error if the scanner has been dropped.
    pub fn send(&self, advert: Advertisement) -> Result<()> {
        self.advert_tx
            .send(advert)
            .map_err(|_| HardwareError::disconnected("Scanner advertisement channel closed"))
    }

    /// Get the device name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Make subsequent scans fail (`true`) or succeed (`false`).
    pub fn fail_scans(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}
