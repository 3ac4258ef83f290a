//! Mock wireless network link.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use tracing::debug;

use crate::{HardwareError, Result, traits::NetworkLink, types::DeviceInfo};

/// Mock network interface that rejects a configurable number of join
/// attempts before succeeding.
///
/// # Examples
///
/// ```
/// use petdoor_hardware::mock::MockNetworkLink;
/// use petdoor_hardware::traits::NetworkLink;
///
/// #[tokio::main]
/// async fn main() {
///     let (mut link, handle) = MockNetworkLink::new(1);
///
///     assert!(link.join("home", "secret").await.is_err());
///     assert!(link.join("home", "secret").await.is_ok());
///     assert!(link.is_connected());
///     assert_eq!(handle.attempts(), 2);
/// }
/// ```
#[derive(Debug)]
pub struct MockNetworkLink {
    state: Arc<LinkState>,
}

#[derive(Debug)]
struct LinkState {
    remaining_failures: AtomicU32,
    attempts: AtomicU32,
    connected: AtomicBool,
}

impl MockNetworkLink {
    /// Create a link that fails the first `failures` join attempts.
    pub fn new(failures: u32) -> (Self, MockNetworkLinkHandle) {
        let state = Arc::new(LinkState {
            remaining_failures: AtomicU32::new(failures),
            attempts: AtomicU32::new(0),
            connected: AtomicBool::new(false),
        });
        let link = Self {
            state: Arc::clone(&state),
        };
        (link, MockNetworkLinkHandle { state })
    }
}

impl Default for MockNetworkLink {
    fn default() -> Self {
        Self::new(0).0
    }
}

impl NetworkLink for MockNetworkLink {
    async fn join(&mut self, ssid: &str, _password: &str) -> Result<()> {
        let attempt = self.state.attempts.fetch_add(1, Ordering::SeqCst) + 1;

        let failed = self
            .state
            .remaining_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();

        if failed {
            debug!(ssid, attempt, "mock join rejected");
            return Err(HardwareError::network_join(ssid, "association rejected"));
        }

        self.state.connected.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.state.connected.load(Ordering::SeqCst)
    }

    async fn get_info(&self) -> Result<DeviceInfo> {
        Ok(DeviceInfo::new("Mock Network Link", "Mock WLAN v1.0"))
    }
}

/// Handle for observing and controlling a mock link.
#[derive(Debug, Clone)]
pub struct MockNetworkLinkHandle {
    state: Arc<LinkState>,
}

impl MockNetworkLinkHandle {
    /// Total join attempts made.
    pub fn attempts(&self) -> u32 {
        self.state.attempts.load(Ordering::SeqCst)
    }

    /// Simulate losing the association.
    pub fn drop_connection(&self) {
        self.state.connected.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fails_configured_times() {
        let (mut link, handle) = MockNetworkLink::new(3);

        for _ in 0..3 {
            let err = link.join("home", "pw").await.unwrap_err();
            assert!(matches!(err, HardwareError::NetworkJoin { .. }));
            assert!(!link.is_connected());
        }

        link.join("home", "pw").await.unwrap();
        assert!(link.is_connected());
        assert_eq!(handle.attempts(), 4);

        handle.drop_connection();
        assert!(!link.is_connected());
    }
}
