//! Mock latch relay.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use crate::{HardwareError, Result, traits::LatchActuator, types::DeviceInfo};

/// Mock latch relay for testing and development.
///
/// The handle observes the relay output and can inject drive failures.
///
/// # Examples
///
/// ```
/// use petdoor_hardware::mock::MockLatch;
/// use petdoor_hardware::traits::LatchActuator;
///
/// let (mut latch, handle) = MockLatch::new();
/// latch.set_energized(true).unwrap();
/// assert!(handle.is_energized());
///
/// handle.fail_writes(true);
/// assert!(latch.set_energized(false).is_err());
/// assert!(handle.is_energized());
/// ```
#[derive(Debug)]
pub struct MockLatch {
    state: Arc<LatchState>,
}

#[derive(Debug, Default)]
struct LatchState {
    energized: AtomicBool,
    failing: AtomicBool,
    activations: AtomicU64,
}

impl MockLatch {
    /// Create a de-energized latch.
    pub fn new() -> (Self, MockLatchHandle) {
        let state = Arc::new(LatchState::default());
        let latch = Self {
            state: Arc::clone(&state),
        };
        (latch, MockLatchHandle { state })
    }
}

impl LatchActuator for MockLatch {
    fn set_energized(&mut self, energized: bool) -> Result<()> {
        if self.state.failing.load(Ordering::SeqCst) {
            return Err(HardwareError::communication("latch relay not responding"));
        }

        let was = self.state.energized.swap(energized, Ordering::SeqCst);
        if energized && !was {
            self.state.activations.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }

    fn is_energized(&self) -> bool {
        self.state.energized.load(Ordering::SeqCst)
    }

    fn info(&self) -> DeviceInfo {
        DeviceInfo::new("Mock Latch", "Mock Relay Output")
    }
}

/// Handle for observing a mock latch.
#[derive(Debug, Clone)]
pub struct MockLatchHandle {
    state: Arc<LatchState>,
}

impl MockLatchHandle {
    /// Current relay output.
    pub fn is_energized(&self) -> bool {
        self.state.energized.load(Ordering::SeqCst)
    }

    /// Number of de-energized to energized transitions.
    pub fn activation_count(&self) -> u64 {
        self.state.activations.load(Ordering::SeqCst)
    }

    /// Make subsequent writes fail (`true`) or succeed (`false`).
    pub fn fail_writes(&self, failing: bool) {
        self.state.failing.store(failing, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activation_count() {
        let (mut latch, handle) = MockLatch::new();

        latch.set_energized(true).unwrap();
        latch.set_energized(true).unwrap();
        latch.set_energized(false).unwrap();
        latch.set_energized(true).unwrap();

        assert_eq!(handle.activation_count(), 2);
        assert!(latch.is_energized());
    }

    #[test]
    fn test_injected_failure_keeps_level() {
        let (mut latch, handle) = MockLatch::new();
        handle.fail_writes(true);

        let err = latch.set_energized(true).unwrap_err();
        assert!(matches!(err, HardwareError::CommunicationError { .. }));
        assert!(!handle.is_energized());

        handle.fail_writes(false);
        latch.set_energized(true).unwrap();
        assert!(handle.is_energized());
    }
}
