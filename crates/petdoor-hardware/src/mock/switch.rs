//! Mock lockout switch.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::{
    Result,
    traits::LockoutSwitch,
    types::{DeviceInfo, PinLevel, SwitchPolarity},
};

/// Mock lockout switch for testing and development.
///
/// The simulated input idles at the released level for its polarity.
///
/// # Examples
///
/// ```
/// use petdoor_hardware::mock::MockSwitch;
/// use petdoor_hardware::traits::LockoutSwitch;
/// use petdoor_hardware::types::{PinLevel, SwitchPolarity};
///
/// let (switch, handle) = MockSwitch::new(SwitchPolarity::ActiveLow);
/// assert_eq!(switch.read_level().unwrap(), PinLevel::High);
///
/// handle.press();
/// assert_eq!(switch.read_level().unwrap(), PinLevel::Low);
/// ```
#[derive(Debug)]
pub struct MockSwitch {
    level: Arc<AtomicBool>,
    name: String,
}

impl MockSwitch {
    /// Create a released switch wired with `polarity`.
    pub fn new(polarity: SwitchPolarity) -> (Self, MockSwitchHandle) {
        let released = polarity.asserted_level() == PinLevel::Low;
        let level = Arc::new(AtomicBool::new(released));

        let switch = Self {
            level: Arc::clone(&level),
            name: "Mock Lockout Switch".to_string(),
        };
        let handle = MockSwitchHandle { level, polarity };

        (switch, handle)
    }
}

impl LockoutSwitch for MockSwitch {
    fn read_level(&self) -> Result<PinLevel> {
        Ok(PinLevel::from_bool(self.level.load(Ordering::SeqCst)))
    }

    fn info(&self) -> DeviceInfo {
        DeviceInfo::new(self.name.clone(), "Mock GPIO Input")
    }
}

/// Handle for flipping a mock switch.
#[derive(Debug, Clone)]
pub struct MockSwitchHandle {
    level: Arc<AtomicBool>,
    polarity: SwitchPolarity,
}

impl MockSwitchHandle {
    /// Drive the raw input level.
    pub fn set_level(&self, level: PinLevel) {
        self.level.store(level == PinLevel::High, Ordering::SeqCst);
    }

    /// Move the switch to the asserted (lock) position.
    pub fn press(&self) {
        self.set_level(self.polarity.asserted_level());
    }

    /// Move the switch to the released position.
    pub fn release(&self) {
        let level = match self.polarity.asserted_level() {
            PinLevel::Low => PinLevel::High,
            PinLevel::High => PinLevel::Low,
        };
        self.set_level(level);
    }

    /// Returns `true` if the switch is in the asserted position.
    pub fn is_pressed(&self) -> bool {
        self.polarity
            .is_asserted(PinLevel::from_bool(self.level.load(Ordering::SeqCst)))
    }
}
