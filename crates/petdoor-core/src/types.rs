use crate::{
    Result,
    constants::{MAX_RSSI, MIN_RSSI},
    error::Error,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Independent authority that can assert or retract a door lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockSource {
    /// The physically wired lockout switch.
    Switch,
    /// A command received over the control panel.
    Remote,
}

impl LockSource {
    /// All lock sources, in a stable order.
    pub const ALL: [LockSource; 2] = [LockSource::Switch, LockSource::Remote];

    /// Returns the lowercase name used in logs and the control panel.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            LockSource::Switch => "switch",
            LockSource::Remote => "remote",
        }
    }
}

impl fmt::Display for LockSource {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Physical door status.
///
/// `Open` implies the latch actuator is energized, `Closed` implies it is not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DoorStatus {
    #[default]
    Closed,
    Open,
}

impl DoorStatus {
    /// Returns `true` if the door is open.
    #[inline]
    #[must_use]
    pub fn is_open(self) -> bool {
        matches!(self, DoorStatus::Open)
    }
}

impl fmt::Display for DoorStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DoorStatus::Closed => write!(f, "Closed"),
            DoorStatus::Open => write!(f, "Open"),
        }
    }
}

/// Effective lock state: the union of all currently asserting lock sources.
///
/// This is the externally visible view. Internally the arbitration engine
/// tracks a set of sources and derives this value from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DoorLockState {
    #[default]
    Unlocked,
    LockedBySwitch,
    LockedByRemote,
    LockedByBoth,
}

impl DoorLockState {
    /// Build the lock state from which sources currently assert a lock.
    #[must_use]
    pub fn from_sources(switch: bool, remote: bool) -> Self {
        match (switch, remote) {
            (false, false) => DoorLockState::Unlocked,
            (true, false) => DoorLockState::LockedBySwitch,
            (false, true) => DoorLockState::LockedByRemote,
            (true, true) => DoorLockState::LockedByBoth,
        }
    }

    /// Returns `true` if `source` currently asserts a lock.
    #[must_use]
    pub fn is_asserted_by(self, source: LockSource) -> bool {
        matches!(
            (self, source),
            (DoorLockState::LockedByBoth, _)
                | (DoorLockState::LockedBySwitch, LockSource::Switch)
                | (DoorLockState::LockedByRemote, LockSource::Remote)
        )
    }
}

impl fmt::Display for DoorLockState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DoorLockState::Unlocked => write!(f, "Unlocked"),
            DoorLockState::LockedBySwitch => write!(f, "LockedBySwitch"),
            DoorLockState::LockedByRemote => write!(f, "LockedByRemote"),
            DoorLockState::LockedByBoth => write!(f, "LockedByBoth"),
        }
    }
}

/// Validate a raw signal strength reading.
///
/// # Errors
/// Returns `Error::InvalidRssi` if the value is outside `MIN_RSSI..=MAX_RSSI`.
pub fn validate_rssi(value: i64) -> Result<i16> {
    if !(i64::from(MIN_RSSI)..=i64::from(MAX_RSSI)).contains(&value) {
        return Err(Error::InvalidRssi {
            value,
            min: MIN_RSSI,
            max: MAX_RSSI,
        });
    }
    // Range checked above
    Ok(value as i16)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_lock_source_names() {
        assert_eq!(LockSource::Switch.to_string(), "switch");
        assert_eq!(LockSource::Remote.as_str(), "remote");
        assert_eq!(LockSource::ALL, [LockSource::Switch, LockSource::Remote]);
    }

    #[rstest]
    #[case(false, false, DoorLockState::Unlocked)]
    #[case(true, false, DoorLockState::LockedBySwitch)]
    #[case(false, true, DoorLockState::LockedByRemote)]
    #[case(true, true, DoorLockState::LockedByBoth)]
    fn test_lock_state_from_sources(
        #[case] switch: bool,
        #[case] remote: bool,
        #[case] expected: DoorLockState,
    ) {
        let state = DoorLockState::from_sources(switch, remote);
        assert_eq!(state, expected);
        assert_eq!(state.is_asserted_by(LockSource::Switch), switch);
        assert_eq!(state.is_asserted_by(LockSource::Remote), remote);
        assert_eq!(state == DoorLockState::Unlocked, !switch && !remote);
    }

    #[test]
    fn test_door_status_default_closed() {
        assert_eq!(DoorStatus::default(), DoorStatus::Closed);
        assert!(!DoorStatus::Closed.is_open());
        assert!(DoorStatus::Open.is_open());
    }

    #[rstest]
    #[case(-127, true)]
    #[case(-65, true)]
    #[case(0, true)]
    #[case(1, false)]
    #[case(-128, false)]
    fn test_validate_rssi(#[case] value: i64, #[case] valid: bool) {
        assert_eq!(validate_rssi(value).is_ok(), valid);
    }

    #[test]
    fn test_lock_state_serialization() {
        let json = serde_json::to_string(&DoorLockState::LockedByBoth).unwrap();
        assert_eq!(json, "\"locked_by_both\"");
        let json = serde_json::to_string(&LockSource::Remote).unwrap();
        assert_eq!(json, "\"remote\"");
    }
}
