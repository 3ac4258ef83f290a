//! Read-only status surface.

use petdoor_core::{DoorLockState, DoorStatus};
use serde::{Deserialize, Serialize};

use crate::arbitration::Transition;

/// Number of history entries included in a snapshot.
pub const SNAPSHOT_HISTORY_LEN: usize = 10;

/// Point-in-time view of the controller, taken under one lock acquisition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub lock_state: DoorLockState,
    pub door_status: DoorStatus,
    /// Latest beacon RSSI in dBm, if the beacon has been seen.
    pub last_rssi: Option<i16>,
    pub override_threshold: i16,
    pub unlock_cycles: u64,
    pub uptime_secs: u64,
    /// Core temperature sample, if a sensor is attached and readable.
    pub core_temperature_c: Option<f32>,
    /// Most recent transitions, oldest first.
    pub history: Vec<Transition>,
}

impl StatusSnapshot {
    /// One-line summary for the console.
    pub fn summary(&self) -> String {
        let rssi = self
            .last_rssi
            .map_or_else(|| "-".to_string(), |r| format!("{r} dBm"));
        let temp = self
            .core_temperature_c
            .map_or_else(|| "-".to_string(), |t| format!("{t:.1} C"));
        format!(
            "lock={} door={} rssi={} threshold={} cycles={} uptime={}s temp={}",
            self.lock_state,
            self.door_status,
            rssi,
            self.override_threshold,
            self.unlock_cycles,
            self.uptime_secs,
            temp
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_without_readings() {
        let snapshot = StatusSnapshot {
            lock_state: DoorLockState::LockedBySwitch,
            door_status: DoorStatus::Closed,
            last_rssi: None,
            override_threshold: -75,
            unlock_cycles: 3,
            uptime_secs: 42,
            core_temperature_c: None,
            history: Vec::new(),
        };

        assert_eq!(
            snapshot.summary(),
            "lock=LockedBySwitch door=Closed rssi=- threshold=-75 cycles=3 uptime=42s temp=-"
        );
    }

    #[test]
    fn test_serialized_field_names() {
        let snapshot = StatusSnapshot {
            lock_state: DoorLockState::Unlocked,
            door_status: DoorStatus::Open,
            last_rssi: Some(-68),
            override_threshold: -74,
            unlock_cycles: 1,
            uptime_secs: 5,
            core_temperature_c: Some(48.5),
            history: Vec::new(),
        };

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["lock_state"], "unlocked");
        assert_eq!(json["door_status"], "open");
        assert_eq!(json["last_rssi"], -68);
        assert_eq!(json["core_temperature_c"], 48.5);
    }
}
