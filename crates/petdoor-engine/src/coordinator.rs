//! Concurrency coordinator.
//!
//! Three writers touch the arbitration state: the foreground scan loop, the
//! background switch/watchdog loop, and the control panel. All of them go
//! through [`SharedDoor`], which holds the [`DoorController`] behind one
//! mutex, so each lock/unlock/open/close applies as a single indivisible
//! step. The loops never wait on each other.
//!
//! ```text
//!  foreground (scan window + interval)    background (every switch_poll)
//!  ──────────────────────────────────     ──────────────────────────────
//!  scan → mailbox.take()                  read switch
//!       → evaluator.evaluate()              asserted: close + lock(Switch)
//!       → open_door() on InRange/Approach   released: unlock(Switch)
//!                 │                         close_if_expired()
//!                 ▼                                  │
//!            ┌─────────────── SharedDoor ◄───────────┘
//!            │ Mutex<DoorController>    ◄──── control panel
//!            └──────────────────────────
//! ```

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use petdoor_core::constants::{
    DEFAULT_SCAN_INTERVAL_MS, DEFAULT_SCAN_WINDOW_MS, DEFAULT_SWITCH_POLL_MS,
};
use petdoor_core::{DoorLockState, LockSource};
use petdoor_hardware::devices::AnyBeaconScanner;
use petdoor_hardware::{
    BeaconScanner, LockoutSwitch, ObservationMailbox, SwitchPolarity, TemperatureSensor,
};
use tokio::task::JoinSet;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::arbitration::{CloseReason, DoorController, OpenOutcome};
use crate::error::{EngineError, EngineResult};
use crate::proximity::{ProximityEvaluator, ProximityTrend};
use crate::status::{SNAPSHOT_HISTORY_LEN, StatusSnapshot};

/// Cloneable handle to the shared arbitration state.
#[derive(Clone)]
pub struct SharedDoor {
    controller: Arc<Mutex<DoorController>>,
    started_at: Instant,
    sensor: Option<Arc<dyn TemperatureSensor>>,
}

impl std::fmt::Debug for SharedDoor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedDoor")
            .field("started_at", &self.started_at)
            .field("has_sensor", &self.sensor.is_some())
            .finish_non_exhaustive()
    }
}

impl SharedDoor {
    pub fn new(controller: DoorController) -> Self {
        Self {
            controller: Arc::new(Mutex::new(controller)),
            started_at: Instant::now(),
            sensor: None,
        }
    }

    /// Attach a core temperature sensor for the status surface.
    pub fn with_sensor(mut self, sensor: Arc<dyn TemperatureSensor>) -> Self {
        self.sensor = Some(sensor);
        self
    }

    /// Run `f` with exclusive access to the controller.
    pub fn with<R>(&self, f: impl FnOnce(&mut DoorController) -> R) -> R {
        let mut guard = self.controller.lock();
        f(&mut *guard)
    }

    pub fn lock(&self, source: LockSource) -> DoorLockState {
        self.with(|door| door.lock(source))
    }

    pub fn unlock(&self, source: LockSource) -> DoorLockState {
        self.with(|door| door.unlock(source))
    }

    pub fn open_door(&self) -> EngineResult<OpenOutcome> {
        self.with(|door| door.open_door(Instant::now()))
    }

    pub fn close_door(&self, reason: CloseReason) -> EngineResult<bool> {
        self.with(|door| door.close_door(reason))
    }

    pub fn raise_threshold(&self) -> i16 {
        self.with(DoorController::raise_threshold)
    }

    pub fn lower_threshold(&self) -> i16 {
        self.with(DoorController::lower_threshold)
    }

    pub fn override_threshold(&self) -> i16 {
        self.with(|door| door.override_threshold())
    }

    /// Time since this handle was created.
    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Take a consistent status snapshot.
    pub fn snapshot(&self) -> StatusSnapshot {
        // Sample outside the lock; a slow sensor must not stall the loops
        let core_temperature_c = self.sensor.as_ref().and_then(|sensor| {
            sensor
                .read_celsius()
                .map_err(|e| warn!(error = %e, "temperature read failed"))
                .ok()
        });
        let uptime_secs = self.uptime().as_secs();

        self.with(|door| StatusSnapshot {
            lock_state: door.lock_state(),
            door_status: door.door_status(),
            last_rssi: door.last_rssi(),
            override_threshold: door.override_threshold(),
            unlock_cycles: door.unlock_cycles(),
            uptime_secs,
            core_temperature_c,
            history: door.last_transitions(SNAPSHOT_HISTORY_LEN),
        })
    }

    /// One foreground cycle after a scan window: consume the pending
    /// sighting, classify it, and open the door on an open-worthy trend.
    pub fn foreground_step(
        &self,
        mailbox: &ObservationMailbox,
        evaluator: &mut ProximityEvaluator,
    ) -> Option<ProximityTrend> {
        let sample = mailbox.take();

        let threshold = self.with(|door| {
            if let Some(sample) = sample {
                door.record_rssi(sample.rssi);
            }
            door.override_threshold()
        });
        evaluator.set_override_threshold(threshold);

        let trend = evaluator.evaluate(sample.map(|s| s.rssi));
        if let Some(trend) = trend.filter(|t| t.should_open()) {
            match self.open_door() {
                Ok(OpenOutcome::Opened) => info!(?trend, "beacon triggered open"),
                Ok(OpenOutcome::Rejected(reason)) => {
                    debug!(?trend, %reason, "beacon open rejected");
                }
                Err(e) => error!(error = %e, "beacon open failed"),
            }
        }
        trend
    }

    /// One background cycle: apply the switch reading, then the open-door
    /// watchdog, as a single step.
    ///
    /// `switch_asserted` is `None` when the switch could not be read; the
    /// lock set is then left alone but the watchdog still runs.
    pub fn background_step(&self, switch_asserted: Option<bool>, now: Instant) -> EngineResult<()> {
        self.with(|door| {
            let closed = match switch_asserted {
                Some(true) => {
                    let closed = door.close_door(CloseReason::Switch).map(|_| ());
                    door.lock(LockSource::Switch);
                    closed
                }
                Some(false) => {
                    door.unlock(LockSource::Switch);
                    Ok(())
                }
                None => Ok(()),
            };
            let expired = door.close_if_expired(now).map(|_| ());
            closed.and(expired)
        })
    }
}

/// Timing for the two control loops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopConfig {
    /// Length of one BLE scan.
    pub scan_window: Duration,
    /// Delay after each foreground cycle.
    pub scan_interval: Duration,
    /// Background loop period.
    pub switch_poll: Duration,
    /// How the switch level maps to "asserted".
    pub polarity: SwitchPolarity,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            scan_window: Duration::from_millis(DEFAULT_SCAN_WINDOW_MS),
            scan_interval: Duration::from_millis(DEFAULT_SCAN_INTERVAL_MS),
            switch_poll: Duration::from_millis(DEFAULT_SWITCH_POLL_MS),
            polarity: SwitchPolarity::default(),
        }
    }
}

/// Foreground loop: scan, evaluate, maybe open. Runs until aborted.
pub async fn run_foreground(
    door: SharedDoor,
    mut scanner: AnyBeaconScanner,
    mailbox: ObservationMailbox,
    mut evaluator: ProximityEvaluator,
    config: LoopConfig,
) {
    info!(
        beacon = %mailbox.target(),
        window_ms = config.scan_window.as_millis() as u64,
        "foreground loop started"
    );

    loop {
        if let Err(e) = scanner.scan(config.scan_window, &mailbox).await {
            error!(error = %EngineError::Scan(e), "scan cycle failed");
        }
        door.foreground_step(&mailbox, &mut evaluator);
        tokio::time::sleep(config.scan_interval).await;
    }
}

/// Background loop: switch poll and open-door watchdog. Runs until aborted.
pub async fn run_background(door: SharedDoor, switch: Box<dyn LockoutSwitch>, config: LoopConfig) {
    info!(poll_ms = config.switch_poll.as_millis() as u64, "background loop started");

    let mut ticker = tokio::time::interval(config.switch_poll);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;

        let asserted = match switch.read_level() {
            Ok(level) => Some(config.polarity.is_asserted(level)),
            Err(e) => {
                error!(error = %EngineError::Switch(e), "switch poll failed");
                None
            }
        };

        if let Err(e) = door.background_step(asserted, Instant::now()) {
            error!(error = %e, "background cycle failed");
        }
    }
}

/// Running control loops.
#[derive(Debug)]
pub struct ControlLoops {
    tasks: JoinSet<()>,
}

impl ControlLoops {
    /// Spawn both loops on the current Tokio runtime.
    pub fn spawn(
        door: SharedDoor,
        scanner: AnyBeaconScanner,
        switch: Box<dyn LockoutSwitch>,
        mailbox: ObservationMailbox,
        evaluator: ProximityEvaluator,
        config: LoopConfig,
    ) -> Self {
        let mut tasks = JoinSet::new();
        tasks.spawn(run_foreground(door.clone(), scanner, mailbox, evaluator, config));
        tasks.spawn(run_background(door, switch, config));
        Self { tasks }
    }

    /// Number of loops still running.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Abort both loops, wait for them, then force the door closed.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Actuator`] if the final close fails.
    pub async fn shutdown(mut self, door: &SharedDoor) -> EngineResult<()> {
        self.tasks.abort_all();

        while let Some(result) = self.tasks.join_next().await {
            match result {
                Ok(()) => {}
                Err(e) if e.is_cancelled() => {}
                Err(e) => error!(error = %e, "control loop panicked"),
            }
        }

        door.close_door(CloseReason::Shutdown)?;
        info!("control loops stopped, door closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proximity::ProximityConfig;
    use petdoor_core::DoorStatus;
    use petdoor_hardware::mock::{MockLatch, MockLatchHandle, MockTemperature};

    fn shared() -> (SharedDoor, MockLatchHandle) {
        let (latch, handle) = MockLatch::new();
        (SharedDoor::new(DoorController::new(Box::new(latch))), handle)
    }

    #[test]
    fn test_switch_asserted_closes_then_locks() {
        let (door, latch) = shared();
        door.open_door().unwrap();

        door.background_step(Some(true), Instant::now()).unwrap();

        let snapshot = door.snapshot();
        assert_eq!(snapshot.door_status, DoorStatus::Closed);
        assert_eq!(snapshot.lock_state, DoorLockState::LockedBySwitch);
        assert!(!latch.is_energized());
    }

    #[test]
    fn test_switch_release_keeps_remote_lock() {
        let (door, _) = shared();
        door.lock(LockSource::Remote);
        door.background_step(Some(true), Instant::now()).unwrap();
        assert_eq!(door.snapshot().lock_state, DoorLockState::LockedByBoth);

        door.background_step(Some(false), Instant::now()).unwrap();
        assert_eq!(door.snapshot().lock_state, DoorLockState::LockedByRemote);
    }

    #[test]
    fn test_unreadable_switch_still_runs_watchdog() {
        let (door, _) = shared();
        door.open_door().unwrap();

        let later = Instant::now() + Duration::from_secs(11);
        door.background_step(None, later).unwrap();

        assert_eq!(door.snapshot().door_status, DoorStatus::Closed);
    }

    #[test]
    fn test_switch_lock_applied_even_if_close_fails() {
        let (door, latch) = shared();
        door.open_door().unwrap();
        latch.fail_writes(true);

        assert!(door.background_step(Some(true), Instant::now()).is_err());
        assert_eq!(door.snapshot().lock_state, DoorLockState::LockedBySwitch);
    }

    #[test]
    fn test_foreground_step_opens_on_in_range() {
        let (door, latch) = shared();
        let mailbox = ObservationMailbox::new("Ellie");
        let mut evaluator = ProximityEvaluator::default();

        mailbox.offer("Ellie", -60);
        let trend = door.foreground_step(&mailbox, &mut evaluator);

        assert_eq!(trend, Some(ProximityTrend::InRange));
        assert!(latch.is_energized());
        let snapshot = door.snapshot();
        assert_eq!(snapshot.last_rssi, Some(-60));
        assert_eq!(snapshot.unlock_cycles, 1);
    }

    #[test]
    fn test_foreground_step_uses_current_threshold() {
        let (door, latch) = shared();
        let mailbox = ObservationMailbox::new("Ellie");
        let mut evaluator = ProximityEvaluator::new(ProximityConfig {
            override_threshold: -75,
            ..Default::default()
        });

        // Panel lowers the shared threshold from the default -75 to -76
        door.lower_threshold();
        mailbox.offer("Ellie", -76);
        assert_eq!(
            door.foreground_step(&mailbox, &mut evaluator),
            Some(ProximityTrend::InRange)
        );
        assert!(latch.is_energized());
    }

    #[test]
    fn test_foreground_step_locked_door_stays_shut() {
        let (door, latch) = shared();
        door.lock(LockSource::Remote);
        let mailbox = ObservationMailbox::new("Ellie");
        let mut evaluator = ProximityEvaluator::default();

        mailbox.offer("Ellie", -50);
        door.foreground_step(&mailbox, &mut evaluator);

        assert!(!latch.is_energized());
        assert_eq!(door.snapshot().unlock_cycles, 0);
    }

    #[test]
    fn test_snapshot_includes_temperature() {
        let (latch, _) = MockLatch::new();
        let (sensor, sensor_handle) = MockTemperature::new(40.0);
        let door = SharedDoor::new(DoorController::new(Box::new(latch)))
            .with_sensor(Arc::new(sensor));

        sensor_handle.set_celsius(51.5);
        assert_eq!(door.snapshot().core_temperature_c, Some(51.5));
    }
}
