//! Lock arbitration state machine.
//!
//! Two independent authorities can lock the door: the wired lockout switch
//! and the remote control panel. The controller tracks the *set* of sources
//! currently asserting a lock, so one authority's unlock never clears the
//! other's lock:
//!
//! ```text
//!                lock(Switch)                lock(Remote)
//!   Unlocked ───────────────► LockedBySwitch ───────────► LockedByBoth
//!      ▲      unlock(Switch)        │         unlock(Remote)     │
//!      └────────────────────────────┘ ◄──────────────────────────┘
//! ```
//!
//! (and symmetrically for the remote source). The door opens only while no
//! source holds a lock; closing is always permitted.
//!
//! # Examples
//!
//! ```
//! use petdoor_core::{DoorLockState, LockSource};
//! use petdoor_engine::arbitration::{DoorController, OpenOutcome};
//! use petdoor_hardware::mock::MockLatch;
//! use tokio::time::Instant;
//!
//! let (latch, handle) = MockLatch::new();
//! let mut door = DoorController::new(Box::new(latch));
//!
//! door.lock(LockSource::Switch);
//! door.lock(LockSource::Remote);
//! door.unlock(LockSource::Switch);
//! assert_eq!(door.lock_state(), DoorLockState::LockedByRemote);
//!
//! assert!(matches!(door.open_door(Instant::now()).unwrap(), OpenOutcome::Rejected(_)));
//!
//! door.unlock(LockSource::Remote);
//! assert_eq!(door.open_door(Instant::now()).unwrap(), OpenOutcome::Opened);
//! assert!(handle.is_energized());
//! ```

use std::collections::VecDeque;
use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use petdoor_core::constants::{
    DEFAULT_MAX_OPEN_SECS, DEFAULT_OVERRIDE_THRESHOLD, MAX_RSSI, MIN_RSSI,
};
use petdoor_core::{DoorLockState, DoorStatus, LockSource};
use petdoor_hardware::LatchActuator;
use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use crate::error::{EngineError, EngineResult};

/// Maximum number of transitions kept in history.
pub const MAX_HISTORY_SIZE: usize = 100;

/// Set of lock sources currently asserting a lock.
///
/// The empty set is `Unlocked`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct LockSet {
    switch: bool,
    remote: bool,
}

impl LockSet {
    /// The empty set.
    pub const EMPTY: LockSet = LockSet {
        switch: false,
        remote: false,
    };

    fn slot(&mut self, source: LockSource) -> &mut bool {
        match source {
            LockSource::Switch => &mut self.switch,
            LockSource::Remote => &mut self.remote,
        }
    }

    /// Add `source`. Returns `true` if it was not already present.
    pub fn insert(&mut self, source: LockSource) -> bool {
        !std::mem::replace(self.slot(source), true)
    }

    /// Remove `source`. Returns `true` if it was present.
    pub fn remove(&mut self, source: LockSource) -> bool {
        std::mem::replace(self.slot(source), false)
    }

    /// Returns `true` if no source holds a lock.
    pub fn is_empty(&self) -> bool {
        !self.switch && !self.remote
    }

    /// The externally visible lock state.
    pub fn state(&self) -> DoorLockState {
        DoorLockState::from_sources(self.switch, self.remote)
    }
}

impl From<DoorLockState> for LockSet {
    fn from(state: DoorLockState) -> Self {
        LockSet {
            switch: state.is_asserted_by(LockSource::Switch),
            remote: state.is_asserted_by(LockSource::Remote),
        }
    }
}

/// Open-door watchdog timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockTimer {
    opened_at: Option<Instant>,
    max_open: Duration,
}

impl LockTimer {
    pub fn new(max_open: Duration) -> Self {
        Self {
            opened_at: None,
            max_open,
        }
    }

    /// When the door was opened, `None` while closed.
    pub fn opened_at(&self) -> Option<Instant> {
        self.opened_at
    }

    /// Allowed open duration.
    pub fn max_open(&self) -> Duration {
        self.max_open
    }

    /// Returns `true` if the door has been open longer than allowed at `now`.
    pub fn is_expired(&self, now: Instant) -> bool {
        self.opened_at
            .is_some_and(|opened| now.saturating_duration_since(opened) > self.max_open)
    }

    fn start(&mut self, now: Instant) {
        self.opened_at = Some(now);
    }

    fn clear(&mut self) {
        self.opened_at = None;
    }
}

/// Why the door was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CloseReason {
    /// Explicit request from the control panel.
    Requested,
    /// The lockout switch was asserted.
    Switch,
    /// Open longer than the allowed duration.
    Timeout,
    /// Controller shutting down.
    Shutdown,
}

impl fmt::Display for CloseReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CloseReason::Requested => "requested",
            CloseReason::Switch => "switch",
            CloseReason::Timeout => "timeout",
            CloseReason::Shutdown => "shutdown",
        };
        f.write_str(s)
    }
}

/// What changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DoorEvent {
    Locked { source: LockSource },
    Unlocked { source: LockSource },
    Opened,
    Closed { reason: CloseReason },
}

/// A recorded change of lock state or door status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    #[serde(flatten)]
    pub event: DoorEvent,
    /// Lock state after the change.
    pub lock_state: DoorLockState,
    /// Door status after the change.
    pub door_status: DoorStatus,
    /// Wall-clock time of the change.
    pub at: DateTime<Utc>,
}

/// Why an open request left the door shut.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpenRejection {
    /// At least one source holds a lock.
    DoorLocked,
    /// The door is already open.
    AlreadyOpen,
}

impl fmt::Display for OpenRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpenRejection::DoorLocked => f.write_str("door_locked"),
            OpenRejection::AlreadyOpen => f.write_str("already_open"),
        }
    }
}

/// Result of [`DoorController::open_door`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenOutcome {
    Opened,
    Rejected(OpenRejection),
}

/// Single owner of the arbitration state and the latch relay.
///
/// Not synchronized by itself; the coordinator wraps it in a mutex so every
/// operation applies as one indivisible step.
pub struct DoorController {
    locks: LockSet,
    status: DoorStatus,
    timer: LockTimer,
    unlock_cycles: u64,
    latch: Box<dyn LatchActuator>,
    history: VecDeque<Transition>,
    last_rssi: Option<i16>,
    override_threshold: i16,
}

impl fmt::Debug for DoorController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DoorController")
            .field("locks", &self.locks)
            .field("status", &self.status)
            .field("timer", &self.timer)
            .field("unlock_cycles", &self.unlock_cycles)
            .field("latch", &self.latch.info().name)
            .finish_non_exhaustive()
    }
}

impl DoorController {
    /// Create an unlocked, closed controller with default limits.
    pub fn new(latch: Box<dyn LatchActuator>) -> Self {
        Self::builder().build(latch)
    }

    pub fn builder() -> DoorControllerBuilder {
        DoorControllerBuilder::default()
    }

    pub fn lock_state(&self) -> DoorLockState {
        self.locks.state()
    }

    pub fn door_status(&self) -> DoorStatus {
        self.status
    }

    pub fn timer(&self) -> &LockTimer {
        &self.timer
    }

    /// Number of successful opens since start.
    pub fn unlock_cycles(&self) -> u64 {
        self.unlock_cycles
    }

    /// Most recent beacon RSSI seen by the scan loop.
    pub fn last_rssi(&self) -> Option<i16> {
        self.last_rssi
    }

    /// Current door-override RSSI threshold.
    pub fn override_threshold(&self) -> i16 {
        self.override_threshold
    }

    /// Recorded transitions, oldest first.
    pub fn history(&self) -> &VecDeque<Transition> {
        &self.history
    }

    /// The last `count` transitions, oldest first.
    pub fn last_transitions(&self, count: usize) -> Vec<Transition> {
        let skip = self.history.len().saturating_sub(count);
        self.history.iter().skip(skip).cloned().collect()
    }

    /// Assert a lock from `source`. Idempotent.
    pub fn lock(&mut self, source: LockSource) -> DoorLockState {
        if self.locks.insert(source) {
            info!(%source, state = %self.locks.state(), "lock asserted");
            self.record(DoorEvent::Locked { source });
        }
        self.locks.state()
    }

    /// Retract `source`'s lock. A source cannot clear a lock it did not
    /// assert.
    pub fn unlock(&mut self, source: LockSource) -> DoorLockState {
        if self.locks.remove(source) {
            info!(%source, state = %self.locks.state(), "lock retracted");
            self.record(DoorEvent::Unlocked { source });
        }
        self.locks.state()
    }

    /// Open the door if it is closed and fully unlocked.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Actuator`] if the latch cannot be energized.
    /// The door stays closed in that case.
    pub fn open_door(&mut self, now: Instant) -> EngineResult<OpenOutcome> {
        if self.status.is_open() {
            debug!("open ignored, door already open");
            return Ok(OpenOutcome::Rejected(OpenRejection::AlreadyOpen));
        }
        if !self.locks.is_empty() {
            debug!(state = %self.locks.state(), "open ignored, door locked");
            return Ok(OpenOutcome::Rejected(OpenRejection::DoorLocked));
        }

        self.latch.set_energized(true).map_err(|e| {
            error!(error = %e, "failed to energize latch");
            EngineError::Actuator(e)
        })?;

        self.status = DoorStatus::Open;
        self.timer.start(now);
        self.unlock_cycles += 1;
        info!(cycles = self.unlock_cycles, "door opened");
        self.record(DoorEvent::Opened);

        Ok(OpenOutcome::Opened)
    }

    /// De-energize the latch and mark the door closed. Always permitted.
    ///
    /// Returns `true` if the door was open.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Actuator`] if the latch cannot be
    /// de-energized. The door remains marked open so a later call retries.
    pub fn close_door(&mut self, reason: CloseReason) -> EngineResult<bool> {
        self.latch.set_energized(false).map_err(|e| {
            error!(error = %e, %reason, "failed to de-energize latch");
            EngineError::Actuator(e)
        })?;

        self.timer.clear();
        if !self.status.is_open() {
            return Ok(false);
        }

        self.status = DoorStatus::Closed;
        info!(%reason, "door closed");
        self.record(DoorEvent::Closed { reason });
        Ok(true)
    }

    /// Force the door closed if it has been open too long at `now`.
    ///
    /// Returns `true` if the door was closed by this call.
    pub fn close_if_expired(&mut self, now: Instant) -> EngineResult<bool> {
        if !self.timer.is_expired(now) {
            return Ok(false);
        }
        warn!(max_open_secs = self.timer.max_open().as_secs(), "door open too long, forcing close");
        self.close_door(CloseReason::Timeout)
    }

    /// Record the latest beacon RSSI for the status surface.
    pub fn record_rssi(&mut self, rssi: i16) {
        self.last_rssi = Some(rssi);
    }

    /// Move the override threshold by `delta`, clamped to the RSSI range.
    ///
    /// Returns the new threshold.
    pub fn adjust_threshold(&mut self, delta: i16) -> i16 {
        let adjusted = self
            .override_threshold
            .saturating_add(delta)
            .clamp(MIN_RSSI, MAX_RSSI);
        if adjusted != self.override_threshold {
            info!(from = self.override_threshold, to = adjusted, "override threshold changed");
            self.override_threshold = adjusted;
        }
        adjusted
    }

    /// Raise the override threshold by one.
    pub fn raise_threshold(&mut self) -> i16 {
        self.adjust_threshold(1)
    }

    /// Lower the override threshold by one.
    pub fn lower_threshold(&mut self) -> i16 {
        self.adjust_threshold(-1)
    }

    fn record(&mut self, event: DoorEvent) {
        self.history.push_back(Transition {
            event,
            lock_state: self.locks.state(),
            door_status: self.status,
            at: Utc::now(),
        });
        if self.history.len() > MAX_HISTORY_SIZE {
            self.history.pop_front();
        }
    }
}

/// Builder for [`DoorController`].
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use petdoor_core::{DoorLockState, LockSource};
/// use petdoor_engine::arbitration::DoorController;
/// use petdoor_hardware::mock::MockLatch;
///
/// let (latch, _handle) = MockLatch::new();
/// let door = DoorController::builder()
///     .with_max_open(Duration::from_secs(5))
///     .with_override_threshold(-70)
///     .with_lock_state(DoorLockState::LockedByRemote)
///     .build(Box::new(latch));
///
/// assert_eq!(door.lock_state(), DoorLockState::LockedByRemote);
/// assert_eq!(door.override_threshold(), -70);
/// ```
#[derive(Debug)]
pub struct DoorControllerBuilder {
    max_open: Duration,
    override_threshold: i16,
    locks: LockSet,
}

impl DoorControllerBuilder {
    /// Set how long the door may stay open.
    pub fn with_max_open(mut self, max_open: Duration) -> Self {
        self.max_open = max_open;
        self
    }

    /// Set the initial override threshold (clamped to the RSSI range).
    pub fn with_override_threshold(mut self, threshold: i16) -> Self {
        self.override_threshold = threshold.clamp(MIN_RSSI, MAX_RSSI);
        self
    }

    /// Start with sources already asserting a lock.
    pub fn with_lock_state(mut self, state: DoorLockState) -> Self {
        self.locks = state.into();
        self
    }

    /// Build the controller. The door starts closed.
    pub fn build(self, latch: Box<dyn LatchActuator>) -> DoorController {
        DoorController {
            locks: self.locks,
            status: DoorStatus::Closed,
            timer: LockTimer::new(self.max_open),
            unlock_cycles: 0,
            latch,
            history: VecDeque::with_capacity(MAX_HISTORY_SIZE),
            last_rssi: None,
            override_threshold: self.override_threshold,
        }
    }
}

impl Default for DoorControllerBuilder {
    fn default() -> Self {
        Self {
            max_open: Duration::from_secs(DEFAULT_MAX_OPEN_SECS),
            override_threshold: DEFAULT_OVERRIDE_THRESHOLD,
            locks: LockSet::EMPTY,
        }
    }
}
