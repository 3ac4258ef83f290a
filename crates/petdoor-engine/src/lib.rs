//! Door-access arbitration engine for the petdoor controller.
//!
//! This crate turns beacon sightings, switch readings, and control-panel
//! commands into latch actuation:
//!
//! - [`proximity`] - classifies RSSI readings into a [`ProximityTrend`]
//! - [`arbitration`] - the multi-source lock state machine and door status
//! - [`coordinator`] - the shared state handle and the two control loops
//! - [`status`] - the read-only status snapshot
//!
//! # Examples
//!
//! ```
//! use petdoor_core::{DoorStatus, LockSource};
//! use petdoor_engine::{DoorController, SharedDoor};
//! use petdoor_hardware::mock::MockLatch;
//!
//! let (latch, _handle) = MockLatch::new();
//! let door = SharedDoor::new(DoorController::new(Box::new(latch)));
//!
//! door.lock(LockSource::Remote);
//! assert!(door.open_door().is_ok());
//! assert_eq!(door.snapshot().door_status, DoorStatus::Closed);
//! ```

pub mod arbitration;
pub mod coordinator;
pub mod error;
pub mod proximity;
pub mod status;

pub use arbitration::{
    CloseReason, DoorController, DoorControllerBuilder, DoorEvent, LockSet, LockTimer,
    OpenOutcome, OpenRejection, Transition,
};
pub use coordinator::{ControlLoops, LoopConfig, SharedDoor, run_background, run_foreground};
pub use error::{EngineError, EngineResult};
pub use proximity::{ProximityConfig, ProximityEvaluator, ProximityHistory, ProximityTrend};
pub use status::StatusSnapshot;
