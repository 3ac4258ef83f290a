//! End-to-end control loop tests on virtual time
//!
//! Spawns both loops against mock devices and drives them with a paused
//! Tokio clock, so scan windows, switch polls, and the open-door watchdog
//! run deterministically.
//!
//! Run with: cargo test --package petdoor-engine --test coordinator_flow

use std::time::Duration;

use petdoor_core::{DoorLockState, DoorStatus, LockSource};
use petdoor_engine::{
    CloseReason, ControlLoops, DoorController, DoorEvent, LoopConfig, ProximityEvaluator,
    SharedDoor,
};
use petdoor_hardware::devices::AnyBeaconScanner;
use petdoor_hardware::mock::{
    MockLatch, MockLatchHandle, MockScanner, MockScannerHandle, MockSwitch, MockSwitchHandle,
};
use petdoor_hardware::{ObservationMailbox, SwitchPolarity};
use tokio::time::sleep;

struct Rig {
    door: SharedDoor,
    loops: ControlLoops,
    radio: MockScannerHandle,
    switch: MockSwitchHandle,
    latch: MockLatchHandle,
}

fn start() -> Rig {
    let (scanner, radio) = MockScanner::new();
    let (switch_dev, switch) = MockSwitch::new(SwitchPolarity::ActiveLow);
    let (latch_dev, latch) = MockLatch::new();

    let door = SharedDoor::new(
        DoorController::builder()
            .with_max_open(Duration::from_secs(10))
            .build(Box::new(latch_dev)),
    );
    let config = LoopConfig {
        scan_window: Duration::from_secs(2),
        scan_interval: Duration::from_millis(50),
        switch_poll: Duration::from_millis(200),
        polarity: SwitchPolarity::ActiveLow,
    };
    let loops = ControlLoops::spawn(
        door.clone(),
        AnyBeaconScanner::Mock(scanner),
        Box::new(switch_dev),
        ObservationMailbox::new("Ellie"),
        ProximityEvaluator::default(),
        config,
    );

    Rig {
        door,
        loops,
        radio,
        switch,
        latch,
    }
}

#[tokio::test(start_paused = true)]
async fn test_beacon_opens_and_watchdog_closes() {
    let rig = start();
    assert_eq!(rig.loops.len(), 2);

    rig.radio.advertise("Ellie", -60).unwrap();

    // First scan window ends at t=2s
    sleep(Duration::from_millis(2_100)).await;
    assert!(rig.latch.is_energized());
    assert_eq!(rig.door.snapshot().door_status, DoorStatus::Open);

    // t=11.1s: open for 9.1s
    sleep(Duration::from_secs(9)).await;
    assert!(rig.latch.is_energized());

    // t=13.1s: past the 10s allowance
    sleep(Duration::from_secs(2)).await;
    assert!(!rig.latch.is_energized());

    let snapshot = rig.door.snapshot();
    assert_eq!(snapshot.door_status, DoorStatus::Closed);
    assert_eq!(snapshot.unlock_cycles, 1);
    assert_eq!(
        snapshot.history.last().map(|t| t.event),
        Some(DoorEvent::Closed {
            reason: CloseReason::Timeout
        })
    );

    rig.loops.shutdown(&rig.door).await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_other_beacons_are_ignored() {
    let rig = start();

    rig.radio.advertise("Phone", -30).unwrap();
    rig.radio.advertise("Rex", -40).unwrap();
    sleep(Duration::from_millis(2_100)).await;

    assert!(!rig.latch.is_energized());
    assert_eq!(rig.door.snapshot().last_rssi, None);

    rig.loops.shutdown(&rig.door).await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_switch_and_remote_arbitration() {
    let rig = start();

    rig.switch.press();
    sleep(Duration::from_millis(300)).await;
    assert_eq!(rig.door.snapshot().lock_state, DoorLockState::LockedBySwitch);

    // Lands in the first scan window, evaluated at t=2s while locked
    rig.radio.advertise("Ellie", -50).unwrap();
    sleep(Duration::from_millis(2_100)).await;
    assert!(!rig.latch.is_energized());

    rig.door.lock(LockSource::Remote);
    rig.switch.release();
    sleep(Duration::from_millis(300)).await;
    assert_eq!(rig.door.snapshot().lock_state, DoorLockState::LockedByRemote);

    rig.door.unlock(LockSource::Remote);
    rig.radio.advertise("Ellie", -50).unwrap();
    sleep(Duration::from_millis(2_100)).await;
    assert!(rig.latch.is_energized());

    rig.loops.shutdown(&rig.door).await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_switch_closes_open_door() {
    let rig = start();

    rig.radio.advertise("Ellie", -60).unwrap();
    sleep(Duration::from_millis(2_100)).await;
    assert!(rig.latch.is_energized());

    rig.switch.press();
    sleep(Duration::from_millis(250)).await;

    let snapshot = rig.door.snapshot();
    assert_eq!(snapshot.door_status, DoorStatus::Closed);
    assert_eq!(snapshot.lock_state, DoorLockState::LockedBySwitch);
    assert!(!rig.latch.is_energized());

    rig.loops.shutdown(&rig.door).await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_forces_door_closed() {
    let rig = start();

    rig.radio.advertise("Ellie", -60).unwrap();
    sleep(Duration::from_millis(2_100)).await;
    assert!(rig.latch.is_energized());

    let door = rig.door.clone();
    rig.loops.shutdown(&door).await.unwrap();

    assert!(!rig.latch.is_energized());
    assert_eq!(door.snapshot().door_status, DoorStatus::Closed);
}

#[tokio::test(start_paused = true)]
async fn test_scan_failures_do_not_stop_the_loop() {
    let rig = start();

    rig.radio.fail_scans(true);
    rig.radio.advertise("Ellie", -60).unwrap();
    sleep(Duration::from_millis(500)).await;
    assert!(!rig.latch.is_energized());
    assert_eq!(rig.loops.len(), 2);

    // Queued advertisement survives the failed scans
    rig.radio.fail_scans(false);
    sleep(Duration::from_millis(2_200)).await;
    assert!(rig.latch.is_energized());
    assert_eq!(rig.door.snapshot().last_rssi, Some(-60));

    rig.loops.shutdown(&rig.door).await.unwrap();
}
