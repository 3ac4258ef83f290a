//! Controller startup and shutdown.
//!
//! Startup order follows the device: load credentials, join the network,
//! start the control loops and the control panel. Shutdown aborts the loops
//! and leaves the door closed.

use std::future::Future;
use std::sync::Arc;

use anyhow::Context;
use petdoor_engine::{ControlLoops, DoorController, ProximityEvaluator, SharedDoor};
use petdoor_hardware::ObservationMailbox;
use petdoor_hardware::devices::{AnyBeaconScanner, AnyNetworkLink};
use petdoor_hardware::mock::{
    MockLatch, MockNetworkLink, MockScanner, MockSwitch, MockTemperature,
};
use petdoor_network::{HttpServer, HttpServerConfig, join_with_retry};
use petdoor_storage::DeviceCredentials;
use tokio::sync::oneshot;
use tracing::{error, info};

use crate::commands::open_store;
use crate::config::DaemonConfig;
use crate::console::{EmulatorConsole, HELP, spawn_stdin_reader};

/// Core temperature reported by the emulated sensor at startup.
const EMULATED_CORE_TEMP_C: f32 = 45.0;

/// Runtime switches that are not part of the config file.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Read emulator commands from stdin.
    pub console: bool,
}

/// Run the controller until `shutdown` completes.
///
/// # Errors
///
/// Fails if the store is unprovisioned, the control panel cannot bind, or
/// the final door close fails.
pub async fn run_until<F>(
    config: DaemonConfig,
    options: RunOptions,
    shutdown: F,
) -> anyhow::Result<()>
where
    F: Future<Output = ()>,
{
    let store = open_store(&config.store)?;
    let credentials = DeviceCredentials::load(&store)
        .context("device is not provisioned, run `petdoord provision` first")?;
    info!(
        beacon = %credentials.beacon_name,
        network = %credentials.network_name,
        "credentials loaded"
    );

    let (link, _link_handle) = MockNetworkLink::new(0);
    let mut link = AnyNetworkLink::Mock(link);
    join_with_retry(
        &mut link,
        &credentials.network_name,
        &credentials.network_secret,
        config.retry_interval(),
    )
    .await;

    let (scanner, scanner_handle) = MockScanner::new();
    let (switch, switch_handle) = MockSwitch::new(config.polarity());
    let (latch, _latch_handle) = MockLatch::new();
    let (sensor, temperature_handle) = MockTemperature::new(EMULATED_CORE_TEMP_C);

    let controller = DoorController::builder()
        .with_max_open(config.max_open())
        .with_override_threshold(config.proximity.override_threshold)
        .build(Box::new(latch));
    let door = SharedDoor::new(controller).with_sensor(Arc::new(sensor));

    let server = HttpServer::bind(HttpServerConfig {
        bind_addr: config.http.bind,
    })
    .await?;
    info!(addr = %server.local_addr()?, "control panel ready");

    let loops = ControlLoops::spawn(
        door.clone(),
        AnyBeaconScanner::Mock(scanner),
        Box::new(switch),
        ObservationMailbox::new(credentials.beacon_name.clone()),
        ProximityEvaluator::new(config.proximity),
        config.loop_config(),
    );

    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let http = tokio::spawn(server.serve(door.clone(), async move {
        let _ = stop_rx.await;
    }));

    // Held until shutdown so the emulated radio stays connected after stdin closes
    let emulator = EmulatorConsole {
        scanner: scanner_handle,
        switch: switch_handle,
        temperature: temperature_handle,
    };
    let console = if options.console {
        let input = spawn_stdin_reader().context("starting console")?;
        println!("{HELP}");
        Some(tokio::spawn(emulator.clone().run(input, door.clone())))
    } else {
        None
    };

    shutdown.await;
    info!("shutdown requested");

    if let Some(console) = console {
        console.abort();
    }
    let _ = stop_tx.send(());
    match http.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => error!(error = %e, "control panel failed"),
        Err(e) if e.is_cancelled() => {}
        Err(e) => error!(error = %e, "control panel panicked"),
    }

    loops.shutdown(&door).await.context("closing door on shutdown")?;
    drop(emulator);
    info!("petdoord stopped");
    Ok(())
}
