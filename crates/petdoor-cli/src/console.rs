//! Emulator console.
//!
//! With no radio or GPIO attached, the daemon drives its mock devices from
//! stdin. One command per line:
//!
//! ```text
//! beacon <name> <rssi>   deliver one advertisement
//! switch on|off          assert or release the lockout switch
//! temp <celsius>         set the core temperature sample
//! status                 print the status snapshot
//! help                   list commands
//! ```

use std::io::BufRead;
use std::str::FromStr;

use petdoor_core::validate_rssi;
use petdoor_engine::SharedDoor;
use petdoor_hardware::mock::{MockScannerHandle, MockSwitchHandle, MockTemperatureHandle};
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, warn};

pub const HELP: &str =
    "commands: beacon <name> <rssi> | switch on|off | temp <celsius> | status | help";

/// A parsed console line.
#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleCommand {
    Beacon { name: String, rssi: i16 },
    Switch { on: bool },
    Temp { celsius: f32 },
    Status,
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("empty command")]
    Empty,

    #[error("unknown command '{0}'")]
    Unknown(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("invalid {argument}: {message}")]
    InvalidValue {
        argument: &'static str,
        message: String,
    },
}

impl FromStr for ConsoleCommand {
    type Err = ParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let (&command, args) = tokens.split_first().ok_or(ParseError::Empty)?;

        match command.to_ascii_lowercase().as_str() {
            "beacon" => {
                // Names may contain spaces; the RSSI is always the last token
                let (&rssi, name) = args
                    .split_last()
                    .filter(|(_, name)| !name.is_empty())
                    .ok_or(ParseError::Usage("beacon <name> <rssi>"))?;
                let rssi: i64 = rssi.parse().map_err(|e: std::num::ParseIntError| {
                    ParseError::InvalidValue {
                        argument: "rssi",
                        message: e.to_string(),
                    }
                })?;
                let rssi = validate_rssi(rssi).map_err(|e| ParseError::InvalidValue {
                    argument: "rssi",
                    message: e.to_string(),
                })?;
                Ok(Self::Beacon {
                    name: name.join(" "),
                    rssi,
                })
            }
            "switch" => match args {
                ["on"] => Ok(Self::Switch { on: true }),
                ["off"] => Ok(Self::Switch { on: false }),
                _ => Err(ParseError::Usage("switch on|off")),
            },
            "temp" => match args {
                [value] => value
                    .parse()
                    .map(|celsius| Self::Temp { celsius })
                    .map_err(|e: std::num::ParseFloatError| ParseError::InvalidValue {
                        argument: "celsius",
                        message: e.to_string(),
                    }),
                _ => Err(ParseError::Usage("temp <celsius>")),
            },
            "status" => Ok(Self::Status),
            "help" | "?" => Ok(Self::Help),
            other => Err(ParseError::Unknown(other.to_string())),
        }
    }
}

/// Handles onto the emulated peripherals.
#[derive(Debug, Clone)]
pub struct EmulatorConsole {
    pub scanner: MockScannerHandle,
    pub switch: MockSwitchHandle,
    pub temperature: MockTemperatureHandle,
}

impl EmulatorConsole {
    /// Apply one command and return the line to print.
    pub fn apply(&self, command: ConsoleCommand, door: &SharedDoor) -> String {
        match command {
            ConsoleCommand::Beacon { name, rssi } => match self.scanner.advertise(&name, rssi) {
                Ok(()) => format!("advertised '{name}' at {rssi} dBm"),
                Err(e) => format!("radio unavailable: {e}"),
            },
            ConsoleCommand::Switch { on: true } => {
                self.switch.press();
                "switch asserted".to_string()
            }
            ConsoleCommand::Switch { on: false } => {
                self.switch.release();
                "switch released".to_string()
            }
            ConsoleCommand::Temp { celsius } => {
                self.temperature.set_celsius(celsius);
                format!("temperature set to {celsius:.1} C")
            }
            ConsoleCommand::Status => door.snapshot().summary(),
            ConsoleCommand::Help => HELP.to_string(),
        }
    }

    /// Execute lines from `input` until the sender side closes.
    pub async fn run(self, mut input: mpsc::UnboundedReceiver<String>, door: SharedDoor) {
        while let Some(line) = input.recv().await {
            if line.trim().is_empty() {
                continue;
            }
            match line.parse::<ConsoleCommand>() {
                Ok(command) => {
                    debug!(?command, "console command");
                    println!("{}", self.apply(command, &door));
                }
                Err(e) => println!("{e} ({HELP})"),
            }
        }
        debug!("console input closed");
    }
}

/// Forward stdin lines from a plain thread.
///
/// Tokio's stdin parks a blocking-pool thread that would hold up runtime
/// shutdown; a detached thread ends with the process instead.
pub fn spawn_stdin_reader() -> std::io::Result<mpsc::UnboundedReceiver<String>> {
    let (tx, rx) = mpsc::unbounded_channel();

    std::thread::Builder::new()
        .name("petdoor-console".to_string())
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                match line {
                    Ok(line) => {
                        if tx.send(line).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        warn!(error = %e, "console read failed");
                        break;
                    }
                }
            }
        })?;

    Ok(rx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use petdoor_core::{DoorLockState, LockSource};
    use petdoor_engine::DoorController;
    use petdoor_hardware::mock::{MockLatch, MockScanner, MockSwitch, MockTemperature};
    use petdoor_hardware::{BeaconScanner, LockoutSwitch, ObservationMailbox, SwitchPolarity};
    use rstest::rstest;
    use std::time::Duration;

    #[rstest]
    #[case("beacon Ellie -70", ConsoleCommand::Beacon { name: "Ellie".into(), rssi: -70 })]
    #[case("beacon My Tag -55", ConsoleCommand::Beacon { name: "My Tag".into(), rssi: -55 })]
    #[case("  SWITCH on ", ConsoleCommand::Switch { on: true })]
    #[case("switch off", ConsoleCommand::Switch { on: false })]
    #[case("temp 47.5", ConsoleCommand::Temp { celsius: 47.5 })]
    #[case("status", ConsoleCommand::Status)]
    #[case("?", ConsoleCommand::Help)]
    fn test_parse(#[case] line: &str, #[case] expected: ConsoleCommand) {
        assert_eq!(line.parse::<ConsoleCommand>().unwrap(), expected);
    }

    #[rstest]
    #[case("", ParseError::Empty)]
    #[case("jump", ParseError::Unknown("jump".into()))]
    #[case("beacon -70", ParseError::Usage("beacon <name> <rssi>"))]
    #[case("switch maybe", ParseError::Usage("switch on|off"))]
    #[case("temp", ParseError::Usage("temp <celsius>"))]
    fn test_parse_errors(#[case] line: &str, #[case] expected: ParseError) {
        assert_eq!(line.parse::<ConsoleCommand>().unwrap_err(), expected);
    }

    #[test]
    fn test_rssi_out_of_range() {
        let err = "beacon Ellie 12".parse::<ConsoleCommand>().unwrap_err();
        assert!(matches!(err, ParseError::InvalidValue { argument: "rssi", .. }));
    }

    fn rig() -> (EmulatorConsole, MockScanner, MockSwitch, SharedDoor) {
        let (scanner, scanner_handle) = MockScanner::new();
        let (switch, switch_handle) = MockSwitch::new(SwitchPolarity::ActiveLow);
        let (sensor, temperature) = MockTemperature::new(40.0);
        let (latch, _) = MockLatch::new();
        let door = SharedDoor::new(DoorController::new(Box::new(latch)))
            .with_sensor(std::sync::Arc::new(sensor));

        let console = EmulatorConsole {
            scanner: scanner_handle,
            switch: switch_handle,
            temperature,
        };
        (console, scanner, switch, door)
    }

    #[tokio::test(start_paused = true)]
    async fn test_beacon_reaches_scanner() {
        let (console, mut scanner, _, door) = rig();
        let mailbox = ObservationMailbox::new("Ellie");

        console.apply("beacon Ellie -61".parse().unwrap(), &door);
        scanner.scan(Duration::from_millis(100), &mailbox).await.unwrap();

        assert_eq!(mailbox.take().map(|s| s.rssi), Some(-61));
    }

    #[test]
    fn test_switch_and_temp_drive_devices() {
        let (console, _, switch, door) = rig();

        console.apply(ConsoleCommand::Switch { on: true }, &door);
        assert!(SwitchPolarity::ActiveLow.is_asserted(switch.read_level().unwrap()));

        console.apply(ConsoleCommand::Temp { celsius: 62.0 }, &door);
        assert_eq!(door.snapshot().core_temperature_c, Some(62.0));
    }

    #[test]
    fn test_status_prints_summary() {
        let (console, _, _, door) = rig();
        door.lock(LockSource::Remote);

        let line = console.apply(ConsoleCommand::Status, &door);

        assert!(line.starts_with(&format!("lock={}", DoorLockState::LockedByRemote)));
    }

    #[tokio::test]
    async fn test_run_stops_when_input_closes() {
        let (console, _, switch, door) = rig();
        let (tx, rx) = mpsc::unbounded_channel();
        for line in ["switch on", "", "bogus"] {
            tx.send(line.to_string()).unwrap();
        }
        drop(tx);

        console.run(rx, door).await;

        assert!(SwitchPolarity::ActiveLow.is_asserted(switch.read_level().unwrap()));
    }
}
