//! # petdoor-cli
//!
//! The `petdoord` daemon: configuration file, logging, store provisioning,
//! emulator console, and wiring of the control loops to the control panel.
//!
//! ## Running
//!
//! ```bash
//! petdoord provision --ssid home --password hunter22 --beacon Ellie
//! petdoord --config petdoor.toml run
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod console;
pub mod daemon;
pub mod logging;

pub use config::DaemonConfig;
pub use daemon::{RunOptions, run_until};
