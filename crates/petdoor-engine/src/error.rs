use petdoor_hardware::HardwareError;
use thiserror::Error;

/// Errors surfaced by the arbitration engine.
///
/// Rejected operations (opening a locked door, unlocking a source that never
/// locked) are not errors. Only hardware failures reach the caller.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Latch relay could not be driven
    #[error("Latch actuator failed: {0}")]
    Actuator(#[source] HardwareError),

    /// Lockout switch could not be read
    #[error("Lockout switch read failed: {0}")]
    Switch(#[source] HardwareError),

    /// BLE scan failed
    #[error("Beacon scan failed: {0}")]
    Scan(#[source] HardwareError),
}

/// Specialized result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;
