use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // Domain errors
    #[error("RSSI {value} outside valid range {min}..={max}")]
    InvalidRssi { value: i64, min: i16, max: i16 },

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
