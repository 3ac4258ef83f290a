use petdoor_hardware::HardwareError;
use thiserror::Error;

/// Storage-specific error types for the petdoor configuration store.
///
/// Every failure of the length-prefixed format is surfaced explicitly.
/// Nothing is silently truncated and nothing is read past its region.
#[derive(Debug, Error)]
pub enum StorageError {
    /// String longer than a one-byte length prefix can describe
    #[error("String of {len} bytes exceeds the {max}-byte entry limit")]
    StringTooLong { len: usize, max: usize },

    /// Entry (length byte + payload) does not fit in its reserved region
    #[error("Entry for {field} needs {len} bytes but its region holds {capacity}")]
    ExceedsRegion {
        field: String,
        len: usize,
        capacity: usize,
    },

    /// Region holds the zero-length "never written" sentinel
    #[error("{field} has not been provisioned")]
    NotProvisioned { field: String },

    /// Access outside the addressable store
    #[error("Store access out of bounds: address {address} + {len} exceeds size {size}")]
    OutOfBounds {
        address: usize,
        len: usize,
        size: usize,
    },

    /// Stored payload is not valid UTF-8
    #[error("Stored {field} is not valid UTF-8")]
    InvalidUtf8 { field: String },

    /// Backing file could not be read or written
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Any other failure reported by the byte store
    #[error("Byte store error: {0}")]
    Hardware(#[source] HardwareError),
}

impl From<HardwareError> for StorageError {
    fn from(err: HardwareError) -> Self {
        match err {
            HardwareError::OutOfRange { address, len, size } => {
                StorageError::OutOfBounds { address, len, size }
            }
            HardwareError::Io(io) => StorageError::Io(io),
            other => StorageError::Hardware(other),
        }
    }
}

/// Specialized result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_maps_to_out_of_bounds() {
        let err: StorageError = HardwareError::out_of_range(4096, 1, 4096).into();
        assert!(matches!(
            err,
            StorageError::OutOfBounds {
                address: 4096,
                len: 1,
                size: 4096
            }
        ));
    }

    #[test]
    fn test_other_hardware_errors_wrapped() {
        let err: StorageError = HardwareError::communication("bus fault").into();
        assert!(matches!(err, StorageError::Hardware(_)));
        assert_eq!(err.to_string(), "Byte store error: Communication error: bus fault");

        let source = std::error::Error::source(&err).unwrap();
        assert_eq!(source.to_string(), "Communication error: bus fault");
    }

    #[test]
    fn test_error_messages() {
        let err = StorageError::StringTooLong { len: 300, max: 255 };
        assert_eq!(err.to_string(), "String of 300 bytes exceeds the 255-byte entry limit");

        let err = StorageError::NotProvisioned {
            field: "beacon name".into(),
        };
        assert_eq!(err.to_string(), "beacon name has not been provisioned");
    }
}
