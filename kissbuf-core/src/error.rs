//! Error types for kissbuf core operations.

use thiserror::Error;

/// Status returned by generated codec functions on success.
pub const STATUS_OK: i32 = 0;

/// Status returned by generated codec functions when the buffer is too small.
pub const STATUS_BUFFER_TOO_SMALL: i32 = -1;

/// Runtime error type for encoding/decoding with the reference codec.
#[derive(Debug, Error, PartialEq)]
pub enum Error {
    /// Buffer is shorter than the wire size of the type.
    #[error("buffer too small: required {required} bytes, available {available} bytes")]
    BufferTooSmall {
        /// Required buffer size in bytes.
        required: usize,
        /// Available buffer size in bytes.
        available: usize,
    },

    /// The supplied value does not have the shape of the field.
    #[error("type mismatch for field '{field}': expected {expected}")]
    TypeMismatch {
        /// Field (or type) being encoded.
        field: String,
        /// Description of the expected value shape.
        expected: String,
    },

    /// A scalar does not fit the field's byte width.
    #[error("value out of range for field '{field}' ({width} bytes)")]
    ValueOutOfRange {
        /// Field being encoded.
        field: String,
        /// Byte width of the field.
        width: usize,
    },

    /// The requested aggregate is not part of the resolved schema.
    #[error("unknown aggregate '{name}'")]
    UnknownAggregate {
        /// Aggregate name.
        name: String,
    },

    /// The layout depends on sizes only the target compiler knows.
    #[error("type '{name}' has a symbolic layout and cannot be evaluated in-process")]
    SymbolicLayout {
        /// Aggregate name.
        name: String,
    },
}

impl Error {
    /// Returns the status code a generated C function reports for this error.
    ///
    /// Only `BufferTooSmall` has a counterpart in generated code; every other
    /// variant is specific to the reference codec and maps to `i32::MIN`.
    #[must_use]
    pub const fn status(&self) -> i32 {
        match self {
            Self::BufferTooSmall { .. } => STATUS_BUFFER_TOO_SMALL,
            _ => i32::MIN,
        }
    }
}

/// Error type for primitive registry validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// A primitive was registered with a width of zero.
    #[error("primitive '{name}' has zero byte width")]
    ZeroWidth {
        /// Primitive name.
        name: String,
    },

    /// The width is not supported for the primitive's representation.
    #[error("primitive '{name}' has unsupported byte width {width}")]
    UnsupportedWidth {
        /// Primitive name.
        name: String,
        /// Declared width.
        width: usize,
    },

    /// A primitive with the same name is already registered.
    #[error("duplicate primitive '{name}'")]
    DuplicatePrimitive {
        /// Primitive name.
        name: String,
    },
}

/// Result type alias for kissbuf core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_too_small_status() {
        let err = Error::BufferTooSmall {
            required: 4,
            available: 3,
        };
        assert_eq!(err.status(), STATUS_BUFFER_TOO_SMALL);
        assert_eq!(
            err.to_string(),
            "buffer too small: required 4 bytes, available 3 bytes"
        );
    }

    #[test]
    fn test_other_errors_have_no_generated_status() {
        let err = Error::UnknownAggregate {
            name: "Point".to_string(),
        };
        assert_eq!(err.status(), i32::MIN);
    }
}
