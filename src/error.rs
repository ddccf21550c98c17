use crate::core::Axis;

/// Error type for largepos-rs operations.
///
/// `OutOfRange`, `Unrepresentable` and `LargeMovement` are precondition violations: they point
/// at a caller bug, and the non-`try_` operations panic with these messages instead of
/// returning them.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LargePosError {
    /// An absolute coordinate lies outside `[MIN_COORDINATE, MAX_COORDINATE]` (or is NaN).
    #[error("{axis} coordinate {value} exceeds supported range (~+/-29.3 AU)")]
    OutOfRange { axis: Axis, value: f64 },
    /// The reference cell is too far away for a single-precision relative offset.
    #[error(
        "{axis} offset {value} to the provided origin is too large to be represented as a Float3"
    )]
    Unrepresentable { axis: Axis, value: f32 },
    /// A supplied relative offset exceeds `3 * CELL_SIZE`; route it through absolute coordinates.
    #[error("large movement detected on {axis} ({value}), use the double precision approach")]
    LargeMovement { axis: Axis, value: f32 },
    /// The position key has an invalid length.
    #[error("Invalid position key length")]
    InvalidKeyLength,
    /// The position key checksum validation failed.
    #[error("Invalid checksum")]
    InvalidChecksum,
    /// The key version is not supported.
    #[error("Unsupported version: {0}")]
    UnsupportedVersion(u8),
    /// Failed to decode Base64 key.
    #[error("Base64 decode error")]
    Base64DecodeError,
    /// Failed to parse a position from text (JSON or key).
    #[error("Invalid position: {0}")]
    InvalidPosition(String),
    /// File I/O error.
    #[error("IO error: {0}")]
    IoError(String),
    /// CSV parsing or writing error.
    #[error("CSV error: {0}")]
    CsvError(String),
    /// Arrow array or schema error.
    #[error("Arrow error: {0}")]
    ArrowError(String),
    /// Parquet read or write error.
    #[error("Parquet error: {0}")]
    ParquetError(String),
}

impl LargePosError {
    /// True for the two precondition classes (range and representability).
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            LargePosError::OutOfRange { .. }
                | LargePosError::Unrepresentable { .. }
                | LargePosError::LargeMovement { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_axis() {
        let err = LargePosError::OutOfRange {
            axis: Axis::Y,
            value: 1e13,
        };
        assert!(err.to_string().starts_with("Y coordinate"));
        assert!(err.is_precondition());

        let err = LargePosError::LargeMovement {
            axis: Axis::Z,
            value: 7000.0,
        };
        assert!(err.to_string().contains("double precision"));
        assert!(!LargePosError::InvalidChecksum.is_precondition());
    }
}
