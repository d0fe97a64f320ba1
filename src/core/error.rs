//! Error types for the routegate boundary layer
//!
//! Three families cross the public API: construction failures, validation
//! failures, and engine-reported failures. Validation errors are always
//! synchronous regardless of invocation mode and never reach the engine.
//! Transcode failures are deliberately *not* an error family: a payload the
//! transcoder cannot decode is handed back raw (see `core::transcode`).
//!
//! Calling-convention misuse is not an error family either: construction
//! goes through [`EngineConfig`] and [`Gateway::new`], and the non-blocking
//! completion callback is a required typed parameter, so both conventions
//! are enforced at compile time.
//!
//! Message strings are stable and name the offending field or constraint;
//! client code and tests match on message content, not just the variant.
//!
//! [`EngineConfig`]: crate::EngineConfig
//! [`Gateway::new`]: crate::Gateway::new

use thiserror::Error;

/// Validation failure for one loosely-typed query.
///
/// Checks run in a fixed order and fail on the first violation, so a query
/// with several problems reports the earliest one deterministically.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Top-level input was not an object (or was null).
    #[error("first arg must be an object")]
    NotAnObject,

    /// No `coordinates` property supplied.
    #[error("must provide a coordinates property")]
    MissingCoordinates,

    /// `coordinates` was not an array of 2-element numeric pairs. Covers
    /// "not an array", "elements not pairs", and "members not numbers".
    #[error("coordinates must be an array of (lat/long) pairs")]
    MalformedCoordinates,

    /// Fewer coordinates than the service minimum.
    #[error("at least two coordinates must be provided")]
    InsufficientCoordinates,

    /// `nearest`/`locate` input was neither a bare `[lat, lon]` pair nor an
    /// object with a single-pair `coordinates` array.
    #[error("first argument must be an array of lat, long")]
    MalformedLocation,

    /// `hints` was not an array.
    #[error("hints must be an array of strings/null")]
    MalformedHints,

    /// A hints element was neither a string nor null.
    #[error("hint must be null or string")]
    InvalidHint,

    /// A bearings element was not a `[value, range]` pair of numbers.
    /// A bare number is rejected with this message, not coerced.
    #[error("Bearing must be an array of [value, range]")]
    MalformedBearing,

    /// A bearing value or range fell outside `[0, 360]`.
    #[error("Bearing needs to be in range 0..360")]
    BearingOutOfRange,

    /// A radiuses element was neither null nor a non-negative number.
    #[error("radiuses must be an array of null or non-negative numbers")]
    InvalidRadius,

    /// `timestamps` was not an array.
    #[error("timestamps must be an array of integers (or undefined)")]
    MalformedTimestamps,

    /// A timestamps element was not an integer.
    #[error("timestamps array items must be numbers")]
    InvalidTimestamp,

    /// A supplied per-coordinate array differs in length from `coordinates`.
    /// Never silently padded or truncated.
    #[error("{field} array must have the same size as the coordinates array")]
    LengthMismatch {
        /// Which auxiliary field mismatched.
        field: &'static str,
    },

    /// One half of a mutually exclusive option group was supplied alone.
    #[error("sources and destinations must be provided together")]
    IncompleteOptionGroup,

    /// Both representations of an option group were supplied at once.
    #[error("coordinates cannot be combined with sources/destinations")]
    ConflictingOptionGroups,

    /// An enumerated string option was outside its declared set.
    #[error("{field} must be one of: {allowed}")]
    InvalidEnumValue {
        field: &'static str,
        allowed: &'static str,
    },

    /// A scalar option had the wrong type or range (e.g. a non-boolean
    /// `steps`, a negative `checksum`).
    #[error("{field} must be {expected}")]
    InvalidOption {
        field: &'static str,
        expected: &'static str,
    },

    /// Tile input was neither `[x, y, z]` nor an `{x, y, z}` object of
    /// non-negative integers.
    #[error("tile coordinate must be an array of [x, y, z] or an {{x, y, z}} object")]
    MalformedTile,
}

/// Engine construction failure. Fatal, synchronous, never retried.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConstructionError {
    /// Constructor argument was neither a path string nor an options object.
    #[error("first argument must be a path string or params object")]
    InvalidArgument,

    /// `shared_memory` option was not a boolean.
    #[error("shared_memory option must be a boolean")]
    SharedMemoryNotBool,

    /// `shared_memory` was false (or absent) with no dataset path given.
    #[error("shared_memory must be enabled if no path is specified")]
    NoDataset,

    /// `distance_table` was negative or not an integer.
    #[error("the maximum number of locations in the distance table must be an unsigned integer")]
    InvalidDistanceTable,

    /// The engine failed to open or attach the dataset (e.g. missing files).
    #[error("{0}")]
    Dataset(String),
}

/// Failure reported by the external routing engine for a dispatched query.
///
/// Raised synchronously in blocking mode; delivered once through the
/// completion callback in non-blocking mode. Never silently swallowed.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct EngineError {
    /// Engine-provided error text (e.g. "Cannot find route between points").
    pub message: String,
}

impl EngineError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Umbrella error for gateway operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Construction(#[from] ConstructionError),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Convenience result type for routegate operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_messages_are_stable() {
        assert_eq!(
            ValidationError::NotAnObject.to_string(),
            "first arg must be an object"
        );
        assert_eq!(
            ValidationError::MissingCoordinates.to_string(),
            "must provide a coordinates property"
        );
        assert_eq!(
            ValidationError::MalformedCoordinates.to_string(),
            "coordinates must be an array of (lat/long) pairs"
        );
        assert_eq!(
            ValidationError::LengthMismatch { field: "hints" }.to_string(),
            "hints array must have the same size as the coordinates array"
        );
        assert_eq!(
            ValidationError::InvalidEnumValue {
                field: "geometries",
                allowed: "polyline, geojson, none"
            }
            .to_string(),
            "geometries must be one of: polyline, geojson, none"
        );
    }

    #[test]
    fn test_construction_messages_are_stable() {
        assert_eq!(
            ConstructionError::NoDataset.to_string(),
            "shared_memory must be enabled if no path is specified"
        );
        assert_eq!(
            ConstructionError::InvalidDistanceTable.to_string(),
            "the maximum number of locations in the distance table must be an unsigned integer"
        );
    }

    #[test]
    fn test_umbrella_conversions() {
        let err: Error = ValidationError::NotAnObject.into();
        assert!(matches!(err, Error::Validation(_)));
        let err: Error = EngineError::new("no route").into();
        assert_eq!(err.to_string(), "no route");
    }
}
