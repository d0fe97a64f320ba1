//! Hint/checksum consistency policy
//!
//! A hint is an opaque per-waypoint token the engine issues for a specific
//! coordinate against a specific loaded dataset. The checksum is the
//! dataset's integer fingerprint. A hint is only meaningful together with
//! the checksum it was issued under, so:
//!
//! - on the way in, hints are honored only when the supplied checksum equals
//!   the engine's current checksum; otherwise the whole hint set is dropped
//!   and every coordinate is re-resolved from scratch. A stale checksum is
//!   never an error and never silently accepted.
//! - on the way out, a response always carries the hint tokens and the
//!   checksum they were produced under as one unit ([`HintData`]), so a
//!   later query can present both together.

use serde::{Deserialize, Serialize};

/// Response-side pairing of hint tokens with their dataset checksum.
///
/// `locations` is ordered like the query's coordinates; empty strings stand
/// for waypoints the engine could not issue a token for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HintData {
    pub checksum: u32,
    pub locations: Vec<String>,
}

/// Decide whether a supplied hint set may be used against the currently
/// loaded dataset.
///
/// Returns the hints unchanged when `supplied_checksum` matches
/// `current_checksum`; otherwise `None`. A missing checksum counts as a
/// mismatch: hints without provenance are never trusted.
pub fn admit(
    hints: Option<Vec<Option<String>>>,
    supplied_checksum: Option<u32>,
    current_checksum: u32,
) -> Option<Vec<Option<String>>> {
    match (hints, supplied_checksum) {
        (Some(hints), Some(checksum)) if checksum == current_checksum => Some(hints),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens() -> Vec<Option<String>> {
        vec![Some("seg-17".to_string()), None, Some("seg-4".to_string())]
    }

    #[test]
    fn test_matching_checksum_passes_hints_through() {
        assert_eq!(admit(Some(tokens()), Some(7), 7), Some(tokens()));
    }

    #[test]
    fn test_mismatched_checksum_drops_hints() {
        assert_eq!(admit(Some(tokens()), Some(6), 7), None);
    }

    #[test]
    fn test_missing_checksum_drops_hints() {
        assert_eq!(admit(Some(tokens()), None, 7), None);
    }

    #[test]
    fn test_no_hints_is_a_no_op() {
        assert_eq!(admit(None, Some(7), 7), None);
        assert_eq!(admit(None, None, 7), None);
    }
}
