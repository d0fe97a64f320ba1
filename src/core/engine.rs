//! Engine seam: the opaque routing engine and its construction contract
//!
//! The routing engine itself (graph search, map matching, tile rendering)
//! lives behind [`RoutingEngine`]. This layer only knows that the engine
//! accepts a canonical query and returns either a raw payload or an error,
//! and that it exposes the checksum of its loaded dataset.
//!
//! Construction takes either a bare dataset path or an options object with
//! `path`, `shared_memory`, and `distance_table` fields. The handle created
//! from them is long-lived and immutable; there is no hot-reload.

use bytes::Bytes;
use serde_json::Value;

use super::error::{ConstructionError, EngineError};
use super::query::Query;

/// Raw engine output before transcoding.
///
/// Most services answer with a JSON document; `tile` answers with
/// vector-tile encoded bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawOutput {
    Json(String),
    Binary(Bytes),
}

impl RawOutput {
    /// The payload as bytes, whichever form it took.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            RawOutput::Json(s) => s.as_bytes(),
            RawOutput::Binary(b) => b,
        }
    }
}

/// A live connection to a loaded routing dataset.
///
/// Implementations must tolerate many concurrent `run` calls against one
/// handle; this layer adds no locking and no shared mutable state between
/// the calls it issues.
pub trait RoutingEngine: Send + Sync {
    /// Execute one canonical query to completion.
    fn run(&self, query: &Query) -> Result<RawOutput, EngineError>;

    /// Fingerprint of the currently loaded dataset. Hints are only honored
    /// against a matching fingerprint.
    fn dataset_checksum(&self) -> u32;
}

/// Validated engine construction options.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EngineConfig {
    /// Dataset path. Optional when attaching to shared memory.
    pub path: Option<String>,
    /// Attach to a pre-loaded shared-memory dataset instead of reading files.
    pub shared_memory: bool,
    /// Upper bound on distance-table size, if the engine should enforce one.
    pub max_locations_distance_table: Option<u32>,
}

impl EngineConfig {
    /// Construct from a dataset path.
    pub fn from_path(path: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::default()
        }
    }

    /// Construct from loosely-typed input: either a path string or an
    /// options object with `path`, `shared_memory`, `distance_table`.
    pub fn from_value(input: &Value) -> Result<Self, ConstructionError> {
        match input {
            Value::String(path) => Ok(Self::from_path(path.clone())),
            Value::Object(obj) => {
                let path = match obj.get("path") {
                    None | Some(Value::Null) => None,
                    Some(Value::String(path)) => Some(path.clone()),
                    Some(_) => return Err(ConstructionError::InvalidArgument),
                };

                let shared_memory = match obj.get("shared_memory") {
                    None => false,
                    Some(Value::Bool(b)) => *b,
                    Some(_) => return Err(ConstructionError::SharedMemoryNotBool),
                };

                if path.is_none() && !shared_memory {
                    return Err(ConstructionError::NoDataset);
                }

                let max_locations_distance_table = match obj.get("distance_table") {
                    None | Some(Value::Null) => None,
                    Some(raw) => match raw.as_u64() {
                        Some(max) if max <= u32::MAX as u64 => Some(max as u32),
                        _ => return Err(ConstructionError::InvalidDistanceTable),
                    },
                };

                Ok(Self {
                    path,
                    shared_memory,
                    max_locations_distance_table,
                })
            }
            _ => Err(ConstructionError::InvalidArgument),
        }
    }
}
