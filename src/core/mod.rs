//! Core boundary layer: validation, normalization, hint admission,
//! dual-mode dispatch, and response transcoding.

pub mod bridge;
pub mod engine;
pub mod error;
pub mod hint;
pub mod query;
pub mod transcode;
pub mod validate;

pub use bridge::{Decoder, Gateway};
pub use engine::{EngineConfig, RawOutput, RoutingEngine};
pub use error::{ConstructionError, EngineError, Error, Result, ValidationError};
pub use hint::HintData;
pub use query::{Query, Service};
pub use transcode::{transcode, Response};
