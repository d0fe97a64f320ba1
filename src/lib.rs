//! routegate - the request/response boundary of a routing engine
//!
//! routegate sits between loosely-typed caller input (JSON values) and an
//! opaque routing engine. It owns everything that happens on either side of
//! the engine call:
//!
//! - **validation**: every query is checked field by field with stable,
//!   field-naming error messages before the engine is ever touched
//! - **normalization**: validated input becomes one canonical [`Query`] per
//!   service with all defaults applied
//! - **hint admission**: opaque snapping hints are honored only when their
//!   dataset checksum matches the engine's loaded dataset
//! - **dual-mode dispatch**: every service runs blocking or non-blocking
//!   through one shared preparation path
//! - **transcoding**: raw engine payloads become structured responses, with
//!   undecodable payloads passed through untouched
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use serde_json::json;
//! use routegate::{Gateway, Response};
//! use routegate::testing::StubEngine;
//!
//! let gateway = Gateway::new(Arc::new(StubEngine::new()));
//! let response = gateway.route(&json!({
//!     "coordinates": [[52.519930, 13.438640], [52.513191, 13.415852]],
//! })).unwrap();
//! match response {
//!     Response::Route(route) => {
//!         assert_eq!(route.status_message.as_deref(), Some("Found route between points"));
//!     }
//!     other => panic!("unexpected response: {other:?}"),
//! }
//! ```

pub mod core;
pub mod testing;

pub use crate::core::bridge::{Decoder, Gateway};
pub use crate::core::engine::{EngineConfig, RawOutput, RoutingEngine};
pub use crate::core::error::{ConstructionError, EngineError, Error, Result, ValidationError};
pub use crate::core::hint::HintData;
pub use crate::core::query::{
    Alternatives, Bearing, Coordinate, GeometryFormat, LocateQuery, MatchQuery, Overview,
    Presentation, Query, RouteQuery, Service, TableQuery, TileQuery,
};
pub use crate::core::transcode::{
    transcode, Geometry, LocationResponse, MatchResponse, Matching, Response, RouteResponse,
    RouteSummary, TableResponse, TileResponse, TripResponse,
};
