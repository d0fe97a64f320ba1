//! Dual-mode invocation bridge
//!
//! [`Gateway`] is the front door: it owns the engine handle and a decoding
//! adapter, and exposes every service in two modes sharing one preparation
//! path (validate → normalize → hint admission):
//!
//! - **blocking**: the call occupies the calling thread for the full engine
//!   run and returns the outcome directly.
//! - **non-blocking**: the call returns immediately and the outcome is
//!   delivered exactly once through a completion callback on a shared
//!   runtime. Engine failures go through the callback; validation failures
//!   are returned synchronously in *both* modes, before any engine
//!   interaction.
//!
//! Because both modes run the identical prepared query through the identical
//! dispatch function, the same query against the same engine state yields
//! byte-identical raw payloads either way.
//!
//! The decoding adapter is composed once at construction instead of being
//! patched onto a shared method table; swapping it affects only the gateway
//! it was given to.

use std::sync::Arc;

use once_cell::sync::Lazy;
use serde_json::Value;
use tokio::runtime::Runtime;
use tracing::debug;

use super::engine::{RawOutput, RoutingEngine};
use super::error::{EngineError, Result};
use super::hint;
use super::query::{normalize_match, normalize_route, normalize_table, Query, Service};
use super::transcode::{transcode, Response};
use super::validate::{validate, Validated};

/// Process-wide runtime for non-blocking dispatch. Engine runs are
/// synchronous CPU-bound work, so they go through `spawn_blocking`.
static RUNTIME: Lazy<Runtime> = Lazy::new(|| {
    Runtime::new().expect("Failed to create tokio runtime for query dispatch")
});

/// Decoding adapter: raw engine payload in, structured response out.
pub type Decoder = Arc<dyn Fn(Service, RawOutput) -> Response + Send + Sync>;

/// The request/response boundary of the routing service.
///
/// Cheap to clone; clones share the engine handle and decoder. Holds no
/// mutable state, so any number of invocations may be in flight against one
/// gateway concurrently.
#[derive(Clone)]
pub struct Gateway {
    engine: Arc<dyn RoutingEngine>,
    decode: Decoder,
}

impl Gateway {
    /// Gateway with the standard transcoding adapter.
    pub fn new(engine: Arc<dyn RoutingEngine>) -> Self {
        Self::with_decoder(engine, Arc::new(transcode))
    }

    /// Gateway with a custom decoding adapter. The adapter is fixed for the
    /// lifetime of this gateway.
    pub fn with_decoder(engine: Arc<dyn RoutingEngine>, decode: Decoder) -> Self {
        Self { engine, decode }
    }

    /// Checksum of the engine's loaded dataset.
    pub fn dataset_checksum(&self) -> u32 {
        self.engine.dataset_checksum()
    }

    /// Shared preparation path for both modes: validate, normalize, then
    /// apply the hint admission policy against the current dataset.
    fn prepare(&self, service: Service, input: &Value) -> Result<Query> {
        let validated = validate(service, input)?;
        let current = self.engine.dataset_checksum();

        let query = match validated {
            Validated::Route(waypoints) => {
                let mut query = normalize_route(waypoints);
                admit_hints(&mut query.hints, &mut query.checksum, current);
                Query::Route(query)
            }
            Validated::Trip(waypoints) => {
                let mut query = normalize_route(waypoints);
                admit_hints(&mut query.hints, &mut query.checksum, current);
                Query::Trip(query)
            }
            Validated::Match(matched) => {
                let mut query = normalize_match(matched);
                admit_hints(&mut query.hints, &mut query.checksum, current);
                Query::Match(query)
            }
            Validated::Table(table) => {
                let mut query = normalize_table(table);
                admit_hints(&mut query.hints, &mut query.checksum, current);
                Query::Table(query)
            }
            Validated::Nearest(coordinate) => {
                Query::Nearest(super::query::LocateQuery { coordinate })
            }
            Validated::Locate(coordinate) => {
                Query::Locate(super::query::LocateQuery { coordinate })
            }
            Validated::Tile(tile) => Query::Tile(tile),
        };

        debug!(service = %service, "query prepared");
        Ok(query)
    }

    /// Blocking invocation returning the undecoded payload.
    pub fn run_raw(&self, service: Service, input: &Value) -> Result<RawOutput> {
        let query = self.prepare(service, input)?;
        Ok(self.engine.run(&query)?)
    }

    /// Blocking invocation returning the transcoded response.
    pub fn run(&self, service: Service, input: &Value) -> Result<Response> {
        let query = self.prepare(service, input)?;
        let raw = self.engine.run(&query)?;
        Ok((self.decode)(service, raw))
    }

    /// Non-blocking invocation delivering the undecoded payload.
    ///
    /// Returns immediately. Validation failures are the `Err` of the return
    /// value, exactly as in blocking mode; the engine outcome — success or
    /// [`EngineError`] — reaches `completion` exactly once.
    pub fn run_raw_async<F>(&self, service: Service, input: &Value, completion: F) -> Result<()>
    where
        F: FnOnce(std::result::Result<RawOutput, EngineError>) + Send + 'static,
    {
        let query = self.prepare(service, input)?;
        let engine = Arc::clone(&self.engine);
        RUNTIME.spawn_blocking(move || {
            completion(engine.run(&query));
        });
        Ok(())
    }

    /// Non-blocking invocation delivering the transcoded response.
    pub fn run_async<F>(&self, service: Service, input: &Value, completion: F) -> Result<()>
    where
        F: FnOnce(std::result::Result<Response, EngineError>) + Send + 'static,
    {
        let query = self.prepare(service, input)?;
        let engine = Arc::clone(&self.engine);
        let decode = Arc::clone(&self.decode);
        RUNTIME.spawn_blocking(move || {
            completion(engine.run(&query).map(|raw| decode(service, raw)));
        });
        Ok(())
    }

    /// Find a route through the given coordinates.
    pub fn route(&self, input: &Value) -> Result<Response> {
        self.run(Service::Route, input)
    }

    /// Find an optimized round trip through the given coordinates.
    pub fn trip(&self, input: &Value) -> Result<Response> {
        self.run(Service::Trip, input)
    }

    /// Snap a trajectory onto the road network.
    pub fn r#match(&self, input: &Value) -> Result<Response> {
        self.run(Service::Match, input)
    }

    /// Compute a pairwise travel-cost matrix.
    pub fn table(&self, input: &Value) -> Result<Response> {
        self.run(Service::Table, input)
    }

    /// Snap one coordinate to the nearest named road position.
    pub fn nearest(&self, input: &Value) -> Result<Response> {
        self.run(Service::Nearest, input)
    }

    /// Snap one coordinate to the nearest routable node.
    pub fn locate(&self, input: &Value) -> Result<Response> {
        self.run(Service::Locate, input)
    }

    /// Fetch one vector tile.
    pub fn tile(&self, input: &Value) -> Result<Response> {
        self.run(Service::Tile, input)
    }
}

/// Apply the hint admission policy in place. Dropped hints take their
/// checksum with them: the engine never sees one without the other.
fn admit_hints(hints: &mut Option<Vec<Option<String>>>, checksum: &mut Option<u32>, current: u32) {
    let admitted = hint::admit(hints.take(), *checksum, current);
    if admitted.is_none() && checksum.is_some() {
        debug!("hint checksum does not match loaded dataset, re-resolving coordinates");
    }
    *checksum = admitted.as_ref().map(|_| current);
    *hints = admitted;
}

impl std::fmt::Debug for Gateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gateway")
            .field("dataset_checksum", &self.engine.dataset_checksum())
            .finish_non_exhaustive()
    }
}
