//! Deterministic in-memory engine for tests and demos
//!
//! [`StubEngine`] implements the engine seam over a tiny synthetic dataset:
//! it snaps coordinates by quantization, derives hint tokens and street
//! names from the snapped position, and measures distances with the
//! haversine formula. Everything is a pure function of the query, so
//! repeated and concurrent invocations are reproducible — which is exactly
//! what the round-trip and mode-equivalence properties need.
//!
//! The stub also counts invocations, letting tests assert that validation
//! failures never reach the engine.

use std::sync::atomic::{AtomicU64, Ordering};

use bytes::Bytes;
use serde_json::{json, Value};

use crate::core::engine::{RawOutput, RoutingEngine};
use crate::core::error::EngineError;
use crate::core::query::{
    Alternatives, Coordinate, GeometryFormat, LocateQuery, MatchQuery, Overview, Presentation,
    Query, RouteQuery, TableQuery, TileQuery,
};

/// Checksum of the stub's synthetic dataset.
pub const STUB_DATASET_CHECKSUM: u32 = 0x0b5e_c7a1;

const STREET_NAMES: &[&str] = &[
    "Mariannenstraße",
    "Skalitzer Straße",
    "Oranienstraße",
    "Karl-Marx-Allee",
    "Friedrichstraße",
    "Warschauer Straße",
];

/// Deterministic stand-in for the external routing engine.
pub struct StubEngine {
    checksum: u32,
    failure: Option<String>,
    calls: AtomicU64,
}

impl Default for StubEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl StubEngine {
    pub fn new() -> Self {
        Self {
            checksum: STUB_DATASET_CHECKSUM,
            failure: None,
            calls: AtomicU64::new(0),
        }
    }

    /// Engine that reports the given error for every query.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            checksum: STUB_DATASET_CHECKSUM,
            failure: Some(message.into()),
            calls: AtomicU64::new(0),
        }
    }

    /// Engine with a different dataset fingerprint, for staleness tests.
    pub fn with_checksum(checksum: u32) -> Self {
        Self {
            checksum,
            failure: None,
            calls: AtomicU64::new(0),
        }
    }

    /// How many queries have reached this engine.
    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }

    fn snap(&self, coordinate: &Coordinate) -> [f64; 2] {
        // quantize to ~1m so nearby inputs land on the same network position
        [
            (coordinate.latitude * 1e5).round() / 1e5,
            (coordinate.longitude * 1e5).round() / 1e5,
        ]
    }

    fn hint_token(&self, snapped: [f64; 2]) -> String {
        format!(
            "wp:{:08x}:{:08x}",
            (snapped[0] * 1e5) as i64 as u32,
            (snapped[1] * 1e5) as i64 as u32
        )
    }

    fn street_name(&self, snapped: [f64; 2]) -> &'static str {
        let index = ((snapped[0] * 1e5) as i64 + (snapped[1] * 1e5) as i64).unsigned_abs()
            as usize
            % STREET_NAMES.len();
        STREET_NAMES[index]
    }

    fn hint_data(&self, coordinates: &[Coordinate]) -> Value {
        let locations: Vec<String> = coordinates
            .iter()
            .map(|c| self.hint_token(self.snap(c)))
            .collect();
        json!({"checksum": self.checksum, "locations": locations})
    }

    fn geometry(&self, snapped: &[[f64; 2]], presentation: &Presentation) -> Option<Value> {
        if presentation.overview == Overview::False {
            return None;
        }
        match presentation.geometries {
            GeometryFormat::None => None,
            GeometryFormat::GeoJson => Some(json!(snapped)),
            GeometryFormat::Polyline => {
                let encoded: String = snapped
                    .iter()
                    .map(|p| {
                        format!(
                            "{}{}",
                            char::from(b'a' + (((p[0] * 1e5) as i64).unsigned_abs() % 26) as u8),
                            char::from(b'A' + (((p[1] * 1e5) as i64).unsigned_abs() % 26) as u8)
                        )
                    })
                    .collect();
                Some(json!(encoded))
            }
        }
    }

    fn route_entry(&self, query: &RouteQuery) -> Value {
        let snapped: Vec<[f64; 2]> = query.coordinates.iter().map(|c| self.snap(c)).collect();
        let distance: f64 = snapped
            .windows(2)
            .map(|pair| haversine_m(pair[0], pair[1]))
            .sum();

        let mut entry = json!({
            "status": 0,
            "status_message": "Found route between points",
            "route_summary": {
                "total_distance": distance.round(),
                "total_time": (distance / 13.9).round(),
                "start_point": self.street_name(snapped[0]),
                "end_point": self.street_name(snapped[snapped.len() - 1]),
            },
            "via_points": snapped,
            "hint_data": self.hint_data(&query.coordinates),
        });

        if let Some(geometry) = self.geometry(&snapped, &query.presentation) {
            entry["route_geometry"] = geometry;
        }
        if query.presentation.steps == Some(true) {
            let instructions: Vec<Value> = snapped
                .iter()
                .map(|p| json!(["head", self.street_name(*p)]))
                .collect();
            entry["route_instructions"] = json!(instructions);
        }
        if query.presentation.alternatives != Alternatives::Disabled {
            entry["found_alternative"] = json!(false);
        }
        entry
    }

    fn run_route(&self, query: &RouteQuery) -> RawOutput {
        RawOutput::Json(self.route_entry(query).to_string())
    }

    fn run_trip(&self, query: &RouteQuery) -> RawOutput {
        let mut entry = self.route_entry(query);
        entry["permutation"] = json!((0..query.coordinates.len()).collect::<Vec<usize>>());
        RawOutput::Json(json!({"trips": [entry]}).to_string())
    }

    fn run_match(&self, query: &MatchQuery) -> RawOutput {
        let snapped: Vec<[f64; 2]> = query.coordinates.iter().map(|c| self.snap(c)).collect();
        let mut matching = json!({
            "matched_points": snapped,
            "indices": (0..snapped.len()).collect::<Vec<usize>>(),
        });
        if let Some(geometry) = self.geometry(&snapped, &query.presentation) {
            matching["geometry"] = geometry;
        }
        if query.classify == Some(true) {
            matching["confidence"] = json!(0.89);
        }
        RawOutput::Json(json!({"matchings": [matching]}).to_string())
    }

    fn run_table(&self, query: &TableQuery) -> RawOutput {
        let rows: Vec<Vec<f64>> = query
            .sources
            .iter()
            .map(|src| {
                query
                    .destinations
                    .iter()
                    .map(|dst| haversine_m(self.snap(src), self.snap(dst)).round())
                    .collect()
            })
            .collect();
        RawOutput::Json(json!({"distance_table": rows}).to_string())
    }

    fn run_locate(&self, query: &LocateQuery, with_name: bool) -> RawOutput {
        let snapped = self.snap(&query.coordinate);
        let mut payload = json!({"status": 0, "mapped_coordinate": snapped});
        if with_name {
            payload["name"] = json!(self.street_name(snapped));
        }
        RawOutput::Json(payload.to_string())
    }

    fn run_tile(&self, query: &TileQuery) -> RawOutput {
        // pseudo vector tile: layer header then a deterministic body
        let body_len = 64 + ((query.x as usize * 31 + query.y as usize * 17 + query.z as usize * 7) % 192);
        let mut data = vec![0x1a, 0x00];
        data.extend((0..body_len).map(|i| {
            (query.x as usize + query.y as usize + query.z as usize + i) as u8
        }));
        RawOutput::Binary(Bytes::from(data))
    }
}

impl RoutingEngine for StubEngine {
    fn run(&self, query: &Query) -> Result<RawOutput, EngineError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = &self.failure {
            return Err(EngineError::new(message.clone()));
        }
        Ok(match query {
            Query::Route(q) => self.run_route(q),
            Query::Trip(q) => self.run_trip(q),
            Query::Match(q) => self.run_match(q),
            Query::Table(q) => self.run_table(q),
            Query::Nearest(q) => self.run_locate(q, true),
            Query::Locate(q) => self.run_locate(q, false),
            Query::Tile(q) => self.run_tile(q),
        })
    }

    fn dataset_checksum(&self) -> u32 {
        self.checksum
    }
}

/// Great-circle distance in meters.
fn haversine_m(a: [f64; 2], b: [f64; 2]) -> f64 {
    const EARTH_RADIUS_M: f64 = 6_371_000.0;
    let (lat1, lon1) = (a[0].to_radians(), a[1].to_radians());
    let (lat2, lon2) = (b[0].to_radians(), b[1].to_radians());
    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;
    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().asin()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route_query(coords: &[(f64, f64)]) -> Query {
        Query::Route(RouteQuery {
            coordinates: coords
                .iter()
                .map(|&(lat, lon)| Coordinate::new(lat, lon))
                .collect(),
            hints: None,
            checksum: None,
            bearings: None,
            radiuses: None,
            presentation: Presentation::default(),
        })
    }

    #[test]
    fn test_stub_is_deterministic() {
        let engine = StubEngine::new();
        let query = route_query(&[(52.519930, 13.438640), (52.513191, 13.415852)]);
        let first = engine.run(&query).unwrap();
        let second = engine.run(&query).unwrap();
        assert_eq!(first, second);
        assert_eq!(engine.calls(), 2);
    }

    #[test]
    fn test_failing_stub_reports_engine_error() {
        let engine = StubEngine::failing("Cannot find route between points");
        let query = route_query(&[(52.5, 13.4), (52.51, 13.41)]);
        let err = engine.run(&query).unwrap_err();
        assert_eq!(err.message, "Cannot find route between points");
        assert_eq!(engine.calls(), 1);
    }

    #[test]
    fn test_haversine_sanity() {
        // ~2.1km across central Berlin
        let d = haversine_m([52.519930, 13.438640], [52.513191, 13.415852]);
        assert!(d > 1500.0 && d < 2500.0, "distance was {d}");
        assert_eq!(haversine_m([52.5, 13.4], [52.5, 13.4]), 0.0);
    }

    #[test]
    fn test_tile_bytes_deterministic_nonempty() {
        let engine = StubEngine::new();
        let query = Query::Tile(TileQuery {
            x: 17603,
            y: 10747,
            z: 15,
        });
        match (engine.run(&query).unwrap(), engine.run(&query).unwrap()) {
            (RawOutput::Binary(a), RawOutput::Binary(b)) => {
                assert_eq!(a, b);
                assert!(a.len() > 2);
            }
            other => panic!("expected binary payloads, got {other:?}"),
        }
    }
}
