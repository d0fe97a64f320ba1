//! Response transcoding
//!
//! The engine answers with raw payloads: JSON text for every service except
//! `tile`, which answers with vector-tile bytes. This module decodes those
//! payloads into the structured per-service response model.
//!
//! Decoding failure is not a query failure. A payload the transcoder cannot
//! make sense of is returned unchanged as [`Response::Raw`]; the caller may
//! still forward it to another consumer. This is the one place in the layer
//! where a local failure is recovered rather than surfaced.
//!
//! Fields the query disabled (`geometries: none`, `steps: false`,
//! `overview: false`) are absent from the decoded response, not
//! present-but-empty; the optionals below only serialize when populated.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use super::engine::RawOutput;
use super::hint::HintData;
use super::query::Service;

/// Route geometry in whichever form the query requested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Geometry {
    /// Encoded polyline string.
    Polyline(String),
    /// Structured (latitude, longitude) sequence.
    Coordinates(Vec<[f64; 2]>),
}

/// Summary block for one route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteSummary {
    pub total_distance: f64,
    pub total_time: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_point: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_point: Option<String>,
}

/// One decoded route. Also the per-trip entry shape for `trip`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteResponse {
    pub status: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route_geometry: Option<Geometry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route_summary: Option<RouteSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route_instructions: Option<Vec<serde_json::Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub via_points: Option<Vec<[f64; 2]>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub found_alternative: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternative_geometries: Option<Vec<Geometry>>,
    /// Waypoint order chosen by the trip optimizer; trips only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permutation: Option<Vec<usize>>,
    /// Hint tokens plus the checksum they were issued under, for reuse in a
    /// later query. Always paired; never one without the other.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint_data: Option<HintData>,
}

/// Decoded `trip` response: one optimized round trip per connected subset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripResponse {
    pub trips: Vec<RouteResponse>,
}

/// One trajectory matching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matching {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_points: Option<Vec<[f64; 2]>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indices: Option<Vec<usize>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<Geometry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

/// Decoded `match` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResponse {
    pub matchings: Vec<Matching>,
}

/// Decoded `table` response: the pairwise cost matrix, row-major, sources
/// by destinations. The engine wraps the matrix in an envelope; the
/// transcoder unwraps it so callers get the matrix directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableResponse {
    pub distance_table: Vec<Vec<f64>>,
}

/// Decoded `nearest`/`locate` response: one snapped waypoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationResponse {
    pub status: i64,
    pub mapped_coordinate: [f64; 2],
    /// Street name of the snapped position; `nearest` only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Decoded `tile` response: vector-tile bytes plus their length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileResponse {
    pub data: Bytes,
    pub length: usize,
}

/// Structured response, tagged by service, or the raw payload when
/// structured decoding was not possible.
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    Route(RouteResponse),
    Trip(TripResponse),
    Match(MatchResponse),
    Table(TableResponse),
    Nearest(LocationResponse),
    Locate(LocationResponse),
    Tile(TileResponse),
    /// Passthrough fallback: the payload exactly as the engine produced it.
    Raw(RawOutput),
}

/// Decode a raw engine payload for the given service.
///
/// Never fails: anything that does not decode comes back as
/// [`Response::Raw`].
pub fn transcode(service: Service, raw: RawOutput) -> Response {
    match (service, raw) {
        (Service::Tile, RawOutput::Binary(data)) => {
            let length = data.len();
            Response::Tile(TileResponse { data, length })
        }
        (service, RawOutput::Json(payload)) => match decode_json(service, &payload) {
            Some(response) => response,
            None => {
                tracing::debug!(service = %service, "payload did not decode, passing through raw");
                Response::Raw(RawOutput::Json(payload))
            }
        },
        // A binary payload for a JSON service (or vice versa) is a contract
        // violation by the engine; pass it through untouched.
        (_, raw) => Response::Raw(raw),
    }
}

fn decode_json(service: Service, payload: &str) -> Option<Response> {
    match service {
        Service::Route => serde_json::from_str(payload).ok().map(Response::Route),
        Service::Trip => serde_json::from_str(payload).ok().map(Response::Trip),
        Service::Match => serde_json::from_str(payload).ok().map(Response::Match),
        Service::Table => serde_json::from_str(payload).ok().map(Response::Table),
        Service::Nearest => serde_json::from_str(payload).ok().map(Response::Nearest),
        Service::Locate => serde_json::from_str(payload).ok().map(Response::Locate),
        Service::Tile => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn route_payload() -> String {
        json!({
            "status": 0,
            "status_message": "Found route between points",
            "route_geometry": "_p~iF~ps|U_ulLnnqC",
            "route_summary": {"total_distance": 2538.0, "total_time": 211.0},
            "via_points": [[52.519930, 13.438640], [52.513191, 13.415852]],
            "hint_data": {"checksum": 1793426, "locations": ["a", "b"]},
        })
        .to_string()
    }

    #[test]
    fn test_route_decodes() {
        let response = transcode(Service::Route, RawOutput::Json(route_payload()));
        let route = match response {
            Response::Route(route) => route,
            other => panic!("expected route, got {other:?}"),
        };
        assert_eq!(
            route.status_message.as_deref(),
            Some("Found route between points")
        );
        assert!(matches!(route.route_geometry, Some(Geometry::Polyline(_))));
        let hint_data = route.hint_data.unwrap();
        assert_eq!(hint_data.checksum, 1793426);
        assert_eq!(hint_data.locations.len(), 2);
    }

    #[test]
    fn test_uncompressed_geometry_decodes_as_coordinates() {
        let payload = json!({
            "status": 0,
            "route_geometry": [[52.5199, 13.4386], [52.5131, 13.4158]],
        })
        .to_string();
        let response = transcode(Service::Route, RawOutput::Json(payload));
        match response {
            Response::Route(route) => {
                assert!(matches!(
                    route.route_geometry,
                    Some(Geometry::Coordinates(ref c)) if c.len() == 2
                ));
            }
            other => panic!("expected route, got {other:?}"),
        }
    }

    #[test]
    fn test_disabled_fields_are_absent() {
        let payload = json!({"status": 0, "status_message": "Found route between points"});
        let response = transcode(Service::Route, RawOutput::Json(payload.to_string()));
        let route = match response {
            Response::Route(route) => route,
            other => panic!("expected route, got {other:?}"),
        };
        assert!(route.route_geometry.is_none());
        assert!(route.route_instructions.is_none());
        assert!(route.alternative_geometries.is_none());

        // and they stay absent on re-serialization, not present-but-empty
        let reserialized = serde_json::to_value(&route).unwrap();
        let map = reserialized.as_object().unwrap();
        assert!(!map.contains_key("route_geometry"));
        assert!(!map.contains_key("route_instructions"));
    }

    #[test]
    fn test_undecodable_payload_passes_through_raw() {
        let garbage = "<!DOCTYPE html><html>not json at all</html>".to_string();
        let response = transcode(Service::Route, RawOutput::Json(garbage.clone()));
        assert_eq!(response, Response::Raw(RawOutput::Json(garbage)));

        // valid JSON with the wrong shape also falls back
        let wrong_shape = json!({"unexpected": true}).to_string();
        let response = transcode(Service::Table, RawOutput::Json(wrong_shape.clone()));
        assert_eq!(response, Response::Raw(RawOutput::Json(wrong_shape)));
    }

    #[test]
    fn test_table_unwraps_distance_table() {
        let payload = json!({"distance_table": [[0.0, 173.0], [181.0, 0.0]]}).to_string();
        let response = transcode(Service::Table, RawOutput::Json(payload));
        match response {
            Response::Table(table) => {
                assert_eq!(table.distance_table.len(), 2);
                assert_eq!(table.distance_table[0][0], 0.0);
            }
            other => panic!("expected table, got {other:?}"),
        }
    }

    #[test]
    fn test_nearest_decodes_waypoint() {
        let payload = json!({
            "status": 0,
            "mapped_coordinate": [52.422442, 13.332101],
            "name": "Mariannenstraße",
        })
        .to_string();
        let response = transcode(Service::Nearest, RawOutput::Json(payload));
        match response {
            Response::Nearest(nearest) => {
                assert_eq!(nearest.mapped_coordinate.len(), 2);
                assert_eq!(nearest.name.as_deref(), Some("Mariannenstraße"));
            }
            other => panic!("expected nearest, got {other:?}"),
        }
    }

    #[test]
    fn test_tile_payload_is_bytes_plus_length() {
        let data = Bytes::from_static(&[0x1a, 0x02, 0x78, 0x02]);
        let response = transcode(Service::Tile, RawOutput::Binary(data.clone()));
        match response {
            Response::Tile(tile) => {
                assert_eq!(tile.length, 4);
                assert_eq!(tile.data, data);
            }
            other => panic!("expected tile, got {other:?}"),
        }
    }

    #[test]
    fn test_binary_payload_for_json_service_passes_through() {
        let data = RawOutput::Binary(Bytes::from_static(&[1, 2, 3]));
        let response = transcode(Service::Route, data.clone());
        assert_eq!(response, Response::Raw(data));
    }
}
