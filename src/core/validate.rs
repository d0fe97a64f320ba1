//! Coordinate and option validation
//!
//! Pure, deterministic checks over loosely-typed JSON input. Every rule runs
//! in a fixed order and fails on the first violation with a message naming
//! the offending constraint. Nothing here touches the engine: a query that
//! fails validation fails identically whether the caller later dispatches in
//! blocking or non-blocking mode.
//!
//! Per-coordinate auxiliary arrays (hints, bearings, radiuses, timestamps)
//! are element-checked first, then length-checked against `coordinates`;
//! a mismatch is an error, never silent padding or truncation.

use serde_json::{Map, Value};

use super::error::ValidationError;
use super::query::{
    Alternatives, Bearing, Coordinate, GeometryFormat, Overview, Service, TileQuery,
};

/// Typed intermediate for the waypoint services, pre-normalization.
/// Options are kept optional here; defaults are applied by the normalizer.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedWaypoints {
    pub coordinates: Vec<Coordinate>,
    pub hints: Option<Vec<Option<String>>>,
    pub checksum: Option<u32>,
    pub bearings: Option<Vec<Option<Bearing>>>,
    pub radiuses: Option<Vec<Option<f64>>>,
    pub options: ValidatedOptions,
}

/// Presentation options as supplied, before defaulting.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValidatedOptions {
    pub geometries: Option<GeometryFormat>,
    pub overview: Option<Overview>,
    pub steps: Option<bool>,
    pub alternatives: Option<Alternatives>,
    pub zoom_level: Option<u8>,
}

/// Typed intermediate for `match`.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedMatch {
    pub base: ValidatedWaypoints,
    pub timestamps: Option<Vec<u64>>,
    pub classify: Option<bool>,
    pub gps_precision: Option<f64>,
    pub matching_beta: Option<f64>,
}

/// Typed intermediate for `table`: one of the two mutually exclusive forms.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidatedTable {
    /// Plain `coordinates`: sources and destinations are the same list.
    Symmetric(ValidatedWaypoints),
    /// Explicit `sources` + `destinations` pair.
    Rectangular {
        sources: Vec<Coordinate>,
        destinations: Vec<Coordinate>,
    },
}

/// Validator output, tagged by service.
#[derive(Debug, Clone, PartialEq)]
pub enum Validated {
    Route(ValidatedWaypoints),
    Trip(ValidatedWaypoints),
    Match(ValidatedMatch),
    Table(ValidatedTable),
    Nearest(Coordinate),
    Locate(Coordinate),
    Tile(TileQuery),
}

/// Validate raw input for one service.
pub fn validate(service: Service, input: &Value) -> Result<Validated, ValidationError> {
    match service {
        Service::Route => Ok(Validated::Route(validate_route(input)?)),
        Service::Trip => Ok(Validated::Trip(validate_route(input)?)),
        Service::Match => Ok(Validated::Match(validate_match(input)?)),
        Service::Table => Ok(Validated::Table(validate_table(input)?)),
        Service::Nearest => Ok(Validated::Nearest(validate_location(input)?)),
        Service::Locate => Ok(Validated::Locate(validate_location(input)?)),
        Service::Tile => Ok(Validated::Tile(validate_tile(input)?)),
    }
}

/// Validate `route`/`trip` input: an object with ≥2 coordinates.
pub fn validate_route(input: &Value) -> Result<ValidatedWaypoints, ValidationError> {
    let obj = object_of(input)?;
    validate_waypoints(obj, 2)
}

/// Validate `match` input: waypoints plus trajectory options.
pub fn validate_match(input: &Value) -> Result<ValidatedMatch, ValidationError> {
    let obj = object_of(input)?;
    let base = validate_waypoints(obj, 2)?;

    let timestamps = timestamps_field(obj, base.coordinates.len())?;
    let classify = bool_field(obj, "classify")?;
    let gps_precision = number_field(obj, "gps_precision")?;
    let matching_beta = number_field(obj, "matching_beta")?;

    Ok(ValidatedMatch {
        base,
        timestamps,
        classify,
        gps_precision,
        matching_beta,
    })
}

/// Validate `table` input: either plain coordinates or an explicit
/// sources/destinations pair, never a mix, never half a pair.
pub fn validate_table(input: &Value) -> Result<ValidatedTable, ValidationError> {
    let obj = object_of(input)?;

    let has_sources = obj.contains_key("sources");
    let has_destinations = obj.contains_key("destinations");
    let has_coordinates = obj.contains_key("coordinates");

    if has_sources || has_destinations {
        if has_coordinates {
            return Err(ValidationError::ConflictingOptionGroups);
        }
        if !(has_sources && has_destinations) {
            return Err(ValidationError::IncompleteOptionGroup);
        }
        let sources = coordinate_array(&obj["sources"])?;
        let destinations = coordinate_array(&obj["destinations"])?;
        if sources.is_empty() || destinations.is_empty() {
            return Err(ValidationError::InsufficientCoordinates);
        }
        return Ok(ValidatedTable::Rectangular {
            sources,
            destinations,
        });
    }

    Ok(ValidatedTable::Symmetric(validate_waypoints(obj, 2)?))
}

/// Validate `nearest`/`locate` input: a bare `[lat, lon]` pair, or an object
/// whose `coordinates` array holds exactly one pair.
pub fn validate_location(input: &Value) -> Result<Coordinate, ValidationError> {
    match input {
        Value::Array(_) => coordinate_pair(input).ok_or(ValidationError::MalformedLocation),
        Value::Object(obj) => {
            let raw = obj
                .get("coordinates")
                .ok_or(ValidationError::MissingCoordinates)?;
            let coords =
                coordinate_array(raw).map_err(|_| ValidationError::MalformedLocation)?;
            if coords.len() != 1 {
                return Err(ValidationError::MalformedLocation);
            }
            Ok(coords[0])
        }
        _ => Err(ValidationError::MalformedLocation),
    }
}

/// Validate `tile` input: `[x, y, z]` or `{x, y, z}` of non-negative
/// integers with `z` a sane zoom level.
pub fn validate_tile(input: &Value) -> Result<TileQuery, ValidationError> {
    const MAX_ZOOM: u64 = 22;

    let (x, y, z) = match input {
        Value::Array(items) if items.len() == 3 => {
            let x = items[0].as_u64().ok_or(ValidationError::MalformedTile)?;
            let y = items[1].as_u64().ok_or(ValidationError::MalformedTile)?;
            let z = items[2].as_u64().ok_or(ValidationError::MalformedTile)?;
            (x, y, z)
        }
        Value::Object(obj) => {
            let field = |name: &str| {
                obj.get(name)
                    .and_then(Value::as_u64)
                    .ok_or(ValidationError::MalformedTile)
            };
            (field("x")?, field("y")?, field("z")?)
        }
        _ => return Err(ValidationError::MalformedTile),
    };

    if z > MAX_ZOOM || x > u32::MAX as u64 || y > u32::MAX as u64 {
        return Err(ValidationError::MalformedTile);
    }

    Ok(TileQuery {
        x: x as u32,
        y: y as u32,
        z: z as u32,
    })
}

fn object_of(input: &Value) -> Result<&Map<String, Value>, ValidationError> {
    input.as_object().ok_or(ValidationError::NotAnObject)
}

/// Shared waypoint-service path: coordinates, auxiliary arrays, options.
fn validate_waypoints(
    obj: &Map<String, Value>,
    min_coordinates: usize,
) -> Result<ValidatedWaypoints, ValidationError> {
    let raw = obj
        .get("coordinates")
        .ok_or(ValidationError::MissingCoordinates)?;
    let coordinates = coordinate_array(raw)?;
    if coordinates.len() < min_coordinates {
        return Err(ValidationError::InsufficientCoordinates);
    }

    let n = coordinates.len();
    let hints = hints_field(obj, n)?;
    let checksum = checksum_field(obj)?;
    let bearings = bearings_field(obj, n)?;
    let radiuses = radiuses_field(obj, n)?;
    let options = options_fields(obj)?;

    Ok(ValidatedWaypoints {
        coordinates,
        hints,
        checksum,
        bearings,
        radiuses,
        options,
    })
}

fn coordinate_pair(value: &Value) -> Option<Coordinate> {
    let pair = value.as_array()?;
    if pair.len() != 2 {
        return None;
    }
    let latitude = pair[0].as_f64()?;
    let longitude = pair[1].as_f64()?;
    Some(Coordinate::new(latitude, longitude))
}

fn coordinate_array(raw: &Value) -> Result<Vec<Coordinate>, ValidationError> {
    let items = raw
        .as_array()
        .ok_or(ValidationError::MalformedCoordinates)?;
    items
        .iter()
        .map(|item| coordinate_pair(item).ok_or(ValidationError::MalformedCoordinates))
        .collect()
}

/// Hints: string-or-null per element. Empty strings mean "no hint" and
/// normalize to `None` so downstream code has a single absent form.
fn hints_field(
    obj: &Map<String, Value>,
    n: usize,
) -> Result<Option<Vec<Option<String>>>, ValidationError> {
    let raw = match obj.get("hints") {
        Some(raw) => raw,
        None => return Ok(None),
    };
    let items = raw.as_array().ok_or(ValidationError::MalformedHints)?;

    let mut hints = Vec::with_capacity(items.len());
    for item in items {
        match item {
            Value::Null => hints.push(None),
            Value::String(s) if s.is_empty() => hints.push(None),
            Value::String(s) => hints.push(Some(s.clone())),
            _ => return Err(ValidationError::InvalidHint),
        }
    }

    if hints.len() != n {
        return Err(ValidationError::LengthMismatch { field: "hints" });
    }
    Ok(Some(hints))
}

/// Bearings: null or a `[value, range]` pair of numbers in `[0, 360]`.
/// A bare number is a shape error, reported distinctly from range errors.
fn bearings_field(
    obj: &Map<String, Value>,
    n: usize,
) -> Result<Option<Vec<Option<Bearing>>>, ValidationError> {
    let raw = match obj.get("bearings") {
        Some(raw) => raw,
        None => return Ok(None),
    };
    let items = raw.as_array().ok_or(ValidationError::MalformedBearing)?;

    let mut bearings = Vec::with_capacity(items.len());
    for item in items {
        match item {
            Value::Null => bearings.push(None),
            Value::Array(pair) => {
                if pair.len() != 2 {
                    return Err(ValidationError::MalformedBearing);
                }
                let value = pair[0].as_f64().ok_or(ValidationError::MalformedBearing)?;
                let range = pair[1].as_f64().ok_or(ValidationError::MalformedBearing)?;
                if !(0.0..=360.0).contains(&value) || !(0.0..=360.0).contains(&range) {
                    return Err(ValidationError::BearingOutOfRange);
                }
                bearings.push(Some(Bearing { value, range }));
            }
            _ => return Err(ValidationError::MalformedBearing),
        }
    }

    if bearings.len() != n {
        return Err(ValidationError::LengthMismatch { field: "bearings" });
    }
    Ok(Some(bearings))
}

fn radiuses_field(
    obj: &Map<String, Value>,
    n: usize,
) -> Result<Option<Vec<Option<f64>>>, ValidationError> {
    let raw = match obj.get("radiuses") {
        Some(raw) => raw,
        None => return Ok(None),
    };
    let items = raw.as_array().ok_or(ValidationError::InvalidRadius)?;

    let mut radiuses = Vec::with_capacity(items.len());
    for item in items {
        match item {
            Value::Null => radiuses.push(None),
            _ => {
                let radius = item.as_f64().ok_or(ValidationError::InvalidRadius)?;
                if radius < 0.0 {
                    return Err(ValidationError::InvalidRadius);
                }
                radiuses.push(Some(radius));
            }
        }
    }

    if radiuses.len() != n {
        return Err(ValidationError::LengthMismatch { field: "radiuses" });
    }
    Ok(Some(radiuses))
}

fn timestamps_field(
    obj: &Map<String, Value>,
    n: usize,
) -> Result<Option<Vec<u64>>, ValidationError> {
    let raw = match obj.get("timestamps") {
        Some(raw) => raw,
        None => return Ok(None),
    };
    let items = raw
        .as_array()
        .ok_or(ValidationError::MalformedTimestamps)?;

    let timestamps = items
        .iter()
        .map(|item| item.as_u64().ok_or(ValidationError::InvalidTimestamp))
        .collect::<Result<Vec<u64>, _>>()?;

    if timestamps.len() != n {
        return Err(ValidationError::LengthMismatch { field: "timestamp" });
    }
    Ok(Some(timestamps))
}

fn checksum_field(obj: &Map<String, Value>) -> Result<Option<u32>, ValidationError> {
    let raw = match obj.get("checksum") {
        Some(raw) => raw,
        None => return Ok(None),
    };
    raw.as_u64()
        .filter(|&v| v <= u32::MAX as u64)
        .map(|v| Some(v as u32))
        .ok_or(ValidationError::InvalidOption {
            field: "checksum",
            expected: "an unsigned integer",
        })
}

fn bool_field(obj: &Map<String, Value>, field: &'static str) -> Result<Option<bool>, ValidationError> {
    match obj.get(field) {
        None => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(_) => Err(ValidationError::InvalidOption {
            field,
            expected: "a boolean",
        }),
    }
}

fn number_field(obj: &Map<String, Value>, field: &'static str) -> Result<Option<f64>, ValidationError> {
    match obj.get(field) {
        None => Ok(None),
        Some(raw) => raw
            .as_f64()
            .map(Some)
            .ok_or(ValidationError::InvalidOption {
                field,
                expected: "a number",
            }),
    }
}

/// Presentation options. `alternateRoute` and `printInstructions` are
/// accepted as legacy spellings of `alternatives` and `steps`.
fn options_fields(obj: &Map<String, Value>) -> Result<ValidatedOptions, ValidationError> {
    let geometries = match obj.get("geometries") {
        None => None,
        Some(Value::String(s)) => match s.as_str() {
            "polyline" => Some(GeometryFormat::Polyline),
            "geojson" => Some(GeometryFormat::GeoJson),
            "none" => Some(GeometryFormat::None),
            _ => {
                return Err(ValidationError::InvalidEnumValue {
                    field: "geometries",
                    allowed: GeometryFormat::ALLOWED,
                })
            }
        },
        Some(_) => {
            return Err(ValidationError::InvalidEnumValue {
                field: "geometries",
                allowed: GeometryFormat::ALLOWED,
            })
        }
    };

    let overview = match obj.get("overview") {
        None => None,
        Some(Value::Bool(false)) => Some(Overview::False),
        Some(Value::String(s)) => match s.as_str() {
            "full" => Some(Overview::Full),
            "simplified" => Some(Overview::Simplified),
            "false" => Some(Overview::False),
            _ => {
                return Err(ValidationError::InvalidEnumValue {
                    field: "overview",
                    allowed: Overview::ALLOWED,
                })
            }
        },
        Some(_) => {
            return Err(ValidationError::InvalidEnumValue {
                field: "overview",
                allowed: Overview::ALLOWED,
            })
        }
    };

    let steps = match bool_field(obj, "steps")? {
        Some(steps) => Some(steps),
        None => bool_field(obj, "printInstructions")?,
    };

    let alternatives = match obj.get("alternatives").or_else(|| obj.get("alternateRoute")) {
        None => None,
        Some(Value::Bool(true)) => Some(Alternatives::Enabled),
        Some(Value::Bool(false)) => Some(Alternatives::Disabled),
        Some(raw) => match raw.as_u64() {
            Some(count) if count <= u32::MAX as u64 => Some(Alternatives::Count(count as u32)),
            _ => {
                return Err(ValidationError::InvalidOption {
                    field: "alternatives",
                    expected: "a boolean or a non-negative integer",
                })
            }
        },
    };

    let zoom_level = match obj.get("zoom_level").or_else(|| obj.get("zoomLevel")) {
        None => None,
        Some(raw) => match raw.as_u64() {
            Some(zoom) if zoom <= 18 => Some(zoom as u8),
            _ => {
                return Err(ValidationError::InvalidOption {
                    field: "zoom_level",
                    expected: "an integer in the range 0..18",
                })
            }
        },
    };

    Ok(ValidatedOptions {
        geometries,
        overview,
        steps,
        alternatives,
        zoom_level,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn berlin() -> Value {
        json!({"coordinates": [[52.519930, 13.438640], [52.513191, 13.415852]]})
    }

    #[test]
    fn test_route_accepts_minimal_query() {
        let validated = validate_route(&berlin()).unwrap();
        assert_eq!(validated.coordinates.len(), 2);
        assert!(validated.hints.is_none());
        assert_eq!(validated.options, ValidatedOptions::default());
    }

    #[test]
    fn test_route_rejects_non_object() {
        assert_eq!(
            validate_route(&Value::Null).unwrap_err(),
            ValidationError::NotAnObject
        );
        assert_eq!(
            validate_route(&json!(42)).unwrap_err(),
            ValidationError::NotAnObject
        );
    }

    #[test]
    fn test_route_requires_coordinates_property() {
        assert_eq!(
            validate_route(&json!({})).unwrap_err(),
            ValidationError::MissingCoordinates
        );
    }

    #[test]
    fn test_route_rejects_malformed_coordinates() {
        for bad in [
            json!({"coordinates": null}),
            json!({"coordinates": [52.519930, 13.438640]}),
            json!({"coordinates": [[52.519930], [13.438640]]}),
            json!({"coordinates": [[52.519930, "13.438640"], [52.513191, 13.415852]]}),
        ] {
            assert_eq!(
                validate_route(&bad).unwrap_err(),
                ValidationError::MalformedCoordinates,
                "input: {bad}"
            );
        }
    }

    #[test]
    fn test_route_requires_two_coordinates() {
        assert_eq!(
            validate_route(&json!({"coordinates": []})).unwrap_err(),
            ValidationError::InsufficientCoordinates
        );
        assert_eq!(
            validate_route(&json!({"coordinates": [[52.519930, 13.438640]]})).unwrap_err(),
            ValidationError::InsufficientCoordinates
        );
    }

    #[test]
    fn test_hints_must_be_strings_or_null() {
        let mut query = berlin();
        query["hints"] = json!(null);
        assert_eq!(
            validate_route(&query).unwrap_err(),
            ValidationError::MalformedHints
        );

        query["hints"] = json!([[52.519930, 13.438640], "token"]);
        assert_eq!(
            validate_route(&query).unwrap_err(),
            ValidationError::InvalidHint
        );
    }

    #[test]
    fn test_empty_hint_strings_normalize_to_none() {
        let mut query = berlin();
        query["hints"] = json!(["", "token"]);
        let validated = validate_route(&query).unwrap();
        assert_eq!(
            validated.hints,
            Some(vec![None, Some("token".to_string())])
        );
    }

    #[test]
    fn test_hints_length_mismatch() {
        let mut query = berlin();
        query["hints"] = json!(["a", "b", "c"]);
        assert_eq!(
            validate_route(&query).unwrap_err(),
            ValidationError::LengthMismatch { field: "hints" }
        );
    }

    #[test]
    fn test_bearings_shape_and_range() {
        let mut query = berlin();
        query["bearings"] = json!([200, [250, 180]]);
        assert_eq!(
            validate_route(&query).unwrap_err(),
            ValidationError::MalformedBearing
        );

        query["bearings"] = json!([[200], [250, 180]]);
        assert_eq!(
            validate_route(&query).unwrap_err(),
            ValidationError::MalformedBearing
        );

        query["bearings"] = json!([[400, 180], [-250, 180]]);
        assert_eq!(
            validate_route(&query).unwrap_err(),
            ValidationError::BearingOutOfRange
        );

        query["bearings"] = json!([[200, 180], null]);
        let validated = validate_route(&query).unwrap();
        let bearings = validated.bearings.unwrap();
        assert_eq!(
            bearings[0],
            Some(Bearing {
                value: 200.0,
                range: 180.0
            })
        );
        assert_eq!(bearings[1], None);
    }

    #[test]
    fn test_bearings_length_mismatch() {
        let mut query = berlin();
        query["bearings"] = json!([[200, 180]]);
        assert_eq!(
            validate_route(&query).unwrap_err(),
            ValidationError::LengthMismatch { field: "bearings" }
        );
    }

    #[test]
    fn test_radiuses_reject_negative_and_non_numeric() {
        let mut query = berlin();
        query["radiuses"] = json!([-1.0, 5.0]);
        assert_eq!(
            validate_route(&query).unwrap_err(),
            ValidationError::InvalidRadius
        );

        query["radiuses"] = json!(["wide", 5.0]);
        assert_eq!(
            validate_route(&query).unwrap_err(),
            ValidationError::InvalidRadius
        );

        query["radiuses"] = json!([null, 5.0]);
        let validated = validate_route(&query).unwrap();
        assert_eq!(validated.radiuses, Some(vec![None, Some(5.0)]));
    }

    #[test]
    fn test_enum_options() {
        let mut query = berlin();
        query["geometries"] = json!("wkt");
        assert_eq!(
            validate_route(&query).unwrap_err(),
            ValidationError::InvalidEnumValue {
                field: "geometries",
                allowed: "polyline, geojson, none"
            }
        );

        query["geometries"] = json!("geojson");
        query["overview"] = json!(false);
        let validated = validate_route(&query).unwrap();
        assert_eq!(validated.options.geometries, Some(GeometryFormat::GeoJson));
        assert_eq!(validated.options.overview, Some(Overview::False));
    }

    #[test]
    fn test_legacy_option_spellings() {
        let mut query = berlin();
        query["alternateRoute"] = json!(false);
        query["printInstructions"] = json!(true);
        query["zoomLevel"] = json!(17);
        let validated = validate_route(&query).unwrap();
        assert_eq!(validated.options.alternatives, Some(Alternatives::Disabled));
        assert_eq!(validated.options.steps, Some(true));
        assert_eq!(validated.options.zoom_level, Some(17));
    }

    #[test]
    fn test_alternatives_count_form() {
        let mut query = berlin();
        query["alternatives"] = json!(2);
        let validated = validate_route(&query).unwrap();
        assert_eq!(validated.options.alternatives, Some(Alternatives::Count(2)));

        query["alternatives"] = json!(-1);
        assert_eq!(
            validate_route(&query).unwrap_err(),
            ValidationError::InvalidOption {
                field: "alternatives",
                expected: "a boolean or a non-negative integer"
            }
        );
    }

    #[test]
    fn test_match_timestamps() {
        let coords = json!([[52.542648, 13.393252], [52.543079, 13.394780], [52.542107, 13.397389]]);

        let query = json!({"coordinates": coords, "timestamps": "timestamps"});
        assert_eq!(
            validate_match(&query).unwrap_err(),
            ValidationError::MalformedTimestamps
        );

        let query = json!({"coordinates": coords, "timestamps": ["invalid", "timestamp", "array"]});
        assert_eq!(
            validate_match(&query).unwrap_err(),
            ValidationError::InvalidTimestamp
        );

        let query = json!({"coordinates": coords, "timestamps": [1424684612, 1424684616]});
        assert_eq!(
            validate_match(&query).unwrap_err(),
            ValidationError::LengthMismatch { field: "timestamp" }
        );

        let query = json!({
            "coordinates": coords,
            "timestamps": [1424684612, 1424684616, 1424684620],
            "classify": true,
            "gps_precision": 4.07,
            "matching_beta": 10.0,
        });
        let validated = validate_match(&query).unwrap();
        assert_eq!(validated.timestamps.as_ref().map(Vec::len), Some(3));
        assert_eq!(validated.classify, Some(true));
        assert_eq!(validated.gps_precision, Some(4.07));
        assert_eq!(validated.matching_beta, Some(10.0));
    }

    #[test]
    fn test_table_option_groups() {
        let sources = json!([[52.519930, 13.438640]]);
        let destinations = json!([[52.513191, 13.415852]]);

        let incomplete = json!({"sources": sources});
        assert_eq!(
            validate_table(&incomplete).unwrap_err(),
            ValidationError::IncompleteOptionGroup
        );

        let conflicting = json!({
            "coordinates": [[52.5, 13.4], [52.51, 13.41]],
            "sources": sources,
            "destinations": destinations,
        });
        assert_eq!(
            validate_table(&conflicting).unwrap_err(),
            ValidationError::ConflictingOptionGroups
        );

        let rectangular = json!({"sources": sources, "destinations": destinations});
        assert!(matches!(
            validate_table(&rectangular).unwrap(),
            ValidatedTable::Rectangular { .. }
        ));

        let symmetric = berlin();
        assert!(matches!(
            validate_table(&symmetric).unwrap(),
            ValidatedTable::Symmetric(_)
        ));
    }

    #[test]
    fn test_table_rejects_empty_group_sides() {
        let query = json!({"sources": [], "destinations": [[52.5, 13.4]]});
        assert_eq!(
            validate_table(&query).unwrap_err(),
            ValidationError::InsufficientCoordinates
        );
    }

    #[test]
    fn test_location_forms() {
        let coord = validate_location(&json!([52.4224, 13.333086])).unwrap();
        assert_eq!(coord, Coordinate::new(52.4224, 13.333086));

        let coord =
            validate_location(&json!({"coordinates": [[52.4224, 13.333086]]})).unwrap();
        assert_eq!(coord.latitude, 52.4224);

        assert_eq!(
            validate_location(&json!(null)).unwrap_err(),
            ValidationError::MalformedLocation
        );
        assert_eq!(
            validate_location(&json!([52.4224])).unwrap_err(),
            ValidationError::MalformedLocation
        );
        assert_eq!(
            validate_location(&json!({"coordinates": [[52.42, 13.33], [52.43, 13.34]]}))
                .unwrap_err(),
            ValidationError::MalformedLocation
        );
        assert_eq!(
            validate_location(&json!({})).unwrap_err(),
            ValidationError::MissingCoordinates
        );
    }

    #[test]
    fn test_tile_forms() {
        let tile = validate_tile(&json!([17603, 10747, 15])).unwrap();
        assert_eq!((tile.x, tile.y, tile.z), (17603, 10747, 15));

        let tile = validate_tile(&json!({"x": 17603, "y": 10747, "z": 15})).unwrap();
        assert_eq!((tile.x, tile.y, tile.z), (17603, 10747, 15));

        for bad in [
            json!([17603, 10747]),
            json!([17603, 10747, -1]),
            json!([17603, 10747, 15, 0]),
            json!({"x": 17603, "y": 10747}),
            json!("15/17603/10747"),
            json!([17603, 10747, 23]),
        ] {
            assert_eq!(
                validate_tile(&bad).unwrap_err(),
                ValidationError::MalformedTile,
                "input: {bad}"
            );
        }
    }

    #[test]
    fn test_validation_is_deterministic() {
        let query = json!({
            "coordinates": [[52.5, 13.4], [52.51, 13.41]],
            "hints": ["a", "b", "c"],
            "bearings": [[400, 0]],
        });
        // hints are checked before bearings; same verdict every time
        for _ in 0..3 {
            assert_eq!(
                validate_route(&query).unwrap_err(),
                ValidationError::LengthMismatch { field: "hints" }
            );
        }
    }
}
