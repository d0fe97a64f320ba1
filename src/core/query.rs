//! Canonical query model and normalizer
//!
//! The validator (`core::validate`) turns loosely-typed input into typed
//! intermediate structures; this module turns those into one canonical
//! [`Query`] per service with all defaults applied. The engine only ever
//! sees canonical queries.
//!
//! The closed, per-service tagged shape means there is no dynamic option
//! bag: every recognized field is enumerated and explicitly optional, and
//! the mutually exclusive table forms (plain coordinates vs.
//! sources/destinations) are resolved here into one rectangular request.

use serde::{Deserialize, Serialize};

use super::validate::{ValidatedMatch, ValidatedOptions, ValidatedTable, ValidatedWaypoints};

/// The services the engine exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Service {
    Route,
    Trip,
    Match,
    Table,
    Nearest,
    Locate,
    Tile,
}

impl Service {
    pub fn as_str(&self) -> &'static str {
        match self {
            Service::Route => "route",
            Service::Trip => "trip",
            Service::Match => "match",
            Service::Table => "table",
            Service::Nearest => "nearest",
            Service::Locate => "locate",
            Service::Tile => "tile",
        }
    }
}

impl std::fmt::Display for Service {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A (latitude, longitude) pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// A snapping bearing constraint: heading plus allowed deviation, both in
/// degrees within `[0, 360]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bearing {
    pub value: f64,
    pub range: f64,
}

/// How route geometry is rendered in the response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeometryFormat {
    #[default]
    Polyline,
    GeoJson,
    /// Geometry omitted from the response entirely.
    None,
}

impl GeometryFormat {
    pub const ALLOWED: &'static str = "polyline, geojson, none";
}

/// Overview geometry detail level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Overview {
    #[default]
    Full,
    Simplified,
    /// Overview omitted from the response entirely.
    #[serde(rename = "false")]
    False,
}

impl Overview {
    pub const ALLOWED: &'static str = "full, simplified, false";
}

/// Alternative-route request: off, engine default count, or explicit count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Alternatives {
    #[default]
    Disabled,
    Enabled,
    Count(u32),
}

/// Presentation options shared by the waypoint services, defaults applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Presentation {
    pub geometries: GeometryFormat,
    pub overview: Overview,
    /// `None` leaves turn-by-turn steps to the engine default.
    pub steps: Option<bool>,
    pub alternatives: Alternatives,
    pub zoom_level: u8,
}

/// Default zoom level: no generalization.
pub const DEFAULT_ZOOM_LEVEL: u8 = 18;

impl Default for Presentation {
    fn default() -> Self {
        Self {
            geometries: GeometryFormat::default(),
            overview: Overview::default(),
            steps: None,
            alternatives: Alternatives::default(),
            zoom_level: DEFAULT_ZOOM_LEVEL,
        }
    }
}

/// Canonical query for `route` and `trip`.
///
/// Auxiliary arrays, when present, are exactly as long as `coordinates`;
/// the validator guarantees this before a value of this type can exist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteQuery {
    pub coordinates: Vec<Coordinate>,
    pub hints: Option<Vec<Option<String>>>,
    pub checksum: Option<u32>,
    pub bearings: Option<Vec<Option<Bearing>>>,
    pub radiuses: Option<Vec<Option<f64>>>,
    pub presentation: Presentation,
}

/// Canonical query for `match` (trajectory snapping).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchQuery {
    pub coordinates: Vec<Coordinate>,
    pub timestamps: Option<Vec<u64>>,
    pub hints: Option<Vec<Option<String>>>,
    pub checksum: Option<u32>,
    pub bearings: Option<Vec<Option<Bearing>>>,
    pub radiuses: Option<Vec<Option<f64>>>,
    pub classify: Option<bool>,
    pub gps_precision: Option<f64>,
    pub matching_beta: Option<f64>,
    pub presentation: Presentation,
}

/// Canonical query for `table`: always the engine's rectangular-matrix shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableQuery {
    pub sources: Vec<Coordinate>,
    pub destinations: Vec<Coordinate>,
    /// Set when sources and destinations are the same coordinate list, i.e.
    /// the caller asked for a symmetric N×N table.
    pub symmetric: bool,
    /// Hints travel only with the symmetric form, where they align with the
    /// single coordinate list.
    pub hints: Option<Vec<Option<String>>>,
    pub checksum: Option<u32>,
}

/// Canonical query for `nearest` and `locate`: a single coordinate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocateQuery {
    pub coordinate: Coordinate,
}

/// Canonical query for `tile`: a zoom-indexed tile address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileQuery {
    pub x: u32,
    pub y: u32,
    pub z: u32,
}

/// One canonical query, tagged by service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Query {
    Route(RouteQuery),
    Trip(RouteQuery),
    Match(MatchQuery),
    Table(TableQuery),
    Nearest(LocateQuery),
    Locate(LocateQuery),
    Tile(TileQuery),
}

impl Query {
    pub fn service(&self) -> Service {
        match self {
            Query::Route(_) => Service::Route,
            Query::Trip(_) => Service::Trip,
            Query::Match(_) => Service::Match,
            Query::Table(_) => Service::Table,
            Query::Nearest(_) => Service::Nearest,
            Query::Locate(_) => Service::Locate,
            Query::Tile(_) => Service::Tile,
        }
    }
}

fn presentation(options: ValidatedOptions) -> Presentation {
    Presentation {
        geometries: options.geometries.unwrap_or_default(),
        overview: options.overview.unwrap_or_default(),
        steps: options.steps,
        alternatives: options.alternatives.unwrap_or_default(),
        zoom_level: options.zoom_level.unwrap_or(DEFAULT_ZOOM_LEVEL),
    }
}

/// Normalize validated `route`/`trip` input into a canonical query.
pub fn normalize_route(validated: ValidatedWaypoints) -> RouteQuery {
    RouteQuery {
        coordinates: validated.coordinates,
        hints: validated.hints,
        checksum: validated.checksum,
        bearings: validated.bearings,
        radiuses: validated.radiuses,
        presentation: presentation(validated.options),
    }
}

/// Normalize validated `match` input into a canonical query.
pub fn normalize_match(validated: ValidatedMatch) -> MatchQuery {
    let base = validated.base;
    MatchQuery {
        coordinates: base.coordinates,
        timestamps: validated.timestamps,
        hints: base.hints,
        checksum: base.checksum,
        bearings: base.bearings,
        radiuses: base.radiuses,
        classify: validated.classify,
        gps_precision: validated.gps_precision,
        matching_beta: validated.matching_beta,
        presentation: presentation(base.options),
    }
}

/// Normalize validated `table` input into the rectangular request shape.
///
/// Plain `coordinates` become both sides of a symmetric N×N request; an
/// explicit sources/destinations pair passes through as-is with hints
/// omitted (they have no single coordinate list to align with).
pub fn normalize_table(validated: ValidatedTable) -> TableQuery {
    match validated {
        ValidatedTable::Symmetric(waypoints) => TableQuery {
            sources: waypoints.coordinates.clone(),
            destinations: waypoints.coordinates,
            symmetric: true,
            hints: waypoints.hints,
            checksum: waypoints.checksum,
        },
        ValidatedTable::Rectangular {
            sources,
            destinations,
        } => TableQuery {
            sources,
            destinations,
            symmetric: false,
            hints: None,
            checksum: None,
        },
    }
}
