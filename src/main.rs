//! routegate-server - HTTP front end over the gateway
//!
//! Serves the deterministic in-memory engine behind the classic query-string
//! endpoints (`/viaroute`, `/nearest`, `/table`, `/tile/{z}/{x}/{y}`),
//! translating each request into a loosely-typed gateway query. Useful for
//! poking at the boundary layer with curl; not a production router.

use std::sync::Arc;

use axum::extract::{Path, Query as UrlQuery, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response as HttpResponse};
use axum::routing::get;
use axum::{Json, Router};
use clap::Parser;
use serde::Deserialize;
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use routegate::testing::StubEngine;
use routegate::{Error, Gateway, RawOutput, Response, Service};

#[derive(Parser, Debug)]
#[command(name = "routegate-server", about = "HTTP front end over the routing gateway")]
struct Args {
    /// Port to listen on
    #[arg(long, default_value_t = 5000)]
    port: u16,

    /// Address to bind
    #[arg(long, default_value = "127.0.0.1")]
    host: String,
}

#[derive(Clone)]
struct AppState {
    gateway: Gateway,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "routegate=info,tower_http=info".into()),
        )
        .init();

    let args = Args::parse();
    let gateway = Gateway::new(Arc::new(StubEngine::new()));
    info!(checksum = gateway.dataset_checksum(), "dataset loaded");

    let app = Router::new()
        .route("/viaroute", get(viaroute))
        .route("/nearest", get(nearest))
        .route("/locate", get(locate))
        .route("/table", get(table))
        .route("/match", get(map_match))
        .route("/trip", get(trip))
        .route("/tile/{z}/{x}/{y}", get(tile))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(AppState { gateway });

    let addr = format!("{}:{}", args.host, args.port);
    info!(%addr, "listening");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[derive(Deserialize)]
struct RouteParams {
    start: String,
    end: String,
    #[serde(default)]
    alternatives: Option<bool>,
    #[serde(default)]
    geometries: Option<String>,
    #[serde(default)]
    steps: Option<bool>,
}

#[derive(Deserialize)]
struct LocParams {
    loc: String,
}

#[derive(Deserialize)]
struct MultiLocParams {
    /// Semicolon-separated `lat,lng` pairs.
    locs: String,
}

struct ApiError(StatusCode, String);

impl IntoResponse for ApiError {
    fn into_response(self) -> HttpResponse {
        (self.0, Json(json!({"error": self.1}))).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let status = match err {
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::Construction(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Engine(_) => StatusCode::BAD_GATEWAY,
        };
        ApiError(status, err.to_string())
    }
}

fn parse_loc(raw: &str) -> Result<[f64; 2], ApiError> {
    let mut parts = raw.splitn(2, ',');
    let lat = parts.next().and_then(|p| p.trim().parse::<f64>().ok());
    let lon = parts.next().and_then(|p| p.trim().parse::<f64>().ok());
    match (lat, lon) {
        (Some(lat), Some(lon)) => Ok([lat, lon]),
        _ => Err(ApiError(
            StatusCode::BAD_REQUEST,
            format!("invalid coordinate: {raw}"),
        )),
    }
}

fn parse_locs(raw: &str) -> Result<Vec<[f64; 2]>, ApiError> {
    raw.split(';').map(parse_loc).collect()
}

fn respond(response: Response) -> HttpResponse {
    match response {
        Response::Route(r) => Json(r).into_response(),
        Response::Trip(r) => Json(r).into_response(),
        Response::Match(r) => Json(r).into_response(),
        Response::Table(r) => Json(r).into_response(),
        Response::Nearest(r) | Response::Locate(r) => Json(r).into_response(),
        Response::Tile(tile) => (
            [(header::CONTENT_TYPE, "application/x-protobuf")],
            tile.data,
        )
            .into_response(),
        Response::Raw(RawOutput::Json(payload)) => (
            [(header::CONTENT_TYPE, "application/json")],
            payload,
        )
            .into_response(),
        Response::Raw(RawOutput::Binary(data)) => (
            [(header::CONTENT_TYPE, "application/octet-stream")],
            data,
        )
            .into_response(),
    }
}

async fn viaroute(
    State(state): State<AppState>,
    UrlQuery(params): UrlQuery<RouteParams>,
) -> Result<HttpResponse, ApiError> {
    let start = parse_loc(&params.start)?;
    let end = parse_loc(&params.end)?;
    let mut query = json!({"coordinates": [start, end]});
    if let Some(alternatives) = params.alternatives {
        query["alternatives"] = json!(alternatives);
    }
    if let Some(geometries) = params.geometries {
        query["geometries"] = json!(geometries);
    }
    if let Some(steps) = params.steps {
        query["steps"] = json!(steps);
    }
    Ok(respond(state.gateway.route(&query)?))
}

async fn trip(
    State(state): State<AppState>,
    UrlQuery(params): UrlQuery<MultiLocParams>,
) -> Result<HttpResponse, ApiError> {
    let coords = parse_locs(&params.locs)?;
    Ok(respond(state.gateway.trip(&json!({"coordinates": coords}))?))
}

async fn map_match(
    State(state): State<AppState>,
    UrlQuery(params): UrlQuery<MultiLocParams>,
) -> Result<HttpResponse, ApiError> {
    let coords = parse_locs(&params.locs)?;
    Ok(respond(
        state.gateway.r#match(&json!({"coordinates": coords}))?,
    ))
}

async fn table(
    State(state): State<AppState>,
    UrlQuery(params): UrlQuery<MultiLocParams>,
) -> Result<HttpResponse, ApiError> {
    let coords = parse_locs(&params.locs)?;
    Ok(respond(
        state.gateway.table(&json!({"coordinates": coords}))?,
    ))
}

async fn nearest(
    State(state): State<AppState>,
    UrlQuery(params): UrlQuery<LocParams>,
) -> Result<HttpResponse, ApiError> {
    let loc = parse_loc(&params.loc)?;
    Ok(respond(state.gateway.nearest(&json!(loc))?))
}

async fn locate(
    State(state): State<AppState>,
    UrlQuery(params): UrlQuery<LocParams>,
) -> Result<HttpResponse, ApiError> {
    let loc = parse_loc(&params.loc)?;
    Ok(respond(state.gateway.locate(&json!(loc))?))
}

async fn tile(
    State(state): State<AppState>,
    Path((z, x, y)): Path<(u32, u32, u32)>,
) -> Result<HttpResponse, ApiError> {
    let response = state
        .gateway
        .run(Service::Tile, &json!([x, y, z]))
        .map_err(ApiError::from)?;
    Ok(respond(response))
}
