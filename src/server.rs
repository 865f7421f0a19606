use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderName, Method},
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use hyper::Server;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::apis::{GooglePlaces, YelpFusion};
use crate::app::ports::HttpClientPort;
use crate::common::constants::*;
use crate::common::error::{GatewayError, Result};
use crate::common::types::{
    GeocodeResult, PhotoData, PlaceDetails, PlaceSummary, PlacesApi, ReviewsResult,
};
use crate::config::Config;
use crate::envelope::ApiResponse;
use crate::infra::http_client::ReqwestHttp;
use crate::validation::{self, Body};

/// Everything a handler needs, shared across requests
pub struct AppState {
    pub google: GooglePlaces,
    pub yelp: YelpFusion,
    pub cors_max_age: Duration,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    /// Build provider clients over the given transport.
    pub fn new(config: &Config, http: Arc<dyn HttpClientPort>) -> Self {
        Self {
            google: GooglePlaces::new(http.clone(), &config.google.api_base, &config.google.api_key),
            yelp: YelpFusion::new(http, &config.yelp.api_base, &config.yelp.api_key),
            cors_max_age: Duration::from_secs(config.server.cors_max_age_seconds),
        }
    }

    /// Build provider clients over a real reqwest transport.
    pub fn from_config(config: &Config) -> Result<Self> {
        let http = ReqwestHttp::new(config.upstream_timeout())?;
        Ok(Self::new(config, Arc::new(http)))
    }
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "places-gateway",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Parse the raw body and reject forged token claims.
fn checked_body(raw: &[u8]) -> Result<Body> {
    let body = validation::parse_body(raw)?;
    validation::check_if_malicious(&body)?;
    Ok(body)
}

async fn places_search(State(state): State<SharedState>, raw: Bytes) -> ApiResponse {
    ApiResponse::from_result(
        PLACES_SEARCH_ROUTE,
        PLACES_SEARCH_ACTION,
        search(&state.google, &raw).await,
    )
}

async fn places_details(State(state): State<SharedState>, raw: Bytes) -> ApiResponse {
    ApiResponse::from_result(
        PLACES_DETAILS_ROUTE,
        PLACES_DETAILS_ACTION,
        details(&state.google, &raw).await,
    )
}

async fn places_photo(State(state): State<SharedState>, raw: Bytes) -> ApiResponse {
    ApiResponse::from_result(PLACES_PHOTO_ROUTE, PLACES_PHOTO_ACTION, photo(&state, &raw).await)
}

async fn fusion_search(State(state): State<SharedState>, raw: Bytes) -> ApiResponse {
    ApiResponse::from_result(
        FUSION_SEARCH_ROUTE,
        FUSION_SEARCH_ACTION,
        search(&state.yelp, &raw).await,
    )
}

async fn fusion_details(State(state): State<SharedState>, raw: Bytes) -> ApiResponse {
    ApiResponse::from_result(
        FUSION_DETAILS_ROUTE,
        FUSION_DETAILS_ACTION,
        details(&state.yelp, &raw).await,
    )
}

async fn fusion_reviews(State(state): State<SharedState>, raw: Bytes) -> ApiResponse {
    ApiResponse::from_result(
        FUSION_REVIEWS_ROUTE,
        FUSION_REVIEWS_ACTION,
        reviews(&state, &raw).await,
    )
}

async fn geocode_locate(State(state): State<SharedState>, raw: Bytes) -> ApiResponse {
    ApiResponse::from_result(
        GEOCODE_LOCATE_ROUTE,
        GEOCODE_LOCATE_ACTION,
        geocode(&state, &raw).await,
    )
}

async fn search(api: &dyn PlacesApi, raw: &[u8]) -> Result<Vec<PlaceSummary>> {
    let body = checked_body(raw)?;
    let origin = validation::check_for_coordinates(&body)?;
    let request = validation::check_for_search(&body, origin)?;
    api.search(&request).await
}

async fn details(api: &dyn PlacesApi, raw: &[u8]) -> Result<PlaceDetails> {
    let body = checked_body(raw)?;
    let origin = validation::check_for_coordinates(&body)?;
    let request = validation::check_for_details(&body, origin)?;
    api.details(&request).await
}

async fn photo(state: &AppState, raw: &[u8]) -> Result<PhotoData> {
    let body = checked_body(raw)?;
    let request = validation::check_for_photo(&body)?;
    state.google.photo(&request).await
}

async fn reviews(state: &AppState, raw: &[u8]) -> Result<ReviewsResult> {
    let body = checked_body(raw)?;
    let request = validation::check_for_reviews(&body)?;
    state.yelp.reviews(&request).await
}

async fn geocode(state: &AppState, raw: &[u8]) -> Result<GeocodeResult> {
    let body = checked_body(raw)?;
    let coordinates = validation::check_for_coordinates(&body)?;
    state.google.geocode(&coordinates).await
}

/// Create the HTTP router with every gateway route
pub fn create_server(state: SharedState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, HeaderName::from_static("x-api-key")])
        .max_age(state.cors_max_age);

    Router::new()
        .route(HEALTH_ROUTE, get(health))
        .route(PLACES_SEARCH_ROUTE, post(places_search))
        .route(PLACES_DETAILS_ROUTE, post(places_details))
        .route(PLACES_PHOTO_ROUTE, post(places_photo))
        .route(FUSION_SEARCH_ROUTE, post(fusion_search))
        .route(FUSION_DETAILS_ROUTE, post(fusion_details))
        .route(FUSION_REVIEWS_ROUTE, post(fusion_reviews))
        .route(GEOCODE_LOCATE_ROUTE, post(geocode_locate))
        .layer(ServiceBuilder::new().layer(cors))
        .with_state(state)
}

/// Serve until ctrl-c.
pub async fn start_server(state: SharedState, addr: SocketAddr) -> Result<()> {
    let app = create_server(state);

    info!("Starting places gateway on http://{}", addr);
    info!("Health check at http://{}{}", addr, HEALTH_ROUTE);

    Server::bind(&addr)
        .serve(app.into_make_service())
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown signal received");
        })
        .await
        .map_err(|e| GatewayError::System(format!("HTTP server error: {}", e)))
}
