use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use log::error;
use serde::Serialize;
use std::sync::Arc;

use crate::error::LogisticsError;
use crate::logic::{cities, fleet};
use crate::model::{Ack, CityResponse, Id, NeighborsResponse, PlaneResponse};
use crate::store::traits::Store;

pub type AppState<S> = Arc<S>;

pub type ApiError = (StatusCode, Json<ErrorResponse>);

/// Simple health check endpoint
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub ok: bool,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: &str) -> Self {
        Self {
            ok: false,
            error: message.to_string(),
        }
    }
}

pub(crate) fn api_error(e: LogisticsError) -> ApiError {
    let status = if e.is_not_found() {
        StatusCode::NOT_FOUND
    } else if e.is_invalid_input() {
        StatusCode::BAD_REQUEST
    } else {
        error!("{:#}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, Json(ErrorResponse::new(&e.to_string())))
}

// *** PLANES ***

pub async fn list_planes<S: Store>(
    State(store): State<AppState<S>>,
) -> Result<Json<Vec<PlaneResponse>>, ApiError> {
    let planes = fleet::list_planes(&*store).await.map_err(api_error)?;
    Ok(Json(planes.into_iter().map(PlaneResponse::from).collect()))
}

pub async fn get_plane<S: Store>(
    State(store): State<AppState<S>>,
    Path(plane_id): Path<Id>,
) -> Result<Json<PlaneResponse>, ApiError> {
    let plane = fleet::get_plane(&*store, &plane_id).await.map_err(api_error)?;
    Ok(Json(PlaneResponse::from(plane)))
}

pub async fn update_plane_location<S: Store>(
    State(store): State<AppState<S>>,
    Path((plane_id, location, heading)): Path<(Id, String, String)>,
) -> Result<Json<Ack>, ApiError> {
    fleet::update_location(&*store, &plane_id, &location, &heading)
        .await
        .map_err(api_error)?;
    Ok(Json(Ack::ok()))
}

pub async fn land_plane<S: Store>(
    State(store): State<AppState<S>>,
    Path((plane_id, location, heading, city)): Path<(Id, String, String, Id)>,
) -> Result<Json<Ack>, ApiError> {
    fleet::land_plane(&*store, &plane_id, &location, &heading, &city)
        .await
        .map_err(api_error)?;
    Ok(Json(Ack::ok()))
}

pub async fn replace_plane_route<S: Store>(
    State(store): State<AppState<S>>,
    Path((plane_id, city)): Path<(Id, Id)>,
) -> Result<Json<Ack>, ApiError> {
    fleet::replace_route(&*store, &plane_id, &city)
        .await
        .map_err(api_error)?;
    Ok(Json(Ack::ok()))
}

pub async fn add_plane_route<S: Store>(
    State(store): State<AppState<S>>,
    Path((plane_id, city)): Path<(Id, Id)>,
) -> Result<Json<Ack>, ApiError> {
    fleet::add_route_city(&*store, &plane_id, &city)
        .await
        .map_err(api_error)?;
    Ok(Json(Ack::ok()))
}

pub async fn remove_first_plane_route<S: Store>(
    State(store): State<AppState<S>>,
    Path(plane_id): Path<Id>,
) -> Result<Json<Ack>, ApiError> {
    fleet::pop_route(&*store, &plane_id).await.map_err(api_error)?;
    Ok(Json(Ack::ok()))
}

// *** CITIES ***

pub async fn list_cities<S: Store>(
    State(store): State<AppState<S>>,
) -> Result<Json<Vec<CityResponse>>, ApiError> {
    let cities = cities::list_cities(&*store).await.map_err(api_error)?;
    Ok(Json(cities.into_iter().map(CityResponse::from).collect()))
}

pub async fn get_city<S: Store>(
    State(store): State<AppState<S>>,
    Path(city_id): Path<Id>,
) -> Result<Json<CityResponse>, ApiError> {
    let city = cities::get_city(&*store, &city_id).await.map_err(api_error)?;
    Ok(Json(CityResponse::from(city)))
}

pub async fn get_city_neighbors<S: Store>(
    State(store): State<AppState<S>>,
    Path((city_id, count)): Path<(Id, String)>,
) -> Result<Json<NeighborsResponse>, ApiError> {
    let neighbors = cities::neighbors(&*store, &city_id, &count)
        .await
        .map_err(api_error)?;
    Ok(Json(NeighborsResponse {
        neighbors: neighbors.into_iter().map(CityResponse::from).collect(),
    }))
}
