use axum::{
    extract::{Path, State},
    response::Json,
};

use crate::api::handlers::{api_error, ApiError, AppState};
use crate::logic::cargo;
use crate::model::{Ack, Cargo, Id};
use crate::store::traits::Store;

pub async fn cargo_at_location<S: Store>(
    State(store): State<AppState<S>>,
    Path(location): Path<Id>,
) -> Result<Json<Vec<Cargo>>, ApiError> {
    let cargo = cargo::cargo_at_location(&*store, &location)
        .await
        .map_err(api_error)?;
    Ok(Json(cargo))
}

pub async fn create_cargo<S: Store>(
    State(store): State<AppState<S>>,
    Path((location, destination)): Path<(Id, Id)>,
) -> Result<Json<Cargo>, ApiError> {
    let cargo = cargo::create_cargo(&*store, &location, &destination)
        .await
        .map_err(api_error)?;
    Ok(Json(cargo))
}

pub async fn cargo_delivered<S: Store>(
    State(store): State<AppState<S>>,
    Path(cargo_id): Path<Id>,
) -> Result<Json<Ack>, ApiError> {
    cargo::mark_delivered(&*store, &cargo_id)
        .await
        .map_err(api_error)?;
    Ok(Json(Ack::ok()))
}

pub async fn cargo_assign_courier<S: Store>(
    State(store): State<AppState<S>>,
    Path((cargo_id, courier)): Path<(Id, Id)>,
) -> Result<Json<Ack>, ApiError> {
    cargo::assign_courier(&*store, &cargo_id, &courier)
        .await
        .map_err(api_error)?;
    Ok(Json(Ack::ok()))
}

pub async fn cargo_unset_courier<S: Store>(
    State(store): State<AppState<S>>,
    Path(cargo_id): Path<Id>,
) -> Result<Json<Ack>, ApiError> {
    cargo::unset_courier(&*store, &cargo_id)
        .await
        .map_err(api_error)?;
    Ok(Json(Ack::ok()))
}

pub async fn cargo_move<S: Store>(
    State(store): State<AppState<S>>,
    Path((cargo_id, location)): Path<(Id, Id)>,
) -> Result<Json<Ack>, ApiError> {
    cargo::move_cargo(&*store, &cargo_id, &location)
        .await
        .map_err(api_error)?;
    Ok(Json(Ack::ok()))
}
