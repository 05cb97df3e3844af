use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;

use crate::api::{cargo_handlers, handlers};
use crate::store::traits::Store;

pub fn create_router<S: Store + 'static>() -> Router<Arc<S>> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Planes
        .route("/planes", get(handlers::list_planes::<S>))
        .route("/planes/:id", get(handlers::get_plane::<S>))
        .route(
            "/planes/:id/location/:location/:heading",
            put(handlers::update_plane_location::<S>),
        )
        .route(
            "/planes/:id/location/:location/:heading/:city",
            put(handlers::land_plane::<S>),
        )
        .route(
            "/planes/:id/route/destination",
            delete(handlers::remove_first_plane_route::<S>),
        )
        .route(
            "/planes/:id/route/:city",
            put(handlers::replace_plane_route::<S>).post(handlers::add_plane_route::<S>),
        )
        // Cities
        .route("/cities", get(handlers::list_cities::<S>))
        .route("/cities/:id", get(handlers::get_city::<S>))
        .route(
            "/cities/:id/neighbors/:count",
            get(handlers::get_city_neighbors::<S>),
        )
        // Cargo. The second segment is the cargo id everywhere except
        // `/cargo/:id/to/:destination`, where it names the origin location.
        .route(
            "/cargo/location/:location",
            get(cargo_handlers::cargo_at_location::<S>),
        )
        .route(
            "/cargo/:id/to/:destination",
            post(cargo_handlers::create_cargo::<S>),
        )
        .route("/cargo/:id/delivered", put(cargo_handlers::cargo_delivered::<S>))
        .route(
            "/cargo/:id/courier/:plane",
            put(cargo_handlers::cargo_assign_courier::<S>),
        )
        .route("/cargo/:id/courier", delete(cargo_handlers::cargo_unset_courier::<S>))
        .route(
            "/cargo/:id/location/:location",
            put(cargo_handlers::cargo_move::<S>),
        )
}
