use crate::model::{Cargo, City, FlightLogUpdate, Id, Plane, Position, WorldCity};
use anyhow::Result;
use chrono::{DateTime, Utc};
use tokio::sync::mpsc;

/// Raw dataset the city-reduction pipeline reads from
#[async_trait::async_trait]
pub trait WorldCityStore: Send + Sync {
    async fn list_world_cities(&self) -> Result<Vec<WorldCity>>;
    /// Replace the whole raw dataset, returning the number of stored records
    async fn replace_world_cities(&self, cities: Vec<WorldCity>) -> Result<usize>;
}

#[async_trait::async_trait]
pub trait CityStore: Send + Sync {
    async fn get_city(&self, id: &Id) -> Result<Option<City>>;
    /// All cities ordered by id
    async fn list_cities(&self) -> Result<Vec<City>>;
    /// Replace the whole collection. Records sharing an id keep the last one
    /// written. Returns the number of stored records.
    async fn replace_cities(&self, cities: Vec<City>) -> Result<usize>;
}

#[async_trait::async_trait]
pub trait PlaneStore: Send + Sync {
    /// A plane with its most recent landing event (never the full flight log)
    async fn get_plane(&self, id: &Id) -> Result<Option<Plane>>;
    async fn list_planes(&self) -> Result<Vec<Plane>>;
    /// Replace the whole collection, dropping every flight log
    async fn replace_planes(&self, planes: Vec<Plane>) -> Result<usize>;
    async fn update_location(&self, id: &Id, location: Position, heading: f64) -> Result<bool>;
    /// Update location and heading, mark the plane as landed in `city` and
    /// publish a landing notification
    async fn land_plane(&self, id: &Id, location: Position, heading: f64, city: &Id) -> Result<bool>;
    async fn set_route(&self, id: &Id, route: Vec<Id>) -> Result<bool>;
    /// Append `city` unless the route already contains it
    async fn add_to_route(&self, id: &Id, city: &Id) -> Result<bool>;
    async fn pop_route(&self, id: &Id) -> Result<bool>;
    async fn record_landing(&self, id: &Id, update: FlightLogUpdate) -> Result<bool>;
    /// Ids of planes as they land, from now on
    async fn subscribe_landings(&self) -> Result<mpsc::UnboundedReceiver<Id>>;
}

#[async_trait::async_trait]
pub trait CargoStore: Send + Sync {
    async fn get_cargo(&self, id: &Id) -> Result<Option<Cargo>>;
    async fn insert_cargo(&self, cargo: Cargo) -> Result<()>;
    /// Cargo at `location` that is still "in process"
    async fn list_cargo_in_process_at(&self, location: &Id) -> Result<Vec<Cargo>>;
    async fn mark_cargo_delivered(&self, id: &Id, at: DateTime<Utc>) -> Result<bool>;
    async fn set_cargo_courier(&self, id: &Id, courier: Option<Id>) -> Result<bool>;
    async fn move_cargo(&self, id: &Id, location: &Id) -> Result<bool>;
}

pub trait Store: WorldCityStore + CityStore + PlaneStore + CargoStore + Send + Sync {}
