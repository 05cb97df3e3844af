use chrono::Utc;
use log::error;

use crate::error::{LogisticsError, LogisticsResult};
use crate::model::{Cargo, Id};
use crate::store::traits::Store;

/// New cargo waiting at `location` for transport to `destination`; both must be cities
pub async fn create_cargo<S: Store>(
    store: &S,
    location: &Id,
    destination: &Id,
) -> LogisticsResult<Cargo> {
    for city in [location, destination] {
        if store.get_city(city).await?.is_none() {
            return Err(LogisticsError::CityNotFound(city.clone()));
        }
    }

    let cargo = Cargo::new(location.clone(), destination.clone());
    store.insert_cargo(cargo.clone()).await?;
    Ok(cargo)
}

/// Cargo still in process at a city or on a plane
pub async fn cargo_at_location<S: Store>(store: &S, location: &Id) -> LogisticsResult<Vec<Cargo>> {
    ensure_city_or_plane(store, location).await?;
    Ok(store.list_cargo_in_process_at(location).await?)
}

pub async fn get_cargo<S: Store>(store: &S, id: &Id) -> LogisticsResult<Cargo> {
    store
        .get_cargo(id)
        .await?
        .ok_or_else(|| LogisticsError::CargoNotFound(id.clone()))
}

pub async fn mark_delivered<S: Store>(store: &S, id: &Id) -> LogisticsResult<()> {
    let cargo = get_cargo(store, id).await?;
    if !store.mark_cargo_delivered(&cargo.id, Utc::now()).await? {
        return Err(LogisticsError::CargoNotFound(cargo.id));
    }
    Ok(())
}

/// The courier picks the cargo up the next time it reaches the cargo's location
pub async fn assign_courier<S: Store>(store: &S, id: &Id, courier: &Id) -> LogisticsResult<()> {
    let cargo = get_cargo(store, id).await?;
    if store.get_plane(courier).await?.is_none() {
        return Err(LogisticsError::PlaneNotFound(courier.clone()));
    }

    if !store.set_cargo_courier(&cargo.id, Some(courier.clone())).await? {
        return Err(LogisticsError::CargoNotFound(cargo.id));
    }
    Ok(())
}

pub async fn unset_courier<S: Store>(store: &S, id: &Id) -> LogisticsResult<()> {
    let cargo = get_cargo(store, id).await?;
    if !store.set_cargo_courier(&cargo.id, None).await? {
        return Err(LogisticsError::CargoNotFound(cargo.id));
    }
    Ok(())
}

/// Move cargo between a city and a plane (either direction)
pub async fn move_cargo<S: Store>(store: &S, id: &Id, location: &Id) -> LogisticsResult<()> {
    let cargo = get_cargo(store, id).await?;
    ensure_city_or_plane(store, location).await?;

    if !store.move_cargo(&cargo.id, location).await? {
        return Err(LogisticsError::CargoNotFound(cargo.id));
    }
    Ok(())
}

async fn ensure_city_or_plane<S: Store>(store: &S, location: &Id) -> LogisticsResult<()> {
    if store.get_city(location).await?.is_some() || store.get_plane(location).await?.is_some() {
        return Ok(());
    }
    error!("Location {} does not exist", location);
    Err(LogisticsError::LocationNotFound(location.clone()))
}
