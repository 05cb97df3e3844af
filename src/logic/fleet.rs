use log::error;

use crate::error::{LogisticsError, LogisticsResult};
use crate::logic::geo::{parse_heading, parse_position};
use crate::model::{Id, Plane};
use crate::store::traits::Store;

pub async fn list_planes<S: Store>(store: &S) -> LogisticsResult<Vec<Plane>> {
    Ok(store.list_planes().await?)
}

pub async fn get_plane<S: Store>(store: &S, id: &Id) -> LogisticsResult<Plane> {
    store
        .get_plane(id)
        .await?
        .ok_or_else(|| LogisticsError::PlaneNotFound(id.clone()))
}

/// Move a plane without landing it
pub async fn update_location<S: Store>(
    store: &S,
    id: &Id,
    location: &str,
    heading: &str,
) -> LogisticsResult<()> {
    let plane = get_plane(store, id).await?;
    let heading = parse_heading(heading)?;
    let location = parse_position(location)?;

    if !store.update_location(&plane.id, location, heading).await? {
        return Err(LogisticsError::PlaneNotFound(plane.id));
    }
    Ok(())
}

/// Move a plane and land it in `city`, which must exist
pub async fn land_plane<S: Store>(
    store: &S,
    id: &Id,
    location: &str,
    heading: &str,
    city: &Id,
) -> LogisticsResult<()> {
    let plane = get_plane(store, id).await?;
    ensure_city(store, city).await?;
    let heading = parse_heading(heading)?;
    let location = parse_position(location)?;

    if !store.land_plane(&plane.id, location, heading, city).await? {
        return Err(LogisticsError::PlaneNotFound(plane.id));
    }
    Ok(())
}

/// Replace the whole route with a single city
pub async fn replace_route<S: Store>(store: &S, id: &Id, city: &Id) -> LogisticsResult<()> {
    let plane = get_plane(store, id).await?;
    ensure_city(store, city).await?;

    if !store.set_route(&plane.id, vec![city.clone()]).await? {
        return Err(LogisticsError::PlaneNotFound(plane.id));
    }
    Ok(())
}

/// Append a city to the route unless it is already part of it
pub async fn add_route_city<S: Store>(store: &S, id: &Id, city: &Id) -> LogisticsResult<()> {
    let plane = get_plane(store, id).await?;
    ensure_city(store, city).await?;

    if !store.add_to_route(&plane.id, city).await? {
        return Err(LogisticsError::PlaneNotFound(plane.id));
    }
    Ok(())
}

/// Drop the current destination (first route entry)
pub async fn pop_route<S: Store>(store: &S, id: &Id) -> LogisticsResult<()> {
    let plane = get_plane(store, id).await?;

    if !store.pop_route(&plane.id).await? {
        return Err(LogisticsError::PlaneNotFound(plane.id));
    }
    Ok(())
}

async fn ensure_city<S: Store>(store: &S, city: &Id) -> LogisticsResult<()> {
    match store.get_city(city).await {
        Ok(Some(_)) => Ok(()),
        Ok(None) => Err(LogisticsError::CityNotFound(city.clone())),
        Err(e) => {
            error!("Failed to look up city {}: {}", city, e);
            Err(e.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::City;
    use crate::store::{CityStore, MemoryStore, PlaneStore};

    async fn fleet() -> MemoryStore {
        let store = MemoryStore::new();
        store
            .replace_cities(vec![
                City {
                    id: "London_GB".to_string(),
                    position: [-0.1276, 51.5072],
                    country: "United Kingdom".to_string(),
                },
                City {
                    id: "Cairo_EG".to_string(),
                    position: [31.2357, 30.0444],
                    country: "Egypt".to_string(),
                },
            ])
            .await
            .unwrap();
        store
            .replace_planes(vec![Plane::seeded("CARGO10".to_string(), [0.0, 0.0])])
            .await
            .unwrap();
        store
    }

    fn id(value: &str) -> Id {
        value.to_string()
    }

    #[tokio::test]
    async fn test_unknown_plane_is_not_found() {
        let store = fleet().await;
        let err = get_plane(&store, &id("CARGO99")).await.unwrap_err();
        assert_eq!(err.to_string(), "Plane CARGO99 does not exist");
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_update_location_validates_input() {
        let store = fleet().await;
        let plane = id("CARGO10");

        update_location(&store, &plane, "2,3", "240").await.unwrap();
        let stored = get_plane(&store, &plane).await.unwrap();
        assert_eq!(stored.current_location, [2.0, 3.0]);
        assert_eq!(stored.heading, 240.0);

        let err = update_location(&store, &plane, "2,3", "400").await.unwrap_err();
        assert!(matches!(err, LogisticsError::InvalidHeading(_)));
        let err = update_location(&store, &plane, "2", "40").await.unwrap_err();
        assert!(matches!(err, LogisticsError::InvalidLocation(_)));
    }

    #[tokio::test]
    async fn test_landing_requires_existing_city() {
        let store = fleet().await;
        let plane = id("CARGO10");

        let err = land_plane(&store, &plane, "1,1", "90", &id("Atlantis_XX"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "City Atlantis_XX does not exist");

        land_plane(&store, &plane, "-0.12,51.5", "90", &id("London_GB"))
            .await
            .unwrap();
        let stored = get_plane(&store, &plane).await.unwrap();
        assert_eq!(stored.landed.as_deref(), Some("London_GB"));
    }

    #[tokio::test]
    async fn test_route_editing() {
        let store = fleet().await;
        let plane = id("CARGO10");

        add_route_city(&store, &plane, &id("London_GB")).await.unwrap();
        add_route_city(&store, &plane, &id("Cairo_EG")).await.unwrap();
        add_route_city(&store, &plane, &id("London_GB")).await.unwrap();
        assert_eq!(get_plane(&store, &plane).await.unwrap().route, vec![id("London_GB"), id("Cairo_EG")]);

        pop_route(&store, &plane).await.unwrap();
        assert_eq!(get_plane(&store, &plane).await.unwrap().route, vec![id("Cairo_EG")]);

        replace_route(&store, &plane, &id("London_GB")).await.unwrap();
        assert_eq!(get_plane(&store, &plane).await.unwrap().route, vec![id("London_GB")]);

        let err = add_route_city(&store, &plane, &id("Nowhere_ZZ")).await.unwrap_err();
        assert!(matches!(err, LogisticsError::CityNotFound(_)));
    }
}
